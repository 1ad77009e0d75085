//! Cursor motions and view scrolling

use crate::core::command::CommandContext;
use crate::core::editor::Editor;
use crate::core::error::EditError;
use crate::core::motion::Motion;

/// Apply a motion; in visual modes the selection follows the cursor
pub fn move_cursor(editor: &mut Editor, motion: Motion, ctx: &CommandContext) -> Result<(), EditError> {
    let args = ctx.motion_args(editor.settings.jump_lines);
    let extend = editor.mode.is_visual();
    editor
        .window
        .move_cursor(&editor.buffer, motion, &args, extend);
    Ok(())
}

/// Scroll the view by `scroll_lines` per count, keeping the cursor on screen
pub fn scroll(editor: &mut Editor, ctx: &CommandContext, down: bool) -> Result<(), EditError> {
    let lines = editor.settings.scroll_lines.saturating_mul(ctx.count);
    let lines = isize::try_from(lines).unwrap_or(isize::MAX);
    let delta = if down { lines } else { -lines };
    editor.window.scroll_by(delta, &editor.buffer);
    Ok(())
}

pub fn center_view(editor: &mut Editor) -> Result<(), EditError> {
    editor.window.center_on_cursor(&editor.buffer);
    Ok(())
}
