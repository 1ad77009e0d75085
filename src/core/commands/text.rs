//! Indentation and case commands

use crate::core::buffer::Buffer;
use crate::core::command::CommandContext;
use crate::core::commands::block_end;
use crate::core::commands::operator::{Selection, selected_lines, selection};
use crate::core::editor::Editor;
use crate::core::error::EditError;
use crate::core::mode::Mode;
use crate::core::text::{indent_width, leading_whitespace, word_range_at};

/// `>>` / `<<` on `count` lines, or `>` / `<` by `count` units on the
/// visual selection
pub fn shift(editor: &mut Editor, ctx: &CommandContext, indent: bool) -> Result<(), EditError> {
    let (first, last, units) = if editor.mode.is_visual() {
        let (first, last) = selected_lines(editor);
        (first, last, ctx.count)
    } else {
        let first = editor.current_line();
        (first, block_end(&editor.buffer, first, ctx.count), 1)
    };
    for line in first..=last {
        if indent {
            indent_line(editor, line, units)?;
        } else {
            outdent_line(editor, line, units)?;
        }
    }
    editor.set_mode(Mode::Normal);
    let pos = editor.buffer.first_non_blank(first);
    editor.set_cursor(pos);
    Ok(())
}

fn indent_line(editor: &mut Editor, line: usize, units: usize) -> Result<(), EditError> {
    if editor.buffer.line_text(line).trim().is_empty() {
        return Ok(());
    }
    let unit = editor.settings.indent_unit().repeat(units);
    let start = editor.buffer.line_start(line);
    editor.buffer.insert(start, &unit)
}

/// Strip at most `units` indent units of leading whitespace
pub(crate) fn outdent_line(editor: &mut Editor, line: usize, units: usize) -> Result<(), EditError> {
    let tab_width = editor.settings.tab_width;
    let limit = tab_width * units;
    let text = editor.buffer.line_text(line);
    let mut width = 0;
    let mut strip = 0;
    for c in leading_whitespace(&text).chars() {
        let w = if c == '\t' { tab_width } else { 1 };
        if width + w > limit {
            break;
        }
        width += w;
        strip += 1;
    }
    let start = editor.buffer.line_start(line);
    editor.buffer.delete(start..start + strip)?;
    Ok(())
}

/// Upper- or lowercase the selection, or the word under the cursor
pub fn change_case(editor: &mut Editor, upper: bool) -> Result<(), EditError> {
    let range = if editor.mode.is_visual() {
        match selection(editor) {
            Selection::Chars(range) => range,
            Selection::Lines(first, last) => {
                editor.buffer.line_start(first)..editor.buffer.line_end(last)
            }
        }
    } else {
        match word_range_at(&editor.buffer, editor.position()) {
            Some(range) => range,
            None => return Ok(()),
        }
    };
    let text = editor.buffer.slice(range.clone());
    let mapped = if upper {
        text.to_uppercase()
    } else {
        text.to_lowercase()
    };
    if mapped != text {
        editor.buffer.replace(range.clone(), &mapped)?;
    }
    editor.set_mode(Mode::Normal);
    editor.set_cursor(range.start);
    Ok(())
}

/// Re-indent the whole buffer to units of `tab_width` spaces, returning how
/// many lines changed.
///
/// The unit the file was written with is detected first, so a file indented
/// by two or eight spaces is rescaled rather than padded. Widths that still
/// fall between stops round up to the next one.
pub fn retab(editor: &mut Editor) -> Result<usize, EditError> {
    let tab_width = editor.settings.tab_width;
    let widths: Vec<usize> = (0..editor.buffer.line_count())
        .map(|line| indent_width(&editor.buffer.line_text(line), tab_width))
        .collect();
    let unit = detect_indent_unit(&editor.buffer, tab_width);

    let mut changed = 0;
    for (line, width) in widths.into_iter().enumerate() {
        let text = editor.buffer.line_text(line);
        let leading = leading_whitespace(&text);
        let scaled = match unit {
            Some(unit) if unit > 1 => (width * tab_width).div_ceil(unit),
            _ => width,
        };
        let replacement = " ".repeat(scaled.div_ceil(tab_width) * tab_width);
        if replacement == leading {
            continue;
        }
        let start = editor.buffer.line_start(line);
        let end = start + leading.chars().count();
        editor.buffer.replace(start..end, &replacement)?;
        changed += 1;
    }
    Ok(changed)
}

/// Most common step between the indents of consecutive non-empty lines;
/// ties go to the step seen first
fn detect_indent_unit(buffer: &Buffer, tab_width: usize) -> Option<usize> {
    let indents: Vec<usize> = (0..buffer.line_count())
        .map(|line| buffer.line_text(line))
        .filter(|text| !text.is_empty())
        .map(|text| indent_width(&text, tab_width))
        .collect();

    let mut steps: Vec<(usize, usize)> = Vec::new();
    for pair in indents.windows(2) {
        let step = pair[0].abs_diff(pair[1]);
        if step == 0 {
            continue;
        }
        match steps.iter_mut().find(|(s, _)| *s == step) {
            Some((_, seen)) => *seen += 1,
            None => steps.push((step, 1)),
        }
    }
    let best = steps.iter().map(|(_, seen)| *seen).max()?;
    steps.into_iter().find(|(_, seen)| *seen == best).map(|(step, _)| step)
}

#[cfg(test)]
mod tests {
    use crate::core::commands::test_support::{editor, keys};

    #[test]
    fn test_indent_and_outdent_lines() {
        let mut ed = editor("a\n\nb\nc");
        keys(&mut ed, "3>>");
        assert_eq!(ed.text(), "    a\n\n    b\nc");
        assert_eq!(ed.cursor_position(), (0, 4));
        keys(&mut ed, "<<");
        assert_eq!(ed.text(), "a\n\n    b\nc");
    }

    #[test]
    fn test_outdent_strips_at_most_one_unit() {
        let mut ed = editor("      six\n  two\n\tx");
        keys(&mut ed, "3<<");
        assert_eq!(ed.text(), "  six\ntwo\nx");
    }

    #[test]
    fn test_visual_shift_by_count() {
        let mut ed = editor("a\nb\nc");
        keys(&mut ed, "Vj2>");
        assert_eq!(ed.text(), "        a\n        b\nc");
        assert_eq!(ed.mode(), crate::core::mode::Mode::Normal);
    }

    #[test]
    fn test_word_case() {
        let mut ed = editor("make loud please");
        keys(&mut ed, "wgUaw");
        assert_eq!(ed.text(), "make LOUD please");
        keys(&mut ed, "guaw");
        assert_eq!(ed.text(), "make loud please");
    }

    #[test]
    fn test_visual_case() {
        let mut ed = editor("abc def");
        keys(&mut ed, "vwU");
        assert_eq!(ed.text(), "ABC def");
        keys(&mut ed, "Vu");
        assert_eq!(ed.text(), "abc def");
    }
}
