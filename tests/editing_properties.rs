//! Properties of editing commands that hold for any text: inverses,
//! undo, and register round trips

use scripter::config::Config;
use scripter::core::editor::{Editor, HostAction};
use scripter::core::input::parse_keys;
use scripter::core::mode::Mode;

fn editor(text: &str) -> Editor {
    Editor::with_text(&Config::with_defaults().unwrap(), text).unwrap()
}

fn keys(editor: &mut Editor, notation: &str) {
    for event in parse_keys(notation).unwrap() {
        editor.handle_key(event);
    }
}

const SCRIPT: &str = "import nuke\n\ndef build(node):\n    # make it\n    value = node['x']\n        return value\n";

#[test]
fn comment_toggle_is_an_involution() {
    let mut ed = editor(SCRIPT);
    keys(&mut ed, "VG,ci");
    assert_ne!(ed.text(), SCRIPT);
    assert!(ed.text().contains("# import nuke"));
    assert!(ed.text().contains("    make it"));
    keys(&mut ed, "ggVG,ci");
    assert_eq!(ed.text(), SCRIPT);
}

#[test]
fn forced_comment_and_uncomment() {
    let mut ed = editor("a\n# b");
    keys(&mut ed, "2,cc");
    assert_eq!(ed.text(), "# a\n# # b");
    keys(&mut ed, "2,cu");
    assert_eq!(ed.text(), "a\n# b");
}

#[test]
fn delete_then_paste_restores_text() {
    for (text, notation) in [
        ("one two three", "dwP"),
        ("one two three", "wdeP"),
        ("a\nb\nc", "jddP"),
        ("a\nb\nc", "Gddp"),
        ("a\nb\nc", "gg2ddP"),
    ] {
        let mut ed = editor(text);
        keys(&mut ed, notation);
        assert_eq!(ed.text(), text, "after {}", notation);
    }
}

#[test]
fn deleting_a_huge_line_still_overwrites_register() {
    let text = format!("small\n{}\n", "x".repeat(11 * 1024 * 1024));
    let mut ed = editor(&text);
    keys(&mut ed, "yyjddP");
    assert_eq!(ed.text().len(), text.len());
    assert!(ed.text() == text);
}

#[test]
fn yank_then_paste_duplicates() {
    let mut ed = editor("a\nb\nc");
    keys(&mut ed, "jyyp");
    assert_eq!(ed.text(), "a\nb\nb\nc");
    assert_eq!(ed.cursor_position(), (2, 0));

    let mut ed = editor("ab");
    keys(&mut ed, "yl3p");
    assert_eq!(ed.text(), "aaaab");
}

#[test]
fn motions_and_their_inverses_return_home() {
    let mut ed = editor("alpha beta gamma\nsecond line here\nthird");
    for (forward, back) in [("ww", "bb"), ("jj", "kk"), ("3l", "3h"), ("<C-d>", "<C-u>")] {
        keys(&mut ed, "gg0");
        let home = ed.cursor_position();
        keys(&mut ed, forward);
        keys(&mut ed, back);
        assert_eq!(ed.cursor_position(), home, "{} then {}", forward, back);
    }
}

#[test]
fn motions_clamp_at_document_bounds() {
    let mut ed = editor("ab\ncd");
    keys(&mut ed, "100j100l");
    assert_eq!(ed.cursor_position(), (1, 2));
    keys(&mut ed, "100k100h");
    assert_eq!(ed.cursor_position(), (0, 0));
    assert_eq!(ed.text(), "ab\ncd");
}

#[test]
fn every_command_undoes_in_one_step() {
    for notation in ["3dw", "2dd", "ysiw)", ">>", "J", "cwnew<Esc>", "oline<CR>more<Esc>", "VjU", ":%s/o/0/g<CR>"] {
        let mut ed = editor("one two\nthree four\nfive");
        keys(&mut ed, notation);
        assert_ne!(ed.text(), "one two\nthree four\nfive", "{} changed nothing", notation);
        keys(&mut ed, "u");
        assert_eq!(ed.text(), "one two\nthree four\nfive", "undo after {}", notation);
        keys(&mut ed, "<C-r>");
        assert_ne!(ed.text(), "one two\nthree four\nfive", "redo after {}", notation);
    }
}

#[test]
fn goto_line_is_one_based_and_clamped() {
    let mut ed = editor("a\n  b\nc");
    keys(&mut ed, ":2<CR>");
    assert_eq!(ed.cursor_position(), (1, 2));
    keys(&mut ed, ":42<CR>");
    assert_eq!(ed.cursor_position(), (2, 0));
}

#[test]
fn goto_definition_and_back() {
    let mut ed = editor("def main():\n    pass\n\nmain()");
    keys(&mut ed, "G0<C-]>");
    assert_eq!(ed.cursor_position(), (0, 4));
    keys(&mut ed, "<C-o>");
    assert_eq!(ed.cursor_position(), (3, 0));
}

#[test]
fn syntax_error_leaves_cursor_and_reports_line() {
    let mut ed = editor("def main(:\n    pass\nmain");
    keys(&mut ed, "G0");
    let before = ed.cursor_position();
    let outcome = ed.handle_key(parse_keys("<C-]>").unwrap()[0]);
    assert_eq!(ed.cursor_position(), before);
    assert!(
        outcome
            .host_actions
            .iter()
            .any(|a| matches!(a, HostAction::ReportLineError(_)))
    );
}

#[test]
fn sources_remember_cursor_and_share_register() {
    let mut ed = editor("");
    ed.load_source("first", "alpha\nbeta\ngamma");
    keys(&mut ed, "jyy");
    ed.load_source("second", "one");
    assert_eq!(ed.cursor_position(), (0, 0));
    keys(&mut ed, "p");
    assert_eq!(ed.text(), "one\nbeta");
    ed.load_source("first", "alpha\nbeta\ngamma");
    assert_eq!(ed.cursor_position(), (1, 0));
    assert_eq!(ed.cursor_memory().recall("second"), Some(4));
    assert_eq!(ed.mode(), Mode::Normal);
}
