mod common;

use common::Harness;
use console_state::{ConsoleSettings, Segment, Style};
use pretty_assertions::assert_eq;

fn seg(text: &str, style: Style) -> Segment {
    Segment {
        text: text.to_string(),
        style,
    }
}

#[test]
fn fresh_console_shows_prompt() {
    let h = Harness::new();
    assert_eq!(h.doc.text(), "$ ");
    assert_eq!(h.doc.editable_start(), 2);
    assert_eq!(h.doc.caret(), 2);
    assert_eq!(h.last_caret(), Some(2));
    assert_eq!(h.doc.prompt_span(), Some((0, 2)));
    assert!(h.doc.is_prompt_active());
    assert_eq!(h.doc.current_command(), "");
}

#[test]
fn type_and_submit_snapshot() {
    let mut h = Harness::new();
    h.doc.user_insert(2, "snapshot");
    assert_eq!(h.doc.text(), "$ snapshot");
    assert_eq!(h.doc.current_command(), "snapshot");
    assert_eq!(h.doc.caret(), 10);

    h.doc.user_insert(10, "\n");
    assert_eq!(h.evaluated(), vec!["snapshot".to_string()]);
    assert_eq!(h.doc.text(), "$ snapshot\n$ ");
    assert_eq!(h.doc.editable_start(), "$ snapshot\n$ ".len());
    assert_eq!(h.doc.caret(), h.doc.length());
    assert_eq!(
        h.doc.segments(),
        vec![
            seg("$ ", Style::Prompt),
            seg("snapshot\n", Style::UserInput),
            seg("$ ", Style::Prompt),
        ]
    );
}

#[test]
fn status_injected_while_typing() {
    let mut h = Harness::new();
    h.type_text("sn");
    assert_eq!(h.doc.caret(), 4);
    h.doc.inject_status("loading...");
    assert_eq!(h.doc.text(), "loading...\n$ sn");
    assert_eq!(h.doc.current_command(), "sn");
    assert_eq!(h.doc.caret(), "loading...\n$ sn".len());
    assert_eq!(h.last_caret(), Some(15));
    assert_eq!(h.doc.editable_start(), 13);
    // Still editable: keep typing where the caret is.
    let caret = h.doc.caret();
    h.doc.user_insert(caret, "apshot");
    assert_eq!(h.doc.current_command(), "snapshot");
}

#[test]
fn successive_injections_keep_call_order() {
    let mut h = Harness::new();
    h.type_text("cmd");
    h.doc.inject_echo("first");
    h.doc.inject_error("second");
    h.doc.inject_status("third");
    assert_eq!(h.doc.text(), "first\nsecond\nthird\n$ cmd");
    assert_eq!(h.doc.prompt_span(), Some((19, 21)));
    assert_eq!(
        h.doc.segments(),
        vec![
            seg("first\n", Style::Echo),
            seg("second\n", Style::Error),
            seg("third\n", Style::Status),
            seg("$ ", Style::Prompt),
            seg("cmd", Style::UserInput),
        ]
    );
}

#[test]
fn caret_mid_command_moves_with_command() {
    let mut h = Harness::new();
    h.type_text("abcd");
    h.doc.move_caret(4); // between "ab" and "cd"
    h.doc.inject_echo("X");
    assert_eq!(h.doc.caret(), 4 + 2);
    h.doc.user_insert(h.doc.caret(), "-");
    assert_eq!(h.doc.current_command(), "ab-cd");
}

#[test]
fn caret_in_transcript_stays_put_on_injection() {
    let mut h = Harness::new();
    h.doc.inject_status("line one");
    h.type_text("x");
    h.doc.move_caret(3);
    h.doc.inject_status("line two");
    assert_eq!(h.doc.caret(), 3);
    assert_eq!(h.doc.text(), "line one\nline two\n$ x");
}

#[test]
fn empty_submission_still_reaches_evaluator() {
    let mut h = Harness::new();
    h.type_text("   ");
    h.type_text("\n");
    assert_eq!(h.evaluated(), vec![String::new()]);
    assert_eq!(h.doc.text(), "$    \n$ ");
    assert!(h.doc.history().is_empty());
}

#[test]
fn leading_terminator_submits_without_inserting() {
    let mut h = Harness::new();
    h.type_text("ls");
    h.type_text("\nignored");
    assert_eq!(h.evaluated(), vec!["ls".to_string()]);
    assert_eq!(h.doc.text(), "$ ls\n$ ");
}

#[test]
fn paste_submits_first_line_and_drops_the_rest() {
    let mut h = Harness::new();
    h.type_text("  echo hi\r\nsecond line");
    assert_eq!(h.evaluated(), vec!["echo hi".to_string()]);
    assert_eq!(h.doc.text(), "$   echo hi\n$ ");
}

#[test]
fn command_text_keeps_whitespace_current_command_trims() {
    let mut h = Harness::new();
    h.type_text("  run  ");
    assert_eq!(h.doc.command_text(), "  run  ");
    assert_eq!(h.doc.current_command(), "run");
}

#[test]
fn clear_resets_to_single_prompt() {
    let mut h = Harness::new();
    h.type_text("a\n");
    h.doc.inject_status("done");
    h.type_text("partial");
    h.doc.clear();
    assert_eq!(h.doc.text(), "$ ");
    assert_eq!(h.doc.editable_start(), 2);
    assert_eq!(h.doc.caret(), 2);
    h.doc.inject_echo("after clear");
    assert_eq!(h.doc.text(), "after clear\n$ ");
}

#[test]
fn foreground_error_lands_after_command_line() {
    let mut h = Harness::new();
    h.type_text("bad");
    h.doc.inject_error_foreground("oops");
    assert_eq!(h.doc.text(), "$ bad\noops\n");
    assert_eq!(h.doc.caret(), h.doc.length());
    assert_eq!(h.doc.editable_start(), 2);
    assert_eq!(h.doc.style_at(h.doc.length() - 2), Some(Style::Error));
}

#[test]
fn history_recall_replaces_command_line() {
    let mut h = Harness::new();
    h.type_text("first\n");
    h.type_text("second\n");
    h.type_text("dra");
    assert!(h.doc.history_previous());
    assert_eq!(h.doc.current_command(), "second");
    assert!(h.doc.history_previous());
    assert_eq!(h.doc.current_command(), "first");
    assert!(!h.doc.history_previous());
    assert!(h.doc.history_next());
    assert_eq!(h.doc.current_command(), "second");
    assert!(h.doc.history_next());
    assert_eq!(h.doc.command_text(), "dra");
    assert!(!h.doc.history_next());
    assert_eq!(h.transcript(), "$ first\n$ second\n$ ");
    assert_eq!(h.doc.caret(), h.doc.length());
}

#[test]
fn custom_marker_and_terminator() {
    let settings = ConsoleSettings::new(">>> ", [';'], 5);
    let mut h = Harness::with_settings(settings);
    assert_eq!(h.doc.editable_start(), 4);
    h.type_text("print 1\nstill same line; rest");
    assert_eq!(h.evaluated(), vec!["print 1\nstill same line".to_string()]);
    assert_eq!(h.doc.text(), ">>> print 1\nstill same line\n>>> ");
    h.doc.inject_status("ok");
    assert_eq!(h.doc.prompt_span(), Some((31, 35)));
    assert_eq!(h.doc.text_in(31, 4).unwrap(), ">>> ");
}

#[test]
fn headless_document_works_without_collaborators() {
    let mut doc = console_state::ConsoleDocument::headless();
    doc.user_insert(0, "x\n");
    assert_eq!(doc.text(), "$ x\n$ ");
}
