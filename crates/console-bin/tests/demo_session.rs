use console_events::output_channel;
use console_state::{Console, ConsoleSettings, NoopCaretSink};
use pretty_assertions::assert_eq;
use scriptconsole::{demo, transcript};

#[tokio::test]
async fn worker_answers_land_above_the_prompt() {
    let (out_tx, out_rx) = output_channel();
    let (evaluator, pending, worker) = demo::spawn_worker(out_tx);
    let mut console = Console::new(ConsoleSettings::default(), evaluator, NoopCaretSink, out_rx);

    for line in ["snapshot", "echo hi", "nope"] {
        let doc = console.document_mut();
        let end = doc.length();
        doc.user_insert(end, &format!("{line}\n"));
    }
    let end = console.document().length();
    console.document_mut().user_insert(end, "half");
    pending.idle().await;
    assert_eq!(console.pump(), 3);

    assert_eq!(
        console.document().text(),
        "$ snapshot\n$ echo hi\n$ nope\nsnapshot 1 saved\nhi\nunknown command: nope\n$ half"
    );
    assert_eq!(console.document().current_command(), "half");

    let end = console.document().length();
    console.document_mut().user_insert(end, "\n");
    console.document_mut().user_insert(0, "reset\n");
    pending.idle().await;
    console.pump();
    // The error for "half" is applied first, then "reset" wipes the transcript.
    assert_eq!(console.document().text(), "$ ");
    assert_eq!(console.document().editable_start(), 2);

    drop(console);
    worker.await.unwrap();
}

#[tokio::test]
async fn styled_render_of_a_session() {
    let (out_tx, out_rx) = output_channel();
    let (evaluator, pending, worker) = demo::spawn_worker(out_tx);
    let mut console = Console::new(ConsoleSettings::default(), evaluator, NoopCaretSink, out_rx);
    console.document_mut().user_insert(2, "help\n");
    pending.idle().await;
    console.pump();
    assert_eq!(
        transcript::render(&console.document().segments(), true),
        "[prompt]$ [/][input]help\n[/][status]commands: snapshot, echo <text>, reset, help\n[/][prompt]$ [/]"
    );
    drop(console);
    worker.await.unwrap();
}
