use console_events::{ConsoleOutput, output_channel};
use console_state::{Console, ConsoleDocument, ConsoleSettings, NoopCaretSink};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;
use std::thread;

#[test]
fn worker_output_is_applied_on_pump() {
    let (out_tx, out_rx) = output_channel();
    let (job_tx, job_rx) = mpsc::channel::<String>();

    // Evaluator forwards the command to a worker thread; the worker answers
    // through the output channel, never touching the document.
    let worker = {
        let out_tx = out_tx.clone();
        thread::spawn(move || {
            for command in job_rx {
                out_tx.echo(format!("ran {command}"));
                out_tx.status("done");
            }
        })
    };
    let mut console = Console::new(
        ConsoleSettings::default(),
        move |command: String| {
            job_tx.send(command).unwrap();
        },
        NoopCaretSink,
        out_rx,
    );

    let doc = console.document_mut();
    let end = doc.length();
    doc.user_insert(end, "snapshot\n");
    let end = doc.length();
    doc.user_insert(end, "ne");

    // Wait until the worker has posted both lines for the submitted command.
    while console.receiver_mut().pending() < 2 {
        thread::yield_now();
    }
    assert_eq!(console.pump(), 2);
    assert_eq!(console.document().text(), "$ snapshot\nran snapshot\ndone\n$ ne");
    assert_eq!(console.document().current_command(), "ne");
    assert_eq!(console.document().caret(), console.document().length());
    assert_eq!(console.pump(), 0);

    drop(console);
    worker.join().unwrap();
}

#[test]
fn clear_and_foreground_outputs() {
    let (tx, rx) = output_channel();
    let mut console = Console::new(ConsoleSettings::default(), |_: String| {}, NoopCaretSink, rx);
    tx.status("one");
    tx.clear();
    tx.error("two");
    assert_eq!(console.pump(), 3);
    assert_eq!(console.document().text(), "two\n$ ");
    console.apply(ConsoleOutput::ErrorForeground("fg".into()));
    assert_eq!(console.document().text(), "two\nfg\n$ ");
}

#[test]
fn posted_foreground_error_stays_out_of_the_next_command() {
    let evaluated = Rc::new(RefCell::new(Vec::<String>::new()));
    let (tx, rx) = output_channel();
    let mut console = Console::new(
        ConsoleSettings::default(),
        {
            let evaluated = evaluated.clone();
            move |command: String| evaluated.borrow_mut().push(command)
        },
        NoopCaretSink,
        rx,
    );

    tx.error_foreground("boom");
    assert_eq!(console.pump(), 1);
    assert_eq!(console.document().text(), "boom\n$ ");
    assert_eq!(console.document().current_command(), "");

    let doc = console.document_mut();
    let end = doc.length();
    doc.user_insert(end, "ls\n");
    assert_eq!(*evaluated.borrow(), vec!["ls".to_string()]);

    assert!(doc.history_previous());
    assert_eq!(doc.current_command(), "ls");
    assert_eq!(evaluated.borrow().len(), 1);
}

#[test]
fn recalling_a_multi_line_entry_does_not_submit() {
    let evaluated = Rc::new(RefCell::new(Vec::<String>::new()));
    let mut doc = ConsoleDocument::new(
        ConsoleSettings::default(),
        {
            let evaluated = evaluated.clone();
            move |command: String| evaluated.borrow_mut().push(command)
        },
        NoopCaretSink,
    );
    // A tail error lands inside the command line and gets submitted with it.
    doc.inject_error_foreground("boom");
    let end = doc.length();
    doc.user_insert(end, "ls\n");
    assert_eq!(*evaluated.borrow(), vec!["boom\nls".to_string()]);

    assert!(doc.history_previous());
    assert_eq!(doc.current_command(), "boomls");
    assert_eq!(evaluated.borrow().len(), 1);
    assert!(doc.text().ends_with("$ boomls"));
}

#[tokio::test]
async fn async_evaluator_task_posts_back() {
    let (tx, rx) = output_channel();
    let mut console = Console::new(ConsoleSettings::default(), |_: String| {}, NoopCaretSink, rx);
    let task = tokio::spawn(async move {
        tx.status("loading...");
    });
    task.await.unwrap();
    let output = console.receiver_mut().recv().await.unwrap();
    console.apply(output);
    assert_eq!(console.document().text(), "loading...\n$ ");
    assert_eq!(console.receiver_mut().recv().await, None);
}
