//! scriptconsole entrypoint.
use anyhow::{Context, Result};
use clap::Parser;
use console_config::load_from;
use console_events::{OUTPUT_SEND_FAILURES, OUTPUTS_POSTED, output_channel};
use console_state::Console;
use scriptconsole::{demo, transcript};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::Ordering;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, trace};
use tracing_appender::non_blocking::WorkerGuard;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "scriptconsole", version, about = "Scripting console over stdin")]
struct Args {
    /// Optional configuration file path (overrides discovery of `console.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
    /// Print the final transcript with `[style]` tags around each run.
    #[arg(long = "show-styles")]
    show_styles: bool,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join("scriptconsole.log");
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, "scriptconsole.log");
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    match tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; drop guard so the writer shuts down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");

    let args = Args::parse();
    let config_override = args.config.is_some();
    let config = load_from(args.config).context("loading console config")?;
    let settings = config.settings();
    info!(
        target: "runtime.startup",
        config_override,
        marker_len = settings.marker_len(),
        history_max = settings.history_max(),
        "bootstrap_complete"
    );

    let (out_tx, out_rx) = output_channel();
    let (evaluator, pending, worker) = demo::spawn_worker(out_tx);
    let caret_sink = |offset: usize| {
        trace!(target: "runtime.caret", offset, "caret");
    };
    let mut console = Console::new(settings, evaluator, caret_sink, out_rx);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("reading stdin")? {
                    Some(line) => {
                        let doc = console.document_mut();
                        let end = doc.length();
                        doc.user_insert(end, &format!("{line}\n"));
                    }
                    None => break,
                }
            }
            Some(output) = console.receiver_mut().recv() => {
                console.apply(output);
            }
        }
    }

    // Let the worker finish everything that was submitted, then apply what it posted.
    pending.idle().await;
    console.pump();
    let rendered = transcript::render(&console.document().segments(), args.show_styles);
    drop(console);
    worker.await.context("joining evaluator worker")?;

    println!("{rendered}");
    info!(
        target: "runtime",
        outputs_posted = OUTPUTS_POSTED.load(Ordering::Relaxed),
        send_failures = OUTPUT_SEND_FAILURES.load(Ordering::Relaxed),
        "shutdown"
    );
    Ok(())
}
