use std::fmt::Write;

use rawline::{EditResult, EditorBuilder};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn setup_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    setup_logging();

    let mut editor = EditorBuilder::new().build();
    let prompt = "> ";

    match editor.columns() {
        Ok(columns) => tracing::info!(columns, "terminal width"),
        Err(err) => tracing::info!(%err, "terminal width unknown"),
    }

    loop {
        match editor.readline(prompt) {
            Ok(EditResult::Line(line)) => {
                if write!(editor.io(), "Read: '{}'\r\n", line).is_err() {
                    break;
                }
            }
            Ok(EditResult::Interrupted) => continue,
            Ok(EditResult::EndOfInput) => break,
            Err(err) => {
                eprintln!("rawline-demo: {err}");
                std::process::exit(1);
            }
        }
    }
}
