//! `handler-cli`: insert an event-handler stub into a TSX file from the command line.
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `warn`), e.g.
//! `RUST_LOG=handler_core=debug handler-cli src/App.tsx 120 onClick --decl types.d.ts`.

mod args;
mod config;
mod error;
mod host;

use args::CliArgs;
use clap::Parser;
use error::CliError;
use handler_core::{CursorTrigger, SessionConfig, SessionOutcome, TextSpan, run_insertion_session};
use handler_core_treesitter::TsxSyntax;
use host::FsHost;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version also arrive here, on stdout.
            let failed = err.use_stderr();
            let _ = err.print();
            return if failed {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match execute(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn execute(args: CliArgs) -> Result<ExitCode, CliError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(CliError::Runtime)?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<ExitCode, CliError> {
    let config = match &args.config {
        Some(path) => config::load_config(path).await?,
        None => SessionConfig::default(),
    };

    let host = FsHost::load(&args.file, &args.declarations).await?;
    let buffer = host.main_buffer().clone();
    let span = TextSpan::new(args.offset, args.offset + args.trigger_len);
    let trigger = CursorTrigger::new(
        buffer.clone(),
        span,
        args.event_name.clone(),
        args.insertion_mode(),
    );

    match run_insertion_session(&host, &TsxSyntax::new(), trigger, &config).await {
        SessionOutcome::Inserted(report) => {
            info!(
                handler = %report.handler_name,
                kind = ?report.kind,
                "handler inserted"
            );
            if args.write {
                host.write_back().await?;
            } else if let Some(text) = host.text(&buffer) {
                print!("{text}");
            }
            Ok(ExitCode::SUCCESS)
        }
        SessionOutcome::Aborted(reason) => {
            eprintln!("no handler inserted: {reason}");
            Ok(ExitCode::from(2))
        }
    }
}
