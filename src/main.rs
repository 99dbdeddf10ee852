use clap::Parser;
use solar_waste::args::{Args, Command};
use solar_waste::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let config = Config::load(args.common().config()).await?;
    debug!("{config:?}");

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Serve(serve_args) => {
            let config = match serve_args.bind() {
                Some(bind) => config.with_bind(bind),
                None => config,
            };
            commands::serve(config, commands::ctrl_c()).await?.print()
        }

        Command::ServeCombo(serve_args) => {
            let config = match serve_args.bind() {
                Some(bind) => config.with_bind(bind),
                None => config,
            };
            commands::serve_combo(config, commands::ctrl_c())
                .await?
                .print()
        }

        Command::Export(export_args) => {
            let config = match export_args.output() {
                Some(output) => config.with_export_path(output),
                None => config,
            };
            commands::export(config).await?.print()
        }
    };

    Ok(())
}

pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only. The binary and
            // the library share the crate name solar_waste.
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
