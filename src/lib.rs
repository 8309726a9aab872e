pub mod accumulate;
pub mod analyze;
pub mod classify;
pub mod cli;
pub mod io_utils;
pub mod profile;
pub mod report;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    analyze::AnalyzeOptions,
    cli::{Cli, Commands, ProfileArgs},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_profile", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Profile(args) => handle_profile(&args, false),
        Commands::Conflicts(args) => handle_profile(&args, true),
    }
}

fn handle_profile(args: &ProfileArgs, conflicts_only: bool) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    if let Some(delimiter) = args.delimiter {
        info!(
            "Profiling {} input file(s) with delimiter '{}'",
            args.inputs.len(),
            printable_delimiter(delimiter)
        );
    } else {
        info!("Profiling {} input file(s)", args.inputs.len());
    }
    let options = AnalyzeOptions {
        delimiter: args.delimiter,
        encoding,
        limit: args.limit,
    };
    let result = analyze::analyze(&args.inputs, &options)?;
    if conflicts_only {
        let conflicts = result.conflicting_types();
        info!("Found {} conflicting field(s)", conflicts.len());
        report::emit(&conflicts, args.format)
    } else {
        report::emit(result.stats(), args.format)
    }
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        b'\n' => "\\n".to_string(),
        other => (other as char).to_string(),
    }
}
