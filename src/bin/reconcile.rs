use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use mous::{
    io::{read_log_tsv, read_trigger_events, write_errors_tsv, write_events_tsv, write_trigger_safetensors},
    reconcile_with_config, ReconcileConfig,
};

#[derive(Parser, Debug)]
#[command(name = "mous-reconcile", about = "Merge MOUS trigger events with the presentation log")]
struct Args {
    /// Trigger events: MNE text event file, or safetensors with `events` / `stim`
    #[arg(long)]
    events: PathBuf,

    /// Presentation log (sub-*_task-visual_events.tsv)
    #[arg(long)]
    log: PathBuf,

    /// Output path of the reconciled events table (TSV)
    #[arg(long)]
    out_events: PathBuf,

    /// Output path of the error table (TSV)
    #[arg(long)]
    out_errors: PathBuf,

    /// Max tolerated trigger/log sample difference (default: 2)
    #[arg(long, default_value_t = 2)]
    tolerance: i64,

    /// Also write the decoded trigger stream here (safetensors)
    #[arg(long)]
    save_triggers: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("mous={}", args.log_level))),
        )
        .with_writer(std::io::stderr)
        .init();

    let triggers = read_trigger_events(&args.events)?;
    let log = read_log_tsv(&args.log)?;
    println!("Loaded {} triggers, {} log rows", triggers.len(), log.len());

    if let Some(path) = &args.save_triggers {
        write_trigger_safetensors(&triggers, path)?;
        println!("Triggers → {}", path.display());
    }

    let cfg = ReconcileConfig {
        tolerance: args.tolerance,
        ..ReconcileConfig::default()
    };
    let out = reconcile_with_config(&triggers, &log, &cfg)?;
    println!("{}", out.summary);

    write_events_tsv(&out.events, &args.out_events)?;
    println!("Events → {}", args.out_events.display());
    write_errors_tsv(&out.error_rows(), &args.out_errors)?;
    println!("Errors → {}", args.out_errors.display());

    Ok(())
}
