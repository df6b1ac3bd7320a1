use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use clap::Parser;

use millcode::{animate, estimate};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input G-code file
    input: PathBuf,

    /// Dump the replayed motion-event stream as JSON instead of estimating
    /// machining time
    #[arg(short, long)]
    trace: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let content = fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read input file: {:?}", cli.input))?;

    if cli.trace {
        let events = animate::trace_program(&content);
        let stdout = std::io::stdout().lock();
        serde_json::to_writer_pretty(stdout, &events)?;
        println!();
    } else {
        println!("Estimated machining time: {}", estimate::estimate_formatted(&content));
    }

    Ok(())
}
