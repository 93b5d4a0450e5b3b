//! Fingerspell - Main Entry Point
//!
//! Replays a recorded landmark stream (JSON Lines, one observation per
//! line) through the recognizer and prints the labels and transcript.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fingerspell::{AppendOutcome, Observation, Recognizer, RecognizerConfig};

#[derive(Parser, Debug)]
#[command(name = "fingerspell", about = "Fingerspelling recognition from hand landmarks")]
struct Cli {
    /// Recording to replay (JSON Lines); reads stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Config file (default: platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the transcript cool-down (ms)
    #[arg(long)]
    cooldown_ms: Option<u64>,

    /// Only use rules marked stable
    #[arg(long)]
    skip_flagged: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RecognizerConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RecognizerConfig::load(),
    };
    if let Some(cooldown_ms) = cli.cooldown_ms {
        config.cooldown_ms = cooldown_ms;
    }
    if cli.skip_flagged {
        config.skip_flagged_rules = true;
    }
    log::info!("Config: {:?}", config);

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) if path.as_os_str() != "-" => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        _ => Box::new(BufReader::new(io::stdin())),
    };

    let mut recognizer = Recognizer::new(&config);
    let mut count = 0u64;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let observation: Observation = match serde_json::from_str(&line) {
            Ok(obs) => obs,
            Err(e) => {
                log::warn!("Skipping line {}: {}", line_number + 1, e);
                continue;
            }
        };

        let result = recognizer.process(&observation);
        count += 1;

        if result.outcome == AppendOutcome::Appended {
            println!(
                "{:>8}ms  {:<16}  {}",
                observation.timestamp_ms,
                result.label.to_string(),
                recognizer.text()
            );
        } else {
            println!("{:>8}ms  {}", observation.timestamp_ms, result.label);
        }
    }

    log::info!("Processed {} observations", count);
    println!("{}", recognizer.text());

    Ok(())
}
