use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codec::{DuelSession, ReadMode, SessionConfig, StepReport};
use engine::{CardStore, Gateway, MessageFormat};
use protocol::Answer;
use tools::{decode_capture, format_decode_pretty, parse_capture, run_duel, DuelScript};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "ocg-tools",
    version,
    about = "ocgbridge decoding, card lookup and replay tools"
)]
struct Cli {
    /// Log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode one captured engine message.
    Decode {
        /// Path to the captured bytes.
        capture: PathBuf,
        /// Format the engine produced the capture in.
        #[arg(long, value_enum, default_value_t = CaptureFormat::Legacy)]
        format: CaptureFormat,
        /// The capture is hex text rather than raw bytes.
        #[arg(long)]
        hex: bool,
        /// Reject truncated legacy messages instead of zero-filling.
        #[arg(long)]
        strict: bool,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,
    },
    /// Look up cards in an ocgcore card database.
    Card {
        /// Path to `cards.cdb`.
        #[arg(long)]
        db: PathBuf,
        /// Card codes to look up.
        #[arg(required = true)]
        codes: Vec<u32>,
    },
    /// Replay a recorded duel script, answering every request automatically.
    Replay {
        /// Path to the JSON duel script.
        script: PathBuf,
        /// Stop after this many steps.
        #[arg(long, default_value_t = 1000)]
        max_steps: usize,
        /// Reject truncated legacy messages instead of zero-filling.
        #[arg(long)]
        strict: bool,
    },
    /// Run a duel in the linked ocgcore between two mirror decks.
    #[cfg(feature = "native")]
    Duel {
        /// Path to `cards.cdb`.
        #[arg(long)]
        db: PathBuf,
        /// Directory holding the card and utility scripts.
        #[arg(long)]
        scripts: PathBuf,
        /// Card both decks are built from.
        #[arg(long, default_value_t = 69_140_098)]
        code: u32,
        #[arg(long, default_value_t = 40)]
        deck_size: u32,
        #[arg(long, default_value_t = 12345)]
        seed: u64,
        /// Stop after this many steps.
        #[arg(long, default_value_t = 1000)]
        max_steps: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CaptureFormat {
    Legacy,
    Envelope,
}

impl From<CaptureFormat> for MessageFormat {
    fn from(format: CaptureFormat) -> Self {
        match format {
            CaptureFormat::Legacy => Self::Legacy,
            CaptureFormat::Envelope => Self::Envelope,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Decode {
            capture,
            format,
            hex,
            strict,
            output,
        } => {
            let contents =
                fs::read(&capture).with_context(|| format!("read capture {}", capture.display()))?;
            let bytes = parse_capture(&contents, hex)?;
            let report = decode_capture(&bytes, format.into(), &session_config(strict))?;
            match output {
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
                OutputFormat::Pretty => print!("{}", format_decode_pretty(&report)),
            }
        }
        Command::Card { db, codes } => {
            let store = open_cards(&db)?;
            for code in codes {
                let Some(stats) = store.lookup(code) else {
                    bail!("card {code} not found in {}", db.display());
                };
                let json = serde_json::to_string_pretty(&stats).context("serialize json")?;
                println!("{json}");
            }
        }
        Command::Replay {
            script,
            max_steps,
            strict,
        } => {
            let text = fs::read_to_string(&script)
                .with_context(|| format!("read script {}", script.display()))?;
            let engine = DuelScript::from_json(&text)?.into_engine()?;
            let session = DuelSession::start(Gateway::new(engine), session_config(strict))?;
            drive(&session, max_steps)?;
        }
        #[cfg(feature = "native")]
        Command::Duel {
            db,
            scripts,
            code,
            deck_size,
            seed,
            max_steps,
        } => {
            let store = open_cards(&db)?;
            let options = engine::DuelOptions::default().with_seed([seed, 0, 0, 0]);
            let native = engine::NativeEngine::create(
                &options,
                store,
                Box::new(engine::ScriptDirectory::new(scripts)),
            )?;
            let mut gateway = Gateway::new(native);
            for team in 0..2 {
                for sequence in 0..deck_size {
                    gateway.place_card(&engine::CardPlacement {
                        sequence,
                        ..engine::CardPlacement::deck(team, code)
                    })?;
                }
            }
            let session = DuelSession::start(gateway, SessionConfig::default())?;
            drive(&session, max_steps)?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn session_config(strict: bool) -> SessionConfig {
    let mode = if strict {
        ReadMode::Strict
    } else {
        ReadMode::Permissive
    };
    SessionConfig::default().with_read_mode(mode)
}

fn open_cards(path: &Path) -> Result<CardStore> {
    let store = CardStore::open_sqlite(path)
        .with_context(|| format!("open card database {}", path.display()))?;
    info!(cards = store.len(), "card database loaded");
    Ok(store)
}

fn drive<E: engine::DuelEngine>(session: &DuelSession<E>, max_steps: usize) -> Result<()> {
    let summary = run_duel(session, max_steps, print_step)?;
    let json = serde_json::to_string_pretty(&summary).context("serialize json")?;
    println!("{json}");
    Ok(())
}

fn print_step(report: &StepReport, answer: Option<&Answer>) {
    println!(
        "status: {:?}, notifications: {}{}",
        report.status,
        report.notifications.len(),
        if report.truncated { " (truncated)" } else { "" }
    );
    if report.undecoded > 0 {
        println!("  undecoded: {}", report.undecoded);
    }
    for notification in &report.notifications {
        println!("  {}", notification.kind());
    }
    if let Some(request) = &report.request {
        println!("  request: {} for player {}", request.kind(), request.player());
    }
    if let Some(answer) = answer {
        println!("  answered: {answer}");
    }
}
