//! sesame - enroll a spoken passphrase and verify it later.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    CompareCommand, EnrollCommand, ExtractCommand, ResetCommand, ShowCommand, VerifyCommand,
};

/// sesame - voice pattern gate.
///
/// Turns a short utterance into a voice fingerprint and checks later
/// utterances against it:
///   - enroll: store the fingerprint of a recording
///   - verify: compare a recording against the stored fingerprint
///   - extract / compare: inspect fingerprints without touching the store
///   - show / reset: inspect or remove the stored fingerprint
///
/// Recordings are either sample files (JSON or YAML lists of
/// `{timestamp, volume, peakAmplitude}`) or raw PCM16 mono audio.
///
/// Configuration is stored in ~/.sesame/sesame/config.yaml.
#[derive(Parser)]
#[command(name = "sesame")]
#[command(about = "Voice pattern enrollment and verification")]
#[command(version)]
pub struct Cli {
    /// Config file (default is ~/.sesame/sesame/config.yaml)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Fingerprint store path (overrides the config file)
    #[arg(long, global = true)]
    pub store: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Enroll a recording as the reference voice pattern
    Enroll(EnrollCommand),
    /// Verify a recording against the enrolled voice pattern
    Verify(VerifyCommand),
    /// Print the fingerprint of a recording
    Extract(ExtractCommand),
    /// Compare two fingerprint files
    Compare(CompareCommand),
    /// Print the enrolled voice pattern
    Show(ShowCommand),
    /// Remove the enrolled voice pattern
    Reset(ResetCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Enroll(cmd) => cmd.run(&cli),
        Commands::Verify(cmd) => cmd.run(&cli),
        Commands::Extract(cmd) => cmd.run(&cli),
        Commands::Compare(cmd) => cmd.run(&cli),
        Commands::Show(cmd) => cmd.run(&cli),
        Commands::Reset(cmd) => cmd.run(&cli),
    }
}
