//! Fingerprint comparison command.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use sesame_voicegate::{Fingerprint, Matcher};

use super::{explain, get_config, output_result};
use crate::Cli;

/// Compare two fingerprint files (as written by `extract` or `enroll`).
#[derive(Args)]
pub struct CompareCommand {
    /// Candidate fingerprint (JSON)
    #[arg(long)]
    candidate: PathBuf,

    /// Reference fingerprint (JSON)
    #[arg(long)]
    reference: PathBuf,
}

impl CompareCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let candidate = read_fingerprint(&self.candidate)?;
        let reference = read_fingerprint(&self.reference)?;

        let verdict = Matcher::with_config(cfg.matcher_config()).compare(&candidate, &reference);
        output_result(&verdict, cli)
    }
}

fn read_fingerprint(path: &Path) -> anyhow::Result<Fingerprint> {
    let data = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let fp = Fingerprint::from_json(&data).with_context(|| format!("parse {}", path.display()))?;
    fp.validate().map_err(explain)?;
    Ok(fp)
}
