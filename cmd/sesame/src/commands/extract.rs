//! Extraction command.

use clap::Args;
use sesame_voicegate::Extractor;

use super::{explain, get_config, output_result, InputArgs};
use crate::Cli;

/// Print the fingerprint of a recording without touching the store.
#[derive(Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    input: InputArgs,
}

impl ExtractCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let samples = self.input.load_samples(cfg.capture_config())?;
        let fp = Extractor::with_config(cfg.extractor_config())
            .extract(&samples)
            .map_err(explain)?;
        output_result(&fp, cli)
    }
}
