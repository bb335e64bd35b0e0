//! Verification command.

use clap::Args;

use super::{explain, get_config, open_gate, output_result, print_status, InputArgs};
use crate::Cli;

/// Verify a recording against the enrolled voice pattern.
///
/// Prints the candidate, the reference and the per-criterion verdict.
/// Exits with an error when the recording is rejected.
#[derive(Args)]
pub struct VerifyCommand {
    #[command(flatten)]
    input: InputArgs,
}

impl VerifyCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let samples = self.input.load_samples(cfg.capture_config())?;
        let gate = open_gate(cli, &cfg)?;

        let result = gate.verify(&samples).map_err(explain)?;
        output_result(&result, cli)?;

        if !result.accepted() {
            let failed: Vec<String> = result
                .verdict
                .failed_criteria()
                .iter()
                .map(|c| c.to_string())
                .collect();
            anyhow::bail!(
                "voice pattern {}: {} did not match",
                result.verdict,
                failed.join(", ")
            );
        }
        print_status(&format!("Voice pattern {}. Open sesame!", result.verdict));
        Ok(())
    }
}
