//! Enrollment command.

use clap::Args;

use super::{explain, get_config, open_gate, output_result, print_status, InputArgs};
use crate::Cli;

/// Enroll a recording as the reference voice pattern.
///
/// Replaces any previously enrolled pattern. A recording that is too short
/// or too quiet leaves the stored pattern untouched.
#[derive(Args)]
pub struct EnrollCommand {
    #[command(flatten)]
    input: InputArgs,
}

impl EnrollCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let samples = self.input.load_samples(cfg.capture_config())?;
        let gate = open_gate(cli, &cfg)?;

        let fp = gate.enroll(&samples).map_err(explain)?;
        print_status("Voice pattern enrolled.");
        output_result(&fp, cli)
    }
}
