//! Stored pattern commands.

use clap::Args;

use super::{explain, get_config, open_gate, output_result, print_status};
use crate::Cli;

/// Print the enrolled voice pattern.
#[derive(Args)]
pub struct ShowCommand {}

impl ShowCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let gate = open_gate(cli, &cfg)?;

        match gate.reference().map_err(explain)? {
            Some(fp) => output_result(&fp, cli),
            None => {
                print_status("No voice pattern enrolled.");
                Ok(())
            }
        }
    }
}

/// Remove the enrolled voice pattern.
#[derive(Args)]
pub struct ResetCommand {}

impl ResetCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let gate = open_gate(cli, &cfg)?;

        gate.reset().map_err(explain)?;
        print_status("Voice pattern removed.");
        Ok(())
    }
}
