//! Option CLI commands

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::storage::{OptionName, OptionsError, Site};

#[derive(Subcommand)]
pub enum OptionsCommands {
    /// Show every option with its effective value
    Show,

    /// Print one option's value
    Get {
        /// Option name
        name: String,
    },

    /// Store an option value
    ///
    /// Examples:
    ///   loopsmith options set default_template zebra_list
    ///   loopsmith options set exclude_repeats 0
    Set {
        /// Option name
        name: String,

        /// New value (flags accept 1/0, true/false, yes/no, on/off)
        value: String,
    },
}

pub fn run(cmd: OptionsCommands, output: &Output) -> Result<()> {
    match cmd {
        OptionsCommands::Show => show(output),
        OptionsCommands::Get { name } => get(output, &name),
        OptionsCommands::Set { name, value } => set(output, &name, &value),
    }
}

fn show(output: &Output) -> Result<()> {
    let site = Site::open_current()?;
    let options = site.options();

    if output.is_json() {
        return output.data(&options);
    }

    for (name, value) in options.entries() {
        output.row(&[name.as_str(), value.to_string().as_str()]);
    }
    Ok(())
}

fn get(output: &Output, name: &str) -> Result<()> {
    let site = Site::open_current()?;
    let value = site
        .options()
        .get(name)
        .ok_or_else(|| OptionsError::Unknown(name.to_string()))?;

    if output.is_json() {
        output.data(&serde_json::json!({ "name": name, "value": value }))
    } else {
        output.row(&[value.to_string().as_str()]);
        Ok(())
    }
}

fn set(output: &Output, name: &str, value: &str) -> Result<()> {
    let name: OptionName = name.parse()?;
    let mut site = Site::open_current()?;
    site.set_option(name, value)?;

    let stored = site.options().value(name);
    output.success(&format!("Set {} = {}", name, stored));
    Ok(())
}
