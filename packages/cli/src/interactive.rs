//! Interactive menu shown when no subcommand is given.

use std::path::PathBuf;

use dialoguer::{Input, Select};
use sota_map_cli_utils::MultiProgress;
use sota_map_config::Settings;

use crate::{BoxError, commands};

/// Top-level tool selection.
enum Tool {
    Spots,
    Dashboard,
    Chases,
}

impl Tool {
    const ALL: &[Self] = &[Self::Spots, Self::Dashboard, Self::Chases];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Spots => "Map current activations",
            Self::Dashboard => "Start spots dashboard",
            Self::Chases => "Map chases from an ADIF log",
        }
    }
}

/// Asks which map to make, prompts for its inputs, and runs it.
///
/// # Errors
///
/// Returns an error if a prompt fails or the chosen run fails.
pub async fn run(multi: &MultiProgress, mut settings: Settings) -> Result<(), BoxError> {
    println!("SOTA Map");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Spots => {
            settings.spots.lookback = prompt_lookback(settings.spots.lookback)?;
            commands::run_spots(multi, &settings).await
        }
        Tool::Dashboard => {
            settings.spots.lookback = prompt_lookback(settings.spots.lookback)?;
            commands::run_dashboard(multi, &settings, true).await
        }
        Tool::Chases => {
            let log: String = Input::new()
                .with_prompt("ADIF log file")
                .default("SOTAlog.adi".to_string())
                .interact_text()?;
            commands::run_chases(multi, &settings, &PathBuf::from(log)).await
        }
    }
}

fn prompt_lookback(default: i32) -> Result<i32, dialoguer::Error> {
    Input::new()
        .with_prompt("Lookback (negative = hours, positive = number of spots)")
        .default(default)
        .interact_text()
}
