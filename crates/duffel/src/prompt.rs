//! Interactive selection backed by dialoguer.

use dialoguer::{Confirm, Select};

use duffel_core::{CompressionMode, DestinationVolume, Error, Selector};

/// Selector that prompts on the terminal, honoring CLI presets.
///
/// Presets come from `--destination`, `--mode` and `--yes`; whatever
/// is preset skips its menu.
pub struct CliSelector {
    volume: Option<usize>,
    mode: Option<usize>,
    assume_yes: bool,
}

impl CliSelector {
    pub fn new(volume: Option<usize>, mode: Option<usize>, assume_yes: bool) -> Self {
        Self {
            volume,
            mode,
            assume_yes,
        }
    }
}

impl Selector for CliSelector {
    fn choose_volume(&self, volumes: &[DestinationVolume]) -> duffel_core::Result<usize> {
        if let Some(index) = self.volume {
            return Ok(index);
        }
        let items: Vec<String> = volumes.iter().map(DestinationVolume::describe).collect();
        select("Select destination volume", &items)
    }

    fn choose_mode(&self, modes: &[CompressionMode]) -> duffel_core::Result<usize> {
        if let Some(index) = self.mode {
            return Ok(index);
        }
        let items: Vec<String> = modes.iter().map(|m| m.description().to_string()).collect();
        select("Select compression mode", &items)
    }

    fn confirm(&self, prompt: &str) -> duffel_core::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(into_core_error)
    }
}

fn select(prompt: &str, items: &[String]) -> duffel_core::Result<usize> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .map_err(into_core_error)?
        .ok_or(Error::Cancelled)
}

fn into_core_error(err: dialoguer::Error) -> Error {
    Error::Io(std::io::Error::other(err))
}
