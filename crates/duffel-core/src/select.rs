//! Selection capability the orchestrator depends on.
//!
//! Interactive callers present menus; tests and automation answer
//! programmatically. Declining the confirmation cancels the run.

use crate::archive::CompressionMode;
use crate::error::{Error, Result};
use crate::volume::DestinationVolume;

/// Supplies the run's interactive decisions.
pub trait Selector {
    /// Picks the destination volume, returning an index into `volumes`.
    fn choose_volume(&self, volumes: &[DestinationVolume]) -> Result<usize>;

    /// Picks the compression mode, returning an index into `modes`.
    fn choose_mode(&self, modes: &[CompressionMode]) -> Result<usize>;

    /// Final go/no-go before archiving begins.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Selector with predetermined answers, for non-interactive runs and
/// tests.
#[derive(Debug, Clone)]
pub struct PresetSelector {
    volume: usize,
    mode: usize,
    accept: bool,
}

impl PresetSelector {
    /// Creates a selector that always answers with the given indices.
    pub fn new(volume: usize, mode: usize, accept: bool) -> Self {
        Self {
            volume,
            mode,
            accept,
        }
    }
}

impl Selector for PresetSelector {
    fn choose_volume(&self, volumes: &[DestinationVolume]) -> Result<usize> {
        if self.volume >= volumes.len() {
            return Err(Error::invalid_selection(self.volume, volumes.len()));
        }
        Ok(self.volume)
    }

    fn choose_mode(&self, modes: &[CompressionMode]) -> Result<usize> {
        if self.mode >= modes.len() {
            return Err(Error::invalid_selection(self.mode, modes.len()));
        }
        Ok(self.mode)
    }

    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(self.accept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_selector_answers() {
        let selector = PresetSelector::new(1, 0, true);
        let volumes = vec![
            DestinationVolume::new("/media/a", 10, 20),
            DestinationVolume::new("/media/b", 30, 40),
        ];

        assert_eq!(selector.choose_volume(&volumes).unwrap(), 1);
        assert_eq!(selector.choose_mode(&CompressionMode::all()).unwrap(), 0);
        assert!(selector.confirm("go?").unwrap());
    }

    #[test]
    fn test_preset_selector_rejects_out_of_range() {
        let selector = PresetSelector::new(5, 0, true);
        let volumes = vec![DestinationVolume::new("/media/a", 10, 20)];

        assert!(matches!(
            selector.choose_volume(&volumes),
            Err(Error::InvalidSelection { index: 5, count: 1 })
        ));
    }
}
