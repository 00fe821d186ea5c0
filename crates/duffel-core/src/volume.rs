//! Destination volumes and the advisory capacity check.

use serde::Serialize;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::report::human_bytes;

/// An external storage target with capacity snapshotted at discovery
/// time.
///
/// The snapshot may be stale by the time writing starts; the capacity
/// check is advisory and actual write failures are still handled
/// during archiving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationVolume {
    /// Mount point of the volume
    pub mount: PathBuf,

    /// Free bytes at discovery time
    pub free_bytes: u64,

    /// Total bytes at discovery time
    pub total_bytes: u64,
}

impl DestinationVolume {
    /// Creates a volume snapshot.
    pub fn new(mount: impl Into<PathBuf>, free_bytes: u64, total_bytes: u64) -> Self {
        Self {
            mount: mount.into(),
            free_bytes,
            total_bytes,
        }
    }

    /// One-line description used in selection menus.
    pub fn describe(&self) -> String {
        format!(
            "{} (free: {} of {})",
            self.mount.display(),
            human_bytes(self.free_bytes),
            human_bytes(self.total_bytes)
        )
    }
}

/// Validates that the chosen volume can hold `required_bytes`.
///
/// The comparison uses the discovery-time snapshot; the volume is not
/// re-queried, since the user may take time to decide.
pub fn ensure_fits(volume: &DestinationVolume, required_bytes: u64) -> Result<()> {
    if required_bytes > volume.free_bytes {
        return Err(Error::insufficient_capacity(
            volume.mount.clone(),
            required_bytes,
            volume.free_bytes,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_rejects_one_byte_short() {
        let volume = DestinationVolume::new("/media/usb", 9_999_999, 32_000_000_000);
        let err = ensure_fits(&volume, 10_000_000).unwrap_err();

        match err {
            Error::InsufficientCapacity {
                mount,
                required,
                available,
            } => {
                assert_eq!(mount, PathBuf::from("/media/usb"));
                assert_eq!(required, 10_000_000);
                assert_eq!(available, 9_999_999);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_capacity_accepts_exact_fit() {
        let volume = DestinationVolume::new("/media/usb", 10_000_000, 32_000_000_000);
        assert!(ensure_fits(&volume, 10_000_000).is_ok());
    }

    #[test]
    fn test_describe_mentions_mount_and_sizes() {
        let volume = DestinationVolume::new("/media/usb", 1_048_576, 2_097_152);
        let text = volume.describe();
        assert!(text.contains("/media/usb"));
        assert!(text.contains("1.00 MB"));
        assert!(text.contains("2.00 MB"));
    }

    #[test]
    fn test_error_message_carries_the_numbers() {
        let volume = DestinationVolume::new("/media/usb", 5, 10);
        let err = ensure_fits(&volume, 9).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("9 bytes required"));
        assert!(message.contains("5 bytes available"));
        assert!(message.contains("/media/usb"));
    }
}
