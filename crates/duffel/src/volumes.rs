//! Destination volume discovery.
//!
//! Enumerates externally mounted volumes the way each OS exposes them
//! and snapshots free/total capacity at discovery time. The snapshots
//! are advisory; the pipeline treats staleness as an accepted race.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use duffel_core::DestinationVolume;

/// Snapshots one mount point's capacity.
pub fn snapshot(mount: &Path) -> Result<DestinationVolume> {
    let free = fs2::available_space(mount)
        .with_context(|| format!("cannot query free space on {}", mount.display()))?;
    let total = fs2::total_space(mount)
        .with_context(|| format!("cannot query total space on {}", mount.display()))?;

    Ok(DestinationVolume::new(mount, free, total))
}

/// Enumerates candidate destination volumes for this machine.
pub fn enumerate() -> Result<Vec<DestinationVolume>> {
    let mut volumes = Vec::new();
    for mount in mount_points()? {
        match snapshot(&mount) {
            Ok(volume) => volumes.push(volume),
            Err(err) => {
                tracing::debug!("skipping volume {}: {}", mount.display(), err);
            }
        }
    }
    Ok(volumes)
}

/// Mount roots where external volumes appear on Linux.
#[cfg(target_os = "linux")]
const MOUNT_ROOTS: &[&str] = &["/media/", "/run/media/", "/mnt/"];

#[cfg(target_os = "linux")]
fn mount_points() -> Result<Vec<PathBuf>> {
    let mounts =
        std::fs::read_to_string("/proc/mounts").context("cannot read /proc/mounts")?;

    let mut points = Vec::new();
    for line in mounts.lines() {
        let Some(raw) = line.split_whitespace().nth(1) else {
            continue;
        };
        if MOUNT_ROOTS.iter().any(|root| raw.starts_with(root)) {
            let point = unescape_mount_path(raw);
            if !points.contains(&point) {
                points.push(point);
            }
        }
    }
    Ok(points)
}

#[cfg(target_os = "macos")]
fn mount_points() -> Result<Vec<PathBuf>> {
    let mut points = Vec::new();
    let entries = std::fs::read_dir("/Volumes").context("cannot read /Volumes")?;
    for entry in entries.flatten() {
        // The boot volume appears as a symlink back to /
        let is_symlink = entry
            .file_type()
            .map(|t| t.is_symlink())
            .unwrap_or(true);
        if !is_symlink {
            points.push(entry.path());
        }
    }
    Ok(points)
}

#[cfg(target_os = "windows")]
fn mount_points() -> Result<Vec<PathBuf>> {
    // Drive letters other than the system drive; removable detection
    // is left to the user picking from the menu
    let mut points = Vec::new();
    for letter in b'D'..=b'Z' {
        let root = PathBuf::from(format!("{}:\\", letter as char));
        if root.exists() {
            points.push(root);
        }
    }
    Ok(points)
}

#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
fn mount_points() -> Result<Vec<PathBuf>> {
    Ok(Vec::new())
}

/// Undoes the octal escaping /proc/mounts applies to whitespace and
/// backslashes in mount paths.
#[cfg(target_os = "linux")]
fn unescape_mount_path(raw: &str) -> PathBuf {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let digits: String = chars.clone().take(3).collect();
        if digits.len() == 3 {
            if let Ok(code) = u8::from_str_radix(&digits, 8) {
                out.push(code as char);
                chars.nth(2);
                continue;
            }
        }
        out.push(c);
    }

    PathBuf::from(out)
}
