//! Best-effort size accounting for a candidate set.

use crate::cancel::CancelFlag;
use crate::error::{Error, Result};
use crate::traverse::CandidateFile;

/// Sums candidate sizes, fetching each lazily.
///
/// Files that vanished or became unreadable between discovery and
/// measurement are skipped and keep `size == None`. The returned total
/// is an estimate, not an exact accounting: the tree may change before
/// archiving starts.
pub fn total_size(candidates: &mut [CandidateFile], cancel: &CancelFlag) -> Result<u64> {
    let mut total = 0u64;

    for candidate in candidates.iter_mut() {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        match std::fs::metadata(&candidate.path) {
            Ok(metadata) => {
                candidate.size = Some(metadata.len());
                total += metadata.len();
            }
            Err(err) => {
                tracing::debug!(
                    "size unavailable for {}: {}",
                    candidate.path.display(),
                    err
                );
            }
        }
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn candidates_for(paths: &[std::path::PathBuf]) -> Vec<CandidateFile> {
        paths.iter().map(CandidateFile::new).collect()
    }

    #[test]
    fn test_total_size_sums_all_files() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.bin");
        let b = temp.path().join("b.bin");
        fs::write(&a, vec![0u8; 100]).unwrap();
        fs::write(&b, vec![0u8; 250]).unwrap();

        let mut candidates = candidates_for(&[a, b]);
        let total = total_size(&mut candidates, &CancelFlag::new()).unwrap();

        assert_eq!(total, 350);
        assert_eq!(candidates[0].size, Some(100));
        assert_eq!(candidates[1].size, Some(250));
    }

    #[test]
    fn test_vanished_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        let kept = temp.path().join("kept.bin");
        let gone = temp.path().join("gone.bin");
        fs::write(&kept, vec![0u8; 64]).unwrap();
        fs::write(&gone, vec![0u8; 64]).unwrap();

        let mut candidates = candidates_for(&[kept, gone.clone()]);
        fs::remove_file(&gone).unwrap();

        let total = total_size(&mut candidates, &CancelFlag::new()).unwrap();
        assert_eq!(total, 64);
        assert_eq!(candidates[0].size, Some(64));
        assert_eq!(candidates[1].size, None);
    }

    #[test]
    fn test_removing_a_candidate_never_increases_total() {
        let temp = TempDir::new().unwrap();
        let mut paths = Vec::new();
        for i in 0..5 {
            let path = temp.path().join(format!("{i}.bin"));
            fs::write(&path, vec![0u8; 10 * (i + 1)]).unwrap();
            paths.push(path);
        }

        let mut all = candidates_for(&paths);
        let full = total_size(&mut all, &CancelFlag::new()).unwrap();

        for skip in 0..paths.len() {
            let subset: Vec<_> = paths
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, p)| p.clone())
                .collect();
            let mut candidates = candidates_for(&subset);
            let partial = total_size(&mut candidates, &CancelFlag::new()).unwrap();
            assert!(partial <= full);
        }
    }

    #[test]
    fn test_cancelled_sizing_stops() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.bin");
        fs::write(&path, vec![0u8; 8]).unwrap();

        let cancel = CancelFlag::new();
        cancel.cancel();

        let mut candidates = candidates_for(&[path]);
        assert!(matches!(
            total_size(&mut candidates, &cancel),
            Err(Error::Cancelled)
        ));
    }
}
