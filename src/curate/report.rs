//! Structured results of a curation run.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::decode::ContentHash;
use crate::gate::RejectionCode;

/// A file that passed every rule and was copied into the output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AcceptedImage {
    /// Position in the sorted list of all candidates.
    pub index: usize,
    /// Output file name, e.g. `0000029.jpg`.
    pub name: String,
    /// Label derived from the source file name.
    pub label: String,
    /// Fingerprint recorded for duplicate detection.
    pub hash: ContentHash,
    /// Where the file came from.
    pub source: PathBuf,
}

/// A file that was turned away.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RejectionRecord {
    /// Original file name.
    pub file_name: String,
    /// First rule that failed.
    pub code: RejectionCode,
}

/// Everything a curation run decided.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CurationReport {
    /// Number of candidate files found.
    pub scanned: usize,
    /// Accepted files, in candidate order.
    pub accepted: Vec<AcceptedImage>,
    /// Rejected files, in candidate order.
    pub rejected: Vec<RejectionRecord>,
}

impl CurationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejection counts keyed by numeric code.
    pub fn rejections_by_code(&self) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.rejected {
            *counts.entry(record.code.as_u8()).or_insert(0) += 1;
        }
        counts
    }

    /// Accepted counts keyed by label.
    pub fn accepted_by_label(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for image in &self.accepted {
            *counts.entry(image.label.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// True if every scanned file has exactly one verdict.
    pub fn is_complete(&self) -> bool {
        self.accepted.len() + self.rejected.len() == self.scanned
    }
}

impl fmt::Display for CurationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Curated {} file(s): {} accepted, {} rejected",
            self.scanned,
            self.accepted.len(),
            self.rejected.len()
        )?;

        let by_code = self.rejections_by_code();
        if !by_code.is_empty() {
            writeln!(f)?;
            writeln!(f, "Rejections:")?;
            for code in RejectionCode::ALL {
                if let Some(count) = by_code.get(&code.as_u8()) {
                    writeln!(f, "  [{}] {:<24} {}", code, code.describe(), count)?;
                }
            }
        }

        let by_label = self.accepted_by_label();
        if !by_label.is_empty() {
            writeln!(f)?;
            writeln!(f, "Labels:")?;
            for (label, count) in by_label {
                let shown = if label.is_empty() { "<empty>" } else { label };
                writeln!(f, "  {:<26} {}", shown, count)?;
            }
        }

        Ok(())
    }
}
