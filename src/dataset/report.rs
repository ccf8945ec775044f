//! Summary of a curated dataset.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::Batch;

/// What [`inspect_dataset`](super::inspect_dataset) found.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    /// Dataset directory.
    pub root: PathBuf,
    /// Number of samples normalized.
    pub samples: usize,
    /// Canvas shape every sample was normalized to.
    pub canvas: [usize; 3],
    /// Sample counts per label.
    pub labels: BTreeMap<String, usize>,
    /// Mean normalized intensity over all samples, if any.
    ///
    /// Grayscale sources contribute on the 0..=255 scale and RGB sources on
    /// [0, 1], so the mean is only comparable between datasets of one kind.
    pub mean_intensity: Option<f64>,
    #[serde(skip)]
    intensity_sum: f64,
    #[serde(skip)]
    pixel_count: usize,
}

impl InspectReport {
    pub fn new(root: &Path, width: usize, height: usize) -> Self {
        Self {
            root: root.to_path_buf(),
            samples: 0,
            canvas: [1, height, width],
            labels: BTreeMap::new(),
            mean_intensity: None,
            intensity_sum: 0.0,
            pixel_count: 0,
        }
    }

    /// Folds one batch into the summary.
    pub fn record_batch(&mut self, batch: &Batch<f64>) {
        self.samples += batch.len();
        for label in &batch.labels {
            *self.labels.entry(label.clone()).or_insert(0) += 1;
        }

        self.intensity_sum += batch.images.sum();
        self.pixel_count += batch.images.len();
        if self.pixel_count > 0 {
            self.mean_intensity = Some(self.intensity_sum / self.pixel_count as f64);
        }
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset: {}", self.root.display())?;
        writeln!(
            f,
            "  {} sample(s), canvas {}x{}x{}",
            self.samples, self.canvas[0], self.canvas[1], self.canvas[2]
        )?;
        if let Some(mean) = self.mean_intensity {
            writeln!(f, "  mean intensity {:.4}", mean)?;
        }

        if !self.labels.is_empty() {
            writeln!(f)?;
            writeln!(f, "Labels ({}):", self.labels.len())?;
            for (label, count) in &self.labels {
                let shown = if label.is_empty() { "<empty>" } else { label };
                writeln!(f, "  {:<26} {}", shown, count)?;
            }
        }

        Ok(())
    }
}
