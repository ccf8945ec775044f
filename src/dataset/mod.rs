//! Loading a curated directory as training samples.
//!
//! A curated directory holds the `*.jpg` files written by a curation run
//! plus its `;`-separated label table. [`ImagesDataset`] lists the images in
//! sorted order and produces one normalized [`Sample`] per index;
//! [`collate`] stacks samples into a [`Batch`], and [`BatchLoader`] walks a
//! dataset batch by batch, optionally in a seeded shuffled order.

mod report;

pub use report::InspectReport;

use std::collections::HashMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array3, Array4, ArrayView3, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Deserialize;

use crate::decode::{ImageCrateDecoder, ImageDecoder};
use crate::error::CurateError;
use crate::normalize::{prepare_image, to_grayscale, Pixel, Subarea, MIN_CANVAS_SIDE};

/// Smallest canvas width or height a dataset may be opened with.
pub const MIN_DATASET_SIDE: usize = 100;

/// Canvas size every sample is normalized to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DatasetOptions {
    pub width: usize,
    pub height: usize,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            width: MIN_DATASET_SIDE,
            height: MIN_DATASET_SIDE,
        }
    }
}

/// One normalized sample.
#[derive(Clone, Debug)]
pub struct Sample<T> {
    /// `(1, height, width)` grayscale canvas.
    pub image: Array3<T>,
    /// Index the sample was requested with.
    pub index: usize,
    /// Label from the label table.
    pub label: String,
    /// Absolute path of the image file.
    pub path: PathBuf,
}

/// Several samples stacked together.
#[derive(Clone, Debug)]
pub struct Batch<T> {
    /// `(N, 1, height, width)`.
    pub images: Array4<T>,
    /// `(N,)` sample indices.
    pub indices: Array1<usize>,
    /// Labels in sample order.
    pub labels: Vec<String>,
    /// Paths in sample order.
    pub paths: Vec<PathBuf>,
}

impl<T> Batch<T> {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Deserialize)]
struct LabelRow {
    name: String,
    label: String,
}

/// A curated directory opened for sample access.
pub struct ImagesDataset {
    root: PathBuf,
    image_paths: Vec<PathBuf>,
    labels: HashMap<String, String>,
    options: DatasetOptions,
    decoder: Box<dyn ImageDecoder>,
}

impl std::fmt::Debug for ImagesDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagesDataset")
            .field("root", &self.root)
            .field("len", &self.image_paths.len())
            .field("options", &self.options)
            .finish()
    }
}

impl ImagesDataset {
    /// Opens `root` with the default decoder.
    pub fn open(root: &Path, options: DatasetOptions) -> Result<Self, CurateError> {
        Self::open_with_decoder(root, options, Box::new(ImageCrateDecoder))
    }

    /// Opens `root`, decoding samples with `decoder`.
    ///
    /// # Errors
    /// - [`CurateError::InvalidValue`] if width or height is below
    ///   [`MIN_DATASET_SIDE`].
    /// - [`CurateError::DirectoryNotFound`] if `root` is not a directory.
    /// - [`CurateError::InvalidDataset`] if no label table is present.
    /// - [`CurateError::LabelsParse`] if the label table is malformed.
    pub fn open_with_decoder(
        root: &Path,
        options: DatasetOptions,
        decoder: Box<dyn ImageDecoder>,
    ) -> Result<Self, CurateError> {
        if options.width < MIN_DATASET_SIDE || options.height < MIN_DATASET_SIDE {
            return Err(CurateError::invalid_value(format!(
                "dataset width and height must be >= {}, got {}x{}",
                MIN_DATASET_SIDE, options.width, options.height
            )));
        }
        if !root.is_dir() {
            return Err(CurateError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        let root = std::path::absolute(root)?;
        let image_paths = list_files_with_extension(&root, "jpg")?;
        let tables = list_files_with_extension(&root, "csv")?;
        if tables.len() > 1 {
            tracing::warn!(
                count = tables.len(),
                using = %tables[0].display(),
                "several label tables found, using the first"
            );
        }
        let label_table = tables
            .into_iter()
            .next()
            .ok_or_else(|| CurateError::InvalidDataset {
                path: root.clone(),
                message: "no label table (*.csv) found".to_string(),
            })?;
        let labels = read_label_table(&label_table)?;

        tracing::debug!(
            root = %root.display(),
            images = image_paths.len(),
            labels = labels.len(),
            "opened dataset"
        );

        Ok(Self {
            root,
            image_paths,
            labels,
            options,
            decoder,
        })
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.image_paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image_paths.is_empty()
    }

    /// Directory the dataset was opened from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canvas size samples are normalized to.
    pub fn options(&self) -> DatasetOptions {
        self.options
    }

    /// Image paths in sample order.
    pub fn image_paths(&self) -> &[PathBuf] {
        &self.image_paths
    }

    /// Decodes and normalizes sample `index` into element type `T`.
    ///
    /// RGB sources come out in [0, 1]. Grayscale sources pass through the
    /// grayscale step unscaled and keep their 0..=255 values, so a dataset
    /// mixing both holds two intensity scales.
    ///
    /// # Errors
    /// [`CurateError::InvalidValue`] for an out-of-range index,
    /// [`CurateError::InvalidDataset`] if the image has no label row, and any
    /// decode or shape error from the normalization chain.
    pub fn get<T: Pixel>(&self, index: usize) -> Result<Sample<T>, CurateError> {
        let path = self.image_paths.get(index).ok_or_else(|| {
            CurateError::invalid_value(format!(
                "sample index {} out of range for {} sample(s)",
                index,
                self.image_paths.len()
            ))
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let label = self
            .labels
            .get(&file_name)
            .cloned()
            .ok_or_else(|| CurateError::InvalidDataset {
                path: self.root.clone(),
                message: format!("no label row for {}", file_name),
            })?;

        let decoded = self.decoder.decode(path)?;
        let pixels = decoded.pixels.mapv(T::from_u8);
        let gray = to_grayscale(pixels.view())?;
        let (image, _) = prepare_image(
            gray.view().into_dyn(),
            self.options.width,
            self.options.height,
            Subarea::new(0, 0, MIN_CANVAS_SIDE),
        )?;

        Ok(Sample {
            image,
            index,
            label,
            path: path.clone(),
        })
    }
}

/// Stacks samples into one batch, keeping their order.
///
/// # Errors
/// [`CurateError::InvalidValue`] for an empty batch and
/// [`CurateError::Shape`] if the sample canvases differ in shape.
pub fn collate<T: Clone>(samples: Vec<Sample<T>>) -> Result<Batch<T>, CurateError> {
    if samples.is_empty() {
        return Err(CurateError::invalid_value("cannot collate an empty batch"));
    }

    let views: Vec<ArrayView3<'_, T>> = samples.iter().map(|s| s.image.view()).collect();
    let images = ndarray::stack(Axis(0), &views)
        .map_err(|e| CurateError::shape(format!("cannot stack samples: {}", e)))?;
    let indices = samples.iter().map(|s| s.index).collect::<Array1<usize>>();

    let mut labels = Vec::with_capacity(samples.len());
    let mut paths = Vec::with_capacity(samples.len());
    for sample in samples {
        labels.push(sample.label);
        paths.push(sample.path);
    }

    Ok(Batch {
        images,
        indices,
        labels,
        paths,
    })
}

/// Iterates a dataset in batches.
pub struct BatchLoader<'a, T> {
    dataset: &'a ImagesDataset,
    order: Vec<usize>,
    batch_size: usize,
    cursor: usize,
    _element: PhantomData<T>,
}

impl<'a, T: Pixel> BatchLoader<'a, T> {
    /// Creates a loader over `dataset`.
    ///
    /// With a `seed` the sample order is a reproducible shuffle; without one
    /// samples come in index order. The last batch may be short.
    pub fn new(
        dataset: &'a ImagesDataset,
        batch_size: usize,
        seed: Option<u64>,
    ) -> Result<Self, CurateError> {
        if batch_size == 0 {
            return Err(CurateError::invalid_value("batch size must be > 0"));
        }

        let mut order: Vec<usize> = (0..dataset.len()).collect();
        if let Some(seed) = seed {
            let mut rng = StdRng::seed_from_u64(seed);
            order.shuffle(&mut rng);
        }

        Ok(Self {
            dataset,
            order,
            batch_size,
            cursor: 0,
            _element: PhantomData,
        })
    }

    /// Sample indices in the order they will be yielded.
    pub fn order(&self) -> &[usize] {
        &self.order
    }
}

impl<T: Pixel> Iterator for BatchLoader<'_, T> {
    type Item = Result<Batch<T>, CurateError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.order.len() {
            return None;
        }

        let end = (self.cursor + self.batch_size).min(self.order.len());
        let chunk = &self.order[self.cursor..end];
        self.cursor = end;

        let samples: Result<Vec<Sample<T>>, CurateError> =
            chunk.iter().map(|&i| self.dataset.get(i)).collect();
        Some(samples.and_then(collate))
    }
}

/// Normalizes every sample and summarizes the dataset.
pub fn inspect_dataset(
    dataset: &ImagesDataset,
    batch_size: usize,
) -> Result<InspectReport, CurateError> {
    let options = dataset.options();
    let mut report = InspectReport::new(dataset.root(), options.width, options.height);

    for batch in BatchLoader::<f64>::new(dataset, batch_size, None)? {
        let batch = batch?;
        report.record_batch(&batch);
    }

    Ok(report)
}

fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, CurateError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
    Ok(files)
}

fn read_label_table(path: &Path) -> Result<HashMap<String, String>, CurateError> {
    let file = fs::File::open(path)?;
    parse_label_rows(file, path)
}

fn parse_label_rows<R: std::io::Read>(
    input: R,
    path: &Path,
) -> Result<HashMap<String, String>, CurateError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .quoting(false)
        .from_reader(input);

    let mut labels = HashMap::new();
    for row in reader.deserialize() {
        let row: LabelRow = row.map_err(|source| CurateError::LabelsParse {
            path: path.to_path_buf(),
            source,
        })?;
        labels.insert(row.name, row.label);
    }
    Ok(labels)
}

/// Fuzz-only entrypoint for label table parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_table(bytes: &[u8]) -> Result<usize, CurateError> {
    parse_label_rows(bytes, Path::new("<fuzz>")).map(|labels| labels.len())
}
