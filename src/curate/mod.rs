//! End-to-end curation of a raw image folder.
//!
//! A run scans the input directory, pushes every candidate through the
//! [`ValidationGate`](crate::gate::ValidationGate) in sorted path order and
//! records exactly one verdict per file:
//!
//! - rejected files get a `<file name>,<code>` line in the rejection log;
//! - accepted files are byte-copied to `<output_dir>/<index>.jpg` and get a
//!   `<name>;<label>` row in `<output_dir>/labels.csv`.
//!
//! The index in an output name is the file's position among *all* sorted
//! candidates, so rejected files leave gaps in the numbering.

mod report;

pub use report::{AcceptedImage, CurationReport, RejectionRecord};

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use csv::{QuoteStyle, WriterBuilder};
use regex::Regex;

use crate::decode::{ImageCrateDecoder, ImageDecoder};
use crate::error::CurateError;
use crate::gate::{CandidateFile, DedupIndex, GateOptions, ValidationGate, Verdict};
use crate::scan::scan_files;

/// Default zero-padded width of output names.
pub const DEFAULT_NAME_WIDTH: usize = 7;

/// Default label table file name inside the output directory.
pub const DEFAULT_LABELS_FILE: &str = "labels.csv";

/// Header row of the label table.
pub const LABELS_HEADER: [&str; 2] = ["name", "label"];

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

/// Options for a curation run.
#[derive(Clone, Debug)]
pub struct CurateOptions {
    /// Rule parameters.
    pub gate: GateOptions,
    /// Zero-padded width of the numeric part of output names.
    pub name_width: usize,
    /// Label table file name inside the output directory.
    pub labels_file_name: String,
}

impl Default for CurateOptions {
    fn default() -> Self {
        Self {
            gate: GateOptions::default(),
            name_width: DEFAULT_NAME_WIDTH,
            labels_file_name: DEFAULT_LABELS_FILE.to_string(),
        }
    }
}

/// Formats an enumeration index as an output file name.
///
/// ```
/// assert_eq!(imgcurate::curate::output_name(29, 7), "0000029.jpg");
/// ```
pub fn output_name(index: usize, width: usize) -> String {
    format!("{:0width$}.jpg", index, width = width)
}

/// Derives a label from a file stem by removing every decimal digit.
///
/// ```
/// assert_eq!(imgcurate::curate::derive_label("cat_12b3"), "cat_b");
/// ```
pub fn derive_label(stem: &str) -> String {
    DIGITS.replace_all(stem, "").into_owned()
}

/// Curates `input_dir` into `output_dir` with the default decoder.
pub fn curate_images(
    input_dir: &Path,
    output_dir: &Path,
    log_file: &Path,
    opts: &CurateOptions,
) -> Result<CurationReport, CurateError> {
    curate_images_with_decoder(input_dir, output_dir, log_file, opts, &ImageCrateDecoder)
}

/// Curates `input_dir` into `output_dir` using `decoder` for rule 3.
///
/// The input is scanned before anything is written, so a missing input
/// directory leaves the filesystem untouched. The log and label table are
/// truncated at the start of every run.
///
/// # Errors
/// - [`CurateError::DirectoryNotFound`] if `input_dir` is not a directory.
/// - Any I/O or write failure on the log, label table or copied files; the
///   run stops at the first one.
pub fn curate_images_with_decoder(
    input_dir: &Path,
    output_dir: &Path,
    log_file: &Path,
    opts: &CurateOptions,
    decoder: &dyn ImageDecoder,
) -> Result<CurationReport, CurateError> {
    let files = scan_files(input_dir)?;
    tracing::info!(count = files.len(), dir = %input_dir.display(), "scanned candidate files");

    fs::create_dir_all(output_dir)?;
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let labels_path = output_dir.join(&opts.labels_file_name);
    let mut log = RecordWriter::create(log_file, b',', RecordKind::Log)?;
    let mut labels = RecordWriter::create(&labels_path, b';', RecordKind::Labels)?;
    labels.write(LABELS_HEADER)?;

    let gate = ValidationGate::new(&opts.gate, decoder);
    let mut dedup = DedupIndex::new();
    let mut report = CurationReport::new();
    report.scanned = files.len();

    for (index, path) in files.iter().enumerate() {
        let candidate = CandidateFile::from_path(path)?;

        match gate.evaluate(&candidate, &mut dedup)? {
            Verdict::Rejected(code) => {
                tracing::debug!(file = %candidate.file_name, code = code.as_u8(), "rejected");
                let code_text = code.to_string();
                log.write([candidate.file_name.as_str(), code_text.as_str()])?;
                report.rejected.push(RejectionRecord {
                    file_name: candidate.file_name,
                    code,
                });
            }
            Verdict::Accepted(hash) => {
                let name = output_name(index, opts.name_width);
                let label = derive_label(candidate.stem());
                tracing::debug!(file = %candidate.file_name, %name, %label, "accepted");

                labels.write([name.as_str(), label.as_str()])?;
                fs::copy(path, output_dir.join(&name))?;

                report.accepted.push(AcceptedImage {
                    index,
                    name,
                    label,
                    hash,
                    source: path.clone(),
                });
            }
        }
    }

    log.finish()?;
    labels.finish()?;

    tracing::info!(
        accepted = report.accepted.len(),
        rejected = report.rejected.len(),
        "curation finished"
    );
    Ok(report)
}

#[derive(Clone, Copy)]
enum RecordKind {
    Log,
    Labels,
}

/// Unquoted delimiter-separated writer for the log and label table.
struct RecordWriter {
    inner: csv::Writer<BufWriter<File>>,
    path: PathBuf,
    kind: RecordKind,
}

impl RecordWriter {
    fn create(path: &Path, delimiter: u8, kind: RecordKind) -> Result<Self, CurateError> {
        let file = File::create(path)?;
        let inner = WriterBuilder::new()
            .delimiter(delimiter)
            .quote_style(QuoteStyle::Never)
            .has_headers(false)
            .from_writer(BufWriter::new(file));

        Ok(Self {
            inner,
            path: path.to_path_buf(),
            kind,
        })
    }

    fn write<const N: usize>(&mut self, fields: [&str; N]) -> Result<(), CurateError> {
        self.inner
            .write_record(fields)
            .map_err(|source| self.error(source))
    }

    fn finish(self) -> Result<(), CurateError> {
        self.inner
            .into_inner()
            .map_err(|e| CurateError::Io(e.into_error()))?
            .flush()?;
        Ok(())
    }

    fn error(&self, source: csv::Error) -> CurateError {
        let path = self.path.clone();
        match self.kind {
            RecordKind::Log => CurateError::LogWrite { path, source },
            RecordKind::Labels => CurateError::LabelsWrite { path, source },
        }
    }
}
