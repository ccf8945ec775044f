//! The per-file validation gate.
//!
//! Each candidate passes through six ordered rules. The first rule that
//! fails decides the verdict and later rules are never evaluated:
//!
//! 1. extension is one of `.jpg`, `.JPG`, `.jpeg`, `.JPEG`
//! 2. file size is at most the configured maximum
//! 3. the file decodes as an image
//! 4. width and height meet the minimum and the mode is RGB or grayscale
//! 5. at least one channel has a non-zero value range
//! 6. the decoded content has not been accepted before in this run
//!
//! Rejection is an expected outcome, not an error: [`ValidationGate::evaluate`]
//! only returns `Err` for faults that should abort the whole run.

mod dedup;

pub use dedup::DedupIndex;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::decode::{ColorMode, ContentHash, DecodedImage, ImageDecoder};
use crate::error::CurateError;

/// Extensions accepted by default. Matching is case-sensitive.
pub const DEFAULT_EXTENSIONS: [&str; 4] = [".jpg", ".JPG", ".jpeg", ".JPEG"];

/// Default maximum file size in bytes.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 250_000;

/// Default minimum width and height in pixels.
pub const DEFAULT_MIN_DIMENSION: usize = 100;

/// Options for the validation rules.
#[derive(Clone, Debug)]
pub struct GateOptions {
    /// Accepted extensions, including the leading dot.
    pub extensions: Vec<String>,
    /// Files strictly larger than this are rejected.
    pub max_file_size: u64,
    /// Minimum width and height.
    pub min_dimension: usize,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            min_dimension: DEFAULT_MIN_DIMENSION,
        }
    }
}

/// Why a candidate was turned away. The numeric codes are stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RejectionCode {
    /// Extension not in the accepted set.
    BadExtension = 1,
    /// File larger than the size limit.
    Oversized = 2,
    /// Content could not be decoded.
    Undecodable = 3,
    /// Too small, or a color mode other than RGB/grayscale.
    BadShape = 4,
    /// Every channel is a single flat value.
    ZeroVariance = 5,
    /// Same decoded content as an earlier accepted file.
    Duplicate = 6,
}

impl RejectionCode {
    /// All codes in rule order.
    pub const ALL: [RejectionCode; 6] = [
        RejectionCode::BadExtension,
        RejectionCode::Oversized,
        RejectionCode::Undecodable,
        RejectionCode::BadShape,
        RejectionCode::ZeroVariance,
        RejectionCode::Duplicate,
    ];

    /// The numeric code written to the rejection log.
    #[inline]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parses a numeric code.
    pub fn from_u8(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_u8() == code)
    }

    /// Short human-readable description.
    pub fn describe(self) -> &'static str {
        match self {
            RejectionCode::BadExtension => "bad extension",
            RejectionCode::Oversized => "file too large",
            RejectionCode::Undecodable => "not decodable",
            RejectionCode::BadShape => "bad shape or color mode",
            RejectionCode::ZeroVariance => "flat color",
            RejectionCode::Duplicate => "duplicate content",
        }
    }
}

impl fmt::Display for RejectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl Serialize for RejectionCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// Outcome of running the gate on one candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// All rules passed; the hash has been recorded in the dedup index.
    Accepted(ContentHash),
    /// The first failing rule.
    Rejected(RejectionCode),
}

/// A file found by the scanner, with the metadata the early rules need.
#[derive(Clone, Debug)]
pub struct CandidateFile {
    /// Absolute path.
    pub path: PathBuf,
    /// Size on disk in bytes.
    pub size: u64,
    /// Final path component.
    pub file_name: String,
    /// Extension including the dot, or empty.
    pub extension: String,
}

impl CandidateFile {
    /// Reads the metadata of `path`.
    ///
    /// A metadata failure is an I/O fault, not a rejection.
    pub fn from_path(path: &Path) -> Result<Self, CurateError> {
        let size = std::fs::metadata(path)?.len();
        Ok(Self::new(path, size))
    }

    /// Builds a candidate from a known size.
    pub fn new(path: &Path, size: u64) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = split_extension(&file_name).1.to_string();

        Self {
            path: path.to_path_buf(),
            size,
            file_name,
            extension,
        }
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        split_extension(&self.file_name).0
    }
}

/// Splits a file name into `(stem, extension)`.
///
/// The extension is the last dot-suffix including the dot. Leading dots do
/// not start an extension, so `.jpg` and `..jpg` have none.
pub fn split_extension(name: &str) -> (&str, &str) {
    let Some(dot) = name.rfind('.') else {
        return (name, "");
    };

    if name[..dot].chars().any(|c| c != '.') {
        (&name[..dot], &name[dot..])
    } else {
        (name, "")
    }
}

/// The six-rule validation gate.
pub struct ValidationGate<'a> {
    options: &'a GateOptions,
    decoder: &'a dyn ImageDecoder,
}

impl<'a> ValidationGate<'a> {
    pub fn new(options: &'a GateOptions, decoder: &'a dyn ImageDecoder) -> Self {
        Self { options, decoder }
    }

    /// Runs the rules in order against `candidate`.
    ///
    /// On acceptance the content hash is inserted into `dedup` before
    /// returning.
    pub fn evaluate(
        &self,
        candidate: &CandidateFile,
        dedup: &mut DedupIndex,
    ) -> Result<Verdict, CurateError> {
        if let Err(code) = check_extension(candidate, self.options)
            .and_then(|()| check_file_size(candidate, self.options))
        {
            return Ok(Verdict::Rejected(code));
        }

        let image = match self.decoder.decode(&candidate.path) {
            Ok(image) => image,
            Err(CurateError::Decode { .. }) => {
                return Ok(Verdict::Rejected(RejectionCode::Undecodable))
            }
            Err(other) => return Err(other),
        };

        if let Err(code) =
            check_shape(&image, self.options).and_then(|()| check_variance(&image))
        {
            return Ok(Verdict::Rejected(code));
        }

        let hash = image.content_hash();
        if !dedup.insert(hash) {
            return Ok(Verdict::Rejected(RejectionCode::Duplicate));
        }

        Ok(Verdict::Accepted(hash))
    }
}

/// Rule 1.
pub fn check_extension(
    candidate: &CandidateFile,
    options: &GateOptions,
) -> Result<(), RejectionCode> {
    if options.extensions.iter().any(|e| *e == candidate.extension) {
        Ok(())
    } else {
        Err(RejectionCode::BadExtension)
    }
}

/// Rule 2.
pub fn check_file_size(
    candidate: &CandidateFile,
    options: &GateOptions,
) -> Result<(), RejectionCode> {
    if candidate.size > options.max_file_size {
        Err(RejectionCode::Oversized)
    } else {
        Ok(())
    }
}

/// Rule 4.
pub fn check_shape(image: &DecodedImage, options: &GateOptions) -> Result<(), RejectionCode> {
    if image.width() < options.min_dimension || image.height() < options.min_dimension {
        return Err(RejectionCode::BadShape);
    }

    let layout_ok = match image.mode {
        ColorMode::Rgb => image.pixels.ndim() == 3 && image.channel_count() == 3,
        ColorMode::Luma => image.pixels.ndim() == 2,
        ColorMode::Other(_) => false,
    };

    if layout_ok {
        Ok(())
    } else {
        Err(RejectionCode::BadShape)
    }
}

/// Rule 5.
///
/// Only channels that actually exist are inspected: a grayscale image is
/// flat when its single channel is flat.
pub fn check_variance(image: &DecodedImage) -> Result<(), RejectionCode> {
    let channels = image.channel_count();
    let mut ranges: Vec<Option<(u8, u8)>> = vec![None; channels];

    for (i, value) in image.pixels.iter().enumerate() {
        let slot = &mut ranges[i % channels];
        *slot = Some(match *slot {
            None => (*value, *value),
            Some((lo, hi)) => (lo.min(*value), hi.max(*value)),
        });
    }

    let all_flat = ranges
        .iter()
        .all(|range| range.map_or(true, |(lo, hi)| hi == lo));

    if all_flat {
        Err(RejectionCode::ZeroVariance)
    } else {
        Ok(())
    }
}
