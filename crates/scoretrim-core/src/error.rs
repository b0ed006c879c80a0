//! Error types for scoretrim.
//!
//! Provides [`TrimError`], the single fatal error type surfaced by every
//! stage of the trim pipeline, and [`ErrorCategory`], which lets callers
//! tell caller-input problems apart from bad credentials and from genuine
//! processing failures.

use std::fmt;

/// Broad classification of a [`TrimError`].
///
/// Callers use this to decide how to react: re-prompt for a password on
/// [`Authentication`](ErrorCategory::Authentication), show the message on
/// [`Validation`](ErrorCategory::Validation), and report an opaque failure
/// on [`Internal`](ErrorCategory::Internal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ErrorCategory {
    /// The request itself is wrong; correcting the input fixes it.
    Validation,
    /// The source is encrypted and the password is missing or incorrect.
    Authentication,
    /// The document or an intermediate artifact could not be processed.
    Internal,
}

impl ErrorCategory {
    /// Returns the string tag for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline stage attached to internal errors for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Parsing and decrypting the source document.
    Open,
    /// Reading page boxes and rotation.
    Geometry,
    /// Copying a page into its own document.
    Extract,
    /// Encoding the rewritten content stream.
    Encode,
    /// Writing a document to bytes.
    Serialize,
    /// Merging segments into the output document.
    Assemble,
    /// Packing pages into an N-up grid.
    Layout,
}

impl Stage {
    /// Returns the string tag for this stage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Open => "open",
            Stage::Geometry => "geometry",
            Stage::Extract => "extract",
            Stage::Encode => "encode",
            Stage::Serialize => "serialize",
            Stage::Assemble => "assemble",
            Stage::Layout => "layout",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal error for a trim request.
///
/// Every variant terminates the pipeline; partial output is never returned.
#[derive(Debug, Clone, PartialEq)]
pub enum TrimError {
    /// The request carried no PDF bytes.
    EmptyInput,
    /// A crop area collapsed below the minimum size after clamping.
    AreaOutOfBounds {
        /// 1-based position of the offending area in the input list.
        index: usize,
    },
    /// A non-empty area list produced no usable areas.
    NoValidAreas,
    /// Neither a default area list nor any page override was supplied.
    NoCropAreas,
    /// A page override names a page number below 1.
    InvalidPageNumber {
        /// The page number as supplied.
        page: i64,
    },
    /// A page to include lies outside the document.
    PageOutOfRange {
        /// The page number as supplied.
        page: i64,
    },
    /// Page selection produced no pages.
    NoValidPages,
    /// The source document has no pages.
    EmptyDocument,
    /// A page override names a page beyond the end of the document.
    OverrideOutOfRange {
        /// The overridden page number.
        page: u32,
    },
    /// A selected page has neither an override nor default areas.
    PageHasNoAreas {
        /// The page lacking areas.
        page: u32,
    },
    /// A page declares neither a CropBox nor a MediaBox.
    MissingPageGeometry {
        /// The page lacking geometry.
        page: u32,
    },
    /// The resolved crop rectangle has no overlap with the page box.
    RegionOutsidePage,
    /// The crop rectangle has zero or negative width or height.
    ZeroSizeRegion,
    /// N-up layout parameters are unusable.
    InvalidLayout(String),
    /// A configured resource limit was exceeded.
    ResourceLimitExceeded {
        /// Name of the limit that was exceeded (e.g., "max_input_bytes").
        limit_name: String,
        /// The configured limit value.
        limit_value: usize,
        /// The actual value that exceeded the limit.
        actual_value: usize,
    },
    /// The PDF is encrypted and requires a password to open.
    PasswordRequired,
    /// The supplied password is incorrect for this encrypted PDF.
    InvalidPassword,
    /// Assembly was asked to merge an empty segment list.
    NoSegments,
    /// A structural failure while processing the document.
    Internal {
        /// Stage that failed.
        stage: Stage,
        /// 1-based page number being processed, if any.
        page: Option<u32>,
        /// Backend-provided detail.
        message: String,
    },
}

impl TrimError {
    /// Build an [`Internal`](TrimError::Internal) error.
    pub fn internal(stage: Stage, page: Option<u32>, message: impl Into<String>) -> Self {
        TrimError::Internal {
            stage,
            page,
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            TrimError::PasswordRequired | TrimError::InvalidPassword => {
                ErrorCategory::Authentication
            }
            TrimError::NoSegments | TrimError::Internal { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::Validation,
        }
    }

    /// Returns true for errors caused by missing or incorrect credentials.
    pub fn is_authentication(&self) -> bool {
        self.category() == ErrorCategory::Authentication
    }

    /// Message safe to show to the caller.
    ///
    /// Validation and authentication errors are returned verbatim; internal
    /// errors are reduced to an opaque description without backend detail.
    pub fn public_message(&self) -> String {
        match self.category() {
            ErrorCategory::Internal => "failed to process the PDF".to_string(),
            _ => self.to_string(),
        }
    }
}

impl fmt::Display for TrimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrimError::EmptyInput => write!(f, "PDF file is empty"),
            TrimError::AreaOutOfBounds { index } => {
                write!(f, "crop area {index} is outside the page bounds")
            }
            TrimError::NoValidAreas => write!(f, "no valid crop areas"),
            TrimError::NoCropAreas => write!(f, "no crop areas were supplied"),
            TrimError::InvalidPageNumber { page } => write!(f, "page number {page} is invalid"),
            TrimError::PageOutOfRange { page } => {
                write!(f, "page {page} to include is out of range")
            }
            TrimError::NoValidPages => write!(f, "no valid pages"),
            TrimError::EmptyDocument => write!(f, "PDF has no pages"),
            TrimError::OverrideOutOfRange { page } => {
                write!(f, "settings for page {page} are outside the PDF page range")
            }
            TrimError::PageHasNoAreas { page } => write!(f, "page {page} has no crop areas"),
            TrimError::MissingPageGeometry { page } => {
                write!(f, "could not determine the size of page {page}")
            }
            TrimError::RegionOutsidePage => write!(f, "crop region is outside the page bounds"),
            TrimError::ZeroSizeRegion => {
                write!(f, "crop region has zero width or height")
            }
            TrimError::InvalidLayout(msg) => write!(f, "invalid layout: {msg}"),
            TrimError::ResourceLimitExceeded {
                limit_name,
                limit_value,
                actual_value,
            } => write!(
                f,
                "resource limit exceeded: {limit_name} (limit: {limit_value}, actual: {actual_value})"
            ),
            TrimError::PasswordRequired => write!(f, "PDF is encrypted and requires a password"),
            TrimError::InvalidPassword => write!(f, "the supplied PDF password is incorrect"),
            TrimError::NoSegments => write!(f, "no segments to assemble"),
            TrimError::Internal {
                stage,
                page: Some(page),
                message,
            } => write!(f, "{stage} failed on page {page}: {message}"),
            TrimError::Internal {
                stage,
                page: None,
                message,
            } => write!(f, "{stage} failed: {message}"),
        }
    }
}

impl std::error::Error for TrimError {}
