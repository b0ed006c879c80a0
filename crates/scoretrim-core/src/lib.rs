//! scoretrim-core: Backend-independent types and algorithms.
//!
//! This crate provides the crop area model, page selection, per-page
//! overrides, page-space geometry, the content stream rewrite, filename
//! derivation, progress events and the [`TrimError`] taxonomy used by
//! scoretrim. It does not parse PDF files.

pub mod area;
pub mod content;
pub mod error;
pub mod filename;
pub mod geometry;
pub mod options;
pub mod overrides;
pub mod pages;
pub mod progress;

pub use area::{AreaSet, CropArea, MIN_AREA_SIZE, NormalizedArea, normalize_areas};
pub use content::{rewrite_content, rotation_matrix};
pub use error::{ErrorCategory, Stage, TrimError};
pub use filename::derive_filename;
pub use geometry::{PageBox, Rect, ResolvedRect, normalize_rotation, resolve_rect};
pub use options::TrimOptions;
pub use overrides::{PageOverrides, PageSetting};
pub use pages::{PageSelection, parse_page_range, select_pages};
pub use progress::{
    NoopProgress, ProgressEvent, ProgressSink, ProgressStage, ProgressTracker,
};
