//! scoretrim: Cut regions out of PDF score pages and recompose them.
//!
//! This is the public API facade. It re-exports scoretrim-core and
//! scoretrim-parse and runs the trim pipeline: open the source document,
//! validate crop areas and page selection, extract one single-page segment
//! per (page, area) pair, and assemble the segments in order.
//!
//! # Architecture
//!
//! - **scoretrim-core**: Backend-independent types, geometry and errors
//! - **scoretrim-parse**: lopdf backend (open, page boxes, extraction, assembly, N-up)
//! - **scoretrim** (this crate): Request/response types and the pipeline
//!
//! # Example
//!
//! ```no_run
//! use scoretrim::{CropArea, TrimOptions, TrimRequest, trim_score};
//!
//! let bytes = std::fs::read("score.pdf").unwrap();
//! let request = TrimRequest::new(bytes)
//!     .with_areas([CropArea::new(0.0, 0.0, 1.0, 0.5), CropArea::new(0.5, 0.0, 1.0, 0.5)])
//!     .with_title("Prelude in C");
//! let output = trim_score(&request, &TrimOptions::default()).unwrap();
//! std::fs::write(&output.filename, &output.pdf).unwrap();
//! ```

mod context;
mod request;
mod trim;

pub use scoretrim_core;
pub use scoretrim_parse;

pub use context::RequestContext;
pub use request::{TrimOutput, TrimRequest};
#[cfg(feature = "parallel")]
pub use trim::{trim_score_parallel, trim_score_parallel_with_context};
pub use trim::{trim_score, trim_score_with_context, trim_score_with_progress};

pub use scoretrim_core::{
    CropArea, ErrorCategory, NoopProgress, PageSetting, ProgressEvent, ProgressSink,
    ProgressStage, TrimError, TrimOptions,
};
pub use scoretrim_parse::{NUpOptions, layout_n_up};
