//! scoretrim-parse: lopdf backend for scoretrim.
//!
//! Opens (and decrypts) the source document, reads page geometry with
//! page-tree inheritance, extracts crop regions into standalone single-page
//! documents, concatenates them, and optionally re-lays the result as an
//! N-up grid.

pub mod assemble;
pub mod document;
pub mod error;
pub mod nup;
pub mod page_box;
pub mod segment;

#[cfg(test)]
mod test_support;

pub use assemble::assemble;
pub use document::SourceDocument;
pub use error::BackendError;
pub use nup::{NUpOptions, layout_n_up};
pub use page_box::read_page_box;
pub use segment::extract_segment;
