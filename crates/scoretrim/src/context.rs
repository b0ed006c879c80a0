//! Per-request diagnostics.

use std::time::{Duration, Instant};

use uuid::Uuid;

/// Counters and identity for one trim request.
///
/// Created by the caller (or by [`trim_score`](crate::trim_score) with a
/// fresh random id) and threaded through the pipeline by `&mut`. Nothing here is
/// shared between requests.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: String,
    started: Instant,
    pub source_pages: u32,
    pub selected_pages: usize,
    pub segments_extracted: usize,
    /// Total size of the extracted segments before assembly.
    pub segment_bytes: usize,
    pub bytes_in: usize,
    pub bytes_out: usize,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            started: Instant::now(),
            source_pages: 0,
            selected_pages: 0,
            segments_extracted: 0,
            segment_bytes: 0,
            bytes_in: 0,
            bytes_out: 0,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub(crate) fn record_segment(&mut self, bytes: usize) {
        self.segments_extracted += 1;
        self.segment_bytes += bytes;
    }
}

impl Default for RequestContext {
    /// A context with a random v4 UUID as its id.
    fn default() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}
