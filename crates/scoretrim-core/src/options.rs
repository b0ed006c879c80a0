use crate::error::TrimError;

/// Options controlling trimming behavior and resource limits.
///
/// Limits default to `None` (no limit). They bound how much work a single
/// request may cause before any page is copied.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimOptions {
    /// Maximum input PDF size in bytes (default: None = no limit).
    pub max_input_bytes: Option<usize>,
    /// Maximum number of selected pages (default: None = no limit).
    pub max_pages: Option<usize>,
    /// Maximum number of output segments (default: None = no limit).
    pub max_segments: Option<usize>,
    /// Flate-compress rewritten content streams (default: true).
    pub compress: bool,
}

impl Default for TrimOptions {
    fn default() -> Self {
        Self {
            max_input_bytes: None,
            max_pages: None,
            max_segments: None,
            compress: true,
        }
    }
}

impl TrimOptions {
    pub fn check_input_bytes(&self, actual: usize) -> Result<(), TrimError> {
        check_limit("max_input_bytes", self.max_input_bytes, actual)
    }

    pub fn check_pages(&self, actual: usize) -> Result<(), TrimError> {
        check_limit("max_pages", self.max_pages, actual)
    }

    pub fn check_segments(&self, actual: usize) -> Result<(), TrimError> {
        check_limit("max_segments", self.max_segments, actual)
    }
}

fn check_limit(name: &str, limit: Option<usize>, actual: usize) -> Result<(), TrimError> {
    match limit {
        Some(limit) if actual > limit => Err(TrimError::ResourceLimitExceeded {
            limit_name: name.to_string(),
            limit_value: limit,
            actual_value: actual,
        }),
        _ => Ok(()),
    }
}
