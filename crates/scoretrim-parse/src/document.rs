//! Opening and authenticating the source document.

use lopdf::{Document, ObjectId};
use scoretrim_core::{PageBox, TrimError};
use tracing::{debug, instrument, warn};

use crate::error::BackendError;
use crate::page_box::read_page_box;

/// A parsed, decrypted source PDF.
///
/// Read-only once opened; extraction borrows it immutably, so it can be
/// shared across worker threads.
pub struct SourceDocument {
    inner: Document,
    /// Page ObjectIds in page order (index 0 is page 1).
    page_ids: Vec<ObjectId>,
}

impl SourceDocument {
    /// Parse `bytes`, decrypting with `password` when the document is
    /// encrypted.
    ///
    /// Without a password an encrypted document is tried with the empty
    /// user password before failing with [`TrimError::PasswordRequired`].
    /// A password given for an unencrypted document is ignored.
    #[instrument(skip_all, fields(bytes_len = bytes.len(), has_password = password.is_some()))]
    pub fn open(bytes: &[u8], password: Option<&str>) -> Result<Self, BackendError> {
        if bytes.is_empty() {
            return Err(TrimError::EmptyInput.into());
        }

        let plain = Document::load_mem(bytes)
            .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;

        // Objects inside encrypted object streams are only readable when
        // the password is supplied at load time.
        let inner = if plain.is_encrypted() {
            debug!("source document is encrypted");
            match password {
                Some(password) => Document::load_mem_with_password(bytes, password)
                    .map_err(|e| {
                        warn!(error = %e, "encrypted PDF did not open with the supplied password");
                        BackendError::Core(TrimError::InvalidPassword)
                    })?,
                None => Document::load_mem_with_password(bytes, "").map_err(|e| {
                    warn!(error = %e, "encrypted PDF did not open with the empty password");
                    BackendError::Core(TrimError::PasswordRequired)
                })?,
            }
        } else {
            plain
        };

        let page_ids: Vec<ObjectId> = inner.get_pages().values().copied().collect();
        debug!(pages = page_ids.len(), "PDF loaded from bytes");

        Ok(Self { inner, page_ids })
    }

    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    pub fn page_count(&self) -> u32 {
        self.page_ids.len() as u32
    }

    /// ObjectId of a 1-based page.
    pub fn page_id(&self, page_number: u32) -> Result<ObjectId, BackendError> {
        page_number
            .checked_sub(1)
            .and_then(|idx| self.page_ids.get(idx as usize))
            .copied()
            .ok_or_else(|| {
                TrimError::PageOutOfRange {
                    page: i64::from(page_number),
                }
                .into()
            })
    }

    /// Effective box, MediaBox and rotation of a 1-based page.
    pub fn page_box(&self, page_number: u32) -> Result<PageBox, BackendError> {
        let page_id = self.page_id(page_number)?;
        read_page_box(&self.inner, page_id, page_number)
    }
}

impl std::fmt::Debug for SourceDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}
