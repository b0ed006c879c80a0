//! Staged progress notifications for a trim request.
//!
//! Inject any [`ProgressSink`] (closures implement it) to receive events as
//! the pipeline moves through its stages. Percentages are strictly
//! increasing and the last event of a successful request is
//! [`ProgressStage::Complete`] at 100.

use std::fmt;

/// Pipeline stage reported in a [`ProgressEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ProgressStage {
    Opening,
    Validating,
    Extracting,
    Assembling,
    Complete,
}

impl ProgressStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStage::Opening => "opening",
            ProgressStage::Validating => "validating",
            ProgressStage::Extracting => "extracting",
            ProgressStage::Assembling => "assembling",
            ProgressStage::Complete => "complete",
        }
    }
}

impl fmt::Display for ProgressStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percent reported when the source document is being opened.
pub const OPENING_PERCENT: u8 = 5;
/// Percent reported once the document is open and the request is validated.
pub const VALIDATING_PERCENT: u8 = 10;
/// First percent of the extraction range.
pub const EXTRACT_START_PERCENT: u8 = 15;
/// Last percent of the extraction range.
pub const EXTRACT_END_PERCENT: u8 = 90;
/// Percent reported while merging segments.
pub const ASSEMBLING_PERCENT: u8 = 95;

/// One progress notification.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressEvent {
    pub stage: ProgressStage,
    /// 0 to 100.
    pub percent: u8,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(stage: ProgressStage, percent: u8, message: impl Into<String>) -> Self {
        Self {
            stage,
            percent: percent.min(100),
            message: message.into(),
        }
    }
}

/// Receiver of progress events.
pub trait ProgressSink {
    fn on_progress(&mut self, event: ProgressEvent);
}

impl<F: FnMut(ProgressEvent)> ProgressSink for F {
    fn on_progress(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn on_progress(&mut self, _event: ProgressEvent) {}
}

/// Percent for `done` of `total` segments within the extraction range.
pub fn extracting_percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return EXTRACT_END_PERCENT;
    }
    let span = usize::from(EXTRACT_END_PERCENT - EXTRACT_START_PERCENT);
    let done = done.min(total);
    EXTRACT_START_PERCENT + (span * done / total) as u8
}

/// Forwards events to a sink, dropping any whose percent does not exceed
/// the last one forwarded.
pub struct ProgressTracker<'a> {
    sink: &'a mut dyn ProgressSink,
    last: Option<u8>,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a mut dyn ProgressSink) -> Self {
        Self { sink, last: None }
    }

    /// Emit an event. Returns false when it was suppressed.
    pub fn emit(&mut self, stage: ProgressStage, percent: u8, message: impl Into<String>) -> bool {
        if self.last.is_some_and(|last| percent <= last) {
            return false;
        }
        let event = ProgressEvent::new(stage, percent, message);
        self.last = Some(event.percent);
        self.sink.on_progress(event);
        true
    }

    pub fn last_percent(&self) -> Option<u8> {
        self.last
    }
}

impl fmt::Debug for ProgressTracker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("last", &self.last)
            .finish_non_exhaustive()
    }
}
