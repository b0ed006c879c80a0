//! The trim pipeline.
//!
//! Open and authenticate the source, validate areas and page selection
//! against it, plan one work item per (page, area) pair in page-major,
//! area-minor order, extract each item into a single-page segment, and
//! assemble the segments. Every step fails fast.

use scoretrim_core::progress::{
    ASSEMBLING_PERCENT, EXTRACT_START_PERCENT, OPENING_PERCENT, VALIDATING_PERCENT,
    extracting_percent,
};
use scoretrim_core::{
    AreaSet, ErrorCategory, NoopProgress, PageBox, PageOverrides, PageSelection, ProgressSink,
    ProgressStage, ProgressTracker, ResolvedRect, TrimError, TrimOptions, derive_filename,
    normalize_areas, resolve_rect, select_pages,
};
use scoretrim_parse::{SourceDocument, assemble, extract_segment};
use tracing::{debug, error, info, info_span, warn};

use crate::context::RequestContext;
use crate::request::{TrimOutput, TrimRequest};

/// One output page to produce.
#[derive(Debug, Clone, Copy)]
struct WorkItem {
    page: u32,
    /// 0-based position in the page's AreaSet.
    area_index: usize,
    page_box: PageBox,
    rect: ResolvedRect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extraction {
    Sequential,
    #[cfg(feature = "parallel")]
    Parallel,
}

/// Trim `request` into a new PDF.
pub fn trim_score(request: &TrimRequest, options: &TrimOptions) -> Result<TrimOutput, TrimError> {
    trim_score_with_progress(request, options, &mut NoopProgress)
}

/// Like [`trim_score`], reporting stage progress to `progress`.
///
/// Percentages delivered to the sink strictly increase; a successful run
/// ends with [`ProgressStage::Complete`] at 100.
pub fn trim_score_with_progress(
    request: &TrimRequest,
    options: &TrimOptions,
    progress: &mut dyn ProgressSink,
) -> Result<TrimOutput, TrimError> {
    let mut ctx = RequestContext::default();
    trim_score_with_context(request, options, &mut ctx, progress)
}

/// Like [`trim_score_with_progress`], recording counters into `ctx`.
pub fn trim_score_with_context(
    request: &TrimRequest,
    options: &TrimOptions,
    ctx: &mut RequestContext,
    progress: &mut dyn ProgressSink,
) -> Result<TrimOutput, TrimError> {
    run(request, options, ctx, progress, Extraction::Sequential)
}

/// Trim with segment extraction spread across the rayon thread pool.
///
/// Output is identical to [`trim_score`]: segments are collected in plan
/// order regardless of completion order. Only the start and end of the
/// extraction stage are reported to `progress`.
#[cfg(feature = "parallel")]
pub fn trim_score_parallel(
    request: &TrimRequest,
    options: &TrimOptions,
    progress: &mut dyn ProgressSink,
) -> Result<TrimOutput, TrimError> {
    let mut ctx = RequestContext::default();
    trim_score_parallel_with_context(request, options, &mut ctx, progress)
}

/// Like [`trim_score_parallel`], recording counters into `ctx`.
#[cfg(feature = "parallel")]
pub fn trim_score_parallel_with_context(
    request: &TrimRequest,
    options: &TrimOptions,
    ctx: &mut RequestContext,
    progress: &mut dyn ProgressSink,
) -> Result<TrimOutput, TrimError> {
    run(request, options, ctx, progress, Extraction::Parallel)
}

fn run(
    request: &TrimRequest,
    options: &TrimOptions,
    ctx: &mut RequestContext,
    progress: &mut dyn ProgressSink,
    mode: Extraction,
) -> Result<TrimOutput, TrimError> {
    let span = info_span!("trim", request_id = %ctx.request_id());
    let _guard = span.enter();

    let mut tracker = ProgressTracker::new(progress);
    let result = pipeline(request, options, ctx, &mut tracker, mode);

    match &result {
        Ok(output) => info!(
            segments = output.segment_count,
            bytes_in = ctx.bytes_in,
            bytes_out = ctx.bytes_out,
            elapsed_ms = ctx.elapsed().as_millis() as u64,
            "trim complete"
        ),
        Err(e) if e.category() == ErrorCategory::Internal => {
            error!(error = %e, elapsed_ms = ctx.elapsed().as_millis() as u64, "trim failed")
        }
        Err(e) => warn!(category = %e.category(), error = %e, "trim rejected"),
    }
    result
}

fn pipeline(
    request: &TrimRequest,
    options: &TrimOptions,
    ctx: &mut RequestContext,
    tracker: &mut ProgressTracker<'_>,
    mode: Extraction,
) -> Result<TrimOutput, TrimError> {
    if request.pdf.is_empty() {
        return Err(TrimError::EmptyInput);
    }
    options.check_input_bytes(request.pdf.len())?;
    ctx.bytes_in = request.pdf.len();

    tracker.emit(ProgressStage::Opening, OPENING_PERCENT, "Opening PDF");
    let source = SourceDocument::open(&request.pdf, request.password.as_deref())?;
    ctx.source_pages = source.page_count();

    let default_areas = normalize_areas(&request.areas)?;
    let overrides = PageOverrides::build(&request.page_settings)?;
    if default_areas.is_empty() && overrides.is_empty() {
        return Err(TrimError::NoCropAreas);
    }

    let selection = select_pages(source.page_count(), &request.include_pages)?;
    options.check_pages(selection.len())?;
    overrides.validate_against(source.page_count())?;
    ctx.selected_pages = selection.len();

    let plan = plan_segments(&source, &selection, &default_areas, &overrides)?;
    options.check_segments(plan.len())?;
    debug!(
        source_pages = ctx.source_pages,
        selected_pages = selection.len(),
        overrides = overrides.len(),
        segments = plan.len(),
        "request validated"
    );
    tracker.emit(
        ProgressStage::Validating,
        VALIDATING_PERCENT,
        format!("Validated {} pages", selection.len()),
    );

    let segments = match mode {
        Extraction::Sequential => extract_sequential(&source, &plan, options, ctx, tracker)?,
        #[cfg(feature = "parallel")]
        Extraction::Parallel => extract_parallel(&source, &plan, options, ctx, tracker)?,
    };

    let segment_count = segments.len();
    tracker.emit(
        ProgressStage::Assembling,
        ASSEMBLING_PERCENT,
        format!("Assembling {segment_count} pages"),
    );
    let pdf = assemble(segments)?;
    ctx.bytes_out = pdf.len();

    let message = format!("Generated trimmed PDF with {segment_count} pages");
    tracker.emit(ProgressStage::Complete, 100, message.clone());

    Ok(TrimOutput {
        pdf,
        message,
        filename: derive_filename(&request.title),
        segment_count,
    })
}

/// Resolve every (page, area) pair before any page is copied.
fn plan_segments(
    source: &SourceDocument,
    selection: &PageSelection,
    default_areas: &AreaSet,
    overrides: &PageOverrides,
) -> Result<Vec<WorkItem>, TrimError> {
    let mut plan = Vec::new();
    for page in selection.iter() {
        let areas = overrides.effective(page, default_areas)?;
        let page_box = source.page_box(page)?;
        for (area_index, area) in areas.iter().enumerate() {
            let rect = resolve_rect(&page_box.bounds, area).inspect_err(|e| {
                debug!(page, area = area_index + 1, error = %e, "area resolves outside page");
            })?;
            plan.push(WorkItem {
                page,
                area_index,
                page_box,
                rect,
            });
        }
    }
    Ok(plan)
}

fn extract_item(
    source: &SourceDocument,
    item: &WorkItem,
    options: &TrimOptions,
) -> Result<Vec<u8>, TrimError> {
    debug!(
        page = item.page,
        area = item.area_index + 1,
        width = item.rect.width(),
        height = item.rect.height(),
        rotation = item.page_box.rotation,
        "extracting segment"
    );
    Ok(extract_segment(
        source,
        item.page,
        &item.page_box,
        &item.rect,
        options,
    )?)
}

fn extract_sequential(
    source: &SourceDocument,
    plan: &[WorkItem],
    options: &TrimOptions,
    ctx: &mut RequestContext,
    tracker: &mut ProgressTracker<'_>,
) -> Result<Vec<Vec<u8>>, TrimError> {
    let total = plan.len();
    tracker.emit(
        ProgressStage::Extracting,
        EXTRACT_START_PERCENT,
        format!("Extracting {total} regions"),
    );

    let mut segments = Vec::with_capacity(total);
    for (done, item) in plan.iter().enumerate() {
        let bytes = extract_item(source, item, options)?;
        ctx.record_segment(bytes.len());
        segments.push(bytes);
        tracker.emit(
            ProgressStage::Extracting,
            extracting_percent(done + 1, total),
            format!("Extracted page {} region {}", item.page, item.area_index + 1),
        );
    }
    Ok(segments)
}

#[cfg(feature = "parallel")]
fn extract_parallel(
    source: &SourceDocument,
    plan: &[WorkItem],
    options: &TrimOptions,
    ctx: &mut RequestContext,
    tracker: &mut ProgressTracker<'_>,
) -> Result<Vec<Vec<u8>>, TrimError> {
    use rayon::prelude::*;

    let total = plan.len();
    tracker.emit(
        ProgressStage::Extracting,
        EXTRACT_START_PERCENT,
        format!("Extracting {total} regions"),
    );

    let segments: Vec<Vec<u8>> = plan
        .par_iter()
        .map(|item| extract_item(source, item, options))
        .collect::<Result<_, _>>()?;

    for bytes in &segments {
        ctx.record_segment(bytes.len());
    }
    tracker.emit(
        ProgressStage::Extracting,
        extracting_percent(total, total),
        format!("Extracted {total} regions"),
    );
    Ok(segments)
}
