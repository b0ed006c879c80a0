use std::path::{Path, PathBuf};

use scoretrim::scoretrim_core::parse_page_range;
use scoretrim::{
    NUpOptions, TrimError, TrimOptions, TrimRequest, layout_n_up, trim_score_with_progress,
};
use tracing::debug;

use crate::cli::TrimArgs;
use crate::shared::{
    EXIT_FAILURE, ProgressPrinter, group_page_areas, read_pdf, report_error, write_output,
};

/// Load the `--request` JSON file, if any.
fn load_request(path: Option<&Path>) -> Result<TrimRequest, i32> {
    let Some(path) = path else {
        return Ok(TrimRequest::default());
    };
    let text = std::fs::read_to_string(path).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", path.display());
        EXIT_FAILURE
    })?;
    serde_json::from_str(&text).map_err(|e| {
        eprintln!("Error: invalid request file {}: {e}", path.display());
        EXIT_FAILURE
    })
}

/// Merge the request file with command-line arguments.
fn build_request(args: &TrimArgs, pdf: Vec<u8>) -> Result<TrimRequest, i32> {
    let mut request = load_request(args.request.as_deref())?;
    request.pdf = pdf;
    request.areas.extend(args.areas.iter().copied().map(Some));
    request
        .page_settings
        .extend(group_page_areas(&args.page_areas));
    if let Some(range) = args.pages.as_deref() {
        let pages = parse_page_range(range).map_err(|e| {
            eprintln!("Error: {e}");
            EXIT_FAILURE
        })?;
        request.include_pages.extend(pages);
    }
    if let Some(password) = &args.password {
        request.password = Some(password.clone());
    }
    if let Some(title) = &args.title {
        request.title = title.clone();
    }
    Ok(request)
}

pub fn run(args: &TrimArgs) -> Result<(), i32> {
    let pdf = read_pdf(&args.file)?;
    let request = build_request(args, pdf)?;
    debug!(
        areas = request.areas.len(),
        page_settings = request.page_settings.len(),
        include_pages = request.include_pages.len(),
        "request built"
    );

    let options = TrimOptions {
        compress: !args.no_compress,
        ..TrimOptions::default()
    };

    let mut progress = ProgressPrinter::new();
    let result = trim_score_with_progress(&request, &options, &mut progress);
    progress.finish();
    let output = result.map_err(|e| report_error(&e))?;

    let bytes = match args.nup {
        Some((cols, rows)) => {
            let nup = NUpOptions {
                compress: options.compress,
                ..NUpOptions::grid(cols, rows)
            };
            layout_n_up(&output.pdf, &nup).map_err(|e| report_error(&TrimError::from(e)))?
        }
        None => output.pdf,
    };

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&output.filename));
    write_output(&path, &bytes)?;

    println!("{} -> {}", output.message, path.display());
    Ok(())
}
