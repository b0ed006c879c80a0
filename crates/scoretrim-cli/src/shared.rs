use std::collections::BTreeMap;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use scoretrim::{CropArea, PageSetting, ProgressEvent, ProgressSink, TrimError};
use tracing::debug;

/// Exit code for validation and internal failures.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code when the PDF needs a (different) password.
pub const EXIT_AUTH: i32 = 2;

/// Read a PDF file with user-friendly error messages.
///
/// Returns `Err(1)` with a message printed to stderr if the file is not
/// found or cannot be read.
pub fn read_pdf(file: &Path) -> Result<Vec<u8>, i32> {
    if !file.exists() {
        eprintln!("Error: file not found: {}", file.display());
        return Err(EXIT_FAILURE);
    }
    std::fs::read(file).map_err(|e| {
        eprintln!("Error: failed to read {}: {e}", file.display());
        EXIT_FAILURE
    })
}

/// Write bytes to `path`, reporting failures on stderr.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<(), i32> {
    std::fs::write(path, bytes).map_err(|e| {
        eprintln!("Error: failed to write {}: {e}", path.display());
        EXIT_FAILURE
    })
}

/// Print `err` to stderr and return the matching exit code.
///
/// Internal errors are shown without backend detail; the full error is
/// logged at debug level.
pub fn report_error(err: &TrimError) -> i32 {
    debug!(category = %err.category(), error = %err, "command failed");
    eprintln!("{}", error_line(err));
    exit_code(err)
}

/// The line shown to the user for `err`.
pub fn error_line(err: &TrimError) -> String {
    format!("Error: {}", err.public_message())
}

pub fn exit_code(err: &TrimError) -> i32 {
    if err.is_authentication() {
        EXIT_AUTH
    } else {
        EXIT_FAILURE
    }
}

/// Parse `top,left,width,height` into a [`CropArea`].
pub fn parse_area(s: &str) -> Result<CropArea, String> {
    let values: Vec<f64> = s
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| format!("invalid number {:?} in area {s:?}", v.trim()))
        })
        .collect::<Result<_, _>>()?;
    match values.as_slice() {
        &[top, left, width, height] => Ok(CropArea::new(top, left, width, height)),
        _ => Err(format!(
            "area {s:?} must have four values: top,left,width,height"
        )),
    }
}

/// Parse `page:top,left,width,height`.
pub fn parse_page_area(s: &str) -> Result<(i64, CropArea), String> {
    let (page, area) = s
        .split_once(':')
        .ok_or_else(|| format!("page area {s:?} must look like PAGE:TOP,LEFT,WIDTH,HEIGHT"))?;
    let page = page
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid page number {:?}", page.trim()))?;
    Ok((page, parse_area(area)?))
}

/// Parse a `COLSxROWS` grid such as `2x2`.
pub fn parse_grid(s: &str) -> Result<(u32, u32), String> {
    let (cols, rows) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("grid {s:?} must look like COLSxROWS"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u32>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| format!("invalid grid dimension {:?} in {s:?}", v.trim()))
    };
    Ok((parse(cols)?, parse(rows)?))
}

/// Group `--page-area` values into one setting per page, keeping the
/// order areas were given in.
pub fn group_page_areas(page_areas: &[(i64, CropArea)]) -> Vec<PageSetting> {
    let mut by_page: BTreeMap<i64, Vec<CropArea>> = BTreeMap::new();
    for &(page, area) in page_areas {
        by_page.entry(page).or_default().push(area);
    }
    by_page
        .into_iter()
        .map(|(page, areas)| PageSetting::new(page, areas))
        .collect()
}

/// Prints pipeline progress to stderr, but only when stderr is a TTY.
pub struct ProgressPrinter {
    is_tty: bool,
}

impl ProgressPrinter {
    pub fn new() -> Self {
        Self {
            is_tty: io::stderr().is_terminal(),
        }
    }

    /// Clear the progress line.
    pub fn finish(&self) {
        if self.is_tty {
            eprint!("\r\x1b[K");
            let _ = io::stderr().flush();
        }
    }
}

impl Default for ProgressPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for ProgressPrinter {
    fn on_progress(&mut self, event: ProgressEvent) {
        if self.is_tty {
            eprint!("\r\x1b[K[{:>3}%] {}", event.percent, event.message);
            let _ = io::stderr().flush();
        }
    }
}
