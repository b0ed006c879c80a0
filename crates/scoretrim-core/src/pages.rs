//! Page selection: which source pages take part, and in what order.

use std::collections::BTreeSet;

use crate::error::TrimError;

/// Ascending, de-duplicated, 1-based page numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelection(Vec<u32>);

impl PageSelection {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Resolve the pages to process.
///
/// An empty `requested` list selects every page. Otherwise each entry must
/// lie in `1..=total_pages`; duplicates collapse and the result is sorted.
pub fn select_pages(total_pages: u32, requested: &[i64]) -> Result<PageSelection, TrimError> {
    if total_pages == 0 {
        return Err(TrimError::EmptyDocument);
    }
    if requested.is_empty() {
        return Ok(PageSelection((1..=total_pages).collect()));
    }

    let mut pages = BTreeSet::new();
    for &page in requested {
        if page < 1 || page > i64::from(total_pages) {
            return Err(TrimError::PageOutOfRange { page });
        }
        pages.insert(page as u32);
    }

    if pages.is_empty() {
        return Err(TrimError::NoValidPages);
    }
    Ok(PageSelection(pages.into_iter().collect()))
}

/// Parse a page range expression like `"1,3-5"` into 1-based page numbers.
///
/// Ranges are inclusive. Bounds are checked by [`select_pages`] once the
/// document is open, so the offending number reaches the caller.
pub fn parse_page_range(range: &str) -> Result<Vec<i64>, String> {
    let mut pages = Vec::new();

    for part in range.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start = parse_page_number(start.trim())?;
            let end = parse_page_number(end.trim())?;
            if start > end {
                return Err(format!("invalid range: {start}-{end} (start > end)"));
            }
            pages.extend(start..=end);
        } else {
            pages.push(parse_page_number(part)?);
        }
    }

    if pages.is_empty() {
        return Err(format!("no pages selected from range {range:?}"));
    }
    Ok(pages)
}

fn parse_page_number(s: &str) -> Result<i64, String> {
    s.parse::<i64>()
        .map_err(|_| format!("invalid page number: {s:?}"))
}
