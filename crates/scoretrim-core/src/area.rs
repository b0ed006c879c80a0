//! Crop areas as drawn by the user and their normalized, validated form.
//!
//! Areas are fractions of the page: `top` and `left` measure from the page's
//! visual top-left corner, `width` and `height` are fractions of the page
//! width and height. [`normalize_areas`] clamps raw input into range and
//! orders it top-to-bottom, which fixes the output page order.

use std::cmp::Ordering;

use crate::error::TrimError;

/// Smallest width or height (as a page fraction) a crop area may have.
pub const MIN_AREA_SIZE: f64 = 0.01;

/// A crop rectangle as supplied by the caller. Not yet validated.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct CropArea {
    /// Distance from the top edge, as a fraction of page height.
    pub top: f64,
    /// Distance from the left edge, as a fraction of page width.
    pub left: f64,
    /// Width as a fraction of page width.
    pub width: f64,
    /// Height as a fraction of page height.
    pub height: f64,
}

impl CropArea {
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// The whole page.
    pub fn full_page() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Clamp this area into the unit square.
    ///
    /// `index` is the 1-based position reported when the area collapses
    /// below [`MIN_AREA_SIZE`] after clamping.
    pub fn normalize(&self, index: usize) -> Result<NormalizedArea, TrimError> {
        if [self.top, self.left, self.width, self.height]
            .iter()
            .any(|v| v.is_nan())
        {
            return Err(TrimError::AreaOutOfBounds { index });
        }

        let top = self.top.clamp(0.0, 1.0);
        let left = self.left.clamp(0.0, 1.0);
        let mut width = self.width.clamp(MIN_AREA_SIZE, 1.0);
        let mut height = self.height.clamp(MIN_AREA_SIZE, 1.0);

        if left + width > 1.0 {
            width = 1.0 - left;
        }
        if top + height > 1.0 {
            height = 1.0 - top;
        }
        if width < MIN_AREA_SIZE || height < MIN_AREA_SIZE {
            return Err(TrimError::AreaOutOfBounds { index });
        }

        Ok(NormalizedArea {
            top,
            left,
            width,
            height,
        })
    }
}

impl From<NormalizedArea> for CropArea {
    fn from(area: NormalizedArea) -> Self {
        CropArea::new(area.top, area.left, area.width, area.height)
    }
}

/// A crop area after clamping.
///
/// Invariant: `0 <= left`, `0 <= top`, `left + width <= 1`,
/// `top + height <= 1`, and both `width` and `height` are at least
/// [`MIN_AREA_SIZE`]. Only obtainable through [`CropArea::normalize`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct NormalizedArea {
    top: f64,
    left: f64,
    width: f64,
    height: f64,
}

impl NormalizedArea {
    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    fn reading_order(&self, other: &Self) -> Ordering {
        self.top
            .partial_cmp(&other.top)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.left.partial_cmp(&other.left).unwrap_or(Ordering::Equal))
    }
}

/// Normalized areas in reading order: ascending `top`, then ascending `left`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct AreaSet(Vec<NormalizedArea>);

impl AreaSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NormalizedArea> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[NormalizedArea] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a AreaSet {
    type Item = &'a NormalizedArea;
    type IntoIter = std::slice::Iter<'a, NormalizedArea>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Validate and order a list of crop areas.
///
/// `None` entries are skipped but still count toward the 1-based index
/// reported in [`TrimError::AreaOutOfBounds`]. An empty list yields an empty
/// [`AreaSet`]; whether that is acceptable is decided by the caller.
///
/// # Errors
///
/// - [`TrimError::AreaOutOfBounds`] when an area shrinks below
///   [`MIN_AREA_SIZE`] after clamping.
/// - [`TrimError::NoValidAreas`] when a non-empty list holds only `None`.
pub fn normalize_areas(areas: &[Option<CropArea>]) -> Result<AreaSet, TrimError> {
    if areas.is_empty() {
        return Ok(AreaSet::default());
    }

    let mut normalized = Vec::with_capacity(areas.len());
    for (idx, area) in areas.iter().enumerate() {
        let Some(area) = area else {
            continue;
        };
        normalized.push(area.normalize(idx + 1)?);
    }

    if normalized.is_empty() {
        return Err(TrimError::NoValidAreas);
    }

    // `sort_by` is stable: areas with equal (top, left) keep input order.
    normalized.sort_by(NormalizedArea::reading_order);
    Ok(AreaSet(normalized))
}
