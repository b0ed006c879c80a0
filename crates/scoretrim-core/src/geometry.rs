//! Page boxes and crop rectangles in PDF user space.
//!
//! PDF user space has its origin at the bottom-left of the page while crop
//! areas are measured from the visual top-left, so [`resolve_rect`] inverts
//! the vertical axis when mapping an area onto a page box.

use crate::area::NormalizedArea;
use crate::error::TrimError;

/// Axis-aligned rectangle in PDF user space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl Rect {
    pub fn new(llx: f64, lly: f64, urx: f64, ury: f64) -> Self {
        Self { llx, lly, urx, ury }
    }

    /// Build a rectangle from two opposite corners in any order.
    ///
    /// PDF box arrays are allowed to list their corners reversed.
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            llx: x0.min(x1),
            lly: y0.min(y1),
            urx: x0.max(x1),
            ury: y0.max(y1),
        }
    }

    pub fn width(&self) -> f64 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f64 {
        self.ury - self.lly
    }

    /// Clamp every edge of `self` into `bounds`.
    pub fn clamp_to(&self, bounds: &Rect) -> Rect {
        Rect {
            llx: self.llx.clamp(bounds.llx, bounds.urx),
            lly: self.lly.clamp(bounds.lly, bounds.ury),
            urx: self.urx.clamp(bounds.llx, bounds.urx),
            ury: self.ury.clamp(bounds.lly, bounds.ury),
        }
    }
}

/// A crop rectangle with positive size, contained in its page box.
///
/// Produced by [`resolve_rect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRect(Rect);

impl ResolvedRect {
    pub fn rect(&self) -> &Rect {
        &self.0
    }

    pub fn width(&self) -> f64 {
        self.0.width()
    }

    pub fn height(&self) -> f64 {
        self.0.height()
    }
}

/// Normalize a `/Rotate` value into 0, 90, 180, or 270.
///
/// Values that are not a multiple of 90 are treated as unrotated.
pub fn normalize_rotation(rotate: i64) -> u16 {
    match rotate.rem_euclid(360) {
        90 => 90,
        180 => 180,
        270 => 270,
        _ => 0,
    }
}

/// Geometry of one source page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBox {
    /// Effective box: the CropBox when present, else the MediaBox.
    pub bounds: Rect,
    /// The MediaBox, when the page (or an ancestor) declares one.
    pub media_box: Option<Rect>,
    /// Normalized `/Rotate` value.
    pub rotation: u16,
}

impl PageBox {
    pub fn new(bounds: Rect, media_box: Option<Rect>, rotation: i64) -> Self {
        Self {
            bounds,
            media_box,
            rotation: normalize_rotation(rotation),
        }
    }

    /// Width and height used for rotation compensation.
    ///
    /// Taken from the MediaBox; pages without one fall back to `rect`.
    pub fn rotation_base(&self, rect: &ResolvedRect) -> (f64, f64) {
        match self.media_box {
            Some(media) => (media.width(), media.height()),
            None => (rect.width(), rect.height()),
        }
    }
}

/// Map a normalized area onto a page box.
///
/// The result is clamped into `bounds`; it fails only when clamping leaves
/// no positive area.
pub fn resolve_rect(bounds: &Rect, area: &NormalizedArea) -> Result<ResolvedRect, TrimError> {
    let w = bounds.width();
    let h = bounds.height();

    let llx = bounds.llx + area.left() * w;
    let lly = bounds.ury - (area.top() + area.height()) * h;
    let raw = Rect {
        llx,
        lly,
        urx: llx + area.width() * w,
        ury: lly + area.height() * h,
    };

    let clamped = raw.clamp_to(bounds);
    if clamped.urx <= clamped.llx || clamped.ury <= clamped.lly {
        return Err(TrimError::RegionOutsidePage);
    }
    Ok(ResolvedRect(clamped))
}
