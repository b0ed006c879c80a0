//! Content stream rewriting for cropped pages.
//!
//! The rewritten stream wraps the original operators in a saved graphics
//! state, optionally undoes the page's `/Rotate`, and shifts the crop
//! rectangle's lower-left corner to the origin. Matrices are emitted in
//! the order `cm` operators concatenate: the rotation is written first so
//! the translation is expressed in the rotation-corrected frame.

use std::fmt::Write;

/// Affine matrix `[a b c d e f]` that compensates for a page rotation.
///
/// `width` and `height` are the unrotated page dimensions. Returns `None`
/// for rotation 0.
pub fn rotation_matrix(rotation: u16, width: f64, height: f64) -> Option<[f64; 6]> {
    match rotation {
        90 => Some([0.0, -1.0, 1.0, 0.0, 0.0, width]),
        180 => Some([-1.0, 0.0, 0.0, -1.0, width, height]),
        270 => Some([0.0, 1.0, -1.0, 0.0, height, 0.0]),
        _ => None,
    }
}

/// Build the content stream for a cropped page.
///
/// `base` is the (width, height) used for rotation compensation and
/// `translation` is typically `(-llx, -lly)` of the crop rectangle.
/// Translation components are written with five decimals.
pub fn rewrite_content(
    original: &[u8],
    rotation: u16,
    base: (f64, f64),
    translation: (f64, f64),
) -> Vec<u8> {
    let mut prefix = String::from("q\n");
    if let Some(m) = rotation_matrix(rotation, base.0, base.1) {
        let _ = writeln!(
            prefix,
            "{} {} {} {} {:.5} {:.5} cm",
            m[0] as i32,
            m[1] as i32,
            m[2] as i32,
            m[3] as i32,
            unsigned_zero(m[4]),
            unsigned_zero(m[5])
        );
    }
    let _ = writeln!(
        prefix,
        "1 0 0 1 {:.5} {:.5} cm",
        unsigned_zero(translation.0),
        unsigned_zero(translation.1)
    );

    // Newlines around the original guard against a trailing comment or a
    // token running into `Q`.
    let mut out = Vec::with_capacity(prefix.len() + original.len() + 3);
    out.extend_from_slice(prefix.as_bytes());
    out.extend_from_slice(original);
    out.extend_from_slice(b"\nQ\n");
    out
}

// `-0.0` would print as `-0.00000`.
fn unsigned_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

/// Apply a `[a b c d e f]` matrix to a point.
pub fn apply_matrix(m: &[f64; 6], x: f64, y: f64) -> (f64, f64) {
    (m[0] * x + m[2] * y + m[4], m[1] * x + m[3] * y + m[5])
}
