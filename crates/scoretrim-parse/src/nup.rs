//! N-up layout: packing pages into a grid on larger landscape sheets.
//!
//! Each source page becomes a Form XObject drawn into its grid cell,
//! scaled to fit and centred. Cells fill left to right, then top to
//! bottom; the last sheet may be partially filled.

use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use scoretrim_core::{Stage, TrimError};
use tracing::{debug, instrument};

use crate::error::BackendError;
use crate::page_box::{read_page_box, resolve_inherited};
use crate::segment::{ObjectCopier, page_content};

/// A4 landscape width in points.
pub const A4_LANDSCAPE_WIDTH: f64 = 842.0;
/// A4 landscape height in points.
pub const A4_LANDSCAPE_HEIGHT: f64 = 595.0;

/// Grid and sheet geometry for [`layout_n_up`].
#[derive(Debug, Clone, PartialEq)]
pub struct NUpOptions {
    pub cols: u32,
    pub rows: u32,
    /// Sheet width in points.
    pub page_width: f64,
    /// Sheet height in points.
    pub page_height: f64,
    /// Blank border around the grid.
    pub margin: f64,
    /// Space between adjacent cells.
    pub gap: f64,
    /// Flate-compress the output streams.
    pub compress: bool,
}

impl Default for NUpOptions {
    fn default() -> Self {
        Self {
            cols: 2,
            rows: 2,
            page_width: A4_LANDSCAPE_WIDTH,
            page_height: A4_LANDSCAPE_HEIGHT,
            margin: 18.0,
            gap: 12.0,
            compress: true,
        }
    }
}

impl NUpOptions {
    /// Default sheet with a `cols` x `rows` grid.
    pub fn grid(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            ..Self::default()
        }
    }

    pub fn per_sheet(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    fn cell_size(&self) -> Result<(f64, f64), TrimError> {
        if self.cols == 0 || self.rows == 0 {
            return Err(TrimError::InvalidLayout(format!(
                "grid {}x{} has no cells",
                self.cols, self.rows
            )));
        }
        if self.margin < 0.0 || self.gap < 0.0 {
            return Err(TrimError::InvalidLayout(
                "margin and gap must not be negative".to_string(),
            ));
        }
        let cols = f64::from(self.cols);
        let rows = f64::from(self.rows);
        let cell_w = (self.page_width - 2.0 * self.margin - (cols - 1.0) * self.gap) / cols;
        let cell_h = (self.page_height - 2.0 * self.margin - (rows - 1.0) * self.gap) / rows;
        if !(cell_w > 0.0 && cell_h > 0.0) {
            return Err(TrimError::InvalidLayout(format!(
                "a {}x{} grid does not fit on a {}x{} sheet",
                self.cols, self.rows, self.page_width, self.page_height
            )));
        }
        Ok((cell_w, cell_h))
    }
}

/// Scale factor that fits a `w` x `h` page into a `cell_w` x `cell_h` cell.
fn fit_scale(w: f64, h: f64, cell_w: f64, cell_h: f64) -> f64 {
    (cell_w / w).min(cell_h / h)
}

/// Re-lay the pages of `bytes` onto `cols` x `rows` sheets.
#[instrument(skip_all, fields(bytes_len = bytes.len(), cols = options.cols, rows = options.rows))]
pub fn layout_n_up(bytes: &[u8], options: &NUpOptions) -> Result<Vec<u8>, BackendError> {
    let (cell_w, cell_h) = options.cell_size()?;

    let source = Document::load_mem(bytes)
        .map_err(|e| BackendError::Parse(format!("failed to parse PDF: {e}")))?;
    let pages: Vec<(u32, lopdf::ObjectId)> = source.get_pages().into_iter().collect();
    if pages.is_empty() {
        return Err(TrimError::EmptyDocument.into());
    }

    let mut output = Document::with_version("1.7");
    let pages_id = output.new_object_id();
    let mut copier = ObjectCopier::new(&source);
    let mut sheets = Vec::new();

    for chunk in pages.chunks(options.per_sheet()) {
        let mut xobjects = Dictionary::new();
        let mut ops = String::new();

        for (slot, &(page_number, page_id)) in chunk.iter().enumerate() {
            let layout_err = move |msg: String| BackendError::page(page_number, Stage::Layout, msg);
            let page_box = read_page_box(&source, page_id, page_number)?;
            let bounds = page_box.bounds;
            let page = source
                .get_dictionary(page_id)
                .map_err(|e| layout_err(format!("missing page dictionary: {e}")))?;
            let content = page_content(&source, page).map_err(layout_err)?;

            let mut form = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "FormType" => 1,
                "BBox" => vec![
                    Object::Real(bounds.llx as f32),
                    Object::Real(bounds.lly as f32),
                    Object::Real(bounds.urx as f32),
                    Object::Real(bounds.ury as f32),
                ],
            };
            if let Some(resources) = resolve_inherited(&source, page_id, b"Resources")? {
                form.set(
                    "Resources",
                    copier.copy(&mut output, resources).map_err(layout_err)?,
                );
            }
            let form_id = output.add_object(Stream::new(form, content));
            let name = format!("P{slot}");
            xobjects.set(name.as_bytes(), form_id);

            let col = slot as u32 % options.cols;
            let row = slot as u32 / options.cols;
            let cell_x = options.margin + f64::from(col) * (cell_w + options.gap);
            let cell_y = options.page_height
                - options.margin
                - f64::from(row + 1) * cell_h
                - f64::from(row) * options.gap;

            let scale = fit_scale(bounds.width(), bounds.height(), cell_w, cell_h);
            let tx = cell_x + (cell_w - bounds.width() * scale) / 2.0 - bounds.llx * scale;
            let ty = cell_y + (cell_h - bounds.height() * scale) / 2.0 - bounds.lly * scale;
            ops.push_str(&format!(
                "q {scale:.5} 0 0 {scale:.5} {tx:.5} {ty:.5} cm /{name} Do Q\n"
            ));
        }

        let content_id = output.add_object(Stream::new(dictionary! {}, ops.into_bytes()));
        let sheet_id = output.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(options.page_width as f32),
                Object::Real(options.page_height as f32),
            ],
            "Resources" => dictionary! { "XObject" => xobjects },
            "Contents" => content_id,
        });
        sheets.push(Object::Reference(sheet_id));
    }

    let count = sheets.len();
    output.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => sheets,
            "Count" => count as i64,
        }),
    );
    let catalog_id = output.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    output.trailer.set("Root", catalog_id);

    if options.compress {
        output.compress();
    }

    let mut out = Vec::new();
    output
        .save_to(&mut out)
        .map_err(|e| BackendError::document(Stage::Serialize, e.to_string()))?;

    debug!(source_pages = pages.len(), sheets = count, "laid out N-up document");
    Ok(out)
}
