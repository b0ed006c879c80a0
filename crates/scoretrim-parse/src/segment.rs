//! Extraction of one crop region into a standalone single-page PDF.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use scoretrim_core::{PageBox, ResolvedRect, Stage, TrimError, TrimOptions, rewrite_content};
use tracing::{debug, instrument};

use crate::document::SourceDocument;
use crate::error::BackendError;
use crate::page_box::resolve_inherited;

/// Page keys not carried into a segment. Boxes, rotation and contents are
/// rewritten; the rest reference the old page tree or page frame.
const DROPPED_PAGE_KEYS: &[&[u8]] = &[
    b"Type",
    b"Parent",
    b"Annots",
    b"B",
    b"StructParents",
    b"Thumb",
    b"MediaBox",
    b"CropBox",
    b"TrimBox",
    b"BleedBox",
    b"ArtBox",
    b"Rotate",
    b"Contents",
];

/// Copies objects from a source document into a target, following
/// references and reusing objects already copied.
pub(crate) struct ObjectCopier<'a> {
    source: &'a Document,
    cache: HashMap<ObjectId, ObjectId>,
}

impl<'a> ObjectCopier<'a> {
    pub(crate) fn new(source: &'a Document) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    /// Deep copy `obj` into `target`.
    ///
    /// References to page tree nodes and the catalog become null so a
    /// stray back-reference cannot drag the whole source document along.
    pub(crate) fn copy(&mut self, target: &mut Document, obj: &Object) -> Result<Object, String> {
        match obj {
            Object::Reference(id) => {
                if let Some(&new_id) = self.cache.get(id) {
                    return Ok(Object::Reference(new_id));
                }
                let referenced = self
                    .source
                    .get_object(*id)
                    .map_err(|e| format!("missing object {id:?}: {e}"))?;
                if matches!(
                    referenced.type_name(),
                    Ok(b"Page") | Ok(b"Pages") | Ok(b"Catalog")
                ) {
                    return Ok(Object::Null);
                }

                // Reserve the id first so cycles resolve to it.
                let new_id = target.new_object_id();
                self.cache.insert(*id, new_id);
                let copied = self.copy(target, referenced)?;
                target.objects.insert(new_id, copied);
                Ok(Object::Reference(new_id))
            }
            Object::Dictionary(dict) => Ok(Object::Dictionary(self.copy_dict(target, dict)?)),
            Object::Array(items) => {
                let mut copied = Vec::with_capacity(items.len());
                for item in items {
                    copied.push(self.copy(target, item)?);
                }
                Ok(Object::Array(copied))
            }
            Object::Stream(stream) => {
                let mut copied = stream.clone();
                copied.dict = self.copy_dict(target, &stream.dict)?;
                Ok(Object::Stream(copied))
            }
            _ => Ok(obj.clone()),
        }
    }

    fn copy_dict(&mut self, target: &mut Document, dict: &Dictionary) -> Result<Dictionary, String> {
        let mut copied = Dictionary::new();
        for (key, value) in dict.iter() {
            copied.set(key.clone(), self.copy(target, value)?);
        }
        Ok(copied)
    }
}

/// Decoded content of a page; array contents are joined with newlines.
pub(crate) fn page_content(doc: &Document, page: &Dictionary) -> Result<Vec<u8>, String> {
    let contents = match page.get(b"Contents") {
        Ok(contents) => contents,
        Err(_) => return Ok(Vec::new()),
    };

    let ids: Vec<ObjectId> = match contents {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.iter().filter_map(|o| o.as_reference().ok()).collect(),
            _ => vec![*id],
        },
        Object::Array(items) => items.iter().filter_map(|o| o.as_reference().ok()).collect(),
        _ => return Err("page /Contents is neither a stream nor an array".to_string()),
    };

    let mut out = Vec::new();
    for (i, id) in ids.iter().enumerate() {
        let stream = doc
            .get_object(*id)
            .and_then(|o| o.as_stream())
            .map_err(|e| format!("content stream {id:?}: {e}"))?;
        if i > 0 {
            out.push(b'\n');
        }
        match stream.decompressed_content() {
            Ok(content) => out.extend_from_slice(&content),
            Err(_) => out.extend_from_slice(&stream.content),
        }
    }
    Ok(out)
}

/// Produce a one-page PDF showing `rect` of page `page_number`.
///
/// The new page spans `[0 0 w h]`, carries no `/Rotate`, and its content
/// is the original content re-anchored so `rect`'s lower-left corner sits
/// at the origin. Inherited resources are materialised on the page.
#[instrument(skip(source, page_box, rect, options), fields(page = page_number))]
pub fn extract_segment(
    source: &SourceDocument,
    page_number: u32,
    page_box: &PageBox,
    rect: &ResolvedRect,
    options: &TrimOptions,
) -> Result<Vec<u8>, BackendError> {
    let width = rect.width();
    let height = rect.height();
    if width <= 0.0 || height <= 0.0 {
        return Err(TrimError::ZeroSizeRegion.into());
    }

    let src = source.inner();
    let page_id = source.page_id(page_number)?;
    let page_dict = src.get_dictionary(page_id).map_err(|e| {
        BackendError::page(page_number, Stage::Extract, format!("missing page dictionary: {e}"))
    })?;

    let original = page_content(src, page_dict)
        .map_err(|msg| BackendError::page(page_number, Stage::Extract, msg))?;

    let mut out = Document::with_version("1.7");
    let pages_id = out.new_object_id();
    let mut copier = ObjectCopier::new(src);
    let extract_err = move |msg: String| BackendError::page(page_number, Stage::Extract, msg);

    let mut new_page = Dictionary::new();
    for (key, value) in page_dict.iter() {
        if DROPPED_PAGE_KEYS.contains(&key.as_slice()) {
            continue;
        }
        new_page.set(key.clone(), copier.copy(&mut out, value).map_err(extract_err)?);
    }
    if !new_page.has(b"Resources") {
        let inherited = resolve_inherited(src, page_id, b"Resources")
            .map_err(|e| extract_err(e.to_string()))?;
        if let Some(resources) = inherited {
            new_page.set(
                "Resources",
                copier.copy(&mut out, resources).map_err(extract_err)?,
            );
        }
    }

    let page_rect: Vec<Object> = vec![
        Object::Real(0.0),
        Object::Real(0.0),
        Object::Real(width as f32),
        Object::Real(height as f32),
    ];
    new_page.set("Type", "Page");
    new_page.set("Parent", pages_id);
    new_page.set("MediaBox", page_rect.clone());
    new_page.set("CropBox", page_rect);

    let r = rect.rect();
    let content = rewrite_content(
        &original,
        page_box.rotation,
        page_box.rotation_base(rect),
        (-r.llx, -r.lly),
    );
    let content_id = out.add_object(Stream::new(dictionary! {}, content));
    new_page.set("Contents", content_id);

    let new_page_id = out.add_object(new_page);
    out.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(new_page_id)],
            "Count" => 1,
        }),
    );
    let catalog_id = out.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    out.trailer.set("Root", catalog_id);

    if options.compress {
        out.compress();
    }

    let mut bytes = Vec::new();
    out.save_to(&mut bytes)
        .map_err(|e| BackendError::page(page_number, Stage::Serialize, e.to_string()))?;

    debug!(
        width,
        height,
        rotation = page_box.rotation,
        bytes = bytes.len(),
        "extracted segment"
    );
    Ok(bytes)
}
