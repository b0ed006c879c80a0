//! Merging segments into the output document.

use lopdf::{Document, Object, ObjectId, dictionary};
use scoretrim_core::{Stage, TrimError};
use tracing::{debug, instrument};

use crate::error::BackendError;

/// Concatenate single-page segments into one PDF, in list order.
///
/// A single segment is returned as is, byte for byte.
#[instrument(skip_all, fields(segments = segments.len()))]
pub fn assemble(segments: Vec<Vec<u8>>) -> Result<Vec<u8>, BackendError> {
    if segments.is_empty() {
        return Err(TrimError::NoSegments.into());
    }
    if segments.len() == 1 {
        return Ok(segments.into_iter().next().unwrap_or_default());
    }

    let mut output = Document::with_version("1.7");
    let mut kids: Vec<ObjectId> = Vec::with_capacity(segments.len());
    let mut next_id: u32 = 1;

    for (i, bytes) in segments.iter().enumerate() {
        let mut doc = Document::load_mem(bytes).map_err(|e| {
            BackendError::document(Stage::Assemble, format!("failed to load segment {}: {e}", i + 1))
        })?;
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        kids.extend(doc.get_pages().into_values());

        for (id, object) in doc.objects {
            let tree_node = matches!(object.type_name(), Ok(b"Catalog") | Ok(b"Pages"));
            if !tree_node {
                output.objects.insert(id, object);
            }
        }
    }

    output.max_id = next_id;
    let pages_id = output.new_object_id();

    for &kid in &kids {
        let page = output
            .get_object_mut(kid)
            .and_then(|o| o.as_dict_mut())
            .map_err(|e| BackendError::document(Stage::Assemble, format!("segment page {kid:?}: {e}")))?;
        page.set("Parent", pages_id);
    }

    let count = kids.len();
    output.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => count as i64,
        }),
    );
    let catalog_id = output.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    output.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    output
        .save_to(&mut bytes)
        .map_err(|e| BackendError::document(Stage::Serialize, e.to_string()))?;

    debug!(pages = count, bytes = bytes.len(), "assembled output document");
    Ok(bytes)
}
