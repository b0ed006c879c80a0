//! Page box and rotation lookup with page-tree inheritance.

use lopdf::{Document, Object, ObjectId};
use scoretrim_core::{PageBox, Rect, TrimError};

use crate::error::BackendError;

/// Follow a reference to the object it points at.
pub(crate) fn deref<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, BackendError> {
    match obj {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| BackendError::Parse(format!("dangling reference {id:?}: {e}"))),
        other => Ok(other),
    }
}

/// Look up a key in the page dictionary, walking up the page tree (via
/// /Parent) when the page itself does not declare it.
///
/// Returns `None` if the key is not found anywhere in the tree.
pub(crate) fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, BackendError> {
    let mut current_id = page_id;
    // Guard against /Parent cycles in malformed trees.
    for _ in 0..64 {
        let dict = doc
            .get_object(current_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| BackendError::Parse(format!("failed to get page dictionary: {e}")))?;

        if let Ok(value) = dict.get(key) {
            return deref(doc, value).map(Some);
        }

        match dict.get(b"Parent") {
            Ok(parent) => {
                current_id = parent
                    .as_reference()
                    .map_err(|e| BackendError::Parse(format!("invalid /Parent reference: {e}")))?;
            }
            Err(_) => return Ok(None),
        }
    }
    Err(BackendError::Parse("page tree is too deep".to_string()))
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &Object) -> Result<f64, BackendError> {
    match obj {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(f) => Ok(*f as f64),
        _ => Err(BackendError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Read a `[x0 y0 x1 y1]` box array into a [`Rect`].
fn rect_from_object(doc: &Document, obj: &Object) -> Result<Rect, BackendError> {
    let array = obj
        .as_array()
        .map_err(|e| BackendError::Parse(format!("page box is not an array: {e}")))?;
    if array.len() != 4 {
        return Err(BackendError::Parse(format!(
            "expected 4-element array for box, got {}",
            array.len()
        )));
    }
    let mut v = [0.0; 4];
    for (slot, item) in v.iter_mut().zip(array) {
        *slot = object_to_f64(deref(doc, item)?)?;
    }
    Ok(Rect::from_corners(v[0], v[1], v[2], v[3]))
}

fn inherited_rect(
    doc: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<Rect>, BackendError> {
    resolve_inherited(doc, page_id, key)?
        .map(|obj| rect_from_object(doc, obj))
        .transpose()
}

/// Resolve a page's effective box, MediaBox and rotation.
///
/// The effective box is the CropBox when present, else the MediaBox.
pub fn read_page_box(
    doc: &Document,
    page_id: ObjectId,
    page_number: u32,
) -> Result<PageBox, BackendError> {
    let media_box = inherited_rect(doc, page_id, b"MediaBox")?;
    let crop_box = inherited_rect(doc, page_id, b"CropBox")?;

    let bounds = crop_box
        .or(media_box)
        .ok_or(TrimError::MissingPageGeometry { page: page_number })?;

    let rotation = match resolve_inherited(doc, page_id, b"Rotate")? {
        Some(obj) => obj.as_i64().unwrap_or(0),
        None => 0,
    };

    Ok(PageBox::new(bounds, media_box, rotation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Pages root with the given attributes and one kid with its own.
    fn tree(
        root_attrs: lopdf::Dictionary,
        page_attrs: lopdf::Dictionary,
    ) -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
        };
        for (k, v) in page_attrs.iter() {
            page.set(k.clone(), v.clone());
        }
        let page_id = doc.add_object(page);

        let mut root = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
        };
        for (k, v) in root_attrs.iter() {
            root.set(k.clone(), v.clone());
        }
        doc.objects.insert(pages_id, Object::Dictionary(root));
        (doc, page_id)
    }

    fn letter() -> Object {
        vec![0.into(), 0.into(), 612.into(), 792.into()].into()
    }

    #[test]
    fn media_box_on_page() {
        let (doc, page_id) = tree(dictionary! {}, dictionary! { "MediaBox" => letter() });
        let pb = read_page_box(&doc, page_id, 1).unwrap();
        assert_eq!(pb.bounds, Rect::new(0.0, 0.0, 612.0, 792.0));
        assert_eq!(pb.media_box, Some(pb.bounds));
        assert_eq!(pb.rotation, 0);
    }

    #[test]
    fn crop_box_wins_over_media_box() {
        let crop: Object = vec![
            Object::Real(36.0),
            Object::Real(36.0),
            Object::Real(576.0),
            Object::Real(756.0),
        ]
        .into();
        let (doc, page_id) = tree(
            dictionary! {},
            dictionary! { "MediaBox" => letter(), "CropBox" => crop },
        );
        let pb = read_page_box(&doc, page_id, 1).unwrap();
        assert_eq!(pb.bounds, Rect::new(36.0, 36.0, 576.0, 756.0));
        assert_eq!(pb.media_box, Some(Rect::new(0.0, 0.0, 612.0, 792.0)));
    }

    #[test]
    fn media_box_and_rotate_inherited_from_parent() {
        let (doc, page_id) = tree(
            dictionary! { "MediaBox" => letter(), "Rotate" => 90 },
            dictionary! {},
        );
        let pb = read_page_box(&doc, page_id, 1).unwrap();
        assert_eq!(pb.bounds.width(), 612.0);
        assert_eq!(pb.rotation, 90);
    }

    #[test]
    fn page_rotate_overrides_parent() {
        let (doc, page_id) = tree(
            dictionary! { "MediaBox" => letter(), "Rotate" => 90 },
            dictionary! { "Rotate" => -90 },
        );
        assert_eq!(read_page_box(&doc, page_id, 1).unwrap().rotation, 270);
    }

    #[test]
    fn reversed_box_corners_are_normalized() {
        let reversed: Object = vec![612.into(), 792.into(), 0.into(), 0.into()].into();
        let (doc, page_id) = tree(dictionary! {}, dictionary! { "MediaBox" => reversed });
        let pb = read_page_box(&doc, page_id, 1).unwrap();
        assert_eq!(pb.bounds, Rect::new(0.0, 0.0, 612.0, 792.0));
    }

    #[test]
    fn indirect_media_box_is_followed() {
        let mut doc = Document::with_version("1.7");
        let box_id = doc.add_object(letter());
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => Object::Reference(box_id),
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let pb = read_page_box(&doc, page_id, 1).unwrap();
        assert_eq!(pb.bounds.height(), 792.0);
    }

    #[test]
    fn missing_geometry_names_page() {
        let (doc, page_id) = tree(dictionary! {}, dictionary! {});
        let err: TrimError = read_page_box(&doc, page_id, 7).unwrap_err().into();
        assert_eq!(err, TrimError::MissingPageGeometry { page: 7 });
    }

    #[test]
    fn short_box_array_is_parse_error() {
        let bad: Object = vec![0.into(), 0.into(), 612.into()].into();
        let (doc, page_id) = tree(dictionary! {}, dictionary! { "MediaBox" => bad });
        assert!(matches!(
            read_page_box(&doc, page_id, 1).unwrap_err(),
            BackendError::Parse(_)
        ));
    }
}
