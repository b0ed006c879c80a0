//! Shared fixtures for scoretrim integration tests.
//!
//! Every fixture is built in memory with lopdf; no files on disk.

#![allow(dead_code)]

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};

pub const LETTER: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Options for one fixture page.
#[derive(Debug, Clone)]
pub struct PageSpec {
    pub media_box: Option<[f64; 4]>,
    pub crop_box: Option<[f64; 4]>,
    pub rotate: Option<i64>,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            media_box: Some(LETTER),
            crop_box: None,
            rotate: None,
        }
    }
}

fn box_object(b: [f64; 4]) -> Object {
    Object::Array(b.iter().map(|&v| Object::Real(v as f32)).collect())
}

fn build_document(specs: &[PageSpec]) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::with_capacity(specs.len());
    for (i, spec) in specs.iter().enumerate() {
        let content = format!("BT /F1 24 Tf 72 700 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));

        let mut page = Dictionary::new();
        page.set("Type", "Page");
        page.set("Parent", pages_id);
        page.set("Contents", content_id);
        page.set(
            "Resources",
            dictionary! { "Font" => dictionary! { "F1" => font_id } },
        );
        if let Some(media) = spec.media_box {
            page.set("MediaBox", box_object(media));
        }
        if let Some(crop) = spec.crop_box {
            page.set("CropBox", box_object(crop));
        }
        if let Some(rotate) = spec.rotate {
            page.set("Rotate", rotate);
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => specs.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// Letter-size PDF with `n` pages showing "Page 1" .. "Page n".
pub fn letter_pdf(n: usize) -> Vec<u8> {
    save(build_document(&vec![PageSpec::default(); n]))
}

/// PDF with one page per [`PageSpec`].
pub fn pdf_with_specs(specs: &[PageSpec]) -> Vec<u8> {
    save(build_document(specs))
}

const PAD_BYTES: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: Vec<u8> = (0..=255).collect();
    let mut j = 0usize;
    for i in 0..256 {
        j = (j + s[i] as usize + key[i % key.len()] as usize) & 0xFF;
        s.swap(i, j);
    }
    let (mut i, mut j) = (0usize, 0usize);
    data.iter()
        .map(|&byte| {
            i = (i + 1) & 0xFF;
            j = (j + s[i] as usize) & 0xFF;
            s.swap(i, j);
            byte ^ s[(s[i] as usize + s[j] as usize) & 0xFF]
        })
        .collect()
}

/// `n` Letter pages encrypted with RC4 40-bit under `password`.
pub fn encrypted_letter_pdf(n: usize, password: &[u8]) -> Vec<u8> {
    let file_id = b"scoretrim-itest!";
    let permissions: i32 = -4;

    let len = password.len().min(32);
    let mut padded = password[..len].to_vec();
    padded.extend_from_slice(&PAD_BYTES[..32 - len]);

    let o_value = rc4(&md5::compute(&padded)[..5], &padded);
    let mut key_input = padded.clone();
    key_input.extend_from_slice(&o_value);
    key_input.extend_from_slice(&(permissions as u32).to_le_bytes());
    key_input.extend_from_slice(file_id);
    let key = md5::compute(&key_input)[..5].to_vec();
    let u_value = rc4(&key, &PAD_BYTES);

    let mut doc = build_document(&vec![PageSpec::default(); n]);
    for (&(num, generation), obj) in doc.objects.iter_mut() {
        let mut object_key = key.clone();
        object_key.extend_from_slice(&num.to_le_bytes()[..3]);
        object_key.extend_from_slice(&generation.to_le_bytes()[..2]);
        let digest = md5::compute(&object_key);
        let object_key = &digest[..10];
        match obj {
            Object::Stream(stream) => {
                let encrypted = rc4(object_key, &stream.content);
                stream.set_content(encrypted);
            }
            Object::String(bytes, _) => *bytes = rc4(object_key, bytes),
            _ => {}
        }
    }

    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1_i64,
        "R" => 2_i64,
        "Length" => 40_i64,
        "O" => Object::String(o_value, StringFormat::Literal),
        "U" => Object::String(u_value, StringFormat::Literal),
        "P" => permissions as i64,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::String(file_id.to_vec(), StringFormat::Literal),
            Object::String(file_id.to_vec(), StringFormat::Literal),
        ],
    );
    save(doc)
}

fn number(o: &Object) -> f64 {
    match o {
        Object::Integer(i) => *i as f64,
        Object::Real(f) => f64::from(*f),
        other => panic!("non-numeric box entry {other:?}"),
    }
}

/// Parsed view of an output document.
pub struct Output {
    pub doc: Document,
    pub page_ids: Vec<ObjectId>,
}

impl Output {
    pub fn load(bytes: &[u8]) -> Self {
        let doc = Document::load_mem(bytes).expect("output should parse");
        let page_ids = doc.get_pages().values().copied().collect();
        Self { doc, page_ids }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    pub fn page(&self, index: usize) -> &Dictionary {
        self.doc.get_dictionary(self.page_ids[index]).expect("page dictionary")
    }

    pub fn media_box(&self, index: usize) -> [f64; 4] {
        self.page_box(index, b"MediaBox").expect("MediaBox")
    }

    pub fn page_box(&self, index: usize, key: &[u8]) -> Option<[f64; 4]> {
        let arr = self.page(index).get(key).ok()?.as_array().ok()?;
        Some([number(&arr[0]), number(&arr[1]), number(&arr[2]), number(&arr[3])])
    }

    /// Size of page `index` as (width, height).
    pub fn size(&self, index: usize) -> (f64, f64) {
        let b = self.media_box(index);
        (b[2] - b[0], b[3] - b[1])
    }

    /// Decoded content of page `index`.
    pub fn content(&self, index: usize) -> String {
        let bytes = self
            .doc
            .get_page_content(self.page_ids[index])
            .expect("page content");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-2,
        "expected {expected}, got {actual}"
    );
}
