//! In-memory PDF fixtures for backend tests.

use lopdf::{Document, Object, ObjectId, Stream, StringFormat, dictionary};

/// Build a Letter-size PDF with `n` pages, each showing "Page N".
pub(crate) fn pdf_with_pages(n: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::with_capacity(n);
    for i in 0..n {
        let content = format!("BT /F1 12 Tf 72 720 Td (Page {}) Tj ET", i + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(font_id),
                },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => n as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// Single page whose MediaBox, Resources and Rotate live on the Pages root,
/// with content split over two streams.
pub(crate) fn pdf_with_inherited_attributes(rotate: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let first = doc.add_object(Stream::new(dictionary! {}, b"BT /F1 12 Tf".to_vec()));
    let second = doc.add_object(Stream::new(
        dictionary! {},
        b"72 720 Td (Inherited) Tj ET".to_vec(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => vec![Object::Reference(first), Object::Reference(second)],
        "Annots" => Vec::<Object>::new(),
        "StructParents" => 0,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Rotate" => rotate,
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(font_id),
                },
            },
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}

/// PDF standard padding bytes used in encryption key derivation.
const PAD_BYTES: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: Vec<u8> = (0..=255).collect();
    let mut j: usize = 0;
    for i in 0..256 {
        j = (j + s[i] as usize + key[i % key.len()] as usize) & 0xFF;
        s.swap(i, j);
    }
    let mut out = Vec::with_capacity(data.len());
    let (mut i, mut j) = (0usize, 0usize);
    for &byte in data {
        i = (i + 1) & 0xFF;
        j = (j + s[i] as usize) & 0xFF;
        s.swap(i, j);
        out.push(byte ^ s[(s[i] as usize + s[j] as usize) & 0xFF]);
    }
    out
}

/// One-page PDF encrypted with RC4 40-bit (V=1, R=2) under `user_password`.
pub(crate) fn create_encrypted_pdf(user_password: &[u8]) -> Vec<u8> {
    let file_id = b"scoretrimfixture";
    let permissions: i32 = -4;

    let pw_len = user_password.len().min(32);
    let mut padded = Vec::with_capacity(32);
    padded.extend_from_slice(&user_password[..pw_len]);
    padded.extend_from_slice(&PAD_BYTES[..32 - pw_len]);

    // Owner password equals the user password.
    let o_digest = md5::compute(&padded);
    let o_value = rc4(&o_digest[..5], &padded);

    let mut key_input = Vec::with_capacity(128);
    key_input.extend_from_slice(&padded);
    key_input.extend_from_slice(&o_value);
    key_input.extend_from_slice(&(permissions as u32).to_le_bytes());
    key_input.extend_from_slice(file_id);
    let key = md5::compute(&key_input)[..5].to_vec();
    let u_value = rc4(&key, &PAD_BYTES);

    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        b"BT /F1 12 Tf 72 720 Td (Locked) Tj ET".to_vec(),
    ));
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Contents" => Object::Reference(content_id),
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        },
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => 1_i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    for (&(num, generation), obj) in doc.objects.iter_mut() {
        let mut obj_key_input = Vec::with_capacity(10);
        obj_key_input.extend_from_slice(&key);
        obj_key_input.extend_from_slice(&num.to_le_bytes()[..3]);
        obj_key_input.extend_from_slice(&generation.to_le_bytes()[..2]);
        let digest = md5::compute(&obj_key_input);
        let obj_key = &digest[..(key.len() + 5).min(16)];

        match obj {
            Object::Stream(stream) => {
                let encrypted = rc4(obj_key, &stream.content);
                stream.set_content(encrypted);
            }
            Object::String(content, _) => *content = rc4(obj_key, content),
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
    doc.trailer.set("Encrypt", Object::Reference(encrypt_id));
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(file_id.to_vec(), StringFormat::Literal),
            Object::String(file_id.to_vec(), StringFormat::Literal),
        ]),
    );

    let mut buf = Vec::new();
    doc.save_to(&mut buf)
        .expect("failed to save encrypted test PDF");
    buf
}

/// Page count and the first page's MediaBox of `bytes`.
pub(crate) fn inspect(bytes: &[u8]) -> (usize, Vec<f64>) {
    let doc = Document::load_mem(bytes).expect("output should parse");
    let pages = doc.get_pages();
    let first = *pages.values().next().expect("at least one page");
    let media = doc
        .get_dictionary(first)
        .and_then(|d| d.get(b"MediaBox"))
        .and_then(|o| o.as_array())
        .expect("MediaBox")
        .iter()
        .map(|o| match o {
            Object::Integer(i) => *i as f64,
            Object::Real(f) => *f as f64,
            other => panic!("non-numeric box entry {other:?}"),
        })
        .collect();
    (pages.len(), media)
}
