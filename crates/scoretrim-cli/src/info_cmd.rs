use std::path::Path;

use scoretrim::TrimError;
use scoretrim::scoretrim_core::Rect;
use scoretrim::scoretrim_parse::SourceDocument;

use crate::cli::InfoFormat;
use crate::shared::{read_pdf, report_error};

fn format_rect(r: &Rect) -> String {
    format!("[{:.2}, {:.2}, {:.2}, {:.2}]", r.llx, r.lly, r.urx, r.ury)
}

fn rect_to_json(r: &Rect) -> serde_json::Value {
    serde_json::json!([r.llx, r.lly, r.urx, r.ury])
}

pub fn run(file: &Path, password: Option<&str>, format: &InfoFormat) -> Result<(), i32> {
    let bytes = read_pdf(file)?;
    let source = SourceDocument::open(&bytes, password)
        .map_err(|e| report_error(&TrimError::from(e)))?;
    let page_count = source.page_count();

    let mut page_infos: Vec<serde_json::Value> = Vec::new();

    for page in 1..=page_count {
        let page_box = source
            .page_box(page)
            .map_err(|e| report_error(&TrimError::from(e)))?;
        let bounds = page_box.bounds;

        match format {
            InfoFormat::Text => {
                println!("Page {page}:");
                println!("  Dimensions: {:.2} x {:.2}", bounds.width(), bounds.height());
                println!("  Rotation: {}", page_box.rotation);
                println!("  Box: {}", format_rect(&bounds));
                if let Some(ref media) = page_box.media_box {
                    println!("  MediaBox: {}", format_rect(media));
                }
            }
            InfoFormat::Json => {
                let mut page_json = serde_json::json!({
                    "page": page,
                    "width": bounds.width(),
                    "height": bounds.height(),
                    "rotation": page_box.rotation,
                    "box": rect_to_json(&bounds),
                });
                if let Some(ref media) = page_box.media_box {
                    page_json["media_box"] = rect_to_json(media);
                }
                page_infos.push(page_json);
            }
        }
    }

    match format {
        InfoFormat::Text => {
            println!();
            println!("Pages: {page_count}");
        }
        InfoFormat::Json => {
            let output = serde_json::json!({
                "pages": page_count,
                "page_info": page_infos,
            });
            println!("{}", serde_json::to_string_pretty(&output).unwrap_or_default());
        }
    }

    Ok(())
}
