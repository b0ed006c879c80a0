use scoretrim_core::{CropArea, PageSetting};

/// One trim job: the source document plus the regions to keep.
///
/// `areas` is the default area list applied to every selected page;
/// `page_settings` replaces it on individual pages. `include_pages` is a
/// list of 1-based page numbers; empty means every page.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct TrimRequest {
    /// Raw source PDF bytes. Never serialized.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pdf: Vec<u8>,
    pub password: Option<String>,
    pub title: String,
    pub areas: Vec<Option<CropArea>>,
    pub include_pages: Vec<i64>,
    pub page_settings: Vec<PageSetting>,
}

impl TrimRequest {
    pub fn new(pdf: Vec<u8>) -> Self {
        Self {
            pdf,
            ..Self::default()
        }
    }

    pub fn with_areas(mut self, areas: impl IntoIterator<Item = CropArea>) -> Self {
        self.areas = areas.into_iter().map(Some).collect();
        self
    }

    pub fn with_pages(mut self, pages: impl IntoIterator<Item = i64>) -> Self {
        self.include_pages = pages.into_iter().collect();
        self
    }

    pub fn with_page_setting(mut self, setting: PageSetting) -> Self {
        self.page_settings.push(setting);
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Result of a successful trim.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct TrimOutput {
    #[cfg_attr(feature = "serde", serde(skip))]
    pub pdf: Vec<u8>,
    /// Human-readable status line.
    pub message: String,
    /// Suggested download filename.
    pub filename: String,
    /// Number of pages in `pdf`.
    pub segment_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_fields() {
        let req = TrimRequest::new(vec![1, 2, 3])
            .with_areas([CropArea::full_page()])
            .with_pages([2, 1])
            .with_password("pw")
            .with_title("Nocturne")
            .with_page_setting(PageSetting::new(2, vec![CropArea::full_page()]));

        assert_eq!(req.pdf, vec![1, 2, 3]);
        assert_eq!(req.areas, vec![Some(CropArea::full_page())]);
        assert_eq!(req.include_pages, vec![2, 1]);
        assert_eq!(req.password.as_deref(), Some("pw"));
        assert_eq!(req.title, "Nocturne");
        assert_eq!(req.page_settings.len(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn request_deserializes_from_camel_case_json() {
        let json = r#"{
            "title": "Etude",
            "areas": [{"top": 0.1, "left": 0.0, "width": 1.0, "height": 0.3}, null],
            "includePages": [1, 3],
            "pageSettings": [{"pageNumber": 2, "areas": [{"top": 0, "left": 0, "width": 1, "height": 1}]}]
        }"#;
        let req: TrimRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.title, "Etude");
        assert_eq!(req.areas.len(), 2);
        assert!(req.areas[1].is_none());
        assert_eq!(req.include_pages, vec![1, 3]);
        assert_eq!(req.page_settings[0].page_number, 2);
        assert!(req.pdf.is_empty());
    }
}
