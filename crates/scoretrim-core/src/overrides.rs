//! Per-page crop area overrides.
//!
//! Built once per request into an immutable map; extraction only reads it.

use std::collections::BTreeMap;

use crate::area::{AreaSet, CropArea, normalize_areas};
use crate::error::TrimError;

/// Areas supplied for one specific page, replacing the defaults there.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct PageSetting {
    /// 1-based page number.
    pub page_number: i64,
    pub areas: Vec<Option<CropArea>>,
}

impl PageSetting {
    pub fn new(page_number: i64, areas: Vec<CropArea>) -> Self {
        Self {
            page_number,
            areas: areas.into_iter().map(Some).collect(),
        }
    }
}

/// Page number to non-empty [`AreaSet`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageOverrides(BTreeMap<u32, AreaSet>);

impl PageOverrides {
    /// Normalize each setting's areas and index them by page.
    ///
    /// Settings whose area list is empty are dropped. When a page appears
    /// more than once the last setting wins.
    pub fn build(settings: &[PageSetting]) -> Result<Self, TrimError> {
        let mut map = BTreeMap::new();
        for setting in settings {
            if setting.page_number < 1 {
                return Err(TrimError::InvalidPageNumber {
                    page: setting.page_number,
                });
            }
            let page = u32::try_from(setting.page_number).map_err(|_| {
                TrimError::InvalidPageNumber {
                    page: setting.page_number,
                }
            })?;

            let areas = normalize_areas(&setting.areas)?;
            if areas.is_empty() {
                continue;
            }
            map.insert(page, areas);
        }
        Ok(Self(map))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, page: u32) -> Option<&AreaSet> {
        self.0.get(&page)
    }

    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    /// Fail if any override names a page past the end of the document.
    pub fn validate_against(&self, page_count: u32) -> Result<(), TrimError> {
        match self.0.keys().find(|&&page| page > page_count) {
            Some(&page) => Err(TrimError::OverrideOutOfRange { page }),
            None => Ok(()),
        }
    }

    /// The areas to use for `page`: its override, else `default` when non-empty.
    pub fn effective<'a>(&'a self, page: u32, default: &'a AreaSet) -> Result<&'a AreaSet, TrimError> {
        if let Some(areas) = self.0.get(&page) {
            return Ok(areas);
        }
        if default.is_empty() {
            return Err(TrimError::PageHasNoAreas { page });
        }
        Ok(default)
    }
}
