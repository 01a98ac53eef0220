//! Read-only views of slide masters and their layouts.

use crate::error::{Error, Result};
use crate::ooxml::pptx::shapes::{MutableShape, PlaceholderType};
use crate::ooxml::pptx::{LayoutId, SlideLayoutInfo, SlideMasterInfo};

/// A placeholder declared by a layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderInfo {
    pub placeholder_type: PlaceholderType,
    pub idx: u32,
    pub name: String,
}

impl PlaceholderInfo {
    fn from_shape(shape: &MutableShape) -> Option<Self> {
        let ph = shape.placeholder.as_ref()?;
        Some(Self {
            placeholder_type: ph.ph_type,
            idx: ph.idx,
            name: shape.name.clone(),
        })
    }
}

/// A slide layout of a master.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRef<'a> {
    info: &'a SlideLayoutInfo,
    id: LayoutId,
}

impl<'a> LayoutRef<'a> {
    pub fn from_backend(info: &'a SlideLayoutInfo, id: LayoutId) -> Self {
        Self { info, id }
    }

    pub fn to_backend(&self) -> &'a SlideLayoutInfo {
        self.info
    }

    pub fn id(&self) -> LayoutId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        &self.info.name
    }

    /// `p:sldLayout/@type`, e.g. `title` or `twoObj`.
    pub fn layout_type(&self) -> Option<&'a str> {
        self.info.layout_type.as_deref()
    }

    /// Every placeholder of the layout, in document order.
    pub fn placeholders(&self) -> Vec<PlaceholderInfo> {
        self.info
            .placeholders()
            .filter_map(PlaceholderInfo::from_shape)
            .collect()
    }

    /// The placeholders a new slide gets, in the order slides list them:
    /// date, footer and slide number left out, sorted by idx.
    pub fn fillable_placeholders(&self) -> Vec<PlaceholderInfo> {
        let mut placeholders: Vec<PlaceholderInfo> = self
            .placeholders()
            .into_iter()
            .filter(|ph| !ph.placeholder_type.is_footer_kind())
            .collect();
        placeholders.sort_by_key(|ph| ph.idx);
        placeholders
    }
}

/// A slide master with its layouts.
#[derive(Debug, Clone, Copy)]
pub struct MasterRef<'a> {
    info: &'a SlideMasterInfo,
    index: usize,
}

impl<'a> MasterRef<'a> {
    pub fn from_backend(info: &'a SlideMasterInfo, index: usize) -> Self {
        Self { info, index }
    }

    pub fn to_backend(&self) -> &'a SlideMasterInfo {
        self.info
    }

    /// Position of the master in the presentation.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn name(&self) -> &'a str {
        &self.info.name
    }

    pub fn layout_count(&self) -> usize {
        self.info.layouts.len()
    }

    pub fn layout_names(&self) -> Vec<&'a str> {
        self.info.layout_names()
    }

    pub fn layouts(&self) -> Vec<LayoutRef<'a>> {
        (0..self.layout_count())
            .filter_map(|i| self.layout(i).ok())
            .collect()
    }

    /// The layout at `index`.
    pub fn layout(&self, index: usize) -> Result<LayoutRef<'a>> {
        let info = self
            .info
            .layouts
            .get(index)
            .ok_or_else(|| Error::SlideLayoutIndexOutOfRange {
                index,
                available: self.layout_names().into_iter().map(str::to_string).collect(),
            })?;
        Ok(LayoutRef::from_backend(
            info,
            LayoutId {
                master: self.index,
                layout: index,
            },
        ))
    }

    pub fn layout_by_name(&self, name: &str) -> Option<LayoutRef<'a>> {
        let index = self.info.layouts.iter().position(|l| l.name == name)?;
        self.layout(index).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::MutablePresentation;

    #[test]
    fn test_default_master() {
        let pres = MutablePresentation::new().unwrap();
        let master = MasterRef::from_backend(&pres.slide_masters()[0], 0);
        assert_eq!(master.name(), "Office Theme");
        assert_eq!(master.layout_count(), 11);
        assert_eq!(master.layouts().len(), 11);

        let title = master.layout(0).unwrap();
        assert_eq!(title.name(), "Title Slide");
        assert_eq!(title.id(), LayoutId { master: 0, layout: 0 });
        let fillable = title.fillable_placeholders();
        assert_eq!(fillable.len(), 2);
        assert_eq!(fillable[0].placeholder_type, PlaceholderType::CenterTitle);
        assert_eq!(fillable[1].placeholder_type, PlaceholderType::SubTitle);
        assert!(title.placeholders().len() > fillable.len());

        assert_eq!(master.layout_by_name("Blank").map(|l| l.id().layout), Some(6));
        match master.layout(11) {
            Err(Error::SlideLayoutIndexOutOfRange { index, available }) => {
                assert_eq!(index, 11);
                assert_eq!(available.len(), 11);
                assert_eq!(available[0], "Title Slide");
            },
            other => panic!("unexpected {:?}", other.map(|l| l.name())),
        }
    }
}
