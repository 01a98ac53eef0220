//! The master of the built-in deck and its eleven layouts.

use crate::template::value::ImagePath;
use crate::{slide_layout, slide_master};

slide_layout! {
    pub struct TitleSlide as "Title Slide" {
        placeholder title: String,
        placeholder subtitle: Option<String>,
    }
}

slide_layout! {
    pub struct TitleAndContent as "Title and Content" {
        placeholder title: String,
        placeholder content: Option<String>,
    }
}

slide_layout! {
    pub struct SectionHeader as "Section Header" {
        placeholder title: String,
        placeholder text: Option<String>,
    }
}

slide_layout! {
    pub struct TwoContent as "Two Content" {
        placeholder title: String,
        placeholder left: Option<String>,
        placeholder right: Option<String>,
    }
}

slide_layout! {
    pub struct Comparison as "Comparison" {
        placeholder title: String,
        placeholder left_heading: Option<String>,
        placeholder left: Option<String>,
        placeholder right_heading: Option<String>,
        placeholder right: Option<String>,
    }
}

slide_layout! {
    pub struct TitleOnly as "Title Only" {
        placeholder title: String,
    }
}

slide_layout! {
    pub struct Blank as "Blank" {}
}

slide_layout! {
    pub struct ContentWithCaption as "Content with Caption" {
        placeholder title: String,
        placeholder content: Option<String>,
        placeholder caption: Option<String>,
    }
}

slide_layout! {
    pub struct PictureWithCaption as "Picture with Caption" {
        placeholder title: String,
        placeholder picture: Option<ImagePath>,
        placeholder caption: Option<String>,
    }
}

slide_layout! {
    pub struct TitleAndVerticalText as "Title and Vertical Text" {
        placeholder title: String,
        placeholder text: Option<String>,
    }
}

slide_layout! {
    pub struct VerticalTitleAndText as "Vertical Title and Text" {
        placeholder title: String,
        placeholder text: Option<String>,
    }
}

slide_master! {
    /// The "Office Theme" master of a new deck.
    pub struct DefaultMaster {
        title_slide: TitleSlide,
        title_and_content: TitleAndContent,
        section_header: SectionHeader,
        two_content: TwoContent,
        comparison: Comparison,
        title_only: TitleOnly,
        blank: Blank,
        content_with_caption: ContentWithCaption,
        picture_with_caption: PictureWithCaption,
        title_and_vertical_text: TitleAndVerticalText,
        vertical_title_and_text: VerticalTitleAndText,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ooxml::pptx::template::default_layout_names;
    use crate::template::{MasterSource, SlideLayout, SlideMaster, ValueKind};

    #[test]
    fn test_default_master_layouts() {
        assert_eq!(DefaultMaster::source(), MasterSource::Default);
        let layouts = DefaultMaster::layouts();
        let names = default_layout_names();
        assert_eq!(layouts.len(), names.len());
        for (i, layout) in layouts.iter().enumerate() {
            assert_eq!(layout.index, i);
            assert_eq!(layout.backend_name, Some(names[i]));
        }
        let blank = DefaultMaster::layout_field("blank").unwrap();
        assert_eq!(blank.type_name, "Blank");
        assert!(blank.placeholder_fields().is_empty());
    }

    #[test]
    fn test_layout_field_errors() {
        assert!(matches!(
            DefaultMaster::layout_field("agenda"),
            Err(Error::SlideMasterAttributeNotFound { .. })
        ));
    }

    #[test]
    fn test_placeholder_order() {
        assert_eq!(
            Comparison::placeholder_names(),
            ["title", "left_heading", "left", "right_heading", "right"]
        );
        let fields = PictureWithCaption::placeholder_fields();
        assert_eq!(fields[1].kind, ValueKind::Picture);
        assert!(fields[1].type_name.contains("ImagePath"));
        assert!(!fields[0].has_default);
    }

    #[test]
    fn test_placeholder_values() {
        let slide = TitleSlide {
            title: "Quarterly review".to_string(),
            ..Default::default()
        };
        let values = slide.placeholder_values();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], "Quarterly review".into());
        assert_eq!(values[1], crate::adapter::PlaceholderContent::Empty);
    }
}
