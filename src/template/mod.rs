//! Typed slide masters and layouts.
//!
//! A layout is a struct whose `placeholder` fields fill the placeholders of a
//! new slide, in declaration order. A master lists its layouts in the order of
//! the backend master's layouts and names the deck they come from.
//!
//! ```
//! use slidecraft::{slide_layout, slide_master};
//! use slidecraft::template::SlideMaster;
//!
//! slide_layout! {
//!     pub struct Title as "Title Slide" {
//!         placeholder title: String,
//!         placeholder subtitle: Option<String>,
//!     }
//! }
//!
//! slide_master! {
//!     pub struct Deck {
//!         title: Title,
//!     }
//! }
//!
//! let title = Deck::layout_field("title")?;
//! assert_eq!(title.type_name, "Title");
//! assert_eq!(title.backend_name, Some("Title Slide"));
//! # Ok::<(), slidecraft::Error>(())
//! ```

mod default_master;
mod layout;
mod macros;
mod master;
mod proxy;
mod value;

pub use default_master::{
    Blank, Comparison, ContentWithCaption, DefaultMaster, PictureWithCaption, SectionHeader,
    TitleAndContent, TitleAndVerticalText, TitleOnly, TitleSlide, TwoContent,
    VerticalTitleAndText,
};
pub use layout::{PlaceholderField, SlideLayout};
pub use master::{
    BoundLayout, LayoutDescriptor, MasterBinding, MasterField, MasterFieldKind, MasterSource,
    SlideMaster,
};
pub use proxy::{DynLayoutProxy, SlideLayoutProxy, SlideMasterProxy};
pub use value::{ImagePath, PlaceholderValue, ValueKind};

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::NaiveDate;

    use super::*;
    use crate::adapter::PlaceholderContent;
    use crate::error::Error;
    use crate::{slide_layout, slide_master};

    slide_layout! {
        /// Agenda slide.
        pub struct Agenda as "Title and Content" {
            placeholder title: String = "Agenda".to_string(),
            /// One line per item
            placeholder items: Vec<String>,
            presenter: String,
        }
    }

    slide_layout! {
        pub struct DatedAgenda extends Agenda {
            placeholder date: Option<NaiveDate>,
            placeholder logo: Option<PathBuf>
        }
    }

    slide_layout! {
        struct Empty {}
    }

    slide_master! {
        pub struct Corporate from "decks/corporate.pptx" {
            agenda: Agenda,
            plain footer: String,
            dated: DatedAgenda,
        }
    }

    slide_master! {
        struct Computed from (std::env::temp_dir().join("computed.pptx")) {
            empty: Empty,
        }
    }

    slide_master! {
        struct Bare {}
    }

    #[test]
    fn test_layout_declaration() {
        let agenda = Agenda::default();
        assert_eq!(agenda.title, "Agenda");
        assert!(agenda.items.is_empty());
        assert_eq!(Agenda::NAME, "Agenda");
        assert_eq!(Agenda::BACKEND_NAME, Some("Title and Content"));
        assert_eq!(Agenda::placeholder_names(), ["title", "items"]);

        let fields = Agenda::placeholder_fields();
        assert!(fields[0].has_default);
        assert!(!fields[1].has_default);
        assert_eq!(fields[1].kind, ValueKind::Paragraphs);
    }

    #[test]
    fn test_inherited_placeholders_first() {
        assert_eq!(DatedAgenda::BACKEND_NAME, None);
        assert_eq!(
            DatedAgenda::placeholder_names(),
            ["title", "items", "date", "logo"]
        );

        let mut dated = DatedAgenda::default();
        dated.items = vec!["Intro".to_string(), "Numbers".to_string()];
        dated.date = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert_eq!(dated.title, "Agenda");
        assert_eq!(
            dated.placeholder_values(),
            vec![
                PlaceholderContent::Text("Agenda".to_string()),
                PlaceholderContent::Paragraphs(vec!["Intro".to_string(), "Numbers".to_string()]),
                PlaceholderContent::Text("2024-05-01".to_string()),
                PlaceholderContent::Empty,
            ]
        );
    }

    #[test]
    fn test_master_declaration() {
        assert_eq!(Corporate::NAME, "Corporate");
        let fields = Corporate::fields();
        assert_eq!(
            fields.iter().map(|f| f.name).collect::<Vec<_>>(),
            ["agenda", "footer", "dated"]
        );

        let dated = Corporate::layout_field("dated").unwrap();
        assert_eq!(dated.index, 1);
        assert_eq!(dated.type_name, "DatedAgenda");
        assert_eq!(dated.placeholder_fields().len(), 4);

        match Corporate::source() {
            MasterSource::File(path) => {
                assert!(path.ends_with("src/template/decks/corporate.pptx"));
            }
            MasterSource::Default => panic!("expected a file source"),
        }
        assert_eq!(
            Computed::source(),
            MasterSource::File(std::env::temp_dir().join("computed.pptx"))
        );
    }

    #[test]
    fn test_master_attribute_errors() {
        assert!(matches!(
            Corporate::layout_field("footer"),
            Err(Error::SlideMasterAttributeMustBeLayout { .. })
        ));
        assert!(matches!(
            Corporate::layout_field("closing"),
            Err(Error::SlideMasterAttributeNotFound { .. })
        ));
        assert!(matches!(
            Bare::layout_field("anything"),
            Err(Error::SlideMasterHasNoAttributes(_))
        ));
    }

    #[test]
    fn test_unbound_master() {
        let master = Corporate::bind(MasterBinding::default());
        assert_eq!(master.footer, "");
        assert!(master.agenda().target().is_none());

        let proxy = SlideMasterProxy::new(master);
        assert!(matches!(
            proxy.layout("agenda"),
            Err(Error::SlideLayoutIndexOutOfRange { index: 0, .. })
        ));
    }
}
