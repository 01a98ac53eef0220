/// Parts for PowerPoint presentation documents.
///
/// Readers for the presentation part and for the master, layout, slide and
/// notes parts, producing the shape model.
pub mod presentation;
pub mod slide;

pub use presentation::{PresentationPart, PresentationUpdate, SlideEntry, rewrite_presentation_xml};
pub use slide::{SlideContent, SlideLayoutInfo, SlideMasterInfo, parse_notes, parse_slide};
