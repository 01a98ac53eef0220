//! Deck builder over a declared slide master.

use std::fmt;
use std::marker::PhantomData;

use tracing::debug;

use crate::adapter::{MasterRef, Presentation, Slide};
use crate::builder::slide::SlideBuilder;
use crate::builder::table_input::{TableNormalizer, TableNormalizers};
use crate::common::IntoLength;
use crate::config::DeckOptions;
use crate::error::{Error, Result};
use crate::ooxml::pptx::MutablePresentation;
use crate::template::{MasterBinding, MasterSource, SlideMaster, SlideMasterProxy};

/// Builds a deck whose slides come from the layouts of master `M`.
///
/// ```
/// use slidecraft::adapter::Range;
/// use slidecraft::builder::{PresentationBuilder, TextOptions};
/// use slidecraft::template::{DefaultMaster, TitleSlide};
///
/// let pres = PresentationBuilder::<DefaultMaster>::new()?
///     .slide(|m| {
///         m.title_slide().with(TitleSlide {
///             title: "Roadmap".to_string(),
///             subtitle: Some("2025".to_string()),
///         })
///     })?
///     .slide(|m| {
///         m.blank().builder().text(
///             "Hello",
///             Range::new((1, "in"), (1, "in"), (5, "in"), (2, "in")).unwrap(),
///             TextOptions::default(),
///         )
///     })?
///     .build();
/// assert_eq!(pres.slides_count(), 2);
/// # Ok::<(), slidecraft::Error>(())
/// ```
pub struct PresentationBuilder<M: SlideMaster> {
    pres: MutablePresentation,
    binding: MasterBinding,
    normalizers: TableNormalizers,
    _master: PhantomData<fn() -> M>,
}

impl<M: SlideMaster> PresentationBuilder<M> {
    pub fn new() -> Result<Self> {
        Self::with_options(DeckOptions::default())
    }

    /// Start from the source of `M`: the built-in deck, or the first master
    /// of a deck file, whose slides are dropped.
    pub fn with_options(options: DeckOptions) -> Result<Self> {
        let pres = match M::source() {
            MasterSource::Default => MutablePresentation::with_options(&options)?,
            MasterSource::File(path) => {
                if !path.is_file() {
                    return Err(Error::MasterSourceNotFound(path.display().to_string()));
                }
                let mut pres = MutablePresentation::open_with(&path, &options)?;
                pres.clear_slides();
                debug!(master = M::NAME, source = %path.display(), "adopted master from file");
                pres
            }
        };
        let master = pres
            .slide_masters()
            .first()
            .map(|info| MasterRef::from_backend(info, 0))
            .ok_or_else(|| Error::MasterSourceNotFound(format!("{}: no slide master", M::NAME)))?;
        let binding = MasterBinding::new(&master, options.validate_layout_names);
        Ok(Self {
            pres,
            binding,
            normalizers: TableNormalizers::default(),
            _master: PhantomData,
        })
    }

    pub fn slide_width(mut self, width: impl IntoLength) -> Result<Self> {
        self.pres.set_slide_width(width.into_length()?.emu());
        Ok(self)
    }

    pub fn slide_height(mut self, height: impl IntoLength) -> Result<Self> {
        self.pres.set_slide_height(height.into_length()?.emu());
        Ok(self)
    }

    /// Append `normalizer` to the table normalizer chain.
    pub fn table_normalizer(mut self, normalizer: impl TableNormalizer + 'static) -> Self {
        self.normalizers.register(normalizer);
        self
    }

    /// Add a slide. `f` gets the master bound to this deck and returns a
    /// layout proxy or a slide builder.
    pub fn slide<F, S>(mut self, f: F) -> Result<Self>
    where
        F: FnOnce(&SlideMasterProxy<M>) -> S,
        S: Into<SlideBuilder>,
    {
        let proxy = SlideMasterProxy::new(M::bind(self.binding.clone()));
        let builder: SlideBuilder = f(&proxy).into();
        let (layout, actions) = builder.into_parts();
        let layout = layout?;
        let slide = self.pres.add_slide(layout.id)?;
        debug!(slide_id = slide.slide_id(), layout = %layout.name, "created slide");
        actions.build(&mut Slide::from_backend(slide), &self.normalizers)?;
        Ok(self)
    }

    pub fn slides_count(&self) -> usize {
        self.pres.slide_count()
    }

    pub fn build(self) -> Presentation {
        debug!(master = M::NAME, slides = self.pres.slide_count(), "built presentation");
        Presentation::from_backend(self.pres)
    }
}

impl<M: SlideMaster> fmt::Debug for PresentationBuilder<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationBuilder")
            .field("master", &M::NAME)
            .field("slides", &self.pres.slide_count())
            .field("normalizers", &self.normalizers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::Range;
    use crate::builder::TextOptions;
    use crate::template::{DefaultMaster, TitleAndContent, TitleSlide};
    use crate::{slide_layout, slide_master};

    slide_layout! {
        struct Cover as "Title Slide" {
            placeholder title: String,
        }
    }

    slide_layout! {
        struct Wrong as "Comparison" {}
    }

    slide_master! {
        struct Misaligned {
            cover: Cover,
            wrong: Wrong,
        }
    }

    slide_master! {
        struct Missing from "no/such/deck.pptx" {
            cover: Cover,
        }
    }

    #[test]
    fn test_slides_in_call_order() {
        let pres = PresentationBuilder::<DefaultMaster>::new()
            .unwrap()
            .slide(|m| {
                m.title_slide().with(TitleSlide {
                    title: "One".to_string(),
                    subtitle: None,
                })
            })
            .unwrap()
            .slide(|m| {
                m.title_and_content().with(TitleAndContent {
                    title: "Two".to_string(),
                    content: Some("Body".to_string()),
                })
            })
            .unwrap()
            .slide(|m| m.blank())
            .unwrap()
            .build();

        assert_eq!(pres.slides_count(), 3);
        let names: Vec<&str> = pres.slides().iter().map(|s| s.layout_name()).collect();
        assert_eq!(names, ["Title Slide", "Title and Content", "Blank"]);

        let mut backend = pres.into_backend();
        let mut slide = Slide::from_backend(backend.slide_mut(1).unwrap());
        let texts: Vec<Option<String>> = slide.placeholders().iter().map(|p| p.text()).collect();
        assert_eq!(texts, [Some("Two".to_string()), Some("Body".to_string())]);
    }

    #[test]
    fn test_dynamic_layout_lookup() {
        let pres = PresentationBuilder::<DefaultMaster>::new()
            .unwrap()
            .slide_width((13.333, "in"))
            .unwrap()
            .slide(|m| {
                m.layout("title_only")
                    .unwrap()
                    .with_values(["Dynamic"])
                    .text(
                        "extra",
                        Range::new((1, "in"), (2, "in"), (3, "in"), (1, "in")).unwrap(),
                        TextOptions::default(),
                    )
            })
            .unwrap()
            .build();
        assert_eq!(pres.slide_width().emu(), 12_191_695);
        assert_eq!(pres.slides()[0].layout_name(), "Title Only");
        assert_eq!(pres.slides()[0].shape_count(), 2);
    }

    #[test]
    fn test_layout_name_mismatch() {
        let builder = PresentationBuilder::<Misaligned>::new().unwrap();
        let err = builder.slide(|m| m.wrong()).unwrap_err();
        assert!(matches!(err, Error::SlideLayoutNameMismatch { .. }));

        let lenient = DeckOptions::new().with_layout_validation(false);
        let pres = PresentationBuilder::<Misaligned>::with_options(lenient)
            .unwrap()
            .slide(|m| m.wrong())
            .unwrap()
            .build();
        assert_eq!(pres.slides()[0].layout_name(), "Title and Content");
    }

    #[test]
    fn test_missing_master_source() {
        assert!(matches!(
            PresentationBuilder::<Missing>::new(),
            Err(Error::MasterSourceNotFound(_))
        ));
    }
}
