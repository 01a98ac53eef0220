//! Configuration for building decks.
//!
//! [`DeckOptions`] carries the deck-wide defaults: slide size, the resolution
//! assumed for images that record none, the language tag written on text runs,
//! the style of new tables, and whether declared layouts are checked against
//! the backend layouts by name.
use crate::common::unit::Length;

/// "Medium Style 2 - Accent 1", PowerPoint's default table style.
pub const DEFAULT_TABLE_STYLE: &str = "{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}";

/// Options applied when a deck is created or opened.
///
/// # Examples
///
/// ```rust
/// use slidecraft::DeckOptions;
/// use slidecraft::common::unit::Length;
///
/// let options = DeckOptions::new()
///     .with_slide_width(Length::Inches(13.333))
///     .with_slide_height(Length::Inches(7.5))
///     .with_lang("de-DE");
/// assert_eq!(options.slide_height, 6_858_000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DeckOptions {
    /// Slide width of new decks in EMU
    pub slide_width: i64,
    /// Slide height of new decks in EMU
    pub slide_height: i64,
    /// Resolution used for images without density information
    pub fallback_dpi: u32,
    /// Language tag written on text runs
    pub lang: String,
    /// Table style GUID applied to new tables
    pub table_style: String,
    /// Check declared layout names against the backend layouts
    pub validate_layout_names: bool,
}

impl Default for DeckOptions {
    fn default() -> Self {
        Self {
            slide_width: 9_144_000,  // 10 inches
            slide_height: 6_858_000, // 7.5 inches
            fallback_dpi: 72,
            lang: "en-US".to_string(),
            table_style: DEFAULT_TABLE_STYLE.to_string(),
            validate_layout_names: true,
        }
    }
}

impl DeckOptions {
    /// Create a new `DeckOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_slide_width(mut self, width: impl Into<Length>) -> Self {
        self.slide_width = width.into().emu();
        self
    }

    #[inline]
    pub fn with_slide_height(mut self, height: impl Into<Length>) -> Self {
        self.slide_height = height.into().emu();
        self
    }

    /// Set the resolution assumed for images that record none.
    ///
    /// A zero value is ignored.
    #[inline]
    pub fn with_fallback_dpi(mut self, dpi: u32) -> Self {
        if dpi > 0 {
            self.fallback_dpi = dpi;
        }
        self
    }

    #[inline]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    #[inline]
    pub fn with_table_style(mut self, style_id: impl Into<String>) -> Self {
        self.table_style = style_id.into();
        self
    }

    /// Set whether a layout declaring a backend name must match the backend
    /// layout at its position.
    #[inline]
    pub fn with_layout_validation(mut self, validate: bool) -> Self {
        self.validate_layout_names = validate;
        self
    }
}
