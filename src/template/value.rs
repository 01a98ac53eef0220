//! Conversions from placeholder field types to placeholder content.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::adapter::{ImageInput, PlaceholderContent};

/// What a placeholder field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Paragraphs,
    Picture,
}

/// A type that may be declared as a placeholder field.
///
/// `Option<T>` wraps any other kind; `None` leaves the placeholder alone but
/// still takes its position.
pub trait PlaceholderValue {
    const KIND: ValueKind;

    fn to_content(&self) -> PlaceholderContent;
}

impl PlaceholderValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn to_content(&self) -> PlaceholderContent {
        PlaceholderContent::Text(self.clone())
    }
}

impl PlaceholderValue for str {
    const KIND: ValueKind = ValueKind::Text;

    fn to_content(&self) -> PlaceholderContent {
        PlaceholderContent::Text(self.to_string())
    }
}

impl<T: PlaceholderValue + ?Sized> PlaceholderValue for &T {
    const KIND: ValueKind = T::KIND;

    fn to_content(&self) -> PlaceholderContent {
        (**self).to_content()
    }
}

impl<T: PlaceholderValue> PlaceholderValue for Option<T> {
    const KIND: ValueKind = T::KIND;

    fn to_content(&self) -> PlaceholderContent {
        match self {
            Some(value) => value.to_content(),
            None => PlaceholderContent::Empty,
        }
    }
}

macro_rules! display_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PlaceholderValue for $ty {
                const KIND: ValueKind = ValueKind::Text;

                fn to_content(&self) -> PlaceholderContent {
                    PlaceholderContent::Text(self.to_string())
                }
            }
        )*
    };
}

display_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char);

impl PlaceholderValue for NaiveDate {
    const KIND: ValueKind = ValueKind::Text;

    fn to_content(&self) -> PlaceholderContent {
        PlaceholderContent::Text(self.format("%Y-%m-%d").to_string())
    }
}

impl<T: AsRef<str>> PlaceholderValue for Vec<T> {
    const KIND: ValueKind = ValueKind::Paragraphs;

    fn to_content(&self) -> PlaceholderContent {
        PlaceholderContent::Paragraphs(self.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

impl PlaceholderValue for PathBuf {
    const KIND: ValueKind = ValueKind::Picture;

    fn to_content(&self) -> PlaceholderContent {
        PlaceholderContent::Image(ImageInput::Path(self.clone()))
    }
}

impl PlaceholderValue for ImageInput {
    const KIND: ValueKind = ValueKind::Picture;

    fn to_content(&self) -> PlaceholderContent {
        PlaceholderContent::Image(self.clone())
    }
}

/// Path of a picture for a placeholder field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImagePath(pub PathBuf);

impl ImagePath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl From<&str> for ImagePath {
    fn from(path: &str) -> Self {
        Self(PathBuf::from(path))
    }
}

impl From<PathBuf> for ImagePath {
    fn from(path: PathBuf) -> Self {
        Self(path)
    }
}

impl PlaceholderValue for ImagePath {
    const KIND: ValueKind = ValueKind::Picture;

    fn to_content(&self) -> PlaceholderContent {
        PlaceholderContent::Image(ImageInput::Path(self.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_values() {
        assert_eq!("a".to_content(), PlaceholderContent::Text("a".into()));
        assert_eq!(42_u32.to_content(), PlaceholderContent::Text("42".into()));
        assert_eq!(1.5_f64.to_content(), PlaceholderContent::Text("1.5".into()));
        assert_eq!(true.to_content(), PlaceholderContent::Text("true".into()));
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(date.to_content(), PlaceholderContent::Text("2024-03-09".into()));
    }

    #[test]
    fn test_optional_values() {
        let none: Option<String> = None;
        assert_eq!(none.to_content(), PlaceholderContent::Empty);
        assert_eq!(
            Some("x".to_string()).to_content(),
            PlaceholderContent::Text("x".into())
        );
        assert_eq!(<Option<PathBuf> as PlaceholderValue>::KIND, ValueKind::Picture);
    }

    #[test]
    fn test_list_and_picture_values() {
        let items = vec!["one", "two"];
        assert_eq!(
            items.to_content(),
            PlaceholderContent::Paragraphs(vec!["one".into(), "two".into()])
        );
        assert_eq!(
            ImagePath::from("logo.png").to_content(),
            PlaceholderContent::Image(ImageInput::Path(PathBuf::from("logo.png")))
        );
    }
}
