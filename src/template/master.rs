//! Slide master declarations and their binding to a live deck.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::adapter::MasterRef;
use crate::error::{Error, Result};
use crate::ooxml::pptx::LayoutId;
use crate::template::layout::{PlaceholderField, SlideLayout};
use crate::template::proxy::SlideLayoutProxy;

/// Where the theme and layouts of a master come from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MasterSource {
    /// The built-in empty deck
    #[default]
    Default,
    /// The first master of an existing deck
    File(PathBuf),
}

impl MasterSource {
    /// Resolve `path` against the directory of `declaring_file`.
    ///
    /// `declaring_file` is a `file!()` value, which is relative to the package
    /// or to its workspace root, so the manifest directory and its ancestors
    /// are tried in turn. Absolute paths are kept as given.
    pub fn resolve(declaring_file: &str, manifest_dir: &str, path: &str) -> Self {
        let path = Path::new(path);
        if path.is_absolute() {
            return MasterSource::File(path.to_path_buf());
        }
        let declaring_file = Path::new(declaring_file);
        let source_file = if declaring_file.is_absolute() {
            declaring_file.to_path_buf()
        } else {
            Path::new(manifest_dir)
                .ancestors()
                .map(|base| base.join(declaring_file))
                .find(|candidate| candidate.exists())
                .unwrap_or_else(|| Path::new(manifest_dir).join(declaring_file))
        };
        let dir = source_file.parent().unwrap_or(Path::new(manifest_dir));
        MasterSource::File(dir.join(path))
    }

    pub fn is_default(&self) -> bool {
        matches!(self, MasterSource::Default)
    }
}

/// A layout field of a master: its name, position and layout type.
#[derive(Debug, Clone, Copy)]
pub struct LayoutDescriptor {
    pub field: &'static str,
    /// Name of the layout type
    pub type_name: &'static str,
    pub backend_name: Option<&'static str>,
    /// Position among the layout fields of the master
    pub index: usize,
    placeholders: fn() -> Vec<PlaceholderField>,
}

impl LayoutDescriptor {
    pub fn of<L: SlideLayout>(field: &'static str, index: usize) -> Self {
        Self {
            field,
            type_name: L::NAME,
            backend_name: L::BACKEND_NAME,
            index,
            placeholders: L::placeholder_fields,
        }
    }

    pub fn placeholder_fields(&self) -> Vec<PlaceholderField> {
        (self.placeholders)()
    }
}

#[derive(Debug, Clone, Copy)]
pub enum MasterFieldKind {
    Layout(LayoutDescriptor),
    /// A field that is not a layout
    Plain { type_name: &'static str },
}

/// A field declared on a master.
#[derive(Debug, Clone, Copy)]
pub struct MasterField {
    pub name: &'static str,
    pub kind: MasterFieldKind,
}

impl MasterField {
    pub fn layout<L: SlideLayout>(name: &'static str, index: usize) -> Self {
        Self {
            name,
            kind: MasterFieldKind::Layout(LayoutDescriptor::of::<L>(name, index)),
        }
    }

    pub const fn plain(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            kind: MasterFieldKind::Plain { type_name },
        }
    }

    pub fn as_layout(&self) -> Option<&LayoutDescriptor> {
        match &self.kind {
            MasterFieldKind::Layout(descriptor) => Some(descriptor),
            MasterFieldKind::Plain { .. } => None,
        }
    }
}

/// A slide master with layout fields.
///
/// Implementations are generated by [`slide_master!`](crate::slide_master).
/// The k-th layout field stands for the k-th layout of the backend master.
pub trait SlideMaster: Sized + 'static {
    const NAME: &'static str;

    /// Declared fields, in declaration order.
    fn fields() -> Vec<MasterField>;

    fn source() -> MasterSource;

    /// Build a master value bound to the layouts of a live deck.
    fn bind(binding: MasterBinding) -> Self;

    fn binding(&self) -> &MasterBinding;

    fn layouts() -> Vec<LayoutDescriptor> {
        Self::fields()
            .iter()
            .filter_map(|f| f.as_layout().copied())
            .collect()
    }

    /// The layout declared as field `name`.
    fn layout_field(name: &str) -> Result<LayoutDescriptor> {
        let fields = Self::fields();
        if fields.is_empty() {
            return Err(Error::SlideMasterHasNoAttributes(Self::NAME.to_string()));
        }
        let field = fields.iter().find(|f| f.name == name).ok_or_else(|| {
            Error::SlideMasterAttributeNotFound {
                master: Self::NAME.to_string(),
                attribute: name.to_string(),
            }
        })?;
        field
            .as_layout()
            .copied()
            .ok_or_else(|| Error::SlideMasterAttributeMustBeLayout {
                master: Self::NAME.to_string(),
                attribute: name.to_string(),
            })
    }
}

/// A backend layout a slide is created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundLayout {
    pub id: LayoutId,
    pub name: String,
}

/// The layouts of the backend master a declared master is bound to.
#[derive(Debug, Clone, Default)]
pub struct MasterBinding {
    layouts: Vec<BoundLayout>,
    validate_names: bool,
}

impl MasterBinding {
    pub fn new(master: &MasterRef<'_>, validate_names: bool) -> Self {
        Self {
            layouts: master
                .layouts()
                .iter()
                .map(|layout| BoundLayout {
                    id: layout.id(),
                    name: layout.name().to_string(),
                })
                .collect(),
            validate_names,
        }
    }

    pub fn layout_names(&self) -> Vec<String> {
        self.layouts.iter().map(|l| l.name.clone()).collect()
    }

    /// The backend layout at `index`, checked against `backend_name` when
    /// name validation is on.
    pub fn resolve(
        &self,
        index: usize,
        type_name: &str,
        backend_name: Option<&str>,
    ) -> Result<BoundLayout> {
        let layout = self
            .layouts
            .get(index)
            .ok_or_else(|| Error::SlideLayoutIndexOutOfRange {
                index,
                available: self.layout_names(),
            })?;
        if let Some(expected) = backend_name {
            if self.validate_names && layout.name != expected {
                return Err(Error::SlideLayoutNameMismatch {
                    layout: type_name.to_string(),
                    expected: expected.to_string(),
                    found: layout.name.clone(),
                });
            }
        }
        debug!(layout = type_name, backend = %layout.name, index, "bound layout");
        Ok(layout.clone())
    }

    /// Proxy for the layout type `L` declared at `index`.
    pub fn proxy<L: SlideLayout>(&self, index: usize) -> SlideLayoutProxy<L> {
        SlideLayoutProxy::new(self.resolve(index, L::NAME, L::BACKEND_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_relative_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tests")).unwrap();
        std::fs::write(dir.path().join("tests/e2e.rs"), "").unwrap();
        let manifest = dir.path().to_str().unwrap();

        let source = MasterSource::resolve("tests/e2e.rs", manifest, "base.pptx");
        assert_eq!(source, MasterSource::File(dir.path().join("tests/base.pptx")));

        let nested = dir.path().join("crates/deck");
        std::fs::create_dir_all(&nested).unwrap();
        let source = MasterSource::resolve("tests/e2e.rs", nested.to_str().unwrap(), "base.pptx");
        assert_eq!(source, MasterSource::File(dir.path().join("tests/base.pptx")));
    }

    #[test]
    fn test_resolve_absolute_source() {
        let absolute = std::env::temp_dir().join("deck.pptx");
        let source = MasterSource::resolve("src/lib.rs", "/nowhere", absolute.to_str().unwrap());
        assert_eq!(source, MasterSource::File(absolute));
    }

    #[test]
    fn test_binding_errors() {
        let binding = MasterBinding {
            layouts: vec![BoundLayout {
                id: LayoutId { master: 0, layout: 0 },
                name: "Title Slide".to_string(),
            }],
            validate_names: true,
        };
        assert!(binding.resolve(0, "Title", Some("Title Slide")).is_ok());
        assert!(matches!(
            binding.resolve(0, "Title", Some("Blank")),
            Err(Error::SlideLayoutNameMismatch { .. })
        ));
        match binding.resolve(3, "Other", None) {
            Err(Error::SlideLayoutIndexOutOfRange { index, available }) => {
                assert_eq!(index, 3);
                assert_eq!(available, vec!["Title Slide".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }

        let lenient = MasterBinding {
            validate_names: false,
            ..binding
        };
        assert!(lenient.resolve(0, "Title", Some("Blank")).is_ok());
    }
}
