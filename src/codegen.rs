//! Rust source for the layouts and master of an existing deck.
//!
//! Every layout of the deck's first master becomes a `slide_layout!`
//! declaration whose placeholder fields are optional: `Option<PathBuf>` for
//! picture placeholders, `Option<String>` otherwise. Footer, date and slide
//! number placeholders are left out since slides never receive them. A single
//! `slide_master!` lists the layouts in master order and points `from` at the
//! deck.

use std::collections::HashSet;
use std::fmt::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::ooxml::pptx::{MutablePresentation, MutableShape, PlaceholderType, SlideLayoutInfo};

const KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "crate", "do", "dyn", "else",
    "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in", "let", "loop",
    "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "self",
    "static", "struct", "super", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Generate template source for the deck at `path`.
///
/// The `from` clause of the master carries `path` as given, so a relative
/// path is resolved against the file the source is saved in.
pub fn generate_template(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::MasterSourceNotFound(path.display().to_string()));
    }
    let pres = MutablePresentation::open(path)?;
    let source = path.to_string_lossy();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    template_source(&pres, &source, &stem)
}

/// Generate template source for `pres`. `source` goes into the `from` clause
/// and `stem` names the master type.
pub fn template_source(pres: &MutablePresentation, source: &str, stem: &str) -> Result<String> {
    let master = pres
        .slide_masters()
        .first()
        .ok_or_else(|| Error::MasterSourceNotFound(format!("{source}: no slide master")))?;

    let mut out = String::new();
    writeln!(out, "// Generated from {source}")?;
    writeln!(out)?;
    let needs_path = master
        .layouts
        .iter()
        .any(|l| template_placeholders(&l.shapes).any(is_picture));
    if needs_path {
        writeln!(out, "use std::path::PathBuf;")?;
        writeln!(out)?;
    }
    writeln!(out, "use slidecraft::{{slide_layout, slide_master}};")?;

    let mut type_names = Names::default();
    let mut field_names = Names::default();
    let mut entries = Vec::with_capacity(master.layouts.len());
    for layout in &master.layouts {
        let type_name = type_names.claim(pascal_case(&layout.name, "Layout"));
        let field_name = field_names.claim(snake_case(&layout.name, "layout"));
        writeln!(out)?;
        write_layout(&mut out, &type_name, layout)?;
        entries.push((field_name, type_name));
    }

    let master_name = format!("{}Master", pascal_case(stem, "Deck"));
    writeln!(out)?;
    writeln!(out, "slide_master! {{")?;
    writeln!(out, "    pub struct {master_name} from {source:?} {{")?;
    for (field, ty) in &entries {
        writeln!(out, "        {field}: {ty},")?;
    }
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;

    debug!(source, master = %master_name, layouts = entries.len(), "generated template source");
    Ok(out)
}

fn write_layout(out: &mut String, type_name: &str, layout: &SlideLayoutInfo) -> Result<()> {
    let mut names = Names::default();
    writeln!(out, "slide_layout! {{")?;
    writeln!(out, "    pub struct {type_name} as {:?} {{", layout.name)?;
    for shape in template_placeholders(&layout.shapes) {
        let field = names.claim(placeholder_field_name(shape));
        let ty = if is_picture(shape) {
            "Option<PathBuf>"
        } else {
            "Option<String>"
        };
        writeln!(out, "        placeholder {field}: {ty},")?;
    }
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    Ok(())
}

fn template_placeholders(shapes: &[MutableShape]) -> impl Iterator<Item = &MutableShape> {
    shapes.iter().filter(|shape| {
        shape
            .placeholder
            .as_ref()
            .is_some_and(|ph| !ph.ph_type.is_footer_kind())
    })
}

fn is_picture(shape: &MutableShape) -> bool {
    shape
        .placeholder
        .as_ref()
        .is_some_and(|ph| ph.ph_type == PlaceholderType::Picture)
}

/// `Title 1` gives `title`, `Content Placeholder 2` gives `content_placeholder`.
fn placeholder_field_name(shape: &MutableShape) -> String {
    let trimmed = shape
        .name
        .trim_end_matches(|c: char| c.is_ascii_digit() || c.is_whitespace());
    let fallback = shape
        .placeholder
        .as_ref()
        .map(|ph| ph.ph_type.as_str())
        .unwrap_or("placeholder");
    if trimmed.is_empty() {
        snake_case(fallback, "placeholder")
    } else {
        snake_case(trimmed, fallback)
    }
}

fn words(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
}

fn snake_case(name: &str, fallback: &str) -> String {
    let mut ident = words(name)
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_");
    if ident.is_empty() {
        ident = fallback.to_string();
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident = format!("{fallback}_{ident}");
    }
    if KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

fn pascal_case(name: &str, fallback: &str) -> String {
    let mut ident = String::with_capacity(name.len());
    for word in words(name) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            ident.push(first.to_ascii_uppercase());
            ident.extend(chars.map(|c| c.to_ascii_lowercase()));
        }
    }
    if ident.is_empty() {
        fallback.to_string()
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{fallback}{ident}")
    } else {
        ident
    }
}

/// Identifiers handed out so far; repeats get a numeric suffix.
#[derive(Default)]
struct Names {
    taken: HashSet<String>,
}

impl Names {
    fn claim(&mut self, base: String) -> String {
        let mut candidate = base.clone();
        let mut n = 2;
        while self.taken.contains(&candidate) {
            candidate = if base.ends_with(|c: char| c.is_ascii_digit()) {
                format!("{base}_{n}")
            } else {
                format!("{base}{n}")
            };
            n += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}
