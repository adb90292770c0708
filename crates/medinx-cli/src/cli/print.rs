use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use medinx::codec::format_values;
use medinx::{Document, MedinxError, Variant};
use unicode_width::UnicodeWidthStr;

use super::styles::{ATTRIBUTE, HINT, PATH, PROBLEM, SUCCESS, UNKNOWN, VARIANT};

pub(super) fn render_files(files: &[PathBuf]) -> String {
    files
        .iter()
        .map(|path| format!("{}\n", PATH.apply_to(path.display())))
        .collect()
}

pub(super) fn render_document(path: &Path, document: &Document) -> String {
    let mut out = format!("{}\n", PATH.apply_to(path.display()));
    if document.is_empty() {
        out.push_str(&format!("  {}\n", HINT.apply_to("(no attributes)")));
        return out;
    }
    let width = document
        .attribute_names()
        .map(UnicodeWidthStr::width)
        .max()
        .unwrap_or(0);
    for (attribute, values) in document.iter() {
        out.push_str(&format!(
            "  {}  {}\n",
            ATTRIBUTE.apply_to(pad(attribute, width)),
            format_values(values)
        ));
    }
    out
}

pub(super) fn render_attribute_types(types: &BTreeMap<String, Option<Variant>>) -> String {
    let width = types.keys().map(|name| name.width()).max().unwrap_or(0);
    types
        .iter()
        .map(|(attribute, variant)| {
            let name = ATTRIBUTE.apply_to(pad(attribute, width));
            match variant {
                Some(variant) => format!("{}  {}\n", name, VARIANT.apply_to(variant)),
                None => format!("{}  {}\n", name, UNKNOWN.apply_to("unknown")),
            }
        })
        .collect()
}

/// Pads to `width` terminal columns; `format!` padding counts chars instead.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{}{}", text, " ".repeat(fill))
}

pub(super) fn render_problems(problems: &[MedinxError]) -> String {
    let mut out = String::new();
    for problem in problems {
        match problem {
            MedinxError::InvalidDocument { path, source } => {
                out.push_str(&format!("{}\n", PATH.apply_to(path.display())));
                for error in source.errors() {
                    out.push_str(&format!("  {}\n", PROBLEM.apply_to(error)));
                }
            }
            other => out.push_str(&format!("{}\n", PROBLEM.apply_to(other))),
        }
    }
    out
}

pub(super) fn print_success(message: &str) {
    println!("{}", SUCCESS.apply_to(message));
}

pub(super) fn print_hint(message: &str) {
    println!("{}", HINT.apply_to(message));
}
