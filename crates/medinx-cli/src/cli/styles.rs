use console::Style;
use once_cell::sync::Lazy;

pub static PATH: Lazy<Style> = Lazy::new(|| Style::new().bold());
pub static ATTRIBUTE: Lazy<Style> = Lazy::new(|| Style::new().cyan());
pub static VARIANT: Lazy<Style> = Lazy::new(|| Style::new().yellow());
pub static UNKNOWN: Lazy<Style> = Lazy::new(|| Style::new().dim().italic());
pub static SUCCESS: Lazy<Style> = Lazy::new(|| Style::new().green());
pub static PROBLEM: Lazy<Style> = Lazy::new(|| Style::new().red());
pub static HINT: Lazy<Style> = Lazy::new(|| Style::new().dim());
