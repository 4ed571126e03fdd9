use console::style;
use std::fmt::Display;

/// Cyan bold: interviewer questions
pub fn question<D: Display>(text: D) -> String {
    style(text).cyan().bold().to_string()
}

/// White bold: session banners, report titles
pub fn header<D: Display>(text: D) -> String {
    style(text).white().bold().to_string()
}

/// Dim: usage lines, secondary text
pub fn dim<D: Display>(text: D) -> String {
    style(text).dim().to_string()
}

/// Yellow: notices and degraded-path warnings
pub fn notice<D: Display>(text: D) -> String {
    style(text).yellow().to_string()
}

/// Green: saved paths, counts
pub fn value<D: Display>(text: D) -> String {
    style(text).green().to_string()
}

/// Green bold: completed steps
pub fn success<D: Display>(text: D) -> String {
    style(text).green().bold().to_string()
}

/// Cyan: table labels
pub fn label<D: Display>(text: D) -> String {
    style(text).cyan().to_string()
}
