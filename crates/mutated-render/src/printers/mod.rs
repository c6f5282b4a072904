//! Output printers
//!
//! Each printer receives a resource together with its resolved ownership and
//! writes one output item. [`Printer::flush`] completes the output (table
//! alignment, JSON list trailer).

mod highlighted;
mod json;
mod table;
mod yaml;

pub use highlighted::HighlightedYamlPrinter;
pub use json::FilteredJsonPrinter;
pub use table::TablePrinter;
pub use yaml::FilteredYamlPrinter;

use crate::error::RenderError;
use crate::highlight::Marker;
use crate::resource::{strip_managed_fields, strip_namespace};
use mutated_ownership::Resolution;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};
use std::io::Write;
use std::str::FromStr;

/// Resource printer
pub trait Printer {
    /// Print one resource
    ///
    /// # Errors
    /// Returns [`RenderError`] if the resource cannot be filtered,
    /// highlighted, serialized or written
    fn print_object(&mut self, resource: &Value, resolution: &Resolution)
        -> Result<(), RenderError>;

    /// Finish output
    ///
    /// # Errors
    /// Returns [`RenderError`] if writing fails
    fn flush(&mut self) -> Result<(), RenderError>;
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table with manual managers and mutated field count
    #[default]
    Table,
    /// YAML stream with mutated fields highlighted
    HighlightedYaml,
    /// YAML stream filtered to mutated fields
    FilteredYaml,
    /// JSON list filtered to mutated fields
    FilteredJson,
}

impl OutputFormat {
    /// All formats, in help order
    pub const ALL: [Self; 4] = [
        Self::Table,
        Self::FilteredJson,
        Self::FilteredYaml,
        Self::HighlightedYaml,
    ];

    /// Flag value
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::HighlightedYaml => "hyaml",
            Self::FilteredYaml => "fyaml",
            Self::FilteredJson => "fjson",
        }
    }

    /// One-line description
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Self::Table => "Table with manual managers and mutated fields count",
            Self::HighlightedYaml => "YAML stream with mutated fields highlighted",
            Self::FilteredYaml => "YAML stream filtered to mutated fields",
            Self::FilteredJson => "JSON filtered to mutated fields",
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::Table);
        }
        Self::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| format!("unrecognized printer: {s}"))
    }
}

/// Options shared by all printers
#[derive(Debug, Clone, Copy, Default)]
pub struct PrintOptions {
    /// Resources come from all namespaces: keep namespaces in output
    pub all_namespaces: bool,
    /// Marker for highlighted output
    pub marker: Marker,
}

/// Create the printer for a format
///
/// # Errors
/// Returns [`RenderError::Io`] if the format writes a header and that fails
pub fn printer_for<W: Write + 'static>(
    format: OutputFormat,
    options: PrintOptions,
    out: W,
) -> Result<Box<dyn Printer>, RenderError> {
    Ok(match format {
        OutputFormat::Table => Box::new(TablePrinter::new(out, options.all_namespaces)),
        OutputFormat::HighlightedYaml => Box::new(HighlightedYamlPrinter::new(out, options)),
        OutputFormat::FilteredYaml => {
            Box::new(FilteredYamlPrinter::new(out, options.all_namespaces))
        }
        OutputFormat::FilteredJson => {
            Box::new(FilteredJsonPrinter::new(out, options.all_namespaces)?)
        }
    })
}

/// Copy of a resource prepared for output
fn prepared(resource: &Value, all_namespaces: bool) -> Value {
    let mut copy = resource.clone();
    strip_managed_fields(&mut copy);
    if !all_namespaces {
        strip_namespace(&mut copy);
    }
    copy
}
