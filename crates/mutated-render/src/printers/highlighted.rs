//! Highlighted YAML printer

use crate::error::RenderError;
use crate::highlight::{highlight, Marker};
use crate::printers::{prepared, PrintOptions, Printer};
use crate::syntax::SyntaxTree;
use mutated_ownership::Resolution;
use serde_json::Value;
use std::io::Write;

/// YAML stream of full resources with solely-manual fields marked
#[derive(Debug)]
pub struct HighlightedYamlPrinter<W> {
    out: W,
    all_namespaces: bool,
    marker: Marker,
}

impl<W: Write> HighlightedYamlPrinter<W> {
    /// Create printer
    pub fn new(out: W, options: PrintOptions) -> Self {
        Self {
            out,
            all_namespaces: options.all_namespaces,
            marker: options.marker,
        }
    }
}

impl<W: Write> Printer for HighlightedYamlPrinter<W> {
    fn print_object(
        &mut self,
        resource: &Value,
        resolution: &Resolution,
    ) -> Result<(), RenderError> {
        let copy = prepared(resource, self.all_namespaces);
        let yaml = serde_yaml::to_string(&copy)?;
        let mut tree = SyntaxTree::parse(&yaml)?;
        highlight(&mut tree, &resolution.fields)?;

        writeln!(self.out, "---")?;
        self.out
            .write_all(tree.render_marked(&self.marker).as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        self.out.flush()?;
        Ok(())
    }
}
