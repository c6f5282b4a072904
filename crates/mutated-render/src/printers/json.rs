//! Filtered JSON printer
//!
//! Streams a `v1` `List` whose items are written as they arrive; the closing
//! part of the list is written by [`Printer::flush`].

use crate::error::RenderError;
use crate::printers::{prepared, Printer};
use crate::project::filter_resource;
use mutated_ownership::Resolution;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::io::Write;

const INDENT: &str = "    ";
const HEADER: &str = "{\n    \"apiVersion\": \"v1\",\n    \"items\": [";
const TRAILER: &str = "    ],\n    \"kind\": \"List\"\n}";

/// JSON list of resources reduced to their solely-manual fields
#[derive(Debug)]
pub struct FilteredJsonPrinter<W> {
    out: W,
    all_namespaces: bool,
    first: bool,
}

impl<W: Write> FilteredJsonPrinter<W> {
    /// Create printer and write the list header
    ///
    /// # Errors
    /// Returns [`RenderError::Io`] if the header cannot be written
    pub fn new(mut out: W, all_namespaces: bool) -> Result<Self, RenderError> {
        out.write_all(HEADER.as_bytes())?;
        Ok(Self {
            out,
            all_namespaces,
            first: true,
        })
    }
}

impl<W: Write> Printer for FilteredJsonPrinter<W> {
    fn print_object(
        &mut self,
        resource: &Value,
        resolution: &Resolution,
    ) -> Result<(), RenderError> {
        let copy = prepared(resource, self.all_namespaces);
        let filtered = filter_resource(&copy, &resolution.fields)?;

        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT.as_bytes()));
        filtered.serialize(&mut ser)?;
        let item = String::from_utf8_lossy(&buf);
        let prefix = INDENT.repeat(2);

        if !self.first {
            self.out.write_all(b",")?;
        }
        write!(self.out, "\n{prefix}{}", item.replace('\n', &format!("\n{prefix}")))?;
        self.first = false;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        writeln!(self.out)?;
        writeln!(self.out, "{TRAILER}")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutated_fieldpath::{FieldPathSet, Path};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn resolution(paths: &[Path]) -> Resolution {
        Resolution {
            fields: FieldPathSet::from_paths(paths),
            managers: vec!["kubectl".to_string()],
            unreadable: Vec::new(),
        }
    }

    #[test]
    fn empty_list() {
        let mut printer = FilteredJsonPrinter::new(Vec::new(), false).unwrap();
        printer.flush().unwrap();
        let out = String::from_utf8(printer.out).unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&out).unwrap(),
            json!({"apiVersion": "v1", "kind": "List", "items": []})
        );
    }

    #[test]
    fn streamed_items() {
        let config = |name: &str| {
            json!({
                "apiVersion": "v1",
                "kind": "ConfigMap",
                "metadata": {"name": name, "namespace": "dev"},
                "data": {"a": "1", "b": "2"}
            })
        };
        let set = resolution(&[Path::from_fields(["data", "b"])]);

        let mut printer = FilteredJsonPrinter::new(Vec::new(), false).unwrap();
        printer.print_object(&config("one"), &set).unwrap();
        printer.print_object(&config("two"), &set).unwrap();
        printer.flush().unwrap();
        let out = String::from_utf8(printer.out).unwrap();

        assert_eq!(
            out,
            r#"{
    "apiVersion": "v1",
    "items": [
        {
            "apiVersion": "v1",
            "kind": "ConfigMap",
            "metadata": {
                "name": "one"
            },
            "data": {
                "b": "2"
            }
        },
        {
            "apiVersion": "v1",
            "kind": "ConfigMap",
            "metadata": {
                "name": "two"
            },
            "data": {
                "b": "2"
            }
        }
    ],
    "kind": "List"
}
"#
        );
    }
}
