//! Table printer

use crate::error::RenderError;
use crate::printers::Printer;
use crate::resource::ResourceIdentity;
use crate::summary::Summary;
use mutated_ownership::Resolution;
use serde_json::Value;
use std::io::Write;

const MIN_WIDTH: usize = 6;
const PADDING: usize = 3;

/// Aligned table of resources, managers and field counts
///
/// Rows are buffered and aligned on [`Printer::flush`].
#[derive(Debug)]
pub struct TablePrinter<W> {
    out: W,
    with_namespace: bool,
    rows: Vec<Vec<String>>,
}

impl<W: Write> TablePrinter<W> {
    /// Create printer; the header row is queued immediately
    pub fn new(out: W, with_namespace: bool) -> Self {
        let mut header = Vec::with_capacity(4);
        if with_namespace {
            header.push("NAMESPACE".to_string());
        }
        header.extend(["NAME", "MANAGERS", "COUNT"].map(str::to_string));
        Self {
            out,
            with_namespace,
            rows: vec![header],
        }
    }
}

impl<W: Write> Printer for TablePrinter<W> {
    fn print_object(
        &mut self,
        resource: &Value,
        resolution: &Resolution,
    ) -> Result<(), RenderError> {
        let identity = ResourceIdentity::of(resource)?;
        let summary = Summary::new(&identity, resolution);
        self.rows.push(summary.cells(self.with_namespace));
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max((cell.chars().count() + PADDING).max(MIN_WIDTH));
            }
        }

        for row in self.rows.drain(..) {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                if i + 1 == row.len() {
                    line.push_str(cell);
                } else {
                    let pad = widths[i] - cell.chars().count();
                    line.push_str(cell);
                    line.push_str(&" ".repeat(pad));
                }
            }
            writeln!(self.out, "{line}")?;
        }
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

    fn resolution(managers: &[&str], fields: usize) -> Resolution {
        let paths: Vec<Path> = (0..fields)
            .map(|i| Path::from_fields(["data".to_string(), format!("k{i}")]))
            .collect();
        Resolution {
            fields: FieldPathSet::from_paths(&paths),
            managers: managers.iter().map(|m| (*m).to_string()).collect(),
            unreadable: Vec::new(),
        }
    }

    fn config_map(name: &str, namespace: Option<&str>) -> Value {
        let mut resource = json!({"apiVersion": "v1", "kind": "ConfigMap", "metadata": {"name": name}});
        if let Some(ns) = namespace {
            resource["metadata"]["namespace"] = json!(ns);
        }
        resource
    }

    #[test]
    fn aligned_columns() {
        let mut printer = TablePrinter::new(Vec::new(), false);
        printer
            .print_object(&config_map("a", None), &resolution(&["kubectl-edit"], 3))
            .unwrap();
        printer
            .print_object(&config_map("settings", None), &resolution(&["helm", "kubectl"], 12))
            .unwrap();
        printer.flush().unwrap();

        let out = String::from_utf8(printer.out).unwrap();
        assert_eq!(
            out,
            "\
NAME                 MANAGERS       COUNT
configmap/a          kubectl-edit   3
configmap/settings   helm,kubectl   12
"
        );
    }

    #[test]
    fn namespace_column() {
        let mut printer = TablePrinter::new(Vec::new(), true);
        printer
            .print_object(&config_map("a", Some("dev")), &resolution(&["kubectl"], 1))
            .unwrap();
        printer
            .print_object(
                &json!({"apiVersion": "rbac.authorization.k8s.io/v1", "kind": "ClusterRole", "metadata": {"name": "view"}}),
                &resolution(&["kubectl"], 1),
            )
            .unwrap();
        printer.flush().unwrap();

        let out = String::from_utf8(printer.out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert!(lines[0].starts_with("NAMESPACE   NAME"));
        assert!(lines[1].starts_with("dev         configmap/a"));
        assert!(lines[2].starts_with("<none>      clusterrole.rbac.authorization.k8s.io/view"));
    }

    #[test]
    fn missing_identity_is_an_error() {
        let mut printer = TablePrinter::new(Vec::new(), false);
        let err = printer
            .print_object(&json!({"metadata": {}}), &resolution(&[], 0))
            .unwrap_err();
        assert!(matches!(err, RenderError::Resource(_)));
    }
}
