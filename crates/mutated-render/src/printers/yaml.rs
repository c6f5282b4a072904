//! Filtered YAML printer

use crate::error::RenderError;
use crate::printers::{prepared, Printer};
use crate::project::filter_resource;
use mutated_ownership::Resolution;
use serde_json::Value;
use std::io::Write;

/// YAML stream of resources reduced to their solely-manual fields
#[derive(Debug)]
pub struct FilteredYamlPrinter<W> {
    out: W,
    all_namespaces: bool,
}

impl<W: Write> FilteredYamlPrinter<W> {
    /// Create printer
    pub fn new(out: W, all_namespaces: bool) -> Self {
        Self {
            out,
            all_namespaces,
        }
    }
}

impl<W: Write> Printer for FilteredYamlPrinter<W> {
    fn print_object(
        &mut self,
        resource: &Value,
        resolution: &Resolution,
    ) -> Result<(), RenderError> {
        let copy = prepared(resource, self.all_namespaces);
        let filtered = filter_resource(&copy, &resolution.fields)?;
        let yaml = serde_yaml::to_string(&filtered)?;

        writeln!(self.out, "---")?;
        self.out.write_all(yaml.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), RenderError> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutated_ownership::{OwnershipRecord, OwnershipResolver};
    use mutated_test_utils::mixed_pod;
    use pretty_assertions::assert_eq;

    fn print(all_namespaces: bool) -> String {
        let pod = mixed_pod();
        let records = OwnershipRecord::from_resource(&pod).unwrap();
        let resolution = OwnershipResolver::default().resolve(&records).unwrap();

        let mut printer = FilteredYamlPrinter::new(Vec::new(), all_namespaces);
        printer.print_object(&pod, &resolution).unwrap();
        printer.flush().unwrap();
        String::from_utf8(printer.out).unwrap()
    }

    #[test]
    fn filtered_document() {
        assert_eq!(
            print(false),
            "\
---
apiVersion: v1
kind: Pod
metadata:
  name: test
spec:
  containers:
  - name: test
    image: alpine:3.22
"
        );
    }

    #[test]
    fn keeps_namespace_across_namespaces() {
        assert!(print(true).contains("  namespace: default\n"));
    }
}
