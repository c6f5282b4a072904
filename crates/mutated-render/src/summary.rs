//! Summary row of one resource

use crate::resource::ResourceIdentity;
use mutated_ownership::Resolution;

/// Table row: where the resource is, who touched it, how many fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Namespace, `None` for cluster-scoped resources
    pub namespace: Option<String>,
    /// `kind[.group]/name`
    pub name: String,
    /// Contributing manual managers, sorted
    pub managers: Vec<String>,
    /// Number of solely-manually-managed leaf fields
    pub count: usize,
}

impl Summary {
    /// Summarize a resolved resource
    #[must_use]
    pub fn new(identity: &ResourceIdentity, resolution: &Resolution) -> Self {
        Self {
            namespace: identity.namespace.clone(),
            name: identity.name_column(),
            managers: resolution.managers.clone(),
            count: resolution.fields.size(),
        }
    }

    /// Cells of the row; the namespace cell only when requested
    #[must_use]
    pub fn cells(&self, with_namespace: bool) -> Vec<String> {
        let mut cells = Vec::with_capacity(4);
        if with_namespace {
            cells.push(self.namespace.clone().unwrap_or_else(|| "<none>".to_string()));
        }
        cells.push(self.name.clone());
        cells.push(self.managers.join(","));
        cells.push(self.count.to_string());
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutated_ownership::{OwnershipRecord, OwnershipResolver};
    use mutated_test_utils::{edited_namespace, mixed_pod};

    fn summarize(resource: &serde_json::Value) -> Summary {
        let records = OwnershipRecord::from_resource(resource).unwrap();
        let resolution = OwnershipResolver::default().resolve(&records).unwrap();
        Summary::new(&ResourceIdentity::of(resource).unwrap(), &resolution)
    }

    #[test]
    fn namespaced_row() {
        let summary = summarize(&mixed_pod());
        assert_eq!(summary.cells(true), vec!["default", "pod/test", "kubectl", "2"]);
        assert_eq!(summary.cells(false), vec!["pod/test", "kubectl", "2"]);
    }

    #[test]
    fn cluster_scoped_row() {
        let summary = summarize(&edited_namespace());
        assert_eq!(summary.cells(true), vec!["<none>", "namespace/sandbox", "kubectl-label", "1"]);
    }
}
