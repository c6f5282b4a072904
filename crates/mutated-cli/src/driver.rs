//! Resource pipeline
//!
//! Selects resources, resolves their ownership and hands every resource with
//! a manual record to the printer. A resource that cannot be processed is
//! logged with its identity and skipped.

use crate::error::DocumentError;
use mutated_ownership::{OwnershipRecord, OwnershipResolver};
use mutated_render::{LabelSelector, Printer, RenderError, ResourceIdentity};
use serde_json::Value;

/// What happened to each resource of a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Handed to the printer
    pub printed: usize,
    /// Rejected by the namespace or label filters
    pub filtered: usize,
    /// No manual record
    pub unmanaged: usize,
    /// Logged and skipped
    pub failed: usize,
}

enum Outcome {
    Printed,
    Filtered,
    Unmanaged,
}

/// Per-resource pipeline
#[derive(Debug, Clone, Default)]
pub struct Driver {
    resolver: OwnershipResolver,
    selector: LabelSelector,
    namespace: Option<String>,
}

impl Driver {
    /// Create driver accepting every resource
    #[must_use]
    pub fn new(resolver: OwnershipResolver) -> Self {
        Self {
            resolver,
            selector: LabelSelector::default(),
            namespace: None,
        }
    }

    /// Keep only resources whose labels match
    #[must_use]
    pub fn with_selector(mut self, selector: LabelSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Keep only resources in one namespace
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Process resources in order, then flush the printer
    ///
    /// # Errors
    /// Returns [`RenderError`] only when writing output fails; every other
    /// per-resource failure is logged and counted in [`RunStats::failed`]
    pub fn run<'a>(
        &self,
        resources: impl IntoIterator<Item = &'a Value>,
        printer: &mut dyn Printer,
    ) -> Result<RunStats, RenderError> {
        let mut stats = RunStats::default();
        for resource in resources {
            match self.process(resource, printer) {
                Ok(Outcome::Printed) => stats.printed += 1,
                Ok(Outcome::Filtered) => stats.filtered += 1,
                Ok(Outcome::Unmanaged) => stats.unmanaged += 1,
                Err(DocumentError::Render(RenderError::Io(err))) => {
                    return Err(RenderError::Io(err));
                }
                Err(err) => {
                    tracing::warn!(resource = %describe(resource), "{err}");
                    stats.failed += 1;
                }
            }
        }
        printer.flush()?;
        tracing::debug!(?stats, "run complete");
        Ok(stats)
    }

    fn selects(&self, resource: &Value) -> bool {
        if let Some(namespace) = &self.namespace {
            let actual = resource
                .pointer("/metadata/namespace")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if actual != namespace.as_str() {
                return false;
            }
        }
        self.selector.matches(resource)
    }

    fn process(
        &self,
        resource: &Value,
        printer: &mut dyn Printer,
    ) -> Result<Outcome, DocumentError> {
        if !self.selects(resource) {
            return Ok(Outcome::Filtered);
        }

        let records = OwnershipRecord::from_resource(resource)?;
        if !self.resolver.classifier().has_manually_managed_fields(&records) {
            tracing::debug!("{} has no manual field manager", describe(resource));
            return Ok(Outcome::Unmanaged);
        }

        let resolution = self.resolver.resolve(&records)?;
        if !resolution.unreadable.is_empty() {
            tracing::warn!(
                resource = %describe(resource),
                managers = ?resolution.unreadable,
                "field sets could not be decoded"
            );
        }
        printer.print_object(resource, &resolution)?;
        Ok(Outcome::Printed)
    }
}

fn describe(resource: &Value) -> String {
    ResourceIdentity::of(resource)
        .map_or_else(|_| "unidentified resource".to_string(), |id| id.to_string())
}
