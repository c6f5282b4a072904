//! Classifier rules
//!
//! Which field managers count as manually operated. Rules are plain data so
//! they can be loaded per deployment from YAML or TOML; unset keys keep the
//! built-in values.

use crate::error::RulesError;
use mutated_fieldpath::{FieldPathSet, Path};
use serde::{Deserialize, Serialize};
use std::path::Path as FsPath;

const FLUX_REQUESTED_AT: &str = "reconcile.fluxcd.io/requestedAt";
const FLUX_FORCE_AT: &str = "reconcile.fluxcd.io/forceAt";

/// Manual/automated classification rules
///
/// # Examples
/// ```yaml
/// manual_prefixes: [kubectl]
/// automated_exceptions: [kubectl-rollout]
/// manual_exact_names: [helm, Helm]
/// gitops_reconciler_id: flux
/// reconcile_trigger_paths:
///   - [metadata, annotations, reconcile.fluxcd.io/requestedAt]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifierRules {
    /// Managers starting with one of these are manual
    pub manual_prefixes: Vec<String>,

    /// Managers equal to one of these are manual
    pub manual_exact_names: Vec<String>,

    /// Managers matching a manual prefix that are nevertheless automated
    pub automated_exceptions: Vec<String>,

    /// GitOps reconciler that is automated only while it touches nothing
    /// but the reconcile trigger paths
    pub gitops_reconciler_id: Option<String>,

    /// Field-name paths the reconciler may own while still being automated
    pub reconcile_trigger_paths: Vec<Vec<String>>,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ClassifierRules {
    /// Built-in rules
    ///
    /// - `kubectl*` except `kubectl-rollout`
    /// - helm CLI: `helm` (generic client), `Helm` (release storage user-agent)
    /// - `Sparkles`
    /// - `flux`, unless it only requested or forced a reconcile
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            manual_prefixes: vec!["kubectl".to_string()],
            manual_exact_names: vec!["helm".to_string(), "Helm".to_string(), "Sparkles".to_string()],
            automated_exceptions: vec!["kubectl-rollout".to_string()],
            gitops_reconciler_id: Some("flux".to_string()),
            reconcile_trigger_paths: [FLUX_REQUESTED_AT, FLUX_FORCE_AT]
                .into_iter()
                .map(|annotation| {
                    vec![
                        "metadata".to_string(),
                        "annotations".to_string(),
                        annotation.to_string(),
                    ]
                })
                .collect(),
        }
    }

    /// Parse rules from YAML
    ///
    /// # Errors
    /// Returns error if YAML is invalid or a trigger path is empty
    pub fn from_yaml(yaml: &str) -> Result<Self, RulesError> {
        let rules: Self = serde_yaml::from_str(yaml)?;
        rules.validate()
    }

    /// Parse rules from TOML
    ///
    /// # Errors
    /// Returns error if TOML is invalid or a trigger path is empty
    pub fn from_toml(source: &str) -> Result<Self, RulesError> {
        let rules: Self = toml::from_str(source)?;
        rules.validate()
    }

    /// Load rules from a `.yaml`, `.yml` or `.toml` file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, has another extension, or
    /// does not parse
    pub fn load(path: &FsPath) -> Result<Self, RulesError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, RulesError> = match ext.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml,
            Some("toml") => Self::from_toml,
            _ => return Err(RulesError::UnsupportedFormat(path.to_path_buf())),
        };

        let source =
            std::fs::read_to_string(path).map_err(|e| RulesError::io_error(path, e))?;
        parse(&source)
    }

    /// Trigger paths as a field-path set
    #[must_use]
    pub fn reconcile_trigger_set(&self) -> FieldPathSet {
        let paths: Vec<Path> = self
            .reconcile_trigger_paths
            .iter()
            .map(|fields| Path::from_fields(fields))
            .collect();
        FieldPathSet::from_paths(&paths)
    }

    fn validate(self) -> Result<Self, RulesError> {
        if let Some(index) = self.reconcile_trigger_paths.iter().position(Vec::is_empty) {
            return Err(RulesError::EmptyTriggerPath(index));
        }
        Ok(self)
    }
}
