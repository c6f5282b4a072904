//! Actor classifier
//!
//! Decides whether a field manager is operated by a human (kubectl, the helm
//! CLI, ...) or by a controller. Classification depends only on the manager
//! name and, for the GitOps reconciler, on the fields that record owns.

use crate::record::OwnershipRecord;
use crate::rules::ClassifierRules;
use mutated_fieldpath::FieldPathSet;

/// Outcome of classifying one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorClass {
    /// Human-operated tool
    Manual,

    /// Controller or operator
    Automated,
}

impl ActorClass {
    /// Whether this is [`ActorClass::Manual`]
    #[inline]
    #[must_use]
    pub fn is_manual(self) -> bool {
        matches!(self, Self::Manual)
    }
}

/// Classifier over a fixed rule set
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: ClassifierRules,
    trigger_set: FieldPathSet,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierRules::builtin())
    }
}

impl Classifier {
    /// Create classifier from rules
    #[must_use]
    pub fn new(rules: ClassifierRules) -> Self {
        let trigger_set = rules.reconcile_trigger_set();
        Self { rules, trigger_set }
    }

    /// Rules in use
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &ClassifierRules {
        &self.rules
    }

    /// Classify by manager name alone
    ///
    /// The GitOps reconciler cannot be decided without its fields and is
    /// reported as manual.
    #[must_use]
    pub fn is_manual(&self, actor: &str) -> bool {
        self.is_reconciler(actor) || self.matches_manual_name(actor)
    }

    /// Classify a record, inspecting the reconciler's owned fields
    #[must_use]
    pub fn classify(&self, record: &OwnershipRecord) -> ActorClass {
        if self.is_reconciler(&record.manager) {
            return self.classify_reconciler(record);
        }
        if self.matches_manual_name(&record.manager) {
            ActorClass::Manual
        } else {
            ActorClass::Automated
        }
    }

    /// Shorthand for `classify(record).is_manual()`
    #[inline]
    #[must_use]
    pub fn is_manual_record(&self, record: &OwnershipRecord) -> bool {
        self.classify(record).is_manual()
    }

    /// Whether any record is classified manual
    #[must_use]
    pub fn has_manually_managed_fields(&self, records: &[OwnershipRecord]) -> bool {
        records.iter().any(|record| self.is_manual_record(record))
    }

    fn is_reconciler(&self, actor: &str) -> bool {
        self.rules.gitops_reconciler_id.as_deref() == Some(actor)
    }

    fn matches_manual_name(&self, actor: &str) -> bool {
        let prefixed = self
            .rules
            .manual_prefixes
            .iter()
            .any(|prefix| actor.starts_with(prefix.as_str()))
            && !self.rules.automated_exceptions.iter().any(|e| e == actor);

        prefixed || self.rules.manual_exact_names.iter().any(|name| name == actor)
    }

    /// Automated only when every owned leaf is a reconcile trigger
    fn classify_reconciler(&self, record: &OwnershipRecord) -> ActorClass {
        match record.decode_fields() {
            Ok(set) if set.leaves().difference(&self.trigger_set).is_empty() => {
                tracing::debug!("{} only owns reconcile triggers", record.manager);
                ActorClass::Automated
            }
            Ok(_) => ActorClass::Manual,
            Err(e) => {
                tracing::warn!(
                    manager = %record.manager,
                    fields_v1 = %record.raw_fields(),
                    "found invalid FieldsV1: {}",
                    e
                );
                ActorClass::Manual
            }
        }
    }
}
