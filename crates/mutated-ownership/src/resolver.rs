//! Ownership resolver
//!
//! Combines every record on a document into the set of leaf fields that only
//! manual managers claim.
//!
//! # Policy
//! - Automated records whose fields cannot be decoded are skipped
//! - Manual records whose fields cannot be decoded are kept (listed as
//!   owners and as unreadable) so a possible manual edit is never hidden
//! - A field claimed by both a manual and an automated manager is system
//!   managed

use crate::classifier::Classifier;
use crate::error::ResolveError;
use crate::record::OwnershipRecord;
use mutated_fieldpath::{DecodeError, FieldPathSet};
use std::collections::BTreeSet;

/// Resolved ownership of one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Leaf fields solely attributable to manual managers
    pub fields: FieldPathSet,

    /// Manual managers that contributed (sorted, unique)
    pub managers: Vec<String>,

    /// Contributing managers whose fields could not be decoded
    pub unreadable: Vec<String>,
}

impl Resolution {
    /// No manual manager contributed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.managers.is_empty()
    }
}

/// Kept candidate with its decoded fields, if readable
struct SoleOwner<'r> {
    record: &'r OwnershipRecord,
    fields: Option<FieldPathSet>,
}

/// Resolver over a classifier
#[derive(Debug, Clone, Default)]
pub struct OwnershipResolver {
    classifier: Classifier,
}

impl OwnershipResolver {
    /// Create resolver
    #[inline]
    #[must_use]
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    /// Classifier in use
    #[inline]
    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Resolve fields and contributing managers
    ///
    /// # Errors
    /// Returns [`ResolveError`] only when the decoder refuses a manual
    /// manager's payload for a reason other than malformed input; automated
    /// payloads that cannot be decoded are logged and skipped
    pub fn resolve(&self, records: &[OwnershipRecord]) -> Result<Resolution, ResolveError> {
        let owners = self.select(records)?;

        let mut fields = FieldPathSet::new();
        let mut managers = BTreeSet::new();
        let mut unreadable = BTreeSet::new();
        for owner in owners {
            managers.insert(owner.record.manager.clone());
            match owner.fields {
                Some(set) => fields = fields.union(&set),
                None => {
                    unreadable.insert(owner.record.manager.clone());
                }
            }
        }

        Ok(Resolution {
            fields: fields.leaves(),
            managers: managers.into_iter().collect(),
            unreadable: unreadable.into_iter().collect(),
        })
    }

    /// Leaf fields solely attributable to manual managers
    ///
    /// # Errors
    /// See [`OwnershipResolver::resolve`]
    pub fn solely_manually_managed(
        &self,
        records: &[OwnershipRecord],
    ) -> Result<FieldPathSet, ResolveError> {
        self.resolve(records).map(|resolution| resolution.fields)
    }

    /// Manual records that own at least one field no automated manager claims
    ///
    /// # Errors
    /// See [`OwnershipResolver::resolve`]
    pub fn sole_manual_owners<'r>(
        &self,
        records: &'r [OwnershipRecord],
    ) -> Result<Vec<&'r OwnershipRecord>, ResolveError> {
        Ok(self
            .select(records)?
            .into_iter()
            .map(|owner| owner.record)
            .collect())
    }

    fn select<'r>(&self, records: &'r [OwnershipRecord]) -> Result<Vec<SoleOwner<'r>>, ResolveError> {
        let (candidates, others): (Vec<_>, Vec<_>) = records
            .iter()
            .partition(|record| self.classifier.is_manual_record(record));

        let system = system_managed_set(&others);

        let mut owners = Vec::new();
        for record in candidates {
            match record.decode_fields() {
                Ok(set) => {
                    if set.leaves().difference(&system).is_empty() {
                        tracing::debug!("{} only owns system-managed fields", record.manager);
                        continue;
                    }
                    owners.push(SoleOwner {
                        record,
                        fields: Some(set),
                    });
                }
                Err(e) if e.is_malformed() => {
                    warn_invalid(record, &e);
                    owners.push(SoleOwner {
                        record,
                        fields: None,
                    });
                }
                Err(e) => return Err(ResolveError::decode(&record.manager, e)),
            }
        }
        Ok(owners)
    }
}

/// Leaves of everything automated managers claim
///
/// Payloads that cannot be decoded, for any reason, claim nothing.
fn system_managed_set(others: &[&OwnershipRecord]) -> FieldPathSet {
    others
        .iter()
        .fold(FieldPathSet::new(), |acc, record| match record.decode_fields() {
            Ok(set) => acc.union(&set.leaves()).leaves(),
            Err(e) => {
                warn_invalid(record, &e);
                acc
            }
        })
}

fn warn_invalid(record: &OwnershipRecord, error: &DecodeError) {
    tracing::warn!(
        manager = %record.manager,
        fields_v1 = %record.raw_fields(),
        "found invalid FieldsV1: {}",
        error
    );
}
