//! Name-keyed synchronization of nested collections.
//!
//! Declared entries and observed entries are matched by name. Unmatched
//! declared entries are created, matched entries that differ are updated
//! in place under their existing identifier, and observed entries with no
//! declared counterpart are deleted.

use std::collections::{BTreeMap, HashSet};

use kc_admin::dto::ProtocolMapperRepresentation;
use kc_model::MapperSpec;

use crate::error::{ReconcileError, ReconcileResult};

// ============================================================================
// Named entries
// ============================================================================

/// An entry identified by a human-readable name.
pub trait Named {
    /// Returns the name the entry is matched by.
    fn name(&self) -> &str;
}

impl Named for MapperSpec {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for ProtocolMapperRepresentation {
    fn name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Actions bringing an observed collection in line with a declared one.
#[derive(Debug)]
pub struct SyncPlan<'d, 'o, D, O> {
    /// Declared entries with no observed counterpart.
    pub create: Vec<&'d D>,
    /// Declared entries paired with the differing observed entry.
    pub update: Vec<(&'d D, &'o O)>,
    /// Observed entries to remove.
    pub delete: Vec<&'o O>,
    /// Number of matched entries already in the declared state.
    pub unchanged: usize,
}

impl<D, O> SyncPlan<'_, '_, D, O> {
    /// Returns true if nothing needs to be done.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }
}

/// Computes the actions for one collection.
///
/// `same` decides whether a matched observed entry already holds the
/// declared state.
///
/// ## Errors
///
/// Returns `ReconcileError::DuplicateName` if two declared entries share a
/// name. Observed duplicates are tolerated: the first one is matched and
/// the others are deleted.
pub fn plan<'d, 'o, D, O, F>(
    collection: &'static str,
    desired: &'d [D],
    observed: &'o [O],
    same: F,
) -> ReconcileResult<SyncPlan<'d, 'o, D, O>>
where
    D: Named,
    O: Named,
    F: Fn(&D, &O) -> bool,
{
    let mut names = HashSet::with_capacity(desired.len());
    for entry in desired {
        if !names.insert(entry.name()) {
            return Err(ReconcileError::DuplicateName {
                collection,
                name: entry.name().to_string(),
            });
        }
    }

    let mut plan = SyncPlan {
        create: Vec::new(),
        update: Vec::new(),
        delete: Vec::new(),
        unchanged: 0,
    };

    let mut by_name: BTreeMap<&str, &'o O> = BTreeMap::new();
    for entry in observed {
        if by_name.contains_key(entry.name()) || !names.contains(entry.name()) {
            plan.delete.push(entry);
        } else {
            by_name.insert(entry.name(), entry);
        }
    }

    for entry in desired {
        match by_name.get(entry.name()) {
            None => plan.create.push(entry),
            Some(existing) if same(entry, existing) => plan.unchanged += 1,
            Some(existing) => plan.update.push((entry, *existing)),
        }
    }

    Ok(plan)
}

// ============================================================================
// Report
// ============================================================================

/// Counts of what a synchronization pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries created.
    pub created: usize,
    /// Entries updated in place.
    pub updated: usize,
    /// Entries deleted.
    pub deleted: usize,
    /// Entries already in the declared state.
    pub unchanged: usize,
}

impl SyncReport {
    /// Records a creation.
    pub fn record_created(&mut self) {
        self.created += 1;
    }

    /// Records an update.
    pub fn record_updated(&mut self) {
        self.updated += 1;
    }

    /// Records a deletion.
    pub fn record_deleted(&mut self) {
        self.deleted += 1;
    }

    /// Returns the number of mutations performed.
    #[must_use]
    pub fn mutations(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}
