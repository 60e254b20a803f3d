//! Change detection between a declared spec and an observed object.
//!
//! An attribute changes only when the declared value is present and
//! differs from the observed one. A missing declared value leaves the
//! observed value alone, whatever it is.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

use tracing::{debug, info};

/// Whether the target object is being created or updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffMode {
    /// Populating a new object; values are logged at debug level.
    Create,
    /// Updating an existing object; every change is logged at info level.
    Update,
}

/// Applies declared values onto an observed representation and records
/// which attributes changed.
#[derive(Debug)]
pub struct Diff<'a> {
    path: &'a str,
    mode: DiffMode,
    changed: Vec<&'static str>,
}

impl<'a> Diff<'a> {
    /// Starts populating a new object.
    #[must_use]
    pub const fn create(path: &'a str) -> Self {
        Self::new(path, DiffMode::Create)
    }

    /// Starts updating an existing object.
    #[must_use]
    pub const fn update(path: &'a str) -> Self {
        Self::new(path, DiffMode::Update)
    }

    const fn new(path: &'a str, mode: DiffMode) -> Self {
        Self {
            path,
            mode,
            changed: Vec::new(),
        }
    }

    /// Reconciles a plain attribute.
    pub fn field<T>(&mut self, name: &'static str, desired: Option<&T>, observed: &mut Option<T>)
    where
        T: PartialEq + Clone + Debug,
    {
        let Some(desired) = desired else {
            return;
        };
        if observed.as_ref() == Some(desired) {
            return;
        }
        self.record(name, observed.as_ref(), desired);
        *observed = Some(desired.clone());
    }

    /// Reconciles a list attribute whose order carries no meaning.
    pub fn set_field(
        &mut self,
        name: &'static str,
        desired: Option<&Vec<String>>,
        observed: &mut Option<Vec<String>>,
    ) {
        let Some(desired) = desired else {
            return;
        };
        let wanted: BTreeSet<&String> = desired.iter().collect();
        let current: Option<BTreeSet<&String>> = observed.as_ref().map(|o| o.iter().collect());
        if current.as_ref() == Some(&wanted) {
            return;
        }
        self.record(name, observed.as_ref(), desired);
        *observed = Some(desired.clone());
    }

    /// Reconciles an entry of a string-valued attribute map.
    pub fn attribute(
        &mut self,
        name: &'static str,
        key: &str,
        desired: Option<String>,
        attributes: &mut Option<BTreeMap<String, String>>,
    ) {
        let Some(desired) = desired else {
            return;
        };
        let current = attributes.as_ref().and_then(|a| a.get(key));
        if current == Some(&desired) {
            return;
        }
        self.record(name, current, &desired);
        attributes
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), desired);
    }

    fn record<T: Debug>(&mut self, name: &'static str, observed: Option<&T>, desired: &T) {
        match self.mode {
            DiffMode::Create => debug!("{}: set {} to {:?}", self.path, name, desired),
            DiffMode::Update => match observed {
                Some(observed) => {
                    info!("{}: change {} from {:?} to {:?}", self.path, name, observed, desired);
                }
                None => info!("{}: change {} from null to {:?}", self.path, name, desired),
            },
        }
        self.changed.push(name);
    }

    /// Returns true if any attribute changed.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        !self.changed.is_empty()
    }

    /// Returns the names of the changed attributes.
    #[must_use]
    pub fn changed(&self) -> &[&'static str] {
        &self.changed
    }
}

/// Encodes a flag the way string-valued attribute maps expect it.
#[must_use]
pub fn bool_string(value: Option<bool>) -> Option<String> {
    value.map(|v| if v { "true" } else { "false" }.to_string())
}
