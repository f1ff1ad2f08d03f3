//! Change set extraction from submitted baseline/desired pairs.
//!
//! Each editable field arrives as a desired value under its own name and a
//! baseline under `<name>.old`. Only fields whose two values differ end up
//! in the [`ChangeSet`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::MergeError;

/// Suffix of the parameter carrying a field's baseline value.
pub const BASELINE_SUFFIX: &str = ".old";

/// A single field edit: what the client read and what it wants written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Field name (member of the editable allow-list)
    pub name: String,
    /// Value the client read before editing
    #[serde(default)]
    pub baseline: Option<String>,
    /// Value the client wants to write
    #[serde(default)]
    pub desired: Option<String>,
}

impl FieldChange {
    /// Creates a field change.
    pub fn new(name: impl Into<String>, baseline: Option<&str>, desired: Option<&str>) -> Self {
        Self {
            name: name.into(),
            baseline: baseline.map(str::to_string),
            desired: desired.map(str::to_string),
        }
    }

    /// Baseline with absent normalized to the empty string.
    pub fn baseline(&self) -> &str {
        self.baseline.as_deref().unwrap_or("")
    }

    /// Desired value with absent normalized to the empty string.
    pub fn desired(&self) -> &str {
        self.desired.as_deref().unwrap_or("")
    }

    /// Returns `true` if baseline and desired differ.
    pub fn is_change(&self) -> bool {
        self.baseline() != self.desired()
    }

    fn normalized(name: &str, baseline: Option<&str>, desired: Option<&str>, strip_cr: bool) -> Self {
        Self {
            name: name.to_string(),
            baseline: Some(normalize(baseline, strip_cr)),
            desired: Some(normalize(desired, strip_cr)),
        }
    }
}

fn normalize(value: Option<&str>, strip_cr: bool) -> String {
    let value = value.unwrap_or("");
    if strip_cr {
        value.replace('\r', "")
    } else {
        value.to_string()
    }
}

/// Fixed allow-list of editable field names.
///
/// The identity field can never be part of the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableFields {
    identity: String,
    fields: Vec<String>,
}

impl EditableFields {
    /// Creates an allow-list.
    ///
    /// # Arguments
    /// * `identity` - Name of the identity field, which is never editable
    /// * `fields` - Editable field names, in the order changes are reported
    ///
    /// # Returns
    /// `Result<EditableFields, MergeError>`; fails if the identity field or a
    /// duplicate name is listed.
    pub fn new<I, S>(identity: impl Into<String>, fields: I) -> Result<Self, MergeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let identity = identity.into();
        let mut list: Vec<String> = Vec::new();
        for field in fields {
            let field = field.into();
            if field.is_empty() {
                return Err(MergeError::Validation(
                    "editable field names must not be empty".to_string(),
                ));
            }
            if field.eq_ignore_ascii_case(&identity) {
                return Err(MergeError::Validation(format!(
                    "identity field '{}' cannot be editable",
                    identity
                )));
            }
            if list.contains(&field) {
                return Err(MergeError::DuplicateField { field });
            }
            list.push(field);
        }
        Ok(Self {
            identity,
            fields: list,
        })
    }

    /// Returns the identity field name.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns `true` if `name` is editable (exact match).
    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// Rejects names outside the allow-list.
    pub fn validate(&self, name: &str) -> Result<(), MergeError> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(MergeError::DisallowedField {
                field: name.to_string(),
            })
        }
    }

    /// Iterates over editable field names in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Returns the number of editable fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is editable.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Fields that genuinely changed, keyed by unique name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSet {
    changes: Vec<FieldChange>,
}

impl ChangeSet {
    /// Creates an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extracts changed fields from flat submitted parameters.
    ///
    /// For each editable field, `params[name]` is the desired value and
    /// `params[name + ".old"]` the baseline. Missing values count as empty;
    /// comparison is exact. Parameters outside the allow-list are ignored.
    ///
    /// # Arguments
    /// * `params` - Submitted parameters
    /// * `fields` - Editable allow-list
    /// * `strip_cr` - Remove carriage returns before comparing
    pub fn extract(
        params: &HashMap<String, String>,
        fields: &EditableFields,
        strip_cr: bool,
    ) -> Self {
        let mut changes = Vec::new();
        for name in fields.iter() {
            let desired = params.get(name).map(String::as_str);
            let baseline = params
                .get(&format!("{}{}", name, BASELINE_SUFFIX))
                .map(String::as_str);
            let change = FieldChange::normalized(name, baseline, desired, strip_cr);
            if change.is_change() {
                changes.push(change);
            }
        }
        Self { changes }
    }

    /// Builds a change set from explicit field changes.
    ///
    /// Unlike [`ChangeSet::extract`], names are validated: a field outside
    /// the allow-list or submitted twice is a validation failure. Unchanged
    /// fields are dropped.
    pub fn from_changes<I>(
        changes: I,
        fields: &EditableFields,
        strip_cr: bool,
    ) -> Result<Self, MergeError>
    where
        I: IntoIterator<Item = FieldChange>,
    {
        let mut seen: Vec<String> = Vec::new();
        let mut kept = Vec::new();
        for change in changes {
            fields.validate(&change.name)?;
            if seen.contains(&change.name) {
                return Err(MergeError::DuplicateField { field: change.name });
            }
            seen.push(change.name.clone());

            let change = FieldChange::normalized(
                &change.name,
                change.baseline.as_deref(),
                change.desired.as_deref(),
                strip_cr,
            );
            if change.is_change() {
                kept.push(change);
            }
        }

        // Report in allow-list order regardless of submission order
        kept.sort_by_key(|c| fields.iter().position(|f| f == c.name));
        Ok(Self { changes: kept })
    }

    /// Returns `true` if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Returns the number of changed fields.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Looks up the change for a field.
    pub fn get(&self, name: &str) -> Option<&FieldChange> {
        self.changes.iter().find(|c| c.name == name)
    }

    /// Iterates over changes in allow-list order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldChange> {
        self.changes.iter()
    }

    /// Returns the changed field names.
    pub fn names(&self) -> Vec<&str> {
        self.changes.iter().map(|c| c.name.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a FieldChange;
    type IntoIter = std::slice::Iter<'a, FieldChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.iter()
    }
}
