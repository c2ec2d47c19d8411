//! Partial-update builder for post records.
//!
//! A [`RecordPatch`] accumulates SET clauses against a single record without
//! committing to any store's expression syntax. Adapters render the clauses
//! into their native update form; the builder only guarantees which
//! attributes change and to what values.

use crate::error::PostError;

/// A typed attribute value carried by a SET clause.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// A string scalar.
    S(String),
    /// A numeric scalar, stored as epoch milliseconds or similar.
    N(i64),
    /// A string set. Must not be empty when written.
    Ss(Vec<String>),
}

/// One `attribute = value` assignment within a patch.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    attribute: String,
    value: AttrValue,
}

impl SetClause {
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn value(&self) -> &AttrValue {
        &self.value
    }

    /// Expression name placeholder for this clause, e.g. `#title`.
    pub fn name_placeholder(&self) -> String {
        format!("#{}", self.attribute)
    }

    /// Expression value placeholder for this clause, e.g. `:title`.
    pub fn value_placeholder(&self) -> String {
        format!(":{}", self.attribute)
    }
}

/// An accumulated partial update for one record.
#[derive(Debug, Clone)]
pub struct RecordPatch {
    id: String,
    clauses: Vec<SetClause>,
}

impl RecordPatch {
    /// Starts an empty patch for the record with the given id.
    pub fn for_id(id: impl Into<String>) -> Result<Self, PostError> {
        let id = id.into();
        if id.is_empty() {
            return Err(PostError::Validation("id is required".into()));
        }
        Ok(Self {
            id,
            clauses: Vec::new(),
        })
    }

    /// Adds a SET clause. Setting an attribute that is already present
    /// replaces its value in place.
    pub fn set(&mut self, attribute: impl Into<String>, value: AttrValue) {
        let attribute = attribute.into();
        if let Some(existing) = self.clauses.iter_mut().find(|c| c.attribute == attribute) {
            existing.value = value;
        } else {
            self.clauses.push(SetClause { attribute, value });
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn clauses(&self) -> &[SetClause] {
        &self.clauses
    }

    /// True when no SET clause has been added yet.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
