//! Field store: the ordered collection of document fields.
//!
//! All mutations to field content pass through here, whether they come from
//! direct typing, a finished transcription, or an editor commit.

use crate::catalog::FieldSeed;
use crate::defaults;
use crate::error::{Result, VdraftError};

/// One named slot of document content. Identity is positional; names are
/// not guaranteed unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub content: String,
}

impl Field {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// The field created by "add field after": placeholder name, empty
    /// content.
    pub fn placeholder() -> Self {
        Self::new(defaults::PLACEHOLDER_FIELD_NAME, "")
    }
}

impl From<&FieldSeed> for Field {
    fn from(seed: &FieldSeed) -> Self {
        Self::new(seed.name.clone(), seed.content.clone())
    }
}

/// Ordered collection of fields. Non-empty for its whole lifetime; every
/// successful mutation bumps the revision counter exactly once so the view
/// layer re-renders once per mutation.
#[derive(Debug, Clone)]
pub struct FieldStore {
    fields: Vec<Field>,
    revision: u64,
}

impl FieldStore {
    /// Build the store from the document's seed schema.
    ///
    /// # Errors
    /// `DataShape` if the schema seeds no fields — the form has nothing to
    /// draft against.
    pub fn from_seeds(seeds: &[FieldSeed]) -> Result<Self> {
        if seeds.is_empty() {
            return Err(VdraftError::DataShape {
                message: "document schema seeds no fields".to_string(),
            });
        }

        Ok(Self {
            fields: seeds.iter().map(Field::from).collect(),
            revision: 0,
        })
    }

    /// Build the store directly from fields (tests, non-catalog callers).
    pub fn from_fields(fields: Vec<Field>) -> Result<Self> {
        if fields.is_empty() {
            return Err(VdraftError::DataShape {
                message: "field collection must not be empty".to_string(),
            });
        }

        Ok(Self {
            fields,
            revision: 0,
        })
    }

    /// Field at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// All fields, in render order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Monotonic counter; bumped once per successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace a field's content verbatim. No validation, no length limit,
    /// last write wins. Returns false (and changes nothing) for an
    /// out-of-range index.
    pub fn set_content(&mut self, index: usize, content: impl Into<String>) -> bool {
        match self.fields.get_mut(index) {
            Some(field) => {
                field.content = content.into();
                self.revision += 1;
                true
            }
            None => false,
        }
    }

    /// Insert a field immediately after `index`, shifting every later field
    /// one slot down. Returns the new field's index, or None (and changes
    /// nothing) if `index` is out of range.
    pub fn insert_after(&mut self, index: usize, field: Field) -> Option<usize> {
        if index >= self.fields.len() {
            return None;
        }

        let new_index = index + 1;
        self.fields.insert(new_index, field);
        self.revision += 1;
        Some(new_index)
    }
}
