//! Single-object provider: one record, staged edits, save.
//!
//! Holds the fetched record, the schema that came with it, and a staged
//! edit map. Edits live here until a save succeeds; a rejected save keeps
//! them staged so the user can correct and resubmit. All completions are
//! generation-checked so a response from a superseded fetch or an
//! abandoned view cannot clobber current state.

use serde_json::{Map, Value};

use crate::api::types::{FieldErrors, FilterResponse, SaveOutcome};
use crate::api::worker::{ApiCommand, Slot};
use crate::api::ApiError;
use crate::data::key::{needs_fetch, FetchKey};
use crate::query::{Query, View};
use crate::schema::{FieldDescriptor, SchemaSet};

#[derive(Debug, Clone, Default)]
pub struct DocumentState {
    type_name: String,
    id: Option<i64>,
    view: View,
    generation: u64,
    fetched_key: Option<FetchKey>,
    pub loading: bool,
    pub doc: Option<Value>,
    schema: Option<SchemaSet>,
    edits: Map<String, Value>,
    pub errors: FieldErrors,
}

impl DocumentState {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            ..Default::default()
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn id(&self) -> Option<i64> {
        self.id
    }

    /// Point the provider at a record. Does not fetch by itself; call
    /// [`DocumentState::begin_fetch`] afterwards.
    pub fn set_target(&mut self, type_name: &str, id: Option<i64>, view: View) {
        self.type_name = type_name.to_string();
        self.id = id;
        self.view = view;
    }

    /// Start a fetch if the identifying inputs changed. Returns the
    /// command to queue, or `None` when the current state is already for
    /// this key (or there is no target).
    pub fn begin_fetch(&mut self) -> Option<ApiCommand> {
        let Some(id) = self.id else {
            self.clear();
            return None;
        };

        let key = FetchKey::new(&self.type_name, Query::by_id(id), self.view.clone());
        if !needs_fetch(self.fetched_key.as_ref(), &key) {
            return None;
        }

        self.generation += 1;
        self.loading = true;
        self.fetched_key = Some(key.clone());

        Some(ApiCommand::Filter {
            slot: Slot::Document,
            generation: self.generation,
            type_name: key.type_name,
            query: key.query,
            view: key.view,
        })
    }

    /// Apply a fetch completion. Stale generations are dropped. Returns a
    /// banner message on transport failure.
    pub fn complete_fetch(
        &mut self,
        generation: u64,
        result: Result<FilterResponse, ApiError>,
    ) -> Option<String> {
        if generation != self.generation {
            return None;
        }

        self.loading = false;
        match result {
            Ok(response) => {
                if let Some(schema) = response.schema_set() {
                    self.schema = Some(schema);
                }
                self.doc = response.items.into_iter().next();
                self.edits.clear();
                self.errors.clear();
                None
            }
            Err(err) => {
                self.doc = None;
                // Allow a retry to re-issue the same key.
                self.fetched_key = None;
                Some(err.user_message())
            }
        }
    }

    /// Stage a new value for a field. Staging the original value back
    /// un-stages the edit.
    pub fn edit(&mut self, field: &str, value: Value) {
        let original = self.doc.as_ref().and_then(|doc| doc.get(field));
        if original == Some(&value) {
            self.edits.remove(field);
        } else {
            self.edits.insert(field.to_string(), value);
        }
    }

    pub fn has_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Exactly the staged edit map; this is what a save sends.
    pub fn save_payload(&self) -> &Map<String, Value> {
        &self.edits
    }

    /// The record with staged edits merged over it, for display.
    pub fn edited(&self) -> Option<Value> {
        let doc = self.doc.as_ref()?;
        let mut merged = doc.clone();
        if let Some(map) = merged.as_object_mut() {
            for (field, value) in &self.edits {
                map.insert(field.clone(), value.clone());
            }
        }
        Some(merged)
    }

    /// Current display value of a field: staged edit if present,
    /// otherwise the fetched value.
    pub fn display_value(&self, field: &str) -> Option<&Value> {
        self.edits
            .get(field)
            .or_else(|| self.doc.as_ref().and_then(|doc| doc.get(field)))
    }

    pub fn descriptor(&self, field: &str) -> Option<&FieldDescriptor> {
        self.schema
            .as_ref()?
            .get(&self.type_name)?
            .field(field)
    }

    pub fn schema(&self) -> Option<&SchemaSet> {
        self.schema.as_ref()
    }

    /// Start a save of the staged edits. `None` when there is nothing to
    /// send.
    pub fn begin_save(&mut self) -> Option<ApiCommand> {
        if self.edits.is_empty() {
            return None;
        }
        let id = self.id?;

        self.generation += 1;
        self.loading = true;

        Some(ApiCommand::Update {
            slot: Slot::Document,
            generation: self.generation,
            row: None,
            type_name: self.type_name.clone(),
            query: Query::by_id(id),
            data: self.edits.clone(),
        })
    }

    /// Apply a save completion. On success the staged edits merge into
    /// the record and clear; on rejection they stay staged and the field
    /// errors are exposed.
    pub fn complete_save(
        &mut self,
        generation: u64,
        result: Result<SaveOutcome, ApiError>,
    ) -> Option<String> {
        if generation != self.generation {
            return None;
        }

        self.loading = false;
        match result {
            Ok(SaveOutcome::Applied(_)) => {
                if let Some(map) = self.doc.as_mut().and_then(Value::as_object_mut) {
                    for (field, value) in std::mem::take(&mut self.edits) {
                        map.insert(field, value);
                    }
                } else {
                    self.edits.clear();
                }
                self.errors.clear();
                None
            }
            Ok(SaveOutcome::Rejected(errors)) => {
                self.errors = errors;
                None
            }
            Err(err) => Some(err.user_message()),
        }
    }

    fn clear(&mut self) {
        self.loading = false;
        self.doc = None;
        self.schema = None;
        self.edits.clear();
        self.errors.clear();
        self.fetched_key = None;
    }
}
