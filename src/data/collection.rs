//! Collection provider: one page of records with per-row edit sets.
//!
//! Row edits and errors are indexed by row position, not id, mirroring
//! how the table renders them. A bulk save without an explicit index
//! plans a save for every row; each row's outcome is isolated, so a
//! rejection at row k never suppresses the attempt at row k+1.

use serde_json::{Map, Value};

use crate::api::types::{FieldErrors, FilterResponse, SaveOutcome};
use crate::api::worker::{ApiCommand, Slot};
use crate::api::ApiError;
use crate::data::key::{needs_fetch, FetchKey};
use crate::query::{Query, View};
use crate::schema::{FieldDescriptor, SchemaSet};

#[derive(Debug, Clone)]
pub struct CollectionState {
    slot: Slot,
    type_name: String,
    query: Query,
    view: View,
    generation: u64,
    fetched_key: Option<FetchKey>,
    pub loading: bool,
    pub items: Vec<Value>,
    pub total: u64,
    pub page: u64,
    pub pages: u64,
    pub per_page: u64,
    schema: Option<SchemaSet>,
    row_edits: Vec<Map<String, Value>>,
    row_errors: Vec<FieldErrors>,
}

impl CollectionState {
    pub fn new(slot: Slot, type_name: &str, query: Query, view: View) -> Self {
        Self {
            slot,
            type_name: type_name.to_string(),
            query,
            view,
            generation: 0,
            fetched_key: None,
            loading: false,
            items: Vec::new(),
            total: 0,
            page: 1,
            pages: 0,
            per_page: 0,
            schema: None,
            row_edits: Vec::new(),
            row_errors: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn retarget(&mut self, type_name: &str, query: Query, view: View) {
        self.type_name = type_name.to_string();
        self.query = query;
        self.view = view;
    }

    /// Flip the `_sort` direction of a column. The caller follows up with
    /// [`CollectionState::begin_fetch`]; the key change makes it fire.
    pub fn toggle_sort(&mut self, column: &str) {
        self.query.toggle_sort(column);
    }

    pub fn set_page(&mut self, page: u64) {
        self.query.set_page(page);
    }

    /// Force the next [`CollectionState::begin_fetch`] to fire even with
    /// an unchanged key, e.g. after a delete mutated the server side.
    pub fn invalidate(&mut self) {
        self.fetched_key = None;
    }

    pub fn begin_fetch(&mut self) -> Option<ApiCommand> {
        let key = FetchKey::new(&self.type_name, self.query.clone(), self.view.clone());
        if !needs_fetch(self.fetched_key.as_ref(), &key) {
            return None;
        }

        self.generation += 1;
        self.loading = true;
        self.fetched_key = Some(key.clone());

        Some(ApiCommand::Filter {
            slot: self.slot.clone(),
            generation: self.generation,
            type_name: key.type_name,
            query: key.query,
            view: key.view,
        })
    }

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
                self.total = response.total;
                self.page = response.page;
                self.pages = response.pages;
                self.per_page = response.per_page;
                self.row_edits = vec![Map::new(); response.items.len()];
                self.row_errors = vec![FieldErrors::new(); response.items.len()];
                self.items = response.items;
                None
            }
            Err(err) => {
                self.fetched_key = None;
                Some(err.user_message())
            }
        }
    }

    /// Stage an edit on one row; staging the original value un-stages.
    pub fn edit_row(&mut self, row: usize, field: &str, value: Value) {
        let Some(edits) = self.row_edits.get_mut(row) else {
            return;
        };
        let original = self.items.get(row).and_then(|item| item.get(field));
        if original == Some(&value) {
            edits.remove(field);
        } else {
            edits.insert(field.to_string(), value);
        }
    }

    pub fn row_edits(&self, row: usize) -> Option<&Map<String, Value>> {
        self.row_edits.get(row)
    }

    pub fn row_errors(&self, row: usize) -> Option<&FieldErrors> {
        self.row_errors.get(row)
    }

    pub fn row_id(&self, row: usize) -> Option<i64> {
        self.items.get(row)?.get("id")?.as_i64()
    }

    /// Rows a save will visit. An explicit index saves that row alone; no
    /// index plans every row from 0 to len-1 unconditionally.
    pub fn save_plan(&self, index: Option<usize>) -> Vec<usize> {
        match index {
            Some(row) => vec![row],
            None => (0..self.items.len()).collect(),
        }
    }

    /// Start a save for one row. Rows with no staged edits or no
    /// persisted id are skipped.
    pub fn begin_row_save(&mut self, row: usize) -> Option<ApiCommand> {
        let edits = self.row_edits.get(row)?;
        if edits.is_empty() {
            return None;
        }
        let id = self.row_id(row)?;

        Some(ApiCommand::Update {
            slot: self.slot.clone(),
            generation: self.generation,
            row: Some(row),
            type_name: self.type_name.clone(),
            query: Query::by_id(id),
            data: edits.clone(),
        })
    }

    pub fn complete_row_save(
        &mut self,
        generation: u64,
        row: usize,
        result: Result<SaveOutcome, ApiError>,
    ) -> Option<String> {
        if generation != self.generation {
            return None;
        }

        match result {
            Ok(SaveOutcome::Applied(_)) => {
                let edits = self
                    .row_edits
                    .get_mut(row)
                    .map(std::mem::take)
                    .unwrap_or_default();
                if let Some(map) = self.items.get_mut(row).and_then(Value::as_object_mut) {
                    for (field, value) in edits {
                        map.insert(field, value);
                    }
                }
                if let Some(errors) = self.row_errors.get_mut(row) {
                    errors.clear();
                }
                None
            }
            Ok(SaveOutcome::Rejected(errors)) => {
                if let Some(slot) = self.row_errors.get_mut(row) {
                    *slot = errors;
                }
                None
            }
            Err(err) => Some(err.user_message()),
        }
    }

    pub fn descriptor(&self, field: &str) -> Option<&FieldDescriptor> {
        self.schema.as_ref()?.get(&self.type_name)?.field(field)
    }

    pub fn schema(&self) -> Option<&SchemaSet> {
        self.schema.as_ref()
    }
}
