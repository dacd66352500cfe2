//! Preview provider: the reduced projection of one referenced object.

use crate::api::types::{FilterResponse, PreviewCard};
use crate::api::worker::{ApiCommand, Slot};
use crate::api::ApiError;
use crate::query::{Query, View};

#[derive(Debug, Clone, Default)]
pub struct PreviewState {
    type_name: String,
    id: Option<i64>,
    generation: u64,
    fetched: Option<(String, i64)>,
    pub loading: bool,
    pub card: Option<PreviewCard>,
}

impl PreviewState {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            ..Default::default()
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn set_target(&mut self, id: Option<i64>) {
        self.id = id;
    }

    /// Start a fetch when the target changed. A cleared target (`None`)
    /// resets to the empty state without fetching.
    pub fn begin_fetch(&mut self, field: &str) -> Option<ApiCommand> {
        let Some(id) = self.id else {
            self.loading = false;
            self.card = None;
            self.fetched = None;
            return None;
        };

        let key = (self.type_name.clone(), id);
        if self.fetched.as_ref() == Some(&key) {
            return None;
        }

        self.generation += 1;
        self.loading = true;
        self.card = None;
        self.fetched = Some(key);

        Some(ApiCommand::Filter {
            slot: Slot::Preview {
                field: field.to_string(),
            },
            generation: self.generation,
            type_name: self.type_name.clone(),
            query: Query::by_id(id),
            view: View::preview(),
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
                self.card = response.items.first().map(PreviewCard::from_value);
                None
            }
            Err(err) => {
                self.card = None;
                self.fetched = None;
                Some(err.user_message())
            }
        }
    }
}
