//! Background worker that owns the HTTP client.
//!
//! The UI loop is a plain thread; it never awaits. Instead it queues
//! [`ApiCommand`]s, and a dedicated tokio runtime executes them
//! concurrently and delivers [`ApiEvent`] completions back through a
//! caller-supplied callback. Commands aimed at a provider carry that
//! provider's slot and generation; the provider drops completions whose
//! generation is stale, which is what makes re-fetch and navigation safe
//! against out-of-order responses.

use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::types::{
    CreateOutcome, FilterResponse, QuickResponse, SaveOutcome, TaskOutcome, TaskSubmission,
};
use crate::query::{Query, View};

/// Which provider a fetch or save belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// The detail view's single-object provider.
    Document,
    /// The list view's collection provider.
    Collection,
    /// The detail view's related-objects collection.
    Related,
    /// A preview provider attached to one reference field.
    Preview { field: String },
}

/// Who asked for a quick search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickOrigin {
    SearchView,
    Picker,
}

/// A request queued by the UI.
#[derive(Debug)]
pub enum ApiCommand {
    Filter {
        slot: Slot,
        generation: u64,
        type_name: String,
        query: Query,
        view: View,
    },
    Update {
        slot: Slot,
        generation: u64,
        /// Row index for collection saves; `None` for the document.
        row: Option<usize>,
        type_name: String,
        query: Query,
        data: Map<String, Value>,
    },
    Create {
        type_name: String,
        data: Value,
    },
    Delete {
        type_name: String,
        query: Query,
    },
    Quick {
        origin: QuickOrigin,
        generation: u64,
        query: String,
        types: Vec<String>,
    },
    SubmitTask {
        submission: TaskSubmission,
    },
}

/// A completion delivered back to the UI loop.
#[derive(Debug)]
pub enum ApiEvent {
    FilterDone {
        slot: Slot,
        generation: u64,
        result: Result<FilterResponse, ApiError>,
    },
    UpdateDone {
        slot: Slot,
        generation: u64,
        row: Option<usize>,
        result: Result<SaveOutcome, ApiError>,
    },
    CreateDone {
        type_name: String,
        result: Result<CreateOutcome, ApiError>,
    },
    DeleteDone {
        type_name: String,
        result: Result<(), ApiError>,
    },
    QuickDone {
        origin: QuickOrigin,
        generation: u64,
        result: Result<QuickResponse, ApiError>,
    },
    TaskDone {
        result: Result<TaskOutcome, ApiError>,
    },
}

/// Handle for queueing commands onto the worker.
#[derive(Debug, Clone)]
pub struct ApiWorker {
    commands: UnboundedSender<ApiCommand>,
}

impl ApiWorker {
    /// Queue a command. Silently dropped if the worker has shut down;
    /// by then the UI loop is exiting too.
    pub fn submit(&self, command: ApiCommand) {
        let _ = self.commands.send(command);
    }
}

/// Spawn the worker thread with its own single-threaded runtime.
pub fn spawn<F>(client: ApiClient, deliver: F) -> ApiWorker
where
    F: Fn(ApiEvent) + Send + Sync + 'static,
{
    let (tx, mut rx) = unbounded_channel::<ApiCommand>();
    let deliver = Arc::new(deliver);

    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!(error = %err, "failed to build api runtime");
                return;
            }
        };

        runtime.block_on(async move {
            while let Some(command) = rx.recv().await {
                let client = client.clone();
                let deliver = Arc::clone(&deliver);
                tokio::spawn(async move {
                    let event = execute(&client, command).await;
                    deliver(event);
                });
            }
        });
    });

    ApiWorker { commands: tx }
}

async fn execute(client: &ApiClient, command: ApiCommand) -> ApiEvent {
    match command {
        ApiCommand::Filter {
            slot,
            generation,
            type_name,
            query,
            view,
        } => {
            let result = client.filter(&type_name, &query, &view).await;
            ApiEvent::FilterDone {
                slot,
                generation,
                result,
            }
        }
        ApiCommand::Update {
            slot,
            generation,
            row,
            type_name,
            query,
            data,
        } => {
            let result = client.update(&type_name, &query, &data).await;
            ApiEvent::UpdateDone {
                slot,
                generation,
                row,
                result,
            }
        }
        ApiCommand::Create { type_name, data } => {
            let result = client.create(&type_name, &data).await;
            ApiEvent::CreateDone { type_name, result }
        }
        ApiCommand::Delete { type_name, query } => {
            let result = client.delete(&type_name, &query).await;
            ApiEvent::DeleteDone { type_name, result }
        }
        ApiCommand::Quick {
            origin,
            generation,
            query,
            types,
        } => {
            let result = client.quick(&query, &types).await;
            ApiEvent::QuickDone {
                origin,
                generation,
                result,
            }
        }
        ApiCommand::SubmitTask { submission } => {
            let result = client.submit_task(&submission).await;
            ApiEvent::TaskDone { result }
        }
    }
}
