//! REST client for the catalog backend.

mod client;
mod error;
pub mod types;
pub mod worker;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    CreateOutcome, FieldErrors, FilterResponse, PreviewCard, QuickGroup, QuickResponse,
    SaveOutcome, TaskOutcome, TaskSubmission,
};
pub use worker::{ApiCommand, ApiEvent, ApiWorker, QuickOrigin, Slot};
