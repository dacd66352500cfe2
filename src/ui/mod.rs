//! Terminal UI: MVI feature states, the aggregate [`app::App`], and the
//! rendering/runtime plumbing around them.

pub mod app;
pub mod create;
pub mod events;
pub mod form;
pub mod layout;
pub mod mvi;
pub mod picker;
pub mod render;
pub mod runtime;
pub mod search;
pub mod table;
pub mod tasks;
pub mod terminal_guard;
pub mod theme;
