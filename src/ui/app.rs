//! The aggregate application state and its event handlers.
//!
//! `App` owns the data providers, the per-screen MVI states and a
//! command outbox. Handlers never perform I/O: they queue
//! [`ApiCommand`]s, and the runtime drains [`App::take_commands`] into
//! the worker after each event. That keeps every flow below drivable
//! from a test without a server.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{json, Map, Value};

use crate::api::{
    ApiCommand, ApiEvent, CreateOutcome, QuickOrigin, QuickResponse, Slot, TaskOutcome,
};
use crate::config::Config;
use crate::data::{CollectionState, Debouncer, DocumentState, PreviewState};
use crate::query::{Query, View};
use crate::routes::Route;
use crate::schema::{FieldKind, NumberFormat};
use crate::ui::create::{creation_fields, CreateIntent, CreateReducer, CreateSidebarState};
use crate::ui::form::{FieldEditor, FormIntent, FormReducer, FormState};
use crate::ui::mvi::Reducer;
use crate::ui::picker::{PickerDialogState, PickerIntent, PickerReducer};
use crate::ui::search::{groups_from_response, SearchIntent, SearchReducer, SearchViewState};
use crate::ui::table::{column_specs, default_columns, ColumnSpec, TableIntent, TableReducer, TableViewState};
use crate::ui::tasks::{TaskIntent, TaskReducer, TaskFormState};

const STATUS_TTL: Duration = Duration::from_secs(4);

/// Which pane of a detail view has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyFocus {
    #[default]
    Form,
    Related,
}

/// Generic MVI dispatch: takes current state, runs reducer, stores result.
macro_rules! dispatch_mvi {
    ($self:expr, $field:ident, $reducer:ty, $intent:expr) => {{
        $self.$field = <$reducer>::reduce(std::mem::take(&mut $self.$field), $intent);
    }};
}

pub struct App {
    should_quit: bool,
    route: Route,
    body_focus: BodyFocus,
    status: Option<(String, Instant)>,

    document: DocumentState,
    related: Option<CollectionState>,
    collection: CollectionState,
    previews: BTreeMap<String, PreviewState>,

    form: FormState,
    table: TableViewState,
    picker: PickerDialogState,
    sidebar: CreateSidebarState,
    search: SearchViewState,
    tasks: TaskFormState,

    debouncer: Debouncer,
    quick_generation: u64,
    commands: Vec<ApiCommand>,
    config: Config,
}

impl App {
    pub fn new(config: Config, initial_route: Route) -> Self {
        let debounce = Duration::from_millis(config.ui.debounce_ms);
        let mut app = Self {
            should_quit: false,
            route: Route::Search,
            body_focus: BodyFocus::default(),
            status: None,
            document: DocumentState::new(""),
            related: None,
            collection: CollectionState::new(
                Slot::Collection,
                "Vendor",
                Query::new(),
                View::new(),
            ),
            previews: BTreeMap::new(),
            form: FormState::default(),
            table: TableViewState::default(),
            picker: PickerDialogState::default(),
            sidebar: CreateSidebarState::default(),
            search: SearchViewState::default(),
            tasks: TaskFormState::default(),
            debouncer: Debouncer::new(debounce),
            quick_generation: 0,
            commands: Vec::new(),
            config,
        };
        app.navigate(initial_route);
        app
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn body_focus(&self) -> BodyFocus {
        self.body_focus
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|(message, _)| message.as_str())
    }

    pub fn document(&self) -> &DocumentState {
        &self.document
    }

    pub fn collection(&self) -> &CollectionState {
        &self.collection
    }

    pub fn related(&self) -> Option<&CollectionState> {
        self.related.as_ref()
    }

    pub fn preview(&self, field: &str) -> Option<&PreviewState> {
        self.previews.get(field)
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn table(&self) -> &TableViewState {
        &self.table
    }

    pub fn picker(&self) -> &PickerDialogState {
        &self.picker
    }

    pub fn sidebar(&self) -> &CreateSidebarState {
        &self.sidebar
    }

    pub fn search(&self) -> &SearchViewState {
        &self.search
    }

    pub fn tasks(&self) -> &TaskFormState {
        &self.tasks
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Column specs for the active collection table.
    pub fn columns(&self) -> Vec<ColumnSpec> {
        let state = match self.route {
            Route::Detail { .. } => match self.related.as_ref() {
                Some(related) => related,
                None => return Vec::new(),
            },
            _ => &self.collection,
        };
        let keys = default_columns(state.type_name());
        column_specs(state.type_name(), state.schema().and_then(|s| s.get(state.type_name())), &keys)
    }

    /// Drain the queued API commands for the runtime to submit.
    pub fn take_commands(&mut self) -> Vec<ApiCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn navigate(&mut self, route: Route) {
        self.body_focus = BodyFocus::Form;
        match &route {
            Route::Search => {}
            Route::Collection { type_name } => {
                let mut query = Query::new();
                query.set_page(1);
                self.collection.retarget(type_name, query, View::new());
                let command = self.collection.begin_fetch();
                self.commands.extend(command);
                dispatch_mvi!(self, table, TableReducer, TableIntent::Reset);
            }
            Route::Detail { type_name, id } => {
                self.document.set_target(type_name, Some(*id), View::new());
                let command = self.document.begin_fetch();
                self.commands.extend(command);
                self.related = related_plan(type_name, *id).map(|(rel_type, query, view)| {
                    let mut related = CollectionState::new(Slot::Related, &rel_type, query, view);
                    let command = related.begin_fetch();
                    self.commands.extend(command);
                    related
                });
                dispatch_mvi!(self, table, TableReducer, TableIntent::Reset);
            }
            Route::Tasks => {}
        }
        self.route = route;
    }

    pub fn on_tick(&mut self, now: Instant) {
        if let Some((_, since)) = &self.status {
            if now.duration_since(*since) >= STATUS_TTL {
                self.status = None;
            }
        }

        if let Some(input) = self.debouncer.fire_due(now) {
            self.dispatch_quick(input);
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = Some((message, Instant::now()));
    }

    /// One debounced quick search goes out per quiet burst. The picker
    /// narrows the search to the reference's target type.
    fn dispatch_quick(&mut self, input: String) {
        let (origin, types) = match &self.picker {
            PickerDialogState::Visible { idtype, .. } => {
                (QuickOrigin::Picker, vec![idtype.to_lowercase()])
            }
            PickerDialogState::Hidden => {
                (QuickOrigin::SearchView, self.config.ui.search_types.clone())
            }
        };

        match origin {
            QuickOrigin::Picker => dispatch_mvi!(self, picker, PickerReducer, PickerIntent::Loading),
            QuickOrigin::SearchView => {
                dispatch_mvi!(self, search, SearchReducer, SearchIntent::Loading)
            }
        }

        self.quick_generation += 1;
        self.commands.push(ApiCommand::Quick {
            origin,
            generation: self.quick_generation,
            query: input,
            types,
        });
    }

    // ---- API completions ------------------------------------------------

    pub fn handle_api(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::FilterDone {
                slot,
                generation,
                result,
            } => match slot {
                Slot::Document => {
                    if let Some(message) = self.document.complete_fetch(generation, result) {
                        self.set_status(message);
                    }
                    self.sync_document_views();
                }
                Slot::Collection => {
                    if let Some(message) = self.collection.complete_fetch(generation, result) {
                        self.set_status(message);
                    }
                    self.sync_table();
                }
                Slot::Related => {
                    if let Some(related) = self.related.as_mut() {
                        if let Some(message) = related.complete_fetch(generation, result) {
                            self.set_status(message);
                        }
                    }
                    self.sync_table();
                }
                Slot::Preview { field } => {
                    if let Some(preview) = self.previews.get_mut(&field) {
                        if let Some(message) = preview.complete_fetch(generation, result) {
                            self.set_status(message);
                        }
                    }
                }
            },
            ApiEvent::UpdateDone {
                slot,
                generation,
                row,
                result,
            } => match (slot, row) {
                (Slot::Document, _) => {
                    if let Some(message) = self.document.complete_save(generation, result) {
                        self.set_status(message);
                    } else if self.document.errors.is_empty() {
                        self.set_status("Saved.".to_string());
                    }
                }
                (Slot::Collection, Some(row)) => {
                    if let Some(message) = self.collection.complete_row_save(generation, row, result)
                    {
                        self.set_status(message);
                    }
                }
                (Slot::Related, Some(row)) => {
                    if let Some(related) = self.related.as_mut() {
                        if let Some(message) = related.complete_row_save(generation, row, result) {
                            self.set_status(message);
                        }
                    }
                }
                _ => {}
            },
            ApiEvent::CreateDone { type_name, result } => match result {
                Ok(CreateOutcome::Created(id)) => {
                    dispatch_mvi!(self, sidebar, CreateReducer, CreateIntent::Close);
                    self.collection.invalidate();
                    self.navigate(Route::detail(&type_name, id));
                }
                Ok(CreateOutcome::Rejected(errors)) => {
                    dispatch_mvi!(self, sidebar, CreateReducer, CreateIntent::Rejected { errors });
                }
                Err(err) => {
                    dispatch_mvi!(self, sidebar, CreateReducer, CreateIntent::Failed);
                    self.set_status(err.user_message());
                }
            },
            ApiEvent::DeleteDone { type_name: _, result } => match result {
                Ok(()) => {
                    self.set_status("Deleted.".to_string());
                    dispatch_mvi!(self, table, TableReducer, TableIntent::ClearSelection);
                    self.collection.invalidate();
                    let command = self.collection.begin_fetch();
                    self.commands.extend(command);
                }
                Err(err) => self.set_status(err.user_message()),
            },
            ApiEvent::QuickDone {
                origin,
                generation,
                result,
            } => {
                if generation != self.quick_generation {
                    return;
                }
                match (origin, result) {
                    (QuickOrigin::SearchView, Ok(response)) => {
                        let groups = groups_from_response(&response);
                        dispatch_mvi!(self, search, SearchReducer, SearchIntent::Results(groups));
                    }
                    (QuickOrigin::Picker, Ok(response)) => {
                        let results = flatten_results(&response);
                        dispatch_mvi!(self, picker, PickerReducer, PickerIntent::Results(results));
                    }
                    (QuickOrigin::SearchView, Err(err)) => {
                        dispatch_mvi!(self, search, SearchReducer, SearchIntent::Results(Vec::new()));
                        self.set_status(err.user_message());
                    }
                    (QuickOrigin::Picker, Err(err)) => {
                        dispatch_mvi!(self, picker, PickerReducer, PickerIntent::Results(Vec::new()));
                        self.set_status(err.user_message());
                    }
                }
            }
            ApiEvent::TaskDone { result } => match result {
                Ok(TaskOutcome::Accepted { message_id }) => {
                    dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::Accepted { message_id });
                }
                Ok(TaskOutcome::Rejected(errors)) => {
                    dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::Rejected { errors });
                }
                Err(err) => {
                    let message = err.user_message();
                    dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::Failed { message });
                }
            },
        }
    }

    /// After a document fetch lands: rebuild the form's field list and
    /// point a preview provider at every reference field.
    fn sync_document_views(&mut self) {
        let type_name = self.document.type_name().to_string();
        let fields: Vec<String> = self
            .document
            .schema()
            .and_then(|set| set.get(&type_name))
            .map(|schema| {
                schema
                    .visible_fields(None, &["id".to_string()])
                    .iter()
                    .map(|f| f.key.clone())
                    .collect()
            })
            .unwrap_or_default();

        for key in &fields {
            let Some(FieldKind::Reference { idtype }) =
                self.document.descriptor(key).map(|d| d.kind.clone())
            else {
                continue;
            };
            let target = self
                .document
                .display_value(key)
                .and_then(Value::as_i64);
            let preview = self
                .previews
                .entry(key.clone())
                .or_insert_with(|| PreviewState::new(&idtype));
            preview.set_target(target);
            let command = preview.begin_fetch(key);
            self.commands.extend(command);
        }

        dispatch_mvi!(self, form, FormReducer, FormIntent::Load { fields });
    }

    fn sync_table(&mut self) {
        let (rows, columns) = match self.route {
            Route::Detail { .. } => match self.related.as_ref() {
                Some(related) => (related.items.len(), self.columns().len()),
                None => (0, 0),
            },
            _ => (self.collection.items.len(), self.columns().len()),
        };
        dispatch_mvi!(
            self,
            table,
            TableReducer,
            TableIntent::Sync {
                row_count: rows,
                column_count: columns,
            }
        );
    }

    // ---- Key handling ---------------------------------------------------

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }

        if self.picker.is_visible() {
            self.on_picker_key(key, now);
            return;
        }
        if self.sidebar.is_visible() {
            self.on_sidebar_key(key);
            return;
        }

        match self.route.clone() {
            Route::Search => self.on_search_key(key, now),
            Route::Collection { .. } => self.on_collection_key(key),
            Route::Detail { type_name, .. } => self.on_detail_key(key, &type_name),
            Route::Tasks => self.on_tasks_key(key),
        }
    }

    fn on_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                dispatch_mvi!(self, search, SearchReducer, SearchIntent::Input(ch));
                self.debouncer.start(self.search.input.clone(), now);
            }
            KeyCode::Backspace => {
                dispatch_mvi!(self, search, SearchReducer, SearchIntent::Backspace);
                if self.search.input.is_empty() {
                    self.debouncer.cancel();
                } else {
                    self.debouncer.start(self.search.input.clone(), now);
                }
            }
            KeyCode::Up => dispatch_mvi!(self, search, SearchReducer, SearchIntent::MoveUp),
            KeyCode::Down => dispatch_mvi!(self, search, SearchReducer, SearchIntent::MoveDown),
            KeyCode::Enter => {
                dispatch_mvi!(self, search, SearchReducer, SearchIntent::Choose);
                if let Some((type_name, id)) = self.search.chosen.take() {
                    self.navigate(Route::detail(&type_name, id));
                }
            }
            KeyCode::Tab => self.navigate(Route::Tasks),
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn on_collection_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => dispatch_mvi!(self, table, TableReducer, TableIntent::CursorUp),
            KeyCode::Down => dispatch_mvi!(self, table, TableReducer, TableIntent::CursorDown),
            KeyCode::Left => dispatch_mvi!(self, table, TableReducer, TableIntent::ColumnLeft),
            KeyCode::Right => dispatch_mvi!(self, table, TableReducer, TableIntent::ColumnRight),
            KeyCode::Char(' ') => {
                if let Some(id) = self.collection.row_id(self.table.clamped_cursor()) {
                    dispatch_mvi!(self, table, TableReducer, TableIntent::ToggleSelect(vec![id]));
                }
            }
            KeyCode::Enter if self.table.header_focused => {
                let specs = self.columns();
                if let Some(spec) = specs.get(self.table.focused_column) {
                    if spec.sortable {
                        self.collection.toggle_sort(&spec.key);
                        let command = self.collection.begin_fetch();
                        self.commands.extend(command);
                    }
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.collection.row_id(self.table.clamped_cursor()) {
                    let type_name = self.collection.type_name().to_string();
                    self.navigate(Route::detail(&type_name, id));
                }
            }
            KeyCode::PageDown => self.flip_page(1),
            KeyCode::PageUp => self.flip_page(-1),
            KeyCode::Char('n') => {
                let type_name = self.collection.type_name().to_string();
                let fields = creation_fields(&type_name);
                dispatch_mvi!(
                    self,
                    sidebar,
                    CreateReducer,
                    CreateIntent::Open { type_name, fields }
                );
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.delete_selected();
            }
            KeyCode::Esc => self.navigate(Route::Search),
            _ => {}
        }
    }

    fn flip_page(&mut self, delta: i64) {
        let current = self.collection.page as i64;
        let pages = self.collection.pages.max(1) as i64;
        let next = (current + delta).clamp(1, pages);
        if next != current {
            self.collection.set_page(next as u64);
            let command = self.collection.begin_fetch();
            self.commands.extend(command);
        }
    }

    /// Delete the selection, or the focused row when nothing is selected.
    fn delete_selected(&mut self) {
        let ids: Vec<i64> = if self.table.selection.is_empty() {
            self.collection
                .row_id(self.table.clamped_cursor())
                .into_iter()
                .collect()
        } else {
            self.table.selection.iter().collect()
        };

        let type_name = self.collection.type_name().to_string();
        for id in ids {
            self.commands.push(ApiCommand::Delete {
                type_name: type_name.clone(),
                query: Query::by_id(id),
            });
        }
    }

    fn on_detail_key(&mut self, key: KeyEvent, type_name: &str) {
        if self.form.is_editing() {
            self.on_editor_key(key);
            return;
        }

        match key.code {
            KeyCode::Tab if self.related.is_some() => {
                self.body_focus = match self.body_focus {
                    BodyFocus::Form => BodyFocus::Related,
                    BodyFocus::Related => BodyFocus::Form,
                };
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let command = self.document.begin_save();
                if command.is_none() {
                    self.set_status("Nothing to save.".to_string());
                }
                self.commands.extend(command);
            }
            KeyCode::Esc => self.navigate(Route::collection(type_name)),
            _ => match self.body_focus {
                BodyFocus::Form => self.on_form_key(key),
                BodyFocus::Related => self.on_related_key(key),
            },
        }
    }

    fn on_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => dispatch_mvi!(self, form, FormReducer, FormIntent::FocusUp),
            KeyCode::Down => dispatch_mvi!(self, form, FormReducer, FormIntent::FocusDown),
            KeyCode::Enter => self.open_focused_editor(),
            _ => {}
        }
    }

    /// Open the editor matching the focused field's declared kind.
    fn open_focused_editor(&mut self) {
        let Some(field) = self.form.focused_field().map(str::to_string) else {
            return;
        };
        let kind = self.document.descriptor(&field).map(|d| d.kind.clone());

        match kind {
            Some(FieldKind::Reference { idtype }) => {
                dispatch_mvi!(
                    self,
                    picker,
                    PickerReducer,
                    PickerIntent::Open { field, idtype }
                );
            }
            Some(FieldKind::List) => {
                let items = self
                    .document
                    .display_value(&field)
                    .and_then(Value::as_array)
                    .map(|list| {
                        list.iter()
                            .map(|item| match item {
                                Value::String(s) => s.clone(),
                                other => other.to_string(),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                dispatch_mvi!(self, form, FormReducer, FormIntent::OpenList { field, items });
            }
            Some(FieldKind::Json) => {
                let text = self
                    .document
                    .display_value(&field)
                    .map(|value| value.to_string())
                    .unwrap_or_else(|| "{}".to_string());
                dispatch_mvi!(self, form, FormReducer, FormIntent::OpenJson { field, text });
            }
            Some(FieldKind::Unknown(tag)) => {
                self.set_status(format!("Field '{field}' has unknown type '{tag}'."));
            }
            Some(FieldKind::Text(_)) | Some(FieldKind::Number(_)) | None => {
                let current = match self.document.display_value(&field) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                dispatch_mvi!(
                    self,
                    form,
                    FormReducer,
                    FormIntent::OpenText { field, current }
                );
            }
        }
    }

    fn on_editor_key(&mut self, key: KeyEvent) {
        let in_list = matches!(self.form.editor, Some(FieldEditor::List { .. }));
        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                dispatch_mvi!(self, form, FormReducer, FormIntent::Input(ch));
            }
            KeyCode::Backspace => dispatch_mvi!(self, form, FormReducer, FormIntent::Backspace),
            KeyCode::Up if in_list => dispatch_mvi!(self, form, FormReducer, FormIntent::ListUp),
            KeyCode::Down if in_list => {
                dispatch_mvi!(self, form, FormReducer, FormIntent::ListDown)
            }
            KeyCode::Delete if in_list => {
                dispatch_mvi!(self, form, FormReducer, FormIntent::ListRemove)
            }
            KeyCode::Enter if in_list => {
                let has_input = matches!(
                    &self.form.editor,
                    Some(FieldEditor::List { input, .. }) if !input.is_empty()
                );
                if has_input {
                    dispatch_mvi!(self, form, FormReducer, FormIntent::ListAppend);
                } else {
                    self.commit_editor();
                }
            }
            KeyCode::Enter => self.commit_editor(),
            KeyCode::Esc => dispatch_mvi!(self, form, FormReducer, FormIntent::Cancel),
            _ => {}
        }
    }

    fn commit_editor(&mut self) {
        dispatch_mvi!(self, form, FormReducer, FormIntent::Commit);
        let Some((field, value)) = self.form.committed.take() else {
            return;
        };

        match self.convert_committed(&field, value) {
            Ok(value) => self.document.edit(&field, value),
            Err(message) => self.set_status(message),
        }
    }

    /// Text editors commit strings; numeric fields convert per their
    /// declared format before the edit is staged.
    fn convert_committed(&self, field: &str, value: Value) -> Result<Value, String> {
        let Some(FieldKind::Number(format)) = self.document.descriptor(field).map(|d| &d.kind)
        else {
            return Ok(value);
        };
        let Value::String(raw) = &value else {
            return Ok(value);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Value::Null);
        }
        match format {
            NumberFormat::Integer => trimmed
                .parse::<i64>()
                .map(|n| json!(n))
                .map_err(|_| format!("'{trimmed}' is not an integer.")),
            NumberFormat::Float | NumberFormat::Currency | NumberFormat::Percent => trimmed
                .parse::<f64>()
                .map(|n| json!(n))
                .map_err(|_| format!("'{trimmed}' is not a number.")),
        }
    }

    fn on_related_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => dispatch_mvi!(self, table, TableReducer, TableIntent::CursorUp),
            KeyCode::Down => dispatch_mvi!(self, table, TableReducer, TableIntent::CursorDown),
            KeyCode::Left => dispatch_mvi!(self, table, TableReducer, TableIntent::ColumnLeft),
            KeyCode::Right => dispatch_mvi!(self, table, TableReducer, TableIntent::ColumnRight),
            KeyCode::Enter if self.table.header_focused => {
                let specs = self.columns();
                let spec = specs.get(self.table.focused_column).cloned();
                if let (Some(spec), Some(related)) = (spec, self.related.as_mut()) {
                    if spec.sortable {
                        related.toggle_sort(&spec.key);
                        let command = related.begin_fetch();
                        self.commands.extend(command);
                    }
                }
            }
            KeyCode::Enter => {
                if let Some(related) = self.related.as_ref() {
                    if let Some(id) = related.row_id(self.table.clamped_cursor()) {
                        let type_name = related.type_name().to_string();
                        self.navigate(Route::detail(&type_name, id));
                    }
                }
            }
            _ => {}
        }
    }

    fn on_picker_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                dispatch_mvi!(self, picker, PickerReducer, PickerIntent::Input(ch));
                if let PickerDialogState::Visible { query, .. } = &self.picker {
                    self.debouncer.start(query.clone(), now);
                }
            }
            KeyCode::Backspace => {
                dispatch_mvi!(self, picker, PickerReducer, PickerIntent::Backspace);
                match &self.picker {
                    PickerDialogState::Visible { query, .. } if !query.is_empty() => {
                        self.debouncer.start(query.clone(), now);
                    }
                    _ => self.debouncer.cancel(),
                }
            }
            KeyCode::Up => dispatch_mvi!(self, picker, PickerReducer, PickerIntent::MoveUp),
            KeyCode::Down => dispatch_mvi!(self, picker, PickerReducer, PickerIntent::MoveDown),
            KeyCode::Enter => {
                dispatch_mvi!(self, picker, PickerReducer, PickerIntent::Choose);
                self.apply_pick();
            }
            KeyCode::Delete => {
                dispatch_mvi!(self, picker, PickerReducer, PickerIntent::Clear);
                self.apply_pick();
            }
            KeyCode::Esc => {
                self.debouncer.cancel();
                dispatch_mvi!(self, picker, PickerReducer, PickerIntent::Close);
            }
            _ => {}
        }
    }

    /// Drain a resolved pick into whichever screen opened the dialog.
    fn apply_pick(&mut self) {
        let Some(picked) = self.picker.take_picked() else {
            return;
        };
        self.debouncer.cancel();
        dispatch_mvi!(self, picker, PickerReducer, PickerIntent::Close);

        if matches!(self.route, Route::Tasks) {
            dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::SetExtension(picked.id));
            return;
        }

        let value = match picked.id {
            Some(id) => json!(id),
            None => Value::Null,
        };
        self.document.edit(&picked.field, value);

        if let Some(preview) = self.previews.get_mut(&picked.field) {
            preview.set_target(picked.id);
            let command = preview.begin_fetch(&picked.field);
            self.commands.extend(command);
        }
    }

    fn on_sidebar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                dispatch_mvi!(self, sidebar, CreateReducer, CreateIntent::Input(ch));
            }
            KeyCode::Backspace => {
                dispatch_mvi!(self, sidebar, CreateReducer, CreateIntent::Backspace)
            }
            KeyCode::Up | KeyCode::BackTab => {
                dispatch_mvi!(self, sidebar, CreateReducer, CreateIntent::FocusUp)
            }
            KeyCode::Down | KeyCode::Tab => {
                dispatch_mvi!(self, sidebar, CreateReducer, CreateIntent::FocusDown)
            }
            KeyCode::Enter => self.submit_creation(),
            KeyCode::Esc => dispatch_mvi!(self, sidebar, CreateReducer, CreateIntent::Close),
            _ => {}
        }
    }

    /// Queue the create request from the sidebar's filled inputs.
    fn submit_creation(&mut self) {
        let CreateSidebarState::Visible {
            type_name,
            fields,
            submitting,
            ..
        } = &self.sidebar
        else {
            return;
        };
        if *submitting {
            return;
        }

        let mut data = Map::new();
        for field in fields {
            if !field.value.is_empty() {
                data.insert(field.key.clone(), json!(field.value));
            }
        }
        if data.is_empty() {
            self.set_status("Nothing to create.".to_string());
            return;
        }

        let type_name = type_name.clone();
        dispatch_mvi!(self, sidebar, CreateReducer, CreateIntent::Submitted);
        self.commands.push(ApiCommand::Create {
            type_name,
            data: Value::Object(data),
        });
    }

    fn on_tasks_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::Submit);
                if let Some(submission) = self.tasks.submission.clone() {
                    dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::ClearSubmission);
                    self.commands.push(ApiCommand::SubmitTask { submission });
                }
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::Input(ch));
            }
            KeyCode::Backspace => dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::Backspace),
            KeyCode::Tab | KeyCode::Down => {
                dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::FocusNext)
            }
            KeyCode::BackTab | KeyCode::Up => {
                dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::FocusPrevious)
            }
            KeyCode::Delete => {
                // Dismiss the oldest transport error first, then receipts.
                if !self.tasks.errors.is_empty() {
                    dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::DismissError(0));
                } else if !self.tasks.receipts.is_empty() {
                    dispatch_mvi!(self, tasks, TaskReducer, TaskIntent::DismissReceipt(0));
                }
            }
            KeyCode::Enter if self.tasks.focused == crate::ui::tasks::TaskField::Extension => {
                dispatch_mvi!(
                    self,
                    picker,
                    PickerReducer,
                    PickerIntent::Open {
                        field: "ext_id".to_string(),
                        idtype: "Extension".to_string(),
                    }
                );
            }
            KeyCode::Esc => self.navigate(Route::Search),
            _ => {}
        }
    }
}

/// Which related collection a detail page shows beside the document.
fn related_plan(type_name: &str, id: i64) -> Option<(String, Query, View)> {
    match type_name {
        "Vendor" => Some((
            "Listing".to_string(),
            Query::from_value(json!({ "vendor_id": id })),
            View::from_value(json!({ "vendor": { "_only": ["name"] } })),
        )),
        "Extension" => Some((
            "Vendor".to_string(),
            Query::from_value(json!({ "ext_id": id })),
            View::new(),
        )),
        _ => None,
    }
}

fn flatten_results(response: &QuickResponse) -> Vec<crate::api::PreviewCard> {
    response
        .groups
        .values()
        .flat_map(|group| group.results.iter().cloned())
        .collect()
}
