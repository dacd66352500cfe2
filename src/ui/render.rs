//! Pure view layer: renders the [`App`] state, mutates nothing.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap};
use ratatui::Frame;
use serde_json::Value;

use crate::data::CollectionState;
use crate::routes::Route;
use crate::ui::app::{App, BodyFocus};
use crate::ui::create::CreateSidebarState;
use crate::ui::form::FieldEditor;
use crate::ui::layout::{centered_rect, layout_regions, sidebar_split, two_column};
use crate::ui::picker::PickerDialogState;
use crate::ui::table::{render_cell, ColumnSpec};
use crate::ui::tasks::TaskField;
use crate::ui::theme;

pub fn draw(frame: &mut Frame, app: &App) {
    let (header, body, footer) = layout_regions(frame.area());

    draw_header(frame, header, app);
    match app.route() {
        Route::Search => draw_search(frame, body, app),
        Route::Collection { .. } => draw_collection(frame, body, app),
        Route::Detail { .. } => draw_detail(frame, body, app),
        Route::Tasks => draw_tasks(frame, body, app),
    }
    draw_footer(frame, footer, app);

    if app.picker().is_visible() {
        draw_picker(frame, frame.area(), app);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled("colander", Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(app.route().path(), Style::default().fg(theme::HEADER_TEXT)),
    ]);
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(theme::GLOBAL_BORDER));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let hints = match app.route() {
        Route::Search => "type to search · enter open · tab tasks · ctrl-q quit",
        Route::Collection { .. } => {
            "enter open · space select · n new · ctrl-d delete · pgup/pgdn page · esc search"
        }
        Route::Detail { .. } => "enter edit · ctrl-s save · tab pane · esc back",
        Route::Tasks => "tab field · enter pick extension · ctrl-s submit · del dismiss · esc search",
    };

    let line = match app.status() {
        Some(message) => Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme::STATUS_ERROR),
        )),
        None => Line::from(Span::styled(hints, Style::default().fg(theme::MUTED_TEXT))),
    };
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(theme::GLOBAL_BORDER));
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn draw_search(frame: &mut Frame, area: Rect, app: &App) {
    let search = app.search();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("search: ", Style::default().fg(theme::MUTED_TEXT)),
            Span::raw(search.input.clone()),
            Span::styled("█", Style::default().fg(theme::ACCENT)),
        ]),
        Line::raw(""),
    ];

    if search.loading {
        lines.push(Line::styled("searching…", Style::default().fg(theme::MUTED_TEXT)));
    }

    for (group_index, group) in search.groups.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("{} ({})", group.type_name, group.total),
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        )));
        for (row_index, card) in group.results.iter().enumerate() {
            let focused = search.focused == Some((group_index, row_index));
            let style = if focused {
                Style::default().bg(theme::ACTIVE_HIGHLIGHT).fg(theme::HEADER_TEXT)
            } else {
                Style::default()
            };
            lines.push(Line::styled(format!("  {}", card.title_or_placeholder()), style));
        }
        lines.push(Line::raw(""));
    }

    let block = bordered("Search");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_collection(frame: &mut Frame, area: Rect, app: &App) {
    let (table_area, sidebar_area) = if app.sidebar().is_visible() {
        let (left, right) = sidebar_split(area);
        (left, Some(right))
    } else {
        (area, None)
    };

    draw_object_table(frame, table_area, app, app.collection(), true);
    if let Some(sidebar_area) = sidebar_area {
        draw_sidebar(frame, sidebar_area, app);
    }
}

fn draw_object_table(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    collection: &CollectionState,
    active: bool,
) {
    let specs = app.columns();
    let table_state = app.table();
    let type_name = collection.type_name();
    let schema = collection.schema().and_then(|s| s.get(type_name));

    let header_style = if active && table_state.header_focused {
        Style::default().bg(theme::ACTIVE_HIGHLIGHT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let header = Row::new(specs.iter().enumerate().map(|(index, spec)| {
        let mut label = spec.header.clone();
        if let Some(dir) = collection.query().sort_dir(&spec.key) {
            label.push_str(match dir {
                crate::query::SortDir::Ascending => " ▲",
                crate::query::SortDir::Descending => " ▼",
            });
        }
        let style = if active && table_state.header_focused && index == table_state.focused_column {
            Style::default().fg(theme::ACCENT)
        } else {
            Style::default()
        };
        Cell::from(label).style(style)
    }))
    .style(header_style);

    let rows = collection.items.iter().enumerate().map(|(index, item)| {
        let selected = item
            .get("id")
            .and_then(Value::as_i64)
            .is_some_and(|id| table_state.selection.contains(id));
        let mut style = Style::default();
        if active && !table_state.header_focused && index == table_state.clamped_cursor() {
            style = style.bg(theme::ACTIVE_HIGHLIGHT);
        }
        if selected {
            style = style.fg(theme::ACCENT);
        }
        let has_errors = collection.row_errors(index).is_some_and(|e| !e.is_empty());
        if has_errors {
            style = style.fg(theme::STATUS_ERROR);
        }
        Row::new(specs.iter().map(|spec| {
            Cell::from(render_cell(type_name, schema, &spec.key, item))
        }))
        .style(style)
    });

    let widths = column_widths(&specs);
    let title = format!(
        "{} — {} results, page {}/{}",
        type_name,
        collection.total,
        collection.page,
        collection.pages.max(1)
    );
    let table = Table::new(rows, widths).header(header).block(bordered(&title));
    frame.render_widget(table, area);
}

fn column_widths(specs: &[ColumnSpec]) -> Vec<Constraint> {
    let share = 100 / specs.len().max(1) as u16;
    specs.iter().map(|_| Constraint::Percentage(share)).collect()
}

fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let (left, right) = match app.related() {
        Some(_) => two_column(area),
        None => (area, Rect::default()),
    };

    draw_form(frame, left, app);
    if let Some(related) = app.related() {
        draw_object_table(frame, right, app, related, app.body_focus() == BodyFocus::Related);
    }
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let document = app.document();
    let form = app.form();
    let form_active = app.body_focus() == BodyFocus::Form;
    let mut lines = Vec::new();

    if document.loading {
        lines.push(Line::styled("loading…", Style::default().fg(theme::MUTED_TEXT)));
    }

    for (index, field) in form.fields.iter().enumerate() {
        let descriptor = document.descriptor(field);
        let label = descriptor
            .map(|d| d.display_label())
            .unwrap_or_else(|| field.clone());
        let decoration = descriptor.and_then(|d| d.kind.decoration());

        let value = match document.display_value(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        let mut spans = vec![Span::styled(
            format!("{label}: "),
            Style::default().fg(theme::MUTED_TEXT),
        )];
        if let Some(mark) = decoration {
            spans.push(Span::styled(format!("{mark} "), Style::default().fg(theme::MUTED_TEXT)));
        }
        spans.push(Span::raw(value));
        if document.save_payload().contains_key(field) {
            spans.push(Span::styled(" *", Style::default().fg(theme::EDITED_MARK)));
        }

        let mut line = Line::from(spans);
        if form_active && index == form.focused && !form.is_editing() {
            line = line.style(Style::default().bg(theme::ACTIVE_HIGHLIGHT));
        }
        lines.push(line);

        if let Some(message) = document.errors.get(field) {
            lines.push(Line::styled(
                format!("  ! {message}"),
                Style::default().fg(theme::STATUS_ERROR),
            ));
        }
        if let Some(preview) = app.preview(field) {
            if let Some(card) = &preview.card {
                lines.push(Line::styled(
                    format!("  → {}", card.title_or_placeholder()),
                    Style::default().fg(theme::MUTED_TEXT),
                ));
            } else if preview.loading {
                lines.push(Line::styled("  → …", Style::default().fg(theme::MUTED_TEXT)));
            }
        }
    }

    if let Some(editor) = &form.editor {
        lines.push(Line::raw(""));
        lines.extend(editor_lines(editor));
    }

    let title = match document.id() {
        Some(id) => format!("{} #{id}", document.type_name()),
        None => document.type_name().to_string(),
    };
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(bordered(&title)),
        area,
    );
}

fn editor_lines(editor: &FieldEditor) -> Vec<Line<'static>> {
    match editor {
        FieldEditor::Text { field, buffer } => vec![Line::from(vec![
            Span::styled(format!("edit {field}: "), Style::default().fg(theme::ACCENT)),
            Span::raw(buffer.clone()),
            Span::styled("█", Style::default().fg(theme::ACCENT)),
        ])],
        FieldEditor::List {
            field,
            items,
            input,
            cursor,
        } => {
            let mut lines = vec![Line::styled(
                format!("edit {field} (enter adds, del removes):"),
                Style::default().fg(theme::ACCENT),
            )];
            for (index, item) in items.iter().enumerate() {
                let marker = if index == *cursor { ">" } else { " " };
                lines.push(Line::raw(format!(" {marker} {item}")));
            }
            lines.push(Line::from(vec![
                Span::raw(" + "),
                Span::raw(input.clone()),
                Span::styled("█", Style::default().fg(theme::ACCENT)),
            ]));
            lines
        }
        FieldEditor::Json { field, text, error } => {
            let mut lines = vec![
                Line::styled(format!("edit {field} (json):"), Style::default().fg(theme::ACCENT)),
                Line::raw(text.clone()),
            ];
            if let Some(error) = error {
                lines.push(Line::styled(
                    format!("  ! {error}"),
                    Style::default().fg(theme::STATUS_ERROR),
                ));
            }
            lines
        }
    }
}

fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let CreateSidebarState::Visible {
        type_name,
        fields,
        focused,
        submitting,
        errors,
    } = app.sidebar()
    else {
        return;
    };

    let mut lines = Vec::new();
    for (index, field) in fields.iter().enumerate() {
        let mut line = Line::from(vec![
            Span::styled(format!("{}: ", field.label), Style::default().fg(theme::MUTED_TEXT)),
            Span::raw(field.value.clone()),
        ]);
        if index == *focused {
            line = line.style(Style::default().bg(theme::ACTIVE_HIGHLIGHT));
        }
        lines.push(line);
        if let Some(message) = errors.get(&field.key) {
            lines.push(Line::styled(
                format!("  ! {message}"),
                Style::default().fg(theme::STATUS_ERROR),
            ));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        if *submitting { "creating…" } else { "enter creates · esc closes" },
        Style::default().fg(theme::MUTED_TEXT),
    ));

    frame.render_widget(
        Paragraph::new(lines).block(bordered(&format!("New {type_name}"))),
        area,
    );
}

fn draw_picker(frame: &mut Frame, area: Rect, app: &App) {
    let PickerDialogState::Visible {
        field,
        idtype,
        query,
        loading,
        results,
        focused,
        ..
    } = app.picker()
    else {
        return;
    };

    let popup = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup);

    let mut items = vec![ListItem::new(Line::from(vec![
        Span::styled("find: ", Style::default().fg(theme::MUTED_TEXT)),
        Span::raw(query.clone()),
        Span::styled("█", Style::default().fg(theme::ACCENT)),
    ]))];
    if *loading {
        items.push(ListItem::new(Line::styled(
            "searching…",
            Style::default().fg(theme::MUTED_TEXT),
        )));
    }
    for (index, card) in results.iter().enumerate() {
        let style = if index == *focused {
            Style::default().bg(theme::ACTIVE_HIGHLIGHT).fg(theme::HEADER_TEXT)
        } else {
            Style::default()
        };
        items.push(ListItem::new(Line::styled(card.title_or_placeholder(), style)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::POPUP_BORDER))
        .title(format!(" {field} → {idtype} (del clears) "));
    frame.render_widget(List::new(items).block(block), popup);
}

fn draw_tasks(frame: &mut Frame, area: Rect, app: &App) {
    let tasks = app.tasks();
    let field_line = |focused: bool, label: &str, value: String| {
        let mut line = Line::from(vec![
            Span::styled(format!("{label}: "), Style::default().fg(theme::MUTED_TEXT)),
            Span::raw(value),
        ]);
        if focused {
            line = line.style(Style::default().bg(theme::ACTIVE_HIGHLIGHT));
        }
        line
    };

    let extension = match tasks.ext_id {
        Some(id) => format!("Extension #{id}"),
        None => "(press enter to pick)".to_string(),
    };
    let mut lines = vec![
        field_line(tasks.focused == TaskField::Extension, "extension", extension),
        field_line(tasks.focused == TaskField::Action, "action", tasks.action.clone()),
        field_line(tasks.focused == TaskField::Params, "params", tasks.params_text.clone()),
    ];

    for (key, message) in &tasks.field_errors {
        lines.push(Line::styled(
            format!("  ! {key}: {message}"),
            Style::default().fg(theme::STATUS_ERROR),
        ));
    }
    if tasks.submitting {
        lines.push(Line::styled("submitting…", Style::default().fg(theme::MUTED_TEXT)));
    }

    if !tasks.receipts.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::styled("accepted:", Style::default().fg(theme::STATUS_OK)));
        for receipt in &tasks.receipts {
            lines.push(Line::raw(format!("  {receipt}")));
        }
    }
    if !tasks.errors.is_empty() {
        lines.push(Line::raw(""));
        for error in &tasks.errors {
            lines.push(Line::styled(
                format!("  ✗ {error}"),
                Style::default().fg(theme::STATUS_ERROR),
            ));
        }
    }

    frame.render_widget(Paragraph::new(lines).block(bordered("Tasks")), area);
}

fn bordered(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::GLOBAL_BORDER))
        .title(format!(" {title} "))
}
