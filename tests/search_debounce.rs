use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use colander_admin::api::{ApiCommand, ApiEvent, QuickOrigin, QuickResponse};
use colander_admin::config::Config;
use colander_admin::routes::Route;
use colander_admin::ui::app::App;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

#[test]
fn keystroke_burst_fires_one_quick_search_with_the_last_input() {
    let mut app = App::new(Config::default(), Route::Search);
    let start = Instant::now();

    app.on_key(key(KeyCode::Char('w')), start);
    app.on_key(key(KeyCode::Char('i')), start + Duration::from_millis(40));
    app.on_key(key(KeyCode::Char('d')), start + Duration::from_millis(80));

    // Ticks inside the quiet window do not fire.
    app.on_tick(start + Duration::from_millis(150));
    assert!(app.take_commands().is_empty());

    app.on_tick(start + Duration::from_millis(500));
    let commands = app.take_commands();
    let (generation, query) = match commands.as_slice() {
        [ApiCommand::Quick {
            origin: QuickOrigin::SearchView,
            generation,
            query,
            ..
        }] => (*generation, query.clone()),
        other => panic!("expected exactly one quick command, got {other:?}"),
    };
    assert_eq!(query, "wid");

    // Later ticks stay quiet until a new keystroke re-arms the timer.
    app.on_tick(start + Duration::from_millis(900));
    assert!(app.take_commands().is_empty());

    let response = QuickResponse::from_body(&json!({
        "total": 2,
        "vendor": { "total": 1, "results": [{ "id": 1, "title": "Widget Co" }] },
        "listing": { "total": 1, "results": [{ "id": 2, "title": "Widget" }] }
    }));
    app.handle_api(ApiEvent::QuickDone {
        origin: QuickOrigin::SearchView,
        generation,
        result: Ok(response),
    });

    // Both groups render.
    assert_eq!(app.search().groups.len(), 2);
    assert!(!app.search().loading);
}

#[test]
fn stale_quick_response_is_dropped() {
    let mut app = App::new(Config::default(), Route::Search);
    let start = Instant::now();

    app.on_key(key(KeyCode::Char('w')), start);
    app.on_tick(start + Duration::from_millis(500));
    let first_generation = match app.take_commands().as_slice() {
        [ApiCommand::Quick { generation, .. }] => *generation,
        other => panic!("expected one quick command, got {other:?}"),
    };

    // A second burst supersedes the first request.
    app.on_key(key(KeyCode::Char('i')), start + Duration::from_millis(600));
    app.on_tick(start + Duration::from_millis(1100));
    assert_eq!(app.take_commands().len(), 1);

    let stale = QuickResponse::from_body(&json!({
        "total": 1,
        "vendor": { "total": 1, "results": [{ "id": 1, "title": "Old" }] }
    }));
    app.handle_api(ApiEvent::QuickDone {
        origin: QuickOrigin::SearchView,
        generation: first_generation,
        result: Ok(stale),
    });
    assert!(app.search().groups.is_empty(), "stale results must not render");
}

#[test]
fn clearing_the_input_cancels_the_pending_search() {
    let mut app = App::new(Config::default(), Route::Search);
    let start = Instant::now();

    app.on_key(key(KeyCode::Char('w')), start);
    app.on_key(key(KeyCode::Backspace), start + Duration::from_millis(50));

    app.on_tick(start + Duration::from_secs(2));
    assert!(app.take_commands().is_empty());
}
