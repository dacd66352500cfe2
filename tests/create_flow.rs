use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::json;

use colander_admin::api::{ApiCommand, ApiEvent, CreateOutcome};
use colander_admin::config::Config;
use colander_admin::routes::Route;
use colander_admin::ui::app::App;

fn press(app: &mut App, code: KeyCode) {
    app.on_key(KeyEvent::new(code, KeyModifiers::NONE), Instant::now());
}

fn type_text(app: &mut App, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

#[test]
fn creating_a_vendor_closes_sidebar_and_navigates_to_it() {
    let mut app = App::new(Config::default(), Route::collection("Vendor"));
    app.take_commands(); // initial collection fetch

    press(&mut app, KeyCode::Char('n'));
    assert!(app.sidebar().is_visible());

    type_text(&mut app, "Acme");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "http://acme.test");
    press(&mut app, KeyCode::Enter);

    let commands = app.take_commands();
    let create = commands
        .iter()
        .find_map(|command| match command {
            ApiCommand::Create { type_name, data } => Some((type_name.clone(), data.clone())),
            _ => None,
        })
        .expect("create command queued");
    assert_eq!(create.0, "Vendor");
    assert_eq!(create.1["name"], json!("Acme"));
    assert_eq!(create.1["url"], json!("http://acme.test"));
    assert_eq!(create.1.get("image_url"), None, "empty inputs are omitted");

    app.handle_api(ApiEvent::CreateDone {
        type_name: "Vendor".to_string(),
        result: Ok(CreateOutcome::Created(42)),
    });

    assert!(!app.sidebar().is_visible());
    assert_eq!(app.route().path(), "/Vendor/42");

    // Landing on the detail route fetches the new document.
    let commands = app.take_commands();
    assert!(commands
        .iter()
        .any(|command| matches!(command, ApiCommand::Filter { .. })));
}

#[test]
fn rejected_creation_keeps_sidebar_open_with_errors() {
    let mut app = App::new(Config::default(), Route::collection("Vendor"));
    app.take_commands();

    press(&mut app, KeyCode::Char('n'));
    type_text(&mut app, "Acme");
    press(&mut app, KeyCode::Enter);
    app.take_commands();

    let errors = std::collections::BTreeMap::from([("url".to_string(), "required".to_string())]);
    app.handle_api(ApiEvent::CreateDone {
        type_name: "Vendor".to_string(),
        result: Ok(CreateOutcome::Rejected(errors)),
    });

    assert!(app.sidebar().is_visible());
    assert_eq!(app.route().path(), "/Vendor");
}
