use std::io;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use crate::api::{self, ApiClient};
use crate::config::Config;
use crate::routes::Route;
use crate::ui::app::App;
use crate::ui::events::{AppEvent, EventHandler};
use crate::ui::render::draw;
use crate::ui::terminal_guard::setup_terminal;

pub fn run(config: Config, initial_route: Route) -> io::Result<()> {
    let (mut terminal, guard) = setup_terminal()?;
    let tick_rate = Duration::from_millis(config.ui.tick_ms);
    let events = EventHandler::new(tick_rate);

    let client = ApiClient::from_config(&config.api).map_err(io::Error::other)?;
    let deliver = events.sender();
    let worker = api::worker::spawn(client, move |event| {
        let _ = deliver.send(AppEvent::Api(event));
    });

    let mut app = App::new(config, initial_route);

    loop {
        for command in app.take_commands() {
            worker.submit(command);
        }

        terminal.draw(|frame| draw(frame, &app))?;
        if app.should_quit() {
            break;
        }

        match events.next(tick_rate) {
            Ok(AppEvent::Key(key)) => app.on_key(key, Instant::now()),
            Ok(AppEvent::Tick) => app.on_tick(Instant::now()),
            // Redraw happens at the top of the loop; nothing to update.
            Ok(AppEvent::Resize(_, _)) => {}
            Ok(AppEvent::Api(event)) => app.handle_api(event),
            Err(RecvTimeoutError::Timeout) => app.on_tick(Instant::now()),
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    drop(guard);
    Ok(())
}
