//! Terminal input → runtime events.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::engine::{RuntimeEvent, ViewEvent};

/// Read terminal events in the background and forward the ones tasktui
/// cares about to the runtime.
pub fn spawn_input_listener(runtime_tx: mpsc::Sender<RuntimeEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut events = EventStream::new();

        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "reading terminal input failed");
                    break;
                }
            };

            if let Some(runtime_event) = map_event(&event) {
                if runtime_tx.send(runtime_event).await.is_err() {
                    break;
                }
            }
        }

        debug!("input listener finished");
    })
}

pub fn map_event(event: &Event) -> Option<RuntimeEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key),
        Event::Resize(..) => Some(RuntimeEvent::View(ViewEvent::Resized)),
        _ => None,
    }
}

pub fn map_key(key: &KeyEvent) -> Option<RuntimeEvent> {
    let event = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            RuntimeEvent::QuitRequested
        }
        KeyCode::Char('q') => RuntimeEvent::QuitRequested,
        KeyCode::Up | KeyCode::Char('k') => RuntimeEvent::Navigate(-1),
        KeyCode::Down | KeyCode::Char('j') => RuntimeEvent::Navigate(1),
        KeyCode::Char('m') => RuntimeEvent::View(ViewEvent::ToggleHelp),
        KeyCode::Esc => RuntimeEvent::View(ViewEvent::DismissError),
        _ => return None,
    };
    Some(event)
}
