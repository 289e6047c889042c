// src/engine/observer.rs

use crate::engine::ViewEvent;
use crate::engine::state::RunState;
use crate::errors::Result;

/// Read-only consumer of the run state (the terminal UI in production).
///
/// The runtime calls [`render`](Observer::render) once after every batch of
/// state mutations. Implementations must not block.
pub trait Observer {
    fn render(&mut self, state: &RunState) -> Result<()>;

    /// Show a user-facing error (spawn failures, config load failures,
    /// dependency cycle warnings). The same message is also stored as
    /// [`RunState::last_error`].
    fn report_error(&mut self, message: &str);

    /// Presentation-only input; the runtime re-renders afterwards.
    fn view_event(&mut self, _event: ViewEvent) {}
}
