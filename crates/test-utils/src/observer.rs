use tasktui::engine::{Observer, RunState, ViewEvent};
use tasktui::errors::Result;

/// Observer that keeps everything it is shown.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub renders: usize,
    pub last_state: Option<RunState>,
    pub errors: Vec<String>,
    pub view_events: Vec<ViewEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for RecordingObserver {
    fn render(&mut self, state: &RunState) -> Result<()> {
        self.renders += 1;
        self.last_state = Some(state.clone());
        Ok(())
    }

    fn report_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn view_event(&mut self, event: ViewEvent) {
        self.view_events.push(event);
    }
}
