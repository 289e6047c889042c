// tests/tui_view.rs

mod common;
use crate::common::builders::registry;
use crate::common::{apply, exited, output};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::text::Line;

use tasktui::engine::{CoreRuntime, RuntimeEvent, TaskBuffer, ViewEvent};
use tasktui::tui::draw::{ViewState, draw, output_tail, task_list_lines};
use tasktui::tui::input::map_event;
use tasktui::types::TaskExit;

fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
    Event::Key(KeyEvent::new(code, modifiers))
}

fn line_text(line: &Line) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

#[test]
fn keys_map_to_runtime_events() {
    let none = KeyModifiers::NONE;

    assert!(matches!(
        map_event(&key(KeyCode::Up, none)),
        Some(RuntimeEvent::Navigate(-1))
    ));
    assert!(matches!(
        map_event(&key(KeyCode::Char('k'), none)),
        Some(RuntimeEvent::Navigate(-1))
    ));
    assert!(matches!(
        map_event(&key(KeyCode::Down, none)),
        Some(RuntimeEvent::Navigate(1))
    ));
    assert!(matches!(
        map_event(&key(KeyCode::Char('j'), none)),
        Some(RuntimeEvent::Navigate(1))
    ));
    assert!(matches!(
        map_event(&key(KeyCode::Char('q'), none)),
        Some(RuntimeEvent::QuitRequested)
    ));
    assert!(matches!(
        map_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        Some(RuntimeEvent::QuitRequested)
    ));
    assert!(matches!(
        map_event(&key(KeyCode::Char('m'), none)),
        Some(RuntimeEvent::View(ViewEvent::ToggleHelp))
    ));
    assert!(matches!(
        map_event(&key(KeyCode::Esc, none)),
        Some(RuntimeEvent::View(ViewEvent::DismissError))
    ));
    assert!(matches!(
        map_event(&Event::Resize(80, 24)),
        Some(RuntimeEvent::View(ViewEvent::Resized))
    ));
}

#[test]
fn unbound_keys_and_releases_are_ignored() {
    assert!(map_event(&key(KeyCode::Char('c'), KeyModifiers::NONE)).is_none());
    assert!(map_event(&key(KeyCode::Enter, KeyModifiers::NONE)).is_none());

    let release = Event::Key(KeyEvent::new_with_kind_and_state(
        KeyCode::Char('q'),
        KeyModifiers::NONE,
        KeyEventKind::Release,
        KeyEventState::NONE,
    ));
    assert!(map_event(&release).is_none());
}

#[test]
fn output_tail_keeps_the_last_lines_and_appends_the_exit_footer() {
    let buffer = TaskBuffer {
        running: false,
        errored: true,
        text: "one\ntwo\nthree\n".to_string(),
        exit: Some(TaskExit::with_code(2)),
    };

    assert_eq!(output_tail(&buffer, 4), "three\n\n----\nDone (exit code: 2)");
    assert_eq!(
        output_tail(&buffer, 10),
        "one\ntwo\nthree\n\n----\nDone (exit code: 2)"
    );
    // The footer is presentation only.
    assert_eq!(buffer.text, "one\ntwo\nthree\n");
}

#[test]
fn output_tail_of_a_running_task_has_no_footer() {
    let buffer = TaskBuffer {
        text: "a\nb\nc".to_string(),
        ..TaskBuffer::started()
    };

    assert_eq!(output_tail(&buffer, 2), "b\nc");
}

#[test]
fn sidebar_lists_sections_with_counts_and_markers() {
    let mut core = CoreRuntime::new();
    apply(
        &mut core,
        RuntimeEvent::ConfigLoaded(registry(&[
            ("A", &[]),
            ("B", &[]),
            ("C", &["A"]),
            ("D", &[]),
        ])),
    );
    apply(&mut core, exited("B", 0));
    apply(&mut core, exited("D", 1));

    let lines: Vec<String> = task_list_lines(core.state()).iter().map(line_text).collect();

    assert_eq!(
        lines,
        vec![
            "▶ Running (1)",
            "A",
            "",
            "⏱ Queued (1)",
            "C",
            "",
            "■ Completed (2)",
            "B ✓",
            "D ✗",
        ]
    );
}

#[test]
fn frame_shows_selected_output_and_error_popup() {
    let mut core = CoreRuntime::new();
    apply(
        &mut core,
        RuntimeEvent::ConfigLoaded(registry(&[("build", &[]), ("lint", &["missing"])])),
    );
    apply(&mut core, output("build", "\x1b[32mcompiled ok\x1b[0m\n"));
    core.step(RuntimeEvent::SpawnFailed {
        task: "other".to_string(),
        error: "Failed to spawn task 'other'".to_string(),
    });

    let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
    let view = ViewState {
        show_help: false,
        show_error: true,
    };
    terminal
        .draw(|frame| draw(frame, core.state(), &view))
        .unwrap();

    let screen: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect();

    assert!(screen.contains("Running (1)"));
    assert!(screen.contains("Completed (1)"));
    assert!(screen.contains("compiled ok"));
    assert!(!screen.contains("[32m"));
    assert!(screen.contains("Error: Failed to spawn task 'other'"));
}
