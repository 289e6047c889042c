//! Frame layout for the task runner.
//!
//! Renders from `&RunState` only; never mutates it.

use ansi_to_tui::IntoText;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph},
};

use crate::engine::{RunState, TaskBuffer};

// Layout constants
pub const SIDEBAR_WIDTH: u16 = 25;
const HELP_HINT_HEIGHT: u16 = 2;

const COLOR_SELECTED: Color = Color::Yellow;
const COLOR_RUNNING: Color = Color::White;
const COLOR_MUTED: Color = Color::Gray;
const COLOR_DIMMED: Color = Color::DarkGray;
const COLOR_ERROR: Color = Color::Red;

pub const KEYBINDS: [&str; 5] = [
    "m            - Toggle this help menu",
    "↑ or k       - Select previous task",
    "↓ or j       - Select next task",
    "Esc          - Dismiss error",
    "Ctrl-c or q  - Quit",
];

/// Presentation state owned by the terminal observer.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub show_help: bool,
    pub show_error: bool,
}

pub fn draw(frame: &mut Frame, state: &RunState, view: &ViewState) {
    let area = frame.area();

    let [sidebar, separator, output] = Layout::horizontal([
        Constraint::Length(SIDEBAR_WIDTH.min(area.width)),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    render_sidebar(frame, state, sidebar);
    render_separator(frame, separator);
    render_output(frame, state, output);

    if view.show_error {
        if let Some(message) = state.last_error() {
            render_error(frame, message, area);
        }
    }
    if view.show_help {
        render_help(frame, area);
    }
}

/// Sidebar lines: running, queued and completed sections.
pub fn task_list_lines(state: &RunState) -> Vec<Line<'static>> {
    let order = state.display_order();
    let selected = state.selected_task();
    let style_for = |name: &str, base: Color| {
        let color = if selected == Some(name) { COLOR_SELECTED } else { base };
        Style::default().fg(color)
    };

    let mut lines = Vec::new();

    if !order.running.is_empty() {
        lines.push(section_header(format!("▶ Running ({})", order.running.len())));
        for &name in order.running.iter() {
            lines.push(Line::styled(name.to_string(), style_for(name, COLOR_RUNNING)));
        }
        lines.push(Line::default());
    }

    if !order.queued.is_empty() {
        lines.push(section_header(format!("⏱ Queued ({})", order.queued.len())));
        for &name in order.queued.iter() {
            lines.push(Line::styled(name.to_string(), style_for(name, COLOR_MUTED)));
        }
        lines.push(Line::default());
    }

    if !order.completed.is_empty() {
        lines.push(section_header(format!("■ Completed ({})", order.completed.len())));
        for &name in order.completed.iter() {
            let errored = state.buffer(name).is_some_and(|b| b.errored);
            let (symbol, base) = if errored {
                ("✗", COLOR_ERROR)
            } else {
                ("✓", COLOR_MUTED)
            };
            lines.push(Line::from(vec![
                Span::styled(name.to_string(), style_for(name, base)),
                Span::raw(format!(" {symbol}")),
            ]));
        }
    }

    lines
}

fn section_header(label: String) -> Line<'static> {
    Line::styled(label, Style::default().fg(COLOR_DIMMED))
}

fn render_sidebar(frame: &mut Frame, state: &RunState, area: Rect) {
    let [list, hint] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(HELP_HINT_HEIGHT.min(area.height)),
    ])
    .areas(area);

    frame.render_widget(Paragraph::new(task_list_lines(state)), list);
    frame.render_widget(
        Paragraph::new(Text::from(vec![
            Line::raw("↑↓ - Navigate"),
            Line::raw("m - More binds"),
        ]))
        .style(Style::default().fg(COLOR_DIMMED)),
        hint,
    );
}

fn render_separator(frame: &mut Frame, area: Rect) {
    let line: Vec<Line> = (0..area.height).map(|_| Line::raw("│")).collect();
    frame.render_widget(Paragraph::new(line).style(Style::default().fg(COLOR_RUNNING)), area);
}

fn render_output(frame: &mut Frame, state: &RunState, area: Rect) {
    let Some(selected) = state.selected_task() else {
        return;
    };

    let [header, body] =
        Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(selected.to_string()).style(Style::default().fg(COLOR_DIMMED)),
        header,
    );

    let content = state
        .buffer(selected)
        .map(|buffer| output_tail(buffer, body.height as usize))
        .unwrap_or_default();
    let text: Text = content.into_text().unwrap_or_else(|_| Text::raw(content.clone()));

    frame.render_widget(Paragraph::new(text), body);
}

/// The last `height` lines of a task's output, followed by an exit footer
/// once the task has finished. Keeps the view scrolled to the bottom.
pub fn output_tail(buffer: &TaskBuffer, height: usize) -> String {
    let mut content = buffer.text.clone();
    if let Some(exit) = buffer.exit {
        content.push_str(&format!("\n----\nDone (exit code: {exit})"));
    }

    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(height);
    lines[start..].join("\n")
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let popup = centered(area, 80, 3);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(format!("Error: {message}"))
            .style(Style::default().fg(COLOR_ERROR))
            .block(Block::bordered().border_style(Style::default().fg(COLOR_ERROR))),
        popup,
    );
}

fn render_help(frame: &mut Frame, area: Rect) {
    let popup = centered(area, 80, KEYBINDS.len() as u16 + 2);
    frame.render_widget(Clear, popup);
    let lines: Vec<Line> = KEYBINDS.iter().map(|bind| Line::raw(*bind)).collect();
    frame.render_widget(Paragraph::new(lines).block(Block::bordered()), popup);
}

fn centered(area: Rect, percent_x: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
