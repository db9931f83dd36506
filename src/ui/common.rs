//! Common UI components: header bar, status bar, and the help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::AlertState;

/// Render the header bar with the session overview.
///
/// Displays: verdict indicator, selected asset, cycle count, source.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (dot_style, alert_label) = match app.frame.state.as_ref().map(|s| s.alert) {
        Some(alert) => (app.theme.alert_style(alert), alert.label()),
        None => (Style::default().add_modifier(Modifier::DIM), "WAITING"),
    };

    let line = Line::from(vec![
        Span::styled(" ● ", dot_style),
        Span::styled("SENTINEL-V ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            app.selected_device().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} ", alert_label)),
        Span::raw(format!("│ {} assets ", app.devices.len())),
        Span::raw(format!("│ cycle {} ", app.frame.cycles)),
        Span::styled(
            format!("│ {}", app.source_description),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the status bar at the bottom.
///
/// Shows temporary status messages, then skip/diagnostic reports from the
/// monitor loop, then the normal controls line.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref skip) = app.frame.last_skip {
        let paragraph = Paragraph::new(format!(" Holding last reading: {} | q:quit", skip))
            .style(Style::default().fg(app.theme.danger));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(note) = app.frame.notes.first() {
        let paragraph = Paragraph::new(format!(" Warning: {} ", note))
            .style(Style::default().add_modifier(Modifier::DIM));
        frame.render_widget(paragraph, area);
        return;
    }

    let status = match app.frame.updated {
        Some(updated) => format!(
            " Updated {:.1}s ago | ↑↓:select asset ?:help q:quit",
            updated.elapsed().as_secs_f64()
        ),
        None => " Waiting for telemetry... | q:quit".to_string(),
    };
    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the dashboard.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from("  ↑/↓ k/j     Select asset"),
        Line::from("  Home/End    First/last asset"),
        Line::from("  ?           Toggle this help"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Selecting an asset restarts its trend window",
            Style::default().add_modifier(Modifier::DIM),
        )]),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 50u16.min(area.width.saturating_sub(4));
    let help_height = 12u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Render a danger banner label for the alert panel.
pub fn alert_message(alert: AlertState, device: &str) -> String {
    match alert {
        AlertState::Danger => format!("DANGER DETECTED: {} requires inspection", device),
        AlertState::Nominal => format!("SYSTEM NOMINAL: {} operating normally", device),
    }
}
