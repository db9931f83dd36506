//! Dashboard rendering: asset sidebar, vibration readout, alert panel,
//! and the rolling trend sparkline.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Sparkline},
    Frame,
};

use crate::app::App;
use crate::data::{sparkline_bars, HISTORY_CAPACITY};
use crate::ui::common::alert_message;

/// Render the full dashboard.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let columns =
        Layout::horizontal([Constraint::Length(24), Constraint::Min(32)]).split(area);

    render_device_list(frame, app, columns[0]);

    let panels =
        Layout::vertical([Constraint::Length(5), Constraint::Min(5)]).split(columns[1]);
    render_readout(frame, app, panels[0]);
    render_trend(frame, app, panels[1]);
}

/// The device-selection control surface: the fixed asset roster, with the
/// monitored asset highlighted.
fn render_device_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .devices
        .iter()
        .map(|name| {
            let marker = match &app.frame.state {
                Some(state) if &state.device == name => "▸ ",
                _ => "  ",
            };
            ListItem::new(format!("{}{}", marker, name))
        })
        .collect();

    let block = Block::default()
        .title(" Assets ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let list = List::new(items).block(block).highlight_style(app.theme.selected);

    let mut state = ListState::default();
    state.select(Some(app.selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Current magnitude readout and the AI verdict panel, side by side.
fn render_readout(frame: &mut Frame, app: &App, area: Rect) {
    let halves =
        Layout::horizontal([Constraint::Length(24), Constraint::Min(20)]).split(area);

    let magnitude = match &app.frame.state {
        Some(state) => format!("{:.2} Gs", state.magnitude),
        None => "--".to_string(),
    };
    let gauge = Paragraph::new(Line::from(Span::styled(
        magnitude,
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title(" Current Vibration ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.border)),
    );
    frame.render_widget(gauge, halves[0]);

    let (message, style) = match &app.frame.state {
        Some(state) => (
            alert_message(state.alert, &state.device),
            app.theme.alert_style(state.alert),
        ),
        None => (
            "Waiting for first reading...".to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    };
    let status = Paragraph::new(Line::from(Span::styled(message, style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .title(" AI Status ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        );
    frame.render_widget(status, halves[1]);
}

/// Rolling magnitude trend for the selected asset.
fn render_trend(frame: &mut Frame, app: &App, area: Rect) {
    let history = app.frame.state.as_ref().map(|s| s.history.as_slice()).unwrap_or(&[]);
    let title = format!(" Vibration Trend ({}/{} points) ", history.len(), HISTORY_CAPACITY);

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let bars = sparkline_bars(history);
    if bars.is_empty() {
        let placeholder = Paragraph::new("collecting trend data...")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    let sparkline = Sparkline::default()
        .block(block)
        .data(&bars)
        .style(Style::default().fg(app.theme.highlight));
    frame.render_widget(sparkline, area);
}
