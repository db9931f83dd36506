use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

use sentinel_v::monitor::{CycleOutcome, MonitorLoop, MonitorSession, SkipReason, KNOWN_ASSETS};
use sentinel_v::source::{FileSource, TelemetrySource};
use sentinel_v::{events, ui, App, Model};

#[derive(Parser, Debug)]
#[command(name = "sentinel-v")]
#[command(about = "Live predictive-maintenance monitor for the Sentinel-V vibration engine")]
struct Args {
    /// Path to the telemetry file the sensor engine rewrites every tick
    #[arg(short, long, default_value = "live_stream.csv")]
    file: PathBuf,

    /// Path to the pretrained classifier artifact
    #[arg(short, long, default_value = "model.json")]
    model: PathBuf,

    /// Asset to monitor at startup (defaults to the first known asset)
    #[arg(short, long)]
    device: Option<String>,

    /// Override the known-asset roster (comma-separated)
    #[arg(long, value_delimiter = ',')]
    devices: Vec<String>,

    /// Sampling tick in milliseconds, matching the engine's 10 Hz cadence
    #[arg(long, default_value = "100")]
    tick_ms: u64,

    /// Run headless: print one status line per cycle instead of the TUI
    #[arg(long)]
    bridge: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Model load is the one fatal startup step: without a classifier the
    // monitor never starts.
    let model = Model::load(&args.model).context("cannot start monitor")?;

    let mut devices: Vec<String> = if args.devices.is_empty() {
        KNOWN_ASSETS.iter().map(|d| d.to_string()).collect()
    } else {
        args.devices.clone()
    };
    let initial_device = args.device.clone().unwrap_or_else(|| devices[0].clone());
    if !devices.contains(&initial_device) {
        devices.insert(0, initial_device.clone());
    }

    let source = Box::new(FileSource::new(&args.file));
    let tick = Duration::from_millis(args.tick_ms);
    let session = MonitorSession::new(model, &initial_device);

    if args.bridge {
        run_bridge(session, source, tick)
    } else {
        run_tui(session, source, devices, &initial_device, tick)
    }
}

/// Run the interactive dashboard.
///
/// The monitor loop samples on its own thread at the given tick; this
/// function only renders published frames and forwards key events.
fn run_tui(
    session: MonitorSession,
    source: Box<dyn TelemetrySource>,
    devices: Vec<String>,
    initial_device: &str,
    tick: Duration,
) -> Result<()> {
    let source_description = source.description().to_string();
    let monitor = MonitorLoop::spawn(session, source, tick);
    let mut app = App::new(monitor, devices, initial_device, source_description);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app);

    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        app.refresh();

        terminal.draw(|frame| {
            let area = frame.area();

            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Min(8),    // Dashboard
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::dashboard::render(frame, app, chunks[1]);
            ui::common::render_status_bar(frame, app, chunks[2]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Short timeout so the dashboard tracks fresh frames even when the
        // keyboard is idle; the sampling loop runs independently.
        if let Some(event) = events::poll_event(Duration::from_millis(50))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Headless bridge mode: drive the cycle directly and print one
/// line per published reading, the same triple the TUI renders. Useful
/// for verifying the engine link without a terminal UI.
fn run_bridge(
    mut session: MonitorSession,
    mut source: Box<dyn TelemetrySource>,
    tick: Duration,
) -> Result<()> {
    println!("--- Sentinel-V Bridge ---");
    println!("source: {}", source.description());
    println!("asset:  {}", session.selected());

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        loop {
            let report = session.run_cycle(source.as_mut());

            for note in &report.notes {
                eprintln!("warning: {}", note);
            }
            match report.outcome {
                CycleOutcome::Published(state) => {
                    println!(
                        "Device: {} | Mag: {:.2} | Status: {}",
                        state.device,
                        state.magnitude,
                        state.alert.label()
                    );
                }
                // Quiet start: the engine simply has not written yet
                CycleOutcome::Skipped(SkipReason::NoDataYet) => {}
                CycleOutcome::Skipped(reason) => {
                    eprintln!("skipped cycle: {}", reason);
                }
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                _ = tokio::time::sleep(tick) => {}
            }
        }

        println!("\nBridge stopped");
        Ok::<(), anyhow::Error>(())
    })
}
