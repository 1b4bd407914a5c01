use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::time::Duration;
use tui_globe::app::App;
use tui_globe::config::GlobeConfig;
use tui_globe::{logging, ui};

fn main() -> Result<()> {
    let _log_guard = logging::init_logging(logging::default_log_dir(), logging::default_log_file())
        .context("Failed to initialize logging")?;

    // Bad config is fatal before the terminal is taken over
    let config = GlobeConfig::load().context("Failed to load configuration")?;

    let mut terminal = ratatui::init();
    terminal.clear()?;
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, config);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(e) = &result {
        tracing::error!(error = %e, "Exited with error");
    }
    result
}

/// Scroll wheel zooms, left-drag rotates
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Wheel up is a negative delta, i.e. zoom in
        MouseEventKind::ScrollUp => app.on_wheel(-1.0),
        MouseEventKind::ScrollDown => app.on_wheel(1.0),
        MouseEventKind::Down(MouseButton::Left) => app.start_drag(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.handle_drag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.end_drag(),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, config: GlobeConfig) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config, size.width as usize, size.height as usize);
    tracing::info!(width = size.width, height = size.height, "Globe started");

    loop {
        app.tick();
        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps frame pacing; input handlers run to completion before the next tick
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                    KeyCode::Left | KeyCode::Char('h') => app.pan_left(),
                    KeyCode::Right | KeyCode::Char('l') => app.pan_right(),
                    KeyCode::Up | KeyCode::Char('k') => app.pan_up(),
                    KeyCode::Down | KeyCode::Char('j') => app.pan_down(),

                    KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                    KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                    KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),
                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(width, height) => app.resize(width as usize, height as usize),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("Globe closed");
    Ok(())
}
