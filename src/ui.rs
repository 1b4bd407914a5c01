use crate::app::{App, TierStatus};
use crate::config::Rgb;
use crate::map::{render_scene, GlobeLayers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into globe area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Globe
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_globe(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn globe_title(app: &App) -> &'static str {
    if app.scene.is_loading() {
        " Globe (loading boundaries…) "
    } else {
        " Globe "
    }
}

fn render_globe(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            globe_title(app),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layers = render_scene(
        &app.scene,
        &app.camera,
        &app.config.lighting,
        inner.width as usize,
        inner.height as usize,
    );
    frame.render_widget(GlobeWidget { layers }, inner);
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Paints the shaded sphere as cell backgrounds and each tier's Braille
/// dots on top in the tier colour.
struct GlobeWidget {
    layers: GlobeLayers,
}

impl Widget for GlobeWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.layers.height.min(area.height as usize);
        let cols = self.layers.width.min(area.width as usize);

        for cy in 0..rows {
            for cx in 0..cols {
                let (x, y) = (area.x + cx as u16, area.y + cy as u16);
                if let Some(rgb) = self.layers.surface_at(cx, cy) {
                    buf[(x, y)].set_bg(to_color(rgb));
                }
            }
        }

        // Later tiers draw over earlier ones
        for layer in &self.layers.tiers {
            let fg = to_color(layer.color);
            for cy in 0..rows {
                for cx in 0..cols {
                    if let Some(ch) = layer.canvas.glyph(cx, cy) {
                        buf[(area.x + cx as u16, area.y + cy as u16)].set_char(ch).set_fg(fg);
                    }
                }
            }
        }
    }
}

fn tier_span(name: &str, status: &TierStatus) -> Span<'static> {
    let (marker, color) = match status {
        TierStatus::Shown => ("●", Color::Green),
        TierStatus::Hidden => ("○", Color::Gray),
        TierStatus::Loading => ("…", Color::Yellow),
        TierStatus::Failed(_) => ("✗", Color::Red),
        TierStatus::Disabled => ("-", Color::DarkGray),
    };
    Span::styled(format!("{marker}{name} "), Style::default().fg(color))
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(" Scale: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
    ];
    for (tier, status) in app.tier_statuses() {
        spans.push(tier_span(tier.name(), &status));
    }
    spans.extend([
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | drag/hjkl:rotate wheel/+/-:zoom r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
