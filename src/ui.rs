use crate::app::App;
use jma_map::braille::BrailleCanvas;
use jma_map::map::Rgba;
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

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let status = render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, &status, chunks[1]);
}

/// What the map pass reports back to the status bar
struct MapStatus {
    zoom: f32,
    error: Option<String>,
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) -> MapStatus {
    // Create a block with border
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " JMA Areas ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Braille gives 2x4 resolution per character
    let mut canvas = BrailleCanvas::new(inner.width as usize, inner.height as usize);
    let viewport = app.viewport(canvas.pixel_size());
    let error = app.draw(&mut canvas, &viewport).err().map(|e| e.to_string());

    frame.render_widget(
        MapWidget {
            canvas,
            background: app.colors.background_color,
        },
        inner,
    );

    MapStatus {
        zoom: viewport.zoom(),
        error,
    }
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb(c.r, c.g, c.b)
}

/// Custom widget that renders the colored braille canvas
struct MapWidget {
    canvas: BrailleCanvas,
    background: Rgba,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for (row_idx, row) in self.canvas.rows().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, cell) in row.iter().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                let x = area.x + col_idx as u16;
                let bg = cell.fill.map_or(self.background, |f| f.over(self.background));
                let target = &mut buf[(x, y)];
                target.set_bg(to_color(bg));
                // Skip empty braille characters (U+2800)
                if cell.ch == '\u{2800}' {
                    target.set_char(' ');
                } else {
                    target.set_char(cell.ch);
                    if let Some(ink) = cell.ink {
                        target.set_fg(to_color(ink));
                    }
                }
            }
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, status: &MapStatus, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(" Zoom: ", dim),
        Span::styled(format!("{:.1} px/°", status.zoom), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", dim),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", dim),
        Span::styled(
            format!("{} areas", app.areas.features.len()),
            Style::default().fg(Color::Magenta),
        ),
        Span::styled(" | ", dim),
        Span::styled(
            format!(
                "fill {} +{} codes",
                app.colors.default_fill_color,
                app.colors.code_to_color.len()
            ),
            Style::default().fg(to_color(app.colors.default_fill_color)),
        ),
        Span::styled(
            if app.geometry_only { " [G]eometry " } else { " [g]eometry " },
            Style::default().fg(if app.geometry_only { Color::Green } else { Color::DarkGray }),
        ),
    ];

    match &status.error {
        Some(error) => spans.push(Span::styled(
            format!("| {error}"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        None => spans.push(Span::styled("| hjkl:pan +/-:zoom r:reset q:quit", dim)),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
