mod app;
mod ui;

use std::path::PathBuf;

use anyhow::Result;
use app::{App, Bounds};
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
};
use crossterm::execute;
use jma_map::data::{load_feature_collection, JmaProperties};
use jma_map::map::{ColorConfig, Rgba};
use ratatui::DefaultTerminal;

/// View JMA GIS boundary GeoJSON in the terminal
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// GeoJSON FeatureCollection (e.g. AreaForecastLocalE_GIS_*.geojson)
    input: PathBuf,
    /// West edge of the view in degrees
    #[arg(long, default_value_t = 122.0, allow_negative_numbers = true)]
    lon_sta: f32,
    /// East edge of the view in degrees
    #[arg(long, default_value_t = 154.0, allow_negative_numbers = true)]
    lon_end: f32,
    /// South edge of the view in degrees
    #[arg(long, default_value_t = 20.0, allow_negative_numbers = true)]
    lat_sta: f32,
    /// North edge of the view in degrees
    #[arg(long, default_value_t = 46.0, allow_negative_numbers = true)]
    lat_end: f32,
    /// Fill color for a region code, as CODE=RRGGBB (repeatable)
    #[arg(long = "fill", value_parser = parse_fill)]
    fills: Vec<(i32, Rgba)>,
    /// Draw shapes in one color, ignoring region codes
    #[arg(long)]
    geometry_only: bool,
}

fn parse_fill(s: &str) -> Result<(i32, Rgba), String> {
    let (code, color) = s
        .split_once('=')
        .ok_or_else(|| format!("`{s}` is not CODE=RRGGBB"))?;
    let code = code
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("`{code}`: {e}"))?;
    Ok((code, color.trim().parse()?))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Load before touching the terminal so errors print normally
    let areas = load_feature_collection::<JmaProperties>(&args.input)?;

    let mut colors = ColorConfig::default();
    colors.code_to_color.extend(args.fills);

    let bounds = Bounds {
        lon_sta: args.lon_sta,
        lon_end: args.lon_end,
        lat_sta: args.lat_sta,
        lat_end: args.lat_end,
    };
    let mut app = App::new(areas, bounds, colors, args.geometry_only);

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, &mut app);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, app))?;

        // Nothing animates, so block until the next input
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                // Pan with hjkl or arrow keys
                KeyCode::Left | KeyCode::Char('h') => app.pan(-1, 0),
                KeyCode::Right | KeyCode::Char('l') => app.pan(1, 0),
                KeyCode::Up | KeyCode::Char('k') => app.pan(0, 1),
                KeyCode::Down | KeyCode::Char('j') => app.pan(0, -1),

                // Zoom
                KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                KeyCode::Char('g') | KeyCode::Char('G') => app.toggle_geometry_only(),
                KeyCode::Char('r') | KeyCode::Char('0') => app.reset(),
                _ => {}
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => app.zoom_in(),
                MouseEventKind::ScrollDown => app.zoom_out(),
                _ => {}
            },
            // Resize and everything else just redraws
            _ => {}
        }
    }

    Ok(())
}
