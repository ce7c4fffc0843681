mod app;
mod audio;
mod consts;
mod grid;
mod input;
mod particles;
mod placement;
mod render;
mod score;
mod session;
mod smooth;
mod unfair;

use crate::app::App;
use crate::consts::{HIGH_SCORE_FILE, LOG_FILE, SEED_ENV_VAR, TARGET_FPS};
use crate::input::Command;
use crate::score::{FileHighScore, Scoreboard};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::prelude::*;
use simplelog::{Config, LevelFilter, WriteLogger};
use std::fs::File;
use std::io;
use std::time::{Duration, Instant};

fn main() -> Result<(), io::Error> {
    // Set up logging before anything else
    WriteLogger::init(LevelFilter::Info, Config::default(), File::create(LOG_FILE)?)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let seed = std::env::var(SEED_ENV_VAR)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);
    info!("Starting Unfair Snek with seed {}", seed);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        Scoreboard::new(Box::new(FileHighScore::new(HIGH_SCORE_FILE))),
        audio::open(),
        seed,
    );
    let result = run(&mut terminal, &mut app);
    if let Err(e) = &result {
        error!("Game loop failed: {}", e);
    }

    // Cleanup terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Bye");
    result
}

fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let frame_time = Duration::from_secs_f64(1.0 / f64::from(TARGET_FPS));
    let mut last_frame = Instant::now();

    while !app.is_exiting() {
        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        app.frame(dt)?;
        terminal.draw(|f| app.render(f))?;

        let deadline = now + frame_time;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if !event::poll(remaining)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if let Some(command) = Command::from_key_event(key) {
                    app.handle_command(command)?;
                }
            }
            if app.is_exiting() {
                break;
            }
        }
    }
    Ok(())
}
