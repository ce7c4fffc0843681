use crate::audio::{Audio, Track};
use crate::grid::Size;
use crate::input::Command;
use crate::placement::PlacementError;
use crate::render;
use crate::score::Scoreboard;
use crate::session::{FrameOutcome, GameState};
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub(crate) enum Phase {
    Title,
    Playing(Box<GameState>),
    Paused(Box<GameState>),
    GameOver {
        game: Box<GameState>,
        new_high_score: bool,
    },
    Exit,
}

pub(crate) struct App {
    pub(crate) phase: Phase,
    scoreboard: Scoreboard,
    audio: Box<dyn Audio>,
    /// Seeds each run, so one seed replays a whole session
    rng: StdRng,
    ticks: u64,
}

impl App {
    pub(crate) fn new(scoreboard: Scoreboard, audio: Box<dyn Audio>, seed: u64) -> Self {
        App {
            phase: Phase::Title,
            scoreboard,
            audio,
            rng: StdRng::seed_from_u64(seed),
            ticks: 0,
        }
    }

    pub(crate) fn is_exiting(&self) -> bool {
        matches!(self.phase, Phase::Exit)
    }

    fn start_run(&mut self) -> Result<Phase, PlacementError> {
        let game = GameState::new(Size::ARENA, StdRng::seed_from_u64(self.rng.gen()))?;
        info!("Starting a new run");
        self.audio.play_loop(Track::BackgroundMusic);
        Ok(Phase::Playing(Box::new(game)))
    }

    /// Leaving mid-run still counts towards the high score.
    fn quit_run(&mut self, game: &GameState) -> Phase {
        self.audio.stop(Track::BackgroundMusic);
        self.scoreboard.submit(game.score.points);
        Phase::Exit
    }

    pub(crate) fn handle_command(&mut self, command: Command) -> Result<(), PlacementError> {
        let phase = std::mem::replace(&mut self.phase, Phase::Exit);
        self.phase = match (phase, command) {
            (Phase::Title, Command::Quit) => Phase::Exit,
            (Phase::Title, _) => self.start_run()?,
            (Phase::Playing(mut game), Command::Turn(direction)) => {
                game.push_turn(direction);
                Phase::Playing(game)
            }
            (Phase::Playing(game), Command::Pause) => Phase::Paused(game),
            (Phase::Playing(game) | Phase::Paused(game), Command::Quit) => self.quit_run(&game),
            (Phase::Paused(game), Command::Pause) => Phase::Playing(game),
            (Phase::GameOver { .. }, Command::Restart) => self.start_run()?,
            (Phase::GameOver { .. }, Command::Quit) => Phase::Exit,
            (phase, _) => phase,
        };
        Ok(())
    }

    pub(crate) fn frame(&mut self, dt: f64) -> Result<(), PlacementError> {
        self.ticks += 1;
        let died = match &mut self.phase {
            Phase::Playing(game) => game.frame(dt, self.audio.as_mut())? == FrameOutcome::Died,
            Phase::GameOver { game, .. } => {
                game.tick_particles();
                false
            }
            _ => false,
        };

        if died {
            if let Phase::Playing(game) = std::mem::replace(&mut self.phase, Phase::Exit) {
                self.audio.stop(Track::BackgroundMusic);
                let new_high_score = self.scoreboard.submit(game.score.points);
                info!("Game over with score {}", game.score.points);
                self.phase = Phase::GameOver {
                    game,
                    new_high_score,
                };
            }
        }
        Ok(())
    }

    pub(crate) fn render(&self, frame: &mut Frame) {
        let high_score = self.scoreboard.high_score;
        let layout = Layout::default()
            .direction(layout::Direction::Vertical)
            .constraints([
                Constraint::Length(3), // HUD
                Constraint::Min(0),    // Board
            ])
            .split(frame.area());

        let game = match &self.phase {
            Phase::Playing(game) | Phase::Paused(game) | Phase::GameOver { game, .. } => {
                Some(game.as_ref())
            }
            _ => None,
        };
        frame.render_widget(
            Paragraph::new(render::hud_line(game, high_score))
                .block(Block::default().borders(Borders::ALL)),
            layout[0],
        );

        match &self.phase {
            Phase::Title => render::render_title(frame, layout[1], high_score, self.ticks),
            Phase::Playing(game) => render::render_board(frame, layout[1], game, "Playing"),
            Phase::Paused(game) => {
                render::render_board(frame, layout[1], game, "Paused. Press SPACE to continue")
            }
            Phase::GameOver {
                game,
                new_high_score,
            } => {
                render::render_board(frame, layout[1], game, "Game Over");
                render::render_game_over(
                    frame,
                    layout[1],
                    game.score.points,
                    high_score,
                    *new_high_score,
                );
            }
            Phase::Exit => {}
        }
    }
}
