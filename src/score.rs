use crate::consts::{POINTS_PER_LEVEL, POINTS_PER_SPEED_STEP};
use log::{error, info, warn};
use std::fs;
use std::io;
use std::path::PathBuf;

pub(crate) trait HighScoreStore {
    /// Missing or unreadable scores count as 0.
    fn load(&self) -> u32;
    fn save(&self, score: u32);
}

#[derive(Debug, Clone)]
pub(crate) struct FileHighScore {
    path: PathBuf,
}

impl FileHighScore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        FileHighScore { path: path.into() }
    }
}

impl HighScoreStore for FileHighScore {
    fn load(&self) -> u32 {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents.trim().parse().unwrap_or_else(|e| {
                warn!("Ignoring unreadable high score {:?}: {}", contents.trim(), e);
                0
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => {
                error!("Error loading high score: {}", e);
                0
            }
        }
    }

    fn save(&self, score: u32) {
        if let Err(e) = fs::write(&self.path, score.to_string()) {
            error!("Error saving high score: {}", e);
        }
    }
}

pub(crate) fn level_for(score: u32) -> u32 {
    score / POINTS_PER_LEVEL + 1
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Score {
    pub(crate) points: u32,
    pub(crate) level: u32,
}

impl Score {
    pub(crate) fn new() -> Self {
        Score {
            points: 0,
            level: level_for(0),
        }
    }

    /// Add one point. Returns true when that crossed into a new level.
    pub(crate) fn add_point(&mut self) -> bool {
        self.points += 1;
        let level = level_for(self.points);
        let levelled_up = level > self.level;
        self.level = level;
        levelled_up
    }

    /// Extra moves per second earned from points
    pub(crate) fn speed_bonus(&self) -> u32 {
        self.points / POINTS_PER_SPEED_STEP
    }
}

pub(crate) struct Scoreboard {
    store: Box<dyn HighScoreStore>,
    pub(crate) high_score: u32,
}

impl Scoreboard {
    pub(crate) fn new(store: Box<dyn HighScoreStore>) -> Self {
        let high_score = store.load();
        info!("Loaded high score {}", high_score);
        Scoreboard { store, high_score }
    }

    /// Record a finished run. Returns true if it set a new high score.
    pub(crate) fn submit(&mut self, score: u32) -> bool {
        if score > self.high_score {
            info!("New high score {} (was {})", score, self.high_score);
            self.high_score = score;
            self.store.save(score);
            true
        } else {
            false
        }
    }
}
