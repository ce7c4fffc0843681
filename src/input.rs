use crate::grid::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::collections::VecDeque;

const INPUT_BUFFER_CAPACITY: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Turn(Direction),
    Pause,
    Restart,
    Quit,
    /// Any other key, used to leave the title screen
    Other,
}

impl Command {
    pub(crate) fn from_key_event(key: KeyEvent) -> Option<Command> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let command = match key.code {
            KeyCode::Up | KeyCode::Char('w') => Command::Turn(Direction::Up),
            KeyCode::Down | KeyCode::Char('s') => Command::Turn(Direction::Down),
            KeyCode::Left | KeyCode::Char('a') => Command::Turn(Direction::Left),
            KeyCode::Right | KeyCode::Char('d') => Command::Turn(Direction::Right),
            KeyCode::Char(' ') | KeyCode::Char('p') => Command::Pause,
            KeyCode::Char('r') => Command::Restart,
            KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
            _ => Command::Other,
        };
        Some(command)
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct InputBuffer {
    pending: VecDeque<Direction>,
}

impl InputBuffer {
    pub(crate) fn push(&mut self, direction: Direction) {
        self.pending.push_back(direction);
        while self.pending.len() > INPUT_BUFFER_CAPACITY {
            self.pending.pop_front();
        }
    }

    /// Take the first buffered turn that doesn't reverse `current` and drop the rest.
    pub(crate) fn resolve(&mut self, current: Direction) -> Direction {
        let next = self
            .pending
            .iter()
            .copied()
            .find(|&dir| dir != current.opposite())
            .unwrap_or(current);
        self.pending.clear();
        next
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
