use crate::consts::INTERPOLATION_RATE;
use crate::grid::{toroidal_delta, Cell, Point, Size};

/// Eases the snake's head between two logic ticks.
///
/// Only the head glides; body segments snap straight to their new cells.
#[derive(Debug, Clone)]
pub(crate) struct SmoothSnake {
    positions: Vec<Cell>,
    target_positions: Vec<Cell>,
    progress: f32,
    size: Size,
}

impl SmoothSnake {
    pub(crate) fn new(initial: &[Cell], size: Size) -> Self {
        SmoothSnake {
            positions: initial.to_vec(),
            target_positions: initial.to_vec(),
            progress: 1.0,
            size,
        }
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.progress >= 1.0
    }

    pub(crate) fn update_targets(&mut self, new_positions: impl IntoIterator<Item = Cell>) {
        self.positions = std::mem::take(&mut self.target_positions);
        self.target_positions = new_positions.into_iter().collect();
        self.progress = 0.0;
    }

    pub(crate) fn sample(&mut self, dt: f32) -> Vec<Point> {
        if !self.is_settled() {
            self.progress = (self.progress + dt * INTERPOLATION_RATE).min(1.0);
        }

        let mut points: Vec<Point> = self.target_positions.iter().map(|c| c.to_point()).collect();
        if self.is_settled() {
            return points;
        }

        let t = ease_out_cubic(self.progress);
        if let (Some(from), Some(to)) = (self.positions.first(), self.target_positions.first()) {
            let from = from.to_point();
            let to = to.to_point();
            let dx = toroidal_delta(from.x, to.x, self.size.width);
            let dy = toroidal_delta(from.y, to.y, self.size.height);
            points[0] = Point::new(from.x + dx * t, from.y + dy * t).wrapped(self.size);
        }
        points
    }
}

fn ease_out_cubic(progress: f32) -> f32 {
    1.0 - (1.0 - progress).powi(3)
}
