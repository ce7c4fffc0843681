use crate::consts::{GRID_HEIGHT, GRID_WIDTH};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Size {
    pub(crate) width: u16,
    pub(crate) height: u16,
}

impl Size {
    pub(crate) const ARENA: Size = Size {
        width: GRID_WIDTH,
        height: GRID_HEIGHT,
    };

    pub(crate) fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub(crate) fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    pub(crate) fn cells(self) -> impl Iterator<Item = Cell> {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell { x, y }))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub(crate) fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Cell {
    pub(crate) x: u16,
    pub(crate) y: u16,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CellDelta {
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl From<Direction> for CellDelta {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Up => CellDelta { x: 0, y: -1 },
            Direction::Down => CellDelta { x: 0, y: 1 },
            Direction::Right => CellDelta { x: 1, y: 0 },
            Direction::Left => CellDelta { x: -1, y: 0 },
        }
    }
}

impl Cell {
    pub(crate) fn new(x: u16, y: u16) -> Self {
        Cell { x, y }
    }

    pub(crate) fn wrapped_add(&self, delta: CellDelta, size: Size) -> Cell {
        let new_x = (self.x as i32 + delta.x).rem_euclid(size.width as i32) as u16;
        let new_y = (self.y as i32 + delta.y).rem_euclid(size.height as i32) as u16;
        Cell { x: new_x, y: new_y }
    }

    pub(crate) fn step(&self, direction: Direction, size: Size) -> Cell {
        self.wrapped_add(direction.into(), size)
    }

    pub(crate) fn to_point(self) -> Point {
        Point {
            x: self.x as f32,
            y: self.y as f32,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Point {
    pub(crate) x: f32,
    pub(crate) y: f32,
}

impl Point {
    pub(crate) fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    pub(crate) fn wrapped(self, size: Size) -> Point {
        Point {
            x: self.x.rem_euclid(size.width as f32),
            y: self.y.rem_euclid(size.height as f32),
        }
    }

    /// The cell this point rounds to, wrapped onto the grid
    pub(crate) fn nearest_cell(self, size: Size) -> Cell {
        let x = (self.x.round() as i32).rem_euclid(size.width as i32) as u16;
        let y = (self.y.round() as i32).rem_euclid(size.height as i32) as u16;
        Cell { x, y }
    }
}

/// Shortest signed displacement from `from` to `to` along a wrapping axis
pub(crate) fn toroidal_delta(from: f32, to: f32, span: u16) -> f32 {
    let span = span as f32;
    let mut delta = to - from;
    if delta > span / 2.0 {
        delta -= span;
    } else if delta < -span / 2.0 {
        delta += span;
    }
    delta
}
