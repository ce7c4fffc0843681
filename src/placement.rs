use crate::consts::{FAKE_FOOD_CHANCE, OBSTACLE_COUNT};
use crate::grid::{Cell, Size};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::io;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Food {
    pub(crate) cell: Cell,
    pub(crate) is_fake: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PlacementError {
    GridFull { needed: usize, free: usize },
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::GridFull { needed, free } => write!(
                f,
                "grid too small: needed {} free cells but only {} left",
                needed, free
            ),
        }
    }
}

impl std::error::Error for PlacementError {}

impl From<PlacementError> for io::Error {
    fn from(err: PlacementError) -> Self {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

fn free_cells(size: Size, is_blocked: impl Fn(Cell) -> bool) -> Vec<Cell> {
    let mut free = Vec::with_capacity(size.cell_count());
    free.extend(size.cells().filter(|&cell| !is_blocked(cell)));
    free
}

fn pick_cells(
    size: Size,
    count: usize,
    is_blocked: impl Fn(Cell) -> bool,
    rng: &mut impl Rng,
) -> Result<Vec<Cell>, PlacementError> {
    let free = free_cells(size, is_blocked);
    if free.len() < count {
        return Err(PlacementError::GridFull {
            needed: count,
            free: free.len(),
        });
    }
    Ok(free.choose_multiple(rng, count).copied().collect())
}

pub(crate) fn place_food(
    size: Size,
    is_blocked: impl Fn(Cell) -> bool,
    rng: &mut impl Rng,
) -> Result<Food, PlacementError> {
    let cell = pick_cells(size, 1, is_blocked, rng)?[0];
    let is_fake = rng.gen_bool(FAKE_FOOD_CHANCE);
    Ok(Food { cell, is_fake })
}

pub(crate) fn generate_obstacles(
    size: Size,
    is_blocked: impl Fn(Cell) -> bool,
    rng: &mut impl Rng,
) -> Result<Vec<Cell>, PlacementError> {
    pick_cells(size, OBSTACLE_COUNT, is_blocked, rng)
}

/// `count` decoy walls outside `is_blocked`. Decoys are drawn but never collide.
pub(crate) fn create_fake_walls(
    size: Size,
    count: usize,
    is_blocked: impl Fn(Cell) -> bool,
    rng: &mut impl Rng,
) -> Result<Vec<Cell>, PlacementError> {
    pick_cells(size, count, is_blocked, rng)
}

/// Move every obstacle to a new free cell, one at a time, so obstacles stay
/// distinct from each other. Returns the `(from, to)` pair of each move.
pub(crate) fn teleport_obstacles(
    size: Size,
    obstacles: &mut [Cell],
    is_blocked: impl Fn(Cell) -> bool,
    rng: &mut impl Rng,
) -> Result<Vec<(Cell, Cell)>, PlacementError> {
    let mut moves = Vec::with_capacity(obstacles.len());
    for i in 0..obstacles.len() {
        let from = obstacles[i];
        let taken: &[Cell] = obstacles;
        let to = pick_cells(size, 1, |c| is_blocked(c) || taken.contains(&c), rng)?[0];
        obstacles[i] = to;
        moves.push((from, to));
    }
    Ok(moves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn snake() -> Vec<Cell> {
        vec![Cell::new(15, 10), Cell::new(14, 10), Cell::new(13, 10)]
    }

    #[test]
    fn test_food_and_obstacles_are_disjoint_from_snake_and_each_other() {
        let mut rng = StdRng::seed_from_u64(1234);
        let snake = snake();
        for _ in 0..200 {
            let food = place_food(Size::ARENA, |c| snake.contains(&c), &mut rng).unwrap();
            let obstacles =
                generate_obstacles(Size::ARENA, |c| snake.contains(&c) || c == food.cell, &mut rng)
                    .unwrap();

            assert!(!snake.contains(&food.cell));
            assert_eq!(obstacles.len(), OBSTACLE_COUNT);
            for (i, obstacle) in obstacles.iter().enumerate() {
                assert!(Size::ARENA.contains(*obstacle));
                assert!(!snake.contains(obstacle));
                assert_ne!(*obstacle, food.cell);
                assert!(!obstacles[i + 1..].contains(obstacle), "duplicate obstacle");
            }
        }
    }

    #[test]
    fn test_food_is_sometimes_fake() {
        let mut rng = StdRng::seed_from_u64(42);
        let fakes = (0..1000)
            .map(|_| place_food(Size::ARENA, |_| false, &mut rng).unwrap())
            .filter(|food| food.is_fake)
            .count();
        // 15% of 1000, with plenty of slack
        assert!(fakes > 80 && fakes < 230, "{} fakes", fakes);
    }

    #[test]
    fn test_placement_terminates_on_nearly_full_grid() {
        let mut rng = StdRng::seed_from_u64(9);
        let size = Size {
            width: 4,
            height: 3,
        };
        let only_free = Cell::new(2, 1);
        let food = place_food(size, |c| c != only_free, &mut rng).unwrap();
        assert_eq!(food.cell, only_free);
    }

    #[test]
    fn test_grid_full_is_reported() {
        let mut rng = StdRng::seed_from_u64(9);
        let size = Size {
            width: 3,
            height: 3,
        };
        let err = generate_obstacles(size, |c| c.x == 0, &mut rng).unwrap_err();
        assert_eq!(
            err,
            PlacementError::GridFull {
                needed: OBSTACLE_COUNT,
                free: 6
            }
        );
        assert!(place_food(size, |_| true, &mut rng).is_err());
    }

    #[test]
    fn test_fake_walls_avoid_blocked_cells() {
        let mut rng = StdRng::seed_from_u64(77);
        let snake = snake();
        for count in 0..=3 {
            let walls =
                create_fake_walls(Size::ARENA, count, |c| snake.contains(&c), &mut rng).unwrap();
            assert_eq!(walls.len(), count);
            assert!(walls.iter().all(|w| !snake.contains(w)));
        }
    }

    #[test]
    fn test_teleport_moves_every_obstacle_to_a_free_cell() {
        let mut rng = StdRng::seed_from_u64(5);
        let snake = snake();
        let food = Cell::new(0, 0);
        let mut obstacles =
            generate_obstacles(Size::ARENA, |c| snake.contains(&c) || c == food, &mut rng)
                .unwrap();
        let before = obstacles.clone();

        let moves = teleport_obstacles(
            Size::ARENA,
            &mut obstacles,
            |c| snake.contains(&c) || c == food,
            &mut rng,
        )
        .unwrap();

        assert_eq!(moves.len(), OBSTACLE_COUNT);
        for (i, (from, to)) in moves.iter().enumerate() {
            assert_eq!(*from, before[i]);
            assert_eq!(*to, obstacles[i]);
            assert_ne!(from, to);
            assert!(!snake.contains(to));
            assert_ne!(*to, food);
        }
        for (i, obstacle) in obstacles.iter().enumerate() {
            assert!(!obstacles[i + 1..].contains(obstacle), "duplicate obstacle");
        }
    }
}
