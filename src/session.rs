use crate::audio::{Audio, AudioEvent};
use crate::consts::{
    BASE_SPEED, EXPLOSION_BURST_COUNT, FAKE_FOOD_PENALTY, FOOD_BURST_COUNT, INITIAL_SNAKE_LENGTH,
    LEVEL_UP_BURST_COUNT, MIN_SNAKE_LENGTH, TRAIL_SPAWN_CHANCE,
};
use crate::grid::{Cell, Direction, Point, Size};
use crate::input::InputBuffer;
use crate::particles::{ParticleEngine, ParticleKind};
use crate::placement::{self, Food, PlacementError};
use crate::score::Score;
use crate::smooth::SmoothSnake;
use crate::unfair::{UnfairMechanics, UnfairRoll};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    Moved,
    AteReal { levelled_up: bool },
    AteFake,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FrameOutcome {
    Running,
    Died,
}

pub(crate) struct GameState {
    size: Size,
    pub(crate) snake: VecDeque<Cell>,
    pub(crate) direction: Direction,
    pub(crate) food: Food,
    pub(crate) obstacles: Vec<Cell>,
    pub(crate) fake_walls: Vec<Cell>,
    pub(crate) score: Score,
    pub(crate) unfair: UnfairMechanics,
    pub(crate) particles: ParticleEngine,
    smooth: SmoothSnake,
    /// Where the snake should be drawn this frame
    pub(crate) display: Vec<Point>,
    input: InputBuffer,
    game_timer: f64,
    last_move_time: f64,
    pub(crate) frames: u64,
    rng: StdRng,
}

impl GameState {
    pub(crate) fn new(size: Size, mut rng: StdRng) -> Result<Self, PlacementError> {
        let mid = Cell::new(size.width / 2, size.height / 2);
        let snake: VecDeque<Cell> = (0..INITIAL_SNAKE_LENGTH as u16)
            .map(|i| Cell::new((mid.x + size.width - i) % size.width, mid.y))
            .collect();

        let food = placement::place_food(size, |c| snake.contains(&c), &mut rng)?;
        let obstacles =
            placement::generate_obstacles(size, |c| snake.contains(&c) || c == food.cell, &mut rng)?;

        let cells: Vec<Cell> = snake.iter().copied().collect();
        Ok(GameState {
            size,
            display: cells.iter().map(|c| c.to_point()).collect(),
            smooth: SmoothSnake::new(&cells, size),
            snake,
            direction: Direction::Right,
            food,
            obstacles,
            fake_walls: Vec::new(),
            score: Score::new(),
            unfair: UnfairMechanics::new(),
            particles: ParticleEngine::new((size.height - 1) as f32),
            input: InputBuffer::default(),
            game_timer: 0.0,
            last_move_time: 0.0,
            frames: 0,
            rng,
        })
    }

    pub(crate) fn size(&self) -> Size {
        self.size
    }

    pub(crate) fn head(&self) -> Cell {
        self.snake[0]
    }

    pub(crate) fn push_turn(&mut self, direction: Direction) {
        self.input.push(direction);
    }

    pub(crate) fn current_speed(&self) -> f64 {
        (BASE_SPEED + self.score.speed_bonus() as f64)
            * self.unfair.speed_multiplier()
            * self.unfair.fog_multiplier()
    }

    pub(crate) fn move_interval(&self) -> f64 {
        1.0 / self.current_speed()
    }

    pub(crate) fn frame(
        &mut self,
        dt: f64,
        audio: &mut dyn Audio,
    ) -> Result<FrameOutcome, PlacementError> {
        self.frames += 1;
        self.game_timer += dt;

        self.unfair.tick_timers();
        self.run_unfair_poll()?;

        let mut outcome = FrameOutcome::Running;
        if self.game_timer - self.last_move_time >= self.move_interval() {
            self.last_move_time = self.game_timer;
            let direction = self.input.resolve(self.direction);
            self.direction = direction;
            if self.logic_tick(direction, audio)? == StepOutcome::Dead {
                outcome = FrameOutcome::Died;
            }
        }

        self.particles.tick();
        self.display = self.smooth.sample(dt as f32);
        Ok(outcome)
    }

    pub(crate) fn tick_particles(&mut self) {
        self.particles.tick();
    }

    fn run_unfair_poll(&mut self) -> Result<(), PlacementError> {
        let has_fake_walls = !self.fake_walls.is_empty();
        match self.unfair.poll(self.game_timer, has_fake_walls, &mut self.rng) {
            Some(roll) => self.apply_unfair(roll),
            None => Ok(()),
        }
    }

    fn apply_unfair(&mut self, roll: UnfairRoll) -> Result<(), PlacementError> {
        self.unfair.trigger(&roll);

        if roll.teleport_obstacles {
            debug!("Teleporting obstacles");
            let snake = &self.snake;
            let food = self.food.cell;
            let fake_walls = &self.fake_walls;
            let moves = placement::teleport_obstacles(
                self.size,
                &mut self.obstacles,
                |c| snake.contains(&c) || c == food || fake_walls.contains(&c),
                &mut self.rng,
            )?;
            let puff = EXPLOSION_BURST_COUNT / 2;
            for (from, to) in moves {
                for cell in [from, to] {
                    self.particles
                        .burst(ParticleKind::Explosion, cell.to_point(), puff, &mut self.rng);
                }
            }
        }

        if let Some(count) = roll.fake_walls {
            debug!("Raising {} decoy walls", count);
            let snake = &self.snake;
            let food = self.food.cell;
            let obstacles = &self.obstacles;
            self.fake_walls = placement::create_fake_walls(
                self.size,
                count,
                |c| snake.contains(&c) || c == food || obstacles.contains(&c),
                &mut self.rng,
            )?;
        }
        Ok(())
    }

    fn logic_tick(
        &mut self,
        direction: Direction,
        audio: &mut dyn Audio,
    ) -> Result<StepOutcome, PlacementError> {
        let eaten_at = self.food.cell;
        let outcome = self.advance(direction)?;

        match outcome {
            StepOutcome::Dead => {
                info!("Snake died with score {}", self.score.points);
                audio.play(AudioEvent::GameOver, 1.0);
                let crash = self.head().step(direction, self.size).to_point();
                self.particles
                    .burst(ParticleKind::Explosion, crash, EXPLOSION_BURST_COUNT, &mut self.rng);
                return Ok(outcome);
            }
            StepOutcome::Moved => {
                audio.play(AudioEvent::Move, 0.1);
            }
            StepOutcome::AteReal { levelled_up } => {
                audio.play(AudioEvent::Eat, 1.0);
                self.particles
                    .burst(ParticleKind::Food, eaten_at.to_point(), FOOD_BURST_COUNT, &mut self.rng);
                if self.unfair.roll_speed_trap(&mut self.rng) {
                    info!("Speed trap at score {}", self.score.points);
                }
                if levelled_up {
                    info!("Reached level {}", self.score.level);
                    audio.play(AudioEvent::LevelUp, 1.0);
                    let head = self.head().to_point();
                    self.particles
                        .burst(ParticleKind::Food, head, LEVEL_UP_BURST_COUNT, &mut self.rng);
                }
            }
            StepOutcome::AteFake => {
                debug!("Ate fake food, length now {}", self.snake.len());
                audio.play(AudioEvent::GameOver, 0.6);
                self.particles.burst(
                    ParticleKind::Explosion,
                    eaten_at.to_point(),
                    EXPLOSION_BURST_COUNT,
                    &mut self.rng,
                );
            }
        }

        if self.rng.gen_bool(TRAIL_SPAWN_CHANCE) {
            if let Some(neck) = self.snake.get(1) {
                self.particles
                    .spawn(ParticleKind::Trail, neck.to_point(), &mut self.rng);
            }
        }
        self.smooth.update_targets(self.snake.iter().copied());
        Ok(outcome)
    }

    /// Move the snake one cell and resolve whatever it ran into.
    pub(crate) fn advance(&mut self, direction: Direction) -> Result<StepOutcome, PlacementError> {
        let new_head = self.head().step(direction, self.size);
        debug_assert!(self.size.contains(new_head));

        if self.snake.contains(&new_head) || self.obstacles.contains(&new_head) {
            return Ok(StepOutcome::Dead);
        }

        self.snake.push_front(new_head);
        if new_head != self.food.cell {
            self.snake.pop_back();
            return Ok(StepOutcome::Moved);
        }

        let outcome = if self.food.is_fake {
            // The regular tail pop plus the penalty, never under the minimum
            self.snake.pop_back();
            for _ in 0..FAKE_FOOD_PENALTY {
                if self.snake.len() <= MIN_SNAKE_LENGTH {
                    break;
                }
                self.snake.pop_back();
            }
            StepOutcome::AteFake
        } else {
            StepOutcome::AteReal {
                levelled_up: self.score.add_point(),
            }
        };

        self.respawn_food_and_obstacles()?;
        Ok(outcome)
    }

    fn respawn_food_and_obstacles(&mut self) -> Result<(), PlacementError> {
        let snake = &self.snake;
        let obstacles = &self.obstacles;
        let food = placement::place_food(
            self.size,
            |c| snake.contains(&c) || obstacles.contains(&c),
            &mut self.rng,
        )?;
        self.obstacles = placement::generate_obstacles(
            self.size,
            |c| snake.contains(&c) || c == food.cell,
            &mut self.rng,
        )?;
        self.food = food;
        self.fake_walls.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Silent;
    use crate::consts::{FOG_FRAMES, INVISIBLE_FRAMES, MAX_FAKE_WALLS, OBSTACLE_COUNT};
    use rand::SeedableRng;

    const SIZE: Size = Size {
        width: 20,
        height: 20,
    };

    fn game() -> GameState {
        GameState::new(SIZE, StdRng::seed_from_u64(1)).unwrap()
    }

    fn game_with(snake: &[(u16, u16)], food: (u16, u16), is_fake: bool) -> GameState {
        let mut game = game();
        game.snake = snake.iter().map(|&(x, y)| Cell::new(x, y)).collect();
        game.food = Food {
            cell: Cell::new(food.0, food.1),
            is_fake,
        };
        game.obstacles = vec![Cell::new(0, 19)];
        game.fake_walls.clear();
        game
    }

    fn line(len: u16) -> Vec<(u16, u16)> {
        (0..len).map(|i| (10 - i, 10)).collect()
    }

    fn assert_board_disjoint(game: &GameState) {
        assert!(!game.snake.contains(&game.food.cell));
        assert!(!game.obstacles.contains(&game.food.cell));
        assert_eq!(game.obstacles.len(), OBSTACLE_COUNT);
        for (i, obstacle) in game.obstacles.iter().enumerate() {
            assert!(!game.snake.contains(obstacle));
            assert!(!game.obstacles[i + 1..].contains(obstacle));
        }
    }

    #[test]
    fn test_new_game_layout() {
        let game = game();
        let snake: Vec<Cell> = game.snake.iter().copied().collect();
        assert_eq!(snake, vec![Cell::new(10, 10), Cell::new(9, 10), Cell::new(8, 10)]);
        assert_eq!(game.direction, Direction::Right);
        assert_eq!(game.score.points, 0);
        assert_eq!(game.score.level, 1);
        assert_board_disjoint(&game);
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut game = game_with(&line(4), (0, 0), false);
        assert_eq!(game.advance(Direction::Right).unwrap(), StepOutcome::Moved);
        assert_eq!(game.snake.len(), 4);
        assert_eq!(game.head(), Cell::new(11, 10));
        assert_eq!(game.snake.back(), Some(&Cell::new(8, 10)));
    }

    #[test]
    fn test_real_food_grows_by_one() {
        let mut game = game_with(&line(4), (11, 10), false);
        let outcome = game.advance(Direction::Right).unwrap();
        assert_eq!(outcome, StepOutcome::AteReal { levelled_up: false });
        assert_eq!(game.snake.len(), 5);
        assert_eq!(game.score.points, 1);
        assert_board_disjoint(&game);
    }

    #[test]
    fn test_fake_food_shrinks_by_two() {
        let mut game = game_with(&line(7), (11, 10), true);
        assert_eq!(game.advance(Direction::Right).unwrap(), StepOutcome::AteFake);
        assert_eq!(game.snake.len(), 5);
        assert_eq!(game.score.points, 0);
        assert_board_disjoint(&game);
    }

    #[test]
    fn test_fake_food_penalty_floors_at_three() {
        for (len, expected) in [(3, 3), (4, 3), (5, 3), (6, 4)] {
            let mut game = game_with(&line(len), (11, 10), true);
            game.advance(Direction::Right).unwrap();
            assert_eq!(game.snake.len(), expected, "from length {}", len);
        }
    }

    #[test]
    fn test_eating_clears_decoys_and_regenerates_obstacles() {
        let mut game = game_with(&line(3), (11, 10), false);
        game.fake_walls = vec![Cell::new(1, 1), Cell::new(2, 2)];
        game.advance(Direction::Right).unwrap();
        assert!(game.fake_walls.is_empty());
        assert_eq!(game.obstacles.len(), OBSTACLE_COUNT);
        assert_ne!(game.food.cell, Cell::new(11, 10));
    }

    #[test]
    fn test_obstacle_kills_but_decoy_does_not() {
        let mut game = game_with(&line(3), (0, 0), false);
        game.fake_walls = vec![Cell::new(11, 10)];
        assert_eq!(game.advance(Direction::Right).unwrap(), StepOutcome::Moved);

        game.obstacles = vec![Cell::new(12, 10)];
        assert_eq!(game.advance(Direction::Right).unwrap(), StepOutcome::Dead);
        assert_eq!(game.head(), Cell::new(11, 10), "board untouched on death");
    }

    #[test]
    fn test_wraps_instead_of_dying_at_edges() {
        let mut game = game_with(&[(19, 5), (18, 5), (17, 5)], (0, 0), false);
        game.obstacles.clear();
        assert_eq!(game.advance(Direction::Right).unwrap(), StepOutcome::Moved);
        assert_eq!(game.head(), Cell::new(0, 5));

        let mut game = game_with(&[(4, 0), (4, 1), (4, 2)], (0, 0), false);
        game.obstacles.clear();
        game.advance(Direction::Up).unwrap();
        assert_eq!(game.head(), Cell::new(4, 19));
    }

    #[test]
    fn test_u_turn_into_body_dies_on_that_tick() {
        let mut game = game_with(&[(5, 5), (5, 6), (5, 7), (5, 8), (5, 9)], (0, 0), false);
        game.obstacles.clear();
        assert_eq!(game.advance(Direction::Right).unwrap(), StepOutcome::Moved);
        assert_eq!(game.advance(Direction::Down).unwrap(), StepOutcome::Moved);
        assert_eq!(game.advance(Direction::Left).unwrap(), StepOutcome::Dead);
    }

    #[test]
    fn test_five_real_foods_reach_level_two() {
        let mut game = game_with(&line(3), (11, 10), false);
        game.obstacles.clear();
        let mut level_ups = 0;
        for i in 0..11u16 {
            let next = game.head().step(Direction::Right, SIZE);
            game.food = Food {
                cell: next,
                is_fake: false,
            };
            game.obstacles.retain(|&c| c.y != 10);
            game.fake_walls.clear();
            if let StepOutcome::AteReal { levelled_up: true } = game.advance(Direction::Right).unwrap() {
                level_ups += 1;
            }
            match i + 1 {
                5 | 6 => assert_eq!(game.score.level, 2),
                11 => assert_eq!(game.score.level, 3),
                _ => {}
            }
        }
        assert_eq!(game.score.points, 11);
        assert_eq!(level_ups, 2);
    }

    #[test]
    fn test_reversal_in_buffer_is_ignored_by_frame() {
        let mut game = game_with(&line(4), (0, 0), false);
        game.obstacles.clear();
        game.push_turn(Direction::Left);
        let interval = game.move_interval();
        game.frame(interval, &mut Silent).unwrap();
        assert_eq!(game.direction, Direction::Right);
        assert_eq!(game.head(), Cell::new(11, 10));
    }

    #[test]
    fn test_logic_ticks_follow_move_interval() {
        let mut game = game_with(&line(3), (0, 0), false);
        game.obstacles.clear();
        let interval = game.move_interval();
        assert!((interval - 1.0 / BASE_SPEED).abs() < 1e-9);

        game.frame(interval * 0.4, &mut Silent).unwrap();
        assert_eq!(game.head(), Cell::new(10, 10), "too early to move");
        game.frame(interval * 0.4, &mut Silent).unwrap();
        assert_eq!(game.head(), Cell::new(10, 10));
        game.frame(interval * 0.4, &mut Silent).unwrap();
        assert_eq!(game.head(), Cell::new(11, 10));
    }

    #[test]
    fn test_at_most_one_logic_tick_per_frame() {
        let mut game = game_with(&line(3), (0, 0), false);
        game.obstacles.clear();
        game.frame(1.0, &mut Silent).unwrap();
        assert_eq!(game.head(), Cell::new(11, 10));
    }

    #[test]
    fn test_modifiers_change_speed() {
        let mut game = game();
        for _ in 0..6 {
            game.score.add_point();
        }
        assert_eq!(game.current_speed(), BASE_SPEED + 2.0);

        game.unfair.speed_boost_active = 10;
        assert_eq!(game.current_speed(), (BASE_SPEED + 2.0) * 2.0);

        game.unfair.fog_of_war = 10;
        assert!((game.current_speed() - (BASE_SPEED + 2.0) * 2.0 * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_frame_reports_death() {
        let mut game = game_with(&line(3), (0, 0), false);
        game.obstacles = vec![Cell::new(11, 10)];
        let interval = game.move_interval();
        assert_eq!(game.frame(interval, &mut Silent).unwrap(), FrameOutcome::Died);
    }

    #[test]
    fn test_display_settles_on_snake() {
        let mut game = game_with(&line(3), (0, 0), false);
        game.obstacles.clear();
        game.smooth = SmoothSnake::new(&game.snake.iter().copied().collect::<Vec<_>>(), SIZE);
        let interval = game.move_interval();
        game.frame(interval, &mut Silent).unwrap();
        for _ in 0..30 {
            game.frame(0.001, &mut Silent).unwrap();
        }
        // Not enough time for a second move, but plenty to finish the glide
        assert_eq!(game.display[0], Point::new(11.0, 10.0));
    }

    #[test]
    fn test_long_run_keeps_board_consistent() {
        let mut game = GameState::new(Size::ARENA, StdRng::seed_from_u64(99)).unwrap();
        let turns = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];
        for step in 0..5000 {
            if step % 7 == 0 {
                game.push_turn(turns[(step / 7) % turns.len()]);
            }
            if game.frame(1.0 / 60.0, &mut Silent).unwrap() == FrameOutcome::Died {
                break;
            }
            for cell in game.snake.iter().chain(&game.obstacles).chain(&game.fake_walls) {
                assert!(Size::ARENA.contains(*cell));
            }
            assert!(game.snake.len() >= MIN_SNAKE_LENGTH);
            for wall in &game.fake_walls {
                assert!(!game.obstacles.contains(wall));
            }
            assert!(!game.obstacles.contains(&game.food.cell));
        }
    }

    #[test]
    fn test_unfair_roll_reshapes_the_board() {
        let mut game = game_with(&line(5), (3, 3), false);
        game.obstacles = (0..OBSTACLE_COUNT as u16).map(|x| Cell::new(x, 15)).collect();
        game.fake_walls = vec![Cell::new(2, 2)];
        let before = game.obstacles.clone();

        game.apply_unfair(UnfairRoll {
            teleport_obstacles: true,
            invisible_snake: true,
            fog_of_war: true,
            fake_walls: None,
        })
        .unwrap();

        assert_board_disjoint(&game);
        assert!(!game.obstacles.contains(&Cell::new(2, 2)), "teleport avoids decoys");
        // Two puffs for every obstacle, one where it was and one where it landed
        let puff = EXPLOSION_BURST_COUNT / 2;
        assert_eq!(game.particles.particles().len(), 2 * puff * OBSTACLE_COUNT);
        for (i, (from, to)) in before.iter().zip(&game.obstacles).enumerate() {
            let first = &game.particles.particles()[2 * puff * i];
            let second = &game.particles.particles()[2 * puff * i + puff];
            assert_eq!(first.pos, from.to_point());
            assert_eq!(second.pos, to.to_point());
        }

        assert_eq!(game.unfair.invisible_snake, INVISIBLE_FRAMES);
        assert_eq!(game.unfair.fog_of_war, FOG_FRAMES);
        game.obstacles.clear();
        game.frame(0.001, &mut Silent).unwrap();
        assert_eq!(game.unfair.invisible_snake, INVISIBLE_FRAMES - 1);
        assert_eq!(game.unfair.fog_of_war, FOG_FRAMES - 1);
    }

    #[test]
    fn test_decoys_spawn_on_free_cells() {
        for seed in 0..20 {
            let mut game = GameState::new(SIZE, StdRng::seed_from_u64(seed)).unwrap();
            game.apply_unfair(UnfairRoll {
                fake_walls: Some(MAX_FAKE_WALLS),
                ..UnfairRoll::default()
            })
            .unwrap();

            assert_eq!(game.fake_walls.len(), MAX_FAKE_WALLS);
            for (i, wall) in game.fake_walls.iter().enumerate() {
                assert!(!game.snake.contains(wall));
                assert!(!game.obstacles.contains(wall));
                assert_ne!(*wall, game.food.cell);
                assert!(!game.fake_walls[i + 1..].contains(wall));
            }
            assert!(!game.unfair.is_invisible());
            assert!(game.particles.particles().is_empty());
        }
    }
}
