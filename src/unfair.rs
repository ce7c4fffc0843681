use crate::consts::{
    FAKE_WALLS_CHANCE, FOG_FRAMES, FOG_OF_WAR_CHANCE, FOG_SPEED_MULTIPLIER, INVISIBLE_FRAMES,
    INVISIBLE_SNAKE_CHANCE, MAX_FAKE_WALLS, SPEED_BOOST_FRAMES, SPEED_BOOST_MULTIPLIER,
    SPEED_BOOST_TRAP_CHANCE, TELEPORT_OBSTACLES_CHANCE, UNFAIR_CHECK_INTERVAL,
};
use log::debug;
use rand::Rng;

/// What one poll decided. Nothing is applied until the roll is triggered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UnfairRoll {
    pub(crate) teleport_obstacles: bool,
    pub(crate) invisible_snake: bool,
    pub(crate) fog_of_war: bool,
    pub(crate) fake_walls: Option<usize>,
}

impl UnfairRoll {
    fn roll(has_fake_walls: bool, rng: &mut impl Rng) -> UnfairRoll {
        UnfairRoll {
            teleport_obstacles: rng.gen_bool(TELEPORT_OBSTACLES_CHANCE),
            invisible_snake: rng.gen_bool(INVISIBLE_SNAKE_CHANCE),
            fog_of_war: rng.gen_bool(FOG_OF_WAR_CHANCE),
            fake_walls: if !has_fake_walls && rng.gen_bool(FAKE_WALLS_CHANCE) {
                Some(rng.gen_range(0..=MAX_FAKE_WALLS))
            } else {
                None
            },
        }
    }
}

#[derive(Debug, Default, Clone)]
pub(crate) struct UnfairMechanics {
    pub(crate) invisible_snake: u32,
    pub(crate) speed_boost_active: u32,
    pub(crate) fog_of_war: u32,
    last_unfair_check: f64,
}

impl UnfairMechanics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_invisible(&self) -> bool {
        self.invisible_snake > 0
    }

    pub(crate) fn is_foggy(&self) -> bool {
        self.fog_of_war > 0
    }

    pub(crate) fn is_speed_boosted(&self) -> bool {
        self.speed_boost_active > 0
    }

    pub(crate) fn speed_multiplier(&self) -> f64 {
        if self.is_speed_boosted() {
            SPEED_BOOST_MULTIPLIER
        } else {
            1.0
        }
    }

    pub(crate) fn fog_multiplier(&self) -> f64 {
        if self.is_foggy() {
            FOG_SPEED_MULTIPLIER
        } else {
            1.0
        }
    }

    pub(crate) fn tick_timers(&mut self) {
        self.invisible_snake = self.invisible_snake.saturating_sub(1);
        self.speed_boost_active = self.speed_boost_active.saturating_sub(1);
        self.fog_of_war = self.fog_of_war.saturating_sub(1);
    }

    pub(crate) fn poll(
        &mut self,
        game_timer: f64,
        has_fake_walls: bool,
        rng: &mut impl Rng,
    ) -> Option<UnfairRoll> {
        if game_timer - self.last_unfair_check <= UNFAIR_CHECK_INTERVAL {
            return None;
        }
        self.last_unfair_check = game_timer;
        Some(UnfairRoll::roll(has_fake_walls, rng))
    }

    /// Start the timers a roll asks for. The board-side effects are the caller's.
    pub(crate) fn trigger(&mut self, roll: &UnfairRoll) {
        // A fresh trigger overwrites whatever time was left
        if roll.invisible_snake {
            debug!("Snake turns invisible");
            self.invisible_snake = INVISIBLE_FRAMES;
        }
        if roll.fog_of_war {
            debug!("Fog rolls in");
            self.fog_of_war = FOG_FRAMES;
        }
    }

    /// Rolled once per real food eaten. Returns whether the trap sprang.
    pub(crate) fn roll_speed_trap(&mut self, rng: &mut impl Rng) -> bool {
        if rng.gen_bool(SPEED_BOOST_TRAP_CHANCE) {
            debug!("Speed trap sprung");
            self.speed_boost_active = SPEED_BOOST_FRAMES;
            true
        } else {
            false
        }
    }
}
