use crate::consts::{
    EXPLOSION_PARTICLE_LIFE, EXPLOSION_SPEED, FOOD_PARTICLE_LATERAL, FOOD_PARTICLE_LIFE,
    FOOD_PARTICLE_LIFT, PARTICLE_FLOOR_FRICTION, PARTICLE_GRAVITY, PARTICLE_RESTITUTION,
    TRAIL_JITTER, TRAIL_NOISE_STRENGTH, TRAIL_PARTICLE_LIFE,
};
use crate::grid::Point;
use rand::Rng;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ParticleKind {
    Food,
    Explosion,
    Trail,
}

impl ParticleKind {
    fn life(&self) -> i32 {
        match self {
            ParticleKind::Food => FOOD_PARTICLE_LIFE,
            ParticleKind::Explosion => EXPLOSION_PARTICLE_LIFE,
            ParticleKind::Trail => TRAIL_PARTICLE_LIFE,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Particle {
    pub(crate) kind: ParticleKind,
    pub(crate) pos: Point,
    pub(crate) vel: Point,
    pub(crate) life: i32,
    pub(crate) max_life: i32,
}

impl Particle {
    fn new(kind: ParticleKind, pos: Point, vel: Point) -> Self {
        let life = kind.life();
        Particle {
            kind,
            pos,
            vel,
            life,
            max_life: life,
        }
    }

    pub(crate) fn alpha(&self) -> f32 {
        (self.life as f32 / self.max_life as f32).clamp(0.0, 1.0)
    }

    pub(crate) fn rgb(&self) -> (u8, u8, u8) {
        let a = self.alpha();
        let scale = |c: f32| (c * a) as u8;
        match self.kind {
            ParticleKind::Food => (255, scale(255.0), scale(100.0)),
            ParticleKind::Explosion => (255, scale(140.0), scale(40.0)),
            ParticleKind::Trail => (scale(50.0), scale(255.0), scale(50.0)),
        }
    }

    pub(crate) fn symbol(&self) -> &'static str {
        match self.alpha() {
            a if a > 0.66 => "●",
            a if a > 0.33 => "•",
            _ => "·",
        }
    }

    fn update(&mut self, floor: f32) {
        match self.kind {
            ParticleKind::Food => {
                self.vel.y += PARTICLE_GRAVITY;
            }
            ParticleKind::Explosion => {}
            ParticleKind::Trail => {
                let (nx, ny) = flow_noise(self.pos, self.life);
                self.vel.x += nx * TRAIL_NOISE_STRENGTH;
                self.vel.y += ny * TRAIL_NOISE_STRENGTH;
            }
        }

        self.pos.x += self.vel.x;
        self.pos.y += self.vel.y;
        self.life -= 1;

        if self.kind == ParticleKind::Food && self.pos.y >= floor && self.vel.y > 0.0 {
            self.pos.y = floor;
            self.vel.y = -self.vel.y * PARTICLE_RESTITUTION;
            self.vel.x *= PARTICLE_FLOOR_FRICTION;
        }
    }
}

/// Cheap smooth pseudo-noise: a sum of a few sines sampled at the particle position.
fn flow_noise(pos: Point, life: i32) -> (f32, f32) {
    let t = life as f32 * 0.15;
    let n1 = (pos.x * 0.9 + t).sin();
    let n2 = (pos.y * 1.3 - t * 0.7).sin();
    let n3 = ((pos.x + pos.y) * 0.5 + t * 1.7).sin();
    let angle = (n1 + n2 + n3) / 3.0 * TAU;
    (angle.cos(), angle.sin())
}

#[derive(Debug)]
pub(crate) struct ParticleEngine {
    particles: Vec<Particle>,
    floor: f32,
}

impl ParticleEngine {
    /// `floor` is the y coordinate food particles bounce on
    pub(crate) fn new(floor: f32) -> Self {
        ParticleEngine {
            particles: Vec::new(),
            floor,
        }
    }

    pub(crate) fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub(crate) fn spawn(&mut self, kind: ParticleKind, at: Point, rng: &mut impl Rng) {
        let vel = match kind {
            ParticleKind::Food => Point::new(
                rng.gen_range(-FOOD_PARTICLE_LATERAL..=FOOD_PARTICLE_LATERAL),
                rng.gen_range(FOOD_PARTICLE_LIFT.0..=FOOD_PARTICLE_LIFT.1),
            ),
            ParticleKind::Explosion => {
                let angle = rng.gen_range(0.0..TAU);
                let speed = rng.gen_range(EXPLOSION_SPEED.0..=EXPLOSION_SPEED.1);
                Point::new(angle.cos() * speed, angle.sin() * speed)
            }
            ParticleKind::Trail => Point::new(
                rng.gen_range(-TRAIL_JITTER..=TRAIL_JITTER),
                rng.gen_range(-TRAIL_JITTER..=TRAIL_JITTER),
            ),
        };
        self.particles.push(Particle::new(kind, at, vel));
    }

    pub(crate) fn burst(&mut self, kind: ParticleKind, at: Point, count: usize, rng: &mut impl Rng) {
        for _ in 0..count {
            self.spawn(kind, at, rng);
        }
    }

    pub(crate) fn tick(&mut self) {
        let floor = self.floor;
        for particle in &mut self.particles {
            particle.update(floor);
        }
        self.particles.retain(|p| p.life > 0);
    }
}
