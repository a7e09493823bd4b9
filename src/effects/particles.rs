//! Level-driven particle overlay.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

use crate::params::EffectParams;
use crate::render::{hsv_to_rgb, Canvas};

/// One particle in normalized screen space ([0, 1] on both axes)
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub age: f32,
    pub hue: f32,
}

/// Particles emitted from the screen center at a rate proportional to level
pub struct ParticleField {
    particles: Vec<Particle>,
    rng: SmallRng,
    emit_accumulator: f32,
    rate: f32,
    life_s: f32,
    max_particles: usize,
}

impl ParticleField {
    pub fn new(params: &EffectParams) -> Self {
        Self {
            particles: Vec::new(),
            rng: SmallRng::seed_from_u64(params.particle_seed),
            emit_accumulator: 0.0,
            rate: params.particle_rate,
            life_s: params.particle_life_s,
            max_particles: params.max_particles,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.emit_accumulator = 0.0;
    }

    /// Age, move, cull, and emit new particles
    pub fn update(&mut self, level: f32, dt: f32) {
        let life = self.life_s;
        for particle in &mut self.particles {
            particle.age += dt;
            particle.position += particle.velocity * dt;
        }
        self.particles.retain(|p| {
            p.age < life && (-0.1..=1.1).contains(&p.position.x) && (-0.1..=1.1).contains(&p.position.y)
        });

        self.emit_accumulator += self.rate * level.max(0.0) * dt;
        while self.emit_accumulator >= 1.0 {
            self.emit_accumulator -= 1.0;
            if self.particles.len() >= self.max_particles {
                continue;
            }
            let angle = self.rng.gen_range(0.0..TAU);
            let speed = self.rng.gen_range(0.05..0.35) * (1.0 + level);
            self.particles.push(Particle {
                position: Vec2::splat(0.5),
                velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                age: 0.0,
                hue: self.rng.gen_range(0.0..1.0),
            });
        }
    }

    /// Draw particles sharp on top of the canvas, fading with age
    pub fn draw(&self, canvas: &mut Canvas) {
        let size = Vec2::new(canvas.width() as f32, canvas.height() as f32);
        for particle in &self.particles {
            let fade = 1.0 - particle.age / self.life_s;
            canvas.draw_dot(
                particle.position * size,
                1,
                hsv_to_rgb(particle.hue, 0.4, 1.0),
                fade,
            );
        }
    }
}
