// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Headless pointer-chasing swarm
//!
//! Models the interactive loop of a pointer-following art piece without a
//! renderer: a wide gentle attraction and a tight strong repulsion share a
//! moving target point (here a Lissajous curve standing in for a pointer
//! raycast), while pairwise collision keeps the swarm from collapsing into
//! the target. Host-side concerns the physics core deliberately leaves out
//! are modeled where a renderer would put them: Gaussian mass rolls,
//! velocity-derived cosmetic orientation, and the pause / randomize /
//! count-control commands a UI would expose.
//!
//! Run with:
//!
//! ```text
//! cargo run --example swarm
//! ```

use glam::{DQuat, DVec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use verlet_physics::{Attraction, BehaviourHandle, Collision, Particle, Physics, Verlet};

const FRAME_MS: f64 = 16.0;
const MAX_COUNT: usize = 2000;
const COUNT_INCREMENT: usize = 100;
const RADIUS_PER_MASS: f64 = 20.0;

/// Box–Muller draw from N(mean, sigma²), clamped positive
fn gaussian(rng: &mut StdRng, mean: f64, sigma: f64) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    let standard = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    (mean + sigma * standard).max(0.001)
}

/// Per-particle presentation state a renderer would own
struct Cosmetic {
    roll: f64,
    roll_speed: f64,
}

struct Swarm {
    physics: Physics,
    pull: BehaviourHandle,
    push: BehaviourHandle,
    contact: BehaviourHandle,
    cosmetics: Vec<Cosmetic>,
    rng: StdRng,
    paused: bool,
}

impl Swarm {
    fn new(seed: u64) -> Self {
        let mut physics = Physics::new(Verlet::new());
        let pull = physics.add_behaviour(Attraction::new(DVec3::ZERO, 20.0, 0.02));
        let push = physics.add_behaviour(Attraction::new(DVec3::ZERO, 1.1, -0.4));
        let contact = physics.add_behaviour(Collision::new());

        Swarm {
            physics,
            pull,
            push,
            contact,
            cosmetics: Vec::new(),
            rng: StdRng::seed_from_u64(seed),
            paused: false,
        }
    }

    fn spawn_particle(&mut self) -> Particle {
        let mass = gaussian(&mut self.rng, 0.05, 0.01);
        let mut particle = Particle::new(mass);
        particle.set_radius(mass * RADIUS_PER_MASS);
        particle.move_to(DVec3::new(
            self.rng.gen_range(-10.0..10.0),
            self.rng.gen_range(-10.0..10.0),
            self.rng.gen_range(-10.0..10.0),
        ));
        particle.behaviours.push(self.pull);
        particle.behaviours.push(self.push);
        particle.behaviours.push(self.contact);
        particle
    }

    /// Grow or shrink in UI-sized increments, clamped to the piece maximum
    fn adjust_count(&mut self, grow: bool) {
        let current = self.physics.particle_count();
        let target = if grow {
            (current + COUNT_INCREMENT).min(MAX_COUNT)
        } else {
            current.saturating_sub(COUNT_INCREMENT)
        };
        self.set_count(target);
    }

    fn set_count(&mut self, target: usize) {
        // split borrows: set_count takes &mut physics, spawning needs &mut rng
        let mut spawned: Vec<Particle> = Vec::new();
        while self.physics.particle_count() + spawned.len() < target {
            spawned.push(self.spawn_particle());
        }
        let mut next = spawned.into_iter();
        self.physics.set_count(target, |_| {
            next.next().unwrap_or_default()
        });

        while self.cosmetics.len() < target {
            self.cosmetics.push(Cosmetic {
                roll: self.rng.gen_range(0.0..std::f64::consts::TAU),
                roll_speed: self.rng.gen_range(-2.0..2.0),
            });
        }
        self.cosmetics.truncate(target);
        log::info!("particle count now {}", target);
    }

    /// Re-roll every mass (and dependent radius) in place
    fn randomize_masses(&mut self) {
        for index in 0..self.physics.particle_count() {
            let mass = gaussian(&mut self.rng, 0.05, 0.01);
            let particle = &mut self.physics.particles_mut()[index];
            particle.set_mass(mass);
            particle.set_radius(mass * RADIUS_PER_MASS);
        }
        log::info!("masses randomized");
    }

    fn frame(&mut self, time_seconds: f64) {
        if self.paused {
            return;
        }

        // Lissajous pointer stand-in; both behaviours track the same point
        let target = DVec3::new(
            (time_seconds * 0.7).sin() * 8.0,
            (time_seconds * 0.9).cos() * 8.0,
            (time_seconds * 0.4).sin() * 4.0,
        );
        self.physics
            .behaviour_mut(self.pull)
            .as_attraction_mut()
            .expect("pull handle is an attraction")
            .set_target(target);
        self.physics
            .behaviour_mut(self.push)
            .as_attraction_mut()
            .expect("push handle is an attraction")
            .set_target(target);

        self.physics.step(FRAME_MS);

        for cosmetic in &mut self.cosmetics {
            cosmetic.roll += cosmetic.roll_speed * FRAME_MS / 1000.0;
        }
    }

    /// Render transform for one particle: translation plus a
    /// velocity-aligned orientation with cosmetic roll
    fn transform(&self, index: usize) -> (DVec3, DQuat) {
        let particle = &self.physics.particles()[index];
        let velocity = particle.velocity();

        let orientation = if velocity.length_squared() > 1e-12 {
            let facing = DQuat::from_rotation_arc(DVec3::Z, velocity.normalize());
            facing * DQuat::from_rotation_z(self.cosmetics[index].roll)
        } else {
            DQuat::from_rotation_z(self.cosmetics[index].roll)
        };
        (particle.position(), orientation)
    }
}

fn main() {
    env_logger::init();

    let mut swarm = Swarm::new(7);
    swarm.set_count(500);

    let mut time_seconds = 0.0;
    for frame in 0..1200 {
        // exercise the commands a UI would wire to keys
        match frame {
            300 => swarm.adjust_count(true),
            500 => {
                swarm.paused = true;
                log::info!("paused");
            }
            560 => {
                swarm.paused = false;
                log::info!("resumed");
            }
            700 => swarm.randomize_masses(),
            900 => swarm.adjust_count(false),
            _ => {}
        }

        swarm.frame(time_seconds);
        time_seconds += FRAME_MS / 1000.0;

        if frame % 200 == 0 {
            let (position, orientation) = swarm.transform(0);
            println!(
                "frame {frame:4}: {} particles, energy {:.4}, particle[0] at {:.2?} facing {:.2?}",
                swarm.physics.particle_count(),
                swarm.physics.kinetic_energy(),
                position,
                orientation
            );
        }
    }

    println!(
        "done: {} particles, final energy {:.4}",
        swarm.physics.particle_count(),
        swarm.physics.kinetic_energy()
    );
}
