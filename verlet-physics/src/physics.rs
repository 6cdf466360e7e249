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
//! Simulation orchestrator
//!
//! [`Physics`] owns the particle arena, the behaviour arena, and one
//! integrator, and runs one synchronous step per frame. Particles are
//! stored once, and collision behaviours iterate that same arena — there is
//! no mirrored pool to fall out of sync with the particle list, so adding
//! and removing particles cannot desync anything by construction.
//!
//! The host drives everything from its animation callback:
//!
//! ```text
//! every frame:  physics.step(elapsed_ms)
//!               read particle positions/velocities -> render transforms
//! between frames: mutate behaviour configuration (pointer target, counts)
//! ```
//!
//! A step is bounded synchronous work, O(n²) in collision participants. A
//! paused piece simply stops calling `step`.

use glam::DVec3;

use crate::behaviour::{Behaviour, BehaviourHandle, DISTANCE_EPSILON};
use crate::integration::{total_kinetic_energy, Integrator};
use crate::particle::Particle;

/// Ceiling applied to the per-step time delta, in milliseconds
///
/// Hosts hand over wall-clock deltas, and those explode when an animation
/// loop is suspended (backgrounded tab, debugger pause). Integrating such a
/// delta blows the simulation up, so `step` clamps here first. Roughly two
/// frames at 60 Hz.
pub const MAX_TIMESTEP_MS: f64 = 33.0;

/// Optional post-step projection of particles onto a spherical shell
///
/// Re-normalizes each particle's position to the configured radius after
/// integration, shifting the previous position by the same delta so the
/// projection carries no implied velocity. Pieces that arrange particles on
/// a sphere opt in via [`Physics::set_shell_constraint`]; it is never
/// default integrator behavior.
#[derive(Debug, Clone)]
pub struct ShellProjection {
    radius: f64,
}

impl ShellProjection {
    /// Create a projection onto a sphere of the given radius
    ///
    /// # Panics
    ///
    /// Panics if `radius` is non-positive or non-finite.
    pub fn new(radius: f64) -> Self {
        assert!(
            radius > 0.0 && radius.is_finite(),
            "Shell radius must be positive and finite"
        );
        ShellProjection { radius }
    }

    /// Shell radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    fn project(&self, particle: &mut Particle) {
        let length = particle.position().length();
        if length < DISTANCE_EPSILON {
            return;
        }
        let projected = particle.position() * (self.radius / length);
        let delta = projected - particle.position();
        particle.set_state(projected, particle.previous_position() + delta);
    }
}

/// Owns the simulation state and advances it one step per frame
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use verlet_physics::{Attraction, Particle, Physics, Verlet};
///
/// let mut physics = Physics::new(Verlet::new());
/// let pull = physics.add_behaviour(Attraction::new(DVec3::ZERO, 10.0, 0.5));
///
/// physics.set_count(100, |_| {
///     let mut particle = Particle::new(1.0);
///     particle.behaviours.push(pull);
///     particle
/// });
/// assert_eq!(physics.particle_count(), 100);
///
/// physics.step(16.0);
/// ```
pub struct Physics {
    particles: Vec<Particle>,
    behaviours: Vec<Behaviour>,
    integrator: Box<dyn Integrator>,
    shell: Option<ShellProjection>,
    // scratch buffers reused across steps
    corrections: Vec<DVec3>,
    eligible: Vec<usize>,
}

impl Physics {
    /// Create an empty simulation driven by the given integrator
    pub fn new(integrator: impl Integrator + 'static) -> Self {
        Physics {
            particles: Vec::new(),
            behaviours: Vec::new(),
            integrator: Box::new(integrator),
            shell: None,
            corrections: Vec::new(),
            eligible: Vec::new(),
        }
    }

    /// The active integrator
    pub fn integrator(&self) -> &dyn Integrator {
        self.integrator.as_ref()
    }

    /// Swap the integrator
    pub fn set_integrator(&mut self, integrator: impl Integrator + 'static) {
        self.integrator = Box::new(integrator);
    }

    /// Configure (or clear) the post-step shell projection
    pub fn set_shell_constraint(&mut self, shell: Option<ShellProjection>) {
        self.shell = shell;
    }

    /// Register a behaviour and return its handle
    ///
    /// Handles are stable for the lifetime of this `Physics`; attach them to
    /// particles via [`Particle::behaviours`].
    pub fn add_behaviour(&mut self, behaviour: impl Into<Behaviour>) -> BehaviourHandle {
        self.behaviours.push(behaviour.into());
        BehaviourHandle(self.behaviours.len() - 1)
    }

    /// Borrow a registered behaviour
    pub fn behaviour(&self, handle: BehaviourHandle) -> &Behaviour {
        &self.behaviours[handle.0]
    }

    /// Mutably borrow a registered behaviour
    ///
    /// Hosts use this between steps to move attraction targets or retune
    /// strengths; the change is visible to every attached particle on the
    /// next step.
    pub fn behaviour_mut(&mut self, handle: BehaviourHandle) -> &mut Behaviour {
        &mut self.behaviours[handle.0]
    }

    /// Number of registered behaviours
    pub fn behaviour_count(&self) -> usize {
        self.behaviours.len()
    }

    /// Append a fully-initialized particle, returning its arena index
    pub fn add_particle(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    /// The ordered particle collection
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The ordered particle collection, mutably
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of particles
    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Remove all particles (behaviours stay registered)
    pub fn clear_particles(&mut self) {
        self.particles.clear();
    }

    /// Grow or shrink the particle collection to `count`
    ///
    /// Growth calls `spawn` with the new particle's index; the particle must
    /// come back fully initialized (position, mass, radius, behaviours)
    /// because it is eligible for every attached behaviour from the very
    /// next step. Shrinking truncates from the end.
    pub fn set_count<F>(&mut self, count: usize, mut spawn: F)
    where
        F: FnMut(usize) -> Particle,
    {
        while self.particles.len() < count {
            let particle = spawn(self.particles.len());
            self.particles.push(particle);
        }
        self.particles.truncate(count);
    }

    /// Advance the simulation by one tick of `dt_ms` milliseconds
    ///
    /// Zeroes every accumulator, applies every behaviour attached to every
    /// particle, then runs the integrator over the arena. The delta is
    /// clamped to [`MAX_TIMESTEP_MS`]; a zero, negative, or non-finite delta
    /// is a no-op.
    pub fn step(&mut self, dt_ms: f64) {
        if !(dt_ms > 0.0) || !dt_ms.is_finite() {
            return;
        }
        let dt = dt_ms.min(MAX_TIMESTEP_MS) / 1000.0;

        for particle in &mut self.particles {
            particle.clear_accumulators();
        }

        // per-particle force behaviours
        for index in 0..self.particles.len() {
            for slot in 0..self.particles[index].behaviours.len() {
                let handle = self.particles[index].behaviours[slot];
                match &self.behaviours[handle.0] {
                    Behaviour::Attraction(attraction) => {
                        attraction.apply(&mut self.particles[index]);
                    }
                    // pairwise, handled below against the whole arena
                    Behaviour::Collision(_) => {}
                }
            }
        }

        // pairwise collision passes, accumulate-then-apply
        let count = self.particles.len();
        self.corrections.clear();
        self.corrections.resize(count, DVec3::ZERO);
        let mut any_collision = false;
        for behaviour_index in 0..self.behaviours.len() {
            let Behaviour::Collision(collision) = &self.behaviours[behaviour_index] else {
                continue;
            };
            let handle = BehaviourHandle(behaviour_index);
            self.eligible.clear();
            self.eligible.extend(
                self.particles
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.behaviours.contains(&handle))
                    .map(|(i, _)| i),
            );
            if self.eligible.len() > 1 {
                collision.accumulate(&self.particles, &self.eligible, &mut self.corrections);
                any_collision = true;
            }
        }
        if any_collision {
            for index in 0..count {
                let correction = self.corrections[index];
                if correction != DVec3::ZERO {
                    self.particles[index].apply_correction(correction);
                }
            }
        }

        let integrator = self.integrator.as_ref();
        for particle in &mut self.particles {
            integrator.advance(particle, dt);
        }

        if let Some(shell) = &self.shell {
            for particle in &mut self.particles {
                shell.project(particle);
            }
        }
    }

    /// Total kinetic energy of the system, for diagnostics
    pub fn kinetic_energy(&self) -> f64 {
        total_kinetic_energy(self.particles.iter())
    }

    /// Advisory consistency check over the whole system
    ///
    /// Reports the first particle with non-finite numeric state or a
    /// behaviour handle from a different `Physics`. The step loop never
    /// produces either; this exists for hosts to assert on after their own
    /// bulk mutations.
    pub fn validate(&self) -> Result<(), String> {
        for (index, particle) in self.particles.iter().enumerate() {
            if !particle.is_valid() {
                return Err(format!("particle {index} has non-finite state"));
            }
            for handle in &particle.behaviours {
                if handle.index() >= self.behaviours.len() {
                    return Err(format!(
                        "particle {index} references unknown behaviour {}",
                        handle.index()
                    ));
                }
            }
        }
        Ok(())
    }
}
