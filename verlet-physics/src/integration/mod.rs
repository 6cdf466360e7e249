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
//! Numerical integration of particle kinematics
//!
//! An integrator advances one particle per call, given its accumulated force
//! and positional correction for the step. The crate ships a single
//! position-based Verlet implementation; the trait seam exists so a host can
//! substitute its own scheme without touching the orchestrator.
//!
//! # Damping Guidelines
//!
//! Position-based Verlet carries momentum implicitly through the difference
//! of current and previous position. Under sustained O(n²) repulsion forces
//! that momentum accumulates, so the damping coefficient acts as numerical
//! drag:
//!
//! - `1.0`: no drag; only safe for short-lived or force-free setups
//! - `0.95..1.0`: typical range for interactive pieces
//! - below `0.9`: motion visibly syrupy, useful for settling passes

use crate::particle::Particle;

mod verlet;

pub use verlet::Verlet;

/// Advances particle kinematics from accumulated forces and corrections
///
/// Implementations must leave immovable particles (`inverse_mass == 0`)
/// untouched and must never emit non-finite state: a degenerate update is
/// dropped, not propagated.
pub trait Integrator: Send + Sync {
    /// Descriptive name of this integrator
    fn name(&self) -> &str;

    /// Advance one particle by `dt` seconds
    fn advance(&self, particle: &mut Particle, dt: f64);
}

/// Kinetic energy of one particle from its implied per-step velocity
///
/// Immovable particles contribute zero regardless of accumulated state.
pub fn kinetic_energy(particle: &Particle) -> f64 {
    if particle.is_immovable() {
        return 0.0;
    }
    0.5 * particle.mass() * particle.velocity().length_squared()
}

/// Total kinetic energy over a set of particles
pub fn total_kinetic_energy<'a, I>(particles: I) -> f64
where
    I: Iterator<Item = &'a Particle>,
{
    particles.map(kinetic_energy).sum()
}
