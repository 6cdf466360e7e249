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
//! Position-based Verlet integrator
//!
//! # Algorithm
//!
//! Velocity is never stored; it is implied by the difference of current and
//! previous position:
//!
//! ```text
//! next = position + (position - previous) * damping + force * inverse_mass * dt² + correction
//! ```
//!
//! after which `previous` becomes the pre-update position shifted by the
//! same correction. Shifting both positions by the correction is what makes
//! collision resolution velocity-free: a particle pushed out of an overlap
//! does not pick up momentum from the push.
//!
//! # Properties
//!
//! - **Implicit momentum**: state survives teleports only via
//!   [`Particle::move_to`], which resets both positions
//! - **Numerical drag**: damping in `(0, 1]` attenuates carried momentum so
//!   sustained pairwise repulsion cannot accumulate unbounded energy
//! - **Immovable bodies**: `inverse_mass == 0` short-circuits the update
//!
//! # References
//!
//! - Verlet, L. (1967). Computer "Experiments" on Classical Fluids. I.
//!   Thermodynamical Properties of Lennard-Jones Molecules. Physical
//!   Review, 159(1), 98-103.
//! - Jakobsen, T. (2001). Advanced Character Physics. Game Developers
//!   Conference Proceedings.

use crate::particle::Particle;

use super::Integrator;

/// Default damping coefficient
///
/// Light drag that keeps interactive pieces stable under sustained
/// repulsion without visibly slowing the motion.
pub const DEFAULT_DAMPING: f64 = 0.98;

/// Position-based Verlet integrator with configurable damping
///
/// # Example
///
/// ```
/// use verlet_physics::{Integrator, Verlet};
///
/// let integrator = Verlet::new();
/// assert_eq!(integrator.name(), "verlet");
///
/// let undamped = Verlet::with_damping(1.0);
/// assert_eq!(undamped.damping(), 1.0);
/// ```
pub struct Verlet {
    damping: f64,
}

impl Verlet {
    /// Create a Verlet integrator with the default damping
    pub fn new() -> Self {
        Verlet {
            damping: DEFAULT_DAMPING,
        }
    }

    /// Create a Verlet integrator with the given damping coefficient
    ///
    /// # Panics
    ///
    /// Panics if `damping` is not in `(0, 1]`.
    pub fn with_damping(damping: f64) -> Self {
        assert!(
            damping > 0.0 && damping <= 1.0,
            "Damping must be in (0, 1]"
        );
        Verlet { damping }
    }

    /// Current damping coefficient
    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Set the damping coefficient
    ///
    /// # Panics
    ///
    /// Panics if `damping` is not in `(0, 1]`.
    pub fn set_damping(&mut self, damping: f64) {
        assert!(
            damping > 0.0 && damping <= 1.0,
            "Damping must be in (0, 1]"
        );
        self.damping = damping;
    }
}

impl Default for Verlet {
    fn default() -> Self {
        Verlet::new()
    }
}

impl Integrator for Verlet {
    fn name(&self) -> &str {
        "verlet"
    }

    fn advance(&self, particle: &mut Particle, dt: f64) {
        if particle.is_immovable() {
            return;
        }

        let acceleration = particle.force() * particle.inverse_mass();
        let carried = (particle.position() - particle.previous_position()) * self.damping;
        let correction = particle.correction();
        let next = particle.position() + carried + acceleration * (dt * dt) + correction;

        if !next.is_finite() {
            log::warn!(
                "integration produced a non-finite position; keeping previous state"
            );
            return;
        }

        let previous = particle.position() + correction;
        particle.set_state(next, previous);
    }
}
