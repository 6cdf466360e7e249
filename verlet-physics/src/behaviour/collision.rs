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
//! Inter-particle collision behaviour
//!
//! For every unordered pair of participating particles whose centers are
//! closer than the sum of their radii, a symmetric positional correction
//! pushes them apart along the separating axis, split by relative inverse
//! mass: the lighter particle yields more, and a fixed particle
//! (`inverse_mass == 0`) yields nothing and acts as an immovable obstacle.
//!
//! # Cost
//!
//! The pass is O(n²) in participant count and dominates the simulation —
//! this is a deliberate simplicity/scale tradeoff, not an oversight. No
//! spatial acceleration structure is used; the target particle counts
//! (one to a few thousand) fit a real-time frame budget without one, and
//! the optional `parallel` feature spreads the pass across cores.
//!
//! # Determinism
//!
//! Corrections are accumulated for every particle first and applied
//! afterwards (by the orchestrator), so the result is independent of pair
//! iteration order. Each particle accumulates its own share by scanning all
//! other participants; the parallel and sequential paths perform the same
//! per-particle scans in the same order and therefore produce identical
//! results.

use glam::DVec3;

use crate::behaviour::DISTANCE_EPSILON;
use crate::particle::Particle;

#[cfg(feature = "parallel")]
const PARALLEL_CUTOVER: usize = 128;

/// Pairwise overlap resolution between participating particles
///
/// # Example
///
/// ```
/// use verlet_physics::Collision;
///
/// let full = Collision::new();
/// assert_eq!(full.stiffness(), 1.0);
///
/// let soft = Collision::with_stiffness(0.5); // half the overlap per step
/// assert_eq!(soft.stiffness(), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Collision {
    stiffness: f64,
}

impl Collision {
    /// Create a collision behaviour that removes the full overlap each step
    pub fn new() -> Self {
        Collision { stiffness: 1.0 }
    }

    /// Create a collision behaviour correcting only a fraction of the
    /// overlap per step
    ///
    /// Values below 1 trade convergence speed for smoother motion in dense
    /// clusters.
    ///
    /// # Panics
    ///
    /// Panics if `stiffness` is not in `(0, 1]`.
    pub fn with_stiffness(stiffness: f64) -> Self {
        assert!(
            stiffness > 0.0 && stiffness <= 1.0,
            "Collision stiffness must be in (0, 1]"
        );
        Collision { stiffness }
    }

    /// Fraction of the overlap corrected per step
    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    /// Accumulate separation corrections for every eligible particle
    ///
    /// `eligible` holds arena indices of the participating particles;
    /// `corrections` is an arena-sized buffer the computed displacements are
    /// added into (the caller zeroes it once per step and applies it after
    /// all collision behaviours have run).
    pub fn accumulate(
        &self,
        particles: &[Particle],
        eligible: &[usize],
        corrections: &mut [DVec3],
    ) {
        debug_assert_eq!(particles.len(), corrections.len());

        #[cfg(feature = "parallel")]
        if eligible.len() >= PARALLEL_CUTOVER {
            use rayon::prelude::*;

            let computed: Vec<DVec3> = eligible
                .par_iter()
                .map(|&index| self.correction_for(index, particles, eligible))
                .collect();
            for (&index, correction) in eligible.iter().zip(computed) {
                corrections[index] += correction;
            }
            return;
        }

        for &index in eligible {
            corrections[index] += self.correction_for(index, particles, eligible);
        }
    }

    /// Separation correction for one particle against all other participants
    fn correction_for(&self, index: usize, particles: &[Particle], eligible: &[usize]) -> DVec3 {
        let particle = &particles[index];
        if particle.is_immovable() {
            return DVec3::ZERO;
        }

        let mut correction = DVec3::ZERO;
        for &other_index in eligible {
            if other_index == index {
                continue;
            }
            let other = &particles[other_index];

            let delta = particle.position() - other.position();
            let distance = delta.length().max(DISTANCE_EPSILON);
            let overlap = particle.radius() + other.radius() - distance;
            if overlap <= 0.0 {
                continue;
            }

            let inverse_sum = particle.inverse_mass() + other.inverse_mass();
            if inverse_sum == 0.0 {
                continue;
            }
            let share = particle.inverse_mass() / inverse_sum;
            correction += delta / distance * (overlap * share * self.stiffness);
        }
        correction
    }
}

impl Default for Collision {
    fn default() -> Self {
        Collision::new()
    }
}
