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
//! Attraction/repulsion behaviour
//!
//! Pulls a particle toward (or pushes it away from) a target point whenever
//! the particle is inside the configured radius. The sign of `strength`
//! selects the direction — attraction and repulsion are one mechanism, so a
//! piece can stack a wide gentle pull with a tight strong push around the
//! same moving point (the classic pointer-following setup).

use glam::DVec3;

use crate::behaviour::DISTANCE_EPSILON;
use crate::particle::Particle;

/// Pulls or pushes particles relative to a target point
///
/// The target is typically re-set every frame by the host (for example from
/// a pointer raycast); because behaviours are shared by handle, one update
/// moves the target for every attached particle.
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use verlet_physics::{Attraction, Particle};
///
/// let pull = Attraction::new(DVec3::ZERO, 20.0, 0.02);
/// let push = Attraction::new(DVec3::ZERO, 1.1, -0.4);
/// assert!(!pull.is_repulsion());
/// assert!(push.is_repulsion());
/// ```
#[derive(Debug, Clone)]
pub struct Attraction {
    target: DVec3,
    radius: f64,
    strength: f64,
}

impl Attraction {
    /// Create an attraction around `target`
    ///
    /// `radius` is the falloff distance beyond which the behaviour is
    /// inert; `strength` is the force magnitude, negative for repulsion.
    ///
    /// # Panics
    ///
    /// Panics if `radius` is non-positive or non-finite, or if `strength`
    /// is non-finite.
    pub fn new(target: DVec3, radius: f64, strength: f64) -> Self {
        assert!(
            radius > 0.0 && radius.is_finite(),
            "Attraction radius must be positive and finite"
        );
        assert!(strength.is_finite(), "Attraction strength must be finite");
        Attraction {
            target,
            radius,
            strength,
        }
    }

    /// Current target point
    pub fn target(&self) -> DVec3 {
        self.target
    }

    /// Move the target point (visible to all attached particles next step)
    pub fn set_target(&mut self, target: DVec3) {
        self.target = target;
    }

    /// Falloff radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Set the falloff radius
    ///
    /// # Panics
    ///
    /// Panics if `radius` is non-positive or non-finite.
    pub fn set_radius(&mut self, radius: f64) {
        assert!(
            radius > 0.0 && radius.is_finite(),
            "Attraction radius must be positive and finite"
        );
        self.radius = radius;
    }

    /// Force magnitude (negative repels)
    pub fn strength(&self) -> f64 {
        self.strength
    }

    /// Set the force magnitude (negative repels)
    ///
    /// # Panics
    ///
    /// Panics if `strength` is non-finite.
    pub fn set_strength(&mut self, strength: f64) {
        assert!(strength.is_finite(), "Attraction strength must be finite");
        self.strength = strength;
    }

    /// Whether this instance pushes instead of pulls
    pub fn is_repulsion(&self) -> bool {
        self.strength < 0.0
    }

    /// Accumulate this behaviour's force on a particle
    ///
    /// Inside the radius the force is `delta * strength / distance` — a
    /// constant-magnitude pull along the (epsilon-floored) direction to the
    /// target. Outside the radius nothing happens.
    pub fn apply(&self, particle: &mut Particle) {
        let delta = self.target - particle.position();
        let distance = delta.length().max(DISTANCE_EPSILON);
        if distance < self.radius {
            particle.apply_force(delta * (self.strength / distance));
        }
    }
}
