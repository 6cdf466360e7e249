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
//! Particle state container
//!
//! A [`Particle`] is one simulated point mass. Velocity is implied rather
//! than stored: the integrator advances state from the current and previous
//! position, so `velocity() == position() - previous_position()` is the
//! displacement of the last step.
//!
//! Mass and `inverse_mass` are kept consistent at all times: every mass
//! change recomputes the cached inverse, and a fixed (or near-zero-mass)
//! particle has `inverse_mass == 0` and never moves. This lets immovable
//! bodies participate in force and collision math without division by
//! infinity.

use glam::DVec3;

use crate::behaviour::BehaviourHandle;

/// Mass threshold below which a particle is treated as immovable
pub const IMMOVABLE_THRESHOLD: f64 = 1e-10;

/// A single simulated point mass
///
/// Created when the simulation populates its pool, mutated every step by
/// behaviours and the integrator, and read once per frame by the host to
/// build a render transform. Orientation is deliberately not stored here;
/// cosmetic rotation is presentation state the host derives from position
/// and velocity.
///
/// # Example
///
/// ```
/// use glam::DVec3;
/// use verlet_physics::Particle;
///
/// let mut particle = Particle::new(2.0);
/// assert_eq!(particle.inverse_mass(), 0.5);
///
/// particle.move_to(DVec3::new(1.0, 0.0, 0.0));
/// assert_eq!(particle.velocity(), DVec3::ZERO); // teleport, no implied motion
/// ```
#[derive(Debug, Clone)]
pub struct Particle {
    position: DVec3,
    previous_position: DVec3,
    mass: f64,
    inverse_mass: f64,
    radius: f64,
    fixed: bool,
    force: DVec3,
    correction: DVec3,
    /// Ordered list of behaviours this particle participates in
    ///
    /// Handles reference shared behaviour instances owned by
    /// [`Physics`](crate::Physics); a behaviour may be attached to many
    /// particles, and configuration changes are visible to all of them on
    /// the next step.
    pub behaviours: Vec<BehaviourHandle>,
}

impl Particle {
    /// Create a particle with the given mass, at rest at the origin
    ///
    /// The collision radius defaults to the mass; hosts typically rescale it
    /// via [`set_radius`](Self::set_radius) to match their mesh.
    ///
    /// # Panics
    ///
    /// Panics if the mass is negative, NaN, or infinite. A zero (or
    /// near-zero) mass is accepted and treated as immovable.
    pub fn new(mass: f64) -> Self {
        assert!(
            mass >= 0.0 && mass.is_finite(),
            "Mass must be non-negative and finite"
        );
        let mut particle = Particle {
            position: DVec3::ZERO,
            previous_position: DVec3::ZERO,
            mass,
            inverse_mass: 0.0,
            radius: mass,
            fixed: false,
            force: DVec3::ZERO,
            correction: DVec3::ZERO,
            behaviours: Vec::new(),
        };
        particle.recompute_inverse_mass();
        particle
    }

    /// Try to create a particle with the given mass
    ///
    /// Returns `None` if the mass is negative, NaN, or infinite.
    pub fn try_new(mass: f64) -> Option<Self> {
        if mass >= 0.0 && mass.is_finite() {
            Some(Particle::new(mass))
        } else {
            None
        }
    }

    /// Current position (the authoritative location)
    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Position at the end of the previous step
    pub fn previous_position(&self) -> DVec3 {
        self.previous_position
    }

    /// Set the current position, leaving the previous position in place
    ///
    /// The integrator will read the difference as implied motion. Use
    /// [`move_to`](Self::move_to) for a teleport that carries no momentum.
    pub fn set_position(&mut self, position: DVec3) {
        self.position = position;
    }

    /// Teleport the particle, resetting its velocity history
    ///
    /// Both current and previous position are set, so the integrator does
    /// not interpret the jump as implied motion.
    pub fn move_to(&mut self, point: DVec3) {
        self.position = point;
        self.previous_position = point;
    }

    /// Implied velocity: displacement of the last step
    pub fn velocity(&self) -> DVec3 {
        self.position - self.previous_position
    }

    /// Replace both positions at once
    ///
    /// Intended for [`Integrator`](crate::Integrator) implementations, which
    /// advance `position` and record the pre-update position (plus any
    /// velocity-free correction) as `previous_position`.
    pub fn set_state(&mut self, position: DVec3, previous_position: DVec3) {
        self.position = position;
        self.previous_position = previous_position;
    }

    /// Mass in simulation units
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Set the mass, recomputing the cached inverse
    ///
    /// # Panics
    ///
    /// Panics if the mass is negative, NaN, or infinite.
    pub fn set_mass(&mut self, mass: f64) {
        assert!(
            mass >= 0.0 && mass.is_finite(),
            "Mass must be non-negative and finite"
        );
        self.mass = mass;
        self.recompute_inverse_mass();
    }

    /// Cached `1 / mass`, or `0` for fixed and near-zero-mass particles
    pub fn inverse_mass(&self) -> f64 {
        self.inverse_mass
    }

    /// Whether this particle can never move (fixed, or effectively massless)
    pub fn is_immovable(&self) -> bool {
        self.inverse_mass == 0.0
    }

    /// Whether the particle is explicitly pinned in place
    pub fn fixed(&self) -> bool {
        self.fixed
    }

    /// Pin or release the particle
    ///
    /// Pinning zeroes `inverse_mass` without touching the mass, so releasing
    /// restores the previous dynamics.
    pub fn set_fixed(&mut self, fixed: bool) {
        self.fixed = fixed;
        self.recompute_inverse_mass();
    }

    /// Collision radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Set the collision radius
    ///
    /// # Panics
    ///
    /// Panics if the radius is negative, NaN, or infinite.
    pub fn set_radius(&mut self, radius: f64) {
        assert!(
            radius >= 0.0 && radius.is_finite(),
            "Radius must be non-negative and finite"
        );
        self.radius = radius;
    }

    /// Force accumulated so far this step
    pub fn force(&self) -> DVec3 {
        self.force
    }

    /// Positional correction accumulated so far this step
    pub fn correction(&self) -> DVec3 {
        self.correction
    }

    /// Add to the accumulated force for this step
    pub fn apply_force(&mut self, force: DVec3) {
        self.force += force;
    }

    /// Add to the accumulated positional correction for this step
    pub fn apply_correction(&mut self, correction: DVec3) {
        self.correction += correction;
    }

    /// Zero both accumulators (done at the start of every step)
    pub fn clear_accumulators(&mut self) {
        self.force = DVec3::ZERO;
        self.correction = DVec3::ZERO;
    }

    /// Check that all numeric state is finite
    pub fn is_valid(&self) -> bool {
        self.position.is_finite()
            && self.previous_position.is_finite()
            && self.mass.is_finite()
            && self.radius.is_finite()
    }

    fn recompute_inverse_mass(&mut self) {
        self.inverse_mass = if self.fixed || self.mass < IMMOVABLE_THRESHOLD {
            0.0
        } else {
            1.0 / self.mass
        };
    }
}

impl Default for Particle {
    fn default() -> Self {
        Particle::new(1.0)
    }
}
