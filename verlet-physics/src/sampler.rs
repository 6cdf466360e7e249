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
//! Poisson-disk point sampling for initial particle placement
//!
//! # Algorithm
//!
//! Bridson's grid-accelerated rejection sampling: a background grid with
//! cell size `min_distance / √3` holds at most one sample per cell, so each
//! candidate only checks a 5³ cell neighborhood instead of every accepted
//! point. New candidates are drawn from the spherical annulus
//! `[min_distance, 2·min_distance)` around a random active sample; a sample
//! that fails [`ATTEMPTS_PER_SAMPLE`] candidates in a row retires from the
//! active list. Sampling stops when the active list empties or the point
//! cap is reached — an over-constrained request returns fewer points, it
//! never loops.
//!
//! # References
//!
//! - Bridson, R. (2007). Fast Poisson Disk Sampling in Arbitrary
//!   Dimensions. ACM SIGGRAPH 2007 Sketches.

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::behaviour::DISTANCE_EPSILON;

/// Candidates tried around an active sample before it retires
///
/// Bridson's recommended constant; higher values pack marginally denser at
/// proportionally higher cost.
pub const ATTEMPTS_PER_SAMPLE: usize = 30;

/// Grid-accelerated Poisson-disk sampler over a centered box
///
/// Every returned pair of points is separated by at least the configured
/// minimum distance. The box is centered on the origin, matching the
/// simulation's world space.
///
/// # Example
///
/// ```
/// use verlet_physics::PoissonSampler;
///
/// let mut sampler = PoissonSampler::with_seed(30.0, 30.0, 30.0, 2.5, 7);
/// let points = sampler.calculate(500);
///
/// // the cap is an upper bound, not a promise
/// assert!(points.len() <= 500);
/// for point in &points {
///     assert!(point.x.abs() <= 15.0);
/// }
/// ```
pub struct PoissonSampler {
    width: f64,
    height: f64,
    depth: f64,
    min_distance: f64,
    rng: StdRng,
}

impl PoissonSampler {
    /// Create a sampler over a `width × height × depth` box centered on the
    /// origin, with an OS-entropy seed
    ///
    /// # Panics
    ///
    /// Panics if any dimension or `min_distance` is non-positive or
    /// non-finite.
    pub fn new(width: f64, height: f64, depth: f64, min_distance: f64) -> Self {
        Self::with_rng(width, height, depth, min_distance, StdRng::from_entropy())
    }

    /// Create a sampler with an explicit seed for reproducible layouts
    ///
    /// # Panics
    ///
    /// Panics if any dimension or `min_distance` is non-positive or
    /// non-finite.
    pub fn with_seed(width: f64, height: f64, depth: f64, min_distance: f64, seed: u64) -> Self {
        Self::with_rng(width, height, depth, min_distance, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: f64, height: f64, depth: f64, min_distance: f64, rng: StdRng) -> Self {
        assert!(
            width > 0.0 && width.is_finite(),
            "Sampler width must be positive and finite"
        );
        assert!(
            height > 0.0 && height.is_finite(),
            "Sampler height must be positive and finite"
        );
        assert!(
            depth > 0.0 && depth.is_finite(),
            "Sampler depth must be positive and finite"
        );
        assert!(
            min_distance > 0.0 && min_distance.is_finite(),
            "Sampler minimum distance must be positive and finite"
        );
        PoissonSampler {
            width,
            height,
            depth,
            min_distance,
            rng,
        }
    }

    /// Minimum separation between any two returned points
    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    /// Generate up to `max_points` Poisson-disk samples
    ///
    /// Returns fewer points when the box saturates before the cap is
    /// reached; callers size their particle counts from the returned
    /// vector, not the requested cap.
    pub fn calculate(&mut self, max_points: usize) -> Vec<DVec3> {
        if max_points == 0 {
            return Vec::new();
        }

        // one sample per cell at this size, so neighbor checks stay local
        let cell_size = self.min_distance / 3f64.sqrt();
        let cells_x = (self.width / cell_size).ceil() as usize;
        let cells_y = (self.height / cell_size).ceil() as usize;
        let cells_z = (self.depth / cell_size).ceil() as usize;
        let mut grid: Vec<Option<usize>> = vec![None; cells_x * cells_y * cells_z];

        let half = DVec3::new(self.width, self.height, self.depth) * 0.5;
        let cell_of = |point: DVec3| -> (usize, usize, usize) {
            let shifted = point + half;
            let x = ((shifted.x / cell_size) as usize).min(cells_x - 1);
            let y = ((shifted.y / cell_size) as usize).min(cells_y - 1);
            let z = ((shifted.z / cell_size) as usize).min(cells_z - 1);
            (x, y, z)
        };
        let flat = |x: usize, y: usize, z: usize| (z * cells_y + y) * cells_x + x;

        let mut points: Vec<DVec3> = Vec::new();
        let mut active: Vec<usize> = Vec::new();

        let first = DVec3::new(
            self.rng.gen_range(-half.x..=half.x),
            self.rng.gen_range(-half.y..=half.y),
            self.rng.gen_range(-half.z..=half.z),
        );
        let (x, y, z) = cell_of(first);
        grid[flat(x, y, z)] = Some(0);
        points.push(first);
        active.push(0);

        while !active.is_empty() && points.len() < max_points {
            let slot = self.rng.gen_range(0..active.len());
            let origin = points[active[slot]];

            let mut placed = false;
            for _ in 0..ATTEMPTS_PER_SAMPLE {
                let candidate = origin + self.annulus_offset();
                if candidate.x.abs() > half.x
                    || candidate.y.abs() > half.y
                    || candidate.z.abs() > half.z
                {
                    continue;
                }

                let (cx, cy, cz) = cell_of(candidate);
                if !self.fits(candidate, cx, cy, cz, &grid, &points, cells_x, cells_y, cells_z) {
                    continue;
                }

                let index = points.len();
                grid[flat(cx, cy, cz)] = Some(index);
                points.push(candidate);
                active.push(index);
                placed = true;
                break;
            }

            if !placed {
                active.swap_remove(slot);
            }
        }

        points
    }

    /// Uniform-in-volume sample from the annulus `[min_distance, 2·min_distance)`
    fn annulus_offset(&mut self) -> DVec3 {
        // direction by rejection sampling the unit ball
        let direction = loop {
            let v = DVec3::new(
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            );
            let length_squared = v.length_squared();
            if length_squared > DISTANCE_EPSILON && length_squared <= 1.0 {
                break v / length_squared.sqrt();
            }
        };
        // cube-root warp for uniform radial density in volume
        let unit: f64 = self.rng.gen_range(0.0..1.0);
        let radius = self.min_distance * (1.0 + 7.0 * unit).cbrt();
        direction * radius
    }

    #[allow(clippy::too_many_arguments)]
    fn fits(
        &self,
        candidate: DVec3,
        cx: usize,
        cy: usize,
        cz: usize,
        grid: &[Option<usize>],
        points: &[DVec3],
        cells_x: usize,
        cells_y: usize,
        cells_z: usize,
    ) -> bool {
        let x_range = cx.saturating_sub(2)..=(cx + 2).min(cells_x - 1);
        for x in x_range {
            for y in cy.saturating_sub(2)..=(cy + 2).min(cells_y - 1) {
                for z in cz.saturating_sub(2)..=(cz + 2).min(cells_z - 1) {
                    let cell = (z * cells_y + y) * cells_x + x;
                    if let Some(index) = grid[cell] {
                        if points[index].distance_squared(candidate)
                            < self.min_distance * self.min_distance
                        {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}

/// Tuning for [`relax_on_shell`]
#[derive(Debug, Clone)]
pub struct RelaxConfig {
    /// Relaxation passes to run
    pub iterations: usize,
    /// Magnitude of the per-pass displacement
    pub strength: f64,
    /// Blend factor toward the displaced position per pass, in `(0, 1]`
    pub blend: f64,
}

impl Default for RelaxConfig {
    fn default() -> Self {
        RelaxConfig {
            iterations: 50,
            strength: 0.01,
            blend: 0.5,
        }
    }
}

/// Spread points apart on their spherical shells by iterated pairwise
/// repulsion
///
/// The setup-time cousin of the collision behaviour: each pass, every point
/// accumulates an inverse-square push away from each neighbor closer than
/// the sum of their radii, steps along the normalized push, is projected
/// back to its original distance from the origin, and blends toward the
/// result. Distances from the origin are exactly preserved; only angular
/// positions change. Intended for one-time layout before the live loop, not
/// per-frame use.
///
/// # Panics
///
/// Panics if `points` and `radii` differ in length, or if `config.blend` is
/// not in `(0, 1]`.
pub fn relax_on_shell(points: &mut [DVec3], radii: &[f64], config: &RelaxConfig) {
    assert_eq!(
        points.len(),
        radii.len(),
        "One radius per point is required"
    );
    assert!(
        config.blend > 0.0 && config.blend <= 1.0,
        "Relaxation blend must be in (0, 1]"
    );

    let mut pushes = vec![DVec3::ZERO; points.len()];
    for _ in 0..config.iterations {
        for push in &mut pushes {
            *push = DVec3::ZERO;
        }

        for i in 0..points.len() {
            for j in 0..points.len() {
                if i == j {
                    continue;
                }
                let delta = points[i] - points[j];
                let distance = delta.length().max(DISTANCE_EPSILON);
                if distance < radii[i] + radii[j] {
                    pushes[i] += delta / (distance * distance);
                }
            }
        }

        for (index, point) in points.iter_mut().enumerate() {
            let push = pushes[index];
            if push == DVec3::ZERO {
                continue;
            }
            let length = point.length();
            if length < DISTANCE_EPSILON {
                continue;
            }
            let stepped = *point + push.normalize() * config.strength;
            let stepped_length = stepped.length().max(DISTANCE_EPSILON);
            // back onto the original shell
            let projected = stepped * (length / stepped_length);
            *point = point.lerp(projected, config.blend);
            // lerp along a chord shrinks the radius slightly; restore it
            let final_length = point.length().max(DISTANCE_EPSILON);
            *point *= length / final_length;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_pairs_respect_min_distance() {
        let mut sampler = PoissonSampler::with_seed(30.0, 30.0, 30.0, 2.5, 42);
        let points = sampler.calculate(400);

        assert!(points.len() > 10);
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                assert!(
                    points[i].distance(points[j]) >= 2.5,
                    "pair ({i}, {j}) too close"
                );
            }
        }
    }

    #[test]
    fn test_points_inside_box() {
        let mut sampler = PoissonSampler::with_seed(10.0, 20.0, 6.0, 1.0, 1);
        for point in sampler.calculate(200) {
            assert!(point.x.abs() <= 5.0);
            assert!(point.y.abs() <= 10.0);
            assert!(point.z.abs() <= 3.0);
        }
    }

    #[test]
    fn test_over_constrained_returns_fewer_points() {
        // a 4×4×4 box cannot hold 1000 points 2.5 apart
        let mut sampler = PoissonSampler::with_seed(4.0, 4.0, 4.0, 2.5, 3);
        let points = sampler.calculate(1000);

        assert!(!points.is_empty());
        assert!(points.len() < 1000);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = PoissonSampler::with_seed(15.0, 15.0, 15.0, 2.0, 9).calculate(100);
        let b = PoissonSampler::with_seed(15.0, 15.0, 15.0, 2.0, 9).calculate(100);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_cap_is_empty() {
        let mut sampler = PoissonSampler::with_seed(10.0, 10.0, 10.0, 1.0, 0);
        assert!(sampler.calculate(0).is_empty());
    }

    #[test]
    #[should_panic(expected = "Sampler minimum distance must be positive and finite")]
    fn test_invalid_min_distance_panics() {
        PoissonSampler::new(10.0, 10.0, 10.0, 0.0);
    }

    #[test]
    fn test_relaxation_preserves_shell_radii() {
        let mut points = vec![
            DVec3::new(5.0, 0.0, 0.0),
            DVec3::new(4.9, 0.7, 0.0),
            DVec3::new(0.0, 5.0, 0.3).normalize() * 5.0,
        ];
        let radii = vec![1.0; 3];

        relax_on_shell(&mut points, &radii, &RelaxConfig::default());

        for point in &points {
            assert!((point.length() - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_relaxation_spreads_crowded_points() {
        let mut points = vec![
            DVec3::new(5.0, 0.0, 0.0),
            DVec3::new(4.99, 0.3, 0.0).normalize() * 5.0,
        ];
        let radii = vec![1.0; 2];
        let before = points[0].distance(points[1]);

        relax_on_shell(
            &mut points,
            &radii,
            &RelaxConfig {
                iterations: 200,
                ..RelaxConfig::default()
            },
        );

        assert!(points[0].distance(points[1]) > before);
    }

    #[test]
    fn test_relaxation_leaves_separated_points_alone() {
        let mut points = vec![DVec3::new(5.0, 0.0, 0.0), DVec3::new(-5.0, 0.0, 0.0)];
        let original = points.clone();
        let radii = vec![1.0; 2];

        relax_on_shell(&mut points, &radii, &RelaxConfig::default());

        assert_eq!(points, original);
    }

    #[test]
    #[should_panic(expected = "One radius per point is required")]
    fn test_mismatched_radii_panics() {
        let mut points = vec![DVec3::X];
        relax_on_shell(&mut points, &[], &RelaxConfig::default());
    }
}
