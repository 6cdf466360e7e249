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
//! Sphere-shell layout demo
//!
//! Seeds a blue-noise point cloud with the Poisson-disk sampler, projects it
//! onto a spherical shell, spreads the crowding that projection introduces
//! with the setup-time relaxation pass, then hands the layout to a live
//! simulation constrained to the same shell. Prints pairwise-distance
//! statistics at each stage so the effect of every pass is visible.
//!
//! Run with:
//!
//! ```text
//! cargo run --example shell
//! ```

use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use verlet_physics::{
    relax_on_shell, Collision, Particle, Physics, PoissonSampler, RelaxConfig, ShellProjection,
    Verlet,
};

const SHELL_RADIUS: f64 = 12.0;

struct SpacingStats {
    minimum: f64,
    mean: f64,
}

fn spacing_stats(points: &[DVec3]) -> SpacingStats {
    let mut minimum = f64::INFINITY;
    let mut nearest_sum = 0.0;
    for i in 0..points.len() {
        let mut nearest = f64::INFINITY;
        for j in 0..points.len() {
            if i != j {
                nearest = nearest.min(points[i].distance(points[j]));
            }
        }
        minimum = minimum.min(nearest);
        nearest_sum += nearest;
    }
    SpacingStats {
        minimum,
        mean: nearest_sum / points.len() as f64,
    }
}

fn report(stage: &str, points: &[DVec3]) {
    let stats = spacing_stats(points);
    println!(
        "{stage:<22} {} points, nearest-neighbor min {:.3}, mean {:.3}",
        points.len(),
        stats.minimum,
        stats.mean
    );
}

fn main() {
    env_logger::init();

    // blue-noise seed in a box around the shell
    let side = SHELL_RADIUS * 2.0;
    let mut sampler = PoissonSampler::with_seed(side, side, side, 2.5, 42);
    let mut points = sampler.calculate(400);
    report("poisson box", &points);

    // projection onto the shell squeezes the spacing back together
    for point in &mut points {
        let length = point.length().max(1e-9);
        *point *= SHELL_RADIUS / length;
    }
    report("projected to shell", &points);

    let mut rng = StdRng::seed_from_u64(9);
    let radii: Vec<f64> = points
        .iter()
        .map(|_| rng.gen_range(0.8..1.4))
        .collect();

    relax_on_shell(
        &mut points,
        &radii,
        &RelaxConfig {
            iterations: 300,
            ..RelaxConfig::default()
        },
    );
    report("relaxed on shell", &points);

    // live simulation pinned to the same shell
    let mut physics = Physics::new(Verlet::new());
    let contact = physics.add_behaviour(Collision::new());
    physics.set_shell_constraint(Some(ShellProjection::new(SHELL_RADIUS)));

    for (point, radius) in points.iter().zip(&radii) {
        let mut particle = Particle::new(1.0);
        particle.move_to(*point);
        particle.set_radius(*radius);
        particle.behaviours.push(contact);
        physics.add_particle(particle);
    }

    for _ in 0..600 {
        physics.step(16.0);
    }

    let settled: Vec<DVec3> = physics.particles().iter().map(|p| p.position()).collect();
    report("settled simulation", &settled);

    let off_shell = settled
        .iter()
        .map(|p| (p.length() - SHELL_RADIUS).abs())
        .fold(0.0f64, f64::max);
    println!("max shell deviation  {off_shell:.2e}");
}
