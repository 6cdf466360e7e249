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
//! Benchmarks for the per-frame simulation step
//!
//! These benchmarks measure:
//! - Force-only stepping (attraction, no pairwise pass) across particle counts
//! - The O(n²) collision pass, which dominates and motivates the `parallel`
//!   feature
//! - The full interactive-piece configuration (attraction + repulsion +
//!   collision)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use glam::DVec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use verlet_physics::{Attraction, BehaviourHandle, Collision, Particle, Physics, Verlet};

const PARTICLE_COUNTS: [usize; 3] = [100, 500, 2000];

fn populate(physics: &mut Physics, count: usize, behaviours: &[BehaviourHandle]) {
    let mut rng = StdRng::seed_from_u64(42);
    physics.set_count(count, |_| {
        let mut particle = Particle::new(rng.gen_range(0.5..2.0));
        particle.move_to(DVec3::new(
            rng.gen_range(-15.0..15.0),
            rng.gen_range(-15.0..15.0),
            rng.gen_range(-15.0..15.0),
        ));
        particle.set_radius(0.5);
        particle.behaviours.extend_from_slice(behaviours);
        particle
    });
}

fn bench_attraction_only(c: &mut Criterion) {
    let mut group = c.benchmark_group("step/attraction_only");
    for count in PARTICLE_COUNTS {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut physics = Physics::new(Verlet::new());
            let pull = physics.add_behaviour(Attraction::new(DVec3::ZERO, 1000.0, 0.02));
            populate(&mut physics, count, &[pull]);

            b.iter(|| physics.step(black_box(16.0)));
        });
    }
    group.finish();
}

fn bench_collision_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("step/collision");
    for count in PARTICLE_COUNTS {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut physics = Physics::new(Verlet::new());
            let contact = physics.add_behaviour(Collision::new());
            populate(&mut physics, count, &[contact]);

            b.iter(|| physics.step(black_box(16.0)));
        });
    }
    group.finish();
}

fn bench_full_piece(c: &mut Criterion) {
    let mut group = c.benchmark_group("step/full_piece");
    for count in PARTICLE_COUNTS {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let mut physics = Physics::new(Verlet::new());
            let pull = physics.add_behaviour(Attraction::new(DVec3::ZERO, 1000.0, 0.02));
            let push = physics.add_behaviour(Attraction::new(DVec3::ZERO, 22.0, -0.4));
            let contact = physics.add_behaviour(Collision::new());
            populate(&mut physics, count, &[pull, push, contact]);

            b.iter(|| physics.step(black_box(16.0)));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_attraction_only,
    bench_collision_pass,
    bench_full_piece
);
criterion_main!(benches);
