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
//! Edge-case tests for degenerate inputs and boundary conditions

use glam::DVec3;
use verlet_physics::{
    Attraction, Collision, Particle, Physics, Verlet, MAX_TIMESTEP_MS,
};

fn single_particle_system(mass: f64, position: DVec3) -> Physics {
    let mut physics = Physics::new(Verlet::new());
    let mut particle = Particle::new(mass);
    particle.move_to(position);
    physics.add_particle(particle);
    physics
}

#[test]
fn test_zero_timestep_is_a_no_op() {
    let mut physics = single_particle_system(1.0, DVec3::new(1.0, 2.0, 3.0));
    // carried momentum must not leak through a zero step
    physics.particles_mut()[0].set_position(DVec3::new(1.5, 2.0, 3.0));

    physics.step(0.0);

    assert_eq!(physics.particles()[0].position(), DVec3::new(1.5, 2.0, 3.0));
    assert_eq!(physics.particles()[0].velocity(), DVec3::new(0.5, 0.0, 0.0));
}

#[test]
fn test_negative_timestep_is_a_no_op() {
    let mut physics = single_particle_system(1.0, DVec3::new(1.0, 0.0, 0.0));
    physics.step(-16.0);
    assert_eq!(physics.particles()[0].position(), DVec3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_nan_timestep_is_a_no_op() {
    let mut physics = single_particle_system(1.0, DVec3::new(1.0, 0.0, 0.0));
    physics.step(f64::NAN);
    assert_eq!(physics.particles()[0].position(), DVec3::new(1.0, 0.0, 0.0));
}

#[test]
fn test_huge_timestep_clamps_to_maximum() {
    let build = || {
        let mut physics = Physics::new(Verlet::with_damping(1.0));
        let pull = physics.add_behaviour(Attraction::new(DVec3::ZERO, 100.0, 0.5));
        let mut particle = Particle::new(1.0);
        particle.move_to(DVec3::new(10.0, 0.0, 0.0));
        particle.behaviours.push(pull);
        physics.add_particle(particle);
        physics
    };

    let mut clamped = build();
    let mut explicit = build();

    clamped.step(1e9);
    explicit.step(MAX_TIMESTEP_MS);

    assert_eq!(
        clamped.particles()[0].position(),
        explicit.particles()[0].position()
    );
    assert!(clamped.particles()[0].is_valid());
}

#[test]
fn test_fixed_particle_never_moves() {
    let mut physics = Physics::new(Verlet::new());
    let pull = physics.add_behaviour(Attraction::new(DVec3::ZERO, 100.0, 5.0));
    let contact = physics.add_behaviour(Collision::new());

    let mut anchor = Particle::new(1.0);
    anchor.move_to(DVec3::new(2.0, 0.0, 0.0));
    anchor.set_radius(1.0);
    anchor.set_fixed(true);
    anchor.behaviours.push(pull);
    anchor.behaviours.push(contact);
    physics.add_particle(anchor);

    // overlapping movable neighbor to generate collision pressure
    let mut neighbor = Particle::new(1.0);
    neighbor.move_to(DVec3::new(2.5, 0.0, 0.0));
    neighbor.set_radius(1.0);
    neighbor.behaviours.push(pull);
    neighbor.behaviours.push(contact);
    physics.add_particle(neighbor);

    for _ in 0..100 {
        physics.step(16.0);
    }

    assert_eq!(physics.particles()[0].position(), DVec3::new(2.0, 0.0, 0.0));
    assert!(physics.particles()[1].is_valid());
}

#[test]
fn test_fixed_obstacle_pushes_movable_full_overlap() {
    let mut physics = Physics::new(Verlet::with_damping(1.0));
    let contact = physics.add_behaviour(Collision::new());

    let mut wall = Particle::new(1.0);
    wall.set_radius(0.5);
    wall.set_fixed(true);
    wall.behaviours.push(contact);
    physics.add_particle(wall);

    let mut mover = Particle::new(1.0);
    mover.move_to(DVec3::new(0.6, 0.0, 0.0));
    mover.set_radius(0.5);
    mover.behaviours.push(contact);
    physics.add_particle(mover);

    physics.step(16.0);

    // the movable side takes the entire 0.4 overlap
    assert!((physics.particles()[1].position().x - 1.0).abs() < 1e-9);
    assert_eq!(physics.particles()[0].position(), DVec3::ZERO);
}

#[test]
fn test_coincident_particles_separate_without_nan() {
    let mut physics = Physics::new(Verlet::new());
    let contact = physics.add_behaviour(Collision::new());

    for _ in 0..2 {
        let mut particle = Particle::new(1.0);
        particle.set_radius(0.5);
        particle.behaviours.push(contact);
        physics.add_particle(particle);
    }

    for _ in 0..10 {
        physics.step(16.0);
    }

    for particle in physics.particles() {
        assert!(particle.is_valid());
    }
}

#[test]
fn test_particle_coincident_with_attraction_target() {
    let mut physics = Physics::new(Verlet::new());
    let pull = physics.add_behaviour(Attraction::new(DVec3::ZERO, 10.0, 0.5));

    let mut particle = Particle::new(1.0);
    particle.behaviours.push(pull);
    physics.add_particle(particle);

    physics.step(16.0);

    assert!(physics.particles()[0].is_valid());
    assert_eq!(physics.particles()[0].position(), DVec3::ZERO);
}

#[test]
fn test_unattached_particles_ignore_behaviours() {
    let mut physics = Physics::new(Verlet::new());
    physics.add_behaviour(Attraction::new(DVec3::ZERO, 100.0, 5.0));
    physics.add_behaviour(Collision::new());

    let mut bystander = Particle::new(1.0);
    bystander.move_to(DVec3::new(3.0, 0.0, 0.0));
    physics.add_particle(bystander);

    for _ in 0..10 {
        physics.step(16.0);
    }

    assert_eq!(physics.particles()[0].position(), DVec3::new(3.0, 0.0, 0.0));
}

#[test]
fn test_mass_changes_reweight_collision_split() {
    let run = |mass_a: f64, mass_b: f64| -> (f64, f64) {
        let mut physics = Physics::new(Verlet::with_damping(1.0));
        let contact = physics.add_behaviour(Collision::new());

        let mut a = Particle::new(mass_a);
        a.set_radius(0.5);
        a.behaviours.push(contact);
        physics.add_particle(a);

        let mut b = Particle::new(mass_b);
        b.move_to(DVec3::new(0.6, 0.0, 0.0));
        b.set_radius(0.5);
        b.behaviours.push(contact);
        physics.add_particle(b);

        physics.step(16.0);
        (
            physics.particles()[0].position().x,
            physics.particles()[1].position().x,
        )
    };

    let (equal_a, equal_b) = run(1.0, 1.0);
    assert!((equal_a + 0.2).abs() < 1e-9);
    assert!((equal_b - 0.8).abs() < 1e-9);

    // heavier particle yields less: inverse masses 1 and 1/3
    let (light, heavy) = run(1.0, 3.0);
    assert!((light + 0.3).abs() < 1e-9);
    assert!((heavy - 0.7).abs() < 1e-9);
}

#[test]
fn test_set_count_spawned_particles_collide_immediately() {
    let mut physics = Physics::new(Verlet::with_damping(1.0));
    let contact = physics.add_behaviour(Collision::new());

    physics.set_count(2, |index| {
        let mut particle = Particle::new(1.0);
        particle.move_to(DVec3::new(index as f64 * 0.6, 0.0, 0.0));
        particle.set_radius(0.5);
        particle.behaviours.push(contact);
        particle
    });

    physics.step(16.0);

    let distance = physics.particles()[0]
        .position()
        .distance(physics.particles()[1].position());
    assert!((distance - 1.0).abs() < 1e-9);
}

#[test]
fn test_non_finite_force_does_not_corrupt_state() {
    let mut physics = single_particle_system(1.0, DVec3::new(1.0, 0.0, 0.0));
    physics.particles_mut()[0].apply_force(DVec3::splat(f64::INFINITY));

    // accumulators are cleared at step start, so this step sees no force
    physics.step(16.0);

    assert!(physics.particles()[0].is_valid());
    assert_eq!(physics.particles()[0].position(), DVec3::new(1.0, 0.0, 0.0));
}
