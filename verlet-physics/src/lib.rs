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
//! # Verlet Particle Physics
//!
//! A particle physics core for driving instanced 3D meshes in real-time art
//! pieces: a fixed set of point masses advanced by position-based Verlet
//! integration under pluggable behaviours (attraction/repulsion, pairwise
//! collision), with Poisson-disk sampling for blue-noise initial placement.
//!
//! Rendering, asset loading, and camera control are the host's job. The
//! contract is narrow: the host calls [`Physics::step`] once per frame with
//! the elapsed milliseconds, then reads each particle's position and implied
//! velocity to build render transforms.
//!
//! ## Features
//!
//! - **Position-based Verlet**: momentum carried through current/previous
//!   position, with a damping coefficient for numerical drag
//! - **Behaviour arena**: attraction and collision behaviours shared by
//!   handle across many particles, reconfigurable between steps
//! - **Collision resolution**: O(n²) pairwise overlap correction split by
//!   inverse-mass share, accumulate-then-apply for order independence
//! - **Poisson-disk seeding**: grid-accelerated sampling plus a setup-time
//!   shell relaxation pass
//! - **Parallelization**: optional Rayon execution of the pairwise pass
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use verlet_physics::{Attraction, Collision, Particle, Physics, Verlet};
//!
//! let mut physics = Physics::new(Verlet::new());
//! let attraction = physics.add_behaviour(Attraction::new(DVec3::ZERO, 20.0, 0.02));
//! let collision = physics.add_behaviour(Collision::new());
//!
//! let mut particle = Particle::new(1.0);
//! particle.move_to(DVec3::new(3.0, 0.0, 0.0));
//! particle.behaviours.push(attraction);
//! particle.behaviours.push(collision);
//! physics.add_particle(particle);
//!
//! physics.step(16.0);
//! assert!(physics.particles()[0].position().length() < 3.0);
//! ```

#![warn(missing_docs)]

/// Pluggable per-step behaviours (attraction, collision)
pub mod behaviour;

/// Numerical integration of particle kinematics
pub mod integration;

/// Point-mass state container
pub mod particle;

/// Simulation orchestrator owning particles and behaviours
pub mod physics;

/// Poisson-disk sampling for initial placement
pub mod sampler;

pub use behaviour::{Attraction, Behaviour, BehaviourHandle, Collision};
pub use integration::{Integrator, Verlet};
pub use particle::Particle;
pub use physics::{Physics, ShellProjection, MAX_TIMESTEP_MS};
pub use sampler::{relax_on_shell, PoissonSampler, RelaxConfig};
