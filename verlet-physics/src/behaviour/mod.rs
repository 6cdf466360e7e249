//! Pluggable behaviours
//!
//! A behaviour is a rule contributing a force or positional correction to
//! particles each step. Behaviours are stored once in an arena owned by
//! [`Physics`](crate::Physics) and referenced by [`BehaviourHandle`] from
//! every participating particle, so reconfiguring a shared instance (for
//! example moving an attraction target to follow the pointer) affects all
//! referents on the next step.
//!
//! The set of behaviours is a closed tagged enum dispatched in one place
//! rather than open-ended trait objects: the simulation only ever needs
//! these variants, and the enum keeps the per-step dispatch free of dynamic
//! lookup.

mod attraction;
mod collision;

pub use attraction::Attraction;
pub use collision::Collision;

/// Minimum distance used before any normalize or divide
///
/// Degenerate zero-distance interactions (two particles at the same point)
/// are the one numeric failure mode of the system; flooring every distance
/// at this epsilon prevents NaN propagation structurally instead of catching
/// it after the fact.
pub const DISTANCE_EPSILON: f64 = 1e-9;

/// Handle into the behaviour arena owned by [`Physics`](crate::Physics)
///
/// Handles are append-only indices: behaviours are never removed, so a
/// handle stays valid for the lifetime of the `Physics` that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BehaviourHandle(pub(crate) usize);

impl BehaviourHandle {
    /// Index of the behaviour in the arena
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A shared, reconfigurable simulation rule
pub enum Behaviour {
    /// Pull toward (or, with negative strength, push away from) a target point
    Attraction(Attraction),
    /// Pairwise overlap resolution between participating particles
    Collision(Collision),
}

impl Behaviour {
    /// Descriptive name of the variant
    pub fn name(&self) -> &str {
        match self {
            Behaviour::Attraction(a) if a.is_repulsion() => "repulsion",
            Behaviour::Attraction(_) => "attraction",
            Behaviour::Collision(_) => "collision",
        }
    }

    /// Borrow as an attraction, if that is what this behaviour is
    pub fn as_attraction(&self) -> Option<&Attraction> {
        match self {
            Behaviour::Attraction(a) => Some(a),
            _ => None,
        }
    }

    /// Mutably borrow as an attraction, if that is what this behaviour is
    ///
    /// This is the hook hosts use to move a target point between frames.
    pub fn as_attraction_mut(&mut self) -> Option<&mut Attraction> {
        match self {
            Behaviour::Attraction(a) => Some(a),
            _ => None,
        }
    }

    /// Borrow as a collision, if that is what this behaviour is
    pub fn as_collision(&self) -> Option<&Collision> {
        match self {
            Behaviour::Collision(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Attraction> for Behaviour {
    fn from(attraction: Attraction) -> Self {
        Behaviour::Attraction(attraction)
    }
}

impl From<Collision> for Behaviour {
    fn from(collision: Collision) -> Self {
        Behaviour::Collision(collision)
    }
}
