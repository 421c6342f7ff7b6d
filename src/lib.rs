//! # Two-Body Keplerian Orbit Engine
//! This library crate converts between Cartesian state vectors and
//! classical orbital elements, and propagates orbits analytically
//! forward or backward in time.
//!
//! Keplerian orbits don't use time steps to calculate the next
//! position of a body: the stored elements describe the body's *full
//! trajectory* at any given time, so propagation is a closed-form
//! evaluation with no integration drift. The trade-off is the
//! unperturbed two-body assumption: one attractor, no external
//! forces. The moment a thruster fires or another body pulls, a
//! numeric integrator outside this crate has to take over.
//!
//! Everything around the math (scene rendering, camera work, input,
//! trajectory drawing) is deliberately out of scope. Collaborators
//! supply an attractor mass and a gravitational constant, and consume
//! attractor-relative vectors.
//!
//! ## Getting started
//! The central type is [`Orbit`], the owning aggregate: it holds the
//! gravitational parameter and the state vectors and keeps every
//! derived quantity (elements, orientation basis, apsis points)
//! consistent with them. The [`solve_kepler_equation`] solver and the
//! [`record`] persistence schema round out the public surface.
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use kepler_orbits::{Orbit, OrbitClass};
//!
//! let orbit = Orbit::from_state_vectors(
//!     DVec3::new(100.0, 0.0, 0.0), // position
//!     DVec3::new(0.0, 4.0, 0.0),   // velocity
//!     1000.0,                      // attractor mass
//!     1.0,                         // gravitational constant
//! )
//! .unwrap();
//!
//! assert_eq!(orbit.get_class(), OrbitClass::Elliptic);
//!
//! // One full period later the body is back where it started.
//! let period = orbit.get_period().unwrap();
//! let there_again = orbit.get_position_at_time(period).unwrap();
//! assert!((there_again - orbit.get_position()).length() < 1e-6);
//! ```

#![warn(missing_docs)]

mod elements;
mod geometry;
mod math;
mod orbit;
mod solver;

#[cfg(feature = "serde")]
pub mod record;

use thiserror::Error;

pub use elements::ClassicalElements;
pub use orbit::{Orbit, StateVectors};
pub use solver::{solve_kepler_equation, solve_kepler_equation_with, KeplerSolution};

/// The default step-size tolerance of the Kepler solver.
///
/// The Newton iteration stops once the last correction falls below
/// this value.
pub const KEPLER_STEP_TOLERANCE: f64 = 1e-8;

/// The default iteration cap of the Kepler solver.
///
/// This bounds the solver's worst-case latency. Hitting the cap is
/// reported through [`KeplerSolution::converged`], not treated as an
/// error.
pub const KEPLER_MAX_ITERATIONS: u32 = 20;

/// Below this eccentricity an orbit is classified as circular.
///
/// The eccentricity vector of such an orbit is too short to define a
/// trustworthy periapsis direction, so the fallback convention
/// documented on [`Orbit::get_semi_major_axis_basis`] kicks in.
pub const CIRCULAR_ECCENTRICITY_EPSILON: f64 = 1e-8;

/// Within this distance of `e = 1` an orbit is classified as
/// parabolic and rejected.
pub(crate) const PARABOLIC_ECCENTRICITY_EPSILON: f64 = 1e-8;

/// Relative threshold under which the specific orbital energy is
/// treated as zero (parabolic), guarding the division in the
/// semi-major-axis formula.
pub(crate) const PARABOLIC_ENERGY_EPSILON: f64 = 1e-12;

/// Below this position-vector length an orbit is degenerate.
pub(crate) const DEGENERATE_LENGTH_EPSILON: f64 = 1e-12;

/// The classification of an orbit, computed once per recompute from
/// its eccentricity.
///
/// Operations that are undefined for a class (the period of a
/// hyperbolic trajectory, time propagation of any open trajectory)
/// return [`OrbitError::UnsupportedOrbitClass`] instead of silently
/// producing NaN.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrbitClass {
    /// Eccentricity approximately zero. The periapsis direction is
    /// undefined and replaced by a documented fallback.
    Circular,
    /// Eccentricity in (0, 1): a closed ellipse.
    Elliptic,
    /// Eccentricity approximately 1. Unsupported: the semi-major-axis
    /// formula divides by zero, so construction rejects these.
    Parabolic,
    /// Eccentricity above 1: an open trajectory with no period and no
    /// apoapsis.
    Hyperbolic,
}

impl OrbitClass {
    /// Classifies an eccentricity value.
    ///
    /// # Example
    /// ```
    /// use kepler_orbits::OrbitClass;
    ///
    /// assert_eq!(OrbitClass::from_eccentricity(0.0), OrbitClass::Circular);
    /// assert_eq!(OrbitClass::from_eccentricity(0.6), OrbitClass::Elliptic);
    /// assert_eq!(OrbitClass::from_eccentricity(1.0), OrbitClass::Parabolic);
    /// assert_eq!(OrbitClass::from_eccentricity(2.6), OrbitClass::Hyperbolic);
    /// ```
    #[must_use]
    pub fn from_eccentricity(eccentricity: f64) -> OrbitClass {
        if eccentricity < CIRCULAR_ECCENTRICITY_EPSILON {
            OrbitClass::Circular
        } else if (eccentricity - 1.0).abs() <= PARABOLIC_ECCENTRICITY_EPSILON {
            OrbitClass::Parabolic
        } else if eccentricity < 1.0 {
            OrbitClass::Elliptic
        } else {
            OrbitClass::Hyperbolic
        }
    }
}

/// An error describing why an orbit could not be constructed, or why
/// an operation is not available on it.
///
/// Invalid inputs fail fast at construction instead of seeding the
/// instance with NaN and infinity.
#[derive(Error, Clone, Copy, Debug, PartialEq)]
pub enum OrbitError {
    /// The position vector has (approximately) zero length; no orbit
    /// passes through the attractor's center.
    #[error("degenerate orbit: position vector length is approximately zero")]
    DegenerateOrbit,

    /// The gravitational parameter `G * attractor mass` must be
    /// positive.
    #[error("gravitational parameter must be positive, got {0}")]
    NonPositiveMu(f64),

    /// The specific orbital energy is approximately zero, or the
    /// eccentricity is approximately 1. The semi-major axis of such a
    /// trajectory is undefined. Radial trajectories (zero angular
    /// momentum) land here as well, since their eccentricity vector
    /// has exactly unit length.
    #[error("parabolic trajectories are not supported (specific orbital energy is approximately zero)")]
    ParabolicTrajectory,

    /// The requested operation is undefined for this orbit's class.
    #[error("operation `{operation}` is not supported for {class:?} orbits")]
    UnsupportedOrbitClass {
        /// A short description of the rejected operation.
        operation: &'static str,
        /// The class of the orbit the operation was attempted on.
        class: OrbitClass,
    },

    /// An element set passed to
    /// [`Orbit::from_elements`] was internally inconsistent.
    #[error("invalid classical elements: {0}")]
    InvalidElements(&'static str),
}
