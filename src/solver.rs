use core::f64::consts::TAU;

use crate::{KEPLER_MAX_ITERATIONS, KEPLER_STEP_TOLERANCE};

/// The result of numerically solving Kepler's equation.
///
/// Returned by [`solve_kepler_equation`] and
/// [`solve_kepler_equation_with`].
///
/// The solver always returns its best estimate, even when the
/// iteration cap is hit. Callers that need a guaranteed-accurate
/// eccentric anomaly must check [`converged`][Self::converged] instead
/// of trusting the estimate blindly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeplerSolution {
    /// The estimated eccentric anomaly, in radians.
    pub eccentric_anomaly: f64,

    /// How many Newton iterations were performed.
    pub iterations: u32,

    /// Whether the last Newton step shrank below the tolerance before
    /// the iteration cap was reached.
    pub converged: bool,
}

/// Solves Kepler's equation `M = E - e sin E` for the eccentric
/// anomaly `E`, given a mean anomaly and an eccentricity.
///
/// Uses the default step tolerance ([`KEPLER_STEP_TOLERANCE`]) and
/// iteration cap ([`KEPLER_MAX_ITERATIONS`]). See
/// [`solve_kepler_equation_with`] to override them.
///
/// Kepler's equation has no closed-form inverse, so this uses
/// Newton-Raphson iteration seeded with `E = M`:
/// `E <- E - f(E)/f'(E)` where `f(E) = E - e sin E - M` and
/// `f'(E) = 1 - e cos E`.
///
/// Learn more: <https://en.wikipedia.org/wiki/Kepler%27s_equation>
///
/// # Eccentricity range
/// Only elliptic orbits (`0 <= e < 1`) are supported. For those, the
/// derivative `1 - e cos E` is strictly positive and the iteration is
/// well-defined everywhere. Hyperbolic eccentricities produce
/// nonsensical results.
///
/// # Example
/// ```
/// use kepler_orbits::solve_kepler_equation;
///
/// let solution = solve_kepler_equation(1.2, 0.3);
/// assert!(solution.converged);
///
/// let e = solution.eccentric_anomaly;
/// let residual = e - 0.3 * e.sin() - 1.2;
/// assert!(residual.abs() < 1e-8);
/// ```
#[must_use]
pub fn solve_kepler_equation(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    solve_kepler_equation_with(
        mean_anomaly,
        eccentricity,
        KEPLER_STEP_TOLERANCE,
        KEPLER_MAX_ITERATIONS,
    )
}

/// Solves Kepler's equation with an explicit step tolerance and
/// iteration cap.
///
/// The mean anomaly is wrapped into `[0, TAU)` before solving, so the
/// returned eccentric anomaly lands in the same revolution.
///
/// See [`solve_kepler_equation`] for the method and its constraints.
#[must_use]
pub fn solve_kepler_equation_with(
    mean_anomaly: f64,
    eccentricity: f64,
    tolerance: f64,
    max_iterations: u32,
) -> KeplerSolution {
    let mean_anomaly = mean_anomaly.rem_euclid(TAU);
    let mut eccentric_anomaly = mean_anomaly;
    let mut iterations = 0;
    let mut converged = false;

    for i in 1..=max_iterations {
        iterations = i;

        let f = keplers_equation(mean_anomaly, eccentric_anomaly, eccentricity);
        let fp = keplers_equation_derivative(eccentric_anomaly, eccentricity);
        let delta = f / fp;
        eccentric_anomaly -= delta;

        if delta.abs() < tolerance {
            converged = true;
            break;
        }
    }

    KeplerSolution {
        eccentric_anomaly,
        iterations,
        converged,
    }
}

#[inline]
fn keplers_equation(mean_anomaly: f64, eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - (eccentricity * eccentric_anomaly.sin()) - mean_anomaly
}

#[inline]
fn keplers_equation_derivative(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    1.0 - (eccentricity * eccentric_anomaly.cos())
}
