use core::f64::consts::TAU;

use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::{self, OrbitalFrame};
use crate::{
    math, OrbitClass, OrbitError, CIRCULAR_ECCENTRICITY_EPSILON, DEGENERATE_LENGTH_EPSILON,
    PARABOLIC_ENERGY_EPSILON,
};

/// The six classical orbital elements, as used for element-based
/// construction and for persistence.
///
/// Angles are expressed in degrees, matching the persisted record
/// format; the conversion to radians happens inside
/// [`Orbit::from_elements`][crate::Orbit::from_elements].
///
/// # Example
/// ```
/// use kepler_orbits::{ClassicalElements, Orbit};
///
/// let elements = ClassicalElements {
///     eccentricity: 0.3,
///     semi_major_axis: 25_000.0,
///     mean_anomaly_deg: 20.0,
///     inclination_deg: 35.0,
///     arg_of_periapsis_deg: 140.0,
///     ascending_node_longitude_deg: 80.0,
/// };
///
/// let orbit = Orbit::from_elements(elements, 1.0e9, 6.674e-11).unwrap();
/// assert!((orbit.get_eccentricity() - 0.3).abs() < 1e-9);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClassicalElements {
    /// The eccentricity of the orbit.
    pub eccentricity: f64,
    /// The semi-major axis of the orbit, in meters.
    pub semi_major_axis: f64,
    /// The mean anomaly at epoch, in degrees.
    pub mean_anomaly_deg: f64,
    /// The inclination of the orbital plane, in degrees.
    pub inclination_deg: f64,
    /// The argument of periapsis, in degrees.
    pub arg_of_periapsis_deg: f64,
    /// The longitude of the ascending node, in degrees.
    pub ascending_node_longitude_deg: f64,
}

/// Shape and phase quantities derived from a Cartesian state.
///
/// A pure function of `(position, velocity, mu)`; see
/// [`derive_shape`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ShapeElements {
    pub(crate) class: OrbitClass,
    pub(crate) eccentricity: f64,
    pub(crate) semi_major_axis: f64,
    pub(crate) semi_minor_axis: f64,
    pub(crate) focal_parameter: f64,
    /// `None` for open (hyperbolic) trajectories.
    pub(crate) period: Option<f64>,
    pub(crate) mean_motion: f64,
    pub(crate) true_anomaly: f64,
    /// Hyperbolic eccentric anomaly for hyperbolic orbits.
    pub(crate) eccentric_anomaly: f64,
    pub(crate) mean_anomaly: f64,
}

/// Converts a Cartesian state into shape elements and the orbital
/// frame.
///
/// This is the one place derived orbital quantities are computed from
/// a state; both construction paths and every recompute funnel into
/// it.
///
/// Fails fast on degenerate input: a (near-)zero position vector, a
/// non-positive gravitational parameter, or a trajectory with
/// (near-)zero specific orbital energy, whose semi-major axis is
/// undefined. Radial trajectories (zero angular momentum) have an
/// eccentricity of exactly 1 and are rejected through the same
/// parabolic check.
pub(crate) fn derive_shape(
    position: DVec3,
    velocity: DVec3,
    mu: f64,
) -> Result<(ShapeElements, OrbitalFrame), OrbitError> {
    if !(mu > 0.0) {
        return Err(OrbitError::NonPositiveMu(mu));
    }

    let radius = position.length();
    if radius <= DEGENERATE_LENGTH_EPSILON {
        return Err(OrbitError::DegenerateOrbit);
    }
    let position_normal = position / radius;

    // Specific angular momentum and the eccentricity vector:
    // e_vec = (v x h) / mu - r_hat
    // https://en.wikipedia.org/wiki/Eccentricity_vector
    let angular_momentum = position.cross(velocity);
    let eccentricity_vector = velocity.cross(angular_momentum) / mu - position_normal;
    let eccentricity = eccentricity_vector.length();

    // Specific orbital energy: epsilon = v^2/2 - mu/r
    // The parabolic boundary (epsilon = 0) would divide by zero below,
    // so it is guarded explicitly, scaled to the magnitude of the
    // energy terms.
    let kinetic = velocity.length_squared() * 0.5;
    let potential = mu / radius;
    let specific_energy = kinetic - potential;
    if specific_energy.abs() <= PARABOLIC_ENERGY_EPSILON * kinetic.max(potential) {
        return Err(OrbitError::ParabolicTrajectory);
    }

    let class = OrbitClass::from_eccentricity(eccentricity);
    if class == OrbitClass::Parabolic {
        return Err(OrbitError::ParabolicTrajectory);
    }

    // a = -mu / (2 epsilon); negative for hyperbolic trajectories.
    let semi_major_axis = -mu / (2.0 * specific_energy);

    // b = a sqrt(1 - e^2) only holds for closed orbits; the hyperbolic
    // branch is b = a sqrt(e^2 - 1).
    let semi_minor_axis = match class {
        OrbitClass::Hyperbolic => semi_major_axis * (eccentricity * eccentricity - 1.0).sqrt(),
        _ => semi_major_axis * (1.0 - eccentricity * eccentricity).sqrt(),
    };

    let focal_parameter = semi_major_axis * (1.0 - eccentricity * eccentricity);
    let mean_motion = (mu / semi_major_axis.powi(3).abs()).sqrt();
    let period = match class {
        OrbitClass::Hyperbolic => None,
        // T = 2 pi sqrt(a^3 / mu)
        _ => Some(TAU * (semi_major_axis.powi(3) / mu).sqrt()),
    };

    let frame = geometry::orbital_frame(position, velocity, eccentricity_vector, eccentricity);

    // True anomaly. For circular orbits the eccentricity vector
    // vanishes, so the anomaly is measured from the frame's fallback
    // periapsis direction instead.
    let true_anomaly = if eccentricity < CIRCULAR_ECCENTRICITY_EPSILON {
        math::angle_about_axis(frame.periapsis_direction, position_normal, frame.normal)
    } else {
        let angle = math::acos_clamped(eccentricity_vector.dot(position_normal) / eccentricity);
        // The acos only covers half the orbit. A body receding from
        // the attractor (r . v >= 0) is on the periapsis-to-apoapsis
        // half; otherwise it is on the way back down.
        if position.dot(velocity) >= 0.0 {
            angle
        } else {
            TAU - angle
        }
    };

    let (eccentric_anomaly, mean_anomaly) = match class {
        OrbitClass::Hyperbolic => {
            // H = 2 atanh(tan(nu/2) sqrt((e-1)/(e+1)))
            // M = e sinh H - H
            // https://en.wikipedia.org/wiki/Kepler%27s_equation#Hyperbolic_Kepler_equation
            let half_tan = (true_anomaly * 0.5).tan();
            let hyp_anomaly =
                2.0 * (half_tan * ((eccentricity - 1.0) / (eccentricity + 1.0)).sqrt()).atanh();
            (
                hyp_anomaly,
                eccentricity * hyp_anomaly.sinh() - hyp_anomaly,
            )
        }
        _ => {
            // cos E = (e + cos nu) / (1 + e cos nu)
            // sin E = sqrt(1 - e^2) sin nu / (1 + e cos nu)
            // Recovering E through atan2 keeps the quadrant, which a
            // second acos would lose.
            let denominator = 1.0 + eccentricity * true_anomaly.cos();
            let cos_ecc = (eccentricity + true_anomaly.cos()) / denominator;
            let sin_ecc =
                (1.0 - eccentricity * eccentricity).sqrt() * true_anomaly.sin() / denominator;
            let eccentric_anomaly = math::wrap_tau(sin_ecc.atan2(cos_ecc));

            // Kepler's equation, evaluated forward.
            let mean_anomaly =
                math::wrap_tau(eccentric_anomaly - eccentricity * eccentric_anomaly.sin());
            (eccentric_anomaly, mean_anomaly)
        }
    };

    Ok((
        ShapeElements {
            class,
            eccentricity,
            semi_major_axis,
            semi_minor_axis,
            focal_parameter,
            period,
            mean_motion,
            true_anomaly,
            eccentric_anomaly,
            mean_anomaly,
        },
        frame,
    ))
}
