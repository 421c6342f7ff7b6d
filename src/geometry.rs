use core::f64::consts::TAU;

use glam::DVec3;

use crate::{math, CIRCULAR_ECCENTRICITY_EPSILON};

/// The reference direction used when the ascending node is undefined,
/// i.e. for orbits lying in the ecliptic plane.
const REFERENCE_AXIS: DVec3 = DVec3::X;

/// The ecliptic normal. Inclination is measured against this axis.
const ECLIPTIC_NORMAL: DVec3 = DVec3::Z;

/// Below this node-vector length the orbit is treated as equatorial
/// and the ascending node as undefined.
const NODE_DEGENERACY_EPSILON: f64 = 1e-12;

/// The orthonormal basis of an orbit, derived once per recompute.
///
/// All four vectors are unit-length. `semi_minor_direction` is
/// `normal x periapsis_direction`, so `(periapsis_direction,
/// semi_minor_direction, normal)` forms a right-handed frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct OrbitalFrame {
    /// Unit normal of the orbital plane, along the angular momentum.
    pub(crate) normal: DVec3,
    /// Unit vector toward the ascending node, or [`REFERENCE_AXIS`]
    /// for equatorial orbits.
    pub(crate) node_axis: DVec3,
    /// Unit vector from the focus toward periapsis (the semi-major
    /// axis basis).
    pub(crate) periapsis_direction: DVec3,
    /// Unit vector along the semi-minor axis, 90 degrees ahead of
    /// periapsis in the direction of motion.
    pub(crate) semi_minor_direction: DVec3,
}

/// The three orientation angles of the orbital plane and of the
/// ellipse within it, in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct OrientationAngles {
    pub(crate) inclination: f64,
    pub(crate) ascending_node_longitude: f64,
    pub(crate) arg_of_periapsis: f64,
}

/// Apsis distances and the derived geometric points of the conic.
///
/// The points are attractor-relative; the attractor itself sits at a
/// focus, not at `center`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Apsides {
    pub(crate) periapsis_distance: f64,
    pub(crate) apoapsis_distance: f64,
    pub(crate) periapsis_point: DVec3,
    pub(crate) apoapsis_point: DVec3,
    pub(crate) center: DVec3,
}

/// Derives the orbital frame from a Cartesian state.
///
/// The periapsis direction is the normalized eccentricity vector. For
/// (near-)circular orbits that vector vanishes and no periapsis
/// exists; the convention here is to fall back to the node axis, and
/// for equatorial circular orbits to [`REFERENCE_AXIS`]. The true
/// anomaly of such orbits is measured from that fallback axis.
pub(crate) fn orbital_frame(
    position: DVec3,
    velocity: DVec3,
    eccentricity_vector: DVec3,
    eccentricity: f64,
) -> OrbitalFrame {
    let normal = position.cross(velocity).normalize();
    let node_vector = ECLIPTIC_NORMAL.cross(normal);
    let node_axis = if node_vector.length() > NODE_DEGENERACY_EPSILON {
        node_vector.normalize()
    } else {
        REFERENCE_AXIS
    };

    let periapsis_direction = if eccentricity < CIRCULAR_ECCENTRICITY_EPSILON {
        node_axis
    } else {
        eccentricity_vector / eccentricity
    };

    OrbitalFrame {
        normal,
        node_axis,
        periapsis_direction,
        semi_minor_direction: normal.cross(periapsis_direction).normalize(),
    }
}

/// Builds the orbital frame from the three classical orientation
/// angles via sequential axis rotations (the 3-1-3 Euler sequence):
///
/// 1. rotate the reference axis around the ecliptic normal by the
///    ascending node longitude, yielding the node axis;
/// 2. rotate the ecliptic normal around the node axis by the
///    inclination, yielding the orbit normal;
/// 3. rotate the node axis around the orbit normal by the argument of
///    periapsis, yielding the periapsis direction.
pub(crate) fn basis_from_angles(
    inclination: f64,
    ascending_node_longitude: f64,
    arg_of_periapsis: f64,
) -> OrbitalFrame {
    let node_axis = math::rotate_about_axis(REFERENCE_AXIS, ECLIPTIC_NORMAL, ascending_node_longitude);
    let normal = math::rotate_about_axis(ECLIPTIC_NORMAL, node_axis, inclination);
    let periapsis_direction = math::rotate_about_axis(node_axis, normal, arg_of_periapsis);

    OrbitalFrame {
        normal,
        node_axis,
        periapsis_direction,
        semi_minor_direction: normal.cross(periapsis_direction).normalize(),
    }
}

/// Reads the orientation angles back out of a frame.
///
/// - inclination: angle between the orbit normal and the ecliptic
///   normal, in `[0, PI]`;
/// - ascending node longitude: angle between the reference axis and
///   the node axis, branch picked by the sign of the node axis'
///   y-component, in `[0, TAU)`;
/// - argument of periapsis: angle between the node axis and the
///   periapsis direction, branch picked by the sign of the periapsis
///   direction's z-component, in `[0, TAU)`.
pub(crate) fn orientation_angles(frame: &OrbitalFrame) -> OrientationAngles {
    let inclination = math::acos_clamped(frame.normal.z);

    let ascending_node_longitude = {
        let angle = math::acos_clamped(frame.node_axis.x);
        if frame.node_axis.y >= 0.0 {
            angle
        } else {
            TAU - angle
        }
    };

    let arg_of_periapsis = {
        let angle = math::acos_clamped(frame.node_axis.dot(frame.periapsis_direction));
        if frame.periapsis_direction.z >= 0.0 {
            angle
        } else {
            TAU - angle
        }
    };

    OrientationAngles {
        inclination,
        ascending_node_longitude,
        arg_of_periapsis,
    }
}

/// Derives the apsis distances and points of the conic.
///
/// `r_p = a(1 - e)` and `r_a = a(1 + e)`. The center is the midpoint
/// of the two apsis points; with the signed apoapsis distance this
/// also places the hyperbolic center correctly, beyond periapsis.
pub(crate) fn apsides(frame: &OrbitalFrame, semi_major_axis: f64, eccentricity: f64) -> Apsides {
    let periapsis_distance = semi_major_axis * (1.0 - eccentricity);
    let apoapsis_distance = semi_major_axis * (1.0 + eccentricity);

    let periapsis_point = frame.periapsis_direction * periapsis_distance;
    let apoapsis_point = -frame.periapsis_direction * apoapsis_distance;

    Apsides {
        periapsis_distance,
        apoapsis_distance,
        periapsis_point,
        apoapsis_point,
        center: (periapsis_point + apoapsis_point) * 0.5,
    }
}
