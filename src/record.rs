//! Persisted orbit records.
//!
//! The record schema is explicit and versioned: every field of
//! [`OrbitRecord`] maps one-to-one onto a named quantity of the
//! [`Orbit`] entity, and [`RECORD_VERSION`] is bumped whenever the
//! schema changes shape. A record carries everything needed to
//! reconstruct its orbit without ambient configuration: the classical
//! elements plus the attractor mass and the gravitational constant the
//! simulation was saved with.

use serde::{Deserialize, Serialize};

use crate::{ClassicalElements, Orbit, OrbitError};

/// The current schema version written into new records.
pub const RECORD_VERSION: u32 = 1;

fn default_version() -> u32 {
    RECORD_VERSION
}

/// A single persisted orbit.
///
/// Angles are stored in degrees, as the element-based construction
/// path expects them.
///
/// # Example
/// ```
/// use kepler_orbits::record::OrbitRecord;
///
/// let json = r#"{
///     "object_name": "Moon",
///     "attractor_name": "Earth",
///     "eccentricity": 0.0549,
///     "semi_major_axis": 384748000.0,
///     "mean_anomaly_deg": 135.27,
///     "inclination_deg": 5.145,
///     "arg_of_periapsis_deg": 318.15,
///     "ascending_node_longitude_deg": 125.08,
///     "attractor_mass": 5.972e24,
///     "gravity_constant": 6.674e-11
/// }"#;
///
/// let record: OrbitRecord = serde_json::from_str(json).unwrap();
/// let orbit = record.to_orbit().unwrap();
/// assert!((orbit.get_eccentricity() - 0.0549).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitRecord {
    /// The schema version this record was written with. Absent fields
    /// default to the current version, so hand-written records need
    /// not carry it.
    #[serde(default = "default_version")]
    pub version: u32,
    /// The name of the orbiting object.
    pub object_name: String,
    /// The name of the attractor the elements are relative to.
    pub attractor_name: String,
    /// The eccentricity of the orbit.
    pub eccentricity: f64,
    /// The semi-major axis, in meters.
    pub semi_major_axis: f64,
    /// The mean anomaly at epoch, in degrees.
    pub mean_anomaly_deg: f64,
    /// The inclination, in degrees.
    pub inclination_deg: f64,
    /// The argument of periapsis, in degrees.
    pub arg_of_periapsis_deg: f64,
    /// The longitude of the ascending node, in degrees.
    pub ascending_node_longitude_deg: f64,
    /// The attractor mass, in kilograms.
    pub attractor_mass: f64,
    /// The gravitational constant the simulation was saved with.
    pub gravity_constant: f64,
}

/// A list of persisted orbits, the top-level shape of a saved scene.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitRecordList {
    /// The saved orbits.
    pub orbits: Vec<OrbitRecord>,
}

impl OrbitRecord {
    /// Captures an orbit into a record under the given object and
    /// attractor names.
    ///
    /// The gravitational constant is recovered from the orbit's `mu`
    /// and attractor mass.
    #[must_use]
    pub fn from_orbit(
        orbit: &Orbit,
        object_name: impl Into<String>,
        attractor_name: impl Into<String>,
    ) -> OrbitRecord {
        let elements = orbit.get_classical_elements();
        OrbitRecord {
            version: RECORD_VERSION,
            object_name: object_name.into(),
            attractor_name: attractor_name.into(),
            eccentricity: elements.eccentricity,
            semi_major_axis: elements.semi_major_axis,
            mean_anomaly_deg: elements.mean_anomaly_deg,
            inclination_deg: elements.inclination_deg,
            arg_of_periapsis_deg: elements.arg_of_periapsis_deg,
            ascending_node_longitude_deg: elements.ascending_node_longitude_deg,
            attractor_mass: orbit.get_attractor_mass(),
            gravity_constant: orbit.get_gravitational_parameter() / orbit.get_attractor_mass(),
        }
    }

    /// Reconstructs the orbit described by this record.
    ///
    /// # Errors
    /// Whatever [`Orbit::from_elements`] rejects; records are not
    /// trusted to be valid.
    pub fn to_orbit(&self) -> Result<Orbit, OrbitError> {
        Orbit::from_elements(
            ClassicalElements {
                eccentricity: self.eccentricity,
                semi_major_axis: self.semi_major_axis,
                mean_anomaly_deg: self.mean_anomaly_deg,
                inclination_deg: self.inclination_deg,
                arg_of_periapsis_deg: self.arg_of_periapsis_deg,
                ascending_node_longitude_deg: self.ascending_node_longitude_deg,
            },
            self.attractor_mass,
            self.gravity_constant,
        )
    }
}
