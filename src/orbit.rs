use glam::DVec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::elements::{self, ClassicalElements, ShapeElements};
use crate::geometry::{self, Apsides, OrbitalFrame, OrientationAngles};
use crate::{math, solver, OrbitClass, OrbitError, PARABOLIC_ECCENTRICITY_EPSILON};

/// A position and velocity pair at a point in an orbit.
///
/// Both vectors are attractor-relative: the attractor sits at the
/// origin and the collaborator owning the attractor's world transform
/// is responsible for translating these into world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StateVectors {
    /// The 3D position relative to the attractor, in meters.
    pub position: DVec3,
    /// The 3D velocity relative to the attractor, in meters per second.
    pub velocity: DVec3,
}

/// A two-body Keplerian orbit around an attractor.
///
/// The orbit owns three independent inputs: the gravitational
/// parameter `mu` and the attractor-relative `position` and
/// `velocity` vectors. Everything else (shape, anomalies, orientation
/// basis, apsis points) is derived from them in a single recompute,
/// and is never writable on its own.
///
/// Construct it either from a Cartesian state
/// ([`from_state_vectors`][Self::from_state_vectors]) or from the six
/// classical elements ([`from_elements`][Self::from_elements]); both
/// paths validate their input and funnel into the same recompute, so
/// every constructed instance is fully consistent.
///
/// Time-propagation queries ([`get_position_at_time`]
/// [Self::get_position_at_time] and friends) are pure: they never
/// mutate the stored state. The one explicit mutator besides
/// [`set_state_vectors`][Self::set_state_vectors] is
/// [`step`][Self::step], which advances the stored epoch.
///
/// # Example
/// ```
/// use glam::DVec3;
/// use kepler_orbits::Orbit;
///
/// let orbit = Orbit::from_state_vectors(
///     DVec3::new(100.0, 0.0, 0.0),
///     DVec3::new(0.0, 4.0, 0.0),
///     1000.0, // attractor mass
///     1.0,    // gravitational constant
/// )
/// .unwrap();
///
/// assert!((orbit.get_semi_major_axis() - 250.0).abs() < 1e-9);
/// assert!((orbit.get_eccentricity() - 0.6).abs() < 1e-9);
/// assert!((orbit.get_periapsis() - 100.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Orbit {
    /// The gravitational parameter, `G * attractor mass`. Always > 0.
    mu: f64,
    /// Attractor-relative position at epoch, in meters. Never zero.
    position: DVec3,
    /// Attractor-relative velocity at epoch, in meters per second.
    velocity: DVec3,
    /// The attractor mass this orbit was constructed with.
    attractor_mass: f64,
    shape: ShapeElements,
    frame: OrbitalFrame,
    orientation: OrientationAngles,
    apsides: Apsides,
}

// Construction and mutation
impl Orbit {
    /// Creates an orbit from a Cartesian state.
    ///
    /// # Parameters
    /// - `position`: the attractor-relative position, in meters.
    ///   Must not be (approximately) zero.
    /// - `velocity`: the attractor-relative velocity, in meters per
    ///   second.
    /// - `attractor_mass`: the mass of the attractor, in kilograms.
    /// - `gravity_constant`: the gravitational constant the simulation
    ///   runs with. The product `attractor_mass * gravity_constant`
    ///   must be positive.
    ///
    /// # Errors
    /// - [`OrbitError::DegenerateOrbit`] for a zero-length position;
    /// - [`OrbitError::NonPositiveMu`] when the mass/constant product
    ///   is not positive;
    /// - [`OrbitError::ParabolicTrajectory`] when the specific orbital
    ///   energy is approximately zero or the eccentricity is
    ///   approximately 1 (this includes radial trajectories with zero
    ///   angular momentum).
    pub fn from_state_vectors(
        position: DVec3,
        velocity: DVec3,
        attractor_mass: f64,
        gravity_constant: f64,
    ) -> Result<Orbit, OrbitError> {
        Self::assemble(position, velocity, attractor_mass * gravity_constant, attractor_mass)
    }

    /// Creates an orbit from the six classical orbital elements.
    ///
    /// The orientation basis is built from the three angles via
    /// sequential axis rotations, the mean anomaly is converted to
    /// eccentric and true anomaly with the Kepler solver, and the
    /// resulting Cartesian state goes through the same recompute as
    /// [`from_state_vectors`][Self::from_state_vectors], so the
    /// instance is fully consistent at construction time.
    ///
    /// Element angles are expressed in degrees (see
    /// [`ClassicalElements`]).
    ///
    /// # Errors
    /// Only closed orbits can be described this way:
    /// - [`OrbitError::InvalidElements`] for a negative or non-finite
    ///   eccentricity, or a non-positive semi-major axis;
    /// - [`OrbitError::ParabolicTrajectory`] for an eccentricity of
    ///   approximately 1;
    /// - [`OrbitError::UnsupportedOrbitClass`] for a hyperbolic
    ///   eccentricity;
    /// - [`OrbitError::NonPositiveMu`] when the mass/constant product
    ///   is not positive.
    pub fn from_elements(
        elements: ClassicalElements,
        attractor_mass: f64,
        gravity_constant: f64,
    ) -> Result<Orbit, OrbitError> {
        let mu = attractor_mass * gravity_constant;
        if !(mu > 0.0) {
            return Err(OrbitError::NonPositiveMu(mu));
        }

        let eccentricity = elements.eccentricity;
        if !eccentricity.is_finite() || eccentricity < 0.0 {
            return Err(OrbitError::InvalidElements(
                "eccentricity must be finite and non-negative",
            ));
        }
        if (eccentricity - 1.0).abs() <= PARABOLIC_ECCENTRICITY_EPSILON {
            return Err(OrbitError::ParabolicTrajectory);
        }
        if eccentricity > 1.0 {
            return Err(OrbitError::UnsupportedOrbitClass {
                operation: "construct from classical elements",
                class: OrbitClass::Hyperbolic,
            });
        }
        let semi_major_axis = elements.semi_major_axis;
        if !(semi_major_axis > 0.0) {
            return Err(OrbitError::InvalidElements(
                "semi-major axis must be positive for a closed orbit",
            ));
        }

        let frame = geometry::basis_from_angles(
            elements.inclination_deg.to_radians(),
            elements.ascending_node_longitude_deg.to_radians(),
            elements.arg_of_periapsis_deg.to_radians(),
        );

        let mean_anomaly = elements.mean_anomaly_deg.to_radians();
        let solution = solver::solve_kepler_equation(mean_anomaly, eccentricity);
        let eccentric_anomaly = solution.eccentric_anomaly;
        let true_anomaly = ((1.0 - eccentricity * eccentricity).sqrt() * eccentric_anomaly.sin())
            .atan2(eccentric_anomaly.cos() - eccentricity);

        let focal_parameter = semi_major_axis * (1.0 - eccentricity * eccentricity);
        let radius = focal_parameter / (1.0 + eccentricity * true_anomaly.cos());
        let radial_direction =
            math::rotate_about_axis(frame.periapsis_direction, frame.normal, true_anomaly);
        let position = radial_direction * radius;

        // Perifocal velocity: v = sqrt(mu/p) (-sin nu p_hat + (e + cos nu) q_hat)
        // https://downloads.rene-schwarz.com/download/M001-Keplerian_Orbit_Elements_to_Cartesian_State_Vectors.pdf
        let velocity = (mu / focal_parameter).sqrt()
            * (frame.periapsis_direction * (-true_anomaly.sin())
                + frame.semi_minor_direction * (eccentricity + true_anomaly.cos()));

        Self::assemble(position, velocity, mu, attractor_mass)
    }

    /// Overwrites the stored state vectors and recomputes every
    /// derived field.
    ///
    /// On error the orbit is left unchanged: the new state is fully
    /// validated before anything is committed.
    pub fn set_state_vectors(&mut self, position: DVec3, velocity: DVec3) -> Result<(), OrbitError> {
        let (shape, frame) = elements::derive_shape(position, velocity, self.mu)?;
        self.position = position;
        self.velocity = velocity;
        self.commit(shape, frame);
        Ok(())
    }

    /// Advances the stored epoch by `time` seconds.
    ///
    /// This is the one mutating counterpart of the pure
    /// [`get_state_vectors_at_time`][Self::get_state_vectors_at_time]
    /// query: the propagated state becomes the new stored state and
    /// all derived fields are recomputed. An external scheduler can
    /// call this once per simulation tick with the elapsed time; the
    /// orbit itself has no opinion on cadence.
    ///
    /// # Errors
    /// Same as [`get_state_vectors_at_time`]
    /// [Self::get_state_vectors_at_time]; the orbit is unchanged on
    /// error.
    pub fn step(&mut self, time: f64) -> Result<(), OrbitError> {
        let state = self.get_state_vectors_at_time(time)?;
        self.set_state_vectors(state.position, state.velocity)
    }

    fn assemble(
        position: DVec3,
        velocity: DVec3,
        mu: f64,
        attractor_mass: f64,
    ) -> Result<Orbit, OrbitError> {
        let (shape, frame) = elements::derive_shape(position, velocity, mu)?;
        Ok(Orbit {
            mu,
            position,
            velocity,
            attractor_mass,
            shape,
            frame,
            orientation: geometry::orientation_angles(&frame),
            apsides: geometry::apsides(&frame, shape.semi_major_axis, shape.eccentricity),
        })
    }

    /// Installs a freshly derived state. The only writer of derived
    /// fields.
    fn commit(&mut self, shape: ShapeElements, frame: OrbitalFrame) {
        self.shape = shape;
        self.frame = frame;
        self.orientation = geometry::orientation_angles(&frame);
        self.apsides = geometry::apsides(&frame, shape.semi_major_axis, shape.eccentricity);
    }

    fn require_closed(&self, operation: &'static str) -> Result<(), OrbitError> {
        match self.shape.class {
            OrbitClass::Circular | OrbitClass::Elliptic => Ok(()),
            class => Err(OrbitError::UnsupportedOrbitClass { operation, class }),
        }
    }
}

// Propagation
impl Orbit {
    /// Gets the mean anomaly after `time` seconds have elapsed from
    /// epoch, wrapped into `[0, TAU)`.
    ///
    /// `M(t) = M_0 + n t`, with `n` the mean motion. Negative times
    /// propagate backward.
    ///
    /// # Errors
    /// [`OrbitError::UnsupportedOrbitClass`] for open trajectories.
    pub fn get_mean_anomaly_at_time(&self, time: f64) -> Result<f64, OrbitError> {
        self.require_closed("mean anomaly at time")?;
        Ok(math::wrap_tau(
            self.shape.mean_anomaly + self.shape.mean_motion * time,
        ))
    }

    /// Gets the true anomaly after `time` seconds have elapsed from
    /// epoch, wrapped into `[0, TAU)`.
    ///
    /// The mean anomaly is advanced, Kepler's equation is solved for
    /// the eccentric anomaly, and the true anomaly is recovered with
    /// the quadrant-preserving identity
    /// `nu = atan2(sqrt(1 - e^2) sin E, cos E - e)`.
    ///
    /// # Errors
    /// [`OrbitError::UnsupportedOrbitClass`] for open trajectories.
    pub fn get_true_anomaly_at_time(&self, time: f64) -> Result<f64, OrbitError> {
        let mean_anomaly = self.get_mean_anomaly_at_time(time)?;
        let eccentricity = self.shape.eccentricity;
        let solution = solver::solve_kepler_equation(mean_anomaly, eccentricity);
        let eccentric_anomaly = solution.eccentric_anomaly;
        Ok(math::wrap_tau(
            ((1.0 - eccentricity * eccentricity).sqrt() * eccentric_anomaly.sin())
                .atan2(eccentric_anomaly.cos() - eccentricity),
        ))
    }

    /// Gets the attractor-relative position at a given true anomaly.
    ///
    /// `r = p / (1 + e cos nu)`, pointed along the periapsis direction
    /// rotated by `nu` around the orbit normal.
    ///
    /// # Unchecked Operation
    /// For hyperbolic orbits this formula is only meaningful between
    /// the asymptote angles; no check is performed.
    #[must_use]
    pub fn get_position_at_true_anomaly(&self, true_anomaly: f64) -> DVec3 {
        let radius = self.shape.focal_parameter
            / (1.0 + self.shape.eccentricity * true_anomaly.cos());
        math::rotate_about_axis(self.frame.periapsis_direction, self.frame.normal, true_anomaly)
            * radius
    }

    /// Gets the attractor-relative velocity at a given true anomaly.
    ///
    /// Built in the perifocal frame:
    /// `v = sqrt(mu/p) (-sin nu p_hat + (e + cos nu) q_hat)`
    /// where `p_hat` is the periapsis direction and `q_hat` the
    /// semi-minor-axis basis.
    ///
    /// # Unchecked Operation
    /// For hyperbolic orbits this formula is only meaningful between
    /// the asymptote angles; no check is performed.
    #[must_use]
    pub fn get_velocity_at_true_anomaly(&self, true_anomaly: f64) -> DVec3 {
        (self.mu / self.shape.focal_parameter).sqrt()
            * (self.frame.periapsis_direction * (-true_anomaly.sin())
                + self.frame.semi_minor_direction
                    * (self.shape.eccentricity + true_anomaly.cos()))
    }

    /// Gets the attractor-relative position after `time` seconds have
    /// elapsed from epoch.
    ///
    /// This is a closed-form evaluation with no integration drift, and
    /// it is a pure query: the stored state is not mutated. It assumes
    /// the unperturbed two-body model; once external forces act on the
    /// body, a numeric integrator outside this crate must take over.
    ///
    /// # Errors
    /// [`OrbitError::UnsupportedOrbitClass`] for open trajectories.
    ///
    /// # Example
    /// ```
    /// use glam::DVec3;
    /// use kepler_orbits::Orbit;
    ///
    /// let orbit = Orbit::from_state_vectors(
    ///     DVec3::new(100.0, 20.0, 0.0),
    ///     DVec3::new(0.5, 4.0, 0.0),
    ///     1000.0,
    ///     1.0,
    /// )
    /// .unwrap();
    ///
    /// // At zero elapsed time, propagation returns the stored state.
    /// let now = orbit.get_position_at_time(0.0).unwrap();
    /// assert!((now - orbit.get_position()).length() < 1e-6);
    /// ```
    pub fn get_position_at_time(&self, time: f64) -> Result<DVec3, OrbitError> {
        Ok(self.get_position_at_true_anomaly(self.get_true_anomaly_at_time(time)?))
    }

    /// Gets the attractor-relative velocity after `time` seconds have
    /// elapsed from epoch. Pure query; see
    /// [`get_position_at_time`][Self::get_position_at_time].
    ///
    /// # Errors
    /// [`OrbitError::UnsupportedOrbitClass`] for open trajectories.
    pub fn get_velocity_at_time(&self, time: f64) -> Result<DVec3, OrbitError> {
        Ok(self.get_velocity_at_true_anomaly(self.get_true_anomaly_at_time(time)?))
    }

    /// Gets both state vectors after `time` seconds have elapsed from
    /// epoch, solving Kepler's equation only once.
    ///
    /// # Errors
    /// [`OrbitError::UnsupportedOrbitClass`] for open trajectories.
    pub fn get_state_vectors_at_time(&self, time: f64) -> Result<StateVectors, OrbitError> {
        let true_anomaly = self.get_true_anomaly_at_time(time)?;
        Ok(StateVectors {
            position: self.get_position_at_true_anomaly(true_anomaly),
            velocity: self.get_velocity_at_true_anomaly(true_anomaly),
        })
    }
}

// Getters
impl Orbit {
    /// Gets the gravitational parameter `mu = G * attractor mass`.
    #[inline]
    pub fn get_gravitational_parameter(&self) -> f64 {
        self.mu
    }

    /// Gets the attractor-relative position at epoch, in meters.
    #[inline]
    pub fn get_position(&self) -> DVec3 {
        self.position
    }

    /// Gets the attractor-relative velocity at epoch, in meters per
    /// second.
    #[inline]
    pub fn get_velocity(&self) -> DVec3 {
        self.velocity
    }

    /// Gets the state vectors at epoch.
    #[inline]
    pub fn get_state_vectors(&self) -> StateVectors {
        StateVectors {
            position: self.position,
            velocity: self.velocity,
        }
    }

    /// Gets the attractor mass this orbit was constructed with, in
    /// kilograms.
    #[inline]
    pub fn get_attractor_mass(&self) -> f64 {
        self.attractor_mass
    }

    /// Gets the current distance to the attractor, in meters.
    #[inline]
    pub fn get_attractor_distance(&self) -> f64 {
        self.position.length()
    }

    /// Gets the classification of this orbit.
    ///
    /// Computed once per recompute; parabolic trajectories are
    /// rejected at construction, so a live instance is never
    /// [`OrbitClass::Parabolic`].
    #[inline]
    pub fn get_class(&self) -> OrbitClass {
        self.shape.class
    }

    /// Gets the eccentricity of the orbit.
    #[inline]
    pub fn get_eccentricity(&self) -> f64 {
        self.shape.eccentricity
    }

    /// Gets the semi-major axis, in meters. Negative for hyperbolic
    /// trajectories.
    #[inline]
    pub fn get_semi_major_axis(&self) -> f64 {
        self.shape.semi_major_axis
    }

    /// Gets the semi-minor axis, in meters.
    ///
    /// `a sqrt(1 - e^2)` for closed orbits, `a sqrt(e^2 - 1)` for
    /// hyperbolic ones (negative, like the semi-major axis).
    #[inline]
    pub fn get_semi_minor_axis(&self) -> f64 {
        self.shape.semi_minor_axis
    }

    /// Gets the focal parameter (semi-latus rectum) `p = a(1 - e^2)`,
    /// in meters.
    #[inline]
    pub fn get_focal_parameter(&self) -> f64 {
        self.shape.focal_parameter
    }

    /// Gets the orbital period `T = 2 pi sqrt(a^3 / mu)`, in seconds.
    ///
    /// # Errors
    /// [`OrbitError::UnsupportedOrbitClass`] for open trajectories,
    /// which never repeat.
    pub fn get_period(&self) -> Result<f64, OrbitError> {
        self.shape
            .period
            .ok_or(OrbitError::UnsupportedOrbitClass {
                operation: "orbital period",
                class: self.shape.class,
            })
    }

    /// Gets the mean motion `n = sqrt(mu / |a|^3)`, in radians per
    /// second.
    #[inline]
    pub fn get_mean_motion(&self) -> f64 {
        self.shape.mean_motion
    }

    /// Gets the true anomaly at epoch, in radians.
    ///
    /// For circular orbits, measured from the fallback periapsis
    /// direction (see [`get_semi_major_axis_basis`]
    /// [Self::get_semi_major_axis_basis]).
    #[inline]
    pub fn get_true_anomaly(&self) -> f64 {
        self.shape.true_anomaly
    }

    /// Gets the eccentric anomaly at epoch, in radians. For
    /// hyperbolic orbits this is the hyperbolic eccentric anomaly.
    #[inline]
    pub fn get_eccentric_anomaly(&self) -> f64 {
        self.shape.eccentric_anomaly
    }

    /// Gets the mean anomaly at epoch, in radians.
    #[inline]
    pub fn get_mean_anomaly(&self) -> f64 {
        self.shape.mean_anomaly
    }

    /// Gets the periapsis distance `r_p = a(1 - e)`, in meters.
    #[inline]
    pub fn get_periapsis(&self) -> f64 {
        self.apsides.periapsis_distance
    }

    /// Gets the apoapsis distance `r_a = a(1 + e)`, in meters.
    /// Negative for hyperbolic trajectories.
    #[inline]
    pub fn get_apoapsis(&self) -> f64 {
        self.apsides.apoapsis_distance
    }

    /// Gets the compression ratio `b / a` of the orbit (1 for a
    /// perfect circle).
    #[inline]
    pub fn get_compression_ratio(&self) -> f64 {
        self.shape.semi_minor_axis / self.shape.semi_major_axis
    }

    /// Gets the unit normal of the orbital plane, along the specific
    /// angular momentum.
    #[inline]
    pub fn get_orbit_normal(&self) -> DVec3 {
        self.frame.normal
    }

    /// Gets the semi-major axis basis: the unit vector from the focus
    /// toward periapsis.
    ///
    /// For circular orbits the eccentricity vector vanishes and no
    /// periapsis exists; the documented convention is to fall back to
    /// the node axis, and to the reference x-axis for equatorial
    /// circular orbits.
    #[inline]
    pub fn get_semi_major_axis_basis(&self) -> DVec3 {
        self.frame.periapsis_direction
    }

    /// Gets the semi-minor axis basis: the unit vector 90 degrees
    /// ahead of periapsis in the direction of motion.
    #[inline]
    pub fn get_semi_minor_axis_basis(&self) -> DVec3 {
        self.frame.semi_minor_direction
    }

    /// Gets the unit vector toward the ascending node, or the
    /// reference x-axis for equatorial orbits.
    #[inline]
    pub fn get_node_axis(&self) -> DVec3 {
        self.frame.node_axis
    }

    /// Gets the inclination of the orbital plane, in radians.
    #[inline]
    pub fn get_inclination(&self) -> f64 {
        self.orientation.inclination
    }

    /// Gets the longitude of the ascending node, in radians, in
    /// `[0, TAU)`. Zero for equatorial orbits, whose node is
    /// undefined.
    #[inline]
    pub fn get_ascending_node_longitude(&self) -> f64 {
        self.orientation.ascending_node_longitude
    }

    /// Gets the argument of periapsis, in radians, in `[0, TAU)`.
    /// For equatorial orbits this is measured from the reference
    /// x-axis and absorbs the node longitude.
    #[inline]
    pub fn get_arg_of_periapsis(&self) -> f64 {
        self.orientation.arg_of_periapsis
    }

    /// Gets the geometric center of the conic, attractor-relative.
    ///
    /// This is the midpoint of the two apsis points; the attractor
    /// itself sits at a focus, not here.
    #[inline]
    pub fn get_center_point(&self) -> DVec3 {
        self.apsides.center
    }

    /// Gets the periapsis point, attractor-relative.
    #[inline]
    pub fn get_periapsis_point(&self) -> DVec3 {
        self.apsides.periapsis_point
    }

    /// Gets the apoapsis point, attractor-relative. Meaningless for
    /// hyperbolic trajectories, which have no apoapsis.
    #[inline]
    pub fn get_apoapsis_point(&self) -> DVec3 {
        self.apsides.apoapsis_point
    }

    /// Gets the six classical elements of this orbit, with angles in
    /// degrees, suitable for persistence or for reconstructing the
    /// orbit via [`from_elements`][Self::from_elements].
    #[must_use]
    pub fn get_classical_elements(&self) -> ClassicalElements {
        ClassicalElements {
            eccentricity: self.shape.eccentricity,
            semi_major_axis: self.shape.semi_major_axis,
            mean_anomaly_deg: self.shape.mean_anomaly.to_degrees(),
            inclination_deg: self.orientation.inclination.to_degrees(),
            arg_of_periapsis_deg: self.orientation.arg_of_periapsis.to_degrees(),
            ascending_node_longitude_deg: self.orientation.ascending_node_longitude.to_degrees(),
        }
    }
}
