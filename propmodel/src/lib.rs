//! # Radio pathloss modeling
//!
//! `propmodel` defines the [`PropagationModel`] interface shared by
//! every pathloss model, plus two implementations: the empirical
//! [`CurveModel`] backed by the `fcurves` crate and the analytic
//! [`FreeSpaceModel`].
//!
//! A model declares which parameters it needs through its
//! `requires_*` predicates; the checked [`PropagationModel::pathloss_coefficient`]
//! and [`PropagationModel::distance`] entry points verify those
//! parameters are present before delegating to the unchecked fast
//! paths.

mod curve_model;
mod error;
mod freespace;
pub mod units;

pub use crate::{curve_model::CurveModel, error::PropModelError, freespace::FreeSpaceModel};
pub use fcurves::{Band, Curve};
use geo::Point;

/// Speed of light in m/s.
const C: f64 = 299_792_458.0;

/// Optional parameters handed to a [`PropagationModel`].
///
/// Which fields a given model actually reads is declared by its
/// `requires_*` predicates.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelParams {
    pub frequency_mhz: Option<f64>,
    pub tx_height_m: Option<f64>,
    pub rx_height_m: Option<f64>,
    pub tx_location: Option<Point<f64>>,
    pub rx_location: Option<Point<f64>>,
    pub curve: Option<Curve>,
}

impl ModelParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Center frequency of the transmission (MHz).
    #[must_use]
    pub fn frequency(mut self, mhz: f64) -> Self {
        self.frequency_mhz = Some(mhz);
        self
    }

    /// Height or HAAT of the transmitter (meters).
    #[must_use]
    pub fn tx_height(mut self, meters: f64) -> Self {
        self.tx_height_m = Some(meters);
        self
    }

    /// Height or HAAT of the receiver (meters).
    #[must_use]
    pub fn rx_height(mut self, meters: f64) -> Self {
        self.rx_height_m = Some(meters);
        self
    }

    #[must_use]
    pub fn tx_location(mut self, location: Point<f64>) -> Self {
        self.tx_location = Some(location);
        self
    }

    #[must_use]
    pub fn rx_location(mut self, location: Point<f64>) -> Self {
        self.rx_location = Some(location);
        self
    }

    /// Percentage-exceedance curve family.
    #[must_use]
    pub fn curve(mut self, curve: Curve) -> Self {
        self.curve = Some(curve);
        self
    }
}

/// A stateless pathloss/distance model.
///
/// The pathloss coefficient is the linear power ratio received/
/// transmitted; `distance` is its inverse. For any parameter set a
/// model accepts, `distance(pathloss_coefficient(d)) == d` to
/// numerical precision.
pub trait PropagationModel {
    fn requires_terrain(&self) -> bool {
        false
    }
    fn requires_tx_height(&self) -> bool {
        false
    }
    fn requires_rx_height(&self) -> bool {
        false
    }
    fn requires_frequency(&self) -> bool {
        false
    }
    fn requires_tx_location(&self) -> bool {
        false
    }
    fn requires_rx_location(&self) -> bool {
        false
    }
    fn requires_curve(&self) -> bool {
        false
    }

    /// Computes the pathloss coefficient at `distance_km` without
    /// checking parameters or ranges.
    fn pathloss_coefficient_unchecked(
        &self,
        distance_km: f64,
        params: &ModelParams,
    ) -> Result<f64, PropModelError>;

    /// Computes the distance (km) at which the pathloss coefficient
    /// falls to `pathloss`, without checking parameters or ranges.
    fn distance_unchecked(&self, pathloss: f64, params: &ModelParams)
        -> Result<f64, PropModelError>;

    /// Range validation hook; `distance_km` is present on the forward
    /// path only. The default accepts everything.
    fn validate(&self, params: &ModelParams, distance_km: Option<f64>) -> Result<(), PropModelError> {
        let _ = (params, distance_km);
        Ok(())
    }

    /// Checked forward computation: verifies the declared parameters
    /// are present and in range, then delegates to
    /// [`Self::pathloss_coefficient_unchecked`].
    fn pathloss_coefficient(
        &self,
        distance_km: f64,
        params: &ModelParams,
    ) -> Result<f64, PropModelError> {
        self.require_parameters(params)?;
        self.validate(params, Some(distance_km))?;
        self.pathloss_coefficient_unchecked(distance_km, params)
    }

    /// Checked inverse computation: verifies the declared parameters
    /// are present and in range, then delegates to
    /// [`Self::distance_unchecked`].
    fn distance(&self, pathloss: f64, params: &ModelParams) -> Result<f64, PropModelError> {
        self.require_parameters(params)?;
        self.validate(params, None)?;
        self.distance_unchecked(pathloss, params)
    }

    /// Verifies every parameter this model declares as required is
    /// present in `params`.
    fn require_parameters(&self, params: &ModelParams) -> Result<(), PropModelError> {
        if self.requires_frequency() && params.frequency_mhz.is_none() {
            return Err(PropModelError::MissingParameter("frequency"));
        }
        if self.requires_tx_height() && params.tx_height_m.is_none() {
            return Err(PropModelError::MissingParameter("tx_height"));
        }
        if self.requires_rx_height() && params.rx_height_m.is_none() {
            return Err(PropModelError::MissingParameter("rx_height"));
        }
        if self.requires_tx_location() && params.tx_location.is_none() {
            return Err(PropModelError::MissingParameter("tx_location"));
        }
        if self.requires_rx_location() && params.rx_location.is_none() {
            return Err(PropModelError::MissingParameter("rx_location"));
        }
        if self.requires_curve() && params.curve.is_none() {
            return Err(PropModelError::MissingParameter("curve"));
        }
        Ok(())
    }

    /// Pre-check for hot loops that call the unchecked entry points.
    fn params_are_sufficient(&self, params: &ModelParams) -> bool {
        self.require_parameters(params).is_ok()
    }
}
