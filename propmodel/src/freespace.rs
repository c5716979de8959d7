use crate::{ModelParams, PropModelError, PropagationModel, C};

/// Analytic free-space pathloss, `(lambda / 4 pi d)^2`.
///
/// Independent of heights, locations, and curve family; only the
/// frequency is required.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeSpaceModel;

impl FreeSpaceModel {
    pub fn new() -> Self {
        Self
    }

    fn wavelength_m(params: &ModelParams) -> Result<f64, PropModelError> {
        let freq = params
            .frequency_mhz
            .ok_or(PropModelError::MissingParameter("frequency"))?;
        Ok(C / (freq * 1e6))
    }
}

impl PropagationModel for FreeSpaceModel {
    fn requires_frequency(&self) -> bool {
        true
    }

    fn pathloss_coefficient_unchecked(
        &self,
        distance_km: f64,
        params: &ModelParams,
    ) -> Result<f64, PropModelError> {
        let lambda = Self::wavelength_m(params)?;
        let d_m = distance_km * 1e3;
        let ratio = lambda / (4.0 * std::f64::consts::PI * d_m);
        Ok(ratio * ratio)
    }

    fn distance_unchecked(
        &self,
        pathloss: f64,
        params: &ModelParams,
    ) -> Result<f64, PropModelError> {
        let lambda = Self::wavelength_m(params)?;
        let d_m = lambda / (4.0 * std::f64::consts::PI * pathloss.sqrt());
        Ok(d_m / 1e3)
    }
}

#[cfg(test)]
mod tests {
    use super::FreeSpaceModel;
    use crate::{ModelParams, PropModelError, PropagationModel};
    use approx::assert_relative_eq;

    #[test]
    fn test_roundtrip() {
        let model = FreeSpaceModel::new();
        let params = ModelParams::new().frequency(640.0);
        for d in [0.05, 1.0, 10.0, 500.0] {
            let pathloss = model.pathloss_coefficient(d, &params).unwrap();
            let back = model.distance(pathloss, &params).unwrap();
            assert_relative_eq!(back, d, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_pathloss_falls_with_square_of_distance() {
        let model = FreeSpaceModel::new();
        let params = ModelParams::new().frequency(100.0);
        let near = model.pathloss_coefficient(1.0, &params).unwrap();
        let far = model.pathloss_coefficient(10.0, &params).unwrap();
        assert_relative_eq!(near / far, 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_known_value_at_1km_300mhz() {
        // lambda = 1 m at ~300 MHz, so the ratio at 1 km is
        // 1 / (4 pi 1000).
        let model = FreeSpaceModel::new();
        let params = ModelParams::new().frequency(299.792_458);
        let pathloss = model.pathloss_coefficient(1.0, &params).unwrap();
        let expected = (1.0f64 / (4.0 * std::f64::consts::PI * 1000.0)).powi(2);
        assert_relative_eq!(pathloss, expected, max_relative = 1e-12);
    }

    #[test]
    fn test_requires_frequency() {
        let model = FreeSpaceModel::new();
        assert!(matches!(
            model.pathloss_coefficient(1.0, &ModelParams::new()),
            Err(PropModelError::MissingParameter("frequency"))
        ));
    }
}
