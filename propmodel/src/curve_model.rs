//! Empirical curve-table model.

use crate::{units, ModelParams, PropModelError, PropagationModel};
use fcurves::{Band, Curve, FcurvesError, MAX_CURVE_KM};

/// 1 W expressed in the kilowatts the curve routines take. The
/// received field for a 1 W transmitter, converted to Watts, IS the
/// pathloss coefficient.
const ONE_WATT_KW: f64 = 1e-3;

/// Pathloss model backed by the F-curve lookups.
///
/// This is the terrain-free variant: the transmitter's reported HAAT
/// is used as-is, so only frequency, transmitter height, and a curve
/// family are required.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveModel;

impl CurveModel {
    pub fn new() -> Self {
        Self
    }

    fn band(params: &ModelParams) -> Result<(Band, f64), PropModelError> {
        let freq = params
            .frequency_mhz
            .ok_or(PropModelError::MissingParameter("frequency"))?;
        let band = Band::from_frequency_mhz(freq)
            .ok_or(PropModelError::UnsupportedFrequency(freq))?;
        Ok((band, freq))
    }

    fn curve_inputs(params: &ModelParams) -> Result<(f64, i32, Curve, f64), PropModelError> {
        let (band, freq) = Self::band(params)?;
        let haat = params
            .tx_height_m
            .ok_or(PropModelError::MissingParameter("tx_height"))?;
        let curve = params.curve.ok_or(PropModelError::MissingParameter("curve"))?;
        Ok((haat, band.proxy_channel(), curve, freq))
    }
}

fn lift(err: FcurvesError) -> PropModelError {
    match err {
        FcurvesError::InvalidDistance => PropModelError::InvalidDistance,
        other => PropModelError::Curves(other),
    }
}

impl PropagationModel for CurveModel {
    fn requires_tx_height(&self) -> bool {
        true
    }

    fn requires_frequency(&self) -> bool {
        true
    }

    fn requires_curve(&self) -> bool {
        true
    }

    fn validate(&self, params: &ModelParams, distance_km: Option<f64>) -> Result<(), PropModelError> {
        Self::band(params)?;
        if let Some(d) = distance_km {
            if d > MAX_CURVE_KM {
                return Err(PropModelError::InvalidDistance);
            }
        }
        Ok(())
    }

    fn pathloss_coefficient_unchecked(
        &self,
        distance_km: f64,
        params: &ModelParams,
    ) -> Result<f64, PropModelError> {
        let (haat, channel, curve, freq) = Self::curve_inputs(params)?;
        let field_dbu =
            fcurves::field_strength_dbu(ONE_WATT_KW, haat, channel, curve, distance_km)
                .map_err(lift)?;
        units::dbu_to_watts(field_dbu, freq)
    }

    fn distance_unchecked(
        &self,
        pathloss: f64,
        params: &ModelParams,
    ) -> Result<f64, PropModelError> {
        let (haat, channel, curve, freq) = Self::curve_inputs(params)?;
        let field_dbu = units::watts_to_dbu(pathloss, freq)?;
        fcurves::distance_km(ONE_WATT_KW, haat, channel, curve, field_dbu).map_err(lift)
    }
}

#[cfg(test)]
mod tests {
    use super::CurveModel;
    use crate::{Curve, ModelParams, PropModelError, PropagationModel};

    fn uhf_params() -> ModelParams {
        ModelParams::new()
            .frequency(640.0)
            .tx_height(100.0)
            .curve(Curve::F5090)
    }

    #[test]
    fn test_roundtrip_10km_uhf() {
        let model = CurveModel::new();
        let params = uhf_params();
        let pathloss = model.pathloss_coefficient(10.0, &params).unwrap();
        let back = model.distance(pathloss, &params).unwrap();
        assert!(((back - 10.0) / 10.0).abs() <= 1e-5, "got {back} km");
    }

    #[test]
    fn test_roundtrip_all_supported_combinations() {
        let model = CurveModel::new();
        for freq in [60.0, 200.0, 640.0] {
            for haat in [30.0, 100.0, 1000.0] {
                for curve in [Curve::F5050, Curve::F5010, Curve::F5090] {
                    let params = ModelParams::new()
                        .frequency(freq)
                        .tx_height(haat)
                        .curve(curve);
                    for d in [1.5, 20.0, 300.0] {
                        let pathloss = model.pathloss_coefficient(d, &params).unwrap();
                        let back = model.distance(pathloss, &params).unwrap();
                        assert!(
                            ((back - d) / d).abs() <= 1e-5,
                            "{d} km -> {back} km at {freq} MHz, haat {haat}, {curve:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_missing_parameters_rejected() {
        let model = CurveModel::new();
        let missing_curve = ModelParams::new().frequency(640.0).tx_height(100.0);
        assert!(matches!(
            model.pathloss_coefficient(10.0, &missing_curve),
            Err(PropModelError::MissingParameter("curve"))
        ));
        let missing_height = ModelParams::new().frequency(640.0).curve(Curve::F5050);
        assert!(matches!(
            model.distance(1e-10, &missing_height),
            Err(PropModelError::MissingParameter("tx_height"))
        ));
    }

    #[test]
    fn test_params_are_sufficient() {
        let model = CurveModel::new();
        assert!(model.params_are_sufficient(&uhf_params()));
        assert!(!model.params_are_sufficient(&ModelParams::new().frequency(640.0)));
    }

    #[test]
    fn test_unsupported_frequency_rejected() {
        let model = CurveModel::new();
        let params = ModelParams::new()
            .frequency(1000.0)
            .tx_height(100.0)
            .curve(Curve::F5050);
        assert!(matches!(
            model.pathloss_coefficient(10.0, &params),
            Err(PropModelError::UnsupportedFrequency(_))
        ));
    }

    #[test]
    fn test_invalid_distance_is_distinguishable() {
        let model = CurveModel::new();
        assert!(matches!(
            model.pathloss_coefficient(301.0, &uhf_params()),
            Err(PropModelError::InvalidDistance)
        ));
        // A pathloss far below anything on the curves maps past their
        // greatest distance.
        assert!(matches!(
            model.distance(1e-30, &uhf_params()),
            Err(PropModelError::InvalidDistance)
        ));
    }
}
