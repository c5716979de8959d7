//! FCC F-curve field-strength and distance lookups for the US TV
//! bands.
//!
//! The published curves give field strength versus distance for a
//! transmitter of known ERP and HAAT, keyed by one of three
//! percentage-exceedance families (F(50,50), F(50,10), F(50,90)), and
//! are invertible: given a field strength, they yield the distance at
//! which the field falls to that level.
//!
//! # References
//!
//! 1. [FCC R-6602: TV and FM propagation curves](https://transition.fcc.gov/oet/info/documents/reports/R-6602.pdf)
//! 1. [FCC OET Bulletin 69](https://transition.fcc.gov/Bureaus/Engineering_Technology/Documents/bulletins/oet69/oet69.pdf)

mod curves;
mod error;
mod params;

pub use crate::{
    curves::{MAX_CURVE_KM, MAX_HAAT_M, MIN_CURVE_KM, MIN_HAAT_M},
    error::FcurvesError,
    params::{Band, Curve, HIGH_VHF_MHZ, LOW_VHF_MHZ, UHF_MHZ},
};
use crate::curves::Switch;

/// Returns the field strength (dBu) of a transmitter of `erp_kw` and
/// `haat_m` at `distance_km`, on the given curve family.
///
/// `channel` is a US TV channel number and selects the band (use
/// [`Band::proxy_channel`] when starting from a frequency). Distances
/// below 1.5 km fall back to the free-space equation with a logged
/// warning; distances above 300 km are an [`FcurvesError::InvalidDistance`].
pub fn field_strength_dbu(
    erp_kw: f64,
    haat_m: f64,
    channel: i32,
    curve: Curve,
    distance_km: f64,
) -> Result<f64, FcurvesError> {
    let mut field = -1.0;
    let mut distance = distance_km;
    // The legacy routines do not reset the flag on success.
    let mut flag = *b"  ";
    match curve {
        Curve::F5050 | Curve::F5010 => curves::tvfmfs_metric(
            erp_kw,
            haat_m,
            channel,
            &mut field,
            &mut distance,
            Switch::FieldFromDistance,
            curve,
            &mut flag,
        ),
        Curve::F5090 => curves::f5090(
            erp_kw,
            haat_m,
            channel,
            &mut field,
            &mut distance,
            Switch::FieldFromDistance,
            &mut flag,
        ),
    }
    FcurvesError::from_flag(flag, field)
}

/// Returns the distance (km) at which the field of a transmitter of
/// `erp_kw` and `haat_m` falls to `field_dbu`, on the given curve
/// family.
///
/// Field strengths stronger than the 1.5 km curve value resolve via
/// the free-space equation with a logged warning; field strengths
/// weaker than the 300 km curve value are an
/// [`FcurvesError::InvalidDistance`].
pub fn distance_km(
    erp_kw: f64,
    haat_m: f64,
    channel: i32,
    curve: Curve,
    field_dbu: f64,
) -> Result<f64, FcurvesError> {
    let mut field = field_dbu;
    let mut distance = 100.0;
    let mut flag = *b"  ";
    match curve {
        Curve::F5050 | Curve::F5010 => curves::tvfmfs_metric(
            erp_kw,
            haat_m,
            channel,
            &mut field,
            &mut distance,
            Switch::DistanceFromField,
            curve,
            &mut flag,
        ),
        Curve::F5090 => curves::f5090(
            erp_kw,
            haat_m,
            channel,
            &mut field,
            &mut distance,
            Switch::DistanceFromField,
            &mut flag,
        ),
    }
    FcurvesError::from_flag(flag, distance)
}
