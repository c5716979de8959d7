//! Band-dependent unit conversions between dBu field strength, dBm,
//! and Watts.
//!
//! The dBu/dBm offsets come from OET Bulletin 69: a flat offset per
//! VHF band, and a frequency-dependent correction in UHF referenced
//! to 615 MHz.

use crate::PropModelError;
use fcurves::Band;

fn band_for(freq_mhz: f64) -> Result<Band, PropModelError> {
    Band::from_frequency_mhz(freq_mhz).ok_or(PropModelError::UnsupportedFrequency(freq_mhz))
}

/// Converts a field strength in dBu to the equivalent received power
/// in dBm at `freq_mhz`.
pub fn dbu_to_dbm(dbu: f64, freq_mhz: f64) -> Result<f64, PropModelError> {
    let offset = match band_for(freq_mhz)? {
        Band::LowVhf => -111.8,
        Band::HighVhf => -120.8,
        Band::Uhf => -130.8 + 20.0 * (615.0 / freq_mhz).log10(),
    };
    Ok(dbu + offset)
}

/// Inverse of [`dbu_to_dbm`].
pub fn dbm_to_dbu(dbm: f64, freq_mhz: f64) -> Result<f64, PropModelError> {
    let offset = match band_for(freq_mhz)? {
        Band::LowVhf => 111.8,
        Band::HighVhf => 120.8,
        Band::Uhf => 130.8 - 20.0 * (615.0 / freq_mhz).log10(),
    };
    Ok(dbm + offset)
}

pub fn dbm_to_watts(dbm: f64) -> f64 {
    1e-3 * 10f64.powf(dbm / 10.0)
}

pub fn watts_to_dbm(watts: f64) -> f64 {
    10.0 * (1e3 * watts).log10()
}

pub fn dbu_to_watts(dbu: f64, freq_mhz: f64) -> Result<f64, PropModelError> {
    Ok(dbm_to_watts(dbu_to_dbm(dbu, freq_mhz)?))
}

pub fn watts_to_dbu(watts: f64, freq_mhz: f64) -> Result<f64, PropModelError> {
    dbm_to_dbu(watts_to_dbm(watts), freq_mhz)
}
