/// Device HAAT assumed when none is specified, in meters.
pub const DEFAULT_DEVICE_HAAT_M: f64 = 10.0;

/// HAAT assumed for portable devices in TV protection computations,
/// in meters.
pub const PORTABLE_DEVICE_HAAT_M: f64 = 1.0;

/// A whitespace device seeking channel access.
#[derive(Debug, Clone, Copy)]
pub struct Device {
    portable: bool,
    haat_m: Option<f64>,
    has_geolocation: Option<bool>,
}

impl Device {
    pub fn new(portable: bool, haat_m: Option<f64>, has_geolocation: Option<bool>) -> Self {
        Self {
            portable,
            haat_m,
            has_geolocation,
        }
    }

    pub fn fixed(haat_m: f64) -> Self {
        Self::new(false, Some(haat_m), Some(true))
    }

    pub fn portable() -> Self {
        Self::new(true, None, Some(true))
    }

    pub fn is_portable(&self) -> bool {
        self.portable
    }

    pub fn has_geolocation(&self) -> Option<bool> {
        self.has_geolocation
    }

    /// The device HAAT used in protection computations. Portable
    /// devices are evaluated at [`PORTABLE_DEVICE_HAAT_M`]; fixed
    /// devices without a stated HAAT at [`DEFAULT_DEVICE_HAAT_M`].
    pub fn haat_m(&self) -> f64 {
        if self.portable {
            PORTABLE_DEVICE_HAAT_M
        } else {
            self.haat_m.unwrap_or(DEFAULT_DEVICE_HAAT_M)
        }
    }
}
