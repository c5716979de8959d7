use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    /// Channel query outside the region's channel plan.
    #[error("unsupported channel number {0}")]
    InvalidChannel(u16),

    /// Record with a latitude or longitude outside valid ranges.
    #[error("coordinate out of range: ({latitude}, {longitude})")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Transmitter-type code not in the digital, analog, or ignored
    /// tables.
    #[error("unknown transmitter type code {0:?}")]
    UnknownTransmitterType(String),

    /// Rectangle radio-astronomy record without both deviations.
    #[error("rectangle radio astronomy site is missing a deviation")]
    MissingDeviation,

    /// Non-positive transmitter power.
    #[error("transmitter ERP must be positive, got {0} W")]
    InvalidErp(f64),

    #[error(transparent)]
    DataMap(#[from] datamap::DataMapError),

    #[error(transparent)]
    Propagation(#[from] propmodel::PropModelError),
}
