use thiserror::Error;

#[derive(Error, Debug)]
pub enum FcurvesError {
    #[error("distance exceeds greatest value on curves")]
    InvalidDistance,

    #[error("invalid channel number")]
    InvalidChannel,

    #[error("invalid curve selected")]
    InvalidCurve,

    #[error("invalid switch value")]
    InvalidSwitch,

    #[error("ERP less than or equal to 0 kilowatts")]
    NonPositiveErp,

    #[error("invalid distance value for forward curve lookup")]
    InvalidDistanceInput,

    #[error("unrecognized curve status flag '{0}'")]
    UnknownFlag(String),
}

impl FcurvesError {
    /// Decodes the legacy two-character status flag.
    ///
    /// A clear flag passes `val` through. Warning flags (free-space
    /// fallback, HAAT clamped) are logged and also pass `val` through.
    /// Anything not in the published flag table is a fatal
    /// configuration error.
    pub fn from_flag<T>(flag: [u8; 2], val: T) -> Result<T, FcurvesError> {
        let err = match &flag {
            b"  " => return Ok(val),
            b"A1" => {
                log::warn!("f-curves: free space equation used to find requested argument");
                return Ok(val);
            }
            b"A7" => {
                log::warn!("f-curves: HAAT less than 30 meters, set to 30 meters");
                return Ok(val);
            }
            b"A8" => {
                log::warn!("f-curves: HAAT exceeds 1600 meters, set to 1600 meters");
                return Ok(val);
            }
            b"A2" => FcurvesError::InvalidDistance,
            b"A3" => FcurvesError::InvalidChannel,
            b"A4" => FcurvesError::InvalidCurve,
            b"A5" => FcurvesError::InvalidSwitch,
            b"A6" => FcurvesError::NonPositiveErp,
            b"A9" => FcurvesError::InvalidDistanceInput,
            other => FcurvesError::UnknownFlag(String::from_utf8_lossy(other).into_owned()),
        };
        Err(err)
    }
}
