use fcurves::FcurvesError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PropModelError {
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("unsupported frequency {0} MHz")]
    UnsupportedFrequency(f64),

    /// Distance beyond the model's valid range. Callers that want a
    /// free-space fallback match on this variant specifically.
    #[error("distance is outside the model's valid range")]
    InvalidDistance,

    #[error("{0}")]
    Curves(#[from] FcurvesError),
}
