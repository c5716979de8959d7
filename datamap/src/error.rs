use std::fmt;
use thiserror::Error;

/// Grid axis, used to qualify coordinate errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Latitude,
    Longitude,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Latitude => write!(f, "latitude"),
            Axis::Longitude => write!(f, "longitude"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DataMapError {
    #[error("max {axis} must not be less than min: ({min}, {max})")]
    Bounds { axis: Axis, min: f64, max: f64 },

    #[error("{axis} division count {count} is too small (minimum 2)")]
    Divisions { axis: Axis, count: usize },

    #[error("{value} is not a {axis} sample point of this grid")]
    CoordLookup { axis: Axis, value: f64 },

    #[error("grids are not comparable")]
    Incomparable,

    #[error("requested region does not overlap the grid")]
    NoOverlap,

    #[error("requested region exceeds the grid bounds")]
    OutOfBounds,

    #[error("unknown layer '{0}'")]
    UnknownLayer(String),

    #[error("duplicate layer '{0}'")]
    DuplicateLayer(String),

    #[error("a layer stack needs at least one layer")]
    EmptyStack,

    #[error("expected {expected} layer values, got {got}")]
    LayerValueCount { expected: usize, got: usize },

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data map blob")]
    Blob,
}
