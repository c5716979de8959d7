//! # TV whitespace evaluation
//!
//! Determines where and on which channels unlicensed whitespace
//! devices may operate under the FCC's 2012 TVWS rules. The
//! [`Ruleset`] evaluates a (location, channel, device) triple against
//! the protected entities of a [`Region`]: TV stations (propagation
//! modeled contours plus separation margins), land-mobile exclusion
//! zones, and radio-astronomy sites. Whole-grid availability maps are
//! rendered into [`datamap::DataMap2D`] rasters.

mod boundary;
mod collection;
mod device;
mod entities;
mod error;
pub mod region;
mod ruleset;

pub use crate::{
    boundary::{Boundary, CONTINENTAL_US_OMITTED},
    collection::EntityCollection,
    device::{Device, DEFAULT_DEVICE_HAAT_M, PORTABLE_DEVICE_HAAT_M},
    entities::{
        BoundingBox, PlmrsExclusion, PlmrsRecord, ProtectedEntity, RasGeometry, RasRecord,
        RasSite, TvStation, TvStationRecord, TxType, PLMRS_MAX_PROTECTED_RADIUS_KM,
        RAS_MAX_PROTECTED_RADIUS_KM, TV_MAX_PROTECTED_RADIUS_KM,
    },
    error::WsError,
    region::Region,
    ruleset::{Ruleset, RAS_EXCLUSION_RADIUS_KM},
};
