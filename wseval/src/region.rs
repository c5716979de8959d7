//! The United States region: boundary, channel plan, and protected
//! entities.

use crate::{
    boundary::Boundary,
    collection::EntityCollection,
    entities::{PlmrsExclusion, RasSite, TvStation},
    error::WsError,
};
use datamap::DataMap2D;
use geo::Point;

/// Width of a US TV channel in Hz.
pub const CHANNEL_WIDTH_HZ: f64 = 6e6;

/// Two channels are adjacent in frequency when their band edges meet
/// within this tolerance (MHz).
const ADJACENCY_TOLERANCE_MHZ: f64 = 0.001;

/// US channels 2 through 51.
pub fn channel_list() -> Vec<u16> {
    (2..=51).collect()
}

/// Channels eligible for whitespace operation: 2, 5-36, 38-51.
pub fn tvws_channel_list() -> Vec<u16> {
    std::iter::once(2).chain(5..=36).chain(38..=51).collect()
}

/// Channels eligible for portable whitespace operation: 21-36, 38-51.
pub fn portable_tvws_channel_list() -> Vec<u16> {
    (21..=36).chain(38..=51).collect()
}

/// Lower and upper band edges of a US TV channel in MHz.
pub fn frequency_bounds(channel: u16) -> Result<(f64, f64), WsError> {
    let width_mhz = CHANNEL_WIDTH_HZ / 1e6;
    let low = match channel {
        2..=4 => f64::from(channel - 2) * width_mhz + 54.0,
        5..=6 => f64::from(channel - 5) * width_mhz + 76.0,
        7..=13 => f64::from(channel - 7) * width_mhz + 174.0,
        14..=69 => f64::from(channel - 14) * width_mhz + 470.0,
        _ => return Err(WsError::InvalidChannel(channel)),
    };
    Ok((low, low + width_mhz))
}

/// Center frequency of a US TV channel in MHz.
pub fn center_frequency(channel: u16) -> Result<f64, WsError> {
    let (low, high) = frequency_bounds(channel)?;
    Ok((low + high) / 2.0)
}

/// True when the two channels abut in frequency. Channel numbering
/// alone is not enough: e.g. channels 4 and 5 are numerically
/// adjacent but separated in frequency. Undefined channels are never
/// adjacent.
pub fn channels_adjacent_in_frequency(chan1: u16, chan2: u16) -> bool {
    let (Ok((low1, high1)), Ok((low2, high2))) =
        (frequency_bounds(chan1), frequency_bounds(chan2))
    else {
        return false;
    };
    (low1 - high2).abs() < ADJACENCY_TOLERANCE_MHZ
        || (low2 - high1).abs() < ADJACENCY_TOLERANCE_MHZ
}

/// Channels on which an entity assigned to `channel` can affect
/// whitespace availability: the channel itself plus any neighbor
/// adjacent in frequency.
pub fn cochannel_and_first_adjacent(channel: u16) -> Vec<u16> {
    let mut affected = vec![channel];
    for adjacent in [channel.wrapping_sub(1), channel + 1] {
        if channels_adjacent_in_frequency(adjacent, channel) {
            affected.push(adjacent);
        }
    }
    affected
}

/// A geographic region with its boundary and protected entities.
#[derive(Debug, Clone)]
pub struct Region {
    boundary: Boundary,
    tv_stations: EntityCollection<TvStation>,
    plmrs: EntityCollection<PlmrsExclusion>,
    ras_sites: EntityCollection<RasSite>,
}

impl Region {
    pub fn new(boundary: Boundary) -> Self {
        Self {
            boundary,
            tv_stations: EntityCollection::new(channel_list()),
            plmrs: EntityCollection::new(channel_list()),
            ras_sites: EntityCollection::new(channel_list()),
        }
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn tv_stations(&self) -> &EntityCollection<TvStation> {
        &self.tv_stations
    }

    pub fn tv_stations_mut(&mut self) -> &mut EntityCollection<TvStation> {
        &mut self.tv_stations
    }

    pub fn plmrs(&self) -> &EntityCollection<PlmrsExclusion> {
        &self.plmrs
    }

    pub fn plmrs_mut(&mut self) -> &mut EntityCollection<PlmrsExclusion> {
        &mut self.plmrs
    }

    pub fn ras_sites(&self) -> &EntityCollection<RasSite> {
        &self.ras_sites
    }

    pub fn ras_sites_mut(&mut self) -> &mut EntityCollection<RasSite> {
        &mut self.ras_sites
    }

    /// Renders the boundary as a mask on the template's grid: 1.0
    /// inside the region, 0.0 outside.
    pub fn membership_map(&self, template: &DataMap2D) -> DataMap2D {
        let mut mask = DataMap2D::empty_like(template);
        mask.update_all(|lat, lon, _, _, _| {
            Some(if self.boundary.contains(Point::new(lon, lat)) {
                1.0
            } else {
                0.0
            })
        });
        mask
    }
}
