//! Whitespace determination under the FCC 2012 rules.

use crate::{
    device::Device,
    entities::{PlmrsExclusion, ProtectedEntity, RasSite, TvStation},
    error::WsError,
    region::{self, Region},
};
use datamap::DataMap2D;
use geo::{HaversineDistance, Point};
use log::{info, warn};
use propmodel::{units, Curve, CurveModel, ModelParams, PropagationModel};
use rayon::prelude::*;

/// Exclusion radius around point radio-astronomy sites, in km
/// (47 CFR 15.712(h)).
pub const RAS_EXCLUSION_RADIUS_KM: f64 = 2.4;

/// The FCC 2012 whitespace rules, parameterized over the propagation
/// model used to derive TV protection contours.
#[derive(Debug, Clone)]
pub struct Ruleset<M> {
    model: M,
}

impl Ruleset<CurveModel> {
    /// The rules with their default propagation model.
    pub fn fcc2012() -> Self {
        Self::new(CurveModel::new())
    }
}

impl<M: PropagationModel + Sync> Ruleset<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// True if `device` may operate on `channel` at all: the channel
    /// must be whitespace-eligible, and portable devices are further
    /// restricted to the portable list.
    pub fn is_permissible_channel(&self, channel: u16, device: &Device) -> bool {
        if !region::tvws_channel_list().contains(&channel) {
            return false;
        }
        if device.is_portable() && !region::portable_tvws_channel_list().contains(&channel) {
            return false;
        }
        true
    }

    /// Curve family used to model a TV station's contour: F(50,90)
    /// for digital, F(50,50) for analog.
    pub fn tv_curve(&self, is_digital: bool) -> Curve {
        if is_digital {
            Curve::F5090
        } else {
            Curve::F5050
        }
    }

    /// Field strength defining a TV station's protected contour, in
    /// dBu (47 CFR 15.712(a)(1)). Frequencies outside the TV bands
    /// log a warning and use the UHF value.
    pub fn tv_target_field_strength_dbu(&self, is_digital: bool, freq_mhz: f64) -> f64 {
        let (low_vhf, high_vhf, uhf) = if is_digital {
            (28.0, 36.0, 41.0)
        } else {
            (47.0, 56.0, 64.0)
        };
        match freq_mhz {
            f if (54.0..=88.0).contains(&f) => low_vhf,
            f if (174.0..=216.0).contains(&f) => high_vhf,
            f if (470.0..=890.0).contains(&f) => uhf,
            f => {
                warn!("unsupported frequency {f} MHz, defaulting to UHF parameters");
                uhf
            }
        }
    }

    /// Cochannel separation distance beyond a TV station's protected
    /// contour, keyed by device HAAT (47 CFR 15.712(a)(2)). HAAT
    /// above the table logs a warning and uses the 250 m value.
    pub fn tv_cochannel_separation_km(&self, device_haat_m: f64) -> f64 {
        match device_haat_m {
            h if h < 3.0 => 4.0,
            h if h < 10.0 => 7.3,
            h if h < 30.0 => 11.1,
            h if h < 50.0 => 14.3,
            h if h < 75.0 => 18.0,
            h if h < 100.0 => 21.1,
            h if h < 150.0 => 25.3,
            h if h < 200.0 => 28.5,
            h if h <= 250.0 => 31.2,
            h => {
                warn!("device HAAT {h} m above the separation table, using the 250 m value");
                31.2
            }
        }
    }

    /// Adjacent-channel separation distance beyond a TV station's
    /// protected contour, keyed by device HAAT (47 CFR 15.712(a)(2)).
    pub fn tv_adjacent_separation_km(&self, device_haat_m: f64) -> f64 {
        match device_haat_m {
            h if h < 3.0 => 0.4,
            h if h < 10.0 => 0.7,
            h if h < 30.0 => 1.2,
            h if h < 50.0 => 1.8,
            h if h < 75.0 => 2.0,
            h if h < 100.0 => 2.1,
            h if h < 150.0 => 2.2,
            h if h < 200.0 => 2.3,
            h if h <= 250.0 => 2.4,
            h => {
                warn!("device HAAT {h} m above the separation table, using the 250 m value");
                2.4
            }
        }
    }

    /// Exclusion radius around a land-mobile entry, in km
    /// (47 CFR 15.712(d)).
    pub fn plmrs_exclusion_radius_km(&self, is_metro: bool, is_cochannel: bool) -> f64 {
        match (is_metro, is_cochannel) {
            (true, true) => 134.0,
            (true, false) => 131.0,
            (false, true) => 54.0,
            (false, false) => 51.0,
        }
    }

    /// Radius of the station's protected contour in the direction of
    /// `device_location`: the distance at which its field falls to
    /// the target field strength.
    pub fn tv_protected_radius_km(
        &self,
        station: &TvStation,
        device_location: Point<f64>,
    ) -> Result<f64, WsError> {
        let freq = region::center_frequency(station.channel_number())?;
        let curve = self.tv_curve(station.is_digital());
        let target_dbu = self.tv_target_field_strength_dbu(station.is_digital(), freq);

        let desired_watts = units::dbu_to_watts(target_dbu, freq)?;
        let pathloss = desired_watts / station.erp_watts();
        let params = ModelParams::new()
            .frequency(freq)
            .tx_height(station.haat_m())
            .curve(curve)
            .tx_location(station.location())
            .rx_location(device_location);
        Ok(self.model.distance(pathloss, &params)?)
    }

    /// Whether `station` is protected against cochannel operation at
    /// `device_location`. Does not check the device's channel.
    pub fn cochannel_tv_station_is_protected(
        &self,
        station: &TvStation,
        device_location: Point<f64>,
        device_haat_m: f64,
    ) -> Result<bool, WsError> {
        if !station.location_in_bounding_box(device_location) {
            return Ok(false);
        }
        let actual_km = station.location().haversine_distance(&device_location) / 1e3;
        let protection_km = self.tv_protected_radius_km(station, device_location)?;
        let separation_km = self.tv_cochannel_separation_km(device_haat_m);
        Ok(actual_km <= protection_km + separation_km)
    }

    /// Whether `station` is protected against adjacent-channel
    /// operation at `device_location`. Does not check the device's
    /// channel.
    pub fn adjacent_channel_tv_station_is_protected(
        &self,
        station: &TvStation,
        device_location: Point<f64>,
        device_haat_m: f64,
    ) -> Result<bool, WsError> {
        if !station.location_in_bounding_box(device_location) {
            return Ok(false);
        }
        let actual_km = station.location().haversine_distance(&device_location) / 1e3;
        let protection_km = self.tv_protected_radius_km(station, device_location)?;
        let separation_km = self.tv_adjacent_separation_km(device_haat_m);
        Ok(actual_km <= protection_km + separation_km)
    }

    /// Whitespace determination considering TV station protections
    /// only. Does not test region membership.
    pub fn location_is_whitespace_tv_only(
        &self,
        region: &Region,
        location: Point<f64>,
        channel: u16,
        device: &Device,
    ) -> Result<bool, WsError> {
        let device_haat = device.haat_m();

        for station in region.tv_stations().entities_on_channel(channel)? {
            if self.cochannel_tv_station_is_protected(station, location, device_haat)? {
                return Ok(false);
            }
        }

        // Portable devices are not subject to adjacent-channel
        // exclusions.
        if device.is_portable() {
            return Ok(true);
        }

        for adjacent in adjacent_channels(channel) {
            for station in region.tv_stations().entities_on_channel(adjacent)? {
                if self.adjacent_channel_tv_station_is_protected(station, location, device_haat)? {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }

    /// Whether `plmrs` is protected at `location` against operation
    /// on `device_channel`.
    pub fn plmrs_is_protected(
        &self,
        plmrs: &PlmrsExclusion,
        location: Point<f64>,
        device_channel: u16,
    ) -> bool {
        if !plmrs.location_in_bounding_box(location) {
            return false;
        }
        let Some(plmrs_channel) = plmrs.channel() else {
            return false;
        };
        let is_cochannel = plmrs_channel == device_channel;

        // Only cochannel and first-adjacent operation is excluded.
        if !is_cochannel && !region::channels_adjacent_in_frequency(plmrs_channel, device_channel)
        {
            return false;
        }

        let actual_km = plmrs.location().haversine_distance(&location) / 1e3;
        actual_km <= self.plmrs_exclusion_radius_km(plmrs.is_metro(), is_cochannel)
    }

    /// Whitespace determination considering land-mobile protections
    /// only. Does not test region membership.
    pub fn location_is_whitespace_plmrs_only(
        &self,
        region: &Region,
        location: Point<f64>,
        channel: u16,
    ) -> Result<bool, WsError> {
        for entry in region.plmrs().entities_on_channel(channel)? {
            if self.plmrs_is_protected(entry, location, channel) {
                return Ok(false);
            }
        }
        for adjacent in adjacent_channels(channel) {
            for entry in region.plmrs().entities_on_channel(adjacent)? {
                if self.plmrs_is_protected(entry, location, channel) {
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    /// Whether `site` is protected at `location`. Radio-astronomy
    /// protection is channel-agnostic.
    pub fn ras_site_is_protected(&self, site: &RasSite, location: Point<f64>) -> bool {
        if !site.location_in_bounding_box(location) {
            return false;
        }
        if site.is_point() {
            let actual_km = site.location().haversine_distance(&location) / 1e3;
            actual_km <= RAS_EXCLUSION_RADIUS_KM
        } else {
            site.location_in_protected_rectangle(location)
        }
    }

    /// Whitespace determination considering radio-astronomy
    /// protections only. Does not test region membership.
    pub fn location_is_whitespace_ras_only(&self, region: &Region, location: Point<f64>) -> bool {
        !region
            .ras_sites()
            .iter()
            .any(|site| self.ras_site_is_protected(site, location))
    }

    /// Full whitespace determination for one (location, channel,
    /// device) triple. Does not test region membership.
    pub fn location_is_whitespace(
        &self,
        region: &Region,
        location: Point<f64>,
        channel: u16,
        device: &Device,
    ) -> Result<bool, WsError> {
        if !self.is_permissible_channel(channel, device) {
            return Ok(false);
        }
        if !self.location_is_whitespace_tv_only(region, location, channel, device)? {
            return Ok(false);
        }
        if !self.location_is_whitespace_plmrs_only(region, location, channel)? {
            return Ok(false);
        }
        Ok(self.location_is_whitespace_ras_only(region, location))
    }

    /// Zeroes the whole map if `channel` is not permissible for
    /// `device`.
    pub fn apply_channel_restrictions_to_map(
        &self,
        map: &mut DataMap2D,
        channel: u16,
        device: &Device,
    ) {
        if !self.is_permissible_channel(channel, device) {
            map.reset_all(0.0);
        }
    }

    /// Clears cells protected by a TV station. Cells already 0.0 (or
    /// unset) are skipped.
    pub fn apply_tv_exclusions_to_map(
        &self,
        region: &Region,
        map: &mut DataMap2D,
        channel: u16,
        device: &Device,
    ) -> Result<(), WsError> {
        info!("applying TV exclusions on channel {channel}");
        sweep(map, |location| {
            self.location_is_whitespace_tv_only(region, location, channel, device)
        })
    }

    /// Clears cells protected by a land-mobile entry. Cells already
    /// 0.0 (or unset) are skipped.
    pub fn apply_plmrs_exclusions_to_map(
        &self,
        region: &Region,
        map: &mut DataMap2D,
        channel: u16,
    ) -> Result<(), WsError> {
        info!("applying PLMRS exclusions on channel {channel}");
        sweep(map, |location| {
            self.location_is_whitespace_plmrs_only(region, location, channel)
        })
    }

    /// Clears cells protected by a radio-astronomy site. Cells
    /// already 0.0 (or unset) are skipped.
    pub fn apply_ras_exclusions_to_map(
        &self,
        region: &Region,
        map: &mut DataMap2D,
    ) -> Result<(), WsError> {
        info!("applying radio astronomy exclusions");
        sweep(map, |location| {
            Ok(self.location_is_whitespace_ras_only(region, location))
        })
    }

    /// Runs every protection pass over `map`, leaving 1.0 where
    /// whitespace is available and 0.0 where it is not.
    ///
    /// Cells that are already 0.0 are not re-evaluated unless `reset`
    /// is set, which first re-arms every cell to 1.0. Seeding the map
    /// with [`Region::membership_map`] skips out-of-region locations;
    /// no membership test is applied otherwise.
    pub fn apply_all_protections_to_map(
        &self,
        region: &Region,
        map: &mut DataMap2D,
        channel: u16,
        device: &Device,
        ignore_channel_restrictions: bool,
        reset: bool,
    ) -> Result<(), WsError> {
        if reset {
            map.reset_all(1.0);
        }
        if !ignore_channel_restrictions {
            self.apply_channel_restrictions_to_map(map, channel, device);
        }
        self.apply_ras_exclusions_to_map(region, map)?;
        self.apply_plmrs_exclusions_to_map(region, map, channel)?;
        self.apply_tv_exclusions_to_map(region, map, channel, device)?;
        Ok(())
    }

    /// Builds a whitespace availability map on the template's grid,
    /// seeded with the region's membership mask.
    pub fn make_whitespace_map(
        &self,
        region: &Region,
        template: &DataMap2D,
        channel: u16,
        device: &Device,
    ) -> Result<DataMap2D, WsError> {
        let mut map = region.membership_map(template);
        self.apply_all_protections_to_map(region, &mut map, channel, device, false, false)?;
        Ok(map)
    }
}

/// Channels adjacent to `channel` in frequency and present in the
/// channel plan.
fn adjacent_channels(channel: u16) -> Vec<u16> {
    region::cochannel_and_first_adjacent(channel)
        .into_iter()
        .skip(1)
        .filter(|ch| region::channel_list().contains(ch))
        .collect()
}

/// Row-parallel sweep clearing cells where `eval` says the location
/// is not whitespace. Cells that are 0.0 or unset are skipped, so a
/// pass can only refine the map toward "not whitespace".
fn sweep<F>(map: &mut DataMap2D, eval: F) -> Result<(), WsError>
where
    F: Fn(Point<f64>) -> Result<bool, WsError> + Sync,
{
    let latitudes = map.latitudes().to_vec();
    let longitudes = map.longitudes().to_vec();
    let num_lon = longitudes.len();
    map.samples_mut()
        .par_chunks_mut(num_lon)
        .enumerate()
        .try_for_each(|(lat_idx, row)| {
            let lat = latitudes[lat_idx];
            for (lon_idx, cell) in row.iter_mut().enumerate() {
                if !(*cell > 0.0) {
                    continue;
                }
                if !eval(Point::new(longitudes[lon_idx], lat))? {
                    *cell = 0.0;
                }
            }
            Ok(())
        })
}
