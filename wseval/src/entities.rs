//! Protected entity records and their cached bounding boxes.

use crate::error::WsError;
use geo::{HaversineDestination, Point};
use serde::Deserialize;

/// Maximum radius at which any rule can protect a TV station, used to
/// size its bounding box.
pub const TV_MAX_PROTECTED_RADIUS_KM: f64 = 200.0;

/// Maximum radius at which any rule can protect a land-mobile
/// exclusion.
pub const PLMRS_MAX_PROTECTED_RADIUS_KM: f64 = 150.0;

/// Maximum radius at which any rule can protect a radio-astronomy
/// site.
pub const RAS_MAX_PROTECTED_RADIUS_KM: f64 = 10.0;

/// Common interface over the protected entity categories.
pub trait ProtectedEntity {
    /// Location as (longitude, latitude) degrees.
    fn location(&self) -> Point<f64>;

    /// Operating channel, if the category has one.
    fn channel(&self) -> Option<u16>;

    fn bounding_box(&self) -> &BoundingBox;

    /// Pre-filter: true if `point` could possibly be protected by
    /// this entity. Must never reject a point the full computation
    /// would protect.
    fn location_in_bounding_box(&self, point: Point<f64>) -> bool {
        self.bounding_box().contains(point)
    }
}

/// Axis-aligned lat/lon rectangle enclosing an entity's protected
/// area, computed once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Projects `radius_km` outward from `center` along bearings 0,
    /// 90, 180, 270, and 360 degrees and takes the extremes. The
    /// duplicate 0/360 projection lands on the same point and is
    /// harmless.
    pub fn from_protected_radius(center: Point<f64>, radius_km: f64) -> Self {
        let mut bb = Self {
            min_lat: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            min_lon: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
        };
        for bearing in [0.0, 90.0, 180.0, 270.0, 360.0] {
            let dest = center.haversine_destination(bearing, radius_km * 1e3);
            bb.min_lat = bb.min_lat.min(dest.y());
            bb.max_lat = bb.max_lat.max(dest.y());
            bb.min_lon = bb.min_lon.min(dest.x());
            bb.max_lon = bb.max_lon.max(dest.x());
        }
        bb
    }

    pub fn contains(&self, point: Point<f64>) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.y())
            && (self.min_lon..=self.max_lon).contains(&point.x())
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<Point<f64>, WsError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(WsError::InvalidCoordinate {
            latitude,
            longitude,
        });
    }
    Ok(Point::new(longitude, latitude))
}

/// Digital vs. analog transmission, derived from the raw type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxType {
    Digital,
    Analog,
}

impl TxType {
    /// Maps a raw transmitter-type code to its class. `Ok(None)`
    /// means the code is recognized but the station is not protected
    /// (distributed digital, land mobile).
    pub fn from_code(code: &str) -> Result<Option<Self>, WsError> {
        match code {
            "DT" | "DC" | "LD" | "DS" | "DX" => Ok(Some(Self::Digital)),
            "CA" | "TX" | "TS" | "TV" => Ok(Some(Self::Analog)),
            "DD" | "LM" => Ok(None),
            other => Err(WsError::UnknownTransmitterType(other.to_string())),
        }
    }
}

/// Raw TV station row as supplied by an entity loader.
#[derive(Debug, Clone, Deserialize)]
pub struct TvStationRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub channel: u16,
    pub tx_type: String,
    pub erp_watts: f64,
    pub haat_meters: f64,
    #[serde(default)]
    pub facility_id: Option<String>,
    #[serde(default)]
    pub callsign: Option<String>,
}

/// A protected television station.
#[derive(Debug, Clone)]
pub struct TvStation {
    location: Point<f64>,
    channel: u16,
    tx_type: TxType,
    erp_watts: f64,
    haat_m: f64,
    facility_id: Option<String>,
    callsign: Option<String>,
    bounding_box: BoundingBox,
}

impl TvStation {
    /// Validates a raw record. `Ok(None)` means the record is valid
    /// but the station's type is not protected.
    pub fn from_record(record: TvStationRecord) -> Result<Option<Self>, WsError> {
        let location = validate_coordinates(record.latitude, record.longitude)?;
        let Some(tx_type) = TxType::from_code(&record.tx_type)? else {
            return Ok(None);
        };
        if record.erp_watts <= 0.0 {
            return Err(WsError::InvalidErp(record.erp_watts));
        }
        Ok(Some(Self {
            location,
            channel: record.channel,
            tx_type,
            erp_watts: record.erp_watts,
            haat_m: record.haat_meters,
            facility_id: record.facility_id,
            callsign: record.callsign,
            bounding_box: BoundingBox::from_protected_radius(
                location,
                TV_MAX_PROTECTED_RADIUS_KM,
            ),
        }))
    }

    pub fn channel_number(&self) -> u16 {
        self.channel
    }

    pub fn is_digital(&self) -> bool {
        self.tx_type == TxType::Digital
    }

    pub fn tx_type(&self) -> TxType {
        self.tx_type
    }

    pub fn erp_watts(&self) -> f64 {
        self.erp_watts
    }

    pub fn haat_m(&self) -> f64 {
        self.haat_m
    }

    pub fn facility_id(&self) -> Option<&str> {
        self.facility_id.as_deref()
    }

    pub fn callsign(&self) -> Option<&str> {
        self.callsign.as_deref()
    }
}

impl ProtectedEntity for TvStation {
    fn location(&self) -> Point<f64> {
        self.location
    }

    fn channel(&self) -> Option<u16> {
        Some(self.channel)
    }

    fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }
}

/// Raw land-mobile exclusion row as supplied by an entity loader.
#[derive(Debug, Clone, Deserialize)]
pub struct PlmrsRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub channel: u16,
    pub is_metro: bool,
    #[serde(default)]
    pub description: Option<String>,
}

/// A private land mobile radio service exclusion zone. Metropolitan
/// exclusions carry a wider protection radius than individual
/// registrations.
#[derive(Debug, Clone)]
pub struct PlmrsExclusion {
    location: Point<f64>,
    channel: u16,
    is_metro: bool,
    description: Option<String>,
    bounding_box: BoundingBox,
}

impl PlmrsExclusion {
    pub fn from_record(record: PlmrsRecord) -> Result<Self, WsError> {
        let location = validate_coordinates(record.latitude, record.longitude)?;
        Ok(Self {
            location,
            channel: record.channel,
            is_metro: record.is_metro,
            description: record.description,
            bounding_box: BoundingBox::from_protected_radius(
                location,
                PLMRS_MAX_PROTECTED_RADIUS_KM,
            ),
        })
    }

    pub fn is_metro(&self) -> bool {
        self.is_metro
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl ProtectedEntity for PlmrsExclusion {
    fn location(&self) -> Point<f64> {
        self.location
    }

    fn channel(&self) -> Option<u16> {
        Some(self.channel)
    }

    fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }
}

/// Raw radio-astronomy site row as supplied by an entity loader.
#[derive(Debug, Clone, Deserialize)]
pub struct RasRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub channel: u16,
    pub name: String,
    pub is_point: bool,
    #[serde(default)]
    pub latitude_deviation: Option<f64>,
    #[serde(default)]
    pub longitude_deviation: Option<f64>,
}

/// Protected geometry of a radio-astronomy site: a point, or an
/// axis-aligned rectangle given as half-width deviations from the
/// center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RasGeometry {
    Point,
    Rect {
        lat_deviation: f64,
        lon_deviation: f64,
    },
}

/// A radio-astronomy site.
#[derive(Debug, Clone)]
pub struct RasSite {
    location: Point<f64>,
    channel: u16,
    name: String,
    geometry: RasGeometry,
    bounding_box: BoundingBox,
}

impl RasSite {
    pub fn from_record(record: RasRecord) -> Result<Self, WsError> {
        let location = validate_coordinates(record.latitude, record.longitude)?;
        let geometry = if record.is_point {
            RasGeometry::Point
        } else {
            match (record.latitude_deviation, record.longitude_deviation) {
                (Some(lat_deviation), Some(lon_deviation)) => RasGeometry::Rect {
                    lat_deviation,
                    lon_deviation,
                },
                _ => return Err(WsError::MissingDeviation),
            }
        };
        // For rectangle sites the protected area IS the rectangle, so
        // the rectangle doubles as its own bounding box.
        let bounding_box = match geometry {
            RasGeometry::Point => {
                BoundingBox::from_protected_radius(location, RAS_MAX_PROTECTED_RADIUS_KM)
            }
            RasGeometry::Rect {
                lat_deviation,
                lon_deviation,
            } => BoundingBox {
                min_lat: location.y() - lat_deviation,
                max_lat: location.y() + lat_deviation,
                min_lon: location.x() - lon_deviation,
                max_lon: location.x() + lon_deviation,
            },
        };
        Ok(Self {
            location,
            channel: record.channel,
            name: record.name,
            geometry,
            bounding_box,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn geometry(&self) -> RasGeometry {
        self.geometry
    }

    pub fn is_point(&self) -> bool {
        self.geometry == RasGeometry::Point
    }

    /// Rectangle sites only: true if `point` falls inside the
    /// protected rectangle. Always false for point sites.
    pub fn location_in_protected_rectangle(&self, point: Point<f64>) -> bool {
        match self.geometry {
            RasGeometry::Point => false,
            RasGeometry::Rect {
                lat_deviation,
                lon_deviation,
            } => {
                (point.y() - self.location.y()).abs() <= lat_deviation
                    && (point.x() - self.location.x()).abs() <= lon_deviation
            }
        }
    }
}

impl ProtectedEntity for RasSite {
    fn location(&self) -> Point<f64> {
        self.location
    }

    fn channel(&self) -> Option<u16> {
        Some(self.channel)
    }

    fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::HaversineDistance;

    fn tv_record() -> TvStationRecord {
        TvStationRecord {
            latitude: 40.0,
            longitude: -100.0,
            channel: 30,
            tx_type: "DT".to_string(),
            erp_watts: 100e3,
            haat_meters: 300.0,
            facility_id: Some("612011".to_string()),
            callsign: Some("KYES-TV".to_string()),
        }
    }

    #[test]
    fn test_bounding_box_encloses_protected_radius() {
        let center = Point::new(-100.0, 40.0);
        let bb = BoundingBox::from_protected_radius(center, 200.0);
        // Any point within the protected radius must be inside.
        for bearing in [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0] {
            for km in [1.0, 100.0, 199.9] {
                let p = center.haversine_destination(bearing, km * 1e3);
                assert!(
                    bb.contains(p),
                    "point {km} km at bearing {bearing} escaped the box"
                );
                assert!(center.haversine_distance(&p) <= 200e3);
            }
        }
    }

    #[test]
    fn test_tx_type_code_tables() {
        for code in ["DT", "DC", "LD", "DS", "DX"] {
            assert_eq!(TxType::from_code(code).unwrap(), Some(TxType::Digital));
        }
        for code in ["CA", "TX", "TS", "TV"] {
            assert_eq!(TxType::from_code(code).unwrap(), Some(TxType::Analog));
        }
        for code in ["DD", "LM"] {
            assert_eq!(TxType::from_code(code).unwrap(), None);
        }
        assert!(matches!(
            TxType::from_code("ZZ"),
            Err(WsError::UnknownTransmitterType(_))
        ));
    }

    #[test]
    fn test_tv_station_from_record() {
        let station = TvStation::from_record(tv_record()).unwrap().unwrap();
        assert!(station.is_digital());
        assert_eq!(station.channel(), Some(30));
        assert_eq!(station.callsign(), Some("KYES-TV"));
    }

    #[test]
    fn test_ignored_tx_type_yields_none() {
        let mut record = tv_record();
        record.tx_type = "DD".to_string();
        assert!(TvStation::from_record(record).unwrap().is_none());
    }

    #[test]
    fn test_bad_records_rejected() {
        let mut record = tv_record();
        record.latitude = 95.0;
        assert!(matches!(
            TvStation::from_record(record),
            Err(WsError::InvalidCoordinate { .. })
        ));

        let mut record = tv_record();
        record.erp_watts = 0.0;
        assert!(matches!(
            TvStation::from_record(record),
            Err(WsError::InvalidErp(_))
        ));
    }

    #[test]
    fn test_ras_rectangle_is_its_own_bounding_box() {
        let record = RasRecord {
            latitude: 38.0,
            longitude: -79.8,
            channel: 4,
            name: "Green Bank".to_string(),
            is_point: false,
            latitude_deviation: Some(0.5),
            longitude_deviation: Some(1.0),
        };
        let site = RasSite::from_record(record).unwrap();
        assert!(!site.is_point());
        assert!(site.location_in_protected_rectangle(Point::new(-79.0, 38.2)));
        assert!(!site.location_in_protected_rectangle(Point::new(-78.7, 38.2)));
        let bb = site.bounding_box();
        assert_eq!(bb.min_lat, 37.5);
        assert_eq!(bb.max_lat, 38.5);
        assert_eq!(bb.min_lon, -80.8);
        assert_eq!(bb.max_lon, -78.8);
    }

    #[test]
    fn test_ras_rectangle_requires_deviations() {
        let record = RasRecord {
            latitude: 38.0,
            longitude: -79.8,
            channel: 4,
            name: "Green Bank".to_string(),
            is_point: false,
            latitude_deviation: Some(0.5),
            longitude_deviation: None,
        };
        assert!(matches!(
            RasSite::from_record(record),
            Err(WsError::MissingDeviation)
        ));
    }
}
