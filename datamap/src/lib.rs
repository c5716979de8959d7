//! Georeferenced lat/lon raster grids.
//!
//! A [`DataMap2D`] holds one scalar per grid point on an evenly spaced
//! latitude/longitude lattice. A [`DataMap3D`] is a named stack of
//! [`DataMap2D`]s sharing one coordinate system.
//!
//! Unset cells are NaN. Boolean-valued maps are stored as 0.0/1.0.

mod blob;
mod error;
mod layers;

pub use crate::{
    error::{Axis, DataMapError},
    layers::DataMap3D,
};
use log::debug;
use num_traits::{Float, FromPrimitive};

/// Base floating point type used for all coordinates and samples.
pub type C = f64;

/// Fraction of a grid step within which a coordinate lookup is
/// considered an exact match.
const LOOKUP_TOLERANCE: C = 1e-4;

/// Evenly spaced values from `start` to `end` inclusive.
pub(crate) fn linspace<T>(start: T, end: T, n: usize) -> impl Iterator<Item = T>
where
    T: Float + FromPrimitive,
{
    let dy = (end - start) / T::from_usize(n - 1).unwrap();
    (0..n).map(move |x| start + T::from_usize(x).unwrap() * dy)
}

/// A 2-D grid of scalars on an evenly spaced lat/lon lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct DataMap2D {
    /// (min, max) latitude of the grid, inclusive.
    lat_bounds: (C, C),

    /// (min, max) longitude of the grid, inclusive.
    lon_bounds: (C, C),

    /// Latitude of every row, strictly increasing.
    latitudes: Box<[C]>,

    /// Longitude of every column, strictly increasing.
    longitudes: Box<[C]>,

    /// Row-major (latitude-outer) sample buffer.
    samples: Vec<C>,
}

impl DataMap2D {
    /// Returns a grid spanning the given bounds with the given number
    /// of divisions per axis, all cells unset (NaN).
    pub fn new(
        lat_bounds: (C, C),
        lon_bounds: (C, C),
        num_lat: usize,
        num_lon: usize,
    ) -> Result<Self, DataMapError> {
        let (min_lat, max_lat) = lat_bounds;
        if min_lat > max_lat {
            return Err(DataMapError::Bounds {
                axis: Axis::Latitude,
                min: min_lat,
                max: max_lat,
            });
        }
        let (min_lon, max_lon) = lon_bounds;
        if min_lon > max_lon {
            return Err(DataMapError::Bounds {
                axis: Axis::Longitude,
                min: min_lon,
                max: max_lon,
            });
        }
        if num_lat < 2 {
            return Err(DataMapError::Divisions {
                axis: Axis::Latitude,
                count: num_lat,
            });
        }
        if num_lon < 2 {
            return Err(DataMapError::Divisions {
                axis: Axis::Longitude,
                count: num_lon,
            });
        }

        debug!(
            "creating grid; lat: ({min_lat}, {max_lat}) x {num_lat}, \
             lon: ({min_lon}, {max_lon}) x {num_lon}"
        );

        let latitudes: Box<[C]> = linspace(min_lat, max_lat, num_lat).collect();
        let longitudes: Box<[C]> = linspace(min_lon, max_lon, num_lon).collect();
        let samples = vec![C::NAN; num_lat * num_lon];

        Ok(Self {
            lat_bounds,
            lon_bounds,
            latitudes,
            longitudes,
            samples,
        })
    }

    /// Returns an unset grid with the same coordinate system as `other`.
    pub fn empty_like(other: &Self) -> Self {
        let mut map = other.clone();
        map.reset_all(C::NAN);
        map
    }

    /// Returns a grid with the same coordinate system as `other`, all
    /// cells set to `fill`.
    pub fn filled_like(other: &Self, fill: C) -> Self {
        let mut map = other.clone();
        map.reset_all(fill);
        map
    }

    /// Preset grid covering the continental United States.
    pub fn continental_united_states(num_lat: usize, num_lon: usize) -> Result<Self, DataMapError> {
        Self::new((24.5, 49.38), (-124.77, -66.0), num_lat, num_lon)
    }

    /// Preset grid covering the San Francisco Bay Area.
    pub fn bay_area(num_lat: usize, num_lon: usize) -> Result<Self, DataMapError> {
        Self::new((37.2, 38.4), (-123.2, -121.0), num_lat, num_lon)
    }

    /// Preset grid covering Wisconsin.
    pub fn wisconsin(num_lat: usize, num_lon: usize) -> Result<Self, DataMapError> {
        Self::new((42.5, 47.0), (-93.5, -87.0), num_lat, num_lon)
    }

    pub fn latitude_bounds(&self) -> (C, C) {
        self.lat_bounds
    }

    pub fn longitude_bounds(&self) -> (C, C) {
        self.lon_bounds
    }

    /// Latitude sample coordinates, strictly increasing.
    pub fn latitudes(&self) -> &[C] {
        &self.latitudes
    }

    /// Longitude sample coordinates, strictly increasing.
    pub fn longitudes(&self) -> &[C] {
        &self.longitudes
    }

    pub fn latitude_count(&self) -> usize {
        self.latitudes.len()
    }

    pub fn longitude_count(&self) -> usize {
        self.longitudes.len()
    }

    /// Raw row-major sample buffer.
    pub fn samples(&self) -> &[C] {
        &self.samples
    }

    /// Mutable raw row-major sample buffer. Rows are
    /// `longitude_count()` long; callers may split it into rows for
    /// parallel sweeps.
    pub fn samples_mut(&mut self) -> &mut [C] {
        &mut self.samples
    }

    /// Returns the sample at the given indices.
    ///
    /// Panics if an index is out of range, like slice indexing.
    pub fn get(&self, lat_idx: usize, lon_idx: usize) -> C {
        self.samples[self.linear_index(lat_idx, lon_idx)]
    }

    /// Sets the sample at the given indices.
    ///
    /// Panics if an index is out of range, like slice indexing.
    pub fn set(&mut self, lat_idx: usize, lon_idx: usize, value: C) {
        let idx = self.linear_index(lat_idx, lon_idx);
        self.samples[idx] = value;
    }

    /// Returns the row index whose sample latitude is `lat`.
    ///
    /// The index is derived arithmetically from the bounds and step,
    /// then verified against the stored coordinate within a small
    /// fraction of a step. Coordinates that are not grid samples are a
    /// lookup error.
    pub fn latitude_index(&self, lat: C) -> Result<usize, DataMapError> {
        coord_index(&self.latitudes, lat).ok_or(DataMapError::CoordLookup {
            axis: Axis::Latitude,
            value: lat,
        })
    }

    /// Returns the column index whose sample longitude is `lon`.
    pub fn longitude_index(&self, lon: C) -> Result<usize, DataMapError> {
        coord_index(&self.longitudes, lon).ok_or(DataMapError::CoordLookup {
            axis: Axis::Longitude,
            value: lon,
        })
    }

    /// Returns the sample at the given location, which must be one of
    /// the grid's sample points.
    pub fn get_by_location(&self, lat: C, lon: C) -> Result<C, DataMapError> {
        let lat_idx = self.latitude_index(lat)?;
        let lon_idx = self.longitude_index(lon)?;
        Ok(self.get(lat_idx, lon_idx))
    }

    /// Sets the sample at the given location, which must be one of the
    /// grid's sample points.
    pub fn set_by_location(&mut self, lat: C, lon: C, value: C) -> Result<(), DataMapError> {
        let lat_idx = self.latitude_index(lat)?;
        let lon_idx = self.longitude_index(lon)?;
        self.set(lat_idx, lon_idx, value);
        Ok(())
    }

    /// Sets every cell to `fill`.
    pub fn reset_all(&mut self, fill: C) {
        self.samples.fill(fill);
    }

    /// Applies `update` to every cell in row-major (latitude outer)
    /// order. `update` receives the cell's latitude, longitude, both
    /// indices, and current value; returning `None` leaves the cell
    /// unchanged.
    ///
    /// This is the single traversal primitive used by every
    /// whole-raster computation built on this type.
    pub fn update_all<F>(&mut self, mut update: F)
    where
        F: FnMut(C, C, usize, usize, C) -> Option<C>,
    {
        let num_lon = self.longitudes.len();
        for (lat_idx, row) in self.samples.chunks_mut(num_lon).enumerate() {
            let lat = self.latitudes[lat_idx];
            for (lon_idx, cell) in row.iter_mut().enumerate() {
                if let Some(value) = update(lat, self.longitudes[lon_idx], lat_idx, lon_idx, *cell)
                {
                    *cell = value;
                }
            }
        }
    }

    /// Two grids are comparable when they describe exactly the same
    /// sample points: equal bounds and equal division counts on both
    /// axes.
    pub fn is_comparable(&self, other: &Self) -> bool {
        self.lat_bounds == other.lat_bounds
            && self.lon_bounds == other.lon_bounds
            && self.latitudes.len() == other.latitudes.len()
            && self.longitudes.len() == other.longitudes.len()
    }

    fn require_comparable(&self, other: &Self) -> Result<(), DataMapError> {
        if self.is_comparable(other) {
            Ok(())
        } else {
            Err(DataMapError::Incomparable)
        }
    }

    /// Returns a new grid where each cell is `combine(self, other)` at
    /// that cell. The grids must be comparable.
    pub fn combine_with<F>(&self, other: &Self, combine: F) -> Result<Self, DataMapError>
    where
        F: Fn(C, C) -> C,
    {
        self.require_comparable(other)?;
        let mut out = Self::empty_like(self);
        for (cell, (a, b)) in out
            .samples
            .iter_mut()
            .zip(self.samples.iter().zip(other.samples.iter()))
        {
            *cell = combine(*a, *b);
        }
        Ok(out)
    }

    /// Elementwise product of two comparable grids.
    pub fn multiply(&self, other: &Self) -> Result<Self, DataMapError> {
        self.combine_with(other, |a, b| a * b)
    }

    /// Returns the minimal sub-grid whose bounds contain the requested
    /// region, rounding outward to existing sample points.
    ///
    /// Fails with [`DataMapError::NoOverlap`] when the request is
    /// disjoint from the grid. When the request extends past the grid
    /// it is clipped if `allow_partial` is true and fails with
    /// [`DataMapError::OutOfBounds`] otherwise.
    pub fn submap(
        &self,
        lat_bounds: (C, C),
        lon_bounds: (C, C),
        allow_partial: bool,
    ) -> Result<Self, DataMapError> {
        let (lat_lo, lat_hi) = outward_range(&self.latitudes, lat_bounds, allow_partial)?;
        let (lon_lo, lon_hi) = outward_range(&self.longitudes, lon_bounds, allow_partial)?;

        let mut sub = Self::new(
            (self.latitudes[lat_lo], self.latitudes[lat_hi]),
            (self.longitudes[lon_lo], self.longitudes[lon_hi]),
            lat_hi - lat_lo + 1,
            lon_hi - lon_lo + 1,
        )?;
        for lat_idx in lat_lo..=lat_hi {
            for lon_idx in lon_lo..=lon_hi {
                sub.set(lat_idx - lat_lo, lon_idx - lon_lo, self.get(lat_idx, lon_idx));
            }
        }
        Ok(sub)
    }

    /// Writes `combine(existing, submap_value)` back into this grid at
    /// the submap's original location. The submap's sample coordinates
    /// must all be sample points of this grid.
    pub fn reintegrate<F>(&mut self, submap: &Self, combine: F) -> Result<(), DataMapError>
    where
        F: Fn(C, C) -> C,
    {
        let lat_indices = submap
            .latitudes
            .iter()
            .map(|&lat| self.latitude_index(lat))
            .collect::<Result<Vec<_>, _>>()?;
        let lon_indices = submap
            .longitudes
            .iter()
            .map(|&lon| self.longitude_index(lon))
            .collect::<Result<Vec<_>, _>>()?;

        for (sub_lat, &lat_idx) in lat_indices.iter().enumerate() {
            for (sub_lon, &lon_idx) in lon_indices.iter().enumerate() {
                let existing = self.get(lat_idx, lon_idx);
                let value = combine(existing, submap.get(sub_lat, sub_lon));
                self.set(lat_idx, lon_idx, value);
            }
        }
        Ok(())
    }

    fn linear_index(&self, lat_idx: usize, lon_idx: usize) -> usize {
        assert!(lon_idx < self.longitudes.len());
        lat_idx * self.longitudes.len() + lon_idx
    }
}

/// Index of `value` in the evenly spaced `coords`, derived from the
/// step size and verified within [`LOOKUP_TOLERANCE`] of a step.
fn coord_index(coords: &[C], value: C) -> Option<usize> {
    let step = (coords[coords.len() - 1] - coords[0]) / (coords.len() - 1) as C;
    if step <= 0.0 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let idx = ((value - coords[0]) / step).round() as isize;
    if idx < 0 || idx as usize >= coords.len() {
        return None;
    }
    let idx = idx as usize;
    if (coords[idx] - value).abs() <= step * LOOKUP_TOLERANCE {
        Some(idx)
    } else {
        None
    }
}

/// Index range of `coords` covering `(lo, hi)`, rounded outward.
fn outward_range(
    coords: &[C],
    (lo, hi): (C, C),
    allow_partial: bool,
) -> Result<(usize, usize), DataMapError> {
    let first = coords[0];
    let last = coords[coords.len() - 1];
    let step = (last - first) / (coords.len() - 1) as C;
    let tol = step * LOOKUP_TOLERANCE;

    if hi < first - tol || lo > last + tol {
        return Err(DataMapError::NoOverlap);
    }

    let lo_idx = if lo < first - tol {
        if !allow_partial {
            return Err(DataMapError::OutOfBounds);
        }
        0
    } else {
        // Last sample at or below the requested minimum.
        coords
            .iter()
            .rposition(|&c| c <= lo + tol)
            .unwrap_or(0)
    };

    let hi_idx = if hi > last + tol {
        if !allow_partial {
            return Err(DataMapError::OutOfBounds);
        }
        coords.len() - 1
    } else {
        // First sample at or above the requested maximum.
        coords
            .iter()
            .position(|&c| c >= hi - tol)
            .unwrap_or(coords.len() - 1)
    };

    Ok((lo_idx, hi_idx))
}

#[cfg(test)]
mod tests {
    use super::{DataMap2D, DataMapError};
    use approx::assert_relative_eq;

    fn grid_2x3() -> DataMap2D {
        DataMap2D::new((0.0, 5.0), (0.0, 5.0), 2, 3).unwrap()
    }

    #[test]
    fn test_reversed_bounds_rejected() {
        assert!(matches!(
            DataMap2D::new((5.0, 0.0), (0.0, 5.0), 2, 3),
            Err(DataMapError::Bounds { .. })
        ));
        assert!(matches!(
            DataMap2D::new((0.0, 5.0), (5.0, 0.0), 2, 3),
            Err(DataMapError::Bounds { .. })
        ));
    }

    #[test]
    fn test_coordinates_evenly_spaced() {
        let map = DataMap2D::new((0.0, 1.0), (-2.0, 2.0), 5, 9).unwrap();
        assert_eq!(map.latitudes().len(), 5);
        assert_eq!(map.longitudes().len(), 9);
        for window in map.latitudes().windows(2) {
            assert_relative_eq!(window[1] - window[0], 0.25);
        }
        for window in map.longitudes().windows(2) {
            assert_relative_eq!(window[1] - window[0], 0.5);
        }
        assert_relative_eq!(*map.latitudes().last().unwrap(), 1.0);
        assert_relative_eq!(*map.longitudes().last().unwrap(), 2.0);
    }

    #[test]
    fn test_new_cells_are_unset() {
        let map = grid_2x3();
        assert!(map.samples().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_set_index_get_location() {
        let mut map = grid_2x3();
        map.set(0, 0, 5.0);
        assert_relative_eq!(map.get_by_location(0.0, 0.0).unwrap(), 5.0);
    }

    #[test]
    fn test_unlisted_location_is_error() {
        let map = grid_2x3();
        assert!(matches!(
            map.get_by_location(1.0, 1.0),
            Err(DataMapError::CoordLookup { .. })
        ));
    }

    #[test]
    fn test_location_roundtrip_all_samples() {
        let map = DataMap2D::new((24.5, 49.38), (-124.77, -66.0), 20, 30).unwrap();
        for (lat_idx, &lat) in map.latitudes().iter().enumerate() {
            assert_eq!(map.latitude_index(lat).unwrap(), lat_idx);
        }
        for (lon_idx, &lon) in map.longitudes().iter().enumerate() {
            assert_eq!(map.longitude_index(lon).unwrap(), lon_idx);
        }
    }

    #[test]
    fn test_update_all_row_major_and_skip() {
        let mut map = grid_2x3();
        let mut visited = Vec::new();
        map.update_all(|_lat, _lon, lat_idx, lon_idx, _v| {
            visited.push((lat_idx, lon_idx));
            if lon_idx == 2 {
                None
            } else {
                Some((lat_idx * 3 + lon_idx) as f64)
            }
        });
        assert_eq!(
            visited,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
        assert_relative_eq!(map.get(1, 1), 4.0);
        assert!(map.get(0, 2).is_nan());
        assert!(map.get(1, 2).is_nan());
    }

    #[test]
    fn test_comparability_is_symmetric() {
        let a = grid_2x3();
        let b = grid_2x3();
        let c = DataMap2D::new((0.0, 5.0), (0.0, 5.0), 2, 4).unwrap();
        assert_eq!(a.is_comparable(&b), b.is_comparable(&a));
        assert_eq!(a.is_comparable(&c), c.is_comparable(&a));
        assert!(a.is_comparable(&b));
        assert!(!a.is_comparable(&c));
    }

    #[test]
    fn test_combining_incomparable_fails() {
        let a = grid_2x3();
        let b = DataMap2D::new((0.0, 5.0), (0.0, 5.0), 2, 4).unwrap();
        assert!(matches!(
            a.combine_with(&b, |x, y| x + y),
            Err(DataMapError::Incomparable)
        ));
        assert!(matches!(a.multiply(&b), Err(DataMapError::Incomparable)));
    }

    #[test]
    fn test_multiply() {
        let mut a = grid_2x3();
        let mut b = grid_2x3();
        a.reset_all(3.0);
        b.reset_all(2.0);
        let product = a.multiply(&b).unwrap();
        assert!(product.samples().iter().all(|&v| v == 6.0));
    }

    #[test]
    fn test_submap_rounds_outward() {
        let mut map = DataMap2D::new((0.0, 4.0), (0.0, 4.0), 5, 5).unwrap();
        map.update_all(|_, _, i, j, _| Some((i * 5 + j) as f64));

        // Request (0.5, 2.5) on both axes; outward rounding takes
        // samples 0..=3.
        let sub = map.submap((0.5, 2.5), (0.5, 2.5), false).unwrap();
        assert_eq!(sub.latitude_count(), 4);
        assert_eq!(sub.longitude_count(), 4);
        assert_relative_eq!(sub.latitudes()[0], 0.0);
        assert_relative_eq!(*sub.latitudes().last().unwrap(), 3.0);
        assert_relative_eq!(sub.get(1, 2), map.get(1, 2));
    }

    #[test]
    fn test_submap_disjoint_fails() {
        let map = DataMap2D::new((0.0, 4.0), (0.0, 4.0), 5, 5).unwrap();
        assert!(matches!(
            map.submap((10.0, 12.0), (0.0, 1.0), true),
            Err(DataMapError::NoOverlap)
        ));
    }

    #[test]
    fn test_submap_partial() {
        let map = DataMap2D::new((0.0, 4.0), (0.0, 4.0), 5, 5).unwrap();
        assert!(matches!(
            map.submap((2.0, 6.0), (0.0, 1.0), false),
            Err(DataMapError::OutOfBounds)
        ));
        let sub = map.submap((2.0, 6.0), (0.0, 1.0), true).unwrap();
        assert_relative_eq!(*sub.latitudes().last().unwrap(), 4.0);
    }

    #[test]
    fn test_reintegrate() {
        let mut map = DataMap2D::new((0.0, 4.0), (0.0, 4.0), 5, 5).unwrap();
        map.reset_all(1.0);
        let mut sub = map.submap((1.0, 2.0), (1.0, 2.0), false).unwrap();
        sub.reset_all(0.5);
        map.reintegrate(&sub, |existing, incoming| existing * incoming)
            .unwrap();
        assert_relative_eq!(map.get(1, 1), 0.5);
        assert_relative_eq!(map.get(2, 2), 0.5);
        assert_relative_eq!(map.get(0, 0), 1.0);
        assert_relative_eq!(map.get(3, 3), 1.0);
    }

    #[test]
    fn test_reintegrate_foreign_submap_fails() {
        let mut map = DataMap2D::new((0.0, 4.0), (0.0, 4.0), 5, 5).unwrap();
        let foreign = DataMap2D::new((0.3, 1.3), (0.3, 1.3), 2, 2).unwrap();
        assert!(matches!(
            map.reintegrate(&foreign, |a, _| a),
            Err(DataMapError::CoordLookup { .. })
        ));
    }
}
