//! Opaque binary persistence for [`DataMap2D`].
//!
//! Layout: magic, version, division counts, bounds, then the raw
//! row-major sample buffer as little-endian f64 bits. NaN sentinels
//! round-trip exactly.

use crate::{DataMap2D, DataMapError};
use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::io::Cursor;

const MAGIC: &[u8; 4] = b"DMAP";
const VERSION: u8 = 1;

// Magic + version + two u32 counts + four f64 bounds.
const HEADER_LEN: usize = 4 + 1 + 2 * 4 + 4 * 8;

impl DataMap2D {
    /// Serializes this grid to an opaque blob.
    pub fn to_blob(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.samples().len() * 8);
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        // Writes to a Vec cannot fail.
        buf.write_u32::<LE>(self.latitude_count() as u32).unwrap();
        buf.write_u32::<LE>(self.longitude_count() as u32).unwrap();
        let (min_lat, max_lat) = self.latitude_bounds();
        let (min_lon, max_lon) = self.longitude_bounds();
        for bound in [min_lat, max_lat, min_lon, max_lon] {
            buf.write_f64::<LE>(bound).unwrap();
        }
        for &sample in self.samples() {
            buf.write_f64::<LE>(sample).unwrap();
        }
        buf
    }

    /// Reconstructs a grid from a blob produced by [`Self::to_blob`].
    pub fn from_blob(blob: &[u8]) -> Result<Self, DataMapError> {
        if blob.len() < 5 || &blob[..4] != MAGIC || blob[4] != VERSION {
            return Err(DataMapError::Blob);
        }
        let mut rdr = Cursor::new(&blob[5..]);
        let num_lat = rdr.read_u32::<LE>()? as usize;
        let num_lon = rdr.read_u32::<LE>()? as usize;
        let min_lat = rdr.read_f64::<LE>()?;
        let max_lat = rdr.read_f64::<LE>()?;
        let min_lon = rdr.read_f64::<LE>()?;
        let max_lon = rdr.read_f64::<LE>()?;

        // Header counts must match the payload before any allocation.
        let expected_len = num_lat
            .checked_mul(num_lon)
            .and_then(|cells| cells.checked_mul(8))
            .and_then(|payload| payload.checked_add(HEADER_LEN))
            .ok_or(DataMapError::Blob)?;
        if blob.len() != expected_len {
            return Err(DataMapError::Blob);
        }

        let mut map = Self::new((min_lat, max_lat), (min_lon, max_lon), num_lat, num_lon)?;
        for cell in map.samples_mut() {
            *cell = rdr.read_f64::<LE>()?;
        }
        Ok(map)
    }
}
