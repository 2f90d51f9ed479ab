//! Storage format of geometry values inside the embedded engine.
//!
//! A stored geometry is an 8-byte header followed by ISO WKB:
//!
//! | bytes | content                                        |
//! |-------|------------------------------------------------|
//! | 0..2  | magic `GP`                                     |
//! | 2     | version (`0`)                                  |
//! | 3     | flags: bit 0 byte order, bits 1-3 envelope kind |
//! | 4..8  | SRID                                           |
//!
//! This is the GeoPackage binary header layout.

use crate::error::{DialectError, Result};
use wkb::reader::Wkb;

const HEADER_LEN: usize = 8;

fn envelope_size(flags: u8) -> Result<usize> {
    match flags & 0b00001110 {
        0b00000000 => Ok(0),  // no envelope
        0b00000010 => Ok(32), // [minx, maxx, miny, maxy]
        0b00000100 => Ok(48), // [minx, maxx, miny, maxy, minz, maxz]
        0b00000110 => Ok(48), // [minx, maxx, miny, maxy, minm, maxm]
        0b00001000 => Ok(64), // [minx, maxx, miny, maxy, minz, maxz, minm, maxm]
        _ => Err(DialectError::InvalidGeometryFlags(flags)),
    }
}

fn check_header(b: &[u8]) -> Result<usize> {
    if b.len() < HEADER_LEN {
        return Err(DialectError::InvalidGeometryBlob {
            len: b.len(),
            minimum: HEADER_LEN,
        });
    }
    let offset = HEADER_LEN + envelope_size(b[3])?;
    if b.len() < offset {
        return Err(DialectError::InvalidGeometryBlob {
            len: b.len(),
            minimum: offset,
        });
    }
    Ok(offset)
}

/// Strip the header and envelope bytes to access raw WKB.
pub(crate) fn blob_to_wkb(b: &[u8]) -> Result<Wkb<'_>> {
    let offset = check_header(b)?;
    Ok(Wkb::try_new(&b[offset..])?)
}

/// SRID recorded in the blob header.
pub(crate) fn blob_srid(b: &[u8]) -> Result<i32> {
    check_header(b)?;
    let raw = [b[4], b[5], b[6], b[7]];
    if b[3] & 0b00000001 == 1 {
        Ok(i32::from_le_bytes(raw))
    } else {
        Ok(i32::from_be_bytes(raw))
    }
}

pub(crate) fn wkb_to_blob(wkb: &[u8], srid: i32) -> Vec<u8> {
    let mut geom = Vec::with_capacity(wkb.len() + HEADER_LEN);
    geom.extend_from_slice(&[
        0x47u8, // magic
        0x50u8, // magic
        0x00u8, // version
        0x01u8, // flags (little endian SRID, no envelope)
    ]);
    geom.extend_from_slice(&srid.to_le_bytes());
    geom.extend_from_slice(wkb);
    geom
}
