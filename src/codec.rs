//! Conversion of geometry and binary values to and from the engine's wire forms.
//!
//! Geometries are read back as WKB (the projection wraps columns in
//! `ST_AsBinary`) and written as `ST_GeomFromText('<wkt>', <srid>)` literals.

use crate::envelope::Envelope;
use crate::error::{DialectError, Result};
use crate::wkt_writer;
use geo_traits::{GeometryTrait, LineStringTrait};
use rusqlite::Row;
use rusqlite::types::ValueRef;
use std::str::FromStr;
use wkb::reader::Wkb;
use wkt::Wkt;

/// Native function building a geometry from WKT and an SRID.
pub const GEOMETRY_CONSTRUCTOR: &str = "ST_GeomFromText";

/// An owned, validated WKB geometry read from a result row.
#[derive(Clone, Debug, PartialEq)]
pub struct WkbGeometry {
    buf: Vec<u8>,
}

impl WkbGeometry {
    /// Validate `buf` as WKB and take ownership of it.
    pub fn try_new(buf: Vec<u8>) -> Result<Self> {
        Wkb::try_new(&buf)?;
        Ok(Self { buf })
    }

    /// Borrow the geometry for traversal through `geo_traits`.
    pub fn wkb(&self) -> Result<Wkb<'_>> {
        Ok(Wkb::try_new(&self.buf)?)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Render as WKT keeping up to `dimension` ordinates.
    pub fn to_wkt(&self, dimension: u32) -> Result<String> {
        let wkb = self.wkb()?;
        let mut out = String::new();
        wkt_writer::write_geometry(&mut out, &wkb, dimension);
        Ok(out)
    }
}

/// Decode the WKB geometry held by column `idx` of `row`.
///
/// `NULL` decodes to `None`; any other non-blob value or a malformed payload
/// is an error.
pub fn decode_geometry(row: &Row<'_>, idx: usize) -> Result<Option<WkbGeometry>> {
    match row.get_ref(idx)? {
        ValueRef::Null => Ok(None),
        ValueRef::Blob(bytes) => decode_geometry_bytes(idx, bytes).map(Some),
        other => Err(DialectError::UnexpectedGeometryValue {
            column: idx,
            actual: other.data_type(),
        }),
    }
}

pub(crate) fn decode_geometry_bytes(column: usize, bytes: &[u8]) -> Result<WkbGeometry> {
    match Wkb::try_new(bytes) {
        Ok(_) => Ok(WkbGeometry {
            buf: bytes.to_vec(),
        }),
        Err(source) => Err(DialectError::GeometryDecode { column, source }),
    }
}

/// Append the SQL literal for `value`.
///
/// Missing and empty geometries become `NULL`.
pub fn encode_geometry<G: GeometryTrait<T = f64>>(
    value: Option<&G>,
    dimension: u32,
    srid: i32,
    sql: &mut String,
) {
    match value {
        Some(geom) if !wkt_writer::is_empty(geom) => {
            let mut wkt = String::new();
            wkt_writer::write_geometry(&mut wkt, geom, dimension);
            push_constructor(sql, &wkt, srid);
        }
        _ => sql.push_str("NULL"),
    }
}

/// Append the SQL literal for a linear ring.
///
/// The engine has no ring type, so the ring's coordinates are written as a
/// line string.
pub fn encode_linear_ring<L: LineStringTrait<T = f64>>(
    ring: Option<&L>,
    dimension: u32,
    srid: i32,
    sql: &mut String,
) {
    match ring {
        Some(ring) if ring.num_coords() > 0 => {
            let mut wkt = String::new();
            wkt_writer::write_line_string(&mut wkt, ring, dimension);
            push_constructor(sql, &wkt, srid);
        }
        _ => sql.push_str("NULL"),
    }
}

fn push_constructor(sql: &mut String, wkt: &str, srid: i32) {
    sql.push_str(GEOMETRY_CONSTRUCTOR);
    sql.push_str("('");
    sql.push_str(wkt);
    sql.push_str("', ");
    sql.push_str(&srid.to_string());
    sql.push(')');
}

/// Append a quoted hex literal for `bytes`, or `NULL`.
pub fn encode_binary(bytes: Option<&[u8]>, sql: &mut String) {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let Some(bytes) = bytes else {
        sql.push_str("NULL");
        return;
    };
    sql.reserve(bytes.len() * 2 + 2);
    sql.push('\'');
    for b in bytes {
        sql.push(HEX[(b >> 4) as usize] as char);
        sql.push(HEX[(b & 0x0f) as usize] as char);
    }
    sql.push('\'');
}

/// Decode a WKT bounding box held by column `idx` of `row`.
///
/// `NULL` decodes to an empty envelope. Malformed WKT is reported as an I/O
/// error wrapping the parse failure.
pub fn decode_extent(row: &Row<'_>, idx: usize) -> Result<Envelope> {
    let text: Option<String> = row.get(idx)?;
    decode_extent_text(text.as_deref())
}

pub(crate) fn decode_extent_text(text: Option<&str>) -> Result<Envelope> {
    let Some(text) = text else {
        return Ok(Envelope::empty());
    };
    let geom = Wkt::<f64>::from_str(text).map_err(|err| {
        DialectError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("cannot create the bounding box: {err}"),
        ))
    })?;
    Ok(Envelope::of(&geom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Result;
    use crate::test_utils::spatial_connection;
    use geo_types::{LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};

    fn encoded<G: GeometryTrait<T = f64>>(geom: &G, dimension: u32, srid: i32) -> String {
        let mut sql = String::new();
        encode_geometry(Some(geom), dimension, srid, &mut sql);
        sql
    }

    /// Store `geom` through its SQL literal and read it back through `ST_AsBinary`.
    fn roundtrip<G: GeometryTrait<T = f64>>(
        conn: &rusqlite::Connection,
        geom: &G,
        dimension: u32,
    ) -> Result<WkbGeometry> {
        conn.execute_batch("DELETE FROM shapes")?;
        let literal = encoded(geom, dimension, 4326);
        conn.execute_batch(&format!("INSERT INTO shapes (geom) VALUES ({literal})"))?;
        let decoded = conn.query_row("SELECT ST_AsBinary(geom) FROM shapes", [], |row| {
            decode_geometry(row, 0).map_err(|err| rusqlite::Error::UserFunctionError(Box::new(err)))
        })?;
        Ok(decoded.expect("stored geometry"))
    }

    fn assert_roundtrip<G: GeometryTrait<T = f64>>(
        conn: &rusqlite::Connection,
        geom: &G,
        dimension: u32,
    ) -> Result<()> {
        let decoded = roundtrip(conn, geom, dimension)?;

        let mut expected = String::new();
        wkt_writer::write_geometry(&mut expected, geom, dimension);
        assert_eq!(decoded.to_wkt(dimension)?, expected);
        Ok(())
    }

    #[test]
    fn roundtrips_simple_feature_types() -> Result<()> {
        let conn = spatial_connection()?;
        conn.execute_batch("CREATE TABLE shapes (geom BLOB)")?;

        let line = LineString::from(vec![(0.0, 0.0), (1.5, 1.0), (2.0, 0.5)]);
        let line_b = LineString::from(vec![(-1.0, -1.0), (-2.0, -3.0)]);
        let polygon = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (3.0, 0.0), (3.0, 3.0), (0.0, 3.0), (0.0, 0.0)]),
            vec![LineString::from(vec![
                (1.0, 1.0),
                (2.0, 1.0),
                (2.0, 2.0),
                (1.0, 1.0),
            ])],
        );
        let polygon_b = Polygon::new(
            LineString::from(vec![
                (10.0, 10.0),
                (12.0, 10.0),
                (12.0, 12.0),
                (10.0, 10.0),
            ]),
            vec![],
        );

        assert_roundtrip(&conn, &Point::new(1.0, 2.0), 2)?;
        assert_roundtrip(&conn, &line, 2)?;
        assert_roundtrip(&conn, &polygon, 2)?;
        assert_roundtrip(
            &conn,
            &MultiPoint::from(vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]),
            2,
        )?;
        assert_roundtrip(&conn, &MultiLineString::new(vec![line, line_b]), 2)?;
        assert_roundtrip(&conn, &MultiPolygon::new(vec![polygon, polygon_b]), 2)?;
        Ok(())
    }

    #[test]
    fn roundtrips_z_when_three_dimensions_are_requested() -> Result<()> {
        let conn = spatial_connection()?;
        conn.execute_batch("CREATE TABLE shapes (geom BLOB)")?;

        let point = Wkt::<f64>::from_str("POINT Z (1 2 3)").expect("wkt");
        let decoded = roundtrip(&conn, &point, 3)?;
        assert_eq!(decoded.wkb()?.dim(), geo_traits::Dimensions::Xyz);
        assert_eq!(decoded.to_wkt(3)?, "POINT Z (1 2 3)");

        let decoded = roundtrip(&conn, &point, 2)?;
        assert_eq!(decoded.wkb()?.dim(), geo_traits::Dimensions::Xy);
        Ok(())
    }

    #[test]
    fn encodes_literal_with_srid() {
        assert_eq!(
            encoded(&Point::new(1.0, 2.0), 2, 4326),
            "ST_GeomFromText('POINT (1 2)', 4326)"
        );
    }

    #[test]
    fn missing_or_empty_geometries_encode_to_null() {
        let mut sql = String::new();
        encode_geometry::<Point<f64>>(None, 2, 4326, &mut sql);
        assert_eq!(sql, "NULL");

        assert_eq!(encoded(&LineString::<f64>::new(Vec::new()), 2, 0), "NULL");

        let mut sql = String::new();
        encode_linear_ring(Some(&LineString::<f64>::new(Vec::new())), 2, 0, &mut sql);
        assert_eq!(sql, "NULL");
    }

    #[test]
    fn linear_rings_are_written_as_line_strings() {
        let ring = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        let mut sql = String::new();
        encode_linear_ring(Some(&ring), 2, 3857, &mut sql);

        assert_eq!(
            sql,
            "ST_GeomFromText('LINESTRING (0 0, 1 0, 1 1, 0 0)', 3857)"
        );
        assert!(!sql.contains("RING"));
    }

    #[test]
    fn binary_values_are_hex_literals() {
        let mut sql = String::new();
        encode_binary(Some(&[0x00, 0xFF, 0x1A][..]), &mut sql);
        assert_eq!(sql, "'00ff1a'");

        let mut sql = String::new();
        encode_binary(Some(&[][..]), &mut sql);
        assert_eq!(sql, "''");

        let mut sql = String::new();
        encode_binary(None, &mut sql);
        assert_eq!(sql, "NULL");
    }

    #[test]
    fn decode_rejects_malformed_payload() -> Result<()> {
        let conn = rusqlite::Connection::open_in_memory()?;
        let err = conn
            .query_row("SELECT X'010203'", [], |row| {
                Ok(decode_geometry(row, 0).expect_err("garbage should fail"))
            })?;
        assert!(matches!(err, DialectError::GeometryDecode { column: 0, .. }));
        Ok(())
    }

    #[test]
    fn decode_null_geometry_is_none() -> Result<()> {
        let conn = rusqlite::Connection::open_in_memory()?;
        let decoded = conn.query_row("SELECT NULL", [], |row| {
            decode_geometry(row, 0).map_err(|err| rusqlite::Error::UserFunctionError(Box::new(err)))
        })?;
        assert_eq!(decoded, None);
        Ok(())
    }

    #[test]
    fn decode_extent_of_null_is_empty() -> Result<()> {
        let conn = rusqlite::Connection::open_in_memory()?;
        let envelope = conn.query_row("SELECT NULL", [], |row| {
            decode_extent(row, 0).map_err(|err| rusqlite::Error::UserFunctionError(Box::new(err)))
        })?;
        assert!(envelope.is_empty());
        Ok(())
    }

    #[test]
    fn decode_extent_reads_box_polygon() -> Result<()> {
        let envelope = decode_extent_text(Some("POLYGON ((1 2, 5 2, 5 7, 1 7, 1 2))"))?;
        assert_eq!(envelope, Envelope::new(1.0, 5.0, 2.0, 7.0));

        let envelope = decode_extent_text(Some("POINT (3 4)"))?;
        assert_eq!(envelope, Envelope::new(3.0, 3.0, 4.0, 4.0));
        Ok(())
    }

    #[test]
    fn decode_extent_reports_parse_failure_as_io() {
        let err = decode_extent_text(Some("POLYGON ((1 2, oops))")).expect_err("bad wkt");
        match err {
            DialectError::Io(err) => {
                assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
                assert!(err.to_string().contains("bounding box"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
