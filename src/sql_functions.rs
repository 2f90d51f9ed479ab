use crate::blob::{blob_srid, blob_to_wkb, wkb_to_blob};
use crate::error::{DialectError, Result};
use crate::wkt_writer;
use geo_traits::{Dimensions, GeometryTrait};
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::{Type, ValueRef};
use rusqlite::{Connection, Error};
use std::str::FromStr;
use wkb::reader::Wkb;
use wkt::Wkt;

/// Register the native spatial functions the dialect emits on an embedded
/// SQLite connection.
///
/// Geometries are stored as blobs carrying their SRID, see `ST_GeomFromText`.
///
/// Example:
/// ```no_run
/// use rusqlite::Connection;
/// use h2gis_dialect::register_spatial_functions;
///
/// let conn = Connection::open_in_memory()?;
/// register_spatial_functions(&conn)?;
/// # Ok::<(), h2gis_dialect::DialectError>(())
/// ```
pub fn register_spatial_functions(conn: &Connection) -> Result<()> {
    register_st_geomfromtext(conn)?;
    register_st_asbinary(conn)?;
    register_st_astext(conn)?;
    register_st_srid(conn)?;
    register_st_coorddim(conn)?;
    register_st_force2d(conn)?;
    Ok(())
}

fn user_error(err: DialectError) -> Error {
    Error::UserFunctionError(Box::new(err))
}

pub(crate) fn register_st_geomfromtext(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "ST_GeomFromText",
        2,
        FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let Some(text) = ctx.get::<Option<String>>(0)? else {
                return Ok(None);
            };
            let srid: i32 = ctx.get(1)?;
            blob_from_wkt(&text, srid).map(Some).map_err(user_error)
        },
    )?;
    Ok(())
}

pub(crate) fn register_st_asbinary(conn: &Connection) -> Result<()> {
    conn.create_scalar_function("ST_AsBinary", 1, FunctionFlags::SQLITE_DETERMINISTIC, |ctx| {
        let wkb = match wkb_from_ctx(ctx)? {
            Some(wkb) => wkb,
            None => return Ok(None),
        };
        Ok(Some(wkb.buf().to_vec()))
    })?;
    Ok(())
}

pub(crate) fn register_st_astext(conn: &Connection) -> Result<()> {
    conn.create_scalar_function("ST_AsText", 1, FunctionFlags::SQLITE_DETERMINISTIC, |ctx| {
        let wkb = match wkb_from_ctx(ctx)? {
            Some(wkb) => wkb,
            None => return Ok(None),
        };
        let mut out = String::new();
        wkt_writer::write_geometry(&mut out, &wkb, 3);
        Ok(Some(out))
    })?;
    Ok(())
}

pub(crate) fn register_st_srid(conn: &Connection) -> Result<()> {
    conn.create_scalar_function("ST_SRID", 1, FunctionFlags::SQLITE_DETERMINISTIC, |ctx| {
        match ctx.get_raw(0) {
            ValueRef::Null => Ok(None),
            ValueRef::Blob(blob) => blob_srid(blob).map(Some).map_err(user_error),
            _ => Err(Error::InvalidFunctionParameterType(0, Type::Blob)),
        }
    })?;
    Ok(())
}

/// Number of ordinates per coordinate: 2, 3 (XYZ or XYM) or 4.
pub(crate) fn register_st_coorddim(conn: &Connection) -> Result<()> {
    conn.create_scalar_function("ST_CoordDim", 1, FunctionFlags::SQLITE_DETERMINISTIC, |ctx| {
        let wkb = match wkb_from_ctx(ctx)? {
            Some(wkb) => wkb,
            None => return Ok(None),
        };
        let dim = match wkb.dim() {
            Dimensions::Xy => 2,
            Dimensions::Xyz | Dimensions::Xym => 3,
            Dimensions::Xyzm => 4,
            Dimensions::Unknown(n) => n as i64,
        };
        Ok(Some(dim))
    })?;
    Ok(())
}

pub(crate) fn register_st_force2d(conn: &Connection) -> Result<()> {
    conn.create_scalar_function("ST_Force2D", 1, FunctionFlags::SQLITE_DETERMINISTIC, |ctx| {
        let blob = match ctx.get_raw(0) {
            ValueRef::Null => return Ok(None),
            ValueRef::Blob(blob) => blob,
            _ => return Err(Error::InvalidFunctionParameterType(0, Type::Blob)),
        };
        let srid = blob_srid(blob).map_err(user_error)?;
        let wkb = blob_to_wkb(blob).map_err(user_error)?;
        let mut planar = String::new();
        wkt_writer::write_geometry(&mut planar, &wkb, 2);
        blob_from_wkt(&planar, srid).map(Some).map_err(user_error)
    })?;
    Ok(())
}

fn blob_from_wkt(text: &str, srid: i32) -> Result<Vec<u8>> {
    let geom = Wkt::<f64>::from_str(text).map_err(|err| DialectError::Wkt(err.to_string()))?;
    let mut wkb = Vec::new();
    wkb::writer::write_geometry(&mut wkb, &geom, &Default::default())?;
    Ok(wkb_to_blob(&wkb, srid))
}

fn wkb_from_ctx<'a>(ctx: &'a Context<'a>) -> std::result::Result<Option<Wkb<'a>>, Error> {
    let value = ctx.get_raw(0);
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Blob(blob) => {
            let wkb = blob_to_wkb(blob).map_err(user_error)?;
            Ok(Some(wkb))
        }
        _ => Err(Error::InvalidFunctionParameterType(0, Type::Blob)),
    }
}

#[cfg(test)]
mod tests {
    use super::register_spatial_functions;
    use crate::Result;
    use rusqlite::Connection;

    fn connection() -> Result<Connection> {
        let conn = Connection::open_in_memory()?;
        register_spatial_functions(&conn)?;
        Ok(conn)
    }

    #[test]
    fn stores_srid_with_geometry() -> Result<()> {
        let conn = connection()?;
        let (srid, dim): (i32, i64) = conn.query_row(
            "SELECT ST_SRID(g), ST_CoordDim(g) FROM (SELECT ST_GeomFromText('POINT (1 2)', 2154) AS g)",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        assert_eq!(srid, 2154);
        assert_eq!(dim, 2);
        Ok(())
    }

    #[test]
    fn reports_coordinate_dimension() -> Result<()> {
        let conn = connection()?;
        let dim: i64 = conn.query_row(
            "SELECT ST_CoordDim(ST_GeomFromText('LINESTRING Z (0 0 1, 1 1 2)', 0))",
            [],
            |row| row.get(0),
        )?;
        assert_eq!(dim, 3);
        Ok(())
    }

    #[test]
    fn forces_geometries_to_2d() -> Result<()> {
        let conn = connection()?;
        let (text, srid): (String, i32) = conn.query_row(
            "SELECT ST_AsText(g), ST_SRID(g) FROM (SELECT ST_Force2D(ST_GeomFromText('POINT Z (1 2 3)', 4326)) AS g)",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        assert_eq!(text, "POINT (1 2)");
        assert_eq!(srid, 4326);
        Ok(())
    }

    #[test]
    fn null_in_null_out() -> Result<()> {
        let conn = connection()?;
        let (wkb, srid, text): (Option<Vec<u8>>, Option<i32>, Option<String>) = conn.query_row(
            "SELECT ST_AsBinary(NULL), ST_SRID(NULL), ST_AsText(ST_GeomFromText(NULL, 0))",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;
        assert!(wkb.is_none());
        assert!(srid.is_none());
        assert!(text.is_none());
        Ok(())
    }

    #[test]
    fn rejects_malformed_wkt() -> Result<()> {
        let conn = connection()?;
        let result: rusqlite::Result<Vec<u8>> =
            conn.query_row("SELECT ST_GeomFromText('POINT (1', 0)", [], |row| row.get(0));
        assert!(result.is_err());
        Ok(())
    }
}
