//! Spatial metadata resolution for geometry columns.
//!
//! SRID and coordinate dimension are read from the `GEOMETRY_COLUMNS`
//! catalog first. When the catalog is missing, unreadable, or has no usable
//! value, the first non-null geometry of the column is inspected instead.
//! That fallback assumes the value is uniform across the column; a column
//! mixing SRIDs cannot be queried spatially anyway.
//!
//! `0` is returned both for a genuine SRID 0 and when nothing could be
//! resolved. The two cases are not told apart.

use crate::connection::{SqlConnection, value_as_i64};
use crate::conversions::{geometry_kind_for, host_type_from_name};
use crate::error::Result;
use crate::spatial_sql::{
    DEFAULT_SCHEMA, sql_inspect_first_geometry, sql_select_geometry_column_meta,
    sql_select_geometry_type,
};
use crate::types::{ColumnMetadata, ColumnSpatialMetadata, GeometryKind, HostType};
use rusqlite::types::Value;
use tracing::{debug, warn};

/// A per-column spatial property resolved the same way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SpatialProperty {
    Srid,
    CoordinateDimension,
}

impl SpatialProperty {
    fn catalog_column(self) -> &'static str {
        match self {
            Self::Srid => "SRID",
            Self::CoordinateDimension => "COORD_DIMENSION",
        }
    }

    fn native_function(self) -> &'static str {
        match self {
            Self::Srid => "ST_SRID",
            Self::CoordinateDimension => "ST_CoordDim",
        }
    }
}

/// Outcome of the catalog lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lookup {
    Found(i64),
    NotFound,
}

fn lookup_catalog<C: SqlConnection>(
    property: SpatialProperty,
    schema: &str,
    table: &str,
    column: &str,
    cx: &C,
) -> Lookup {
    let sql = sql_select_geometry_column_meta(property.catalog_column(), schema, table, column);
    debug!(%sql, "geometry metadata check");
    match cx.query_first(&sql) {
        Ok(value) => match value_as_i64(value) {
            Some(0) | None => Lookup::NotFound,
            Some(v) => Lookup::Found(v),
        },
        Err(err) => {
            warn!(
                schema,
                table,
                column,
                error = %err,
                "failed to read geometry_columns, checking the first geometry instead"
            );
            Lookup::NotFound
        }
    }
}

fn inspect_first_geometry<C: SqlConnection>(
    property: SpatialProperty,
    schema: &str,
    table: &str,
    column: &str,
    cx: &C,
) -> Result<i64> {
    let sql = sql_inspect_first_geometry(property.native_function(), schema, table, column);
    debug!(%sql, "geometry inspection");
    Ok(value_as_i64(cx.query_first(&sql)?).unwrap_or(0))
}

pub(crate) fn resolve<C: SqlConnection>(
    property: SpatialProperty,
    schema: Option<&str>,
    table: &str,
    column: &str,
    cx: &C,
) -> Result<i64> {
    let schema = schema.unwrap_or(DEFAULT_SCHEMA);
    match lookup_catalog(property, schema, table, column, cx) {
        Lookup::Found(value) => Ok(value),
        Lookup::NotFound => inspect_first_geometry(property, schema, table, column, cx),
    }
}

/// SRID of a geometry column, `0` when unknown.
pub fn resolve_srid<C: SqlConnection>(
    schema: Option<&str>,
    table: &str,
    column: &str,
    cx: &C,
) -> Result<i32> {
    let srid = resolve(SpatialProperty::Srid, schema, table, column, cx)?;
    Ok(i32::try_from(srid).unwrap_or(0))
}

/// Coordinate dimension of a geometry column, `0` when unknown.
pub fn resolve_dimension<C: SqlConnection>(
    schema: Option<&str>,
    table: &str,
    column: &str,
    cx: &C,
) -> Result<u32> {
    let dimension = resolve(SpatialProperty::CoordinateDimension, schema, table, column, cx)?;
    Ok(u32::try_from(dimension).unwrap_or(0))
}

/// Geometry subtype registered in the catalog for a column.
///
/// Never fails: a missing catalog, a missing row, or an unknown type name
/// all yield [`GeometryKind::Geometry`].
pub fn resolve_geometry_kind<C: SqlConnection>(column: &ColumnMetadata, cx: &C) -> GeometryKind {
    let sql = sql_select_geometry_type(column.schema.as_deref(), &column.table, &column.column);
    debug!(%sql, "geometry type check");
    match cx.query_first(&sql) {
        Ok(Some(Value::Text(type_name))) => geometry_kind_for(Some(type_name.as_str())),
        Ok(_) => GeometryKind::Geometry,
        Err(err) => {
            warn!(
                table = %column.table,
                column = %column.column,
                error = %err,
                "failed to read the geometry type from geometry_columns"
            );
            GeometryKind::Geometry
        }
    }
}

/// SRID, dimension and subtype of a column in one go.
pub fn resolve_column_metadata<C: SqlConnection>(
    column: &ColumnMetadata,
    cx: &C,
) -> Result<ColumnSpatialMetadata> {
    let schema = column.schema.as_deref();
    Ok(ColumnSpatialMetadata {
        srid: resolve_srid(schema, &column.table, &column.column, cx)?,
        dimension: resolve_dimension(schema, &column.table, &column.column, cx)?,
        kind: resolve_geometry_kind(column, cx),
    })
}

/// Host type of an introspected column.
///
/// `uuid` and `geometry` are handled here, the latter with its registered
/// subtype; other names go through the scalar registry.
pub fn column_host_type<C: SqlConnection>(column: &ColumnMetadata, cx: &C) -> Option<HostType> {
    let type_name = column.type_name.trim();
    if type_name.eq_ignore_ascii_case("uuid") {
        Some(HostType::Uuid)
    } else if type_name.eq_ignore_ascii_case("geometry") {
        Some(HostType::Geometry(resolve_geometry_kind(column, cx)))
    } else {
        host_type_from_name(type_name)
    }
}
