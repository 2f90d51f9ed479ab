//! Spatial DDL issued after the base table of a feature type exists.

use crate::connection::SqlConnection;
use crate::conversions::native_type_name_for;
use crate::crs::lookup_epsg_code;
use crate::error::{DialectError, Result};
use crate::spatial_sql::{DEFAULT_SCHEMA, sql_alter_geometry_column, sql_create_spatial_index};
use crate::types::{
    FeatureType, GeometryAttribute, GeometryColumnDefinition, TableSpatialDefinition,
};
use tracing::debug;

/// Coordinate dimension used when an attribute carries no hint.
pub const DEFAULT_DIMENSION: u32 = 2;

/// Highest coordinate dimension the engine stores.
pub const MAX_DIMENSION: u32 = 3;

/// Collect the geometry columns of `feature_type` in declaration order.
///
/// Every dimension is validated here, so a rejected feature type never
/// reaches the connection.
pub fn table_spatial_definition(
    schema: Option<&str>,
    feature_type: &FeatureType,
) -> Result<TableSpatialDefinition> {
    let columns = feature_type
        .attributes
        .iter()
        .filter_map(|attr| attr.geometry.as_ref().map(|geom| (attr.name.as_str(), geom)))
        .map(|(name, geom)| geometry_column_definition(name, geom))
        .collect::<Result<Vec<_>>>()?;

    Ok(TableSpatialDefinition {
        schema: schema.unwrap_or(DEFAULT_SCHEMA).to_string(),
        table: feature_type.name.clone(),
        columns,
    })
}

fn geometry_column_definition(
    column: &str,
    geometry: &GeometryAttribute,
) -> Result<GeometryColumnDefinition> {
    let dimension = geometry.coordinate_dimension.unwrap_or(DEFAULT_DIMENSION);
    if dimension > MAX_DIMENSION {
        return Err(DialectError::UnsupportedDimension {
            column: column.to_string(),
            dimension,
        });
    }

    Ok(GeometryColumnDefinition {
        column: column.to_string(),
        kind: geometry.kind,
        srid: attribute_srid(column, geometry),
        dimension,
    })
}

fn attribute_srid(column: &str, geometry: &GeometryAttribute) -> i32 {
    if let Some(srid) = geometry.native_srid {
        return srid;
    }
    let Some(crs) = geometry.crs.as_deref() else {
        return 0;
    };
    match lookup_epsg_code(crs) {
        Ok(Some(code)) => code,
        Ok(None) => 0,
        Err(err) => {
            debug!(column, error = %err, "could not determine the EPSG code, using srid 0");
            0
        }
    }
}

/// Retype every geometry column and give it a spatial index.
///
/// Statements run in attribute order and the first failure aborts the rest.
/// Outside autocommit mode the work is committed before returning.
pub fn post_create_table<C: SqlConnection>(
    schema: Option<&str>,
    feature_type: &FeatureType,
    cx: &C,
) -> Result<()> {
    let definition = table_spatial_definition(schema, feature_type)?;
    create_spatial_columns(&definition, cx)?;
    if !cx.is_autocommit() {
        cx.commit()?;
    }
    Ok(())
}

pub(crate) fn create_spatial_columns<C: SqlConnection>(
    definition: &TableSpatialDefinition,
    cx: &C,
) -> Result<()> {
    for column in &definition.columns {
        let alter = sql_alter_geometry_column(
            &definition.schema,
            &definition.table,
            &column.column,
            native_type_name_for(column.kind),
        );
        debug!(sql = %alter, srid = column.srid, dimension = column.dimension, "create geometry column");
        cx.execute(&alter)?;

        let index = sql_create_spatial_index(&definition.schema, &definition.table, &column.column);
        debug!(sql = %index, "create spatial index");
        cx.execute(&index)?;
    }
    Ok(())
}

/// Does nothing; spatial tables are not dropped through the dialect.
pub fn post_drop_table<C: SqlConnection>(
    _schema: Option<&str>,
    _feature_type: &FeatureType,
    _cx: &C,
) -> Result<()> {
    Ok(())
}
