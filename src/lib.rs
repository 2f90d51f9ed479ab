//! Spatial SQL dialect for H2GIS-style databases, built on top of rusqlite.
//!
//! ## Overview
//!
//! - `SqlDialect` is the capability interface a SQL store engine talks to:
//!   type mapping, spatial metadata, value encoding, DDL and query fragments.
//! - `H2gisDialect` implements it for an H2GIS engine. Behavior that is not
//!   spatial is delegated to `BasicDialect`.
//! - `SqlConnection` is the minimal connection the dialect needs. It is
//!   implemented for `rusqlite::Connection`.
//! - `register_spatial_functions` installs the native spatial functions the
//!   dialect emits (`ST_GeomFromText`, `ST_AsBinary`, `ST_SRID`, ...) on a
//!   SQLite connection, so the whole round trip can run in-process.
//!
//! Geometries are written as `ST_GeomFromText('<wkt>', <srid>)` literals and
//! read back through `ST_AsBinary(...)` as WKB. Any geometry implementing
//! `geo_traits::GeometryTrait<T = f64>` can be encoded.
//!
//! ## Short usage
//!
//! ```no_run
//! use geo_types::LineString;
//! use h2gis_dialect::{H2gisDialect, QueryHints, SqlDialect, register_spatial_functions};
//! use rusqlite::Connection;
//!
//! let conn = Connection::open_in_memory()?;
//! register_spatial_functions(&conn)?;
//! conn.execute_batch(r#"ATTACH DATABASE ':memory:' AS "PUBLIC";
//!     CREATE TABLE "PUBLIC"."roads" (geom BLOB);"#)?;
//!
//! let dialect = H2gisDialect::new();
//!
//! let mut insert = String::from(r#"INSERT INTO "PUBLIC"."roads" (geom) VALUES ("#);
//! let road = LineString::from(vec![(0.0, 0.0), (10.0, 5.0)]);
//! dialect.encode_geometry(Some(&road), 2, 4326, &mut insert);
//! insert.push(')');
//! conn.execute_batch(&insert)?;
//!
//! let srid = dialect.resolve_srid(None, "roads", "geom", &conn)?;
//! assert_eq!(srid, 4326);
//!
//! let mut select = String::from("SELECT ");
//! dialect.encode_geometry_column(None, "geom", &QueryHints::default(), &mut select);
//! select.push_str(r#" FROM "PUBLIC"."roads""#);
//! # Ok::<(), h2gis_dialect::DialectError>(())
//! ```
//!
//! ## Creating spatial tables
//!
//! After the store engine has created the plain table of a feature type,
//! `post_create_table` retypes each geometry column and indexes it:
//!
//! ```no_run
//! use h2gis_dialect::{
//!     AttributeDescriptor, FeatureType, GeometryAttribute, GeometryKind, H2gisDialect,
//!     SqlDialect,
//! };
//!
//! # fn run(cx: &rusqlite::Connection) -> h2gis_dialect::Result<()> {
//! let parcels = FeatureType {
//!     name: "parcels".to_string(),
//!     attributes: vec![
//!         AttributeDescriptor::scalar("name"),
//!         AttributeDescriptor::geometry(
//!             "the_geom",
//!             GeometryAttribute::new(GeometryKind::MultiPolygon).with_crs("EPSG:2154"),
//!         ),
//!     ],
//! };
//! H2gisDialect::new().post_create_table(None, &parcels, cx)?;
//! # Ok(())
//! # }
//! ```
//!
//! Coordinate dimensions above 3 are rejected before any statement is issued.
mod blob;
mod codec;
mod connection;
mod conversions;
mod crs;
mod ddl;
mod dialect;
mod envelope;
mod error;
mod fragments;
mod metadata;
mod spatial_sql;
mod sql_functions;
mod types;
mod wkt_writer;

#[cfg(test)]
mod test_utils;

pub use codec::{GEOMETRY_CONSTRUCTOR, WkbGeometry};
pub use connection::SqlConnection;
pub use conversions::{
    GENERIC_GEOMETRY_TYPE, NATIVE_GEOMETRY_TYPES, geometry_kind_for, host_type_from_name,
    native_type_name_for,
};
pub use crs::lookup_epsg_code;
pub use ddl::{DEFAULT_DIMENSION, MAX_DIMENSION, table_spatial_definition};
pub use dialect::{BasicDialect, DialectOptions, H2gisDialect, SqlDialect};
pub use envelope::Envelope;
pub use error::{DialectError, Result};
pub use metadata::resolve_column_metadata;
pub use spatial_sql::DEFAULT_SCHEMA;
pub use sql_functions::register_spatial_functions;
pub use types::{
    AttributeDescriptor, ColumnMetadata, ColumnSpatialMetadata, FeatureType, GeometryAttribute,
    GeometryColumnDefinition, GeometryKind, HostType, QueryHints, SqlTypeCode, SupportedHint,
    TableSpatialDefinition,
};

// Re-export rusqlite's owned value so callers can encode scalars without
// depending on rusqlite directly.
pub use rusqlite::types::Value;
