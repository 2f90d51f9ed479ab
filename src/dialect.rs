use crate::codec::{self, WkbGeometry};
use crate::connection::SqlConnection;
use crate::conversions::{
    self, base_host_type_from_name, base_sql_type_code_for, base_sql_type_name,
};
use crate::ddl;
use crate::envelope::Envelope;
use crate::error::Result;
use crate::fragments;
use crate::metadata;
use crate::spatial_sql::{quote_ident, quote_literal};
use crate::types::{
    ColumnMetadata, FeatureType, GeometryKind, HostType, QueryHints, SqlTypeCode, SupportedHint,
};
use geo_traits::{GeometryTrait, LineStringTrait};
use rusqlite::Row;
use rusqlite::types::Value;

/// Capabilities a SQL store engine needs from a database dialect.
///
/// Methods are grouped by concern: type mapping, metadata, value codec,
/// DDL and query fragments. Fragment writers append to `sql`.
pub trait SqlDialect {
    // Type mapping

    /// Native column type name for a geometry kind.
    fn native_type_name_for(&self, kind: GeometryKind) -> &'static str;

    /// Geometry kind for a native type name, `Geometry` when unknown.
    fn geometry_kind_for(&self, type_name: Option<&str>) -> GeometryKind;

    fn host_type_from_name(&self, type_name: &str) -> Option<HostType>;

    fn sql_type_code_for(&self, host_type: HostType) -> SqlTypeCode;

    /// Type name to use instead of the generic one for a SQL type code.
    fn sql_type_name_override(&self, code: SqlTypeCode) -> Option<&'static str>;

    fn sql_type_name(&self, code: SqlTypeCode) -> &'static str {
        self.sql_type_name_override(code)
            .unwrap_or_else(|| base_sql_type_name(code))
    }

    fn geometry_type_name(&self) -> &'static str;

    /// `None` means unbounded.
    fn default_varchar_size(&self) -> Option<u32>;

    fn desired_table_types(&self) -> &'static [&'static str];

    /// Host type of an introspected column, `None` when unknown.
    fn get_mapping<C: SqlConnection>(&self, column: &ColumnMetadata, cx: &C) -> Option<HostType>;

    // Metadata

    fn resolve_srid<C: SqlConnection>(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        cx: &C,
    ) -> Result<i32>;

    fn resolve_dimension<C: SqlConnection>(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        cx: &C,
    ) -> Result<u32>;

    fn resolve_geometry_kind<C: SqlConnection>(
        &self,
        column: &ColumnMetadata,
        cx: &C,
    ) -> GeometryKind;

    // Value codec

    fn decode_geometry(&self, row: &Row<'_>, idx: usize) -> Result<Option<WkbGeometry>>;

    fn encode_geometry<G: GeometryTrait<T = f64>>(
        &self,
        value: Option<&G>,
        dimension: u32,
        srid: i32,
        sql: &mut String,
    );

    fn encode_linear_ring<L: LineStringTrait<T = f64>>(
        &self,
        ring: Option<&L>,
        dimension: u32,
        srid: i32,
        sql: &mut String,
    );

    /// Scalar literal for a non-geometry value.
    fn encode_value(&self, value: &Value, sql: &mut String);

    fn decode_extent(&self, row: &Row<'_>, idx: usize) -> Result<Envelope>;

    // DDL

    fn initialize_connection<C: SqlConnection>(&self, cx: &C) -> Result<()>;

    fn post_create_table<C: SqlConnection>(
        &self,
        schema: Option<&str>,
        feature_type: &FeatureType,
        cx: &C,
    ) -> Result<()>;

    fn post_drop_table<C: SqlConnection>(
        &self,
        schema: Option<&str>,
        feature_type: &FeatureType,
        cx: &C,
    ) -> Result<()>;

    // Query fragments

    fn encode_column_name(&self, prefix: Option<&str>, column: &str, sql: &mut String);

    fn encode_geometry_column(
        &self,
        prefix: Option<&str>,
        column: &str,
        hints: &QueryHints,
        sql: &mut String,
    );

    fn encode_geometry_column_simplified(
        &self,
        prefix: Option<&str>,
        column: &str,
        distance: f64,
        sql: &mut String,
    );

    fn encode_geometry_envelope(&self, table: &str, column: &str, sql: &mut String);

    fn is_limit_offset_supported(&self) -> bool;

    fn apply_limit_offset(&self, sql: &mut String, limit: i32, offset: i32);

    fn encode_primary_key(&self, column: &str, sql: &mut String);

    fn supported_hints(&self) -> Vec<SupportedHint>;

    fn is_aggregated_sort_supported(&self, function: &str) -> bool;

    fn include_table(&self, schema: Option<&str>, table: &str) -> bool;

    fn sequence_for_column<C: SqlConnection>(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        cx: &C,
    ) -> Result<Option<String>>;

    fn next_sequence_value<C: SqlConnection>(
        &self,
        schema: Option<&str>,
        sequence: &str,
        cx: &C,
    ) -> Result<Option<i64>>;

    fn last_auto_generated_value<C: SqlConnection>(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        cx: &C,
    ) -> Result<Option<i64>>;
}

/// Generic SQL behavior shared by dialects.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicDialect;

impl BasicDialect {
    pub fn quote_ident(&self, name: &str) -> String {
        quote_ident(name)
    }

    pub fn encode_column_name(&self, prefix: Option<&str>, column: &str, sql: &mut String) {
        fragments::encode_column_name(prefix, column, sql);
    }

    pub fn encode_value(&self, value: &Value, sql: &mut String) {
        match value {
            Value::Null => sql.push_str("NULL"),
            Value::Integer(v) => sql.push_str(&v.to_string()),
            Value::Real(v) => sql.push_str(&format!("{v:?}")),
            Value::Text(v) => sql.push_str(&quote_literal(v)),
            Value::Blob(v) => {
                sql.push_str("X'");
                for byte in v {
                    sql.push_str(&format!("{byte:02X}"));
                }
                sql.push('\'');
            }
        }
    }

    pub fn host_type_from_name(&self, type_name: &str) -> Option<HostType> {
        base_host_type_from_name(type_name.trim())
    }

    pub fn sql_type_code_for(&self, host_type: HostType) -> SqlTypeCode {
        base_sql_type_code_for(host_type)
    }

    pub fn default_varchar_size(&self) -> Option<u32> {
        Some(255)
    }

    pub fn desired_table_types(&self) -> &'static [&'static str] {
        &["TABLE", "VIEW", "MATERIALIZED VIEW", "SYNONYM"]
    }

    pub fn is_limit_offset_supported(&self) -> bool {
        false
    }

    pub fn is_aggregated_sort_supported(&self, _function: &str) -> bool {
        false
    }

    pub fn include_table(&self, _schema: Option<&str>, _table: &str) -> bool {
        true
    }

    pub fn initialize_connection<C: SqlConnection>(&self, _cx: &C) -> Result<()> {
        Ok(())
    }
}

/// Feature switches of [`H2gisDialect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DialectOptions {
    /// Let the filter translator encode functions natively.
    pub function_encoding_enabled: bool,
    /// Wrap geometry projections in `ST_Simplify` when asked to.
    pub simplify_enabled: bool,
}

impl Default for DialectOptions {
    fn default() -> Self {
        Self {
            function_encoding_enabled: true,
            simplify_enabled: true,
        }
    }
}

/// Dialect for an H2GIS spatial database.
#[derive(Clone, Debug, Default)]
pub struct H2gisDialect {
    options: DialectOptions,
    base: BasicDialect,
}

impl H2gisDialect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DialectOptions) -> Self {
        Self {
            options,
            base: BasicDialect,
        }
    }

    pub fn options(&self) -> DialectOptions {
        self.options
    }

    pub fn is_function_encoding_enabled(&self) -> bool {
        self.options.function_encoding_enabled
    }

    pub fn set_function_encoding_enabled(&mut self, enabled: bool) {
        self.options.function_encoding_enabled = enabled;
    }

    pub fn is_simplify_enabled(&self) -> bool {
        self.options.simplify_enabled
    }

    pub fn set_simplify_enabled(&mut self, enabled: bool) {
        self.options.simplify_enabled = enabled;
    }
}

impl SqlDialect for H2gisDialect {
    fn native_type_name_for(&self, kind: GeometryKind) -> &'static str {
        conversions::native_type_name_for(kind)
    }

    fn geometry_kind_for(&self, type_name: Option<&str>) -> GeometryKind {
        conversions::geometry_kind_for(type_name)
    }

    fn host_type_from_name(&self, type_name: &str) -> Option<HostType> {
        conversions::native_host_type_from_name(type_name.trim())
            .or_else(|| self.base.host_type_from_name(type_name))
    }

    fn sql_type_code_for(&self, host_type: HostType) -> SqlTypeCode {
        match host_type {
            HostType::Geometry(_) | HostType::Uuid => SqlTypeCode::Other,
            other => self.base.sql_type_code_for(other),
        }
    }

    fn sql_type_name_override(&self, code: SqlTypeCode) -> Option<&'static str> {
        match code {
            SqlTypeCode::Varchar => Some("VARCHAR"),
            SqlTypeCode::Boolean => Some("BOOL"),
            _ => None,
        }
    }

    fn geometry_type_name(&self) -> &'static str {
        "geometry"
    }

    fn default_varchar_size(&self) -> Option<u32> {
        None
    }

    fn desired_table_types(&self) -> &'static [&'static str] {
        &["TABLE", "VIEW", "TABLE LINK", "EXTERNAL"]
    }

    fn get_mapping<C: SqlConnection>(&self, column: &ColumnMetadata, cx: &C) -> Option<HostType> {
        metadata::column_host_type(column, cx)
    }

    fn resolve_srid<C: SqlConnection>(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        cx: &C,
    ) -> Result<i32> {
        metadata::resolve_srid(schema, table, column, cx)
    }

    fn resolve_dimension<C: SqlConnection>(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
        cx: &C,
    ) -> Result<u32> {
        metadata::resolve_dimension(schema, table, column, cx)
    }

    fn resolve_geometry_kind<C: SqlConnection>(
        &self,
        column: &ColumnMetadata,
        cx: &C,
    ) -> GeometryKind {
        metadata::resolve_geometry_kind(column, cx)
    }

    fn decode_geometry(&self, row: &Row<'_>, idx: usize) -> Result<Option<WkbGeometry>> {
        codec::decode_geometry(row, idx)
    }

    fn encode_geometry<G: GeometryTrait<T = f64>>(
        &self,
        value: Option<&G>,
        dimension: u32,
        srid: i32,
        sql: &mut String,
    ) {
        codec::encode_geometry(value, dimension, srid, sql);
    }

    fn encode_linear_ring<L: LineStringTrait<T = f64>>(
        &self,
        ring: Option<&L>,
        dimension: u32,
        srid: i32,
        sql: &mut String,
    ) {
        codec::encode_linear_ring(ring, dimension, srid, sql);
    }

    fn encode_value(&self, value: &Value, sql: &mut String) {
        match value {
            Value::Blob(bytes) => codec::encode_binary(Some(bytes.as_slice()), sql),
            other => self.base.encode_value(other, sql),
        }
    }

    fn decode_extent(&self, row: &Row<'_>, idx: usize) -> Result<Envelope> {
        codec::decode_extent(row, idx)
    }

    fn initialize_connection<C: SqlConnection>(&self, cx: &C) -> Result<()> {
        self.base.initialize_connection(cx)
    }

    fn post_create_table<C: SqlConnection>(
        &self,
        schema: Option<&str>,
        feature_type: &FeatureType,
        cx: &C,
    ) -> Result<()> {
        ddl::post_create_table(schema, feature_type, cx)
    }

    fn post_drop_table<C: SqlConnection>(
        &self,
        schema: Option<&str>,
        feature_type: &FeatureType,
        cx: &C,
    ) -> Result<()> {
        ddl::post_drop_table(schema, feature_type, cx)
    }

    fn encode_column_name(&self, prefix: Option<&str>, column: &str, sql: &mut String) {
        self.base.encode_column_name(prefix, column, sql);
    }

    fn encode_geometry_column(
        &self,
        prefix: Option<&str>,
        column: &str,
        hints: &QueryHints,
        sql: &mut String,
    ) {
        match hints.simplification_distance {
            Some(distance) if self.is_simplify_enabled() => {
                fragments::encode_geometry_column_simplified(prefix, column, distance, sql)
            }
            _ => fragments::encode_geometry_column(prefix, column, hints, sql),
        }
    }

    fn encode_geometry_column_simplified(
        &self,
        prefix: Option<&str>,
        column: &str,
        distance: f64,
        sql: &mut String,
    ) {
        if self.is_simplify_enabled() {
            fragments::encode_geometry_column_simplified(prefix, column, distance, sql);
        } else {
            fragments::encode_geometry_column(prefix, column, &QueryHints::default(), sql);
        }
    }

    fn encode_geometry_envelope(&self, _table: &str, column: &str, sql: &mut String) {
        fragments::encode_geometry_envelope(column, sql);
    }

    fn is_limit_offset_supported(&self) -> bool {
        true
    }

    fn apply_limit_offset(&self, sql: &mut String, limit: i32, offset: i32) {
        fragments::apply_limit_offset(sql, limit, offset);
    }

    fn encode_primary_key(&self, column: &str, sql: &mut String) {
        fragments::encode_primary_key(column, sql);
    }

    fn supported_hints(&self) -> Vec<SupportedHint> {
        let mut hints = vec![SupportedHint::Force2D];
        if self.is_simplify_enabled() {
            hints.push(SupportedHint::GeometrySimplification);
        }
        hints
    }

    fn is_aggregated_sort_supported(&self, function: &str) -> bool {
        function.eq_ignore_ascii_case("distinct")
            || self.base.is_aggregated_sort_supported(function)
    }

    fn include_table(&self, schema: Option<&str>, table: &str) -> bool {
        fragments::include_table(table) && self.base.include_table(schema, table)
    }

    fn sequence_for_column<C: SqlConnection>(
        &self,
        _schema: Option<&str>,
        table: &str,
        column: &str,
        cx: &C,
    ) -> Result<Option<String>> {
        fragments::sequence_for_column(table, column, cx)
    }

    fn next_sequence_value<C: SqlConnection>(
        &self,
        _schema: Option<&str>,
        sequence: &str,
        cx: &C,
    ) -> Result<Option<i64>> {
        fragments::next_sequence_value(sequence, cx)
    }

    fn last_auto_generated_value<C: SqlConnection>(
        &self,
        _schema: Option<&str>,
        _table: &str,
        _column: &str,
        cx: &C,
    ) -> Result<Option<i64>> {
        fragments::last_auto_generated_value(cx)
    }
}
