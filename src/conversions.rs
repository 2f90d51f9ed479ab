use crate::types::{GeometryKind, HostType, SqlTypeCode};

/// Native type name written when no more specific type applies.
pub const GENERIC_GEOMETRY_TYPE: &str = "GEOMETRY";

/// Native spatial type names recognized on read, planar variants only.
pub const NATIVE_GEOMETRY_TYPES: [&str; 9] = [
    "GEOMETRY",
    "POINT",
    "LINESTRING",
    "POLYGON",
    "MULTIPOINT",
    "MULTILINESTRING",
    "MULTIPOLYGON",
    "GEOMETRYCOLLECTION",
    "GEOGRAPHY",
];

/// Native type name used when writing a column of the given kind.
///
/// The engine has no ring type, so rings are declared as line strings.
#[inline]
pub fn native_type_name_for(kind: GeometryKind) -> &'static str {
    match kind {
        GeometryKind::Geometry => GENERIC_GEOMETRY_TYPE,
        GeometryKind::Point => "POINT",
        GeometryKind::LineString | GeometryKind::LinearRing => "LINESTRING",
        GeometryKind::Polygon => "POLYGON",
        GeometryKind::MultiPoint => "MULTIPOINT",
        GeometryKind::MultiLineString => "MULTILINESTRING",
        GeometryKind::MultiPolygon => "MULTIPOLYGON",
        GeometryKind::GeometryCollection => "GEOMETRYCOLLECTION",
    }
}

/// Abstract kind of a native type name.
///
/// Matching is case-insensitive and measured (`...M`) variants map to the
/// same kind as their planar form. Unknown or missing names fall back to
/// [`GeometryKind::Geometry`].
#[inline]
pub fn geometry_kind_for(type_name: Option<&str>) -> GeometryKind {
    let Some(s) = type_name else {
        return GeometryKind::Geometry;
    };
    let s = s.trim();
    geometry_kind_from_planar_name(s)
        .or_else(|| strip_measure_suffix(s).and_then(geometry_kind_from_planar_name))
        .unwrap_or(GeometryKind::Geometry)
}

fn strip_measure_suffix(s: &str) -> Option<&str> {
    let last = s.chars().last()?;
    if last.eq_ignore_ascii_case(&'m') {
        Some(s[..s.len() - 1].trim_end())
    } else {
        None
    }
}

fn geometry_kind_from_planar_name(s: &str) -> Option<GeometryKind> {
    if s.eq_ignore_ascii_case("GEOMETRY") || s.eq_ignore_ascii_case("GEOGRAPHY") {
        Some(GeometryKind::Geometry)
    } else if s.eq_ignore_ascii_case("POINT") {
        Some(GeometryKind::Point)
    } else if s.eq_ignore_ascii_case("LINESTRING") {
        Some(GeometryKind::LineString)
    } else if s.eq_ignore_ascii_case("POLYGON") {
        Some(GeometryKind::Polygon)
    } else if s.eq_ignore_ascii_case("MULTIPOINT") {
        Some(GeometryKind::MultiPoint)
    } else if s.eq_ignore_ascii_case("MULTILINESTRING") {
        Some(GeometryKind::MultiLineString)
    } else if s.eq_ignore_ascii_case("MULTIPOLYGON") {
        Some(GeometryKind::MultiPolygon)
    } else if s.eq_ignore_ascii_case("GEOMETRYCOLLECTION") {
        Some(GeometryKind::GeometryCollection)
    } else {
        None
    }
}

/// Generic SQL type names every dialect understands.
#[inline]
pub(crate) fn base_host_type_from_name(type_name: &str) -> Option<HostType> {
    let s = type_name;
    if s.eq_ignore_ascii_case("VARCHAR")
        || s.eq_ignore_ascii_case("CHAR")
        || s.eq_ignore_ascii_case("CLOB")
    {
        Some(HostType::String)
    } else if s.eq_ignore_ascii_case("INTEGER") {
        Some(HostType::Integer)
    } else if s.eq_ignore_ascii_case("BIGINT") {
        Some(HostType::Long)
    } else if s.eq_ignore_ascii_case("SMALLINT") || s.eq_ignore_ascii_case("TINYINT") {
        Some(HostType::Short)
    } else if s.eq_ignore_ascii_case("DOUBLE") || s.eq_ignore_ascii_case("DOUBLE PRECISION") {
        Some(HostType::Double)
    } else if s.eq_ignore_ascii_case("REAL") || s.eq_ignore_ascii_case("FLOAT") {
        Some(HostType::Float)
    } else if s.eq_ignore_ascii_case("BOOLEAN") {
        Some(HostType::Boolean)
    } else if s.eq_ignore_ascii_case("BLOB")
        || s.eq_ignore_ascii_case("BINARY")
        || s.eq_ignore_ascii_case("VARBINARY")
    {
        Some(HostType::Bytes)
    } else {
        None
    }
}

/// Engine specific SQL type names, used only during introspection.
#[inline]
pub(crate) fn native_host_type_from_name(type_name: &str) -> Option<HostType> {
    let s = type_name;
    if s.eq_ignore_ascii_case("geometry") {
        Some(HostType::Geometry(GeometryKind::Geometry))
    } else if s.eq_ignore_ascii_case("text") || s.eq_ignore_ascii_case("character") {
        Some(HostType::String)
    } else if s.eq_ignore_ascii_case("int8") {
        Some(HostType::Long)
    } else if s.eq_ignore_ascii_case("int4") || s.eq_ignore_ascii_case("int") {
        Some(HostType::Integer)
    } else if s.eq_ignore_ascii_case("int2") {
        Some(HostType::Short)
    } else if s.eq_ignore_ascii_case("float8") {
        Some(HostType::Double)
    } else if s.eq_ignore_ascii_case("float4") {
        Some(HostType::Float)
    } else if s.eq_ignore_ascii_case("bool") {
        Some(HostType::Boolean)
    } else if s.eq_ignore_ascii_case("date") {
        Some(HostType::Date)
    } else if s.eq_ignore_ascii_case("time") {
        Some(HostType::Time)
    } else if s.eq_ignore_ascii_case("timestamp") || s.eq_ignore_ascii_case("timestamptz") {
        Some(HostType::Timestamp)
    } else if s.eq_ignore_ascii_case("uuid") {
        Some(HostType::Uuid)
    } else {
        None
    }
}

/// Host type for a SQL type name, engine names first.
#[inline]
pub fn host_type_from_name(type_name: &str) -> Option<HostType> {
    let type_name = type_name.trim();
    native_host_type_from_name(type_name).or_else(|| base_host_type_from_name(type_name))
}

#[inline]
pub(crate) fn base_sql_type_code_for(host_type: HostType) -> SqlTypeCode {
    match host_type {
        HostType::Uuid | HostType::String => SqlTypeCode::Varchar,
        HostType::Long => SqlTypeCode::BigInt,
        HostType::Integer => SqlTypeCode::Integer,
        HostType::Short => SqlTypeCode::SmallInt,
        HostType::Boolean => SqlTypeCode::Boolean,
        HostType::Double => SqlTypeCode::Double,
        HostType::Float => SqlTypeCode::Real,
        HostType::Date => SqlTypeCode::Date,
        HostType::Time => SqlTypeCode::Time,
        HostType::Timestamp => SqlTypeCode::Timestamp,
        HostType::Bytes => SqlTypeCode::VarBinary,
        HostType::Geometry(_) => SqlTypeCode::Other,
    }
}

#[inline]
pub(crate) fn base_sql_type_name(code: SqlTypeCode) -> &'static str {
    match code {
        SqlTypeCode::Varchar => "VARCHAR",
        SqlTypeCode::Boolean => "BOOLEAN",
        SqlTypeCode::SmallInt => "SMALLINT",
        SqlTypeCode::Integer => "INTEGER",
        SqlTypeCode::BigInt => "BIGINT",
        SqlTypeCode::Real => "REAL",
        SqlTypeCode::Double => "DOUBLE",
        SqlTypeCode::Date => "DATE",
        SqlTypeCode::Time => "TIME",
        SqlTypeCode::Timestamp => "TIMESTAMP",
        SqlTypeCode::VarBinary => "VARBINARY",
        SqlTypeCode::Other => "OTHER",
    }
}
