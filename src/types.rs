/// Abstract geometry subtypes known to the store engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    Geometry,
    Point,
    LineString,
    LinearRing,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 9] = [
        GeometryKind::Geometry,
        GeometryKind::Point,
        GeometryKind::LineString,
        GeometryKind::LinearRing,
        GeometryKind::Polygon,
        GeometryKind::MultiPoint,
        GeometryKind::MultiLineString,
        GeometryKind::MultiPolygon,
        GeometryKind::GeometryCollection,
    ];
}

/// Host-side types a column can be materialized as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Uuid,
    String,
    Long,
    Integer,
    Short,
    Boolean,
    Double,
    Float,
    Date,
    Time,
    Timestamp,
    Bytes,
    Geometry(GeometryKind),
}

/// SQL type codes as reported by column metadata.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SqlTypeCode {
    Varchar,
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Date,
    Time,
    Timestamp,
    VarBinary,
    Other,
}

/// Column description handed over during schema introspection.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnMetadata {
    pub schema: Option<String>,
    pub table: String,
    pub column: String,
    /// Native type name, e.g. `geometry` or `int4`.
    pub type_name: String,
}

/// Spatial metadata of a single geometry column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSpatialMetadata {
    /// `0` means either SRID 0 or that no SRID could be resolved.
    pub srid: i32,
    pub dimension: u32,
    pub kind: GeometryKind,
}

/// Geometry-specific part of an attribute descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryAttribute {
    pub kind: GeometryKind,
    /// Native SRID attached to the attribute; wins over `crs`.
    pub native_srid: Option<i32>,
    /// Coordinate reference system, as an identifier or WKT.
    pub crs: Option<String>,
    pub coordinate_dimension: Option<u32>,
}

impl GeometryAttribute {
    pub fn new(kind: GeometryKind) -> Self {
        Self {
            kind,
            native_srid: None,
            crs: None,
            coordinate_dimension: None,
        }
    }

    pub fn with_native_srid(mut self, srid: i32) -> Self {
        self.native_srid = Some(srid);
        self
    }

    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    pub fn with_coordinate_dimension(mut self, dimension: u32) -> Self {
        self.coordinate_dimension = Some(dimension);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDescriptor {
    pub name: String,
    /// `None` for non-spatial attributes.
    pub geometry: Option<GeometryAttribute>,
}

impl AttributeDescriptor {
    pub fn scalar(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            geometry: None,
        }
    }

    pub fn geometry(name: impl Into<String>, geometry: GeometryAttribute) -> Self {
        Self {
            name: name.into(),
            geometry: Some(geometry),
        }
    }
}

/// Abstract description of a feature type, attributes in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureType {
    pub name: String,
    pub attributes: Vec<AttributeDescriptor>,
}

/// One geometry column to register after table creation.
#[derive(Clone, Debug, PartialEq)]
pub struct GeometryColumnDefinition {
    pub column: String,
    pub kind: GeometryKind,
    pub srid: i32,
    pub dimension: u32,
}

/// Geometry columns of a freshly created table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableSpatialDefinition {
    pub schema: String,
    pub table: String,
    pub columns: Vec<GeometryColumnDefinition>,
}

/// Query hints that influence geometry projection.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QueryHints {
    pub force_2d: bool,
    pub simplification_distance: Option<f64>,
}

/// Hints a dialect can honor natively.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SupportedHint {
    Force2D,
    GeometrySimplification,
}
