use std::error::Error;
use std::fmt;

/// Crate error type for dialect operations.
#[derive(Debug)]
pub enum DialectError {
    /// Wraps errors returned by `rusqlite` or reported by a `SqlConnection`.
    Sql(rusqlite::Error),
    /// Wraps errors returned by the `wkb` crate.
    Wkb(wkb::error::WkbError),
    /// A stored geometry payload could not be parsed.
    GeometryDecode {
        column: usize,
        source: wkb::error::WkbError,
    },
    /// A geometry column held a value that is neither a blob nor `NULL`.
    UnexpectedGeometryValue {
        column: usize,
        actual: rusqlite::types::Type,
    },
    /// Stored geometry blob is too short for its header.
    InvalidGeometryBlob {
        len: usize,
        minimum: usize,
    },
    /// Invalid envelope flags in a stored geometry blob header.
    InvalidGeometryFlags(u8),
    /// A WKT string could not be parsed.
    Wkt(String),
    /// Wraps I/O category failures, e.g. a malformed bounding box.
    Io(std::io::Error),
    /// The engine stores only 2 or 3 coordinate dimensions.
    UnsupportedDimension {
        column: String,
        dimension: u32,
    },
    /// A coordinate reference system carried a malformed EPSG code.
    InvalidCrs(String),
}

impl fmt::Display for DialectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sql(err) => write!(f, "{err}"),
            Self::Wkb(err) => write!(f, "{err}"),
            Self::GeometryDecode { column, source } => {
                write!(f, "malformed geometry payload in column {column}: {source}")
            }
            Self::UnexpectedGeometryValue { column, actual } => {
                write!(f, "expected geometry blob in column {column}, got {actual}")
            }
            Self::InvalidGeometryBlob { len, minimum } => write!(
                f,
                "invalid geometry blob length: got {len} bytes, expected at least {minimum}"
            ),
            Self::InvalidGeometryFlags(flags) => {
                write!(f, "invalid geometry blob flags: {flags:#04x}")
            }
            Self::Wkt(err) => write!(f, "invalid wkt: {err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::UnsupportedDimension { column, dimension } => write!(
                f,
                "only geometries with 2 and 3 dimensions are supported, column '{column}' requests {dimension}"
            ),
            Self::InvalidCrs(crs) => write!(f, "cannot look up an EPSG code for crs: {crs}"),
        }
    }
}

impl Error for DialectError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sql(err) => Some(err),
            Self::Wkb(err) => Some(err),
            Self::GeometryDecode { source, .. } => Some(source),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for DialectError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Sql(err)
    }
}

impl From<wkb::error::WkbError> for DialectError {
    fn from(err: wkb::error::WkbError) -> Self {
        Self::Wkb(err)
    }
}

impl From<std::io::Error> for DialectError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, DialectError>;
