use crate::dimension::Dimensions;
use crate::types::GeometryKind;

/// The result returned by many methods within the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Decoding failures. Encoding cannot fail, so every variant describes a
/// buffer that could not be read, along with where the problem was found.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("buffer truncated at offset {offset}: needed {needed} bytes, found {available}")]
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("malformed GeoPackage header at offset {offset}: {reason}")]
    MalformedHeader { offset: usize, reason: String },
    #[error("dimension mismatch at offset {offset}: expected {expected}, found {found}")]
    DimensionMismatch {
        offset: usize,
        expected: Dimensions,
        found: Dimensions,
    },
    #[error("geometry type mismatch at offset {offset}: expected {expected}, found {found}")]
    ShapeMismatch {
        offset: usize,
        expected: GeometryKind,
        found: GeometryKind,
    },
    #[error("unsupported WKB geometry type {code} at offset {offset}")]
    UnsupportedGeometryType { offset: usize, code: u32 },
    #[error("invalid WKB byte order marker {found} at offset {offset}")]
    InvalidByteOrder { offset: usize, found: u8 },
    #[error("no equivalent geometry for {0}")]
    UnsupportedConversion(&'static str),
}

impl Error {
    pub(crate) fn malformed_header(offset: usize, reason: impl Into<String>) -> Self {
        Error::MalformedHeader {
            offset,
            reason: reason.into(),
        }
    }
}
