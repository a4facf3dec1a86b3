//! Encoding and decoding of simple-feature geometries as OGC Well-Known
//! Binary and as GeoPackage geometry blobs, in 2D, Z, M and ZM.
//!
//! ```
//! use gpkg_geometry::{GeoPackageWKB, LineString, PointZ};
//!
//! let ls: LineString = LineString::new(vec![[0.0, 0.0], [1.0, 1.0]]).with_srs_id(3857);
//! let blob = ls.to_gpkg();
//! let decoded: LineString = LineString::from_gpkg(&blob).unwrap();
//! assert_eq!(decoded, ls);
//!
//! let pt = PointZ::new([1.0, 2.0, 3.0], 4326);
//! assert_eq!(pt.to_wkb(true).len(), 29);
//! ```

#[cfg(feature = "geo-types")]
mod conversions;
mod coords;
pub mod dimension;
pub mod geometry;
pub mod gpkg_wkb;
pub mod header;
pub mod reader;
pub mod result;
#[cfg(feature = "rusqlite")]
mod sql;
pub mod srs;
pub mod types;

pub use crate::dimension::{Coordinate, Dimension, Dimensions, XY, XYM, XYZ, XYZM};
pub use crate::geometry::Geometry;
pub use crate::gpkg_wkb::{parse_type_code, wkb_type_code, GeoPackageWKB};
pub use crate::result::{Error, Result};
pub use crate::srs::{SpatialRefSys, DEFAULT_SRS_ID};
pub use crate::types::*;
