use crate::dimension::{Dimensions, XY};
use crate::gpkg_wkb::{read_from_wkb, read_record_header, wkb_type_code, GeoPackageWKB, RecordHeader};
use crate::header::split_blob;
use crate::reader::WkbReader;
use crate::result::{Error, Result};
use crate::types::*;

// only reachable if a kind and dimension pair ever lacks a variant
fn unsupported(record: RecordHeader, offset: usize) -> Error {
    Error::UnsupportedGeometryType {
        offset: offset + 1,
        code: wkb_type_code(record.kind, record.dims),
    }
}

macro_rules! geometry_enum {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        /// Any geometry this crate can encode, for columns whose shape or
        /// dimension is only known once a record has been read
        #[derive(Debug, Clone, PartialEq)]
        pub enum Geometry {
            $($variant($ty),)*
        }

        impl Geometry {
            pub fn srs_id(&self) -> i32 {
                match self {
                    $(Geometry::$variant(g) => g.srs_id(),)*
                }
            }

            pub fn set_srs_id(&mut self, srs_id: i32) {
                match self {
                    $(Geometry::$variant(g) => g.set_srs_id(srs_id),)*
                }
            }

            pub fn is_empty(&self) -> bool {
                match self {
                    $(Geometry::$variant(g) => g.is_empty(),)*
                }
            }

            pub fn kind(&self) -> GeometryKind {
                match self {
                    $(Geometry::$variant(_) => <$ty as GeoPackageWKB>::KIND,)*
                }
            }

            pub fn dimensions(&self) -> Dimensions {
                match self {
                    $(Geometry::$variant(_) => <$ty as GeoPackageWKB>::DIMENSIONS,)*
                }
            }

            pub fn wkb_type_code(&self) -> u32 {
                wkb_type_code(self.kind(), self.dimensions())
            }

            pub fn to_wkb(&self, use_prefix: bool) -> Vec<u8> {
                match self {
                    $(Geometry::$variant(g) => g.to_wkb(use_prefix),)*
                }
            }

            pub fn to_gpkg(&self) -> Vec<u8> {
                match self {
                    $(Geometry::$variant(g) => g.to_gpkg(),)*
                }
            }

            fn decode(record: RecordHeader, r: &mut WkbReader<'_>, srs_id: i32) -> Result<Self> {
                $(
                    if record.kind == <$ty as GeoPackageWKB>::KIND
                        && record.dims == <$ty as GeoPackageWKB>::DIMENSIONS
                    {
                        return read_from_wkb::<$ty>(r, srs_id).map(Geometry::$variant);
                    }
                )*
                Err(unsupported(record, r.offset()))
            }

            fn empty(record: RecordHeader, offset: usize, srs_id: i32) -> Result<Self> {
                $(
                    if record.kind == <$ty as GeoPackageWKB>::KIND
                        && record.dims == <$ty as GeoPackageWKB>::DIMENSIONS
                    {
                        return Ok(Geometry::$variant(<$ty as GeoPackageWKB>::empty(srs_id)));
                    }
                )*
                Err(unsupported(record, offset))
            }
        }

        $(
            impl From<$ty> for Geometry {
                fn from(g: $ty) -> Self {
                    Geometry::$variant(g)
                }
            }
        )*
    };
}

geometry_enum! {
    Point(Point<XY>),
    PointZ(PointZ),
    PointM(PointM),
    PointZM(PointZM),
    LineString(LineString<XY>),
    LineStringZ(LineStringZ),
    LineStringM(LineStringM),
    LineStringZM(LineStringZM),
    Polygon(Polygon<XY>),
    PolygonZ(PolygonZ),
    PolygonM(PolygonM),
    PolygonZM(PolygonZM),
    MultiPoint(MultiPoint<XY>),
    MultiPointZ(MultiPointZ),
    MultiPointM(MultiPointM),
    MultiPointZM(MultiPointZM),
    MultiLineString(MultiLineString<XY>),
    MultiLineStringZ(MultiLineStringZ),
    MultiLineStringM(MultiLineStringM),
    MultiLineStringZM(MultiLineStringZM),
    MultiPolygon(MultiPolygon<XY>),
    MultiPolygonZ(MultiPolygonZ),
    MultiPolygonM(MultiPolygonM),
    MultiPolygonZM(MultiPolygonZM),
}

impl Geometry {
    /// Reads a WKB record of any supported shape and dimension
    pub fn from_wkb(wkb: &[u8]) -> Result<Self> {
        Self::read(WkbReader::new(wkb), crate::srs::DEFAULT_SRS_ID)
    }

    /// Reads a GeoPackage blob of any supported shape and dimension.
    ///
    /// The body of an empty-flagged blob is only consulted for its type code.
    pub fn from_gpkg(blob: &[u8]) -> Result<Self> {
        let (header, body, offset) = split_blob(blob)?;
        let mut rdr = WkbReader::with_base(body, offset);
        if header.is_empty() {
            let record = read_record_header(&mut rdr)?;
            return Self::empty(record, offset, header.srs_id);
        }
        Self::read(rdr, header.srs_id)
    }

    fn read(mut rdr: WkbReader<'_>, srs_id: i32) -> Result<Self> {
        // peek with a copy so the typed decoder sees the whole record
        let record = read_record_header(&mut rdr.clone())?;
        Self::decode(record, &mut rdr, srs_id)
    }
}
