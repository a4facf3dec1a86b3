use byteorder::{BigEndian, ByteOrder, LittleEndian};

use crate::coords::*;
use crate::dimension::{Coordinate, Dimension, Dimensions};
use crate::header::{make_header, split_blob};
use crate::reader::WkbReader;
use crate::result::{Error, Result};
use crate::srs::{defaults, SpatialRefSys, DEFAULT_SRS_ID};
use crate::types::*;

/// OGC type code: the base code of the shape plus 1000/2000/3000 for Z/M/ZM
pub fn wkb_type_code(kind: GeometryKind, dims: Dimensions) -> u32 {
    kind.base_code() + dims.type_code_offset()
}

/// Inverse of [`wkb_type_code`]; `None` for anything this crate does not model
pub fn parse_type_code(code: u32) -> Option<(GeometryKind, Dimensions)> {
    let kind = GeometryKind::from_base_code(code % 1000)?;
    let dims = Dimensions::from_type_code_offset(code / 1000)?;
    Some((kind, dims))
}

/// The first five bytes of a WKB record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordHeader {
    pub little_endian: bool,
    pub kind: GeometryKind,
    pub dims: Dimensions,
}

pub(crate) fn read_record_header(r: &mut WkbReader<'_>) -> Result<RecordHeader> {
    let offset = r.offset();
    let little_endian = match r.read_u8()? {
        BIG_ENDIAN => false,
        LITTLE_ENDIAN => true,
        found => return Err(Error::InvalidByteOrder { offset, found }),
    };
    let code = match little_endian {
        true => r.read_u32::<LittleEndian>()?,
        false => r.read_u32::<BigEndian>()?,
    };
    let (kind, dims) = parse_type_code(code).ok_or(Error::UnsupportedGeometryType {
        offset: offset + 1,
        code,
    })?;
    Ok(RecordHeader {
        little_endian,
        kind,
        dims,
    })
}

mod raw {
    use super::*;

    // the payload of a WKB record, i.e. everything after the byte order and type code
    pub trait WKBBytesRaw: Sized {
        fn write_as_bytes(&self, out: &mut Vec<u8>);
        fn read_from_bytes<T: ByteOrder>(r: &mut WkbReader<'_>, srs_id: i32) -> Result<Self>;
    }
}

use raw::WKBBytesRaw;

/// Encoding and decoding of a geometry as WKB and as a GeoPackage geometry
/// blob, see the GeoPackage [specification](https://www.geopackage.org/spec130/#gpb_spec)
///
/// Writing never fails, provided no collection holds more than `u32::MAX`
/// items. Only little-endian output is produced, while both byte orders are
/// accepted when reading.
pub trait GeoPackageWKB: WKBBytesRaw {
    const KIND: GeometryKind;
    const DIMENSIONS: Dimensions;

    fn srs_id(&self) -> i32;
    fn set_srs_id(&mut self, srs_id: i32);
    fn is_empty(&self) -> bool;
    fn empty(srs_id: i32) -> Self;

    fn wkb_type_code() -> u32 {
        wkb_type_code(Self::KIND, Self::DIMENSIONS)
    }

    /// `use_prefix = false` leaves off the byte order and type code, for
    /// callers that frame the payload themselves
    fn to_wkb(&self, use_prefix: bool) -> Vec<u8> {
        let mut out = Vec::new();
        write_as_wkb(self, &mut out, use_prefix);
        out
    }

    /// Reads a complete WKB record. The srs id is not part of WKB, so the
    /// result carries the default one.
    fn from_wkb(wkb: &[u8]) -> Result<Self> {
        let mut rdr = WkbReader::new(wkb);
        read_from_wkb(&mut rdr, DEFAULT_SRS_ID)
    }

    /// Reads what `to_wkb(false)` wrote
    fn from_wkb_body(body: &[u8]) -> Result<Self> {
        let mut rdr = WkbReader::new(body);
        Self::read_from_bytes::<LittleEndian>(&mut rdr, DEFAULT_SRS_ID)
    }

    fn to_gpkg(&self) -> Vec<u8> {
        let mut out = make_header(self.srs_id(), self.is_empty()).to_vec();
        write_as_wkb(self, &mut out, true);
        out
    }

    /// An empty-flagged blob yields `Self::empty` without looking at the body
    fn from_gpkg(blob: &[u8]) -> Result<Self> {
        let (header, body, offset) = split_blob(blob)?;
        if header.is_empty() {
            return Ok(Self::empty(header.srs_id));
        }
        let mut rdr = WkbReader::with_base(body, offset);
        read_from_wkb(&mut rdr, header.srs_id)
    }

    /// The definition of this geometry's srs, when it is one of the defaults
    /// every GeoPackage carries
    fn spatial_ref_sys(&self) -> Option<&'static SpatialRefSys<'static>> {
        defaults::lookup(self.srs_id())
    }
}

pub(crate) fn write_as_wkb<G: GeoPackageWKB + ?Sized>(geom: &G, out: &mut Vec<u8>, use_prefix: bool) {
    if use_prefix {
        // we will always write as little endian
        write_prefix(out, G::wkb_type_code());
    }
    geom.write_as_bytes(out);
}

pub(crate) fn read_from_wkb<G: GeoPackageWKB>(r: &mut WkbReader<'_>, srs_id: i32) -> Result<G> {
    let offset = r.offset() + 1;
    let header = read_record_header(r)?;
    if header.kind != G::KIND {
        return Err(Error::ShapeMismatch {
            offset,
            expected: G::KIND,
            found: header.kind,
        });
    }
    if header.dims != G::DIMENSIONS {
        return Err(Error::DimensionMismatch {
            offset,
            expected: G::DIMENSIONS,
            found: header.dims,
        });
    }
    match header.little_endian {
        true => G::read_from_bytes::<LittleEndian>(r, srs_id),
        false => G::read_from_bytes::<BigEndian>(r, srs_id),
    }
}

impl<D: Dimension> WKBBytesRaw for Point<D> {
    fn write_as_bytes(&self, out: &mut Vec<u8>) {
        write_coord(out, &self.coord);
    }
    fn read_from_bytes<T: ByteOrder>(r: &mut WkbReader<'_>, srs_id: i32) -> Result<Self> {
        Ok(Point::new(unpack_coord::<T, D::Coord>(r)?, srs_id))
    }
}

impl<D: Dimension> GeoPackageWKB for Point<D> {
    const KIND: GeometryKind = GeometryKind::Point;
    const DIMENSIONS: Dimensions = D::DIMENSIONS;

    fn srs_id(&self) -> i32 {
        self.srs_id
    }
    fn set_srs_id(&mut self, srs_id: i32) {
        self.srs_id = srs_id;
    }
    fn is_empty(&self) -> bool {
        self.coord.is_nan()
    }
    fn empty(srs_id: i32) -> Self {
        Point::new(<D::Coord as Coordinate>::nan(), srs_id)
    }
}

impl<D: Dimension> WKBBytesRaw for LineString<D> {
    fn write_as_bytes(&self, out: &mut Vec<u8>) {
        pack_flat(&self.coordinates, out);
    }
    fn read_from_bytes<T: ByteOrder>(r: &mut WkbReader<'_>, srs_id: i32) -> Result<Self> {
        let coordinates = unpack_flat::<T, D::Coord>(r)?;
        Ok(LineString {
            coordinates,
            srs_id,
        })
    }
}

impl<D: Dimension> GeoPackageWKB for LineString<D> {
    const KIND: GeometryKind = GeometryKind::LineString;
    const DIMENSIONS: Dimensions = D::DIMENSIONS;

    fn srs_id(&self) -> i32 {
        self.srs_id
    }
    fn set_srs_id(&mut self, srs_id: i32) {
        self.srs_id = srs_id;
    }
    fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
    fn empty(srs_id: i32) -> Self {
        LineString::new(Vec::new()).with_srs_id(srs_id)
    }
}

// rings share the polygon's type code and byte order, so only the local
// count and the tuples are written for each of them
impl<D: Dimension> WKBBytesRaw for Polygon<D> {
    fn write_as_bytes(&self, out: &mut Vec<u8>) {
        pack_nested(&self.rings, out, |ring, out| pack_flat(&ring.coordinates, out));
    }
    fn read_from_bytes<T: ByteOrder>(r: &mut WkbReader<'_>, srs_id: i32) -> Result<Self> {
        let rings = unpack_nested::<T, _>(r, COUNT_LEN, |r| {
            unpack_flat::<T, D::Coord>(r).map(LinearRing::new)
        })?;
        Ok(Polygon { rings, srs_id })
    }
}

impl<D: Dimension> GeoPackageWKB for Polygon<D> {
    const KIND: GeometryKind = GeometryKind::Polygon;
    const DIMENSIONS: Dimensions = D::DIMENSIONS;

    fn srs_id(&self) -> i32 {
        self.srs_id
    }
    fn set_srs_id(&mut self, srs_id: i32) {
        self.srs_id = srs_id;
    }
    fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
    fn empty(srs_id: i32) -> Self {
        Polygon::new(Vec::new()).with_srs_id(srs_id)
    }
}

impl<D: Dimension> WKBBytesRaw for MultiPoint<D> {
    fn write_as_bytes(&self, out: &mut Vec<u8>) {
        let point_code = wkb_type_code(GeometryKind::Point, D::DIMENSIONS);
        pack_points(&self.coordinates, Some(point_code), out);
    }
    fn read_from_bytes<T: ByteOrder>(r: &mut WkbReader<'_>, srs_id: i32) -> Result<Self> {
        let min_point_len = PREFIX_LEN + <D::Coord as Coordinate>::STRIDE * 8;
        let coordinates = unpack_nested::<T, _>(r, min_point_len, |r| {
            read_from_wkb::<Point<D>>(r, srs_id).map(|p| p.coord)
        })?;
        Ok(MultiPoint {
            coordinates,
            srs_id,
        })
    }
}

impl<D: Dimension> GeoPackageWKB for MultiPoint<D> {
    const KIND: GeometryKind = GeometryKind::MultiPoint;
    const DIMENSIONS: Dimensions = D::DIMENSIONS;

    fn srs_id(&self) -> i32 {
        self.srs_id
    }
    fn set_srs_id(&mut self, srs_id: i32) {
        self.srs_id = srs_id;
    }
    fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
    fn empty(srs_id: i32) -> Self {
        MultiPoint::new(Vec::new()).with_srs_id(srs_id)
    }
}

impl<D: Dimension> WKBBytesRaw for MultiLineString<D> {
    fn write_as_bytes(&self, out: &mut Vec<u8>) {
        pack_nested(&self.lines, out, |line, out| write_as_wkb(line, out, true));
    }
    fn read_from_bytes<T: ByteOrder>(r: &mut WkbReader<'_>, srs_id: i32) -> Result<Self> {
        let lines = unpack_nested::<T, _>(r, PREFIX_LEN + COUNT_LEN, |r| {
            read_from_wkb::<LineString<D>>(r, srs_id)
        })?;
        Ok(MultiLineString { lines, srs_id })
    }
}

impl<D: Dimension> GeoPackageWKB for MultiLineString<D> {
    const KIND: GeometryKind = GeometryKind::MultiLineString;
    const DIMENSIONS: Dimensions = D::DIMENSIONS;

    fn srs_id(&self) -> i32 {
        self.srs_id
    }
    fn set_srs_id(&mut self, srs_id: i32) {
        self.srs_id = srs_id;
        for line in &mut self.lines {
            line.srs_id = srs_id;
        }
    }
    fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
    fn empty(srs_id: i32) -> Self {
        MultiLineString::from_lines(Vec::new()).with_srs_id(srs_id)
    }
}

impl<D: Dimension> WKBBytesRaw for MultiPolygon<D> {
    fn write_as_bytes(&self, out: &mut Vec<u8>) {
        pack_nested(&self.polygons, out, |polygon, out| {
            write_as_wkb(polygon, out, true)
        });
    }
    fn read_from_bytes<T: ByteOrder>(r: &mut WkbReader<'_>, srs_id: i32) -> Result<Self> {
        let polygons = unpack_nested::<T, _>(r, PREFIX_LEN + COUNT_LEN, |r| {
            read_from_wkb::<Polygon<D>>(r, srs_id)
        })?;
        Ok(MultiPolygon { polygons, srs_id })
    }
}

impl<D: Dimension> GeoPackageWKB for MultiPolygon<D> {
    const KIND: GeometryKind = GeometryKind::MultiPolygon;
    const DIMENSIONS: Dimensions = D::DIMENSIONS;

    fn srs_id(&self) -> i32 {
        self.srs_id
    }
    fn set_srs_id(&mut self, srs_id: i32) {
        self.srs_id = srs_id;
        for polygon in &mut self.polygons {
            polygon.srs_id = srs_id;
        }
    }
    fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
    fn empty(srs_id: i32) -> Self {
        MultiPolygon::from_polygons(Vec::new()).with_srs_id(srs_id)
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::Debug;

    use super::*;
    use crate::dimension::{XY, XYM, XYZ, XYZM};
    use crate::header::{GeoPackageHeader, GP_MAGIC};
    use byteorder::WriteBytesExt;

    fn c<D: Dimension>(x: f64, y: f64) -> D::Coord {
        let ordinates = [x, y, x + y, x * y];
        <D::Coord as Coordinate>::from_ordinates(&ordinates[..<D::Coord as Coordinate>::STRIDE])
    }

    fn square<D: Dimension>(origin: f64, size: f64) -> Vec<D::Coord> {
        vec![
            c::<D>(origin, origin),
            c::<D>(origin + size, origin),
            c::<D>(origin + size, origin + size),
            c::<D>(origin, origin),
        ]
    }

    fn assert_round_trip<G>(geom: G)
    where
        G: GeoPackageWKB + PartialEq + Debug + Clone,
    {
        // WKB drops the srs id
        let wkb = geom.to_wkb(true);
        let decoded = G::from_wkb(&wkb).unwrap();
        assert_eq!(decoded.srs_id(), DEFAULT_SRS_ID);
        assert_eq!(decoded.to_wkb(true), wkb);
        assert_eq!(decoded.is_empty(), geom.is_empty());

        let body = geom.to_wkb(false);
        assert_eq!(&wkb[PREFIX_LEN..], &body[..]);
        assert_eq!(G::from_wkb_body(&body).unwrap().to_wkb(false), body);

        // GeoPackage keeps it
        let mut with_srs = geom.clone();
        with_srs.set_srs_id(32633);
        let blob = with_srs.to_gpkg();
        let decoded = G::from_gpkg(&blob).unwrap();
        assert_eq!(decoded.srs_id(), 32633);
        assert_eq!(decoded.to_gpkg(), blob);

        // NaN never equals itself, so empty points are only checked by bytes
        if !(G::KIND == GeometryKind::Point && geom.is_empty()) {
            let mut expected = geom.clone();
            expected.set_srs_id(DEFAULT_SRS_ID);
            assert_eq!(G::from_wkb(&wkb).unwrap(), expected);
            assert_eq!(decoded, with_srs);
        }
    }

    fn round_trip_all<D: Dimension>() {
        assert_round_trip(Point::<D>::new(c::<D>(1.5, -2.25), 4326));
        assert_round_trip(Point::<D>::empty(4326));

        assert_round_trip(LineString::<D>::new(square::<D>(0.0, 1.0)));
        assert_round_trip(LineString::<D>::empty(4326));

        assert_round_trip(Polygon::<D>::new(vec![square::<D>(0.0, 10.0), square::<D>(1.0, 2.0)]));
        assert_round_trip(Polygon::<D>::new(vec![vec![]]));
        assert_round_trip(Polygon::<D>::empty(4326));

        assert_round_trip(MultiPoint::<D>::new(square::<D>(3.0, 4.0)));
        assert_round_trip(MultiPoint::<D>::empty(4326));

        assert_round_trip(MultiLineString::<D>::new(vec![
            square::<D>(0.0, 1.0),
            vec![],
            square::<D>(5.0, 1.0)[..2].to_vec(),
        ]));
        assert_round_trip(MultiLineString::<D>::empty(4326));

        assert_round_trip(MultiPolygon::<D>::new(vec![
            vec![square::<D>(0.0, 10.0)],
            vec![square::<D>(20.0, 10.0), square::<D>(21.0, 1.0)],
        ]));
        assert_round_trip(MultiPolygon::<D>::empty(4326));
    }

    #[test]
    fn round_trip_every_shape_and_dimension() {
        round_trip_all::<XY>();
        round_trip_all::<XYZ>();
        round_trip_all::<XYM>();
        round_trip_all::<XYZM>();
    }

    #[test]
    fn decoded_tuples_match_stride() {
        let ls = LineStringZM::new(square::<XYZM>(0.0, 1.0));
        let decoded = LineStringZM::from_wkb(&ls.to_wkb(true)).unwrap();
        assert!(decoded.coordinates.iter().all(|c| c.ordinates().len() == 4));
        // 5 + 4 + 4 points * 4 ordinates * 8
        assert_eq!(ls.to_wkb(true).len(), 137);

        let mp = MultiPointM::new(vec![[1.0, 2.0, 3.0]]);
        let decoded = MultiPointM::from_wkb(&mp.to_wkb(true)).unwrap();
        assert_eq!(decoded.coordinates[0].ordinates().len(), Dimensions::Xym.stride());
    }

    #[test]
    fn write_point() {
        let mut manual_buf = Vec::new();
        // little endian
        manual_buf.write_u8(1).unwrap();
        // geom type flag
        manual_buf.write_u32::<LittleEndian>(1).unwrap();
        manual_buf.write_f64::<LittleEndian>(1.5).unwrap();
        manual_buf.write_f64::<LittleEndian>(-2.25).unwrap();

        let point = Point::<XY>::new([1.5, -2.25], 4326);
        let auto_buf = point.to_wkb(true);
        assert_eq!(auto_buf.len(), 21);
        assert_eq!(manual_buf, auto_buf);
        assert_eq!(point.to_wkb(false), manual_buf[5..].to_vec());

        let read_point = Point::<XY>::from_wkb(&auto_buf).unwrap();
        assert_eq!(read_point, point);
    }

    #[test]
    fn read_big_endian_point() {
        let mut be_buf = Vec::new();
        be_buf.write_u8(0).unwrap();
        be_buf.write_u32::<BigEndian>(3001).unwrap();
        for v in [-105.0, 40.0, 5280.0, 7.0] {
            be_buf.write_f64::<BigEndian>(v).unwrap();
        }
        let pt = PointZM::from_wkb(&be_buf).unwrap();
        assert_eq!(pt.coord, [-105.0, 40.0, 5280.0, 7.0]);
        // and it comes back out little endian
        assert_eq!(pt.to_wkb(true)[0], 1);
    }

    #[test]
    fn write_linestring() {
        let mut manual_buf = Vec::new();
        manual_buf.write_u8(1).unwrap();
        manual_buf.write_u32::<LittleEndian>(2).unwrap();
        // number of points
        manual_buf.write_u32::<LittleEndian>(3).unwrap();
        for v in [0.0, 0.0, 1.0, 1.0, 2.0, 2.0] {
            manual_buf.write_f64::<LittleEndian>(v).unwrap();
        }

        let ls = LineString::<XY>::new(vec![[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        let auto_buf = ls.to_wkb(true);
        assert_eq!(auto_buf.len(), 57);
        assert_eq!(manual_buf, auto_buf);
    }

    #[test]
    fn write_polygon() {
        let mut manual_buf = Vec::new();
        manual_buf.write_u8(1).unwrap();
        manual_buf.write_u32::<LittleEndian>(3).unwrap();
        // number of rings
        manual_buf.write_u32::<LittleEndian>(1).unwrap();
        // the ring carries its own count but no type code
        manual_buf.write_u32::<LittleEndian>(4).unwrap();
        for v in [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0] {
            manual_buf.write_f64::<LittleEndian>(v).unwrap();
        }

        let poly = Polygon::<XY>::new(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]);
        let auto_buf = poly.to_wkb(true);
        assert_eq!(manual_buf, auto_buf);

        let read_poly = Polygon::<XY>::from_wkb(&auto_buf).unwrap();
        assert_eq!(read_poly.rings.len(), 1);
        let ring = &read_poly.rings[0];
        assert_eq!(ring.coordinates.len(), 4);
        assert_eq!(ring.coordinates.first(), ring.coordinates.last());
    }

    #[test]
    fn multipoint_children_carry_subheaders() {
        let mut manual_buf = Vec::new();
        manual_buf.write_u8(1).unwrap();
        manual_buf.write_u32::<LittleEndian>(1004).unwrap();
        manual_buf.write_u32::<LittleEndian>(1).unwrap();
        // a full point record
        manual_buf.write_u8(1).unwrap();
        manual_buf.write_u32::<LittleEndian>(1001).unwrap();
        for v in [1.0, 2.0, 3.0] {
            manual_buf.write_f64::<LittleEndian>(v).unwrap();
        }

        let mp = MultiPointZ::new(vec![[1.0, 2.0, 3.0]]);
        assert_eq!(mp.to_wkb(true), manual_buf);
        assert_eq!(MultiPointZ::from_wkb(&manual_buf).unwrap(), mp);

        // whereas a linestring's tuples are bare
        let ls = LineStringZ::new(vec![[1.0, 2.0, 3.0]]);
        assert_eq!(ls.to_wkb(true).len(), 5 + 4 + 24);
    }

    #[test]
    fn multipoint_emptiness() {
        assert!(MultiPoint::<XY>::new(vec![]).is_empty());
        assert!(!MultiPoint::<XY>::new(vec![[1.0, 2.0]]).is_empty());
        assert!(Point::<XY>::empty(4326).is_empty());
        assert!(!Point::<XY>::new([f64::NAN, 0.0], 4326).is_empty());
    }

    #[test]
    fn multipolygon_nesting_depth() {
        let first = vec![vec![
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.0, 0.0, 1.0],
        ]];
        let second = vec![
            vec![
                [10.0, 10.0, 2.0],
                [20.0, 10.0, 2.0],
                [20.0, 20.0, 2.0],
                [10.0, 10.0, 2.0],
            ],
            vec![[12.0, 12.0, 3.0], [13.0, 12.0, 3.0], [12.0, 12.0, 3.0]],
        ];
        let mp = MultiPolygonZ::new(vec![first.clone(), second.clone()]);
        let wkb = mp.to_wkb(true);

        let decoded = MultiPolygonZ::from_wkb(&wkb).unwrap();
        let as_coords: Vec<Vec<Vec<[f64; 3]>>> = decoded
            .polygons()
            .iter()
            .map(|p| p.rings.iter().map(|r| r.coordinates.clone()).collect())
            .collect();
        assert_eq!(as_coords, vec![first, second]);

        // 9 + 2 polygons * 9 + 3 rings * 4 + 11 points * 24
        assert_eq!(wkb.len(), 9 + 18 + 12 + 264);
    }

    #[test]
    fn multilinestring_children_are_full_records() {
        let mls = MultiLineString::<XY>::new(vec![vec![[0.0, 0.0], [1.0, 1.0]], vec![[2.0, 2.0]]]);
        let wkb = mls.to_wkb(true);
        // second child starts after the outer prefix, count and first child
        let second = 9 + (9 + 32);
        assert_eq!(wkb[second], 1);
        assert_eq!(LittleEndian::read_u32(&wkb[second + 1..]), 2);
        assert_eq!(LittleEndian::read_u32(&wkb[second + 5..]), 1);
    }

    #[test]
    fn idempotent_encoding() {
        let mp = MultiPolygonZM::new(vec![vec![square::<XYZM>(0.0, 3.0)]]);
        for use_prefix in [true, false] {
            let first = mp.to_wkb(use_prefix);
            let decoded = match use_prefix {
                true => MultiPolygonZM::from_wkb(&first).unwrap(),
                false => MultiPolygonZM::from_wkb_body(&first).unwrap(),
            };
            assert_eq!(decoded.to_wkb(use_prefix), first);
        }
    }

    #[test]
    fn truncation_anywhere_is_detected() {
        let mp = MultiPolygonZ::new(vec![
            vec![square::<XYZ>(0.0, 1.0)],
            vec![square::<XYZ>(5.0, 1.0), square::<XYZ>(5.5, 0.1)],
        ]);
        let wkb = mp.to_wkb(true);
        for len in 0..wkb.len() {
            let err = MultiPolygonZ::from_wkb(&wkb[..len]).unwrap_err();
            assert!(
                matches!(err, Error::TruncatedBuffer { .. }),
                "length {len} gave {err:?}"
            );
        }

        let blob = mp.to_gpkg();
        for len in 0..blob.len() {
            assert!(matches!(
                MultiPolygonZ::from_gpkg(&blob[..len]),
                Err(Error::TruncatedBuffer { .. })
            ));
        }
    }

    #[test]
    fn truncation_reports_absolute_offset() {
        let ls = LineString::<XY>::new(vec![[0.0, 0.0], [1.0, 1.0]]);
        let blob = ls.to_gpkg();
        let err = LineString::<XY>::from_gpkg(&blob[..blob.len() - 8]).unwrap_err();
        assert_eq!(
            err,
            Error::TruncatedBuffer {
                offset: 8 + 9,
                needed: 32,
                available: 24
            }
        );
    }

    #[test]
    fn huge_counts_are_rejected() {
        let mut buf = Vec::new();
        buf.write_u8(1).unwrap();
        buf.write_u32::<LittleEndian>(6).unwrap();
        buf.write_u32::<LittleEndian>(u32::MAX).unwrap();
        assert!(matches!(
            MultiPolygon::<XY>::from_wkb(&buf),
            Err(Error::TruncatedBuffer { offset: 9, .. })
        ));
    }

    #[test]
    fn dimension_mismatch() {
        let wkb = PointZ::new([1.0, 2.0, 3.0], 4326).to_wkb(true);
        assert_eq!(
            PointM::from_wkb(&wkb).unwrap_err(),
            Error::DimensionMismatch {
                offset: 1,
                expected: Dimensions::Xym,
                found: Dimensions::Xyz
            }
        );

        // a 2D child inside a Z multipoint
        let mut buf = Vec::new();
        buf.write_u8(1).unwrap();
        buf.write_u32::<LittleEndian>(1004).unwrap();
        buf.write_u32::<LittleEndian>(1).unwrap();
        buf.write_u8(1).unwrap();
        buf.write_u32::<LittleEndian>(1).unwrap();
        for v in [1.0, 2.0, 3.0] {
            buf.write_f64::<LittleEndian>(v).unwrap();
        }
        assert!(matches!(
            MultiPointZ::from_wkb(&buf),
            Err(Error::DimensionMismatch {
                offset: 10,
                expected: Dimensions::Xyz,
                found: Dimensions::Xy
            })
        ));
    }

    #[test]
    fn shape_mismatch_and_unknown_codes() {
        let wkb = LineString::<XY>::new(vec![[0.0, 0.0]]).to_wkb(true);
        assert!(matches!(
            Polygon::<XY>::from_wkb(&wkb),
            Err(Error::ShapeMismatch {
                expected: GeometryKind::Polygon,
                found: GeometryKind::LineString,
                ..
            })
        ));

        // GeometryCollection and CircularString are not modelled
        for code in [7u32, 8, 4001, 0] {
            let mut buf = vec![1u8];
            buf.write_u32::<LittleEndian>(code).unwrap();
            assert_eq!(
                Point::<XY>::from_wkb(&buf).unwrap_err(),
                Error::UnsupportedGeometryType { offset: 1, code }
            );
        }

        let mut buf = wkb;
        buf[0] = 7;
        assert_eq!(
            LineString::<XY>::from_wkb(&buf).unwrap_err(),
            Error::InvalidByteOrder {
                offset: 0,
                found: 7
            }
        );
    }

    #[test]
    fn gpkg_layout() {
        let point = Point::<XY>::new([1.5, -2.25], 4326);
        let blob = point.to_gpkg();
        assert_eq!(&blob[..2], &GP_MAGIC);
        assert_eq!(blob[2], 0);
        assert_eq!(blob[3], 0b0000_0001);
        assert_eq!(LittleEndian::read_i32(&blob[4..8]), 4326);
        assert_eq!(&blob[8..], &point.to_wkb(true)[..]);
        assert_eq!(point.spatial_ref_sys().map(|s| s.id), Some(4326));
    }

    #[test]
    fn gpkg_empty_flag_short_circuits() {
        let empty = MultiLineString::<XY>::empty(3857);
        let blob = empty.to_gpkg();
        assert_eq!(blob[3], 0b0001_0001);

        // the body is never read when the header says empty
        let header_only = GeoPackageHeader::new(3857, true).to_bytes();
        let decoded = MultiLineString::<XY>::from_gpkg(&header_only).unwrap();
        assert!(decoded.is_empty());
        assert_eq!(decoded.srs_id(), 3857);

        let point = Point::<XYZ>::from_gpkg(&header_only).unwrap();
        assert!(point.is_empty());
        assert!(point.spatial_ref_sys().is_none());
    }

    #[test]
    fn gpkg_with_envelope() {
        let ls = LineString::<XY>::new(vec![[0.0, 0.0], [2.0, 1.0]]).with_srs_id(3857);
        let mut blob = ls.to_gpkg();
        // rewrite as an XY envelope blob: minx, maxx, miny, maxy
        blob[3] = 0b0000_0011;
        let mut envelope = Vec::new();
        for v in [0.0, 2.0, 0.0, 1.0] {
            envelope.write_f64::<LittleEndian>(v).unwrap();
        }
        blob.splice(8..8, envelope);

        assert_eq!(LineString::<XY>::from_gpkg(&blob).unwrap(), ls);
    }

    #[test]
    fn gpkg_children_get_parent_srs_id() {
        let mp = MultiPolygon::<XY>::new(vec![vec![square::<XY>(0.0, 1.0)]]).with_srs_id(2193);
        let decoded = MultiPolygon::<XY>::from_gpkg(&mp.to_gpkg()).unwrap();
        assert_eq!(decoded.polygons()[0].srs_id, 2193);
        assert_eq!(decoded, mp);
    }

    #[test]
    fn set_srs_id_survives_gpkg() {
        let mut mls = MultiLineString::<XY>::new(vec![vec![[0.0, 0.0], [1.0, 1.0]], vec![[2.0, 2.0]]]);
        mls.set_srs_id(3857);
        assert!(mls.lines().iter().all(|l| l.srs_id == 3857));
        assert_eq!(MultiLineString::<XY>::from_gpkg(&mls.to_gpkg()).unwrap(), mls);

        let mut mp = MultiPolygonZ::new(vec![vec![square::<XYZ>(0.0, 1.0)], vec![square::<XYZ>(3.0, 1.0)]]);
        mp.set_srs_id(2193);
        assert!(mp.polygons().iter().all(|p| p.srs_id == 2193));
        assert_eq!(MultiPolygonZ::from_gpkg(&mp.to_gpkg()).unwrap(), mp);

        // children handed to the constructor are brought in line with the collection
        let line = LineString::<XY>::new(vec![[0.0, 0.0]]).with_srs_id(32633);
        let mls = MultiLineString::from_lines(vec![line]).with_srs_id(2193);
        assert_eq!(mls.clone().into_lines()[0].srs_id, 2193);
        assert_eq!(MultiLineString::<XY>::from_gpkg(&mls.to_gpkg()).unwrap(), mls);
    }

    #[test]
    fn type_codes() {
        assert_eq!(Point::<XY>::wkb_type_code(), 1);
        assert_eq!(LineStringZ::wkb_type_code(), 1002);
        assert_eq!(PolygonM::wkb_type_code(), 2003);
        assert_eq!(MultiPointZM::wkb_type_code(), 3004);
        assert_eq!(MultiLineStringM::wkb_type_code(), 2005);
        assert_eq!(MultiPolygonZ::wkb_type_code(), 1006);
        assert_eq!(
            parse_type_code(3006),
            Some((GeometryKind::MultiPolygon, Dimensions::Xyzm))
        );
        assert_eq!(parse_type_code(5001), None);
    }
}
