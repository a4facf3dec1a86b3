use std::fmt;

use crate::dimension::{Coordinate, Dimension, XY, XYM, XYZ, XYZM};
use crate::srs::DEFAULT_SRS_ID;

/// The six base shapes, valued with their OGC WKB base type code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum GeometryKind {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
}

impl GeometryKind {
    pub const fn base_code(self) -> u32 {
        self as u32
    }

    pub(crate) const fn from_base_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(GeometryKind::Point),
            2 => Some(GeometryKind::LineString),
            3 => Some(GeometryKind::Polygon),
            4 => Some(GeometryKind::MultiPoint),
            5 => Some(GeometryKind::MultiLineString),
            6 => Some(GeometryKind::MultiPolygon),
            _ => None,
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryKind::Point => "Point",
            GeometryKind::LineString => "LineString",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::MultiPoint => "MultiPoint",
            GeometryKind::MultiLineString => "MultiLineString",
            GeometryKind::MultiPolygon => "MultiPolygon",
        };
        f.write_str(name)
    }
}

/// A single position. An empty point holds NaN in every ordinate, since WKB
/// always reserves room for a point's coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<D: Dimension = XY> {
    pub coord: D::Coord,
    pub srs_id: i32,
}

impl<D: Dimension> Point<D> {
    pub fn new(coord: D::Coord, srs_id: i32) -> Self {
        Point { coord, srs_id }
    }

    pub fn from_tuple(coord: D::Coord, srs_id: i32) -> Self {
        Self::new(coord, srs_id)
    }

    pub fn with_srs_id(mut self, srs_id: i32) -> Self {
        self.srs_id = srs_id;
        self
    }

    pub fn coord(&self) -> D::Coord {
        self.coord
    }

    pub fn x(&self) -> f64 {
        self.coord.ordinates()[0]
    }

    pub fn y(&self) -> f64 {
        self.coord.ordinates()[1]
    }
}

impl Point<XYZ> {
    pub fn z(&self) -> f64 {
        self.coord[2]
    }
}

impl Point<XYM> {
    pub fn m(&self) -> f64 {
        self.coord[2]
    }
}

impl Point<XYZM> {
    pub fn z(&self) -> f64 {
        self.coord[2]
    }

    pub fn m(&self) -> f64 {
        self.coord[3]
    }
}

impl<D: Dimension> Default for Point<D> {
    fn default() -> Self {
        Point::new(<D::Coord as Coordinate>::nan(), DEFAULT_SRS_ID)
    }
}

fn to_points<D: Dimension>(coords: &[D::Coord], srs_id: i32) -> Vec<Point<D>> {
    coords.iter().map(|c| Point::new(*c, srs_id)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineString<D: Dimension = XY> {
    pub coordinates: Vec<D::Coord>,
    pub srs_id: i32,
}

impl<D: Dimension> LineString<D> {
    pub fn new(coordinates: Vec<D::Coord>) -> Self {
        LineString {
            coordinates,
            srs_id: DEFAULT_SRS_ID,
        }
    }

    pub fn with_srs_id(mut self, srs_id: i32) -> Self {
        self.srs_id = srs_id;
        self
    }

    pub fn points(&self) -> Vec<Point<D>> {
        to_points(&self.coordinates, self.srs_id)
    }
}

impl<D: Dimension> Default for LineString<D> {
    fn default() -> Self {
        LineString::new(Vec::new())
    }
}

/// A ring of a [`Polygon`]. Rings only exist inside a polygon: they have no
/// srs id and no WKB or GeoPackage encoding of their own. Closure is not
/// enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearRing<D: Dimension = XY> {
    pub coordinates: Vec<D::Coord>,
}

impl<D: Dimension> LinearRing<D> {
    pub fn new(coordinates: Vec<D::Coord>) -> Self {
        LinearRing { coordinates }
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        match (self.coordinates.first(), self.coordinates.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    pub fn points(&self) -> Vec<Point<D>> {
        to_points(&self.coordinates, DEFAULT_SRS_ID)
    }
}

/// Ring 0 is the exterior, the rest are holes
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon<D: Dimension = XY> {
    pub rings: Vec<LinearRing<D>>,
    pub srs_id: i32,
}

impl<D: Dimension> Polygon<D> {
    pub fn new(rings: Vec<Vec<D::Coord>>) -> Self {
        Polygon {
            rings: rings.into_iter().map(LinearRing::new).collect(),
            srs_id: DEFAULT_SRS_ID,
        }
    }

    pub fn with_srs_id(mut self, srs_id: i32) -> Self {
        self.srs_id = srs_id;
        self
    }

    pub fn exterior(&self) -> Option<&LinearRing<D>> {
        self.rings.first()
    }

    pub fn interiors(&self) -> &[LinearRing<D>] {
        self.rings.get(1..).unwrap_or(&[])
    }
}

impl<D: Dimension> Default for Polygon<D> {
    fn default() -> Self {
        Polygon::new(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiPoint<D: Dimension = XY> {
    pub coordinates: Vec<D::Coord>,
    pub srs_id: i32,
}

impl<D: Dimension> MultiPoint<D> {
    pub fn new(coordinates: Vec<D::Coord>) -> Self {
        MultiPoint {
            coordinates,
            srs_id: DEFAULT_SRS_ID,
        }
    }

    pub fn with_srs_id(mut self, srs_id: i32) -> Self {
        self.srs_id = srs_id;
        self
    }

    pub fn points(&self) -> Vec<Point<D>> {
        to_points(&self.coordinates, self.srs_id)
    }
}

impl<D: Dimension> Default for MultiPoint<D> {
    fn default() -> Self {
        MultiPoint::new(Vec::new())
    }
}

/// Child lines always share the srs id of the collection, so both are only
/// reachable through methods that keep them in step
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLineString<D: Dimension = XY> {
    pub(crate) lines: Vec<LineString<D>>,
    pub(crate) srs_id: i32,
}

impl<D: Dimension> MultiLineString<D> {
    pub fn new(lines: Vec<Vec<D::Coord>>) -> Self {
        Self::from_lines(lines.into_iter().map(LineString::new).collect())
    }

    pub fn from_lines(lines: Vec<LineString<D>>) -> Self {
        MultiLineString {
            lines,
            srs_id: DEFAULT_SRS_ID,
        }
        .with_srs_id(DEFAULT_SRS_ID)
    }

    pub fn with_srs_id(mut self, srs_id: i32) -> Self {
        self.srs_id = srs_id;
        for line in &mut self.lines {
            line.srs_id = srs_id;
        }
        self
    }

    pub fn lines(&self) -> &[LineString<D>] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<LineString<D>> {
        self.lines
    }
}

impl<D: Dimension> Default for MultiLineString<D> {
    fn default() -> Self {
        MultiLineString::from_lines(Vec::new())
    }
}

/// Child polygons always share the srs id of the collection, see [`MultiLineString`]
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPolygon<D: Dimension = XY> {
    pub(crate) polygons: Vec<Polygon<D>>,
    pub(crate) srs_id: i32,
}

impl<D: Dimension> MultiPolygon<D> {
    pub fn new(polygons: Vec<Vec<Vec<D::Coord>>>) -> Self {
        Self::from_polygons(polygons.into_iter().map(Polygon::new).collect())
    }

    pub fn from_polygons(polygons: Vec<Polygon<D>>) -> Self {
        MultiPolygon {
            polygons,
            srs_id: DEFAULT_SRS_ID,
        }
        .with_srs_id(DEFAULT_SRS_ID)
    }

    pub fn with_srs_id(mut self, srs_id: i32) -> Self {
        self.srs_id = srs_id;
        for polygon in &mut self.polygons {
            polygon.srs_id = srs_id;
        }
        self
    }

    pub fn polygons(&self) -> &[Polygon<D>] {
        &self.polygons
    }

    pub fn into_polygons(self) -> Vec<Polygon<D>> {
        self.polygons
    }
}

impl<D: Dimension> Default for MultiPolygon<D> {
    fn default() -> Self {
        MultiPolygon::from_polygons(Vec::new())
    }
}

pub type PointZ = Point<XYZ>;
pub type PointM = Point<XYM>;
pub type PointZM = Point<XYZM>;

pub type LineStringZ = LineString<XYZ>;
pub type LineStringM = LineString<XYM>;
pub type LineStringZM = LineString<XYZM>;

pub type PolygonZ = Polygon<XYZ>;
pub type PolygonM = Polygon<XYM>;
pub type PolygonZM = Polygon<XYZM>;

pub type MultiPointZ = MultiPoint<XYZ>;
pub type MultiPointM = MultiPoint<XYM>;
pub type MultiPointZM = MultiPoint<XYZM>;

pub type MultiLineStringZ = MultiLineString<XYZ>;
pub type MultiLineStringM = MultiLineString<XYM>;
pub type MultiLineStringZM = MultiLineString<XYZM>;

pub type MultiPolygonZ = MultiPolygon<XYZ>;
pub type MultiPolygonM = MultiPolygon<XYM>;
pub type MultiPolygonZM = MultiPolygon<XYZM>;
