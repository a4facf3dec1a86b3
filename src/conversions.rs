//! Conversions between the 2D geometries and their `geo_types` counterparts.
//!
//! `geo_types` has no srs id, so geometries coming from it get the default
//! one. An empty [`Point`] becomes a NaN `geo_types::Point` and back.

use crate::dimension::XY;
use crate::geometry::Geometry;
use crate::result::Error;
use crate::srs::DEFAULT_SRS_ID;
use crate::types::*;

fn coord_from_geo(c: geo_types::Coord<f64>) -> [f64; 2] {
    [c.x, c.y]
}

fn coord_to_geo(c: &[f64; 2]) -> geo_types::Coord<f64> {
    geo_types::Coord { x: c[0], y: c[1] }
}

fn coords_from_geo(ls: geo_types::LineString<f64>) -> Vec<[f64; 2]> {
    ls.into_iter().map(coord_from_geo).collect()
}

fn coords_to_geo(coords: &[[f64; 2]]) -> geo_types::LineString<f64> {
    coords.iter().map(coord_to_geo).collect()
}

impl From<geo_types::Point<f64>> for Point<XY> {
    fn from(p: geo_types::Point<f64>) -> Self {
        Point::new(coord_from_geo(p.0), DEFAULT_SRS_ID)
    }
}

impl From<&Point<XY>> for geo_types::Point<f64> {
    fn from(p: &Point<XY>) -> Self {
        geo_types::Point(coord_to_geo(&p.coord))
    }
}

impl From<geo_types::LineString<f64>> for LineString<XY> {
    fn from(ls: geo_types::LineString<f64>) -> Self {
        LineString::new(coords_from_geo(ls))
    }
}

impl From<&LineString<XY>> for geo_types::LineString<f64> {
    fn from(ls: &LineString<XY>) -> Self {
        coords_to_geo(&ls.coordinates)
    }
}

/// A polygon whose exterior and interiors are all empty has no rings
impl From<geo_types::Polygon<f64>> for Polygon<XY> {
    fn from(p: geo_types::Polygon<f64>) -> Self {
        let (exterior, interiors) = p.into_inner();
        if exterior.0.is_empty() && interiors.is_empty() {
            return Polygon::new(Vec::new());
        }
        let rings = std::iter::once(exterior)
            .chain(interiors)
            .map(coords_from_geo)
            .collect();
        Polygon::new(rings)
    }
}

/// `geo_types` closes every ring it is handed
impl From<&Polygon<XY>> for geo_types::Polygon<f64> {
    fn from(p: &Polygon<XY>) -> Self {
        let exterior = p
            .exterior()
            .map(|ring| coords_to_geo(&ring.coordinates))
            .unwrap_or_else(|| geo_types::LineString(Vec::new()));
        let interiors = p
            .interiors()
            .iter()
            .map(|ring| coords_to_geo(&ring.coordinates))
            .collect();
        geo_types::Polygon::new(exterior, interiors)
    }
}

impl From<geo_types::MultiPoint<f64>> for MultiPoint<XY> {
    fn from(mp: geo_types::MultiPoint<f64>) -> Self {
        MultiPoint::new(mp.into_iter().map(|p| coord_from_geo(p.0)).collect())
    }
}

impl From<&MultiPoint<XY>> for geo_types::MultiPoint<f64> {
    fn from(mp: &MultiPoint<XY>) -> Self {
        mp.coordinates
            .iter()
            .map(|c| geo_types::Point(coord_to_geo(c)))
            .collect::<Vec<_>>()
            .into()
    }
}

impl From<geo_types::MultiLineString<f64>> for MultiLineString<XY> {
    fn from(mls: geo_types::MultiLineString<f64>) -> Self {
        MultiLineString::from_lines(mls.into_iter().map(LineString::from).collect())
    }
}

impl From<&MultiLineString<XY>> for geo_types::MultiLineString<f64> {
    fn from(mls: &MultiLineString<XY>) -> Self {
        geo_types::MultiLineString(mls.lines().iter().map(Into::into).collect())
    }
}

impl From<geo_types::MultiPolygon<f64>> for MultiPolygon<XY> {
    fn from(mp: geo_types::MultiPolygon<f64>) -> Self {
        MultiPolygon::from_polygons(mp.into_iter().map(Polygon::from).collect())
    }
}

impl From<&MultiPolygon<XY>> for geo_types::MultiPolygon<f64> {
    fn from(mp: &MultiPolygon<XY>) -> Self {
        geo_types::MultiPolygon(mp.polygons().iter().map(Into::into).collect())
    }
}

impl TryFrom<geo_types::Geometry<f64>> for Geometry {
    type Error = Error;

    fn try_from(geom: geo_types::Geometry<f64>) -> Result<Self, Self::Error> {
        use geo_types::Geometry as G;
        Ok(match geom {
            G::Point(p) => Geometry::Point(p.into()),
            G::Line(l) => Geometry::LineString(LineString::new(vec![
                coord_from_geo(l.start),
                coord_from_geo(l.end),
            ])),
            G::LineString(ls) => Geometry::LineString(ls.into()),
            G::Polygon(p) => Geometry::Polygon(p.into()),
            G::MultiPoint(mp) => Geometry::MultiPoint(mp.into()),
            G::MultiLineString(mls) => Geometry::MultiLineString(mls.into()),
            G::MultiPolygon(mp) => Geometry::MultiPolygon(mp.into()),
            G::Rect(r) => Geometry::Polygon(r.to_polygon().into()),
            G::Triangle(t) => Geometry::Polygon(t.to_polygon().into()),
            G::GeometryCollection(_) => {
                return Err(Error::UnsupportedConversion("GeometryCollection"))
            }
        })
    }
}

/// Only the 2D variants have a `geo_types` counterpart
impl TryFrom<&Geometry> for geo_types::Geometry<f64> {
    type Error = Error;

    fn try_from(geom: &Geometry) -> Result<Self, Self::Error> {
        use geo_types::Geometry as G;
        Ok(match geom {
            Geometry::Point(p) => G::Point(p.into()),
            Geometry::LineString(ls) => G::LineString(ls.into()),
            Geometry::Polygon(p) => G::Polygon(p.into()),
            Geometry::MultiPoint(mp) => G::MultiPoint(mp.into()),
            Geometry::MultiLineString(mls) => G::MultiLineString(mls.into()),
            Geometry::MultiPolygon(mp) => G::MultiPolygon(mp.into()),
            _ => return Err(Error::UnsupportedConversion("geometries with z or m values")),
        })
    }
}
