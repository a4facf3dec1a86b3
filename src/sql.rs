//! Geometry columns: every shape reads and writes itself as a GeoPackage blob.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::dimension::Dimension;
use crate::geometry::Geometry;
use crate::gpkg_wkb::GeoPackageWKB;
use crate::types::*;

macro_rules! impl_gpkg_sql_wkb {
    ($($t:ty),*) => {
       $(
            impl<D: Dimension> ToSql for $t {
                #[inline]
                fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                    Ok(ToSqlOutput::from(self.to_gpkg()))
                }
            }

            impl<D: Dimension> FromSql for $t {
                #[inline]
                fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                    let blob = value.as_blob()?;
                    <$t>::from_gpkg(blob).map_err(|e| FromSqlError::Other(Box::new(e)))
                }
            }
       )*
    };
}

impl_gpkg_sql_wkb!(
    Point<D>,
    LineString<D>,
    Polygon<D>,
    MultiPoint<D>,
    MultiLineString<D>,
    MultiPolygon<D>
);

impl ToSql for Geometry {
    #[inline]
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_gpkg()))
    }
}

impl FromSql for Geometry {
    #[inline]
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let blob = value.as_blob()?;
        Geometry::from_gpkg(blob).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
