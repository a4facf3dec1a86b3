//! Spatial reference systems as far as geometry blobs need them: the srs id
//! written into every header, and the definitions a GeoPackage must ship.

/// The srs id stamped on geometries that are built without one
pub const DEFAULT_SRS_ID: i32 = defaults::WGS84.id;

/// One row of `gpkg_spatial_ref_sys`, borrowed so the built-in rows can be
/// `const`
#[derive(Debug, PartialEq, Eq)]
pub struct SpatialRefSys<'a> {
    pub name: &'a str,
    /// The value stored in a blob header
    pub id: i32,
    pub organization: &'a str,
    pub organization_coordsys_id: i32,
    /// WKT, or `"undefined"`
    pub definition: &'a str,
    pub description: &'a str,
}

impl SpatialRefSys<'_> {
    /// Whether this is one of the two placeholder systems for unknown
    /// coordinates
    pub fn is_undefined(&self) -> bool {
        self.organization == "NONE"
    }
}

pub mod defaults {
    use super::SpatialRefSys;

    const UNDEFINED: &str = "undefined";

    pub const WGS84: SpatialRefSys = SpatialRefSys {
        name: "WGS 84 geodetic",
        id: 4326,
        organization: "EPSG",
        organization_coordsys_id: 4326,
        definition: "GEOGCS[\"WGS 84\",DATUM[\"WGS_1984\",SPHEROID[\"WGS 84\",6378137,298.257223563,AUTHORITY[\"EPSG\",\"7030\"]],AUTHORITY[\"EPSG\",\"6326\"]],PRIMEM[\"Greenwich\",0,AUTHORITY[\"EPSG\",\"8901\"]],UNIT[\"degree\",0.0174532925199433,AUTHORITY[\"EPSG\",\"9122\"]],AUTHORITY[\"EPSG\",\"4326\"]]",
        description: "longitude/latitude coordinates in decimal degrees on the WGS 84 spheroid",
    };

    /// srs id 0
    pub const GEOGRAPHIC: SpatialRefSys = SpatialRefSys {
        name: "undefined geographic SRS",
        id: 0,
        organization: "NONE",
        organization_coordsys_id: 0,
        definition: UNDEFINED,
        description: "undefined geographic coordinate reference system",
    };

    /// srs id -1
    pub const CARTESIAN: SpatialRefSys = SpatialRefSys {
        name: "undefined cartesian SRS",
        id: -1,
        organization: "NONE",
        organization_coordsys_id: -1,
        definition: UNDEFINED,
        description: "undefined cartesian coordinate reference system",
    };

    const ALL: [&SpatialRefSys<'static>; 3] = [&WGS84, &GEOGRAPHIC, &CARTESIAN];

    /// Finds `srs_id` among the built-in rows; any other id needs the
    /// GeoPackage's own table
    pub fn lookup(srs_id: i32) -> Option<&'static SpatialRefSys<'static>> {
        ALL.into_iter().find(|srs| srs.id == srs_id)
    }
}
