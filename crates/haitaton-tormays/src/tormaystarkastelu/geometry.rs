use std::fmt;
use std::str::FromStr;

use geo::{BoundingRect, MultiPolygon, Polygon};
use geojson::{GeoJson, JsonObject};
use rstar::AABB;
use serde::{Deserialize, Serialize};

/// Coordinate reference systems the engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Crs {
    /// ETRS89 / GK25FIN, the native system of the Helsinki reference layers.
    Epsg3879,
    /// ETRS89 / TM35FIN.
    Epsg3067,
}

impl Crs {
    pub const fn srid(self) -> u32 {
        match self {
            Crs::Epsg3879 => 3879,
            Crs::Epsg3067 => 3067,
        }
    }

    pub fn from_srid(srid: u32) -> Option<Self> {
        match srid {
            3879 => Some(Crs::Epsg3879),
            3067 => Some(Crs::Epsg3067),
            _ => None,
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.srid())
    }
}

impl FromStr for Crs {
    type Err = GeometryError;

    /// Accepts `EPSG:3879` as well as the OGC URN form `urn:ogc:def:crs:EPSG::3879`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let unrecognized = || GeometryError::UnrecognizedCrs(trimmed.to_string());

        let code = trimmed
            .strip_prefix("urn:ogc:def:crs:EPSG::")
            .or_else(|| trimmed.strip_prefix("EPSG:"))
            .or_else(|| trimmed.strip_prefix("epsg:"))
            .ok_or_else(unrecognized)?;

        code.parse::<u32>()
            .ok()
            .and_then(Crs::from_srid)
            .ok_or_else(unrecognized)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("unrecognized coordinate reference system '{0}'")]
    UnrecognizedCrs(String),
    #[error("geometry does not declare a coordinate reference system")]
    MissingCrs,
    #[error("unsupported geometry type '{0}', expected Polygon or MultiPolygon")]
    UnsupportedGeometry(&'static str),
    #[error("geometry contains no polygons")]
    Empty,
    #[error("invalid GeoJSON geometry: {0}")]
    InvalidGeoJson(String),
}

/// Polygons of one work area together with the reference system they are expressed in.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkAreaGeometry {
    crs: Crs,
    polygons: MultiPolygon<f64>,
}

impl WorkAreaGeometry {
    /// Degenerate polygons are dropped; nothing left over is [`GeometryError::Empty`].
    pub fn new(crs: Crs, polygons: MultiPolygon<f64>) -> Result<Self, GeometryError> {
        let polygons = areal(polygons.0)?;
        Ok(Self { crs, polygons })
    }

    /// Reads a GeoJSON geometry, feature or feature collection.
    ///
    /// The named `crs` member is looked up on the top-level object and, for single
    /// geometries, on the geometry itself. Every feature of a collection contributes its
    /// polygons; features without a geometry are skipped. Geometry collections are accepted
    /// when every member is polygonal.
    pub fn from_geojson(geojson: &GeoJson) -> Result<Self, GeometryError> {
        match geojson {
            GeoJson::Geometry(geometry) => {
                let crs = crs_member(geometry.foreign_members.as_ref())?
                    .ok_or(GeometryError::MissingCrs)?;
                Self::new(crs, polygons_of(geometry)?)
            }
            GeoJson::Feature(feature) => {
                let geometry = feature.geometry.as_ref().ok_or(GeometryError::Empty)?;
                let crs = match crs_member(feature.foreign_members.as_ref())? {
                    Some(crs) => crs,
                    None => crs_member(geometry.foreign_members.as_ref())?
                        .ok_or(GeometryError::MissingCrs)?,
                };
                Self::new(crs, polygons_of(geometry)?)
            }
            GeoJson::FeatureCollection(collection) => {
                let crs = crs_member(collection.foreign_members.as_ref())?
                    .ok_or(GeometryError::MissingCrs)?;
                let mut polygons = Vec::new();
                for geometry in collection.features.iter().filter_map(|f| f.geometry.as_ref()) {
                    polygons.extend(polygons_of(geometry)?.0);
                }
                Self::new(crs, MultiPolygon(polygons))
            }
        }
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.0.len()
    }
}

/// Reads the legacy named-CRS member `{"type": "name", "properties": {"name": "EPSG:3879"}}`.
pub(crate) fn crs_member(members: Option<&JsonObject>) -> Result<Option<Crs>, GeometryError> {
    let Some(crs) = members.and_then(|members| members.get("crs")) else {
        return Ok(None);
    };

    let name = crs
        .get("properties")
        .and_then(|properties| properties.get("name"))
        .and_then(|name| name.as_str())
        .ok_or_else(|| GeometryError::UnrecognizedCrs(crs.to_string()))?;

    name.parse().map(Some)
}

/// Polygons of a GeoJSON geometry, descending into geometry collections.
pub(crate) fn polygons_of(
    geometry: &geojson::Geometry,
) -> Result<MultiPolygon<f64>, GeometryError> {
    let mut polygons = Vec::new();
    collect_polygons(geometry, &mut polygons)?;
    areal(polygons)
}

fn collect_polygons(
    geometry: &geojson::Geometry,
    polygons: &mut Vec<Polygon<f64>>,
) -> Result<(), GeometryError> {
    let kind = match &geometry.value {
        geojson::Value::Polygon(_) | geojson::Value::MultiPolygon(_) => None,
        geojson::Value::GeometryCollection(members) => {
            for member in members {
                collect_polygons(member, polygons)?;
            }
            return Ok(());
        }
        geojson::Value::Point(_) => Some("Point"),
        geojson::Value::MultiPoint(_) => Some("MultiPoint"),
        geojson::Value::LineString(_) => Some("LineString"),
        geojson::Value::MultiLineString(_) => Some("MultiLineString"),
    };
    if let Some(kind) = kind {
        return Err(GeometryError::UnsupportedGeometry(kind));
    }

    let converted = geo::Geometry::<f64>::try_from(geometry.clone())
        .map_err(|err| GeometryError::InvalidGeoJson(err.to_string()))?;

    match converted {
        geo::Geometry::Polygon(polygon) => polygons.push(polygon),
        geo::Geometry::MultiPolygon(multi) => polygons.extend(multi.0),
        _ => {
            return Err(GeometryError::InvalidGeoJson(
                "polygon did not convert to a polygonal geometry".to_string(),
            ))
        }
    }
    Ok(())
}

/// Keeps polygons whose closed exterior ring has at least four coordinates.
fn areal(polygons: Vec<Polygon<f64>>) -> Result<MultiPolygon<f64>, GeometryError> {
    let polygons: Vec<_> = polygons
        .into_iter()
        .filter(|polygon| polygon.exterior().0.len() >= 4)
        .collect();
    if polygons.is_empty() {
        return Err(GeometryError::Empty);
    }
    Ok(MultiPolygon(polygons))
}

/// Bounding box used as the R-tree query window.
pub(crate) fn envelope_of(polygons: &MultiPolygon<f64>) -> AABB<[f64; 2]> {
    polygons.bounding_rect().map_or_else(
        || AABB::from_point([0.0, 0.0]),
        |rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]),
    )
}
