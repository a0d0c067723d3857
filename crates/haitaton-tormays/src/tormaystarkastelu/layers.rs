//! In-memory reference layers answering the spatial fact queries.
//!
//! Layers arrive as one GeoJSON feature collection of pre-buffered polygons. Every feature
//! names its layer in the `layer` property; attribute-bearing layers carry one extra
//! property. Each layer is bulk loaded into an R-tree and queried with the work-area
//! bounding box before the exact polygon intersection test.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use geo::{Intersects, MultiPolygon};
use geojson::{Feature, GeoJson};
use rstar::{RTree, RTreeObject, AABB};
use serde_json::Value;
use tracing::info;

use super::geometry::{crs_member, envelope_of, polygons_of, Crs, GeometryError, WorkAreaGeometry};
use super::resolver::{ResolverError, SpatialFactResolver, SpatialFacts};

/// Reference layers consulted by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    StreetAreas,
    StreetClasses,
    CentralBusinessArea,
    Volumes15,
    Volumes30,
    CriticalTransitArea,
    BusRoutes,
    TramLanes,
    CyclewaysPriority,
    CyclewaysMain,
}

impl LayerKind {
    pub const ALL: [LayerKind; 10] = [
        LayerKind::StreetAreas,
        LayerKind::StreetClasses,
        LayerKind::CentralBusinessArea,
        LayerKind::Volumes15,
        LayerKind::Volumes30,
        LayerKind::CriticalTransitArea,
        LayerKind::BusRoutes,
        LayerKind::TramLanes,
        LayerKind::CyclewaysPriority,
        LayerKind::CyclewaysMain,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            LayerKind::StreetAreas => "street_areas",
            LayerKind::StreetClasses => "street_classes",
            LayerKind::CentralBusinessArea => "central_business_area",
            LayerKind::Volumes15 => "volumes_15",
            LayerKind::Volumes30 => "volumes_30",
            LayerKind::CriticalTransitArea => "critical_transit_area",
            LayerKind::BusRoutes => "bus_routes",
            LayerKind::TramLanes => "tram_lanes",
            LayerKind::CyclewaysPriority => "cycleways_priority",
            LayerKind::CyclewaysMain => "cycleways_main",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name.trim())
    }

    /// Property carrying the attribute of the layer's features, if any.
    const fn attribute(self) -> Option<(&'static str, AttributeKind)> {
        match self {
            LayerKind::StreetClasses => Some(("class", AttributeKind::Code)),
            LayerKind::Volumes15 | LayerKind::Volumes30 => Some(("volume", AttributeKind::Volume)),
            LayerKind::BusRoutes => Some(("route_id", AttributeKind::Code)),
            LayerKind::TramLanes => Some(("lane", AttributeKind::Code)),
            LayerKind::StreetAreas
            | LayerKind::CentralBusinessArea
            | LayerKind::CriticalTransitArea
            | LayerKind::CyclewaysPriority
            | LayerKind::CyclewaysMain => None,
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy)]
enum AttributeKind {
    Code,
    Volume,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Attribute {
    Absent,
    Code(String),
    Volume(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error("invalid reference layer GeoJSON: {0}")]
    Parse(#[from] geojson::Error),
    #[error("reference layers must be a GeoJSON FeatureCollection")]
    NotAFeatureCollection,
    #[error("reference layer collection: {0}")]
    Crs(GeometryError),
    #[error("feature {feature} names unknown layer '{layer}'")]
    UnknownLayer { feature: usize, layer: String },
    #[error("feature {feature} is missing property '{property}'")]
    MissingProperty {
        feature: usize,
        property: &'static str,
    },
    #[error("feature {feature} has an invalid '{property}' value: {value}")]
    InvalidProperty {
        feature: usize,
        property: &'static str,
        value: String,
    },
    #[error("feature {feature} has an unusable geometry: {source}")]
    Geometry {
        feature: usize,
        #[source]
        source: GeometryError,
    },
}

struct LayerFeature {
    envelope: AABB<[f64; 2]>,
    polygon: MultiPolygon<f64>,
    attribute: Attribute,
}

impl RTreeObject for LayerFeature {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Infrastructure reference layers held in memory, one R-tree per layer.
pub struct ReferenceLayers {
    crs: Crs,
    layers: HashMap<LayerKind, RTree<LayerFeature>>,
}

impl ReferenceLayers {
    pub fn from_geojson_str(source: &str) -> Result<Self, LayerError> {
        let geojson: GeoJson = source.parse()?;
        Self::from_geojson(&geojson)
    }

    pub fn from_geojson(geojson: &GeoJson) -> Result<Self, LayerError> {
        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(LayerError::NotAFeatureCollection);
        };

        let crs = crs_member(collection.foreign_members.as_ref())
            .map_err(LayerError::Crs)?
            .ok_or(LayerError::Crs(GeometryError::MissingCrs))?;

        let mut entries: HashMap<LayerKind, Vec<LayerFeature>> = HashMap::new();
        for (position, feature) in collection.features.iter().enumerate() {
            let (kind, entry) = layer_feature(position, feature)?;
            entries.entry(kind).or_default().push(entry);
        }

        let layers: HashMap<_, _> = entries
            .into_iter()
            .map(|(kind, features)| (kind, RTree::bulk_load(features)))
            .collect();

        let layers = Self { crs, layers };
        info!(
            crs = %layers.crs,
            features = collection.features.len(),
            "loaded reference layers"
        );
        Ok(layers)
    }

    pub fn crs(&self) -> Crs {
        self.crs
    }

    pub fn feature_count(&self, kind: LayerKind) -> usize {
        self.layers.get(&kind).map_or(0, |tree| tree.size())
    }

    fn hits(&self, kind: LayerKind, polygons: &MultiPolygon<f64>) -> Vec<&LayerFeature> {
        let Some(tree) = self.layers.get(&kind) else {
            return Vec::new();
        };
        let envelope = envelope_of(polygons);
        tree.locate_in_envelope_intersecting(&envelope)
            .filter(|feature| feature.polygon.intersects(polygons))
            .collect()
    }

    fn any_hit(&self, kind: LayerKind, polygons: &MultiPolygon<f64>) -> bool {
        !self.hits(kind, polygons).is_empty()
    }

    fn codes(&self, kind: LayerKind, polygons: &MultiPolygon<f64>) -> BTreeSet<String> {
        self.hits(kind, polygons)
            .into_iter()
            .filter_map(|feature| match &feature.attribute {
                Attribute::Code(code) => Some(code.clone()),
                _ => None,
            })
            .collect()
    }

    fn max_volume(&self, kind: LayerKind, polygons: &MultiPolygon<f64>) -> Option<u32> {
        self.hits(kind, polygons)
            .into_iter()
            .filter_map(|feature| match feature.attribute {
                Attribute::Volume(volume) => Some(volume),
                _ => None,
            })
            .max()
    }
}

impl SpatialFactResolver for ReferenceLayers {
    fn resolve(&self, geometry: &WorkAreaGeometry) -> Result<SpatialFacts, ResolverError> {
        if geometry.crs() != self.crs {
            return Err(ResolverError::CrsMismatch {
                expected: self.crs,
                found: geometry.crs(),
            });
        }

        let polygons = geometry.polygons();
        Ok(SpatialFacts {
            on_general_street: self.any_hit(LayerKind::StreetAreas, polygons),
            street_classes: self.codes(LayerKind::StreetClasses, polygons),
            in_central_business_district: self.any_hit(LayerKind::CentralBusinessArea, polygons),
            max_traffic_volume_15m: self.max_volume(LayerKind::Volumes15, polygons),
            max_traffic_volume_30m: self.max_volume(LayerKind::Volumes30, polygons),
            on_transit_critical_segment: self.any_hit(LayerKind::CriticalTransitArea, polygons),
            bus_routes: self.codes(LayerKind::BusRoutes, polygons),
            tram_lane_types: self.codes(LayerKind::TramLanes, polygons),
            priority_cycling_route: self.any_hit(LayerKind::CyclewaysPriority, polygons),
            main_cycling_route: self.any_hit(LayerKind::CyclewaysMain, polygons),
        })
    }
}

fn layer_feature(
    position: usize,
    feature: &Feature,
) -> Result<(LayerKind, LayerFeature), LayerError> {
    let value = property(feature, "layer").ok_or(LayerError::MissingProperty {
        feature: position,
        property: "layer",
    })?;
    let layer = value.as_str().ok_or_else(|| LayerError::InvalidProperty {
        feature: position,
        property: "layer",
        value: value.to_string(),
    })?;
    let kind = LayerKind::from_name(layer).ok_or_else(|| LayerError::UnknownLayer {
        feature: position,
        layer: layer.to_string(),
    })?;

    let geometry = feature.geometry.as_ref().ok_or(LayerError::Geometry {
        feature: position,
        source: GeometryError::Empty,
    })?;
    let polygon = polygons_of(geometry).map_err(|source| LayerError::Geometry {
        feature: position,
        source,
    })?;

    let attribute = match kind.attribute() {
        None => Attribute::Absent,
        Some((name, attribute_kind)) => {
            let value = property(feature, name).ok_or(LayerError::MissingProperty {
                feature: position,
                property: name,
            })?;
            read_attribute(value, attribute_kind).ok_or_else(|| LayerError::InvalidProperty {
                feature: position,
                property: name,
                value: value.to_string(),
            })?
        }
    };

    Ok((
        kind,
        LayerFeature {
            envelope: envelope_of(&polygon),
            polygon,
            attribute,
        },
    ))
}

fn property<'a>(feature: &'a Feature, name: &str) -> Option<&'a Value> {
    feature
        .properties
        .as_ref()
        .and_then(|properties| properties.get(name))
        .filter(|value| !value.is_null())
}

fn read_attribute(value: &Value, kind: AttributeKind) -> Option<Attribute> {
    match kind {
        AttributeKind::Code => match value {
            Value::String(code) if !code.trim().is_empty() => Some(Attribute::Code(code.clone())),
            Value::Number(number) => Some(Attribute::Code(number.to_string())),
            _ => None,
        },
        AttributeKind::Volume => value
            .as_u64()
            .and_then(|volume| u32::try_from(volume).ok())
            .map(Attribute::Volume),
    }
}
