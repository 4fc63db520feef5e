//! ArcGIS web-map JSON to GeoJSON conversion.
//!
//! Pulls one operational layer out of a saved web map, simplifies each
//! polyline in source units (Web Mercator metres), reprojects to WGS84 and
//! writes a GeoJSON FeatureCollection with the ArcGIS attributes as
//! properties.

use std::fs;
use std::path::Path;

use geo::{Coord, LineString, MapCoords, Simplify};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use grisk_core::{GriskError, GriskResult};
use serde::Deserialize;
use tracing::{debug, info};

pub const DEFAULT_LAYER: &str = "TransmissionLine_CEC";

/// Douglas-Peucker tolerance in metres.
pub const DEFAULT_TOLERANCE_M: f64 = 10.0;

/// WGS84 semi-major axis used by EPSG:3857.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

#[derive(Debug, Clone, PartialEq)]
pub struct WebMapOptions {
    pub layer: String,
    pub tolerance_m: f64,
}

impl Default for WebMapOptions {
    fn default() -> Self {
        Self {
            layer: DEFAULT_LAYER.to_string(),
            tolerance_m: DEFAULT_TOLERANCE_M,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConversionSummary {
    pub converted: usize,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct WebMap {
    #[serde(default, alias = "operationalLayers")]
    layers: Vec<OperationalLayer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationalLayer {
    layer_definition: Option<LayerDefinition>,
    feature_set: Option<FeatureSet>,
}

#[derive(Debug, Deserialize)]
struct LayerDefinition {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FeatureSet {
    #[serde(default)]
    features: Vec<EsriFeature>,
}

#[derive(Debug, Deserialize)]
struct EsriFeature {
    geometry: Option<EsriGeometry>,
    #[serde(default)]
    attributes: JsonObject,
}

#[derive(Debug, Deserialize)]
struct EsriGeometry {
    paths: Option<Vec<Vec<Vec<f64>>>>,
}

/// EPSG:3857 metres to EPSG:4326 degrees (lon, lat).
pub fn web_mercator_to_wgs84(coord: Coord<f64>) -> Coord<f64> {
    Coord {
        x: (coord.x / EARTH_RADIUS_M).to_degrees(),
        y: (coord.y / EARTH_RADIUS_M).sinh().atan().to_degrees(),
    }
}

fn path_to_line(path: &[Vec<f64>]) -> LineString<f64> {
    path.iter()
        .filter(|point| point.len() >= 2)
        .map(|point| Coord {
            x: point[0],
            y: point[1],
        })
        .collect::<Vec<_>>()
        .into()
}

fn positions(line: &LineString<f64>) -> Vec<Vec<f64>> {
    line.coords().map(|c| vec![c.x, c.y]).collect()
}

/// Simplified, reprojected geometry; `None` when nothing drawable remains.
fn convert_paths(paths: &[Vec<Vec<f64>>], tolerance_m: f64) -> Option<Value> {
    let lines: Vec<LineString<f64>> = paths
        .iter()
        .map(|path| path_to_line(path))
        // RDP needs at least two vertices
        .filter(|line| line.coords().count() >= 2)
        .map(|line| line.simplify(&tolerance_m).map_coords(web_mercator_to_wgs84))
        .collect();

    match lines.as_slice() {
        [] => None,
        [line] => Some(Value::LineString(positions(line))),
        _ => Some(Value::MultiLineString(lines.iter().map(positions).collect())),
    }
}

/// Convert the selected layer of a web-map JSON document.
pub fn convert_webmap(
    json: &str,
    options: &WebMapOptions,
) -> GriskResult<(FeatureCollection, ConversionSummary)> {
    let web_map: WebMap = serde_json::from_str(json)?;
    let layer = web_map
        .layers
        .into_iter()
        .find(|layer| {
            layer
                .layer_definition
                .as_ref()
                .and_then(|def| def.name.as_deref())
                == Some(options.layer.as_str())
        })
        .ok_or_else(|| {
            GriskError::Validation(format!("layer '{}' not found in web map", options.layer))
        })?;

    let mut summary = ConversionSummary::default();
    let mut features = Vec::new();
    let source_features = layer.feature_set.map(|set| set.features).unwrap_or_default();
    for (index, feature) in source_features.into_iter().enumerate() {
        let Some(paths) = feature.geometry.and_then(|g| g.paths) else {
            debug!(feature = index, "no polyline geometry; skipped");
            summary.skipped += 1;
            continue;
        };
        let Some(value) = convert_paths(&paths, options.tolerance_m) else {
            debug!(feature = index, "geometry empty after simplification; skipped");
            summary.skipped += 1;
            continue;
        };
        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(value)),
            id: None,
            properties: Some(feature.attributes),
            foreign_members: None,
        });
        summary.converted += 1;
    }

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };
    Ok((collection, summary))
}

/// Read `input`, convert, and write pretty-printed GeoJSON to `output`.
pub fn webmap_to_geojson(
    input: &Path,
    output: &Path,
    options: &WebMapOptions,
) -> GriskResult<ConversionSummary> {
    let json = fs::read_to_string(input)
        .map_err(|source| GriskError::io("reading web map", input, source))?;
    let (collection, summary) = convert_webmap(&json, options)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|source| GriskError::io("creating GeoJSON directory", parent, source))?;
    }
    let text = serde_json::to_string_pretty(&collection)?;
    fs::write(output, text).map_err(|source| GriskError::io("writing GeoJSON", output, source))?;
    info!(
        output = %output.display(),
        converted = summary.converted,
        skipped = summary.skipped,
        "web map layer converted"
    );
    Ok(summary)
}
