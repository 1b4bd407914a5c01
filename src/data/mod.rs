mod task;

pub use task::LoadTask;

use crate::config::{Rgb, Tier, TierConfig};
use crate::error::LoadError;
use crate::geo::{geo_to_sphere, GeoPoint, Ring};
use crate::map::{BoundaryGroup, BoundaryLine};
use geojson::{Feature, JsonObject, Value};
use rayon::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A boundary geometry. Only polygon shapes carry boundaries.
#[derive(Clone, Debug, PartialEq)]
pub enum BoundaryFeature {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl BoundaryFeature {
    /// Every ring, exterior and holes, in file order
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        let (single, multi) = match self {
            BoundaryFeature::Polygon(rings) => (rings.as_slice(), &[] as &[Vec<Ring>]),
            BoundaryFeature::MultiPolygon(polygons) => (&[] as &[Ring], polygons.as_slice()),
        };
        single.iter().chain(multi.iter().flatten())
    }
}

/// Per-tier line styling
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierStyle {
    pub tier: Tier,
    pub color: Rgb,
}

impl TierStyle {
    pub fn new(tier: Tier, color: Rgb) -> Self {
        Self { tier, color }
    }
}

/// Where a tier's boundaries come from
#[derive(Clone, Debug)]
pub struct BoundarySource {
    pub path: PathBuf,
    pub style: TierStyle,
}

impl BoundarySource {
    /// An explicit file with explicit styling
    pub fn new(path: impl Into<PathBuf>, style: TierStyle) -> Self {
        Self {
            path: path.into(),
            style,
        }
    }

    /// The file and colour configured for a tier
    pub fn for_tier(entry: &TierConfig) -> Self {
        Self::new(&entry.path, TierStyle::new(entry.tier, entry.color))
    }
}

/// Counts from converting a feature collection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SkipStats {
    /// Features with no geometry
    pub no_geometry: usize,
    /// Points, lines, collections, unknown or malformed geometry, ...
    pub unsupported: usize,
    /// Positions with fewer than two coordinates
    pub short_positions: usize,
}

/// Read and build one tier. Runs off the frame loop.
pub fn load_boundaries(source: &BoundarySource, radius: f64) -> Result<BoundaryGroup, LoadError> {
    let features = read_features(&source.path)?;
    Ok(build_group(&features, source.style, radius))
}

/// Top level of a boundary file. Features stay raw JSON objects so a bad
/// geometry only drops its own feature.
#[derive(Deserialize)]
struct CollectionEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<JsonObject>,
}

/// Read a GeoJSON feature collection and keep its polygon features
pub fn read_features(path: &Path) -> Result<Vec<BoundaryFeature>, LoadError> {
    let mut bytes = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed = parse_collection(&mut bytes).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let (features, skipped) = parsed.ok_or_else(|| LoadError::NotFeatureCollection {
        path: path.to_path_buf(),
    })?;

    if skipped != SkipStats::default() {
        tracing::debug!(
            path = %path.display(),
            no_geometry = skipped.no_geometry,
            unsupported = skipped.unsupported,
            short_positions = skipped.short_positions,
            "Skipped non-boundary GeoJSON content"
        );
    }
    Ok(features)
}

/// Parse a document. `Ok(None)` unless it is a FeatureCollection.
fn parse_collection(bytes: &mut [u8]) -> Result<Option<(Vec<BoundaryFeature>, SkipStats)>, simd_json::Error> {
    let envelope: CollectionEnvelope = simd_json::serde::from_slice(bytes)?;
    if envelope.kind != "FeatureCollection" {
        return Ok(None);
    }
    Ok(Some(convert_features(envelope.features)))
}

/// Convert raw feature objects, skipping anything that isn't a polygon boundary
fn convert_features(objects: Vec<JsonObject>) -> (Vec<BoundaryFeature>, SkipStats) {
    let mut skipped = SkipStats::default();
    let mut features = Vec::with_capacity(objects.len());

    for object in objects {
        let feature = match Feature::try_from(object) {
            Ok(feature) => feature,
            Err(e) => {
                tracing::trace!(error = %e, "Skipping malformed feature");
                skipped.unsupported += 1;
                continue;
            }
        };
        let Some(geometry) = feature.geometry else {
            skipped.no_geometry += 1;
            continue;
        };
        match geometry.value {
            Value::Polygon(rings) => {
                features.push(BoundaryFeature::Polygon(convert_rings(&rings, &mut skipped)));
            }
            Value::MultiPolygon(polygons) => {
                let polygons = polygons
                    .iter()
                    .map(|rings| convert_rings(rings, &mut skipped))
                    .collect();
                features.push(BoundaryFeature::MultiPolygon(polygons));
            }
            _ => skipped.unsupported += 1,
        }
    }

    (features, skipped)
}

fn convert_rings(rings: &[Vec<Vec<f64>>], skipped: &mut SkipStats) -> Vec<Ring> {
    rings
        .iter()
        .map(|ring| {
            ring.iter()
                .filter_map(|position| {
                    let point = GeoPoint::from_position(position);
                    if point.is_none() {
                        skipped.short_positions += 1;
                    }
                    point
                })
                .collect::<Ring>()
        })
        .collect()
}

/// One line per ring across all features, each vertex projected at `radius`.
pub fn build_group(features: &[BoundaryFeature], style: TierStyle, radius: f64) -> BoundaryGroup {
    let rings: Vec<&Ring> = features.iter().flat_map(BoundaryFeature::rings).collect();
    let lines = rings
        .par_iter()
        .map(|ring| project_ring(ring, radius, style.color))
        .collect();
    BoundaryGroup::new(style.tier, style.color, lines)
}

fn project_ring(ring: &[GeoPoint], radius: f64, color: Rgb) -> BoundaryLine {
    BoundaryLine {
        vertices: ring.iter().map(|p| geo_to_sphere(p.lon, p.lat, radius)).collect(),
        color,
    }
}
