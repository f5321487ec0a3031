//! GeoJSON packaging of calculated protection areas.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use pansops_core::{AttributeValue, Attributes, ProcedureKind, ProtectionArea};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// File name for an export produced at `at`.
pub fn export_file_name(procedure: ProcedureKind, at: DateTime<Utc>) -> String {
    format!("{}_{}.geojson", procedure, at.format("%Y%m%dT%H%M%SZ"))
}

fn properties(procedure: ProcedureKind, attributes: &Attributes) -> Map<String, Value> {
    let mut props = Map::new();
    props.insert("procedure".into(), json!(procedure.as_str()));
    for (name, value) in attributes {
        let value = match value {
            AttributeValue::Number(n) => json!(n),
            AttributeValue::Text(s) => json!(s),
        };
        props.insert(name.clone(), value);
    }
    props
}

fn area_features(area: &ProtectionArea, features: &mut Vec<Value>) {
    for polygon in &area.areas {
        let coordinates: Vec<[f64; 2]> = polygon.ring.points().iter().map(|p| [p.x, p.y]).collect();
        let mut props = properties(area.procedure, &polygon.attributes);
        props.insert("area".into(), json!(polygon.kind.as_str()));
        features.push(json!({
            "type": "Feature",
            "properties": props,
            "geometry": {
                "type": "Polygon",
                "coordinates": [coordinates]
            }
        }));
    }

    for line in &area.lines {
        let coordinates: Vec<[f64; 2]> = line.points.iter().map(|p| [p.x, p.y]).collect();
        let mut props = properties(area.procedure, &Attributes::new());
        props.insert("line".into(), json!(line.name));
        features.push(json!({
            "type": "Feature",
            "properties": props,
            "geometry": {
                "type": "LineString",
                "coordinates": coordinates
            }
        }));
    }
}

/// Build one FeatureCollection for a batch of results: one Polygon per area
/// and one LineString per track line, in input order.
pub fn feature_collection(areas: &[ProtectionArea], generated_at: DateTime<Utc>) -> Value {
    let mut features = Vec::new();
    for area in areas {
        area_features(area, &mut features);
    }
    let calculations: Vec<_> = areas
        .iter()
        .map(|area| Value::Object(properties(area.procedure, &area.attributes)))
        .collect();

    json!({
        "type": "FeatureCollection",
        "properties": {
            "generated_at": generated_at.to_rfc3339(),
            "calculations": calculations,
        },
        "features": features
    })
}

/// Write `areas` as one GeoJSON file into `output_dir`, creating the
/// directory if needed. The file is named after the first result's procedure.
pub fn write_geojson(areas: &[ProtectionArea], output_dir: &Path) -> Result<PathBuf> {
    let Some(first) = areas.first() else {
        bail!("nothing to export");
    };
    let generated_at = Utc::now();
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let path = output_dir.join(export_file_name(first.procedure, generated_at));
    let payload = feature_collection(areas, generated_at);
    let bytes = serde_json::to_vec_pretty(&payload)?;
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;

    tracing::info!(path = %path.display(), results = areas.len(), "export written");
    Ok(path)
}
