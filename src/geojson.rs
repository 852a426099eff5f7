// src/geojson.rs
// GeoJSON FeatureCollection read/write, just enough for points in and out
// and polygons in (country reference).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::dataset::DataSet;
use crate::model::Point;

pub type Position = Vec<f64>;

#[derive(Debug, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    pub fn point(p: Point) -> Self {
        Geometry::Point { coordinates: p.lng_lat().to_vec() }
    }

    /// Point geometries as is; polygons by the vertex mean of the exterior
    /// ring of their largest part.
    pub fn centroid(&self) -> Option<Point> {
        match self {
            Geometry::Point { coordinates } => position_to_point(coordinates),
            Geometry::Polygon { coordinates } => coordinates.first().and_then(|r| ring_mean(r)),
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .filter_map(|poly| poly.first())
                .max_by(|a, b| bbox_area(a).total_cmp(&bbox_area(b)))
                .and_then(|r| ring_mean(r)),
            Geometry::Unsupported => None,
        }
    }
}

fn position_to_point(pos: &[f64]) -> Option<Point> {
    match pos {
        [lng, lat, ..] => Some(Point::new(*lat, *lng)),
        _ => None,
    }
}

fn ring_mean(ring: &[Position]) -> Option<Point> {
    // A closed ring repeats its first vertex at the end.
    let open = match (ring.first(), ring.last()) {
        (Some(a), Some(b)) if ring.len() > 1 && a == b => &ring[..ring.len() - 1],
        _ => ring,
    };
    let pts: Vec<Point> = open.iter().filter_map(|p| position_to_point(p)).collect();
    if pts.is_empty() { return None; }
    let n = pts.len() as f64;
    let lat = pts.iter().map(|p| p.lat).sum::<f64>() / n;
    let lng = pts.iter().map(|p| p.lng).sum::<f64>() / n;
    Some(Point::new(lat, lng))
}

fn bbox_area(ring: &[Position]) -> f64 {
    let pts: Vec<Point> = ring.iter().filter_map(|p| position_to_point(p)).collect();
    if pts.is_empty() { return 0.0; }
    let (mut min_x, mut max_x) = (f64::MAX, f64::MIN);
    let (mut min_y, mut max_y) = (f64::MAX, f64::MIN);
    for p in &pts {
        min_x = min_x.min(p.lng); max_x = max_x.max(p.lng);
        min_y = min_y.min(p.lat); max_y = max_y.max(p.lat);
    }
    (max_x - min_x) * (max_y - min_y)
}

/* ---------------- Properties ---------------- */

impl Feature {
    /// String-ish property by name, ignoring ASCII case. Numbers are
    /// stringified; null and empty strings are absent.
    pub fn prop(&self, name: &str) -> Option<String> {
        let props = self.properties.as_ref()?;
        let value = props
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)?;
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn point(&self) -> Option<Point> {
        self.geometry.as_ref().and_then(Geometry::centroid)
    }
}

/* ---------------- DataSet → FeatureCollection ---------------- */

pub fn from_dataset(ds: &DataSet) -> FeatureCollection {
    let features = ds
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let properties: Map<String, Value> = ds
                .headers
                .iter()
                .zip(row)
                .map(|(h, c)| (h.clone(), c.clone().map(Value::String).unwrap_or(Value::Null)))
                .collect();
            let geometry = ds
                .geometry
                .as_ref()
                .and_then(|g| g.get(i).copied().flatten())
                .map(Geometry::point);
            Feature { kind: s!("Feature"), properties: Some(properties), geometry }
        })
        .collect();

    FeatureCollection { kind: s!("FeatureCollection"), features }
}

/* ---------------- FeatureCollection → DataSet ---------------- */

/// Columns are every property name seen, in first-seen order; non-point
/// geometry is reduced to its centroid.
pub fn to_dataset(fc: &FeatureCollection) -> DataSet {
    let mut headers: Vec<String> = Vec::new();
    for props in fc.features.iter().filter_map(|f| f.properties.as_ref()) {
        for key in props.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }
    let rows = fc
        .features
        .iter()
        .map(|f| headers.iter().map(|h| f.prop(h)).collect())
        .collect();
    let geometry = fc.features.iter().map(Feature::point).collect();

    DataSet { headers, rows, geometry: Some(geometry) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_points_polygons_and_unknown_geometry() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"NAME":"Peru","ISO_N3":604},
             "geometry":{"type":"Point","coordinates":[-77.04,-12.05]}},
            {"type":"Feature","properties":{"name":"Sq"},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[2,0],[2,2],[0,2],[0,0]]]}},
            {"type":"Feature","properties":null,
             "geometry":{"type":"LineString","coordinates":[[0,0],[1,1]]}},
            {"type":"Feature","properties":{},"geometry":null}
        ]}"#;
        let fc: FeatureCollection = serde_json::from_str(text).unwrap();
        assert_eq!(fc.features.len(), 4);

        let peru = &fc.features[0];
        assert_eq!(peru.prop("name").as_deref(), Some("Peru"));
        assert_eq!(peru.prop("iso_n3").as_deref(), Some("604"));
        assert_eq!(peru.point(), Some(Point::new(-12.05, -77.04)));

        assert_eq!(fc.features[1].point(), Some(Point::new(1.0, 1.0)));
        assert_eq!(fc.features[2].point(), None);
        assert_eq!(fc.features[3].point(), None);
    }

    #[test]
    fn multipolygon_uses_largest_part() {
        let g = Geometry::MultiPolygon {
            coordinates: vec![
                vec![vec![vec![10.0, 10.0], vec![10.5, 10.0], vec![10.5, 10.5], vec![10.0, 10.0]]],
                vec![vec![vec![0.0, 0.0], vec![4.0, 0.0], vec![4.0, 4.0], vec![0.0, 4.0], vec![0.0, 0.0]]],
            ],
        };
        assert_eq!(g.centroid(), Some(Point::new(2.0, 2.0)));
    }

    #[test]
    fn dataset_nulls_become_json_nulls() {
        let ds = DataSet {
            headers: vec![s!("name"), s!("add")],
            rows: vec![vec![Some(s!("Acme")), None]],
            geometry: Some(vec![None]),
        };
        let json = serde_json::to_value(from_dataset(&ds)).unwrap();
        let f = &json["features"][0];
        assert_eq!(f["properties"]["name"], "Acme");
        assert!(f["properties"]["add"].is_null());
        assert!(f["geometry"].is_null());
    }
}
