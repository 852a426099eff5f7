// src/dataset.rs
//
// Boundary shape for every output file: header-named columns plus, for
// geospatial layers, one optional point per row. Typed records turn into a
// DataSet only when they are about to be written.

use crate::model::Point;

/// A typed record that can be flattened into one output row.
pub trait Record {
    const HEADERS: &'static [&'static str];

    /// One cell per header; `None` is written as empty (CSV) or null (GeoJSON).
    fn cells(&self) -> Vec<Option<String>>;

    fn point(&self) -> Option<Point> { None }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    /// Present for geospatial layers, one entry per row.
    pub geometry: Option<Vec<Option<Point>>>,
}

impl DataSet {
    /// Plain table.
    pub fn table<R: Record>(records: &[R]) -> Self {
        Self {
            headers: R::HEADERS.iter().map(|h| s!(*h)).collect(),
            rows: records.iter().map(Record::cells).collect(),
            geometry: None,
        }
    }

    /// Same columns, with a point geometry per row.
    pub fn layer<R: Record>(records: &[R]) -> Self {
        let mut ds = Self::table(records);
        ds.geometry = Some(records.iter().map(Record::point).collect());
        ds
    }

    pub fn is_spatial(&self) -> bool { self.geometry.is_some() }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Rename one column; unknown names are ignored.
    pub fn renamed(mut self, from: &str, to: &str) -> Self {
        if let Some(i) = self.column(from) {
            self.headers[i] = s!(to);
        }
        self
    }
}
