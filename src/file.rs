// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::csv::write_dataset;
use crate::dataset::DataSet;
use crate::error::{Error, Result};
use crate::geojson::from_dataset;

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::data(dir, "path exists but is not a directory"));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    File::create(path).map(BufWriter::new).map_err(|e| Error::io(path, e)) // truncate/overwrite
}

pub fn write_csv(path: &Path, ds: &DataSet) -> Result<()> {
    let mut out = create(path)?;
    write_dataset(&mut out, ds).map_err(|e| Error::io(path, e))?;
    out.flush().map_err(|e| Error::io(path, e))
}

pub fn write_geojson(path: &Path, ds: &DataSet) -> Result<()> {
    let mut out = create(path)?;
    serde_json::to_writer(&mut out, &from_dataset(ds))
        .map_err(|source| Error::Json { path: path.to_path_buf(), source })?;
    out.flush().map_err(|e| Error::io(path, e))
}

/// `<dir>/<stem>.csv`
pub fn write_table(dir: &Path, stem: &str, ds: &DataSet) -> Result<PathBuf> {
    let path = dir.join(format!("{stem}.csv"));
    write_csv(&path, ds)?;
    logd!("Wrote {} rows to {}", ds.len(), path.display());
    Ok(path)
}

/// `<dir>/<stem>.geojson` plus the same rows as `<dir>/<stem>.csv`.
pub fn write_layer(dir: &Path, stem: &str, ds: &DataSet) -> Result<Vec<PathBuf>> {
    let geo = dir.join(format!("{stem}.geojson"));
    write_geojson(&geo, ds)?;
    logd!("Wrote {} features to {}", ds.len(), geo.display());
    Ok(vec![geo, write_table(dir, stem, ds)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Record;
    use crate::model::Point;

    struct Site(&'static str, Option<Point>);

    impl Record for Site {
        const HEADERS: &'static [&'static str] = &["name"];
        fn cells(&self) -> Vec<Option<String>> { vec![Some(s!(self.0))] }
        fn point(&self) -> Option<Point> { self.1 }
    }

    #[test]
    fn layer_writes_geojson_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let ds = DataSet::layer(&[Site("a", Some(Point::new(1.5, 2.5))), Site("b", None)]);
        let paths = write_layer(dir.path(), "sites", &ds).unwrap();
        assert_eq!(paths.len(), 2);

        let geo: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths[0]).unwrap()).unwrap();
        assert_eq!(geo["features"][0]["geometry"]["coordinates"][0], 2.5);
        assert!(geo["features"][1]["geometry"].is_null());

        let csv = fs::read_to_string(&paths[1]).unwrap();
        assert_eq!(csv, "name,geometry\na,POINT (2.5 1.5)\nb,\n");
    }

    #[test]
    fn nested_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        let path = write_table(&nested, "t", &DataSet::table(&[Site("x", None)])).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn file_in_the_way_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        fs::write(&file, "").unwrap();
        assert!(ensure_directory(&file).is_err());
    }
}
