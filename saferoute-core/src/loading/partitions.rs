//! Partitioned JSON datasets. A dataset directory holds any number of files,
//! each a JSON array, stored either plain (`.json`) or gzip-compressed (`.json.gz`).

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use log::{debug, trace};
use serde::de::DeserializeOwned;

use crate::Error;

fn is_compressed(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

fn is_partition(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
        return false;
    };
    name.ends_with(".json") || name.ends_with(".json.gz")
}

/// Lists the partition files of a dataset directory in file name order
///
/// # Errors
///
/// Returns [`Error::DataLoad`] if the directory does not exist or cannot be read
pub fn list_partitions(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    if !dir.is_dir() {
        return Err(Error::data_load(dir, "dataset directory not found"));
    }

    let mut partitions = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::data_load(dir, e))? {
        let path = entry.map_err(|e| Error::data_load(dir, e))?.path();
        if path.is_file() && is_partition(&path) {
            partitions.push(path);
        } else {
            trace!("Skipping non-partition entry {}", path.display());
        }
    }
    partitions.sort();

    debug!("Found {} partitions in {}", partitions.len(), dir.display());
    Ok(partitions)
}

/// Reads one JSON array file, transparently decompressing `.gz` files
///
/// # Errors
///
/// Returns [`Error::DataLoad`] if the file is missing or is not a valid array of `T`
pub fn read_partition<T>(path: &Path) -> Result<Vec<T>, Error>
where
    T: DeserializeOwned,
{
    let file = File::open(path).map_err(|e| Error::data_load(path, e))?;
    let reader: Box<dyn Read> = if is_compressed(path) {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    serde_json::from_reader(BufReader::new(reader)).map_err(|e| Error::data_load(path, e))
}
