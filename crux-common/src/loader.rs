//! Dataset loading
//!
//! The records table and the problem coordinate table are read concurrently;
//! both must load and parse before anything is drawn. Either failure aborts
//! the load and nothing partial is returned.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::index::AttemptIndex;
use crate::model::{ProblemHoldRow, RecordRow};
use crate::{Error, Result};

/// Default file name of the records table inside the data folder
pub const DEFAULT_RECORDS_FILE: &str = "record.json";

/// Default file name of the problem coordinate table inside the data folder
pub const DEFAULT_PROBLEMS_FILE: &str = "probleminfo.json";

/// Both input tables, parsed
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub records: Vec<RecordRow>,
    pub problems: Vec<ProblemHoldRow>,
}

impl Datasets {
    pub fn into_index(self) -> AttemptIndex {
        AttemptIndex::new(self.records, self.problems)
    }
}

/// Locations of the two input files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub records: PathBuf,
    pub problems: PathBuf,
}

impl DatasetPaths {
    /// Default file names inside `data_folder`
    pub fn in_folder(data_folder: &Path) -> Self {
        Self {
            records: data_folder.join(DEFAULT_RECORDS_FILE),
            problems: data_folder.join(DEFAULT_PROBLEMS_FILE),
        }
    }
}

/// Read and parse both tables concurrently
pub async fn load_datasets(paths: &DatasetPaths) -> Result<Datasets> {
    let (records, problems) = tokio::try_join!(
        read_table::<RecordRow>(&paths.records),
        read_table::<ProblemHoldRow>(&paths.problems),
    )?;

    info!(
        records = records.len(),
        holds = problems.len(),
        "Loaded datasets"
    );
    Ok(Datasets { records, problems })
}

async fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    debug!(path = %path.display(), "Reading table");
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| Error::DataLoad(format!("{}: {}", path.display(), e)))?;
    parse_table(&bytes).map_err(|e| Error::DataLoad(format!("{}: {}", path.display(), e)))
}

/// Parse one table from JSON bytes (a top-level array of rows)
pub fn parse_table<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    Ok(serde_json::from_slice(bytes)?)
}
