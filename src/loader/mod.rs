use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

use crate::record::Organization;

/// Location of the dataset relative to the site root.
pub const DEFAULT_DATA_PATH: &str = "data/source.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    FilePath(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched, anything else is a path.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        let lower = trimmed.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::FilePath(PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::FilePath(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read data file: {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to fetch data: {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("data request returned HTTP {status}: {url}")]
    Status { url: String, status: u16 },

    #[error("invalid data document: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
    },

    #[error("data document must be a JSON array of records")]
    NotArray,

    #[error("record {index} is not a JSON object")]
    NotObject { index: usize },
}

/// The loaded dataset, sorted once by case-insensitive name. Positions in
/// this sequence identify records for the rest of the session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Directory {
    records: Vec<Organization>,
}

impl Directory {
    pub fn new(mut records: Vec<Organization>) -> Self {
        records.sort_by_cached_key(Organization::sort_key);
        Self { records }
    }

    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        let document: Value =
            serde_json::from_str(raw).map_err(|source| LoadError::Parse { source })?;
        let Value::Array(items) = document else {
            return Err(LoadError::NotArray);
        };
        let records = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(fields) => Ok(Organization::from(fields)),
                _ => Err(LoadError::NotObject { index }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Organization> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[Organization] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Organization)> {
        self.records.iter().enumerate()
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn load(source: &DataSource) -> Result<Directory, LoadError> {
    let raw = match source {
        DataSource::FilePath(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Read {
                    path: path.display().to_string(),
                    source,
                })?
        }
        DataSource::Url(url) => fetch(url).await?,
    };
    let directory = Directory::from_json(&raw)?;
    tracing::debug!(
        source = %source.describe(),
        records = directory.len(),
        "loaded directory"
    );
    Ok(directory)
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch(url: &str) -> Result<String, LoadError> {
    let fetch_err = |source| LoadError::Fetch {
        url: url.to_string(),
        source,
    };
    let response = reqwest::get(url).await.map_err(fetch_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    response.text().await.map_err(fetch_err)
}
