//! Reference-table store
//!
//! Holds the active [`ReferenceData`] behind an `Arc` so requests read a
//! consistent snapshot without holding the lock while they compute. A reload
//! builds and validates a complete new table set before swapping it in; on
//! failure the previous tables stay active.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::File;
use shared::ReferenceData;
use tokio::sync::RwLock;

use crate::config::ReferenceConfig;
use crate::error::{AppError, AppResult};

pub struct ReferenceStore {
    current: RwLock<Arc<ReferenceData>>,
    source: Option<PathBuf>,
}

impl ReferenceStore {
    /// Store backed by the compiled-in tables; reloads are no-ops
    pub fn builtin() -> Self {
        Self {
            current: RwLock::new(Arc::new(ReferenceData::builtin())),
            source: None,
        }
    }

    /// Build the store described by configuration, loading the table file if
    /// one is set
    pub fn from_config(config: &ReferenceConfig) -> AppResult<Self> {
        match &config.path {
            Some(path) => {
                let source = PathBuf::from(path);
                let data = load_tables(&source)?;
                tracing::info!(path = %source.display(), version = %data.version, "Loaded reference tables");
                Ok(Self {
                    current: RwLock::new(Arc::new(data)),
                    source: Some(source),
                })
            }
            None => {
                tracing::info!("Using built-in reference tables");
                Ok(Self::builtin())
            }
        }
    }

    /// Snapshot of the active tables
    pub async fn current(&self) -> Arc<ReferenceData> {
        Arc::clone(&*self.current.read().await)
    }

    /// Re-read the table file and swap it in
    pub async fn reload(&self) -> AppResult<Arc<ReferenceData>> {
        let Some(source) = &self.source else {
            tracing::debug!("No reference file configured, keeping built-in tables");
            return Ok(self.current().await);
        };

        let data = match load_tables(source) {
            Ok(data) => Arc::new(data),
            Err(e) => {
                tracing::warn!(path = %source.display(), "Reference reload failed, keeping previous tables");
                return Err(e);
            }
        };

        *self.current.write().await = Arc::clone(&data);
        tracing::info!(version = %data.version, "Reference tables reloaded");
        Ok(data)
    }
}

/// Parse and validate a reference-table file (format from its extension)
fn load_tables(path: &Path) -> AppResult<ReferenceData> {
    let name = path
        .to_str()
        .ok_or_else(|| AppError::Configuration(format!("non UTF-8 reference path {:?}", path)))?;

    let data: ReferenceData = config::Config::builder()
        .add_source(File::with_name(name))
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| AppError::Configuration(format!("reference tables {}: {}", name, e)))?;

    data.validate()?;
    Ok(data)
}
