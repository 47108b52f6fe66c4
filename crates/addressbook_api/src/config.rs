//! Request-surface configuration.
//!
//! Environment variables:
//! - `ADDRESSBOOK_DB_PATH`: SQLite file path. Defaults to
//!   `address_book.sqlite3` under the system temp directory.
//! - `ADDRESSBOOK_DISTANCE_MODEL`: `vincenty` (default) or `haversine`.

use addressbook_core::DistanceModel;
use log::warn;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "ADDRESSBOOK_DB_PATH";
pub const DISTANCE_MODEL_ENV: &str = "ADDRESSBOOK_DISTANCE_MODEL";
pub const DEFAULT_DB_FILE_NAME: &str = "address_book.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub db_path: PathBuf,
    pub distance_model: DistanceModel,
}

impl ApiConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            distance_model: DistanceModel::default(),
        }
    }

    pub fn with_distance_model(mut self, distance_model: DistanceModel) -> Self {
        self.distance_model = distance_model;
        self
    }

    /// Resolves configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset. Unknown distance model names fall back
    /// to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = non_blank(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let distance_model = match non_blank(DISTANCE_MODEL_ENV) {
            Some(raw) => DistanceModel::parse(&raw).unwrap_or_else(|| {
                warn!(
                    "event=config_resolve module=api status=fallback key={DISTANCE_MODEL_ENV} value={raw} default={}",
                    DistanceModel::default()
                );
                DistanceModel::default()
            }),
            None => DistanceModel::default(),
        };

        Self {
            db_path,
            distance_model,
        }
    }
}
