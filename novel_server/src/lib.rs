//! # Novel Recorder Server
//!
//! HTTP front end over [`NovelRecorder`].
//!
//! Handles:
//! - JSON endpoints with axum
//! - request identity from the `x-user-id` header
//! - mapping recorder errors onto status codes
//! - persisting the store snapshot after every successful write

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod identity;
pub mod routes;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use routes::router;

use novel_model::NovelStore;
use novel_recorder::{NovelRecorder, RecorderResult};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard};

/// Shared state of all request handlers.
#[derive(Clone)]
pub struct AppState {
    recorder: Arc<RwLock<NovelRecorder>>,
    snapshot_path: Option<Arc<PathBuf>>,
}

impl AppState {
    pub fn new(recorder: NovelRecorder) -> Self {
        Self {
            recorder: Arc::new(RwLock::new(recorder)),
            snapshot_path: None,
        }
    }

    pub fn with_snapshot(mut self, path: PathBuf) -> Self {
        self.snapshot_path = Some(Arc::new(path));
        self
    }

    /// Build the state described by `config`: load the snapshot if one is
    /// configured and register every configured user not yet known.
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let store = match &config.snapshot_path {
            Some(path) => NovelStore::load_or_default(path)?,
            None => NovelStore::new(),
        };
        let mut recorder = NovelRecorder::new(store);
        for user in &config.users {
            if recorder.user(user.id).is_err() {
                recorder.register_user(user.clone())?;
            }
        }
        let counts = recorder.store().counts();
        tracing::info!(
            users = counts.users,
            novels = counts.novels,
            descriptions = counts.descriptions,
            "store ready"
        );

        let state = Self::new(recorder);
        Ok(match &config.snapshot_path {
            Some(path) => state.with_snapshot(path.clone()),
            None => state,
        })
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, NovelRecorder> {
        self.recorder.read().await
    }

    /// Run a write against the recorder and persist the snapshot if it
    /// succeeded. A write whose snapshot cannot be stored is rolled back.
    pub async fn write<T>(
        &self,
        op: impl FnOnce(&mut NovelRecorder) -> RecorderResult<T>,
    ) -> ApiResult<T> {
        let mut recorder = self.recorder.write().await;
        let Some(path) = &self.snapshot_path else {
            return Ok(op(&mut *recorder)?);
        };

        let checkpoint = recorder.clone();
        let value = op(&mut *recorder)?;
        if let Err(err) = persist(Arc::clone(path), recorder.store()).await {
            tracing::warn!(error = %err, "snapshot failed, write rolled back");
            *recorder = checkpoint;
            return Err(err);
        }
        Ok(value)
    }
}

async fn persist(path: Arc<PathBuf>, store: &NovelStore) -> ApiResult<()> {
    let encoded = store.to_snapshot()?;
    tokio::task::spawn_blocking(move || NovelStore::write_snapshot(&path, &encoded)).await??;
    Ok(())
}
