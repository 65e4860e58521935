use crate::models::AppData;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Shared handle to the persisted state. The running process is the sole
/// owner of the data file; mutating handlers hold the lock across both the
/// in-memory change and the whole-file write, so readers never observe a
/// half-applied transition.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Clone of the current snapshot for read-only handlers.
    pub async fn snapshot(&self) -> AppData {
        self.data.lock().await.clone()
    }
}
