use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::hw::Link;

/// Interface state as reported by `/sys/class/net/<iface>/operstate`.
///
/// Association and credentials are the OS's business; this only observes.
#[derive(Debug, Clone)]
pub struct Operstate {
    path: PathBuf,
}

impl Operstate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn for_interface(interface: &str) -> Self {
        Self::new(Path::new("/sys/class/net").join(interface).join("operstate"))
    }
}

impl Link for Operstate {
    async fn is_connected(&self) -> bool {
        match fs::read_to_string(&self.path).await {
            Ok(state) => state.trim() == "up",
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "failed to read operstate");
                false
            }
        }
    }
}
