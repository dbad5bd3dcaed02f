//! Handing documents to the desktop (the viewer's download link)

use std::sync::{Arc, Mutex};

use anyhow::Result;
use log::info;

pub trait SystemCommandExecutor {
    /// Open `target` (a path or URL) with the system's default application
    fn open_url(&self, target: &str) -> Result<()>;
}

pub struct RealSystemCommandExecutor;

impl SystemCommandExecutor for RealSystemCommandExecutor {
    fn open_url(&self, target: &str) -> Result<()> {
        info!("Opening {target} with the system viewer");
        open::that(target)?;
        Ok(())
    }
}

/// Records targets instead of opening them
#[derive(Clone, Default)]
pub struct MockSystemCommandExecutor {
    executed: Arc<Mutex<Vec<String>>>,
}

impl MockSystemCommandExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_executed_commands(&self) -> Vec<String> {
        self.executed.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl SystemCommandExecutor for MockSystemCommandExecutor {
    fn open_url(&self, target: &str) -> Result<()> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(target.to_string());
        }
        Ok(())
    }
}
