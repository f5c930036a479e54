use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::errors::TemplateError;

pub const OWNER_NOTIFICATION: &str = "owner_notification";
pub const CONFIRMATION: &str = "confirmation";

const EMBEDDED: [(&str, &str); 2] = [
    (OWNER_NOTIFICATION, include_str!("../../../templates/owner_notification.html")),
    (CONFIRMATION, include_str!("../../../templates/confirmation.html")),
];

#[async_trait]
pub trait TemplateStore: Send + Sync {
    async fn load(&self, name: &str) -> Result<String, TemplateError>;
}

/// Serves templates from a directory, or from the copies compiled into the
/// binary when no directory is configured.
#[derive(Debug, Clone, Default)]
pub struct FsTemplateStore {
    dir: Option<PathBuf>,
}

impl FsTemplateStore {
    pub fn embedded() -> Self {
        FsTemplateStore { dir: None }
    }

    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        FsTemplateStore { dir: Some(dir.into()) }
    }

    pub fn from_config(dir: Option<&Path>) -> Self {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::embedded(),
        }
    }
}

#[async_trait]
impl TemplateStore for FsTemplateStore {
    async fn load(&self, name: &str) -> Result<String, TemplateError> {
        let Some(dir) = &self.dir else {
            return EMBEDDED
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, source)| source.to_string())
                .ok_or_else(|| TemplateError::NotFound(name.to_string()));
        };

        let path = dir.join(format!("{name}.html"));
        fs::read_to_string(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TemplateError::NotFound(path.display().to_string()),
            _ => TemplateError::Io(path.display().to_string(), e),
        })
    }
}
