use itertools::Itertools;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[cfg(test)]
mod tests;

pub const REGISTRY_FILE_NAME: &str = "active-quizzes.json";

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not encode active quizzes: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// The quiz names currently servable, persisted as a JSON array.
///
/// Every mutation re-reads the file and rewrites it whole. There is no lock:
/// two concurrent mutations can race and the last write wins.
#[derive(Debug)]
pub struct ActivationRegistry {
    path: PathBuf,
}

impl ActivationRegistry {
    /// Opens the registry, creating an empty one if the file is absent.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, RegistryError> {
        let registry = ActivationRegistry { path: path.into() };
        if let Some(parent) = registry.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| registry.io_error(source))?;
        }
        let exists = fs::try_exists(&registry.path)
            .await
            .map_err(|source| registry.io_error(source))?;
        if !exists {
            registry.save(&[]).await?;
        }
        Ok(registry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current active names. Unreadable state counts as empty.
    pub async fn list(&self) -> Vec<String> {
        let names: Result<Vec<String>, String> = fs::read_to_string(&self.path)
            .await
            .map_err(|e| e.to_string())
            .and_then(|content| serde_json::from_str(&content).map_err(|e| e.to_string()));
        match names {
            Ok(names) => names.into_iter().unique().collect(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not read active quizzes");
                Vec::new()
            }
        }
    }

    pub async fn is_active(&self, name: &str) -> bool {
        self.list().await.iter().any(|active| active == name)
    }

    pub async fn activate(&self, name: &str) -> Result<Vec<String>, RegistryError> {
        let mut names = self.list().await;
        if !names.iter().any(|active| active == name) {
            names.push(name.to_owned());
            self.save(&names).await?;
            tracing::info!(quiz = name, "activated quiz");
        }
        Ok(names)
    }

    pub async fn deactivate(&self, name: &str) -> Result<Vec<String>, RegistryError> {
        let mut names = self.list().await;
        names.retain(|active| active != name);
        self.save(&names).await?;
        tracing::info!(quiz = name, "deactivated quiz");
        Ok(names)
    }

    async fn save(&self, names: &[String]) -> Result<(), RegistryError> {
        let content = serde_json::to_string(names)?;
        fs::write(&self.path, content)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: io::Error) -> RegistryError {
        RegistryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
