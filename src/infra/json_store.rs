use std::path::PathBuf;

use crate::domain::model::catalog::Catalog;
use crate::domain::repository::CatalogRepository;

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSONファイルによるCatalogRepository実装。
/// ファイル内容はBookの配列。
pub struct JsonCatalogRepository {
    path: PathBuf,
}

impl JsonCatalogRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogRepository for JsonCatalogRepository {
    type Error = JsonStoreError;

    /// ファイルが無い、または壊れている場合は空のCatalogを返す。
    fn load(&self) -> Result<Catalog, Self::Error> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no library file, starting empty");
            return Ok(Catalog::new());
        }
        let content = std::fs::read(&self.path)?;
        match serde_json::from_slice::<Catalog>(&content) {
            Ok(catalog) => {
                tracing::debug!(path = %self.path.display(), books = catalog.len(), "library loaded");
                Ok(catalog)
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "library file is malformed, starting empty"
                );
                Ok(Catalog::new())
            }
        }
    }

    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(catalog)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
