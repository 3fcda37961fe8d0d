//! Image catalog service
//!
//! Lists candidate product images from the assets directory, optionally
//! filtered by a keyword derived from the product name.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use crate::config::CatalogConfig;
use crate::models::ImageRef;
use crate::utils::errors::CatalogError;
use crate::utils::helpers::normalize_keyword;

const IMAGE_SUFFIXES: &[&str] = &[".jpg", ".jpeg"];

/// Catalog of candidate images in a single directory
#[derive(Debug, Clone)]
pub struct CatalogService {
    assets_dir: PathBuf,
}

impl CatalogService {
    /// Create a catalog over the configured assets directory
    pub fn new(config: &CatalogConfig) -> Self {
        Self::from_dir(&config.assets_dir)
    }

    /// Create a catalog over an arbitrary directory
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            assets_dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// List matching image filenames in directory order
    ///
    /// A missing directory is an empty catalog, not an error.
    pub async fn try_find_images(&self, keyword: Option<&str>) -> Result<Vec<String>, CatalogError> {
        let mut entries = match tokio::fs::read_dir(&self.assets_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(dir = %self.assets_dir.display(), "Assets directory does not exist");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(CatalogError::ReadDir {
                    path: self.assets_dir.display().to_string(),
                    source,
                })
            }
        };

        let key = keyword
            .map(normalize_keyword)
            .filter(|key| !key.is_empty());

        let mut images = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|source| CatalogError::ReadDir {
            path: self.assets_dir.display().to_string(),
            source,
        })? {
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !is_catalog_image(&name) {
                continue;
            }
            if let Some(key) = &key {
                if !name.to_lowercase().contains(key.as_str()) {
                    continue;
                }
            }
            images.push(name);
        }

        debug!(keyword = ?keyword, count = images.len(), "Catalog lookup finished");
        Ok(images)
    }

    /// List matching image filenames, treating unreadable directories as empty
    pub async fn find_images(&self, keyword: Option<&str>) -> Vec<String> {
        self.try_find_images(keyword).await.unwrap_or_else(|e| {
            warn!(error = %e, "Catalog lookup failed, treating as no matches");
            Vec::new()
        })
    }

    /// Full path of a catalog entry
    pub fn image_path(&self, filename: &str) -> PathBuf {
        self.assets_dir.join(filename)
    }

    /// Enumerate candidates as 1-based references for the client
    pub fn enumerate(&self, images: &[String]) -> Vec<ImageRef> {
        images
            .iter()
            .enumerate()
            .map(|(index, name)| ImageRef {
                id: index + 1,
                reference: self.image_path(name).display().to_string(),
            })
            .collect()
    }
}

/// Whether a filename carries a recognised image suffix (case-insensitive)
pub fn is_catalog_image(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}
