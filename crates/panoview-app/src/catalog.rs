//! The catalog: a fixed set of selectable panoramic videos, read from
//! `catalog.json` in the media directory with a built-in fallback list.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    pub video: PathBuf,
    #[serde(default)]
    pub thumbnail: Option<PathBuf>,
}

impl CatalogEntry {
    /// Entries without a source are shown but do nothing on click.
    pub fn is_playable(&self) -> bool {
        !self.video.as_os_str().is_empty()
    }
}

pub struct Catalog {
    pub entries: Vec<CatalogEntry>,
    base_dir: PathBuf,
}

impl Catalog {
    pub fn load(media_dir: &Path) -> Self {
        let path = media_dir.join("catalog.json");
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<Vec<CatalogEntry>>(&json) {
                Ok(entries) => {
                    log::info!("catalog: {} entries from {}", entries.len(), path.display());
                    entries
                }
                Err(e) => {
                    log::warn!("unparseable {}: {e}, using built-in catalog", path.display());
                    default_entries()
                }
            },
            Err(_) => default_entries(),
        };
        Self {
            entries,
            base_dir: media_dir.to_path_buf(),
        }
    }

    /// Resolve an entry path against the media directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

fn default_entries() -> Vec<CatalogEntry> {
    [
        ("Virtual Tour", "videos/VirtualTour.mp4", "thumbnails/VirtualTour.jpg"),
        ("Space", "videos/Space.mp4", "thumbnails/Space.jpg"),
        ("Skydive", "videos/Skydive.mp4", "thumbnails/Skydive.png"),
    ]
    .into_iter()
    .map(|(title, video, thumb)| CatalogEntry {
        title: title.to_string(),
        video: PathBuf::from(video),
        thumbnail: Some(PathBuf::from(thumb)),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::load(dir.path());
        assert_eq!(catalog.entries.len(), 3);
        assert_eq!(catalog.entries[0].title, "Virtual Tour");
        assert!(catalog.entries.iter().all(CatalogEntry::is_playable));
    }

    #[test]
    fn reads_catalog_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("catalog.json"),
            r#"[
                {"title": "Reef", "video": "reef.mp4", "thumbnail": "reef.jpg"},
                {"title": "Empty", "video": ""}
            ]"#,
        )
        .unwrap();
        let catalog = Catalog::load(dir.path());
        assert_eq!(catalog.entries.len(), 2);
        assert_eq!(catalog.entries[0].title, "Reef");
        assert!(catalog.entries[0].is_playable());
        assert!(catalog.entries[1].thumbnail.is_none());
        assert!(!catalog.entries[1].is_playable());
    }

    #[test]
    fn broken_json_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("catalog.json"), "not json").unwrap();
        let catalog = Catalog::load(dir.path());
        assert_eq!(catalog.entries.len(), 3);
    }

    #[test]
    fn resolve_joins_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::load(dir.path());
        let resolved = catalog.resolve(Path::new("videos/VirtualTour.mp4"));
        assert!(resolved.starts_with(dir.path()));

        let absolute = dir.path().join("elsewhere.mp4");
        assert_eq!(catalog.resolve(&absolute), absolute);
    }
}
