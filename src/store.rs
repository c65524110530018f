use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::photo::Photo;

/// Immutable copy of the collection handed to the save queue.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub revision: u64,
    pub photos: Arc<Vec<Photo>>,
}

/// The in-memory collection; single source of truth for the session.
pub struct Gallery {
    photos: Arc<Vec<Photo>>,
    revision: u64,
}

impl Gallery {
    /// Builds a collection, repairing records that lack the sentinel tag.
    pub fn new(mut photos: Vec<Photo>) -> Self {
        let repaired = photos
            .iter_mut()
            .map(Photo::ensure_sentinel)
            .filter(|&repaired| repaired)
            .count();
        if repaired > 0 {
            tracing::info!(repaired, "added missing sentinel tag to loaded photos");
        }
        Self {
            photos: Arc::new(photos),
            revision: 0,
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let photos: Vec<Photo> = serde_json::from_str(json)?;
        Ok(Self::new(photos))
    }

    /// Reads the gallery file from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read gallery {}", path.display()))?;
        let gallery = Self::from_json(&json)
            .with_context(|| format!("failed to parse gallery {}", path.display()))?;
        tracing::info!(path = %path.display(), photos = gallery.len(), "loaded gallery");
        Ok(gallery)
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn get(&self, index: usize) -> Option<&Photo> {
        self.photos.get(index)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Swaps in the collection built by `producer` from the current one.
    pub fn replace<F>(&mut self, producer: F)
    where
        F: FnOnce(&[Photo]) -> Vec<Photo>,
    {
        let next = producer(self.photos.as_slice());
        self.photos = Arc::new(next);
        self.revision += 1;
    }

    /// Rebuilds the record at `index` through `replace`. Returns false if
    /// there is no such record.
    pub fn update_photo<F>(&mut self, index: usize, f: F) -> bool
    where
        F: FnOnce(&Photo) -> Photo,
    {
        if index >= self.photos.len() {
            return false;
        }
        self.replace(|photos| {
            let mut next = photos.to_vec();
            next[index] = f(&photos[index]);
            next
        });
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            revision: self.revision,
            photos: Arc::clone(&self.photos),
        }
    }
}

/// Two-space indented JSON, the on-disk form of the gallery.
pub fn to_pretty_json(photos: &[Photo]) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(photos)?)
}
