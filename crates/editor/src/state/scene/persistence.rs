//! Autosave/load functionality

use shared::SceneDocument;

use super::SceneState;
use crate::codec;

impl SceneState {
    /// Get autosave file path
    fn autosave_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "blockcad", "blockcad")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Save the entity set to the autosave file
    pub fn autosave(&self) {
        let Some(path) = Self::autosave_path() else {
            return;
        };
        let doc = codec::export_document(self, None);
        if let Err(e) = codec::save_document(&doc, &path) {
            tracing::warn!("Autosave to {} failed: {e}", path.display());
        }
    }

    /// Load the autosave file, if present and well-formed
    pub fn load_autosave() -> Option<SceneDocument> {
        let path = Self::autosave_path()?;
        codec::load_document(&path).ok()
    }

    /// Check if autosave file exists
    pub fn has_autosave() -> bool {
        Self::autosave_path()
            .map(|p| p.exists())
            .unwrap_or(false)
    }
}
