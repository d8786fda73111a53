//! Filesystem-backed image namespace, one folder per entity.
//!
//! Layout under the configured web root:
//!
//! ```text
//! {root}/images/{games|characters}/{entity_id}/{file_name}
//! ```
//!
//! The archive never checks that the entity exists; callers do. Writes to the
//! same file name overwrite (last writer wins).

use std::io::{Cursor, Write};
use std::path::PathBuf;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::entity::EntityKind;
use crate::error::CoreError;

/// Top-level folder of the image namespace, relative to the web root.
pub const IMAGES_DIR: &str = "images";

/// An in-memory zip of every image of one entity.
#[derive(Debug, Clone)]
pub struct ImageBundle {
    pub content: Vec<u8>,
    /// Suggested download name, `{entity_id}.zip`.
    pub file_name: String,
}

/// Image storage rooted at a web-root directory.
#[derive(Debug, Clone)]
pub struct ImageArchive {
    root: PathBuf,
}

impl ImageArchive {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Reference string recorded on the entity for a stored file.
    pub fn reference_path(kind: EntityKind, entity_id: &str, file_name: &str) -> String {
        format!("{IMAGES_DIR}/{}/{entity_id}/{file_name}", kind.folder())
    }

    fn folder(&self, kind: EntityKind, entity_id: &str) -> PathBuf {
        self.root.join(IMAGES_DIR).join(kind.folder()).join(entity_id)
    }

    /// Write `content` as `file_name` in the entity's folder, creating the
    /// folder if needed, and return the reference path.
    pub async fn store(
        &self,
        kind: EntityKind,
        entity_id: &str,
        file_name: &str,
        content: &[u8],
    ) -> Result<String, CoreError> {
        check_segment("entity id", entity_id)?;
        check_segment("file name", file_name)?;

        let folder = self.folder(kind, entity_id);
        tokio::fs::create_dir_all(&folder).await?;
        tokio::fs::write(folder.join(file_name), content).await?;

        tracing::debug!(
            kind = %kind,
            entity_id,
            file_name,
            bytes = content.len(),
            "Stored image"
        );
        Ok(Self::reference_path(kind, entity_id, file_name))
    }

    /// Remove one file. Returns whether a file was removed; an empty id or
    /// name, or a file that is not there, is a no-op.
    pub async fn delete_one(
        &self,
        kind: EntityKind,
        entity_id: &str,
        file_name: &str,
    ) -> Result<bool, CoreError> {
        if entity_id.is_empty() || file_name.is_empty() {
            return Ok(false);
        }
        check_segment("entity id", entity_id)?;
        check_segment("file name", file_name)?;

        let path = self.folder(kind, entity_id).join(file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(kind = %kind, entity_id, file_name, "Deleted image");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every file of the entity and then its folder. Returns the
    /// number of files removed; a missing folder is a no-op.
    pub async fn delete_all(&self, kind: EntityKind, entity_id: &str) -> Result<usize, CoreError> {
        if entity_id.is_empty() {
            return Ok(0);
        }
        check_segment("entity id", entity_id)?;

        let files = self.list(kind, entity_id).await?;
        let mut removed = 0;
        for file_name in &files {
            if self.delete_one(kind, entity_id, file_name).await? {
                removed += 1;
            }
        }

        match tokio::fs::remove_dir_all(self.folder(kind, entity_id)).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        if removed > 0 {
            tracing::info!(kind = %kind, entity_id, removed, "Deleted image folder");
        }
        Ok(removed)
    }

    /// Names of the files currently in the entity's folder, sorted. Empty
    /// when the folder does not exist.
    pub async fn list(&self, kind: EntityKind, entity_id: &str) -> Result<Vec<String>, CoreError> {
        check_segment("entity id", entity_id)?;
        Ok(self.read_folder(kind, entity_id).await?.unwrap_or_default())
    }

    /// Zip every file of the entity in memory.
    ///
    /// `None` means the entity has no image folder yet. An existing but empty
    /// folder yields an archive with no entries.
    pub async fn bundle(
        &self,
        kind: EntityKind,
        entity_id: &str,
    ) -> Result<Option<ImageBundle>, CoreError> {
        check_segment("entity id", entity_id)?;

        let Some(names) = self.read_folder(kind, entity_id).await? else {
            return Ok(None);
        };

        let folder = self.folder(kind, entity_id);
        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            // A concurrent delete may remove a file after listing.
            match tokio::fs::read(folder.join(&name)).await {
                Ok(bytes) => entries.push((name, bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }

        let count = entries.len();
        let content = tokio::task::spawn_blocking(move || build_zip(entries))
            .await
            .map_err(|e| CoreError::Internal(format!("Zip task failed: {e}")))??;

        tracing::debug!(
            kind = %kind,
            entity_id,
            files = count,
            bytes = content.len(),
            "Built image bundle"
        );
        Ok(Some(ImageBundle {
            content,
            file_name: format!("{entity_id}.zip"),
        }))
    }

    /// Sorted regular-file names in the folder, or `None` if it is missing.
    async fn read_folder(
        &self,
        kind: EntityKind,
        entity_id: &str,
    ) -> Result<Option<Vec<String>>, CoreError> {
        let mut dir = match tokio::fs::read_dir(self.folder(kind, entity_id)).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(Some(names))
    }
}

/// Reject values that would escape the entity folder when joined as a path
/// segment.
fn check_segment(what: &str, value: &str) -> Result<(), CoreError> {
    let unsafe_segment = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);
    if unsafe_segment {
        return Err(CoreError::Validation(format!("Invalid {what} '{value}'")));
    }
    Ok(())
}

fn build_zip(entries: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>, CoreError> {
    // Fastest deflate level.
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(1));

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        writer.start_file(name, options)?;
        writer.write_all(&bytes)?;
    }
    Ok(writer.finish()?.into_inner())
}
