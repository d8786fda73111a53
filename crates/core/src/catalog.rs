//! Entity service: one record kind plus its links to the peer kind and its
//! image folder.
//!
//! `CatalogService<O, P>` manages records of kind `O` whose reference list
//! points at records of kind `P`. The game and character services are the
//! two instantiations of it.

use std::sync::Arc;

use crate::entity::Linked;
use crate::error::CoreError;
use crate::images::{ImageArchive, ImageBundle};
use crate::relationship::{Propagation, RelationshipSync};
use crate::search::filter_records;
use crate::store::DynStore;

pub struct CatalogService<O, P> {
    records: DynStore<O>,
    links: RelationshipSync<P>,
    images: Arc<ImageArchive>,
}

impl<O: Linked, P: Linked> CatalogService<O, P> {
    pub fn new(records: DynStore<O>, peers: DynStore<P>, images: Arc<ImageArchive>) -> Self {
        Self {
            records,
            links: RelationshipSync::new(peers),
            images,
        }
    }

    /// All records, optionally narrowed by a case-insensitive substring
    /// match on the record's search fields.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<O>, CoreError> {
        let records = self.records.find_all().await?;
        Ok(filter_records(records, search))
    }

    pub async fn get(&self, id: &str) -> Result<O, CoreError> {
        self.find(id).await?.ok_or_else(|| not_found::<O>(id))
    }

    pub async fn find(&self, id: &str) -> Result<Option<O>, CoreError> {
        Ok(self.records.find_by_id(id).await?)
    }

    /// Persist a new record with its links cleared of unknown peers, then
    /// mirror the links into the peers in the background.
    ///
    /// The returned [`Propagation`] may be dropped; the mirroring still runs.
    pub async fn create(&self, mut record: O) -> Result<(O, Propagation), CoreError> {
        let cleared = self.links.validate_links(record.peer_ids()).await?;
        *record.peer_ids_mut() = cleared;

        let created = self.records.insert(record).await.map_err(|e| {
            tracing::error!(kind = %O::KIND, error = %e, "Insert failed");
            CoreError::BadRequest(format!("{} could not be created", O::KIND))
        })?;
        tracing::info!(
            kind = %O::KIND,
            id = created.id(),
            links = created.peer_ids().len(),
            "Created record"
        );

        let propagation = self.links.spawn_link(created.peer_ids().to_vec(), &created);
        Ok((created, propagation))
    }

    /// Replace an existing record wholesale. Links are not re-validated or
    /// mirrored.
    pub async fn update(&self, id: &str, record: O) -> Result<(), CoreError> {
        if self.find(id).await?.is_none() {
            return Err(not_found::<O>(id));
        }
        if !self.records.replace(id, &record).await? {
            return Err(not_found::<O>(id));
        }
        tracing::info!(kind = %O::KIND, id, "Replaced record");
        Ok(())
    }

    /// Unlink the record from its peers, remove its image folder, then
    /// remove the record. Steps are not rolled back if a later one fails.
    pub async fn delete(&self, id: &str) -> Result<Propagation, CoreError> {
        let record = self.get(id).await?;

        let propagation = self.links.spawn_unlink(record.peer_ids().to_vec(), &record);
        self.images.delete_all(O::KIND, id).await?;
        self.records.delete(id).await?;

        tracing::info!(kind = %O::KIND, id, "Deleted record");
        Ok(propagation)
    }

    /// Store an uploaded file for an existing record and append its
    /// reference to the record.
    ///
    /// The file write and the record write are separate; if the second fails
    /// the file stays on disk unreferenced.
    pub async fn upload_image(
        &self,
        id: &str,
        file_name: &str,
        content: &[u8],
    ) -> Result<O, CoreError> {
        let Some(mut record) = self.find(id).await? else {
            return Err(CoreError::BadRequest(format!(
                "Cannot attach an image to unknown {} {id}",
                O::KIND
            )));
        };

        let reference = self.images.store(O::KIND, id, file_name, content).await?;
        if !record.images().contains(&reference) {
            record.images_mut().push(reference);
        }
        self.records.replace(id, &record).await?;
        Ok(record)
    }

    /// Zip of every image of the record, `None` if it has none yet.
    pub async fn download_images(&self, id: &str) -> Result<Option<ImageBundle>, CoreError> {
        self.images.bundle(O::KIND, id).await
    }

    /// Delete one image file of an existing record.
    ///
    /// The record's reference list is left untouched, so a reference to the
    /// removed file stays on the record.
    pub async fn delete_image(&self, id: &str, file_name: &str) -> Result<(), CoreError> {
        if self.find(id).await?.is_none() {
            return Err(not_found::<O>(id));
        }
        self.images.delete_one(O::KIND, id, file_name).await?;
        Ok(())
    }
}

fn not_found<O: Linked>(id: &str) -> CoreError {
    CoreError::NotFound {
        entity: O::KIND.label(),
        id: id.to_string(),
    }
}
