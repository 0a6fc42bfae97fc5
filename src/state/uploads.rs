/// The ordered collection of uploaded items
///
/// Pure state: no timers and no locking. `UploadWorkflow` wraps it in a
/// mutex and drives the classification tasks.
use super::data::{Classification, ItemId, ItemView, UploadStatus};
use crate::scan::preview::PreviewHandle;
use crate::scan::source::ImageSource;

/// One uploaded image and its classification state
#[derive(Debug)]
pub struct UploadedItem {
    id: ItemId,
    source: ImageSource,
    preview: PreviewHandle,
    status: UploadStatus,
}

impl UploadedItem {
    /// A new pending item
    pub fn new(id: ItemId, source: ImageSource, preview: PreviewHandle) -> Self {
        Self {
            id,
            source,
            preview,
            status: UploadStatus::Pending,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    pub fn view(&self) -> ItemView {
        ItemView {
            id: self.id,
            name: self.source.name().to_string(),
            media_type: self.source.media_type().to_string(),
            size_bytes: self.source.len(),
            preview_path: self.preview.path().to_path_buf(),
            status: self.status.clone(),
        }
    }
}

/// What `Uploads::complete` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The item went from pending to complete
    Completed,
    /// The item was already complete; its result is unchanged
    AlreadyComplete,
    /// No item with this id (it was removed)
    Missing,
}

/// Uploaded items in insertion order
#[derive(Debug, Default)]
pub struct Uploads {
    items: Vec<UploadedItem>,
}

impl Uploads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, item: UploadedItem) {
        self.items.push(item);
    }

    pub fn get(&self, id: ItemId) -> Option<&UploadedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    #[cfg(test)]
    pub fn contains(&self, id: ItemId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UploadedItem> {
        self.items.iter()
    }

    /// Record a classification result in place.
    /// A complete item is never overwritten.
    pub fn complete(&mut self, id: ItemId, classification: Classification) -> Completion {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return Completion::Missing;
        };

        if !item.status.is_pending() {
            return Completion::AlreadyComplete;
        }

        item.status = UploadStatus::Complete(classification);
        Completion::Completed
    }

    /// Take an item out of the collection.
    ///
    /// The caller owns the returned item; dropping it releases the preview.
    pub fn take(&mut self, id: ItemId) -> Option<UploadedItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Take every item out of the collection
    pub fn drain(&mut self) -> Vec<UploadedItem> {
        std::mem::take(&mut self.items)
    }
}
