/// Upload classification workflow
///
/// Admits uploaded images, schedules one simulated classification per
/// admitted image and supports removal at any time. All writes to the
/// collection go through one mutex; a classification checks that its item
/// still exists and records the result under the same lock.
use chrono::Local;
use rand::Rng;
use std::fmt;
use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
#[cfg(test)]
use tokio::task::JoinHandle;

use super::catalog::Catalog;
use super::data::{Classification, ItemId, ItemView};
use super::uploads::{Completion, UploadedItem, Uploads};
use crate::config::ScanConfig;
use crate::scan::oracle::{ClassificationOracle, RandomOracle};
use crate::scan::preview::{PreviewHandle, PreviewStore};
use crate::scan::source::ImageSource;

/// Cheap to clone; clones share the same collection
#[derive(Clone)]
pub struct UploadWorkflow {
    uploads: Arc<Mutex<Uploads>>,
    catalog: Catalog,
    oracle: Arc<dyn ClassificationOracle>,
    previews: Arc<dyn PreviewStore>,
    delay: Range<Duration>,
}

/// Result of one `submit` call
#[derive(Debug)]
pub struct Submission {
    /// Ids of the new items, in submission order
    pub accepted: Vec<ItemId>,
    /// Inputs whose media type is not an image
    pub skipped: usize,
    /// Image inputs dropped because no preview could be created
    pub failed: usize,
    jobs: Vec<ClassifyJob>,
}

impl Submission {
    /// The classification jobs, one per accepted item
    #[cfg(test)]
    pub fn jobs(&self) -> &[ClassifyJob] {
        &self.jobs
    }

    pub fn into_jobs(self) -> Vec<ClassifyJob> {
        self.jobs
    }

    /// Run every job on the current tokio runtime
    #[cfg(test)]
    pub fn spawn(self) -> Vec<JoinHandle<ClassifyOutcome>> {
        self.jobs.into_iter().map(ClassifyJob::spawn).collect()
    }
}

/// A pending classification bound to one item id.
///
/// Nothing happens until the job is awaited or spawned.
#[must_use = "a classification job does nothing unless run"]
pub struct ClassifyJob {
    workflow: UploadWorkflow,
    id: ItemId,
    delay: Duration,
}

impl ClassifyJob {
    #[cfg(test)]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[cfg(test)]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the processing delay, then classify
    pub async fn run(self) -> ClassifyOutcome {
        tokio::time::sleep(self.delay).await;
        self.workflow.classify(self.id)
    }

    #[cfg(test)]
    pub fn spawn(self) -> JoinHandle<ClassifyOutcome> {
        tokio::spawn(self.run())
    }
}

impl fmt::Debug for ClassifyJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifyJob")
            .field("id", &self.id)
            .field("delay", &self.delay)
            .finish()
    }
}

/// What a classification did to the collection
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyOutcome {
    Completed {
        id: ItemId,
        classification: Classification,
    },
    /// The item already had a result, which was kept
    AlreadyComplete(ItemId),
    /// The item was removed before the job fired
    Vanished(ItemId),
}

impl ClassifyOutcome {
    pub fn id(&self) -> ItemId {
        match self {
            ClassifyOutcome::Completed { id, .. } => *id,
            ClassifyOutcome::AlreadyComplete(id) | ClassifyOutcome::Vanished(id) => *id,
        }
    }
}

impl UploadWorkflow {
    pub fn new(
        catalog: Catalog,
        oracle: Arc<dyn ClassificationOracle>,
        previews: Arc<dyn PreviewStore>,
        delay: Range<Duration>,
    ) -> Self {
        Self {
            uploads: Arc::new(Mutex::new(Uploads::new())),
            catalog,
            oracle,
            previews,
            delay,
        }
    }

    /// Workflow with the random oracle tuned by `config`
    pub fn from_config(config: &ScanConfig, catalog: Catalog, previews: Arc<dyn PreviewStore>) -> Self {
        let oracle = RandomOracle::new(config.confidence.range());
        Self::new(catalog, Arc::new(oracle), previews, config.classify_delay_ms.range())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn lock(&self) -> MutexGuard<'_, Uploads> {
        self.uploads.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn sample_delay(&self) -> Duration {
        if self.delay.is_empty() {
            return self.delay.start;
        }
        rand::thread_rng().gen_range(self.delay.clone())
    }

    /// Admit every image among `inputs`.
    ///
    /// Inputs that are not `image/*` are skipped without error. Each
    /// admitted image becomes a pending item with its own classification
    /// job; the jobs are returned unstarted.
    pub fn submit<I>(&self, inputs: I) -> Submission
    where
        I: IntoIterator<Item = ImageSource>,
    {
        let mut admitted = Vec::new();
        let mut skipped = 0;
        let mut failed = 0;

        for source in inputs {
            if !source.is_image() {
                tracing::debug!(
                    file = source.name(),
                    media_type = source.media_type(),
                    "ignoring non-image upload"
                );
                skipped += 1;
                continue;
            }

            let id = ItemId::next();
            match PreviewHandle::create(self.previews.clone(), id, &source) {
                Ok(preview) => admitted.push(UploadedItem::new(id, source, preview)),
                Err(e) => {
                    tracing::warn!(file = source.name(), error = %e, "could not create preview, upload dropped");
                    failed += 1;
                }
            }
        }

        let accepted: Vec<ItemId> = admitted.iter().map(UploadedItem::id).collect();
        let jobs = accepted
            .iter()
            .map(|&id| ClassifyJob {
                workflow: self.clone(),
                id,
                delay: self.sample_delay(),
            })
            .collect();

        {
            let mut uploads = self.lock();
            for item in admitted {
                uploads.push(item);
            }
        }

        if !accepted.is_empty() || skipped > 0 || failed > 0 {
            tracing::info!(
                accepted = accepted.len(),
                skipped,
                failed,
                "uploads submitted"
            );
        }

        Submission {
            accepted,
            skipped,
            failed,
            jobs,
        }
    }

    /// Submit and start every job on the current tokio runtime
    #[cfg(test)]
    pub fn submit_spawned<I>(&self, inputs: I) -> (Vec<ItemId>, Vec<JoinHandle<ClassifyOutcome>>)
    where
        I: IntoIterator<Item = ImageSource>,
    {
        let submission = self.submit(inputs);
        let accepted = submission.accepted.clone();
        (accepted, submission.spawn())
    }

    /// Classify one item now.
    ///
    /// A no-op when the item is gone. The oracle runs outside the lock;
    /// the existence check and the update share one critical section.
    pub fn classify(&self, id: ItemId) -> ClassifyOutcome {
        let source = match self.lock().get(id) {
            Some(item) if item.status().is_pending() => item.source().clone(),
            Some(_) => return ClassifyOutcome::AlreadyComplete(id),
            None => {
                tracing::debug!(item = %id, "item removed before classification");
                return ClassifyOutcome::Vanished(id);
            }
        };

        let verdict = self.oracle.classify(&source, &self.catalog);
        let classification = Classification {
            disease: verdict.disease,
            confidence: verdict.confidence,
            completed_at: Local::now(),
        };

        let completion = self.lock().complete(id, classification.clone());
        match completion {
            Completion::Completed => {
                tracing::info!(
                    item = %id,
                    disease = classification.disease.name,
                    confidence = classification.confidence,
                    "classification complete"
                );
                ClassifyOutcome::Completed { id, classification }
            }
            Completion::AlreadyComplete => ClassifyOutcome::AlreadyComplete(id),
            Completion::Missing => {
                tracing::debug!(item = %id, "item removed during classification");
                ClassifyOutcome::Vanished(id)
            }
        }
    }

    /// Remove an item and release its preview.
    /// Returns false if there was no such item.
    pub fn remove(&self, id: ItemId) -> bool {
        let taken = self.lock().take(id);
        match taken {
            Some(item) => {
                // Preview is released here, outside the lock
                drop(item);
                tracing::debug!(item = %id, "upload removed");
                true
            }
            None => false,
        }
    }

    /// Remove every item. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let items = self.lock().drain();
        let count = items.len();
        drop(items);
        if count > 0 {
            tracing::info!(count, "uploads cleared");
        }
        count
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, id: ItemId) -> bool {
        self.lock().contains(id)
    }

    #[cfg(test)]
    pub fn get(&self, id: ItemId) -> Option<ItemView> {
        self.lock().get(id).map(UploadedItem::view)
    }

    /// Copy of every item in display order
    pub fn snapshot(&self) -> Vec<ItemView> {
        self.lock().iter().map(UploadedItem::view).collect()
    }
}

impl fmt::Debug for UploadWorkflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadWorkflow")
            .field("items", &self.len())
            .field("delay", &self.delay)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::oracle::Verdict;
    use crate::scan::preview::testing::MemoryPreviewStore;
    use crate::state::data::UploadStatus;

    const FULL_DELAY: Duration = Duration::from_millis(4000);

    fn workflow(store: &Arc<MemoryPreviewStore>) -> UploadWorkflow {
        UploadWorkflow::from_config(&ScanConfig::default(), Catalog::builtin(), store.clone())
    }

    fn jpeg(name: &str) -> ImageSource {
        ImageSource::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xD9])
    }

    fn text(name: &str) -> ImageSource {
        ImageSource::new(name, "text/plain", b"cluck".to_vec())
    }

    /// Always picks the same disease
    struct FixedOracle(&'static str, f32);

    impl ClassificationOracle for FixedOracle {
        fn classify(&self, _source: &ImageSource, catalog: &Catalog) -> Verdict {
            Verdict {
                disease: catalog.find(self.0).unwrap(),
                confidence: self.1,
            }
        }
    }

    #[test]
    fn test_submit_creates_pending_items_in_order() {
        let store = Arc::new(MemoryPreviewStore::default());
        let wf = workflow(&store);

        let submission = wf.submit(vec![jpeg("a.jpg"), jpeg("b.jpg"), jpeg("c.jpg")]);
        assert_eq!(submission.accepted.len(), 3);
        assert_eq!(submission.jobs().len(), 3);
        assert_eq!(submission.skipped, 0);

        let items = wf.snapshot();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
        let ids: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, submission.accepted);

        let mut unique = ids.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 3);

        assert!(items.iter().all(|i| i.status == UploadStatus::Pending));
        assert!(items.iter().all(|i| i.status.result().is_none()));
    }

    #[test]
    fn test_non_images_are_skipped() {
        let store = Arc::new(MemoryPreviewStore::default());
        let wf = workflow(&store);

        let submission = wf.submit(vec![
            text("notes.txt"),
            jpeg("a.jpg"),
            ImageSource::new("doc.pdf", "application/pdf", vec![1u8]),
            jpeg("b.jpg"),
        ]);
        assert_eq!(submission.accepted.len(), 2);
        assert_eq!(submission.skipped, 2);
        assert_eq!(submission.jobs().len(), 2);
        assert_eq!(wf.len(), 2);
        assert_eq!(store.live(), 2);
    }

    #[test]
    fn test_jobs_are_bound_to_items_with_delay_in_window() {
        let store = Arc::new(MemoryPreviewStore::default());
        let wf = workflow(&store);

        let submission = wf.submit((0..50).map(|i| jpeg(&format!("{i}.jpg"))));
        for (job, id) in submission.jobs().iter().zip(&submission.accepted) {
            assert_eq!(job.id(), *id);
            assert!(job.delay() >= Duration::from_millis(2000));
            assert!(job.delay() < FULL_DELAY);
        }
    }

    #[test]
    fn test_preview_failure_drops_only_that_upload() {
        let store = Arc::new(MemoryPreviewStore::default());
        store.fail_create("broken.jpg");
        let wf = workflow(&store);

        let submission = wf.submit(vec![jpeg("broken.jpg"), jpeg("ok.jpg")]);
        assert_eq!(submission.failed, 1);
        assert_eq!(submission.accepted.len(), 1);
        assert_eq!(wf.snapshot()[0].name, "ok.jpg");
    }

    #[tokio::test(start_paused = true)]
    async fn test_items_complete_after_delay() {
        let store = Arc::new(MemoryPreviewStore::default());
        let wf = workflow(&store);

        let (ids, handles) = wf.submit_spawned(vec![jpeg("hen.jpg")]);
        assert_eq!(ids.len(), 1);
        let id = ids[0];

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(wf.get(id).unwrap().status.is_pending());

        tokio::time::sleep(FULL_DELAY).await;
        for handle in handles {
            let outcome = handle.await.unwrap();
            assert!(matches!(outcome, ClassifyOutcome::Completed { .. }));
        }

        let view = wf.get(id).unwrap();
        let result = view.status.result().expect("item should be complete");
        assert!(result.confidence >= 0.70 && result.confidence < 1.0);
        assert!(wf.catalog().diseases().iter().any(|d| d == result.disease));
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_preserves_order() {
        let store = Arc::new(MemoryPreviewStore::default());
        let wf = workflow(&store);

        let (ids, handles) = wf.submit_spawned((0..5).map(|i| jpeg(&format!("{i}.jpg"))));
        for handle in handles {
            handle.await.unwrap();
        }

        let after: Vec<ItemId> = wf.snapshot().iter().map(|i| i.id).collect();
        assert_eq!(after, ids);
        assert!(wf.snapshot().iter().all(|i| !i.status.is_pending()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_before_classification_is_noop() {
        let store = Arc::new(MemoryPreviewStore::default());
        let wf = workflow(&store);

        let (ids, handles) = wf.submit_spawned(vec![jpeg("a.jpg"), jpeg("b.jpg")]);
        assert!(wf.remove(ids[0]));
        assert_eq!(store.releases(ids[0]), 1);

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }

        assert!(outcomes.contains(&ClassifyOutcome::Vanished(ids[0])));
        assert!(!wf.contains(ids[0]));
        assert!(wf.get(ids[1]).unwrap().status.result().is_some());
        assert_eq!(wf.len(), 1);
        assert_eq!(store.releases(ids[0]), 1);
    }

    #[test]
    fn test_remove_twice_releases_once() {
        let store = Arc::new(MemoryPreviewStore::default());
        let wf = workflow(&store);

        let submission = wf.submit(vec![jpeg("a.jpg")]);
        let id = submission.accepted[0];
        assert_eq!(store.releases(id), 0);

        assert!(wf.remove(id));
        assert!(!wf.remove(id));
        assert_eq!(store.releases(id), 1);
        assert!(wf.is_empty());
    }

    #[test]
    fn test_remove_survives_release_failure() {
        let store = Arc::new(MemoryPreviewStore::failing_release());
        let wf = workflow(&store);

        let id = wf.submit(vec![jpeg("a.jpg")]).accepted[0];
        assert!(wf.remove(id));
        assert!(!wf.contains(id));
        assert_eq!(store.releases(id), 1);
    }

    #[test]
    fn test_clear_releases_everything_once() {
        let store = Arc::new(MemoryPreviewStore::default());
        let wf = workflow(&store);

        let submission = wf.submit((0..4).map(|i| jpeg(&format!("{i}.jpg"))));
        assert_eq!(wf.clear(), 4);
        assert_eq!(wf.clear(), 0);
        for id in &submission.accepted {
            assert_eq!(store.releases(*id), 1);
        }
        assert_eq!(store.live(), 0);
    }

    #[test]
    fn test_classify_uses_pluggable_oracle() {
        let store = Arc::new(MemoryPreviewStore::default());
        let wf = UploadWorkflow::new(
            Catalog::builtin(),
            Arc::new(FixedOracle("coccidiosis", 0.83)),
            store.clone(),
            Duration::ZERO..Duration::ZERO,
        );

        let id = wf.submit(vec![jpeg("chick.jpg")]).accepted[0];
        let outcome = wf.classify(id);
        let ClassifyOutcome::Completed { classification, .. } = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        assert_eq!(classification.disease.name, "Coccidiosis");
        assert_eq!(classification.confidence, 0.83);

        // A second run keeps the first result
        assert_eq!(wf.classify(id), ClassifyOutcome::AlreadyComplete(id));
        let kept = wf.get(id).unwrap();
        assert_eq!(kept.status.result().unwrap().confidence, 0.83);
    }

    #[test]
    fn test_classify_unknown_id_is_noop() {
        let store = Arc::new(MemoryPreviewStore::default());
        let wf = workflow(&store);
        let id = ItemId::next();
        assert_eq!(wf.classify(id), ClassifyOutcome::Vanished(id));
        assert!(wf.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_removal_and_classification() {
        let store = Arc::new(MemoryPreviewStore::default());
        let wf = UploadWorkflow::new(
            Catalog::builtin(),
            Arc::new(RandomOracle::default()),
            store.clone(),
            Duration::ZERO..Duration::from_millis(5),
        );

        let (ids, handles) = wf.submit_spawned((0..200).map(|i| jpeg(&format!("{i}.jpg"))));

        let remover = {
            let wf = wf.clone();
            let doomed: Vec<ItemId> = ids.iter().copied().step_by(2).collect();
            tokio::spawn(async move {
                for id in doomed {
                    assert!(wf.remove(id));
                    tokio::task::yield_now().await;
                }
            })
        };

        remover.await.unwrap();
        for handle in handles {
            handle.await.unwrap();
        }

        for (index, id) in ids.iter().enumerate() {
            assert_eq!(store.releases(*id), if index % 2 == 0 { 1 } else { 0 });
            if index % 2 == 0 {
                assert!(!wf.contains(*id));
            } else {
                assert!(wf.get(*id).unwrap().status.result().is_some());
            }
        }
        assert_eq!(wf.len(), 100);
    }
}
