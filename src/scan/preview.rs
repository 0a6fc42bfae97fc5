/// Preview handles for uploaded images
///
/// A preview is a display copy derived from the uploaded bytes. Every
/// preview is owned by exactly one `PreviewHandle` and released when that
/// handle is dropped.
use image::imageops::FilterType;
use image::ImageFormat;
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::source::ImageSource;
use crate::error::{PreviewError, ScanError, ScanResult};
use crate::state::data::ItemId;

/// Creates and revokes previews
pub trait PreviewStore: Send + Sync {
    /// Derive a preview for `source`, returning where it can be displayed from
    fn create(&self, id: ItemId, source: &ImageSource) -> Result<PathBuf, PreviewError>;

    /// Revoke a preview previously returned by `create`
    fn release(&self, id: ItemId, path: &Path) -> Result<(), PreviewError>;
}

/// Owned preview of one uploaded item.
///
/// Dropping the handle releases the preview exactly once. A failed release
/// is logged and otherwise ignored.
pub struct PreviewHandle {
    id: ItemId,
    path: PathBuf,
    store: Arc<dyn PreviewStore>,
}

impl PreviewHandle {
    /// Create a preview through `store`
    pub fn create(
        store: Arc<dyn PreviewStore>,
        id: ItemId,
        source: &ImageSource,
    ) -> Result<Self, PreviewError> {
        let path = store.create(id, source)?;
        Ok(Self { id, path, store })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if let Err(e) = self.store.release(self.id, &self.path) {
            tracing::warn!(item = %self.id, error = %e, "failed to release preview");
        }
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("id", &self.id)
            .field("path", &self.path)
            .finish()
    }
}

/// Previews cached as files on disk
#[derive(Debug)]
pub struct DiskPreviewStore {
    dir: PathBuf,
}

impl DiskPreviewStore {
    /// Open the preview directory, creating it if needed.
    ///
    /// Previews left behind by an earlier session are deleted. Files that
    /// this store did not name are never touched.
    pub fn open(dir: PathBuf) -> ScanResult<Self> {
        fs::create_dir_all(&dir).map_err(|source| ScanError::PreviewDir {
            path: dir.clone(),
            source,
        })?;

        let store = Self { dir };
        let swept = store.sweep();
        if swept > 0 {
            tracing::info!(count = swept, dir = %store.dir.display(), "removed stale previews");
        }

        Ok(store)
    }

    /// Default location: `<cache_dir>/poultry-scan/previews`
    pub fn default_dir() -> ScanResult<PathBuf> {
        let mut path = dirs::cache_dir()
            .or_else(dirs::home_dir)
            .ok_or(ScanError::NoCacheDir)?;

        path.push("poultry-scan");
        path.push("previews");
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Delete the previews a previous session left in the directory
    fn sweep(&self) -> usize {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return 0;
        };

        let mut removed = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            let owned = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_preview_file_name);
            if !owned || !path.is_file() {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove stale preview"),
            }
        }
        removed
    }

    fn write(&self, id: ItemId, extension: &str, bytes: &[u8]) -> Result<PathBuf, PreviewError> {
        let path = self.dir.join(format!("{id}.{extension}"));
        fs::write(&path, bytes).map_err(|source| PreviewError::Write { id, source })?;
        Ok(path)
    }
}

impl PreviewStore for DiskPreviewStore {
    /// Write the prepared thumbnail, or the uploaded bytes when there is
    /// none. Never decodes, so it is cheap enough for the UI thread.
    fn create(&self, id: ItemId, source: &ImageSource) -> Result<PathBuf, PreviewError> {
        if let Some(thumbnail) = source.thumbnail() {
            let path = self.write(id, "jpg", thumbnail)?;
            tracing::debug!(item = %id, path = %path.display(), "stored preview thumbnail");
            return Ok(path);
        }

        let extension = Path::new(source.name())
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "bin".to_string());
        let path = self.write(id, &extension, source.bytes())?;
        tracing::debug!(item = %id, path = %path.display(), "stored raw preview");
        Ok(path)
    }

    fn release(&self, id: ItemId, path: &Path) -> Result<(), PreviewError> {
        fs::remove_file(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => PreviewError::UnknownHandle(id),
            _ => PreviewError::Release {
                path: path.to_path_buf(),
                source,
            },
        })
    }
}

/// Names written by `DiskPreviewStore`: `upload-<n>.<ext>`
fn is_preview_file_name(name: &str) -> bool {
    let Some((stem, extension)) = name.split_once('.') else {
        return false;
    };
    let Some(number) = stem.strip_prefix("upload-") else {
        return false;
    };

    !number.is_empty()
        && number.bytes().all(|b| b.is_ascii_digit())
        && !extension.is_empty()
        && extension.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Decode `bytes` and downscale to fit `size`, encoded as JPEG.
/// Returns `None` when the bytes are not a decodable image.
pub fn encode_thumbnail(bytes: &[u8], size: u32) -> Option<Vec<u8>> {
    let img = image::load_from_memory(bytes).ok()?;
    let thumbnail = img.resize(size, size, FilterType::Lanczos3).to_rgb8();

    let mut jpeg = Vec::new();
    match thumbnail.write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg) {
        Ok(()) => Some(jpeg),
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode thumbnail");
            None
        }
    }
}

/// Build thumbnails for every image source on the blocking pool.
///
/// Run this inside the load task, before the sources reach `submit`.
/// Sources that cannot be decoded pass through without a thumbnail.
pub async fn prepare_thumbnails(sources: Vec<ImageSource>, size: u32) -> Vec<ImageSource> {
    let mut prepared = Vec::with_capacity(sources.len());

    for source in sources {
        if !source.is_image() {
            prepared.push(source);
            continue;
        }

        let bytes = source.shared_bytes();
        match tokio::task::spawn_blocking(move || encode_thumbnail(&bytes, size)).await {
            Ok(Some(jpeg)) => prepared.push(source.with_thumbnail(jpeg)),
            Ok(None) => prepared.push(source),
            Err(e) => {
                tracing::warn!(file = source.name(), error = %e, "thumbnail task failed");
                prepared.push(source);
            }
        }
    }

    prepared
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// In-memory store that records every release
    #[derive(Debug, Default)]
    pub(crate) struct MemoryPreviewStore {
        live: Mutex<HashSet<ItemId>>,
        releases: Mutex<HashMap<ItemId, usize>>,
        fail_create_for: Mutex<HashSet<String>>,
        fail_release: bool,
    }

    impl MemoryPreviewStore {
        /// Store whose releases always fail
        pub(crate) fn failing_release() -> Self {
            Self {
                fail_release: true,
                ..Self::default()
            }
        }

        /// Refuse to create a preview for files with this name
        pub(crate) fn fail_create(&self, name: &str) {
            self.fail_create_for.lock().unwrap().insert(name.to_string());
        }

        pub(crate) fn live(&self) -> usize {
            self.live.lock().unwrap().len()
        }

        pub(crate) fn is_live(&self, id: ItemId) -> bool {
            self.live.lock().unwrap().contains(&id)
        }

        pub(crate) fn releases(&self, id: ItemId) -> usize {
            self.releases.lock().unwrap().get(&id).copied().unwrap_or(0)
        }

        pub(crate) fn total_releases(&self) -> usize {
            self.releases.lock().unwrap().values().sum()
        }
    }

    impl PreviewStore for MemoryPreviewStore {
        fn create(&self, id: ItemId, source: &ImageSource) -> Result<PathBuf, PreviewError> {
            if self.fail_create_for.lock().unwrap().contains(source.name()) {
                return Err(PreviewError::Write {
                    id,
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            self.live.lock().unwrap().insert(id);
            Ok(PathBuf::from(format!("memory://{id}")))
        }

        fn release(&self, id: ItemId, _path: &Path) -> Result<(), PreviewError> {
            *self.releases.lock().unwrap().entry(id).or_default() += 1;
            if !self.live.lock().unwrap().remove(&id) {
                return Err(PreviewError::UnknownHandle(id));
            }
            if self.fail_release {
                return Err(PreviewError::Release {
                    path: PathBuf::from(format!("memory://{id}")),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "locked"),
                });
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MemoryPreviewStore;
    use super::*;
    use image::{ImageBuffer, Rgb};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb([200u8, 120, 40]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_dropping_handle_releases_once() {
        let store = Arc::new(MemoryPreviewStore::default());
        let id = ItemId::next();
        let source = ImageSource::new("hen.jpg", "image/jpeg", vec![1u8]);

        let handle = PreviewHandle::create(store.clone(), id, &source).unwrap();
        assert!(store.is_live(id));
        assert_eq!(store.releases(id), 0);

        drop(handle);
        assert!(!store.is_live(id));
        assert_eq!(store.releases(id), 1);
    }

    #[tokio::test]
    async fn test_thumbnails_are_prepared_before_submit() {
        let sources = vec![
            ImageSource::new("hen.png", "image/png", png_bytes(300, 200)),
            ImageSource::new("hen.HEIC", "image/heic", vec![9u8, 9, 9]),
            ImageSource::new("notes.txt", "text/plain", b"cluck".to_vec()),
        ];

        let prepared = prepare_thumbnails(sources, 64).await;
        assert_eq!(prepared.len(), 3);

        let thumb = image::load_from_memory(prepared[0].thumbnail().unwrap()).unwrap();
        assert!(thumb.width() <= 64 && thumb.height() <= 64);
        assert!(prepared[1].thumbnail().is_none());
        assert!(prepared[2].thumbnail().is_none());
    }

    #[test]
    fn test_disk_store_writes_prepared_thumbnail() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskPreviewStore::open(dir.path().join("previews")).unwrap();
        let id = ItemId::next();
        let thumbnail = encode_thumbnail(&png_bytes(300, 200), 64).unwrap();
        let source =
            ImageSource::new("hen.png", "image/png", png_bytes(300, 200)).with_thumbnail(thumbnail.clone());

        let path = store.create(id, &source).unwrap();
        assert_eq!(path.extension().unwrap(), "jpg");
        assert_eq!(fs::read(&path).unwrap(), thumbnail);

        store.release(id, &path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_disk_store_without_thumbnail_copies_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskPreviewStore::open(dir.path().to_path_buf()).unwrap();

        // Decodable image without a prepared thumbnail is copied, not decoded
        let id = ItemId::next();
        let png = png_bytes(40, 30);
        let path = store.create(id, &ImageSource::new("hen.png", "image/png", png.clone())).unwrap();
        assert_eq!(path.extension().unwrap(), "png");
        assert_eq!(fs::read(&path).unwrap(), png);

        let id = ItemId::next();
        let source = ImageSource::new("hen.HEIC", "image/heic", vec![9u8, 9, 9]);
        let path = store.create(id, &source).unwrap();
        assert_eq!(path.extension().unwrap(), "heic");
        assert_eq!(fs::read(&path).unwrap(), vec![9u8, 9, 9]);
    }

    #[test]
    fn test_disk_release_of_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskPreviewStore::open(dir.path().to_path_buf()).unwrap();
        let id = ItemId::next();
        let err = store.release(id, &dir.path().join("nope.jpg")).unwrap_err();
        assert!(matches!(err, PreviewError::UnknownHandle(missing) if missing == id));
    }

    #[test]
    fn test_open_sweeps_only_own_previews() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("upload-1.jpg"), b"old").unwrap();
        fs::write(dir.path().join("upload-22.png"), b"old").unwrap();
        fs::write(dir.path().join("family_photo.jpg"), b"keep").unwrap();
        fs::write(dir.path().join("thesis.docx"), b"keep").unwrap();
        fs::write(dir.path().join("upload-notes.txt"), b"keep").unwrap();

        let store = DiskPreviewStore::open(dir.path().to_path_buf()).unwrap();

        let mut left: Vec<String> = fs::read_dir(store.dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        left.sort();
        assert_eq!(left, vec!["family_photo.jpg", "thesis.docx", "upload-notes.txt"]);
    }

    #[test]
    fn test_preview_file_names() {
        assert!(is_preview_file_name("upload-7.jpg"));
        assert!(is_preview_file_name("upload-123.heic"));
        assert!(!is_preview_file_name("upload-.jpg"));
        assert!(!is_preview_file_name("upload-7"));
        assert!(!is_preview_file_name("upload-7a.jpg"));
        assert!(!is_preview_file_name("photo.jpg"));
    }
}
