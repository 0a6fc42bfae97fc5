/// File-like inputs handed to the upload workflow
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Declared media types by file extension (lowercase)
const MEDIA_TYPES: [(&str, &str); 17] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("avif", "image/avif"),
    ("ico", "image/x-icon"),
    ("txt", "text/plain"),
    ("csv", "text/csv"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
    ("mp4", "video/mp4"),
];

const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// An uploaded file: its name, declared media type and raw bytes.
///
/// The bytes are shared behind an `Arc` so handing a source to the
/// classifier does not copy the image. A source read from disk also
/// carries a JPEG thumbnail built off the UI thread.
#[derive(Clone)]
pub struct ImageSource {
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
    thumbnail: Option<Arc<[u8]>>,
}

impl ImageSource {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
            thumbnail: None,
        }
    }

    /// Attach an encoded thumbnail for the preview store to use
    pub fn with_thumbnail(mut self, jpeg: impl Into<Arc<[u8]>>) -> Self {
        self.thumbnail = Some(jpeg.into());
        self
    }

    /// Read a file from disk, declaring its media type from the extension
    pub async fn from_path(path: PathBuf) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(&path).await?;
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        Ok(Self::new(name, media_type_for_path(&path), bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn shared_bytes(&self) -> Arc<[u8]> {
        self.bytes.clone()
    }

    pub fn thumbnail(&self) -> Option<&[u8]> {
        self.thumbnail.as_deref()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the declared media type is `image/*`
    pub fn is_image(&self) -> bool {
        is_image_media_type(&self.media_type)
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSource")
            .field("name", &self.name)
            .field("media_type", &self.media_type)
            .field("len", &self.bytes.len())
            .field("thumbnail", &self.thumbnail.as_ref().map(|t| t.len()))
            .finish()
    }
}

/// `image/*` check on a MIME-like string; the type part is case-insensitive
pub fn is_image_media_type(media_type: &str) -> bool {
    media_type
        .trim()
        .split_once('/')
        .is_some_and(|(kind, subtype)| kind.eq_ignore_ascii_case("image") && !subtype.is_empty())
}

/// Declare a media type for a file from its extension
pub fn media_type_for_path(path: &Path) -> &'static str {
    let Some(extension) = path.extension() else {
        return FALLBACK_MEDIA_TYPE;
    };
    let ext = extension.to_string_lossy().to_lowercase();

    MEDIA_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, media_type)| *media_type)
        .unwrap_or(FALLBACK_MEDIA_TYPE)
}

/// Result of walking an import folder
#[derive(Debug, Default)]
pub struct FolderScan {
    /// Files whose extension declares an image type
    pub images: Vec<PathBuf>,
    /// Regular files left unread because they are not images
    pub skipped: usize,
}

/// Every image file below `folder`, recursively.
///
/// Only the extension is checked, so nothing else is read from disk.
pub fn collect_folder(folder: &Path) -> FolderScan {
    let mut scan = FolderScan::default();

    for entry in WalkDir::new(folder)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        if is_image_media_type(media_type_for_path(entry.path())) {
            scan.images.push(entry.into_path());
        } else {
            scan.skipped += 1;
        }
    }

    scan
}

/// Read several files, skipping the ones that cannot be read
pub async fn load_sources(paths: Vec<PathBuf>) -> Vec<ImageSource> {
    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        match ImageSource::from_path(path.clone()).await {
            Ok(source) => sources.push(source),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable file"),
        }
    }
    sources
}
