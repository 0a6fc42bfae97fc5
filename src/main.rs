use iced::widget::{column, container, scrollable, text};
use iced::{event, window, Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod error;
mod scan;
mod state;
mod ui;

use config::{ScanConfig, CONFIG_ENV_VAR};
use scan::preview::{prepare_thumbnails, DiskPreviewStore};
use scan::source::{self, ImageSource};
use state::catalog::{self as disease_catalog, Catalog};
use state::data::{ItemId, SeverityFilter};
use state::stats::SessionSummary;
use state::workflow::{ClassifyOutcome, UploadWorkflow};
use ui::Tab;

/// File extensions offered by the "Choose Files" dialog
const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "webp", "gif", "bmp", "tif", "tiff"];

/// Files read in the background, ready for `submit`
#[derive(Debug, Clone, Default)]
pub struct LoadedFiles {
    sources: Vec<ImageSource>,
    /// Non-image files a folder walk left unread
    ignored: usize,
}

/// Main application state
struct PoultryScan {
    /// Uploads and their classifications
    workflow: UploadWorkflow,
    tab: Tab,
    /// Disease database search text
    query: String,
    severity: SeverityFilter,
    /// Files are being dragged over the window
    drag_active: bool,
    /// Status message to display to the user
    status: String,
    /// Longest edge of generated preview thumbnails
    thumbnail_size: u32,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    TabSelected(Tab),
    /// User clicked "Choose Files"
    ChooseFiles,
    /// User clicked "Import Folder"
    ImportFolder,
    FileDropped(PathBuf),
    DragHovered,
    DragLeft,
    /// Background file reads and thumbnails finished
    SourcesLoaded(LoadedFiles),
    /// A classification job fired
    Classified(ClassifyOutcome),
    Remove(ItemId),
    ClearAll,
    QueryChanged(String),
    SeverityChanged(SeverityFilter),
}

impl PoultryScan {
    fn new(workflow: UploadWorkflow, thumbnail_size: u32) -> (Self, Task<Message>) {
        tracing::info!(diseases = workflow.catalog().len(), "PoultryScan initialized");

        (
            PoultryScan {
                workflow,
                tab: Tab::default(),
                query: String::new(),
                severity: SeverityFilter::All,
                drag_active: false,
                status: "Ready.".to_string(),
                thumbnail_size,
            },
            Task::none(),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                self.tab = tab;
                Task::none()
            }
            Message::ChooseFiles => {
                let files = FileDialog::new()
                    .set_title("Select Poultry Images")
                    .add_filter("Images", &IMAGE_EXTENSIONS)
                    .pick_files();

                match files {
                    Some(paths) if !paths.is_empty() => {
                        self.status = format!("Reading {} file(s)...", paths.len());
                        Task::perform(load_files(paths, self.thumbnail_size), Message::SourcesLoaded)
                    }
                    _ => Task::none(),
                }
            }
            Message::ImportFolder => {
                let folder = FileDialog::new()
                    .set_title("Select Folder with Poultry Images")
                    .pick_folder();

                if let Some(folder_path) = folder {
                    self.status = format!("Importing from {}...", folder_path.display());
                    return Task::perform(
                        import_folder(folder_path, self.thumbnail_size),
                        Message::SourcesLoaded,
                    );
                }

                Task::none()
            }
            Message::DragHovered => {
                self.drag_active = true;
                Task::none()
            }
            Message::DragLeft => {
                self.drag_active = false;
                Task::none()
            }
            Message::FileDropped(path) => {
                self.drag_active = false;
                self.tab = Tab::Classify;
                Task::perform(load_files(vec![path], self.thumbnail_size), Message::SourcesLoaded)
            }
            Message::SourcesLoaded(loaded) => {
                if loaded.sources.is_empty() {
                    self.status = if loaded.ignored > 0 {
                        format!("No images found. Skipped {} non-image file(s).", loaded.ignored)
                    } else {
                        "No readable files found.".to_string()
                    };
                    return Task::none();
                }

                let submission = self.workflow.submit(loaded.sources);
                self.status = submission_status(
                    submission.accepted.len(),
                    submission.skipped + loaded.ignored,
                    submission.failed,
                );

                Task::batch(
                    submission
                        .into_jobs()
                        .into_iter()
                        .map(|job| Task::perform(job.run(), Message::Classified)),
                )
            }
            Message::Classified(outcome) => {
                // The view re-reads the workflow, so a completion only needs a redraw
                tracing::debug!(id = %outcome.id(), "classification job finished");
                if let ClassifyOutcome::Completed { id, classification } = &outcome {
                    if classification.disease.severity == state::data::Severity::High {
                        self.status = format!("{id}: {} detected.", classification.disease.name);
                    }
                }
                Task::none()
            }
            Message::Remove(id) => {
                if !self.workflow.remove(id) {
                    tracing::debug!(%id, "remove of unknown item ignored");
                }
                Task::none()
            }
            Message::ClearAll => {
                let removed = self.workflow.clear();
                self.status = format!("Cleared {removed} upload(s).");
                Task::none()
            }
            Message::QueryChanged(query) => {
                self.query = query;
                Task::none()
            }
            Message::SeverityChanged(severity) => {
                self.severity = severity;
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let content = match self.tab {
            Tab::Dashboard => {
                ui::dashboard::view(SessionSummary::from_items(&self.workflow.snapshot()))
            }
            Tab::Classify => ui::classify::view(&self.workflow.snapshot(), self.drag_active),
            Tab::Diseases => ui::catalog::view(self.workflow.catalog(), &self.query, self.severity),
            Tab::Analytics => ui::analytics::view(),
            Tab::About => ui::about::view(),
        };

        let body = column![content, text(&self.status).size(13).color(ui::muted())].spacing(16);

        column![
            ui::header(self.tab),
            scrollable(container(body).padding(32).width(Length::Fill)).height(Length::Fill),
        ]
        .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(file_drop)
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }
}

/// Map window drag-and-drop events to messages
fn file_drop(event: Event, _status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Window(window::Event::FileHovered(_)) => Some(Message::DragHovered),
        Event::Window(window::Event::FilesHoveredLeft) => Some(Message::DragLeft),
        Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        _ => None,
    }
}

fn submission_status(accepted: usize, skipped: usize, failed: usize) -> String {
    let mut status = format!("Queued {accepted} image(s) for classification.");
    if skipped > 0 {
        status.push_str(&format!(" Skipped {skipped} non-image file(s)."));
    }
    if failed > 0 {
        status.push_str(&format!(" {failed} image(s) could not be previewed."));
    }
    status
}

/// Read the chosen files and build their preview thumbnails
async fn load_files(paths: Vec<PathBuf>, thumbnail_size: u32) -> LoadedFiles {
    let sources = source::load_sources(paths).await;
    LoadedFiles {
        sources: prepare_thumbnails(sources, thumbnail_size).await,
        ignored: 0,
    }
}

/// Read every image below `folder_path`; other files are counted, not read
async fn import_folder(folder_path: PathBuf, thumbnail_size: u32) -> LoadedFiles {
    tracing::info!(folder = %folder_path.display(), "scanning folder");
    let scan = source::collect_folder(&folder_path);
    tracing::debug!(images = scan.images.len(), skipped = scan.skipped, "folder scanned");

    let mut loaded = load_files(scan.images, thumbnail_size).await;
    loaded.ignored = scan.skipped;
    loaded
}

/// Load the config named by `$POULTRY_SCAN_CONFIG`, falling back to the
/// defaults when it cannot be used
fn load_config() -> ScanConfig {
    let Some(path) = ScanConfig::resolve_path(std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)) else {
        return ScanConfig::default();
    };

    ScanConfig::load(&path).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "invalid config, using defaults");
        ScanConfig::default()
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("poultry_scan=info".parse()?))
        .with(fmt::layer())
        .init();

    let config = load_config();
    let preview_dir = match config.preview_dir.clone() {
        Some(dir) => dir,
        None => DiskPreviewStore::default_dir()?,
    };
    let previews = DiskPreviewStore::open(preview_dir)?;
    tracing::info!(dir = %previews.dir().display(), "preview cache ready");

    let catalog = Catalog::new(&disease_catalog::DISEASES)?;
    let workflow = UploadWorkflow::from_config(&config, catalog, Arc::new(previews));
    let thumbnail_size = config.thumbnail_size;

    iced::application("PoultryScan AI", PoultryScan::update, PoultryScan::view)
        .subscription(PoultryScan::subscription)
        .theme(PoultryScan::theme)
        .window_size((1200.0, 800.0))
        .centered()
        .run_with(move || PoultryScan::new(workflow, thumbnail_size))?;

    Ok(())
}
