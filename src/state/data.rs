/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the workflow layer and the UI layer.
use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Risk level of a disease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity selector for the catalog view (`all | Low | Medium | High`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeverityFilter {
    #[default]
    All,
    Only(Severity),
}

impl SeverityFilter {
    /// Every selectable option, in display order
    pub const OPTIONS: [SeverityFilter; 4] = [
        SeverityFilter::All,
        SeverityFilter::Only(Severity::Low),
        SeverityFilter::Only(Severity::Medium),
        SeverityFilter::Only(Severity::High),
    ];

    pub fn matches(&self, severity: Severity) -> bool {
        match self {
            SeverityFilter::All => true,
            SeverityFilter::Only(wanted) => *wanted == severity,
        }
    }
}

impl fmt::Display for SeverityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeverityFilter::All => f.write_str("all"),
            SeverityFilter::Only(severity) => severity.fmt(f),
        }
    }
}

impl FromStr for SeverityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(SeverityFilter::All),
            "Low" => Ok(SeverityFilter::Only(Severity::Low)),
            "Medium" => Ok(SeverityFilter::Only(Severity::Medium)),
            "High" => Ok(SeverityFilter::Only(Severity::High)),
            other => Err(format!("unknown severity filter: {other}")),
        }
    }
}

/// A disease record from the static catalog
#[derive(Debug, PartialEq)]
pub struct Disease {
    /// Unique key (e.g., "fowl-pox")
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Ordered list of visible symptoms
    pub symptoms: &'static [&'static str],
    pub treatment: &'static str,
    pub severity: Severity,
    /// Share of all cases in percent, informational only
    pub prevalence: f32,
}

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of an uploaded item, unique for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    /// Allocate the next id from the process-wide counter
    pub fn next() -> Self {
        ItemId(NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload-{}", self.0)
    }
}

/// Outcome of a finished (simulated) classification
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Entry of the static catalog the image was assigned to
    pub disease: &'static Disease,
    /// Confidence in [0.70, 1.00) with the default oracle
    pub confidence: f32,
    pub completed_at: DateTime<Local>,
}

impl Classification {
    pub fn band(&self) -> ConfidenceBand {
        ConfidenceBand::of(self.confidence)
    }
}

/// Colour band used when rendering a confidence bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    /// Above 90%
    Strong,
    /// Above 80%
    Fair,
    Weak,
}

impl ConfidenceBand {
    pub fn of(confidence: f32) -> Self {
        if confidence > 0.9 {
            ConfidenceBand::Strong
        } else if confidence > 0.8 {
            ConfidenceBand::Fair
        } else {
            ConfidenceBand::Weak
        }
    }
}

/// Classification state of an uploaded item.
/// The result only exists once the item is complete.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadStatus {
    Pending,
    Complete(Classification),
}

impl UploadStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, UploadStatus::Pending)
    }

    pub fn result(&self) -> Option<&Classification> {
        match self {
            UploadStatus::Pending => None,
            UploadStatus::Complete(classification) => Some(classification),
        }
    }
}

/// Read-only copy of an uploaded item for display
#[derive(Debug, Clone, PartialEq)]
pub struct ItemView {
    pub id: ItemId,
    /// Original file name
    pub name: String,
    pub media_type: String,
    pub size_bytes: usize,
    /// Where the preview can be displayed from
    pub preview_path: PathBuf,
    pub status: UploadStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_ids_are_unique() {
        let a = ItemId::next();
        let b = ItemId::next();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("upload-"));
    }

    #[test]
    fn test_severity_filter_parsing() {
        assert_eq!("all".parse::<SeverityFilter>(), Ok(SeverityFilter::All));
        assert_eq!(
            "High".parse::<SeverityFilter>(),
            Ok(SeverityFilter::Only(Severity::High))
        );
        assert!("critical".parse::<SeverityFilter>().is_err());

        for option in SeverityFilter::OPTIONS {
            assert_eq!(option.to_string().parse::<SeverityFilter>(), Ok(option));
        }
    }

    #[test]
    fn test_severity_filter_matches() {
        assert!(SeverityFilter::All.matches(Severity::Low));
        assert!(SeverityFilter::Only(Severity::High).matches(Severity::High));
        assert!(!SeverityFilter::Only(Severity::High).matches(Severity::Medium));
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(ConfidenceBand::of(0.95), ConfidenceBand::Strong);
        assert_eq!(ConfidenceBand::of(0.85), ConfidenceBand::Fair);
        assert_eq!(ConfidenceBand::of(0.80), ConfidenceBand::Weak);
        assert_eq!(ConfidenceBand::of(0.72), ConfidenceBand::Weak);
    }
}
