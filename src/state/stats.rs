/// Dashboard and analytics figures
///
/// The product figures are fixed demo numbers. `SessionSummary` is the
/// only live statistic and is derived from the current uploads.
use super::data::{ItemView, Severity};

/// One headline card on the dashboard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: &'static str,
    /// Change versus the previous period (e.g., "+12.5%")
    pub change: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Activity {
    pub when: &'static str,
    pub action: &'static str,
    pub confidence: &'static str,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyStat {
    pub month: &'static str,
    pub classifications: u32,
    /// Accuracy in percent
    pub accuracy: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistributionEntry {
    pub name: &'static str,
    pub count: u32,
    pub percentage: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelMetric {
    pub metric: &'static str,
    pub value: &'static str,
    pub change: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiseaseAccuracy {
    pub name: &'static str,
    pub cases: u32,
    pub accuracy: f32,
    pub precision: f32,
    pub recall: f32,
}

pub const OVERVIEW: [StatCard; 4] = [
    StatCard { title: "Total Classifications", value: "2,847", change: "+12.5%" },
    StatCard { title: "Accuracy Rate", value: "94.2%", change: "+2.1%" },
    StatCard { title: "Diseases Detected", value: "156", change: "+8.3%" },
    StatCard { title: "Healthy Birds", value: "1,184", change: "+15.2%" },
];

pub const RECENT_ACTIVITY: [Activity; 5] = [
    Activity { when: "2 minutes ago", action: "Newcastle Disease detected", confidence: "92.4%", severity: Severity::High },
    Activity { when: "15 minutes ago", action: "Healthy bird classified", confidence: "98.7%", severity: Severity::Low },
    Activity { when: "1 hour ago", action: "Fowl Pox identified", confidence: "89.1%", severity: Severity::Medium },
    Activity { when: "2 hours ago", action: "Coccidiosis detected", confidence: "94.8%", severity: Severity::Medium },
    Activity { when: "3 hours ago", action: "Healthy bird classified", confidence: "96.3%", severity: Severity::Low },
];

pub const MONTHLY: [MonthlyStat; 6] = [
    MonthlyStat { month: "Jan", classifications: 184, accuracy: 92.1 },
    MonthlyStat { month: "Feb", classifications: 221, accuracy: 93.4 },
    MonthlyStat { month: "Mar", classifications: 278, accuracy: 94.2 },
    MonthlyStat { month: "Apr", classifications: 312, accuracy: 94.8 },
    MonthlyStat { month: "May", classifications: 398, accuracy: 95.1 },
    MonthlyStat { month: "Jun", classifications: 445, accuracy: 94.7 },
];

pub const DISTRIBUTION: [DistributionEntry; 5] = [
    DistributionEntry { name: "Healthy", count: 1184, percentage: 41.6 },
    DistributionEntry { name: "Coccidiosis", count: 629, percentage: 22.1 },
    DistributionEntry { name: "Newcastle Disease", count: 433, percentage: 15.2 },
    DistributionEntry { name: "Fowl Pox", count: 353, percentage: 12.4 },
    DistributionEntry { name: "Avian Influenza", count: 248, percentage: 8.7 },
];

pub const MODEL_METRICS: [ModelMetric; 4] = [
    ModelMetric { metric: "Overall Accuracy", value: "94.2%", change: "+2.1%" },
    ModelMetric { metric: "Precision", value: "93.8%", change: "+1.8%" },
    ModelMetric { metric: "Recall", value: "94.6%", change: "+2.3%" },
    ModelMetric { metric: "F1-Score", value: "94.2%", change: "+2.0%" },
];

pub const ACCURACY_BY_DISEASE: [DiseaseAccuracy; 5] = [
    DiseaseAccuracy { name: "Newcastle Disease", cases: 433, accuracy: 96.3, precision: 94.8, recall: 97.2 },
    DiseaseAccuracy { name: "Avian Influenza", cases: 248, accuracy: 94.8, precision: 93.1, recall: 96.4 },
    DiseaseAccuracy { name: "Fowl Pox", cases: 353, accuracy: 92.7, precision: 91.3, recall: 94.1 },
    DiseaseAccuracy { name: "Coccidiosis", cases: 629, accuracy: 95.1, precision: 94.6, recall: 95.7 },
    DiseaseAccuracy { name: "Healthy", cases: 1184, accuracy: 97.2, precision: 96.8, recall: 97.6 },
];

/// Highest monthly classification count, used to scale bar charts
pub fn monthly_peak() -> u32 {
    MONTHLY.iter().map(|m| m.classifications).max().unwrap_or(1).max(1)
}

/// Counts over the uploads of the running session
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionSummary {
    pub total: usize,
    pub pending: usize,
    pub complete: usize,
    /// Completed items per severity: [Low, Medium, High]
    pub by_severity: [usize; 3],
    /// Mean confidence of completed items
    pub mean_confidence: Option<f32>,
}

impl SessionSummary {
    pub fn from_items(items: &[ItemView]) -> Self {
        let mut summary = SessionSummary {
            total: items.len(),
            ..Self::default()
        };
        let mut confidence_sum = 0.0;

        for item in items {
            match item.status.result() {
                None => summary.pending += 1,
                Some(result) => {
                    summary.complete += 1;
                    confidence_sum += result.confidence;
                    let slot = match result.disease.severity {
                        Severity::Low => 0,
                        Severity::Medium => 1,
                        Severity::High => 2,
                    };
                    summary.by_severity[slot] += 1;
                }
            }
        }

        if summary.complete > 0 {
            summary.mean_confidence = Some(confidence_sum / summary.complete as f32);
        }
        summary
    }

    pub fn count(&self, severity: Severity) -> usize {
        match severity {
            Severity::Low => self.by_severity[0],
            Severity::Medium => self.by_severity[1],
            Severity::High => self.by_severity[2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::catalog::Catalog;
    use crate::state::data::{Classification, ItemId, UploadStatus};
    use chrono::Local;
    use std::path::PathBuf;

    fn view(status: UploadStatus) -> ItemView {
        ItemView {
            id: ItemId::next(),
            name: "hen.jpg".into(),
            media_type: "image/jpeg".into(),
            size_bytes: 10,
            preview_path: PathBuf::from("hen.jpg"),
            status,
        }
    }

    fn done(disease_id: &str, confidence: f32) -> UploadStatus {
        UploadStatus::Complete(Classification {
            disease: Catalog::builtin().find(disease_id).unwrap(),
            confidence,
            completed_at: Local::now(),
        })
    }

    #[test]
    fn test_empty_session() {
        let summary = SessionSummary::from_items(&[]);
        assert_eq!(summary, SessionSummary::default());
        assert_eq!(summary.mean_confidence, None);
    }

    #[test]
    fn test_session_counts() {
        let items = vec![
            view(UploadStatus::Pending),
            view(done("newcastle", 0.9)),
            view(done("healthy", 0.8)),
            view(done("avian-flu", 0.7)),
        ];
        let summary = SessionSummary::from_items(&items);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.complete, 3);
        assert_eq!(summary.count(Severity::High), 2);
        assert_eq!(summary.count(Severity::Low), 1);
        assert_eq!(summary.count(Severity::Medium), 0);
        let mean = summary.mean_confidence.unwrap();
        assert!((mean - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_distribution_matches_catalog_prevalence() {
        let catalog = Catalog::builtin();
        for entry in DISTRIBUTION {
            let disease = catalog
                .diseases()
                .iter()
                .find(|d| d.name == entry.name)
                .unwrap();
            assert_eq!(disease.prevalence, entry.percentage);
        }
    }

    #[test]
    fn test_monthly_peak() {
        assert_eq!(monthly_peak(), 445);
    }
}
