use super::data::{Disease, Severity, SeverityFilter};
use crate::error::{ScanError, ScanResult};

/// Built-in disease reference data, in display order
pub static DISEASES: [Disease; 5] = [
    Disease {
        id: "newcastle",
        name: "Newcastle Disease",
        description: "A highly contagious viral infection affecting the respiratory, nervous, and digestive systems of birds.",
        symptoms: &[
            "Respiratory distress",
            "Nervous signs",
            "Diarrhea",
            "Reduced egg production",
        ],
        treatment: "Vaccination and supportive care. Quarantine affected birds immediately.",
        severity: Severity::High,
        prevalence: 15.2,
    },
    Disease {
        id: "avian-flu",
        name: "Avian Influenza",
        description: "A viral infection that can range from mild to severe, affecting poultry worldwide.",
        symptoms: &[
            "Sudden death",
            "Respiratory symptoms",
            "Decreased egg production",
            "Facial swelling",
        ],
        treatment: "Biosecurity measures, vaccination in some cases, and rapid containment.",
        severity: Severity::High,
        prevalence: 8.7,
    },
    Disease {
        id: "fowl-pox",
        name: "Fowl Pox",
        description: "A viral disease causing skin lesions and respiratory symptoms in poultry.",
        symptoms: &[
            "Skin lesions",
            "Scabs on comb and wattles",
            "Respiratory difficulty",
            "Reduced feed intake",
        ],
        treatment: "Vaccination and supportive care. Remove scabs gently and apply antiseptic.",
        severity: Severity::Medium,
        prevalence: 12.4,
    },
    Disease {
        id: "coccidiosis",
        name: "Coccidiosis",
        description: "A parasitic disease affecting the intestinal tract, common in young birds.",
        symptoms: &["Bloody diarrhea", "Weakness", "Poor growth", "Dehydration"],
        treatment: "Anticoccidial medications and improved sanitation practices.",
        severity: Severity::Medium,
        prevalence: 22.1,
    },
    Disease {
        id: "healthy",
        name: "Healthy",
        description: "No signs of disease detected. The bird appears to be in good health.",
        symptoms: &[
            "Active behavior",
            "Good appetite",
            "Normal feather condition",
            "Regular egg production",
        ],
        treatment: "Continue regular health monitoring and maintain good hygiene practices.",
        severity: Severity::Low,
        prevalence: 41.6,
    },
];

/// The immutable disease catalog.
///
/// Used both by the reference view and as the draw pool for the
/// simulated classifier. Never empty.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    diseases: &'static [Disease],
}

impl Catalog {
    /// Wrap a preloaded list of diseases
    pub fn new(diseases: &'static [Disease]) -> ScanResult<Self> {
        if diseases.is_empty() {
            return Err(ScanError::EmptyCatalog);
        }
        Ok(Self { diseases })
    }

    /// The catalog shipped with the application
    pub fn builtin() -> Self {
        Self {
            diseases: &DISEASES,
        }
    }

    pub fn diseases(&self) -> &'static [Disease] {
        self.diseases
    }

    pub fn len(&self) -> usize {
        self.diseases.len()
    }

    #[cfg(test)]
    pub fn find(&self, id: &str) -> Option<&'static Disease> {
        self.diseases.iter().find(|disease| disease.id == id)
    }

    /// Filter the catalog for the reference view.
    ///
    /// Keeps entries whose name or description contains `query`
    /// (case-insensitive) and whose severity passes `filter`.
    /// Catalog order is preserved.
    pub fn search(&self, query: &str, filter: SeverityFilter) -> Vec<&'static Disease> {
        let needle = query.to_lowercase();
        self.diseases
            .iter()
            .filter(|disease| filter.matches(disease.severity))
            .filter(|disease| {
                needle.is_empty()
                    || disease.name.to_lowercase().contains(&needle)
                    || disease.description.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
