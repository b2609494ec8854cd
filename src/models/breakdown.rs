// Categorical breakdown models (pie data)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsFamily {
    Linux,
    #[serde(rename = "macOS")]
    MacOs,
    Windows,
    Other,
}

impl OsFamily {
    pub fn label(&self) -> &'static str {
        match self {
            OsFamily::Linux => "Linux",
            OsFamily::MacOs => "macOS",
            OsFamily::Windows => "Windows",
            OsFamily::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// One pie: slices in first-seen order. Empty when the source list failed to load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub total: u64,
    pub series: Vec<CategoryCount>,
}

impl Breakdown {
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn count_of(&self, category: &str) -> u64 {
        self.series
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdowns {
    pub devices: Breakdown,
    pub applications: Breakdown,
    pub connectors: Breakdown,
}
