use clap::ValueEnum;
use serde::Serialize;
use serde_json::{Map, Value};

/// Free-form per-platform fields exactly as the scraper wrote them.
pub type PlatformData = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub name: String,
    pub stars: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub roll: String,
    pub name: String,
    pub image: String,
    pub branch: String,
    pub gfg: PlatformData,
    pub codechef: PlatformData,
    pub hackerrank: PlatformData,
    pub leetcode: PlatformData,
    pub performance_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BranchFilter {
    #[default]
    All,
    Aiml,
    Cse,
    Ece,
    Mech,
    Eee,
    Civil,
}

impl BranchFilter {
    /// Branch code as it appears in the snapshot, `None` for `All`.
    pub fn code(self) -> Option<&'static str> {
        match self {
            BranchFilter::All => None,
            BranchFilter::Aiml => Some("AIML"),
            BranchFilter::Cse => Some("CSE"),
            BranchFilter::Ece => Some("ECE"),
            BranchFilter::Mech => Some("MECH"),
            BranchFilter::Eee => Some("EEE"),
            BranchFilter::Civil => Some("CIVIL"),
        }
    }

    pub fn matches(self, branch: &str) -> bool {
        self.code().map_or(true, |code| code == branch)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    #[default]
    None,
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub branch: BranchFilter,
    pub search_query: String,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    NoneSelected,
    Selected(String),
}

/// Per-platform display fields, `N/A` where the scraper had nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSummary {
    pub username: String,
    pub coding_score: String,
    pub problems_solved: String,
    pub rating: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentDetail<'a> {
    pub record: &'a StudentRecord,
    pub total_solved: u64,
    pub codechef_rating: u64,
    pub badges: Vec<Badge>,
    pub gfg: PlatformSummary,
    pub codechef: PlatformSummary,
    pub hackerrank: PlatformSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailView<'a> {
    Found(StudentDetail<'a>),
    NoData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BranchSummary {
    pub branch: String,
    pub count: usize,
    pub avg_score: f64,
}
