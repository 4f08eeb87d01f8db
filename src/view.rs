use std::cmp::Ordering;

use serde::Serialize;
use serde_json::Value;

use crate::models::{
    Badge, BranchSummary, DetailView, FilterState, PlatformData, PlatformSummary, Selection, SortOrder,
    StudentDetail, StudentRecord,
};
use crate::rating::{extract_count, extract_rating};
use crate::score;

pub const TOP_PANELS: [usize; 2] = [5, 10];

const NOT_AVAILABLE: &str = "N/A";

/// Highest scorers first; zero scores never rank. Ties keep loader order.
pub fn top_n(records: &[StudentRecord], n: usize) -> Vec<&StudentRecord> {
    let mut ranked: Vec<&StudentRecord> = records
        .iter()
        .filter(|record| record.performance_score > 0.0)
        .collect();
    ranked.sort_by(|a, b| by_score_desc(a, b));
    ranked.truncate(n);
    ranked
}

pub fn roster<'a>(records: &'a [StudentRecord], filter: &FilterState) -> Vec<&'a StudentRecord> {
    let query = filter.search_query.to_lowercase();
    let mut rows: Vec<&StudentRecord> = records
        .iter()
        .filter(|record| filter.branch.matches(&record.branch))
        .filter(|record| {
            record.roll.to_lowercase().contains(&query) || record.name.to_lowercase().contains(&query)
        })
        .collect();

    match filter.sort_order {
        SortOrder::None => {}
        SortOrder::Ascending => rows.sort_by(|a, b| a.performance_score.total_cmp(&b.performance_score)),
        SortOrder::Descending => rows.sort_by(|a, b| by_score_desc(a, b)),
    }

    rows
}

/// One roster line as shown in tables and CSV exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRow {
    #[serde(rename = "Roll No")]
    pub roll: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Branch")]
    pub branch: String,
    #[serde(rename = "GFG Rating")]
    pub gfg_rating: String,
    #[serde(rename = "CodeChef Rating")]
    pub codechef_rating: u64,
    #[serde(rename = "HackerRank Badges")]
    pub hackerrank_badges: String,
    #[serde(rename = "Performance Score")]
    pub performance_score: f64,
}

impl RosterRow {
    pub fn from_record(record: &StudentRecord) -> Self {
        Self {
            roll: record.roll.clone(),
            name: record.name.clone(),
            branch: record.branch.clone(),
            gfg_rating: display(record.gfg.get("Rating")),
            codechef_rating: extract_rating(record.codechef.get("Rating")),
            hackerrank_badges: format_badges(&score::badges(&record.hackerrank)),
            performance_score: record.performance_score,
        }
    }
}

pub fn toggle_sort_order(current: SortOrder) -> SortOrder {
    match current {
        SortOrder::None => SortOrder::Ascending,
        SortOrder::Ascending => SortOrder::Descending,
        SortOrder::Descending => SortOrder::None,
    }
}

pub fn select(_current: Selection, roll: impl Into<String>) -> Selection {
    Selection::Selected(roll.into())
}

pub fn dismiss(_current: Selection) -> Selection {
    Selection::NoneSelected
}

pub fn detail<'a>(records: &'a [StudentRecord], roll: &str) -> DetailView<'a> {
    let Some(record) = records.iter().find(|record| record.roll == roll) else {
        return DetailView::NoData;
    };

    let total_solved = [&record.gfg, &record.codechef, &record.hackerrank]
        .into_iter()
        .map(|platform| extract_count(field(platform, "Problems Solved", "Problems_Solved")))
        .fold(0u64, u64::saturating_add);

    DetailView::Found(StudentDetail {
        record,
        total_solved,
        codechef_rating: extract_rating(record.codechef.get("Rating")),
        badges: score::badges(&record.hackerrank),
        gfg: summarize(&record.gfg),
        codechef: summarize(&record.codechef),
        hackerrank: summarize(&record.hackerrank),
    })
}

/// Detail for whatever the selection currently points at.
pub fn selected_detail<'a>(records: &'a [StudentRecord], selection: &Selection) -> DetailView<'a> {
    match selection {
        Selection::NoneSelected => DetailView::NoData,
        Selection::Selected(roll) => detail(records, roll),
    }
}

pub fn summarize_by_branch(records: &[StudentRecord]) -> Vec<BranchSummary> {
    let mut summaries: Vec<BranchSummary> = Vec::new();

    for record in records {
        match summaries.iter_mut().find(|s| s.branch == record.branch) {
            Some(summary) => {
                summary.count += 1;
                summary.avg_score += record.performance_score;
            }
            None => summaries.push(BranchSummary {
                branch: record.branch.clone(),
                count: 1,
                avg_score: record.performance_score,
            }),
        }
    }

    for summary in summaries.iter_mut() {
        summary.avg_score /= summary.count as f64;
    }

    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

pub fn format_badges(badges: &[Badge]) -> String {
    if badges.is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    badges
        .iter()
        .map(|badge| format!("{} ({}★)", badge.name, badge.stars))
        .collect::<Vec<_>>()
        .join(", ")
}

fn by_score_desc(a: &StudentRecord, b: &StudentRecord) -> Ordering {
    b.performance_score.total_cmp(&a.performance_score)
}

fn field<'a>(platform: &'a PlatformData, key: &str, alias: &str) -> Option<&'a Value> {
    platform.get(key).or_else(|| platform.get(alias))
}

fn summarize(platform: &PlatformData) -> PlatformSummary {
    PlatformSummary {
        username: display(platform.get("Username")),
        coding_score: display(field(platform, "Coding Score", "Coding_Score")),
        problems_solved: display(field(platform, "Problems Solved", "Problems_Solved")),
        rating: display(platform.get("Rating")),
    }
}

fn display(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}
