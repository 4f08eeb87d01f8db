use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::models::{FilterState, StudentRecord};
use crate::score::ScoreSource;
use crate::view;

pub fn build_report(
    records: &[StudentRecord],
    filter: &FilterState,
    source: ScoreSource,
    generated_at: DateTime<Local>,
) -> String {
    let summaries = view::summarize_by_branch(records);
    let rows = view::roster(records, filter);

    let mut output = String::new();
    let branch_label = filter.branch.code().unwrap_or("all branches");

    let _ = writeln!(output, "# Coding Profile Leaderboard");
    let _ = writeln!(
        output,
        "Generated {} for {} ({} of {} students, {} scores)",
        generated_at.format("%Y-%m-%d %H:%M"),
        branch_label,
        rows.len(),
        records.len(),
        match source {
            ScoreSource::Computed => "computed",
            ScoreSource::Supplied => "scraper-supplied",
        }
    );

    for n in view::TOP_PANELS {
        let top = view::top_n(records, n);
        let _ = writeln!(output);
        let _ = writeln!(output, "## Top {n} Performers");

        if top.is_empty() {
            let _ = writeln!(output, "No students with a positive score.");
        } else {
            for (rank, student) in top.iter().enumerate() {
                let _ = writeln!(
                    output,
                    "{}. {} ({}) {:.1}",
                    rank + 1,
                    student.name,
                    student.roll,
                    student.performance_score
                );
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Branch Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No students loaded.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} students (avg score {:.1})",
                summary.branch, summary.count, summary.avg_score
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Student Profiles");

    if rows.is_empty() {
        let _ = writeln!(output, "No students match the current filter.");
    } else {
        let _ = writeln!(
            output,
            "| S. No | Roll No | Name | Branch | GFG Rating | CodeChef Rating | HackerRank Badges | Score |"
        );
        let _ = writeln!(output, "|---|---|---|---|---|---|---|---|");
        for (index, student) in rows.iter().enumerate() {
            let row = view::RosterRow::from_record(student);
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} | {} | {} | {:.1} |",
                index + 1,
                row.roll,
                row.name,
                row.branch,
                row.gfg_rating,
                row.codechef_rating,
                row.hackerrank_badges,
                row.performance_score
            );
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_records;
    use crate::models::BranchFilter;
    use chrono::TimeZone;
    use serde_json::json;

    fn records() -> Vec<StudentRecord> {
        load_records(&json!({
            "Profiles": {
                "21CSE001": {"Name": "Rajesh", "Branch": "CSE", "Profiles": {
                    "GeeksForGeeks": {"Rating": "1500"},
                    "HackerRank": {"Badges": [{"name": "C", "stars": 2}]}
                }},
                "21ECE002": {"Name": "Meena", "Branch": "ECE", "Profiles": {}}
            }
        }))
    }

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn report_lists_panels_and_roster() {
        let report = build_report(&records(), &FilterState::default(), ScoreSource::Computed, at());
        assert!(report.starts_with("# Coding Profile Leaderboard"));
        assert!(report.contains("Generated 2026-03-01 09:30 for all branches (2 of 2 students, computed scores)"));
        assert!(report.contains("## Top 5 Performers\n1. Rajesh (21CSE001) 760.0"));
        assert!(!report.contains("1. Meena"));
        assert!(report.contains("- CSE: 1 students (avg score 760.0)"));
        assert!(report.contains("| 1 | 21CSE001 | Rajesh | CSE | 1500 | 0 | C (2★) | 760.0 |"));
        assert!(report.contains("| 2 | 21ECE002 | Meena | ECE | N/A | 0 | N/A | 0.0 |"));
    }

    #[test]
    fn empty_filter_result_is_reported() {
        let filter = FilterState {
            branch: BranchFilter::Civil,
            ..FilterState::default()
        };
        let report = build_report(&records(), &filter, ScoreSource::Computed, at());
        assert!(report.contains("for CIVIL (0 of 2 students"));
        assert!(report.contains("No students match the current filter."));
    }

    #[test]
    fn empty_snapshot_still_renders() {
        let report = build_report(&[], &FilterState::default(), ScoreSource::Computed, at());
        assert!(report.contains("No students with a positive score."));
        assert!(report.contains("No students loaded."));
    }
}
