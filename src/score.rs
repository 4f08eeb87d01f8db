use clap::ValueEnum;
use serde_json::Value;

use crate::models::{Badge, PlatformData};
use crate::rating::{extract_count, extract_rating, rating_from_text};

pub const BADGE_STAR_POINTS: f64 = 5.0;
pub const SUPPLIED_SCORE_FIELD: &str = "Total_Score";

/// Requested score source; `Auto` inspects the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScoreMode {
    #[default]
    Auto,
    Computed,
    Supplied,
}

/// Score source resolved once per snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreSource {
    Computed,
    Supplied,
}

/// The three platforms the computed score looks at.
pub struct PlatformTriple<'a> {
    pub gfg: &'a PlatformData,
    pub codechef: &'a PlatformData,
    pub hackerrank: &'a PlatformData,
}

pub fn compute_score(platforms: &PlatformTriple<'_>) -> f64 {
    let gfg_rating = extract_rating(platforms.gfg.get("Rating")) as f64;
    let codechef_rating = extract_rating(platforms.codechef.get("Rating")) as f64;
    let badge_score: f64 = badges(platforms.hackerrank)
        .iter()
        .map(|badge| badge.stars as f64 * BADGE_STAR_POINTS)
        .sum();

    // Fixed divisor: a missing platform still counts as a zero rating.
    (gfg_rating + codechef_rating) / 2.0 + badge_score
}

/// Reads the precomputed aggregate from a student's `Profiles` mapping.
pub fn supplied_score(profiles: &PlatformData) -> Option<f64> {
    let raw = match profiles.get(SUPPLIED_SCORE_FIELD)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) if text.bytes().any(|b| b.is_ascii_digit()) => {
            Some(rating_from_text(text) as f64)
        }
        _ => None,
    };
    raw.map(clamp_score)
}

pub fn resolve_source<'a, I>(mode: ScoreMode, mut profiles: I) -> ScoreSource
where
    I: Iterator<Item = &'a PlatformData>,
{
    match mode {
        ScoreMode::Computed => ScoreSource::Computed,
        ScoreMode::Supplied => ScoreSource::Supplied,
        ScoreMode::Auto => {
            let mut seen = false;
            let all_supplied = profiles.all(|entry| {
                seen = true;
                supplied_score(entry).is_some()
            });
            if seen && all_supplied {
                ScoreSource::Supplied
            } else {
                ScoreSource::Computed
            }
        }
    }
}

pub fn score_for(source: ScoreSource, profiles: &PlatformData, platforms: &PlatformTriple<'_>) -> f64 {
    match source {
        ScoreSource::Computed => clamp_score(compute_score(platforms)),
        ScoreSource::Supplied => supplied_score(profiles).unwrap_or(0.0),
    }
}

/// HackerRank badges in scrape order; malformed entries are skipped.
pub fn badges(hackerrank: &PlatformData) -> Vec<Badge> {
    let Some(Value::Array(entries)) = hackerrank.get("Badges") else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| Badge {
            name: entry
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("Unknown Badge")
                .to_string(),
            stars: extract_count(entry.get("stars")),
        })
        .collect()
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() && score > 0.0 {
        score
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn platform(value: Value) -> PlatformData {
        value.as_object().cloned().unwrap_or_default()
    }

    fn score(gfg: Value, codechef: Value, hackerrank: Value) -> f64 {
        let (gfg, codechef, hackerrank) = (platform(gfg), platform(codechef), platform(hackerrank));
        compute_score(&PlatformTriple {
            gfg: &gfg,
            codechef: &codechef,
            hackerrank: &hackerrank,
        })
    }

    #[test]
    fn empty_platforms_score_zero() {
        assert_eq!(score(json!({}), json!({}), json!({})), 0.0);
    }

    #[test]
    fn badge_points_are_linear() {
        let hackerrank = json!({"Badges": [
            {"name": "Problem Solving", "stars": 2},
            {"name": "Python", "stars": 3}
        ]});
        assert_eq!(score(json!({}), json!({}), hackerrank), 25.0);
    }

    #[test]
    fn ratings_average_over_fixed_divisor() {
        let total = score(
            json!({"Rating": "1600"}),
            json!({"Rating": "1847 (Rating)"}),
            json!({"Badges": [{"name": "Java", "stars": 1}]}),
        );
        assert!((total - (1723.5 + 5.0)).abs() < 1e-9);

        let single = score(json!({}), json!({"Rating": "1400"}), json!({}));
        assert_eq!(single, 700.0);
    }

    #[test]
    fn malformed_badges_are_ignored() {
        let hackerrank = platform(json!({"Badges": [
            "not a badge",
            {"name": "SQL"},
            {"stars": 4}
        ]}));
        let parsed = badges(&hackerrank);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0], Badge { name: "SQL".to_string(), stars: 0 });
        assert_eq!(parsed[1].name, "Unknown Badge");
        assert_eq!(parsed[1].stars, 4);
    }

    #[test]
    fn whole_float_and_text_stars_count() {
        let hackerrank = json!({"Badges": [
            {"name": "C++", "stars": 2.0},
            {"name": "Python", "stars": "3"}
        ]});
        assert_eq!(score(json!({}), json!({}), hackerrank), 25.0);
    }

    #[test]
    fn supplied_score_reads_numbers_and_text() {
        assert_eq!(supplied_score(&platform(json!({"Total_Score": 42}))), Some(42.0));
        assert_eq!(supplied_score(&platform(json!({"Total_Score": "17 pts"}))), Some(17.0));
        assert_eq!(supplied_score(&platform(json!({"Total_Score": -3}))), Some(0.0));
        assert_eq!(supplied_score(&platform(json!({"Total_Score": "__"}))), None);
        assert_eq!(supplied_score(&platform(json!({}))), None);
    }

    #[test]
    fn auto_mode_needs_every_student_to_supply() {
        let with = platform(json!({"Total_Score": 10}));
        let without = platform(json!({"CodeChef": {}}));

        assert_eq!(
            resolve_source(ScoreMode::Auto, [&with, &with].into_iter()),
            ScoreSource::Supplied
        );
        assert_eq!(
            resolve_source(ScoreMode::Auto, [&with, &without].into_iter()),
            ScoreSource::Computed
        );
        assert_eq!(
            resolve_source(ScoreMode::Auto, std::iter::empty()),
            ScoreSource::Computed
        );
        assert_eq!(
            resolve_source(ScoreMode::Supplied, [&without].into_iter()),
            ScoreSource::Supplied
        );
    }

    #[test]
    fn forced_supplied_defaults_missing_to_zero() {
        let empty = PlatformData::new();
        let triple = PlatformTriple {
            gfg: &empty,
            codechef: &empty,
            hackerrank: &empty,
        };
        assert_eq!(score_for(ScoreSource::Supplied, &empty, &triple), 0.0);
    }
}
