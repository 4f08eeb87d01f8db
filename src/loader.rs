use std::path::Path;

use anyhow::Context;
use serde_json::Value;

use crate::models::{PlatformData, StudentRecord};
use crate::score::{self, PlatformTriple, ScoreMode, ScoreSource};

pub const STUDENTS_KEY: &str = "Profiles";

pub fn read_snapshot(path: &Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot: Value = serde_json::from_str(&raw)
        .with_context(|| format!("snapshot {} is not valid JSON", path.display()))?;
    Ok(snapshot)
}

/// Reads the snapshot file, degrading to an empty snapshot when it is missing or corrupt.
pub fn read_snapshot_or_empty(path: &Path) -> Value {
    match read_snapshot(path) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            log::warn!("{err:#}; continuing with no students");
            Value::Null
        }
    }
}

pub fn load_records(snapshot: &Value) -> Vec<StudentRecord> {
    load_records_with(snapshot, ScoreMode::Auto).0
}

/// Flattens every student in the snapshot, in file order, and scores them.
pub fn load_records_with(snapshot: &Value, mode: ScoreMode) -> (Vec<StudentRecord>, ScoreSource) {
    let Some(students) = snapshot.get(STUDENTS_KEY).and_then(Value::as_object) else {
        if !snapshot.is_null() {
            log::warn!("snapshot has no `{STUDENTS_KEY}` mapping; treating it as empty");
        }
        return (Vec::new(), score::resolve_source(mode, std::iter::empty()));
    };

    let empty = PlatformData::new();
    let source = score::resolve_source(
        mode,
        students
            .values()
            .map(|student| student.get("Profiles").and_then(Value::as_object).unwrap_or(&empty)),
    );
    log::debug!("scoring {} students with {source:?} scores", students.len());

    let mut records = Vec::with_capacity(students.len());
    for (roll, student) in students {
        if !student.is_object() {
            log::warn!("student {roll} is not an object; loading it without profile data");
        }
        let profiles = student
            .get("Profiles")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let gfg = platform(profiles, "GeeksForGeeks");
        let codechef = platform(profiles, "CodeChef");
        let hackerrank = platform(profiles, "HackerRank");
        let leetcode = platform(profiles, "LeetCode");

        let performance_score = score::score_for(
            source,
            profiles,
            &PlatformTriple {
                gfg: &gfg,
                codechef: &codechef,
                hackerrank: &hackerrank,
            },
        );

        records.push(StudentRecord {
            roll: roll.clone(),
            name: text_field(student, "Name"),
            image: text_field(student, "Image"),
            branch: text_field(student, "Branch"),
            gfg,
            codechef,
            hackerrank,
            leetcode,
            performance_score,
        });
    }

    (records, source)
}

fn platform(profiles: &PlatformData, key: &str) -> PlatformData {
    profiles
        .get(key)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default()
}

fn text_field(student: &Value, key: &str) -> String {
    student
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
