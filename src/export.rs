use std::io;
use std::path::Path;

use anyhow::Context;

use crate::models::StudentRecord;
use crate::view::RosterRow;

pub fn write_roster<W: io::Write>(rows: &[&StudentRecord], sink: W) -> anyhow::Result<usize> {
    let mut writer = csv::Writer::from_writer(sink);
    for record in rows {
        writer.serialize(RosterRow::from_record(record))?;
    }
    writer.flush()?;
    Ok(rows.len())
}

pub fn export_roster(rows: &[&StudentRecord], out: &Path) -> anyhow::Result<usize> {
    let file = std::fs::File::create(out)
        .with_context(|| format!("failed to create {}", out.display()))?;
    write_roster(rows, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_records;
    use serde_json::json;

    #[test]
    fn writes_header_and_rows() {
        let records = load_records(&json!({
            "Profiles": {
                "21CSE001": {"Name": "Rajesh", "Branch": "CSE", "Profiles": {
                    "CodeChef": {"Rating": "1640 (Div 2)"},
                    "HackerRank": {"Badges": [{"name": "C", "stars": 2}, {"name": "SQL", "stars": 1}]}
                }}
            }
        }));
        let rows: Vec<&StudentRecord> = records.iter().collect();

        let mut buffer = Vec::new();
        let written = write_roster(&rows, &mut buffer).unwrap();
        assert_eq!(written, 1);

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Roll No,Name,Branch,GFG Rating,CodeChef Rating,HackerRank Badges,Performance Score")
        );
        assert_eq!(lines.next(), Some("21CSE001,Rajesh,CSE,N/A,1640,\"C (2★), SQL (1★)\",835.0"));
    }

    #[test]
    fn export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("roster.csv");
        let written = export_roster(&[], &out).unwrap();
        assert_eq!(written, 0);
        assert!(out.exists());
    }
}
