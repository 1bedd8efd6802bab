// src/export.rs
//! CSV export of talent listings

use anyhow::{Context, Result};
use std::path::Path;

use crate::core::FsOps;
use crate::types::Talent;

pub const CSV_HEADER: [&str; 13] = [
    "ID",
    "First Name",
    "Last Name",
    "Email",
    "Phone",
    "Title",
    "Stack",
    "Years of Experience",
    "Score",
    "Status",
    "Skills",
    "Languages",
    "Location",
];

fn talent_record(talent: &Talent) -> [String; 13] {
    let languages = talent
        .languages
        .iter()
        .map(|language| match &language.level {
            Some(level) => format!("{} ({})", language.name, level),
            None => language.name.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    [
        talent.id.clone().unwrap_or_default(),
        talent.first_name.clone(),
        talent.last_name.clone(),
        talent.email.clone().unwrap_or_default(),
        talent.phone.clone().unwrap_or_default(),
        talent.title.clone().unwrap_or_default(),
        talent.stack.clone().unwrap_or_default(),
        talent
            .years_of_experience
            .map(|years| years.to_string())
            .unwrap_or_default(),
        talent.score.map(|score| score.to_string()).unwrap_or_default(),
        talent.status.to_string(),
        talent.skills.join(", "),
        languages,
        talent.location.clone().unwrap_or_default(),
    ]
}

/// One header line plus one line per talent; fields are quoted when needed
pub fn talents_to_csv(talents: &[Talent]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .context("Failed to write CSV header")?;
    for talent in talents {
        // Line breaks inside a field would split the record for line-based readers
        let record = talent_record(talent).map(|field| field.replace(['\r', '\n'], " "));
        writer
            .write_record(&record)
            .with_context(|| format!("Failed to write CSV row for {}", talent.full_name()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

pub async fn write_talents_csv(path: &Path, talents: &[Talent]) -> Result<()> {
    let csv = talents_to_csv(talents)?;
    FsOps::write_file_safe(path, &csv).await
}

/// `talents_YYYYMMDD_HHMMSS.csv`
pub fn default_export_name() -> String {
    format!("talents_{}.csv", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LanguageSkill, TalentStatus};

    fn talent(first: &str, skills: &[&str]) -> Talent {
        Talent {
            id: Some(first.to_lowercase()),
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            status: TalentStatus::Available,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_one_line_per_record_plus_header() {
        let talents = vec![
            talent("Ana", &["Rust"]),
            talent("Ben", &[]),
            talent("Cleo", &["Go"]),
        ];
        let csv = talents_to_csv(&talents).unwrap();
        assert_eq!(csv.lines().count(), talents.len() + 1);
        assert!(csv.starts_with("ID,First Name,Last Name"));

        assert_eq!(talents_to_csv(&[]).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_values_with_commas_are_quoted() {
        let mut record = talent("Ana", &["Rust", "Go"]);
        record.languages = vec![LanguageSkill {
            name: "English".to_string(),
            level: Some("C1".to_string()),
        }];

        let csv = talents_to_csv(&[record]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains("\"Rust, Go\""));
        assert!(row.contains("English (C1)"));
        assert!(row.contains(",Available,"));
    }

    #[test]
    fn test_embedded_newlines_do_not_split_rows() {
        let mut record = talent("Ana", &[]);
        record.title = Some("Senior\nEngineer".to_string());
        record.location = Some("Calle Mayor 1\r\nMadrid, Spain".to_string());
        let csv = talents_to_csv(&[record]).unwrap();
        assert_eq!(csv.lines().count(), 2);

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.get(5), Some("Senior Engineer"));
        assert_eq!(row.get(12), Some("Calle Mayor 1  Madrid, Spain"));
    }

    #[test]
    fn test_quotes_are_escaped_and_parse_back() {
        let mut record = talent("Ana", &[]);
        record.title = Some("Lead \"Platform\" Engineer, Infra".to_string());
        let csv = talents_to_csv(&[record]).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(row.get(5), Some("Lead \"Platform\" Engineer, Infra"));
    }

    #[tokio::test]
    async fn test_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join(default_export_name());
        write_talents_csv(&path, &[talent("Ana", &[])]).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(written.lines().count(), 2);
    }
}
