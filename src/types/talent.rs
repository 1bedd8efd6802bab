// src/types/talent.rs
//! Talent records as exposed by the recruiting backend

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::normalize::{item_name, pick, pick_array, pick_f64, pick_i64, pick_str};

// ===== Talent =====

/// A candidate/professional record.
///
/// Deserialization goes through [`serde_json::Value`] so that the several
/// field spellings the backend uses (`firstName`, `first_name`, `name`, ...)
/// all land in the same place. Serialization always uses camelCase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Talent {
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub title: Option<String>,
    pub stack: Option<String>,
    pub years_of_experience: Option<u32>,
    pub score: Option<f64>,
    pub status: TalentStatus,
    pub skills: Vec<String>,
    pub languages: Vec<LanguageSkill>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub certifications: Vec<String>,
    pub salary_range: Option<SalaryRange>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageSkill {
    pub name: String,
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub company: String,
    pub role: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>, // None means current
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TalentStatus {
    Available,
    InProcess,
    Hired,
    NotAvailable,
    #[default]
    Unknown,
}

impl TalentStatus {
    pub const ALL: [TalentStatus; 4] = [
        TalentStatus::Available,
        TalentStatus::InProcess,
        TalentStatus::Hired,
        TalentStatus::NotAvailable,
    ];

    /// Lenient parse: case, separators and a few synonyms are ignored
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "available" | "active" | "open" => Self::Available,
            "inprocess" | "inprogress" | "interviewing" | "process" => Self::InProcess,
            "hired" | "placed" => Self::Hired,
            "notavailable" | "unavailable" | "inactive" => Self::NotAvailable,
            _ => Self::Unknown,
        }
    }

    /// Wire value used in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::InProcess => "in_process",
            Self::Hired => "hired",
            Self::NotAvailable => "not_available",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TalentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Available => "Available",
            Self::InProcess => "In process",
            Self::Hired => "Hired",
            Self::NotAvailable => "Not available",
            Self::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

impl Talent {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Up to two upper-case initials, `?` when the record has no name
    pub fn initials(&self) -> String {
        let initials: String = [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect();

        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }

    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }
}

impl From<Value> for Talent {
    fn from(value: Value) -> Self {
        let (mut first_name, mut last_name) = (
            pick_str(&value, &["firstName", "first_name", "firstname", "nombre"]).unwrap_or_default(),
            pick_str(&value, &["lastName", "last_name", "lastname", "apellido"]).unwrap_or_default(),
        );

        if first_name.is_empty() && last_name.is_empty() {
            if let Some(full) = pick_str(&value, &["fullName", "full_name", "name"]) {
                let (first, last) = split_full_name(&full);
                first_name = first;
                last_name = last;
            }
        }

        let skills = pick_array(&value, &["skills", "stackSkills", "technologies"])
            .iter()
            .filter_map(|item| item_name(item, &["name", "skillName", "skill", "description"]))
            .collect();

        let languages = pick_array(&value, &["languages", "idiomas"])
            .iter()
            .filter_map(|item| {
                let name = item_name(item, &["name", "languageName", "language", "description"])?;
                let level = pick_str(item, &["level", "proficiency", "languageLevel"]);
                Some(LanguageSkill { name, level })
            })
            .collect();

        let experience = pick_array(&value, &["experience", "experiences", "workExperience"])
            .iter()
            .filter_map(parse_experience)
            .collect();

        let education = pick_array(&value, &["education", "educations", "studies"])
            .iter()
            .filter_map(parse_education)
            .collect();

        let string_list = |keys: &[&str]| -> Vec<String> {
            pick_array(&value, keys)
                .iter()
                .filter_map(|item| item_name(item, &["name", "title", "label"]))
                .collect()
        };

        Self {
            id: pick_str(&value, &["id", "studentId", "talentId", "uuid"]),
            first_name,
            last_name,
            email: pick_str(&value, &["email", "mail", "emailAddress"]),
            phone: pick_str(&value, &["phone", "phoneNumber", "telephone", "mobile"]),
            title: pick_str(&value, &["title", "position", "role", "profession"]),
            stack: pick_str(&value, &["stack", "mainStack", "techStack"]),
            years_of_experience: pick_i64(
                &value,
                &["yearsOfExperience", "years_of_experience", "experienceYears", "yearsExperience"],
            )
            .map(|years| years.clamp(0, i64::from(u32::MAX)) as u32),
            score: pick_f64(&value, &["score", "rating", "matchScore"])
                .map(|score| score.clamp(0.0, 100.0)),
            status: pick_str(&value, &["status", "state", "availability"])
                .map(|raw| TalentStatus::parse(&raw))
                .unwrap_or_default(),
            skills,
            languages,
            experience,
            education,
            certifications: string_list(&["certifications", "certificates"]),
            salary_range: pick(&value, &["salaryRange", "salary_range", "salary"])
                .and_then(parse_salary_range),
            bio: pick_str(&value, &["bio", "summary", "about", "description"]),
            location: pick_str(&value, &["location", "city", "country"]),
            avatar_url: pick_str(&value, &["avatarUrl", "avatar_url", "avatar", "photoUrl", "photo"]),
            tags: string_list(&["tags", "labels"]),
            created_at: pick_str(&value, &["createdAt", "created_at", "creationDate"])
                .and_then(|raw| parse_timestamp(&raw)),
            updated_at: pick_str(&value, &["updatedAt", "updated_at", "modificationDate"])
                .and_then(|raw| parse_timestamp(&raw)),
        }
    }
}

fn split_full_name(full: &str) -> (String, String) {
    match full.trim().split_once(char::is_whitespace) {
        Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
        None => (full.trim().to_string(), String::new()),
    }
}

fn parse_experience(item: &Value) -> Option<Experience> {
    let company = pick_str(item, &["company", "companyName", "employer", "organization"])?;
    Some(Experience {
        company,
        role: pick_str(item, &["role", "title", "position", "jobTitle"]),
        start_date: pick_str(item, &["startDate", "start_date", "from"]),
        end_date: pick_str(item, &["endDate", "end_date", "to"]),
        description: pick_str(item, &["description", "summary"]),
    })
}

fn parse_education(item: &Value) -> Option<Education> {
    let institution = pick_str(item, &["institution", "school", "university", "center"])?;
    Some(Education {
        institution,
        degree: pick_str(item, &["degree", "title", "qualification"]),
        field: pick_str(item, &["field", "fieldOfStudy", "specialty"]),
        start_date: pick_str(item, &["startDate", "start_date", "from"]),
        end_date: pick_str(item, &["endDate", "end_date", "to"]),
    })
}

fn parse_salary_range(value: &Value) -> Option<SalaryRange> {
    let min = pick_f64(value, &["min", "minimum", "from"])?;
    let max = pick_f64(value, &["max", "maximum", "to"]).unwrap_or(min);
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    Some(SalaryRange {
        min: min.max(0.0) as u32,
        max: max.max(0.0) as u32,
        currency: pick_str(value, &["currency"]).unwrap_or_else(|| "EUR".to_string()),
    })
}

/// RFC 3339, or a naive `YYYY-MM-DDTHH:MM:SS[.fff]` assumed to be UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
