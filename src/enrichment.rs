// src/enrichment.rs
//! Demo data for talent records the backend returns half-filled.
//!
//! Values are drawn from an RNG seeded with the enricher seed, the talent's
//! name and its position in the listing, so the same listing always renders
//! the same way. Fields that already carry data are left untouched.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use url::form_urlencoded::byte_serialize;

use crate::types::{SalaryRange, Talent};

const SKILL_POOL: &[&str] = &[
    "JavaScript",
    "TypeScript",
    "React",
    "Node.js",
    "Python",
    "Django",
    "Java",
    "Spring Boot",
    "C#",
    ".NET",
    "Go",
    "Rust",
    "PostgreSQL",
    "MongoDB",
    "Docker",
    "Kubernetes",
    "AWS",
    "Azure",
    "GraphQL",
    "Terraform",
];

const CERTIFICATION_POOL: &[&str] = &[
    "AWS Certified Solutions Architect",
    "Certified Kubernetes Administrator",
    "Microsoft Certified: Azure Developer Associate",
    "Google Professional Cloud Developer",
    "Oracle Certified Professional Java SE",
    "Scrum Master (PSM I)",
    "HashiCorp Certified Terraform Associate",
];

const TITLE_POOL: &[&str] = &[
    "Full Stack Developer",
    "Backend Developer",
    "Frontend Developer",
    "DevOps Engineer",
    "Data Engineer",
    "Mobile Developer",
    "QA Automation Engineer",
];

const LOCATION_POOL: &[&str] = &[
    "Madrid",
    "Barcelona",
    "Valencia",
    "Sevilla",
    "Bilbao",
    "Málaga",
    "Remote",
];

const TAG_POOL: &[&str] = &[
    "Top talent",
    "Immediate start",
    "Remote friendly",
    "Team lead",
    "Open to relocate",
    "Bootcamp graduate",
];

const AVATAR_COLORS: &[&str] = &[
    "0D8ABC", "7C3AED", "DB2777", "059669", "D97706", "DC2626", "2563EB", "4B5563",
];

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a over the given byte chunks; stable across toolchains
fn fnv1a<'a>(chunks: impl IntoIterator<Item = &'a [u8]>) -> u64 {
    chunks
        .into_iter()
        .flatten()
        .fold(FNV_OFFSET, |hash, byte| {
            (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enricher {
    seed: u64,
}

impl Enricher {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn seed_for(&self, talent: &Talent, index: usize) -> u64 {
        let name = talent.full_name().to_lowercase();
        let seed = self.seed.to_le_bytes();
        let position = (index as u64).to_le_bytes();
        fnv1a([seed.as_slice(), name.as_bytes(), position.as_slice()])
    }

    fn rng_for(&self, talent: &Talent, index: usize) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed_for(talent, index))
    }

    /// Copy of `talent` with empty fields filled in
    pub fn enrich(&self, talent: &Talent, index: usize) -> Talent {
        let mut rng = self.rng_for(talent, index);
        let mut enriched = talent.clone();

        if enriched.title.is_none() {
            enriched.title = pick(&mut rng, TITLE_POOL);
        }
        if enriched.skills.is_empty() {
            let count = rng.gen_range(3..=6);
            enriched.skills = sample(&mut rng, SKILL_POOL, count);
        }
        if enriched.years_of_experience.is_none() {
            enriched.years_of_experience = Some(rng.gen_range(0..=12));
        }
        if enriched.score.is_none() {
            enriched.score = Some(f64::from(rng.gen_range(55..=98_u32)));
        }
        if enriched.certifications.is_empty() {
            let count = rng.gen_range(0..=2);
            enriched.certifications = sample(&mut rng, CERTIFICATION_POOL, count);
        }
        if enriched.salary_range.is_none() {
            enriched.salary_range = Some(salary_for(
                &mut rng,
                enriched.years_of_experience.unwrap_or_default(),
            ));
        }
        if enriched.location.is_none() {
            enriched.location = pick(&mut rng, LOCATION_POOL);
        }
        if enriched.tags.is_empty() {
            let count = rng.gen_range(1..=2);
            enriched.tags = sample(&mut rng, TAG_POOL, count);
        }
        if enriched.bio.is_none() {
            enriched.bio = Some(bio_for(&enriched));
        }
        if enriched.avatar_url.is_none() {
            enriched.avatar_url = Some(avatar_url(&enriched));
        }

        enriched
    }

    pub fn enrich_all(&self, talents: &[Talent]) -> Vec<Talent> {
        talents
            .iter()
            .enumerate()
            .map(|(index, talent)| self.enrich(talent, index))
            .collect()
    }
}

fn pick(rng: &mut ChaCha8Rng, pool: &[&str]) -> Option<String> {
    pool.choose(rng).map(|s| s.to_string())
}

fn sample(rng: &mut ChaCha8Rng, pool: &[&str], count: usize) -> Vec<String> {
    pool.choose_multiple(rng, count)
        .map(|s| s.to_string())
        .collect()
}

/// Yearly gross band growing with experience, rounded to 1k
fn salary_for(rng: &mut ChaCha8Rng, years: u32) -> SalaryRange {
    let base = 22_000 + years.min(15) * 3_500;
    let min = base + rng.gen_range(0..=4) * 1_000;
    let max = min + rng.gen_range(5..=15) * 1_000;
    SalaryRange {
        min,
        max,
        currency: "EUR".to_string(),
    }
}

fn bio_for(talent: &Talent) -> String {
    let title = talent.title.as_deref().unwrap_or("Developer");
    let years = talent.years_of_experience.unwrap_or_default();
    let skills = talent
        .skills
        .iter()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");

    match (years, skills.is_empty()) {
        (0, true) => format!("{} starting their career.", title),
        (0, false) => format!("{} starting their career, working with {}.", title, skills),
        (_, true) => format!("{} with {} years of experience.", title, years),
        (_, false) => format!(
            "{} with {} years of experience, working with {}.",
            title, years, skills
        ),
    }
}

/// Initials avatar; the background colour depends only on the name
pub fn avatar_url(talent: &Talent) -> String {
    let name = talent.full_name();
    let lowered = name.to_lowercase();
    let color = AVATAR_COLORS[(fnv1a([lowered.as_bytes()]) % AVATAR_COLORS.len() as u64) as usize];

    let display = if name.is_empty() {
        talent.initials()
    } else {
        name.split_whitespace().collect::<Vec<_>>().join(" ")
    };
    let encoded: String = byte_serialize(display.as_bytes()).collect();

    format!(
        "https://ui-avatars.com/api/?name={}&background={}&color=fff&size=128",
        encoded, color
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TalentStatus;

    fn bare(first: &str, last: &str) -> Talent {
        Talent {
            first_name: first.to_string(),
            last_name: last.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let talent = bare("Ana", "Ruiz");
        assert_eq!(
            Enricher::new(1).enrich(&talent, 3),
            Enricher::new(1).enrich(&talent, 3)
        );
    }

    #[test]
    fn test_fills_every_missing_field() {
        let enriched = Enricher::new(99).enrich(&bare("Ana", "Ruiz"), 0);

        assert!(enriched.title.is_some());
        assert!((3..=6).contains(&enriched.skills.len()));
        assert!(enriched.score.is_some_and(|s| (55.0..=98.0).contains(&s)));
        assert!(enriched.location.is_some());
        assert!(!enriched.tags.is_empty());
        assert!(enriched.bio.as_deref().unwrap().contains(enriched.title.as_deref().unwrap()));

        let salary = enriched.salary_range.unwrap();
        assert!(salary.min < salary.max);
        assert_eq!(salary.currency, "EUR");
    }

    #[test]
    fn test_existing_values_are_kept() {
        let talent = Talent {
            title: Some("CTO".to_string()),
            skills: vec!["COBOL".to_string()],
            score: Some(12.0),
            status: TalentStatus::Hired,
            avatar_url: Some("https://cdn/ana.png".to_string()),
            ..bare("Ana", "Ruiz")
        };

        let enriched = Enricher::new(5).enrich(&talent, 0);
        assert_eq!(enriched.title.as_deref(), Some("CTO"));
        assert_eq!(enriched.skills, vec!["COBOL"]);
        assert_eq!(enriched.score, Some(12.0));
        assert_eq!(enriched.status, TalentStatus::Hired);
        assert_eq!(enriched.avatar_url.as_deref(), Some("https://cdn/ana.png"));
    }

    #[test]
    fn test_enrich_all_uses_position() {
        let talents = vec![bare("Ana", "Ruiz"), bare("Ana", "Ruiz")];
        let enriched = Enricher::new(3).enrich_all(&talents);
        assert_eq!(enriched.len(), 2);
        assert_eq!(enriched[0], Enricher::new(3).enrich(&talents[0], 0));
        assert_eq!(enriched[1], Enricher::new(3).enrich(&talents[1], 1));
    }

    #[test]
    fn test_seed_derivation_is_pinned() {
        let enricher = Enricher::new(42);
        assert_eq!(enricher.seed_for(&bare("Ana", "Ruiz"), 7), 5_979_743_978_700_561_076);
        assert_eq!(
            enricher.seed_for(&bare("ANA", "RUIZ"), 7),
            enricher.seed_for(&bare("ana", "ruiz"), 7)
        );
        assert_ne!(
            enricher.seed_for(&bare("Ana", "Ruiz"), 7),
            enricher.seed_for(&bare("Ana", "Ruiz"), 8)
        );
    }

    #[test]
    fn test_avatar_url() {
        let url = avatar_url(&bare("Grace", "Hopper"));
        assert_eq!(
            url,
            "https://ui-avatars.com/api/?name=Grace+Hopper&background=059669&color=fff&size=128"
        );
        assert!(avatar_url(&bare("", "")).contains("name=%3F&"));
    }

    #[test]
    fn test_avatar_url_encodes_reserved_characters() {
        let url = avatar_url(&bare("Ana", "& Co"));
        assert!(url.contains("?name=Ana+%26+Co&background="));
        assert_eq!(url.matches('&').count(), 3);

        let url = avatar_url(&bare("José", "Núñez#1"));
        assert!(url.contains("name=Jos%C3%A9+N%C3%BA%C3%B1ez%231&"));
    }
}
