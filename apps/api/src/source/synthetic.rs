//! Offline resume generator backed by static pools.
//!
//! Also supplies the career half (title, summary, experience, education, skills)
//! for `RandomUserSource`, which only gets identity and contact data from its API.

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::models::resume::{ContactInfo, EducationEntry, ExperienceEntry, ResumeRecord};
use crate::source::{ResumeSource, SourceError};

// ────────────────────────────────────────────────────────────────────────────
// Pools
// ────────────────────────────────────────────────────────────────────────────

const FIRST_NAMES: &[&str] = &[
    "Olivia", "Liam", "Amelia", "Noah", "Sofia", "Mateo", "Priya", "Kenji", "Chloe", "Elias",
    "Maya", "Tobias", "Aisha", "Lucas", "Ingrid", "Omar", "Hannah", "Diego", "Freya", "Samuel",
];

const LAST_NAMES: &[&str] = &[
    "Johnson", "Nguyen", "Garcia", "Okafor", "Lindqvist", "Patel", "Moreau", "Schmidt",
    "Tanaka", "Rossi", "Walker", "Kowalski", "Fernandes", "O'Brien", "Haddad", "Larsen",
];

const LOCATIONS: &[&str] = &[
    "Austin, Texas, United States",
    "Portland, Oregon, United States",
    "Leeds, England, United Kingdom",
    "Toronto, Ontario, Canada",
    "Melbourne, Victoria, Australia",
    "Denver, Colorado, United States",
    "Bristol, England, United Kingdom",
    "Vancouver, British Columbia, Canada",
];

const COMPANIES: &[&str] = &[
    "Northwind Labs", "Bluefin Analytics", "Crescent Health", "Ironbark Systems",
    "Lumen & Co.", "Harborview Capital", "Tallgrass Media", "Quantum Ridge",
    "Copperleaf Retail", "Silverline Logistics", "Evergreen Partners", "Brightpath Software",
];

const UNIVERSITIES: &[&str] = &[
    "University of Michigan", "University of Toronto", "University of Melbourne",
    "University of Manchester", "Georgia Institute of Technology", "McGill University",
    "University of Washington", "King's College London", "Arizona State University",
];

const ADJECTIVES: &[&str] = &[
    "Results-driven", "Detail-oriented", "Collaborative", "Versatile", "Analytical",
    "Customer-focused",
];

struct Profession {
    titles: &'static [&'static str],
    fields: &'static [&'static str],
    degrees: &'static [&'static str],
    skills: &'static [&'static str],
    /// `{pct}` is substituted with a random percentage.
    highlights: &'static [&'static str],
    focus: &'static str,
}

const PROFESSIONS: &[Profession] = &[
    Profession {
        titles: &["Software Engineer", "Backend Developer", "Full Stack Developer", "Site Reliability Engineer"],
        fields: &["Computer Science", "Software Engineering", "Mathematics"],
        degrees: &["Bachelor of Science", "Master of Science"],
        skills: &[
            "Rust", "TypeScript", "PostgreSQL", "Kubernetes", "AWS", "Docker", "GraphQL",
            "CI/CD", "Distributed Systems", "System Design", "Python", "Observability",
        ],
        highlights: &[
            "Cut p95 API latency by {pct}% by redesigning the caching layer",
            "Led migration of a monolith to services, reducing deploy time by {pct}%",
            "Built an internal tooling platform adopted by every product team",
            "Raised automated test coverage by {pct}% across core services",
            "Mentored junior engineers and ran weekly design reviews",
        ],
        focus: "building reliable, scalable software",
    },
    Profession {
        titles: &["Product Designer", "UX Designer", "UI/UX Lead", "Interaction Designer"],
        fields: &["Graphic Design", "Human-Computer Interaction", "Fine Arts"],
        degrees: &["Bachelor of Arts", "Bachelor of Fine Arts", "Master of Design"],
        skills: &[
            "Figma", "User Research", "Prototyping", "Design Systems", "Accessibility",
            "Usability Testing", "Wireframing", "Visual Design", "Motion Design",
        ],
        highlights: &[
            "Redesigned onboarding flow, lifting activation by {pct}%",
            "Established a shared design system used across four products",
            "Ran {pct} user interviews to shape the product roadmap",
            "Improved accessibility audit scores by {pct}% through targeted fixes",
        ],
        focus: "crafting intuitive, accessible experiences",
    },
    Profession {
        titles: &["Marketing Manager", "Growth Marketer", "Content Strategist", "Brand Manager"],
        fields: &["Marketing", "Communications", "Business Administration"],
        degrees: &["Bachelor of Business Administration", "Bachelor of Arts", "MBA"],
        skills: &[
            "SEO", "Content Strategy", "Google Analytics", "Email Marketing", "Copywriting",
            "Paid Social", "Market Research", "A/B Testing", "Brand Strategy",
        ],
        highlights: &[
            "Grew organic traffic by {pct}% within twelve months",
            "Launched a lifecycle email program with {pct}% open rates",
            "Managed a multi-channel budget and improved ROAS by {pct}%",
            "Coordinated product launches with sales and design teams",
        ],
        focus: "turning insight into measurable growth",
    },
    Profession {
        titles: &["Financial Analyst", "Data Analyst", "Business Analyst", "Operations Analyst"],
        fields: &["Finance", "Economics", "Statistics", "Accounting"],
        degrees: &["Bachelor of Science", "Bachelor of Commerce", "Master of Finance"],
        skills: &[
            "Excel", "SQL", "Financial Modeling", "Tableau", "Forecasting", "Power BI",
            "Budgeting", "Python", "Stakeholder Reporting", "Variance Analysis",
        ],
        highlights: &[
            "Built forecasting models that reduced budget variance by {pct}%",
            "Automated monthly reporting, saving {pct} analyst hours per quarter",
            "Identified cost savings worth {pct}% of the operating budget",
            "Presented quarterly performance reviews to executive leadership",
        ],
        focus: "translating data into confident decisions",
    },
];

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// Identity and contact fields, either drawn from the pools or fetched remotely.
#[derive(Debug, Clone)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub avatar_url: Option<String>,
}

fn pick<R: Rng + ?Sized>(rng: &mut R, pool: &[&'static str]) -> &'static str {
    pool[rng.gen_range(0..pool.len())]
}

/// Draws a complete identity from the static pools.
pub fn random_identity<R: Rng + ?Sized>(rng: &mut R) -> Identity {
    let first = pick(rng, FIRST_NAMES);
    let last = pick(rng, LAST_NAMES);
    let local = format!("{}.{}", first, last.replace('\'', "")).to_ascii_lowercase();

    Identity {
        name: format!("{first} {last}"),
        email: format!("{local}@example.com"),
        phone: format!(
            "({:03}) {:03}-{:04}",
            rng.gen_range(201..=989),
            rng.gen_range(200..=999),
            rng.gen_range(0..=9999)
        ),
        location: pick(rng, LOCATIONS).to_string(),
        avatar_url: None,
    }
}

/// Builds a full resume around `identity`. Dates are anchored at `current_year`.
pub fn synthesize_resume<R: Rng + ?Sized>(
    rng: &mut R,
    identity: Identity,
    current_year: i32,
) -> ResumeRecord {
    let profession = &PROFESSIONS[rng.gen_range(0..PROFESSIONS.len())];
    let title = pick(rng, profession.titles).to_string();

    // Most recent role first; the first one is current.
    let role_count = rng.gen_range(2..=3);
    let mut experience = Vec::with_capacity(role_count);
    let mut end = current_year;
    for i in 0..role_count {
        let duration = rng.gen_range(1..=4);
        let start = end - duration;
        let position = if i == 0 {
            title.clone()
        } else {
            pick(rng, profession.titles).to_string()
        };
        experience.push(ExperienceEntry {
            company: pick(rng, COMPANIES).to_string(),
            position,
            start_year: start,
            end_year: if i == 0 { None } else { Some(end) },
            highlights: random_highlights(rng, profession),
        });
        end = start - rng.gen_range(0..=1);
    }

    let career_start = experience.last().map_or(current_year, |e| e.start_year);
    let education = vec![EducationEntry {
        institution: pick(rng, UNIVERSITIES).to_string(),
        degree: pick(rng, profession.degrees).to_string(),
        field: pick(rng, profession.fields).to_string(),
        graduation_year: career_start - rng.gen_range(0..=1),
    }];

    let skill_count = rng.gen_range(5..=8).min(profession.skills.len());
    let skills = profession
        .skills
        .choose_multiple(rng, skill_count)
        .map(|s| s.to_string())
        .collect();

    let years = (current_year - career_start).max(1);
    let summary = format!(
        "{} {} with {}+ years of experience {}. Known for clear communication, ownership, \
         and delivering work that moves the business forward.",
        pick(rng, ADJECTIVES),
        title.to_lowercase(),
        years,
        profession.focus
    );

    ResumeRecord {
        id: Uuid::new_v4(),
        name: identity.name,
        title,
        contact: ContactInfo {
            email: identity.email,
            phone: identity.phone,
            location: identity.location,
        },
        summary,
        experience,
        education,
        skills,
        avatar_url: identity.avatar_url,
        generated_at: Utc::now(),
    }
}

fn random_highlights<R: Rng + ?Sized>(rng: &mut R, profession: &Profession) -> Vec<String> {
    let count = rng.gen_range(2..=3).min(profession.highlights.len());
    profession
        .highlights
        .choose_multiple(rng, count)
        .map(|template| template.replace("{pct}", &rng_pct(rng)))
        .collect()
}

fn rng_pct<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.gen_range(12..=65).to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// SyntheticSource
// ────────────────────────────────────────────────────────────────────────────

/// Fully offline `ResumeSource`. Seeded instances are reproducible.
pub struct SyntheticSource {
    rng: Mutex<StdRng>,
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResumeSource for SyntheticSource {
    async fn fetch_one(&self) -> Result<ResumeRecord, SourceError> {
        let mut rng = self.rng.lock();
        let identity = random_identity(&mut *rng);
        Ok(synthesize_resume(&mut *rng, identity, Utc::now().year()))
    }

    fn backend_name(&self) -> &'static str {
        "synthetic"
    }
}
