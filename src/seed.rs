//! Seeding
//! Mission: Bootstrap the admin account and the sample portfolio content

use crate::auth::{models::NewUser, UserStore};
use crate::error::StoreError;
use crate::resources::{
    ListInput, ProjectPayload, ProjectStatus, ProjectStore, QualificationKind,
    QualificationPayload, QualificationStore, ResourcePayload,
};
use tracing::info;

/// Ensure the configured admin exists and holds the admin role
pub fn seed_admin(users: &UserStore, admin: &NewUser) -> Result<(), StoreError> {
    let user = users.ensure_admin(admin)?;
    info!(user_id = %user.id, email = %user.email, "🔑 Admin account ready");
    Ok(())
}

/// Upsert sample projects (keyed by title) and qualifications (keyed by
/// institution + program). Matches are updated in place, new ones go last.
pub fn seed_portfolio_data(
    projects: &ProjectStore,
    qualifications: &QualificationStore,
) -> Result<(), StoreError> {
    let samples = sample_projects();
    let count = samples.len();
    for sample in samples {
        let title = sample.title.clone().unwrap_or_default();
        projects.upsert_by(|p| p.title == title, ResourcePayload::new(sample))?;
    }
    info!(count, "🌱 Seeded/updated default projects");

    let samples = sample_qualifications();
    let count = samples.len();
    for sample in samples {
        let institution = sample.institution.clone().unwrap_or_default();
        let program = sample.program.clone().unwrap_or_default();
        qualifications.upsert_by(
            |q| q.institution == institution && q.program == program,
            ResourcePayload::new(sample),
        )?;
    }
    info!(count, "🌱 Seeded/updated default qualifications");

    Ok(())
}

fn list(items: &[&str]) -> Option<ListInput> {
    Some(ListInput::List(items.iter().map(|s| s.to_string()).collect()))
}

fn text(value: &str) -> Option<String> {
    Some(value.to_string())
}

pub fn sample_projects() -> Vec<ProjectPayload> {
    vec![
        ProjectPayload {
            title: text("TTC Delay Insights"),
            summary: text("ETL + analytics platform for Toronto transit delay data"),
            description: text(
                "End-to-end ETL and analytics project that cleans a decade of Toronto transit \
                 delay data and loads it into PostgreSQL for SQL-first exploration and API reporting.",
            ),
            role: text("Data Engineer & API Developer"),
            outcome: text(
                "Automated ingestion for 10+ years of delay events with reusable SQL views \
                 powering parameterized reports and a React dashboard.",
            ),
            status: Some(ProjectStatus::InProgress),
            technologies: list(&["Python", "Pandas", "PostgreSQL", "Docker", "FastAPI", "React"]),
            highlights: list(&[
                "Standardized mixed Excel/CSV sources into a unified fact table",
                "Containerized Postgres with seeded schema, indexes, and validation",
                "Exposed analytics endpoints through FastAPI for the Vite frontend",
            ]),
            github_link: text("https://github.com/Eddie000321/ttc-delay-insights"),
            image: text("/images/projects/ttc-delay-insights.svg"),
            ..ProjectPayload::default()
        },
        ProjectPayload {
            title: text("DB Lab (Postgres Only)"),
            summary: text("Self-contained PostgreSQL playground"),
            description: text(
                "Playground packaged with make targets for spinning up schemas, fixtures, and \
                 indexing experiments without impacting other environments.",
            ),
            role: text("Database Engineer"),
            outcome: text(
                "Delivered a reproducible lab that provisions schema, seeds datasets, and \
                 automates EXPLAIN-before/after benchmarks for index tuning.",
            ),
            status: Some(ProjectStatus::Completed),
            technologies: list(&["PostgreSQL", "Docker", "Make"]),
            highlights: list(&[
                "Scripted schema + seed workflows mirroring Prisma models",
                "Parameterized data generation to stress-test query plans",
                "Documented backup/restore and EXPLAIN exercises via make targets",
            ]),
            github_link: text("https://github.com/Eddie000321/db-lab"),
            image: text("/images/projects/db-lab.svg"),
            ..ProjectPayload::default()
        },
    ]
}

pub fn sample_qualifications() -> Vec<QualificationPayload> {
    vec![
        QualificationPayload {
            institution: text("Centennial College"),
            program: text("Computer Engineering Technology - Advanced Diploma (3 Year Program)"),
            status: text("Currently Enrolled"),
            period: text("2024 - Present"),
            location: text("Toronto, ON, Canada"),
            kind: Some(QualificationKind::College),
            description: text(
                "Comprehensive 3-year advanced diploma program covering practical computer \
                 engineering skills, programming languages, and hands-on technology projects.",
            ),
            highlights: list(&[
                "Programming in Multiple Languages",
                "Hardware & Software Integration",
                "Network Administration",
                "Project Management",
            ]),
        },
        QualificationPayload {
            institution: text("Korea National Open University"),
            program: text("Bachelor's Degree in Computer Science"),
            status: text("Transfer Student - Currently Enrolled"),
            period: text("2025 - Present"),
            location: text("Seoul, South Korea"),
            kind: Some(QualificationKind::University),
            description: text(
                "Pursuing comprehensive computer science education with focus on advanced \
                 software development, algorithms, and system design.",
            ),
            highlights: list(&[
                "Software Engineering Principles",
                "Data Structures & Algorithms",
                "Database Management Systems",
                "Web Development Technologies",
            ]),
        },
    ]
}
