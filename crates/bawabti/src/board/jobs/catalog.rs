use serde::Serialize;

/// One selectable value: a stable slug stored on the job plus its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub slug: &'static str,
    pub label: &'static str,
}

const fn entry(slug: &'static str, label: &'static str) -> CatalogEntry {
    CatalogEntry { slug, label }
}

pub const JOB_CATEGORIES: &[CatalogEntry] = &[
    entry("information_technology", "تكنولوجيا المعلومات"),
    entry("sales_marketing", "المبيعات والتسويق"),
    entry("accounting_finance", "المحاسبة والمالية"),
    entry("human_resources", "الموارد البشرية"),
    entry("engineering", "الهندسة"),
    entry("education", "التعليم"),
    entry("health", "الصحة"),
    entry("tourism_hospitality", "السياحة والفنادق"),
    entry("administration", "الإدارة"),
    entry("other", "أخرى"),
];

pub const JOB_TYPES: &[CatalogEntry] = &[
    entry("full_time", "دوام كامل"),
    entry("part_time", "دوام جزئي"),
    entry("freelance", "عمل حر"),
    entry("internship", "تدريب"),
    entry("remote", "عن بُعد"),
];

pub const EXPERIENCE_LEVELS: &[CatalogEntry] = &[
    entry("entry", "مبتدئ (أقل من سنة)"),
    entry("junior", "مبتدئ - متوسط (1-3 سنوات)"),
    entry("mid", "متوسط (3-5 سنوات)"),
    entry("senior", "متقدم (5-10 سنوات)"),
    entry("expert", "خبير (أكثر من 10 سنوات)"),
];

/// The fixed value lists offered to companies when posting a job.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct JobCatalog {
    pub categories: &'static [CatalogEntry],
    pub job_types: &'static [CatalogEntry],
    pub experience_levels: &'static [CatalogEntry],
}

impl JobCatalog {
    pub const fn standard() -> Self {
        Self {
            categories: JOB_CATEGORIES,
            job_types: JOB_TYPES,
            experience_levels: EXPERIENCE_LEVELS,
        }
    }

    pub fn has_category(&self, slug: &str) -> bool {
        contains(self.categories, slug)
    }

    pub fn has_job_type(&self, slug: &str) -> bool {
        contains(self.job_types, slug)
    }

    pub fn has_experience_level(&self, slug: &str) -> bool {
        contains(self.experience_levels, slug)
    }
}

fn contains(entries: &[CatalogEntry], slug: &str) -> bool {
    entries.iter().any(|entry| entry.slug == slug)
}
