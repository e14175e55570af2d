//! Bundled content shown to visitors when the backend cannot be reached.
//!
//! It is the same sample portfolio the server seeds, so a fresh install and an
//! offline page look alike.

use crate::db::seed;
use crate::types::{
    ContactSection, Education, Experience, Experiments, Footer, GrowthMindset, LearningPhase,
    Profile, Project, SkillsByCategory,
};
use chrono::{DateTime, Utc};

pub fn profile() -> Profile {
    seed::sample_profile()
}

pub fn skills() -> SkillsByCategory {
    seed::sample_skills()
}

pub fn projects() -> Vec<Project> {
    let epoch = DateTime::<Utc>::UNIX_EPOCH;
    seed::sample_projects()
        .into_iter()
        .enumerate()
        .map(|(i, draft)| Project {
            id: format!("mock-project-{}", i + 1),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            image: draft.image,
            live_url: draft.live_url,
            github_url: draft.github_url,
            technologies: draft.technologies,
            created_at: epoch,
            updated_at: epoch,
        })
        .collect()
}

pub fn education() -> Education {
    seed::sample_education()
}

pub fn experience() -> Experience {
    seed::sample_experience()
}

pub fn learning_journey() -> Vec<LearningPhase> {
    seed::sample_learning_journey()
        .into_iter()
        .map(|draft| LearningPhase {
            id: format!("mock-phase-{}", draft.order),
            phase: draft.phase,
            skills: draft.skills,
            status: draft.status,
            order: draft.order,
        })
        .collect()
}

pub fn growth_mindset() -> GrowthMindset {
    seed::sample_growth_mindset()
}

pub fn experiments() -> Experiments {
    seed::sample_experiments()
}

pub fn contact_section() -> ContactSection {
    seed::sample_contact_section()
}

pub fn footer() -> Footer {
    seed::sample_footer()
}
