use super::PortfolioStore;
use crate::auth::jwt::AuthService;
use crate::types::{
    AdminRole, AdminUser, ContactSection, Education, Experience, Experiments, Footer,
    GrowthMindset, LearningPhaseDraft, Profile, ProjectDraft, Result, Skill, SkillsByCategory,
};
use serde_json::{json, Map, Value};

pub fn sample_profile() -> Profile {
    Profile {
        name: "Shreeya Swarupa Das".to_string(),
        headline: "Crafting Scalable Cloud Solutions with Creativity and Code".to_string(),
        bio: "A tech enthusiast building creative and intelligent solutions with AI-powered \
              tools. Currently focused on cloud computing and experimenting with AI agents \
              to create futuristic user experiences."
            .to_string(),
        highlights: "Cloud Explorer | Automation Architect | Agile Mindset".to_string(),
        profile_image: "https://images.unsplash.com/photo-1494790108755-2616c2ecbd5a?auto=format&fit=crop&w=687&q=80".to_string(),
        email: "hello@example.com".to_string(),
        linkedin: "linkedin.com/in/example".to_string(),
        location: "Odisha, India".to_string(),
        resume_url: None,
        extra: Map::new(),
    }
}

pub fn sample_skills() -> SkillsByCategory {
    let categories: [(&str, &[&str]); 7] = [
        ("current", &["HTML", "CSS", "Database Basics", "AI Tools"]),
        ("learning", &["Cloud Computing", "Automation", "AI Integration"]),
        (
            "tools",
            &["v0.dev", "Perplexity AI", "Make", "Claude AI", "Figma", "Leonardo AI"],
        ),
        ("programming", &["Python", "Java", "C"]),
        ("database", &["MySQL"]),
        ("cloud", &["AWS (Beginner)", "Azure (Beginner)"]),
        (
            "soft",
            &[
                "Problem-Solving",
                "Adaptability",
                "Resilience",
                "Quick Learning",
                "Communication",
            ],
        ),
    ];

    categories
        .into_iter()
        .map(|(category, names)| {
            let skills = names.iter().map(|name| Skill::new(*name, 50)).collect();
            (category.to_string(), skills)
        })
        .collect()
}

pub fn sample_projects() -> Vec<ProjectDraft> {
    vec![
        ProjectDraft {
            title: "Coming Soon: AI Agents".to_string(),
            description: "Exploring autonomous AI agents for task automation".to_string(),
            status: "coming-soon".to_string(),
            image: "https://images.unsplash.com/photo-1677442136019-21780ecad995?auto=format&fit=crop&w=1000&q=80".to_string(),
            live_url: None,
            github_url: None,
            technologies: vec!["Python".into(), "AI".into(), "Automation".into()],
        },
        ProjectDraft {
            title: "Academic Model Analyzer".to_string(),
            description:
                "Combined coding with design to create faster analysis models for academic research"
                    .to_string(),
            status: "completed".to_string(),
            image: "https://images.unsplash.com/photo-1551288049-bebda4e38f71?auto=format&fit=crop&w=1000&q=80".to_string(),
            live_url: Some("#".to_string()),
            github_url: Some("#".to_string()),
            technologies: vec!["Python".into(), "Data Analysis".into(), "Research".into()],
        },
    ]
}

pub fn sample_education() -> Education {
    Education {
        degree: "B.Tech in Computer Science".to_string(),
        institution: "Biju Patnaik University of Technology (BPUT), Odisha".to_string(),
        year: "2026 (Expected)".to_string(),
        progress: 75,
        extra: Map::new(),
    }
}

pub fn sample_experience() -> Experience {
    let mut experience = Experience::default();
    experience.set(
        "message",
        "On a journey\u{2014}actively seeking hands-on roles and tech collaborations. \
         Watch this space for future experience updates!",
    );
    experience.set("goals", json!([]));
    experience
}

pub fn sample_learning_journey() -> Vec<LearningPhaseDraft> {
    let phases: [(&str, &[&str], &str); 3] = [
        ("Foundation", &["HTML", "CSS", "Python", "Java"], "completed"),
        (
            "Current Focus",
            &["Cloud Computing", "AI Tools", "Automation"],
            "in-progress",
        ),
        (
            "Next Goals",
            &["Advanced Cloud Architecture", "ML Integration", "DevOps"],
            "planned",
        ),
    ];

    phases
        .into_iter()
        .zip(1..)
        .map(|((phase, skills, status), order)| LearningPhaseDraft {
            phase: phase.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            status: status.to_string(),
            order,
        })
        .collect()
}

pub fn sample_growth_mindset() -> GrowthMindset {
    let mut section = GrowthMindset::default();
    section.set("title", "Growth Mindset");
    section.set(
        "quote",
        "Every challenge is an opportunity to learn something new.",
    );
    section
}

pub fn sample_experiments() -> Experiments {
    let mut section = Experiments::default();
    section.set("header_title", "Experiments");
    section.set("header_description", "Things I am tinkering with right now.");
    section.set("lab_title", "The Lab");
    section.set("lab_description", "Small projects that may grow into big ones.");
    section.set(
        "items",
        json!([
            {
                "title": "AI-Powered Portfolio Management",
                "description": "Experimenting with dynamic content generation using AI",
                "status": "active"
            },
            {
                "title": "Cloud Automation Scripts",
                "description": "Building automation tools for cloud resource management",
                "status": "planning"
            }
        ]),
    );
    section
}

pub fn sample_contact_section() -> ContactSection {
    let mut section = ContactSection::default();
    section.set("header_title", "Get In Touch");
    section.set(
        "header_description",
        "Open to collaborations, internships and interesting conversations.",
    );
    section.set("connect_title", "Let's Connect");
    section.set("connect_description", "Reach out through any of these channels.");
    section.set("get_in_touch_title", "Send a Message");
    section.set("get_in_touch_description", "I usually reply within a few days.");
    section.set(
        "contact_links",
        json!([
            {"name": "Email", "value": "hello@example.com", "icon": "Mail"},
            {"name": "LinkedIn", "value": "linkedin.com/in/example", "icon": "Linkedin"},
            {"name": "Location", "value": "Odisha, India", "icon": "MapPin"}
        ]),
    );
    section
}

pub fn sample_footer() -> Footer {
    let mut section = Footer::default();
    section.set("brand_name", "Shreeya Swarupa Das");
    section.set(
        "brand_description",
        "Crafting scalable cloud solutions with creativity and code.",
    );
    section.set(
        "quick_links",
        json!([
            {"name": "About", "href": "#about"},
            {"name": "Skills", "href": "#skills"},
            {"name": "Projects", "href": "#projects"},
            {"name": "Contact", "href": "#contact"}
        ]),
    );
    section.set("connect_title", "Connect");
    section.set("connect_description", "Find me on LinkedIn or drop an email.");
    section.set("bottom_text", "Built with curiosity.");
    section
}

/// Writes the sample portfolio into an empty store.
///
/// Returns `false` without touching anything when a profile already exists.
pub async fn seed_portfolio(store: &PortfolioStore) -> Result<bool> {
    if store.get_section_value("profile").await?.is_some() {
        tracing::debug!("store already holds content, skipping seed");
        return Ok(false);
    }

    store.put_section(&sample_profile()).await?;

    for (category, list) in sample_skills() {
        store.put_skill_category(&category, &list).await?;
    }

    for project in sample_projects() {
        store.create_project(project).await?;
    }
    for phase in sample_learning_journey() {
        store.create_learning_phase(phase).await?;
    }

    store.put_section(&sample_education()).await?;
    store.put_section(&sample_experience()).await?;
    store.put_section(&sample_growth_mindset()).await?;
    store.put_section(&sample_experiments()).await?;
    store.put_section(&sample_contact_section()).await?;
    store.put_section(&sample_footer()).await?;

    tracing::info!("seeded sample portfolio content");
    Ok(true)
}

/// Creates the owner account if no admin exists yet.
pub async fn ensure_owner(
    store: &PortfolioStore,
    auth: &AuthService,
    username: &str,
    password: &str,
) -> Result<Option<AdminUser>> {
    if !store.list_admins().await?.is_empty() {
        return Ok(None);
    }

    let hash = auth.hash_password(password)?;
    let owner = store
        .create_admin(username, &hash, "Site Owner", "", AdminRole::Owner)
        .await?;

    tracing::info!(username = %owner.username, "created owner admin");
    Ok(Some(owner))
}

/// The seed shape as plain JSON, handy for `folio-server seed --dry-run`.
pub fn sample_as_json() -> Value {
    json!({
        "profile": sample_profile(),
        "skills": sample_skills(),
        "projects": sample_projects(),
        "education": sample_education(),
        "experience": sample_experience(),
        "learning_journey": sample_learning_journey(),
        "growth_mindset": sample_growth_mindset(),
        "experiments": sample_experiments(),
        "contact_section": sample_contact_section(),
        "footer": sample_footer(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let store = PortfolioStore::new_memory().await.unwrap();

        assert!(seed_portfolio(&store).await.unwrap());
        assert!(!seed_portfolio(&store).await.unwrap());

        assert_eq!(store.list_projects().await.unwrap().len(), 2);
        let skills = store.get_skills().await.unwrap();
        assert_eq!(skills.len(), 7);
        assert_eq!(skills["programming"][0].name, "Python");
    }

    #[tokio::test]
    async fn test_learning_journey_seeded_in_order() {
        let store = PortfolioStore::new_memory().await.unwrap();
        seed_portfolio(&store).await.unwrap();

        let phases: Vec<_> = store
            .list_learning_phases()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.phase)
            .collect();
        assert_eq!(phases, vec!["Foundation", "Current Focus", "Next Goals"]);
    }

    #[tokio::test]
    async fn test_ensure_owner_only_once() {
        let store = PortfolioStore::new_memory().await.unwrap();
        let auth = AuthService::new("seed-test-secret-32-characters-long".into(), 60);

        let owner = ensure_owner(&store, &auth, "admin", "admin-password")
            .await
            .unwrap()
            .expect("first call creates the owner");
        assert_eq!(owner.role, AdminRole::Owner);

        assert!(ensure_owner(&store, &auth, "admin", "admin-password")
            .await
            .unwrap()
            .is_none());
    }
}
