use super::http::{expect_ack, expect_data, ApiClient, ClientError};
use super::mock;
use crate::types::{
    ApiResponse, ContactMessageCreate, ContactSection, Education, Experience, Experiments, Footer,
    GrowthMindset, LearningPhase, Profile, Project, SectionDocument, SkillsByCategory,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;

/// Read-only access to the public sections, plus the contact form.
#[derive(Debug, Clone)]
pub struct PublicApi {
    client: ApiClient,
}

/// Runs `fetch`; on any failure logs it and returns the bundled fallback.
async fn or_mock<T, F>(section: &'static str, fetch: F, fallback: fn() -> T) -> T
where
    F: Future<Output = Result<T, ClientError>>,
{
    match fetch.await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(section, error = %e, "falling back to bundled content");
            fallback()
        }
    }
}

impl PublicApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        expect_data(self.client.get::<ApiResponse<T>>(path).await?)
    }

    /// Any whole-document section by type.
    pub async fn section<S: SectionDocument>(&self) -> Result<S, ClientError> {
        self.fetch(&format!("/{}", S::KEY)).await
    }

    pub async fn profile(&self) -> Result<Profile, ClientError> {
        self.section().await
    }

    pub async fn skills(&self) -> Result<SkillsByCategory, ClientError> {
        self.fetch("/skills").await
    }

    pub async fn projects(&self) -> Result<Vec<Project>, ClientError> {
        self.fetch("/projects").await
    }

    pub async fn education(&self) -> Result<Education, ClientError> {
        self.section().await
    }

    pub async fn experience(&self) -> Result<Experience, ClientError> {
        self.section().await
    }

    pub async fn learning_journey(&self) -> Result<Vec<LearningPhase>, ClientError> {
        self.fetch("/learning-journey").await
    }

    pub async fn growth_mindset(&self) -> Result<GrowthMindset, ClientError> {
        self.section().await
    }

    pub async fn experiments(&self) -> Result<Experiments, ClientError> {
        self.section().await
    }

    pub async fn contact_section(&self) -> Result<ContactSection, ClientError> {
        self.section().await
    }

    pub async fn footer(&self) -> Result<Footer, ClientError> {
        self.section().await
    }

    /// Submits the contact form; returns the server's confirmation message.
    pub async fn submit_contact(&self, form: &ContactMessageCreate) -> Result<String, ClientError> {
        expect_ack(self.client.post::<_, ApiResponse<Value>>("/contact", form).await?)
    }

    pub async fn profile_or_mock(&self) -> Profile {
        or_mock("profile", self.profile(), mock::profile).await
    }

    pub async fn skills_or_mock(&self) -> SkillsByCategory {
        or_mock("skills", self.skills(), mock::skills).await
    }

    pub async fn projects_or_mock(&self) -> Vec<Project> {
        or_mock("projects", self.projects(), mock::projects).await
    }

    pub async fn education_or_mock(&self) -> Education {
        or_mock("education", self.education(), mock::education).await
    }

    pub async fn experience_or_mock(&self) -> Experience {
        or_mock("experience", self.experience(), mock::experience).await
    }

    pub async fn learning_journey_or_mock(&self) -> Vec<LearningPhase> {
        or_mock(
            "learning-journey",
            self.learning_journey(),
            mock::learning_journey,
        )
        .await
    }

    pub async fn growth_mindset_or_mock(&self) -> GrowthMindset {
        or_mock("growth-mindset", self.growth_mindset(), mock::growth_mindset).await
    }

    pub async fn experiments_or_mock(&self) -> Experiments {
        or_mock("experiments", self.experiments(), mock::experiments).await
    }

    pub async fn contact_section_or_mock(&self) -> ContactSection {
        or_mock(
            "contact-section",
            self.contact_section(),
            mock::contact_section,
        )
        .await
    }

    pub async fn footer_or_mock(&self) -> Footer {
        or_mock("footer", self.footer(), mock::footer).await
    }

    /// Fetches every section concurrently, each falling back independently.
    pub async fn portfolio_or_mock(&self) -> PortfolioContent {
        let (profile, skills, projects, education, experience) = futures::join!(
            self.profile_or_mock(),
            self.skills_or_mock(),
            self.projects_or_mock(),
            self.education_or_mock(),
            self.experience_or_mock(),
        );
        let (learning_journey, growth_mindset, experiments, contact_section, footer) = futures::join!(
            self.learning_journey_or_mock(),
            self.growth_mindset_or_mock(),
            self.experiments_or_mock(),
            self.contact_section_or_mock(),
            self.footer_or_mock(),
        );

        PortfolioContent {
            profile,
            skills,
            projects,
            education,
            experience,
            learning_journey,
            growth_mindset,
            experiments,
            contact_section,
            footer,
        }
    }
}

/// Everything a public page renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioContent {
    pub profile: Profile,
    pub skills: SkillsByCategory,
    pub projects: Vec<Project>,
    pub education: Education,
    pub experience: Experience,
    pub learning_journey: Vec<LearningPhase>,
    pub growth_mindset: GrowthMindset,
    pub experiments: Experiments,
    pub contact_section: ContactSection,
    pub footer: Footer,
}
