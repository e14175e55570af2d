use super::http::{expect_ack, expect_data, ApiClient, ClientError};
use super::public::PublicApi;
use crate::types::{
    AdminCreate, AdminUser, ApiResponse, ContactMessage, DashboardSummary, LearningPhase,
    LearningPhaseDraft, LoginRequest, Notification, Project, ProjectDraft, ProjectUpdate,
    SearchResults, SectionDocument, Skill, SkillsByCategory, TokenResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Authenticated CRUD for every section, plus inbox, users and search.
///
/// Reads that have a public endpoint go through it; writes go to `/admin/*`.
#[derive(Debug, Clone)]
pub struct AdminApi {
    client: ApiClient,
    public: PublicApi,
}

impl AdminApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            public: PublicApi::new(client.clone()),
            client,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.tokens().is_authenticated()
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        expect_data(self.client.get::<ApiResponse<T>>(path).await?)
    }

    async fn put_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String, ClientError> {
        expect_ack(self.client.put::<_, ApiResponse<Value>>(path, body).await?)
    }

    async fn delete_ack(&self, path: &str) -> Result<String, ClientError> {
        expect_ack(self.client.delete::<ApiResponse<Value>>(path).await?)
    }

    // ============= Session =============

    /// Exchanges credentials for a token and stores it.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let tokens: TokenResponse = self.client.post("/admin/login", &request).await?;
        self.client.tokens().set(tokens.access_token.clone());

        tracing::info!(username, "admin signed in");
        Ok(tokens)
    }

    /// Tells the server about the logout, then drops the token either way.
    pub async fn logout(&self) {
        if self.is_authenticated() {
            if let Err(e) = self
                .client
                .post_empty::<ApiResponse<Value>>("/admin/logout-notify")
                .await
            {
                tracing::warn!(error = %e, "logout notification failed");
            }
        }
        self.client.tokens().clear();
    }

    pub async fn verify(&self) -> Result<Value, ClientError> {
        self.get_data("/admin/verify").await
    }

    pub async fn me(&self) -> Result<AdminUser, ClientError> {
        self.get_data("/admin/me").await
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, ClientError> {
        self.get_data("/admin/dashboard-summary").await
    }

    pub async fn search(&self, query: &str) -> Result<SearchResults, ClientError> {
        expect_data(
            self.client
                .get_query::<ApiResponse<SearchResults>>("/admin/search", &[("q", query)])
                .await?,
        )
    }

    /// Uploads a resume document; returns its public URL.
    pub async fn upload_resume(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, ClientError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response: ApiResponse<Value> =
            self.client.post_multipart("/admin/upload-resume", form).await?;
        let url = response.url.clone();
        expect_ack(response)?;
        url.ok_or_else(|| ClientError::Decode("upload response carried no url".to_string()))
    }

    // ============= Whole-document sections =============

    pub async fn section<S: SectionDocument>(&self) -> Result<S, ClientError> {
        self.public.section::<S>().await
    }

    pub async fn update_section<S: SectionDocument>(&self, section: &S) -> Result<String, ClientError> {
        self.put_ack(&format!("/admin/{}", S::KEY), section).await
    }

    // ============= Skills =============

    pub async fn skills(&self) -> Result<SkillsByCategory, ClientError> {
        self.public.skills().await
    }

    pub async fn update_skills(&self, category: &str, skills: &[Skill]) -> Result<String, ClientError> {
        self.put_ack(&format!("/admin/skills/{}", category), skills).await
    }

    pub async fn delete_skill_category(&self, category: &str) -> Result<String, ClientError> {
        self.delete_ack(&format!("/admin/skills/{}", category)).await
    }

    // ============= Projects =============

    pub async fn projects(&self) -> Result<Vec<Project>, ClientError> {
        self.public.projects().await
    }

    pub async fn create_project(&self, draft: &ProjectDraft) -> Result<Project, ClientError> {
        expect_data(self.client.post("/admin/projects", draft).await?)
    }

    pub async fn update_project(&self, id: &str, update: &ProjectUpdate) -> Result<Project, ClientError> {
        expect_data(self.client.put(&format!("/admin/projects/{}", id), update).await?)
    }

    pub async fn delete_project(&self, id: &str) -> Result<String, ClientError> {
        self.delete_ack(&format!("/admin/projects/{}", id)).await
    }

    // ============= Learning journey =============

    pub async fn learning_journey(&self) -> Result<Vec<LearningPhase>, ClientError> {
        self.public.learning_journey().await
    }

    pub async fn create_learning_phase(
        &self,
        draft: &LearningPhaseDraft,
    ) -> Result<LearningPhase, ClientError> {
        expect_data(self.client.post("/admin/learning-journey", draft).await?)
    }

    pub async fn update_learning_phase(
        &self,
        id: &str,
        draft: &LearningPhaseDraft,
    ) -> Result<LearningPhase, ClientError> {
        expect_data(
            self.client
                .put(&format!("/admin/learning-journey/{}", id), draft)
                .await?,
        )
    }

    pub async fn delete_learning_phase(&self, id: &str) -> Result<String, ClientError> {
        self.delete_ack(&format!("/admin/learning-journey/{}", id)).await
    }

    // ============= Messages =============

    pub async fn messages(&self) -> Result<Vec<ContactMessage>, ClientError> {
        self.get_data("/admin/messages").await
    }

    pub async fn mark_message_read(&self, id: &str) -> Result<String, ClientError> {
        expect_ack(
            self.client
                .put_empty::<ApiResponse<Value>>(&format!("/admin/messages/{}/read", id))
                .await?,
        )
    }

    pub async fn delete_message(&self, id: &str) -> Result<String, ClientError> {
        self.delete_ack(&format!("/admin/messages/{}", id)).await
    }

    // ============= Notifications =============

    pub async fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        self.get_data("/admin/notifications").await
    }

    pub async fn mark_notification_read(&self, id: &str) -> Result<String, ClientError> {
        expect_ack(
            self.client
                .put_empty::<ApiResponse<Value>>(&format!("/admin/notifications/{}/read", id))
                .await?,
        )
    }

    pub async fn mark_all_notifications_read(&self) -> Result<String, ClientError> {
        expect_ack(
            self.client
                .post_empty::<ApiResponse<Value>>("/admin/notifications/mark-read")
                .await?,
        )
    }

    pub async fn clear_notifications(&self) -> Result<String, ClientError> {
        self.delete_ack("/admin/notifications").await
    }

    // ============= Admin users =============

    pub async fn admins(&self) -> Result<Vec<AdminUser>, ClientError> {
        self.get_data("/admin/users").await
    }

    pub async fn create_admin(&self, input: &AdminCreate) -> Result<AdminUser, ClientError> {
        expect_data(self.client.post("/admin/users", input).await?)
    }

    pub async fn delete_admin(&self, username: &str) -> Result<String, ClientError> {
        self.delete_ack(&format!("/admin/users/{}", username)).await
    }
}
