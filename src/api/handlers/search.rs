use crate::{
    auth::middleware::AuthAdmin,
    db::PortfolioStore,
    types::{
        ApiResponse, AppError, ContactSection, Education, Experience, Experiments, Footer,
        GrowthMindset, Profile, Result, SearchResults, SectionDocument,
    },
    AppState,
};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

/// Keys whose values are identifiers, timestamps or asset URLs, never prose.
const IGNORED_KEYS: [&str; 6] = ["id", "createdAt", "updatedAt", "image", "profileImage", "icon"];

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// True when any string inside `value` contains `needle` (already lowercased).
fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.to_lowercase().contains(needle),
        Value::Array(items) => items.iter().any(|v| contains_text(v, needle)),
        Value::Object(map) => map
            .iter()
            .filter(|(key, _)| !IGNORED_KEYS.contains(&key.as_str()))
            .any(|(_, v)| contains_text(v, needle)),
        _ => false,
    }
}

async fn search_document<S: SectionDocument>(
    store: &PortfolioStore,
    needle: &str,
) -> Result<Vec<Value>> {
    Ok(store
        .get_section_value(S::KEY)
        .await?
        .filter(|doc| contains_text(doc, needle))
        .into_iter()
        .collect())
}

fn to_values<T: serde::Serialize>(items: &[T], needle: &str) -> Vec<Value> {
    items
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .filter(|v| contains_text(v, needle))
        .collect()
}

/// Case-insensitive substring search across every section.
pub async fn search_portfolio(store: &PortfolioStore, query: &str) -> Result<SearchResults> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query must not be empty".to_string(),
        ));
    }

    let mut skills = Vec::new();
    for (category, list) in store.get_skills().await? {
        let category_hit = category.to_lowercase().contains(&needle);
        for skill in list {
            if category_hit || skill.name.to_lowercase().contains(&needle) {
                skills.push(json!({
                    "category": category,
                    "name": skill.name,
                    "proficiency": skill.proficiency,
                }));
            }
        }
    }

    Ok(SearchResults {
        profile: search_document::<Profile>(store, &needle).await?,
        projects: to_values(&store.list_projects().await?, &needle),
        skills,
        education: search_document::<Education>(store, &needle).await?,
        experience: search_document::<Experience>(store, &needle).await?,
        learning_journey: to_values(&store.list_learning_phases().await?, &needle),
        growth_mindset: search_document::<GrowthMindset>(store, &needle).await?,
        experiments: search_document::<Experiments>(store, &needle).await?,
        contact: search_document::<ContactSection>(store, &needle).await?,
        footer: search_document::<Footer>(store, &needle).await?,
    })
}

pub async fn search(
    State(state): State<AppState>,
    AuthAdmin(_claims): AuthAdmin,
    Query(params): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResults>>> {
    let query = params.q.unwrap_or_default();
    let results = search_portfolio(&state.store, &query).await?;

    let message = if results.is_empty() {
        format!("No results for '{}'", query.trim())
    } else {
        format!("Results for '{}'", query.trim())
    };

    Ok(Json(ApiResponse::ok(results).with_message(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::seed_portfolio;

    #[test]
    fn test_contains_text_skips_identifiers() {
        let doc = json!({"id": "python-123", "title": "Analyzer", "tags": ["Rust"]});

        assert!(contains_text(&doc, "rust"));
        assert!(contains_text(&doc, "analy"));
        assert!(!contains_text(&doc, "python"));
    }

    #[tokio::test]
    async fn test_search_groups_hits_by_section() {
        let store = PortfolioStore::new_memory().await.unwrap();
        seed_portfolio(&store).await.unwrap();

        let results = search_portfolio(&store, "PYTHON").await.unwrap();

        assert_eq!(results.projects.len(), 2);
        assert_eq!(results.learning_journey.len(), 1);
        assert!(results
            .skills
            .iter()
            .any(|s| s["category"] == "programming" && s["name"] == "Python"));
        assert!(results.footer.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_rejected() {
        let store = PortfolioStore::new_memory().await.unwrap();
        assert!(matches!(
            search_portfolio(&store, "   ").await,
            Err(AppError::InvalidInput(_))
        ));
    }
}
