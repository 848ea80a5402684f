use decliker_shared::models::{Decliker, ProfessionOption};
use serde::{Deserialize, Serialize};

const DECLIKERS_QUERY: &str = r#"query { declikers { id name jobs geometry } }"#;
const PROFESSIONS_QUERY: &str = r#"query { professions { label value } }"#;

#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    pub query: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
}

impl<T> GraphQLResponse<T> {
    /// First reported error wins; a response without data is an error too.
    pub fn into_result(self) -> Result<T, String> {
        if let Some(errors) = self.errors {
            if let Some(first) = errors.into_iter().next() {
                return Err(first.message);
            }
        }
        self.data.ok_or_else(|| "No data returned".to_string())
    }
}

fn api_url() -> Result<String, String> {
    // Same origin as the page in production.
    let window = web_sys::window().ok_or("No window available")?;
    let origin = window
        .location()
        .origin()
        .map_err(|e| format!("Could not read page origin: {:?}", e))?;
    Ok(format!("{}/graphql", origin))
}

async fn query<T: for<'de> Deserialize<'de>>(query_str: &str) -> Result<T, String> {
    let req = GraphQLRequest {
        query: query_str.to_string(),
    };

    let resp = reqwest::Client::new()
        .post(api_url()?)
        .json(&req)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let gql_resp: GraphQLResponse<T> = resp.json().await.map_err(|e| e.to_string())?;
    gql_resp.into_result()
}

#[derive(Deserialize)]
pub struct DeclikersResponse {
    pub declikers: Vec<Decliker>,
}

pub async fn fetch_declikers() -> Result<Vec<Decliker>, String> {
    let resp: DeclikersResponse = query(DECLIKERS_QUERY).await?;
    Ok(resp.declikers)
}

#[derive(Deserialize)]
pub struct ProfessionsResponse {
    pub professions: Vec<ProfessionOption>,
}

pub async fn fetch_professions() -> Result<Vec<ProfessionOption>, String> {
    let resp: ProfessionsResponse = query(PROFESSIONS_QUERY).await?;
    Ok(resp.professions)
}
