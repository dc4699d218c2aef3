use anyhow::{Context, Result, bail};

use ladle_core::dummyjson::{RecipeData, RecipeListResponse};

const BASE_URL: &str = "https://dummyjson.com/recipes";

pub struct DummyJsonClient {
    client: reqwest::Client,
}

impl DummyJsonClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!(
                "ladle-cli/{} (recipe browser)",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(10))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self { client }
    }

    pub async fn list_async(&self) -> Result<Vec<RecipeData>> {
        let resp = self
            .client
            .get(BASE_URL)
            .send()
            .await
            .context("Failed to reach recipe API")?;

        let data: RecipeListResponse = resp
            .json()
            .await
            .context("Failed to parse recipe list response")?;

        Ok(data.recipes)
    }

    pub async fn search_async(&self, query: &str) -> Result<Vec<RecipeData>> {
        let url = format!("{BASE_URL}/search");
        let resp = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .context("Failed to reach recipe API")?;

        let data: RecipeListResponse = resp
            .json()
            .await
            .context("Failed to parse recipe search response")?;

        Ok(data.recipes)
    }

    /// Fetch recipes for a cuisine via the tag endpoint, falling back to
    /// filtering the full list by cuisine name when the tag has no matches.
    pub async fn by_cuisine_async(&self, cuisine: &str) -> Result<Vec<RecipeData>> {
        let url = format!("{BASE_URL}/tag/{cuisine}");
        let tagged = match self.client.get(&url).send().await {
            Ok(resp) => resp
                .json::<RecipeListResponse>()
                .await
                .map(|data| data.recipes)
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        };
        if !tagged.is_empty() {
            return Ok(tagged);
        }

        tracing::debug!("tag endpoint had no matches for '{cuisine}', filtering the full list");
        let all = self.list_async().await?;
        Ok(all
            .into_iter()
            .filter(|r| r.cuisine.eq_ignore_ascii_case(cuisine))
            .collect())
    }

    pub async fn get_async(&self, id: i64) -> Result<RecipeData> {
        let url = format!("{BASE_URL}/{id}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach recipe API")?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            bail!("No recipe with id {id}");
        }

        let recipe: RecipeData = resp
            .json()
            .await
            .context("Failed to parse recipe response")?;

        Ok(recipe)
    }
}
