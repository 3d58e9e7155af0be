use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Query for `GET /api/background`.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ResolveParams {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
}

impl ResolveParams {
    pub fn path(path: &str) -> Self {
        Self {
            path: path.to_string(),
            ..Self::default()
        }
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn category(mut self, slug: &str) -> Self {
        self.category = Some(slug.to_string());
        self
    }

    pub fn product(mut self, slug: &str) -> Self {
        self.product = Some(slug.to_string());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResolvedResponse {
    pub desktop_url: Option<String>,
    pub mobile_url: Option<String>,
    pub overlay_opacity: f64,
    /// "route_rule", "entity", "parent_category", "site_default" or "hard_default".
    pub tier: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

pub struct BackgroundClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl BackgroundClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Authenticate admin calls with a bearer key.
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    /// Resolve the background for a page.
    pub async fn resolve(&self, params: &ResolveParams) -> Result<ResolvedResponse, Box<dyn std::error::Error>> {
        let resp = self
            .client
            .get(format!("{}/api/background", self.base_url))
            .query(params)
            .send()
            .await?;
        Self::json(resp).await
    }

    pub async fn status(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let resp = self.admin(self.client.get(self.url("/admin/status"))).send().await?;
        Self::json(resp).await
    }

    pub async fn list_routes(&self) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
        let resp = self.admin(self.client.get(self.url("/admin/routes"))).send().await?;
        Self::json(resp).await
    }

    /// Create a route rule, returning `{"id": ..., "rule": ...}`.
    pub async fn create_route(&self, rule: &Value) -> Result<Value, Box<dyn std::error::Error>> {
        let resp = self
            .admin(self.client.post(self.url("/admin/routes")))
            .json(rule)
            .send()
            .await?;
        Self::json(resp).await
    }

    pub async fn update_route(&self, id: &str, rule: &Value) -> Result<Value, Box<dyn std::error::Error>> {
        let resp = self
            .admin(self.client.put(self.url(&format!("/admin/routes/{id}"))))
            .json(rule)
            .send()
            .await?;
        Self::json(resp).await
    }

    pub async fn delete_route(&self, id: &str) -> Result<(), Box<dyn std::error::Error>> {
        let resp = self
            .admin(self.client.delete(self.url(&format!("/admin/routes/{id}"))))
            .send()
            .await?;
        Self::empty(resp).await
    }

    pub async fn set_site_default(&self, background: &Value) -> Result<Value, Box<dyn std::error::Error>> {
        let resp = self
            .admin(self.client.put(self.url("/admin/site-default")))
            .json(background)
            .send()
            .await?;
        Self::json(resp).await
    }

    pub async fn put_category(&self, slug: &str, background: &Value) -> Result<Value, Box<dyn std::error::Error>> {
        let resp = self
            .admin(self.client.put(self.url(&format!("/admin/categories/{slug}"))))
            .json(background)
            .send()
            .await?;
        Self::json(resp).await
    }

    pub async fn put_product(&self, slug: &str, product: &Value) -> Result<Value, Box<dyn std::error::Error>> {
        let resp = self
            .admin(self.client.put(self.url(&format!("/admin/products/{slug}"))))
            .json(product)
            .send()
            .await?;
        Self::json(resp).await
    }

    pub async fn delete_category(&self, slug: &str) -> Result<(), Box<dyn std::error::Error>> {
        let resp = self
            .admin(self.client.delete(self.url(&format!("/admin/categories/{slug}"))))
            .send()
            .await?;
        Self::empty(resp).await
    }

    pub async fn delete_product(&self, slug: &str) -> Result<(), Box<dyn std::error::Error>> {
        let resp = self
            .admin(self.client.delete(self.url(&format!("/admin/products/{slug}"))))
            .send()
            .await?;
        Self::empty(resp).await
    }

    /// Raw GET, for asserting on status codes.
    pub async fn get(&self, path: &str) -> Result<Response, reqwest::Error> {
        self.admin(self.client.get(self.url(path))).send().await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn admin(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    async fn json<T: for<'de> Deserialize<'de>>(resp: Response) -> Result<T, Box<dyn std::error::Error>> {
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(format!("service returned error status {}: {}", status, text).into());
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn empty(resp: Response) -> Result<(), Box<dyn std::error::Error>> {
        let status = resp.status();
        if status != StatusCode::NO_CONTENT && !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(format!("service returned error status {}: {}", status, text).into());
        }
        Ok(())
    }
}
