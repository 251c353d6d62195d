//! HTTP access to the blog backend.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use shared::{
    domain::ArticleId,
    error::ApiError,
    protocol::{Article, CreateArticleRequest, Credentials, LoginResponse, UpdateArticleRequest},
};
use tracing::{debug, warn};
use url::Url;

use crate::{error::ApiCallError, token_store::TokenStore};

pub const DEFAULT_API_URL: &str = "http://localhost:8080/";

#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiCallError>;
    async fn register(&self, credentials: &Credentials) -> Result<(), ApiCallError>;
    async fn list_articles(&self) -> Result<Vec<Article>, ApiCallError>;
    async fn create_article(&self, request: &CreateArticleRequest) -> Result<(), ApiCallError>;
    async fn get_article(&self, id: ArticleId) -> Result<Article, ApiCallError>;
    async fn update_article(&self, request: &UpdateArticleRequest) -> Result<(), ApiCallError>;
    async fn delete_article(&self, id: ArticleId) -> Result<(), ApiCallError>;
}

/// Parses the configured base URL so that relative endpoint paths join under it.
pub fn parse_base_url(raw: &str) -> Result<Url, ApiCallError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|source| ApiCallError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })
}

pub struct HttpBlogApi {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl HttpBlogApi {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiCallError> {
        Ok(Self {
            http: Client::new(),
            base_url: parse_base_url(base_url)?,
            tokens,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiCallError> {
        self.base_url
            .join(path)
            .map_err(|source| ApiCallError::InvalidBaseUrl {
                url: format!("{}{path}", self.base_url),
                source,
            })
    }

    /// Attaches the persisted bearer token, when there is one, to an outgoing request.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.load() {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(err) => {
                warn!("sending request without authorization: {err}");
                request
            }
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiCallError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "api response");
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::new(status.as_u16(), body).into())
    }
}

#[async_trait]
impl BlogApi for HttpBlogApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiCallError> {
        let url = self.endpoint("login")?;
        let response = self.send(self.http.post(url).json(credentials)).await?;
        Ok(response.json().await?)
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), ApiCallError> {
        let url = self.endpoint("register")?;
        self.send(self.http.post(url).json(credentials)).await?;
        Ok(())
    }

    async fn list_articles(&self) -> Result<Vec<Article>, ApiCallError> {
        let url = self.endpoint("article")?;
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    async fn create_article(&self, request: &CreateArticleRequest) -> Result<(), ApiCallError> {
        let url = self.endpoint("article")?;
        self.send(self.http.post(url).json(request)).await?;
        Ok(())
    }

    async fn get_article(&self, id: ArticleId) -> Result<Article, ApiCallError> {
        let url = self.endpoint(&format!("article/{id}"))?;
        let response = self.send(self.http.get(url)).await?;
        Ok(response.json().await?)
    }

    async fn update_article(&self, request: &UpdateArticleRequest) -> Result<(), ApiCallError> {
        let url = self.endpoint("article")?;
        self.send(self.http.put(url).json(request)).await?;
        Ok(())
    }

    async fn delete_article(&self, id: ArticleId) -> Result<(), ApiCallError> {
        let url = self.endpoint(&format!("article/{id}"))?;
        self.send(self.http.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
