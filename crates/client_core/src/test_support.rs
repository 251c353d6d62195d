//! In-process blog backend for tests.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde_json::Value;
use shared::{
    domain::ArticleId,
    protocol::{
        Article, CreateArticleRequest, Credentials, LoginResponse, TokenClaims,
        UpdateArticleRequest,
    },
};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{api::HttpBlogApi, token_store::TokenStore};

const TEST_SECRET: &[u8] = b"blog-test-secret";

pub fn mint_token(login: &str) -> String {
    let claims = TokenClaims {
        login: login.to_string(),
        exp: Some(4_102_444_800),
        iat: Some(1_700_000_000),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET),
    )
    .expect("encode token")
}

fn verified_login(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(TEST_SECRET),
        &Validation::default(),
    )
    .ok()?;
    Some(data.claims.login)
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct MockState {
    pub users: HashMap<String, String>,
    pub articles: Vec<Article>,
    pub requests: Vec<RecordedRequest>,
    pub fail_list: bool,
    pub fail_create: bool,
    pub login_token: Option<String>,
    pub register_rejection: Option<(StatusCode, String)>,
}

impl MockState {
    fn record(
        &mut self,
        method: &'static str,
        path: impl Into<String>,
        headers: &HeaderMap,
        body: Option<Value>,
    ) {
        self.requests.push(RecordedRequest {
            method,
            path: path.into(),
            authorization: headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body,
        });
    }

    fn next_article_id(&self) -> ArticleId {
        ArticleId(self.articles.iter().map(|a| a.id.0).max().unwrap_or(0) + 1)
    }
}

#[derive(Clone, Default)]
pub struct MockBlog {
    pub state: Arc<Mutex<MockState>>,
}

impl MockBlog {
    pub async fn with_user(self, login: &str, password: &str) -> Self {
        self.state
            .lock()
            .await
            .users
            .insert(login.to_string(), password.to_string());
        self
    }

    pub async fn with_article(self, author: &str, text: &str) -> Self {
        {
            let mut state = self.state.lock().await;
            let id = state.next_article_id();
            state.articles.push(Article {
                id,
                author: author.to_string(),
                user_id: None,
                text: text.to_string(),
            });
        }
        self
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }
}

async fn handle_login(
    State(blog): State<MockBlog>,
    headers: HeaderMap,
    Json(credentials): Json<Credentials>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let mut state = blog.state.lock().await;
    state.record("POST", "/login", &headers, None);
    if state.users.get(&credentials.login) != Some(&credentials.password) {
        return Err((StatusCode::UNAUTHORIZED, "invalid credentials".to_string()));
    }
    let token = state
        .login_token
        .clone()
        .unwrap_or_else(|| mint_token(&credentials.login));
    Ok(Json(LoginResponse { token }))
}

async fn handle_register(
    State(blog): State<MockBlog>,
    headers: HeaderMap,
    Json(credentials): Json<Credentials>,
) -> (StatusCode, String) {
    let mut state = blog.state.lock().await;
    state.record("POST", "/register", &headers, None);
    if let Some(rejection) = state.register_rejection.clone() {
        return rejection;
    }
    state.users.insert(credentials.login, credentials.password);
    (StatusCode::CREATED, String::new())
}

async fn handle_list(
    State(blog): State<MockBlog>,
    headers: HeaderMap,
) -> Result<Json<Vec<Article>>, StatusCode> {
    let mut state = blog.state.lock().await;
    state.record("GET", "/article", &headers, None);
    if state.fail_list {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(state.articles.clone()))
}

async fn handle_create(
    State(blog): State<MockBlog>,
    headers: HeaderMap,
    Json(request): Json<CreateArticleRequest>,
) -> (StatusCode, String) {
    let mut state = blog.state.lock().await;
    let body = serde_json::to_value(&request).ok();
    state.record("POST", "/article", &headers, body);
    let Some(login) = verified_login(&headers) else {
        return (StatusCode::UNAUTHORIZED, "Invalid token".to_string());
    };
    if state.fail_create {
        return (StatusCode::INTERNAL_SERVER_ERROR, String::new());
    }
    let id = state.next_article_id();
    state.articles.push(Article {
        id,
        author: login,
        user_id: None,
        text: request.text,
    });
    (StatusCode::CREATED, String::new())
}

async fn handle_get(
    State(blog): State<MockBlog>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Article>, StatusCode> {
    let mut state = blog.state.lock().await;
    state.record("GET", format!("/article/{id}"), &headers, None);
    state
        .articles
        .iter()
        .find(|a| a.id == ArticleId(id))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn handle_update(
    State(blog): State<MockBlog>,
    headers: HeaderMap,
    Json(request): Json<UpdateArticleRequest>,
) -> (StatusCode, String) {
    let mut state = blog.state.lock().await;
    let body = serde_json::to_value(&request).ok();
    state.record("PUT", "/article", &headers, body);
    let Some(login) = verified_login(&headers) else {
        return (StatusCode::UNAUTHORIZED, "Invalid token".to_string());
    };
    match state.articles.iter_mut().find(|a| a.id == request.id) {
        Some(article) if article.author == login => {
            article.text = request.text;
            (StatusCode::OK, String::new())
        }
        Some(_) => (StatusCode::BAD_REQUEST, "not your article".to_string()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

async fn handle_delete(
    State(blog): State<MockBlog>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> (StatusCode, String) {
    let mut state = blog.state.lock().await;
    state.record("DELETE", format!("/article/{id}"), &headers, None);
    let Some(login) = verified_login(&headers) else {
        return (StatusCode::UNAUTHORIZED, "Invalid token".to_string());
    };
    let Some(pos) = state.articles.iter().position(|a| a.id == ArticleId(id)) else {
        return (StatusCode::NOT_FOUND, String::new());
    };
    if state.articles[pos].author != login {
        return (StatusCode::BAD_REQUEST, "not your article".to_string());
    }
    state.articles.remove(pos);
    (StatusCode::OK, String::new())
}

/// Serves `blog` on an ephemeral local port and returns its base URL.
pub async fn spawn_blog_server(blog: MockBlog) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = Router::new()
        .route("/login", post(handle_login))
        .route("/register", post(handle_register))
        .route(
            "/article",
            get(handle_list).post(handle_create).put(handle_update),
        )
        .route("/article/:id", get(handle_get).delete(handle_delete))
        .with_state(blog);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

pub fn http_api(server_url: &str, tokens: Arc<dyn TokenStore>) -> Arc<HttpBlogApi> {
    Arc::new(HttpBlogApi::new(server_url, tokens).expect("api"))
}
