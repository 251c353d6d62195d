//! Page selection, per-page form state and the article list.

use std::{fmt, str::FromStr};

use shared::protocol::{Article, CreateArticleRequest};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::BlogApi;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MIN_LOGIN_LEN: usize = 5;

pub const ARTICLES_LOAD_FAILED: &str = "Failed to load articles";
pub const ARTICLE_CREATE_FAILED: &str = "Failed to create article";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Articles,
    Login,
    Register,
    CreateArticle,
}

impl PageKind {
    pub const ALL: [PageKind; 4] = [
        PageKind::Articles,
        PageKind::Login,
        PageKind::Register,
        PageKind::CreateArticle,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Articles => "articles",
            Self::Login => "login",
            Self::Register => "register",
            Self::CreateArticle => "create-article",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown page '{0}'")]
pub struct UnknownPage(pub String);

impl FromStr for PageKind {
    type Err = UnknownPage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownPage(s.to_string()))
    }
}

/// Local validation failures; the message is what the user sees.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    #[error("Login must be at least 5 characters")]
    LoginTooShort,
    #[error("Please fill in all fields")]
    MissingCredentials,
    #[error("Article text must not be empty")]
    EmptyArticle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Login,
    Password,
    Text,
    Title,
}

impl FormField {
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Password => "password",
            Self::Text => "text",
            Self::Title => "title",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FormField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Self::Login),
            "password" => Ok(Self::Password),
            "text" => Ok(Self::Text),
            "title" => Ok(Self::Title),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub login: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.login.is_empty() || self.password.is_empty() {
            return Err(FormError::MissingCredentials);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub login: String,
    pub password: String,
}

impl RegisterForm {
    /// The password rule is checked first so its message wins over the login rule.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        if self.login.chars().count() < MIN_LOGIN_LEN {
            return Err(FormError::LoginTooShort);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleForm {
    pub text: String,
    pub title: String,
}

impl ArticleForm {
    pub fn validate(&self) -> Result<(), FormError> {
        if self.text.is_empty() {
            return Err(FormError::EmptyArticle);
        }
        Ok(())
    }
}

/// The visible view together with the form it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Page {
    #[default]
    Articles,
    Login(LoginForm),
    Register(RegisterForm),
    CreateArticle(ArticleForm),
}

impl Page {
    pub fn fresh(kind: PageKind) -> Self {
        match kind {
            PageKind::Articles => Self::Articles,
            PageKind::Login => Self::Login(LoginForm::default()),
            PageKind::Register => Self::Register(RegisterForm::default()),
            PageKind::CreateArticle => Self::CreateArticle(ArticleForm::default()),
        }
    }

    pub fn kind(&self) -> PageKind {
        match self {
            Self::Articles => PageKind::Articles,
            Self::Login(_) => PageKind::Login,
            Self::Register(_) => PageKind::Register,
            Self::CreateArticle(_) => PageKind::CreateArticle,
        }
    }

    /// Writes a field of the active form. Returns `false` when the page has no
    /// such field.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> bool {
        let slot = match (self, field) {
            (Self::Login(form), FormField::Login) => &mut form.login,
            (Self::Login(form), FormField::Password) => &mut form.password,
            (Self::Register(form), FormField::Login) => &mut form.login,
            (Self::Register(form), FormField::Password) => &mut form.password,
            (Self::CreateArticle(form), FormField::Text) => &mut form.text,
            (Self::CreateArticle(form), FormField::Title) => &mut form.title,
            _ => return false,
        };
        *slot = value.into();
        true
    }

    /// Fields of the active form, in display order.
    pub fn fields(&self) -> &'static [FormField] {
        match self {
            Self::Articles => &[],
            Self::Login(_) | Self::Register(_) => &[FormField::Login, FormField::Password],
            Self::CreateArticle(_) => &[FormField::Title, FormField::Text],
        }
    }

    pub fn field(&self, field: FormField) -> Option<&str> {
        let value = match (self, field) {
            (Self::Login(form), FormField::Login) => &form.login,
            (Self::Login(form), FormField::Password) => &form.password,
            (Self::Register(form), FormField::Login) => &form.login,
            (Self::Register(form), FormField::Password) => &form.password,
            (Self::CreateArticle(form), FormField::Text) => &form.text,
            (Self::CreateArticle(form), FormField::Title) => &form.title,
            _ => return None,
        };
        Some(value)
    }
}

#[derive(Debug, Default)]
pub struct PageController {
    page: Page,
    articles: Vec<Article>,
    error: Option<String>,
}

impl PageController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn kind(&self) -> PageKind {
        self.page.kind()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Switches the visible page. The error line is left as is.
    pub fn navigate(&mut self, kind: PageKind) {
        debug!(from = %self.page.kind(), to = %kind, "navigate");
        self.page = Page::fresh(kind);
    }

    /// Shows the login page with the just-registered login filled in.
    pub fn show_login_for(&mut self, login: impl Into<String>) {
        self.page = Page::Login(LoginForm {
            login: login.into(),
            password: String::new(),
        });
    }

    /// Replaces the article list with the server's. Returns whether it succeeded.
    pub async fn fetch_articles(&mut self, api: &dyn BlogApi) -> bool {
        match api.list_articles().await {
            Ok(articles) => {
                debug!(count = articles.len(), "articles loaded");
                self.articles = articles;
                true
            }
            Err(err) => {
                warn!("failed to load articles: {err}");
                self.set_error(ARTICLES_LOAD_FAILED);
                false
            }
        }
    }

    /// Publishes the text of the article form, then reloads the list.
    ///
    /// A failed call keeps the typed text. Does nothing unless the article form
    /// is the active page.
    pub async fn create_article(&mut self, api: &dyn BlogApi) -> bool {
        let Page::CreateArticle(form) = &self.page else {
            debug!(page = %self.page.kind(), "create_article ignored outside article form");
            return false;
        };
        if let Err(err) = form.validate() {
            self.set_error(err.to_string());
            return false;
        }
        let request = CreateArticleRequest {
            text: form.text.clone(),
        };

        if let Err(err) = api.create_article(&request).await {
            warn!("failed to create article: {err}");
            self.set_error(ARTICLE_CREATE_FAILED);
            return false;
        }

        info!("article published");
        if let Page::CreateArticle(form) = &mut self.page {
            form.text.clear();
        }
        self.clear_error();
        self.fetch_articles(api).await;
        true
    }
}

#[cfg(test)]
#[path = "tests/pages_tests.rs"]
mod tests;
