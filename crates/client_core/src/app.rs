//! The running view: owns session and page state and applies user actions to them.

use std::sync::Arc;

use shared::{domain::Identity, protocol::Article};
use tracing::debug;

use crate::{
    api::{BlogApi, HttpBlogApi},
    config::ClientSettings,
    error::ApiCallError,
    pages::{FormField, Page, PageController, PageKind},
    session::{SessionManager, REGISTRATION_SUCCEEDED},
    token_store::{FileTokenStore, TokenStore},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    Greeting(String),
    Link(PageKind),
    Logout,
}

pub struct BlogApp {
    api: Arc<dyn BlogApi>,
    session: SessionManager,
    pages: PageController,
}

impl BlogApp {
    pub fn new(api: Arc<dyn BlogApi>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            session: SessionManager::new(tokens),
            pages: PageController::new(),
        }
    }

    /// Wires the HTTP API and the file token store described by `settings`.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, ApiCallError> {
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::in_dir(&settings.data_dir));
        let api = HttpBlogApi::new(&settings.api_url, tokens.clone())?;
        Ok(Self::new(Arc::new(api), tokens))
    }

    /// Restores the session and loads the first article list.
    pub async fn start(&mut self) {
        self.session.restore();
        self.pages.fetch_articles(self.api.as_ref()).await;
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.session.identity()
    }

    pub fn page(&self) -> &Page {
        self.pages.page()
    }

    pub fn page_kind(&self) -> PageKind {
        self.pages.kind()
    }

    pub fn articles(&self) -> &[Article] {
        self.pages.articles()
    }

    pub fn error(&self) -> Option<&str> {
        self.pages.error()
    }

    /// Header entries for the current identity.
    pub fn nav_links(&self) -> Vec<NavItem> {
        match self.session.identity() {
            Some(identity) => vec![
                NavItem::Greeting(format!("Hello, {}!", identity.login)),
                NavItem::Link(PageKind::Articles),
                NavItem::Logout,
            ],
            None => vec![
                NavItem::Link(PageKind::Articles),
                NavItem::Link(PageKind::Login),
                NavItem::Link(PageKind::Register),
            ],
        }
    }

    /// Whether the article list offers the "new article" action.
    pub fn can_create_article(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn navigate(&mut self, kind: PageKind) {
        self.pages.navigate(kind);
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> bool {
        self.pages.page_mut().set_field(field, value)
    }

    pub async fn refresh_articles(&mut self) {
        self.pages.fetch_articles(self.api.as_ref()).await;
    }

    /// Submits whichever form the active page shows.
    pub async fn submit(&mut self) {
        match self.pages.kind() {
            PageKind::Articles => debug!("nothing to submit on the article list"),
            PageKind::Login => self.submit_login().await,
            PageKind::Register => self.submit_register().await,
            PageKind::CreateArticle => self.submit_article().await,
        }
    }

    pub async fn submit_login(&mut self) {
        let Page::Login(form) = self.pages.page() else {
            return;
        };
        let form = form.clone();
        match self.session.login(self.api.as_ref(), &form).await {
            Ok(_) => self.pages.navigate(PageKind::Articles),
            Err(err) => self.pages.set_error(err.to_string()),
        }
    }

    pub async fn submit_register(&mut self) {
        let Page::Register(form) = self.pages.page() else {
            return;
        };
        let form = form.clone();
        match self.session.register(self.api.as_ref(), &form).await {
            Ok(()) => {
                self.pages.set_error(REGISTRATION_SUCCEEDED);
                self.pages.show_login_for(form.login);
            }
            Err(err) => self.pages.set_error(err.to_string()),
        }
    }

    pub async fn submit_article(&mut self) {
        self.pages.create_article(self.api.as_ref()).await;
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.pages.navigate(PageKind::Articles);
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
