pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod pages;
pub mod session;
pub mod token_store;

#[cfg(test)]
mod test_support;

pub use api::{BlogApi, HttpBlogApi};
pub use app::{BlogApp, NavItem};
pub use config::{load_settings, ClientSettings, Settings};
pub use error::{ApiCallError, StoreError};
pub use pages::{FormError, FormField, Page, PageController, PageKind};
pub use session::{decode_identity, SessionError, SessionManager};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_STORAGE_KEY};
