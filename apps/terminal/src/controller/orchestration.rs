//! Applies prompt commands to the running view.

use client_core::{BlogApp, PageKind};

use crate::controller::commands::{UiCommand, HELP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs one command. `status` receives a hint for commands the view refuses;
/// it is cleared otherwise.
pub async fn apply_command(app: &mut BlogApp, cmd: UiCommand, status: &mut String) -> Flow {
    status.clear();
    tracing::debug!(command = cmd.name(), "applying command");

    match cmd {
        UiCommand::Navigate(PageKind::CreateArticle) if !app.can_create_article() => {
            *status = "Log in to write articles".to_string();
        }
        UiCommand::Navigate(kind) => app.navigate(kind),
        UiCommand::Set { field, value } => {
            if !app.set_field(field, value) {
                *status = format!("The {} page has no {} field", app.page_kind(), field.name());
            }
        }
        UiCommand::Submit => app.submit().await,
        UiCommand::Refresh => app.refresh_articles().await,
        UiCommand::Logout if app.identity().is_none() => {
            *status = "Not logged in".to_string();
        }
        UiCommand::Logout => app.logout(),
        UiCommand::Help => *status = HELP.to_string(),
        UiCommand::Quit => return Flow::Quit,
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use client_core::{FormField, HttpBlogApi, MemoryTokenStore, TokenStore};

    use super::*;

    fn offline_app() -> BlogApp {
        let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::default());
        let api = HttpBlogApi::new("http://127.0.0.1:9", tokens.clone()).expect("api");
        BlogApp::new(Arc::new(api), tokens)
    }

    #[tokio::test]
    async fn anonymous_user_cannot_open_article_form_or_log_out() {
        let mut app = offline_app();
        let mut status = String::new();

        let flow = apply_command(
            &mut app,
            UiCommand::Navigate(PageKind::CreateArticle),
            &mut status,
        )
        .await;
        assert_eq!(flow, Flow::Continue);
        assert_eq!(app.page_kind(), PageKind::Articles);
        assert_eq!(status, "Log in to write articles");

        apply_command(&mut app, UiCommand::Logout, &mut status).await;
        assert_eq!(status, "Not logged in");
    }

    #[tokio::test]
    async fn set_on_wrong_page_reports_hint_and_next_command_clears_it() {
        let mut app = offline_app();
        let mut status = String::new();

        apply_command(
            &mut app,
            UiCommand::Set {
                field: FormField::Text,
                value: "x".into(),
            },
            &mut status,
        )
        .await;
        assert_eq!(status, "The articles page has no text field");

        apply_command(&mut app, UiCommand::Navigate(PageKind::Login), &mut status).await;
        assert!(status.is_empty());
        assert_eq!(app.page_kind(), PageKind::Login);
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let mut app = offline_app();
        let mut status = String::new();
        assert_eq!(
            apply_command(&mut app, UiCommand::Quit, &mut status).await,
            Flow::Quit
        );
    }
}
