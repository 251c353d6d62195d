use std::fmt::Write as _;

use client_core::{BlogApp, FormField, NavItem, Page, PageKind};
use shared::protocol::Article;

const RULE: &str = "------------------------------------------------------------";

fn page_title(kind: PageKind) -> &'static str {
    match kind {
        PageKind::Articles => "Latest articles",
        PageKind::Login => "Log in",
        PageKind::Register => "Register",
        PageKind::CreateArticle => "New article",
    }
}

fn nav_label(item: &NavItem) -> String {
    match item {
        NavItem::Greeting(text) => text.clone(),
        NavItem::Link(kind) => format!("[{kind}]"),
        NavItem::Logout => "[logout]".to_string(),
    }
}

fn masked(value: &str) -> String {
    "*".repeat(value.chars().count())
}

fn field_line(out: &mut String, field: FormField, value: &str) {
    let shown = match field {
        FormField::Password => masked(value),
        FormField::Login | FormField::Text | FormField::Title => value.to_string(),
    };
    let _ = writeln!(out, "  {:<9} {shown}", format!("{}:", field.name()));
}

fn article_card(out: &mut String, article: &Article) {
    let _ = writeln!(out, "#{} {}", article.id, article.author);
    for line in article.text.lines() {
        let _ = writeln!(out, "    {line}");
    }
}

/// Renders the whole screen for the current view state.
pub fn render(app: &BlogApp, status: &str) -> String {
    let mut out = String::new();
    let nav: Vec<String> = app.nav_links().iter().map(nav_label).collect();
    let _ = writeln!(out, "{RULE}\nBlog | {}\n{RULE}", nav.join("  "));

    let kind = app.page_kind();
    let _ = writeln!(out, "{}", page_title(kind));
    if let Some(error) = app.error() {
        let _ = writeln!(out, "! {error}");
    }

    match app.page() {
        Page::Articles => {
            if app.can_create_article() {
                let _ = writeln!(out, "(+ new article: `new`)");
            }
            if app.articles().is_empty() {
                let _ = writeln!(out, "No articles yet.");
            }
            for article in app.articles() {
                article_card(&mut out, article);
            }
        }
        page => {
            for &field in page.fields() {
                field_line(&mut out, field, page.field(field).unwrap_or_default());
            }
            match page.kind() {
                PageKind::Login => {
                    let _ = writeln!(out, "No account? `register`");
                }
                PageKind::Register => {
                    let _ = writeln!(out, "Login at least 5 characters, password at least 8.");
                    let _ = writeln!(out, "Have an account? `login`");
                }
                PageKind::Articles | PageKind::CreateArticle => {}
            }
        }
    }

    if !status.is_empty() {
        let _ = writeln!(out, "{status}");
    }
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use client_core::{HttpBlogApi, MemoryTokenStore, TokenStore};

    use super::*;

    fn offline_app(token: Option<&str>) -> BlogApp {
        let tokens: Arc<dyn TokenStore> = match token {
            Some(token) => Arc::new(MemoryTokenStore::with_token(token)),
            None => Arc::new(MemoryTokenStore::default()),
        };
        let api = HttpBlogApi::new("http://127.0.0.1:9", tokens.clone()).expect("api");
        BlogApp::new(Arc::new(api), tokens)
    }

    #[test]
    fn anonymous_article_list_shows_login_links_only() {
        let app = offline_app(None);
        let screen = render(&app, "");
        assert!(screen.contains("[articles]  [login]  [register]"));
        assert!(screen.contains("Latest articles"));
        assert!(screen.contains("No articles yet."));
        assert!(!screen.contains("new article"));
    }

    #[test]
    fn password_is_masked_on_forms() {
        let mut app = offline_app(None);
        app.navigate(PageKind::Login);
        app.set_field(FormField::Login, "alice");
        app.set_field(FormField::Password, "secret12");

        let screen = render(&app, "hint");
        assert!(screen.contains("alice"));
        assert!(screen.contains("********"));
        assert!(!screen.contains("secret12"));
        assert!(screen.ends_with("hint\n"));
    }

    #[test]
    fn article_form_shows_title_and_text() {
        let mut app = offline_app(Some("h.eyJsb2dpbiI6ImFsaWNlIn0.s"));
        app.navigate(PageKind::CreateArticle);
        app.set_field(FormField::Title, "Monday");
        app.set_field(FormField::Text, "first post");

        let screen = render(&app, "");
        assert!(screen.contains("title:    Monday"));
        assert!(screen.contains("text:     first post"));
        let title_at = screen.find("title:").expect("title line");
        let text_at = screen.find("text:").expect("text line");
        assert!(title_at < text_at);
    }

    #[tokio::test]
    async fn signed_in_header_greets_user() {
        // payload {"login":"alice"}
        let mut app = offline_app(Some("h.eyJsb2dpbiI6ImFsaWNlIn0.s"));
        app.start().await;

        let screen = render(&app, "");
        assert!(screen.contains("Hello, alice!  [articles]  [logout]"));
        assert!(screen.contains("(+ new article: `new`)"));
        assert!(screen.contains("! Failed to load articles"));
    }
}
