use askama::Template;
use axum::{http::StatusCode, response::Html};

use chanban_application::{
    ban::view::{BanEditView, BanListView},
    error::{AppError, AppResult},
};

#[derive(Template)]
#[template(path = "bans_list.html")]
pub struct BansListTemplate {
    pub view: BanListView,
}

#[derive(Template)]
#[template(path = "ban_edit.html")]
pub struct BanEditTemplate {
    pub view: BanEditView,
}

#[derive(Template)]
#[template(path = "ban_not_found.html")]
pub struct BanNotFoundTemplate;

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub status: u16,
    pub reason: &'static str,
    pub message: String,
}

impl ErrorTemplate {
    pub fn new(status: StatusCode, message: String) -> Self {
        Self {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
            message,
        }
    }
}

mod filters {
    use std::fmt::Display;

    /// Escapes markup characters only, leaving quotes readable in text nodes.
    #[allow(clippy::unnecessary_wraps)]
    pub fn text<T: Display + ?Sized>(s: &T) -> ::askama::Result<String> {
        let raw = s.to_string();
        let mut escaped = String::with_capacity(raw.len());
        for c in raw.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                _ => escaped.push(c),
            }
        }
        Ok(escaped)
    }
}

pub fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    template
        .render()
        .map(Html)
        .map_err(|e| AppError::TemplateError {
            message: e.to_string(),
        })
}
