use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use glasshouse_types::models::Message;

use crate::{AppState, run_blocking};

/// Which home-page renderer the composition root selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderVariant {
    /// Message bodies are spliced into the markup unchanged, so stored
    /// markup (or script) renders live in the visitor's browser.
    Raw,
    /// Message bodies pass through [`escape_html`] first.
    Escaped,
}

#[derive(Debug, Deserialize)]
pub struct HomeForm {
    #[serde(default)]
    pub body: Option<String>,
}

pub async fn home(State(state): State<AppState>) -> Result<Html<String>, StatusCode> {
    let store = state.messages.clone();
    let messages = run_blocking(move || store.list()).await?;
    Ok(Html(render_home(&messages, state.render)))
}

pub async fn submit_message(
    State(state): State<AppState>,
    Form(form): Form<HomeForm>,
) -> Result<Response, StatusCode> {
    let body = form.body.as_deref().map(str::trim).unwrap_or_default().to_string();
    if body.is_empty() {
        return Ok(Redirect::to("/").into_response());
    }

    let store = state.messages.clone();
    run_blocking(move || store.insert(&body)).await?;
    Ok(Redirect::to("/").into_response())
}

/// Replace the five HTML-significant characters with entities.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn render_home(messages: &[Message], variant: RenderVariant) -> String {
    let items = if messages.is_empty() {
        r#"<div class="empty-state">No messages yet. Be the first to send one!</div>"#.to_string()
    } else {
        messages.iter().map(|msg| render_message(msg, variant)).collect()
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Messages</title>
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
      background: #f0f2f5;
      min-height: 100vh;
      padding: 2rem;
    }}
    .container {{ max-width: 800px; margin: 0 auto; }}
    .warning-banner {{
      background: #ff6b6b;
      color: white;
      padding: 1rem;
      border-radius: 8px;
      margin-bottom: 2rem;
      border-left: 4px solid #c92a2a;
    }}
    .card {{
      background: white;
      border-radius: 12px;
      box-shadow: 0 2px 12px rgba(0, 0, 0, 0.1);
      padding: 2rem;
    }}
    textarea {{
      width: 100%;
      padding: 0.75rem;
      border: 2px solid #e0e0e0;
      border-radius: 8px;
      font-family: inherit;
      min-height: 100px;
      margin-bottom: 1rem;
    }}
    button {{
      background: #4263eb;
      color: white;
      border: none;
      padding: 0.75rem 2rem;
      border-radius: 8px;
      cursor: pointer;
    }}
    .message-item {{
      background: #f8f9fa;
      border-left: 4px solid #4263eb;
      padding: 1rem;
      margin-bottom: 1rem;
      border-radius: 4px;
    }}
    .message-id {{ color: #999; font-size: 0.85rem; margin-bottom: 0.5rem; }}
    .message-body {{ color: #2c3e50; word-wrap: break-word; }}
    .empty-state {{ text-align: center; color: #999; padding: 3rem 0; font-style: italic; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="warning-banner">
      <h2>Deliberately breakable demo application</h2>
      <p>This service ships intentionally unsafe code paths for teaching.
      Never deploy it anywhere that matters.</p>
    </div>
    <div class="card">
      <h1>Messages</h1>
      <form method="POST" action="/">
        <textarea name="body" placeholder="Write your message here..." required></textarea>
        <button type="submit">Send</button>
      </form>
      <div class="messages-list">
        {items}
      </div>
    </div>
  </div>
</body>
</html>
"#
    )
}

fn render_message(msg: &Message, variant: RenderVariant) -> String {
    let body = match variant {
        RenderVariant::Raw => msg.body.clone(),
        RenderVariant::Escaped => escape_html(&msg.body),
    };
    format!(
        "<div class=\"message-item\">\n  <div class=\"message-id\">Message #{}</div>\n  <div class=\"message-body\">{}</div>\n</div>\n",
        msg.id, body,
    )
}
