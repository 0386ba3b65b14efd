//! HTML page handlers
//!
//! The pages are thin shells; everything interesting happens against the
//! JSON API. Guarded pages take `Option<SessionUser>` and redirect to the
//! login page instead of returning a JSON 401.

use axum::{
    extract::Path,
    response::{Html, IntoResponse, Redirect},
};
use tracing::debug;

use crate::auth::SessionUser;
use crate::common::{escape_html, safe_email_log};

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{title} - Qerrastar</title>
</head>
<body>
  <nav>
    <a href="/">Home</a>
    <a href="/search">Search</a>
    <a href="/quiz">Quiz</a>
    <a href="/summary">Summary</a>
    <a href="/converter">Converter</a>
    <a href="/docs">Docs</a>
    <a href="/login">Login</a>
  </nav>
  <main>
{body}
  </main>
</body>
</html>"#,
    ))
}

pub async fn index_page() -> Html<String> {
    page(
        "Home",
        r#"    <h1>Qerrastar</h1>
    <p>Search the web, quiz yourself on a topic, summarize text and convert documents.</p>"#,
    )
}

pub async fn search_page() -> Html<String> {
    page(
        "Search",
        r#"    <h1>Search</h1>
    <form action="/api/search" method="get">
      <input type="text" name="q" placeholder="Search the web">
      <button type="submit">Search</button>
    </form>"#,
    )
}

pub async fn quiz_page() -> Html<String> {
    page(
        "Quiz",
        r#"    <h1>Quiz</h1>
    <form id="quiz-form">
      <input type="text" name="topic" placeholder="Topic to quiz on">
      <button type="submit">Generate quiz</button>
    </form>"#,
    )
}

pub async fn summary_page() -> Html<String> {
    page(
        "Summary",
        r#"    <h1>Summarizer</h1>
    <form id="summary-form">
      <textarea name="text" rows="10" placeholder="Paste text or enter a topic"></textarea>
      <button type="submit">Summarize</button>
    </form>"#,
    )
}

pub async fn docs_page() -> Html<String> {
    page(
        "Docs",
        r#"    <h1>API documentation</h1>
    <ul>
      <li><code>POST /api/signup</code> - create an account</li>
      <li><code>POST /api/verify/:email</code> - verify with emailed code</li>
      <li><code>POST /api/resend/:email</code> - resend verification code</li>
      <li><code>POST /api/login</code> - log in, sets session cookie</li>
      <li><code>POST /api/logout</code> - clear the session</li>
      <li><code>GET /api/me</code> - current user</li>
      <li><code>GET /api/search?q=</code> - web search</li>
      <li><code>POST /quiz</code> - generate a quiz for a topic</li>
      <li><code>POST /submit_quiz</code> - grade answers</li>
      <li><code>POST /summary</code> - summarize text or a topic</li>
      <li><code>POST /convert/jpg-to-pdf</code> - image to PDF</li>
      <li><code>POST /convert/pdf-to-jpg</code> - first PDF page to JPEG</li>
      <li><code>POST /convert/word-to-pdf</code> - DOCX to PDF</li>
      <li><code>POST /convert/pdf-to-word</code> - PDF to DOCX</li>
    </ul>"#,
    )
}

pub async fn login_page() -> Html<String> {
    page(
        "Login",
        r#"    <h1>Log in</h1>
    <form id="login-form">
      <input type="email" name="email" placeholder="Email">
      <input type="password" name="password" placeholder="Password">
      <button type="submit">Log in</button>
    </form>
    <p>No account? <a href="/signup">Sign up</a></p>"#,
    )
}

pub async fn signup_page() -> Html<String> {
    page(
        "Sign up",
        r#"    <h1>Create an account</h1>
    <form id="signup-form">
      <input type="email" name="email" placeholder="Email">
      <input type="password" name="password" placeholder="Password (8+ characters)">
      <button type="submit">Sign up</button>
    </form>"#,
    )
}

pub async fn verify_page(Path(email): Path<String>) -> Html<String> {
    debug!(email = %safe_email_log(&email), "Verification page requested");
    // The path parameter is attacker-controlled; escape it before it lands
    // in the attribute
    let body = format!(
        r#"    <h1>Verify your email</h1>
    <p>A six-digit code was sent to your inbox.</p>
    <form id="verify-form" data-email="{}">
      <input type="text" name="otp" placeholder="123456" maxlength="6">
      <button type="submit">Verify</button>
    </form>"#,
        escape_html(&email)
    );
    page("Verify", &body)
}

/// Requires a live session; anonymous visitors land on the login page
pub async fn dashboard_page(session: Option<SessionUser>) -> impl IntoResponse {
    match session {
        Some(user) => {
            let body = format!(
                r#"    <h1>Dashboard</h1>
    <p>Logged in as {}.</p>
    <p><a href="/converter">Convert a document</a></p>"#,
                escape_html(&user.email)
            );
            page("Dashboard", &body).into_response()
        }
        None => Redirect::to("/login").into_response(),
    }
}

/// Requires a live session; anonymous visitors land on the login page
pub async fn converter_page(session: Option<SessionUser>) -> impl IntoResponse {
    if session.is_none() {
        return Redirect::to("/login").into_response();
    }
    page(
        "Converter",
        r#"    <h1>File converter</h1>
    <form action="/convert/jpg-to-pdf" method="post" enctype="multipart/form-data">
      <input type="file" name="file">
      <button type="submit">Image to PDF</button>
    </form>
    <form action="/convert/pdf-to-jpg" method="post" enctype="multipart/form-data">
      <input type="file" name="file">
      <button type="submit">PDF to image</button>
    </form>
    <form action="/convert/word-to-pdf" method="post" enctype="multipart/form-data">
      <input type="file" name="file">
      <button type="submit">Word to PDF</button>
    </form>
    <form action="/convert/pdf-to-word" method="post" enctype="multipart/form-data">
      <input type="file" name="file">
      <button type="submit">PDF to Word</button>
    </form>"#,
    )
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_verify_page_escapes_hostile_path_parameter() {
        let hostile = r#""><script>alert(1)</script>@x"#.to_string();
        let Html(rendered) = verify_page(Path(hostile)).await;

        assert!(!rendered.contains("<script>"));
        assert!(rendered.contains("&quot;&gt;&lt;script&gt;"));
    }

    #[tokio::test]
    async fn test_verify_page_keeps_plain_email_readable() {
        let Html(rendered) = verify_page(Path("user@example.com".to_string())).await;
        assert!(rendered.contains(r#"data-email="user@example.com""#));
    }
}
