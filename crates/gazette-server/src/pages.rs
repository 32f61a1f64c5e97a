//! Server-rendered HTML pages.
//!
//! Pages are assembled in code from escaped fragments; there is no
//! template engine. Styling is one small inline stylesheet shared by
//! every page.

use gazette_core::Article;

const STYLE: &str = "\
body { max-width: 48rem; margin: 2rem auto; padding: 0 1rem; \
font-family: Georgia, serif; color: #222; }\n\
a { color: #1a5276; }\n\
h1 { border-bottom: 1px solid #ddd; padding-bottom: 0.3rem; }\n\
.meta { color: #777; font-size: 0.9rem; }\n\
.banner { background: #fdecea; border: 1px solid #e6b0aa; \
padding: 0.6rem 1rem; margin-bottom: 1rem; }\n\
.article { margin: 1.5rem 0; }\n\
.content { white-space: pre-wrap; line-height: 1.6; }\n\
form label { display: block; margin-top: 1rem; }\n\
form input, form textarea { width: 100%; padding: 0.4rem; }\n\
form textarea { min-height: 16rem; }\n\
button { margin-top: 1rem; padding: 0.5rem 1.5rem; }";

/// Escapes text for safe embedding in HTML.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <style>{STYLE}</style>\n\
         </head>\n\
         <body>\n{body}\n</body>\n\
         </html>\n",
        title = escape_html(title),
    )
}

fn error_message(code: &str) -> String {
    match code {
        "no_article" => "No such article.".to_string(),
        "unauthorized" => "You are not authorized to do that.".to_string(),
        code if code.starts_with("invalid_") => "That address does not look right.".to_string(),
        other => format!("Something went wrong ({}).", escape_html(other)),
    }
}

/// Renders the article listing page, with an error banner when the
/// request carried an `error` query parameter.
#[must_use]
pub fn articles(articles: &[Article], error: Option<&str>) -> String {
    let mut body = String::new();

    if let Some(code) = error {
        body.push_str(&format!(
            "<div class=\"banner\">{}</div>\n",
            error_message(code)
        ));
    }

    body.push_str("<h1>Articles</h1>\n");

    if articles.is_empty() {
        body.push_str("<p>Nothing published yet.</p>\n");
    }

    for article in articles {
        body.push_str(&format!(
            "<div class=\"article\">\n\
             <h2><a href=\"/{slug}\">{title}</a></h2>\n\
             <p>{description}</p>\n\
             </div>\n",
            slug = escape_html(&article.slug),
            title = escape_html(&article.title),
            description = escape_html(&article.description),
        ));
    }

    layout("Articles", &body)
}

/// Renders a single article with its formatted publication date.
#[must_use]
pub fn article(article: &Article) -> String {
    let body = format!(
        "<p><a href=\"/\">&larr; All articles</a></p>\n\
         <h1>{title}</h1>\n\
         <p class=\"meta\">{published}</p>\n\
         <p><em>{description}</em></p>\n\
         <div class=\"content\">{content}</div>\n",
        title = escape_html(&article.title),
        published = escape_html(&article.published_on()),
        description = escape_html(&article.description),
        content = escape_html(&article.content),
    );

    layout(&article.title, &body)
}

/// Renders the authoring form. Submission posts JSON to `/api/post`.
#[must_use]
pub fn authoring() -> String {
    let body = "\
<h1>New article</h1>\n\
<form id=\"post-form\">\n\
<label>Title <input name=\"title\" required></label>\n\
<label>Slug <input name=\"slug\" required></label>\n\
<label>Description <input name=\"description\" required></label>\n\
<label>Content <textarea name=\"content\" required></textarea></label>\n\
<button type=\"submit\">Publish</button>\n\
</form>\n\
<p id=\"status\"></p>\n\
<script>\n\
document.getElementById('post-form').addEventListener('submit', async (event) => {\n\
  event.preventDefault();\n\
  const data = Object.fromEntries(new FormData(event.target));\n\
  const response = await fetch('/api/post', {\n\
    method: 'POST',\n\
    headers: {'Content-Type': 'application/json'},\n\
    body: JSON.stringify(data),\n\
  });\n\
  const payload = await response.json();\n\
  const status = document.getElementById('status');\n\
  if (response.ok) {\n\
    status.textContent = payload.text;\n\
    window.location = '/' + payload.article.slug;\n\
  } else {\n\
    status.textContent = payload.text;\n\
  }\n\
});\n\
</script>\n";

    layout("New article", body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Article {
        Article {
            title: "Hello <World>".to_string(),
            slug: "hello-world".to_string(),
            description: "A & B".to_string(),
            content: "First line\nSecond line".to_string(),
            timestamp: 1_705_276_800,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<script>\"a\" & 'b'</script>"),
            "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_articles_page_lists_entries() {
        let html = articles(&[sample()], None);

        assert!(html.contains("<h1>Articles</h1>"));
        assert!(html.contains("href=\"/hello-world\""));
        assert!(html.contains("Hello &lt;World&gt;"));
        assert!(html.contains("A &amp; B"));
        assert!(!html.contains("banner"));
    }

    #[test]
    fn test_articles_page_empty() {
        let html = articles(&[], None);
        assert!(html.contains("Nothing published yet."));
    }

    #[test]
    fn test_articles_page_error_banner() {
        let html = articles(&[], Some("no_article"));
        assert!(html.contains("class=\"banner\""));
        assert!(html.contains("No such article."));
    }

    #[test]
    fn test_articles_page_unknown_error_escaped() {
        let html = articles(&[], Some("<weird>"));
        assert!(html.contains("&lt;weird&gt;"));
        assert!(!html.contains("<weird>"));
    }

    #[test]
    fn test_article_page() {
        let html = article(&sample());

        assert!(html.contains("Monday, 15 January 2024"));
        assert!(html.contains("Hello &lt;World&gt;"));
        assert!(html.contains("First line\nSecond line"));
    }

    #[test]
    fn test_authoring_page_posts_to_api() {
        let html = authoring();
        assert!(html.contains("/api/post"));
        assert!(html.contains("name=\"slug\""));
        assert!(html.contains("name=\"content\""));
    }
}
