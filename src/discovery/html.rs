use ::scraper::{Html, Selector};
use url::Url;

const FEED_TYPES: [&str; 2] = ["application/rss+xml", "application/atom+xml"];

/// Collect `<link rel="alternate">` feed hrefs from an HTML page, in document order.
///
/// Relative hrefs resolve against `<base href>` when present, otherwise against
/// `page_url`. Only http(s) results are kept.
pub fn alternate_feed_links(html: &str, page_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let base = Selector::parse("base[href]")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| page_url.join(href.trim()).ok())
        .unwrap_or_else(|| page_url.clone());

    let Ok(selector) = Selector::parse("link[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|el| {
            let attrs = el.value();
            let is_alternate = attrs.attr("rel").is_some_and(|rel| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("alternate"))
            });
            let is_feed = attrs.attr("type").is_some_and(|ty| {
                let mime = ty.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
                FEED_TYPES.contains(&mime.as_str())
            });
            is_alternate && is_feed
        })
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(|url| url.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn test_finds_rss_and_atom_in_order() {
        let html = r#"<html><head>
            <link rel="stylesheet" href="/style.css">
            <link rel="alternate" type="application/atom+xml" href="/atom.xml">
            <link rel="alternate" type="application/rss+xml" href="https://feeds.example.com/rss">
        </head><body></body></html>"#;

        assert_eq!(
            alternate_feed_links(html, &page()),
            vec![
                "https://example.com/atom.xml".to_string(),
                "https://feeds.example.com/rss".to_string(),
            ]
        );
    }

    #[test]
    fn test_attribute_order_and_case() {
        let html = r#"<head>
            <link HREF="feed.xml" TYPE="Application/RSS+XML; charset=utf-8" REL="Alternate Home">
        </head>"#;

        assert_eq!(
            alternate_feed_links(html, &page()),
            vec!["https://example.com/blog/feed.xml".to_string()]
        );
    }

    #[test]
    fn test_protocol_relative_href() {
        let html = r#"<link rel="alternate" type="application/rss+xml" href="//cdn.example.com/feed">"#;
        assert_eq!(
            alternate_feed_links(html, &page()),
            vec!["https://cdn.example.com/feed".to_string()]
        );
    }

    #[test]
    fn test_base_href_is_respected() {
        let html = r#"<head>
            <base href="https://static.example.org/site/">
            <link rel="alternate" type="application/rss+xml" href="rss.xml">
        </head>"#;
        assert_eq!(
            alternate_feed_links(html, &page()),
            vec!["https://static.example.org/site/rss.xml".to_string()]
        );
    }

    #[test]
    fn test_ignores_non_feed_alternates() {
        let html = r#"<head>
            <link rel="alternate" hreflang="fr" href="/fr/">
            <link rel="alternate" type="text/html" href="/mobile">
            <link rel="alternate" type="application/rss+xml" href="javascript:void(0)">
        </head>"#;
        assert!(alternate_feed_links(html, &page()).is_empty());
    }
}
