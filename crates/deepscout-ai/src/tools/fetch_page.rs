//! Page fetch tool for reading static web pages
//!
//! Fetches a URL and extracts clean text content from HTML.
//! Works best with static content (news, blogs, docs, wikis).

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::{IpAddr, Ipv6Addr};
use std::time::Duration;

use crate::error::Result;
use crate::http_client::build_http_client;
use crate::tools::traits::{Tool, ToolOutput};

const DEFAULT_MAX_LENGTH: usize = 5_000;
const FETCH_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Deserialize)]
struct FetchPageInput {
    url: String,
    max_length: Option<usize>,
}

/// Validate URL to prevent SSRF attacks.
/// Blocks access to internal/private network resources.
fn validate_url(url: &str) -> std::result::Result<(), String> {
    let parsed = url::Url::parse(url).map_err(|e| format!("Invalid URL: {}", e))?;

    // Only allow HTTP and HTTPS schemes
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(format!(
                "Scheme '{}' is not allowed. Only HTTP and HTTPS are permitted.",
                scheme
            ));
        }
    }

    let host = match parsed.host_str() {
        Some(h) => h,
        None => return Err("URL must have a host".to_string()),
    };

    // Block localhost variations
    if host.eq_ignore_ascii_case("localhost")
        || host == "0.0.0.0"
        || host == "::1"
        || host == "[::1]"
    {
        return Err("Access to localhost is not allowed".to_string());
    }

    if let Ok(ip) = host.parse::<IpAddr>()
        && is_restricted_ip(&ip)
    {
        return Err(format!(
            "Access to restricted IP address {} is not allowed (private/internal/metadata)",
            ip
        ));
    }

    // Handle bracketed IPv6 addresses
    if host.starts_with('[') && host.ends_with(']') {
        let inner = &host[1..host.len() - 1];
        if let Ok(ip) = inner.parse::<Ipv6Addr>()
            && is_restricted_ip(&IpAddr::V6(ip))
        {
            return Err(format!(
                "Access to restricted IPv6 address {} is not allowed",
                ip
            ));
        }
    }

    Ok(())
}

/// Check if an IP address is in a restricted range.
fn is_restricted_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            if v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_documentation()
            {
                return true;
            }
            // CGNAT: 100.64.0.0/10
            if matches!(v4.octets(), [100, 64..=127, ..]) {
                return true;
            }
            // IETF Protocol Assignments: 192.0.0.0/24
            if matches!(v4.octets(), [192, 0, 0, _]) {
                return true;
            }
            // Benchmark testing: 198.18.0.0/15
            if matches!(v4.octets(), [198, 18..=19, ..]) {
                return true;
            }
            if v4.is_multicast() {
                return true;
            }
            // Reserved: 240.0.0.0/4
            if matches!(v4.octets(), [240..=255, ..]) {
                return true;
            }
            false
        }
        IpAddr::V6(v6) => {
            if v6.is_loopback() || v6.is_multicast() {
                return true;
            }
            // Unique local: fc00::/7
            if matches!(v6.segments(), [0xfc00..=0xfdff, ..]) {
                return true;
            }
            // Link-local: fe80::/10
            if matches!(v6.segments(), [0xfe80..=0xfebf, ..]) {
                return true;
            }
            // Documentation: 2001:db8::/32
            if matches!(v6.segments(), [0x2001, 0x0db8, ..]) {
                return true;
            }
            false
        }
    }
}

/// Page fetch tool that reads a webpage and returns clean text content.
///
/// Uses reqwest to fetch HTML and scraper to extract text,
/// stripping navigation, scripts, and styling.
pub struct FetchPageTool {
    client: Client,
}

impl Default for FetchPageTool {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchPageTool {
    pub fn new() -> Self {
        Self {
            client: build_http_client(),
        }
    }
}

/// Extract clean text content from HTML, removing scripts, styles, nav, and other noise.
fn extract_text_from_html(html: &str) -> String {
    use scraper::{Html, Selector};

    let document = Html::parse_document(html);
    let mut output = String::new();

    if let Ok(title_sel) = Selector::parse("title")
        && let Some(title_el) = document.select(&title_sel).next()
    {
        let title: String = title_el.text().collect();
        let title = title.trim();
        if !title.is_empty() {
            output.push_str("# ");
            output.push_str(title);
            output.push_str("\n\n");
        }
    }

    let noise_tags = [
        "script", "style", "nav", "footer", "header", "noscript", "svg", "iframe",
    ];
    let noise_selectors: Vec<_> = noise_tags
        .iter()
        .filter_map(|tag| Selector::parse(tag).ok())
        .collect();

    // Prefer article/main content when the page marks it
    let content_selectors = ["article", "main", "[role=\"main\"]", ".content", "#content"];

    let content_root = content_selectors
        .iter()
        .filter_map(|sel| Selector::parse(sel).ok())
        .find_map(|sel| document.select(&sel).next());

    let root = content_root.unwrap_or_else(|| {
        Selector::parse("body")
            .ok()
            .and_then(|sel| document.select(&sel).next())
            .unwrap_or_else(|| document.root_element())
    });

    collect_text_recursive(&root, &noise_selectors, &mut output);

    // Collapse runs of more than two newlines
    let mut cleaned = String::with_capacity(output.len());
    let mut prev_newline_count = 0;
    for ch in output.chars() {
        if ch == '\n' {
            prev_newline_count += 1;
            if prev_newline_count <= 2 {
                cleaned.push(ch);
            }
        } else {
            prev_newline_count = 0;
            cleaned.push(ch);
        }
    }

    cleaned.trim().to_string()
}

/// Recursively collect text content, skipping noise elements.
fn collect_text_recursive(
    element: &scraper::ElementRef,
    noise_selectors: &[scraper::Selector],
    output: &mut String,
) {
    use scraper::Node;

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    output.push_str(trimmed);
                    output.push(' ');
                }
            }
            Node::Element(_) => {
                if let Some(child_ref) = scraper::ElementRef::wrap(child) {
                    let is_noise = noise_selectors.iter().any(|sel| sel.matches(&child_ref));
                    if is_noise {
                        continue;
                    }

                    let tag = child_ref.value().name();
                    let is_block = matches!(
                        tag,
                        "p" | "div"
                            | "h1"
                            | "h2"
                            | "h3"
                            | "h4"
                            | "h5"
                            | "h6"
                            | "li"
                            | "br"
                            | "tr"
                            | "blockquote"
                            | "pre"
                            | "section"
                    );

                    if is_block {
                        output.push('\n');
                    }

                    if tag.starts_with('h')
                        && tag.len() == 2
                        && let Some(level) = tag.chars().nth(1).and_then(|c| c.to_digit(10))
                    {
                        for _ in 0..level {
                            output.push('#');
                        }
                        output.push(' ');
                    }

                    collect_text_recursive(&child_ref, noise_selectors, output);

                    if is_block {
                        output.push('\n');
                    }
                }
            }
            _ => {}
        }
    }
}

/// Truncate extracted text at a char boundary, marking the cut.
fn truncate_content(text: &str, max_length: usize) -> String {
    if text.len() <= max_length {
        return text.to_string();
    }
    let mut end = max_length;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n...(truncated)", &text[..end])
}

#[async_trait]
impl Tool for FetchPageTool {
    fn name(&self) -> &str {
        "fetch_page"
    }

    fn description(&self) -> &str {
        "Fetch and read a webpage. Returns clean text extracted from HTML. \
         Use this to read the full content of a page when you need more detail \
         than a search snippet provides. Works best with static content \
         (news articles, blog posts, documentation, wikis). If the result is \
         empty or too short, the page likely requires JavaScript rendering."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the web page to fetch"
                },
                "max_length": {
                    "type": "integer",
                    "description": "Maximum content length to return (default: 5000 chars)",
                    "default": DEFAULT_MAX_LENGTH
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput> {
        let params: FetchPageInput = serde_json::from_value(input)?;
        let max_length = params.max_length.unwrap_or(DEFAULT_MAX_LENGTH);

        if let Err(reason) = validate_url(&params.url) {
            return Ok(ToolOutput::error(reason));
        }

        let response = match self
            .client
            .get(&params.url)
            .header(
                "User-Agent",
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36",
            )
            .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                return Ok(ToolOutput::error(format!(
                    "Error fetching {}: {}",
                    params.url, e
                )));
            }
        };

        if !response.status().is_success() {
            return Ok(ToolOutput::error(format!(
                "Error fetching {}: HTTP {}",
                params.url,
                response.status()
            )));
        }

        let html = match response.text().await {
            Ok(html) => html,
            Err(e) => {
                return Ok(ToolOutput::error(format!(
                    "Error reading body of {}: {}",
                    params.url, e
                )));
            }
        };

        let text = extract_text_from_html(&html);
        let content = truncate_content(&text, max_length);

        Ok(ToolOutput::success(json!({
            "url": params.url,
            "content": content,
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_http_schemes() {
        assert!(validate_url("file:///etc/passwd").is_err());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("https://example.com").is_ok());
    }

    #[test]
    fn rejects_localhost_and_private_ranges() {
        assert!(validate_url("http://localhost:8080/").is_err());
        assert!(validate_url("http://127.0.0.1/").is_err());
        assert!(validate_url("http://10.0.0.5/secret").is_err());
        assert!(validate_url("http://192.168.1.1/").is_err());
        assert!(validate_url("http://169.254.169.254/latest/meta-data").is_err());
        assert!(validate_url("http://[::1]/").is_err());
    }

    #[test]
    fn extracts_title_and_body_text() {
        let html = r#"
        <html>
          <head><title>Test Page</title><style>body { color: red }</style></head>
          <body>
            <nav>Menu items</nav>
            <article>
              <h2>Heading</h2>
              <p>First paragraph.</p>
              <script>alert("noise")</script>
            </article>
          </body>
        </html>
        "#;
        let text = extract_text_from_html(html);
        assert!(text.starts_with("# Test Page"));
        assert!(text.contains("## Heading"));
        assert!(text.contains("First paragraph."));
        assert!(!text.contains("Menu items"));
        assert!(!text.contains("alert"));
    }

    #[test]
    fn truncation_marks_the_cut() {
        let long = "a".repeat(100);
        let out = truncate_content(&long, 10);
        assert!(out.starts_with("aaaaaaaaaa"));
        assert!(out.ends_with("...(truncated)"));

        let short = "short";
        assert_eq!(truncate_content(short, 100), "short");
    }
}
