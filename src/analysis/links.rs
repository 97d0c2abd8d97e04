// Outbound links shown next to recommended papers

const SCHOLAR_SEARCH: &str = "https://scholar.google.com/scholar";

/// Google Scholar search for a paper title
pub fn scholar_url(title: &str) -> String {
    format!("{}?q={}", SCHOLAR_SEARCH, urlencoding::encode(title.trim()))
}

/// Normalizes a repository reference into a browsable URL
pub fn github_url(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if reference.starts_with("http://") || reference.starts_with("https://") {
        Some(reference.to_string())
    } else {
        Some(format!("https://{}", reference))
    }
}
