//! `Link` header parsing for paginated list responses.

use reqwest::header::HeaderMap;

/// Extract the URL tagged `rel="next"` from a `Link` header.
pub(crate) fn next_link(headers: &HeaderMap) -> Option<String> {
    let link = headers.get("link")?.to_str().ok()?;
    next_link_from_str(link)
}

fn next_link_from_str(link: &str) -> Option<String> {
    for part in link.split(',') {
        let part = part.trim();
        if !part.contains("rel=\"next\"") {
            continue;
        }
        let start = part.find('<')? + 1;
        let end = part.find('>')?;
        if start >= end {
            return None;
        }
        return Some(part[start..end].to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn next_link_picks_next_relation() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "link",
            HeaderValue::from_static(
                "<https://api.github.com/user/repos?per_page=100&page=1>; rel=\"prev\", \
                 <https://api.github.com/user/repos?per_page=100&page=3>; rel=\"next\"",
            ),
        );
        assert_eq!(
            next_link(&headers).as_deref(),
            Some("https://api.github.com/user/repos?per_page=100&page=3")
        );
    }

    #[test]
    fn last_page_has_no_next() {
        assert_eq!(
            next_link_from_str("<https://api.github.com/user/repos?page=1>; rel=\"first\""),
            None
        );
        assert_eq!(next_link(&HeaderMap::new()), None);
    }
}
