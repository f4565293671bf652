use url::Url;
use validator::ValidationError;

/// Accepts absolute http(s) URLs; an empty string clears the field and is allowed.
pub fn http_url(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    match Url::parse(trimmed) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
        _ => {
            let mut err = ValidationError::new("http_url");
            err.message = Some("must be an http or https URL".into());
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_urls_and_blank() {
        assert!(http_url("https://example.com/paper.pdf").is_ok());
        assert!(http_url("http://example.com").is_ok());
        assert!(http_url("  ").is_ok());
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(http_url("ftp://example.com").is_err());
        assert!(http_url("javascript:alert(1)").is_err());
        assert!(http_url("not a url").is_err());
    }
}
