use axum::http::HeaderMap;

use aml_domain::RuntimeConfig;

/// Checks the bearer token for payment-facing routes. Open when no token is configured.
pub fn authorize(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    match &config.api_token {
        Some(api_token) => bearer_matches(headers, api_token),
        None => true,
    }
}

/// Checks the bearer token for compliance-officer routes. Falls back to the api token.
pub fn authorize_admin(config: &RuntimeConfig, headers: &HeaderMap) -> bool {
    match &config.admin_token {
        Some(admin_token) => bearer_matches(headers, admin_token),
        None => authorize(config, headers),
    }
}

fn bearer_matches(headers: &HeaderMap, expected: &str) -> bool {
    extract_bearer(headers)
        .map(|token| token == expected)
        .unwrap_or(false)
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get("Authorization")?.to_str().ok()?.trim();
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn open_when_no_tokens_configured() {
        let config = RuntimeConfig::default();
        assert!(authorize(&config, &HeaderMap::new()));
        assert!(authorize_admin(&config, &HeaderMap::new()));
    }

    #[test]
    fn admin_routes_require_admin_token() {
        let config = RuntimeConfig {
            api_token: Some("api".to_string()),
            admin_token: Some("admin".to_string()),
            ..RuntimeConfig::default()
        };
        assert!(authorize(&config, &headers_with("api")));
        assert!(!authorize_admin(&config, &headers_with("api")));
        assert!(authorize_admin(&config, &headers_with("admin")));
        assert!(!authorize(&config, &HeaderMap::new()));
    }

    #[test]
    fn admin_falls_back_to_api_token() {
        let config = RuntimeConfig {
            api_token: Some("api".to_string()),
            ..RuntimeConfig::default()
        };
        assert!(authorize_admin(&config, &headers_with("api")));
        assert!(!authorize_admin(&config, &headers_with("other")));
    }
}
