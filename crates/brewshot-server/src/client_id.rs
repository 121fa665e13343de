use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use brewshot_config::ClientIdentificationConfig;
use brewshot_core::ClientIdentity;

/// Middleware that extracts client identity from forwarded headers
///
/// Requests without the client ID header pass through anonymously; handlers
/// decide whether they need an identity.
pub async fn client_id_middleware(config: ClientIdentificationConfig, request: Request, next: Next) -> Response {
    let identity = extract_identity(&config, &request);

    let mut request = request;
    if let Some(identity) = identity {
        request.extensions_mut().insert(identity);
    }

    next.run(request).await
}

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn extract_identity(config: &ClientIdentificationConfig, request: &Request) -> Option<ClientIdentity> {
    let client_id = header_value(request, &config.client_id_header)?;

    let group = config
        .group_header
        .as_deref()
        .and_then(|name| header_value(request, name))
        .filter(|group| config.allowed_groups.is_empty() || config.allowed_groups.contains(group));

    Some(ClientIdentity { client_id, group })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request {
        let mut builder = http::Request::builder().uri("/v1/generations");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn config() -> ClientIdentificationConfig {
        ClientIdentificationConfig {
            group_header: Some("x-brewshot-plan".to_string()),
            allowed_groups: vec!["pro".to_string()],
            ..ClientIdentificationConfig::default()
        }
    }

    #[test]
    fn reads_client_and_allowed_group() {
        let identity = extract_identity(&config(), &request(&[("x-brewshot-user", "alice"), ("x-brewshot-plan", "pro")])).unwrap();

        assert_eq!(identity.client_id, "alice");
        assert_eq!(identity.group.as_deref(), Some("pro"));
    }

    #[test]
    fn disallowed_group_is_dropped() {
        let identity = extract_identity(&config(), &request(&[("x-brewshot-user", "bob"), ("x-brewshot-plan", "free")])).unwrap();

        assert_eq!(identity.group, None);
    }

    #[test]
    fn blank_or_missing_header_is_anonymous() {
        assert!(extract_identity(&config(), &request(&[])).is_none());
        assert!(extract_identity(&config(), &request(&[("x-brewshot-user", "  ")])).is_none());
    }
}
