use brewshot_config::CorsConfig;
use http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Build a Tower CORS layer for the browser front-end
///
/// Any-origin with credentials mirrors the request origin; a wildcard is
/// invalid on credentialed requests.
pub fn cors_layer(config: &CorsConfig, identity_headers: &[String]) -> CorsLayer {
    let mut layer = CorsLayer::new().allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    layer = if config.allows_any_origin() && config.credentials {
        layer.allow_origin(AllowOrigin::mirror_request())
    } else if config.allows_any_origin() {
        layer.allow_origin(AllowOrigin::any())
    } else {
        let origins: Vec<HeaderValue> = config.origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(origins)
    };

    // Credentialed requests cannot use wildcard headers
    layer = if config.credentials {
        let mut headers = vec![http::header::CONTENT_TYPE];
        headers.extend(identity_headers.iter().filter_map(|h| h.parse::<HeaderName>().ok()));
        layer.allow_headers(headers).allow_credentials(true)
    } else {
        layer.allow_headers(AllowHeaders::any())
    };

    if let Some(duration) = config.max_age_duration() {
        layer = layer.max_age(duration);
    }

    layer
}
