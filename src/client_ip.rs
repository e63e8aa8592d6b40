use axum::http::HeaderMap;

// Used when no proxy header is present (local development)
pub const FALLBACK_CLIENT_IP: &str = "127.0.0.1";

// Client identifier for rate limiting and view tracking.
// First hop of X-Forwarded-For, then X-Real-IP, then loopback.
// Headers are trusted as-is; spoofing is not defended against.
pub fn extract_client_ip(headers: &HeaderMap) -> String {
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = xff.split(',').next().map(str::trim) {
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    FALLBACK_CLIENT_IP.to_string()
}
