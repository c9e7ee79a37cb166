//! Connection target construction.

use url::Url;
use wedear_settings::RealtimeSettings;

use crate::errors::RealtimeError;

/// Build `{scheme}://{host}:{port}{path}?userId={user_id}&role={role}`.
///
/// Query values are form-encoded. Only `ws` targets are built: the transport
/// has no TLS support, so a `wss` target could never connect.
pub fn build_url(
    settings: &RealtimeSettings,
    user_id: &str,
    role: &str,
) -> Result<Url, RealtimeError> {
    if settings.scheme != "ws" {
        return Err(RealtimeError::InvalidEndpoint(format!(
            "unsupported scheme {:?}, only ws is available",
            settings.scheme
        )));
    }
    let base = format!(
        "{}://{}:{}{}",
        settings.scheme, settings.host, settings.port, settings.path
    );
    Url::parse_with_params(&base, &[("userId", user_id), ("role", role)])
        .map_err(|e| RealtimeError::InvalidEndpoint(format!("{base}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn default_target() {
        let url = build_url(&RealtimeSettings::default(), "u1", "doctor").unwrap();
        assert_eq!(url.as_str(), "ws://localhost:8080/ws?userId=u1&role=doctor");
    }

    #[test]
    fn encodes_query_values() {
        let url = build_url(&RealtimeSettings::default(), "a&b c", "patient").unwrap();
        assert_eq!(url.query(), Some("userId=a%26b+c&role=patient"));
    }

    #[test]
    fn custom_host_port_and_path() {
        let settings = RealtimeSettings {
            host: "clinic.example".into(),
            port: 9443,
            path: "/realtime".into(),
            ..RealtimeSettings::default()
        };
        let url = build_url(&settings, "d7", "doctor").unwrap();
        assert_eq!(url.scheme(), "ws");
        assert_eq!(url.host_str(), Some("clinic.example"));
        assert_eq!(url.port(), Some(9443));
        assert_eq!(url.path(), "/realtime");
    }

    #[test]
    fn tls_scheme_is_rejected() {
        let settings = RealtimeSettings {
            scheme: "wss".into(),
            ..RealtimeSettings::default()
        };
        let err = build_url(&settings, "u1", "doctor").unwrap_err();
        assert_matches!(err, RealtimeError::InvalidEndpoint(msg) if msg.contains("wss"));
    }

    #[test]
    fn invalid_host_is_error() {
        let settings = RealtimeSettings {
            host: "bad host".into(),
            ..RealtimeSettings::default()
        };
        let err = build_url(&settings, "u1", "doctor").unwrap_err();
        assert_matches!(err, RealtimeError::InvalidEndpoint(_));
    }
}
