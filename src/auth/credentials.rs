// Credential loading from base64-encoded JSON blobs

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use oauth2::{AuthUrl, TokenUrl};
use secrecy::SecretString;
use serde_json::{Map, Value};

use super::types::{
    ClientKind, CredentialConfig, TokenConfig, DEFAULT_AUTH_URI, DEFAULT_TOKEN_URI,
};
use crate::config::{CREDENTIALS_VAR, TOKEN_VAR};
use crate::error::{AuthError, Result};

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// Decode base64 then parse JSON
/// Whitespace is ignored, padding is optional, and the URL-safe alphabet is accepted
fn decode_json(blob: &str) -> std::result::Result<Value, String> {
    let compact: String = blob.chars().filter(|c| !c.is_whitespace()).collect();

    let bytes = STANDARD_LENIENT
        .decode(&compact)
        .or_else(|_| URL_SAFE_LENIENT.decode(&compact))
        .map_err(|e| format!("invalid base64: {}", e))?;

    serde_json::from_slice(&bytes).map_err(|e| format!("invalid JSON: {}", e))
}

/// Load application credentials from the base64 client secret blob
pub fn load_credentials(blob: &str) -> Result<CredentialConfig> {
    let json = decode_json(blob).map_err(|reason| AuthError::ConfigMalformed {
        var: CREDENTIALS_VAR,
        reason,
    })?;

    parse_credentials(&json)
}

/// Validate decoded client secret JSON
/// A section counts only when truthy (`null`, `false`, `0` and `""` do not);
/// `web` takes precedence over `installed` when both are present
pub fn parse_credentials(json: &Value) -> Result<CredentialConfig> {
    let empty = Map::new();
    let root = json.as_object().unwrap_or(&empty);

    let (kind, section) = [ClientKind::Web, ClientKind::Installed]
        .into_iter()
        .find_map(|kind| {
            root.get(kind.key())
                .filter(|section| is_truthy(*section))
                .map(|section| (kind, section))
        })
        .ok_or_else(|| AuthError::ConfigInvalidShape {
            received_keys: root.keys().cloned().collect(),
        })?;

    tracing::debug!("Using '{}' client credentials", kind);

    let client_id = non_empty_str(section, "client_id");
    let client_secret = non_empty_str(section, "client_secret");
    let redirect_uris: Vec<String> = section
        .get("redirect_uris")
        .and_then(|v| v.as_array())
        .map(|uris| {
            uris.iter()
                .map(|uri| match uri {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let mut missing = Vec::new();
    if client_secret.is_none() {
        missing.push("client_secret");
    }
    if client_id.is_none() {
        missing.push("client_id");
    }
    if redirect_uris.is_empty() {
        missing.push("redirect_uris");
    }

    match (client_id, client_secret) {
        (Some(client_id), Some(client_secret)) if missing.is_empty() => Ok(CredentialConfig {
            kind,
            client_id: client_id.to_string(),
            client_secret: SecretString::new(client_secret.to_string()),
            redirect_uris,
            auth_uri: endpoint(section, "auth_uri", DEFAULT_AUTH_URI, |uri| {
                AuthUrl::new(uri).is_ok()
            }),
            token_uri: endpoint(section, "token_uri", DEFAULT_TOKEN_URI, |uri| {
                TokenUrl::new(uri).is_ok()
            }),
        }),
        _ => Err(AuthError::ConfigIncomplete {
            missing: missing.join(", "),
        }),
    }
}

/// Load a previously obtained token from the base64 token blob
pub fn load_token(blob: &str) -> Result<TokenConfig> {
    decode_json(blob)
        .map(TokenConfig::new)
        .map_err(|reason| AuthError::TokenMalformed {
            var: TOKEN_VAR,
            reason,
        })
}

/// Endpoint from the section, or `default` when absent or not a URL
fn endpoint(
    section: &Value,
    field: &str,
    default: &str,
    is_valid: impl Fn(String) -> bool,
) -> String {
    match non_empty_str(section, field) {
        Some(uri) if is_valid(uri.to_string()) => uri.to_string(),
        Some(uri) => {
            tracing::warn!(
                "Ignoring {} '{}': not a valid URL, using {}",
                field,
                uri,
                default
            );
            default.to_string()
        }
        None => default.to_string(),
    }
}

/// JSON truthiness: everything except `null`, `false`, `0` and `""`
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn non_empty_str<'a>(section: &'a Value, field: &str) -> Option<&'a str> {
    section
        .get(field)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use serde_json::json;

    fn encode(value: &Value) -> String {
        STANDARD.encode(value.to_string())
    }

    #[test]
    fn test_load_installed_credentials() {
        let blob = encode(&json!({
            "installed": {
                "client_id": "id1",
                "client_secret": "sec1",
                "redirect_uris": ["https://a", "https://b"]
            }
        }));

        let config = load_credentials(&blob).unwrap();
        assert_eq!(config.kind, ClientKind::Installed);
        assert_eq!(config.client_id, "id1");
        assert_eq!(config.client_secret(), "sec1");
        assert_eq!(config.redirect_uri(), "https://a");
        assert_eq!(config.auth_uri, DEFAULT_AUTH_URI);
        assert_eq!(config.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_endpoints_from_file() {
        let config = parse_credentials(&json!({
            "web": {
                "client_id": "id",
                "client_secret": "s",
                "redirect_uris": ["https://x"],
                "auth_uri": "https://auth.example.com/authorize",
                "token_uri": "https://auth.example.com/token"
            }
        }))
        .unwrap();

        assert_eq!(config.auth_uri, "https://auth.example.com/authorize");
        assert_eq!(config.token_uri, "https://auth.example.com/token");
    }

    #[test]
    fn test_web_takes_precedence() {
        let config = parse_credentials(&json!({
            "installed": {
                "client_id": "installed-id",
                "client_secret": "s",
                "redirect_uris": ["http://localhost"]
            },
            "web": {
                "client_id": "web-id",
                "client_secret": "s",
                "redirect_uris": ["https://x"]
            }
        }))
        .unwrap();

        assert_eq!(config.kind, ClientKind::Web);
        assert_eq!(config.client_id, "web-id");
    }

    #[test]
    fn test_null_web_falls_back_to_installed() {
        let config = parse_credentials(&json!({
            "web": null,
            "installed": {
                "client_id": "id",
                "client_secret": "s",
                "redirect_uris": ["http://localhost"]
            }
        }))
        .unwrap();

        assert_eq!(config.kind, ClientKind::Installed);
    }

    #[test]
    fn test_falsy_web_falls_back_to_installed() {
        for web in [json!(""), json!(false), json!(0)] {
            let config = parse_credentials(&json!({
                "web": web,
                "installed": {
                    "client_id": "id",
                    "client_secret": "s",
                    "redirect_uris": ["http://localhost"]
                }
            }))
            .unwrap();

            assert_eq!(config.kind, ClientKind::Installed);
            assert_eq!(config.client_id, "id");
        }
    }

    #[test]
    fn test_false_web_alone_is_invalid_shape() {
        match parse_credentials(&json!({ "web": false })) {
            Err(AuthError::ConfigInvalidShape { received_keys }) => {
                assert_eq!(received_keys, vec!["web".to_string()])
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_truthy_non_object_web_is_incomplete() {
        let err = parse_credentials(&json!({ "web": "yes" })).unwrap_err();
        assert!(matches!(err, AuthError::ConfigIncomplete { .. }));
    }

    #[test]
    fn test_redirect_uri_kept_as_given() {
        let config = parse_credentials(&json!({
            "installed": {
                "client_id": "id",
                "client_secret": "s",
                "redirect_uris": ["/oauth/callback", "https://b"]
            }
        }))
        .unwrap();
        assert_eq!(config.redirect_uri(), "/oauth/callback");

        let config = parse_credentials(&json!({
            "installed": {
                "client_id": "id",
                "client_secret": "s",
                "redirect_uris": [42]
            }
        }))
        .unwrap();
        assert_eq!(config.redirect_uri(), "42");
    }

    #[test]
    fn test_unparsable_endpoints_fall_back_to_defaults() {
        let config = parse_credentials(&json!({
            "web": {
                "client_id": "id",
                "client_secret": "s",
                "redirect_uris": ["https://x"],
                "auth_uri": "accounts.google.com/o/oauth2/auth",
                "token_uri": "::"
            }
        }))
        .unwrap();

        assert_eq!(config.auth_uri, DEFAULT_AUTH_URI);
        assert_eq!(config.token_uri, DEFAULT_TOKEN_URI);
    }

    #[test]
    fn test_empty_object_is_invalid_shape() {
        match parse_credentials(&json!({})) {
            Err(AuthError::ConfigInvalidShape { received_keys }) => {
                assert!(received_keys.is_empty())
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_shape_reports_received_keys() {
        let err = parse_credentials(&json!({
            "type": "service_account",
            "project_id": "demo"
        }))
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("type"));
        assert!(message.contains("project_id"));
    }

    #[test]
    fn test_non_object_is_invalid_shape() {
        let err = parse_credentials(&json!(["web"])).unwrap_err();
        assert!(matches!(err, AuthError::ConfigInvalidShape { .. }));
    }

    #[test]
    fn test_empty_client_id_is_incomplete() {
        let err = parse_credentials(&json!({
            "web": {
                "client_id": "",
                "client_secret": "s",
                "redirect_uris": ["https://x"]
            }
        }))
        .unwrap_err();

        match err {
            AuthError::ConfigIncomplete { missing } => assert_eq!(missing, "client_id"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_redirect_uris_is_incomplete() {
        let err = parse_credentials(&json!({
            "installed": {
                "client_id": "id",
                "client_secret": "s",
                "redirect_uris": []
            }
        }))
        .unwrap_err();

        assert!(matches!(err, AuthError::ConfigIncomplete { .. }));
    }

    #[test]
    fn test_empty_section_is_incomplete() {
        let err = parse_credentials(&json!({ "web": {} })).unwrap_err();

        match err {
            AuthError::ConfigIncomplete { missing } => {
                assert_eq!(missing, "client_secret, client_id, redirect_uris")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_string_fields_are_incomplete() {
        let err = parse_credentials(&json!({
            "web": {
                "client_id": 42,
                "client_secret": "s",
                "redirect_uris": ["https://x"]
            }
        }))
        .unwrap_err();

        assert!(matches!(err, AuthError::ConfigIncomplete { .. }));
    }

    #[test]
    fn test_malformed_base64() {
        let err = load_credentials("%%% not base64 %%%").unwrap_err();
        assert!(matches!(err, AuthError::ConfigMalformed { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = load_credentials(&STANDARD.encode("{not json")).unwrap_err();
        assert!(matches!(err, AuthError::ConfigMalformed { .. }));
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_lenient_base64() {
        let raw = json!({ "access_token": "t1" }).to_string();

        let unpadded = URL_SAFE_NO_PAD.encode(&raw);
        assert_eq!(load_token(&unpadded).unwrap().access_token(), Some("t1"));

        let padded = STANDARD.encode(&raw);
        let wrapped = format!("  {}\n{}\n", &padded[..10], &padded[10..]);
        assert_eq!(load_token(&wrapped).unwrap().access_token(), Some("t1"));
    }

    #[test]
    fn test_load_token() {
        let token = load_token(&encode(&json!({ "access_token": "t1" }))).unwrap();
        assert_eq!(token.access_token(), Some("t1"));
    }

    #[test]
    fn test_malformed_token() {
        let err = load_token("not-base64-json!").unwrap_err();
        assert!(matches!(err, AuthError::TokenMalformed { .. }));

        let err = load_token(&STANDARD.encode("plain text")).unwrap_err();
        assert!(matches!(err, AuthError::TokenMalformed { .. }));
    }
}
