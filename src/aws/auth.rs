//! AWS credentials and request signing
//!
//! Credentials arrive in the tenant's service configuration; there is no
//! ambient credential discovery in the gateway model. Signing implements
//! AWS signature version 2 (HmacSHA256 over the canonical query string),
//! which is what the SimpleDB query API expects.

use crate::config::ServiceConfig;
use crate::error::{AdapterError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Validated AWS credentials for one adapter instance
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key: String,
    secret_key: String,
    pub session_token: Option<String>,
}

// Secrets must never reach logs, even through debug formatting
impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_deref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl AwsCredentials {
    /// Build credentials from the tenant's service configuration.
    /// Missing or empty keys are a fatal configuration error: the adapter
    /// must refuse to serve rather than run without a backend connection.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let access_key = config
            .access_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AdapterError::Config("AWS access key is not configured".into()))?;
        let secret_key = config
            .secret_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AdapterError::Config("AWS secret key is not configured".into()))?;

        Ok(Self {
            access_key: access_key.to_string(),
            secret_key: secret_key.to_string(),
            session_token: config.session_token.clone(),
        })
    }

    /// Sign a set of action parameters for a POST against `host`.
    ///
    /// Adds the standard signing parameters (`AWSAccessKeyId`,
    /// `SignatureVersion`, `SignatureMethod`, `Timestamp`, optional
    /// `SecurityToken`) and returns the final parameter list including
    /// the `Signature` entry, ready for form encoding.
    pub fn sign(&self, host: &str, params: &[(String, String)]) -> Vec<(String, String)> {
        let mut signed: Vec<(String, String)> = params.to_vec();
        signed.push(("AWSAccessKeyId".into(), self.access_key.clone()));
        signed.push(("SignatureVersion".into(), "2".into()));
        signed.push(("SignatureMethod".into(), "HmacSHA256".into()));
        signed.push((
            "Timestamp".into(),
            Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        ));
        if let Some(token) = &self.session_token {
            signed.push(("SecurityToken".into(), token.clone()));
        }

        let string_to_sign = format!("POST\n{}\n/\n{}", host, canonical_query(&signed));
        signed.push(("Signature".into(), self.hmac_base64(&string_to_sign)));
        signed
    }

    fn hmac_base64(&self, input: &str) -> String {
        // new_from_slice only fails on invalid key lengths, which HMAC
        // does not have
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .unwrap_or_else(|_| unreachable!("HMAC accepts any key length"));
        mac.update(input.as_bytes());
        BASE64.encode(mac.finalize().into_bytes())
    }
}

/// Canonical query string: parameters sorted by name, RFC 3986
/// percent-encoded, joined with `&`
fn canonical_query(params: &[(String, String)]) -> String {
    let mut pairs: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    pairs.sort();

    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(access: &str, secret: &str) -> ServiceConfig {
        ServiceConfig {
            access_key: Some(access.to_string()),
            secret_key: Some(secret.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let err = AwsCredentials::from_config(&ServiceConfig::default()).unwrap_err();
        assert_eq!(err.status(), 500);

        let err = AwsCredentials::from_config(&config("AKIDEXAMPLE", "  ")).unwrap_err();
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn test_sign_adds_signature_params() {
        let creds = AwsCredentials::from_config(&config("AKIDEXAMPLE", "secret")).unwrap();
        let signed = creds.sign(
            "sdb.us-east-1.amazonaws.com",
            &[("Action".into(), "ListDomains".into())],
        );

        let names: Vec<&str> = signed.iter().map(|(k, _)| k.as_str()).collect();
        for expected in [
            "Action",
            "AWSAccessKeyId",
            "SignatureVersion",
            "SignatureMethod",
            "Timestamp",
            "Signature",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mut config = config("AKIDEXAMPLE", "TOPSECRETVALUE");
        config.session_token = Some("SESSIONTOKENVALUE".into());
        let creds = AwsCredentials::from_config(&config).unwrap();

        let formatted = format!("{creds:?}");
        assert!(formatted.contains("AKIDEXAMPLE"));
        assert!(!formatted.contains("TOPSECRETVALUE"));
        assert!(!formatted.contains("SESSIONTOKENVALUE"));
    }

    #[test]
    fn test_canonical_query_sorted_and_encoded() {
        let query = canonical_query(&[
            ("b".into(), "2".into()),
            ("a".into(), "one two".into()),
        ]);
        assert_eq!(query, "a=one%20two&b=2");
    }
}
