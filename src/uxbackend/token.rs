//! Onboarding Tokens
//!
//! A token is `base64(ticket JSON) "." base64(signature)`, where the
//! signature is RSA-PSS over the SHA-256 digest of the exact JSON bytes.

use crate::error::{Error, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use openssl::hash::MessageDigest;
use openssl::pkey::{PKey, Private};
use openssl::rsa::{Padding, Rsa};
use openssl::sign::{RsaPssSaltlen, Signer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Ticket embedded in an onboarding token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingTicket {
    pub id: String,

    /// Expiry in unix seconds, carried as a JSON string
    #[serde(with = "unix_seconds_string")]
    pub expiration_date: i64,

    /// Storage quota; absent means unlimited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota: Option<Quantity>,
}

impl OnboardingTicket {
    /// New ticket with a random id expiring `lifetime` from `now`
    pub fn new(now: DateTime<Utc>, lifetime: Duration, quota: Option<Quantity>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            expiration_date: (now + lifetime).timestamp(),
            quota,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.expiration_date
    }
}

mod unix_seconds_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

/// Signs tickets with an RSA private key
pub struct TokenSigner {
    key: PKey<Private>,
}

impl TokenSigner {
    /// Load a PEM-encoded RSA private key
    pub fn from_pem(pem: &[u8]) -> Result<Self> {
        let rsa = Rsa::private_key_from_pem(pem)?;
        Ok(Self {
            key: PKey::from_rsa(rsa)?,
        })
    }

    /// Load the key from `path`
    pub fn from_pem_file(path: &Path) -> Result<Self> {
        let signing_key_error = |reason: String| Error::SigningKey {
            path: path.display().to_string(),
            reason,
        };
        let pem = std::fs::read(path).map_err(|e| signing_key_error(e.to_string()))?;
        Self::from_pem(&pem).map_err(|e| signing_key_error(e.to_string()))
    }

    /// Serialize and sign `ticket`, returning the encoded token
    pub fn sign(&self, ticket: &OnboardingTicket) -> Result<String> {
        let payload = serde_json::to_vec(ticket)?;

        let mut signer = Signer::new(MessageDigest::sha256(), &self.key)?;
        signer.set_rsa_padding(Padding::PKCS1_PSS)?;
        signer.set_rsa_pss_saltlen(RsaPssSaltlen::MAXIMUM_LENGTH)?;
        signer.update(&payload)?;
        let signature = signer.sign_to_vec()?;

        Ok(format!(
            "{}.{}",
            STANDARD.encode(&payload),
            STANDARD.encode(signature)
        ))
    }
}

/// Generate a signed onboarding token valid for `lifetime_hours`
///
/// The key is read from disk on every call so a rotated key is picked up
/// without a restart.
pub fn generate_onboarding_token(
    lifetime_hours: u32,
    private_key_path: &Path,
    quota: Option<Quantity>,
) -> Result<String> {
    let signer = TokenSigner::from_pem_file(private_key_path)?;
    let ticket = OnboardingTicket::new(Utc::now(), Duration::hours(i64::from(lifetime_hours)), quota);
    signer.sign(&ticket)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use openssl::sign::Verifier;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) fn key_file() -> (NamedTempFile, PKey<Private>) {
        let rsa = Rsa::generate(2048).unwrap();
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&rsa.private_key_to_pem().unwrap()).unwrap();
        (file, PKey::from_rsa(rsa).unwrap())
    }

    /// Split a token, check its signature, and return the ticket
    pub(crate) fn verify(token: &str, key: &PKey<Private>) -> OnboardingTicket {
        let (payload, signature) = token.split_once('.').unwrap();
        let payload = STANDARD.decode(payload).unwrap();
        let signature = STANDARD.decode(signature).unwrap();

        let mut verifier = Verifier::new(MessageDigest::sha256(), key).unwrap();
        verifier.set_rsa_padding(Padding::PKCS1_PSS).unwrap();
        verifier.set_rsa_pss_saltlen(RsaPssSaltlen::MAXIMUM_LENGTH).unwrap();
        verifier.update(&payload).unwrap();
        assert!(verifier.verify(&signature).unwrap());

        serde_json::from_slice(&payload).unwrap()
    }

    #[test]
    fn test_ticket_wire_format() {
        let ticket = OnboardingTicket {
            id: "abc".into(),
            expiration_date: 1700000000,
            quota: Some(Quantity("10Gi".into())),
        };
        assert_eq!(
            serde_json::to_string(&ticket).unwrap(),
            r#"{"id":"abc","expirationDate":"1700000000","quota":"10Gi"}"#
        );

        let unlimited = OnboardingTicket { quota: None, ..ticket };
        assert_eq!(
            serde_json::to_string(&unlimited).unwrap(),
            r#"{"id":"abc","expirationDate":"1700000000"}"#
        );
    }

    #[test]
    fn test_ticket_expiry() {
        let now = Utc::now();
        let ticket = OnboardingTicket::new(now, Duration::hours(48), None);

        assert_eq!(ticket.expiration_date, now.timestamp() + 48 * 3600);
        assert!(!ticket.is_expired(now));
        assert!(ticket.is_expired(now + Duration::hours(48)));
        assert!(Uuid::parse_str(&ticket.id).is_ok());
    }

    #[test]
    fn test_generate_and_verify() {
        let (file, key) = key_file();
        let before = Utc::now().timestamp();

        let token = generate_onboarding_token(2, file.path(), Some(Quantity("5Ti".into()))).unwrap();
        let ticket = verify(&token, &key);

        assert_eq!(ticket.quota, Some(Quantity("5Ti".into())));
        assert!(ticket.expiration_date >= before + 2 * 3600);
        assert!(ticket.expiration_date <= Utc::now().timestamp() + 2 * 3600);
    }

    #[test]
    fn test_missing_key_file() {
        let result = generate_onboarding_token(48, Path::new("/nonexistent/key"), None);
        assert_matches!(result, Err(Error::SigningKey { path, .. }) if path == "/nonexistent/key");
    }

    #[test]
    fn test_invalid_key_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not a key").unwrap();

        assert_matches!(
            generate_onboarding_token(48, file.path(), None),
            Err(Error::SigningKey { .. })
        );
    }
}
