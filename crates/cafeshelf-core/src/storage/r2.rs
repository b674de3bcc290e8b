//! Cloudflare R2 blob storage backend.

use std::env;

use aws_credential_types::Credentials;
use aws_sdk_s3::{primitives::ByteStream, Client};
use aws_types::region::Region;

use crate::storage::BlobStore;
use crate::{Error, Result};

const ENV_ACCOUNT_ID: &str = "R2_ACCOUNT_ID";
const ENV_BUCKET: &str = "R2_BUCKET";
const ENV_ACCESS_KEY_ID: &str = "R2_ACCESS_KEY_ID";
const ENV_SECRET_ACCESS_KEY: &str = "R2_SECRET_ACCESS_KEY";
const ENV_PUBLIC_BASE_URL: &str = "R2_PUBLIC_BASE_URL";

/// Cloudflare R2 configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R2Config {
    /// Cloudflare account identifier.
    pub account_id: String,
    /// R2 bucket name.
    pub bucket: String,
    /// Access key id for S3-compatible auth.
    pub access_key_id: String,
    /// Secret access key for S3-compatible auth.
    pub secret_access_key: String,
    /// Public URL base for serving cover images.
    pub public_base_url: Option<String>,
}

impl R2Config {
    /// Load R2 configuration from environment variables.
    ///
    /// Returns `Ok(None)` when no R2 variables are set.
    /// Returns an error when only a partial configuration is provided.
    pub fn from_env() -> Result<Option<Self>> {
        parse_config(|key| env::var(key).ok())
    }

    /// Cloudflare R2 S3-compatible endpoint URL.
    #[must_use]
    pub fn endpoint_url(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}

/// R2-backed cover image storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct R2Storage {
    config: R2Config,
}

impl R2Storage {
    #[must_use]
    pub const fn new(config: R2Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &R2Config {
        &self.config
    }

    fn s3_client(&self) -> Client {
        let credentials = Credentials::new(
            self.config.access_key_id.clone(),
            self.config.secret_access_key.clone(),
            None,
            None,
            "cafeshelf-r2-storage",
        );

        let sdk_config = aws_sdk_s3::config::Builder::new()
            .region(Region::new("auto"))
            .credentials_provider(credentials)
            .endpoint_url(self.config.endpoint_url())
            .force_path_style(true)
            .build();

        Client::from_conf(sdk_config)
    }
}

impl BlobStore for R2Storage {
    async fn upload(
        &self,
        location: &str,
        bytes: &[u8],
        content_type: Option<&str>,
    ) -> Result<()> {
        let object_key = normalize_object_key(location)?;
        let client = self.s3_client();

        let mut request = client
            .put_object()
            .bucket(&self.config.bucket)
            .key(&object_key)
            .body(ByteStream::from(bytes.to_vec()));

        if let Some(content_type) = normalize_content_type(content_type) {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(|error| {
            Error::Upload(format!(
                "R2 put_object failed for {}/{object_key}: {error}",
                self.config.bucket
            ))
        })?;

        Ok(())
    }

    async fn download_url(&self, location: &str) -> Result<String> {
        let object_key = normalize_object_key(location)?;
        let base = self.config.public_base_url.as_ref().ok_or_else(|| {
            Error::Resolution(format!(
                "no public base URL configured for {}",
                self.config.bucket
            ))
        })?;

        Ok(format!("{base}/{object_key}"))
    }
}

fn parse_config(lookup: impl Fn(&str) -> Option<String>) -> Result<Option<R2Config>> {
    let account_id = lookup(ENV_ACCOUNT_ID).map(|value| value.trim().to_string());
    let bucket = lookup(ENV_BUCKET).map(|value| value.trim().to_string());
    let access_key_id = lookup(ENV_ACCESS_KEY_ID).map(|value| value.trim().to_string());
    let secret_access_key = lookup(ENV_SECRET_ACCESS_KEY).map(|value| value.trim().to_string());
    let public_base_url = lookup(ENV_PUBLIC_BASE_URL).map(|value| value.trim().to_string());

    let any_present = account_id.is_some()
        || bucket.is_some()
        || access_key_id.is_some()
        || secret_access_key.is_some()
        || public_base_url.is_some();

    if !any_present {
        return Ok(None);
    }

    let mut missing = Vec::new();
    if account_id.as_ref().map_or(true, String::is_empty) {
        missing.push(ENV_ACCOUNT_ID);
    }
    if bucket.as_ref().map_or(true, String::is_empty) {
        missing.push(ENV_BUCKET);
    }
    if access_key_id.as_ref().map_or(true, String::is_empty) {
        missing.push(ENV_ACCESS_KEY_ID);
    }
    if secret_access_key.as_ref().map_or(true, String::is_empty) {
        missing.push(ENV_SECRET_ACCESS_KEY);
    }

    if !missing.is_empty() {
        return Err(Error::InvalidInput(format!(
            "R2 configuration is incomplete. Missing: {}",
            missing.join(", ")
        )));
    }

    let public_base_url = normalize_public_base_url(public_base_url)?;

    Ok(Some(R2Config {
        account_id: account_id.expect("validated above"),
        bucket: bucket.expect("validated above"),
        access_key_id: access_key_id.expect("validated above"),
        secret_access_key: secret_access_key.expect("validated above"),
        public_base_url,
    }))
}

fn normalize_object_key(object_key: &str) -> Result<String> {
    let object_key = object_key.trim().trim_matches('/').to_string();
    if object_key.is_empty() {
        return Err(Error::InvalidInput(
            "Blob location cannot be empty".to_string(),
        ));
    }
    Ok(object_key)
}

fn normalize_content_type(content_type: Option<&str>) -> Option<String> {
    content_type
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

fn normalize_public_base_url(public_base_url: Option<String>) -> Result<Option<String>> {
    let Some(value) = public_base_url else {
        return Ok(None);
    };

    if value.is_empty() {
        return Ok(None);
    }
    if !value.starts_with("https://") && !value.starts_with("http://") {
        return Err(Error::InvalidInput(
            "R2_PUBLIC_BASE_URL must start with http:// or https://".to_string(),
        ));
    }

    Ok(Some(value.trim_end_matches('/').to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn parse_from_map(map: &HashMap<&str, &str>) -> Result<Option<R2Config>> {
        parse_config(|key| map.get(key).map(|value| (*value).to_string()))
    }

    fn sample_config() -> R2Config {
        R2Config {
            account_id: "account-1".to_string(),
            bucket: "bucket-a".to_string(),
            access_key_id: "AKID123".to_string(),
            secret_access_key: "SECRET123".to_string(),
            public_base_url: Some("https://cdn.example.com/media".to_string()),
        }
    }

    #[test]
    fn parse_config_none_returns_none() {
        let map = HashMap::new();
        assert!(parse_from_map(&map).unwrap().is_none());
    }

    #[test]
    fn parse_config_requires_all_required_values() {
        let mut map = HashMap::new();
        map.insert(ENV_ACCOUNT_ID, "account");
        map.insert(ENV_BUCKET, "bucket");

        let err = parse_from_map(&map).unwrap_err();
        match err {
            Error::InvalidInput(message) => {
                assert!(message.contains(ENV_ACCESS_KEY_ID));
                assert!(message.contains(ENV_SECRET_ACCESS_KEY));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parse_config_accepts_valid_values_and_normalizes_public_url() {
        let mut map = HashMap::new();
        map.insert(ENV_ACCOUNT_ID, "account-1");
        map.insert(ENV_BUCKET, "bucket-a");
        map.insert(ENV_ACCESS_KEY_ID, "AKID123");
        map.insert(ENV_SECRET_ACCESS_KEY, "SECRET123");
        map.insert(ENV_PUBLIC_BASE_URL, "https://cdn.example.com/media/");

        let config = parse_from_map(&map).unwrap().unwrap();
        assert_eq!(
            config.public_base_url.as_deref(),
            Some("https://cdn.example.com/media")
        );
        assert_eq!(
            config.endpoint_url(),
            "https://account-1.r2.cloudflarestorage.com"
        );
    }

    #[test]
    fn parse_config_rejects_invalid_public_base_url() {
        let mut map = HashMap::new();
        map.insert(ENV_ACCOUNT_ID, "account-1");
        map.insert(ENV_BUCKET, "bucket-a");
        map.insert(ENV_ACCESS_KEY_ID, "AKID123");
        map.insert(ENV_SECRET_ACCESS_KEY, "SECRET123");
        map.insert(ENV_PUBLIC_BASE_URL, "cdn.example.com/media");

        let err = parse_from_map(&map).unwrap_err();
        match err {
            Error::InvalidInput(message) => {
                assert!(message.contains("R2_PUBLIC_BASE_URL"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn download_url_joins_normalized_key() {
        let storage = R2Storage::new(sample_config());

        let url = storage
            .download_url("/cafe-images/a.jpg")
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.example.com/media/cafe-images/a.jpg");
    }

    #[tokio::test]
    async fn download_url_without_public_base_is_a_resolution_failure() {
        let mut config = sample_config();
        config.public_base_url = None;
        let storage = R2Storage::new(config);

        let error = storage.download_url("cafe-images/a.jpg").await.unwrap_err();
        assert!(matches!(error, Error::Resolution(_)));
    }

    #[test]
    fn normalize_object_key_rejects_empty() {
        let err = normalize_object_key("   ").unwrap_err();
        match err {
            Error::InvalidInput(message) => assert!(message.contains("location")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn normalize_content_type_ignores_empty_values() {
        assert_eq!(normalize_content_type(None), None);
        assert_eq!(normalize_content_type(Some("   ")), None);
        assert_eq!(
            normalize_content_type(Some(" image/png ")),
            Some("image/png".to_string())
        );
    }

    #[test]
    #[ignore = "Requires local R2 env vars in process environment or .env"]
    fn from_env_loads_real_r2_config() {
        let _ = dotenvy::dotenv();

        let config = R2Config::from_env()
            .expect("R2 env parsing should not error")
            .expect("R2 config should be present");

        assert!(!config.account_id.trim().is_empty());
        assert!(!config.bucket.trim().is_empty());
        assert_eq!(
            config.endpoint_url(),
            format!("https://{}.r2.cloudflarestorage.com", config.account_id)
        );
    }
}
