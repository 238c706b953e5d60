use super::sigv4::{self, SigningKey, SigningRequest};
use super::{validate_key, ObjectStore, PutObject};
use crate::config::BucketCredentials;
use crate::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info};

const SERVICE_NAME: &str = "Object storage";
const UPLOAD_TIMEOUT_SECS: u64 = 300;

/// S3-compatible bucket store (Cloudflare R2)
pub struct R2Store {
    http_client: reqwest::Client,
    credentials: BucketCredentials,
    host: String,
}

impl R2Store {
    pub fn new(credentials: BucketCredentials) -> Result<Self> {
        let endpoint = reqwest::Url::parse(&credentials.endpoint).map_err(|e| {
            Error::Config(format!("Invalid storage endpoint {}: {}", credentials.endpoint, e))
        })?;
        let host = match (endpoint.host_str(), endpoint.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(Error::Config(format!(
                    "Storage endpoint has no host: {}",
                    credentials.endpoint
                )))
            }
        };

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            credentials,
            host,
        })
    }

    /// Path-style URI for a key: `/<bucket>/<key>`
    fn canonical_uri(&self, key: &str) -> String {
        format!(
            "/{}/{}",
            urlencoding::encode(&self.credentials.bucket),
            sigv4::encode_path(key)
        )
    }

    /// Where the stored object is publicly reachable
    pub fn public_url(&self, key: &str) -> String {
        match &self.credentials.custom_domain {
            Some(domain) => format!("https://{}/{}", domain.trim_end_matches('/'), key),
            None => format!("{}{}", self.credentials.endpoint, self.canonical_uri(key)),
        }
    }
}

#[async_trait]
impl ObjectStore for R2Store {
    async fn put(&self, object: PutObject) -> Result<String> {
        validate_key(&object.key)?;

        let canonical_uri = self.canonical_uri(&object.key);
        let payload_hash = sigv4::sha256_hex(&object.body);
        let timestamp = Utc::now();

        let mut headers = vec![
            ("host".to_string(), self.host.clone()),
            ("content-type".to_string(), object.content_type.clone()),
            ("x-amz-content-sha256".to_string(), payload_hash.clone()),
            ("x-amz-date".to_string(), sigv4::amz_date(timestamp)),
        ];
        for (name, value) in &object.metadata {
            headers.push((format!("x-amz-meta-{}", name.to_ascii_lowercase()), value.clone()));
        }

        let authorization = sigv4::authorization_header(
            &SigningRequest {
                method: "PUT",
                canonical_uri: &canonical_uri,
                headers: &headers,
                payload_hash: &payload_hash,
                timestamp,
                region: &self.credentials.region,
                service: "s3",
            },
            &SigningKey {
                access_key_id: &self.credentials.access_key_id,
                secret_access_key: &self.credentials.secret_access_key,
            },
        );

        let url = format!("{}{}", self.credentials.endpoint, canonical_uri);
        debug!(key = %object.key, bytes = object.body.len(), "Uploading object");

        // reqwest sets Host itself from the URL
        let mut request = self
            .http_client
            .put(&url)
            .header("authorization", authorization);
        for (name, value) in headers.iter().filter(|(name, _)| name != "host") {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.body(object.body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(
                SERVICE_NAME,
                format!("upload of {} failed with {}: {}", object.key, status, body),
            ));
        }

        let public_url = self.public_url(&object.key);
        info!(key = %object.key, url = %public_url, "Uploaded object");
        Ok(public_url)
    }

    fn describe(&self) -> String {
        format!("bucket {} at {}", self.credentials.bucket, self.credentials.endpoint)
    }
}
