//! AWS Signature Version 4 for single S3 requests
//!
//! Only what `PutObject` needs: no query string, signed payload hash,
//! all supplied headers signed.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Request fields covered by the signature
#[derive(Debug, Clone)]
pub struct SigningRequest<'a> {
    pub method: &'a str,
    /// Already URI-encoded path, e.g. `/bucket/lessons/a.mp4`
    pub canonical_uri: &'a str,
    /// Header name/value pairs; must include `host`, `x-amz-date` and
    /// `x-amz-content-sha256`
    pub headers: &'a [(String, String)],
    pub payload_hash: &'a str,
    pub timestamp: DateTime<Utc>,
    pub region: &'a str,
    pub service: &'a str,
}

/// Access key pair
#[derive(Debug, Clone)]
pub struct SigningKey<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
}

/// `YYYYMMDDTHHMMSSZ`
pub fn amz_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Lowercase hex SHA-256
pub fn sha256_hex(data: &[u8]) -> String {
    format!("{:x}", Sha256::digest(data))
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Percent-encode an object path segment by segment, keeping `/`
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Sorted, lowercased header list as `(canonical block, signed header names)`
fn canonical_headers(headers: &[(String, String)]) -> (String, String) {
    let mut normalized: Vec<(String, String)> = headers
        .iter()
        .map(|(name, value)| {
            let value = value.split_whitespace().collect::<Vec<_>>().join(" ");
            (name.to_ascii_lowercase(), value)
        })
        .collect();
    normalized.sort();

    let block = normalized
        .iter()
        .map(|(name, value)| format!("{}:{}\n", name, value))
        .collect::<String>();
    let signed = normalized
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(";");
    (block, signed)
}

/// Canonical request string (step 1 of SigV4)
pub fn canonical_request(request: &SigningRequest<'_>) -> String {
    let (headers, signed_headers) = canonical_headers(request.headers);
    format!(
        "{}\n{}\n\n{}\n{}\n{}",
        request.method, request.canonical_uri, headers, signed_headers, request.payload_hash
    )
}

/// `Authorization` header value for a request
pub fn authorization_header(request: &SigningRequest<'_>, key: &SigningKey<'_>) -> String {
    let date_stamp = request.timestamp.format("%Y%m%d").to_string();
    let scope = format!(
        "{}/{}/{}/aws4_request",
        date_stamp, request.region, request.service
    );

    let (_, signed_headers) = canonical_headers(request.headers);
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date(request.timestamp),
        scope,
        sha256_hex(canonical_request(request).as_bytes())
    );

    let k_date = hmac(
        format!("AWS4{}", key.secret_access_key).as_bytes(),
        date_stamp.as_bytes(),
    );
    let k_region = hmac(&k_date, request.region.as_bytes());
    let k_service = hmac(&k_region, request.service.as_bytes());
    let k_signing = hmac(&k_service, b"aws4_request");
    let signature = hmac(&k_signing, string_to_sign.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<String>();

    format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, key.access_key_id, scope, signed_headers, signature
    )
}
