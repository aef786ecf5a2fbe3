//! AWS Signature Version 4
//!
//! Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/create-signed-request.html>

use std::fmt::Write;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::error::{Result, Route53Error};
use crate::request::PreparedRequest;
use crate::types::Credentials;
use crate::utils::log_sanitizer::truncate_for_log;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const AMZ_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const SCOPE_DATE_FORMAT: &str = "%Y%m%d";

/// Produces the headers that authenticate a request.
///
/// The returned headers are added to the request as-is. Implement this to plug
/// in another credential source or to send unsigned requests to a local stub.
pub trait RequestSigner: Send + Sync {
    fn sign(&self, request: &PreparedRequest) -> Result<Vec<(String, String)>>;
}

/// Signs requests with static credentials.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    credentials: Credentials,
}

impl SigV4Signer {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Signs as of `now`; [`RequestSigner::sign`] uses the current time.
    pub fn sign_at(
        &self,
        request: &PreparedRequest,
        now: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>> {
        let amz_date = now.format(AMZ_DATE_FORMAT).to_string();
        let scope_date = now.format(SCOPE_DATE_FORMAT).to_string();

        // 1. Headers covered by the signature, already in sorted order
        let mut headers = vec![
            ("host".to_string(), request.endpoint.authority()),
            (
                "x-amz-content-sha256".to_string(),
                request.content_sha256.clone(),
            ),
            ("x-amz-date".to_string(), amz_date.clone()),
        ];
        if let Some(token) = &self.credentials.session_token {
            headers.push(("x-amz-security-token".to_string(), token.clone()));
        }

        // 2. Canonical request
        let (canonical_request, signed_headers) = canonical_request(request, &headers);
        log::debug!(
            "[route53] CanonicalRequest:\n{}",
            truncate_for_log(&canonical_request)
        );

        // 3. String to sign
        let credential_scope = format!(
            "{scope_date}/{}/{}/aws4_request",
            request.region, request.service
        );
        let hashed_canonical_request = hex::encode(Sha256::digest(canonical_request.as_bytes()));
        let string_to_sign =
            format!("{ALGORITHM}\n{amz_date}\n{credential_scope}\n{hashed_canonical_request}");
        log::debug!("[route53] StringToSign:\n{string_to_sign}");

        // 4. Signature
        let signing_key = signing_key(
            &self.credentials.secret_access_key,
            &scope_date,
            &request.region,
            &request.service,
        )?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        // 5. Authorization header
        headers.push((
            "authorization".to_string(),
            format!(
                "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={signed_headers}, Signature={signature}",
                self.credentials.access_key_id
            ),
        ));
        Ok(headers)
    }
}

impl RequestSigner for SigV4Signer {
    fn sign(&self, request: &PreparedRequest) -> Result<Vec<(String, String)>> {
        self.sign_at(request, Utc::now())
    }
}

/// Builds the canonical request; returns it with the `SignedHeaders` list.
fn canonical_request(
    request: &PreparedRequest,
    headers: &[(String, String)],
) -> (String, String) {
    // Each already-encoded path segment is encoded a second time.
    let canonical_uri: String = request
        .path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| format!("/{}", urlencoding::encode(segment)))
        .collect();
    let canonical_uri = if canonical_uri.is_empty() {
        "/".to_string()
    } else {
        canonical_uri
    };

    let mut query: Vec<(String, String)> = request
        .query
        .iter()
        .map(|(k, v)| {
            (
                urlencoding::encode(k).into_owned(),
                urlencoding::encode(v).into_owned(),
            )
        })
        .collect();
    query.sort_unstable();
    let canonical_query = query
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let canonical_headers = headers.iter().fold(String::new(), |mut acc, (k, v)| {
        let _ = writeln!(acc, "{k}:{}", v.trim());
        acc
    });
    let signed_headers = headers
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical = format!(
        "{}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{}",
        request.method, request.content_sha256
    );
    (canonical, signed_headers)
}

/// `kSigning = HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")`
fn signing_key(secret: &str, date: &str, region: &str, service: &str) -> Result<Vec<u8>> {
    let k_date = hmac_sha256(format!("AWS4{secret}").as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, service.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| Route53Error::SigningError {
        detail: e.to_string(),
    })?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use reqwest::Method;

    use super::*;
    use crate::request::{Endpoint, content_sha256};

    fn request(method: Method, path: &str, query: &[(&str, &str)], body: &[u8]) -> PreparedRequest {
        PreparedRequest {
            method,
            endpoint: Endpoint::default(),
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            body: body.to_vec(),
            content_sha256: content_sha256(body),
            region: "us-east-1".to_string(),
            service: "route53".to_string(),
        }
    }

    fn signer() -> SigV4Signer {
        SigV4Signer::new(Credentials::new(
            "AKIDEXAMPLE",
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
        ))
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2015, 8, 30, 12, 36, 0).unwrap()
    }

    fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
        headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn extract_signature(auth: &str) -> &str {
        auth.split("Signature=").nth(1).unwrap()
    }

    #[test]
    fn signing_key_matches_published_vector() {
        let key = signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        )
        .unwrap();
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn sign_output_headers() {
        let req = request(Method::GET, "/2013-04-01/hostedzone", &[], b"");
        let headers = signer().sign_at(&req, at()).unwrap();

        assert_eq!(header(&headers, "host"), Some("route53.amazonaws.com"));
        assert_eq!(header(&headers, "x-amz-date"), Some("20150830T123600Z"));
        assert_eq!(
            header(&headers, "x-amz-content-sha256"),
            Some("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
        assert!(header(&headers, "x-amz-security-token").is_none());

        let auth = header(&headers, "authorization").unwrap();
        assert!(auth.starts_with(
            "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/route53/aws4_request, \
             SignedHeaders=host;x-amz-content-sha256;x-amz-date, Signature="
        ));
        let signature = extract_signature(auth);
        assert_eq!(signature.len(), 64);
        assert!(signature.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn session_token_is_signed() {
        let signer = SigV4Signer::new(
            Credentials::new("AKID", "secret").with_session_token("token-value"),
        );
        let req = request(Method::GET, "/2013-04-01/hostedzone", &[], b"");
        let headers = signer.sign_at(&req, at()).unwrap();

        assert_eq!(header(&headers, "x-amz-security-token"), Some("token-value"));
        assert!(
            header(&headers, "authorization")
                .unwrap()
                .contains("SignedHeaders=host;x-amz-content-sha256;x-amz-date;x-amz-security-token,")
        );
    }

    #[test]
    fn sign_deterministic() {
        let req = request(Method::POST, "/2013-04-01/hostedzone", &[], b"<x/>");
        assert_eq!(
            signer().sign_at(&req, at()).unwrap(),
            signer().sign_at(&req, at()).unwrap()
        );
    }

    #[test]
    fn canonical_request_layout() {
        let req = request(
            Method::GET,
            "/2013-04-01/hostedzone/Z1/rrset",
            &[("type", "NS"), ("maxitems", "10"), ("name", "a b.")],
            b"",
        );
        let headers = vec![
            ("host".to_string(), "route53.amazonaws.com".to_string()),
            ("x-amz-date".to_string(), "20150830T123600Z".to_string()),
        ];
        let (canonical, signed) = canonical_request(&req, &headers);
        assert_eq!(signed, "host;x-amz-date");
        assert_eq!(
            canonical,
            "GET\n\
             /2013-04-01/hostedzone/Z1/rrset\n\
             maxitems=10&name=a%20b.&type=NS\n\
             host:route53.amazonaws.com\n\
             x-amz-date:20150830T123600Z\n\
             \n\
             host;x-amz-date\n\
             e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn encoded_segments_are_encoded_again() {
        let req = request(Method::GET, "/2013-04-01/hostedzone/Z%2F1", &[], b"");
        let (canonical, _) = canonical_request(&req, &[]);
        assert!(canonical.contains("\n/2013-04-01/hostedzone/Z%252F1\n"));
    }

    #[test]
    fn query_order_does_not_change_signature() {
        let a = request(Method::GET, "/", &[("b", "2"), ("a", "1")], b"");
        let b = request(Method::GET, "/", &[("a", "1"), ("b", "2")], b"");
        let sig_a = signer().sign_at(&a, at()).unwrap();
        let sig_b = signer().sign_at(&b, at()).unwrap();
        assert_eq!(
            extract_signature(header(&sig_a, "authorization").unwrap()),
            extract_signature(header(&sig_b, "authorization").unwrap())
        );
    }

    #[test]
    fn body_and_method_change_signature() {
        let get = request(Method::GET, "/2013-04-01/hostedzone", &[], b"");
        let post = request(Method::POST, "/2013-04-01/hostedzone", &[], b"");
        let post_body = request(Method::POST, "/2013-04-01/hostedzone", &[], b"<x/>");

        let sig = |req: &PreparedRequest| {
            let headers = signer().sign_at(req, at()).unwrap();
            extract_signature(header(&headers, "authorization").unwrap()).to_string()
        };
        assert_ne!(sig(&get), sig(&post));
        assert_ne!(sig(&post), sig(&post_body));
    }
}
