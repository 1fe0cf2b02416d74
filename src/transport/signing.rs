use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::domain::{AccountSecret, AccountToken};

/// Scheme name used in the `Authorization` header and as the date header prefix.
pub const AUTH_SCHEME: &str = "SignalVine";
pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const DATE_HEADER: &str = "SignalVine-Date";
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Compute the base64 HMAC-SHA256 signature SignalVine expects.
///
/// The signed string is `token`, `action`, `path`, `body` and `timestamp`
/// joined by `\n`, lower-cased as a whole. `path` must not carry a query
/// string; pass an empty `body` for requests without one.
pub fn sign_request(
    token: &str,
    secret: &str,
    action: &str,
    path: &str,
    body: &str,
    timestamp: &str,
) -> String {
    let canonical = [token, action, path, body, timestamp]
        .join("\n")
        .to_lowercase();

    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any size");
    mac.update(canonical.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Render a timestamp the way the date header carries it
/// (`1969-07-20T20:17:00+00:00`, with microseconds when non-zero).
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    let format = if at.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    at.to_rfc3339_opts(format, false)
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One outbound call, signed.
///
/// The timestamp is fixed at construction and reused for the date header, so
/// the signature and the header always agree.
pub struct SignedRequest {
    method: Method,
    path: String,
    body: String,
    timestamp: String,
    token: String,
    signature: String,
}

impl SignedRequest {
    /// Sign with the current time.
    pub fn new(
        token: &AccountToken,
        secret: &AccountSecret,
        method: Method,
        path: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::at(token, secret, method, path, body, Utc::now())
    }

    /// Sign with a caller-supplied time.
    pub fn at(
        token: &AccountToken,
        secret: &AccountSecret,
        method: Method,
        path: impl Into<String>,
        body: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        let path = path.into();
        let body = body.into();
        let timestamp = format_timestamp(at);
        let signature = sign_request(
            token.as_str(),
            secret.expose(),
            method.as_str(),
            &path,
            &body,
            &timestamp,
        );
        Self {
            method,
            path,
            body,
            timestamp,
            token: token.as_str().to_owned(),
            signature,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// `SignalVine <token>:<signature>`
    pub fn authorization(&self) -> String {
        format!("{AUTH_SCHEME} {}:{}", self.token, self.signature)
    }

    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE.to_owned()),
            (AUTHORIZATION_HEADER, self.authorization()),
            (DATE_HEADER, self.timestamp.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const MOON_LANDING: &str = "1969-07-20T20:17:00+00:00";

    fn moon_landing() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1969, 7, 20, 20, 17, 0).unwrap()
    }

    #[test]
    fn sign_request_matches_known_vector() {
        let signature = sign_request(
            "INVENTED_TOKEN",
            "INVENTED_SECRET",
            "GET",
            "/bogus",
            "",
            MOON_LANDING,
        );
        assert_eq!(signature, "P1f0up2G0I6tJG4D3nRed/IlvvT2tqEQqbqEPXNQXDo=");
    }

    #[test]
    fn sign_request_commits_to_path_and_body() {
        let other_path = sign_request(
            "INVENTED_TOKEN",
            "INVENTED_SECRET",
            "GET",
            "/bogus2",
            "",
            MOON_LANDING,
        );
        assert_eq!(other_path, "eJouEESiKB0acNOuhoBfYcpePoC0UmY1vEUedqFvouw=");

        let with_body = sign_request(
            "INVENTED_TOKEN",
            "INVENTED_SECRET",
            "POST",
            "/bogus",
            r#"{"a":1}"#,
            MOON_LANDING,
        );
        assert_eq!(with_body, "s07EkvcyVM+KWkOs4Ao00WImFDu0yY7zRtIFuYD+VBk=");
    }

    #[test]
    fn sign_request_is_deterministic_and_input_sensitive() {
        let base = sign_request("t", "s", "GET", "/a", "", MOON_LANDING);
        assert_eq!(base, sign_request("t", "s", "GET", "/a", "", MOON_LANDING));

        let variants = [
            sign_request("t2", "s", "GET", "/a", "", MOON_LANDING),
            sign_request("t", "s2", "GET", "/a", "", MOON_LANDING),
            sign_request("t", "s", "POST", "/a", "", MOON_LANDING),
            sign_request("t", "s", "GET", "/ab", "", MOON_LANDING),
            sign_request("t", "s", "GET", "/a", "x", MOON_LANDING),
            sign_request("t", "s", "GET", "/a", "", "1969-07-20T20:17:01+00:00"),
        ];
        for variant in variants {
            assert_ne!(variant, base);
        }
    }

    #[test]
    fn canonical_string_is_lower_cased() {
        assert_eq!(
            sign_request("TOKEN", "s", "GET", "/A", "", MOON_LANDING),
            sign_request("token", "s", "get", "/a", "", MOON_LANDING),
        );
    }

    #[test]
    fn timestamps_render_like_iso_8601_with_offset() {
        assert_eq!(format_timestamp(moon_landing()), MOON_LANDING);

        let with_micros = Utc
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(123_456))
            .unwrap();
        assert_eq!(
            format_timestamp(with_micros),
            "2024-01-02T03:04:05.123456+00:00"
        );
    }

    #[test]
    fn headers_carry_signature_for_the_same_timestamp() {
        let token = AccountToken::new("INVENTED_TOKEN").unwrap();
        let secret = AccountSecret::new("INVENTED_SECRET").unwrap();
        let signed = SignedRequest::at(&token, &secret, Method::Get, "/bogus", "", moon_landing());

        assert_eq!(signed.method(), Method::Get);
        assert_eq!(signed.path(), "/bogus");
        assert_eq!(signed.body(), "");
        assert_eq!(signed.timestamp(), MOON_LANDING);
        let headers = signed.headers();
        assert_eq!(
            headers,
            vec![
                ("Content-Type", "application/json".to_owned()),
                (
                    "Authorization",
                    "SignalVine INVENTED_TOKEN:P1f0up2G0I6tJG4D3nRed/IlvvT2tqEQqbqEPXNQXDo="
                        .to_owned()
                ),
                ("SignalVine-Date", MOON_LANDING.to_owned()),
            ]
        );
    }

    #[test]
    fn fresh_requests_use_their_own_timestamp() {
        let token = AccountToken::new("INVENTED_TOKEN").unwrap();
        let secret = AccountSecret::new("INVENTED_SECRET").unwrap();
        let signed = SignedRequest::new(&token, &secret, Method::Get, "/bogus", "");

        assert!(signed.timestamp().ends_with("+00:00"));
        assert_eq!(
            signed.signature(),
            sign_request(
                "INVENTED_TOKEN",
                "INVENTED_SECRET",
                "GET",
                "/bogus",
                "",
                signed.timestamp(),
            )
        );
    }
}
