//! Identity header parsing.
//!
//! The upstream gateway forwards the caller's identity as a single header of
//! comma-separated `key:value` pairs, for example
//! `userId:ALFKI,orderId:10248`. Parsing never fails: anything malformed
//! degrades to an absent claim.

use access_gate_sdk::ClaimSet;
use http::HeaderMap;

pub const USER_ID_KEY: &str = "userId";
pub const ORDER_ID_KEY: &str = "orderId";

/// Parse an identity header value into a [`ClaimSet`].
///
/// - pairs are separated by `,`, keys from values by the first `:`
/// - keys and values are trimmed, keys compared case-insensitively
/// - pairs without `:` or with an empty key are skipped
/// - an empty value leaves the claim absent; the last occurrence wins
#[must_use]
pub fn resolve(header_value: Option<&str>) -> ClaimSet {
    let mut claims = ClaimSet::default();
    let Some(raw) = header_value else {
        return claims;
    };

    for pair in raw.split(',') {
        let Some((key, value)) = pair.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() {
            continue;
        }

        let claim = (!value.is_empty()).then(|| value.to_owned());
        if key.eq_ignore_ascii_case(USER_ID_KEY) {
            claims.user_id = claim;
        } else if key.eq_ignore_ascii_case(ORDER_ID_KEY) {
            claims.tenant_order_id = claim;
        }
        claims.raw_pairs.insert(key.to_owned(), value.to_owned());
    }

    claims
}

/// Read `header_name` from `headers` and parse it.
///
/// A header that is not visible ASCII is treated as absent.
#[must_use]
pub fn resolve_from_headers(headers: &HeaderMap, header_name: &str) -> ClaimSet {
    let value = match headers.get(header_name).map(|v| v.to_str()) {
        Some(Ok(value)) => Some(value),
        Some(Err(_)) => {
            tracing::debug!(header = header_name, "identity header is not visible ASCII, ignoring");
            None
        }
        None => None,
    };
    resolve(value)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn parses_both_claims() {
        let claims = resolve(Some("userId:BLONP,orderId:10248"));
        assert_eq!(claims.user_id.as_deref(), Some("BLONP"));
        assert_eq!(claims.tenant_order_id.as_deref(), Some("10248"));
    }

    #[test]
    fn missing_or_empty_header_is_anonymous() {
        assert!(resolve(None).is_anonymous());
        assert!(resolve(Some("")).is_anonymous());
        assert!(resolve(Some("   ")).is_anonymous());
    }

    #[test]
    fn keys_are_case_insensitive_and_trimmed() {
        let claims = resolve(Some(" USERID : ALFKI , OrderID:42 "));
        assert_eq!(claims.user_id.as_deref(), Some("ALFKI"));
        assert_eq!(claims.tenant_order_id.as_deref(), Some("42"));
    }

    #[test]
    fn value_keeps_text_after_first_colon() {
        let claims = resolve(Some("userId:a:b:c"));
        assert_eq!(claims.user_id.as_deref(), Some("a:b:c"));
    }

    #[test]
    fn malformed_pairs_are_skipped() {
        let claims = resolve(Some("garbage,:orphan,userId:ANATR,,"));
        assert_eq!(claims.user_id.as_deref(), Some("ANATR"));
        assert_eq!(claims.raw_pairs.len(), 1);
    }

    #[test]
    fn empty_value_means_absent_and_last_wins() {
        let claims = resolve(Some("userId:ALFKI,userId:"));
        assert_eq!(claims.user_id, None);

        let claims = resolve(Some("orderId:1,orderId:2"));
        assert_eq!(claims.tenant_order_id.as_deref(), Some("2"));
    }

    #[test]
    fn unknown_keys_are_kept_as_raw_pairs() {
        let claims = resolve(Some("region:EU,userId:ALFKI"));
        assert_eq!(claims.raw_pairs.get("region").map(String::as_str), Some("EU"));
        assert_eq!(claims.user_id.as_deref(), Some("ALFKI"));
        assert_eq!(claims.tenant_order_id, None);
    }

    #[test]
    fn reads_configured_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-header-one", HeaderValue::from_static("userId:ALFKI"));
        headers.insert("x-other", HeaderValue::from_static("userId:BLONP"));

        let claims = resolve_from_headers(&headers, "x-header-one");
        assert_eq!(claims.user_id.as_deref(), Some("ALFKI"));

        let claims = resolve_from_headers(&headers, "X-Other");
        assert_eq!(claims.user_id.as_deref(), Some("BLONP"));

        assert!(resolve_from_headers(&headers, "x-missing").is_anonymous());
    }

    #[test]
    fn non_ascii_header_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-header-one",
            HeaderValue::from_bytes(b"userId:\xffBAD").unwrap(),
        );
        assert!(resolve_from_headers(&headers, "x-header-one").is_anonymous());
    }
}
