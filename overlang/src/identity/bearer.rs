//! Bearer credential resolution from the `Authorization` header.

use axum::http::{HeaderMap, header::AUTHORIZATION};

use super::IdentityError;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the bearer credential from request headers.
///
/// The prefix match is case-sensitive. Surrounding whitespace of the token
/// itself is ignored, but an empty remainder is rejected.
pub fn resolve_bearer_token(headers: &HeaderMap) -> Result<&str, IdentityError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(IdentityError::MissingToken)?;

    let value = header.to_str().map_err(|_| IdentityError::InvalidFormat)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(IdentityError::InvalidFormat)?
        .trim();

    if token.is_empty() {
        return Err(IdentityError::EmptyToken);
    }

    Ok(token)
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use axum::http::HeaderValue;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_bearer_roundtrip(token in "[A-Za-z0-9_.-]{1,200}") {
            let mut headers = HeaderMap::new();
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            );

            prop_assert_eq!(resolve_bearer_token(&headers).unwrap(), token.as_str());
        }

        #[test]
        fn prop_non_bearer_scheme_rejected(
            scheme in "(Basic|Digest|Token|bearer)",
            token in "[A-Za-z0-9]{1,50}",
        ) {
            let mut headers = HeaderMap::new();
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("{} {}", scheme, token)).unwrap(),
            );

            prop_assert_eq!(
                resolve_bearer_token(&headers),
                Err(IdentityError::InvalidFormat)
            );
        }
    }
}
