//! # Identity Resolution
//!
//! Turns the identity token carried in the page address into an [`Identity`].
//! Reading the address happens once, in [`read_identity_token`]; everything
//! after that works on the explicit token and is pure.
//!
//! ## Token Acceptance
//!
//! Tokens end up inside a storage path (`videos/{token}.mp4`), so only
//! ASCII alphanumerics, `-` and `_` are accepted, up to
//! [`MAX_IDENTITY_TOKEN_LEN`] characters. Anything else is rejected and the
//! request is treated as if no token had been sent.

use worker::Url;

use crate::constants::{FALLBACK_COMPANY_NAME, MAX_IDENTITY_TOKEN_LEN};
use crate::models::Identity;

/// Result of reading the identity parameter from a request URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenRead {
    Absent,
    Accepted(String),
    Rejected(String),
}

impl TokenRead {
    pub fn into_token(self) -> Option<String> {
        match self {
            TokenRead::Accepted(token) => Some(token),
            TokenRead::Absent | TokenRead::Rejected(_) => None,
        }
    }
}

/// Reads the first occurrence of `param` from the query string.
pub fn read_identity_token(url: &Url, param: &str) -> TokenRead {
    let value = url
        .query_pairs()
        .find(|(key, _)| key.as_ref() == param)
        .map(|(_, value)| value.into_owned());

    match value {
        None => TokenRead::Absent,
        Some(value) if value.is_empty() => TokenRead::Absent,
        Some(value) if is_valid_token(&value) => TokenRead::Accepted(value),
        Some(value) => TokenRead::Rejected(value),
    }
}

/// Checks whether `token` may be used as an identity.
///
/// Accepted tokens are 1 to 128 characters of ASCII letters, digits, `-`
/// or `_`. Anything else could escape the `videos/` folder once it is
/// spliced into a storage path.
///
/// # Arguments
///
/// * `token` - The raw query parameter value
///
/// # Returns
///
/// * `bool` - `true` when the token is safe to use
pub fn is_valid_token(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= MAX_IDENTITY_TOKEN_LEN
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Title-cases each `-`-separated segment and joins them with spaces.
///
/// ```text
/// "elite-dental"  -> "Elite Dental"
/// "ACME-robotics" -> "Acme Robotics"
/// ```
pub fn format_company_name(raw_id: Option<&str>) -> String {
    let raw_id = match raw_id {
        Some(raw_id) if !raw_id.is_empty() => raw_id,
        _ => return FALLBACK_COMPANY_NAME.to_string(),
    };

    raw_id
        .split('-')
        .map(capitalize_segment)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

/// Builds the identity for a visitor from the token read off the URL.
///
/// An empty token counts as absent. Without a token the company name falls
/// back to the placeholder shown on generic outreach pages.
///
/// # Arguments
///
/// * `raw_id` - The accepted identity token, if any
///
/// # Returns
///
/// * `Identity` - The raw token together with its display name
///
/// # Example
///
/// ```text
/// resolve_identity(Some("elite-dental")) -> { rawId: "elite-dental", companyName: "Elite Dental" }
/// resolve_identity(None)                 -> { rawId: null, companyName: "[Company Name]" }
/// ```
pub fn resolve_identity(raw_id: Option<String>) -> Identity {
    let raw_id = raw_id.filter(|id| !id.is_empty());
    let company_name = format_company_name(raw_id.as_deref());
    Identity {
        raw_id,
        company_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn formats_hyphenated_tokens() {
        assert_eq!(format_company_name(Some("elite-dental")), "Elite Dental");
        assert_eq!(format_company_name(Some("acme-robotics")), "Acme Robotics");
        assert_eq!(format_company_name(Some("ACME-rOBOTICS")), "Acme Robotics");
        assert_eq!(format_company_name(Some("solo")), "Solo");
    }

    #[test]
    fn keeps_empty_segments() {
        assert_eq!(format_company_name(Some("a--b")), "A  B");
    }

    #[test]
    fn missing_token_uses_placeholder() {
        assert_eq!(format_company_name(None), "[Company Name]");
        assert_eq!(format_company_name(Some("")), "[Company Name]");
    }

    #[test]
    fn resolve_identity_treats_empty_as_absent() {
        let identity = resolve_identity(Some(String::new()));
        assert_eq!(identity.raw_id, None);
        assert_eq!(identity.company_name, "[Company Name]");
    }

    #[test]
    fn resolve_identity_keeps_raw_token() {
        let identity = resolve_identity(Some("elite-dental".into()));
        assert_eq!(identity.raw_id.as_deref(), Some("elite-dental"));
        assert_eq!(identity.company_name, "Elite Dental");
    }

    #[test]
    fn reads_token_from_query() {
        let read = read_identity_token(&url("https://site.test/video?vid=elite-dental"), "vid");
        assert_eq!(read, TokenRead::Accepted("elite-dental".into()));
    }

    #[test]
    fn missing_or_empty_param_is_absent() {
        assert_eq!(read_identity_token(&url("https://site.test/video"), "vid"), TokenRead::Absent);
        assert_eq!(read_identity_token(&url("https://site.test/video?vid="), "vid"), TokenRead::Absent);
    }

    #[test]
    fn path_like_tokens_are_rejected() {
        let read = read_identity_token(&url("https://site.test/video?vid=..%2Fsecrets"), "vid");
        assert_eq!(read, TokenRead::Rejected("../secrets".into()));
        assert_eq!(read.into_token(), None);
    }

    #[test]
    fn overlong_tokens_are_rejected() {
        let token = "a".repeat(MAX_IDENTITY_TOKEN_LEN + 1);
        assert!(!is_valid_token(&token));
        assert!(is_valid_token(&token[..MAX_IDENTITY_TOKEN_LEN]));
    }
}
