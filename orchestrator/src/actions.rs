use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::intent::Intent;

/// Characters left unescaped in a URI component: `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// External effect requested by a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Open an absolute URL in the user's browser
    OpenUrl(String),
}

impl SideEffect {
    pub fn url(&self) -> &str {
        match self {
            SideEffect::OpenUrl(url) => url,
        }
    }
}

/// Percent-encodes a query-string component. Spaces become `%20`.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Builds a search URL by appending `q=<query>` to `base`
pub fn search_url(base: &str, query: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}q={}", base, separator, encode_component(query))
}

/// Maps an intent to the side effect it requests, if any
pub fn side_effect_for(intent: &Intent, search_base: &str) -> Option<SideEffect> {
    match intent {
        Intent::None => None,
        Intent::OpenUrl { target } => Some(SideEffect::OpenUrl(target.clone())),
        Intent::SearchWeb { query } => Some(SideEffect::OpenUrl(search_url(search_base, query))),
    }
}

/// Transcript notice recorded in place of a generated reply
pub fn action_notice(intent: &Intent) -> String {
    format!("Executing system command: {}...", intent.action_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component_matches_uri_component_rules() {
        assert_eq!(encode_component("rust ownership"), "rust%20ownership");
        assert_eq!(encode_component("a+b=c&d"), "a%2Bb%3Dc%26d");
        assert_eq!(encode_component("it's (fine)!~*._-"), "it's%20(fine)!~*._-");
        assert_eq!(encode_component("café"), "caf%C3%A9");
        assert_eq!(encode_component("/?#"), "%2F%3F%23");
    }

    #[test]
    fn test_search_url() {
        assert_eq!(
            search_url("https://www.google.com/search", "rust ownership"),
            "https://www.google.com/search?q=rust%20ownership"
        );
        assert_eq!(
            search_url("https://duckduckgo.com/?ia=web", "borrow checker"),
            "https://duckduckgo.com/?ia=web&q=borrow%20checker"
        );
    }

    #[test]
    fn test_side_effect_for_each_intent() {
        let base = "https://www.google.com/search";
        assert_eq!(side_effect_for(&Intent::None, base), None);
        assert_eq!(
            side_effect_for(
                &Intent::OpenUrl {
                    target: "https://github.com/tokio-rs/tokio".to_string()
                },
                base
            ),
            Some(SideEffect::OpenUrl(
                "https://github.com/tokio-rs/tokio".to_string()
            ))
        );
        let effect = side_effect_for(
            &Intent::SearchWeb {
                query: "rust ownership".to_string(),
            },
            base,
        )
        .unwrap();
        assert!(effect.url().contains("q=rust%20ownership"));
    }

    #[test]
    fn test_action_notice() {
        let intent = Intent::SearchWeb {
            query: "x".to_string(),
        };
        assert_eq!(action_notice(&intent), "Executing system command: SEARCH_WEB...");
    }
}
