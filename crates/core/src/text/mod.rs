//! Text processing for titles, slugs and queries.

mod ngram;
mod rules;
mod tokenizer;

pub use ngram::{ngrams, NGrams};
pub use rules::TextRules;
pub use tokenizer::{query_tokens, relevance_tokens, search_tokens, tokenize, TitleTokens};

use std::borrow::Cow;

use quick_xml::escape::{resolve_html5_entity, unescape_with};

/// Decode HTML entities in scraped titles (`&amp;`, `&nbsp;`, `&#39;`, ...).
///
/// Named entities resolve against the HTML5 table. A malformed or unknown
/// entity is kept verbatim without blocking the rest of the text.
pub fn unescape_html(text: &str) -> Cow<'_, str> {
    match unescape_with(text, resolve_html5_entity) {
        Ok(decoded) => decoded,
        Err(_) => Cow::Owned(unescape_each(text)),
    }
}

/// Decode entity by entity, copying undecodable ones through.
fn unescape_each(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let end = tail
            .find(';')
            .filter(|semi| !tail[1..*semi].contains(|c: char| c == '&' || c.is_whitespace()));
        let decoded = end.and_then(|semi| unescape_with(&tail[..=semi], resolve_html5_entity).ok());

        match (end, decoded) {
            (Some(semi), Some(decoded)) => {
                out.push_str(&decoded);
                rest = &tail[semi + 1..];
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_html_entities() {
        assert_eq!(unescape_html("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(unescape_html("it&#39;s"), "it's");
        assert_eq!(unescape_html("plain"), "plain");
    }

    #[test]
    fn test_unescape_html_malformed_is_unchanged() {
        assert_eq!(unescape_html("fish &chips"), "fish &chips");
    }

    #[test]
    fn test_unescape_html5_entities() {
        assert_eq!(
            unescape_html("Tom &amp; Jerry&nbsp;Show"),
            "Tom & Jerry\u{a0}Show"
        );
        assert_eq!(unescape_html("Caf&eacute; &hellip;"), "Caf\u{e9} \u{2026}");
    }

    #[test]
    fn test_unescape_html_mixed_malformed_and_valid() {
        assert_eq!(
            unescape_html("fish &chips &amp; caf&eacute; &bogus; end"),
            "fish &chips & caf\u{e9} &bogus; end"
        );
        assert_eq!(unescape_html("trailing &"), "trailing &");
    }
}
