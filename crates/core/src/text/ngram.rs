/// Contiguous word phrases of a token sequence, in title order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NGrams {
    pub bigrams: Vec<String>,
    pub trigrams: Vec<String>,
}

/// Build 2-gram and 3-gram phrases joined with a single space.
///
/// `n` tokens yield `n - 1` bigrams and `n - 2` trigrams (none when too short).
pub fn ngrams<S: AsRef<str>>(tokens: &[S]) -> NGrams {
    NGrams {
        bigrams: tokens.windows(2).map(join).collect(),
        trigrams: tokens.windows(3).map(join).collect(),
    }
}

fn join<S: AsRef<str>>(window: &[S]) -> String {
    window
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{tokenize, TextRules};

    fn grams_of(title: &str, exclude_stop_words: bool) -> NGrams {
        let rules = TextRules::default();
        let tokens: Vec<String> = tokenize(title, &rules, exclude_stop_words).collect();
        ngrams(&tokens)
    }

    #[test]
    fn test_ngrams_with_stop_words() {
        let grams = grams_of("title with a stop word number #6 no keywords", false);
        assert_eq!(
            grams.bigrams,
            vec![
                "title with",
                "with a",
                "a stop",
                "stop word",
                "word number",
                "number 6",
                "6 no",
                "no keywords"
            ]
        );
        assert_eq!(
            grams.trigrams,
            vec![
                "title with a",
                "with a stop",
                "a stop word",
                "stop word number",
                "word number 6",
                "number 6 no",
                "6 no keywords"
            ]
        );
    }

    #[test]
    fn test_ngrams_without_stop_words() {
        let grams = grams_of("title with a stop word number #6 no keywords", true);
        assert_eq!(
            grams.bigrams,
            vec!["title stop", "stop word", "word number", "number 6", "6 keywords"]
        );
        assert_eq!(
            grams.trigrams,
            vec![
                "title stop word",
                "stop word number",
                "word number 6",
                "number 6 keywords"
            ]
        );
    }

    #[test]
    fn test_ngrams_short_titles() {
        let grams = grams_of("title number 1", false);
        assert_eq!(grams.bigrams, vec!["title number", "number 1"]);
        assert_eq!(grams.trigrams, vec!["title number 1"]);

        let two = ngrams(&["a", "b"]);
        assert_eq!(two.bigrams, vec!["a b"]);
        assert!(two.trigrams.is_empty());

        let one = ngrams(&["solo"]);
        assert!(one.bigrams.is_empty());
        assert!(one.trigrams.is_empty());

        let none: NGrams = ngrams::<&str>(&[]);
        assert_eq!(none, NGrams::default());
    }
}
