use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    /// Clean up captured page text before it is used as context
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Unicode normalization (NFKC) folds ligatures and full-width forms
        let text: String = text.nfkc().collect();

        // Line breaks inside a selection are layout, not content
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Canonical form of a single vocabulary word
    fn normalize_word(&self, word: &str) -> String {
        self.process(word).to_lowercase()
    }
}

pub struct DefaultPreprocessor;
impl Preprocessor for DefaultPreprocessor {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_layout_whitespace() {
        let text = DefaultPreprocessor.process("  I like\n to\r\n run.  ");
        assert_eq!(text, "I like to run.");
    }

    #[test]
    fn folds_compatibility_forms() {
        assert_eq!(DefaultPreprocessor.normalize_word(" Ｗａｔｅｒ "), "water");
        assert_eq!(DefaultPreprocessor.normalize_word("ﬁsh"), "fish");
        assert_eq!(DefaultPreprocessor.process("\n\t"), "");
    }
}
