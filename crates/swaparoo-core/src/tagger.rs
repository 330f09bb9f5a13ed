use swaparoo_types::PartOfSpeech;

/// Grammatical tagging of a word in its sentence
pub trait Tagger: Send + Sync {
    /// Tag `word` as it is used in `sentence`, `None` when the word is not found
    fn tag(&self, word: &str, sentence: &str) -> Option<PartOfSpeech>;
}

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "my", "your", "his", "her", "its", "our",
    "their", "some", "any", "every", "each", "no",
];

const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "myself", "yourself",
];

const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "he", "she", "we", "they"];

const PREPOSITIONS: &[&str] = &[
    "in", "on", "at", "by", "for", "with", "about", "from", "of", "into", "over", "under", "after",
    "before", "between", "through", "during", "without", "to",
];

const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "because", "so", "if", "while", "although", "nor", "yet",
];

const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "am", "do", "does", "did", "can", "could", "will",
    "would", "shall", "should", "may", "might", "must", "has", "have", "had",
];

const VERB_CUES: &[&str] = &[
    "to", "can", "could", "will", "would", "shall", "should", "may", "might", "must", "do",
    "does", "did", "don't", "didn't", "won't", "can't",
];

const ADJECTIVE_CUES: &[&str] = &[
    "is", "are", "was", "were", "am", "be", "been", "seems", "looks", "feels", "very", "too",
    "quite", "really", "so",
];

const NOUN_LY: &[&str] = &[
    "family", "assembly", "belly", "butterfly", "jelly", "rally", "ally", "bully", "fly",
    "reply", "supply", "monopoly",
];

const ADJECTIVE_LY: &[&str] = &[
    "friendly", "lovely", "lonely", "ugly", "silly", "likely", "early", "daily", "only", "holy",
    "elderly", "lively", "costly", "deadly",
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "able", "ible", "ive", "less", "ical", "ish"];
const NOUN_SUFFIXES: &[&str] = &[
    "tion", "sion", "ment", "ness", "ity", "ship", "ance", "ence", "ism", "ist",
];
const VERB_SUFFIXES: &[&str] = &["ize", "ise", "ify"];

fn in_list(list: &[&str], token: Option<&str>) -> bool {
    token.is_some_and(|t| list.contains(&t))
}

/// Rule-based English tagger: closed-class lists, the neighbouring words and suffixes
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTagger;

impl HeuristicTagger {
    pub fn new() -> Self {
        Self
    }

    fn tokens(sentence: &str) -> Vec<String> {
        sentence
            .split(|c: char| !(c.is_alphabetic() || c == '\''))
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase())
            .collect()
    }
}

impl Tagger for HeuristicTagger {
    fn tag(&self, word: &str, sentence: &str) -> Option<PartOfSpeech> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return None;
        }

        let tokens = Self::tokens(sentence);
        let index = tokens.iter().position(|t| *t == word)?;
        let prev = index.checked_sub(1).map(|i| tokens[i].as_str());
        let next = tokens.get(index + 1).map(String::as_str);
        let w = word.as_str();

        if DETERMINERS.contains(&w)
            || PRONOUNS.contains(&w)
            || PREPOSITIONS.contains(&w)
            || CONJUNCTIONS.contains(&w)
        {
            return Some(PartOfSpeech::Other);
        }
        if AUXILIARIES.contains(&w) {
            return Some(PartOfSpeech::Verb);
        }

        if NOUN_LY.contains(&w) {
            return Some(PartOfSpeech::Noun);
        }
        if ADJECTIVE_LY.contains(&w) {
            return Some(PartOfSpeech::Adj);
        }
        if w.len() > 4 && w.ends_with("ly") {
            return Some(PartOfSpeech::Adv);
        }

        if in_list(VERB_CUES, prev) || in_list(SUBJECT_PRONOUNS, prev) {
            return Some(PartOfSpeech::Verb);
        }

        if w.len() > 4 && (w.ends_with("ing") || w.ends_with("ed")) {
            return Some(PartOfSpeech::Verb);
        }
        if ADJECTIVE_SUFFIXES.iter().any(|s| w.len() > s.len() + 2 && w.ends_with(s)) {
            return Some(PartOfSpeech::Adj);
        }
        if NOUN_SUFFIXES.iter().any(|s| w.len() > s.len() + 2 && w.ends_with(s)) {
            return Some(PartOfSpeech::Noun);
        }
        if VERB_SUFFIXES.iter().any(|s| w.len() > s.len() + 2 && w.ends_with(s)) {
            return Some(PartOfSpeech::Verb);
        }

        if in_list(DETERMINERS, prev) {
            // "the cold water": a content word between determiner and noun modifies it
            let next_is_content = next.is_some_and(|n| {
                !(DETERMINERS.contains(&n)
                    || PRONOUNS.contains(&n)
                    || PREPOSITIONS.contains(&n)
                    || CONJUNCTIONS.contains(&n)
                    || AUXILIARIES.contains(&n))
            });
            return Some(if next_is_content {
                PartOfSpeech::Adj
            } else {
                PartOfSpeech::Noun
            });
        }

        if in_list(ADJECTIVE_CUES, prev) {
            return Some(PartOfSpeech::Adj);
        }

        Some(PartOfSpeech::Noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(word: &str, sentence: &str) -> Option<PartOfSpeech> {
        HeuristicTagger::new().tag(word, sentence)
    }

    #[test]
    fn verb_after_infinitive_marker() {
        assert_eq!(tag("run", "I like to run."), Some(PartOfSpeech::Verb));
        assert_eq!(tag("like", "I like to run."), Some(PartOfSpeech::Verb));
    }

    #[test]
    fn noun_and_adjective_around_determiner() {
        assert_eq!(tag("water", "The water is cold today."), Some(PartOfSpeech::Noun));
        assert_eq!(tag("cold", "The cold water hurts."), Some(PartOfSpeech::Adj));
        assert_eq!(tag("cold", "The water is cold today."), Some(PartOfSpeech::Adj));
    }

    #[test]
    fn suffix_rules() {
        assert_eq!(tag("quickly", "She ran quickly home."), Some(PartOfSpeech::Adv));
        assert_eq!(tag("family", "Say hi to family."), Some(PartOfSpeech::Noun));
        assert_eq!(tag("happiness", "Money and happiness."), Some(PartOfSpeech::Noun));
        assert_eq!(tag("dangerous", "Rivers look dangerous."), Some(PartOfSpeech::Adj));
    }

    #[test]
    fn closed_class_words_are_other() {
        assert_eq!(tag("with", "Coffee with milk."), Some(PartOfSpeech::Other));
        assert_eq!(tag("they", "Yesterday they left."), Some(PartOfSpeech::Other));
    }

    #[test]
    fn missing_word_yields_none() {
        assert_eq!(tag("book", "I like to run."), None);
        assert_eq!(tag("", "I like to run."), None);
    }
}
