//! Per-axis keyword sets and keyword normalization.

use serde::{Deserialize, Serialize};

use super::axis::{Axis, PerAxis};

/// Maximum number of keywords kept on a single axis.
pub const MAX_KEYWORDS_PER_AXIS: usize = 64;

/// Maximum keyword length, in characters, after normalization.
pub const MAX_KEYWORD_LEN: usize = 64;

/// Map a single lower-case character to its unaccented form.
///
/// Covers the Latin-1 supplement and the Latin Extended-A letters used by
/// French, Spanish, Portuguese and German input. Combining diacritical marks
/// are dropped, so decomposed input folds like its precomposed form.
fn fold_char(c: char, out: &mut String) {
    let folded = match c {
        '\u{0300}'..='\u{036F}' => return,
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'ŕ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ţ' | 'ť' => "t",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        _ => {
            out.push(c);
            return;
        }
    };
    out.push_str(folded);
}

/// Normalize a raw keyword: lower-case, strip diacritics, trim.
///
/// Returns `None` for keywords that are empty after normalization. Keywords
/// longer than [`MAX_KEYWORD_LEN`] characters are truncated.
pub fn normalize_keyword(raw: &str) -> Option<String> {
    let mut folded = String::with_capacity(raw.len());
    for c in raw.chars().flat_map(char::to_lowercase) {
        fold_char(c, &mut folded);
    }
    let trimmed = folded.trim();
    if trimmed.is_empty() {
        return None;
    }
    let bounded: String = trimmed.chars().take(MAX_KEYWORD_LEN).collect();
    Some(bounded.trim_end().to_string())
}

/// Ordered, deduplicated, normalized keywords for each axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PerAxis<Vec<String>>", into = "PerAxis<Vec<String>>")]
pub struct KeywordSet {
    axes: PerAxis<Vec<String>>,
}

impl KeywordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and append a keyword to `axis`.
    ///
    /// Returns `false` when the keyword was empty, already present, or the
    /// axis is full.
    pub fn insert(&mut self, axis: Axis, raw: &str) -> bool {
        let Some(keyword) = normalize_keyword(raw) else {
            return false;
        };
        let list = self.axes.get_mut(axis);
        if list.len() >= MAX_KEYWORDS_PER_AXIS || list.contains(&keyword) {
            return false;
        }
        list.push(keyword);
        true
    }

    /// Builder-style variant of [`KeywordSet::insert`] for a whole axis.
    pub fn with_axis<I, S>(mut self, axis: Axis, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for keyword in keywords {
            self.insert(axis, keyword.as_ref());
        }
        self
    }

    pub fn get(&self, axis: Axis) -> &[String] {
        self.axes.get(axis)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Axis, &[String])> {
        self.axes.iter().map(|(axis, list)| (axis, list.as_slice()))
    }

    /// Total keyword count across axes.
    pub fn len(&self) -> usize {
        self.axes.iter().map(|(_, list)| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of this set keeping only the keywords of `active` axes.
    pub fn restricted_to(&self, active: &[Axis]) -> Self {
        Self {
            axes: self.axes.map(|axis, list| {
                if active.contains(&axis) {
                    list.clone()
                } else {
                    Vec::new()
                }
            }),
        }
    }
}

impl From<PerAxis<Vec<String>>> for KeywordSet {
    fn from(raw: PerAxis<Vec<String>>) -> Self {
        let mut set = Self::new();
        for (axis, list) in raw.iter() {
            for keyword in list {
                set.insert(axis, keyword);
            }
        }
        set
    }
}

impl From<KeywordSet> for PerAxis<Vec<String>> {
    fn from(set: KeywordSet) -> Self {
        set.axes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_diacritics_and_case() {
        assert_eq!(normalize_keyword("  Éducation ").as_deref(), Some("education"));
        assert_eq!(normalize_keyword("Œuvre").as_deref(), Some("oeuvre"));
        assert_eq!(normalize_keyword("Straße").as_deref(), Some("strasse"));
        assert_eq!(normalize_keyword("   "), None);
    }

    #[test]
    fn test_decomposed_accents_match_precomposed() {
        let decomposed = "E\u{0301}ducation";
        assert_eq!(normalize_keyword(decomposed).as_deref(), Some("education"));
        assert_eq!(normalize_keyword("a\u{0300}\u{0327}"), normalize_keyword("a"));
        assert_eq!(normalize_keyword("\u{0301}"), None);

        let set = KeywordSet::new()
            .with_axis(Axis::Enjoyment, ["Éducation"])
            .with_axis(Axis::Utility, [decomposed]);
        assert_eq!(set.get(Axis::Enjoyment), set.get(Axis::Utility));
    }

    #[test]
    fn test_normalize_truncates_long_keywords() {
        let long = "a".repeat(200);
        assert_eq!(normalize_keyword(&long).unwrap().chars().count(), MAX_KEYWORD_LEN);
    }

    #[test]
    fn test_insert_deduplicates_after_normalization() {
        let mut set = KeywordSet::new();
        assert!(set.insert(Axis::Enjoyment, "Design"));
        assert!(!set.insert(Axis::Enjoyment, " design "));
        assert!(!set.insert(Axis::Enjoyment, ""));
        assert_eq!(set.get(Axis::Enjoyment), ["design".to_string()]);
    }

    #[test]
    fn test_axis_capacity_is_bounded() {
        let set = KeywordSet::new()
            .with_axis(Axis::Utility, (0..100).map(|i| format!("kw{i}")));
        assert_eq!(set.get(Axis::Utility).len(), MAX_KEYWORDS_PER_AXIS);
    }

    #[test]
    fn test_deserialize_normalizes_legacy_payload() {
        let set: KeywordSet = serde_json::from_str(
            r#"{"passions":["Design","IA"],"viabilite":["SaaS","saas"]}"#,
        )
        .unwrap();
        assert_eq!(set.get(Axis::Enjoyment), ["design".to_string(), "ia".to_string()]);
        assert_eq!(set.get(Axis::Viability), ["saas".to_string()]);
        assert!(set.get(Axis::Competence).is_empty());
    }

    #[test]
    fn test_restricted_to_empties_inactive_axes() {
        let set = KeywordSet::new()
            .with_axis(Axis::Enjoyment, ["a"])
            .with_axis(Axis::Utility, ["b"]);
        let restricted = set.restricted_to(&[Axis::Utility]);
        assert!(restricted.get(Axis::Enjoyment).is_empty());
        assert_eq!(restricted.len(), 1);
    }
}
