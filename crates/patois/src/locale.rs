//! Locale identifiers and the fallback chain walked during lookup.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::LocaleError;

/// A locale decomposed into language, country and variant sub-tags.
///
/// The root locale (all sub-tags empty) stands for "no locale specificity"
/// and terminates every fallback chain. Equality is by component.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    country: String,
    variant: String,
}

impl Locale {
    /// The universal root locale.
    pub const ROOT: Locale = Locale {
        language: String::new(),
        country: String::new(),
        variant: String::new(),
    };

    /// Build a locale from raw sub-tags.
    ///
    /// The language is lowercased and the country uppercased; the variant is
    /// kept verbatim.
    pub fn new(language: &str, country: &str, variant: &str) -> Self {
        Self {
            language: language.trim().to_ascii_lowercase(),
            country: country.trim().to_ascii_uppercase(),
            variant: variant.trim().to_string(),
        }
    }

    /// Parse an underscore-separated identifier.
    ///
    /// `""` parses to [`Locale::ROOT`]; `"fr"`, `"fr_FR"` and `"ja_JP_JP"`
    /// carry one, two and three sub-tags. Anything with more sub-tags is
    /// malformed. Empty interior sub-tags are tolerated (`"ja__JP"` has an
    /// empty country).
    pub fn parse(input: &str) -> Result<Self, LocaleError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::ROOT);
        }
        let mut parts = input.split('_');
        let language = parts.next().unwrap_or_default();
        let country = parts.next().unwrap_or_default();
        let variant = parts.next().unwrap_or_default();
        if parts.next().is_some() {
            return Err(LocaleError::Malformed(input.to_string()));
        }
        Ok(Self::new(language, country, variant))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn variant(&self) -> &str {
        &self.variant
    }

    /// Whether this is the root locale.
    pub fn is_root(&self) -> bool {
        self.language.is_empty() && self.country.is_empty() && self.variant.is_empty()
    }

    /// The ordered list of locales to try when resolving a message.
    ///
    /// Starts at `self`, drops the least significant non-empty sub-tag each
    /// step (variant, then country, then language), and always ends with
    /// [`Locale::ROOT`] exactly once. No duplicates; for the root locale the
    /// chain has length 1.
    pub fn fallback_chain(&self) -> Vec<Locale> {
        let mut chain = vec![self.clone()];
        if !self.variant.is_empty() {
            chain.push(Locale::new(&self.language, &self.country, ""));
        }
        if !self.country.is_empty() {
            chain.push(Locale::new(&self.language, "", ""));
        }
        chain.push(Locale::ROOT);

        // Dedup, preserve order.
        let mut out = Vec::with_capacity(chain.len());
        let mut seen = HashSet::new();
        for locale in chain {
            if seen.insert(locale.clone()) {
                out.push(locale);
            }
        }
        out
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return Ok(());
        }
        f.write_str(&self.language)?;
        if !self.country.is_empty() || !self.variant.is_empty() {
            write!(f, "_{}", self.country)?;
        }
        if !self.variant.is_empty() {
            write!(f, "_{}", self.variant)?;
        }
        Ok(())
    }
}

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_parses_to_root() {
        let locale = Locale::parse("").unwrap();
        assert!(locale.is_root());
        assert_eq!(locale, Locale::ROOT);
    }

    #[test]
    fn sub_tags_are_case_normalized() {
        let locale = Locale::parse("FR_fr").unwrap();
        assert_eq!(locale.language(), "fr");
        assert_eq!(locale.country(), "FR");
        assert_eq!(locale.to_string(), "fr_FR");
    }

    #[test]
    fn three_sub_tags_round_trip() {
        let locale = Locale::parse("ja_JP_JP").unwrap();
        assert_eq!(locale.language(), "ja");
        assert_eq!(locale.country(), "JP");
        assert_eq!(locale.variant(), "JP");
        assert_eq!(locale.to_string(), "ja_JP_JP");
    }

    #[test]
    fn empty_interior_sub_tag_is_kept() {
        let locale = Locale::parse("ja__JP").unwrap();
        assert_eq!(locale.country(), "");
        assert_eq!(locale.variant(), "JP");
        assert_eq!(locale.to_string(), "ja__JP");
    }

    #[test]
    fn too_many_sub_tags_are_rejected() {
        let err = Locale::parse("foo_bar_baz_meh").unwrap_err();
        assert_eq!(
            err.to_string(),
            "malformed locale `foo_bar_baz_meh`: more than three sub-tags"
        );
    }

    #[test]
    fn chain_drops_one_sub_tag_per_step() {
        let locale = Locale::parse("ja_JP_JP").unwrap();
        let chain = locale.fallback_chain();
        let rendered: Vec<String> = chain.iter().map(Locale::to_string).collect();
        assert_eq!(rendered, vec!["ja_JP_JP", "ja_JP", "ja", ""]);
    }

    #[test]
    fn chain_of_root_is_just_root() {
        assert_eq!(Locale::ROOT.fallback_chain(), vec![Locale::ROOT]);
    }

    #[test]
    fn chain_ends_at_root_without_duplicates() {
        for input in ["", "fr", "fr_FR", "ja_JP_JP", "ja__JP", "_US"] {
            let chain = Locale::parse(input).unwrap().fallback_chain();
            assert_eq!(chain.last(), Some(&Locale::ROOT), "input `{input}`");
            let mut seen = HashSet::new();
            for locale in &chain {
                assert!(seen.insert(locale.clone()), "duplicate in chain of `{input}`");
            }
        }
    }

    #[test]
    fn from_str_delegates_to_parse() {
        let locale: Locale = "zh_CN".parse().unwrap();
        assert_eq!(locale, Locale::new("zh", "CN", ""));
    }
}
