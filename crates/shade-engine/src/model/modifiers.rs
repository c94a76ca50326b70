//! Member and class modifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::BitOr;

/// Modifier set, stored as JVM access flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Modifiers(u16);

/// Keyword order used when rendering, matching `java.lang.reflect.Modifier`
const KEYWORDS: [(&str, Modifiers); 8] = [
    ("public", Modifiers::PUBLIC),
    ("protected", Modifiers::PROTECTED),
    ("private", Modifiers::PRIVATE),
    ("abstract", Modifiers::ABSTRACT),
    ("static", Modifiers::STATIC),
    ("final", Modifiers::FINAL),
    ("synchronized", Modifiers::SYNCHRONIZED),
    ("native", Modifiers::NATIVE),
];

impl Modifiers {
    /// `public`
    pub const PUBLIC: Modifiers = Modifiers(0x0001);
    /// `private`
    pub const PRIVATE: Modifiers = Modifiers(0x0002);
    /// `protected`
    pub const PROTECTED: Modifiers = Modifiers(0x0004);
    /// `static`
    pub const STATIC: Modifiers = Modifiers(0x0008);
    /// `final`
    pub const FINAL: Modifiers = Modifiers(0x0010);
    /// `synchronized`
    pub const SYNCHRONIZED: Modifiers = Modifiers(0x0020);
    /// `native`
    pub const NATIVE: Modifiers = Modifiers(0x0100);
    /// `abstract`
    pub const ABSTRACT: Modifiers = Modifiers(0x0400);

    const ALL: u16 = 0x0001 | 0x0002 | 0x0004 | 0x0008 | 0x0010 | 0x0020 | 0x0100 | 0x0400;

    /// No modifiers (package-private)
    pub const fn empty() -> Self {
        Modifiers(0)
    }

    /// Build from raw access flags, dropping bits this model does not track
    pub const fn from_bits(bits: u16) -> Self {
        Modifiers(bits & Self::ALL)
    }

    /// Raw access flags
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Whether every flag in `other` is set
    pub const fn contains(self, other: Modifiers) -> bool {
        self.0 & other.0 == other.0
    }

    /// This set plus `other`
    pub const fn with(self, other: Modifiers) -> Self {
        Modifiers(self.0 | other.0)
    }

    /// This set minus `other`
    pub const fn without(self, other: Modifiers) -> Self {
        Modifiers(self.0 & !other.0)
    }

    /// `static`
    pub fn is_static(self) -> bool {
        self.contains(Self::STATIC)
    }

    /// `final`
    pub fn is_final(self) -> bool {
        self.contains(Self::FINAL)
    }

    /// `native`
    pub fn is_native(self) -> bool {
        self.contains(Self::NATIVE)
    }

    /// `abstract`
    pub fn is_abstract(self) -> bool {
        self.contains(Self::ABSTRACT)
    }

    /// Parse one modifier keyword
    pub fn keyword(word: &str) -> Option<Self> {
        KEYWORDS
            .iter()
            .find(|(kw, _)| *kw == word)
            .map(|&(_, flag)| flag)
    }

    /// Keywords in canonical order
    pub fn keywords(self) -> Vec<&'static str> {
        KEYWORDS
            .iter()
            .filter(|&&(_, flag)| self.contains(flag))
            .map(|&(kw, _)| kw)
            .collect()
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        self.with(rhs)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keywords().join(" "))
    }
}

impl TryFrom<Vec<String>> for Modifiers {
    type Error = String;

    fn try_from(words: Vec<String>) -> Result<Self, Self::Error> {
        words.iter().try_fold(Modifiers::empty(), |acc, word| {
            Modifiers::keyword(word)
                .map(|flag| acc.with(flag))
                .ok_or_else(|| format!("unknown modifier '{}'", word))
        })
    }
}

impl From<Modifiers> for Vec<String> {
    fn from(modifiers: Modifiers) -> Self {
        modifiers.keywords().into_iter().map(String::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_canonical_order() {
        let m = Modifiers::NATIVE | Modifiers::STATIC | Modifiers::PUBLIC | Modifiers::FINAL;
        assert_eq!(m.to_string(), "public static final native");
        assert_eq!(Modifiers::empty().to_string(), "");
    }

    #[test]
    fn test_without_clears_only_given_flags() {
        let m = Modifiers::PUBLIC | Modifiers::NATIVE | Modifiers::FINAL | Modifiers::STATIC;
        let cleared = m.without(Modifiers::NATIVE | Modifiers::FINAL);
        assert!(cleared.is_static());
        assert!(!cleared.is_native());
        assert!(!cleared.is_final());
        assert!(cleared.contains(Modifiers::PUBLIC));
    }

    #[test]
    fn test_from_bits_masks_untracked_flags() {
        // ACC_VARARGS (0x0080) is not modelled
        let m = Modifiers::from_bits(0x0001 | 0x0080);
        assert_eq!(m, Modifiers::PUBLIC);
    }

    #[test]
    fn test_parse_keywords() {
        let m = Modifiers::try_from(vec!["protected".to_string(), "abstract".to_string()]).unwrap();
        assert!(m.is_abstract());
        assert!(m.contains(Modifiers::PROTECTED));
        assert!(Modifiers::try_from(vec!["volatile".to_string()]).is_err());
    }
}
