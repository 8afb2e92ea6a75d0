//! Target-language catalog shown in the picker

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Languages offered by the picker, in display order.
pub const LANGUAGES: &[Language] = &[
    Language { code: "bn", name: "চলমান বাংলা ভাষার" },
    Language { code: "es", name: "Spanish" },
    Language { code: "fr", name: "French" },
    Language { code: "de", name: "German" },
    Language { code: "hi", name: "Hindi" },
    Language { code: "ja", name: "Japanese" },
    Language { code: "ko", name: "Korean" },
    Language { code: "zh", name: "Chinese (Simplified)" },
    Language { code: "ru", name: "Russian" },
    Language { code: "ar", name: "Arabic" },
    Language { code: "pt", name: "Portuguese" },
    Language { code: "it", name: "Italian" },
    Language { code: "en", name: "English" },
];

/// Colloquial Bengali, the reader's default target.
pub const DEFAULT_LANGUAGE: &str = "চলমান বাংলা ভাষার";

pub fn find_by_name(name: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.name == name)
}

pub fn find_by_code(code: &str) -> Option<&'static Language> {
    LANGUAGES.iter().find(|l| l.code.eq_ignore_ascii_case(code))
}

/// Label for the picker button; unknown labels are shown as given.
pub fn display_name(label: &str) -> &str {
    find_by_name(label).map(|l| l.name).unwrap_or(label)
}
