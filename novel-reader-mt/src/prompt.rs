//! Prompt sent to both backends for one translation

/// Build the translation prompt for `text` into `target_language`.
///
/// The same prompt is reused verbatim for the fallback hop.
pub fn build_prompt(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text into {target_language}.\n\
         Important: Keep all names and proper nouns exactly as written (do not translate them).\n\
         Do not add any explanations or commentary, just provide the translation.\n\
         \n\
         Text to translate:\n\
         \"{text}\""
    )
}
