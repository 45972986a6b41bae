/// The system prompt template used for translating recipe fragments.
///
/// `{source}` and `{target}` are replaced with the language tags.
pub const TRANSLATION_PROMPT: &str = include_str!("prompt.txt");

/// Build the system prompt for one language pair.
pub fn build_translation_prompt(source: &str, target: &str) -> String {
    TRANSLATION_PROMPT
        .replace("{source}", source.trim())
        .replace("{target}", target.trim())
}
