/// The system prompt used for extracting structured recipes.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro.
pub const EXTRACTION_PROMPT: &str = include_str!("prompt.txt");
