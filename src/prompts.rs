//! Prompt construction for the translation service.
//!
//! The instruction block is deliberately strict: generation models drift
//! toward summarising, embellishing, or "improving" text unless told not to.
//! A translated document must read sentence-for-sentence like the original,
//! so the prompt pins structure, length, and terminology handling, and asks
//! for bare target-language text with no commentary the pipeline would then
//! have to strip.

/// Build the prompt for translating one chunk of page text.
pub fn translation_prompt(source_lang: &str, target_lang: &str, text: &str) -> String {
    format!(
        "You are a document translation system, {source_lang} to {target_lang}.\n\
         Requirements:\n\
         - Preserve the original sentence structure and intent.\n\
         - Do not expand, summarise, or omit content.\n\
         - Keep proper nouns and technical terms; where helpful, add a \
         transliteration in parentheses.\n\
         Input ({source_lang}):\n\
         {text}\n\n\
         Output: {target_lang} text only, no commentary."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_languages_and_text() {
        let p = translation_prompt("English", "Thai", "Hello world");
        assert!(p.contains("English to Thai"));
        assert!(p.contains("Hello world"));
        assert!(p.contains("Thai text only"));
    }
}
