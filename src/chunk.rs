//! Split page text into size-bounded chunks at whitespace boundaries.
//!
//! The remote translation service accepts a bounded block of text per call,
//! so each page's text is cut into chunks of at most `max_len` characters.
//! The cut may only fall between a whitespace run and a non-whitespace run —
//! never inside a word — so the translated chunks can be rejoined without
//! damaging any token the model saw. A single word longer than `max_len` is
//! emitted as its own oversized chunk rather than being an error.

/// Lazily split `text` into chunks of at most `max_len` characters.
///
/// The text is walked as alternating whitespace/non-whitespace runs. Runs
/// accumulate into the current chunk; when appending a run would push the
/// chunk past `max_len` and the chunk is non-empty, the chunk is emitted and
/// the run starts the next one. A final chunk is emitted only if it contains
/// non-whitespace content.
///
/// Properties:
/// * no chunk boundary falls inside a non-whitespace run;
/// * concatenating the chunks reproduces the input (minus a trailing
///   whitespace-only tail, which is dropped);
/// * empty or whitespace-only input yields nothing.
///
/// `max_len` is counted in Unicode scalar values, not bytes, so a chunk can
/// never split a multi-byte character either.
pub fn chunk_text(text: &str, max_len: usize) -> Chunks<'_> {
    Chunks {
        runs: runs(text),
        carry: None,
        max_len: max_len.max(1),
    }
}

/// Iterator over the chunks of one page's text. Created by [`chunk_text`].
pub struct Chunks<'a> {
    runs: Runs<'a>,
    /// Run that overflowed the previous chunk and opens the next one.
    carry: Option<&'a str>,
    max_len: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut buf = String::new();
        let mut buf_chars = 0usize;

        if let Some(run) = self.carry.take() {
            buf.push_str(run);
            buf_chars = run.chars().count();
        }

        for run in self.runs.by_ref() {
            let run_chars = run.chars().count();
            if buf_chars + run_chars > self.max_len && buf_chars > 0 {
                self.carry = Some(run);
                return Some(buf);
            }
            buf.push_str(run);
            buf_chars += run_chars;
        }

        // Input exhausted: the trailing buffer only counts if it has content.
        if buf.trim().is_empty() {
            None
        } else {
            Some(buf)
        }
    }
}

/// Split `text` into maximal runs of whitespace / non-whitespace characters.
fn runs(text: &str) -> Runs<'_> {
    Runs { rest: text }
}

struct Runs<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Runs<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.rest.chars().next()?;
        let in_whitespace = first.is_whitespace();
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| c.is_whitespace() != in_whitespace)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (run, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(text: &str, max_len: usize) -> Vec<String> {
        chunk_text(text, max_len).collect()
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(collect("", 100), Vec::<String>::new());
    }

    #[test]
    fn whitespace_only_input_yields_nothing() {
        assert_eq!(collect("   ", 100), Vec::<String>::new());
        assert_eq!(collect("\n\t  \n", 100), Vec::<String>::new());
    }

    #[test]
    fn short_input_is_a_single_chunk() {
        assert_eq!(collect("hello world", 100), vec!["hello world"]);
    }

    #[test]
    fn concatenation_reproduces_input() {
        let inputs = [
            "the quick brown fox jumps over the lazy dog",
            "one  two   three\nfour\t\tfive",
            "a b c d e f g h i j k l m n o p",
        ];
        for input in inputs {
            for max_len in [1, 3, 5, 8, 1000] {
                let joined: String = collect(input, max_len).concat();
                assert_eq!(joined, input, "max_len={max_len}");
            }
        }
    }

    #[test]
    fn trailing_whitespace_tail_is_dropped() {
        let chunks = collect("alpha beta   ", 5);
        let joined: String = chunks.concat();
        assert_eq!(joined.trim_end(), "alpha beta");
    }

    #[test]
    fn no_boundary_inside_a_word() {
        let input = "alpha beta gamma delta epsilon";
        for max_len in [4, 6, 7, 10, 12] {
            for chunk in collect(input, max_len) {
                // Every chunk must start and end flush with a word or the
                // original whitespace; reconstructing below checks the rest.
                for word in chunk.split_whitespace() {
                    assert!(
                        input.contains(word),
                        "chunk split word: {word:?} (max_len={max_len})"
                    );
                }
            }
            let joined: String = collect(input, max_len).concat();
            assert_eq!(joined, input);
        }
    }

    #[test]
    fn chunks_respect_max_len_except_oversized_words() {
        let input = "one two three four five six seven eight";
        for chunk in collect(input, 10) {
            assert!(chunk.chars().count() <= 10, "chunk too long: {chunk:?}");
        }
    }

    #[test]
    fn oversized_word_becomes_its_own_chunk() {
        let chunks = collect("hi supercalifragilistic bye", 5);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].trim(), "supercalifragilistic");
    }

    #[test]
    fn every_word_separate_when_max_len_is_one() {
        let chunks = collect("aa bb cc", 1);
        // Each chunk carries one word (with its leading separator after the
        // first), never two.
        for chunk in &chunks {
            assert!(chunk.split_whitespace().count() <= 1, "chunk: {chunk:?}");
        }
        let joined: String = chunks.concat();
        assert_eq!(joined, "aa bb cc");
    }

    #[test]
    fn multibyte_text_counts_chars_not_bytes() {
        // Each Thai character is 3 bytes in UTF-8; 4 chars fit in max_len 4.
        let input = "กขคง จฉชซ";
        let chunks = collect(input, 4);
        let joined: String = chunks.concat();
        assert_eq!(joined, input);
        assert_eq!(chunks[0], "กขคง");
    }
}
