//! Destination-encoding character policy.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use encoding_rs::{Encoding, SHIFT_JIS};

/// Substitution applied to each character the destination encoding cannot
/// represent.
pub type ReplaceFn = Arc<dyn Fn(char) -> char + Send + Sync>;

/// Replaces characters that cannot be encoded in the destination encoding.
#[derive(Clone)]
pub struct CharReplacer {
    encoding: &'static Encoding,
    replace: ReplaceFn,
}

impl CharReplacer {
    /// Replacer that substitutes `replacement` for every unrepresentable
    /// character.
    pub fn new(encoding: &'static Encoding, replacement: char) -> Self {
        Self {
            encoding,
            replace: Arc::new(move |_| replacement),
        }
    }

    /// Looks the encoding up by WHATWG label (`shift_jis`, `euc-jp`, ...).
    pub fn for_label(label: &str, replacement: char) -> Option<Self> {
        Encoding::for_label(label.as_bytes()).map(|encoding| Self::new(encoding, replacement))
    }

    /// Overrides the substitution function.
    pub fn with_replace_fn<F>(mut self, replace: F) -> Self
    where
        F: Fn(char) -> char + Send + Sync + 'static,
    {
        self.replace = Arc::new(replace);
        self
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    pub fn is_representable(&self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        !self.encoding.encode(ch.encode_utf8(&mut buf)).2
    }

    /// Returns `text` with every unrepresentable character substituted.
    ///
    /// Text that is already representable is returned borrowed and
    /// unchanged.
    pub fn replace<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let (_, _, had_errors) = self.encoding.encode(text);
        if !had_errors {
            return Cow::Borrowed(text);
        }
        text.chars()
            .map(|ch| {
                if self.is_representable(ch) {
                    ch
                } else {
                    (self.replace)(ch)
                }
            })
            .collect::<String>()
            .into()
    }
}

impl Default for CharReplacer {
    fn default() -> Self {
        Self::new(SHIFT_JIS, '?')
    }
}

impl fmt::Debug for CharReplacer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharReplacer")
            .field("encoding", &self.encoding.name())
            .finish_non_exhaustive()
    }
}
