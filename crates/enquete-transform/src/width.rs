//! Half-width / full-width folding for Japanese text.

use std::borrow::Cow;

const HALF_WIDTH_KANA_START: u32 = 0xFF61;
const HALF_WIDTH_KANA_END: u32 = 0xFF9F;
const HALF_WIDTH_VOICED_MARK: char = '\u{FF9E}';
const HALF_WIDTH_SEMI_VOICED_MARK: char = '\u{FF9F}';

/// Full-width forms of U+FF61..=U+FF9F, in code point order.
const FULL_WIDTH_KANA: &str = "。「」、・ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン゛゜";

const VOICEABLE: &str = "カキクケコサシスセソタチツテトハヒフヘホ";
const SEMI_VOICEABLE: &str = "ハヒフヘホ";

fn is_half_width_kana(ch: char) -> bool {
    (HALF_WIDTH_KANA_START..=HALF_WIDTH_KANA_END).contains(&(ch as u32))
}

fn full_width_kana(ch: char) -> Option<char> {
    let offset = (ch as u32).checked_sub(HALF_WIDTH_KANA_START)?;
    FULL_WIDTH_KANA.chars().nth(offset as usize)
}

fn voiced(base: char) -> Option<char> {
    if base == 'ウ' {
        return Some('ヴ');
    }
    VOICEABLE
        .contains(base)
        .then(|| char::from_u32(base as u32 + 1))
        .flatten()
}

fn semi_voiced(base: char) -> Option<char> {
    SEMI_VOICEABLE
        .contains(base)
        .then(|| char::from_u32(base as u32 + 2))
        .flatten()
}

/// Folds half-width katakana (and their sound marks) to full width.
///
/// A base kana followed by a half-width voiced or semi-voiced mark is
/// combined into a single precomposed character. Other characters pass
/// through unchanged.
pub fn kana_to_full_width(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_half_width_kana) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        let Some(base) = full_width_kana(ch).filter(|_| is_half_width_kana(ch)) else {
            out.push(ch);
            continue;
        };
        let combined = match chars.peek() {
            Some(&HALF_WIDTH_VOICED_MARK) => voiced(base),
            Some(&HALF_WIDTH_SEMI_VOICED_MARK) => semi_voiced(base),
            _ => None,
        };
        match combined {
            Some(combined) => {
                chars.next();
                out.push(combined);
            }
            None => out.push(base),
        }
    }
    Cow::Owned(out)
}

/// Folds full-width ASCII (digits, letters, symbols) and the ideographic
/// space to their half-width forms.
pub fn ascii_to_half_width(text: &str) -> Cow<'_, str> {
    let folds = |ch: char| ch == '\u{3000}' || ('\u{FF01}'..='\u{FF5E}').contains(&ch);
    if !text.chars().any(folds) {
        return Cow::Borrowed(text);
    }
    text.chars()
        .map(|ch| match ch {
            '\u{3000}' => ' ',
            '\u{FF01}'..='\u{FF5E}' => char::from_u32(ch as u32 - 0xFEE0).unwrap_or(ch),
            _ => ch,
        })
        .collect::<String>()
        .into()
}
