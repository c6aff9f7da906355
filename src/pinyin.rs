//! Hanzi → Hanyu Pinyin for student names (tone diacritics, space-separated).
//!
//! Example:
//!   输入: "吴广胜"
//!   输出: "wú guǎng shèng"
use pinyin::ToPinyin;

/// Convert Chinese text into Hanyu Pinyin with tone diacritics, space-separated.
/// Non-Chinese characters are copied as-is.
///
/// Per-character conversion, so surnames with several readings get the default one.
pub fn to_pinyin_diacritics(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut last_was_hanzi = false;

    for ch in text.chars() {
        if let Some(py) = ch.to_pinyin() {
            if last_was_hanzi {
                out.push(' ');
            }
            out.push_str(py.with_tone());
            last_was_hanzi = true;
        } else {
            out.push(ch);
            last_was_hanzi = false;
        }
    }

    out
}

/// Romanised form of a roster name, or `None` when the name has no Han characters.
pub fn romanize_name(name: &str) -> Option<String> {
    if name.chars().any(crate::util::is_cjk) {
        Some(to_pinyin_diacritics(name))
    } else {
        None
    }
}
