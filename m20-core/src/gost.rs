//! The GOST-10859 seven-bit character code.
//!
//! Digits sit at 000..011, punctuation and mathematics across 012..037,
//! the Cyrillic upper-case alphabet at 040..076 and a Latin/math tail at
//! 077..137. A machine word packs six characters, most significant first,
//! leaving a three-bit gap at the top.
//!
//! https://en.wikipedia.org/wiki/GOST_10859

/// Code-to-Unicode table, Cyrillic variant. A NUL marks codes with no
/// assigned character.
#[rustfmt::skip]
const GOST_TO_UNICODE: [char; 128] = [
    /* 000-007 */ '0', '1', '2', '3', '4', '5', '6', '7',
    /* 010-017 */ '8', '9', '+', '-', '/', ',', '.', ' ',
    /* 020-027 */ 'e', '↑', '(', ')', '×', '=', ';', '[',
    /* 030-037 */ ']', '*', '‘', '’', '≠', '<', '>', ':',
    /* 040-047 */ 'А', 'Б', 'В', 'Г', 'Д', 'Е', 'Ж', 'З',
    /* 050-057 */ 'И', 'Й', 'К', 'Л', 'М', 'Н', 'О', 'П',
    /* 060-067 */ 'Р', 'С', 'Т', 'У', 'Ф', 'Х', 'Ц', 'Ч',
    /* 070-077 */ 'Ш', 'Щ', 'Ы', 'Ь', 'Э', 'Ю', 'Я', 'D',
    /* 100-107 */ 'F', 'G', 'I', 'J', 'L', 'N', 'Q', 'R',
    /* 110-117 */ 'S', 'U', 'V', 'W', 'Z', '‾', '≤', '≥',
    /* 120-127 */ '∨', '∧', '⊃', '¬', '÷', '≡', '%', '◇',
    /* 130-137 */ '|', '―', '_', '!', '"', 'Ъ', '°', '′',
    /* 140-147 */ '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0',
    /* 150-157 */ '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0',
    /* 160-167 */ '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0',
    /* 170-177 */ '\0', '\0', '\0', '\0', '\0', '\0', '\0', '\0',
];

/// Decode a seven-bit code. `None` for unassigned codes.
pub fn to_unicode(code: u8) -> Option<char> {
    match GOST_TO_UNICODE.get(code as usize) {
        Some(&ch) if ch != '\0' => Some(ch),
        _ => None,
    }
}

/// Encode a Unicode scalar, for assembling text constants.
pub fn from_unicode(ch: char) -> Option<u8> {
    GOST_TO_UNICODE
        .iter()
        .position(|&t| t != '\0' && t == ch)
        .map(|code| code as u8)
}

/// Unpack the six character codes of a word, most significant first.
pub fn word_chars(word: u64) -> [u8; 6] {
    let mut chars = [0; 6];
    for (i, code) in chars.iter_mut().enumerate() {
        *code = (word >> (35 - 7 * i) & 0o177) as u8;
    }
    chars
}

/// Pack six character codes into a word, most significant first.
pub fn pack_chars(chars: [u8; 6]) -> u64 {
    let mut word = 0;
    for (i, &code) in chars.iter().enumerate() {
        word |= (code as u64 & 0o177) << (35 - 7 * i);
    }
    word
}
