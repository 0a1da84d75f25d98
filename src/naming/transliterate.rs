//! Best-effort mapping of tag text to printable ASCII.
//!
//! Literal `:` and `?` are swapped for private-use placeholders before any
//! folding happens. Folding marks characters it cannot represent with `?`,
//! and those marks are then removed, so only question marks that were in the
//! input (or came from `¿`) survive.

/// Stands in for a literal `:` while folding runs.
const COLON_MARK: char = '\u{E000}';
/// Stands in for a literal `?` while folding runs.
const QUESTION_MARK: char = '\u{E001}';

/// Characters that generic folding gets wrong or drops.
/// `¿` maps to the question placeholder (U+E001).
const SUBSTITUTIONS: &[(char, &str)] = &[
    // quotes
    ('«', "\""),
    ('»', "\""),
    ('„', "\""),
    ('“', "\""),
    ('”', "\""),
    ('‟', "\""),
    ('‹', "'"),
    ('›', "'"),
    ('‘', "'"),
    ('’', "'"),
    ('‚', "'"),
    // arithmetic and superscripts
    ('÷', "/"),
    ('±', "+-"),
    ('×', "x"),
    ('¹', "1"),
    ('²', "2"),
    ('³', "3"),
    // Germanic and Nordic letters
    ('Ä', "Ae"),
    ('ä', "ae"),
    ('Ö', "Oe"),
    ('ö', "oe"),
    ('Ü', "Ue"),
    ('ü', "ue"),
    ('ß', "ss"),
    ('Ø', "Oe"),
    ('ø', "oe"),
    ('Å', "Aa"),
    ('å', "aa"),
    ('Æ', "Ae"),
    ('æ', "ae"),
    ('Ð', "Dh"),
    ('ð', "dh"),
    ('Þ', "Th"),
    ('þ', "th"),
    // punctuation
    ('¦', "|"),
    ('¡', "!"),
    ('¿', "\u{E001}"),
];

/// Transliterate a single tag value to printable ASCII.
///
/// Never fails. The result may be empty when nothing in the input has an
/// ASCII rendering.
pub fn transliterate(text: &str) -> String {
    let escaped = text
        .chars()
        .filter(|c| !is_placeholder(*c))
        .map(|c| match c {
            ':' => COLON_MARK,
            '?' => QUESTION_MARK,
            other => other,
        });

    let mut substituted = String::with_capacity(text.len());
    for c in escaped {
        match substitute(c) {
            Some(replacement) => substituted.push_str(replacement),
            None => substituted.push(c),
        }
    }

    fold_to_ascii(&substituted)
        .chars()
        .filter(|&c| c != '?')
        .map(|c| match c {
            COLON_MARK => ':',
            QUESTION_MARK => '?',
            other => other,
        })
        .collect()
}

fn is_placeholder(c: char) -> bool {
    c == COLON_MARK || c == QUESTION_MARK
}

fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

fn substitute(c: char) -> Option<&'static str> {
    SUBSTITUTIONS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
}

/// Fold to ASCII, writing `?` for anything without a printable rendering.
/// Placeholders pass through untouched.
fn fold_to_ascii(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());

    for c in text.chars() {
        if is_placeholder(c) || is_printable_ascii(c) {
            folded.push(c);
            continue;
        }

        if matches!(c, '\t' | '\n' | '\r') {
            folded.push(' ');
            continue;
        }

        match deunicode::deunicode_char(c) {
            Some(ascii) if !ascii.is_empty() && ascii.chars().all(is_printable_ascii) => {
                folded.push_str(ascii)
            }
            _ => folded.push('?'),
        }
    }

    folded
}
