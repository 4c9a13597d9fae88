//! Soundex-style phonetic code over normalized place names.

use crate::normalize;

/// Width of every non-empty phonetic code.
pub const PHONETIC_CODE_LEN: usize = 6;

/// Consonant class digit, `None` for vowels and unmapped characters.
fn consonant_class(c: char) -> Option<char> {
    match c {
        'b' | 'f' | 'p' | 'v' => Some('1'),
        'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' => Some('2'),
        'd' | 't' => Some('3'),
        'l' => Some('4'),
        'm' | 'n' => Some('5'),
        'r' => Some('6'),
        _ => None,
    }
}

/// Encode a place name as a fixed-width consonant-class code.
///
/// The text is normalized first. The code is the uppercased first letter
/// followed by class digits of the remaining consonants; a digit equal to the
/// previous one is suppressed, and vowels or unmapped characters break a run
/// without emitting anything. Short codes are right-padded with `'0'`.
///
/// Returns an empty string when the normalized text is empty; callers must
/// not treat two empty codes as a phonetic match on their own.
///
/// # Example
/// ```
/// use ridefare_search::phonetic_code;
///
/// assert_eq!(phonetic_code("Tirupathi"), "T61300");
/// assert_eq!(phonetic_code("Thirupati"), "T61300");
/// assert_eq!(phonetic_code(""), "");
/// ```
pub fn phonetic_code(text: &str) -> String {
    let normalized = normalize(text);
    let mut chars = normalized.chars();

    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut code: String = first.to_uppercase().collect();
    let mut emitted = code.chars().count();
    let mut last_class = consonant_class(first);

    for c in chars {
        if emitted >= PHONETIC_CODE_LEN {
            break;
        }
        match consonant_class(c) {
            Some(digit) if Some(digit) != last_class => {
                code.push(digit);
                emitted += 1;
                last_class = Some(digit);
            }
            Some(_) => {}
            None => last_class = None,
        }
    }

    code.extend(std::iter::repeat('0').take(PHONETIC_CODE_LEN.saturating_sub(emitted)));
    code
}
