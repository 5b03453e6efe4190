//! Element naming conventions.
//!
//! Words are split at non-alphanumeric separators, at lower-to-upper case
//! transitions, before the last capital of an acronym that is followed by
//! a lower-case letter, and at digit-to-letter transitions. Case mapping is
//! Unicode-aware.

/// `"THIS_word"` becomes `"thisWord"`.
///
/// ```
/// use docmap_core::naming::to_camel_case;
///
/// assert_eq!(to_camel_case("a-lot-of-wordsHere"), "aLotOfWordsHere");
/// ```
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, word) in split_words(name).iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            capitalize_into(&mut out, word);
        }
    }
    out
}

/// `"THIS_word"` becomes `"ThisWord"`.
pub fn to_title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in split_words(name) {
        capitalize_into(&mut out, &word);
    }
    out
}

fn capitalize_into(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(&chars.as_str().to_lowercase());
    }
}

fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if let Some(prev) = current.chars().next_back() {
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_numeric() && c.is_alphabetic())
                || (prev.is_uppercase() && c.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}
