//! XML name validation

/// Check whether `value` is a well-formed XML name
///
/// Accepts letters, `_` and `:` as the first character, and additionally
/// digits, `-`, `.` and the combining name characters (`U+00B7`,
/// `U+0300..=U+036F`, `U+203F..=U+2040`) afterwards. Non-ASCII alphanumerics
/// are accepted.
///
/// # Examples
/// - `Neutral`, `Actor.Color`, `ns:Item` → valid
/// - `1st`, `a b`, `#text`, `` → invalid
#[must_use]
pub fn is_xml_name(value: &str) -> bool {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_' || first == ':') {
        return false;
    }
    chars.all(|c| {
        c.is_alphanumeric()
            || matches!(
                c,
                '_' | ':' | '-' | '.' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}'
            )
    })
}
