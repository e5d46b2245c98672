pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Codes are trimmed and uppercased. Inner characters are kept as exported so
/// the matcher can reject malformed codes.
pub(crate) fn normalize_code(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .trim()
        .to_ascii_uppercase()
}

#[cfg(test)]
pub(crate) fn normalize_text_for_tests(value: &str) -> String {
    normalize_text(value)
}

#[cfg(test)]
pub(crate) fn normalize_code_for_tests(value: &str) -> String {
    normalize_code(value)
}
