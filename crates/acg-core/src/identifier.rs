//! Identifier rules for names that end up in the generated Python source.
//!
//! Package names, service segments, and method names all become Python
//! identifiers, so they share one rule: ASCII letters, digits, and `_`, not
//! starting with a digit, and not a reserved keyword.

/// Python hard keywords. Soft keywords (`match`, `case`, `type`, `_`) are
/// valid identifiers and are not listed.
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Returns `true` if `name` has identifier shape, keywords included.
///
/// # Examples
///
/// ```
/// use acg_core::identifier::is_identifier;
///
/// assert!(is_identifier("get_all"));
/// assert!(is_identifier("import"));
/// assert!(!is_identifier("1users"));
/// ```
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Returns `true` if `name` is a reserved Python keyword.
#[must_use]
pub fn is_keyword(name: &str) -> bool {
    PYTHON_KEYWORDS.contains(&name)
}

/// Returns `true` for names usable as a generated module, class, attribute,
/// or method name.
///
/// # Examples
///
/// ```
/// use acg_core::identifier::is_usable_name;
///
/// assert!(is_usable_name("users"));
/// assert!(!is_usable_name("return"));
/// assert!(!is_usable_name("user-profile"));
/// ```
#[must_use]
pub fn is_usable_name(name: &str) -> bool {
    is_identifier(name) && !is_keyword(name)
}
