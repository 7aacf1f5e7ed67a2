//! Naming rules for generated identifiers.
//!
//! Pure string functions, kept apart from parsing so the convention can be
//! changed and tested in isolation.

/// Suffix shared by the root client class and the singleton object.
pub const CLIENT_SUFFIX: &str = "_client";

/// Turns a path segment into a class name by upper-casing its first letter.
///
/// The rest of the segment is kept as written, so `userProfile` becomes
/// `UserProfile` and `user_profile` becomes `User_profile`.
///
/// # Examples
///
/// ```
/// use acg_codegen::naming::class_name;
///
/// assert_eq!(class_name("users"), "Users");
/// assert_eq!(class_name("userProfile"), "UserProfile");
/// assert_eq!(class_name(""), "");
/// ```
#[must_use]
pub fn class_name(segment: &str) -> String {
    let mut chars = segment.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Name of the root client class for a package, e.g. `Demo_client`.
#[must_use]
pub fn root_client_class(package: &str) -> String {
    format!("{}{CLIENT_SUFFIX}", class_name(package))
}

/// Name of the module-level singleton for a package, e.g. `demo_client`.
#[must_use]
pub fn singleton_name(package: &str) -> String {
    format!("{package}{CLIENT_SUFFIX}")
}
