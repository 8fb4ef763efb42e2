//! Small helpers shared by the tree, the CORS code and configuration loading.
//!
//! - [`replace_handlebars_with_env`] - `{{ VAR }}` substitution for TOML files
//! - [`longest_common_prefix`] - byte-wise prefix length used by the radix tree
//! - [`split_list`] and [`contains_ignore_case`] - comma-separated header lists

use {
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
};

/// Matches `{{ VAR_NAME }}` with optional whitespace around the variable name.
/// Variable names are uppercase letters, digits or underscores.
static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Replaces every `{{ VAR }}` in `input` with the value of the environment
/// variable `VAR`.
///
/// Missing variables become empty strings and are reported with a warning.
///
/// ```
/// use route_trie::replace_handlebars_with_env;
///
/// unsafe { std::env::set_var("ROUTE_TRIE_DOC_ORIGIN", "https://example.com"); }
/// let toml = r#"allowed_origins = ["{{ ROUTE_TRIE_DOC_ORIGIN }}"]"#;
/// assert_eq!(
///     replace_handlebars_with_env(toml),
///     r#"allowed_origins = ["https://example.com"]"#
/// );
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .to_string()
}

/// Length of the longest common prefix of `a` and `b`, in bytes.
pub(crate) fn longest_common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Splits a comma-separated header value into trimmed, non-empty items.
pub(crate) fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// Whether `list` contains `needle`, compared ASCII case-insensitively.
pub(crate) fn contains_ignore_case(list: &[String], needle: &str) -> bool {
    list.iter().any(|item| item.eq_ignore_ascii_case(needle))
}
