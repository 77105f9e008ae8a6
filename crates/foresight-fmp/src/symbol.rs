//! Symbol and display-name conventions.

/// Suffix for Tokyo Stock Exchange listings.
pub const TOKYO_SUFFIX: &str = ".T";

/// Maximum characters of a company's display name.
pub const DISPLAY_NAME_LEN: usize = 9;

/// Uppercases a symbol and appends `.T` to bare numeric codes.
///
/// # Example
///
/// ```rust
/// use foresight_fmp::normalize_symbol;
///
/// assert_eq!(normalize_symbol("7203"), "7203.T");
/// assert_eq!(normalize_symbol("aapl"), "AAPL");
/// ```
#[must_use]
pub fn normalize_symbol(symbol: &str) -> String {
    let symbol = symbol.trim().to_uppercase();
    if !symbol.is_empty() && symbol.chars().all(|c| c.is_ascii_digit()) {
        format!("{symbol}{TOKYO_SUFFIX}")
    } else {
        symbol
    }
}

/// Short display name: the first nine characters of `name`, else the symbol.
#[must_use]
pub fn display_name(name: Option<&str>, symbol: &str) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => n.chars().take(DISPLAY_NAME_LEN).collect(),
        None => symbol.to_string(),
    }
}
