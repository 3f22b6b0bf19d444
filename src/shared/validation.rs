use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for colour overrides sent by the backend
    /// `#RRGGBB` or `#AARRGGBB`, hex digits in either case
    /// - Valid: "#FF9800", "#80ff9800", "#4caf50"
    /// - Invalid: "FF9800", "#FFF", "#GG9800", "orange"
    pub static ref HEX_COLOR_REGEX: Regex =
        Regex::new(r"^#(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap();
}
