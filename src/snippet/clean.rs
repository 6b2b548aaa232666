use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Title segments are separated by dashes with optional surrounding
    // whitespace; bare hyphens split too
    static ref TITLE_SEPARATOR: Regex = Regex::new(r"\s*-\s*").unwrap();

    // Board/site markers the source site appends as the final title segment
    static ref BOILERPLATE_SUFFIX: Regex =
        Regex::new(r"(?i)^(網路購物(?:板|版)?|Dcard)").unwrap();

    // Leading "Mon D, YYYY ... " snippet stamp
    static ref PREFIX_ABSOLUTE: Regex =
        Regex::new(r"^[A-Za-z]{3}\s+\d{1,2},\s+\d{4}\s+\.\.\.\s+").unwrap();

    // Leading "N days ago ... " snippet stamp
    static ref PREFIX_RELATIVE: Regex =
        Regex::new(r"^\d+\s+days?\s+ago\s+\.\.\.\s+").unwrap();

    // Leading "今天17:35 ... " snippet stamp; the English spelling appears
    // in some locales
    static ref PREFIX_TODAY: Regex =
        Regex::new(r"^(?:今天|Today)\s*\d{1,2}:\d{2}\s+\.\.\.\s+").unwrap();

    // Truncation marker the search engine appends to long snippets
    static ref TRAILING_ELLIPSIS: Regex = Regex::new(r"\s*\.\.\.$").unwrap();
}

/// Strips the source site's boilerplate suffix from a result title
///
/// Titles arrive as dash-separated segments, e.g.
/// `行動電源開箱 - 網路購物板 - Dcard`. When the title has more than one
/// segment and the last one is a known board or site marker, that segment is
/// dropped and the rest re-joined with `" - "`. Otherwise the title is
/// returned trimmed but intact.
pub fn clean_title(raw: &str) -> String {
    let parts: Vec<&str> = TITLE_SEPARATOR.split(raw).collect();
    if parts.len() > 1 && BOILERPLATE_SUFFIX.is_match(parts[parts.len() - 1]) {
        parts[..parts.len() - 1].join(" - ").trim().to_string()
    } else {
        raw.trim().to_string()
    }
}

/// Strips snippet furniture from result content
///
/// Removes one leading date stamp (any of the three shapes the engine
/// emits, each followed by `" ... "`) and the trailing `"..."` truncation
/// marker, then trims. The date itself is recovered separately by
/// [`parse_publish_date`](crate::snippet::parse_publish_date).
pub fn clean_content(raw: &str) -> String {
    let content = PREFIX_ABSOLUTE.replace(raw, "");
    let content = PREFIX_RELATIVE.replace(&content, "");
    let content = PREFIX_TODAY.replace(&content, "");
    let content = TRAILING_ELLIPSIS.replace(&content, "");
    content.trim().to_string()
}
