//! Locates the single `<script>` element in user-pasted text.

use std::sync::LazyLock;

use regex::Regex;

// Self-closing form first so `<script/>` never runs on into a later `</script>`.
static SCRIPT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*/>|<script\b[^>]*>.*?</script\s*>")
        .expect("script tag pattern must compile")
});

static SCRIPT_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<script\b").expect("script open pattern must compile"));

/// Returns the one script element contained in `raw`.
///
/// Returns `None` when there is no complete script element, more than one,
/// or a stray unterminated `<script` before or after the complete one.
/// `<script` text inside the matched element (an attribute value, the body)
/// does not count.
pub fn single_script_tag(raw: &str) -> Option<&str> {
    let mut matches = SCRIPT_TAG.find_iter(raw);
    let tag = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    let outside = [&raw[..tag.start()], &raw[tag.end()..]];
    if outside.iter().any(|text| SCRIPT_OPEN.is_match(text)) {
        return None;
    }
    Some(tag.as_str())
}

/// Number of complete script elements in `raw`.
pub fn count_script_tags(raw: &str) -> usize {
    SCRIPT_TAG.find_iter(raw).count()
}
