use lazy_static::lazy_static;
use regex::Regex;

/// Strip markup from a free-text field before it goes into a response
/// body. Applied at serialization time only; stored values stay raw.
///
/// Complete `<...>` sequences are removed and any `<` left over (one
/// with no closing `>` anywhere after it) is neutralized as `&lt;`, so
/// the output never contains a `<` and a second pass is a no-op.
pub fn sanitize(text: &str) -> String {
    lazy_static! {
        static ref TAG_RE: Regex = Regex::new(r"<[^>]*>").unwrap();
    }
    TAG_RE.replace_all(text, "").replace('<', "&lt;")
}
