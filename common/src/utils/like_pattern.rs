//! SQL `LIKE` pattern helpers.

/// Escape character for `LIKE` patterns (MySQL's default).
pub const ESCAPE: char = '\\';

/// Escapes `%`, `_` and `\` so `term` matches only itself.
pub fn escape(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | ESCAPE) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}
