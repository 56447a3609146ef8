//! Make-style line folding.
//!
//! Long lines are broken between words. Every broken line ends with a `\`
//! placed in the last column, continuation lines are indented by four spaces.

const CONTINUATION: &str = "\\";
const INDENT: &str = "    ";

/// Fold `line` so that no output line exceeds `width` columns.
///
/// A single word longer than the width is never split. `width == 0`
/// disables folding.
///
/// # Example
/// ```
/// use unit_graph::export::fold::fold;
///
/// assert_eq!(fold("a.o: b.o", 80), "a.o: b.o");
/// assert_eq!(fold("a.o: b.o c.o", 10), "a.o: b.o \\\n    c.o");
/// ```
pub fn fold(line: &str, width: usize) -> String {
    if width == 0 || line.len() <= width {
        return line.to_string();
    }

    let mut out: Vec<String> = Vec::new();
    let mut cur = String::new();
    for word in line.split_whitespace() {
        let has_content = !cur.trim().is_empty();
        // keep room for " \" after the word
        if has_content && cur.len() + 1 + word.len() + 1 + CONTINUATION.len() > width {
            let pad = width.saturating_sub(cur.len() + CONTINUATION.len()).max(1);
            cur.push_str(&" ".repeat(pad));
            cur.push_str(CONTINUATION);
            out.push(std::mem::replace(&mut cur, INDENT.to_string()));
        }
        if !cur.trim().is_empty() {
            cur.push(' ');
        }
        cur.push_str(word);
    }
    out.push(cur);
    out.join("\n")
}
