//! Best-effort reindentation applied to downloaded files.
//!
//! This is a bracket-depth heuristic, not a parser: it can produce odd
//! indentation for strings containing brackets, multi-line expressions,
//! or one-line blocks. Good enough for tidying editor buffers on export;
//! no syntactic validity is guaranteed.

use crate::languages::Language;

/// Reindent `code` line by line. Python gets 4-space units, everything
/// else 2. A line starting with a closing bracket dedents before being
/// emitted; a line ending with an opening bracket indents what follows.
/// Python lines ending in `:` open a block; Java/C++ lines containing an
/// unmatched `{` do the same.
pub fn reindent(code: &str, language: Language) -> String {
    if code.trim().is_empty() {
        return code.to_string();
    }

    let unit = if language == Language::Python3 { 4 } else { 2 };
    let mut depth: usize = 0;
    let mut out: Vec<String> = Vec::new();

    for line in code.split('\n') {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            out.push(String::new());
            continue;
        }

        if trimmed.starts_with(['}', ']', ')']) {
            depth = depth.saturating_sub(1);
        }

        out.push(format!("{}{}", " ".repeat(depth * unit), trimmed));

        let opens_bracket = trimmed.ends_with(['{', '[', '(']);
        if opens_bracket {
            depth += 1;
        }

        match language {
            Language::Python3 => {
                if trimmed.ends_with(':') {
                    depth += 1;
                }
            }
            Language::Java | Language::Cpp17 => {
                // Brace blocks opened mid-line, e.g. `int main() {` is
                // already counted by the trailing-bracket rule above.
                if !opens_bracket && trimmed.contains('{') && !trimmed.contains('}') {
                    depth += 1;
                }
            }
            Language::NodeJs => {}
        }
    }

    out.join("\n")
}
