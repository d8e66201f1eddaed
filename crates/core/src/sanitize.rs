pub const DEFAULT_PREFIX: &str = "photo";

/// Makes a user supplied prefix safe to embed in a file name.
pub fn sanitize_prefix(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if is_disallowed_char(ch) {
            out.push('_');
        } else {
            out.push(ch);
        }
    }

    let out = out.trim_end_matches([' ', '.']).trim().to_string();

    if out.is_empty() {
        return DEFAULT_PREFIX.to_string();
    }

    out
}

fn is_disallowed_char(ch: char) -> bool {
    matches!(ch, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
        || ch == '\0'
        || ch.is_control()
}
