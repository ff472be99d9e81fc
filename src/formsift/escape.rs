//! CSS identifier escaping, following the CSSOM `CSS.escape()` algorithm.
//!
//! Used for attribute names and quoted values alike. Total over any input.

use std::fmt::Write;

pub fn css_escape(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());

    for (i, &c) in chars.iter().enumerate() {
        let code = c as u32;
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1F}' | '\u{7F}' => push_code_point(&mut out, code),
            '0'..='9' if i == 0 || (i == 1 && chars[0] == '-') => {
                push_code_point(&mut out, code)
            }
            '-' if i == 0 && chars.len() == 1 => out.push_str("\\-"),
            c if code >= 0x80 || c == '-' || c == '_' || c.is_ascii_alphanumeric() => {
                out.push(c)
            }
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }

    out
}

fn push_code_point(out: &mut String, code: u32) {
    // Writing to a String cannot fail
    let _ = write!(out, "\\{:x} ", code);
}
