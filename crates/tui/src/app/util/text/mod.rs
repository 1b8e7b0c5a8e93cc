use std::iter::Peekable;
use std::str::Chars;
use unicode_width::UnicodeWidthChar;

pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0).max(1)
}

pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;
    for ch in line.chars() {
        let ch_width = char_width(ch);
        if current_width + ch_width > width && !current.is_empty() {
            lines.push(current);
            current = String::new();
            current_width = 0;
        }
        current.push(ch);
        current_width += ch_width;
    }
    lines.push(current);
    lines
}

const TAB_WIDTH: usize = 4;

fn skip_escape_sequence(chars: &mut Peekable<Chars<'_>>) {
    match chars.next() {
        // CSI runs until a final byte in 0x40..=0x7e.
        Some('[') => {
            for seq in chars.by_ref() {
                if ('\x40'..='\x7e').contains(&seq) {
                    break;
                }
            }
        }
        // OSC ends with BEL or ESC \.
        Some(']') => {
            while let Some(seq) = chars.next() {
                if seq == '\x07' {
                    break;
                }
                if seq == '\x1b' && chars.peek() == Some(&'\\') {
                    chars.next();
                    break;
                }
            }
        }
        _ => {}
    }
}

/// Makes backend text safe to paint: escapes stripped, tabs expanded, other
/// controls blanked so nothing can move the cursor.
pub fn sanitize_for_tui(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut col = 0_usize;
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\x1b' => skip_escape_sequence(&mut chars),
            '\t' => {
                let spaces = TAB_WIDTH - col % TAB_WIDTH;
                out.extend(std::iter::repeat(' ').take(spaces));
                col += spaces;
            }
            '\r' => {}
            c if c.is_control() => {
                out.push(' ');
                col += 1;
            }
            c => {
                out.push(c);
                col += char_width(c);
            }
        }
    }

    out
}
