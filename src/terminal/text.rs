//! Column-aware text helpers.

use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Distance between tab stops.
const TAB_STOP: usize = 8;

/// SGR sequence that clears all colors and styles.
const SGR_RESET: &str = "\x1b[0m";

/// Fit `text` into a row of `columns` cells, starting at column `start`.
///
/// Tabs expand to spaces up to the next tab stop. SGR sequences (colors
/// and styles) are kept and take no width; any other escape sequence or
/// control character is dropped since it would move the cursor.
///
/// Truncation happens on grapheme boundaries; a wide grapheme or tab that
/// would straddle the limit is dropped entirely. When styled text is cut,
/// an SGR reset is appended so the color does not leak into later output.
pub fn fit_width(text: &str, start: usize, columns: usize) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) && start + UnicodeWidthStr::width(text) <= columns {
        return Cow::Borrowed(text);
    }

    let mut fitted = String::with_capacity(text.len());
    let mut column = start;
    let mut styled = false;
    let mut cut = false;
    let mut rest = text;

    while let Some(grapheme) = rest.graphemes(true).next() {
        if grapheme.starts_with('\x1b') {
            let (len, sgr) = escape_sequence(rest);
            if sgr {
                fitted.push_str(&rest[..len]);
                styled = true;
            }
            rest = &rest[len..];
            continue;
        }
        rest = &rest[grapheme.len()..];

        let (width, expansion) = if grapheme == "\t" {
            let width = TAB_STOP - column % TAB_STOP;
            (width, Cow::Owned(" ".repeat(width)))
        } else if grapheme.chars().any(char::is_control) {
            continue;
        } else {
            (UnicodeWidthStr::width(grapheme), Cow::Borrowed(grapheme))
        };

        if column + width > columns {
            cut = true;
            break;
        }
        column += width;
        fitted.push_str(&expansion);
    }

    if cut && styled {
        fitted.push_str(SGR_RESET);
    }
    Cow::Owned(fitted)
}

/// Byte length of the escape sequence at the start of `s`, and whether it
/// is an SGR sequence.
fn escape_sequence(s: &str) -> (usize, bool) {
    let bytes = s.as_bytes();
    match bytes.get(1) {
        // CSI: parameter and intermediate bytes up to one final byte.
        Some(b'[') => match bytes[2..].iter().position(|b| (0x40..=0x7e).contains(b)) {
            Some(end) => (end + 3, bytes[end + 2] == b'm'),
            None => (bytes.len(), false),
        },
        // OSC: terminated by BEL or ST.
        Some(b']') => {
            let body = &s[2..];
            let bel = body.find('\x07').map(|i| i + 1);
            let st = body.find("\x1b\\").map(|i| i + 2);
            let end = bel.into_iter().chain(st).min().unwrap_or(body.len());
            (end + 2, false)
        }
        Some(_) => (1 + s[1..].chars().next().map_or(0, char::len_utf8), false),
        None => (1, false),
    }
}
