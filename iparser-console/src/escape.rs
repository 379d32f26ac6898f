//! Escaped input lines and printable symbol descriptions.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EscapeError {
    #[error("unrecognized escape sequence `\\{0}`")]
    Unrecognized(char),

    #[error("line ends inside an escape sequence")]
    Dangling,
}

/// Expand the control escapes `\0 \n \r \a \b \t \v \f \\` into bytes.
///
/// Other characters are copied as their UTF-8 bytes.
pub fn unescape(line: &str) -> Result<Vec<u8>, EscapeError> {
    let mut bytes = Vec::with_capacity(line.len());
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut tmp = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
            continue;
        }

        let byte = match chars.next().ok_or(EscapeError::Dangling)? {
            '0' => 0x00,
            'a' => 0x07,
            'b' => 0x08,
            't' => 0x09,
            'n' => 0x0A,
            'v' => 0x0B,
            'f' => 0x0C,
            'r' => 0x0D,
            '\\' => b'\\',
            other => return Err(EscapeError::Unrecognized(other)),
        };
        bytes.push(byte);
    }

    Ok(bytes)
}

/// `<code>:<symbol>`, control bytes spelled as their escape.
pub fn describe(byte: u8) -> String {
    let shown = match byte {
        0x00 => "\\0".to_owned(),
        0x07 => "\\a".to_owned(),
        0x08 => "\\b".to_owned(),
        0x09 => "\\t".to_owned(),
        0x0A => "\\n".to_owned(),
        0x0B => "\\v".to_owned(),
        0x0C => "\\f".to_owned(),
        0x0D => "\\r".to_owned(),
        other => char::from(other).to_string(),
    };
    format!("{byte}:{shown}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_copied() {
        assert_eq!(unescape("<a>").unwrap(), b"<a>");
    }

    #[test]
    fn control_escapes_are_expanded() {
        assert_eq!(
            unescape(r"\0\n\r\a\b\t\v\f\\").unwrap(),
            [0x00, 0x0A, 0x0D, 0x07, 0x08, 0x09, 0x0B, 0x0C, b'\\']
        );
        assert_eq!(unescape(r"a\tb").unwrap(), b"a\tb");
    }

    #[test]
    fn multibyte_chars_become_utf8_bytes() {
        assert_eq!(unescape("é").unwrap(), [0xC3, 0xA9]);
    }

    #[test]
    fn unknown_escape_is_rejected() {
        assert_eq!(unescape(r"\q"), Err(EscapeError::Unrecognized('q')));
        assert_eq!(
            EscapeError::Unrecognized('q').to_string(),
            "unrecognized escape sequence `\\q`"
        );
    }

    #[test]
    fn trailing_backslash_is_rejected() {
        assert_eq!(unescape("abc\\"), Err(EscapeError::Dangling));
    }

    #[test]
    fn describe_spells_controls() {
        assert_eq!(describe(b'\n'), "10:\\n");
        assert_eq!(describe(0), "0:\\0");
        assert_eq!(describe(b'<'), "60:<");
    }
}
