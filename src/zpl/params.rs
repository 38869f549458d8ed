//! Parameter decoding for command tokens.
//!
//! Missing and empty parameters are `None` so callers can fall back to
//! defaults; a present numeric parameter that is not a number is a
//! [`ParseError`].

use super::ParseError;
use super::lexer::Token;

/// Positional view over a token's parameters.
pub struct Args<'t> {
    token: &'t Token,
    values: Vec<&'t str>,
}

impl<'t> Args<'t> {
    pub fn new(token: &'t Token) -> Self {
        Self {
            token,
            values: token.args(),
        }
    }

    /// Trimmed parameter text, `None` when missing or empty.
    pub fn str(&self, index: usize) -> Option<&'t str> {
        self.values
            .get(index)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// First character of the parameter, upper-cased.
    pub fn char(&self, index: usize) -> Option<char> {
        self.str(index)
            .and_then(|v| v.chars().next())
            .map(|c| c.to_ascii_uppercase())
    }

    /// `Y`/`N` flag.
    pub fn flag(&self, index: usize) -> Option<bool> {
        match self.char(index) {
            Some('Y') => Some(true),
            Some('N') => Some(false),
            _ => None,
        }
    }

    /// Non-negative integer; negative values clamp to 0, fractions round.
    pub fn uint(&self, index: usize) -> Result<Option<u32>, ParseError> {
        Ok(self
            .int(index)?
            .map(|v| v.clamp(0, u32::MAX as i64) as u32))
    }

    /// Signed integer; fractions round.
    pub fn int(&self, index: usize) -> Result<Option<i64>, ParseError> {
        let Some(raw) = self.str(index) else {
            return Ok(None);
        };
        if let Ok(v) = raw.parse::<i64>() {
            return Ok(Some(v));
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v.round() as i64)),
            _ => Err(self.invalid(index, raw)),
        }
    }

    pub fn float(&self, index: usize) -> Result<Option<f64>, ParseError> {
        let Some(raw) = self.str(index) else {
            return Ok(None);
        };
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(Some(v)),
            _ => Err(self.invalid(index, raw)),
        }
    }

    fn invalid(&self, index: usize, value: &str) -> ParseError {
        ParseError::InvalidNumber {
            command: self.token.mnemonic.clone(),
            index,
            value: value.to_string(),
            offset: self.token.offset,
        }
    }
}

/// Decode `^FH` hex escapes (`_41` → `A`).
///
/// Decoded bytes are read as UTF-8; if the result is not valid UTF-8 the
/// escaped bytes are read as Latin-1 instead.
pub fn decode_hex_escapes(data: &str, indicator: char) -> String {
    let chars: Vec<char> = data.chars().collect();
    let mut bytes = Vec::with_capacity(data.len());
    let mut latin1 = String::with_capacity(data.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == indicator
            && let Some(byte) = hex_pair(chars.get(i + 1), chars.get(i + 2))
        {
            bytes.push(byte);
            latin1.push(byte as char);
            i += 3;
            continue;
        }
        let mut buf = [0u8; 4];
        bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
        latin1.push(c);
        i += 1;
    }

    String::from_utf8(bytes).unwrap_or(latin1)
}

fn hex_pair(hi: Option<&char>, lo: Option<&char>) -> Option<u8> {
    let hi = hi?.to_digit(16)?;
    let lo = lo?.to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zpl::lexer::tokenize;

    #[test]
    fn test_args_defaults_and_values() {
        let tokens = tokenize(b"^FO10,,abc,-4,2.6");
        let args = Args::new(&tokens[0]);
        assert_eq!(args.uint(0).unwrap(), Some(10));
        assert_eq!(args.uint(1).unwrap(), None);
        assert_eq!(args.uint(3).unwrap(), Some(0));
        assert_eq!(args.uint(4).unwrap(), Some(3));
        assert_eq!(args.uint(9).unwrap(), None);
        assert!(args.uint(2).is_err());
    }

    #[test]
    fn test_invalid_number_reports_command() {
        let tokens = tokenize(b"^XA^FOx,1");
        let err = Args::new(&tokens[1]).uint(0).unwrap_err();
        match err {
            ParseError::InvalidNumber {
                command,
                index,
                value,
                offset,
            } => {
                assert_eq!(command, "FO");
                assert_eq!(index, 0);
                assert_eq!(value, "x");
                assert_eq!(offset, 3);
            }
        }
    }

    #[test]
    fn test_char_and_flag() {
        let tokens = tokenize(b"^BCn,100,y,N");
        let args = Args::new(&tokens[0]);
        assert_eq!(args.char(0), Some('N'));
        assert_eq!(args.flag(2), Some(true));
        assert_eq!(args.flag(3), Some(false));
        assert_eq!(args.flag(4), None);
    }

    #[test]
    fn test_float() {
        let tokens = tokenize(b"^BY3,2.5,100");
        let args = Args::new(&tokens[0]);
        assert_eq!(args.float(1).unwrap(), Some(2.5));
    }

    #[test]
    fn test_hex_escapes() {
        assert_eq!(decode_hex_escapes("_41_42C", '_'), "ABC");
        assert_eq!(decode_hex_escapes("caf_C3_A9", '_'), "café");
        assert_eq!(decode_hex_escapes("caf_E9", '_'), "café");
        assert_eq!(decode_hex_escapes("no_escape_zz", '_'), "no_escape_zz");
        assert_eq!(decode_hex_escapes("#7E", '#'), "~");
    }
}
