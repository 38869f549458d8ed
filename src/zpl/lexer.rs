//! ZPL tokenizer.
//!
//! Splits a raw byte stream into command tokens. The three delimiter
//! characters live in a [`Delimiters`] value that is threaded through the
//! scan and updated in place whenever a redefinition command (`CC`, `CT`,
//! `CD`) is consumed, so a redefinition applies to everything after it.
//!
//! ```text
//! ^XA^FO50,50^FDA^B~C^FS^XZ
//! ├──┼───────┼──────────┼──┤
//!  XA  FO       FD "A^B~C"  XZ     (FS is consumed as the FD terminator
//!                                   and emitted as its own token)
//! ```

/// Active delimiter characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    /// Format command prefix (`^`).
    pub format_prefix: char,
    /// Control command prefix (`~`).
    pub control_prefix: char,
    /// Parameter separator (`,`).
    pub separator: char,
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            format_prefix: '^',
            control_prefix: '~',
            separator: ',',
        }
    }
}

/// One command occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Two-character upper-cased command name (shorter only at end of input).
    pub mnemonic: String,
    /// Raw parameter text, CR/LF removed.
    pub params: String,
    /// Introduced by the control prefix rather than the format prefix.
    pub control: bool,
    /// Parameter separator active when this token was scanned.
    pub separator: char,
    /// Character offset of the prefix in the input.
    pub offset: usize,
}

impl Token {
    /// Parameters split on the separator that was active for this token.
    ///
    /// Empty parameter text yields no arguments.
    pub fn args(&self) -> Vec<&str> {
        if self.params.is_empty() {
            return Vec::new();
        }
        self.params.split(self.separator).collect()
    }

    /// Case-insensitive mnemonic comparison.
    pub fn is(&self, mnemonic: &str) -> bool {
        self.mnemonic.eq_ignore_ascii_case(mnemonic)
    }
}

/// Tokenize with the power-on delimiters.
pub fn tokenize(input: &[u8]) -> Vec<Token> {
    let mut delimiters = Delimiters::default();
    tokenize_with(input, &mut delimiters)
}

/// Tokenize starting from the given delimiters.
///
/// `delimiters` holds the final delimiter state when the scan returns.
pub fn tokenize_with(input: &[u8], delimiters: &mut Delimiters) -> Vec<Token> {
    let text = String::from_utf8_lossy(input);
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        if !is_prefix(c, delimiters) {
            i += 1;
            continue;
        }

        let offset = i;
        let control = c != delimiters.format_prefix;
        i += 1;

        let mnemonic_end = (i + 2).min(chars.len());
        let mnemonic: String = chars[i..mnemonic_end]
            .iter()
            .map(|ch| ch.to_ascii_uppercase())
            .collect();
        i = mnemonic_end;

        let separator = delimiters.separator;

        if mnemonic.chars().count() < 2 {
            tracing::trace!(offset, %mnemonic, "input ends inside a command");
            tokens.push(Token {
                mnemonic,
                params: String::new(),
                control,
                separator,
                offset,
            });
            break;
        }

        let params = match mnemonic.as_str() {
            "CC" | "CT" | "CD" => {
                // Exactly one character: the new delimiter.
                match chars.get(i) {
                    Some(&new) if !is_line_break(new) => {
                        i += 1;
                        redefine(delimiters, &mnemonic, new);
                        new.to_string()
                    }
                    _ => String::new(),
                }
            }
            "FD" | "FV" if !control => {
                let end = field_data_end(&chars, i, delimiters.format_prefix);
                let literal = collect_params(&chars[i..end]);
                i = end;
                literal
            }
            _ => {
                let mut end = i;
                while end < chars.len() && !is_prefix(chars[end], delimiters) {
                    end += 1;
                }
                let params = collect_params(&chars[i..end]);
                i = end;
                params
            }
        };

        tracing::trace!(offset, %mnemonic, %params, control, "token");
        tokens.push(Token {
            mnemonic,
            params,
            control,
            separator,
            offset,
        });
    }

    tokens
}

fn is_prefix(c: char, delimiters: &Delimiters) -> bool {
    c == delimiters.format_prefix || c == delimiters.control_prefix
}

fn is_line_break(c: char) -> bool {
    c == '\r' || c == '\n'
}

fn collect_params(chars: &[char]) -> String {
    chars.iter().filter(|c| !is_line_break(**c)).collect()
}

fn redefine(delimiters: &mut Delimiters, mnemonic: &str, new: char) {
    match mnemonic {
        "CC" => delimiters.format_prefix = new,
        "CT" => delimiters.control_prefix = new,
        "CD" => delimiters.separator = new,
        _ => {}
    }
    tracing::debug!(?delimiters, "delimiters redefined");
}

/// Index where literal field data ends: the next `{prefix}FS` or
/// `{prefix}XZ`, or the end of input.
fn field_data_end(chars: &[char], start: usize, prefix: char) -> usize {
    let mut j = start;
    while j < chars.len() {
        if chars[j] == prefix {
            let name: String = chars[j + 1..(j + 3).min(chars.len())]
                .iter()
                .map(|ch| ch.to_ascii_uppercase())
                .collect();
            if name == "FS" || name == "XZ" {
                return j;
            }
        }
        j += 1;
    }
    chars.len()
}
