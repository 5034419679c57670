//! Line tokenizer for instruction listings.
//!
//! Rules:
//! - `#` starts a comment that runs to the end of the line
//! - tokens are separated by whitespace
//! - leading tokens ending in `:` define labels (`loop:` or `loop:loadc 1`)
//! - the first remaining token is the mnemonic, the rest are operands

use super::labels::is_valid_name;
use crate::common::constants::{COMMENT_CHAR, LABEL_SUFFIX};
use crate::common::{ParseError, ParseErrorKind};

/// The tokens of one listing line.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    /// Labels defined on this line, in order.
    pub labels: Vec<&'a str>,
    /// Mnemonic, if the line carries an instruction.
    pub mnemonic: Option<&'a str>,
    /// Operand tokens following the mnemonic.
    pub operands: Vec<&'a str>,
}

impl Line<'_> {
    /// Returns `true` if the line has neither labels nor an instruction.
    pub fn is_blank(&self) -> bool {
        self.labels.is_empty() && self.mnemonic.is_none()
    }
}

/// Tokenizes a single line.
///
/// # Arguments
///
/// * `number` - 1-based line number, used in errors.
/// * `text` - Raw line text without its terminator.
pub(crate) fn tokenize(number: usize, text: &str) -> Result<Line<'_>, ParseError> {
    let code = text
        .split_once(COMMENT_CHAR)
        .map_or(text, |(before, _)| before);

    let mut line = Line {
        number,
        ..Line::default()
    };

    for token in code.split_whitespace() {
        if line.mnemonic.is_some() {
            line.operands.push(token);
            continue;
        }

        let mut rest = token;
        while let Some((name, after)) = rest.split_once(LABEL_SUFFIX) {
            if !is_valid_name(name) {
                return Err(ParseError::new(
                    number,
                    ParseErrorKind::InvalidLabel(name.to_string()),
                ));
            }
            line.labels.push(name);
            rest = after;
        }

        if !rest.is_empty() {
            line.mnemonic = Some(rest);
        }
    }

    Ok(line)
}
