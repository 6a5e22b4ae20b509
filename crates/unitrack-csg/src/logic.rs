//! Flattened logic tokens and their text encoding.
//!
//! A logic vector mixes face indices and operator tokens in one `u32`
//! domain. Operators occupy the top of the range, so any value below
//! [`LOPEN`] is a face index.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{LogicError, Result};

/// Element of a logic vector.
pub type LogicInt = u32;

/// Opening parenthesis (infix only).
pub const LOPEN: LogicInt = LogicInt::MAX - 6;
/// Closing parenthesis (infix only).
pub const LCLOSE: LogicInt = LOPEN + 1;
/// Boolean OR.
pub const LOR: LogicInt = LOPEN + 2;
/// Boolean AND.
pub const LAND: LogicInt = LOPEN + 3;
/// Boolean NOT.
pub const LNOT: LogicInt = LOPEN + 4;
/// Constant true.
pub const LTRUE: LogicInt = LOPEN + 5;

/// Whether a token is an operator rather than a face index.
#[inline]
pub fn is_operator_token(token: LogicInt) -> bool {
    token >= LOPEN
}

/// Whether a token is a value: a face index or [`LTRUE`].
#[inline]
pub fn is_operand_token(token: LogicInt) -> bool {
    !is_operator_token(token) || token == LTRUE
}

/// Text character of an operator token.
pub fn operator_char(token: LogicInt) -> Option<char> {
    match token {
        LOPEN => Some('('),
        LCLOSE => Some(')'),
        LOR => Some('|'),
        LAND => Some('&'),
        LNOT => Some('~'),
        LTRUE => Some('*'),
        _ => None,
    }
}

/// Order of operators and operands in a logic vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicNotation {
    /// Reverse Polish: `0 1 ~ &`.
    #[default]
    Postfix,
    /// Conventional: `0 & ~1`.
    Infix,
}

impl fmt::Display for LogicNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicNotation::Postfix => f.write_str("postfix"),
            LogicNotation::Infix => f.write_str("infix"),
        }
    }
}

/// Parse logic text into tokens.
///
/// Digits form a face index; `*`, `|`, `&`, `~`, `(`, `)` are operators;
/// whitespace separates numbers.
pub fn parse_logic(text: &str) -> Result<Vec<LogicInt>> {
    fn flush(number: &mut Option<u64>, result: &mut Vec<LogicInt>) -> Result<()> {
        if let Some(value) = number.take() {
            match LogicInt::try_from(value) {
                Ok(v) if !is_operator_token(v) => result.push(v),
                _ => return Err(LogicError::FaceOutOfRange(value)),
            }
        }
        Ok(())
    }

    let mut result = Vec::new();
    let mut number: Option<u64> = None;

    for (pos, c) in text.char_indices() {
        if let Some(digit) = c.to_digit(10) {
            let value = number.unwrap_or(0) * 10 + u64::from(digit);
            // Saturate well above the token range so overflow is reported
            number = Some(value.min(u64::from(LogicInt::MAX) + 1));
            continue;
        }
        flush(&mut number, &mut result)?;
        let token = match c {
            '*' => LTRUE,
            '|' => LOR,
            '&' => LAND,
            '~' => LNOT,
            '(' => LOPEN,
            ')' => LCLOSE,
            c if c.is_whitespace() => continue,
            other => return Err(LogicError::InvalidCharacter { ch: other, pos }),
        };
        result.push(token);
    }
    flush(&mut number, &mut result)?;
    Ok(result)
}

/// Wrapper that displays a logic vector as text.
pub struct LogicDisplay<'a>(pub &'a [LogicInt]);

impl fmt::Display for LogicDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match operator_char(token) {
                Some(c) => write!(f, "{c}")?,
                None if is_operator_token(token) => write!(f, "?{token}")?,
                None => write!(f, "{token}")?,
            }
        }
        Ok(())
    }
}

/// Format tokens as space-separated text, the inverse of [`parse_logic`].
pub fn format_logic(logic: &[LogicInt]) -> String {
    LogicDisplay(logic).to_string()
}

/// Maximum evaluation stack depth of a postfix expression.
///
/// Fails if an operator lacks operands, if any infix-only token appears, or
/// if the expression does not reduce to exactly one value.
pub fn logic_depth(postfix: &[LogicInt]) -> Result<usize> {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    for (pos, &token) in postfix.iter().enumerate() {
        match token {
            t if is_operand_token(t) => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            LNOT => {
                if depth < 1 {
                    return Err(LogicError::MissingOperand { pos });
                }
            }
            LAND | LOR => {
                if depth < 2 {
                    return Err(LogicError::MissingOperand { pos });
                }
                depth -= 1;
            }
            other => return Err(LogicError::UnexpectedToken { token: other, pos }),
        }
    }
    if depth != 1 {
        return Err(LogicError::Unbalanced { depth });
    }
    Ok(max_depth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert!(!is_operator_token(0));
        assert!(!is_operator_token(LOPEN - 1));
        assert!(is_operator_token(LOPEN));
        assert!(is_operator_token(LTRUE));
        assert!(is_operand_token(LTRUE));
        assert!(!is_operand_token(LNOT));
        assert_eq!(LTRUE, u32::MAX - 1);
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse_logic("0 1 ~ &").unwrap(), vec![0, 1, LNOT, LAND]);
        assert_eq!(
            parse_logic("12&(3|~*)").unwrap(),
            vec![12, LAND, LOPEN, 3, LOR, LNOT, LTRUE, LCLOSE]
        );
        assert_eq!(parse_logic("  ").unwrap(), Vec::<LogicInt>::new());
        assert_eq!(
            parse_logic("0 1 ^"),
            Err(LogicError::InvalidCharacter { ch: '^', pos: 4 })
        );
        assert!(matches!(
            parse_logic("99999999999"),
            Err(LogicError::FaceOutOfRange(_))
        ));
        assert!(matches!(
            parse_logic(&LOPEN.to_string()),
            Err(LogicError::FaceOutOfRange(_))
        ));
    }

    #[test]
    fn test_format() {
        let logic = vec![0, 1, LNOT, LAND, LTRUE, LOR];
        let text = format_logic(&logic);
        assert_eq!(text, "0 1 ~ & * |");
        assert_eq!(parse_logic(&text).unwrap(), logic);
        assert_eq!(format_logic(&[LOPEN, 2, LCLOSE]), "( 2 )");
    }

    #[test]
    fn test_depth() {
        assert_eq!(logic_depth(&[0]), Ok(1));
        assert_eq!(logic_depth(&[0, 1, LAND, 2, LOR]), Ok(2));
        assert_eq!(logic_depth(&[0, 1, 2, LAND, LAND, LNOT]), Ok(3));
        assert_eq!(logic_depth(&[LTRUE, LNOT]), Ok(1));
        assert_eq!(
            logic_depth(&[0, LAND]),
            Err(LogicError::MissingOperand { pos: 1 })
        );
        assert_eq!(logic_depth(&[0, 1]), Err(LogicError::Unbalanced { depth: 2 }));
        assert_eq!(logic_depth(&[]), Err(LogicError::Unbalanced { depth: 0 }));
        assert_eq!(
            logic_depth(&[LOPEN, 0, LCLOSE]),
            Err(LogicError::UnexpectedToken {
                token: LOPEN,
                pos: 0
            })
        );
    }
}
