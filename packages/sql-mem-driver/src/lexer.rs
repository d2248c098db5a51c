//! Tokenizer for the SQL subset.
//!
//! Accepts identifier quoting in any dialect style (double quotes,
//! backticks, brackets) so statements rendered for one backend execute
//! against this one unchanged.

use sql_adapter_core::AdapterError;

/// Lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Unquoted identifier or keyword, as written
    Identifier(String),
    /// Quoted identifier, quotes stripped
    QuotedIdentifier(String),
    /// String literal, quotes stripped and escapes resolved
    StringLiteral(String),
    /// Integer literal
    Integer(i64),
    /// Float literal
    Float(f64),
    /// `?` placeholder
    Placeholder,
    Comma,
    Dot,
    Star,
    LParen,
    RParen,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// Tokenizes a statement.
///
/// # Returns
/// `Result<Vec<Token>, AdapterError>`; unterminated quotes and unexpected
/// characters produce a syntax error naming the offending position.
pub fn tokenize(sql: &str) -> Result<Vec<Token>, AdapterError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = sql.chars().collect();
    let mut position = 0;

    while position < chars.len() {
        let ch = chars[position];
        match ch {
            c if c.is_whitespace() => position += 1,
            ';' => position += 1,
            ',' => {
                tokens.push(Token::Comma);
                position += 1;
            }
            '.' => {
                tokens.push(Token::Dot);
                position += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                position += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                position += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                position += 1;
            }
            '?' => {
                tokens.push(Token::Placeholder);
                position += 1;
            }
            '=' => {
                tokens.push(Token::Eq);
                position += 1;
            }
            '<' => {
                position += 1;
                match chars.get(position) {
                    Some('>') => {
                        tokens.push(Token::Ne);
                        position += 1;
                    }
                    Some('=') => {
                        tokens.push(Token::Le);
                        position += 1;
                    }
                    _ => tokens.push(Token::Lt),
                }
            }
            '>' => {
                position += 1;
                if chars.get(position) == Some(&'=') {
                    tokens.push(Token::Ge);
                    position += 1;
                } else {
                    tokens.push(Token::Gt);
                }
            }
            '!' => {
                position += 1;
                if chars.get(position) == Some(&'=') {
                    tokens.push(Token::Ne);
                    position += 1;
                } else {
                    return Err(AdapterError::syntax(format!(
                        "unexpected character '!' at position {}",
                        position - 1
                    )));
                }
            }
            '\'' => {
                let (literal, next) = read_string(&chars, position)?;
                tokens.push(Token::StringLiteral(literal));
                position = next;
            }
            '"' => {
                let (identifier, next) = read_quoted(&chars, position, '"')?;
                tokens.push(Token::QuotedIdentifier(identifier));
                position = next;
            }
            '`' => {
                let (identifier, next) = read_quoted(&chars, position, '`')?;
                tokens.push(Token::QuotedIdentifier(identifier));
                position = next;
            }
            '[' => {
                let (identifier, next) = read_bracketed(&chars, position)?;
                tokens.push(Token::QuotedIdentifier(identifier));
                position = next;
            }
            '-' if chars
                .get(position + 1)
                .map(|c| c.is_ascii_digit())
                .unwrap_or(false) =>
            {
                let (token, next) = read_number(&chars, position)?;
                tokens.push(token);
                position = next;
            }
            c if c.is_ascii_digit() => {
                let (token, next) = read_number(&chars, position)?;
                tokens.push(token);
                position = next;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = position;
                while position < chars.len()
                    && (chars[position].is_alphanumeric() || chars[position] == '_')
                {
                    position += 1;
                }
                let word: String = chars[start..position].iter().collect();
                tokens.push(Token::Identifier(word));
            }
            other => {
                return Err(AdapterError::syntax(format!(
                    "unexpected character '{}' at position {}",
                    other, position
                )));
            }
        }
    }

    Ok(tokens)
}

fn read_string(chars: &[char], start: usize) -> Result<(String, usize), AdapterError> {
    // start points at the opening quote; '' is an escaped quote
    let mut literal = String::new();
    let mut position = start + 1;
    while position < chars.len() {
        let ch = chars[position];
        if ch == '\'' {
            if chars.get(position + 1) == Some(&'\'') {
                literal.push('\'');
                position += 2;
            } else {
                return Ok((literal, position + 1));
            }
        } else {
            literal.push(ch);
            position += 1;
        }
    }
    Err(AdapterError::syntax(format!(
        "unterminated string literal starting at position {}",
        start
    )))
}

fn read_quoted(
    chars: &[char],
    start: usize,
    quote: char,
) -> Result<(String, usize), AdapterError> {
    let mut identifier = String::new();
    let mut position = start + 1;
    while position < chars.len() {
        let ch = chars[position];
        if ch == quote {
            if chars.get(position + 1) == Some(&quote) {
                identifier.push(quote);
                position += 2;
            } else {
                return Ok((identifier, position + 1));
            }
        } else {
            identifier.push(ch);
            position += 1;
        }
    }
    Err(AdapterError::syntax(format!(
        "unterminated quoted identifier starting at position {}",
        start
    )))
}

fn read_bracketed(chars: &[char], start: usize) -> Result<(String, usize), AdapterError> {
    let mut identifier = String::new();
    let mut position = start + 1;
    while position < chars.len() {
        let ch = chars[position];
        if ch == ']' {
            if chars.get(position + 1) == Some(&']') {
                identifier.push(']');
                position += 2;
            } else {
                return Ok((identifier, position + 1));
            }
        } else {
            identifier.push(ch);
            position += 1;
        }
    }
    Err(AdapterError::syntax(format!(
        "unterminated bracketed identifier starting at position {}",
        start
    )))
}

fn read_number(chars: &[char], start: usize) -> Result<(Token, usize), AdapterError> {
    let mut position = start;
    if chars[position] == '-' {
        position += 1;
    }
    let mut is_float = false;
    while position < chars.len() {
        let ch = chars[position];
        if ch.is_ascii_digit() {
            position += 1;
        } else if ch == '.'
            && !is_float
            && chars
                .get(position + 1)
                .map(|c| c.is_ascii_digit())
                .unwrap_or(false)
        {
            is_float = true;
            position += 1;
        } else {
            break;
        }
    }

    let text: String = chars[start..position].iter().collect();
    let token = if is_float {
        Token::Float(text.parse().map_err(|_| {
            AdapterError::syntax(format!("invalid numeric literal '{}'", text))
        })?)
    } else {
        Token::Integer(text.parse().map_err(|_| {
            AdapterError::syntax(format!("invalid numeric literal '{}'", text))
        })?)
    };
    Ok((token, position))
}

impl Token {
    /// Returns `true` when this is the given keyword, case-insensitively.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        match self {
            Token::Identifier(word) => word.eq_ignore_ascii_case(keyword),
            _ => false,
        }
    }
}
