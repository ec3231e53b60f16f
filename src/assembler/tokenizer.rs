//! C5: map source lines to a flat token sequence.
//!
//! One word at a time: skip whitespace, read a run of `[A-Za-z0-9_]`, and
//! dispatch on what's left when that run is empty (`.`/`-`/`/`/`;`/`:`).
//! `-` and `.` are deliberately excluded from the main run — see the
//! "Tokenizer's run charset" note in DESIGN.md — so the dedicated
//! negative-immediate and directive branches below are reachable at all.

use crate::diagnostics::{Diagnostic, NotificationBus};
use crate::source::{Cursor, Position, SourceFile};
use crate::token::{Token, TokenKind};

pub fn tokenize_file(source: &SourceFile, bus: &mut NotificationBus) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (line_number, line) in source.lines() {
        tokens.extend(tokenize_line(line, line_number, source.name(), bus));
    }
    tokens
}

pub fn tokenize_line(
    source_line: &str,
    line_number: usize,
    file: &str,
    bus: &mut NotificationBus,
) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(source_line);

    loop {
        cursor.skip_while(|c| c.is_whitespace());
        if cursor.at_end() {
            break;
        }

        let token_start = cursor.index();
        let token_end = cursor.find_if(|c| !(c.is_ascii_alphanumeric() || c == '_'));
        let word = cursor.substr(token_start, token_end);

        if word.is_empty() {
            match cursor.next() {
                '.' => {
                    let body_start = cursor.index();
                    let body_end = cursor.find_if(|c| !c.is_ascii_alphanumeric());
                    let body = cursor.substr(body_start, body_end).to_string();
                    tokens.push(tokenize_directive(
                        &body,
                        token_start,
                        line_number,
                        file,
                        source_line,
                        bus,
                    ));
                }
                '-' => {
                    let digits_start = cursor.index();
                    let digits_end = cursor.find_if(|c| !c.is_ascii_alphanumeric());
                    let digits = cursor.substr(digits_start, digits_end).to_string();
                    if digits.is_empty() {
                        bus.error(Diagnostic::new(
                            file,
                            line_number,
                            token_start,
                            0,
                            source_line,
                            "Extraneous '-' found.",
                        ));
                    } else {
                        tokens.push(tokenize_immediate(
                            &digits,
                            token_start,
                            line_number,
                            file,
                            source_line,
                            bus,
                        ));
                    }
                }
                '/' => {
                    if cursor.peek() != '/' {
                        bus.warning(Diagnostic::new(
                            file,
                            line_number,
                            token_start,
                            0,
                            source_line,
                            "Found '/', acting as if it's supposed to be '//'",
                        ));
                    }
                    break;
                }
                ';' => break,
                ':' => {}
                _ => {}
            }
        } else {
            let word = word.to_string();
            let token = tokenize(&word, token_start, line_number, file, source_line, bus);
            if token.kind == TokenKind::Decimal && token.too_big {
                bus.error(Diagnostic::new(
                    file,
                    line_number,
                    token_start,
                    word.len(),
                    source_line,
                    "Immediate literal requires more than 16 bits to represent",
                ));
                tokens.push(Token::new(
                    TokenKind::None,
                    word,
                    file,
                    Position::new(line_number, token_start),
                ));
            } else {
                tokens.push(token);
            }
        }
    }

    tokens
}

fn tokenize(
    word: &str,
    start: usize,
    line_number: usize,
    file: &str,
    source_line: &str,
    bus: &mut NotificationBus,
) -> Token {
    let position = Position::new(line_number, start);
    let upper = word.to_uppercase();

    if let Some(kind) = TokenKind::from_keyword(&upper) {
        return Token::new(kind, word, file, position);
    }

    if is_valid_decimal(word) {
        let (value, too_big) = parse_decimal(word, false);
        let mut token = Token::new(TokenKind::Decimal, word, file, position).with_too_big(too_big);
        if let Some(value) = value {
            token = token.with_value(value);
        }
        return token;
    }

    if is_valid_label(word) {
        return Token::new(TokenKind::Label, word, file, position);
    }

    bus.error(Diagnostic::new(
        file,
        line_number,
        start,
        word.len(),
        source_line,
        format!("Invalid token: {}", word),
    ));
    Token::new(TokenKind::None, word, file, position)
}

fn tokenize_directive(
    body: &str,
    dot_start: usize,
    line_number: usize,
    file: &str,
    source_line: &str,
    bus: &mut NotificationBus,
) -> Token {
    let position = Position::new(line_number, dot_start);
    let upper = body.to_uppercase();

    if let Some(kind) = TokenKind::from_directive(&upper) {
        return Token::new(kind, format!(".{}", body), file, position);
    }

    if is_valid_label(body) {
        return Token::new(TokenKind::Label, body, file, position);
    }

    bus.error(Diagnostic::new(
        file,
        line_number,
        dot_start,
        body.len() + 1,
        source_line,
        format!("Invalid token: .{}", body),
    ));
    Token::new(TokenKind::None, format!(".{}", body), file, position)
}

fn tokenize_immediate(
    digits: &str,
    start: usize,
    line_number: usize,
    file: &str,
    source_line: &str,
    bus: &mut NotificationBus,
) -> Token {
    let position = Position::new(line_number, start);

    if !is_valid_decimal(digits) {
        bus.error(Diagnostic::new(
            file,
            line_number,
            start,
            digits.len(),
            source_line,
            format!("Expected Decimal literal, but found {}", digits),
        ));
        return Token::new(TokenKind::None, digits, file, position);
    }

    let (value, too_big) = parse_decimal(digits, true);
    if too_big {
        bus.error(Diagnostic::new(
            file,
            line_number,
            start,
            digits.len(),
            source_line,
            "Decimal literal is too big to fit inside 16 bits",
        ));
        return Token::new(TokenKind::None, digits, file, position);
    }

    Token::new(TokenKind::Decimal, format!("-{}", digits), file, position).with_value(value.unwrap())
}

/// Optional leading `-`, everything else a digit. Used both for the
/// direct (positive) dispatch path and, on the digit run captured after
/// an explicit `-`, the negative-immediate path.
fn is_valid_decimal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Optional leading `.`, everything else alphanumeric or `_`.
fn is_valid_label(s: &str) -> bool {
    let body = s.strip_prefix('.').unwrap_or(s);
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Parse a decimal literal's digits into a signed 16-bit value. Mirrors
/// the original `Decimal` constructor: a digit run longer than 7
/// characters is unconditionally too big (`(None, true)`); otherwise an
/// optional `#` prefix takes the value as-is, and `negative` negates an
/// unprefixed run (used for the `-<digits>` immediate path).
fn parse_decimal(lexeme: &str, negative: bool) -> (Option<i16>, bool) {
    if lexeme.len() > 7 {
        return (None, true);
    }

    if let Some(rest) = lexeme.strip_prefix('#') {
        return match rest.parse::<i64>() {
            Ok(v) if (i16::MIN as i64..=i16::MAX as i64).contains(&v) => (Some(v as i16), false),
            _ => (None, true),
        };
    }

    match lexeme.parse::<i64>() {
        Ok(mut v) => {
            if negative {
                v = -v;
            }
            if (i16::MIN as i64..=i16::MAX as i64).contains(&v) {
                (Some(v as i16), false)
            } else {
                (None, true)
            }
        }
        Err(_) => (None, true),
    }
}
