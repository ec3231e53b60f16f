//! C6: the operand binder ("lexer stage"). Walks the flat token list and
//! attaches each instruction/directive's operands in place, per its
//! [crate::token::Requirements].

use crate::diagnostics::{Diagnostic, NotificationBus};
use crate::source::SourceFile;
use crate::token::{Token, TokenKind};

/// Kinds that legitimately take zero operands at the top level; anything
/// else with `min == 0` (currently only `DECIMAL` and `NONE`) is a stray
/// operand-looking token and gets the generic catch-all diagnostic.
fn requires_zero(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Label | TokenKind::Begin | TokenKind::End | TokenKind::Halt
    )
}

pub fn bind_operands(mut tokens: Vec<Token>, source: &SourceFile, bus: &mut NotificationBus) -> Vec<Token> {
    let mut idx = 0;
    while idx < tokens.len() {
        let kind = tokens[idx].kind;
        let requirements = kind.requirements();

        let satisfied;
        let mut consumed = 0usize;

        if requirements.min == 0 {
            satisfied = true;
        } else if tokens.len() <= idx + requirements.min {
            // Not enough successor tokens to even try. The original
            // silently marks this unsatisfied with no diagnostic.
            satisfied = false;
        } else if let Some(max) = requirements.max {
            // Bounded: consume up to `max` operands, each checked against
            // its own position in the pattern.
            let mut ok = true;
            for k in 0..max {
                match tokens.get(idx + 1 + consumed) {
                    Some(next) if requirements.pattern_at(k).contains(next.kind) => {
                        consumed += 1;
                    }
                    Some(_) if k >= requirements.min => break,
                    Some(next) => {
                        bus.error(Diagnostic::new(
                            next.file.clone(),
                            next.position.line,
                            next.position.column,
                            next.lexeme.len(),
                            source.line(next.position.line),
                            format!(
                                "Expected {}, but found '{}' (with type {})",
                                requirements.pattern_at(k).describe(),
                                next.lexeme,
                                next.kind.describe()
                            ),
                        ));
                        ok = false;
                        break;
                    }
                    None => {
                        ok = false;
                        break;
                    }
                }
            }
            satisfied = ok;
        } else {
            // Unbounded: consume every successor that matches `pattern[0]`,
            // requiring at least one.
            while let Some(next) = tokens.get(idx + 1 + consumed) {
                if requirements.pattern_at(0).contains(next.kind) {
                    consumed += 1;
                } else {
                    break;
                }
            }
            satisfied = consumed >= requirements.min;
        }

        if satisfied && consumed > 0 {
            let operands: Vec<Token> = tokens.drain(idx + 1..idx + 1 + consumed).collect();
            tokens[idx].operands = operands;
        }

        if !satisfied {
            // Skip the next token too, to avoid double-reporting the same
            // malformed operand as its own top-level mismatch.
            idx += 2;
            continue;
        }

        if requirements.min == 0 && !requires_zero(kind) {
            let tok = &tokens[idx];
            bus.error(Diagnostic::new(
                tok.file.clone(),
                tok.position.line,
                tok.position.column,
                tok.lexeme.len(),
                source.line(tok.position.line),
                format!(
                    "Expected Label, Instruction, or Directive, but found '{}' (type {}) instead.",
                    tok.lexeme,
                    tok.kind.describe()
                ),
            ));
        }

        idx += 1;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::tokenizer::tokenize_file;

    fn bind(src: &str) -> (Vec<Token>, NotificationBus) {
        let source = SourceFile::from_string("t.asm".into(), src.into());
        let mut bus = NotificationBus::new(false);
        let tokens = tokenize_file(&source, &mut bus);
        let tokens = bind_operands(tokens, &source, &mut bus);
        (tokens, bus)
    }

    #[test]
    fn load_binds_its_label_operand() {
        let (tokens, bus) = bind("  .BEGIN\n  LOAD A\n  .END\n");
        assert_eq!(bus.error_count(), 0);
        let load = tokens.iter().find(|t| t.kind == TokenKind::Load).unwrap();
        assert_eq!(load.operands.len(), 1);
        assert_eq!(load.operands[0].lexeme, "A");
    }

    #[test]
    fn missing_operand_is_reported() {
        let (_, bus) = bind("  .BEGIN\n  LOAD\n  .END\n");
        assert!(bus.error_count() >= 1);
    }

    #[test]
    fn data_rejects_a_label_operand() {
        let (_, bus) = bind("  .BEGIN\nX .DATA Y\n  .END\n");
        assert_eq!(bus.error_count(), 1);
    }

    #[test]
    fn bare_decimal_at_top_level_is_rejected() {
        let (_, bus) = bind("  .BEGIN\n  42\n  .END\n");
        assert_eq!(bus.error_count(), 1);
    }

    #[test]
    fn halt_and_directives_need_no_operand_and_raise_nothing() {
        let (_, bus) = bind("  .BEGIN\n  HALT\n  .END\n");
        assert_eq!(bus.error_count(), 0);
    }
}
