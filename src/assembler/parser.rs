//! C7: the parser / symbol builder. A second walk over the bound token
//! list that assigns addresses, builds the [SymbolTable], and enforces
//! program-structure rules (origin before code, one `.BEGIN`, one
//! definition per label, no two labels sharing an address).

use crate::assembler::symbol::{Symbol, SymbolTable};
use crate::diagnostics::{Diagnostic, NotificationBus};
use crate::token::{Token, TokenKind};

pub fn parse(tokens: &[Token], bus: &mut NotificationBus) -> SymbolTable {
    let mut pc: u16 = 0;
    let mut origin_seen = false;
    let mut end_seen = false;
    let mut symbols = SymbolTable::new();

    for token in tokens {
        match token.kind {
            TokenKind::Label => {
                if !origin_seen {
                    structural_before_begin(token, bus);
                    continue;
                }
                if end_seen {
                    bus.warning(plain(
                        token,
                        "Label found after .END directive, ignoring.",
                    ));
                    continue;
                }

                for existing in symbols.at_address(pc) {
                    let previous = existing.clone();
                    bus.error(plain(token, "Multiple labels found for address"));
                    bus.error(Diagnostic::new(
                        previous.file.clone(),
                        previous.line,
                        previous.column,
                        previous.name.len(),
                        "",
                        "Previous label found here",
                    ));
                }

                let symbol = Symbol {
                    name: token.lexeme.clone(),
                    address: pc,
                    file: token.file.clone(),
                    line: token.position.line,
                    column: token.position.column,
                };

                if let Some(previous) = symbols.get(&token.lexeme).cloned() {
                    bus.error(plain(token, "Multiple definitions of label"));
                    bus.error(Diagnostic::new(
                        previous.file.clone(),
                        previous.line,
                        previous.column,
                        previous.name.len(),
                        "",
                        "Previous definition found here",
                    ));
                } else {
                    symbols.try_insert(symbol);
                }
            }
            TokenKind::Begin => {
                if origin_seen {
                    bus.error(plain(token, ".BEGIN repeated."));
                } else {
                    origin_seen = true;
                    pc += token.kind.memory_required();
                }
            }
            TokenKind::End => {
                end_seen = true;
            }
            _ => {
                if !origin_seen {
                    structural_before_begin(token, bus);
                } else if end_seen {
                    bus.warning(plain(token, "Extra .END directive found."));
                } else {
                    pc += token.kind.memory_required();
                }
            }
        }
    }

    symbols
}

fn structural_before_begin(token: &Token, bus: &mut NotificationBus) {
    bus.error(plain(
        token,
        format!(
            "{} found before .BEGIN directive.",
            token.kind.describe()
        ),
    ));
}

fn plain(token: &Token, message: impl Into<String>) -> Diagnostic {
    Diagnostic::new(
        token.file.clone(),
        token.position.line,
        token.position.column,
        token.lexeme.len(),
        "",
        message,
    )
}
