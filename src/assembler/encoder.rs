//! C8: the encoder. A third, independent walk over the bound token list
//! (with a fresh program counter) that produces one [AssembledWord] per
//! emitting token plus its listing line.

use crate::assembler::symbol::SymbolTable;
use crate::diagnostics::{Diagnostic, NotificationBus};
use crate::token::{AssembledWord, Token, TokenKind};

/// Width (in characters) the listing's `<label_here>` column is padded
/// to. 30 matches the original's hardcoded listing width.
pub const LABEL_COLUMN_WIDTH: usize = 30;

pub fn encode(tokens: &[Token], symbols: &SymbolTable, bus: &mut NotificationBus) -> Vec<AssembledWord> {
    let mut pc: u16 = 0;
    let mut words = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Label => continue,
            TokenKind::End => break,
            TokenKind::Begin => {
                let label = label_here(symbols, pc);
                let listing = format!(
                    "({:04X}) {:04X} {:016b} ({:>4}) {:<width$} .BEGIN 0x{:04X}",
                    pc,
                    pc,
                    pc,
                    token.position.line,
                    label,
                    pc,
                    width = LABEL_COLUMN_WIDTH
                );
                words.push(AssembledWord { bin: pc, listing });
                pc += 1;
            }
            TokenKind::Data => {
                let value = token.operands.first().and_then(|o| o.value).unwrap_or(0);
                let bin = value as u16;
                let label = label_here(symbols, pc);
                let listing = format!(
                    "({:04X}) {:04X} {:016b} ({:>4}) {:<width$} .DATA {}",
                    pc,
                    bin,
                    bin,
                    token.position.line,
                    label,
                    bin,
                    width = LABEL_COLUMN_WIDTH
                );
                words.push(AssembledWord { bin, listing });
                pc += 1;
            }
            TokenKind::Halt => {
                let label = label_here(symbols, pc);
                let listing = format!(
                    "({:04X}) F000 1111000000000000 ({:>4}) {:<width$} HALT",
                    pc,
                    token.position.line,
                    label,
                    width = LABEL_COLUMN_WIDTH
                );
                words.push(AssembledWord { bin: 0xF000, listing });
                pc += 1;
            }
            kind if kind.is_label_instruction() => {
                let operand = &token.operands[0];
                let address = match symbols.get(&operand.lexeme) {
                    Some(symbol) => symbol.address,
                    None => {
                        bus.error(Diagnostic::new(
                            operand.file.clone(),
                            operand.position.line,
                            operand.position.column,
                            operand.lexeme.len(),
                            "",
                            format!("Undefined label: {}", operand.lexeme),
                        ));
                        0
                    }
                };
                let bin = ((kind.opcode().unwrap() as u16) << 12) | (address & 0xFFF);
                let label = label_here(symbols, pc);
                let listing = format!(
                    "({:04X}) {:04X} {:016b} ({:>4}) {:<width$} {} {}",
                    pc,
                    bin,
                    bin,
                    token.position.line,
                    label,
                    kind.mnemonic(),
                    operand.lexeme,
                    width = LABEL_COLUMN_WIDTH
                );
                words.push(AssembledWord { bin, listing });
                pc += 1;
            }
            TokenKind::None => {
                // Already diagnosed upstream; the driver won't write
                // output for a run that reached here with errors queued.
            }
            _ => unreachable!("every emitting kind is handled above"),
        }
    }

    words
}

fn label_here(symbols: &SymbolTable, address: u16) -> &str {
    symbols
        .first_at_address(address)
        .map(|s| s.name.as_str())
        .unwrap_or("")
}
