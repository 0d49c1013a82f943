//! Bytecode definitions: opcodes, compare codes, the compiled program
//! form, and a disassembler.
//!
//! Instructions are stored as a flat `Vec<i64>` with opcodes and inline
//! operands interleaved; an instruction's length (one or two words) is
//! implied by its opcode. Jump operands are absolute offsets into the code
//! array, except `JUMP_FORWARD`, whose operand is a displacement added to
//! the instruction pointer after the operand word has been consumed.
//!
//! The opcode numbers follow classic CPython, which is where the print
//! opcodes and their softspace behavior come from.

use std::fmt::{self, Write as _};

use slate_core::Value;

// =============================================================================
// Opcodes
// =============================================================================

/// Bytecode operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Negate the top of stack in place.
    UnaryNegative = 11,
    /// Pop right, pop left, push `left * right`.
    BinaryMultiply = 20,
    /// Pop right, pop left, push `left / right` (true division).
    BinaryDivide = 21,
    /// Pop right, pop left, push `left + right`.
    BinaryAdd = 23,
    /// Pop right, pop left, push `left - right`.
    BinarySubtract = 24,
    /// Pop a value and write it to the output, space-separated from a
    /// preceding item on the same line.
    PrintItem = 71,
    /// Terminate the current output line.
    PrintNewline = 72,
    /// Pop a value and store it in the slot named by the operand.
    StoreName = 90,
    /// Push the constant selected by the operand.
    LoadConst = 100,
    /// Push the value in the slot named by the operand.
    LoadName = 101,
    /// Pop right, pop left, push the boolean result of the comparison
    /// selected by the operand.
    CompareOp = 106,
    /// Add the operand to the instruction pointer (relative jump).
    JumpForward = 110,
    /// Pop a value; if falsy, set the instruction pointer to the operand.
    PopJumpIfFalse = 111,
    /// Set the instruction pointer to the operand.
    JumpAbsolute = 113,
}

impl Opcode {
    /// Decode an opcode from its wire value.
    #[must_use]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            11 => Some(Opcode::UnaryNegative),
            20 => Some(Opcode::BinaryMultiply),
            21 => Some(Opcode::BinaryDivide),
            23 => Some(Opcode::BinaryAdd),
            24 => Some(Opcode::BinarySubtract),
            71 => Some(Opcode::PrintItem),
            72 => Some(Opcode::PrintNewline),
            90 => Some(Opcode::StoreName),
            100 => Some(Opcode::LoadConst),
            101 => Some(Opcode::LoadName),
            106 => Some(Opcode::CompareOp),
            110 => Some(Opcode::JumpForward),
            111 => Some(Opcode::PopJumpIfFalse),
            113 => Some(Opcode::JumpAbsolute),
            _ => None,
        }
    }

    /// The wire value of this opcode.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self as i64
    }

    /// Whether the opcode is followed by one inline operand word.
    #[must_use]
    pub const fn has_operand(self) -> bool {
        matches!(
            self,
            Opcode::StoreName
                | Opcode::LoadConst
                | Opcode::LoadName
                | Opcode::CompareOp
                | Opcode::JumpForward
                | Opcode::PopJumpIfFalse
                | Opcode::JumpAbsolute
        )
    }

    /// The conventional assembler name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Opcode::UnaryNegative => "UNARY_NEGATIVE",
            Opcode::BinaryMultiply => "BINARY_MULTIPLY",
            Opcode::BinaryDivide => "BINARY_DIVIDE",
            Opcode::BinaryAdd => "BINARY_ADD",
            Opcode::BinarySubtract => "BINARY_SUBTRACT",
            Opcode::PrintItem => "PRINT_ITEM",
            Opcode::PrintNewline => "PRINT_NEWLINE",
            Opcode::StoreName => "STORE_NAME",
            Opcode::LoadConst => "LOAD_CONST",
            Opcode::LoadName => "LOAD_NAME",
            Opcode::CompareOp => "COMPARE_OP",
            Opcode::JumpForward => "JUMP_FORWARD",
            Opcode::PopJumpIfFalse => "POP_JUMP_IF_FALSE",
            Opcode::JumpAbsolute => "JUMP_ABSOLUTE",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Compare codes
// =============================================================================

/// Comparison selectors carried inline by `COMPARE_OP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CompareOp {
    /// `<`
    Lt = 0,
    /// `<=`
    Le = 1,
    /// `==`
    Eq = 2,
    /// `!=`
    Ne = 3,
    /// `>`
    Gt = 4,
    /// `>=`
    Ge = 5,
}

impl CompareOp {
    /// Decode a compare code from its wire value.
    #[must_use]
    pub const fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(CompareOp::Lt),
            1 => Some(CompareOp::Le),
            2 => Some(CompareOp::Eq),
            3 => Some(CompareOp::Ne),
            4 => Some(CompareOp::Gt),
            5 => Some(CompareOp::Ge),
            _ => None,
        }
    }

    /// The wire value of this compare code.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self as i64
    }

    /// The source-level operator symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// =============================================================================
// Code objects
// =============================================================================

/// A compiled program: flat code plus its two side tables.
#[derive(Debug, Clone)]
pub struct CodeObject {
    /// Opcodes and inline operands, interleaved.
    pub code: Vec<i64>,
    /// Identifier table; operands of `STORE_NAME`/`LOAD_NAME` index it.
    pub names: Vec<String>,
    /// Constant pool, deduplicated by value; operands of `LOAD_CONST`
    /// index it.
    pub consts: Vec<Value>,
}

// =============================================================================
// Disassembly
// =============================================================================

/// Render a code object as one instruction per line: offset, opcode name,
/// raw operand, and a resolved annotation where one exists.
#[must_use]
pub fn disassemble(code: &CodeObject) -> String {
    let mut out = String::new();
    let mut ip = 0;
    while ip < code.code.len() {
        let word = code.code[ip];
        let Some(op) = Opcode::from_i64(word) else {
            let _ = writeln!(out, "{ip:>4} <invalid opcode {word}>");
            ip += 1;
            continue;
        };
        if op.has_operand() {
            let Some(&operand) = code.code.get(ip + 1) else {
                let _ = writeln!(out, "{ip:>4} {:<18} <missing operand>", op.name());
                break;
            };
            let note = annotate(code, op, operand, ip);
            let _ = writeln!(out, "{ip:>4} {:<18} {operand:>4}{note}", op.name());
            ip += 2;
        } else {
            let _ = writeln!(out, "{ip:>4} {}", op.name());
            ip += 1;
        }
    }
    out
}

/// Resolve an operand against the tables it indexes.
fn annotate(code: &CodeObject, op: Opcode, operand: i64, ip: usize) -> String {
    #[allow(clippy::cast_sign_loss)]
    let index = operand.max(0) as usize;
    match op {
        Opcode::LoadConst => match code.consts.get(index) {
            Some(Value::Str(s)) => format!(" ('{s}')"),
            Some(value) => format!(" ({value})"),
            None => " (?)".to_string(),
        },
        Opcode::StoreName | Opcode::LoadName => match code.names.get(index) {
            Some(name) => format!(" ({name})"),
            None => " (?)".to_string(),
        },
        Opcode::CompareOp => match CompareOp::from_i64(operand) {
            Some(cmp) => format!(" ({cmp})"),
            None => " (?)".to_string(),
        },
        Opcode::PopJumpIfFalse | Opcode::JumpAbsolute => format!(" (to {operand})"),
        Opcode::JumpForward => {
            let target = ip as i64 + 2 + operand;
            format!(" (to {target})")
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_round_trip() {
        let all = [
            Opcode::UnaryNegative,
            Opcode::BinaryMultiply,
            Opcode::BinaryDivide,
            Opcode::BinaryAdd,
            Opcode::BinarySubtract,
            Opcode::PrintItem,
            Opcode::PrintNewline,
            Opcode::StoreName,
            Opcode::LoadConst,
            Opcode::LoadName,
            Opcode::CompareOp,
            Opcode::JumpForward,
            Opcode::PopJumpIfFalse,
            Opcode::JumpAbsolute,
        ];
        for op in all {
            assert_eq!(Opcode::from_i64(op.as_i64()), Some(op));
        }
    }

    #[test]
    fn test_wire_numbering() {
        assert_eq!(Opcode::UnaryNegative.as_i64(), 11);
        assert_eq!(Opcode::BinaryAdd.as_i64(), 23);
        assert_eq!(Opcode::PrintItem.as_i64(), 71);
        assert_eq!(Opcode::StoreName.as_i64(), 90);
        assert_eq!(Opcode::LoadConst.as_i64(), 100);
        assert_eq!(Opcode::CompareOp.as_i64(), 106);
        assert_eq!(Opcode::JumpAbsolute.as_i64(), 113);
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(Opcode::from_i64(0), None);
        assert_eq!(Opcode::from_i64(99), None);
        assert_eq!(Opcode::from_i64(-1), None);
    }

    #[test]
    fn test_operand_arity() {
        assert!(Opcode::LoadConst.has_operand());
        assert!(Opcode::PopJumpIfFalse.has_operand());
        assert!(!Opcode::BinaryAdd.has_operand());
        assert!(!Opcode::PrintNewline.has_operand());
    }

    #[test]
    fn test_compare_codes() {
        assert_eq!(CompareOp::from_i64(0), Some(CompareOp::Lt));
        assert_eq!(CompareOp::from_i64(5), Some(CompareOp::Ge));
        assert_eq!(CompareOp::from_i64(6), None);
        assert_eq!(CompareOp::Eq.symbol(), "==");
    }

    #[test]
    fn test_disassemble_resolves_operands() {
        let code = CodeObject {
            code: vec![100, 0, 90, 0, 101, 0, 71, 72],
            names: vec!["x".to_string()],
            consts: vec![Value::Int(5)],
        };
        let listing = disassemble(&code);
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "   0 LOAD_CONST            0 (5)");
        assert_eq!(lines[1], "   2 STORE_NAME            0 (x)");
        assert_eq!(lines[2], "   4 LOAD_NAME             0 (x)");
        assert_eq!(lines[3], "   6 PRINT_ITEM");
        assert_eq!(lines[4], "   7 PRINT_NEWLINE");
    }

    #[test]
    fn test_disassemble_jump_targets() {
        let code = CodeObject {
            code: vec![110, 4],
            names: Vec::new(),
            consts: vec![],
        };
        let listing = disassemble(&code);
        assert_eq!(listing.lines().next(), Some("   0 JUMP_FORWARD          4 (to 6)"));
    }

    #[test]
    fn test_disassemble_invalid_word() {
        let code = CodeObject {
            code: vec![99],
            names: Vec::new(),
            consts: vec![],
        };
        assert_eq!(disassemble(&code), "   0 <invalid opcode 99>\n");
    }
}
