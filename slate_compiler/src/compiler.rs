//! Single-pass recursive-descent compiler: token stream to bytecode.
//!
//! There is no syntax tree. Each grammar production is a method that
//! consumes tokens and emits instructions as it goes; forward jumps emit a
//! placeholder operand word and patch it once the target offset is known.
//!
//! Two side tables are built during the pass: `names` registers each
//! assignment target once, and `consts` pools literals deduplicated by
//! value. Unary signs on numeric literals fold into the constant before
//! pooling, so `-5` and `5` occupy different slots while two `-5`s share
//! one.

use rustc_hash::FxHashMap;
use slate_core::{ParseError, Value};
use slate_lexer::{Token, TokenKind};

use crate::bytecode::{CodeObject, CompareOp, Opcode};

/// Result type for compilation.
pub type CompileResult<T> = Result<T, ParseError>;

/// Hashable identity of a constant. Keeps numeric categories apart, so an
/// int 5 and a float 5.0 pool separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ConstKey {
    None,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(String),
}

impl ConstKey {
    fn of(value: &Value) -> Self {
        match value {
            Value::None => ConstKey::None,
            Value::Bool(b) => ConstKey::Bool(*b),
            Value::Int(i) => ConstKey::Int(*i),
            Value::Float(x) => ConstKey::Float(x.to_bits()),
            Value::Str(s) => ConstKey::Str(s.to_string()),
        }
    }
}

/// The bytecode compiler.
///
/// One compiler instance compiles one token stream. For a fresh program
/// use [`Compiler::new`]; a REPL session seeds each input with the tables
/// of the previous one via [`Compiler::with_tables`] so name and constant
/// indices stay stable across inputs.
#[derive(Debug)]
pub struct Compiler<'a> {
    tokens: &'a [Token],
    index: usize,
    code: Vec<i64>,
    names: Vec<String>,
    name_map: FxHashMap<String, usize>,
    consts: Vec<Value>,
    const_map: FxHashMap<ConstKey, usize>,
}

impl<'a> Compiler<'a> {
    /// Create a compiler with empty tables.
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        Self::with_tables(tokens, Vec::new(), Vec::new())
    }

    /// Create a compiler seeded with existing name and constant tables.
    /// New registrations append after the seeded entries.
    #[must_use]
    pub fn with_tables(tokens: &'a [Token], names: Vec<String>, consts: Vec<Value>) -> Self {
        let name_map = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();
        let const_map = consts
            .iter()
            .enumerate()
            .map(|(index, value)| (ConstKey::of(value), index))
            .collect();
        Self {
            tokens,
            index: 0,
            code: Vec::new(),
            names,
            name_map,
            consts,
            const_map,
        }
    }

    /// Compile the whole token stream: `program := (stmt)* EOF`.
    pub fn compile(mut self) -> CompileResult<CodeObject> {
        while !self.check(TokenKind::Eof) {
            self.compile_statement()?;
        }
        self.expect(TokenKind::Eof)?;
        Ok(CodeObject {
            code: self.code,
            names: self.names,
            consts: self.consts,
        })
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn compile_statement(&mut self) -> CompileResult<()> {
        let kind = self.current()?.kind;
        match kind {
            TokenKind::If => self.compile_if(),
            TokenKind::While => self.compile_while(),
            _ => {
                self.compile_simple_statement()?;
                self.expect(TokenKind::Newline)
            }
        }
    }

    fn compile_simple_statement(&mut self) -> CompileResult<()> {
        let token = self.current()?;
        match token.kind {
            TokenKind::Ident => self.compile_assignment(),
            TokenKind::Print => self.compile_print(),
            TokenKind::Pass => {
                self.advance();
                Ok(())
            }
            kind => Err(ParseError::unexpected_token(
                "a statement",
                kind.name(),
                token.line,
                token.column,
            )),
        }
    }

    /// `assignment := NAME '=' relexpr`. The target is registered only
    /// after the right-hand side compiles, so `x = x` on a fresh `x` is an
    /// undefined-name error rather than a self-reference.
    fn compile_assignment(&mut self) -> CompileResult<()> {
        let target = self.current()?;
        self.advance();
        self.expect(TokenKind::Equal)?;
        self.compile_comparison()?;
        let index = self.register_name(&target.lexeme);
        self.emit_operand(Opcode::StoreName, index as i64);
        Ok(())
    }

    /// `printstmt := 'print' '(' [relexpr (',' relexpr)* [',']] ')'`.
    /// Every argument is followed immediately by its PRINT_ITEM, so items
    /// print left to right.
    fn compile_print(&mut self) -> CompileResult<()> {
        self.advance();
        self.expect(TokenKind::LeftParen)?;
        if !self.check(TokenKind::RightParen) {
            loop {
                self.compile_comparison()?;
                self.emit(Opcode::PrintItem);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
                if self.check(TokenKind::RightParen) {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen)?;
        self.emit(Opcode::PrintNewline);
        Ok(())
    }

    /// `ifstmt := 'if' relexpr ':' block ['else' ':' block]`.
    ///
    /// The conditional jump over the then-block is absolute. The jump
    /// over the else-block is JUMP_FORWARD, whose operand is relative to
    /// the position after the operand word, which is exactly where the
    /// else-block starts.
    fn compile_if(&mut self) -> CompileResult<()> {
        self.advance();
        self.compile_comparison()?;
        self.expect(TokenKind::Colon)?;
        self.emit(Opcode::PopJumpIfFalse);
        let else_fixup = self.reserve_word();
        self.compile_block()?;
        if self.match_token(TokenKind::Else) {
            self.expect(TokenKind::Colon)?;
            self.emit(Opcode::JumpForward);
            let end_fixup = self.reserve_word();
            let else_start = self.code.len();
            self.patch(else_fixup, else_start as i64);
            self.compile_block()?;
            self.patch(end_fixup, (self.code.len() - else_start) as i64);
        } else {
            self.patch(else_fixup, self.code.len() as i64);
        }
        Ok(())
    }

    /// `whilestmt := 'while' relexpr ':' block`. The loop condition is
    /// re-evaluated via an absolute jump back to its first instruction.
    fn compile_while(&mut self) -> CompileResult<()> {
        self.advance();
        let loop_start = self.code.len();
        self.compile_comparison()?;
        self.expect(TokenKind::Colon)?;
        self.emit(Opcode::PopJumpIfFalse);
        let exit_fixup = self.reserve_word();
        self.compile_block()?;
        self.emit_operand(Opcode::JumpAbsolute, loop_start as i64);
        self.patch(exit_fixup, self.code.len() as i64);
        Ok(())
    }

    /// `block := NEWLINE INDENT stmt+ DEDENT`. A block must contain at
    /// least one statement.
    fn compile_block(&mut self) -> CompileResult<()> {
        self.expect(TokenKind::Newline)?;
        self.expect(TokenKind::Indent)?;
        self.compile_statement()?;
        while !self.check(TokenKind::Dedent) && !self.check(TokenKind::Eof) {
            self.compile_statement()?;
        }
        self.expect(TokenKind::Dedent)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// `relexpr := expr [relop expr]`. At most one relational operator;
    /// a second one at the same level is rejected outright.
    fn compile_comparison(&mut self) -> CompileResult<()> {
        self.compile_expression(1)?;
        let Some(op) = self.current_compare() else {
            return Ok(());
        };
        self.advance();
        self.compile_expression(1)?;
        self.emit_operand(Opcode::CompareOp, op.as_i64());
        if self.current_compare().is_some() {
            let token = self.current()?;
            return Err(ParseError::chained_comparison(token.line, token.column));
        }
        Ok(())
    }

    /// `expr := term (('+'|'-') term)*`. Subtraction is compiled as
    /// addition of a right term carrying a negative sign, so only
    /// BINARY_ADD is ever emitted here.
    fn compile_expression(&mut self, sign: i64) -> CompileResult<()> {
        self.compile_term(sign)?;
        loop {
            if self.match_token(TokenKind::Plus) {
                self.compile_term(1)?;
                self.emit(Opcode::BinaryAdd);
            } else if self.match_token(TokenKind::Minus) {
                self.compile_term(-1)?;
                self.emit(Opcode::BinaryAdd);
            } else {
                break;
            }
        }
        Ok(())
    }

    /// `term := factor ('*' factor)*`. The sign binds to the first factor
    /// only: `-2 * 3` is `(-2) * 3`.
    fn compile_term(&mut self, sign: i64) -> CompileResult<()> {
        self.compile_factor(sign)?;
        while self.match_token(TokenKind::Star) {
            self.compile_factor(1)?;
            self.emit(Opcode::BinaryMultiply);
        }
        Ok(())
    }

    /// `factor := ('+'|'-') factor | NUMBER | NAME | '(' relexpr ')' |
    /// TRUE | FALSE | NONE | STRING`.
    ///
    /// The accumulated sign folds into numeric literals at compile time;
    /// everything else loads normally and negates at runtime.
    fn compile_factor(&mut self, sign: i64) -> CompileResult<()> {
        let token = self.current()?;
        match token.kind {
            TokenKind::Plus => {
                self.advance();
                self.compile_factor(sign)
            }
            TokenKind::Minus => {
                self.advance();
                self.compile_factor(-sign)
            }
            TokenKind::Int => {
                self.advance();
                self.load_const(fold_int(&token.lexeme, sign));
                Ok(())
            }
            TokenKind::Float => {
                self.advance();
                let magnitude: f64 = token.lexeme.parse().unwrap_or_default();
                self.load_const(Value::Float(sign as f64 * magnitude));
                Ok(())
            }
            TokenKind::Str => {
                self.advance();
                self.load_const(Value::str(&token.lexeme));
                self.negate_if(sign);
                Ok(())
            }
            TokenKind::True => {
                self.advance();
                self.load_const(Value::Bool(true));
                self.negate_if(sign);
                Ok(())
            }
            TokenKind::False => {
                self.advance();
                self.load_const(Value::Bool(false));
                self.negate_if(sign);
                Ok(())
            }
            TokenKind::None => {
                self.advance();
                self.load_const(Value::None);
                self.negate_if(sign);
                Ok(())
            }
            TokenKind::Ident => {
                self.advance();
                let Some(&index) = self.name_map.get(&token.lexeme) else {
                    return Err(ParseError::undefined_name(
                        &token.lexeme,
                        token.line,
                        token.column,
                    ));
                };
                self.emit_operand(Opcode::LoadName, index as i64);
                self.negate_if(sign);
                Ok(())
            }
            TokenKind::LeftParen => {
                self.advance();
                self.compile_comparison()?;
                self.expect(TokenKind::RightParen)?;
                self.negate_if(sign);
                Ok(())
            }
            kind => Err(ParseError::unexpected_token(
                "an expression",
                kind.name(),
                token.line,
                token.column,
            )),
        }
    }

    // =========================================================================
    // Tables and emission
    // =========================================================================

    /// Index of `name`, registering it on first use as a target.
    fn register_name(&mut self, name: &str) -> usize {
        if let Some(&index) = self.name_map.get(name) {
            return index;
        }
        let index = self.names.len();
        self.names.push(name.to_string());
        self.name_map.insert(name.to_string(), index);
        index
    }

    /// Index of `value` in the constant pool, appending on first sight.
    fn register_const(&mut self, value: Value) -> usize {
        let key = ConstKey::of(&value);
        if let Some(&index) = self.const_map.get(&key) {
            return index;
        }
        let index = self.consts.len();
        self.const_map.insert(key, index);
        self.consts.push(value);
        index
    }

    fn load_const(&mut self, value: Value) {
        let index = self.register_const(value);
        self.emit_operand(Opcode::LoadConst, index as i64);
    }

    fn negate_if(&mut self, sign: i64) {
        if sign < 0 {
            self.emit(Opcode::UnaryNegative);
        }
    }

    fn emit(&mut self, op: Opcode) {
        self.code.push(op.as_i64());
    }

    fn emit_operand(&mut self, op: Opcode, operand: i64) {
        self.code.push(op.as_i64());
        self.code.push(operand);
    }

    /// Append a placeholder operand word and return its offset for a
    /// later [`Self::patch`].
    fn reserve_word(&mut self) -> usize {
        let at = self.code.len();
        self.code.push(0);
        at
    }

    fn patch(&mut self, at: usize, value: i64) {
        self.code[at] = value;
    }

    // =========================================================================
    // Token access
    // =========================================================================

    fn current(&self) -> CompileResult<&'a Token> {
        self.tokens.get(self.index).ok_or_else(|| {
            let (line, column) = self.end_position();
            ParseError::unexpected_end_of_input(line, column)
        })
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.tokens
            .get(self.index)
            .is_some_and(|token| token.kind == kind)
    }

    /// Consume the current token if it matches.
    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require and consume a token of the given kind.
    fn expect(&mut self, kind: TokenKind) -> CompileResult<()> {
        let token = self.current()?;
        if token.kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected_token(
                kind.name(),
                token.kind.name(),
                token.line,
                token.column,
            ))
        }
    }

    fn current_compare(&self) -> Option<CompareOp> {
        compare_for(self.tokens.get(self.index)?.kind)
    }

    fn end_position(&self) -> (u32, u32) {
        self.tokens.last().map_or((1, 1), |t| (t.line, t.column))
    }
}

/// The compare code for a relational token, if it is one.
const fn compare_for(kind: TokenKind) -> Option<CompareOp> {
    match kind {
        TokenKind::Less => Some(CompareOp::Lt),
        TokenKind::LessEqual => Some(CompareOp::Le),
        TokenKind::EqualEqual => Some(CompareOp::Eq),
        TokenKind::NotEqual => Some(CompareOp::Ne),
        TokenKind::Greater => Some(CompareOp::Gt),
        TokenKind::GreaterEqual => Some(CompareOp::Ge),
        _ => None,
    }
}

/// Fold a sign into an unsigned integer lexeme. Magnitudes beyond `i64`
/// fall back to a float constant.
fn fold_int(lexeme: &str, sign: i64) -> Value {
    match lexeme.parse::<i64>() {
        Ok(magnitude) => Value::Int(sign * magnitude),
        Err(_) => Value::Float(sign as f64 * lexeme.parse::<f64>().unwrap_or_default()),
    }
}

/// Compile a token stream in one call.
pub fn compile(tokens: &[Token]) -> CompileResult<CodeObject> {
    Compiler::new(tokens).compile()
}
