//! Recursive-descent parser lowering QASM source to a [`Circuit`].

use std::collections::HashMap;
use std::f64::consts::PI;
use std::ops::Range;

use rimfax_ir::{Circuit, ClbitId, QubitId, StandardGate};

use crate::ast::{Operand, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{tokenize, Token};

/// Parse QASM source into a circuit named `"main"`.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let statements = parse_statements(source)?;
    lower(&statements)
}

/// Parse QASM source into its statement stream without lowering.
pub fn parse_statements(source: &str) -> ParseResult<Vec<Statement>> {
    let tokens = tokenize(source).map_err(ParseError::InvalidCharacter)?;
    Parser::new(tokens).program()
}

struct Parser {
    tokens: Vec<(Token, Range<usize>)>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<(Token, Range<usize>)>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn at(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(usize::MAX, |(_, span)| span.start)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, want: &Token, what: &str) -> ParseResult<()> {
        match self.advance() {
            Some(ref token) if token == want => Ok(()),
            Some(_) => Err(ParseError::UnexpectedToken {
                at: self.tokens[self.pos - 1].1.start,
                expected: what.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof(what.to_string())),
        }
    }

    fn expect_identifier(&mut self, what: &str) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(_) => Err(ParseError::UnexpectedToken {
                at: self.tokens[self.pos - 1].1.start,
                expected: what.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof(what.to_string())),
        }
    }

    fn program(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        while self.peek().is_some() {
            statements.push(self.statement()?);
        }
        Ok(statements)
    }

    fn statement(&mut self) -> ParseResult<Statement> {
        match self.peek() {
            Some(Token::OpenQasm) => self.version(),
            Some(Token::Include) => self.include(),
            Some(Token::Qubit) => self.register_decl(true),
            Some(Token::Bit) => self.register_decl(false),
            Some(Token::Reset) => self.reset(),
            Some(Token::Barrier) => self.barrier(),
            Some(Token::Identifier(_)) => self.gate_or_measure(),
            Some(_) => Err(ParseError::UnexpectedToken {
                at: self.at(),
                expected: "statement".to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("statement".to_string())),
        }
    }

    fn version(&mut self) -> ParseResult<Statement> {
        self.expect(&Token::OpenQasm, "OPENQASM")?;
        let version = match self.advance() {
            Some(Token::FloatLit(v)) => format!("{v}"),
            Some(Token::IntLit(v)) => format!("{v}"),
            _ => {
                return Err(ParseError::UnexpectedToken {
                    at: self.at(),
                    expected: "version number".to_string(),
                });
            }
        };
        if !version.starts_with('3') {
            return Err(ParseError::UnsupportedVersion(version));
        }
        self.expect(&Token::Semicolon, "';'")?;
        Ok(Statement::Version(version))
    }

    fn include(&mut self) -> ParseResult<Statement> {
        self.expect(&Token::Include, "include")?;
        let path = match self.advance() {
            Some(Token::StringLit(path)) => path,
            _ => {
                return Err(ParseError::UnexpectedToken {
                    at: self.at(),
                    expected: "include path string".to_string(),
                });
            }
        };
        self.expect(&Token::Semicolon, "';'")?;
        Ok(Statement::Include(path))
    }

    fn register_decl(&mut self, quantum: bool) -> ParseResult<Statement> {
        self.advance(); // qubit | bit
        self.expect(&Token::LBracket, "'['")?;
        let size = self.int_lit()?;
        self.expect(&Token::RBracket, "']'")?;
        let name = self.expect_identifier("register name")?;
        self.expect(&Token::Semicolon, "';'")?;
        Ok(if quantum {
            Statement::QubitDecl { name, size }
        } else {
            Statement::BitDecl { name, size }
        })
    }

    fn reset(&mut self) -> ParseResult<Statement> {
        self.expect(&Token::Reset, "reset")?;
        let operand = self.operand()?;
        self.expect(&Token::Semicolon, "';'")?;
        Ok(Statement::Reset(operand))
    }

    fn barrier(&mut self) -> ParseResult<Statement> {
        self.expect(&Token::Barrier, "barrier")?;
        let mut operands = vec![self.operand()?];
        while self.peek() == Some(&Token::Comma) {
            self.advance();
            operands.push(self.operand()?);
        }
        self.expect(&Token::Semicolon, "';'")?;
        Ok(Statement::Barrier(operands))
    }

    /// Either `dst = measure src;` or `gate(params) operands;` — both begin
    /// with an identifier.
    fn gate_or_measure(&mut self) -> ParseResult<Statement> {
        let name = self.expect_identifier("gate name or measure target")?;

        // Measure assignment form: `dst = measure src;`
        let dst_index = if self.peek() == Some(&Token::LBracket) {
            self.advance();
            let index = self.int_lit()?;
            self.expect(&Token::RBracket, "']'")?;
            Some(index)
        } else {
            None
        };

        if self.peek() == Some(&Token::Equals) {
            self.advance();
            self.expect(&Token::Measure, "measure")?;
            let src = self.operand()?;
            self.expect(&Token::Semicolon, "';'")?;
            let dst = Operand {
                register: name,
                index: dst_index,
            };
            return Ok(Statement::Measure { src, dst });
        }

        if dst_index.is_some() {
            return Err(ParseError::UnexpectedToken {
                at: self.at(),
                expected: "'=' after indexed classical operand".to_string(),
            });
        }

        // Gate application form.
        let mut params = Vec::new();
        if self.peek() == Some(&Token::LParen) {
            self.advance();
            params.push(self.expr()?);
            while self.peek() == Some(&Token::Comma) {
                self.advance();
                params.push(self.expr()?);
            }
            self.expect(&Token::RParen, "')'")?;
        }

        let mut operands = vec![self.operand()?];
        while self.peek() == Some(&Token::Comma) {
            self.advance();
            operands.push(self.operand()?);
        }
        self.expect(&Token::Semicolon, "';'")?;

        Ok(Statement::Gate {
            name,
            params,
            operands,
        })
    }

    fn operand(&mut self) -> ParseResult<Operand> {
        let register = self.expect_identifier("register reference")?;
        if self.peek() == Some(&Token::LBracket) {
            self.advance();
            let index = self.int_lit()?;
            self.expect(&Token::RBracket, "']'")?;
            Ok(Operand::indexed(register, index))
        } else {
            Ok(Operand::register(register))
        }
    }

    fn int_lit(&mut self) -> ParseResult<u32> {
        match self.advance() {
            Some(Token::IntLit(v)) => Ok(v as u32),
            Some(_) => Err(ParseError::UnexpectedToken {
                at: self.tokens[self.pos - 1].1.start,
                expected: "integer".to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("integer".to_string())),
        }
    }

    // Constant angle expressions, folded during the parse.

    fn expr(&mut self) -> ParseResult<f64> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.advance();
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.advance();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> ParseResult<f64> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.advance();
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.advance();
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(ParseError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> ParseResult<f64> {
        match self.peek() {
            Some(Token::Minus) => {
                self.advance();
                Ok(-self.unary()?)
            }
            Some(Token::Pi) => {
                self.advance();
                Ok(PI)
            }
            Some(Token::FloatLit(_)) => {
                if let Some(Token::FloatLit(v)) = self.advance() {
                    Ok(v)
                } else {
                    unreachable!()
                }
            }
            Some(Token::IntLit(_)) => {
                if let Some(Token::IntLit(v)) = self.advance() {
                    Ok(v as f64)
                } else {
                    unreachable!()
                }
            }
            Some(Token::LParen) => {
                self.advance();
                let value = self.expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(value)
            }
            _ => Err(ParseError::UnexpectedToken {
                at: self.at(),
                expected: "angle expression".to_string(),
            }),
        }
    }
}

// =============================================================================
// Lowering
// =============================================================================

struct Registers {
    qregs: HashMap<String, Vec<QubitId>>,
    cregs: HashMap<String, Vec<ClbitId>>,
}

impl Registers {
    fn qubits(&self, operand: &Operand) -> ParseResult<Vec<QubitId>> {
        let reg = self
            .qregs
            .get(&operand.register)
            .ok_or_else(|| ParseError::UnknownRegister(operand.register.clone()))?;
        match operand.index {
            Some(i) => {
                let id = *reg
                    .get(i as usize)
                    .ok_or_else(|| ParseError::IndexOutOfRange {
                        register: operand.register.clone(),
                        index: i,
                        size: reg.len() as u32,
                    })?;
                Ok(vec![id])
            }
            None => Ok(reg.clone()),
        }
    }

    fn clbits(&self, operand: &Operand) -> ParseResult<Vec<ClbitId>> {
        let reg = self
            .cregs
            .get(&operand.register)
            .ok_or_else(|| ParseError::UnknownRegister(operand.register.clone()))?;
        match operand.index {
            Some(i) => {
                let id = *reg
                    .get(i as usize)
                    .ok_or_else(|| ParseError::IndexOutOfRange {
                        register: operand.register.clone(),
                        index: i,
                        size: reg.len() as u32,
                    })?;
                Ok(vec![id])
            }
            None => Ok(reg.clone()),
        }
    }
}

fn lower(statements: &[Statement]) -> ParseResult<Circuit> {
    let mut circuit = Circuit::new("main");
    let mut registers = Registers {
        qregs: HashMap::new(),
        cregs: HashMap::new(),
    };

    for statement in statements {
        match statement {
            Statement::Version(_) | Statement::Include(_) => {}

            Statement::QubitDecl { name, size } => {
                if registers.qregs.contains_key(name) {
                    return Err(ParseError::DuplicateRegister(name.clone()));
                }
                let ids = circuit.add_qreg(name.clone(), *size);
                registers.qregs.insert(name.clone(), ids);
            }

            Statement::BitDecl { name, size } => {
                if registers.cregs.contains_key(name) {
                    return Err(ParseError::DuplicateRegister(name.clone()));
                }
                let ids = circuit.add_creg(name.clone(), *size);
                registers.cregs.insert(name.clone(), ids);
            }

            Statement::Gate {
                name,
                params,
                operands,
            } => {
                let arity = StandardGate::arity_of(name)
                    .ok_or_else(|| ParseError::UnknownGate(name.clone()))?;
                let expected_params =
                    StandardGate::param_count_of(name).unwrap_or(0);
                if params.len() != expected_params as usize {
                    return Err(ParseError::WrongParamCount {
                        gate: name.clone(),
                        expected: expected_params,
                        got: params.len(),
                    });
                }

                if arity == 1 && operands.len() == 1 && operands[0].index.is_none() {
                    // Single-qubit broadcast over a whole register.
                    let gate = StandardGate::from_name(name, params)
                        .ok_or_else(|| ParseError::UnknownGate(name.clone()))?;
                    for qubit in registers.qubits(&operands[0])? {
                        circuit.push_gate(gate.clone(), [qubit])?;
                    }
                    continue;
                }

                if operands.len() != arity as usize {
                    return Err(ParseError::WrongArity {
                        gate: name.clone(),
                        expected: arity,
                        got: operands.len(),
                    });
                }
                let mut qubits = Vec::with_capacity(operands.len());
                for operand in operands {
                    if operand.index.is_none() {
                        return Err(ParseError::UnsupportedBroadcast(name.clone()));
                    }
                    qubits.push(registers.qubits(operand)?[0]);
                }
                let gate = StandardGate::from_name(name, params)
                    .ok_or_else(|| ParseError::UnknownGate(name.clone()))?;
                circuit.push_gate(gate, qubits)?;
            }

            Statement::Measure { src, dst } => {
                let qubits = registers.qubits(src)?;
                let clbits = registers.clbits(dst)?;
                if qubits.len() != clbits.len() {
                    return Err(ParseError::MeasureSizeMismatch {
                        src: src.register.clone(),
                        src_size: qubits.len() as u32,
                        dst: dst.register.clone(),
                        dst_size: clbits.len() as u32,
                    });
                }
                for (qubit, clbit) in qubits.into_iter().zip(clbits) {
                    circuit.measure(qubit, clbit)?;
                }
            }

            Statement::Reset(operand) => {
                for qubit in registers.qubits(operand)? {
                    circuit.reset(qubit)?;
                }
            }

            Statement::Barrier(operands) => {
                let mut qubits = Vec::new();
                for operand in operands {
                    qubits.extend(registers.qubits(operand)?);
                }
                circuit.barrier(qubits)?;
            }
        }
    }

    Ok(circuit)
}
