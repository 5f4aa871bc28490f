//! The lexeme catalog and the one-pass scanner that produces it
//! (spec.md §2.4, §4.1).

use crate::error::WispError;
use crate::limits::Limits;
use smallvec::SmallVec;
use smartstring::alias::String as SmartStr;
use std::fmt;

/// A location in the input command.
///
/// Modeled on `rhai::token::Position`: 16-bit line/column fields and a
/// `NONE` sentinel, kept small enough to pass around by value everywhere a
/// token, AST node, or error carries one. Since spec.md restricts a command
/// to one logical line, `line` is always `1` once a position is set; `pos`
/// is the 1-based byte offset into that line.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    line: u16,
    pos: u16,
}

impl Position {
    /// No position information.
    pub const NONE: Self = Self { line: 0, pos: 0 };

    #[must_use]
    pub const fn new(line: u16, pos: u16) -> Self {
        Self { line, pos }
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.line == 0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("none")
        } else {
            write!(f, "line {}, position {}", self.line, self.pos)
        }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_none() {
            f.write_str("none")
        } else {
            write!(f, "{}:{}", self.line, self.pos)
        }
    }
}

/// The closed lexeme catalog (spec.md §2.1, §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // literal-carrying
    Number(u16),
    Str(SmartStr),
    Identifier(SmartStr),

    // brackets
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,

    // punctuation
    Comma,
    Dot,
    Colon,
    Semicolon,
    Tilde,

    // arithmetic / bitwise
    Plus,
    Minus,
    Star,
    Slash,
    SlashSlash,
    Percent,
    StarStar,
    At,
    Ampersand,
    Pipe,
    Caret,
    Shl,
    Shr,

    // comparison
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,

    // assignment
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    SlashSlashEq,
    PercentEq,
    StarStarEq,
    AtEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    Walrus,

    // keywords
    True,
    False,
    None_,
    And,
    Or,
    Not,
    Is,
    If,
    Elif,
    Else,
    For,
    While,
    Continue,
    Break,
    Pass,
    In,
    Def,
    Return,
    Yield,
    Class,
    Lambda,
    Try,
    Finally,
    Except,
    Raise,
    Import,
    From,
    With,
    As,
    Global,
    Nonlocal,
    Async,
    Await,
    Assert,
    Del,

    /// A line terminator, separating statements the way `;` does.
    Newline,
    /// End of input.
    Eof,
}

impl Token {
    /// Looks a scanned identifier up in the reserved-keyword table
    /// (spec.md §6), returning the keyword token it should become instead
    /// of a plain `Identifier`.
    #[must_use]
    pub fn keyword(ident: &str) -> Option<Self> {
        Some(match ident {
            "True" => Self::True,
            "False" => Self::False,
            "None" => Self::None_,
            "and" => Self::And,
            "or" => Self::Or,
            "not" => Self::Not,
            "is" => Self::Is,
            "if" => Self::If,
            "elif" => Self::Elif,
            "else" => Self::Else,
            "for" => Self::For,
            "while" => Self::While,
            "continue" => Self::Continue,
            "break" => Self::Break,
            "pass" => Self::Pass,
            "in" => Self::In,
            "def" => Self::Def,
            "return" => Self::Return,
            "yield" => Self::Yield,
            "class" => Self::Class,
            "lambda" => Self::Lambda,
            "try" => Self::Try,
            "finally" => Self::Finally,
            "except" => Self::Except,
            "raise" => Self::Raise,
            "import" => Self::Import,
            "from" => Self::From,
            "with" => Self::With,
            "as" => Self::As,
            "global" => Self::Global,
            "nonlocal" => Self::Nonlocal,
            "async" => Self::Async,
            "await" => Self::Await,
            "assert" => Self::Assert,
            "del" => Self::Del,
            _ => return None,
        })
    }
}

/// One scanned token paired with the position it started at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub position: Position,
}

/// The lexer's output: a bounded sequence of tokens plus occurrence
/// counters for each literal-carrying kind (spec.md §3 "Command-info").
///
/// The original C interpreter stored string/number/identifier literals in
/// three parallel arrays, each token carrying only an index into the
/// matching array (a consequence of the fixed-size `union` it stored node
/// payloads in). `rhai::token::Token` instead stores each literal payload
/// inline in the token itself (`Token::IntegerConstant(INT)`,
/// `Token::StringConstant(ImmutableString)`, ...); `wisp` follows the
/// teacher's inline style, which is both simpler and trivially satisfies
/// spec.md §8's invariant ("every literal-carrying token... a payload at
/// the expected index") since the payload *is* the token. `CommandInfo`
/// still tracks each literal kind's occurrence count separately so the
/// per-kind capacity limits (`MAX_LITS`) are still enforced independently.
#[derive(Debug, Clone, Default)]
pub struct CommandInfo {
    pub tokens: SmallVec<[Spanned; 16]>,
    pub num_strings: usize,
    pub num_numbers: usize,
    pub num_identifiers: usize,
}

impl CommandInfo {
    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// One-pass scanner from a raw command buffer into a [`CommandInfo`]
/// (spec.md §4.1).
pub struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    limits: &'a Limits,
    info: CommandInfo,
}

impl<'a> Lexer<'a> {
    /// Scans `source` into a [`CommandInfo`], enforcing every capacity in
    /// `limits`.
    ///
    /// # Errors
    ///
    /// Returns a [`WispError`] of kind [`crate::error::ErrorKind::SyntaxError`]
    /// on an invalid character or unterminated string, or
    /// [`crate::error::ErrorKind::RuntimeError`] if any capacity is
    /// exceeded.
    pub fn tokenize(source: &'a str, limits: &'a Limits) -> Result<CommandInfo, WispError> {
        if source.len() > limits.max_input_len {
            return Err(WispError::runtime(
                "command exceeds maximum input length",
                Position::NONE,
            ));
        }
        let mut lexer = Self {
            source,
            chars: source.char_indices().peekable(),
            limits,
            info: CommandInfo::default(),
        };
        lexer.run()?;
        Ok(lexer.info)
    }

    fn pos_at(&self, byte_offset: usize) -> Position {
        Position::new(1, (byte_offset + 1) as u16)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn push(&mut self, token: Token, position: Position) -> Result<(), WispError> {
        if self.info.tokens.len() >= self.limits.max_input_tokens {
            return Err(WispError::runtime(
                "maximum number of tokens exceeded",
                position,
            ));
        }
        self.info.tokens.push(Spanned { token, position });
        Ok(())
    }

    fn push_number(&mut self, value: u16, position: Position) -> Result<(), WispError> {
        if self.info.num_numbers >= self.limits.max_lits {
            return Err(WispError::runtime(
                "maximum number of numeric literals exceeded",
                position,
            ));
        }
        self.info.num_numbers += 1;
        self.push(Token::Number(value), position)
    }

    fn push_string(&mut self, value: SmartStr, position: Position) -> Result<(), WispError> {
        if self.info.num_strings >= self.limits.max_lits {
            return Err(WispError::runtime(
                "maximum number of string literals exceeded",
                position,
            ));
        }
        self.info.num_strings += 1;
        self.push(Token::Str(value), position)
    }

    fn push_identifier(&mut self, value: SmartStr, position: Position) -> Result<(), WispError> {
        if self.info.num_identifiers >= self.limits.max_identifiers {
            return Err(WispError::runtime(
                "maximum number of identifiers exceeded",
                position,
            ));
        }
        self.info.num_identifiers += 1;
        self.push(Token::Identifier(value), position)
    }

    /// Consumes the next character if it matches `expected`.
    fn matches(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn run(&mut self) -> Result<(), WispError> {
        loop {
            let Some(&(start, c)) = self.chars.peek() else {
                break;
            };
            let position = self.pos_at(start);

            match c {
                ' ' | '\t' | '\r' => {
                    self.chars.next();
                }
                '\n' => {
                    self.chars.next();
                    self.push(Token::Newline, position)?;
                }
                '#' => {
                    while let Some(&(_, c)) = self.chars.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.chars.next();
                    }
                }
                '(' => {
                    self.chars.next();
                    self.push(Token::LeftParen, position)?;
                }
                ')' => {
                    self.chars.next();
                    self.push(Token::RightParen, position)?;
                }
                '{' => {
                    self.chars.next();
                    self.push(Token::LeftBrace, position)?;
                }
                '}' => {
                    self.chars.next();
                    self.push(Token::RightBrace, position)?;
                }
                '[' => {
                    self.chars.next();
                    self.push(Token::LeftBracket, position)?;
                }
                ']' => {
                    self.chars.next();
                    self.push(Token::RightBracket, position)?;
                }
                ',' => {
                    self.chars.next();
                    self.push(Token::Comma, position)?;
                }
                '.' => {
                    self.chars.next();
                    self.push(Token::Dot, position)?;
                }
                ';' => {
                    self.chars.next();
                    self.push(Token::Semicolon, position)?;
                }
                '~' => {
                    self.chars.next();
                    self.push(Token::Tilde, position)?;
                }
                ':' => {
                    self.chars.next();
                    let tok = if self.matches('=') {
                        Token::Walrus
                    } else {
                        Token::Colon
                    };
                    self.push(tok, position)?;
                }
                '+' => {
                    self.chars.next();
                    let tok = if self.matches('=') { Token::PlusEq } else { Token::Plus };
                    self.push(tok, position)?;
                }
                '-' => {
                    self.chars.next();
                    let tok = if self.matches('=') { Token::MinusEq } else { Token::Minus };
                    self.push(tok, position)?;
                }
                '*' => {
                    self.chars.next();
                    let tok = if self.matches('*') {
                        if self.matches('=') { Token::StarStarEq } else { Token::StarStar }
                    } else if self.matches('=') {
                        Token::StarEq
                    } else {
                        Token::Star
                    };
                    self.push(tok, position)?;
                }
                '/' => {
                    self.chars.next();
                    let tok = if self.matches('/') {
                        if self.matches('=') { Token::SlashSlashEq } else { Token::SlashSlash }
                    } else if self.matches('=') {
                        Token::SlashEq
                    } else {
                        Token::Slash
                    };
                    self.push(tok, position)?;
                }
                '%' => {
                    self.chars.next();
                    let tok = if self.matches('=') { Token::PercentEq } else { Token::Percent };
                    self.push(tok, position)?;
                }
                '@' => {
                    self.chars.next();
                    let tok = if self.matches('=') { Token::AtEq } else { Token::At };
                    self.push(tok, position)?;
                }
                '&' => {
                    self.chars.next();
                    let tok = if self.matches('=') { Token::AmpEq } else { Token::Ampersand };
                    self.push(tok, position)?;
                }
                '|' => {
                    self.chars.next();
                    let tok = if self.matches('=') { Token::PipeEq } else { Token::Pipe };
                    self.push(tok, position)?;
                }
                '^' => {
                    self.chars.next();
                    let tok = if self.matches('=') { Token::CaretEq } else { Token::Caret };
                    self.push(tok, position)?;
                }
                '<' => {
                    self.chars.next();
                    let tok = if self.matches('<') {
                        if self.matches('=') { Token::ShlEq } else { Token::Shl }
                    } else if self.matches('=') {
                        Token::LtEq
                    } else {
                        Token::Lt
                    };
                    self.push(tok, position)?;
                }
                '>' => {
                    self.chars.next();
                    let tok = if self.matches('>') {
                        if self.matches('=') { Token::ShrEq } else { Token::Shr }
                    } else if self.matches('=') {
                        Token::GtEq
                    } else {
                        Token::Gt
                    };
                    self.push(tok, position)?;
                }
                '=' => {
                    self.chars.next();
                    let tok = if self.matches('=') { Token::EqEq } else { Token::Eq };
                    self.push(tok, position)?;
                }
                '!' => {
                    self.chars.next();
                    if self.matches('=') {
                        self.push(Token::NotEq, position)?;
                    } else {
                        return Err(WispError::syntax("invalid character", position));
                    }
                }
                '\'' | '"' => {
                    self.chars.next();
                    let quote = c;
                    let mut value = String::new();
                    loop {
                        match self.chars.next() {
                            Some((_, ch)) if ch == quote => break,
                            Some((_, ch)) => value.push(ch),
                            None => {
                                return Err(WispError::syntax(
                                    "unterminated string literal",
                                    position,
                                ))
                            }
                        }
                    }
                    self.push_string(
                        crate::value::truncate(&value, self.limits.max_lit_len),
                        position,
                    )?;
                }
                d if d.is_ascii_digit() => {
                    let mut value: u16 = 0;
                    while let Some(d) = self.peek_char().filter(char::is_ascii_digit) {
                        self.chars.next();
                        let digit = d.to_digit(10).unwrap() as u16;
                        value = value.wrapping_mul(10).wrapping_add(digit);
                    }
                    self.push_number(value, position)?;
                }
                c if c == '_' || c.is_alphabetic() => {
                    let mut ident = String::new();
                    ident.push(c);
                    self.chars.next();
                    while let Some(c) = self.peek_char() {
                        if c == '_' || c.is_alphanumeric() {
                            ident.push(c);
                            self.chars.next();
                        } else {
                            break;
                        }
                    }
                    if ident.len() > self.limits.max_identifier_len {
                        return Err(WispError::runtime(
                            "identifier exceeds maximum length",
                            position,
                        ));
                    }
                    if let Some(keyword) = Token::keyword(&ident) {
                        self.push(keyword, position)?;
                    } else {
                        self.push_identifier(SmartStr::from(ident.as_str()), position)?;
                    }
                }
                _ => {
                    return Err(WispError::syntax("invalid character", position));
                }
            }
        }
        self.push(Token::Eof, self.pos_at(self.source.len()))?;
        Ok(())
    }
}
