//! Tokeniser for payoff expressions.
//!
//! Recognises the full token set of a Python expression, including tokens the
//! grammar never accepts (strings, bitwise operators, assignment, keywords) so
//! that the parser and validator can name them precisely when rejecting them.

use super::error::{PayoffError, Span};

/// Token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Token kind and payload.
    pub kind: TokenKind,
    /// Location in the source.
    pub span: Span,
}

/// Reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Keyword {
    And,
    As,
    Assert,
    Async,
    Await,
    Break,
    Class,
    Continue,
    Def,
    Del,
    Elif,
    Else,
    Except,
    Finally,
    For,
    From,
    Global,
    If,
    Import,
    In,
    Is,
    Lambda,
    Nonlocal,
    Not,
    Or,
    Pass,
    Raise,
    Return,
    Try,
    While,
    With,
    Yield,
}

impl Keyword {
    fn from_word(word: &str) -> Option<Self> {
        let keyword = match word {
            "and" => Keyword::And,
            "as" => Keyword::As,
            "assert" => Keyword::Assert,
            "async" => Keyword::Async,
            "await" => Keyword::Await,
            "break" => Keyword::Break,
            "class" => Keyword::Class,
            "continue" => Keyword::Continue,
            "def" => Keyword::Def,
            "del" => Keyword::Del,
            "elif" => Keyword::Elif,
            "else" => Keyword::Else,
            "except" => Keyword::Except,
            "finally" => Keyword::Finally,
            "for" => Keyword::For,
            "from" => Keyword::From,
            "global" => Keyword::Global,
            "if" => Keyword::If,
            "import" => Keyword::Import,
            "in" => Keyword::In,
            "is" => Keyword::Is,
            "lambda" => Keyword::Lambda,
            "nonlocal" => Keyword::Nonlocal,
            "not" => Keyword::Not,
            "or" => Keyword::Or,
            "pass" => Keyword::Pass,
            "raise" => Keyword::Raise,
            "return" => Keyword::Return,
            "try" => Keyword::Try,
            "while" => Keyword::While,
            "with" => Keyword::With,
            "yield" => Keyword::Yield,
            _ => return None,
        };
        Some(keyword)
    }

    /// Source spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::And => "and",
            Keyword::As => "as",
            Keyword::Assert => "assert",
            Keyword::Async => "async",
            Keyword::Await => "await",
            Keyword::Break => "break",
            Keyword::Class => "class",
            Keyword::Continue => "continue",
            Keyword::Def => "def",
            Keyword::Del => "del",
            Keyword::Elif => "elif",
            Keyword::Else => "else",
            Keyword::Except => "except",
            Keyword::Finally => "finally",
            Keyword::For => "for",
            Keyword::From => "from",
            Keyword::Global => "global",
            Keyword::If => "if",
            Keyword::Import => "import",
            Keyword::In => "in",
            Keyword::Is => "is",
            Keyword::Lambda => "lambda",
            Keyword::Nonlocal => "nonlocal",
            Keyword::Not => "not",
            Keyword::Or => "or",
            Keyword::Pass => "pass",
            Keyword::Raise => "raise",
            Keyword::Return => "return",
            Keyword::Try => "try",
            Keyword::While => "while",
            Keyword::With => "with",
            Keyword::Yield => "yield",
        }
    }
}

/// Token types.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum TokenKind {
    // Literals
    Number(f64),
    Str(String),
    True,
    False,
    None,

    Name(String),
    Keyword(Keyword),

    // Arithmetic
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    At,

    // Bitwise
    Amper,
    Pipe,
    Caret,
    Tilde,
    LeftShift,
    RightShift,

    // Comparison
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,

    // Assignment
    Assign,
    Walrus,
    AugAssign(&'static str),

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Arrow,
    Ellipsis,

    Eof,
}

impl TokenKind {
    /// Short description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Name(name) => format!("name `{name}`"),
            TokenKind::Keyword(kw) => format!("keyword `{}`", kw.as_str()),
            TokenKind::Eof => "end of expression".to_string(),
            other => format!("`{}`", other.symbol()),
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            TokenKind::True => "True",
            TokenKind::False => "False",
            TokenKind::None => "None",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::DoubleStar => "**",
            TokenKind::Slash => "/",
            TokenKind::DoubleSlash => "//",
            TokenKind::Percent => "%",
            TokenKind::At => "@",
            TokenKind::Amper => "&",
            TokenKind::Pipe => "|",
            TokenKind::Caret => "^",
            TokenKind::Tilde => "~",
            TokenKind::LeftShift => "<<",
            TokenKind::RightShift => ">>",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::Assign => "=",
            TokenKind::Walrus => ":=",
            TokenKind::AugAssign(op) => op,
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::Arrow => "->",
            TokenKind::Ellipsis => "...",
            TokenKind::Number(_)
            | TokenKind::Str(_)
            | TokenKind::Name(_)
            | TokenKind::Keyword(_)
            | TokenKind::Eof => "",
        }
    }
}

const THREE_CHAR: &[(&str, TokenKind)] = &[
    ("**=", TokenKind::AugAssign("**=")),
    ("//=", TokenKind::AugAssign("//=")),
    (">>=", TokenKind::AugAssign(">>=")),
    ("<<=", TokenKind::AugAssign("<<=")),
    ("...", TokenKind::Ellipsis),
];

const TWO_CHAR: &[(&str, TokenKind)] = &[
    ("**", TokenKind::DoubleStar),
    ("//", TokenKind::DoubleSlash),
    ("<<", TokenKind::LeftShift),
    (">>", TokenKind::RightShift),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::Le),
    (">=", TokenKind::Ge),
    (":=", TokenKind::Walrus),
    ("->", TokenKind::Arrow),
    ("+=", TokenKind::AugAssign("+=")),
    ("-=", TokenKind::AugAssign("-=")),
    ("*=", TokenKind::AugAssign("*=")),
    ("/=", TokenKind::AugAssign("/=")),
    ("%=", TokenKind::AugAssign("%=")),
    ("@=", TokenKind::AugAssign("@=")),
    ("&=", TokenKind::AugAssign("&=")),
    ("|=", TokenKind::AugAssign("|=")),
    ("^=", TokenKind::AugAssign("^=")),
];

/// Tokenise an expression. The returned vector always ends with `Eof`.
///
/// Whitespace (newlines included) separates tokens and `#` starts a comment
/// running to the end of the line.
///
/// # Errors
///
/// `InvalidExpression` for characters outside the token set, malformed
/// numbers and unterminated strings.
pub fn tokenize(source: &str) -> Result<Vec<Token>, PayoffError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let ch = bytes[pos];

        if ch.is_ascii_whitespace() || ch == b'\\' {
            pos += 1;
            continue;
        }
        if ch == b'#' {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            continue;
        }

        let start = pos;

        if ch == b'"' || ch == b'\'' {
            let (text, end) = lex_string(source, start, start)?;
            tokens.push(Token {
                kind: TokenKind::Str(text),
                span: Span::new(start, end),
            });
            pos = end;
            continue;
        }

        if ch.is_ascii_digit()
            || (ch == b'.' && pos + 1 < bytes.len() && bytes[pos + 1].is_ascii_digit())
        {
            let (value, end) = lex_number(source, start)?;
            tokens.push(Token {
                kind: TokenKind::Number(value),
                span: Span::new(start, end),
            });
            pos = end;
            continue;
        }

        if ch.is_ascii_alphabetic() || ch == b'_' {
            let end = lex_ident_end(bytes, pos);
            let word = &source[start..end];

            // String prefixes: r'..', b"..", f'..', rb'..'
            if end < bytes.len()
                && (bytes[end] == b'"' || bytes[end] == b'\'')
                && word.len() <= 2
                && word.chars().all(|c| "rRbBuUfF".contains(c))
            {
                let (text, string_end) = lex_string(source, end, start)?;
                tokens.push(Token {
                    kind: TokenKind::Str(text),
                    span: Span::new(start, string_end),
                });
                pos = string_end;
                continue;
            }

            let kind = match word {
                "True" => TokenKind::True,
                "False" => TokenKind::False,
                "None" => TokenKind::None,
                _ => match Keyword::from_word(word) {
                    Some(keyword) => TokenKind::Keyword(keyword),
                    None => TokenKind::Name(word.to_string()),
                },
            };
            tokens.push(Token {
                kind,
                span: Span::new(start, end),
            });
            pos = end;
            continue;
        }

        if let Some((len, kind)) = match_operator(&bytes[pos..]) {
            tokens.push(Token {
                kind,
                span: Span::new(start, start + len),
            });
            pos += len;
            continue;
        }

        let bad = source[pos..].chars().next().unwrap_or('\u{fffd}');
        return Err(PayoffError::invalid(
            format!("unexpected character '{bad}'"),
            source,
            Span::new(start, start + bad.len_utf8()),
        ));
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(bytes.len(), bytes.len()),
    });
    Ok(tokens)
}

fn match_operator(rest: &[u8]) -> Option<(usize, TokenKind)> {
    for table in [THREE_CHAR, TWO_CHAR] {
        for (text, kind) in table {
            if rest.starts_with(text.as_bytes()) {
                return Some((text.len(), kind.clone()));
            }
        }
    }

    let kind = match rest.first()? {
        b'+' => TokenKind::Plus,
        b'-' => TokenKind::Minus,
        b'*' => TokenKind::Star,
        b'/' => TokenKind::Slash,
        b'%' => TokenKind::Percent,
        b'@' => TokenKind::At,
        b'&' => TokenKind::Amper,
        b'|' => TokenKind::Pipe,
        b'^' => TokenKind::Caret,
        b'~' => TokenKind::Tilde,
        b'<' => TokenKind::Lt,
        b'>' => TokenKind::Gt,
        b'=' => TokenKind::Assign,
        b'(' => TokenKind::LParen,
        b')' => TokenKind::RParen,
        b'[' => TokenKind::LBracket,
        b']' => TokenKind::RBracket,
        b'{' => TokenKind::LBrace,
        b'}' => TokenKind::RBrace,
        b',' => TokenKind::Comma,
        b':' => TokenKind::Colon,
        b';' => TokenKind::Semicolon,
        b'.' => TokenKind::Dot,
        _ => return None,
    };
    Some((1, kind))
}

/// Lexes a quoted string whose opening quote is at `quote`; the token span
/// starts at `start` so that any prefix letters are included.
fn lex_string(source: &str, quote: usize, start: usize) -> Result<(String, usize), PayoffError> {
    let bytes = source.as_bytes();
    let delimiter = bytes[quote];
    let mut pos = quote + 1;

    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'\n' => break,
            b if b == delimiter => {
                let text = source[quote + 1..pos].to_string();
                return Ok((text, pos + 1));
            }
            _ => pos += 1,
        }
    }

    Err(PayoffError::invalid(
        "unterminated string literal",
        source,
        Span::new(start, pos.min(bytes.len())),
    ))
}

fn lex_number(source: &str, start: usize) -> Result<(f64, usize), PayoffError> {
    let bytes = source.as_bytes();
    let mut pos = start;
    let mut digits = String::new();

    let take_digits = |pos: &mut usize, digits: &mut String| {
        while *pos < bytes.len() && (bytes[*pos].is_ascii_digit() || bytes[*pos] == b'_') {
            if bytes[*pos] != b'_' {
                digits.push(bytes[*pos] as char);
            }
            *pos += 1;
        }
    };

    take_digits(&mut pos, &mut digits);

    if pos < bytes.len() && bytes[pos] == b'.' {
        digits.push('.');
        pos += 1;
        take_digits(&mut pos, &mut digits);
    }

    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        digits.push('e');
        pos += 1;
        if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
            digits.push(bytes[pos] as char);
            pos += 1;
        }
        take_digits(&mut pos, &mut digits);
    }

    digits.parse::<f64>().map(|n| (n, pos)).map_err(|_| {
        PayoffError::invalid(
            format!("malformed number literal '{}'", &source[start..pos]),
            source,
            Span::new(start, pos),
        )
    })
}

fn lex_ident_end(bytes: &[u8], start: usize) -> usize {
    let mut pos = start;
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn tokenize_call_payoff() {
        assert_eq!(
            kinds("max(price - 100, 0)"),
            vec![
                TokenKind::Name("max".to_string()),
                TokenKind::LParen,
                TokenKind::Name("price".to_string()),
                TokenKind::Minus,
                TokenKind::Number(100.0),
                TokenKind::Comma,
                TokenKind::Number(0.0),
                TokenKind::RParen,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenize_number_forms() {
        assert_eq!(
            kinds("1 2.5 1e-3 1_000 .5 3. 2E+2 1.e3"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Number(2.5),
                TokenKind::Number(1e-3),
                TokenKind::Number(1000.0),
                TokenKind::Number(0.5),
                TokenKind::Number(3.0),
                TokenKind::Number(200.0),
                TokenKind::Number(1000.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenize_operators_longest_match() {
        assert_eq!(
            kinds("a**b//c<=d**=e"),
            vec![
                TokenKind::Name("a".to_string()),
                TokenKind::DoubleStar,
                TokenKind::Name("b".to_string()),
                TokenKind::DoubleSlash,
                TokenKind::Name("c".to_string()),
                TokenKind::Le,
                TokenKind::Name("d".to_string()),
                TokenKind::AugAssign("**="),
                TokenKind::Name("e".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenize_keywords_and_literals() {
        assert_eq!(
            kinds("import os"),
            vec![
                TokenKind::Keyword(Keyword::Import),
                TokenKind::Name("os".to_string()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("True if None else False"),
            vec![
                TokenKind::True,
                TokenKind::Keyword(Keyword::If),
                TokenKind::None,
                TokenKind::Keyword(Keyword::Else),
                TokenKind::False,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenize_strings_with_prefix() {
        let tokens = tokenize("__import__('os') + b\"x\"").unwrap();
        assert_eq!(tokens[2].kind, TokenKind::Str("os".to_string()));
        assert_eq!(tokens[2].span, Span::new(11, 15));
        assert_eq!(tokens[5].kind, TokenKind::Str("x".to_string()));
        assert_eq!(tokens[5].span, Span::new(19, 23));
    }

    #[test]
    fn tokenize_comment_and_newline() {
        assert_eq!(
            kinds("price # terminal\n+ 1"),
            vec![
                TokenKind::Name("price".to_string()),
                TokenKind::Plus,
                TokenKind::Number(1.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tokenize_spans_are_byte_offsets() {
        let tokens = tokenize("path[-1]").unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 4));
        assert_eq!(tokens[1].span, Span::new(4, 5));
        assert_eq!(tokens[3].span, Span::new(6, 7));
        assert_eq!(tokens.last().unwrap().span, Span::new(8, 8));
    }

    #[test]
    fn unexpected_character_is_invalid() {
        let err = tokenize("price $ 1").unwrap_err();
        assert!(!err.is_unsafe());
        assert_eq!(err.span(), Span::new(6, 7));

        let err = tokenize("price ≥ 1").unwrap_err();
        assert_eq!(err.fragment(), "≥");
    }

    #[test]
    fn unterminated_string_is_invalid() {
        let err = tokenize("'abc").unwrap_err();
        assert!(matches!(err, PayoffError::InvalidExpression { .. }));
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn malformed_exponent_is_invalid() {
        let err = tokenize("1e").unwrap_err();
        assert!(err.to_string().contains("malformed number"));
    }
}
