use std::fmt;

/// One node of a parsed custom-uniform expression.
///
/// Numbers keep their source text: the resolver decides how to read them.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// `-x`, `!x`
    Unary { op: String, inner: Box<Token> },
    /// `a + b`, `a == b`, `a && b`
    Binary { op: String, left: Box<Token>, right: Box<Token> },
    /// `sin(x)`, `vec3(a, b, c)`
    Call { name: String, args: Vec<Token> },
    /// `v.x` is index 0, `v.w` index 3; matrix columns likewise.
    Access { base: Box<Token>, index: usize },
    /// Raw literal text: `3`, `0x1F`, `2.5`
    Number(String),
    /// Variable reference.
    Id(String),
}

impl Token {
    pub fn unary(op: &str, inner: Token) -> Self {
        Token::Unary { op: op.to_string(), inner: Box::new(inner) }
    }

    pub fn binary(op: &str, left: Token, right: Token) -> Self {
        Token::Binary { op: op.to_string(), left: Box::new(left), right: Box::new(right) }
    }

    pub fn call(name: &str, args: Vec<Token>) -> Self {
        Token::Call { name: name.to_string(), args }
    }

    pub fn access(base: Token, index: usize) -> Self {
        Token::Access { base: Box::new(base), index }
    }

    pub fn number(text: &str) -> Self { Token::Number(text.to_string()) }

    pub fn id(name: &str) -> Self { Token::Id(name.to_string()) }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Unary { op, inner }          => write!(f, "{op}{inner}"),
            Token::Binary { op, left, right }   => write!(f, "({left} {op} {right})"),
            Token::Call { name, args } => {
                write!(f, "{name}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
            Token::Access { base, index } => match "xyzw".as_bytes().get(*index) {
                Some(c) => write!(f, "{base}.{}", *c as char),
                None    => write!(f, "{base}.{index}"),
            },
            Token::Number(text) => f.write_str(text),
            Token::Id(name)     => f.write_str(name),
        }
    }
}
