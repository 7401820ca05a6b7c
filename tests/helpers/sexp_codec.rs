//! A codec that reads and writes the tree dump format.
//!
//! `load` parses the s-expressions produced by `Tree::dump`, so source
//! documents can be written as plain text in tests and the rewritten output
//! compared as text.

use std::iter::Peekable;
use std::path::Path;
use std::vec::IntoIter;

use reshape::syntax::{CodecError, DocumentCodec, NodeId, NodeKind, Scalar, Tree};

#[derive(Clone, Copy, Debug, Default)]
pub struct SexpCodec;

impl DocumentCodec for SexpCodec {
    fn load(&self, _path: &Path, text: &str) -> Result<Tree, CodecError> {
        parse(text)
    }

    fn write(&self, _path: &Path, tree: &Tree) -> Result<String, CodecError> {
        Ok(tree.dump())
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Open,
    Close,
    Atom(String),
    Quoted(String),
}

type Tokens = Peekable<IntoIter<Token>>;

fn tokenize(text: &str) -> Result<Vec<Token>, CodecError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '"' => {
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => s.push('\n'),
                            Some('t') => s.push('\t'),
                            Some(other) => s.push(other),
                            None => return Err(CodecError::syntax("unterminated escape")),
                        },
                        Some(other) => s.push(other),
                        None => return Err(CodecError::syntax("unterminated string")),
                    }
                }
                tokens.push(Token::Quoted(s));
            }
            c if c.is_whitespace() => {
                chars.next();
            }
            _ => {
                let mut atom = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' {
                        break;
                    }
                    atom.push(c);
                    chars.next();
                }
                tokens.push(Token::Atom(atom));
            }
        }
    }
    Ok(tokens)
}

pub fn parse(text: &str) -> Result<Tree, CodecError> {
    let mut tokens = tokenize(text)?.into_iter().peekable();
    expect_open(&mut tokens)?;
    let kind = parse_kind(&mut tokens)?;
    let mut tree = Tree::new(kind);
    let root = tree.root();
    parse_children(&mut tokens, &mut tree, root)?;
    if tokens.next().is_some() {
        return Err(CodecError::syntax("trailing input after root node"));
    }
    Ok(tree)
}

fn expect_open(tokens: &mut Tokens) -> Result<(), CodecError> {
    match tokens.next() {
        Some(Token::Open) => Ok(()),
        other => Err(CodecError::syntax(format!("expected `(`, found {other:?}"))),
    }
}

fn atom(tokens: &mut Tokens, what: &str) -> Result<String, CodecError> {
    match tokens.next() {
        Some(Token::Atom(a)) => Ok(a),
        other => Err(CodecError::syntax(format!("expected {what}, found {other:?}"))),
    }
}

fn parse_kind(tokens: &mut Tokens) -> Result<NodeKind, CodecError> {
    let tag = atom(tokens, "tag")?;
    Ok(match tag.as_str() {
        "source-file" => NodeKind::SourceFile,
        "namespace" => NodeKind::Namespace {
            name: atom(tokens, "name")?.into(),
        },
        "use" => {
            let name = atom(tokens, "name")?.into();
            let alias = if tokens.peek() == Some(&Token::Atom("as".into())) {
                tokens.next();
                Some(atom(tokens, "alias")?.into())
            } else {
                None
            };
            NodeKind::Use { name, alias }
        }
        "class" => NodeKind::ClassDecl {
            name: atom(tokens, "name")?.into(),
        },
        "name" => NodeKind::NameRef {
            name: atom(tokens, "name")?.into(),
        },
        "call" => {
            let target = atom(tokens, "call target")?;
            let (callee, method) = target
                .rsplit_once("::")
                .ok_or_else(|| CodecError::syntax(format!("call target `{target}`")))?;
            NodeKind::Call {
                callee: callee.into(),
                method: method.into(),
            }
        }
        "arg" => {
            let name = match tokens.peek() {
                Some(Token::Atom(a)) if a.ends_with(':') => {
                    let a = a.trim_end_matches(':').to_string();
                    tokens.next();
                    Some(a.into())
                }
                _ => None,
            };
            NodeKind::Argument { name }
        }
        "lit" => NodeKind::Literal(match tokens.next() {
            Some(Token::Quoted(s)) => Scalar::str(s),
            Some(Token::Atom(a)) => scalar_atom(&a)?,
            other => return Err(CodecError::syntax(format!("literal {other:?}"))),
        }),
        "null" => NodeKind::Null,
        "array" => NodeKind::Array,
        "const" => NodeKind::ConstRef {
            name: atom(tokens, "name")?.into(),
        },
        "concat" => NodeKind::Concat,
        "var" => NodeKind::Variable {
            name: atom(tokens, "name")?.into(),
        },
        "map" => NodeKind::Mapping,
        "entry" => NodeKind::Entry {
            key: atom(tokens, "key")?.into(),
        },
        "seq" => NodeKind::Sequence,
        other => return Err(CodecError::syntax(format!("unknown tag `{other}`"))),
    })
}

fn scalar_atom(atom: &str) -> Result<Scalar, CodecError> {
    match atom {
        "true" => Ok(Scalar::Bool(true)),
        "false" => Ok(Scalar::Bool(false)),
        _ => atom
            .parse::<i64>()
            .map(Scalar::Int)
            .or_else(|_| atom.parse::<u64>().map(Scalar::UInt))
            .or_else(|_| atom.parse::<f64>().map(Scalar::Float))
            .map_err(|_| CodecError::syntax(format!("bad literal `{atom}`"))),
    }
}

fn parse_children(tokens: &mut Tokens, tree: &mut Tree, parent: NodeId) -> Result<(), CodecError> {
    loop {
        match tokens.next() {
            Some(Token::Close) => return Ok(()),
            Some(Token::Open) => {
                let kind = parse_kind(tokens)?;
                let child = tree.append(parent, kind);
                parse_children(tokens, tree, child)?;
            }
            other => return Err(CodecError::syntax(format!("unexpected {other:?}"))),
        }
    }
}
