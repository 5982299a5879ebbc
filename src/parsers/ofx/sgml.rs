//! Tag-soup normalizer for OFX 1.x SGML bodies.
//!
//! Leaf elements in SGML statements are never closed, and some producers
//! also drop the closing tag of aggregates. Nesting is inferred from the
//! token stream:
//!
//! * an opening tag followed by text is a leaf holding that text;
//! * an opening tag followed by another tag is a container when its name
//!   is closed after child content somewhere in the document, when it is
//!   opened again before its parent closes (repeated aggregates such as
//!   `STMTTRN` without `</STMTTRN>`), or when the document has no closing
//!   tags at all; otherwise it is an empty leaf;
//! * a closing tag pops every open container down to the matching one;
//! * opening a tag whose name is already open closes the open one first.

use std::borrow::Cow;
use std::collections::HashSet;

use log::{debug, warn};
use quick_xml::escape::unescape;

use super::tree::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open(&'a str),
    Close(&'a str),
    Empty(&'a str),
    Text(&'a str),
}

fn tokenize(body: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = body;

    while !rest.is_empty() {
        let Some(start) = rest.find('<') else {
            push_text(&mut tokens, rest);
            break;
        };
        push_text(&mut tokens, &rest[..start]);

        let Some(len) = rest[start..].find('>') else {
            // Unterminated tag at end of input.
            push_text(&mut tokens, &rest[start..]);
            break;
        };
        let tag = &rest[start + 1..start + len];
        rest = &rest[start + len + 1..];

        if tag.starts_with('?') || tag.starts_with('!') {
            continue;
        }

        let token = if let Some(name) = tag.strip_prefix('/') {
            tag_name(name).map(Token::Close)
        } else if let Some(name) = tag.strip_suffix('/') {
            tag_name(name).map(Token::Empty)
        } else {
            tag_name(tag).map(Token::Open)
        };
        tokens.extend(token);
    }

    tokens
}

fn tag_name(tag: &str) -> Option<&str> {
    tag.split_whitespace().next()
}

fn push_text<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str) {
    let text = text.trim();
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
}

fn decode(text: &str) -> Cow<'_, str> {
    unescape(text).unwrap_or(Cow::Borrowed(text))
}

/// Names closed after child content, i.e. aggregates. A closing tag that
/// directly follows its own opening tag, or the text of its own opening
/// tag, only terminates a leaf.
fn aggregate_names<'a>(tokens: &[Token<'a>]) -> HashSet<&'a str> {
    tokens
        .iter()
        .enumerate()
        .filter_map(|(i, token)| {
            let Token::Close(name) = token else {
                return None;
            };
            let previous = i.checked_sub(1).map(|j| &tokens[j]);
            let before = i.checked_sub(2).map(|j| &tokens[j]);
            let closes_leaf = match (before, previous) {
                (_, Some(Token::Open(open))) => open == name,
                (Some(Token::Open(open)), Some(Token::Text(_))) => open == name,
                _ => false,
            };
            (!closes_leaf).then_some(*name)
        })
        .chain(reopened_names(tokens))
        .collect()
}

/// Names that open before another tag and are opened again while the
/// first one can still be open, i.e. without a closing tag for it or for
/// any element around it in between.
fn reopened_names<'a>(tokens: &[Token<'a>]) -> HashSet<&'a str> {
    let mut names = HashSet::new();

    for (i, token) in tokens.iter().enumerate() {
        let Token::Open(name) = *token else {
            continue;
        };
        if names.contains(name) || !matches!(tokens.get(i + 1), Some(Token::Open(_))) {
            continue;
        }

        let mut opened = HashSet::new();
        for next in &tokens[i + 1..] {
            match *next {
                Token::Open(other) if other == name => {
                    names.insert(name);
                    break;
                }
                Token::Open(other) => {
                    opened.insert(other);
                }
                Token::Close(other) if other == name || !opened.contains(other) => break,
                _ => {}
            }
        }
    }

    names
}

struct Frame<'a> {
    name: &'a str,
    children: Vec<Node>,
}

struct TreeBuilder<'a> {
    roots: Vec<Node>,
    stack: Vec<Frame<'a>>,
}

impl<'a> TreeBuilder<'a> {
    fn new() -> Self {
        Self {
            roots: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(frame) => frame.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn open(&mut self, name: &'a str) {
        self.stack.push(Frame {
            name,
            children: Vec::new(),
        });
    }

    fn is_open(&self, name: &str) -> bool {
        self.stack.iter().any(|frame| frame.name == name)
    }

    /// Closes every open container down to and including `name`.
    fn close(&mut self, name: &str) {
        while let Some(frame) = self.stack.pop() {
            let done = frame.name == name;
            if !done {
                debug!("Implicitly closing <{}> at </{}>", frame.name, name);
            }
            self.push_node(Node::container(frame.name, frame.children));
            if done {
                break;
            }
        }
    }

    fn finish(mut self) -> Node {
        while let Some(frame) = self.stack.pop() {
            self.push_node(Node::container(frame.name, frame.children));
        }
        Node::document(self.roots)
    }
}

/// Builds the tree for a header-stripped SGML body. Well-formed input goes
/// through unchanged in shape.
pub fn normalize(body: &str) -> Node {
    let tokens = tokenize(body);
    let aggregates = aggregate_names(&tokens);
    let implicit_only = !tokens.iter().any(|t| matches!(t, Token::Close(_)));

    let mut builder = TreeBuilder::new();
    let mut i = 0;

    while i < tokens.len() {
        match tokens[i] {
            Token::Open(name) => match tokens.get(i + 1) {
                Some(Token::Text(text)) => {
                    builder.push_node(Node::leaf(name, decode(text)));
                    i += 1;
                    if tokens.get(i + 1) == Some(&Token::Close(name)) {
                        i += 1;
                    }
                }
                Some(Token::Close(close)) if *close == name => {
                    builder.push_node(Node::leaf(name, ""));
                    i += 1;
                }
                _ if implicit_only || aggregates.contains(name) => {
                    if builder.is_open(name) {
                        builder.close(name);
                    }
                    builder.open(name);
                }
                _ => builder.push_node(Node::leaf(name, "")),
            },
            Token::Close(name) => {
                if builder.is_open(name) {
                    builder.close(name);
                } else {
                    warn!("Ignoring unmatched closing tag </{}>", name);
                }
            }
            Token::Empty(name) => builder.push_node(Node::leaf(name, "")),
            Token::Text(text) => warn!("Ignoring text outside of a leaf element: {:?}", text),
        }
        i += 1;
    }

    builder.finish()
}
