use quick_xml::events::Event;
use quick_xml::Reader;

use super::tree::Node;
use crate::errors::{StatementParseError, StatementResult};

fn xml_error(e: impl std::fmt::Display) -> StatementParseError {
    StatementParseError::ParseFailed(format!("XML parse error: {}", e))
}

fn element_name(name: &[u8]) -> StatementResult<String> {
    std::str::from_utf8(name).map(str::to_string).map_err(xml_error)
}

struct Frame {
    name: String,
    text: String,
    children: Vec<Node>,
}

impl Frame {
    /// Elements without child elements become leaves, even when empty.
    fn into_node(self) -> Node {
        if self.children.is_empty() {
            Node::leaf(self.name, self.text)
        } else {
            Node::container(self.name, self.children)
        }
    }
}

/// Structural parse of a well-formed (OFX 2.x) document. No nesting is
/// inferred; mismatched closing tags are errors.
pub fn parse(content: &str) -> StatementResult<Node> {
    let mut reader = Reader::from_str(content);
    let mut roots = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(start) => stack.push(Frame {
                name: element_name(start.name().as_ref())?,
                text: String::new(),
                children: Vec::new(),
            }),
            Event::Empty(empty) => {
                let node = Node::leaf(element_name(empty.name().as_ref())?, "");
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => roots.push(node),
                }
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text.unescape().map_err(xml_error)?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| xml_error("unexpected closing tag"))?
                    .into_node();
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => roots.push(node),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(frame) = stack.last() {
        return Err(xml_error(format!("unclosed element <{}>", frame.name)));
    }

    Ok(Node::document(roots))
}
