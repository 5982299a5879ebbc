//! OFX statement parsing: header check, SGML normalization, path
//! resolution and typed field extraction.

use log::debug;

use crate::errors::StatementResult;

mod dto;
mod header;
mod paths;
mod parser;
mod sgml;
mod tree;
mod types;
mod xml;

pub use header::{DEFAULT_VERSION, OfxHeader};
pub use paths::{Section, resolve as resolve_path};
pub use tree::Node;
pub use types::OfxDate;

pub mod prelude {
    pub use super::parser::{OfxParser, detect_account_type};
}

/// Header check and tag-soup normalization only, without assembling a
/// statement. Well-formed documents are read as they are.
pub fn parse_tree(content: &str) -> StatementResult<(OfxHeader, Node)> {
    if header::is_sgml(content) {
        debug!("Parsing OFX SGML document");
        let (header, body) = header::strip_header(content)?;
        Ok((header, sgml::normalize(body)))
    } else {
        debug!("Parsing OFX XML document");
        Ok((OfxHeader::default(), xml::parse(content)?))
    }
}

