use log::debug;

use crate::errors::{StatementParseError, StatementResult};

pub const LEGACY_MARKER: &str = "OFXHEADER:";
pub const DEFAULT_VERSION: &str = "102";

/// Single-line header written by some producers without any delimiters.
const CONCATENATED_HEADER: &str = "OFXHEADER:100DATA:OFXSGMLVERSION:102SECURITY:NONEENCODING:USASCIICHARSET:1252COMPRESSION:NONEOLDFILEUID:NONENEWFILEUID:NONE";

/// Required literal per header position. Position 2 (version) is captured
/// and position 3 (security) is not checked.
const REQUIRED_FIELDS: &[(usize, &str)] = &[
    (0, "OFXHEADER:100"),
    (1, "DATA:OFXSGML"),
    (4, "ENCODING:USASCII"),
    (5, "CHARSET:1252"),
    (6, "COMPRESSION:NONE"),
    (7, "OLDFILEUID:NONE"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfxHeader {
    pub version: String,
}

impl Default for OfxHeader {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

const BYTE_ORDER_MARK: char = '\u{feff}';

fn skip_byte_order_mark(content: &str) -> &str {
    content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content)
}

/// SGML files start with the `OFXHEADER:` block; XML files do not.
pub fn is_sgml(content: &str) -> bool {
    skip_byte_order_mark(content).trim_start().starts_with(LEGACY_MARKER)
}

/// Validates the SGML header and returns it with the trimmed markup body.
pub fn strip_header(content: &str) -> StatementResult<(OfxHeader, &str)> {
    let content = skip_byte_order_mark(content);
    let body_start = content
        .find('<')
        .ok_or_else(|| StatementParseError::ParseFailed("Missing OFX markup body".to_string()))?;

    let fields: Vec<&str> = content[..body_start]
        .split(['\n', '\r'])
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .collect();

    let header = check_header(&fields)?;
    debug!("OFX header accepted, version {}", header.version);

    Ok((header, content[body_start..].trim()))
}

fn check_header(fields: &[&str]) -> StatementResult<OfxHeader> {
    let mut header = OfxHeader::default();

    if fields.first() == Some(&CONCATENATED_HEADER) {
        return Ok(header);
    }

    for &(index, expected) in REQUIRED_FIELDS {
        let found = fields.get(index).copied().unwrap_or_default();
        if found != expected {
            return Err(StatementParseError::InvalidHeader {
                index,
                expected,
                found: found.to_string(),
            });
        }
    }

    let version_field = fields.get(2).copied().unwrap_or_default();
    if version_field.contains("VERSION") {
        if let Some(version) = version_field.split(':').nth(1) {
            header.version = version.trim().to_string();
        }
    }

    Ok(header)
}
