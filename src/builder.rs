use std::fs;

use crate::{errors::StatementParseError, parsers::prelude::*, types::StatementDocument};
use encoding_rs::{UTF_8, WINDOWS_1252};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    #[serde(rename = "ofx")]
    Ofx,
}

impl FileFormat {
    fn parse(&self, content: &str) -> Result<StatementDocument, StatementParseError> {
        match self {
            FileFormat::Ofx => OfxParser::parse(content),
        }
    }

    fn detect(filename: Option<&str>, content: Option<&str>) -> Result<Self, StatementParseError> {
        if let Some(content) = content {
            if OfxParser::is_supported(filename, content) {
                return Ok(FileFormat::Ofx);
            }
        }

        if let Some(filename) = filename {
            if let Some(ext) = filename.rsplit('.').next() {
                if matches!(ext.to_lowercase().as_str(), "qfx" | "ofx") {
                    return Ok(FileFormat::Ofx);
                }
            }
        }

        Err(StatementParseError::UnsupportedFormat)
    }
}

/// Statement files declare `CHARSET:1252`; anything that is not valid
/// UTF-8 is decoded as Windows-1252. A UTF-8 byte order mark is dropped.
fn decode(bytes: Vec<u8>) -> String {
    let (content, had_errors) = UTF_8.decode_with_bom_removal(&bytes);
    if !had_errors {
        return content.into_owned();
    }

    debug!("Content is not UTF-8, decoding as Windows-1252");
    let (content, _, _) = WINDOWS_1252.decode(&bytes);
    content.into_owned()
}

#[derive(Default)]
pub struct ParserBuilder {
    content: Option<String>,
    filepath: Option<String>,
    format: Option<FileFormat>,
}

impl ParserBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn filename(mut self, filename: &str) -> Self {
        self.filepath = Some(filename.to_string());
        self
    }

    pub fn format(mut self, format: FileFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn parse(self) -> Result<StatementDocument, StatementParseError> {
        let format = self.format
            .map(Ok)
            .unwrap_or_else(|| FileFormat::detect(
                self.filepath.as_deref(),
                self.content.as_deref(),
            ))?;

        let content = self.content
            .map(Ok)
            .unwrap_or_else(|| {
                self.filepath
                    .ok_or(StatementParseError::MissingContentAndFilepath)
                    .and_then(|path| fs::read(path).map(decode).map_err(Into::into))
            })?;

        format.parse(&content)
    }
}
