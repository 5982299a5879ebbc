//! Parse OFX bank and credit card statements, SGML (OFX 1.x) or XML
//! (OFX 2.x), into a typed [`StatementDocument`].
//!
//! ```rust,ignore
//! use ofx_statement_rs::ParserBuilder;
//!
//! let statement = ParserBuilder::new()
//!     .content(&file_content)
//!     .parse()?;
//! ```

mod builder;
mod types;

pub mod errors;
pub mod parsers;

pub use builder::{FileFormat, ParserBuilder};
pub use errors::{ErrorKind, StatementParseError, StatementResult};
pub use parsers::prelude::*;
pub use types::{
    Account, AccountType, Balance, BankAccountType, SignOn, StatementDocument, Transaction,
};
