use crate::errors::{StatementParseError, StatementResult};
use crate::types::AccountType;

pub const BANK_MESSAGES: &str = "BANKMSGSRSV1";
pub const CREDIT_CARD_MESSAGES: &str = "CREDITCARDMSGSRSV1";

const SIGN_ON: &[&str] = &["OFX", "SIGNONMSGSRSV1", "SONRS"];
const BANK_STATEMENT: &[&str] = &["OFX", BANK_MESSAGES, "STMTTRNRS", "STMTRS"];
const CREDIT_CARD_STATEMENT: &[&str] = &["OFX", CREDIT_CARD_MESSAGES, "CCSTMTTRNRS", "CCSTMTRS"];

/// Logical part of a statement document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    SignOn,
    AccountInfo,
    Balance,
    Transactions,
    Currency,
}

fn statement_root(
    account_type: AccountType,
) -> StatementResult<(&'static [&'static str], &'static str)> {
    match account_type {
        AccountType::Bank => Ok((BANK_STATEMENT, "BANKACCTFROM")),
        AccountType::CreditCard => Ok((CREDIT_CARD_STATEMENT, "CCACCTFROM")),
        other => Err(StatementParseError::UnsupportedAccountType(other)),
    }
}

fn join(root: &[&'static str], name: &'static str) -> Vec<&'static str> {
    let mut path = root.to_vec();
    path.push(name);
    path
}

/// Tree path of `section` for the given account type. Only the sign-on
/// block has a path for every account type.
pub fn resolve(account_type: AccountType, section: Section) -> StatementResult<Vec<&'static str>> {
    if section == Section::SignOn {
        return Ok(SIGN_ON.to_vec());
    }

    let (root, account_info) = statement_root(account_type)?;
    let path = match section {
        Section::SignOn => SIGN_ON.to_vec(),
        Section::AccountInfo => join(root, account_info),
        Section::Balance => root.to_vec(),
        Section::Transactions => join(root, "BANKTRANLIST"),
        Section::Currency => join(root, "CURDEF"),
    };

    Ok(path)
}
