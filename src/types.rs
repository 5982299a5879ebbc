use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Coarse account kind. Only `Bank` and `CreditCard` have statement paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Bank,
    CreditCard,
    AccountsPayable,
    AccountsReceivable,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BankAccountType {
    Checking,
    Savings,
    MoneyMarket,
    CreditLine,
    HomeLoan,
    NotApplicable,
}

impl From<&str> for BankAccountType {
    /// Unrecognized tokens fall back to `NotApplicable`.
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "CHECKING" => Self::Checking,
            "SAVINGS" => Self::Savings,
            "MONEYMRKT" => Self::MoneyMarket,
            "CREDITLINE" => Self::CreditLine,
            "HOMELOAN" => Self::HomeLoan,
            _ => Self::NotApplicable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignOn {
    pub server_date: Option<NaiveDate>,
    pub institution_id: Option<String>,
    pub language: Option<String>,
    pub status_code: i32,
    pub status_severity: Option<String>,
    pub organization: Option<String>,
    pub fid: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: Option<String>,
    pub account_type: AccountType,
    pub bank_account_type: BankAccountType,
    /// Routing number; bank accounts only.
    pub bank_id: Option<String>,
    pub branch_id: Option<String>,
    pub account_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub ledger_balance: Decimal,
    pub ledger_balance_date: Option<NaiveDate>,
    /// Zero when the statement has no available balance section.
    pub available_balance: Decimal,
    pub available_balance_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_type: String,
    pub date: Option<NaiveDate>,
    pub user_date: Option<NaiveDate>,
    pub available_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub currency: String,
    pub fitid: Option<String>,
    pub correct_fitid: Option<String>,
    pub correct_action: Option<String>,
    pub server_transaction_id: Option<String>,
    pub check_number: Option<String>,
    pub reference_number: Option<String>,
    pub sic: Option<String>,
    pub payee_id: Option<String>,
    pub payee: Option<String>,
    pub memo: Option<String>,
}

/// A fully parsed statement: one account, one balance snapshot and its transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementDocument {
    pub version: String,
    pub statement_start: Option<NaiveDate>,
    pub statement_end: Option<NaiveDate>,
    pub account_type: AccountType,
    pub currency: String,
    pub sign_on: SignOn,
    pub account: Account,
    pub balance: Balance,
    /// `None` when the statement has no transaction list at all.
    pub transactions: Option<Vec<Transaction>>,
}
