use rust_decimal::Decimal;

use super::tree::Node;
use super::types::{parse_date, parse_decimal};
use crate::errors::{StatementParseError, StatementResult};
use crate::types::{Account, AccountType, Balance, BankAccountType, SignOn, Transaction};

impl SignOn {
    pub(super) fn from_node(node: &Node) -> StatementResult<Self> {
        let status_code = node
            .value(&["STATUS", "CODE"])
            .ok_or(StatementParseError::NotFound("Sign on status code"))?;

        Ok(SignOn {
            server_date: parse_date(node.value(&["DTSERVER"]))?,
            institution_id: node.owned_value(&["INTU.BID"]),
            language: node.owned_value(&["LANGUAGE"]),
            status_code: status_code.parse().map_err(|_| {
                StatementParseError::ParseFailed(format!(
                    "Invalid sign on status code: {}",
                    status_code
                ))
            })?,
            status_severity: node.owned_value(&["STATUS", "SEVERITY"]),
            organization: node.owned_value(&["FI", "ORG"]),
            fid: node.owned_value(&["FI", "FID"]),
        })
    }
}

impl Account {
    /// Routing, branch and key fields only exist for bank accounts.
    pub(super) fn from_node(node: &Node, account_type: AccountType) -> Self {
        let account_id = node.owned_value(&["ACCTID"]);

        if account_type != AccountType::Bank {
            return Account {
                account_id,
                account_type,
                bank_account_type: BankAccountType::NotApplicable,
                bank_id: None,
                branch_id: None,
                account_key: None,
            };
        }

        Account {
            account_id,
            account_type,
            bank_account_type: node
                .value(&["ACCTTYPE"])
                .map(BankAccountType::from)
                .unwrap_or(BankAccountType::NotApplicable),
            bank_id: node.owned_value(&["BANKID"]),
            branch_id: node.owned_value(&["BRANCHID"]),
            account_key: node.owned_value(&["ACCTKEY"]),
        }
    }
}

impl Balance {
    /// A missing available balance section means zero with no date; a
    /// section without an amount is an error.
    pub(super) fn from_nodes(ledger: &Node, available: Option<&Node>) -> StatementResult<Self> {
        let ledger_balance = parse_decimal(ledger.value(&["BALAMT"]), "Ledger balance")?;
        let ledger_balance_date = parse_date(ledger.value(&["DTASOF"]))?;

        let (available_balance, available_balance_date) = match available {
            Some(node) => (
                parse_decimal(node.value(&["BALAMT"]), "Available balance")?,
                parse_date(node.value(&["DTASOF"]))?,
            ),
            None => (Decimal::ZERO, None),
        };

        Ok(Balance {
            ledger_balance,
            ledger_balance_date,
            available_balance,
            available_balance_date,
        })
    }
}

impl Transaction {
    pub(super) fn from_node(node: &Node, currency: &str) -> StatementResult<Self> {
        Ok(Transaction {
            transaction_type: node.value(&["TRNTYPE"]).unwrap_or_default().to_string(),
            date: parse_date(node.value(&["DTPOSTED"]))?,
            user_date: parse_date(node.value(&["DTUSER"]))?,
            available_date: parse_date(node.value(&["DTAVAIL"]))?,
            amount: parse_decimal(node.value(&["TRNAMT"]), "Transaction amount")?,
            currency: currency.to_string(),
            fitid: node.owned_value(&["FITID"]),
            correct_fitid: node.owned_value(&["CORRECTFITID"]),
            correct_action: node.owned_value(&["CORRECTACTION"]),
            server_transaction_id: node.owned_value(&["SRVRTID"]),
            check_number: node.owned_value(&["CHECKNUM"]),
            reference_number: node.owned_value(&["REFNUM"]),
            sic: node.owned_value(&["SIC"]),
            payee_id: node.owned_value(&["PAYEEID"]),
            payee: node.owned_value(&["NAME"]),
            memo: node.owned_value(&["MEMO"]),
        })
    }
}
