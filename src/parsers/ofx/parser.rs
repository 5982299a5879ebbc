use log::debug;

use super::header;
use super::paths::{self, BANK_MESSAGES, CREDIT_CARD_MESSAGES, Section};
use super::tree::Node;
use super::types::parse_date;
use super::parse_tree;
use crate::errors::{StatementParseError, StatementResult};
use crate::parsers::traits::Parser;
use crate::types::{Account, AccountType, Balance, SignOn, StatementDocument, Transaction};

pub struct OfxParser;

impl Parser for OfxParser {
    type Output = StatementDocument;

    fn is_supported(filename: Option<&str>, content: &str) -> bool {
        if let Some(name) = filename {
            let ext = name.to_lowercase();
            if ext.ends_with(".qfx") || ext.ends_with(".ofx") {
                return true;
            }
        }

        let trimmed = content.trim();
        trimmed.contains("<OFX>")
            || trimmed.contains(header::LEGACY_MARKER)
            || trimmed.contains("DATA:OFXSGML")
    }

    fn parse(content: &str) -> StatementResult<Self::Output> {
        let (header, tree) = parse_tree(content)?;
        assemble(&tree, detect_account_type(content)?, header.version)
    }
}

/// Classifies the statement by its message set wrapper.
pub fn detect_account_type(markup: &str) -> StatementResult<AccountType> {
    if markup.contains(&format!("<{}>", CREDIT_CARD_MESSAGES)) {
        return Ok(AccountType::CreditCard);
    }

    if markup.contains(&format!("<{}>", BANK_MESSAGES)) {
        return Ok(AccountType::Bank);
    }

    Err(StatementParseError::UnsupportedAccountType(AccountType::Unknown))
}

fn section<'a>(
    tree: &'a Node,
    account_type: AccountType,
    section: Section,
) -> StatementResult<Option<&'a Node>> {
    Ok(tree.find(&paths::resolve(account_type, section)?))
}

fn assemble(
    tree: &Node,
    account_type: AccountType,
    version: String,
) -> StatementResult<StatementDocument> {
    debug!("Detected account type {:?}", account_type);

    let currency = section(tree, account_type, Section::Currency)?
        .and_then(Node::text)
        .filter(|text| !text.is_empty())
        .ok_or(StatementParseError::NotFound("Currency"))?
        .to_string();

    let sign_on = section(tree, account_type, Section::SignOn)?
        .ok_or(StatementParseError::NotFound("Sign on information"))
        .and_then(SignOn::from_node)?;

    let account = section(tree, account_type, Section::AccountInfo)?
        .map(|node| Account::from_node(node, account_type))
        .ok_or(StatementParseError::NotFound("Account information"))?;

    let (statement_start, statement_end, transactions) =
        match section(tree, account_type, Section::Transactions)? {
            Some(list) => {
                let transactions = list
                    .descendants("STMTTRN")
                    .into_iter()
                    .map(|node| Transaction::from_node(node, &currency))
                    .collect::<StatementResult<Vec<_>>>()?;
                debug!("Extracted {} transactions", transactions.len());

                (
                    parse_date(list.descendant("DTSTART").and_then(Node::text))?,
                    parse_date(list.descendant("DTEND").and_then(Node::text))?,
                    Some(transactions),
                )
            }
            None => (None, None, None),
        };

    let statement = section(tree, account_type, Section::Balance)?;
    let ledger = statement
        .and_then(|node| node.find(&["LEDGERBAL"]))
        .ok_or(StatementParseError::NotFound("Balance information"))?;
    let available = statement.and_then(|node| node.find(&["AVAILBAL"]));
    let balance = Balance::from_nodes(ledger, available)?;

    Ok(StatementDocument {
        version,
        statement_start,
        statement_end,
        account_type,
        currency,
        sign_on,
        account,
        balance,
        transactions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::parsers::ofx::{sgml, xml};
    use crate::types::BankAccountType;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const HEADER: &str = "OFXHEADER:100
DATA:OFXSGML
VERSION:102
SECURITY:NONE
ENCODING:USASCII
CHARSET:1252
COMPRESSION:NONE
OLDFILEUID:NONE
NEWFILEUID:NONE

";

    const SIGN_ON: &str = "<SIGNONMSGSRSV1>
<SONRS>
<STATUS>
<CODE>0
<SEVERITY>INFO
</STATUS>
<DTSERVER>20240209120000.000[-5:EST]
<LANGUAGE>ENG
</SONRS>
</SIGNONMSGSRSV1>";

    fn bank_statement(balances: &str, transactions: &str) -> String {
        format!(
            "{HEADER}<OFX>
{SIGN_ON}
<BANKMSGSRSV1>
<STMTTRNRS>
<TRNUID>1
<STATUS>
<CODE>0
<SEVERITY>INFO
</STATUS>
<STMTRS>
<CURDEF>USD
<BANKACCTFROM>
<BANKID>011000138
<BRANCHID>003
<ACCTID>0000000000003158
<ACCTTYPE>CHECKING
<ACCTKEY>3158
</BANKACCTFROM>
{transactions}
{balances}
</STMTRS>
</STMTTRNRS>
</BANKMSGSRSV1>
</OFX>
"
        )
    }

    const TRANSACTIONS: &str = "<BANKTRANLIST>
<DTSTART>20240111
<DTEND>20240206
<STMTTRN>
<TRNTYPE>DEBIT
<DTPOSTED>20240115
<TRNAMT>-50.00
<FITID>202401150
<NAME>Coffee Shop
<MEMO>Morning coffee
</STMTTRN>
<STMTTRN>
<TRNTYPE>CREDIT
<DTPOSTED>20240131
<TRNAMT>1500.00
<FITID>202401310
<NAME>ACME Corp
</STMTTRN>
</BANKTRANLIST>";

    const BALANCES: &str = "<LEDGERBAL>
<BALAMT>1327.42
<DTASOF>20240208
</LEDGERBAL>
<AVAILBAL>
<BALAMT>1327.42
<DTASOF>20240208
</AVAILBAL>";

    const SAMPLE_CC_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<OFX>
    <SIGNONMSGSRSV1>
        <SONRS>
            <STATUS><CODE>0</CODE><SEVERITY>INFO</SEVERITY></STATUS>
            <DTSERVER>20240105</DTSERVER>
            <LANGUAGE>ENG</LANGUAGE>
        </SONRS>
    </SIGNONMSGSRSV1>
    <CREDITCARDMSGSRSV1>
        <CCSTMTTRNRS>
            <CCSTMTRS>
                <CURDEF>USD</CURDEF>
                <CCACCTFROM><ACCTID>XXXXXXXXXXXX3158</ACCTID></CCACCTFROM>
                <BANKTRANLIST>
                    <STMTTRN>
                        <TRNTYPE>CREDIT</TRNTYPE>
                        <DTPOSTED>20231225120000</DTPOSTED>
                        <TRNAMT>1500.00</TRNAMT>
                        <FITID>202312250</FITID>
                        <NAME>ACME Corp</NAME>
                    </STMTTRN>
                </BANKTRANLIST>
                <LEDGERBAL><BALAMT>345</BALAMT><DTASOF>20240104</DTASOF></LEDGERBAL>
                <AVAILBAL><BALAMT>12000.00</BALAMT><DTASOF>20240104</DTASOF></AVAILBAL>
            </CCSTMTRS>
        </CCSTMTTRNRS>
    </CREDITCARDMSGSRSV1>
</OFX>"#;

    #[rstest]
    #[case(Some("test.qfx"), "", true)]
    #[case(Some("test.OFX"), "", true)]
    #[case(Some("test.csv"), "", false)]
    #[case(None, "<OFX>", true)]
    #[case(None, "OFXHEADER:", true)]
    #[case(None, "DATA:OFXSGML", true)]
    #[case(None, "random content", false)]
    fn test_is_supported(
        #[case] filename: Option<&str>,
        #[case] content: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(OfxParser::is_supported(filename, content), expected);
    }

    #[rstest]
    #[case("<OFX><CREDITCARDMSGSRSV1></CREDITCARDMSGSRSV1></OFX>", AccountType::CreditCard)]
    #[case("<OFX><BANKMSGSRSV1></BANKMSGSRSV1></OFX>", AccountType::Bank)]
    #[case("<BANKMSGSRSV1><CREDITCARDMSGSRSV1>", AccountType::CreditCard)]
    fn test_detect_account_type(#[case] markup: &str, #[case] expected: AccountType) {
        assert_eq!(detect_account_type(markup).unwrap(), expected);
    }

    #[test]
    fn test_detect_account_type_unsupported() {
        let error = detect_account_type("<OFX><INVSTMTMSGSRSV1></OFX>").unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_parse_bank_sgml_statement() {
        let document = OfxParser::parse(&bank_statement(BALANCES, TRANSACTIONS)).unwrap();

        assert_eq!(document.version, "102");
        assert_eq!(document.account_type, AccountType::Bank);
        assert_eq!(document.currency, "USD");
        assert_eq!(document.statement_start, NaiveDate::from_ymd_opt(2024, 1, 11));
        assert_eq!(document.statement_end, NaiveDate::from_ymd_opt(2024, 2, 6));

        assert_eq!(document.sign_on.server_date, NaiveDate::from_ymd_opt(2024, 2, 9));
        assert_eq!(document.sign_on.language.as_deref(), Some("ENG"));
        assert_eq!(document.sign_on.status_code, 0);
        assert_eq!(document.sign_on.status_severity.as_deref(), Some("INFO"));
        assert_eq!(document.sign_on.institution_id, None);

        assert_eq!(document.account.account_id.as_deref(), Some("0000000000003158"));
        assert_eq!(document.account.account_key.as_deref(), Some("3158"));
        assert_eq!(document.account.bank_account_type, BankAccountType::Checking);
        assert_eq!(document.account.bank_id.as_deref(), Some("011000138"));
        assert_eq!(document.account.branch_id.as_deref(), Some("003"));

        let amount = Decimal::from_str("1327.42").unwrap();
        let as_of = NaiveDate::from_ymd_opt(2024, 2, 8);
        assert_eq!(document.balance.ledger_balance, amount);
        assert_eq!(document.balance.ledger_balance_date, as_of);
        assert_eq!(document.balance.available_balance, amount);
        assert_eq!(document.balance.available_balance_date, as_of);

        let transactions = document.transactions.unwrap();
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].payee.as_deref(), Some("Coffee Shop"));
        assert_eq!(transactions[0].amount, Decimal::from_str("-50.00").unwrap());
        assert_eq!(transactions[1].transaction_type, "CREDIT");
        assert_eq!(transactions[1].currency, "USD");
    }

    #[test]
    fn test_parse_credit_card_xml_statement() {
        let document = OfxParser::parse(SAMPLE_CC_XML).unwrap();

        assert_eq!(document.account_type, AccountType::CreditCard);
        assert_eq!(document.version, "102");
        assert_eq!(document.account.account_id.as_deref(), Some("XXXXXXXXXXXX3158"));
        assert_eq!(document.account.bank_account_type, BankAccountType::NotApplicable);
        assert_eq!(document.account.bank_id, None);
        assert_eq!(document.account.branch_id, None);
        assert_eq!(document.account.account_key, None);

        assert_eq!(document.balance.ledger_balance, Decimal::from(345));
        assert_eq!(document.balance.available_balance, Decimal::from_str("12000.00").unwrap());
        assert_eq!(document.balance.available_balance_date, NaiveDate::from_ymd_opt(2024, 1, 4));
        assert_eq!(document.sign_on.server_date, NaiveDate::from_ymd_opt(2024, 1, 5));
        assert_eq!(document.statement_start, None);
        assert_eq!(document.transactions.map(|t| t.len()), Some(1));
    }

    #[test]
    fn test_parse_without_available_balance() {
        let ledger_only = "<LEDGERBAL>\n<BALAMT>10.50\n<DTASOF>20240208\n</LEDGERBAL>";
        let document = OfxParser::parse(&bank_statement(ledger_only, TRANSACTIONS)).unwrap();

        assert_eq!(document.balance.ledger_balance, Decimal::from_str("10.50").unwrap());
        assert_eq!(document.balance.ledger_balance_date, NaiveDate::from_ymd_opt(2024, 2, 8));
        assert_eq!(document.balance.available_balance, Decimal::ZERO);
        assert_eq!(document.balance.available_balance_date, None);
    }

    #[test]
    fn test_parse_without_transaction_list() {
        let document = OfxParser::parse(&bank_statement(BALANCES, "")).unwrap();
        assert!(document.transactions.is_none());
        assert_eq!(document.statement_start, None);
        assert_eq!(document.statement_end, None);
    }

    #[test]
    fn test_parse_empty_transaction_list() {
        let list = "<BANKTRANLIST>\n<DTSTART>20240111\n<DTEND>20240206\n</BANKTRANLIST>";
        let document = OfxParser::parse(&bank_statement(BALANCES, list)).unwrap();
        assert_eq!(document.transactions, Some(Vec::new()));
        assert_eq!(document.statement_end, NaiveDate::from_ymd_opt(2024, 2, 6));
    }

    #[rstest]
    #[case("<CURDEF>USD\n", "", "Currency")]
    #[case(SIGN_ON, "", "Sign on information")]
    #[case("BANKACCTFROM", "BANKACCTTO", "Account information")]
    fn test_parse_missing_mandatory_section(
        #[case] needle: &str,
        #[case] replacement: &str,
        #[case] expected: &str,
    ) {
        let content = bank_statement(BALANCES, TRANSACTIONS).replace(needle, replacement);

        match OfxParser::parse(&content).unwrap_err() {
            StatementParseError::NotFound(section) => assert_eq!(section, expected),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_ledger_balance() {
        let available_only = "<AVAILBAL>\n<BALAMT>1.00\n</AVAILBAL>";
        let result = OfxParser::parse(&bank_statement(available_only, TRANSACTIONS));
        assert!(matches!(
            result.unwrap_err(),
            StatementParseError::NotFound("Balance information")
        ));
    }

    #[test]
    fn test_parse_invalid_statement_date() {
        let content =
            bank_statement(BALANCES, TRANSACTIONS).replace("<DTEND>20240206", "<DTEND>20241306");
        assert!(matches!(
            OfxParser::parse(&content).unwrap_err(),
            StatementParseError::OfxDateInvalidFormat(_)
        ));
    }

    #[test]
    fn test_parse_invalid_header() {
        let content =
            bank_statement(BALANCES, TRANSACTIONS).replace("ENCODING:USASCII", "ENCODING:UTF-8");
        assert!(matches!(
            OfxParser::parse(&content).unwrap_err(),
            StatementParseError::InvalidHeader { index: 4, .. }
        ));
    }

    #[test]
    fn test_parse_unsupported_account_type() {
        let content =
            bank_statement(BALANCES, TRANSACTIONS).replace("BANKMSGSRSV1", "INVSTMTMSGSRSV1");
        let error = OfxParser::parse(&content).unwrap_err();
        assert!(matches!(error, StatementParseError::UnsupportedAccountType(AccountType::Unknown)));
        assert_eq!(error.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_normalizer_matches_xml_reader_on_well_formed_input() {
        let xml_tree = xml::parse(SAMPLE_CC_XML).unwrap();
        assert_eq!(sgml::normalize(SAMPLE_CC_XML), xml_tree);
    }
}
