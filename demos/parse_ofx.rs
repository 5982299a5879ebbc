use ofx_statement_rs::{FileFormat, ParserBuilder};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let file_path = match args.get(1) {
        Some(path) => path.as_str(),
        None => {
            println!("Usage: cargo run --example parse_ofx [path/to/file.ofx] [--json]\n");
            "tests/fixtures/bank_transactions.ofx"
        }
    };
    let as_json = args.iter().any(|arg| arg == "--json");

    println!("Parsing OFX file: {}\n", file_path);

    let statement = ParserBuilder::new()
        .filename(file_path)
        .format(FileFormat::Ofx)
        .parse()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&statement)?);
        return Ok(());
    }

    println!("OFX version: {}", statement.version);
    println!("Account type: {:?}", statement.account_type);
    println!(
        "Account: {} ({:?})",
        statement.account.account_id.as_deref().unwrap_or("N/A"),
        statement.account.bank_account_type
    );
    if let Some(org) = &statement.sign_on.organization {
        println!("Institution: {}", org);
    }
    println!("Currency: {}", statement.currency);
    if let (Some(start), Some(end)) = (statement.statement_start, statement.statement_end) {
        println!("Period: {} to {}", start, end);
    }
    println!(
        "Ledger balance: {} (as of {})",
        statement.balance.ledger_balance,
        statement
            .balance
            .ledger_balance_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!("Available balance: {}\n", statement.balance.available_balance);

    let Some(transactions) = &statement.transactions else {
        println!("No transaction list in this statement");
        return Ok(());
    };

    println!("Found {} transactions\n", transactions.len());

    // Show first 10 transactions
    for (i, tx) in transactions.iter().take(10).enumerate() {
        println!("Transaction {}:", i + 1);
        if let Some(date) = tx.date {
            println!("  Date: {}", date);
        }
        println!("  Type: {}", tx.transaction_type);
        println!("  Amount: {} {}", tx.amount, tx.currency);
        if let Some(payee) = &tx.payee {
            println!("  Payee: {}", payee);
        }
        if let Some(fitid) = &tx.fitid {
            println!("  FITID: {}", fitid);
        }
        if let Some(memo) = &tx.memo {
            println!("  Memo: {}", memo);
        }
        println!();
    }

    if transactions.len() > 10 {
        println!("... and {} more transactions", transactions.len() - 10);
    }

    Ok(())
}
