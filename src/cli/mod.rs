use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::io::{Write, stdout};
use std::path::Path;

use crate::application::LedgerService;
use crate::domain::{AccountId, format_money, parse_money};
use crate::io::Exporter;

/// Phones registered by `init` when none are given.
pub const DEMO_PHONES: [&str; 3] = ["+992000000001", "+992000000002", "+992000000003"];

/// Wallet - in-process payment ledger
#[derive(Parser)]
#[command(name = "wallet")]
#[command(about = "Accounts, payments and favorites backed by a flat snapshot file")]
#[command(version)]
pub struct Cli {
    /// Snapshot file path
    #[arg(short, long, default_value = "data/export.txt")]
    pub data: String,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a fresh snapshot with the given accounts
    Init {
        /// Phones to register (defaults to three demo accounts)
        phones: Vec<String>,
    },

    /// Register a new account
    Register {
        /// Phone number (must be unique)
        phone: String,
    },

    /// Credit an account
    Deposit {
        account_id: AccountId,

        /// Amount (e.g., "50.00" or "50")
        amount: String,
    },

    /// Pay from an account
    Pay {
        account_id: AccountId,

        /// Amount (e.g., "50.00" or "50")
        amount: String,

        /// Payment category
        #[arg(short, long, default_value = "other")]
        category: String,
    },

    /// List accounts and balances
    Accounts,

    /// Export data to CSV or JSON
    Export {
        /// What to export: accounts, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let data = Path::new(&self.data);

        match self.command {
            Commands::Init { phones } => {
                let mut service = LedgerService::new();
                let phones = if phones.is_empty() {
                    DEMO_PHONES.iter().map(|p| p.to_string()).collect()
                } else {
                    phones
                };
                for phone in &phones {
                    service.register_account(phone)?;
                }
                save(&service, data)?;
                println!(
                    "Snapshot initialized: {} ({} accounts)",
                    data.display(),
                    phones.len()
                );
            }

            Commands::Register { phone } => {
                let mut service = load(data)?;
                let account = service.register_account(&phone)?;
                save(&service, data)?;
                println!("Registered account {}: {}", account.id, account.phone);
            }

            Commands::Deposit { account_id, amount } => {
                let mut service = load(data)?;
                let amount =
                    parse_money(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                service.deposit(account_id, amount)?;
                save(&service, data)?;
                let balance = service.find_account_by_id(account_id)?.balance;
                println!(
                    "Deposited {} to account {} (balance {})",
                    format_money(amount),
                    account_id,
                    format_money(balance)
                );
            }

            Commands::Pay {
                account_id,
                amount,
                category,
            } => {
                let mut service = load(data)?;
                let amount =
                    parse_money(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let payment = service.pay(account_id, amount, &category)?;
                save(&service, data)?;
                println!(
                    "Paid {} from account {} [{}] ({})",
                    format_money(payment.amount),
                    payment.account_id,
                    payment.category,
                    payment.id
                );
            }

            Commands::Accounts => {
                let service = load(data)?;
                run_accounts_command(&service);
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = load(data)?;
                run_export_command(&service, &export_type, output.as_deref())?;
            }
        }

        Ok(())
    }
}

/// Open the snapshot at `path`, or start empty when it does not exist yet.
fn load(path: &Path) -> Result<LedgerService> {
    let mut service = LedgerService::new();
    if path.exists() {
        service
            .import_from_file(path)
            .with_context(|| format!("Failed to load snapshot: {}", path.display()))?;
    }
    Ok(service)
}

fn save(service: &LedgerService, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    service
        .export_to_file(path)
        .with_context(|| format!("Failed to save snapshot: {}", path.display()))
}

fn run_accounts_command(service: &LedgerService) {
    if service.accounts().is_empty() {
        println!("No accounts found.");
        return;
    }

    println!("{:<6} {:<16} {:>14}", "ID", "PHONE", "BALANCE");
    println!("{}", "-".repeat(38));
    for account in service.accounts() {
        println!(
            "{:<6} {:<16} {:>14}",
            account.id,
            account.phone,
            format_money(account.balance)
        );
    }
}

fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "accounts" => {
            let count = exporter.export_accounts_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} accounts", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer)?;
            if output.is_some() {
                eprintln!(
                    "Exported full ledger: {} accounts, {} payments, {} favorites",
                    snapshot.accounts.len(),
                    snapshot.payments.len(),
                    snapshot.favorites.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: accounts, full",
                export_type
            );
        }
    }

    Ok(())
}
