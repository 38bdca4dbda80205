//! Terminal front end for the expense ledger.

use std::io::{self, BufRead as _, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, Table};
use expense_ledger::ledger::{LedgerSnapshot, LedgerStore, TransactionFilter};
use expense_ledger::models::{
    Category, Decimal, NaiveDate, NewTransaction, Theme, TransactionId, TransactionType,
};
use expense_ledger::session::{Command, Notice, Response, Session};
use expense_ledger::storage::{FileStorage, Storage};
use owo_colors::OwoColorize;

/// Display format for transaction dates.
const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

/// Expense ledger: record income and expenses, view balance and totals.
#[derive(Debug, Parser)]
#[command(name = "expense-ledger", version, about)]
struct Cli {
    /// Override the storage directory (default: XDG data dir).
    #[arg(long, global = true, value_name = "DIR", env = "EXPENSE_LEDGER_DIR")]
    data_dir: Option<PathBuf>,
    /// Currency symbol used when printing amounts.
    #[arg(long, global = true, env = "EXPENSE_LEDGER_CURRENCY", default_value = "\u{20b9}")]
    currency: String,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: CliCommand,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Record a new transaction.
    Add(AddArgs),
    /// List transactions with balance and totals.
    List(ListArgs),
    /// Delete a transaction by id.
    Delete {
        /// Identifier shown by `list`.
        id: String,
    },
    /// Delete all transactions.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Show or change the display theme.
    Theme {
        /// New theme (`light` or `dark`); omit to show the current one.
        theme: Option<Theme>,
    },
    /// List the available categories.
    Categories,
}

/// Arguments for the `add` subcommand.
#[derive(Debug, Args)]
struct AddArgs {
    /// What the transaction was for.
    #[arg(long, short)]
    description: String,
    /// Positive amount, e.g. 12.50.
    #[arg(long, short, allow_hyphen_values = true)]
    amount: String,
    /// Date (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    date: Option<String>,
    /// `income` or `expense`.
    #[arg(long = "type", short = 't', value_name = "TYPE", default_value = "expense")]
    kind: TransactionType,
    /// Category label (see `categories`).
    #[arg(long, short)]
    category: String,
    /// Optional note.
    #[arg(long, short, default_value = "")]
    note: String,
}

/// Arguments for the `list` subcommand.
#[derive(Debug, Args)]
struct ListArgs {
    /// `all`, `income` or `expense`.
    #[arg(long = "type", short = 't', value_name = "TYPE", default_value = "all")]
    kind: String,
    /// `all` or a category label.
    #[arg(long, short, default_value = "all")]
    category: String,
}

/// Runs the CLI, returning an appropriate exit code.
fn run() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let _dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    let storage = match create_storage(cli.data_dir) {
        Ok(storage) => storage,
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to initialize storage: {err}",
                "error:".red().bold()
            )?;
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut session = Session::new(LedgerStore::load(storage));
    execute(&mut session, cli.command, &cli.currency)
}

/// Creates the storage backend, using `data_dir` if provided or the
/// default XDG data directory otherwise.
fn create_storage(data_dir: Option<PathBuf>) -> expense_ledger::error::Result<FileStorage> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => FileStorage::default_dir()?,
    };
    FileStorage::new(dir)
}

/// Turns a subcommand into a session command, dispatches it and prints
/// the outcome.
fn execute<S: Storage>(
    session: &mut Session<S>,
    command: CliCommand,
    currency: &str,
) -> io::Result<ExitCode> {
    let command = match command {
        CliCommand::Add(args) => Command::Submit(NewTransaction {
            description: args.description,
            amount: args.amount,
            date: args.date,
            kind: args.kind,
            category: args.category,
            note: args.note,
        }),
        CliCommand::List(args) => {
            match TransactionFilter::from_selectors(&args.kind, &args.category) {
                Ok(filter) => Command::ChangeFilter(filter),
                Err(err) => {
                    writeln!(io::stderr().lock(), "{} {err}", "error:".red().bold())?;
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        CliCommand::Delete { id } => Command::Delete(TransactionId::new(id)),
        CliCommand::Clear { yes } => Command::ClearAll {
            confirmed: yes || confirm("Are you sure you want to delete all transactions?")?,
        },
        CliCommand::Theme { theme: None } => {
            writeln!(io::stdout().lock(), "{}", session.store().theme())?;
            return Ok(ExitCode::SUCCESS);
        }
        CliCommand::Theme { theme: Some(theme) } => Command::SetTheme(theme),
        CliCommand::Categories => {
            print_categories()?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    let show_table = matches!(command, Command::ChangeFilter(_));
    match session.dispatch(command) {
        Ok(response) => print_response(&response, show_table, currency),
        Err(err) => {
            writeln!(
                io::stderr().lock(),
                "{} failed to save ledger: {err}",
                "error:".red().bold()
            )?;
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Asks a yes/no question on stdin; anything but `y`/`yes` is a no.
fn confirm(question: &str) -> io::Result<bool> {
    let mut out = io::stdout().lock();
    write!(out, "{question} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    let _read = io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

// ── Output formatting ────────────────────────────────────────────────

/// Prints the notice of a response and, for listings, the table and
/// summary.
fn print_response(response: &Response, show_table: bool, currency: &str) -> io::Result<ExitCode> {
    match response.notice.as_ref() {
        Some(&Notice::Success(message)) => {
            writeln!(io::stdout().lock(), "{}", message.green())?;
        }
        Some(&Notice::Invalid { field, ref message }) => {
            writeln!(
                io::stderr().lock(),
                "{} {message} {}",
                "error:".red().bold(),
                format_args!("({field})").dimmed()
            )?;
            return Ok(ExitCode::FAILURE);
        }
        None => {}
    }
    if let Some(tx) = response.created.as_ref() {
        writeln!(io::stdout().lock(), "  {} {}", "id:".dimmed(), tx.id)?;
    }
    if show_table {
        print_transactions_table(&response.snapshot, currency)?;
    }
    print_summary(&response.snapshot, currency)?;
    Ok(ExitCode::SUCCESS)
}

/// Formats an amount with its direction sign and currency symbol.
fn format_signed(kind: TransactionType, amount: Decimal, currency: &str) -> String {
    let sign = match kind {
        TransactionType::Income => '+',
        TransactionType::Expense => '-',
    };
    format!("{sign}{currency}{:.2}", amount.abs())
}

/// Formats a date for display.
fn format_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE_FORMAT).to_string()
}

/// Prints the filtered transactions in a table.
fn print_transactions_table(snapshot: &LedgerSnapshot, currency: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if snapshot.transactions.is_empty() {
        writeln!(out, "{}", "No transactions found".dimmed())?;
        return Ok(());
    }

    let mut table = Table::new();
    _ = table.load_preset(UTF8_FULL);
    _ = table.set_header(vec![
        Cell::new("Date").fg(Color::Cyan),
        Cell::new("Description").fg(Color::Cyan),
        Cell::new("Category").fg(Color::Cyan),
        Cell::new("Amount").fg(Color::Cyan),
        Cell::new("Note").fg(Color::Cyan),
        Cell::new("Id").fg(Color::Cyan),
    ]);

    for tx in &snapshot.transactions {
        let color = match tx.kind {
            TransactionType::Income => Color::Green,
            TransactionType::Expense => Color::Red,
        };
        _ = table.add_row(vec![
            Cell::new(format_date(tx.date)),
            Cell::new(&tx.description),
            Cell::new(tx.category),
            Cell::new(format_signed(tx.kind, tx.amount, currency)).fg(color),
            Cell::new(&tx.note),
            Cell::new(&tx.id).fg(Color::DarkGrey),
        ]);
    }

    writeln!(out, "{table}")?;
    Ok(())
}

/// Prints balance, totals and the filtered count.
fn print_summary(snapshot: &LedgerSnapshot, currency: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let balance = format!("{currency}{:.2}", snapshot.balance);
    let balance = if snapshot.balance > Decimal::ZERO {
        balance.green().bold().to_string()
    } else if snapshot.balance < Decimal::ZERO {
        balance.red().bold().to_string()
    } else {
        balance.bold().to_string()
    };
    writeln!(out, "{} {balance}", "Balance:".bold())?;
    writeln!(
        out,
        "{} {}  {} {}",
        "Income:".bold(),
        format_args!("{currency}{:.2}", snapshot.totals.income).green(),
        "Expense:".bold(),
        format_args!("{currency}{:.2}", snapshot.totals.expense).red(),
    )?;
    writeln!(out, "{}", format_args!("Total: {}", snapshot.count).dimmed())?;
    Ok(())
}

/// Prints the category labels.
fn print_categories() -> io::Result<()> {
    let mut out = io::stdout().lock();
    for category in Category::ALL {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

/// Entry point.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            // Last-resort error output; if stderr itself failed, nothing
            // we can do.
            let _ignored = writeln!(io::stderr(), "fatal I/O error: {err}");
            ExitCode::FAILURE
        }
    }
}
