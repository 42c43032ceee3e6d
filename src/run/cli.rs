use anyhow::{Context, Result};
use base64::Engine;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::ai::{goals_prompt, insights_prompt, Gemini, ReceiptScanner, TextGenerator};
use crate::analytics::{
    cash_flow_history, category_rollup, daily_balance_trend, is_savings_adjustment, month_agenda,
    month_comparison, savings_adjustment, top_transactions, FinanceSummary, MonthTotals,
};
use crate::config::Config;
use crate::db::Database;
use crate::import::{
    decode_statement, parse_invoice_text, parse_statement, receipt_to_transaction, ImportPlan,
};
use crate::models::{
    Goal, RecurringTransaction, Session, SessionStore, Transaction, TransactionFilter, User,
};
use crate::normalize::{normalize_amount, normalize_date, sanitize_text};
use crate::suggest::suggest_recurring;

const MANUAL_ORIGIN: &str = "Manual";
const REPORT_MONTHS: u32 = 6;
const TOP_N: usize = 5;

pub(crate) fn as_cli(args: &[String], config: &Config) -> Result<()> {
    let store = SessionStore::new(&config.session_path);
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };
    let rest = &args[2..];

    match command.as_str() {
        "login" => cli_login(rest, &store),
        "logout" => {
            store.clear()?;
            println!("Logged out");
            Ok(())
        }
        "whoami" => cli_whoami(&store, &config.data_dir),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("finbr {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            let session = require_session(&store)?;
            let mut db = Database::open(&config.db_path)?;
            let ctx = Ctx {
                user_id: session.user_id(),
                db: &mut db,
                config,
            };
            dispatch(other, rest, ctx)
        }
    }
}

/// Everything a user-scoped command needs.
struct Ctx<'a> {
    user_id: &'a str,
    db: &'a mut Database,
    config: &'a Config,
}

fn dispatch(command: &str, args: &[String], ctx: Ctx<'_>) -> Result<()> {
    match command {
        "import" => cli_import(args, ctx),
        "invoice" => cli_invoice(args, ctx),
        "add" => cli_add(args, ctx),
        "receipt" => cli_receipt(args, ctx),
        "list" | "ls" => cli_list(args, ctx),
        "delete" => cli_delete(args, ctx),
        "delete-all" => cli_delete_all(args, ctx),
        "summary" | "s" => cli_summary(ctx),
        "report" => cli_report(ctx),
        "agenda" => cli_agenda(args, ctx),
        "suggest" => cli_suggest(args, ctx),
        "goals" => cli_goals(args, ctx),
        "recurring" => cli_recurring(args, ctx),
        "savings-adjust" => cli_savings_adjust(args, ctx),
        "advice" => cli_advice(args, ctx),
        "export" => cli_export(args, ctx),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("finbr - personal finance tracker");
    println!();
    println!("Usage: finbr <command>");
    println!();
    println!("Session:");
    println!("  login <user-id> <name> <email>   Sign in");
    println!("  logout                           Sign out");
    println!("  whoami                           Show the signed-in user");
    println!();
    println!("Transactions:");
    println!("  import <file>                    Import a bank statement (CSV or semicolon export)");
    println!("    --delimiter <;|,>              Force the field delimiter");
    println!("    --skip-duplicates              Import only the rows not already stored");
    println!("  invoice <file> --year <YYYY>     Import pasted credit-card invoice text");
    println!("    --skip-duplicates              Import only the rows not already stored");
    println!("  add <date> <description> <amount>");
    println!("    --origin <name>                Origin label (default: Manual)");
    println!("    --card | --savings             Ledger (default: checking)");
    println!("    --installment <i/n>            Installment position");
    println!("  receipt <image>                  Read a receipt photo with OCR");
    println!("    --mime <type>                  Image type (default: from extension)");
    println!("    --save                         Store the extracted transaction");
    println!("  list [--month <YYYY-MM>]         List transactions");
    println!("    --search <text>                Description or origin contains text");
    println!("    --from <YYYY-MM-DD>            On or after this date");
    println!("    --to <YYYY-MM-DD>              On or before this date");
    println!("    --min <value> --max <value>    Absolute value range");
    println!("  delete <id>                      Delete one transaction");
    println!("  delete-all --yes                 Delete every transaction");
    println!("  export [path]                    Export transactions to CSV");
    println!("    --month <YYYY-MM>              Only this month");
    println!();
    println!("Analysis:");
    println!("  summary                          Balance, month totals, card and savings");
    println!("  report                           Categories, trend, comparison, cash flow");
    println!("  agenda [YYYY-MM]                 Day-by-day calendar with bills due");
    println!("  suggest [--accept <n>]           Recurring bill candidates");
    println!("  savings-adjust [--clean]         Zero the savings balance");
    println!("  advice [insights|goals]          AI advice");
    println!();
    println!("Planning:");
    println!("  goals                            List goals");
    println!("  goals add <title> <target> [--color <hex>]");
    println!("  goals contribute <id> <amount>   Add (or withdraw) from a goal");
    println!("  goals delete <id>");
    println!("  recurring                        List bill reminders");
    println!("  recurring add <title> <amount> <day> [--category <name>]");
    println!("  recurring toggle <id>            Pause or resume");
    println!("  recurring delete <id>");
    println!();
    println!("  --help, -h                       Show this help");
    println!("  --version, -V                    Show version");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

/// Flags that consume the argument after them.
const VALUE_FLAGS: &[&str] = &[
    "--delimiter",
    "--year",
    "--origin",
    "--installment",
    "--mime",
    "--month",
    "--color",
    "--category",
    "--accept",
    "--search",
    "--from",
    "--to",
    "--min",
    "--max",
];

fn first_positional(args: &[String]) -> Option<&str> {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if !arg.starts_with("--") {
            return Some(arg);
        }
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        }
    }
    None
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_month(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{raw}', expected YYYY-MM"))
}

fn parse_installment(raw: &str) -> Result<(u32, u32)> {
    let (index, total) = raw
        .split_once('/')
        .ok_or_else(|| anyhow::anyhow!("Invalid installment '{raw}', expected i/n"))?;
    Ok((index.trim().parse()?, total.trim().parse()?))
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "image/jpeg",
    }
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

fn money(value: Decimal) -> String {
    format!("R$ {:.2}", value)
}

fn block_on<F: std::future::Future>(future: F) -> Result<F::Output> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    Ok(runtime.block_on(future))
}

// ── Session ──────────────────────────────────────────────────

fn require_session(store: &SessionStore) -> Result<Session> {
    store
        .load()?
        .ok_or_else(|| anyhow::anyhow!("Not logged in. Run: finbr login <user-id> <name> <email>"))
}

fn cli_login(args: &[String], store: &SessionStore) -> Result<()> {
    let [id, name, email, ..] = args else {
        anyhow::bail!("Usage: finbr login <user-id> <name> <email>");
    };
    let session = Session::new(User {
        id: id.clone(),
        name: name.clone(),
        email: email.clone(),
    });
    store.save(&session)?;
    println!("Logged in as {name} <{email}>");
    Ok(())
}

fn cli_whoami(store: &SessionStore, data_dir: &Path) -> Result<()> {
    match store.load()? {
        Some(session) => println!(
            "{} <{}> (id {}), data in {}",
            session.user.name,
            session.user.email,
            session.user.id,
            data_dir.display()
        ),
        None => println!("Not logged in"),
    }
    Ok(())
}

// ── Import ───────────────────────────────────────────────────

fn cli_import(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    let Some(file_path) = first_positional(args) else {
        anyhow::bail!("Usage: finbr import <file> [--delimiter ;|,] [--skip-duplicates]");
    };
    let delimiter = match flag(args, "--delimiter") {
        Some(";") => Some(b';'),
        Some(",") => Some(b','),
        Some(other) => anyhow::bail!("Unsupported delimiter '{other}', use ';' or ','"),
        None => None,
    };

    let path = Path::new(file_path);
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read file: {file_path}"))?;
    let text = decode_statement(&bytes);
    let txns = parse_statement(&text, ctx.user_id, delimiter)?;
    println!("Parsed {} transactions", txns.len());

    commit_batch(ctx, txns, has_flag(args, "--skip-duplicates"))
}

fn cli_invoice(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    let (Some(file_path), Some(year)) = (first_positional(args), flag(args, "--year")) else {
        anyhow::bail!("Usage: finbr invoice <file> --year <YYYY> [--skip-duplicates]");
    };
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year: {year}"))?;

    let bytes =
        std::fs::read(file_path).with_context(|| format!("Failed to read file: {file_path}"))?;
    let text = decode_statement(&bytes);
    let txns = parse_invoice_text(&text, year, ctx.user_id)?;
    println!("Parsed {} invoice lines", txns.len());

    commit_batch(ctx, txns, has_flag(args, "--skip-duplicates"))
}

/// Check a parsed batch for duplicates, then store it in one transaction.
fn commit_batch(ctx: Ctx<'_>, txns: Vec<Transaction>, skip_duplicates: bool) -> Result<()> {
    let existing = ctx.db.list_transactions(ctx.user_id, None)?;
    let plan = ImportPlan::classify(&existing, txns);

    if plan.has_duplicates() {
        println!("{} duplicate(s) already stored:", plan.duplicate_count());
        for t in &plan.duplicates {
            println!("  {}  {:<40} {:>12}", t.date, t.description, money(t.amount));
        }
        if !skip_duplicates {
            anyhow::bail!(
                "Nothing imported. Re-run with --skip-duplicates to import the {} new transaction(s)",
                plan.new_count()
            );
        }
    }

    let count = ctx.db.insert_transactions(&plan.unique)?;
    info!(
        imported = count,
        duplicates = plan.duplicate_count(),
        "Import committed"
    );
    println!(
        "Imported {count} new transactions ({} duplicates skipped)",
        plan.duplicate_count()
    );
    Ok(())
}

fn cli_add(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    let [date, description, amount, flags @ ..] = args else {
        anyhow::bail!(
            "Usage: finbr add <date> <description> <amount> [--origin X] [--card] [--savings] [--installment i/n]"
        );
    };
    let origin = flag(flags, "--origin").unwrap_or(MANUAL_ORIGIN);
    let mut txn = Transaction::new(
        ctx.user_id,
        normalize_date(date),
        sanitize_text(description),
        sanitize_text(origin),
        normalize_amount(amount),
    );
    txn.is_credit_card = has_flag(flags, "--card");
    txn.is_savings = has_flag(flags, "--savings");
    if let Some(raw) = flag(flags, "--installment") {
        let (index, total) = parse_installment(raw)?;
        txn.installment_index = Some(index);
        txn.installment_total = Some(total);
    }

    ctx.db.insert_transactions(std::slice::from_ref(&txn))?;
    println!(
        "Added {} {} {} [{}] ({})",
        txn.date,
        txn.description,
        money(txn.amount),
        txn.ledger(),
        txn.id
    );
    Ok(())
}

fn cli_receipt(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    let Some(file_path) = first_positional(args) else {
        anyhow::bail!("Usage: finbr receipt <image> [--mime image/jpeg] [--save]");
    };
    let path = Path::new(file_path);
    let mime = flag(args, "--mime").unwrap_or_else(|| mime_for(path));
    let image = std::fs::read(path).with_context(|| format!("Failed to read image: {file_path}"))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(image);

    let gemini = Gemini::new(&ctx.config.ai)?;
    let receipt = match block_on(gemini.scan(&encoded, mime))? {
        Ok(receipt) => receipt,
        Err(e) => {
            warn!(error = %e, "Receipt OCR failed");
            println!("Could not read the receipt ({e}). Enter it manually with `finbr add`.");
            return Ok(());
        }
    };

    let txn = receipt_to_transaction(&receipt, ctx.user_id);
    println!("Date:        {}", txn.date);
    println!("Description: {}", txn.description);
    println!("Origin:      {}", txn.origin);
    println!("Value:       {}", money(txn.amount));

    if has_flag(args, "--save") {
        ctx.db.insert_transactions(std::slice::from_ref(&txn))?;
        println!("Saved ({})", txn.id);
    }
    Ok(())
}

// ── Listing ──────────────────────────────────────────────────

fn cli_list(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    let month = flag(args, "--month");
    let filter = transaction_filter(args)?;
    let mut txns = ctx.db.list_transactions(ctx.user_id, month)?;
    if !filter.is_empty() {
        txns.retain(|t| filter.matches(t));
    }
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!(
        "{:<36} {:<10} {:<34} {:<18} {:>14} Ledger",
        "ID", "Date", "Description", "Origin", "Value"
    );
    println!("{}", "─".repeat(125));
    for t in &txns {
        let installment = match (t.installment_index, t.installment_total) {
            (Some(i), Some(n)) => format!(" {i}/{n}"),
            _ => String::new(),
        };
        println!(
            "{:<36} {:<10} {:<34} {:<18} {:>14} {}{installment}",
            t.id,
            t.date,
            truncate(&t.description, 34),
            truncate(&t.origin, 18),
            money(t.amount),
            t.ledger()
        );
    }
    Ok(())
}

fn transaction_filter(args: &[String]) -> Result<TransactionFilter> {
    let date = |name: &str| -> Result<Option<NaiveDate>> {
        flag(args, name)
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .with_context(|| format!("Invalid {name} date '{raw}', expected YYYY-MM-DD"))
            })
            .transpose()
    };
    let value = |name: &str| -> Result<Option<Decimal>> {
        flag(args, name)
            .map(|raw| {
                Decimal::from_str(raw).with_context(|| format!("Invalid {name} value '{raw}'"))
            })
            .transpose()
    };
    Ok(TransactionFilter {
        search: flag(args, "--search").map(str::to_string),
        date_from: date("--from")?,
        date_to: date("--to")?,
        min_value: value("--min")?,
        max_value: value("--max")?,
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

fn cli_delete(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    let Some(id) = first_positional(args) else {
        anyhow::bail!("Usage: finbr delete <id>");
    };
    if ctx.db.delete_transaction(ctx.user_id, id)? {
        println!("Deleted {id}");
        Ok(())
    } else {
        anyhow::bail!("Transaction not found: {id}")
    }
}

fn cli_delete_all(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    if !has_flag(args, "--yes") {
        anyhow::bail!("This deletes every transaction. Confirm with: finbr delete-all --yes");
    }
    let removed = ctx.db.delete_all_transactions(ctx.user_id)?;
    println!("Deleted {removed} transactions");
    Ok(())
}

fn cli_export(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    let month = flag(args, "--month");
    let output_path = first_positional(args).map(shellexpand).unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/finbr-export-{}.csv", month.unwrap_or("all"))
    });

    let txns = ctx.db.list_transactions(ctx.user_id, month)?;
    let count = super::export::export_to_csv(Path::new(&output_path), &txns)?;
    println!("Exported {count} transactions to {output_path}");
    Ok(())
}

// ── Analysis ─────────────────────────────────────────────────

fn print_totals(label: &str, totals: &MonthTotals) {
    println!(
        "  {label:<10} income {:>14}   expenses {:>14}   net {:>14}",
        money(totals.income),
        money(totals.expenses),
        money(totals.net())
    );
}

fn cli_summary(ctx: Ctx<'_>) -> Result<()> {
    let txns = ctx.db.list_transactions(ctx.user_id, None)?;
    let summary = FinanceSummary::compute(&txns, today());

    println!("finbr - {}", summary.month);
    println!("{}", "─".repeat(44));
    println!("  Balance:             {:>14}", money(summary.balance));
    println!("  Income:              {:>14}", money(summary.month_totals.income));
    println!("  Expenses:            {:>14}", money(summary.month_totals.expenses));
    println!("  Net:                 {:>14}", money(summary.month_totals.net()));
    println!();
    println!("Credit card:");
    println!("  Billed:              {:>14}", money(summary.card.billed));
    println!("  Future installments: {:>14}", money(summary.card.future_installments));
    println!();
    println!("Savings:");
    println!("  Balance:             {:>14}", money(summary.savings.balance));
    println!("  Deposits:            {:>14}", money(summary.savings.deposits));
    println!("  Withdrawals:         {:>14}", money(summary.savings.withdrawals));
    Ok(())
}

fn cli_report(ctx: Ctx<'_>) -> Result<()> {
    let txns = ctx.db.list_transactions(ctx.user_id, None)?;
    let today = today();

    let comparison = month_comparison(&txns, today);
    println!("Month over month:");
    print_totals(&comparison.current_month, &comparison.current);
    print_totals(&comparison.previous_month, &comparison.previous);

    let categories = category_rollup(&txns);
    if !categories.is_empty() {
        println!();
        println!("Top spending origins:");
        for c in &categories {
            println!("  {:<28} {:>14} {:>6}%", c.origin, money(c.total), c.percentage);
        }
    }

    println!();
    println!("Daily balance ({}):", comparison.current_month);
    for point in daily_balance_trend(&txns, today) {
        println!("  {:>2}  {:>14}", point.day, money(point.balance));
    }

    println!();
    println!("Cash flow, last {REPORT_MONTHS} months:");
    for flow in cash_flow_history(&txns, today, REPORT_MONTHS) {
        print_totals(&flow.month, &flow.totals);
    }

    let top = top_transactions(&txns, TOP_N);
    println!();
    println!("Largest incomes:");
    for t in &top.incomes {
        println!("  {}  {:<40} {:>14}", t.date, truncate(&t.description, 40), money(t.amount));
    }
    println!("Largest expenses:");
    for t in &top.expenses {
        println!("  {}  {:<40} {:>14}", t.date, truncate(&t.description, 40), money(t.amount));
    }
    Ok(())
}

fn cli_agenda(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    let month = match first_positional(args) {
        Some(raw) => parse_month(raw)?,
        None => today(),
    };
    let txns = ctx.db.list_transactions(ctx.user_id, None)?;
    let recurring = ctx.db.list_recurring(ctx.user_id)?;

    for day in month_agenda(&txns, &recurring, month) {
        if day.transactions.is_empty() && day.bills.is_empty() {
            continue;
        }
        println!("{}", day.date);
        for bill in &day.bills {
            println!("  [bill] {:<38} {:>14}", bill.title, money(bill.amount));
        }
        for t in &day.transactions {
            println!("         {:<38} {:>14}", truncate(&t.description, 38), money(t.amount));
        }
    }
    Ok(())
}

fn cli_suggest(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    let txns = ctx.db.list_transactions(ctx.user_id, None)?;
    let suggestions = suggest_recurring(&txns);
    if suggestions.is_empty() {
        println!("No recurring patterns found");
        return Ok(());
    }

    if let Some(raw) = flag(args, "--accept") {
        let n: usize = raw
            .parse()
            .with_context(|| format!("Invalid suggestion number: {raw}"))?;
        let suggestion = n
            .checked_sub(1)
            .and_then(|i| suggestions.get(i))
            .ok_or_else(|| anyhow::anyhow!("No suggestion #{n}"))?;
        let recurring = suggestion.to_recurring(ctx.user_id);
        ctx.db.insert_recurring(&recurring)?;
        println!("Added bill reminder '{}' on day {}", recurring.title, recurring.due_day);
        return Ok(());
    }

    println!(
        "{:<3} {:<32} {:<18} {:>14} {:>4} {:>5} {:>7}",
        "#", "Title", "Origin", "Average", "Day", "Times", "Consist"
    );
    for (i, s) in suggestions.iter().enumerate() {
        println!(
            "{:<3} {:<32} {:<18} {:>14} {:>4} {:>5} {:>6}%",
            i + 1,
            truncate(&s.title, 32),
            truncate(&s.origin, 18),
            money(s.average_value),
            s.suggested_day,
            s.occurrence_count,
            s.consistency_pct
        );
    }
    Ok(())
}

fn cli_savings_adjust(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    if has_flag(args, "--clean") {
        let removed = ctx.db.delete_savings_adjustments(ctx.user_id)?;
        println!("Removed {removed} savings adjustment(s)");
    }

    let txns = ctx.db.list_transactions(ctx.user_id, None)?;
    let earlier = txns.iter().filter(|t| is_savings_adjustment(t)).count();
    if earlier > 0 {
        println!("{earlier} earlier adjustment(s) kept; use --clean to replace them");
    }
    let date = today().format("%Y-%m-%d").to_string();
    match savings_adjustment(&txns, ctx.user_id, &date) {
        Some(adjustment) => {
            ctx.db.insert_transactions(std::slice::from_ref(&adjustment))?;
            println!("Savings balance zeroed with an entry of {}", money(adjustment.amount));
        }
        None => println!("Savings balance is already zero"),
    }
    Ok(())
}

// ── Planning ─────────────────────────────────────────────────

fn cli_goals(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    match args.first().map(String::as_str) {
        None => {
            let goals = ctx.db.list_goals(ctx.user_id)?;
            if goals.is_empty() {
                println!("No goals");
            }
            for g in &goals {
                println!(
                    "{}  {:<28} {:>14} / {:>14}  {:>5}%",
                    g.id,
                    truncate(&g.title, 28),
                    money(g.current_amount),
                    money(g.target_amount),
                    g.progress_pct()
                );
            }
            Ok(())
        }
        Some("add") => {
            let [_, title, target, flags @ ..] = args else {
                anyhow::bail!("Usage: finbr goals add <title> <target> [--color <hex>]");
            };
            let color = flag(flags, "--color").map(String::from);
            let goal = Goal::new(ctx.user_id, sanitize_text(title), normalize_amount(target), color);
            ctx.db.insert_goal(&goal)?;
            println!("Added goal '{}' ({})", goal.title, goal.id);
            Ok(())
        }
        Some("contribute") => {
            let [_, id, delta, ..] = args else {
                anyhow::bail!("Usage: finbr goals contribute <id> <amount>");
            };
            match ctx.db.contribute_to_goal(ctx.user_id, id, normalize_amount(delta))? {
                Some(current) => println!("Goal now at {}", money(current)),
                None => anyhow::bail!("Goal not found: {id}"),
            }
            Ok(())
        }
        Some("delete") => {
            let [_, id, ..] = args else {
                anyhow::bail!("Usage: finbr goals delete <id>");
            };
            if !ctx.db.delete_goal(ctx.user_id, id)? {
                anyhow::bail!("Goal not found: {id}");
            }
            println!("Deleted goal {id}");
            Ok(())
        }
        Some(other) => anyhow::bail!("Unknown goals command: {other}"),
    }
}

fn cli_recurring(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    match args.first().map(String::as_str) {
        None => {
            let bills = ctx.db.list_recurring(ctx.user_id)?;
            if bills.is_empty() {
                println!("No bill reminders");
            }
            for r in &bills {
                println!(
                    "{}  day {:>2}  {:<28} {:>14}  {:<12} {}",
                    r.id,
                    r.due_day,
                    truncate(&r.title, 28),
                    money(r.amount),
                    r.category,
                    if r.active { "active" } else { "paused" }
                );
            }
            Ok(())
        }
        Some("add") => {
            let [_, title, amount, day, flags @ ..] = args else {
                anyhow::bail!("Usage: finbr recurring add <title> <amount> <day> [--category <name>]");
            };
            let due_day: u32 = day
                .parse()
                .with_context(|| format!("Invalid due day: {day}"))?;
            let recurring = RecurringTransaction::new(
                ctx.user_id,
                sanitize_text(title),
                normalize_amount(amount),
                due_day,
                flag(flags, "--category").map(String::from),
            );
            ctx.db.insert_recurring(&recurring)?;
            println!("Added bill reminder '{}' ({})", recurring.title, recurring.id);
            Ok(())
        }
        Some("toggle") => {
            let [_, id, ..] = args else {
                anyhow::bail!("Usage: finbr recurring toggle <id>");
            };
            match ctx.db.toggle_recurring(ctx.user_id, id)? {
                Some(true) => println!("Resumed {id}"),
                Some(false) => println!("Paused {id}"),
                None => anyhow::bail!("Bill reminder not found: {id}"),
            }
            Ok(())
        }
        Some("delete") => {
            let [_, id, ..] = args else {
                anyhow::bail!("Usage: finbr recurring delete <id>");
            };
            if !ctx.db.delete_recurring(ctx.user_id, id)? {
                anyhow::bail!("Bill reminder not found: {id}");
            }
            println!("Deleted bill reminder {id}");
            Ok(())
        }
        Some(other) => anyhow::bail!("Unknown recurring command: {other}"),
    }
}

fn cli_advice(args: &[String], ctx: Ctx<'_>) -> Result<()> {
    let txns = ctx.db.list_transactions(ctx.user_id, None)?;
    let prompt = match first_positional(args).unwrap_or("insights") {
        "insights" => insights_prompt(&txns)?,
        "goals" => {
            let goals = ctx.db.list_goals(ctx.user_id)?;
            match goals_prompt(&goals, &txns)? {
                Some(prompt) => prompt,
                None => {
                    println!("{}", crate::ai::NO_GOALS_REPLY);
                    return Ok(());
                }
            }
        }
        other => anyhow::bail!("Unknown advice topic: {other} (use insights or goals)"),
    };

    let gemini = Gemini::new(&ctx.config.ai)?;
    match block_on(gemini.generate(&prompt))? {
        Ok(reply) => println!("{}", reply.trim()),
        Err(e) => {
            warn!(error = %e, "Advice request failed");
            println!("Could not get advice right now: {e}");
        }
    }
    Ok(())
}
