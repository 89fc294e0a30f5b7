//! Handlers mapping each shell command onto a ledger store or summary call.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::cli::context::{CommandError, CommandResult, LoopControl, ShellContext};
use crate::cli::output;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::core::compute_summary;
use crate::domain::{Category, Identifiable, TransactionKind};
use crate::export::{
    default_report_name, export_to_path, text_report::history_line, CsvExport, ReportExporter,
    TextReport,
};
use crate::utils::build_info;

const MIN_PREFIX_LEN: usize = 4;

pub fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(CommandEntry::new(
        "help",
        "Show available commands",
        "help",
        cmd_help,
    ));
    registry.register(CommandEntry::new(
        "add-income",
        "Record income",
        "add-income <description> <amount> [YYYY-MM-DD]",
        cmd_add_income,
    ));
    registry.register(CommandEntry::new(
        "add-expense",
        "Record an expense in one of the fixed categories",
        "add-expense <description> <amount> <category> [YYYY-MM-DD]",
        cmd_add_expense,
    ));
    registry.register(CommandEntry::new(
        "remove",
        "Delete a transaction by id or unique id prefix",
        "remove <id>",
        cmd_remove,
    ));
    registry.register(CommandEntry::new(
        "list",
        "List transactions, optionally only one kind",
        "list [income|expense]",
        cmd_list,
    ));
    registry.register(CommandEntry::new(
        "summary",
        "Show totals, balance, savings rate and spending by category",
        "summary",
        cmd_summary,
    ));
    registry.register(CommandEntry::new(
        "report",
        "Write the text report",
        "report [path]",
        cmd_report,
    ));
    registry.register(CommandEntry::new(
        "export-csv",
        "Write every transaction as CSV",
        "export-csv [path]",
        cmd_export_csv,
    ));
    registry.register(CommandEntry::new(
        "categories",
        "List expense categories",
        "categories",
        cmd_categories,
    ));
    registry.register(CommandEntry::new(
        "version",
        "Show build information",
        "version",
        cmd_version,
    ));
    registry.register(CommandEntry::new(
        "exit",
        "Leave the shell",
        "exit",
        cmd_exit,
    ));
    registry.alias("quit", "exit");
    registry
}

fn cmd_help(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Commands");
    for entry in context.registry().list() {
        output::line(format!("  {:<60} {}", entry.usage, entry.description));
    }
    Ok(LoopControl::Continue)
}

fn cmd_add_income(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, 3, "add-income <description> <amount> [YYYY-MM-DD]")?;
    let amount = parse_amount(args[1])?;
    let date = parse_date(args.get(2).copied())?;
    let txn = context
        .store
        .add_transaction(TransactionKind::Income, args[0], amount, None, date)?;
    let money = context.report_context().money(txn.amount);
    output::success(format!(
        "Added income: {} - {} ({})",
        txn.description,
        money,
        txn.short_id()
    ));
    Ok(LoopControl::Continue)
}

fn cmd_add_expense(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(
        args,
        3,
        4,
        "add-expense <description> <amount> <category> [YYYY-MM-DD]",
    )?;
    let amount = parse_amount(args[1])?;
    let category: Category = args[2].parse()?;
    let date = parse_date(args.get(3).copied())?;
    let txn = context.store.add_transaction(
        TransactionKind::Expense,
        args[0],
        amount,
        Some(category),
        date,
    )?;
    let money = context.report_context().money(txn.amount);
    output::success(format!(
        "Added expense: {} - {} [{}] ({})",
        txn.description,
        money,
        category,
        txn.short_id()
    ));
    Ok(LoopControl::Continue)
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, 1, "remove <id>")?;
    let id = resolve_id(context, args[0])?;
    let removed = context.store.remove_transaction(id)?;
    output::success(format!(
        "Removed {}: {} ({})",
        removed.kind.label().to_lowercase(),
        removed.description,
        removed.short_id()
    ));
    Ok(LoopControl::Continue)
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 1, "list [income|expense]")?;
    let kinds: &[TransactionKind] = match args.first().map(|a| a.to_ascii_lowercase()) {
        None => &[TransactionKind::Income, TransactionKind::Expense],
        Some(kind) if kind == "income" => &[TransactionKind::Income],
        Some(kind) if kind == "expense" || kind == "expenses" => &[TransactionKind::Expense],
        Some(other) => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown transaction kind `{other}` (expected income or expense)"
            )))
        }
    };
    let ctx = context.report_context();
    for kind in kinds {
        output::section(format!("{} Entries", kind.label()));
        let entries = context.store.transactions_of(*kind);
        if entries.is_empty() {
            output::info("No entries recorded yet.");
        }
        for txn in entries {
            output::line(history_line(txn, &ctx));
        }
    }
    Ok(LoopControl::Continue)
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let ledger = context.store.ledger();
    let summary = compute_summary(ledger);
    let text = TextReport::summary_only().render(&summary, ledger, &context.report_context())?;
    output::line(text.trim_end());
    Ok(LoopControl::Continue)
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 1, "report [path]")?;
    write_export(context, &TextReport::default(), args.first().copied())
}

fn cmd_export_csv(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 0, 1, "export-csv [path]")?;
    write_export(context, &CsvExport, args.first().copied())
}

fn write_export(
    context: &ShellContext,
    exporter: &dyn ReportExporter,
    target: Option<&str>,
) -> CommandResult {
    let ctx = context.report_context();
    let path = match target {
        Some(path) => PathBuf::from(path),
        None => context
            .config()
            .resolve_report_dir()
            .join(default_report_name(ctx.generated_at, exporter.file_extension())),
    };
    let ledger = context.store.ledger();
    let summary = compute_summary(ledger);
    let written = export_to_path(exporter, &summary, ledger, &ctx, &path)?;
    output::success(format!("Report exported to {}", written.display()));
    Ok(LoopControl::Continue)
}

fn cmd_categories(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Expense Categories");
    for (index, category) in Category::ALL.iter().enumerate() {
        output::line(format!("  {:>2}. {}", index + 1, category));
    }
    Ok(LoopControl::Continue)
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::info(build_info::current().summary_line());
    Ok(LoopControl::Continue)
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Ok(LoopControl::Exit)
}

fn expect_args(args: &[&str], min: usize, max: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() < min || args.len() > max {
        return Err(CommandError::InvalidArguments(format!("usage: {usage}")));
    }
    Ok(())
}

/// Accepts `1234.5`, `1,234.50` and `$1,234.50`.
pub(crate) fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount")))
}

/// Parses `YYYY-MM-DD`, defaulting to today when absent.
pub(crate) fn parse_date(raw: Option<&str>) -> Result<NaiveDate, CommandError> {
    match raw {
        None => Ok(Local::now().date_naive()),
        Some(value) => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
            CommandError::InvalidArguments(format!("`{value}` is not a date (expected YYYY-MM-DD)"))
        }),
    }
}

fn resolve_id(context: &ShellContext, raw: &str) -> Result<Uuid, CommandError> {
    if let Ok(id) = Uuid::parse_str(raw.trim()) {
        return Ok(id);
    }
    let needle: String = raw.trim().chars().filter(|c| *c != '-').collect();
    if needle.len() < MIN_PREFIX_LEN {
        return Err(CommandError::InvalidArguments(format!(
            "id prefix `{raw}` is too short (need at least {MIN_PREFIX_LEN} characters)"
        )));
    }
    let matches = context.store.find_by_prefix(&needle);
    match matches.as_slice() {
        [] => Err(CommandError::InvalidArguments(format!(
            "no transaction id starts with `{raw}`"
        ))),
        [txn] => Ok(txn.id),
        many => Err(CommandError::InvalidArguments(format!(
            "id prefix `{raw}` matches {} transactions; use more characters",
            many.len()
        ))),
    }
}
