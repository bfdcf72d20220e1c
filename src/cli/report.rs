use std::collections::BTreeMap;

use colored::{ColoredString, Colorize};
use comfy_table::{Cell, CellAlignment, Table};

use treasurer::error::{Result, TreasurerError};
use treasurer::fmt::{money, money_or_blank, month_label};
use treasurer::models::{Category, CategoryType};
use treasurer::reports::{
    available_academic_years, budget_summary, format_academic_year, parse_academic_year,
    yearly_summary, BudgetLine, PeriodTotals, YearlySummary, UNASSIGNED,
};
use treasurer::storage::Storage;

fn category_name(categories: &[Category], id: &str) -> String {
    if id == UNASSIGNED {
        return "Unassigned".to_string();
    }
    categories
        .iter()
        .find(|c| c.id == id)
        .map_or_else(|| id.to_string(), |c| c.name.clone())
}

fn amount_cell(val: f64) -> Cell {
    Cell::new(money_or_blank(val)).set_alignment(CellAlignment::Right)
}

fn net_cell(val: f64) -> Cell {
    let text = money(val);
    let colored = if val >= 0.0 { text.green() } else { text.red() };
    Cell::new(colored).set_alignment(CellAlignment::Right)
}

type Totals = BTreeMap<String, f64>;

fn section(
    table: &mut Table,
    summary: &YearlySummary,
    categories: &[Category],
    title: ColoredString,
    ids: Vec<String>,
    pick: fn(&PeriodTotals) -> &Totals,
    total: fn(&PeriodTotals) -> f64,
) {
    table.add_row(vec![Cell::new(title)]);
    for id in &ids {
        let mut row = vec![Cell::new(format!("  {}", category_name(categories, id)))];
        row.extend(
            summary
                .months
                .iter()
                .map(|(_, m)| amount_cell(pick(m).get(id).copied().unwrap_or(0.0))),
        );
        row.push(amount_cell(pick(&summary.year).get(id).copied().unwrap_or(0.0)));
        table.add_row(row);
    }
    let mut totals = vec![Cell::new("  Total".bold())];
    totals.extend(summary.months.iter().map(|(_, m)| amount_cell(total(m))));
    totals.push(amount_cell(total(&summary.year)));
    table.add_row(totals);
}

pub fn yearly(year: Option<String>) -> Result<()> {
    let store = super::open_store()?;
    let storage = Storage::new(&store);
    let transactions = storage.transactions()?;
    let categories = storage.categories_with_defaults()?;

    let available = available_academic_years(&transactions);
    let academic_year = match year {
        Some(raw) => parse_academic_year(&raw)
            .ok_or_else(|| TreasurerError::Other(format!("Invalid academic year {raw:?}")))?,
        None => match available.first() {
            Some(y) => *y,
            None => {
                println!("No transactions. Run `treasurer import <file>` first.");
                return Ok(());
            }
        },
    };

    let summary = yearly_summary(&transactions, academic_year);

    let mut header = vec![Cell::new("Category")];
    header.extend(summary.months.iter().map(|(key, _)| {
        let label = month_label(key);
        Cell::new(label.get(..3).unwrap_or(&label).to_string())
    }));
    header.push(Cell::new("Total".bold()));

    let mut table = Table::new();
    table.set_header(header);

    section(
        &mut table,
        &summary,
        &categories,
        "INCOME".green().bold(),
        summary.active_income(&categories),
        |t| &t.income,
        |t| t.total_income,
    );
    section(
        &mut table,
        &summary,
        &categories,
        "EXPENSES".red().bold(),
        summary.active_expenses(&categories),
        |t| &t.expenses,
        |t| t.total_expenses,
    );

    let mut net = vec![Cell::new("NET".bold())];
    net.extend(summary.months.iter().map(|(_, m)| net_cell(m.net_change())));
    net.push(net_cell(summary.year.net_change()));
    table.add_row(net);

    println!(
        "Yearly Summary {}\n{table}",
        format_academic_year(academic_year)
    );
    if available.len() > 1 {
        let years: Vec<String> = available.iter().map(|y| format_academic_year(*y)).collect();
        println!("Available years: {}", years.join(", "));
    }
    Ok(())
}

fn budget_rows(table: &mut Table, lines: &[&BudgetLine], above: &str, below: &str) {
    for line in lines {
        let direction = if line.variance >= 0.0 { above } else { below };
        let percent = format!("{:.0}% {direction}", line.variance_percent());
        table.add_row(vec![
            Cell::new(format!("  {}", line.category_name)),
            Cell::new(money(line.budgeted)).set_alignment(CellAlignment::Right),
            Cell::new(money(line.actual)).set_alignment(CellAlignment::Right),
            net_cell(line.variance),
            Cell::new(if line.variance >= 0.0 { percent.green() } else { percent.red() }),
        ]);
    }
}

pub fn budget() -> Result<()> {
    let store = super::open_store()?;
    let storage = Storage::new(&store);
    let lines = budget_summary(
        &storage.transactions()?,
        &storage.categories_with_defaults()?,
        &storage.budgeted_amounts()?,
    );

    let of_type = |t: CategoryType| -> Vec<&BudgetLine> {
        lines
            .iter()
            .filter(|l| l.category_type == t && l.is_active())
            .collect()
    };
    let income = of_type(CategoryType::Income);
    let expenses = of_type(CategoryType::Expense);

    if income.is_empty() && expenses.is_empty() {
        println!("No budgets or categorized transactions yet.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Category", "Budgeted", "Actual", "Variance", ""]);
    table.add_row(vec![Cell::new("INCOME".green().bold())]);
    budget_rows(&mut table, &income, "above", "below");
    table.add_row(vec![Cell::new("EXPENSES".red().bold())]);
    budget_rows(&mut table, &expenses, "under", "over");

    println!("Budget Summary\n{table}");
    Ok(())
}
