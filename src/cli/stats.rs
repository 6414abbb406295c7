use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::money;
use crate::ledger::Ledger;
use crate::settings::donations_path;

pub fn run() -> Result<()> {
    let ledger = Ledger::new(donations_path());
    let stats = ledger.load_stats();

    if stats.top.is_empty() {
        println!("No donations recorded yet. Try `auguri give \"Tesla=50\"`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Brand", "Total"]);
    for row in &stats.top {
        table.add_row(vec![Cell::new(&row.brand), Cell::new(money(row.amount))]);
    }
    println!("Top brands\n{table}");

    let mut codes = Table::new();
    codes.set_header(vec!["Gift Code"]);
    for code in &stats.codes {
        codes.add_row(vec![Cell::new(code)]);
    }
    println!("\nGift codes ({})\n{codes}", stats.codes.len());
    Ok(())
}
