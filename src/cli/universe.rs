use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::settings::universe_path;
use crate::universe::Universe;

pub fn run(search: Option<&str>) -> Result<()> {
    let mut universe = Universe::new(universe_path());
    let needle = search.map(str::to_lowercase);

    let mut table = Table::new();
    table.set_header(vec!["", "Name", "Ticker", "Country", "Sector"]);
    let mut shown = 0;
    for company in universe.load() {
        if let Some(q) = &needle {
            let haystack = format!(
                "{} {} {} {}",
                company.name, company.ticker, company.sector, company.subsector
            )
            .to_lowercase();
            if !haystack.contains(q.as_str()) {
                continue;
            }
        }
        table.add_row(vec![
            Cell::new(&company.emoji),
            Cell::new(&company.name),
            Cell::new(&company.ticker),
            Cell::new(&company.country),
            Cell::new(&company.sector),
        ]);
        shown += 1;
    }

    if shown == 0 {
        println!("No companies match.");
    } else {
        println!("Companies\n{table}");
    }
    Ok(())
}
