use crate::cli::parse_selection;
use crate::codegen::generate_code;
use crate::error::Result;
use crate::models::{Allocation, Lang};
use crate::settings::load_settings;

pub fn run(selections: &[String], lang: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let lang = Lang::from_code(lang.unwrap_or(&settings.lang));
    let allocations: Vec<Allocation> = selections.iter().map(|s| parse_selection(s)).collect();
    println!("{}", generate_code(&allocations, lang));
    Ok(())
}
