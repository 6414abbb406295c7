use colored::Colorize;
use rand::Rng;

use crate::cli::parse_selection;
use crate::codegen::generate_code;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::models::{Allocation, Lang};
use crate::settings::{donations_path, load_settings};

pub fn run(selections: &[String], lang: Option<&str>, guest_id: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let lang = Lang::from_code(lang.unwrap_or(&settings.lang));
    let allocations: Vec<Allocation> = selections.iter().map(|s| parse_selection(s)).collect();
    let guest_id = guest_id.map(str::to_string).unwrap_or_else(random_guest_id);

    let code = generate_code(&allocations, lang);
    let ledger = Ledger::new(donations_path());
    ledger.save(&guest_id, lang, &allocations, &code);

    println!("{}", code.green().bold());
    println!("Copy this code into your bank transfer note.");
    Ok(())
}

fn random_guest_id() -> String {
    let mut rng = rand::thread_rng();
    let tag: u32 = rng.gen_range(0..0x100_0000);
    format!("guest-{tag:06x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_guest_id_shape() {
        let id = random_guest_id();
        assert!(id.starts_with("guest-"));
        let tag = &id["guest-".len()..];
        assert_eq!(tag.len(), 6);
        assert!(tag.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
