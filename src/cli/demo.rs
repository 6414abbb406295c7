use crate::codegen::generate_code;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::models::{Allocation, Lang};
use crate::settings::donations_path;

// (guest, lang, selections) — enough spread to make the leaderboard interesting.
const SAMPLE_GIFTS: &[(&str, &str, &[(&str, f64)])] = &[
    ("zia-carla", "it", &[("Ferrari", 100.0), ("Nestlé", 20.0)]),
    ("uncle-bob", "en", &[("Apple", 30.0)]),
    ("cugino-marco", "it", &[("Apple", 30.0), ("Tesla", 50.0)]),
    ("college-friends", "en", &[("Disney", 75.0), ("Netflix", 25.0)]),
    ("nonna-pina", "it", &[("Ferrari", 150.0)]),
];

pub fn run() -> Result<()> {
    let ledger = Ledger::new(donations_path());
    for (guest, lang, picks) in SAMPLE_GIFTS {
        let allocations: Vec<Allocation> = picks
            .iter()
            .map(|(label, amount)| Allocation::new(*label, *amount))
            .collect();
        let lang = Lang::from_code(lang);
        let code = generate_code(&allocations, lang);
        ledger.save(guest, lang, &allocations, &code);
    }
    println!(
        "Seeded {} sample donations. Run `auguri stats` to see the leaderboard.",
        SAMPLE_GIFTS.len()
    );
    Ok(())
}
