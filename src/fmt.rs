/// Format an amount as euros with thousands separators: €1,234.56
///
/// Ledger amounts are filtered to positive values before persistence, so no
/// sign handling is needed here.
pub fn money(val: f64) -> String {
    let cents = format!("{:.2}", val);
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((&cents, "00"));

    let mut with_commas = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_commas.push(',');
        }
        with_commas.push(c);
    }
    let with_commas: String = with_commas.chars().rev().collect();

    format!("€{with_commas}.{dec_part}")
}
