use sha2::{Digest, Sha256};

use crate::models::{Allocation, Lang};

/// Substituted when no label survives sanitization.
const FALLBACK_TOKEN: &str = "LOVE";

/// Build the reference code a guest copies into their bank transfer note:
/// `#<PREFIX>-<TOTAL>-<TOKEN1>[-<TOKEN2>]-<6 hex>`.
///
/// Never fails: an empty or all-zero selection list still yields a
/// well-formed string with the `LOVE` token and a zero total. The
/// suffix hashes the current second along with the selections, so two calls
/// with identical input generally yield different codes. That is the whole
/// uniqueness mechanism: cosmetic distinctness, not a content fingerprint.
pub fn generate_code(selections: &[Allocation], lang: Lang) -> String {
    assemble(selections, lang, chrono::Utc::now().timestamp())
}

fn assemble(selections: &[Allocation], lang: Lang, unix_secs: i64) -> String {
    let filtered: Vec<&Allocation> = selections.iter().filter(|a| a.is_positive()).collect();

    // Rounding rule: half away from zero (f64::round), pinned by tests.
    let total = filtered.iter().map(|a| a.amount).sum::<f64>().round() as i64;

    let mut tokens: Vec<String> = filtered
        .iter()
        .map(|a| sanitize_label(&a.label))
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        tokens.push(FALLBACK_TOKEN.to_string());
    }
    tokens.truncate(2);

    let suffix = code_suffix(selections, unix_secs);

    format!(
        "#{}-{}-{}-{}",
        lang.code_prefix(),
        total,
        tokens.join("-"),
        suffix
    )
}

/// Keep ASCII letters and digits, upper-cased. "Coca-Cola" becomes "COCACOLA";
/// a label that is all punctuation sanitizes to the empty string.
fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_uppercase()
}

/// First 6 hex chars (upper-cased) of SHA-256 over the full, unfiltered
/// selection list plus the given second. Identical payloads hashed within the
/// same second collide; the honor-based design accepts that.
fn code_suffix(selections: &[Allocation], unix_secs: i64) -> String {
    let pairs: Vec<(&str, f64)> = selections
        .iter()
        .map(|a| (a.label.as_str(), a.amount))
        .collect();
    // NaN amounts are unrepresentable in JSON; fall back to an empty payload
    // rather than failing, the code must always come out.
    let payload = serde_json::to_string(&pairs).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hasher.update(format!("|{unix_secs}").as_bytes());
    hex::encode(hasher.finalize())[..6].to_ascii_uppercase()
}
