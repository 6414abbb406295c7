pub mod code;
pub mod demo;
pub mod give;
pub mod init;
pub mod stats;
pub mod universe;

use clap::{Parser, Subcommand};

use crate::models::Allocation;

/// Parse a `LABEL=AMOUNT` argument. A malformed or missing amount is coerced
/// to zero so the allocation drops out downstream instead of failing the
/// command.
pub(crate) fn parse_selection(arg: &str) -> Allocation {
    match arg.split_once('=') {
        Some((label, amount)) => {
            Allocation::new(label.trim(), amount.trim().parse().unwrap_or(0.0))
        }
        None => Allocation::new(arg.trim(), 0.0),
    }
}

#[derive(Parser)]
#[command(
    name = "auguri",
    about = "Symbolic wedding-gift codes and a best-effort donation ledger."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up auguri: choose a data directory for the ledger and catalog.
    Init {
        /// Path for auguri data (default: ~/Documents/auguri)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Generate a gift code without recording anything.
    Code {
        /// Selections as LABEL=AMOUNT (e.g. "Tesla=50")
        selections: Vec<String>,
        /// Language for the code prefix: it or en
        #[arg(long)]
        lang: Option<String>,
    },
    /// Record a donation: generate a gift code and append it to the ledger.
    Give {
        /// Selections as LABEL=AMOUNT (e.g. "Tesla=50" "Disney=25")
        selections: Vec<String>,
        /// Language for the code prefix: it or en
        #[arg(long)]
        lang: Option<String>,
        /// Guest identifier (default: a random guest-XXXXXX)
        #[arg(long = "guest-id")]
        guest_id: Option<String>,
    },
    /// Show the leaderboard: top brands and distinct gift codes.
    Stats,
    /// List the company catalog.
    Universe {
        /// Filter companies by name, ticker or sector
        #[arg(long)]
        search: Option<String>,
    },
    /// Seed a few sample donations to explore the stats view.
    Demo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("Tesla=50"), Allocation::new("Tesla", 50.0));
        assert_eq!(
            parse_selection(" Coca-Cola = 12.5 "),
            Allocation::new("Coca-Cola", 12.5)
        );
    }

    #[test]
    fn test_parse_selection_coerces_bad_amounts_to_zero() {
        assert_eq!(parse_selection("Tesla=lots"), Allocation::new("Tesla", 0.0));
        assert_eq!(parse_selection("Tesla"), Allocation::new("Tesla", 0.0));
        assert_eq!(parse_selection("Tesla="), Allocation::new("Tesla", 0.0));
    }
}
