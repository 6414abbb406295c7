use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::Company;

/// Default emoji for well-known names whose catalog row leaves the column blank.
const EMOJI_MAP: &[(&str, &str)] = &[
    ("Tesla", "🚗⚡"),
    ("Disney", "✨"),
    ("Coca-Cola", "🥤"),
    ("Apple", "🍏"),
    ("Nike", "👟"),
    ("Ferrari", "🏎️"),
    ("Nestlé", "🍫"),
    ("Airbus", "✈️"),
    ("Booking Holdings", "🌍"),
    ("Netflix", "🎬"),
    ("Microsoft", "🖥️"),
    ("Amazon", "📦"),
    ("Alphabet", "🔎"),
    ("Meta", "💬"),
    ("Shell", "🛢️"),
    ("TotalEnergies", "⚡"),
    ("ASML", "🔬"),
    ("Siemens", "🛠️"),
    ("LVMH", "👜"),
    ("Adidas", "👟"),
    ("PepsiCo", "🥤"),
    ("Starbucks", "☕"),
    ("McDonald’s", "🍟"),
    ("Airbnb", "🏡"),
    ("Spotify", "🎵"),
    ("Samsung", "📱"),
    ("NVIDIA", "🧠"),
];

// (name, ticker, country, sector, subsector) — served when no catalog CSV exists.
const FALLBACK_BRANDS: &[(&str, &str, &str, &str, &str)] = &[
    ("Apple", "AAPL", "USA", "Information Technology", "Consumer Electronics"),
    ("Microsoft", "MSFT", "USA", "Information Technology", "Software"),
    ("Amazon", "AMZN", "USA", "Consumer Discretionary", "E-commerce & Cloud"),
    ("Alphabet", "GOOGL", "USA", "Communication Services", "Search & Ads"),
    ("Meta", "META", "USA", "Communication Services", "Social Media"),
    ("Tesla", "TSLA", "USA", "Consumer Discretionary", "Automobiles (EVs)"),
    ("NVIDIA", "NVDA", "USA", "Information Technology", "Semiconductors"),
    ("Netflix", "NFLX", "USA", "Communication Services", "Streaming"),
    ("Disney", "DIS", "USA", "Communication Services", "Entertainment"),
    ("Coca-Cola", "KO", "USA", "Consumer Staples", "Beverages"),
    ("PepsiCo", "PEP", "USA", "Consumer Staples", "Beverages & Snacks"),
    ("Nike", "NKE", "USA", "Consumer Discretionary", "Apparel & Footwear"),
    ("McDonald’s", "MCD", "USA", "Consumer Discretionary", "Fast Food"),
    ("Starbucks", "SBUX", "USA", "Consumer Discretionary", "Coffeehouses"),
    ("Airbnb", "ABNB", "USA", "Consumer Discretionary", "Lodging / OTA"),
    ("Booking Holdings", "BKNG", "USA", "Consumer Discretionary", "Online Travel Agency"),
    ("ASML", "ASML", "Netherlands", "Information Technology", "Semiconductor Equipment"),
    ("Siemens", "SIEGY", "Germany", "Industrials", "Conglomerate / Automation"),
    ("LVMH", "LVMUY", "France", "Consumer Discretionary", "Luxury Goods"),
    ("Nestlé", "NSRGY", "Switzerland", "Consumer Staples", "Packaged Foods & Beverages"),
    ("TotalEnergies", "TTE", "France", "Energy", "Integrated Oil & Gas"),
    ("Shell", "SHEL", "UK", "Energy", "Integrated Oil & Gas"),
    ("Adidas", "ADDYY", "Germany", "Consumer Discretionary", "Apparel & Footwear"),
    ("Spotify", "SPOT", "Sweden", "Communication Services", "Music Streaming"),
    ("Ferrari", "RACE", "Italy", "Consumer Discretionary", "Automobiles (Luxury)"),
    ("Airbus", "EADSY", "Netherlands", "Industrials", "Aerospace & Defense"),
    ("Samsung", "SSNLF", "South Korea", "Information Technology", "Consumer Electronics"),
];

/// Read-through cache over the company catalog CSV.
///
/// The catalog is a static curated table; it only changes when someone edits
/// the file by hand, so `load` reads it once and serves the cached list until
/// `invalidate` is called.
pub struct Universe {
    csv_path: PathBuf,
    cache: Option<Vec<Company>>,
}

impl Universe {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            cache: None,
        }
    }

    /// Companies sorted by name. Falls back to the curated built-in list when
    /// the CSV is missing or unusable; never an error.
    pub fn load(&mut self) -> &[Company] {
        if self.cache.is_none() {
            let companies = match read_catalog(&self.csv_path) {
                Ok(list) if !list.is_empty() => list,
                _ => fallback_companies(),
            };
            self.cache = Some(companies);
        }
        self.cache.as_deref().unwrap_or_default()
    }

    /// Drop the cache so the next `load` re-reads the file.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}

pub fn default_emoji(name: &str) -> &'static str {
    EMOJI_MAP
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, e)| *e)
        .unwrap_or("")
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> String {
    idx.and_then(|i| record.get(i)).unwrap_or("").trim().to_string()
}

/// Parse the catalog CSV. Headers match case-insensitively; `name` and
/// `ticker` are required, everything else is optional and defaulted. Rows are
/// de-duplicated by ticker and sorted by name.
fn read_catalog(path: &Path) -> Result<Vec<Company>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));

    let (Some(name_idx), Some(ticker_idx)) = (col("name"), col("ticker")) else {
        return Ok(Vec::new());
    };
    let index_idx = col("index");
    let country_idx = col("country");
    let sector_idx = col("sector");
    let subsector_idx = col("subsector");
    let emoji_idx = col("emoji");

    let mut seen: HashSet<String> = HashSet::new();
    let mut companies = Vec::new();
    for record in reader.records() {
        let Ok(record) = record else { continue };
        let name = field(&record, Some(name_idx));
        let ticker = field(&record, Some(ticker_idx));
        if name.is_empty() || ticker.is_empty() {
            continue;
        }
        if !seen.insert(ticker.clone()) {
            continue;
        }
        let mut emoji = field(&record, emoji_idx);
        if emoji.is_empty() {
            emoji = default_emoji(&name).to_string();
        }
        companies.push(Company {
            index: field(&record, index_idx),
            country: field(&record, country_idx),
            sector: field(&record, sector_idx),
            subsector: field(&record, subsector_idx),
            name,
            ticker,
            emoji,
        });
    }
    companies.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(companies)
}

fn fallback_companies() -> Vec<Company> {
    let mut companies: Vec<Company> = FALLBACK_BRANDS
        .iter()
        .map(|(name, ticker, country, sector, subsector)| Company {
            name: name.to_string(),
            ticker: ticker.to_string(),
            index: "Curated".to_string(),
            country: country.to_string(),
            sector: sector.to_string(),
            subsector: subsector.to_string(),
            emoji: default_emoji(name).to_string(),
        })
        .collect();
    companies.sort_by(|a, b| a.name.cmp(&b.name));
    companies
}
