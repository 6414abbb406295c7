use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::time::{Duration, Instant};

use crate::error::{AuguriError, Result};
use crate::models::{Allocation, DonationRecord, Lang};

/// How long a writer waits for the ledger lock before abandoning the append.
const WRITE_LOCK_TIMEOUT: Duration = Duration::from_secs(2);
const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(25);

/// Append-only log of donation records, one CSV file with a header row.
///
/// Writes are serialized through an in-process mutex and the file is only
/// ever opened in append mode, so concurrent submissions cannot truncate
/// each other. Aggregation scans the whole file without taking the lock;
/// a torn tail from a write in flight is skipped, not fatal.
pub struct Ledger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

/// One leaderboard row: a brand and its summed amount across all records.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandTotal {
    pub brand: String,
    pub amount: f64,
}

#[derive(Debug, Default)]
pub struct Stats {
    /// Per-brand totals, descending by amount. Ties keep first-seen order.
    pub top: Vec<BrandTotal>,
    /// Distinct gift codes in first-seen order.
    pub codes: Vec<String>,
}

impl Ledger {
    /// No I/O happens here; the file is created lazily on the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[allow(dead_code)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Best-effort append. Failures are logged and swallowed: the caller has
    /// no error path for them, and the real gift already happened by bank
    /// transfer whether or not this row lands.
    pub fn save(&self, guest_id: &str, lang: Lang, selections: &[Allocation], code: &str) {
        if let Err(e) = self.try_save(guest_id, lang, selections, code) {
            tracing::warn!(path = %self.path.display(), error = %e, "donation append failed");
        }
    }

    /// The fallible core of `save`. Returns the number of rows written; zero
    /// means the filtered selection list was empty and nothing was touched.
    pub fn try_save(
        &self,
        guest_id: &str,
        lang: Lang,
        selections: &[Allocation],
        code: &str,
    ) -> Result<usize> {
        // One timestamp per submission, shared by every row.
        let timestamp = chrono::Utc::now().timestamp();
        let rows: Vec<DonationRecord> = selections
            .iter()
            .filter(|a| a.is_positive())
            .map(|a| DonationRecord {
                timestamp,
                guest_id: guest_id.to_string(),
                lang,
                brand: a.label.clone(),
                amount: a.amount,
                code: code.to_string(),
            })
            .collect();
        if rows.is_empty() {
            return Ok(0);
        }

        let _guard = self.acquire_write_lock().ok_or_else(|| {
            AuguriError::Other("timed out waiting for the ledger write lock".to_string())
        })?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let is_new = !self.path.exists();
        let file = OpenOptions::new().append(true).create(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        for row in &rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(rows.len())
    }

    /// Full scan of the ledger. A missing or empty file is "no data yet" and
    /// yields empty tables; rows that fail to parse are skipped.
    pub fn load_stats(&self) -> Stats {
        let mut reader = match csv::Reader::from_path(&self.path) {
            Ok(r) => r,
            Err(_) => return Stats::default(),
        };

        let mut top: Vec<BrandTotal> = Vec::new();
        let mut codes: Vec<String> = Vec::new();
        let mut seen_codes: HashSet<String> = HashSet::new();

        for row in reader.deserialize::<DonationRecord>() {
            let Ok(record) = row else { continue };
            match top.iter_mut().find(|t| t.brand == record.brand) {
                Some(t) => t.amount += record.amount,
                None => top.push(BrandTotal {
                    brand: record.brand.clone(),
                    amount: record.amount,
                }),
            }
            if seen_codes.insert(record.code.clone()) {
                codes.push(record.code);
            }
        }

        // Stable sort keeps insertion order between equal totals.
        top.sort_by(|a, b| {
            b.amount
                .partial_cmp(&a.amount)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Stats { top, codes }
    }

    /// Bounded wait on the write lock. A poisoned lock is taken over (the
    /// ledger file itself cannot be left inconsistent by a panicked writer,
    /// appends go through the CSV writer in one flush).
    fn acquire_write_lock(&self) -> Option<MutexGuard<'_, ()>> {
        let deadline = Instant::now() + WRITE_LOCK_TIMEOUT;
        loop {
            match self.write_lock.try_lock() {
                Ok(guard) => return Some(guard),
                Err(TryLockError::Poisoned(poisoned)) => return Some(poisoned.into_inner()),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        return None;
                    }
                    std::thread::sleep(LOCK_RETRY_INTERVAL);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_ledger() -> (tempfile::TempDir, Ledger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("donations.csv"));
        (dir, ledger)
    }

    fn gifts(pairs: &[(&str, f64)]) -> Vec<Allocation> {
        pairs.iter().map(|(l, a)| Allocation::new(*l, *a)).collect()
    }

    #[test]
    fn test_missing_ledger_yields_empty_stats() {
        let (_dir, ledger) = test_ledger();
        let stats = ledger.load_stats();
        assert!(stats.top.is_empty());
        assert!(stats.codes.is_empty());
    }

    #[test]
    fn test_save_then_load_reflects_amounts() {
        let (_dir, ledger) = test_ledger();
        let written = ledger
            .try_save(
                "guest-1",
                Lang::It,
                &gifts(&[("Tesla", 50.0), ("Disney", 0.0)]),
                "#REGALO-50-TESLA-ABC123",
            )
            .unwrap();
        // Disney's zero allocation is dropped.
        assert_eq!(written, 1);

        let stats = ledger.load_stats();
        assert_eq!(stats.top.len(), 1);
        assert_eq!(stats.top[0].brand, "Tesla");
        assert_eq!(stats.top[0].amount, 50.0);
        assert_eq!(stats.codes, vec!["#REGALO-50-TESLA-ABC123"]);
    }

    #[test]
    fn test_empty_submission_is_a_no_op() {
        let (_dir, ledger) = test_ledger();
        let written = ledger
            .try_save("guest-1", Lang::En, &gifts(&[("Tesla", 0.0)]), "#GIFT-0-LOVE-000000")
            .unwrap();
        assert_eq!(written, 0);
        assert!(!ledger.path().exists(), "no-op save must not create the file");
    }

    #[test]
    fn test_two_guests_same_brand_sum() {
        let (_dir, ledger) = test_ledger();
        ledger
            .try_save("guest-1", Lang::En, &gifts(&[("Apple", 30.0)]), "#GIFT-30-APPLE-AAAAAA")
            .unwrap();
        ledger
            .try_save("guest-2", Lang::En, &gifts(&[("Apple", 30.0)]), "#GIFT-30-APPLE-BBBBBB")
            .unwrap();

        let stats = ledger.load_stats();
        assert_eq!(stats.top.len(), 1);
        assert_eq!(stats.top[0].brand, "Apple");
        assert_eq!(stats.top[0].amount, 60.0);
        assert_eq!(stats.codes.len(), 2);
    }

    #[test]
    fn test_header_written_once() {
        let (_dir, ledger) = test_ledger();
        ledger
            .try_save("g1", Lang::It, &gifts(&[("Tesla", 10.0)]), "#REGALO-10-TESLA-111111")
            .unwrap();
        ledger
            .try_save("g2", Lang::It, &gifts(&[("Nike", 20.0)]), "#REGALO-20-NIKE-222222")
            .unwrap();

        let content = std::fs::read_to_string(ledger.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "timestamp,guest_id,lang,brand,amount,code");
        assert!(lines[1].contains("Tesla"));
        assert!(lines[2].contains("Nike"));
    }

    #[test]
    fn test_rows_share_one_timestamp_and_code() {
        let (_dir, ledger) = test_ledger();
        ledger
            .try_save(
                "guest-9",
                Lang::It,
                &gifts(&[("Tesla", 10.0), ("Apple", 20.0), ("Nike", 30.0)]),
                "#REGALO-60-TESLA-APPLE-CCCCCC",
            )
            .unwrap();

        let mut reader = csv::Reader::from_path(ledger.path()).unwrap();
        let records: Vec<DonationRecord> = reader
            .deserialize()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.timestamp == records[0].timestamp));
        assert!(records.iter().all(|r| r.code == records[0].code));
        assert!(records.iter().all(|r| r.guest_id == "guest-9"));
    }

    #[test]
    fn test_top_sorted_descending_with_stable_ties() {
        let (_dir, ledger) = test_ledger();
        ledger
            .try_save(
                "g",
                Lang::En,
                &gifts(&[("Nike", 10.0), ("Apple", 40.0), ("Tesla", 10.0)]),
                "#GIFT-60-NIKE-APPLE-DDDDDD",
            )
            .unwrap();

        let stats = ledger.load_stats();
        let brands: Vec<&str> = stats.top.iter().map(|t| t.brand.as_str()).collect();
        // Apple leads; Nike and Tesla tie at 10 and keep encounter order.
        assert_eq!(brands, vec!["Apple", "Nike", "Tesla"]);
    }

    #[test]
    fn test_torn_tail_is_skipped() {
        let (_dir, ledger) = test_ledger();
        ledger
            .try_save("g", Lang::En, &gifts(&[("Apple", 5.0)]), "#GIFT-5-APPLE-EEEEEE")
            .unwrap();
        // Simulate a reader racing a writer mid-append.
        use std::io::Write;
        let mut file = OpenOptions::new().append(true).open(ledger.path()).unwrap();
        write!(file, "17000000").unwrap();

        let stats = ledger.load_stats();
        assert_eq!(stats.top.len(), 1);
        assert_eq!(stats.top[0].amount, 5.0);
    }

    #[test]
    fn test_save_swallows_io_failure() {
        // Point the ledger at a path whose parent is a file; the append must
        // fail internally and `save` must still return normally.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let ledger = Ledger::new(blocker.join("donations.csv"));
        ledger.save("g", Lang::It, &gifts(&[("Tesla", 1.0)]), "#REGALO-1-TESLA-FFFFFF");
        assert!(ledger
            .try_save("g", Lang::It, &gifts(&[("Tesla", 1.0)]), "#REGALO-1-TESLA-FFFFFF")
            .is_err());
    }

    #[test]
    fn test_concurrent_saves_do_not_corrupt() {
        let (_dir, ledger) = test_ledger();
        let ledger = std::sync::Arc::new(ledger);
        let mut handles = Vec::new();
        for i in 0..8 {
            let ledger = ledger.clone();
            handles.push(std::thread::spawn(move || {
                let code = format!("#GIFT-30-APPLE-{i:06X}");
                ledger
                    .try_save(&format!("guest-{i}"), Lang::En, &gifts(&[("Apple", 30.0)]), &code)
                    .unwrap();
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let stats = ledger.load_stats();
        assert_eq!(stats.top.len(), 1);
        assert_eq!(stats.top[0].amount, 240.0);
        assert_eq!(stats.codes.len(), 8);
    }
}
