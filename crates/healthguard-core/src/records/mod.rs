//! Daily record repository.
//!
//! The whole collection lives as one JSON array under the [`RECORDS_KEY`] key
//! of a [`KvStore`]. The store is the sole owner of that key.
//!
//! Mutations take `&mut self`: the read-modify-write of today's record is a
//! single critical section for whoever holds the store.

mod history;

pub use history::HistoryPage;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::error::{CoreError, Result, StorageError, ValidationError};
use crate::storage::KvStore;

/// Key holding the serialized record collection.
pub const RECORDS_KEY: &str = "healthData";

/// Accumulated counters for one calendar day.
///
/// Field names follow the export format (`waterAmount`, `standCount`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Water in ml.
    pub water_amount: u64,
    pub stand_count: u64,
}

impl DailyRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            water_amount: 0,
            stand_count: 0,
        }
    }

    // Counters saturate at u64::MAX.
    fn add_water(&mut self, amount_ml: u64) {
        self.water_amount = self.water_amount.saturating_add(amount_ml);
    }

    fn add_stand(&mut self) {
        self.stand_count = self.stand_count.saturating_add(1);
    }
}

/// Repository of [`DailyRecord`]s keyed by date.
pub struct RecordStore<S, K> {
    store: S,
    clock: K,
}

impl<S: KvStore, K: Clock> RecordStore<S, K> {
    pub fn new(store: S, clock: K) -> Self {
        Self { store, clock }
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn kv(&self) -> &S {
        &self.store
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Today's record, created and persisted as zeroes if absent.
    pub fn today_record(&mut self) -> Result<DailyRecord> {
        let today = self.clock.today();
        let mut records = self.load()?;
        if let Some(existing) = records.iter().find(|r| r.date == today) {
            return Ok(existing.clone());
        }

        let record = DailyRecord::empty(today);
        records.push(record.clone());
        self.persist(&records)?;
        tracing::debug!(date = %today, "created daily record");
        Ok(record)
    }

    /// All records, most recent first.
    pub fn list_records(&self) -> Result<Vec<DailyRecord>> {
        let mut records = self.load()?;
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    /// The record for a given day, if one exists.
    pub fn record_for(&self, date: NaiveDate) -> Result<Option<DailyRecord>> {
        Ok(self.load()?.into_iter().find(|r| r.date == date))
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Add `amount_ml` to today's water total.
    ///
    /// # Errors
    /// Rejects a zero amount; otherwise only storage failures.
    pub fn add_water(&mut self, amount_ml: u64) -> Result<DailyRecord> {
        if amount_ml == 0 {
            return Err(ValidationError::InvalidValue {
                field: "amount_ml".into(),
                message: "must be a positive integer".into(),
            }
            .into());
        }
        let record = self.update_today(|r| r.add_water(amount_ml))?;
        tracing::info!(amount_ml, total_ml = record.water_amount, "logged water");
        Ok(record)
    }

    /// Increment today's stand count by one.
    pub fn add_stand(&mut self) -> Result<DailyRecord> {
        let record = self.update_today(DailyRecord::add_stand)?;
        tracing::info!(total = record.stand_count, "logged stand");
        Ok(record)
    }

    /// Log one drink and one stand in a single write.
    ///
    /// Either both counters move or neither does.
    pub fn add_water_and_stand(&mut self, amount_ml: u64) -> Result<DailyRecord> {
        let record = self.update_today(|r| {
            r.add_water(amount_ml);
            r.add_stand();
        })?;
        tracing::info!(
            amount_ml,
            total_ml = record.water_amount,
            stands = record.stand_count,
            "logged water and stand"
        );
        Ok(record)
    }

    /// Replace the whole collection with an empty one.
    pub fn clear_all(&mut self) -> Result<()> {
        self.persist(&[])?;
        tracing::info!("cleared all records");
        Ok(())
    }

    /// Serialize the full collection, in stored order, as pretty JSON.
    pub fn export_as_text(&self) -> Result<String> {
        let records = self.load()?;
        Ok(serde_json::to_string_pretty(&records)?)
    }

    /// Replace the collection with the records in `text`.
    ///
    /// Returns `false` and leaves existing data untouched when the text is
    /// not a JSON array of records, when it names the same date twice, or
    /// when the store rejects the write.
    pub fn import_from_text(&mut self, text: &str) -> bool {
        let records: Vec<DailyRecord> = match serde_json::from_str(text) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "rejected import: malformed payload");
                return false;
            }
        };

        let mut dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        dates.sort_unstable();
        if let Some(pair) = dates.windows(2).find(|w| w[0] == w[1]) {
            tracing::warn!(date = %pair[0], "rejected import: duplicate date");
            return false;
        }

        match self.persist(&records) {
            Ok(()) => {
                tracing::info!(count = records.len(), "imported records");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "rejected import: store write failed");
                false
            }
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn update_today(&mut self, apply: impl FnOnce(&mut DailyRecord)) -> Result<DailyRecord> {
        let today = self.clock.today();
        let mut records = self.load()?;
        let index = match records.iter().position(|r| r.date == today) {
            Some(i) => i,
            None => {
                records.push(DailyRecord::empty(today));
                records.len() - 1
            }
        };
        apply(&mut records[index]);
        let updated = records[index].clone();
        self.persist(&records)?;
        Ok(updated)
    }

    fn load(&self) -> Result<Vec<DailyRecord>> {
        match self.store.kv_get(RECORDS_KEY)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                CoreError::from(StorageError::Corrupt {
                    key: RECORDS_KEY.into(),
                    message: e.to_string(),
                })
            }),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self, records: &[DailyRecord]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.store.kv_set(RECORDS_KEY, &json)?;
        Ok(())
    }
}

/// Parse a `YYYY-MM-DD` day string.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate(s.into()))
}
