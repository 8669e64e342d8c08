//! In-memory deposit store
//!
//! Used when no PostgreSQL URL is configured, and by tests.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicU64, Ordering};

use super::error::StoreError;
use super::store::DepositStore;
use super::types::{DepositRecord, DepositStatus, InsertOutcome, UpdateOutcome};

struct Slot {
    /// Insertion order, breaks `created_at` ties when listing
    seq: u64,
    record: DepositRecord,
}

#[derive(Default)]
pub struct InMemoryDepositStore {
    deposits: DashMap<String, Slot>,
    next_seq: AtomicU64,
}

impl InMemoryDepositStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.deposits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deposits.is_empty()
    }
}

#[async_trait]
impl DepositStore for InMemoryDepositStore {
    async fn try_insert(&self, record: &DepositRecord) -> Result<InsertOutcome, StoreError> {
        // The entry guard holds the shard lock across check and insert
        match self.deposits.entry(record.tx_hash.clone()) {
            Entry::Occupied(_) => Ok(InsertOutcome::AlreadyExists),
            Entry::Vacant(vacant) => {
                let now = Utc::now();
                let mut stored = record.clone();
                stored.created_at = now;
                stored.updated_at = now;
                vacant.insert(Slot {
                    seq: self.next_seq.fetch_add(1, Ordering::SeqCst),
                    record: stored,
                });
                Ok(InsertOutcome::Inserted)
            }
        }
    }

    async fn update_status(
        &self,
        tx_hash: &str,
        status: DepositStatus,
    ) -> Result<UpdateOutcome, StoreError> {
        match self.deposits.get_mut(tx_hash) {
            Some(mut slot) => {
                slot.record.status = status;
                slot.record.updated_at = Utc::now();
                Ok(UpdateOutcome::Updated)
            }
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    async fn list_by_merchant(
        &self,
        merchant_id: Option<&str>,
    ) -> Result<Vec<DepositRecord>, StoreError> {
        let mut matching: Vec<(u64, DepositRecord)> = self
            .deposits
            .iter()
            .filter(|slot| merchant_id.is_none_or(|m| slot.record.merchant_id == m))
            .map(|slot| (slot.seq, slot.record.clone()))
            .collect();

        matching.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });

        Ok(matching.into_iter().map(|(_, record)| record).collect())
    }

    async fn get(&self, tx_hash: &str) -> Result<Option<DepositRecord>, StoreError> {
        Ok(self.deposits.get(tx_hash).map(|slot| slot.record.clone()))
    }
}
