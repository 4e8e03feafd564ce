// src/infrastructure/security/one_shot.rs
//! In-process map of single-use records keyed by an opaque string.
//!
//! Each record lives in a slot with an atomic state flag. Consumption flips the flag
//! with a compare-exchange, so among concurrent consumers of one key exactly one sees
//! the record. Consumed slots stay in the map until they expire so replays can still
//! be told apart from unknown keys.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::oauth::Expiring;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicU8, Ordering},
};

const PENDING: u8 = 0;
const CONSUMED: u8 = 1;

struct Slot<T> {
    record: T,
    state: AtomicU8,
}

impl<T> Slot<T> {
    fn is_consumed(&self) -> bool {
        self.state.load(Ordering::Acquire) == CONSUMED
    }
}

/// Snapshot of a key without changing its state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Peek<T> {
    Pending(T),
    Consumed(T),
    Missing,
}

pub struct OneShotMap<T> {
    label: &'static str,
    slots: RwLock<HashMap<String, Arc<Slot<T>>>>,
}

impl<T> OneShotMap<T>
where
    T: Clone + Expiring,
{
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            slots: RwLock::new(HashMap::new()),
        }
    }

    fn poisoned(&self) -> ApplicationError {
        ApplicationError::infrastructure(format!("{} store lock poisoned", self.label))
    }

    fn slot(&self, key: &str) -> ApplicationResult<Option<Arc<Slot<T>>>> {
        let guard = self.slots.read().map_err(|_| self.poisoned())?;
        Ok(guard.get(key).cloned())
    }

    pub fn insert(&self, key: String, record: T) -> ApplicationResult<()> {
        let mut guard = self.slots.write().map_err(|_| self.poisoned())?;
        if guard.contains_key(&key) {
            return Err(ApplicationError::infrastructure(format!(
                "duplicate {} key",
                self.label
            )));
        }
        guard.insert(
            key,
            Arc::new(Slot {
                record,
                state: AtomicU8::new(PENDING),
            }),
        );
        Ok(())
    }

    pub fn peek(&self, key: &str) -> ApplicationResult<Peek<T>> {
        Ok(match self.slot(key)? {
            None => Peek::Missing,
            Some(slot) if slot.is_consumed() => Peek::Consumed(slot.record.clone()),
            Some(slot) => Peek::Pending(slot.record.clone()),
        })
    }

    /// Return the record if it is still pending and unexpired, without consuming it.
    pub fn resolve(&self, key: &str, now: DateTime<Utc>) -> ApplicationResult<T> {
        let slot = self.existing(key)?;
        self.ensure_usable(&slot, now)?;
        Ok(slot.record.clone())
    }

    pub fn consume(&self, key: &str, now: DateTime<Utc>) -> ApplicationResult<T> {
        let slot = self.existing(key)?;
        self.ensure_usable(&slot, now)?;

        slot.state
            .compare_exchange(PENDING, CONSUMED, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| self.already_consumed())?;

        Ok(slot.record.clone())
    }

    /// Remove every slot whose record expired at or before `cutoff`.
    pub fn purge_expired(&self, cutoff: DateTime<Utc>) -> ApplicationResult<usize> {
        let mut guard = self.slots.write().map_err(|_| self.poisoned())?;
        let before = guard.len();
        guard.retain(|_, slot| slot.record.expires_at() > cutoff);
        Ok(before - guard.len())
    }

    pub fn len(&self) -> ApplicationResult<usize> {
        Ok(self.slots.read().map_err(|_| self.poisoned())?.len())
    }

    fn existing(&self, key: &str) -> ApplicationResult<Arc<Slot<T>>> {
        self.slot(key)?
            .ok_or_else(|| ApplicationError::not_found(format!("{} not found", self.label)))
    }

    fn ensure_usable(&self, slot: &Slot<T>, now: DateTime<Utc>) -> ApplicationResult<()> {
        if slot.is_consumed() {
            return Err(self.already_consumed());
        }
        if slot.record.is_expired_at(now) {
            return Err(ApplicationError::expired(format!("{} has expired", self.label)));
        }
        Ok(())
    }

    fn already_consumed(&self) -> ApplicationError {
        ApplicationError::already_consumed(format!("{} was already used", self.label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Record {
        value: u32,
        expires_at: DateTime<Utc>,
    }

    impl Expiring for Record {
        fn expires_at(&self) -> DateTime<Utc> {
            self.expires_at
        }
    }

    fn map_with(now: DateTime<Utc>) -> OneShotMap<Record> {
        let map = OneShotMap::new("record");
        map.insert(
            "k".into(),
            Record {
                value: 7,
                expires_at: now + Duration::seconds(30),
            },
        )
        .unwrap();
        map
    }

    #[test]
    fn consume_succeeds_once() {
        let now = Utc::now();
        let map = map_with(now);
        assert_eq!(map.consume("k", now).unwrap().value, 7);
        assert!(matches!(
            map.consume("k", now),
            Err(ApplicationError::AlreadyConsumed(_))
        ));
        assert!(matches!(map.peek("k").unwrap(), Peek::Consumed(_)));
    }

    #[test]
    fn expiry_is_checked_against_the_supplied_instant() {
        let now = Utc::now();
        let map = map_with(now);
        assert!(map.resolve("k", now + Duration::seconds(29)).is_ok());
        assert!(matches!(
            map.consume("k", now + Duration::seconds(30)),
            Err(ApplicationError::Expired(_))
        ));
        assert!(matches!(map.peek("k").unwrap(), Peek::Pending(_)));
    }

    #[test]
    fn unknown_keys_are_not_found() {
        let map = map_with(Utc::now());
        assert!(matches!(
            map.consume("missing", Utc::now()),
            Err(ApplicationError::NotFound(_))
        ));
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let now = Utc::now();
        let map = map_with(now);
        let dup = Record {
            value: 1,
            expires_at: now,
        };
        assert!(map.insert("k".into(), dup).is_err());
    }

    #[test]
    fn purge_drops_expired_slots_whatever_their_state() {
        let now = Utc::now();
        let map = map_with(now);
        map.consume("k", now).unwrap();
        assert_eq!(map.purge_expired(now).unwrap(), 0);
        assert_eq!(map.purge_expired(now + Duration::seconds(30)).unwrap(), 1);
        assert_eq!(map.len().unwrap(), 0);
    }
}
