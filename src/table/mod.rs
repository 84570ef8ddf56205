mod hash;

use std::mem;

pub use hash::{hash, slot_index, FNV_OFFSET, FNV_PRIME};
use tracing::{debug, trace};

use crate::ast::{TableError, Type, Value};

/// Capacity of a fresh table. Any power of two works, just not 0.
pub const INITIAL_CAPACITY: usize = 16;

/// A key and the value stored under it
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub key: Value,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
enum Slot {
    Empty,
    /// Something was removed from here. Lookups keep probing past it.
    Tombstone,
    Occupied(Pair),
}

/// Open-addressed, linearly probed hash table from `Value` to `Value`.
///
/// The table grows before an insert would push occupied slots plus
/// tombstones past 3/4 of the capacity, so there is always an empty slot
/// to end a probe on.
#[derive(Debug, Clone)]
pub struct Table {
    slots: Vec<Slot>,
    size: usize,
    tombstones: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// `cap` is rounded up to a power of two, and to at least
    /// [`INITIAL_CAPACITY`]
    ///
    /// # Panics
    /// When the rounded capacity doesn't fit in a `usize`. Like any other
    /// failed allocation this can't be recovered from.
    pub fn with_capacity(cap: usize) -> Self {
        let slots = cap
            .max(INITIAL_CAPACITY)
            .checked_next_power_of_two()
            .unwrap_or_else(|| panic!("can't allocate a table with {cap} slots"));
        Table {
            slots: empty_slots(slots),
            size: 0,
            tombstones: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        let index = self.find(key)?;
        match &self.slots[index] {
            Slot::Occupied(pair) => Some(&pair.value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &Value) -> Option<&mut Value> {
        let index = self.find(key)?;
        match &mut self.slots[index] {
            Slot::Occupied(pair) => Some(&mut pair.value),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.find(key).is_some()
    }

    /// Store `value` under `key`. If an equal key is already present its
    /// value is replaced (the stored key is left alone) and the old value
    /// is returned.
    pub fn insert(
        &mut self,
        key: Value,
        value: Value,
    ) -> Result<Option<Value>, TableError> {
        if let Value::Number(n) = key {
            if n.is_nan() {
                return Err(TableError::NanKey);
            }
        }

        if let Some(current) = self.get_mut(&key) {
            return Ok(Some(mem::replace(current, value)));
        }

        self.reserve_one();
        let index = self.vacant_slot(&key);
        if let Slot::Tombstone = self.slots[index] {
            self.tombstones -= 1;
        }
        self.slots[index] = Slot::Occupied(Pair { key, value });
        self.size += 1;
        Ok(None)
    }

    /// Take the value stored under `key` out of the table, leaving a
    /// tombstone behind
    pub fn remove(&mut self, key: &Value) -> Option<Value> {
        let index = self.find(key)?;
        match mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied(pair) => {
                self.size -= 1;
                self.tombstones += 1;
                Some(pair.value)
            },
            other => {
                self.slots[index] = other;
                None
            },
        }
    }

    /// Live pairs, in slot order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.slots.iter().filter_map(|slot| {
            match slot {
                Slot::Occupied(pair) => Some((&pair.key, &pair.value)),
                _ => None,
            }
        })
    }

    /// Does every pair fit `ty`, which must be a `Table<K, V>` type?
    pub fn conforms_to(&self, ty: &Type) -> bool {
        let Type::Table { key, value } = ty else {
            return false;
        };
        self.iter().all(|(k, v)| {
            key.is(&Type::from(k.kind())) && value.is(&Type::from(v.kind()))
        })
    }

    /// Release every pair and the slot array
    pub fn destroy(self) {
        trace!(size = self.size, cap = self.capacity(), "destroying table");
    }

    /***********\
    |* Probing *|
    \***********/

    /// Index of the slot holding `key`
    fn find(&self, key: &Value) -> Option<usize> {
        let mask = self.capacity() - 1;
        let mut index = slot_index(key, self.capacity());
        loop {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Occupied(pair) if pair.key.is(key) => return Some(index),
                _ => index = (index + 1) & mask,
            }
        }
    }

    /// First reusable slot on `key`'s probe sequence. Only meaningful once
    /// `key` is known not to be in the table.
    fn vacant_slot(&self, key: &Value) -> usize {
        let mask = self.capacity() - 1;
        let mut index = slot_index(key, self.capacity());
        while let Slot::Occupied(_) = self.slots[index] {
            index = (index + 1) & mask;
        }
        index
    }

    /// Make sure one more pair fits under the load limit
    fn reserve_one(&mut self) {
        let cap = self.capacity();
        if !over_load(self.size + self.tombstones + 1, cap) {
            return;
        }

        // if clearing out tombstones is enough, stay the same size
        let new_cap = if over_load(self.size + 1, cap) { cap * 2 } else { cap };
        self.rehash(new_cap);
    }

    fn rehash(&mut self, cap: usize) {
        debug!(
            from = self.capacity(),
            to = cap,
            size = self.size,
            tombstones = self.tombstones,
            "rehashing table"
        );
        let old = mem::replace(&mut self.slots, empty_slots(cap));
        self.tombstones = 0;
        for slot in old {
            if let Slot::Occupied(pair) = slot {
                let index = self.vacant_slot(&pair.key);
                self.slots[index] = Slot::Occupied(pair);
            }
        }
    }
}

impl Default for Table {
    fn default() -> Self {
        Table::new()
    }
}

/// More than 3/4 full?
fn over_load(used: usize, cap: usize) -> bool {
    used * 4 > cap * 3
}

fn empty_slots(cap: usize) -> Vec<Slot> {
    (0..cap).map(|_| Slot::Empty).collect()
}
