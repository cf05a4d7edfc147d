use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{AggregatedRecord, SalesRecord};

/// A row whose additive fields can be folded into another row of the same kind.
pub trait Additive {
    /// Add `other`'s additive fields to `self`, leaving the rest untouched.
    fn absorb(&mut self, other: &Self);
}

impl Additive for SalesRecord {
    fn absorb(&mut self, other: &Self) {
        self.quantity += other.quantity;
        self.original_amount += other.original_amount;
        self.payable_royalty += other.payable_royalty;
    }
}

impl Additive for AggregatedRecord {
    fn absorb(&mut self, other: &Self) {
        self.quantity += other.quantity;
        self.original_amount += other.original_amount;
        self.payable_royalty += other.payable_royalty;
    }
}

/// Group `rows` by `key`, one output row per distinct key in first-occurrence
/// order. The first row seen for a key is the accumulator, so its
/// non-additive fields win.
pub fn group_by<R, K, I, F>(rows: I, key: F) -> Vec<R>
where
    R: Additive,
    K: Hash + Eq,
    I: IntoIterator<Item = R>,
    F: Fn(&R) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut out: Vec<R> = Vec::new();
    for row in rows {
        let k = key(&row);
        match index.get(&k) {
            Some(&i) => out[i].absorb(&row),
            None => {
                index.insert(k, out.len());
                out.push(row);
            }
        }
    }
    out
}

pub fn aggregate_by_year(records: &[SalesRecord]) -> Vec<AggregatedRecord> {
    group_by(records.iter().map(AggregatedRecord::yearly), |r| {
        (r.book_slug.clone(), r.year)
    })
}

pub fn aggregate_all_time(records: &[SalesRecord]) -> Vec<AggregatedRecord> {
    group_by(records.iter().map(AggregatedRecord::all_time), |r| {
        r.book_slug.clone()
    })
}
