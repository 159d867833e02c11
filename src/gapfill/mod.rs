//! Turns sparse, bucketed aggregation results into dense zero-filled series.
//!
//! [`calendar`] knows which buckets a period must contain, [`merge`] lines the
//! fetched rows up against them. Nothing in here touches the database.

pub mod calendar;
pub mod merge;

pub use calendar::{BucketId, PeriodDescriptor, PeriodKind};
pub use merge::{merge, merge_with_zero, DenseSeries, FieldNames, Record};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Invalid date: year {year}, month {month}")]
    InvalidDate { year: i32, month: u32 },
    #[error("Fetched {bucket} does not line up with the period's buckets")]
    BucketMismatch { bucket: BucketId },
}

/// Build the period's buckets and zero-fill `fetched` against them.
pub fn normalize<V>(
    period: &PeriodDescriptor,
    fields: FieldNames,
    fetched: Vec<Record<V>>,
) -> Result<DenseSeries<V>, NormalizeError>
where
    V: Clone + Default,
{
    normalize_with_zero(period, fields, fetched, V::default())
}

/// [`normalize`] with an explicit placeholder for empty buckets.
pub fn normalize_with_zero<V>(
    period: &PeriodDescriptor,
    fields: FieldNames,
    fetched: Vec<Record<V>>,
    zero: V,
) -> Result<DenseSeries<V>, NormalizeError>
where
    V: Clone,
{
    let buckets = period.buckets()?;
    merge_with_zero(&buckets, fetched, fields, zero)
}
