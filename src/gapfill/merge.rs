use super::calendar::BucketId;
use super::NormalizeError;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// One aggregated data point: a bucket and the metric value measured in it.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<V> {
    pub bucket: BucketId,
    pub value: V,
}

impl<V> Record<V> {
    pub fn new(bucket: BucketId, value: V) -> Self {
        Self { bucket, value }
    }
}

/// Output field names for the bucket and the value of every record.
///
/// Aggregation queries alias their columns freely (`total_kwh`, `avg_c`,
/// `sum_kwh`), so the names travel next to the data instead of being fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldNames {
    pub bucket_key: String,
    pub value_key: String,
}

impl FieldNames {
    pub fn new(bucket_key: impl Into<String>, value_key: impl Into<String>) -> Self {
        Self {
            bucket_key: bucket_key.into(),
            value_key: value_key.into(),
        }
    }

    /// Take the first two column names of the first fetched row, in column
    /// order. With no row (or a row with fewer columns) the defaults fill in.
    pub fn resolve<'a, I>(first_row_columns: Option<I>, defaults: FieldNames) -> FieldNames
    where
        I: IntoIterator<Item = &'a str>,
    {
        let Some(columns) = first_row_columns else {
            return defaults;
        };
        let mut columns = columns.into_iter();
        let bucket_key = columns
            .next()
            .map(str::to_owned)
            .unwrap_or(defaults.bucket_key);
        let value_key = columns
            .next()
            .map(str::to_owned)
            .unwrap_or(defaults.value_key);
        FieldNames {
            bucket_key,
            value_key,
        }
    }
}

/// A gap-free series: exactly one record per bucket of a period.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseSeries<V> {
    pub fields: FieldNames,
    pub records: Vec<Record<V>>,
}

impl<V> DenseSeries<V> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<V: Serialize> Serialize for DenseSeries<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(&KeyedRecord {
                fields: &self.fields,
                record,
            })?;
        }
        seq.end()
    }
}

struct KeyedRecord<'a, V> {
    fields: &'a FieldNames,
    record: &'a Record<V>,
}

impl<V: Serialize> Serialize for KeyedRecord<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(&self.fields.bucket_key, &self.record.bucket)?;
        map.serialize_entry(&self.fields.value_key, &self.record.value)?;
        map.end()
    }
}

/// Zero-fill `fetched` against `buckets`, using `V::default()` for empty buckets.
pub fn merge<V>(
    buckets: &[BucketId],
    fetched: Vec<Record<V>>,
    fields: FieldNames,
) -> Result<DenseSeries<V>, NormalizeError>
where
    V: Clone + Default,
{
    merge_with_zero(buckets, fetched, fields, V::default())
}

/// Two-pointer merge of the full bucket sequence with ascending sparse records.
///
/// Both inputs are ascending, so a fetched record is either the one for the
/// current bucket or belongs to a later bucket. A record that is never reached
/// (unknown bucket, out of order, duplicate) fails the whole merge.
pub fn merge_with_zero<V>(
    buckets: &[BucketId],
    fetched: Vec<Record<V>>,
    fields: FieldNames,
    zero: V,
) -> Result<DenseSeries<V>, NormalizeError>
where
    V: Clone,
{
    let mut fetched = fetched.into_iter().peekable();
    let mut records = Vec::with_capacity(buckets.len());

    for &bucket in buckets {
        match fetched.next_if(|record| record.bucket == bucket) {
            Some(record) => records.push(record),
            None => records.push(Record::new(bucket, zero.clone())),
        }
    }

    if let Some(stray) = fetched.next() {
        return Err(NormalizeError::BucketMismatch {
            bucket: stray.bucket,
        });
    }

    Ok(DenseSeries { fields, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gapfill::calendar::{hours_of_day, months_of_year, seven_day_window};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn kwh() -> FieldNames {
        FieldNames::new("hour", "total_kwh")
    }

    #[test]
    fn test_merge_hours_with_gaps() {
        let fetched = vec![
            Record::new(BucketId::Hour(5), 10.0),
            Record::new(BucketId::Hour(17), 40.0),
        ];

        let dense = merge(&hours_of_day(), fetched, kwh()).unwrap();

        assert_eq!(dense.len(), 24);
        assert_eq!(dense.records[5], Record::new(BucketId::Hour(5), 10.0));
        assert_eq!(dense.records[17], Record::new(BucketId::Hour(17), 40.0));
        for (hour, record) in dense.records.iter().enumerate() {
            assert_eq!(record.bucket, BucketId::Hour(hour as u32));
            if hour != 5 && hour != 17 {
                assert_eq!(record.value, 0.0);
            }
        }
    }

    #[test]
    fn test_merge_empty_months() {
        let dense: DenseSeries<f64> = merge(
            &months_of_year(),
            Vec::new(),
            FieldNames::new("month", "total_kwh"),
        )
        .unwrap();

        let json = serde_json::to_value(&dense).unwrap();
        let expected: Vec<_> = (1..=12)
            .map(|m| json!({ "month": m, "total_kwh": 0.0 }))
            .collect();
        assert_eq!(json, json!(expected));
    }

    #[test]
    fn test_merge_empty_seven_day_window_uses_dates() {
        let anchor = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let buckets = seven_day_window(anchor).unwrap();

        let dense: DenseSeries<f64> =
            merge(&buckets, Vec::new(), FieldNames::new("date", "total_kwh")).unwrap();

        let json = serde_json::to_value(&dense).unwrap();
        assert_eq!(json[0], json!({ "date": "2024-03-25", "total_kwh": 0.0 }));
        assert_eq!(json[6], json!({ "date": "2024-03-31", "total_kwh": 0.0 }));
        assert_eq!(json.as_array().map(Vec::len), Some(7));
    }

    #[test]
    fn test_merge_dense_input_is_unchanged() {
        let buckets = months_of_year();
        let full: Vec<_> = buckets
            .iter()
            .map(|&b| Record::new(b, 3.5))
            .collect();

        let dense = merge(&buckets, full.clone(), kwh()).unwrap();

        assert_eq!(dense.records, full);
    }

    #[test]
    fn test_merge_places_subsequence_by_bucket() {
        let buckets = hours_of_day();
        let picks = [0u32, 1, 7, 8, 22, 23];
        let fetched: Vec<_> = picks
            .iter()
            .map(|&h| Record::new(BucketId::Hour(h), h as i64 * 2))
            .collect();

        let dense = merge(&buckets, fetched.clone(), kwh()).unwrap();

        assert_eq!(dense.len(), buckets.len());
        for record in fetched {
            let index = buckets.iter().position(|b| *b == record.bucket).unwrap();
            assert_eq!(dense.records[index], record);
        }
    }

    #[test]
    fn test_merge_custom_zero_value() {
        let dense = merge_with_zero(
            &[BucketId::Month(1), BucketId::Month(2)],
            vec![Record::new(BucketId::Month(2), Some(1.5))],
            FieldNames::new("month", "avg_c"),
            None,
        )
        .unwrap();

        assert_eq!(dense.records[0].value, None);
        assert_eq!(dense.records[1].value, Some(1.5));
    }

    #[test]
    fn test_merge_rejects_unknown_bucket() {
        let fetched = vec![
            Record::new(BucketId::Hour(3), 1.0),
            Record::new(BucketId::Hour(24), 2.0),
        ];

        let err = merge(&hours_of_day(), fetched, kwh()).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::BucketMismatch {
                bucket: BucketId::Hour(24)
            }
        );
    }

    #[test]
    fn test_merge_rejects_out_of_order_input() {
        let fetched = vec![
            Record::new(BucketId::Hour(9), 1.0),
            Record::new(BucketId::Hour(4), 2.0),
        ];

        let err = merge(&hours_of_day(), fetched, kwh()).unwrap_err();

        assert_eq!(
            err,
            NormalizeError::BucketMismatch {
                bucket: BucketId::Hour(4)
            }
        );
    }

    #[test]
    fn test_merge_rejects_duplicate_bucket() {
        let fetched = vec![
            Record::new(BucketId::Month(2), 1.0),
            Record::new(BucketId::Month(2), 2.0),
        ];

        assert!(merge(&months_of_year(), fetched, kwh()).is_err());
    }

    #[test]
    fn test_resolve_field_names_from_columns() {
        let columns = ["day", "sum_kwh", "ignored"];
        let fields = FieldNames::resolve(Some(columns), FieldNames::new("date", "total_kwh"));
        assert_eq!(fields, FieldNames::new("day", "sum_kwh"));
    }

    #[test]
    fn test_resolve_field_names_falls_back_to_defaults() {
        let fields =
            FieldNames::resolve(None::<Vec<&str>>, FieldNames::new("date", "total_kwh"));
        assert_eq!(fields, FieldNames::new("date", "total_kwh"));

        let fields = FieldNames::resolve(Some(["hour"]), FieldNames::new("date", "total_kwh"));
        assert_eq!(fields, FieldNames::new("hour", "total_kwh"));
    }

    #[test]
    fn test_serialized_keys_keep_bucket_first() {
        let dense = merge(
            &[BucketId::Hour(0)],
            vec![Record::new(BucketId::Hour(0), 21.5)],
            FieldNames::new("hour", "avg_c"),
        )
        .unwrap();

        let text = serde_json::to_string(&dense).unwrap();
        assert_eq!(text, r#"[{"hour":0,"avg_c":21.5}]"#);
    }
}
