use std::cmp::Ordering;

use crate::spec::{DuplicateHandling, SortKeySpec, SortOrder};

/// Width of the row sequence number appended to the last key segment in
/// duplicate-preserving sorts.
pub(crate) const SEQUENCE_WIDTH: usize = 8;

/// One row prepared for sorting: an order-preserving key segment per
/// direction segment (the last possibly carrying a trailing sequence
/// number), plus the encoded row payload.
///
/// Created during load, serialized into run files on spill, deserialized
/// during merge and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRecord {
    pub segments: Vec<Vec<u8>>,
    pub payload: Vec<u8>,
}

impl SortRecord {
    /// Bytes this record accounts for against the memory pool: the same
    /// length-prefixed footprint it would occupy in a run file.
    pub fn encoded_size(&self) -> usize {
        let mut size = 4;
        for seg in &self.segments {
            size += 4 + seg.len();
        }
        size + 4 + self.payload.len()
    }
}

/// Composite record comparator.
///
/// One ascending or descending byte-lexicographic comparator per direction
/// segment, selected here once rather than per comparison. The first
/// non-zero segment result wins. [`compare`](Self::compare) never considers
/// the trailing sequence number, so equal rows are recognized as duplicates
/// even when a sequence number keeps their stored keys unique;
/// [`order`](Self::order) breaks the remaining ties on that sequence, which
/// keeps equal keys in input order through spills and merge passes.
#[derive(Debug)]
pub struct RecordComparator {
    orders: Vec<SortOrder>,
    sequenced: bool,
}

impl RecordComparator {
    pub fn new(spec: &SortKeySpec, duplicates: DuplicateHandling) -> Self {
        Self {
            orders: spec.segments().iter().map(|s| s.order).collect(),
            sequenced: duplicates == DuplicateHandling::Preserve,
        }
    }

    /// Key comparison, sequence numbers excluded. `Equal` means the two
    /// records are duplicate rows.
    pub fn compare(&self, a: &SortRecord, b: &SortRecord) -> Ordering {
        let last = self.orders.len() - 1;
        for (i, order) in self.orders.iter().enumerate() {
            let mut sa: &[u8] = &a.segments[i];
            let mut sb: &[u8] = &b.segments[i];
            if self.sequenced && i == last {
                sa = strip_sequence(sa);
                sb = strip_sequence(sb);
            }
            let cmp = match order {
                SortOrder::Ascending => sa.cmp(sb),
                SortOrder::Descending => sb.cmp(sa),
            };
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    }

    /// Total order used for in-pool sorting and merging: key comparison,
    /// with equal keys falling back to the sequence suffix.
    pub fn order(&self, a: &SortRecord, b: &SortRecord) -> Ordering {
        self.compare(a, b).then_with(|| {
            if self.sequenced {
                let last = self.orders.len() - 1;
                sequence_suffix(&a.segments[last]).cmp(sequence_suffix(&b.segments[last]))
            } else {
                Ordering::Equal
            }
        })
    }
}

#[inline]
fn strip_sequence(segment: &[u8]) -> &[u8] {
    &segment[..segment.len().saturating_sub(SEQUENCE_WIDTH)]
}

#[inline]
fn sequence_suffix(segment: &[u8]) -> &[u8] {
    &segment[segment.len().saturating_sub(SEQUENCE_WIDTH)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::SortField;

    fn record(segments: Vec<Vec<u8>>) -> SortRecord {
        SortRecord {
            segments,
            payload: Vec::new(),
        }
    }

    #[test]
    fn first_differing_segment_wins() {
        let spec = SortKeySpec::new(vec![SortField::asc(0), SortField::desc(1)]).unwrap();
        let cmp = RecordComparator::new(&spec, DuplicateHandling::Suppress);

        let a = record(vec![vec![1], vec![5]]);
        let b = record(vec![vec![1], vec![9]]);
        // Same first segment; second segment is descending, so 9 < 5.
        assert_eq!(cmp.compare(&b, &a), Ordering::Less);

        let c = record(vec![vec![2], vec![0]]);
        assert_eq!(cmp.compare(&a, &c), Ordering::Less);
    }

    #[test]
    fn equality_ignores_sequence_suffix() {
        let spec = SortKeySpec::ascending([0]).unwrap();
        let cmp = RecordComparator::new(&spec, DuplicateHandling::Preserve);

        let mut seg_a = vec![7u8];
        seg_a.extend_from_slice(&1u64.to_be_bytes());
        let mut seg_b = vec![7u8];
        seg_b.extend_from_slice(&2u64.to_be_bytes());
        assert_eq!(
            cmp.compare(&record(vec![seg_a]), &record(vec![seg_b])),
            Ordering::Equal
        );
    }

    #[test]
    fn order_breaks_ties_by_sequence() {
        let spec = SortKeySpec::ascending([0]).unwrap();
        let cmp = RecordComparator::new(&spec, DuplicateHandling::Preserve);

        let mut seg_a = vec![7u8];
        seg_a.extend_from_slice(&2u64.to_be_bytes());
        let mut seg_b = vec![7u8];
        seg_b.extend_from_slice(&1u64.to_be_bytes());
        let a = record(vec![seg_a]);
        let b = record(vec![seg_b]);
        assert_eq!(cmp.compare(&a, &b), Ordering::Equal);
        assert_eq!(cmp.order(&a, &b), Ordering::Greater);
        assert_eq!(cmp.order(&b, &a), Ordering::Less);
    }

    #[test]
    fn encoded_size_matches_run_layout() {
        let rec = record(vec![vec![1, 2, 3], vec![4]]);
        // count + (len + 3) + (len + 1) + (len + 0 payload)
        assert_eq!(rec.encoded_size(), 4 + 4 + 3 + 4 + 1 + 4);
    }
}
