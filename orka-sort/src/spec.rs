use orka_result::{Error, Result};

/// Per-field sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// One sort field: the row field index and its direction.
#[derive(Debug, Clone, Copy)]
pub struct SortField {
    pub field: usize,
    pub order: SortOrder,
}

impl SortField {
    pub fn asc(field: usize) -> Self {
        Self {
            field,
            order: SortOrder::Ascending,
        }
    }

    pub fn desc(field: usize) -> Self {
        Self {
            field,
            order: SortOrder::Descending,
        }
    }
}

/// A maximal run of consecutive sort fields sharing one direction.
///
/// Each segment gets its own byte-comparable key encoding and its own
/// comparator, because a descending field cannot share an ascending
/// byte-lexicographic encoding.
#[derive(Debug, Clone, Copy)]
pub struct DirectionSegment {
    /// First sort-field position covered (index into the spec, not the row).
    pub start: usize,
    /// One past the last covered position.
    pub end: usize,
    pub order: SortOrder,
}

/// The requested output order: an ordered list of sort fields, partitioned
/// once at construction into direction segments.
#[derive(Debug, Clone)]
pub struct SortKeySpec {
    fields: Vec<SortField>,
    segments: Vec<DirectionSegment>,
}

impl SortKeySpec {
    pub fn new(fields: Vec<SortField>) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::InvalidArgument(
                "sort spec must name at least one field".into(),
            ));
        }
        let mut segments = Vec::new();
        let mut start = 0usize;
        for i in 1..fields.len() {
            if fields[i].order != fields[start].order {
                segments.push(DirectionSegment {
                    start,
                    end: i,
                    order: fields[start].order,
                });
                start = i;
            }
        }
        segments.push(DirectionSegment {
            start,
            end: fields.len(),
            order: fields[start].order,
        });
        Ok(Self { fields, segments })
    }

    /// Spec with every field ascending.
    pub fn ascending(fields: impl IntoIterator<Item = usize>) -> Result<Self> {
        Self::new(fields.into_iter().map(SortField::asc).collect())
    }

    #[inline]
    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    #[inline]
    pub fn segments(&self) -> &[DirectionSegment] {
        &self.segments
    }

    /// Largest row field index named by the spec.
    pub fn max_field(&self) -> usize {
        self.fields.iter().map(|f| f.field).max().unwrap_or(0)
    }

    /// The same spec with every direction flipped.
    pub fn inverted(&self) -> Self {
        let flipped = self
            .fields
            .iter()
            .map(|f| SortField {
                field: f.field,
                order: match f.order {
                    SortOrder::Ascending => SortOrder::Descending,
                    SortOrder::Descending => SortOrder::Ascending,
                },
            })
            .collect();
        // A non-empty spec stays non-empty; construction cannot fail.
        Self::new(flipped).expect("inverting a valid spec")
    }
}

/// Whether equal rows collapse to one on output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateHandling {
    /// Keep every row; ties between equal keys preserve input order.
    Preserve,
    /// Emit each distinct key once, keeping the first occurrence's payload.
    Suppress,
}
