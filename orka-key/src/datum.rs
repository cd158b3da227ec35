use std::cmp::Ordering;

/// A tag naming the storage type of one column.
///
/// This is a simple, C-like enum that is cheap to store and copy. A slice of
/// these describes a row shape and drives payload decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Int,
    Float,
    Text,
    Bytes,
}

/// One column value, possibly SQL null.
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl Datum {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Datum::Null)
    }

    /// The field type this value belongs to, or `None` for null.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Datum::Null => None,
            Datum::Bool(_) => Some(FieldType::Bool),
            Datum::Int(_) => Some(FieldType::Int),
            Datum::Float(_) => Some(FieldType::Float),
            Datum::Text(_) => Some(FieldType::Text),
            Datum::Bytes(_) => Some(FieldType::Bytes),
        }
    }

    /// SQL ordering between two values of the same type, nulls first.
    ///
    /// Returns `None` when the types genuinely differ (a caller error at the
    /// range-bound layer). Floats compare under IEEE total order so that the
    /// result is consistent with the key encoding.
    pub fn sql_cmp(&self, other: &Datum) -> Option<Ordering> {
        match (self, other) {
            (Datum::Null, Datum::Null) => Some(Ordering::Equal),
            (Datum::Null, _) => Some(Ordering::Less),
            (_, Datum::Null) => Some(Ordering::Greater),
            (Datum::Bool(a), Datum::Bool(b)) => Some(a.cmp(b)),
            (Datum::Int(a), Datum::Int(b)) => Some(a.cmp(b)),
            (Datum::Float(a), Datum::Float(b)) => Some(a.total_cmp(b)),
            (Datum::Text(a), Datum::Text(b)) => Some(a.cmp(b)),
            (Datum::Bytes(a), Datum::Bytes(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Bool(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::Int(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Float(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Text(v.to_string())
    }
}

/// An owned row of column values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    values: Vec<Datum>,
}

impl Row {
    pub fn new(values: Vec<Datum>) -> Self {
        Self { values }
    }

    #[inline]
    pub fn values(&self) -> &[Datum] {
        &self.values
    }

    #[inline]
    pub fn value(&self, field: usize) -> &Datum {
        &self.values[field]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Datum> {
        self.values
    }
}

impl From<Vec<Datum>> for Row {
    fn from(values: Vec<Datum>) -> Self {
        Row::new(values)
    }
}
