use orka_key::Datum;
use orka_result::{Error, Result};

/// Traversal direction of a range scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDirection {
    Forward,
    Reverse,
}

impl ScanDirection {
    /// Sign used when comparing a key fragment against the end bound: +1 for
    /// forward travel, -1 for reverse.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            ScanDirection::Forward => 1,
            ScanDirection::Reverse => -1,
        }
    }
}

/// One bound field: either a literal value or a placeholder resolved against
/// the query bindings at open time.
#[derive(Debug, Clone)]
pub enum BoundExpr {
    Literal(Datum),
    Placeholder(usize),
}

impl BoundExpr {
    pub fn eval<'a>(&'a self, bindings: &'a [Datum]) -> Result<&'a Datum> {
        match self {
            BoundExpr::Literal(d) => Ok(d),
            BoundExpr::Placeholder(i) => bindings.get(*i).ok_or_else(|| {
                Error::Internal(format!("placeholder {i} has no binding"))
            }),
        }
    }
}

impl From<Datum> for BoundExpr {
    fn from(d: Datum) -> Self {
        BoundExpr::Literal(d)
    }
}

/// One side of a range restriction: per-field bound expressions plus an
/// inclusivity flag.
#[derive(Debug, Clone)]
pub struct RangeBound {
    exprs: Vec<BoundExpr>,
    inclusive: bool,
}

impl RangeBound {
    pub fn new(exprs: Vec<BoundExpr>, inclusive: bool) -> Self {
        Self { exprs, inclusive }
    }

    /// Convenience constructor for all-literal bounds.
    pub fn literals(values: Vec<Datum>, inclusive: bool) -> Self {
        Self::new(values.into_iter().map(BoundExpr::Literal).collect(), inclusive)
    }

    #[inline]
    pub fn exprs(&self) -> &[BoundExpr] {
        &self.exprs
    }

    #[inline]
    pub fn inclusive(&self) -> bool {
        self.inclusive
    }

    pub fn eval<'a>(&'a self, bindings: &'a [Datum]) -> Result<Vec<&'a Datum>> {
        self.exprs.iter().map(|e| e.eval(bindings)).collect()
    }
}

/// A two-sided key range over the leading fields of an index.
///
/// Both bounds must restrict the same number of leading fields. The
/// cross-field invariants (equal-except-last, lo <= hi on the last field) are
/// enforced when the bounds are evaluated at open time, because placeholder
/// values are not known earlier.
#[derive(Debug, Clone)]
pub struct KeyRange {
    lo: RangeBound,
    hi: RangeBound,
}

impl KeyRange {
    pub fn new(lo: RangeBound, hi: RangeBound) -> Result<Self> {
        if lo.exprs().len() != hi.exprs().len() {
            return Err(Error::range_inconsistency(format!(
                "lo bounds {} fields, hi bounds {}",
                lo.exprs().len(),
                hi.exprs().len()
            )));
        }
        if lo.exprs().is_empty() {
            return Err(Error::range_inconsistency("range restricts no fields"));
        }
        Ok(Self { lo, hi })
    }

    #[inline]
    pub fn lo(&self) -> &RangeBound {
        &self.lo
    }

    #[inline]
    pub fn hi(&self) -> &RangeBound {
        &self.hi
    }

    /// Number of leading index fields restricted by this range.
    #[inline]
    pub fn bound_fields(&self) -> usize {
        self.lo.exprs().len()
    }
}
