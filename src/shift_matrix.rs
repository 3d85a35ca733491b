//! The quasi-cyclic shift matrix `P` and its plain-text interchange format.
//!
//! `P` is the compact (M×N) description of a quasi-cyclic parity-check
//! matrix: each cell names either "no edge" or the cyclic shift of a B×B
//! identity block. [`crate::expand::expand_h`] turns a `ShiftMatrix` into
//! the full sparse `H`.

use std::fmt::Write as _;

use crate::error::{Error, Result};

/// A quasi-cyclic shift matrix: M rows, N columns, block size B.
///
/// Entries are stored row-major. `None` means "zero block"; `Some(shift)`
/// means "B×B identity cyclically shifted by `shift`", with `shift` always
/// normalized into `[0, b)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftMatrix {
    m: usize,
    n: usize,
    b: usize,
    entries: Vec<Option<usize>>,
}

impl ShiftMatrix {
    /// Builds a shift matrix from a flat, row-major list of raw entries.
    ///
    /// A raw entry of `-1` becomes `None`; any other value `v` becomes
    /// `Some(v.rem_euclid(b))`. Values below `-1` are rejected.
    pub fn new(m: usize, n: usize, b: usize, raw: Vec<i64>) -> Result<ShiftMatrix> {
        if b == 0 {
            return Err(Error::InvalidBlockSize);
        }
        if raw.len() != m * n {
            return Err(Error::InvalidShiftMatrix(format!(
                "expected {} entries for a {}x{} matrix, got {}",
                m * n,
                m,
                n,
                raw.len()
            )));
        }
        let entries = raw
            .into_iter()
            .map(|v| match v {
                ..=-2 => Err(Error::InvalidShiftMatrix(format!(
                    "entry {v} is neither -1 nor a non-negative shift"
                ))),
                -1 => Ok(None),
                shift => Ok(Some(shift.rem_euclid(b as i64) as usize)),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ShiftMatrix { m, n, b, entries })
    }

    /// Number of block rows.
    pub fn num_block_rows(&self) -> usize {
        self.m
    }

    /// Number of block columns.
    pub fn num_block_cols(&self) -> usize {
        self.n
    }

    /// Block size B.
    pub fn block_size(&self) -> usize {
        self.b
    }

    /// The normalized shift at block `(row, col)`, or `None` for a zero block.
    pub fn get(&self, row: usize, col: usize) -> Option<usize> {
        self.entries[row * self.n + col]
    }

    /// Iterates over `(row, col, shift)` for every non-zero block, row-major.
    pub fn iter_edges(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.entries.iter().enumerate().filter_map(move |(idx, e)| {
            e.map(|shift| {
                let row = idx / self.n;
                let col = idx % self.n;
                (row, col, shift)
            })
        })
    }

    /// Whether the parity columns are double-diagonal: for every row
    /// `i in 0..m-1`, the very next parity column, `n-m+i+1`, has an
    /// identity block (`Some(0)`) at row `i`.
    ///
    /// This is the necessary condition for the double-diagonal
    /// back-substitution in [`crate::encoder`] to produce a codeword that
    /// actually satisfies row `i`'s parity check: `encode` solves row `i`
    /// for block `n-m+i+1` by moving every other block to the other side,
    /// which is only valid when that block's own coefficient is the
    /// identity. Generalizes the teacher's `encoder::staircase::is_staircase`
    /// (which checked the analogous pattern on an expanded binary `H`) to a
    /// shift matrix.
    pub fn is_double_diagonal(&self) -> bool {
        if self.m == 0 || self.n < self.m {
            return false;
        }
        let first_parity_col = self.n - self.m;
        (0..self.m.saturating_sub(1))
            .all(|i| self.get(i, first_parity_col + i + 1) == Some(0))
    }

    /// Serializes this matrix in the plain-text interchange format: line 1
    /// is M, line 2 is N, line 3 is B, followed by M·N raw shift values
    /// (`-1` for no edge) in **reverse-row, reverse-column** order.
    pub fn write_dump<W: std::fmt::Write>(&self, w: &mut W) -> std::fmt::Result {
        writeln!(w, "{}", self.m)?;
        writeln!(w, "{}", self.n)?;
        writeln!(w, "{}", self.b)?;
        for row in (0..self.m).rev() {
            for col in (0..self.n).rev() {
                let raw = self.get(row, col).map_or(-1, |s| s as i64);
                writeln!(w, "{raw}")?;
            }
        }
        Ok(())
    }

    /// Renders [`ShiftMatrix::write_dump`] to an owned `String`.
    pub fn dump(&self) -> String {
        let mut s = String::new();
        self.write_dump(&mut s).expect("String writes never fail");
        s
    }

    /// Parses the format written by [`ShiftMatrix::write_dump`].
    pub fn from_dump(text: &str) -> Result<ShiftMatrix> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let parse_usize = |s: Option<&str>, field: &str| -> Result<usize> {
            s.ok_or_else(|| Error::InvalidShiftMatrix(format!("missing {field}")))?
                .parse()
                .map_err(|_| Error::InvalidShiftMatrix(format!("malformed {field}")))
        };
        let m = parse_usize(lines.next(), "row count")?;
        let n = parse_usize(lines.next(), "column count")?;
        let b = parse_usize(lines.next(), "block size")?;
        let mut values: Vec<i64> = Vec::with_capacity(m * n);
        for line in lines {
            values.push(
                line.parse()
                    .map_err(|_| Error::InvalidShiftMatrix(format!("malformed entry {line:?}")))?,
            );
        }
        if values.len() != m * n {
            return Err(Error::InvalidShiftMatrix(format!(
                "expected {} entries, got {}",
                m * n,
                values.len()
            )));
        }
        // Entries were written reverse-row, reverse-column; undo that.
        let mut raw = vec![0i64; m * n];
        let mut it = values.into_iter();
        for row in (0..m).rev() {
            for col in (0..n).rev() {
                raw[row * n + col] = it.next().expect("length checked above");
            }
        }
        ShiftMatrix::new(m, n, b, raw)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> ShiftMatrix {
        // 2x3 matrix, block size 4: a tiny double-diagonal-friendly shape.
        ShiftMatrix::new(2, 3, 4, vec![1, 0, -1, -1, 2, 0]).unwrap()
    }

    #[test]
    fn normalizes_negative_shifts() {
        let h = ShiftMatrix::new(1, 1, 4, vec![-5]).unwrap();
        assert_eq!(h.get(0, 0), Some(3));
    }

    #[test]
    fn rejects_bad_entry_count() {
        assert!(ShiftMatrix::new(2, 2, 4, vec![0, 0, 0]).is_err());
    }

    #[test]
    fn rejects_zero_block_size() {
        assert!(ShiftMatrix::new(1, 1, 0, vec![0]).is_err());
    }

    #[test]
    fn rejects_entries_below_negative_one() {
        assert!(ShiftMatrix::new(1, 1, 4, vec![-2]).is_err());
    }

    #[test]
    fn get_and_iter_edges_agree() {
        let h = sample();
        let edges: Vec<_> = h.iter_edges().collect();
        assert_eq!(edges.len(), 4);
        for (row, col, shift) in edges {
            assert_eq!(h.get(row, col), Some(shift));
        }
        assert_eq!(h.get(0, 2), None);
    }

    #[test]
    fn dump_round_trip() {
        let h = sample();
        let text = h.dump();
        let parsed = ShiftMatrix::from_dump(&text).unwrap();
        assert_eq!(h, parsed);
    }

    #[test]
    fn dump_header_fields() {
        let h = sample();
        let text = h.dump();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("2"));
        assert_eq!(lines.next(), Some("3"));
        assert_eq!(lines.next(), Some("4"));
    }

    #[test]
    fn double_diagonal_accepts_staircase() {
        // M=3, N=5: parity columns are 2, 3, 4. Row i must carry an
        // identity block at column i+1's position (2+i+1) for i in 0..2.
        let raw = vec![
            1, 0, 2, 0, -1, //
            0, 1, -1, 3, 0, //
            2, 0, -1, -1, 1, //
        ];
        let h = ShiftMatrix::new(3, 5, 4, raw).unwrap();
        assert!(h.is_double_diagonal());
    }

    #[test]
    fn double_diagonal_rejects_missing_identity() {
        let raw = vec![
            1, 0, 2, -1, -1, //
            0, 1, -1, 3, 0, //
            2, 0, -1, -1, 1, //
        ];
        let h = ShiftMatrix::new(3, 5, 4, raw).unwrap();
        assert!(!h.is_double_diagonal());
    }
}
