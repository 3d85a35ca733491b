//! The horizontal-layered decode loop: R-memory, the per-row sweep, and
//! convergence tracking.
//!
//! Grounded on `decoder()` in `ldpc_decode.py`, restructured in the shape
//! of the teacher's `horizontal_layered::Decoder` (a decoder struct that
//! owns the expanded `H` for its lifetime, with per-call scratch state
//! allocated fresh inside `decode`).

use crate::decoder::bit_update::BitUpdateBlock;
use crate::decoder::{check_codeword, pcub};
use crate::error::{Error, Result};
use crate::expand::expand_h;
use crate::fixed_point::Fixed;
use crate::shift_matrix::ShiftMatrix;
use crate::sparse::SparseMatrix;

/// Check-to-variable messages (R-memory), one `Fixed` per `(row, col, bit)`
/// edge of the shift matrix.
struct RMemory {
    /// Row-major over `(m, n, j)`.
    values: Vec<Fixed>,
    n: usize,
    b: usize,
}

impl RMemory {
    fn zeroed(m: usize, n: usize, b: usize) -> RMemory {
        RMemory {
            values: vec![Fixed::ZERO; m * n * b],
            n,
            b,
        }
    }

    fn index(&self, m: usize, n: usize, j: usize) -> usize {
        (m * self.n + n) * self.b + j
    }

    /// Returns the stored message, or `Fixed::ZERO` for a don't-care edge.
    /// Combined with [`BitUpdateBlock::to_router`]'s saturation-ceiling
    /// sentinel at the same `None` position, this reproduces the original
    /// scheduler's behavior (that lane's ψ contribution collapses to zero)
    /// without replicating the source's incidental negative-index read.
    fn get(&self, m: usize, n: usize, j: Option<usize>) -> Fixed {
        match j {
            None => Fixed::ZERO,
            Some(j) => self.values[self.index(m, n, j)],
        }
    }

    fn set(&mut self, m: usize, n: usize, j: Option<usize>, value: Fixed) {
        if let Some(j) = j {
            let idx = self.index(m, n, j);
            self.values[idx] = value;
        }
    }
}

/// The result of a decode attempt.
#[derive(Debug, Clone)]
pub struct DecoderOutput {
    /// The final bit estimate.
    pub codeword: Vec<u8>,
    /// How many iterations actually ran.
    pub iterations: usize,
    /// Whether `check_codeword` passed before the iteration budget ran out.
    pub converged: bool,
}

/// A layered belief-propagation decoder bound to one quasi-cyclic code.
pub struct Decoder {
    shift_matrix: ShiftMatrix,
    h: SparseMatrix,
}

impl Decoder {
    /// Builds a decoder for `shift_matrix`, expanding `H` once up front.
    pub fn new(shift_matrix: ShiftMatrix) -> Result<Decoder> {
        let h = expand_h(&shift_matrix);
        Ok(Decoder { shift_matrix, h })
    }

    /// Decodes `received` (one byte per bit, length `N*B`) for up to
    /// `max_iter` iterations, using `initial_llr` as the channel's LLR
    /// magnitude. Never fails on non-convergence; see
    /// [`DecoderOutput::converged`].
    pub fn decode(&self, received: &[u8], max_iter: usize, initial_llr: f64) -> Result<DecoderOutput> {
        let b = self.shift_matrix.block_size();
        let n = self.shift_matrix.num_block_cols();
        let m = self.shift_matrix.num_block_rows();
        let expected = n * b;
        if received.len() != expected {
            return Err(Error::ShapeMismatch {
                expected,
                actual: received.len(),
            });
        }
        if max_iter == 0 {
            return Err(Error::InvalidIterationBudget);
        }
        if !(initial_llr.is_finite() && initial_llr > 0.0) {
            return Err(Error::NonPositiveLlr(initial_llr));
        }

        let mut blocks: Vec<BitUpdateBlock> = (0..n)
            .map(|col| BitUpdateBlock::new(&received[col * b..(col + 1) * b], initial_llr))
            .collect();
        let mut r_memory = RMemory::zeroed(m, n, b);
        let mut estimate = received.to_vec();

        let mut iterations = 0;
        let mut converged = false;
        for _ in 0..max_iter {
            iterations += 1;
            if check_codeword(&self.h, &estimate) {
                converged = true;
                break;
            }

            for row in (0..m).rev() {
                let mut inds: Vec<Option<usize>> =
                    (0..n).map(|col| self.shift_matrix.get(row, col)).collect();
                for _ in 0..b {
                    let r_mem: Vec<Fixed> = (0..n).map(|col| r_memory.get(row, col, inds[col])).collect();
                    let col_sum: Vec<Fixed> = (0..n).map(|col| blocks[col].to_router(inds[col])).collect();
                    let to_pcub: Vec<Fixed> = col_sum
                        .iter()
                        .zip(r_mem.iter())
                        .map(|(&c, &r)| c.saturating_sub(r))
                        .collect();
                    let new_msg = pcub::pcub(&to_pcub);

                    for col in 0..n {
                        if inds[col].is_some() {
                            r_memory.set(row, col, inds[col], new_msg[col]);
                            blocks[col].from_router(inds[col], new_msg[col]);
                        }
                    }
                    for ind in inds.iter_mut() {
                        if let Some(j) = ind {
                            *j = (*j + 1) % b;
                        }
                    }
                }
            }

            estimate = blocks.iter().flat_map(BitUpdateBlock::hard_decision).collect();
            blocks.iter_mut().for_each(BitUpdateBlock::swap);
        }

        Ok(DecoderOutput {
            codeword: estimate,
            iterations,
            converged,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    // A tiny (3,1) regular-ish code: M=1 parity row, N=2 columns (1
    // message block + 1 parity block), block size 1, single repetition
    // check x0 + x1 = 0. Identity shift (0) on both columns, double
    // diagonal satisfied trivially (m=1 means the loop over `0..m-1` is
    // empty).
    fn tiny_code() -> ShiftMatrix {
        ShiftMatrix::new(1, 2, 1, vec![0, 0]).unwrap()
    }

    #[test]
    fn decodes_a_clean_codeword_immediately() {
        let decoder = Decoder::new(tiny_code()).unwrap();
        let out = decoder.decode(&[0, 0], 10, 2.75).unwrap();
        assert!(out.converged);
        assert_eq!(out.iterations, 1);
        assert_eq!(out.codeword, vec![0, 0]);
    }

    #[test]
    fn rejects_wrong_length() {
        let decoder = Decoder::new(tiny_code()).unwrap();
        assert!(matches!(
            decoder.decode(&[0], 10, 2.75),
            Err(Error::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn rejects_zero_iteration_budget() {
        let decoder = Decoder::new(tiny_code()).unwrap();
        assert!(matches!(
            decoder.decode(&[0, 0], 0, 2.75),
            Err(Error::InvalidIterationBudget)
        ));
    }

    #[test]
    fn rejects_non_positive_llr() {
        let decoder = Decoder::new(tiny_code()).unwrap();
        assert!(matches!(
            decoder.decode(&[0, 0], 10, 0.0),
            Err(Error::NonPositiveLlr(_))
        ));
    }

    #[test]
    fn corrects_a_single_flipped_bit() {
        let decoder = Decoder::new(tiny_code()).unwrap();
        let out = decoder.decode(&[1, 0], 10, 2.75).unwrap();
        assert!(out.converged);
        assert!(check_codeword(&decoder.h, &out.codeword));
    }

    // M=1, N=3, B=3: one message block shares its check row with a second
    // message block that has no edge at all and a parity block at a
    // non-identity shift. With B=3 the inner per-block loop (the R-memory
    // addressing and the `(j + 1) % b` index advance) actually runs more
    // than once per row, unlike every matrix above where B=1 made it a
    // no-op.
    fn multi_block_code() -> ShiftMatrix {
        ShiftMatrix::new(1, 3, 3, vec![0, -1, 1]).unwrap()
    }

    // H's only row, per sub-row r: codeword[r] ^ codeword[6 + (r+1)%3] = 0.
    fn multi_block_codeword() -> Vec<u8> {
        vec![1, 0, 1, 0, 0, 0, 1, 1, 0]
    }

    #[test]
    fn decodes_a_clean_multi_block_codeword_immediately() {
        let decoder = Decoder::new(multi_block_code()).unwrap();
        let codeword = multi_block_codeword();
        assert!(check_codeword(&decoder.h, &codeword));
        let out = decoder.decode(&codeword, 10, 2.75).unwrap();
        assert!(out.converged);
        assert_eq!(out.iterations, 1);
        assert_eq!(out.codeword, codeword);
    }

    #[test]
    fn recovers_from_a_flip_spanning_a_multi_bit_block() {
        let decoder = Decoder::new(multi_block_code()).unwrap();
        let mut received = multi_block_codeword();
        received[0] ^= 1;
        let out = decoder.decode(&received, 10, 2.75).unwrap();
        assert!(out.converged);
        assert!(check_codeword(&decoder.h, &out.codeword));
    }
}
