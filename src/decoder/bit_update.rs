//! Bit-Update Block: per-column-block state for the layered decoder.
//!
//! One instance lives per message/codeword block column. It owns that
//! column's channel baseline and its ping-pong column-sum memory, and is
//! the only thing in the scheduler that ever produces a hard decision.
//! Grounded on `BitUpdateBlock.py`.

use crate::fixed_point::Fixed;

/// Per-column state: the channel baseline and a two-bank column-sum memory.
#[derive(Debug, Clone)]
pub struct BitUpdateBlock {
    /// `(-1)^bit * initial_llr`, quantized once at construction.
    baseline: Vec<Fixed>,
    /// `banks[choose]` is the bank currently being written; the other bank
    /// holds the previous iteration's converged values and is read from.
    banks: [Vec<Fixed>; 2],
    choose: bool,
}

impl BitUpdateBlock {
    /// Builds a block from this column's received bits and the channel's
    /// initial LLR magnitude. Both banks start at the baseline.
    pub fn new(received_bits: &[u8], initial_llr: f64) -> BitUpdateBlock {
        let baseline: Vec<Fixed> = received_bits
            .iter()
            .map(|&bit| {
                let sign = if bit % 2 == 1 { -1.0 } else { 1.0 };
                Fixed::from_real(sign * initial_llr)
            })
            .collect();
        BitUpdateBlock {
            banks: [baseline.clone(), baseline.clone()],
            baseline,
            choose: false,
        }
    }

    fn write_bank(&self) -> usize {
        usize::from(self.choose)
    }

    fn read_bank(&self) -> usize {
        usize::from(!self.choose)
    }

    /// Value handed to the router for an edge. `None` (no edge at this
    /// position in the shift matrix) returns the saturation ceiling, which
    /// always pushes that lane's ψ contribution to zero (see
    /// [`crate::decoder::pcub`]) — a deliberate, deterministic don't-care.
    pub fn to_router(&self, j: Option<usize>) -> Fixed {
        match j {
            None => Fixed::saturation_ceiling(),
            Some(j) => self.banks[self.read_bank()][j],
        }
    }

    /// Accumulates a routed message into the write bank. No-op at `None`.
    pub fn from_router(&mut self, j: Option<usize>, delta: Fixed) {
        if let Some(j) = j {
            let bank = self.write_bank();
            self.banks[bank][j] = self.banks[bank][j].saturating_add(delta);
        }
    }

    /// The bit estimate for this block: 1 where the read bank is negative.
    pub fn hard_decision(&self) -> Vec<u8> {
        self.banks[self.read_bank()]
            .iter()
            .map(|v| u8::from(v.is_negative()))
            .collect()
    }

    /// Flips the read/write banks and resets the new write bank to the
    /// channel baseline, ready for the next iteration.
    pub fn swap(&mut self) {
        self.choose = !self.choose;
        self.banks[self.write_bank()] = self.baseline.clone();
    }
}
