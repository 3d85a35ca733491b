//! Fixed-point Q2.4 grid and the ψ(x) = \|log tanh(x/2)\| lookup table.
//!
//! This models the hardware's 6-bit unsigned magnitude grid (2 integer bits,
//! 4 fractional bits, step 1/16) and the saturating signed accumulator domain
//! built on top of it. `0.0625` is exactly representable in binary
//! floating point, so every value that ever flows through this module is an
//! exact multiple of the grid step: there is no float rounding drift to
//! reason about, only the deliberate nearest-grid-point quantization below.

use std::sync::OnceLock;

/// Grid step (1/16).
pub const STEP: f64 = 0.0625;
/// Largest index into the 64-point ψ-domain magnitude grid.
pub const GRID_MAX_INDEX: u8 = 63;
/// Largest magnitude representable on the ψ-domain grid (3.9375).
pub const GRID_MAX_VALUE: f64 = GRID_MAX_INDEX as f64 * STEP;
/// Largest magnitude representable by a saturating accumulator (7.875).
pub const SATURATION_CEILING: f64 = 7.875;
/// Smallest (most negative) value representable by a saturating accumulator.
pub const SATURATION_FLOOR: f64 = -SATURATION_CEILING;

// Number of grid points spanning the wider accumulator range [0, 7.875].
const ACCUMULATOR_MAX_INDEX: u8 = 126;

/// Finds the grid index in `0..=max_index` whose value `index * STEP` is
/// closest to `target`. Ties are broken toward the smaller index (and hence
/// the smaller magnitude), since [`Iterator::min_by`] keeps the first of two
/// equally-good candidates and the candidates are scanned in ascending order.
fn nearest_tick(target: f64, max_index: u8) -> u8 {
    (0..=max_index)
        .min_by(|&a, &b| {
            let da = (f64::from(a) * STEP - target).abs();
            let db = (f64::from(b) * STEP - target).abs();
            da.partial_cmp(&db).unwrap()
        })
        .expect("range is non-empty")
}

/// The 64-point unsigned Q2.4 magnitude grid.
#[derive(Debug, Clone, Copy)]
pub struct Grid;

impl Grid {
    /// Returns the real value represented by a ψ-domain grid index.
    pub fn value(index: u8) -> f64 {
        f64::from(index) * STEP
    }

    /// Quantizes a magnitude onto the 64-point ψ-domain grid, clamping
    /// (via nearest-point rounding) values above [`GRID_MAX_VALUE`] down to
    /// the top of the grid.
    pub fn quantize(magnitude: f64) -> u8 {
        nearest_tick(magnitude.abs(), GRID_MAX_INDEX)
    }

    /// Quantizes a magnitude onto the wider 127-point accumulator grid
    /// (`[0, 7.875]`), used for channel LLR baselines and column sums.
    fn quantize_wide(magnitude: f64) -> f64 {
        f64::from(nearest_tick(magnitude.abs(), ACCUMULATOR_MAX_INDEX)) * STEP
    }
}

/// ψ(x) = \|log tanh(x/2)\|, tabulated over the 64-point grid.
///
/// The endpoints are wired so that ψ(0) = 3.9375 and ψ(3.9375) = 0, matching
/// the real-valued function's behavior at the boundary of the grid. Every
/// interior point is the grid-quantized value of the real-valued ψ; since
/// several real inputs can quantize to the same table entry, ψ is only an
/// exact involution at the endpoints and approximately one elsewhere — it is
/// however exactly monotonically non-increasing, which is what the
/// check-node update in [`crate::decoder::pcub`] actually relies on.
#[derive(Debug, Clone)]
pub struct PsiLut {
    table: [u8; GRID_MAX_INDEX as usize + 1],
}

impl PsiLut {
    /// Builds the ψ lookup table.
    pub fn new() -> PsiLut {
        let mut table = [0u8; GRID_MAX_INDEX as usize + 1];
        table[0] = GRID_MAX_INDEX;
        table[GRID_MAX_INDEX as usize] = 0;
        for index in 1..GRID_MAX_INDEX {
            let x = Grid::value(index);
            let psi = (0.5 * x).tanh().ln().abs();
            table[index as usize] = Grid::quantize(psi);
        }
        PsiLut { table }
    }

    /// Looks up ψ at a grid index.
    pub fn psi(&self, index: u8) -> u8 {
        self.table[usize::from(index)]
    }

    /// Returns a process-wide shared instance, built once.
    pub fn shared() -> &'static PsiLut {
        static LUT: OnceLock<PsiLut> = OnceLock::new();
        LUT.get_or_init(PsiLut::new)
    }
}

impl Default for PsiLut {
    fn default() -> Self {
        PsiLut::new()
    }
}

/// A signed saturating fixed-point value in `[-7.875, +7.875]`.
///
/// This is the single numeric type used throughout the decoder: channel LLR
/// baselines, column sums, R-memory entries and PCUB inputs/outputs are all
/// `Fixed`. The ψ-domain grid (`[0, 3.9375]`) is a subset of this range, so
/// a `Fixed` can always be handed to [`PsiLut::psi`] via [`Fixed::psi_index`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed(f64);

impl Fixed {
    /// The additive identity (also the "positive" sign per §9's convention
    /// that zero counts as positive).
    pub const ZERO: Fixed = Fixed(0.0);

    /// The saturation ceiling, `+7.875`. This is also the sentinel value
    /// returned by `to_router` at a `None` edge (see
    /// [`crate::decoder::bit_update::BitUpdateBlock::to_router`]).
    pub fn saturation_ceiling() -> Fixed {
        Fixed(SATURATION_CEILING)
    }

    /// Quantizes a real-valued LLR onto the accumulator grid, saturating at
    /// `±7.875`.
    pub fn from_real(value: f64) -> Fixed {
        let magnitude = Grid::quantize_wide(value);
        Fixed(if value.is_sign_negative() && magnitude != 0.0 {
            -magnitude
        } else {
            magnitude
        })
    }

    /// Builds a signed value from a ψ-domain magnitude index and a sign.
    pub fn from_psi_index(index: u8, negative: bool) -> Fixed {
        let magnitude = Grid::value(index);
        Fixed(if negative && magnitude != 0.0 {
            -magnitude
        } else {
            magnitude
        })
    }

    /// Whether the sign bit is set. Zero is considered positive.
    pub fn is_negative(&self) -> bool {
        self.0 < 0.0
    }

    /// The unsigned magnitude.
    pub fn magnitude(&self) -> f64 {
        self.0.abs()
    }

    /// The ψ-domain grid index of this value's magnitude (values whose
    /// magnitude exceeds [`GRID_MAX_VALUE`] round down to the top of the
    /// grid).
    pub fn psi_index(&self) -> u8 {
        Grid::quantize(self.magnitude())
    }

    /// Adds two values, saturating at `±7.875`.
    pub fn saturating_add(&self, other: Fixed) -> Fixed {
        Fixed((self.0 + other.0).clamp(SATURATION_FLOOR, SATURATION_CEILING))
    }

    /// Subtracts two values, saturating at `±7.875`.
    pub fn saturating_sub(&self, other: Fixed) -> Fixed {
        Fixed((self.0 - other.0).clamp(SATURATION_FLOOR, SATURATION_CEILING))
    }

    /// The represented real value.
    pub fn to_real(&self) -> f64 {
        self.0
    }
}

impl Default for Fixed {
    fn default() -> Self {
        Fixed::ZERO
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn grid_endpoints() {
        assert_eq!(Grid::value(0), 0.0);
        assert_eq!(Grid::value(GRID_MAX_INDEX), 3.9375);
    }

    #[test]
    fn quantize_exact_points() {
        for index in 0..=GRID_MAX_INDEX {
            assert_eq!(Grid::quantize(Grid::value(index)), index);
        }
    }

    #[test]
    fn quantize_saturates_above_range() {
        assert_eq!(Grid::quantize(100.0), GRID_MAX_INDEX);
    }

    #[test]
    fn quantize_ties_toward_smaller_magnitude() {
        // Exactly halfway between grid points 2 (0.125) and 3 (0.1875).
        let halfway = (Grid::value(2) + Grid::value(3)) / 2.0;
        assert_eq!(Grid::quantize(halfway), 2);
    }

    #[test]
    fn psi_endpoints_swap() {
        let lut = PsiLut::new();
        assert_eq!(Grid::value(lut.psi(0)), 3.9375);
        assert_eq!(Grid::value(lut.psi(GRID_MAX_INDEX)), 0.0);
    }

    #[test]
    fn psi_is_monotonically_non_increasing() {
        // psi is decreasing as a real function; the tabulated values must
        // preserve that ordering even after quantization, or the check-node
        // update's self-subtraction step could move extrinsic messages in
        // the wrong direction.
        let lut = PsiLut::new();
        for index in 0..GRID_MAX_INDEX {
            assert!(lut.psi(index) >= lut.psi(index + 1));
        }
    }

    #[test]
    fn fixed_saturates() {
        let mut acc = Fixed::ZERO;
        for _ in 0..200 {
            acc = acc.saturating_add(Fixed::from_real(1.0));
        }
        assert_eq!(acc.to_real(), SATURATION_CEILING);
        for _ in 0..400 {
            acc = acc.saturating_sub(Fixed::from_real(1.0));
        }
        assert_eq!(acc.to_real(), SATURATION_FLOOR);
    }

    #[test]
    fn fixed_zero_sign_is_positive() {
        assert!(!Fixed::ZERO.is_negative());
    }

    #[test]
    fn saturation_ceiling_matches_grid() {
        assert_eq!(Fixed::saturation_ceiling().to_real(), SATURATION_CEILING);
    }
}
