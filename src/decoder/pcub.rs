//! Parity Check Update Block (PCUB): the check-node update.
//!
//! Grounded on `pcub()` in `ldpc_decode.py`, with the sum/exclude-self/sign
//! structure mirroring `decoder::arithmetic::Phif64::send_check_messages`
//! in the teacher.

use crate::fixed_point::{Fixed, PsiLut};

/// Computes the extrinsic check-to-variable messages for one row position.
///
/// For each input `v_i`: `p_i = psi(|v_i|)`; `total = sum(p)`;
/// `extrinsic_i = psi(total - p_i)`; output `i` is `s * sign(v_i) *
/// extrinsic_i`, where `s` is the product of all input signs (zero is
/// treated as positive) — i.e. the output is negative exactly when `v_i`
/// and the overall sign disagree.
pub fn pcub(input: &[Fixed]) -> Vec<Fixed> {
    let lut = PsiLut::shared();
    let psi_values: Vec<u8> = input.iter().map(|v| lut.psi(v.psi_index())).collect();
    let total: Fixed = psi_values
        .iter()
        .fold(Fixed::ZERO, |acc, &p| acc.saturating_add(Fixed::from_psi_index(p, false)));
    let overall_sign_negative = input.iter().filter(|v| v.is_negative()).count() % 2 == 1;

    input
        .iter()
        .zip(psi_values.iter())
        .map(|(v, &p)| {
            let decrease_self = total.saturating_sub(Fixed::from_psi_index(p, false));
            let extrinsic = lut.psi(decrease_self.psi_index());
            // output sign = s * sign(v_i); negative exactly when the
            // overall sign and this lane's sign disagree.
            let output_negative = overall_sign_negative != v.is_negative();
            Fixed::from_psi_index(extrinsic, output_negative)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn all_positive_inputs_give_positive_outputs() {
        // s = +1 (even number of negative signs, here zero); every output
        // agrees in sign with its input, so every output is positive too.
        let input = vec![Fixed::from_real(1.0), Fixed::from_real(2.0)];
        let out = pcub(&input);
        assert!(out.iter().all(|v| !v.is_negative()));
    }

    #[test]
    fn single_negative_input_flips_overall_sign() {
        let input = vec![Fixed::from_real(-1.0), Fixed::from_real(2.0)];
        let out = pcub(&input);
        // s = sign(-1)*sign(2) = -1: every output disagrees in sign with
        // its input.
        assert!(!out[0].is_negative());
        assert!(out[1].is_negative());
    }

    #[test]
    fn output_length_matches_input() {
        let input = vec![Fixed::from_real(0.5); 5];
        assert_eq!(pcub(&input).len(), 5);
    }

    #[test]
    fn saturated_lane_contributes_zero_to_total() {
        // A lane pinned at the saturation ceiling quantizes to the top of
        // the psi grid, whose psi value is 0 — it should not move the
        // other lanes' extrinsic output relative to a 2-input computation.
        let two = vec![Fixed::from_real(1.0), Fixed::from_real(2.0)];
        let three = vec![
            Fixed::from_real(1.0),
            Fixed::from_real(2.0),
            Fixed::saturation_ceiling(),
        ];
        let out_two = pcub(&two);
        let out_three = pcub(&three);
        assert_eq!(out_two[0].to_real(), out_three[0].to_real());
        assert_eq!(out_two[1].to_real(), out_three[1].to_real());
    }
}
