//! Watermark coefficient quantization.
//!
//! A fixed 4×4 step table combined with a fixed perceptual weight table.
//! Both sides of the pipeline must use these exact constants; they are shared
//! code, not configuration — a mismatch silently corrupts every bit.

/// Base quantization steps, JPEG-luminance derived.
const QUANT_STEP: [i32; 16] = [
    8, 6, 5, 8, //
    6, 6, 7, 10, //
    7, 7, 8, 12, //
    7, 9, 11, 15,
];

/// Perceptual weights, coarser towards the high frequencies.
const PERCEPTUAL_WEIGHT: [i32; 16] = [
    1, 1, 1, 2, //
    1, 1, 2, 2, //
    1, 2, 2, 3, //
    2, 2, 3, 3,
];

fn divisor(index: usize) -> f64 {
    (QUANT_STEP[index] * PERCEPTUAL_WEIGHT[index]) as f64
}

/// Scale a 4×4 coefficient block down: `round(in / (step · weight))`.
pub fn quantize(input: &[i32], output: &mut [i32]) {
    debug_assert_eq!(input.len(), 16);
    debug_assert_eq!(output.len(), 16);
    for i in 0..16 {
        output[i] = (input[i] as f64 / divisor(i)).round() as i32;
    }
}

/// Scale a 4×4 coefficient block back up: `in · step · weight`.
pub fn dequantize(input: &[i32], output: &mut [i32]) {
    debug_assert_eq!(input.len(), 16);
    debug_assert_eq!(output.len(), 16);
    for i in 0..16 {
        output[i] = (input[i] as f64 * divisor(i)).round() as i32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_rounds_to_nearest() {
        let mut input = [0i32; 16];
        input[0] = 20; // step 8 · weight 1 → 2.5 → 3
        input[1] = -20; // step 6 · weight 1 → -3.33 → -3
        let mut output = [0i32; 16];
        quantize(&input, &mut output);
        assert_eq!(output[0], 3);
        assert_eq!(output[1], -3);
    }

    #[test]
    fn dequantize_multiplies_back() {
        let mut input = [0i32; 16];
        input[0] = 3;
        input[15] = -2; // step 15 · weight 3 = 45
        let mut output = [0i32; 16];
        dequantize(&input, &mut output);
        assert_eq!(output[0], 24);
        assert_eq!(output[15], -90);
    }

    #[test]
    fn round_trip_error_is_bounded_by_half_a_step() {
        let input: Vec<i32> = (0..16).map(|i| i * 37 - 256).collect();
        let mut q = [0i32; 16];
        let mut back = [0i32; 16];
        quantize(&input, &mut q);
        dequantize(&q, &mut back);
        for i in 0..16 {
            let half_step = divisor(i) / 2.0;
            assert!(
                ((input[i] - back[i]).abs() as f64) <= half_step + 0.5,
                "index {i}: {} vs {}",
                input[i],
                back[i]
            );
        }
    }
}
