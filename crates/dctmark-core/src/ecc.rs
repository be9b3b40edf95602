//! Optional Reed-Solomon error correction over the payload bits.
//!
//! The engine consumes error correction as an opaque encode/decode service
//! over bit sequences; [`ErrorCorrection`] is that seam and [`ReedSolomon`]
//! the default implementation: RS over GF(2^8) with the primitive polynomial
//! 0x11D, systematic encoding, Berlekamp-Massey decoding with Chien search and
//! the Forney algorithm. The whole payload fits one (shortened) 255-symbol
//! block, with `parity_bytes / 2` correctable symbol errors.
//!
//! Bit contract: data bits are packed MSB-first into bytes (zero-filling the
//! final partial byte), parity symbols are appended, and the encoded sequence
//! is the original data bits followed by the `parity_bytes · 8` parity bits.
//! Both directions repeat the same packing, so the zero fill never reaches
//! the carrier.

use crate::bits::BitSequence;
use crate::error::WatermarkError;
use crate::result::Result;

use std::sync::OnceLock;

/// Parity encode/decode over bit sequences.
pub trait ErrorCorrection {
    /// Append `parity_bytes * 8` parity bits to `data`.
    fn encode(&self, data: &BitSequence, parity_bytes: usize) -> Result<BitSequence>;

    /// Correct `received` and return its leading data bits
    /// (`received.len() - parity_bytes * 8` of them).
    fn decode(&self, received: &BitSequence, parity_bytes: usize) -> Result<BitSequence>;
}

/// The default [`ErrorCorrection`] codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReedSolomon;

/// Maximum RS block size for GF(2^8).
const BLOCK_MAX: usize = 255;

/// Primitive polynomial x^8 + x^4 + x^3 + x^2 + 1.
const PRIM_POLY: u16 = 0x11D;

impl ErrorCorrection for ReedSolomon {
    fn encode(&self, data: &BitSequence, parity_bytes: usize) -> Result<BitSequence> {
        if parity_bytes == 0 {
            return Ok(data.clone());
        }
        let data_bytes = data.to_bytes();
        check_block(data_bytes.len(), parity_bytes)?;

        let gen = build_gen_poly(parity_bytes);
        let mut shift_reg = vec![0u8; parity_bytes];
        for &byte in &data_bytes {
            let feedback = byte ^ shift_reg[0];
            for j in 0..parity_bytes - 1 {
                shift_reg[j] = shift_reg[j + 1] ^ gf_mul(feedback, gen[j + 1]);
            }
            shift_reg[parity_bytes - 1] = gf_mul(feedback, gen[parity_bytes]);
        }

        let mut encoded = data.clone();
        for parity in shift_reg {
            encoded.add_value(u32::from(parity), 8);
        }
        Ok(encoded)
    }

    fn decode(&self, received: &BitSequence, parity_bytes: usize) -> Result<BitSequence> {
        if parity_bytes == 0 {
            return Ok(received.clone());
        }
        let parity_bits = parity_bytes * 8;
        let data_bits = received.len().saturating_sub(parity_bits);
        let data_bytes = received.fitted(data_bits).to_bytes();
        check_block(data_bytes.len(), parity_bytes)?;

        // codeword = packed data || parity, front-padded to a full block
        let block_len = data_bytes.len() + parity_bytes;
        let padding = BLOCK_MAX - block_len;
        let mut block = vec![0u8; BLOCK_MAX];
        block[padding..padding + data_bytes.len()].copy_from_slice(&data_bytes);
        for i in 0..parity_bytes {
            block[padding + data_bytes.len() + i] = received.value(data_bits + i * 8, 8) as u8;
        }

        let syndromes = compute_syndromes(&block, parity_bytes);
        if syndromes.iter().all(|&s| s == 0) {
            return Ok(received.fitted(data_bits));
        }

        let uncorrectable = || WatermarkError::EccUncorrectable {
            parity_bytes,
        };

        let sigma = berlekamp_massey(&syndromes);
        let num_errors = sigma.len() - 1;
        if num_errors > parity_bytes / 2 {
            return Err(uncorrectable());
        }

        let positions = chien_search(&sigma, num_errors).ok_or_else(uncorrectable)?;
        let magnitudes = forney(&sigma, &syndromes, &positions);
        for (&pos, &magnitude) in positions.iter().zip(magnitudes.iter()) {
            if pos < padding {
                // error located in the virtual zero padding of the shortened code
                return Err(uncorrectable());
            }
            block[pos] ^= magnitude;
        }

        if !compute_syndromes(&block, parity_bytes).iter().all(|&s| s == 0) {
            return Err(uncorrectable());
        }

        Ok(BitSequence::from_bytes(
            &block[padding..padding + data_bytes.len()],
            data_bits,
        ))
    }
}

fn check_block(data_bytes: usize, parity_bytes: usize) -> Result<()> {
    if data_bytes + parity_bytes > BLOCK_MAX {
        return Err(WatermarkError::EccBlockTooLarge(data_bytes + parity_bytes));
    }
    Ok(())
}

// --- GF(2^8) arithmetic ---

struct GfTables {
    exp: [u8; 512],
    log: [u8; 256],
}

fn gf_tables() -> &'static GfTables {
    static TABLES: OnceLock<GfTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for i in 0..255u16 {
            exp[i as usize] = x as u8;
            exp[(i + 255) as usize] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= PRIM_POLY;
            }
        }
        exp[510] = exp[0];
        exp[511] = exp[1];
        GfTables { exp, log }
    })
}

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = gf_tables();
    t.exp[t.log[a as usize] as usize + t.log[b as usize] as usize]
}

fn gf_inv(a: u8) -> u8 {
    debug_assert_ne!(a, 0);
    let t = gf_tables();
    t.exp[255 - t.log[a as usize] as usize]
}

/// α^n for n ≥ 0.
fn gf_exp(n: usize) -> u8 {
    gf_tables().exp[n % 255]
}

/// α^-n.
fn gf_exp_neg(n: usize) -> u8 {
    gf_tables().exp[(255 - n % 255) % 255]
}

/// g(x) = Π (x − α^i) for i in 0..parity_len, highest degree first.
fn build_gen_poly(parity_len: usize) -> Vec<u8> {
    let mut gen = vec![1u8];
    for i in 0..parity_len {
        let root = gf_exp(i);
        let mut next = vec![0u8; gen.len() + 1];
        for (d, &c) in gen.iter().enumerate() {
            next[d] ^= gf_mul(c, 1);
            next[d + 1] ^= gf_mul(c, root);
        }
        gen = next;
    }
    gen
}

/// Evaluate a highest-degree-first polynomial at x (Horner).
fn poly_eval(poly: &[u8], x: u8) -> u8 {
    poly.iter().fold(0u8, |acc, &c| gf_mul(acc, x) ^ c)
}

/// S_i = r(α^i) for i in 0..parity_len.
fn compute_syndromes(block: &[u8], parity_len: usize) -> Vec<u8> {
    (0..parity_len).map(|i| poly_eval(block, gf_exp(i))).collect()
}

/// Error locator polynomial, ascending power, sigma[0] = 1.
fn berlekamp_massey(syndromes: &[u8]) -> Vec<u8> {
    let n = syndromes.len();
    let mut c = vec![0u8; n + 1];
    let mut b = vec![0u8; n + 1];
    c[0] = 1;
    b[0] = 1;
    let mut c_len = 1usize;
    let mut b_len = 1usize;
    let mut ell = 0usize;
    let mut prev_delta = 1u8;
    let mut m = 1usize;

    for r in 0..n {
        let mut delta = syndromes[r];
        for i in 1..c_len {
            delta ^= gf_mul(c[i], syndromes[r - i]);
        }
        if delta == 0 {
            m += 1;
            continue;
        }

        let factor = gf_mul(delta, gf_inv(prev_delta));
        if 2 * ell <= r {
            let old_c = c.clone();
            let old_c_len = c_len;
            c_len = (b_len + m).max(c_len);
            for j in 0..b_len {
                c[j + m] ^= gf_mul(factor, b[j]);
            }
            b[..old_c_len].copy_from_slice(&old_c[..old_c_len]);
            b[old_c_len..].fill(0);
            b_len = old_c_len;
            ell = r + 1 - ell;
            prev_delta = delta;
            m = 1;
        } else {
            c_len = (b_len + m).max(c_len);
            for j in 0..b_len {
                c[j + m] ^= gf_mul(factor, b[j]);
            }
            m += 1;
        }
    }
    // trim to the true degree, the length bound may overshoot with zeros
    while c_len > 1 && c[c_len - 1] == 0 {
        c_len -= 1;
    }
    c[..c_len].to_vec()
}

/// Evaluate an ascending-power polynomial at x.
fn eval_asc(poly: &[u8], x: u8) -> u8 {
    let mut result = 0u8;
    let mut x_pow = 1u8;
    for &c in poly {
        result ^= gf_mul(c, x_pow);
        x_pow = gf_mul(x_pow, x);
    }
    result
}

/// Find the array positions of all errors, or `None` if the locator degree
/// does not match the number of roots (more errors than correctable).
fn chien_search(sigma: &[u8], num_errors: usize) -> Option<Vec<usize>> {
    let mut positions = Vec::with_capacity(num_errors);
    for p in 0..BLOCK_MAX {
        // error at GF position p means sigma(α^-p) = 0, array index n-1-p
        if eval_asc(sigma, gf_exp_neg(p)) == 0 {
            positions.push(BLOCK_MAX - 1 - p);
        }
    }
    (positions.len() == num_errors).then_some(positions)
}

/// Error magnitudes for the found positions, FCR = 0.
fn forney(sigma: &[u8], syndromes: &[u8], positions: &[usize]) -> Vec<u8> {
    let two_t = syndromes.len();

    // omega(x) = S(x) · sigma(x) mod x^2t, ascending power
    let mut omega = vec![0u8; two_t];
    for (i, &sc) in sigma.iter().enumerate().take(two_t) {
        for (j, &sy) in syndromes.iter().enumerate() {
            if i + j < two_t {
                omega[i + j] ^= gf_mul(sc, sy);
            }
        }
    }

    // formal derivative: only odd-power terms survive in GF(2^m)
    let mut sigma_prime = vec![0u8; sigma.len().saturating_sub(1)];
    for i in (1..sigma.len()).step_by(2) {
        sigma_prime[i - 1] = sigma[i];
    }

    positions
        .iter()
        .map(|&pos| {
            let gf_pos = BLOCK_MAX - 1 - pos;
            let x = gf_exp(gf_pos);
            let x_inv = gf_exp_neg(gf_pos);
            let denom = eval_asc(&sigma_prime, x_inv);
            if denom == 0 {
                0
            } else {
                gf_mul(x, gf_mul(eval_asc(&omega, x_inv), gf_inv(denom)))
            }
        })
        .collect()
}
