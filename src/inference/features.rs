//! Hashed character n-gram feature extraction.
//!
//! URLs are lowercased, split into overlapping byte n-grams, and each n-gram
//! is hashed (FNV-1a) into a fixed feature dimension. The resulting count
//! vector is l2-normalized so that inputs of different lengths are comparable.
//! The same hashing scheme is used at training time, so the feature dimension
//! is dictated by the artifact's weight shape.

use ndarray::Array1;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// FNV-1a hash over a byte slice.
fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Build the l2-normalized hashed n-gram feature vector for `input`.
///
/// Inputs shorter than the n-gram order contribute a single gram covering the
/// whole string; an empty input yields the zero vector.
pub fn feature_vector(input: &str, ngram: usize, dim: usize) -> Array1<f32> {
    let lowered = input.to_lowercase();
    let bytes = lowered.as_bytes();

    let mut counts = Array1::<f32>::zeros(dim);
    if bytes.is_empty() || dim == 0 {
        return counts;
    }

    if bytes.len() < ngram {
        let idx = (fnv1a(bytes) % dim as u64) as usize;
        counts[idx] += 1.0;
    } else {
        for window in bytes.windows(ngram) {
            let idx = (fnv1a(window) % dim as u64) as usize;
            counts[idx] += 1.0;
        }
    }

    let norm = counts.dot(&counts).sqrt();
    if norm > 0.0 {
        counts /= norm;
    }
    counts
}
