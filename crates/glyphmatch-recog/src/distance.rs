//! Hamming distance between fingerprints
//!
//! XOR the two 128-byte buffers and count the set bits. The count is an
//! exact associative reduction, so every strategy below returns the same
//! value; they differ only in how many bytes one step consumes.

use crate::fingerprint::{FINGERPRINT_BYTES, Fingerprint};

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::_popcnt64;

/// How the population count is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceStrategy {
    /// One byte at a time
    Bytewise,
    /// 64-bit words with `count_ones`
    Word,
    /// Hardware population count (x86_64 `popcnt`, aarch64 NEON `cnt`)
    Native,
    /// `Native` when the CPU supports it, otherwise `Word`
    #[default]
    Auto,
}

impl DistanceStrategy {
    /// Every concrete strategy, in fallback order
    pub const ALL: [DistanceStrategy; 3] = [
        DistanceStrategy::Native,
        DistanceStrategy::Word,
        DistanceStrategy::Bytewise,
    ];

    /// Whether this strategy can run on the current CPU
    pub fn is_available(self) -> bool {
        match self {
            DistanceStrategy::Native => native_available(),
            _ => true,
        }
    }

    /// Replace `Auto` (and an unavailable `Native`) with what will run
    pub fn resolve(self) -> DistanceStrategy {
        match self {
            DistanceStrategy::Auto | DistanceStrategy::Native if native_available() => {
                DistanceStrategy::Native
            }
            DistanceStrategy::Auto | DistanceStrategy::Native => DistanceStrategy::Word,
            s => s,
        }
    }

    /// Hamming distance between two fingerprints with this strategy
    #[inline]
    pub fn distance(self, a: &Fingerprint, b: &Fingerprint) -> u32 {
        let (a, b) = (a.as_bytes(), b.as_bytes());
        match self.resolve() {
            DistanceStrategy::Bytewise => hamming_bytewise(a, b),
            DistanceStrategy::Native => hamming_native(a, b),
            _ => hamming_words(a, b),
        }
    }
}

/// Hamming distance between two fingerprints
#[inline]
pub fn distance(a: &Fingerprint, b: &Fingerprint) -> u32 {
    DistanceStrategy::Auto.distance(a, b)
}

/// Hamming distance between two raw fingerprint buffers.
///
/// # Panics
///
/// Panics unless both slices are exactly 128 bytes. Comparing buffers of
/// different lengths is a caller bug, not a runtime condition.
pub fn distance_bytes(a: &[u8], b: &[u8]) -> u32 {
    assert!(
        a.len() == FINGERPRINT_BYTES && b.len() == FINGERPRINT_BYTES,
        "fingerprint buffers must be {} bytes, got {} and {}",
        FINGERPRINT_BYTES,
        a.len(),
        b.len()
    );
    let mut fa = [0u8; FINGERPRINT_BYTES];
    let mut fb = [0u8; FINGERPRINT_BYTES];
    fa.copy_from_slice(a);
    fb.copy_from_slice(b);
    distance(&Fingerprint::from_array(fa), &Fingerprint::from_array(fb))
}

/// Byte-at-a-time reference implementation
pub fn hamming_bytewise(a: &[u8; FINGERPRINT_BYTES], b: &[u8; FINGERPRINT_BYTES]) -> u32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x ^ y).count_ones()).sum()
}

/// 64-bit words
pub fn hamming_words(a: &[u8; FINGERPRINT_BYTES], b: &[u8; FINGERPRINT_BYTES]) -> u32 {
    a.chunks_exact(8)
        .zip(b.chunks_exact(8))
        .map(|(x, y)| {
            let mut wx = [0u8; 8];
            let mut wy = [0u8; 8];
            wx.copy_from_slice(x);
            wy.copy_from_slice(y);
            (u64::from_ne_bytes(wx) ^ u64::from_ne_bytes(wy)).count_ones()
        })
        .sum()
}

#[cfg(target_arch = "x86_64")]
fn native_available() -> bool {
    std::is_x86_feature_detected!("popcnt")
}

#[cfg(target_arch = "aarch64")]
fn native_available() -> bool {
    std::arch::is_aarch64_feature_detected!("neon")
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
fn native_available() -> bool {
    false
}

fn hamming_native(a: &[u8; FINGERPRINT_BYTES], b: &[u8; FINGERPRINT_BYTES]) -> u32 {
    #[cfg(target_arch = "x86_64")]
    if native_available() {
        // SAFETY: popcnt support was checked at runtime
        return unsafe { hamming_popcnt(a, b) };
    }
    #[cfg(target_arch = "aarch64")]
    if native_available() {
        // SAFETY: NEON support was checked at runtime
        return unsafe { hamming_neon(a, b) };
    }
    hamming_words(a, b)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "popcnt")]
unsafe fn hamming_popcnt(a: &[u8; FINGERPRINT_BYTES], b: &[u8; FINGERPRINT_BYTES]) -> u32 {
    let mut total = 0i32;
    for (x, y) in a.chunks_exact(8).zip(b.chunks_exact(8)) {
        let mut wx = [0u8; 8];
        let mut wy = [0u8; 8];
        wx.copy_from_slice(x);
        wy.copy_from_slice(y);
        let xor = i64::from_ne_bytes(wx) ^ i64::from_ne_bytes(wy);
        total += unsafe { _popcnt64(xor) };
    }
    total as u32
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn hamming_neon(a: &[u8; FINGERPRINT_BYTES], b: &[u8; FINGERPRINT_BYTES]) -> u32 {
    let a_ptr = a.as_ptr();
    let b_ptr = b.as_ptr();

    // 8 steps of at most 8 bits per lane fit in a u8 accumulator
    unsafe {
        let mut sum = vdupq_n_u8(0);
        let mut i = 0;
        while i < FINGERPRINT_BYTES {
            let va = vld1q_u8(a_ptr.add(i));
            let vb = vld1q_u8(b_ptr.add(i));
            sum = vaddq_u8(sum, vcntq_u8(veorq_u8(va, vb)));
            i += 16;
        }
        vaddlvq_u8(sum) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_fp() -> Fingerprint {
        Fingerprint::from_array(rand::random::<[u8; FINGERPRINT_BYTES]>())
    }

    #[test]
    fn test_identity_and_complement() {
        let a = random_fp();
        assert_eq!(distance(&a, &a), 0);

        let inv = a.as_bytes().map(|b| !b);
        assert_eq!(distance(&a, &Fingerprint::from_array(inv)), 1024);
    }

    #[test]
    fn test_strategies_agree() {
        for _ in 0..200 {
            let (a, b) = (random_fp(), random_fp());
            let expected = hamming_bytewise(a.as_bytes(), b.as_bytes());
            for s in DistanceStrategy::ALL {
                assert_eq!(s.distance(&a, &b), expected, "{:?}", s);
            }
            assert_eq!(DistanceStrategy::Auto.distance(&a, &b), expected);
        }
    }

    #[test]
    fn test_resolve_never_auto() {
        assert_ne!(DistanceStrategy::Auto.resolve(), DistanceStrategy::Auto);
        assert_eq!(
            DistanceStrategy::Bytewise.resolve(),
            DistanceStrategy::Bytewise
        );
        assert!(DistanceStrategy::Word.is_available());
    }

    #[test]
    fn test_distance_bytes() {
        let a = [0x0Fu8; FINGERPRINT_BYTES];
        let b = [0x00u8; FINGERPRINT_BYTES];
        assert_eq!(distance_bytes(&a, &b), 512);
    }

    #[test]
    #[should_panic(expected = "fingerprint buffers must be 128 bytes")]
    fn test_distance_bytes_length_mismatch() {
        distance_bytes(&[0u8; 128], &[0u8; 64]);
    }
}
