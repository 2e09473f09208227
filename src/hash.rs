use core::hash::Hasher;

const OFFSET_BASIS: u32 = 2_166_136_261;
const PRIME: u32 = 16_777_619;

/// Hashes `bytes` with 32-bit FNV-1a.
///
/// Unseeded and not collision resistant. Identical byte sequences always
/// produce identical hashes.
#[inline]
pub fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hasher = Fnv1a::default();
    hasher.write(bytes);
    hasher.finish32()
}

/// Streaming 32-bit FNV-1a state.
#[derive(Clone, Copy, Debug)]
pub struct Fnv1a {
    state: u32,
}

impl Default for Fnv1a {
    #[inline]
    fn default() -> Self {
        Fnv1a {
            state: OFFSET_BASIS,
        }
    }
}

impl Fnv1a {
    /// Returns the 32-bit hash of everything written so far.
    #[inline]
    pub fn finish32(&self) -> u32 {
        self.state
    }
}

impl Hasher for Fnv1a {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u32::from(byte);
            self.state = self.state.wrapping_mul(PRIME);
        }
    }

    #[inline]
    fn finish(&self) -> u64 {
        u64::from(self.state)
    }
}
