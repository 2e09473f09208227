/// A plain value with a fixed byte encoding.
///
/// [`HashMap`](crate::HashMap) and [`HashSet`](crate::HashSet) store typed
/// keys and values in the byte table through this trait. `STRIDE` is the
/// exact encoded size and must be non-zero.
pub trait FixedLayout: Sized {
    /// Number of bytes in the encoding.
    const STRIDE: usize;

    /// Writes the encoding into `out`, which is exactly `STRIDE` bytes long.
    fn write_bytes(&self, out: &mut [u8]);

    /// Decodes a value from exactly `STRIDE` bytes.
    fn read_bytes(bytes: &[u8]) -> Option<Self>;
}

macro_rules! impl_fixed_layout_le {
    ($($t:ty),* $(,)?) => {
        $(
            impl FixedLayout for $t {
                const STRIDE: usize = core::mem::size_of::<$t>();

                #[inline]
                fn write_bytes(&self, out: &mut [u8]) {
                    out.copy_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn read_bytes(bytes: &[u8]) -> Option<Self> {
                    bytes.try_into().ok().map(<$t>::from_le_bytes)
                }
            }
        )*
    };
}

impl_fixed_layout_le!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64
);

impl<const N: usize> FixedLayout for [u8; N] {
    const STRIDE: usize = N;

    #[inline]
    fn write_bytes(&self, out: &mut [u8]) {
        out.copy_from_slice(self);
    }

    #[inline]
    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok()
    }
}

/// Encodes `value` into a fresh buffer of `T::STRIDE` bytes.
pub(crate) fn encode<T: FixedLayout>(value: &T) -> alloc::vec::Vec<u8> {
    let mut bytes = alloc::vec![0u8; T::STRIDE];
    value.write_bytes(&mut bytes);
    bytes
}
