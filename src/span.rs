use core::fmt::Debug;
use core::num::NonZeroUsize;

use crate::error::Error;

const BYTE: NonZeroUsize = NonZeroUsize::MIN;

/// A borrowed view over a run of fixed-size elements stored as raw bytes.
///
/// The stride is the size of one element. A span built with
/// [`Span::with_stride`] always holds a whole number of elements. Two spans
/// compare equal when their bytes are equal, whatever their strides.
#[derive(Clone, Copy)]
pub struct Span<'a> {
    bytes: &'a [u8],
    stride: NonZeroUsize,
}

impl<'a> Span<'a> {
    /// Creates a span of single-byte elements.
    #[inline]
    pub fn new(bytes: &'a [u8]) -> Self {
        Span {
            bytes,
            stride: BYTE,
        }
    }

    /// Creates a span of `stride`-byte elements.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_table::Span;
    /// #
    /// let words = [1u32.to_le_bytes(), 2u32.to_le_bytes()].concat();
    /// let span = Span::with_stride(&words, 4).unwrap();
    /// assert_eq!(span.len(), 2);
    /// assert_eq!(span.size(), 8);
    ///
    /// assert!(Span::with_stride(&words[..7], 4).is_err());
    /// ```
    pub fn with_stride(bytes: &'a [u8], stride: usize) -> Result<Self, Error> {
        let stride = NonZeroUsize::new(stride).ok_or(Error::ZeroStride)?;
        if bytes.len() % stride != 0 {
            return Err(Error::MisalignedSpan {
                size: bytes.len(),
                stride: stride.get(),
            });
        }
        Ok(Span { bytes, stride })
    }

    /// An empty span carrying `stride`.
    #[inline]
    pub fn empty(stride: NonZeroUsize) -> Self {
        Span { bytes: &[], stride }
    }

    #[inline]
    pub(crate) fn from_parts(bytes: &'a [u8], stride: NonZeroUsize) -> Self {
        debug_assert_eq!(bytes.len() % stride, 0);
        Span { bytes, stride }
    }

    /// The raw bytes.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Size of one element in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride.get()
    }

    /// Size of the whole span in bytes.
    #[inline]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / self.stride
    }

    /// Returns `true` if the span holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for Span<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for Span<'_> {}

impl PartialEq<[u8]> for Span<'_> {
    fn eq(&self, other: &[u8]) -> bool {
        self.bytes == other
    }
}

impl PartialEq<&[u8]> for Span<'_> {
    fn eq(&self, other: &&[u8]) -> bool {
        self.bytes == *other
    }
}

impl<const N: usize> PartialEq<[u8; N]> for Span<'_> {
    fn eq(&self, other: &[u8; N]) -> bool {
        self.bytes == other
    }
}

impl<const N: usize> PartialEq<&[u8; N]> for Span<'_> {
    fn eq(&self, other: &&[u8; N]) -> bool {
        self.bytes == *other
    }
}

impl Debug for Span<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Span")
            .field("stride", &self.stride)
            .field("bytes", &self.bytes)
            .finish()
    }
}

impl<'a> From<&'a [u8]> for Span<'a> {
    #[inline]
    fn from(bytes: &'a [u8]) -> Self {
        Span::new(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Span<'a> {
    #[inline]
    fn from(bytes: &'a [u8; N]) -> Self {
        Span::new(bytes)
    }
}

impl<'a> From<&'a str> for Span<'a> {
    #[inline]
    fn from(s: &'a str) -> Self {
        Span::new(s.as_bytes())
    }
}

impl<'a> From<&'a alloc::vec::Vec<u8>> for Span<'a> {
    #[inline]
    fn from(bytes: &'a alloc::vec::Vec<u8>) -> Self {
        Span::new(bytes)
    }
}

impl<'a> From<&'a alloc::string::String> for Span<'a> {
    #[inline]
    fn from(s: &'a alloc::string::String) -> Self {
        Span::new(s.as_bytes())
    }
}
