//! A fixed-length run of elements in one heap allocation.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::buffer::OwnedBuf;
use crate::error::Result;

/// Owns a heap-allocated sequence whose length is fixed at construction.
///
/// Copy assignment between arrays of different lengths reallocates the
/// destination to the source's length; see [`copy_assign`](Self::copy_assign).
pub struct OwningArray<T = f64> {
    buf: OwnedBuf<T>,
}

impl<T> OwningArray<T> {
    /// `len` default-initialised elements.
    pub fn with_len(len: usize) -> Result<Self>
    where
        T: Clone + Default,
    {
        Self::filled(len, T::default())
    }

    pub fn filled(len: usize, elem: T) -> Result<Self>
    where
        T: Clone,
    {
        Ok(Self {
            buf: OwnedBuf::try_filled(len, elem)?,
        })
    }

    pub fn from_slice(elems: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        Ok(Self {
            buf: OwnedBuf::try_from_slice(elems)?,
        })
    }

    pub const fn empty() -> Self {
        Self {
            buf: OwnedBuf::empty(),
        }
    }

    pub fn is_owning(&self) -> bool {
        self.buf.is_owning()
    }

    /// Recorded length; an empty (moved-from) array reports zero.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True for zero elements, whether or not storage is owned; see
    /// [`is_owning`](Self::is_owning) for the handle state.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.buf.as_slice()?.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.buf.as_mut_slice()?.get_mut(index)
    }

    pub fn as_slice(&self) -> Option<&[T]> {
        self.buf.as_slice()
    }

    pub fn handle(&self) -> Option<*const T> {
        self.buf.handle()
    }

    /// # Panics
    ///
    /// Panics if the array was moved out or destroyed.
    #[track_caller]
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
    {
        Ok(Self {
            buf: self.buf.try_clone()?,
        })
    }

    pub fn take(&mut self) -> Self {
        Self {
            buf: self.buf.take(),
        }
    }

    /// Copy assignment.
    ///
    /// Equal lengths overwrite the existing storage in place, so
    /// [`handle`](Self::handle) is unchanged. A different length allocates
    /// storage of the source's length before releasing the old one, so on
    /// allocation failure `self` is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `other` is empty.
    #[track_caller]
    pub fn copy_assign(&mut self, other: &Self) -> Result<&mut Self>
    where
        T: Clone,
    {
        self.buf.copy_assign(&other.buf)?;
        Ok(self)
    }

    pub fn move_assign(&mut self, other: &mut Self) -> &mut Self {
        self.buf.move_assign(&mut other.buf);
        self
    }

    pub fn destroy(&mut self) {
        self.buf.release();
    }

    #[track_caller]
    fn slice(&self) -> &[T] {
        match self.buf.as_slice() {
            Some(elems) => elems,
            None => panic!("index into an empty OwningArray"),
        }
    }

    #[track_caller]
    fn slice_mut(&mut self) -> &mut [T] {
        match self.buf.as_mut_slice() {
            Some(elems) => elems,
            None => panic!("index into an empty OwningArray"),
        }
    }
}

impl<T> Index<usize> for OwningArray<T> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        &self.slice()[index]
    }
}

impl<T> IndexMut<usize> for OwningArray<T> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.slice_mut()[index]
    }
}

impl<T> Default for OwningArray<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for OwningArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_slice() {
            Some(elems) => f.debug_tuple("OwningArray").field(&elems).finish(),
            None => f.write_str("OwningArray(<empty>)"),
        }
    }
}
