//! The exclusively owned storage behind [`OwningValue`](crate::OwningValue) and
//! [`OwningArray`](crate::OwningArray).
//!
//! An [`OwnedBuf`] is either *owning* (it holds a boxed slice nobody else
//! can reach) or *empty* (its storage was moved out or released). Every
//! transition between the two states goes through a method here, and the
//! allocation is freed in exactly one place: whichever of [`OwnedBuf::release`],
//! [`OwnedBuf::move_assign`] or `Drop` takes the box out of the option first.

use std::fmt;

use tracing::{debug, trace};

use crate::error::{OwnError, Result};

/// What a copy-assignment did to the destination's storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Elements were cloned into the storage the destination already owned.
    InPlace,
    /// The shapes differed or the destination was empty, so it now owns a
    /// fresh allocation.
    Reallocated,
}

pub struct OwnedBuf<T> {
    data: Option<Box<[T]>>,
}

fn try_storage<T>(len: usize) -> Result<Vec<T>> {
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(len)
        .map_err(|err| OwnError::allocation::<T>(len, err))?;
    Ok(storage)
}

impl<T> OwnedBuf<T> {
    pub const fn empty() -> Self {
        Self { data: None }
    }

    /// Allocates room for exactly one element and stores `value` there.
    pub fn try_single(value: T) -> Result<Self> {
        let mut storage = try_storage(1)?;
        storage.push(value);
        Ok(Self::from_storage(storage))
    }

    pub fn try_filled(len: usize, elem: T) -> Result<Self>
    where
        T: Clone,
    {
        let mut storage = try_storage(len)?;
        storage.resize(len, elem);
        Ok(Self::from_storage(storage))
    }

    /// Allocates new storage and clones `src` into it.
    pub fn try_from_slice(src: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        let mut storage = try_storage(src.len())?;
        storage.extend_from_slice(src);
        Ok(Self::from_storage(storage))
    }

    fn from_storage(storage: Vec<T>) -> Self {
        let data = storage.into_boxed_slice();
        debug!(addr = ?data.as_ptr(), len = data.len(), "allocated");
        Self { data: Some(data) }
    }

    pub fn is_owning(&self) -> bool {
        self.data.is_some()
    }

    /// Element count, zero when empty.
    pub fn len(&self) -> usize {
        self.data.as_deref().map_or(0, <[T]>::len)
    }

    /// No elements: either nothing is owned or the owned slice has length zero.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_slice(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        self.data.as_deref_mut()
    }

    /// Address of the owned storage. Two owning buffers never report the same
    /// address unless the storage is zero-sized.
    pub fn handle(&self) -> Option<*const T> {
        self.data.as_deref().map(<[T]>::as_ptr)
    }

    /// Duplicates the storage into a fresh allocation.
    ///
    /// # Panics
    ///
    /// Panics if `self` is empty.
    #[track_caller]
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
    {
        let src = self.source_slice();
        let copy = Self::try_from_slice(src)?;
        trace!(src = ?src.as_ptr(), dst = ?copy.handle(), "copied");
        Ok(copy)
    }

    #[track_caller]
    fn source_slice(&self) -> &[T] {
        match self.as_slice() {
            Some(src) => src,
            None => panic!("copy from an empty handle"),
        }
    }

    /// Moves the storage into a new buffer and leaves `self` empty.
    pub fn take(&mut self) -> Self {
        let data = self.data.take();
        trace!(addr = ?data.as_deref().map(<[T]>::as_ptr), "moved out");
        Self { data }
    }

    /// Releases the current storage, then adopts `source`'s and empties it.
    pub fn move_assign(&mut self, source: &mut Self) {
        let incoming = source.data.take();
        trace!(addr = ?incoming.as_deref().map(<[T]>::as_ptr), "move-assigned");
        self.release();
        self.data = incoming;
    }

    /// Clones `source` into `self`.
    ///
    /// Equal lengths reuse the existing storage. Otherwise a new allocation is
    /// made first and the old one is only released once that succeeded, so a
    /// failed copy leaves `self` as it was.
    ///
    /// # Panics
    ///
    /// Panics if `source` is empty; `self` is left untouched.
    #[track_caller]
    pub fn copy_assign(&mut self, source: &Self) -> Result<CopyOutcome>
    where
        T: Clone,
    {
        let src = source.source_slice();

        if let Some(dst) = self.data.as_deref_mut() {
            if dst.len() == src.len() {
                dst.clone_from_slice(src);
                trace!(addr = ?dst.as_ptr(), "copy-assigned in place");
                return Ok(CopyOutcome::InPlace);
            }
        }

        let mut fresh = Self::try_from_slice(src)?;
        self.move_assign(&mut fresh);
        Ok(CopyOutcome::Reallocated)
    }

    /// Frees the storage if there is any. Returns whether something was freed.
    pub fn release(&mut self) -> bool {
        match self.data.take() {
            Some(data) => {
                debug!(addr = ?data.as_ptr(), len = data.len(), "released");
                drop(data);
                true
            }
            None => false,
        }
    }
}

impl<T> Default for OwnedBuf<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Drop for OwnedBuf<T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: fmt::Debug> fmt::Debug for OwnedBuf<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.data {
            Some(data) => f.debug_tuple("Owning").field(data).finish(),
            None => f.write_str("Empty"),
        }
    }
}
