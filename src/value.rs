//! A single scalar living in its own heap allocation.

use std::fmt;
use std::ops::Add;

use crate::buffer::OwnedBuf;
use crate::error::{OwnError, Result};

/// Owns one heap-allocated `T`.
///
/// Copies are explicit ([`try_clone`](Self::try_clone),
/// [`copy_assign`](Self::copy_assign)) and always end up in storage distinct
/// from the source. Moves ([`take`](Self::take),
/// [`move_assign`](Self::move_assign)) hand the allocation over without
/// touching the value and leave the source empty. A plain `let b = a;` is a
/// move as well; the compiler then forbids any further use of `a`.
///
/// ```
/// use owning_value::OwningValue;
///
/// let a = OwningValue::new(10)?;
/// let b = OwningValue::new(20)?;
/// let c = a.add(&b)?;
/// let mut d = c.try_clone()?;
/// d.copy_assign(&b)?;
/// assert_eq!((*a.value(), *b.value(), *c.value(), *d.value()), (10, 20, 30, 20));
/// # Ok::<(), owning_value::OwnError>(())
/// ```
pub struct OwningValue<T = i32> {
    buf: OwnedBuf<T>,
}

impl<T> OwningValue<T> {
    pub fn new(value: T) -> Result<Self> {
        Ok(Self {
            buf: OwnedBuf::try_single(value)?,
        })
    }

    /// A value that owns nothing, the same state a moved-from value is in.
    pub const fn empty() -> Self {
        Self {
            buf: OwnedBuf::empty(),
        }
    }

    pub fn is_owning(&self) -> bool {
        self.buf.is_owning()
    }

    pub fn get(&self) -> Option<&T> {
        self.buf.as_slice().and_then(<[T]>::first)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.buf.as_mut_slice().and_then(<[T]>::first_mut)
    }

    /// # Panics
    ///
    /// Panics if the value was moved out or destroyed.
    #[track_caller]
    pub fn value(&self) -> &T {
        match self.get() {
            Some(value) => value,
            None => panic!("read of an empty OwningValue"),
        }
    }

    /// # Panics
    ///
    /// Panics if the value was moved out or destroyed.
    #[track_caller]
    pub fn value_mut(&mut self) -> &mut T {
        match self.get_mut() {
            Some(value) => value,
            None => panic!("write to an empty OwningValue"),
        }
    }

    pub fn handle(&self) -> Option<*const T> {
        self.buf.handle()
    }

    /// Copy construction: a fresh allocation holding a clone of the value.
    ///
    /// # Panics
    ///
    /// Panics if the value was moved out or destroyed.
    #[track_caller]
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
    {
        Ok(Self {
            buf: self.buf.try_clone()?,
        })
    }

    /// Move construction: the returned value adopts this one's allocation.
    pub fn take(&mut self) -> Self {
        Self {
            buf: self.buf.take(),
        }
    }

    /// Copy assignment. An owning destination keeps its storage and only has
    /// the value overwritten; an empty one gets a fresh allocation.
    ///
    /// # Panics
    ///
    /// Panics if `other` is empty. `self` is not modified in that case.
    #[track_caller]
    pub fn copy_assign(&mut self, other: &Self) -> Result<&mut Self>
    where
        T: Clone,
    {
        self.buf.copy_assign(&other.buf)?;
        Ok(self)
    }

    /// Move assignment: frees the current allocation and adopts `other`'s.
    pub fn move_assign(&mut self, other: &mut Self) -> &mut Self {
        self.buf.move_assign(&mut other.buf);
        self
    }

    /// Frees the allocation now instead of at scope end. No-op when empty.
    pub fn destroy(&mut self) {
        self.buf.release();
    }
}

impl<T> OwningValue<T>
where
    T: Clone + Add<Output = T>,
{
    /// Allocates a new value holding `self + other`. Neither operand changes.
    ///
    /// # Panics
    ///
    /// Panics if either operand is empty. Overflow behaves like `T`'s own
    /// `+`: for primitive integers that is a panic in debug builds and
    /// wrapping in release builds. Use [`checked_add`](Self::checked_add)
    /// to get an error instead.
    #[track_caller]
    pub fn add(&self, other: &Self) -> Result<Self> {
        let sum = self.value().clone() + other.value().clone();
        Self::new(sum)
    }
}

/// Addition that reports overflow instead of panicking or wrapping.
pub trait CheckedSum: Sized {
    fn checked_sum(&self, other: &Self) -> Option<Self>;
}

macro_rules! impl_checked_sum {
    ($($t:ty),* $(,)?) => {
        $(
            impl CheckedSum for $t {
                fn checked_sum(&self, other: &Self) -> Option<Self> {
                    self.checked_add(*other)
                }
            }
        )*
    };
}

impl_checked_sum!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl<T> OwningValue<T>
where
    T: CheckedSum + fmt::Display,
{
    /// Like [`add`](Self::add), but an overflowing sum is
    /// [`OwnError::Overflow`] and nothing is allocated.
    ///
    /// # Panics
    ///
    /// Panics if either operand is empty.
    #[track_caller]
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        let (lhs, rhs) = (self.value(), other.value());
        match lhs.checked_sum(rhs) {
            Some(sum) => Self::new(sum),
            None => Err(OwnError::Overflow {
                lhs: lhs.to_string(),
                rhs: rhs.to_string(),
            }),
        }
    }
}

impl<T> Add for &OwningValue<T>
where
    T: Clone + Add<Output = T>,
{
    type Output = Result<OwningValue<T>>;

    #[track_caller]
    fn add(self, rhs: Self) -> Self::Output {
        OwningValue::add(self, rhs)
    }
}

impl<T> Default for OwningValue<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: fmt::Debug> fmt::Debug for OwningValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => f.debug_tuple("OwningValue").field(value).finish(),
            None => f.write_str("OwningValue(<empty>)"),
        }
    }
}

impl<T: fmt::Display> fmt::Display for OwningValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(value) => value.fmt(f),
            None => f.write_str("<empty>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::tests::DropCounter;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::rc::Rc;

    proptest! {
        #[test]
        fn construct_holds_value(v: i32) {
            let owned = OwningValue::new(v).unwrap();
            prop_assert_eq!(*owned.value(), v);
        }

        #[test]
        fn copy_is_independent(v: i32, w: i32) {
            let a = OwningValue::new(v).unwrap();
            let mut b = a.try_clone().unwrap();
            prop_assert_eq!(b.value(), a.value());
            prop_assert_ne!(b.handle(), a.handle());

            *b.value_mut() = w;
            prop_assert_eq!(*a.value(), v);
            prop_assert_eq!(*b.value(), w);
        }

        #[test]
        fn take_leaves_source_empty(v: i32) {
            let mut a = OwningValue::new(v).unwrap();
            let addr = a.handle();
            let b = a.take();
            prop_assert_eq!(*b.value(), v);
            prop_assert_eq!(b.handle(), addr);
            prop_assert!(!a.is_owning());
            prop_assert!(a.get().is_none());
        }

        #[test]
        fn copy_assign_keeps_storage_identity(v: i32, w: i32) {
            let mut dst = OwningValue::new(v).unwrap();
            let src = OwningValue::new(w).unwrap();
            let addr = dst.handle();
            dst.copy_assign(&src).unwrap();
            prop_assert_eq!(dst.handle(), addr);
            prop_assert_eq!(*dst.value(), w);
            prop_assert_eq!(*src.value(), w);
        }

        #[test]
        fn add_leaves_operands(x in -1_000_000i32..1_000_000, y in -1_000_000i32..1_000_000) {
            let a = OwningValue::new(x).unwrap();
            let b = OwningValue::new(y).unwrap();
            let sum = a.add(&b).unwrap();
            prop_assert_eq!(*sum.value(), x + y);
            prop_assert_eq!(*a.value(), x);
            prop_assert_eq!(*b.value(), y);
        }

        #[test]
        fn checked_add_matches_i32(x: i32, y: i32) {
            let a = OwningValue::new(x).unwrap();
            let b = OwningValue::new(y).unwrap();
            match (a.checked_add(&b), x.checked_add(y)) {
                (Ok(sum), Some(expected)) => prop_assert_eq!(*sum.value(), expected),
                (Err(err), None) => prop_assert!(matches!(err, OwnError::Overflow { .. }), "expected Overflow, got {:?}", err),
                (got, expected) => prop_assert!(false, "got {:?}, expected {:?}", got, expected),
            }
            prop_assert_eq!(*a.value(), x);
            prop_assert_eq!(*b.value(), y);
        }
    }

    #[test]
    fn native_move_keeps_handle() {
        let a = OwningValue::new(11).unwrap();
        let addr = a.handle();
        let b = a;
        assert_eq!(b.handle(), addr);
        assert_eq!(*b.value(), 11);
    }

    #[test]
    #[should_panic(expected = "read of an empty OwningValue")]
    fn reading_moved_from_value_panics() {
        let mut a = OwningValue::new(1).unwrap();
        let _b = a.take();
        let _ = a.value();
    }

    #[test]
    #[should_panic(expected = "read of an empty OwningValue")]
    fn adding_empty_operand_panics() {
        let a = OwningValue::new(1).unwrap();
        let empty = OwningValue::empty();
        let _ = a.add(&empty);
    }

    #[test]
    fn checked_add_reports_overflow() {
        let max = OwningValue::new(i32::MAX).unwrap();
        let one = OwningValue::new(1).unwrap();
        let err = max.checked_add(&one).unwrap_err();
        assert_eq!(err.to_string(), "sum of 2147483647 and 1 does not fit in the value type");
        assert_eq!(*max.value(), i32::MAX);
        assert_eq!(*one.value(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "overflow")]
    fn add_overflow_panics_in_debug() {
        let max = OwningValue::new(i32::MAX).unwrap();
        let one = OwningValue::new(1).unwrap();
        let _ = max.add(&one);
    }

    #[test]
    #[should_panic(expected = "copy from an empty handle")]
    fn copy_assign_from_moved_from_panics() {
        let mut dst = OwningValue::new(7).unwrap();
        let mut src = OwningValue::new(1).unwrap();
        let _moved = src.take();
        let _ = dst.copy_assign(&src);
    }

    #[test]
    #[should_panic(expected = "copy from an empty handle")]
    fn clone_of_moved_from_panics() {
        let mut src = OwningValue::new(1).unwrap();
        let _moved = src.take();
        let _ = src.try_clone();
    }

    #[test]
    fn add_three_and_four() {
        let three = OwningValue::new(3).unwrap();
        let four = OwningValue::new(4).unwrap();
        let seven = (&three + &four).unwrap();
        assert_eq!(*seven.value(), 7);
        assert_eq!(*three.value(), 3);
        assert_eq!(*four.value(), 4);
    }

    #[test]
    fn move_assign_releases_prior_storage_once() {
        let drops = Rc::new(Cell::new(0));
        let mut dst = OwningValue::new(DropCounter::new(&drops, 1)).unwrap();
        let mut src = OwningValue::new(DropCounter::new(&drops, 2)).unwrap();
        let src_addr = src.handle();

        dst.move_assign(&mut src);
        assert_eq!(drops.get(), 1);
        assert_eq!(dst.value().tag, 2);
        assert_eq!(dst.handle(), src_addr);
        assert!(!src.is_owning());

        drop(src);
        drop(dst);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn destroying_empty_is_noop() {
        let drops = Rc::new(Cell::new(0));
        let mut a = OwningValue::new(DropCounter::new(&drops, 0)).unwrap();
        let mut b = a.take();
        a.destroy();
        a.destroy();
        assert_eq!(drops.get(), 0);
        b.destroy();
        b.destroy();
        assert_eq!(drops.get(), 1);
        drop(a);
        drop(b);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn moved_from_can_be_reassigned() {
        let mut a = OwningValue::new(5).unwrap();
        let _b = a.take();
        let c = OwningValue::new(8).unwrap();
        a.copy_assign(&c).unwrap();
        assert_eq!(*a.value(), 8);
        assert_ne!(a.handle(), c.handle());
    }

    #[test]
    fn assignments_chain() {
        let mut d = OwningValue::new(0).unwrap();
        let b = OwningValue::new(20).unwrap();
        let c = OwningValue::new(30).unwrap();
        d.copy_assign(&b).unwrap().copy_assign(&c).unwrap();
        assert_eq!(*d.value(), 30);

        let mut e = OwningValue::new(99).unwrap();
        *d.move_assign(&mut e).value_mut() += 1;
        assert_eq!(*d.value(), 100);
    }

    #[test]
    fn copy_and_assign_scenario() {
        let a = OwningValue::new(10).unwrap();
        let b = OwningValue::new(20).unwrap();
        let c = a.add(&b).unwrap();
        let mut d = c.try_clone().unwrap();
        d.copy_assign(&b).unwrap();

        assert_eq!(*c.value(), 30);
        assert_eq!(*d.value(), 20);
        assert_eq!(*a.value(), 10);
        assert_eq!(*b.value(), 20);
    }

    #[test]
    fn formatting_reflects_state() {
        let mut a = OwningValue::new(4).unwrap();
        assert_eq!(format!("{a}"), "4");
        assert_eq!(format!("{a:?}"), "OwningValue(4)");
        a.destroy();
        assert_eq!(format!("{a}"), "<empty>");
        assert_eq!(format!("{a:?}"), "OwningValue(<empty>)");
    }
}
