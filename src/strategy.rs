use core::alloc::Layout;
use core::mem;
use core::ptr::{self, NonNull};

use alloc::alloc::{alloc, dealloc};

use crate::slot::Slot;
use crate::TypeTag;

/// Where a stored value physically lives.
///
/// The choice is made per type and never changes for the lifetime of a stored
/// value. See [`SmallAny::strategy_of`](crate::SmallAny::strategy_of).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// The value is stored inline, inside the container's slot.
    Small,
    /// The value is stored in its own heap allocation owned by the container.
    Big,
}

/// Picks the strategy for `T`.
///
/// Rust moves are plain byte copies that cannot fail, so size and alignment are
/// the only criteria.
#[inline]
pub(crate) const fn select<T>() -> Strategy {
    if Slot::fits::<T>() {
        Strategy::Small
    } else {
        Strategy::Big
    }
}

// Bindings for one concrete stored type.
pub(crate) struct VTable {
    pub type_tag: fn() -> TypeTag,
    pub strategy: Strategy,
    pub destroy: unsafe fn(&mut Slot),
    pub clone: unsafe fn(&Slot) -> Result<Slot, Layout>,
}

/// Storage primitives of one strategy, specialized for the stored type `T`.
///
/// Every `unsafe` function requires the slot to hold a live `T` that was
/// placed there by the same implementation.
pub(crate) trait Manager<T: Clone + 'static> {
    const STRATEGY: Strategy;

    const VTABLE: &'static VTable = &VTable {
        type_tag: TypeTag::of::<T>,
        strategy: Self::STRATEGY,
        destroy: Self::destroy,
        clone: Self::clone_slot,
    };

    /// Builds a slot holding the value returned by `f`.
    ///
    /// Fails with the requested layout if the heap refused the allocation.
    /// If `f` panics nothing is leaked.
    fn construct<F: FnOnce() -> T>(f: F) -> Result<Slot, Layout>;

    unsafe fn access(slot: &Slot) -> *const T;

    unsafe fn access_mut(slot: &mut Slot) -> *mut T;

    /// Drops the value. The slot holds garbage afterwards.
    unsafe fn destroy(slot: &mut Slot);

    /// Moves the value out. The slot holds garbage afterwards.
    unsafe fn take(slot: &mut Slot) -> T;

    /// Builds an independent slot holding a clone of the value.
    unsafe fn clone_slot(slot: &Slot) -> Result<Slot, Layout>;
}

/// Inline storage.
pub(crate) struct Small;

impl<T: Clone + 'static> Manager<T> for Small {
    const STRATEGY: Strategy = Strategy::Small;

    #[inline]
    fn construct<F: FnOnce() -> T>(f: F) -> Result<Slot, Layout> {
        Ok(Slot::with_inline(f()))
    }

    #[inline]
    unsafe fn access(slot: &Slot) -> *const T {
        slot.inline::<T>()
    }

    #[inline]
    unsafe fn access_mut(slot: &mut Slot) -> *mut T {
        slot.inline_mut::<T>()
    }

    unsafe fn destroy(slot: &mut Slot) {
        // Safety: It was initialized as `T`.
        unsafe { ptr::drop_in_place(slot.inline_mut::<T>()) }
    }

    unsafe fn take(slot: &mut Slot) -> T {
        unsafe { slot.inline::<T>().read() }
    }

    unsafe fn clone_slot(slot: &Slot) -> Result<Slot, Layout> {
        // A byte copy is only sound for `Copy` types, and for those `clone` is exactly that copy.
        let value: &T = unsafe { &*slot.inline::<T>() };
        Ok(Slot::with_inline(value.clone()))
    }
}

/// Heap storage. The slot holds the only pointer to the allocation.
pub(crate) struct Big;

impl Big {
    fn allocate<T>() -> Result<NonNull<T>, Layout> {
        let layout = Layout::new::<T>();
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // Safety: `layout` has a non-zero size.
        let ptr = unsafe { alloc(layout) };
        NonNull::new(ptr.cast::<T>()).ok_or(layout)
    }

    fn place<T, F: FnOnce() -> T>(f: F) -> Result<Slot, Layout> {
        let cell = HeapCell {
            ptr: Big::allocate::<T>()?,
        };

        // Safety: `cell` was allocated for a `T` and is not initialized yet.
        // If `f` panics, `cell` releases the allocation.
        unsafe { cell.ptr.as_ptr().write(f()) };

        Ok(Slot::with_heap(cell.into_raw().cast()))
    }
}

// Owns a heap allocation sized for `T`, but not the `T` inside it.
struct HeapCell<T> {
    ptr: NonNull<T>,
}

impl<T> HeapCell<T> {
    fn into_raw(self) -> *mut T {
        let ptr = self.ptr.as_ptr();
        mem::forget(self);
        ptr
    }
}

impl<T> Drop for HeapCell<T> {
    fn drop(&mut self) {
        let layout = Layout::new::<T>();
        if layout.size() != 0 {
            // Safety: allocated by `Big::allocate::<T>` with this layout.
            unsafe { dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

impl<T: Clone + 'static> Manager<T> for Big {
    const STRATEGY: Strategy = Strategy::Big;

    #[inline]
    fn construct<F: FnOnce() -> T>(f: F) -> Result<Slot, Layout> {
        Big::place(f)
    }

    #[inline]
    unsafe fn access(slot: &Slot) -> *const T {
        unsafe { slot.heap().cast_const().cast() }
    }

    #[inline]
    unsafe fn access_mut(slot: &mut Slot) -> *mut T {
        unsafe { slot.heap().cast() }
    }

    unsafe fn destroy(slot: &mut Slot) {
        let cell = HeapCell {
            ptr: unsafe { NonNull::new_unchecked(slot.heap().cast::<T>()) },
        };

        // The allocation is released even if `T::drop` panics.
        unsafe { ptr::drop_in_place(cell.ptr.as_ptr()) };
    }

    unsafe fn take(slot: &mut Slot) -> T {
        let cell = HeapCell {
            ptr: unsafe { NonNull::new_unchecked(slot.heap().cast::<T>()) },
        };

        unsafe { cell.ptr.as_ptr().read() }
    }

    unsafe fn clone_slot(slot: &Slot) -> Result<Slot, Layout> {
        let value: &T = unsafe { &*slot.heap().cast_const().cast::<T>() };
        Big::place(|| value.clone())
    }
}

/// Stores the value produced by `f` with the strategy selected for `T`.
pub(crate) fn construct<T, F>(f: F) -> Result<(Slot, &'static VTable), Layout>
where
    T: Clone + 'static,
    F: FnOnce() -> T,
{
    match select::<T>() {
        Strategy::Small => Ok((
            <Small as Manager<T>>::construct(f)?,
            <Small as Manager<T>>::VTABLE,
        )),
        Strategy::Big => Ok((
            <Big as Manager<T>>::construct(f)?,
            <Big as Manager<T>>::VTABLE,
        )),
    }
}

/// Reference to the `T` in `slot`.
///
/// # Safety
///
/// `slot` must hold a live `T` stored by [`construct`].
#[inline]
pub(crate) unsafe fn access<T: Clone + 'static>(slot: &Slot) -> &T {
    let ptr = match select::<T>() {
        Strategy::Small => unsafe { <Small as Manager<T>>::access(slot) },
        Strategy::Big => unsafe { <Big as Manager<T>>::access(slot) },
    };
    unsafe { &*ptr }
}

/// Mutable reference to the `T` in `slot`.
///
/// # Safety
///
/// Same as [`access`].
#[inline]
pub(crate) unsafe fn access_mut<T: Clone + 'static>(slot: &mut Slot) -> &mut T {
    let ptr = match select::<T>() {
        Strategy::Small => unsafe { <Small as Manager<T>>::access_mut(slot) },
        Strategy::Big => unsafe { <Big as Manager<T>>::access_mut(slot) },
    };
    unsafe { &mut *ptr }
}

/// Moves the `T` out of `slot`, releasing its heap cell if any.
///
/// # Safety
///
/// Same as [`access`]. The slot must not be destroyed afterwards.
pub(crate) unsafe fn take<T: Clone + 'static>(slot: &mut Slot) -> T {
    match select::<T>() {
        Strategy::Small => unsafe { <Small as Manager<T>>::take(slot) },
        Strategy::Big => unsafe { <Big as Manager<T>>::take(slot) },
    }
}
