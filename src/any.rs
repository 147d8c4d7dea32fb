use core::any::TypeId;
use core::fmt;
use core::marker::PhantomData;
use core::mem::{self, ManuallyDrop};
use core::ptr;

use alloc::alloc::handle_alloc_error;

use crate::slot::Slot;
use crate::strategy::{self, Strategy, VTable};
use crate::{Error, TypeTag};

#[cfg(feature = "tracing")]
use crate::trace;

/// A type-erased value that stores small values inline and large values on the heap.
///
/// Any `Clone + 'static` type can be stored. Values whose size and alignment fit
/// into one pointer ([`SLOT_SIZE`](crate::SLOT_SIZE) bytes) live directly inside
/// the container, everything else gets its own heap allocation.
///
/// `SmallAny` has value semantics: cloning it clones the held value, and every
/// held value is dropped exactly once.
///
/// `SmallAny` is neither `Send` nor `Sync`, since the held value may not be.
/// Callers that need to share one across threads must provide their own
/// synchronization and a thread-safe payload.
///
/// # Example
///
/// ```
/// use smallany::{Strategy, SmallAny};
///
/// let mut any = SmallAny::new(42u32);
/// assert_eq!(any.strategy(), Some(Strategy::Small));
/// assert_eq!(any.downcast_ref::<u32>(), Some(&42));
///
/// any.emplace(vec![1, 2, 3]);
/// assert_eq!(any.strategy(), Some(Strategy::Big));
/// assert_eq!(any.downcast_ref::<u32>(), None);
/// assert_eq!(any.downcast_ref::<Vec<i32>>().unwrap().len(), 3);
/// ```
pub struct SmallAny {
    slot: Slot,
    vtable: Option<&'static VTable>,
    unsend: PhantomData<*mut u8>,
}

impl SmallAny {
    /// Construct an empty container.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallany::SmallAny;
    /// let any = SmallAny::new_empty();
    /// assert!(!any.has_value());
    /// ```
    pub const fn new_empty() -> Self {
        SmallAny {
            slot: Slot::zeroed(),
            vtable: None,
            unsend: PhantomData,
        }
    }

    /// Construct a container holding `value`.
    ///
    /// If `value` is itself a `SmallAny` it is adopted as is rather than nested.
    ///
    /// Aborts through [`handle_alloc_error`] if `T` needs the heap and the
    /// allocation fails. See [`SmallAny::try_new`] for a fallible version.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallany::SmallAny;
    /// let any = SmallAny::new(String::from("hello"));
    /// assert_eq!(any.downcast_ref::<String>().unwrap(), "hello");
    /// ```
    #[inline]
    pub fn new<T>(value: T) -> Self
    where
        T: Clone + 'static,
    {
        let mut any = SmallAny::new_empty();
        any.emplace(value);
        any
    }

    /// Construct a container holding `value`, reporting allocation failure.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallany::SmallAny;
    /// let any = SmallAny::try_new([0u64; 16]).unwrap();
    /// assert!(any.is::<[u64; 16]>());
    /// ```
    pub fn try_new<T>(value: T) -> Result<Self, Error>
    where
        T: Clone + 'static,
    {
        let mut any = SmallAny::new_empty();
        any.try_emplace(value)?;
        Ok(any)
    }

    /// Returns the strategy a value of type `T` would be stored with.
    ///
    /// If it is [`Strategy::Small`], storing a `T` never allocates.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallany::{SmallAny, Strategy};
    /// assert_eq!(SmallAny::strategy_of::<u8>(), Strategy::Small);
    /// assert_eq!(SmallAny::strategy_of::<[usize; 2]>(), Strategy::Big);
    /// ```
    pub const fn strategy_of<T>() -> Strategy {
        strategy::select::<T>()
    }

    /// Replace the held value with `value`.
    ///
    /// The previous value, if any, is dropped before the new one is stored.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallany::SmallAny;
    /// let mut any = SmallAny::new(10i32);
    /// any.emplace(String::from("x"));
    /// assert!(any.is::<String>());
    /// assert_eq!(any.downcast_ref::<i32>(), None);
    /// ```
    #[inline]
    pub fn emplace<T>(&mut self, value: T)
    where
        T: Clone + 'static,
    {
        self.emplace_with(move || value);
    }

    /// Replace the held value with the one returned by `f`.
    ///
    /// The previous value is dropped before `f` runs. If `f` panics the
    /// container is left empty and the panic propagates.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallany::SmallAny;
    /// let mut any = SmallAny::new_empty();
    /// any.emplace_with(|| vec![0u8; 1024]);
    /// assert_eq!(any.downcast_ref::<Vec<u8>>().unwrap().len(), 1024);
    /// ```
    pub fn emplace_with<T, F>(&mut self, f: F)
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        if let Err(layout) = self.store(f) {
            handle_alloc_error(layout);
        }
    }

    /// Replace the held value with `value`, reporting allocation failure.
    ///
    /// On failure the container is empty: the previous value was already dropped.
    pub fn try_emplace<T>(&mut self, value: T) -> Result<(), Error>
    where
        T: Clone + 'static,
    {
        self.try_emplace_with(move || value)
    }

    /// Replace the held value with the one returned by `f`, reporting allocation failure.
    ///
    /// The previous value is dropped first, then storage for `T` is acquired, and
    /// only then `f` runs. On failure the container is empty.
    pub fn try_emplace_with<T, F>(&mut self, f: F) -> Result<(), Error>
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        self.store(f).map_err(Error::alloc)
    }

    fn store<T, F>(&mut self, f: F) -> Result<(), core::alloc::Layout>
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        self.reset();

        // A nested container is adopted rather than wrapped.
        if TypeId::of::<T>() == TypeId::of::<SmallAny>() {
            let value = ManuallyDrop::new(f());
            // Safety: `T` is `SmallAny`, and `value` is never dropped as `T`.
            *self = unsafe { ptr::read(ptr::from_ref::<T>(&value).cast::<SmallAny>()) };
            return Ok(());
        }

        let (slot, vtable) = strategy::construct(f).map_err(|layout| {
            trace!(
                ty = core::any::type_name::<T>(),
                size = layout.size(),
                "heap allocation failed"
            );
            layout
        })?;

        trace!(
            ty = core::any::type_name::<T>(),
            strategy = ?vtable.strategy,
            "stored value"
        );

        self.slot = slot;
        self.vtable = Some(vtable);
        Ok(())
    }

    /// Returns `true` if the container holds a value.
    #[inline]
    pub fn has_value(&self) -> bool {
        self.vtable.is_some()
    }

    /// Drop the held value, if any.
    ///
    /// Calling it on an empty container does nothing.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallany::SmallAny;
    /// let mut any = SmallAny::new(1u8);
    /// any.reset();
    /// any.reset();
    /// assert!(!any.has_value());
    /// ```
    pub fn reset(&mut self) {
        // Detach first, so a panicking `Drop` can not run a second time.
        if let Some(vtable) = self.vtable.take() {
            trace!(ty = (vtable.type_tag)().name(), "dropping value");
            // Safety: the slot holds a live value bound to `vtable`.
            unsafe { (vtable.destroy)(&mut self.slot) };
        }
    }

    /// Exchange contents with `other` without touching the held values.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallany::SmallAny;
    /// let mut a = SmallAny::new(42i32);
    /// let mut b = SmallAny::new(String::from("hello"));
    /// a.swap(&mut b);
    /// assert_eq!(a.downcast_ref::<String>().unwrap(), "hello");
    /// assert_eq!(b.downcast_ref::<i32>(), Some(&42));
    /// ```
    #[inline]
    pub fn swap(&mut self, other: &mut SmallAny) {
        mem::swap(&mut self.slot, &mut other.slot);
        mem::swap(&mut self.vtable, &mut other.vtable);
    }

    /// Move the held value out into a new container, leaving this one empty.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallany::SmallAny;
    /// let mut a = SmallAny::new(10i32);
    /// let b = a.take();
    /// assert!(!a.has_value());
    /// assert_eq!(b.downcast_ref::<i32>(), Some(&10));
    /// ```
    pub fn take(&mut self) -> SmallAny {
        let taken = SmallAny {
            slot: self.slot.copy_bytes(),
            vtable: self.vtable.take(),
            unsend: PhantomData,
        };

        // The value belongs to `taken` now. Clear the bytes, then run the
        // ordinary reset path, which finds nothing to drop.
        self.slot = Slot::zeroed();
        self.reset();

        taken
    }

    /// Move the value held by `source` into `self`, leaving `source` empty.
    ///
    /// The value previously held by `self` is dropped. If `source` is empty,
    /// `self` is reset.
    pub fn move_from(&mut self, source: &mut SmallAny) {
        if !source.has_value() {
            self.reset();
        } else {
            self.swap(source);
            source.reset();
        }
    }

    /// Clone `source` into `self`, reporting allocation failure.
    ///
    /// The clone is built first and swapped in only once complete, so on
    /// failure `self` is left untouched.
    pub fn try_clone_from(&mut self, source: &SmallAny) -> Result<(), Error> {
        let mut temp = source.try_clone()?;
        self.swap(&mut temp);
        Ok(())
    }

    /// Clone the container, reporting allocation failure.
    pub fn try_clone(&self) -> Result<SmallAny, Error> {
        self.clone_inner().map_err(Error::alloc)
    }

    fn clone_inner(&self) -> Result<SmallAny, core::alloc::Layout> {
        let Some(vtable) = self.vtable else {
            return Ok(SmallAny::new_empty());
        };

        trace!(ty = (vtable.type_tag)().name(), "cloning value");

        // Safety: the slot holds a live value bound to `vtable`.
        let slot = unsafe { (vtable.clone)(&self.slot) }?;

        Ok(SmallAny {
            slot,
            vtable: Some(vtable),
            unsend: PhantomData,
        })
    }

    /// Returns the tag of the stored type, or `None` if empty.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallany::{SmallAny, TypeTag};
    /// let any = SmallAny::new(1.5f64);
    /// assert_eq!(any.type_tag(), Some(TypeTag::of::<f64>()));
    /// assert_eq!(SmallAny::new_empty().type_tag(), None);
    /// ```
    #[inline]
    pub fn type_tag(&self) -> Option<TypeTag> {
        self.vtable.map(|vtable| (vtable.type_tag)())
    }

    /// Returns the [`TypeId`] of the stored type, or `None` if empty.
    #[inline]
    pub fn type_id(&self) -> Option<TypeId> {
        self.type_tag().map(|tag| tag.id())
    }

    /// Returns the strategy the held value is stored with, or `None` if empty.
    #[inline]
    pub fn strategy(&self) -> Option<Strategy> {
        self.vtable.map(|vtable| vtable.strategy)
    }

    /// Returns `true` if the stored value is of type `T`.
    ///
    /// An empty container holds no type.
    #[inline]
    pub fn is<T>(&self) -> bool
    where
        T: 'static,
    {
        self.type_id() == Some(TypeId::of::<T>())
    }

    /// Returns a reference to the stored value if it is of type `T`.
    #[inline]
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: Clone + 'static,
    {
        if self.is::<T>() {
            // Safety: the slot holds a live `T`.
            Some(unsafe { strategy::access::<T>(&self.slot) })
        } else {
            None
        }
    }

    /// Returns a mutable reference to the stored value if it is of type `T`.
    #[inline]
    pub fn downcast_mut<T>(&mut self) -> Option<&mut T>
    where
        T: Clone + 'static,
    {
        if self.is::<T>() {
            // Safety: the slot holds a live `T`.
            Some(unsafe { strategy::access_mut::<T>(&mut self.slot) })
        } else {
            None
        }
    }

    /// Returns the stored value if it is of type `T`, otherwise gives the container back.
    ///
    /// A heap-stored value is moved out of its allocation, which is then freed.
    ///
    /// # Example
    ///
    /// ```
    /// # use smallany::SmallAny;
    /// let any = SmallAny::new(7u16);
    /// let any = any.downcast::<u32>().unwrap_err();
    /// assert_eq!(any.downcast::<u16>().ok(), Some(7));
    /// ```
    pub fn downcast<T>(mut self) -> Result<T, SmallAny>
    where
        T: Clone + 'static,
    {
        if !self.is::<T>() {
            return Err(self);
        }

        self.vtable = None;
        // Safety: the slot held a live `T`, and is detached from its binding.
        Ok(unsafe { strategy::take::<T>(&mut self.slot) })
    }
}

impl Default for SmallAny {
    #[inline]
    fn default() -> Self {
        SmallAny::new_empty()
    }
}

impl Drop for SmallAny {
    #[inline]
    fn drop(&mut self) {
        self.reset();
    }
}

impl Clone for SmallAny {
    fn clone(&self) -> Self {
        match self.clone_inner() {
            Ok(any) => any,
            Err(layout) => handle_alloc_error(layout),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        let mut temp = source.clone();
        self.swap(&mut temp);
    }
}

impl fmt::Debug for SmallAny {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.type_tag() {
            Some(tag) => f.debug_tuple("SmallAny").field(&tag.name()).finish(),
            None => f.write_str("SmallAny(<empty>)"),
        }
    }
}
