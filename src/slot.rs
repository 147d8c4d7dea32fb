use core::cell::UnsafeCell;
use core::mem::{align_of, size_of, MaybeUninit};
use core::ptr;

/// Capacity of the inline slot in bytes: the width of one native pointer.
///
/// Values whose size and alignment both fit within this many bytes are stored
/// inline, everything else goes to the heap.
pub const SLOT_SIZE: usize = size_of::<*mut u8>();

/// Pointer-sized storage, read either as raw inline bytes or as a heap handle.
///
/// Which reading is active is decided by the binding of the owning container;
/// the slot itself carries no tag and never drops anything.
///
/// The bytes sit in an `UnsafeCell`, so an inline value with interior
/// mutability (`Cell`, `RefCell`, ...) may be mutated through a shared reference.
#[repr(transparent)]
pub(crate) struct Slot {
    cell: UnsafeCell<MaybeUninit<*mut u8>>,
}

impl Slot {
    /// A slot with every byte cleared. Holds nothing.
    pub const fn zeroed() -> Self {
        Slot::with_heap(ptr::null_mut())
    }

    /// Returns `true` if a `T` can live directly inside the slot.
    pub const fn fits<T>() -> bool {
        size_of::<T>() <= SLOT_SIZE && align_of::<T>() <= SLOT_SIZE
    }

    /// Moves `value` into the inline bytes of a fresh slot.
    pub fn with_inline<T>(value: T) -> Self {
        let mut slot = Slot::zeroed();
        // Safety: `inline_mut` checked the layout, the slot is ours.
        unsafe { slot.inline_mut::<T>().write(value) };
        slot
    }

    /// Stores a heap handle in a fresh slot.
    pub const fn with_heap(ptr: *mut u8) -> Self {
        Slot {
            cell: UnsafeCell::new(MaybeUninit::new(ptr)),
        }
    }

    /// Copies the raw bytes into a new slot.
    ///
    /// Nothing is cloned: whatever the bytes own is now reachable twice, and
    /// the caller decides which copy keeps it.
    pub fn copy_bytes(&self) -> Slot {
        // Safety: `MaybeUninit` accepts any bytes, and nobody writes concurrently.
        let bytes = unsafe { self.cell.get().read() };
        Slot {
            cell: UnsafeCell::new(bytes),
        }
    }

    /// Pointer to the potentially uninitialized inline `T`.
    ///
    /// Writes through it are allowed for types with interior mutability.
    /// The caller is responsible for the value being initialized before reading it.
    pub fn inline<T>(&self) -> *const T {
        // Runtime check: `T` is only known not to fit in the untaken strategy branch.
        assert!(Self::fits::<T>());

        self.cell.get().cast_const().cast()
    }

    /// Mutable pointer to the potentially uninitialized inline `T`.
    pub fn inline_mut<T>(&mut self) -> *mut T {
        assert!(Self::fits::<T>());

        self.cell.get_mut().as_mut_ptr().cast()
    }

    /// Heap handle stored in the slot.
    ///
    /// # Safety
    ///
    /// The slot must have been created with [`Slot::with_heap`].
    pub unsafe fn heap(&self) -> *mut u8 {
        unsafe { self.cell.get().cast::<*mut u8>().read() }
    }
}
