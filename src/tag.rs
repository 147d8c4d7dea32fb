use core::any::{type_name, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

/// Runtime identity of a stored type.
///
/// Two tags are equal exactly when they were created for the same type. The
/// type name is carried along for diagnostics only and takes no part in
/// comparisons.
///
/// # Example
///
/// ```
/// use smallany::TypeTag;
///
/// assert_eq!(TypeTag::of::<u32>(), TypeTag::of::<u32>());
/// assert_ne!(TypeTag::of::<u32>(), TypeTag::of::<u64>());
/// assert_eq!(TypeTag::of::<u32>().name(), "u32");
/// ```
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Tag of the type `T`.
    pub fn of<T: ?Sized + 'static>() -> TypeTag {
        TypeTag {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The [`TypeId`] behind this tag.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Human readable name of the type, as given by [`core::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeTag {
    #[inline]
    fn eq(&self, other: &TypeTag) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}
