use core::alloc::Layout;
use core::fmt;

use crate::TypeTag;

/// Errors reported by [`SmallAny`](crate::SmallAny) and the `anycast` family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested type does not match the stored one, or nothing is stored.
    TypeMismatch {
        /// Type the caller asked for.
        expected: TypeTag,
        /// Type actually stored, `None` if the container was empty.
        found: Option<TypeTag>,
    },
    /// Heap allocation for a value that does not fit the inline slot failed.
    AllocFailed {
        /// Layout that could not be allocated.
        layout: Layout,
    },
}

impl Error {
    /// Returns `true` for [`Error::TypeMismatch`].
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Error::TypeMismatch { .. })
    }

    pub(crate) fn mismatch<T: 'static>(found: Option<TypeTag>) -> Error {
        Error::TypeMismatch {
            expected: TypeTag::of::<T>(),
            found,
        }
    }

    pub(crate) fn alloc(layout: Layout) -> Error {
        Error::AllocFailed { layout }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::TypeMismatch {
                expected,
                found: Some(found),
            } => write!(f, "type mismatch: expected `{}`, found `{}`", expected, found),
            Error::TypeMismatch {
                expected,
                found: None,
            } => write!(f, "type mismatch: expected `{}`, container is empty", expected),
            Error::AllocFailed { layout } => write!(
                f,
                "failed to allocate {} bytes aligned to {}",
                layout.size(),
                layout.align()
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
