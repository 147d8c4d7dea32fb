//! Typed extraction.
//!
//! Each function compares the requested type against the stored one and fails
//! with [`Error::TypeMismatch`] unless they are exactly the same type. Nothing
//! is converted: an `i32` can not be read back as an `i64`.

use crate::{Error, SmallAny};

/// Returns a clone of the stored value if it is of type `T`.
///
/// # Example
///
/// ```
/// use smallany::{anycast, SmallAny};
///
/// let any = SmallAny::new(42i32);
/// assert_eq!(anycast::<i32>(&any), Ok(42));
/// assert!(anycast::<f64>(&any).unwrap_err().is_type_mismatch());
/// ```
pub fn anycast<T>(any: &SmallAny) -> Result<T, Error>
where
    T: Clone + 'static,
{
    anycast_ref::<T>(any).cloned()
}

/// Returns a shared reference to the stored value if it is of type `T`.
///
/// # Example
///
/// ```
/// use smallany::{anycast_ref, SmallAny};
///
/// let any = SmallAny::new(String::from("Hello"));
/// let s: &String = anycast_ref(&any).unwrap();
/// assert_eq!(s, "Hello");
/// ```
pub fn anycast_ref<T>(any: &SmallAny) -> Result<&T, Error>
where
    T: Clone + 'static,
{
    any.downcast_ref::<T>()
        .ok_or_else(|| Error::mismatch::<T>(any.type_tag()))
}

/// Returns a mutable reference to the stored value if it is of type `T`.
///
/// # Example
///
/// ```
/// use smallany::{anycast, anycast_mut, SmallAny};
///
/// let mut any = SmallAny::new(String::from("Hi"));
/// *anycast_mut::<String>(&mut any).unwrap() = String::from("Changed");
/// assert_eq!(anycast::<String>(&any).unwrap(), "Changed");
/// ```
pub fn anycast_mut<T>(any: &mut SmallAny) -> Result<&mut T, Error>
where
    T: Clone + 'static,
{
    let found = any.type_tag();
    any.downcast_mut::<T>()
        .ok_or_else(|| Error::mismatch::<T>(found))
}
