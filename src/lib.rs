//! # SmallAny: Type-Erased Values with Inline Storage
//!
//! [`SmallAny`] holds one value of any `Clone + 'static` type behind a single
//! uniform handle, and gives it back only when asked for exactly that type. It
//! is meant for property bags, plugin return values and event payloads where
//! there is no common trait and no predeclared set of variants.
//!
//! ## Core Concept
//!
//! `Box<dyn Any>` always allocates. [`SmallAny`] owns a pointer-sized slot and
//! stores values that fit into it inline ([`Strategy::Small`]). Larger or more
//! aligned values get their own heap allocation and the slot keeps the pointer
//! ([`Strategy::Big`]).
//!
//! Instead of a trait object, each stored type binds a small static table of
//! functions (type tag, drop, clone) when it is stored. The table is what lets
//! the container clone and drop a value whose type it no longer knows.
//!
//! ## Quick Start
//!
//! ```rust
//! use smallany::{anycast, anycast_mut, SmallAny, Strategy};
//!
//! // Small values stay inline
//! let mut any = SmallAny::new(42i32);
//! assert_eq!(any.strategy(), Some(Strategy::Small));
//! assert_eq!(anycast::<i32>(&any), Ok(42));
//!
//! // Asking for the wrong type is an error, never a reinterpretation
//! assert!(anycast::<f64>(&any).is_err());
//!
//! // Replacing the value changes its type in place
//! any.emplace(String::from("hello"));
//! anycast_mut::<String>(&mut any).unwrap().push_str(" world");
//! assert_eq!(anycast::<String>(&any).unwrap(), "hello world");
//!
//! // Large values go to the heap
//! any.emplace(vec![1u8; 100_000]);
//! assert_eq!(any.strategy(), Some(Strategy::Big));
//! ```
//!
//! ## Lifecycle
//!
//! ```rust
//! use smallany::SmallAny;
//!
//! let mut a = SmallAny::new(String::from("a"));
//!
//! // Clones are deep and independent
//! let mut b = a.clone();
//! b.downcast_mut::<String>().unwrap().push('!');
//! assert_eq!(a.downcast_ref::<String>().unwrap(), "a");
//!
//! // Taking moves the value out and leaves the source empty
//! let c = a.take();
//! assert!(!a.has_value());
//! assert!(c.has_value());
//!
//! // Resetting is idempotent
//! b.reset();
//! b.reset();
//! assert!(!b.has_value());
//! ```
//!
//! ## Feature Flags
//!
//! - **`std`** (enabled by default)
//!   - Links to the standard library and implements `std::error::Error` for [`Error`]
//!   - Disable for `#![no_std]` environments: `default-features = false`
//!
//! - **`tracing`** (optional)
//!   - Emits `trace` level events when values are stored, cloned and dropped
//!
//! ## Threading
//!
//! [`SmallAny`] is neither `Send` nor `Sync`. It has a single owner and performs
//! no locking.

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![deny(clippy::as_conversions)]

extern crate alloc;

#[cfg(feature = "tracing")]
#[allow(unused_imports)]
pub(crate) use tracing::trace;

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {};
}

mod any;
mod cast;
mod error;
mod slot;
mod strategy;
mod tag;

pub use crate::any::SmallAny;
pub use crate::cast::{anycast, anycast_mut, anycast_ref};
pub use crate::error::Error;
pub use crate::slot::SLOT_SIZE;
pub use crate::strategy::Strategy;
pub use crate::tag::TypeTag;
