//! Lenses, plain and async-aware.
//!
//! # Layers
//!
//! - [`Lens`]: a plain getter/setter pair over owned structures.
//! - [`Focus`]: a getter/setter pair whose results may still be arriving.
//! - [`AsyncLens`]: a lens whose inputs and outputs are
//!   [`Task`](crate::effect::Task)s. Built with [`wrap`] from a plain lens or
//!   with [`flens`] from a raw pair.
//! - [`json`]: lenses into dynamic records (`serde_json::Value`).
//!
//! # Example with Lens
//!
//! ```
//! use flens::optics::Lens;
//! use flens::lens;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Address { street: String, city: String }
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Person { name: String, address: Address }
//!
//! let person_street = lens!(Person, address).compose(lens!(Address, street));
//!
//! let person = Person {
//!     name: "Alice".to_string(),
//!     address: Address { street: "Main St".to_string(), city: "Tokyo".to_string() },
//! };
//!
//! let updated = person_street.set("Oak Ave".to_string(), person);
//! assert_eq!(updated.address.street, "Oak Ave");
//! assert_eq!(updated.address.city, "Tokyo");
//! ```
//!
//! # Example with AsyncLens
//!
//! ```
//! use flens::effect::{FocusError, Task};
//! use flens::optics::{AsyncLens, Nullable, wrap};
//! use flens::lens;
//! use std::time::Duration;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Address { city: String }
//!
//! impl Nullable for Address {}
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Person { address: Address }
//!
//! type Rejection = FocusError<Person>;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let address = wrap::<_, Rejection>(lens!(Person, address));
//! let loaded = Task::after(
//!     Duration::from_millis(5),
//!     Person { address: Address { city: "Tokyo".to_string() } },
//! );
//!
//! let osaka = Task::after(Duration::from_millis(1), Address { city: "Osaka".to_string() });
//! let moved = address.set(osaka, loaded);
//! assert_eq!(moved.await.map(|person| person.address.city), Ok("Osaka".to_string()));
//! # });
//! ```

mod lens;
mod nullable;

#[cfg(feature = "async")]
mod async_lens;
#[cfg(feature = "async")]
mod focus;

#[cfg(feature = "json")]
pub mod json;

pub use lens::ComposedLens;
pub use lens::FunctionLens;
pub use lens::Lens;

pub use nullable::Nullable;

#[cfg(feature = "async")]
pub use focus::{Focus, FunctionFocus, LensFocus};

#[cfg(feature = "async")]
pub use async_lens::{AsyncLens, ComposedAsyncLens, Wrapped, flens, over, set, view, wrap};
