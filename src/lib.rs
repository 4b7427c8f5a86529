//! # flens
//!
//! Lenses that work over asynchronous values.
//!
//! ## Overview
//!
//! A plain lens reads and replaces one part of a structure. An async lens
//! does the same when the structure, the replacement value, or the lens's own
//! getter and setter produce results that are still arriving:
//!
//! - **Plain lenses**: [`Lens`](optics::Lens), the `lens!` macro, composition
//! - **Tasks**: [`Task`](effect::Task), a lazy, cancellable single-value future
//! - **Async lenses**: [`wrap`](optics::wrap) a plain lens or build one with
//!   [`flens`](optics::flens) from a getter and setter that may return tasks
//! - **Dynamic records**: property, index and path lenses over
//!   `serde_json::Value`
//!
//! ## Feature Flags
//!
//! - `optics`: Plain lenses and the `Nullable` trait
//! - `async`: Tasks and async lenses (tokio)
//! - `json`: Lenses into `serde_json::Value` (the async variants also need `async`)
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use flens::prelude::*;
//! use flens::optics::json::flens_prop;
//! use serde_json::{Value, json};
//! use std::time::Duration;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let prop = flens_prop::<FocusError<Value>>("prop");
//! let record = Task::after(Duration::from_millis(5), json!({ "prop": "a" }));
//!
//! assert_eq!(prop.view(record).await, Ok(json!("a")));
//! # });
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use flens::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "optics")]
    pub use crate::optics::*;

    #[cfg(feature = "async")]
    pub use crate::effect::*;
}

#[cfg(feature = "optics")]
pub mod optics;

#[cfg(feature = "async")]
pub mod effect;
