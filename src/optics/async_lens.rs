//! Async-aware lenses.
//!
//! An [`AsyncLens<S, A>`] is used like a [`Lens`](super::Lens), except that:
//!
//! - the structure handed to [`view`](AsyncLens::view), [`set`](AsyncLens::set)
//!   and [`over`](AsyncLens::over) may be a bare value or a [`Task`],
//! - the replacement value handed to `set` may be a bare value or a [`Task`],
//! - every operation returns a [`Task`] instead of a bare value.
//!
//! [`wrap`] turns a plain lens into an async lens and [`flens`] builds one
//! from a raw getter/setter pair whose results may themselves be pending.
//!
//! # Getter
//!
//! `view` lifts the structure into a task, runs the underlying getter once
//! the structure has resolved, lifts the getter's result, and, once that has
//! resolved, rejects with [`Absent`] if the focus is [nil](Nullable::is_nil).
//!
//! # Setter
//!
//! `set` lifts the value and the structure, resolves both concurrently, runs
//! the underlying setter on the pair and flattens the setter's (possibly
//! pending) result. A rejection of either input rejects the whole update.
//!
//! # Example
//!
//! ```
//! use flens::effect::{FocusError, Task};
//! use flens::optics::{AsyncLens, wrap};
//! use flens::lens;
//! use std::time::Duration;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Profile { name: String }
//!
//! type Rejection = FocusError<Profile>;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let name = wrap::<_, Rejection>(lens!(Profile, name));
//! let loading = Task::after(Duration::from_millis(5), Profile { name: "ada".to_string() });
//!
//! assert_eq!(name.view(loading).await, Ok("ada".to_string()));
//! # });
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use crate::effect::{Absent, MaybeTask, Task};

use super::{Focus, FunctionFocus, LensFocus, Nullable};

/// A lens whose operations accept and return tasks.
///
/// # Laws
///
/// Once every task involved resolves, an async lens behaves like the plain
/// lens it wraps:
///
/// 1. **SetView Law**: `view(set(value, source))` resolves with `value`
/// 2. **ViewSet Law**: `set(view(source), source)` resolves with `source`
/// 3. **SetSet Law**: `set(v2, set(v1, source))` resolves like `set(v2, source)`
pub trait AsyncLens<S, A> {
    /// The rejection reason of every task this lens returns.
    type Rejection;

    /// Reads the focus of a structure that may still be arriving.
    fn view(&self, source: impl Into<MaybeTask<S, Self::Rejection>>) -> Task<A, Self::Rejection>;

    /// Replaces the focus, where both the value and the structure may still
    /// be arriving.
    fn set(
        &self,
        value: impl Into<MaybeTask<A, Self::Rejection>>,
        source: impl Into<MaybeTask<S, Self::Rejection>>,
    ) -> Task<S, Self::Rejection>;

    /// Replaces the focus with `function` applied to the focus task.
    ///
    /// `function` receives the pending focus and returns the pending
    /// replacement, so it can map with [`Task::fmap`] or chain further
    /// asynchronous work with [`Task::flat_map`].
    ///
    /// ```
    /// use flens::effect::{FocusError, MaybeTask, Task};
    /// use flens::optics::{AsyncLens, wrap};
    /// use flens::lens;
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// struct Counter { hits: u32 }
    ///
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// let hits = wrap::<_, FocusError<Counter>>(lens!(Counter, hits));
    /// let bumped = hits.over(|focus| focus.fmap(|n: u32| n + 1), MaybeTask::ready(Counter { hits: 1 }));
    /// assert_eq!(bumped.await, Ok(Counter { hits: 2 }));
    /// # });
    /// ```
    fn over<F>(
        &self,
        function: F,
        source: impl Into<MaybeTask<S, Self::Rejection>>,
    ) -> Task<S, Self::Rejection>
    where
        Self: Clone + Send + 'static,
        S: Clone + Send + 'static,
        A: Send + 'static,
        Self::Rejection: Send + 'static,
        F: FnOnce(Task<A, Self::Rejection>) -> Task<A, Self::Rejection> + Send + 'static,
    {
        let lens = self.clone();
        source.into().lift().flat_map(move |structure: S| {
            let focus = lens.view(MaybeTask::ready(structure.clone()));
            lens.set(function(focus), MaybeTask::ready(structure))
        })
    }

    /// Composes this lens with an async lens into its focus.
    fn compose<B, L>(self, other: L) -> ComposedAsyncLens<Self, L, A>
    where
        Self: Sized,
        L: AsyncLens<A, B, Rejection = Self::Rejection>,
    {
        ComposedAsyncLens::new(self, other)
    }
}

// =============================================================================
// Wrapped
// =============================================================================

/// An async lens built around a [`Focus`].
///
/// Produced by [`wrap`] and [`flens`]. Cloning is cheap; clones share the
/// underlying focus.
pub struct Wrapped<F, E> {
    focus: Arc<F>,
    _marker: PhantomData<fn() -> E>,
}

impl<F, E> Wrapped<F, E> {
    /// Wraps a focus.
    #[must_use]
    pub fn new(focus: F) -> Self {
        Self {
            focus: Arc::new(focus),
            _marker: PhantomData,
        }
    }

    /// Returns the underlying focus.
    pub fn focus(&self) -> &F {
        &self.focus
    }
}

impl<F, E> Clone for Wrapped<F, E> {
    fn clone(&self) -> Self {
        Self {
            focus: Arc::clone(&self.focus),
            _marker: PhantomData,
        }
    }
}

impl<F: std::fmt::Debug, E> std::fmt::Debug for Wrapped<F, E> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Wrapped")
            .field("focus", &self.focus)
            .finish()
    }
}

impl<S, A, E, F> AsyncLens<S, A> for Wrapped<F, E>
where
    F: Focus<S, A, E> + Send + Sync + 'static,
    S: Send + 'static,
    A: Nullable + Send + 'static,
    E: From<Absent<S>> + Send + 'static,
{
    type Rejection = E;

    fn view(&self, source: impl Into<MaybeTask<S, E>>) -> Task<A, E> {
        let focus = Arc::clone(&self.focus);
        source.into().lift().flat_map(move |structure: S| {
            focus
                .extract(&structure)
                .lift()
                .flat_map(move |value: A| {
                    if value.is_nil() {
                        tracing::debug!("focus resolved to an absent value");
                        Task::reject(E::from(Absent(structure)))
                    } else {
                        Task::resolve(value)
                    }
                })
        })
    }

    fn set(
        &self,
        value: impl Into<MaybeTask<A, E>>,
        source: impl Into<MaybeTask<S, E>>,
    ) -> Task<S, E> {
        let focus = Arc::clone(&self.focus);
        value
            .into()
            .lift()
            .both(source.into().lift())
            .flat_map(move |(value, target)| focus.replace(value, target).lift())
    }
}

// =============================================================================
// Composition
// =============================================================================

/// Two async lenses composed: `first` focuses on an intermediate `A`,
/// `second` focuses inside it.
///
/// Behaves like wrapping the composition of the two underlying plain lenses.
pub struct ComposedAsyncLens<L1, L2, A> {
    first: L1,
    second: L2,
    _marker: PhantomData<fn() -> A>,
}

impl<L1, L2, A> ComposedAsyncLens<L1, L2, A> {
    /// Creates a composed async lens.
    #[must_use]
    pub const fn new(first: L1, second: L2) -> Self {
        Self {
            first,
            second,
            _marker: PhantomData,
        }
    }
}

impl<S, A, B, E, L1, L2> AsyncLens<S, B> for ComposedAsyncLens<L1, L2, A>
where
    L1: AsyncLens<S, A, Rejection = E> + Clone + Send + 'static,
    L2: AsyncLens<A, B, Rejection = E> + Clone + Send + 'static,
    S: Clone + Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
    E: Send + 'static,
{
    type Rejection = E;

    fn view(&self, source: impl Into<MaybeTask<S, E>>) -> Task<B, E> {
        self.second.view(self.first.view(source))
    }

    fn set(
        &self,
        value: impl Into<MaybeTask<B, E>>,
        source: impl Into<MaybeTask<S, E>>,
    ) -> Task<S, E> {
        let first = self.first.clone();
        let second = self.second.clone();
        value
            .into()
            .lift()
            .both(source.into().lift())
            .flat_map(move |(value, structure): (B, S)| {
                let outer = first.view(MaybeTask::ready(structure.clone()));
                let updated = second.set(MaybeTask::ready(value), outer);
                first.set(updated, MaybeTask::ready(structure))
            })
    }
}

impl<L1: Clone, L2: Clone, A> Clone for ComposedAsyncLens<L1, L2, A> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
            _marker: PhantomData,
        }
    }
}

impl<L1: std::fmt::Debug, L2: std::fmt::Debug, A> std::fmt::Debug
    for ComposedAsyncLens<L1, L2, A>
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ComposedAsyncLens")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Wraps a plain lens into an async lens.
///
/// The plain lens's getter and setter are the underlying functions of the
/// async getter and setter.
#[must_use]
pub fn wrap<L, E>(lens: L) -> Wrapped<LensFocus<L>, E> {
    Wrapped::new(LensFocus::new(lens))
}

/// Builds an async lens from a raw getter and setter.
///
/// Either function may return a pending task. The setter receives the new
/// focus first and the structure second.
///
/// ```
/// use flens::effect::{FocusError, MaybeTask, Task};
/// use flens::optics::{AsyncLens, flens};
/// use std::time::Duration;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Page { title: String }
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let title = flens(
///     |page: &Page| MaybeTask::Pending(Task::after(Duration::from_millis(5), page.title.clone())),
///     |title: String, _page: Page| MaybeTask::<_, FocusError<Page>>::ready(Page { title }),
/// );
///
/// let page = Page { title: "home".to_string() };
/// assert_eq!(title.view(MaybeTask::ready(page)).await, Ok("home".to_string()));
/// # });
/// ```
#[must_use]
pub fn flens<S, A, E, G, St>(getter: G, setter: St) -> Wrapped<FunctionFocus<G, St>, E>
where
    G: Fn(&S) -> MaybeTask<A, E>,
    St: Fn(A, S) -> MaybeTask<S, E>,
{
    Wrapped::new(FunctionFocus::new(getter, setter))
}

// =============================================================================
// Entry Points
// =============================================================================

/// Reads the focus of `source` through `lens`.
pub fn view<S, A, L>(lens: &L, source: impl Into<MaybeTask<S, L::Rejection>>) -> Task<A, L::Rejection>
where
    L: AsyncLens<S, A>,
{
    lens.view(source)
}

/// Replaces the focus of `source` with `value` through `lens`.
pub fn set<S, A, L>(
    lens: &L,
    value: impl Into<MaybeTask<A, L::Rejection>>,
    source: impl Into<MaybeTask<S, L::Rejection>>,
) -> Task<S, L::Rejection>
where
    L: AsyncLens<S, A>,
{
    lens.set(value, source)
}

/// Replaces the focus of `source` with `function` applied to the focus task.
pub fn over<S, A, L, F>(
    lens: &L,
    function: F,
    source: impl Into<MaybeTask<S, L::Rejection>>,
) -> Task<S, L::Rejection>
where
    L: AsyncLens<S, A> + Clone + Send + 'static,
    S: Clone + Send + 'static,
    A: Send + 'static,
    L::Rejection: Send + 'static,
    F: FnOnce(Task<A, L::Rejection>) -> Task<A, L::Rejection> + Send + 'static,
{
    lens.over(function, source)
}
