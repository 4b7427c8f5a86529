//! Plain (synchronous) lenses.
//!
//! A [`Lens<S, A>`] focuses on a sub-value `A` inside a structure `S`:
//!
//! - [`view`](Lens::view) reads the focus,
//! - [`set`](Lens::set) replaces it, returning a new structure,
//! - [`over`](Lens::over) replaces it with a function of its current value.
//!
//! # Laws
//!
//! 1. **SetView Law**: `lens.view(&lens.set(value, source)) == &value`
//! 2. **ViewSet Law**: `lens.set(lens.view(&source).clone(), source) == source`
//! 3. **SetSet Law**: `lens.set(v2, lens.set(v1, source)) == lens.set(v2, source)`
//!
//! # Examples
//!
//! ```
//! use flens::optics::Lens;
//! use flens::lens;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct Point { x: i32, y: i32 }
//!
//! let x_lens = lens!(Point, x);
//!
//! let point = Point { x: 10, y: 20 };
//! assert_eq!(*x_lens.view(&point), 10);
//!
//! let updated = x_lens.set(100, point);
//! assert_eq!(updated, Point { x: 100, y: 20 });
//! ```

use std::marker::PhantomData;

/// A Lens focuses on a single sub-value within a larger structure.
///
/// # Type Parameters
///
/// - `S`: The source type (the whole structure)
/// - `A`: The focus type
pub trait Lens<S, A> {
    /// Returns a reference to the focus.
    fn view<'a>(&self, source: &'a S) -> &'a A;

    /// Replaces the focus with `value`, returning a new source.
    fn set(&self, value: A, source: S) -> S;

    /// Replaces the focus with `function` applied to its current value.
    ///
    /// ```
    /// use flens::optics::Lens;
    /// use flens::lens;
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// struct Point { x: i32, y: i32 }
    ///
    /// let x_lens = lens!(Point, x);
    /// let doubled = x_lens.over(|x| x * 2, Point { x: 10, y: 20 });
    /// assert_eq!(doubled.x, 20);
    /// ```
    fn over<F>(&self, function: F, source: S) -> S
    where
        F: FnOnce(A) -> A,
        A: Clone,
    {
        let current = self.view(&source).clone();
        self.set(function(current), source)
    }

    /// Composes this lens with a lens into its focus.
    ///
    /// ```
    /// use flens::optics::Lens;
    /// use flens::lens;
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// struct Address { street: String }
    ///
    /// #[derive(Clone, PartialEq, Debug)]
    /// struct Person { address: Address }
    ///
    /// let street = lens!(Person, address).compose(lens!(Address, street));
    /// let person = Person { address: Address { street: "Main St".to_string() } };
    /// assert_eq!(street.view(&person), "Main St");
    /// ```
    fn compose<B, L>(self, other: L) -> ComposedLens<Self, L, A>
    where
        Self: Sized,
        L: Lens<A, B>,
    {
        ComposedLens::new(self, other)
    }
}

/// A lens built from a getter and a setter.
///
/// The setter receives the new focus first and the structure second.
///
/// ```
/// use flens::optics::{FunctionLens, Lens};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let x_lens = FunctionLens::new(
///     |point: &Point| &point.x,
///     |x: i32, point: Point| Point { x, ..point },
/// );
///
/// assert_eq!(*x_lens.view(&Point { x: 10, y: 20 }), 10);
/// ```
pub struct FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> &A,
    St: Fn(A, S) -> S,
{
    getter: G,
    setter: St,
    _marker: PhantomData<fn() -> (S, A)>,
}

impl<S, A, G, St> FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> &A,
    St: Fn(A, S) -> S,
{
    /// Creates a lens from a getter and a setter.
    #[must_use]
    pub const fn new(getter: G, setter: St) -> Self {
        Self {
            getter,
            setter,
            _marker: PhantomData,
        }
    }
}

impl<S, A, G, St> Lens<S, A> for FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> &A,
    St: Fn(A, S) -> S,
{
    fn view<'a>(&self, source: &'a S) -> &'a A {
        (self.getter)(source)
    }

    fn set(&self, value: A, source: S) -> S {
        (self.setter)(value, source)
    }
}

impl<S, A, G, St> Clone for FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> &A + Clone,
    St: Fn(A, S) -> S + Clone,
{
    fn clone(&self) -> Self {
        Self {
            getter: self.getter.clone(),
            setter: self.setter.clone(),
            _marker: PhantomData,
        }
    }
}

impl<S, A, G, St> std::fmt::Debug for FunctionLens<S, A, G, St>
where
    G: Fn(&S) -> &A,
    St: Fn(A, S) -> S,
{
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("FunctionLens")
            .finish_non_exhaustive()
    }
}

/// Two lenses composed: `first` focuses on an intermediate `A`, `second`
/// focuses inside it.
pub struct ComposedLens<L1, L2, A> {
    first: L1,
    second: L2,
    _marker: PhantomData<fn() -> A>,
}

impl<L1, L2, A> ComposedLens<L1, L2, A> {
    /// Creates a composed lens.
    #[must_use]
    pub const fn new(first: L1, second: L2) -> Self {
        Self {
            first,
            second,
            _marker: PhantomData,
        }
    }
}

impl<S, A, B, L1, L2> Lens<S, B> for ComposedLens<L1, L2, A>
where
    L1: Lens<S, A>,
    L2: Lens<A, B>,
    A: Clone + 'static,
{
    fn view<'a>(&self, source: &'a S) -> &'a B {
        self.second.view(self.first.view(source))
    }

    fn set(&self, value: B, source: S) -> S {
        let intermediate = self.first.view(&source).clone();
        let updated = self.second.set(value, intermediate);
        self.first.set(updated, source)
    }
}

impl<L1: Clone, L2: Clone, A> Clone for ComposedLens<L1, L2, A> {
    fn clone(&self) -> Self {
        Self {
            first: self.first.clone(),
            second: self.second.clone(),
            _marker: PhantomData,
        }
    }
}

impl<L1: std::fmt::Debug, L2: std::fmt::Debug, A> std::fmt::Debug for ComposedLens<L1, L2, A> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("ComposedLens")
            .field("first", &self.first)
            .field("second", &self.second)
            .finish()
    }
}

/// Creates a [`FunctionLens`] for a struct field.
///
/// ```text
/// lens!(StructType, field_name)
/// ```
///
/// ```
/// use flens::optics::Lens;
/// use flens::lens;
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let y_lens = lens!(Point, y);
/// assert_eq!(y_lens.set(5, Point { x: 1, y: 2 }), Point { x: 1, y: 5 });
/// ```
#[macro_export]
macro_rules! lens {
    ($struct_type:ident, $field:ident) => {
        $crate::optics::FunctionLens::new(
            |source: &$struct_type| &source.$field,
            |value, mut source: $struct_type| {
                source.$field = value;
                source
            },
        )
    };
    ($struct_type:ident < $($generic:tt),+ >, $field:ident) => {
        $crate::optics::FunctionLens::new(
            |source: &$struct_type<$($generic),+>| &source.$field,
            |value, mut source: $struct_type<$($generic),+>| {
                source.$field = value;
                source
            },
        )
    };
    ($struct_type:path, $field:ident) => {
        $crate::optics::FunctionLens::new(
            |source: &$struct_type| &source.$field,
            |value, mut source: $struct_type| {
                source.$field = value;
                source
            },
        )
    };
}
