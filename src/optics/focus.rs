//! Underlying getter/setter pairs that an async lens wraps.
//!
//! A [`Focus`] is a lens whose results may still be arriving: `extract` and
//! `replace` return a [`MaybeTask`]. Two implementations exist:
//!
//! - [`LensFocus`]: any plain [`Lens`], whose results are always ready.
//! - [`FunctionFocus`]: a raw getter/setter pair, either of which may return
//!   a pending task (a field whose accessor performs I/O, an assignment that
//!   writes through to storage).

use crate::effect::MaybeTask;

use super::Lens;

/// A getter/setter pair whose results may be asynchronous.
///
/// # Type Parameters
///
/// - `S`: The structure type
/// - `A`: The focus type
/// - `E`: The rejection type of pending results
pub trait Focus<S, A, E> {
    /// Reads the focus out of `source`.
    fn extract(&self, source: &S) -> MaybeTask<A, E>;

    /// Produces a new structure with the focus replaced by `value`.
    fn replace(&self, value: A, source: S) -> MaybeTask<S, E>;
}

/// A plain lens used as a [`Focus`]. Both results are always ready.
#[derive(Debug, Clone)]
pub struct LensFocus<L> {
    lens: L,
}

impl<L> LensFocus<L> {
    /// Creates a focus backed by `lens`.
    #[must_use]
    pub const fn new(lens: L) -> Self {
        Self { lens }
    }

    /// Returns the underlying lens.
    pub const fn lens(&self) -> &L {
        &self.lens
    }
}

impl<S, A, E, L> Focus<S, A, E> for LensFocus<L>
where
    L: Lens<S, A>,
    A: Clone,
{
    fn extract(&self, source: &S) -> MaybeTask<A, E> {
        MaybeTask::ready(self.lens.view(source).clone())
    }

    fn replace(&self, value: A, source: S) -> MaybeTask<S, E> {
        MaybeTask::ready(self.lens.set(value, source))
    }
}

/// A [`Focus`] built from a raw getter and setter.
///
/// ```
/// use flens::effect::{MaybeTask, Task};
/// use flens::optics::{Focus, FunctionFocus};
/// use std::time::Duration;
///
/// let counter = FunctionFocus::new(
///     |count: &u32| MaybeTask::<u32, String>::from(Task::after(Duration::from_millis(1), *count)),
///     |value: u32, _count: u32| MaybeTask::ready(value),
/// );
///
/// assert!(counter.extract(&3).is_pending());
/// assert!(!counter.replace(4, 3).is_pending());
/// ```
#[derive(Clone)]
pub struct FunctionFocus<G, St> {
    getter: G,
    setter: St,
}

impl<G, St> FunctionFocus<G, St> {
    /// Creates a focus from a getter and a setter.
    ///
    /// The setter receives the new focus first and the structure second.
    #[must_use]
    pub const fn new<S, A, E>(getter: G, setter: St) -> Self
    where
        G: Fn(&S) -> MaybeTask<A, E>,
        St: Fn(A, S) -> MaybeTask<S, E>,
    {
        Self { getter, setter }
    }
}

impl<S, A, E, G, St> Focus<S, A, E> for FunctionFocus<G, St>
where
    G: Fn(&S) -> MaybeTask<A, E>,
    St: Fn(A, S) -> MaybeTask<S, E>,
{
    fn extract(&self, source: &S) -> MaybeTask<A, E> {
        (self.getter)(source)
    }

    fn replace(&self, value: A, source: S) -> MaybeTask<S, E> {
        (self.setter)(value, source)
    }
}

impl<G, St> std::fmt::Debug for FunctionFocus<G, St> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("FunctionFocus")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens;

    #[derive(Clone, PartialEq, Debug)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[tokio::test]
    async fn test_lens_focus_results_are_ready() {
        let focus = LensFocus::new(lens!(Point, x));
        let point = Point { x: 1, y: 2 };

        let extracted: MaybeTask<i32, String> = focus.extract(&point);
        assert!(!extracted.is_pending());
        assert_eq!(extracted.lift().await, Ok(1));

        let replaced: MaybeTask<Point, String> = focus.replace(5, point);
        assert_eq!(replaced.lift().await, Ok(Point { x: 5, y: 2 }));
    }

    #[test]
    fn test_lens_focus_exposes_its_lens() {
        let focus = LensFocus::new(lens!(Point, y));
        assert_eq!(*focus.lens().view(&Point { x: 1, y: 2 }), 2);
    }

    #[tokio::test]
    async fn test_function_focus_passes_value_then_source() {
        let focus = FunctionFocus::new(
            |point: &Point| MaybeTask::<i32, String>::ready(point.y),
            |y: i32, point: Point| MaybeTask::ready(Point { y, ..point }),
        );

        assert_eq!(focus.extract(&Point { x: 0, y: 7 }).lift().await, Ok(7));
        assert_eq!(
            focus.replace(8, Point { x: 0, y: 7 }).lift().await,
            Ok(Point { x: 0, y: 8 })
        );
    }
}
