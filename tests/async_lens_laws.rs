#![cfg(feature = "async")]
//! Property-based tests for async lens laws.
//!
//! Once every task involved resolves, a wrapped lens must agree with the
//! plain lens it wraps:
//!
//! - **Transparency**: `view(wrap(l), s)` settles to `l.view(&s)` and
//!   `set(wrap(l), a, s)` settles to `l.set(a, s)`
//! - **Container laziness**: a resolved task of `s` views like `s`
//! - **SetView Law**: `view(set(a, s))` settles to `a`
//! - **Composition**: composing wrapped lenses agrees with wrapping the
//!   composition

use std::time::Duration;

use flens::effect::{FocusError, MaybeTask, Task};
use flens::lens;
use flens::optics::{AsyncLens, Lens, Nullable, wrap};
use proptest::prelude::*;

// =============================================================================
// Test Structures
// =============================================================================

#[derive(Clone, PartialEq, Debug)]
struct Inner {
    value: i32,
    tag: String,
}

#[derive(Clone, PartialEq, Debug)]
struct Outer {
    inner: Inner,
    count: u32,
}

impl Nullable for Inner {}

type OuterRejection = FocusError<Outer>;

#[derive(Debug, PartialEq)]
enum Rejection {
    Absent,
}

impl<S> From<flens::effect::Absent<S>> for Rejection {
    fn from(_: flens::effect::Absent<S>) -> Self {
        Self::Absent
    }
}

fn outer_strategy() -> impl Strategy<Value = Outer> {
    (any::<i32>(), "[a-z]{0,8}", any::<u32>()).prop_map(|(value, tag, count)| Outer {
        inner: Inner { value, tag },
        count,
    })
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap()
}

// =============================================================================
// Transparency
// =============================================================================

proptest! {
    #[test]
    fn prop_wrapped_view_matches_plain_view(outer in outer_strategy()) {
        let plain = lens!(Outer, count);
        let expected = *plain.view(&outer);
        let wrapped = wrap::<_, OuterRejection>(plain);

        let result = runtime().block_on(wrapped.view(MaybeTask::ready(outer)));

        prop_assert_eq!(result, Ok(expected));
    }

    #[test]
    fn prop_wrapped_set_matches_plain_set(outer in outer_strategy(), count: u32) {
        let plain = lens!(Outer, count);
        let expected = plain.set(count, outer.clone());
        let wrapped = wrap::<_, OuterRejection>(plain);

        let result = runtime().block_on(
            wrapped.set(MaybeTask::ready(count), MaybeTask::ready(outer)),
        );

        prop_assert_eq!(result, Ok(expected));
    }

    #[test]
    fn prop_resolved_container_views_like_bare(outer in outer_strategy(), delay in 0_u64..20) {
        let wrapped = wrap::<_, OuterRejection>(lens!(Outer, inner));
        let runtime = runtime();

        let bare = runtime.block_on(wrapped.view(MaybeTask::ready(outer.clone())));
        let resolved = runtime.block_on(wrapped.view(Task::resolve(outer.clone())));
        let delayed = runtime.block_on(
            wrapped.view(Task::after(Duration::from_millis(delay), outer)),
        );

        prop_assert_eq!(&bare, &resolved);
        prop_assert_eq!(&bare, &delayed);
    }

    #[test]
    fn prop_set_view_law(outer in outer_strategy(), tag in "[a-z]{0,8}") {
        let wrapped = wrap::<_, FocusError<Inner>>(lens!(Inner, tag));
        let runtime = runtime();

        let updated = wrapped.set(MaybeTask::ready(tag.clone()), MaybeTask::ready(outer.inner));
        let result = runtime.block_on(wrapped.view(updated));

        prop_assert_eq!(result, Ok(tag));
    }

    #[test]
    fn prop_set_set_law(outer in outer_strategy(), first: u32, second: u32) {
        let wrapped = wrap::<_, OuterRejection>(lens!(Outer, count));
        let runtime = runtime();

        let twice = wrapped.set(
            MaybeTask::ready(second),
            wrapped.set(MaybeTask::ready(first), MaybeTask::ready(outer.clone())),
        );
        let once = wrapped.set(MaybeTask::ready(second), MaybeTask::ready(outer));

        prop_assert_eq!(runtime.block_on(twice), runtime.block_on(once));
    }
}

// =============================================================================
// Composition
// =============================================================================

proptest! {
    #[test]
    fn prop_composition_commutes_with_wrapping(outer in outer_strategy(), value: i32) {
        let composed = wrap::<_, Rejection>(lens!(Outer, inner))
            .compose(wrap::<_, Rejection>(lens!(Inner, value)));
        let wrapped = wrap::<_, Rejection>(lens!(Outer, inner).compose(lens!(Inner, value)));
        let runtime = runtime();

        prop_assert_eq!(
            runtime.block_on(composed.view(MaybeTask::ready(outer.clone()))),
            runtime.block_on(wrapped.view(MaybeTask::ready(outer.clone())))
        );
        prop_assert_eq!(
            runtime.block_on(composed.set(MaybeTask::ready(value), MaybeTask::ready(outer.clone()))),
            runtime.block_on(wrapped.set(MaybeTask::ready(value), MaybeTask::ready(outer)))
        );
    }
}
