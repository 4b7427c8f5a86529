//! The absent sentinel.
//!
//! An async getter rejects when its focus resolves to a value for which
//! [`Nullable::is_nil`] holds. `None` and JSON `null` are absent; every other
//! value is present.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

/// Values that may stand for "nothing here".
///
/// The default method reports every value as present, so a domain type opts
/// in with an empty impl:
///
/// ```
/// use flens::optics::Nullable;
///
/// struct Account { balance: i64 }
///
/// impl Nullable for Account {}
///
/// assert!(!Account { balance: 0 }.is_nil());
/// assert!(None::<Account>.is_nil());
/// ```
pub trait Nullable {
    /// Returns `true` if this value is the absent sentinel.
    fn is_nil(&self) -> bool {
        false
    }
}

impl<T> Nullable for Option<T> {
    fn is_nil(&self) -> bool {
        self.is_none()
    }
}

impl<T: Nullable + ?Sized> Nullable for Box<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nullable + ?Sized> Nullable for Arc<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

impl<T: Nullable + ?Sized> Nullable for Rc<T> {
    fn is_nil(&self) -> bool {
        (**self).is_nil()
    }
}

macro_rules! impl_present {
    ($($present:ty),* $(,)?) => {
        $(impl Nullable for $present {})*
    };
}

impl_present!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
    (),
);

impl Nullable for &str {}

impl<T> Nullable for Vec<T> {}

impl<K, V, H> Nullable for HashMap<K, V, H> {}

impl<K, V> Nullable for BTreeMap<K, V> {}

impl<A, B> Nullable for (A, B) {}

#[cfg(feature = "json")]
impl Nullable for serde_json::Value {
    fn is_nil(&self) -> bool {
        self.is_null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(1), false)]
    #[case(None, true)]
    fn test_option_is_nil(#[case] value: Option<i32>, #[case] expected: bool) {
        assert_eq!(value.is_nil(), expected);
    }

    #[test]
    fn test_present_values_are_not_nil() {
        assert!(!0_i32.is_nil());
        assert!(!String::new().is_nil());
        assert!(!Vec::<i32>::new().is_nil());
        assert!(!"".is_nil());
    }

    #[test]
    fn test_smart_pointers_delegate() {
        assert!(Box::new(None::<i32>).is_nil());
        assert!(!Arc::new(Some(1)).is_nil());
    }

    #[cfg(feature = "json")]
    #[rstest]
    #[case(serde_json::Value::Null, true)]
    #[case(serde_json::json!(false), false)]
    #[case(serde_json::json!(0), false)]
    #[case(serde_json::json!(""), false)]
    #[case(serde_json::json!({}), false)]
    fn test_json_value_is_nil(#[case] value: serde_json::Value, #[case] expected: bool) {
        assert_eq!(value.is_nil(), expected);
    }
}
