//! Lenses into dynamic records.
//!
//! Records and sequences are [`serde_json::Value`]s. Three plain lenses cover
//! the usual locations, each with an async counterpart:
//!
//! | Plain | Async | Focus |
//! |-------|-------|-------|
//! | [`lens_prop`] | [`flens_prop`] | a named field of an object |
//! | [`lens_index`] | [`flens_index`] | an element of an array (negative counts from the end) |
//! | [`lens_path`] | [`flens_path`] | the value reached by following keys and indices |
//!
//! A missing location views as `null`, which the async lenses report as an
//! absent focus.
//!
//! # Examples
//!
//! ```
//! use flens::optics::Lens;
//! use flens::optics::json::{lens_index, lens_path, lens_prop};
//! use serde_json::json;
//!
//! let record = json!({ "name": "ada", "tags": ["x", "y"] });
//!
//! assert_eq!(lens_prop("name").view(&record), &json!("ada"));
//! assert_eq!(lens_index(-1).view(&record["tags"]), &json!("y"));
//! assert_eq!(lens_path(["tags", "0"]).view(&record), &json!(null));
//!
//! let renamed = lens_prop("name").set(json!("grace"), record);
//! assert_eq!(renamed, json!({ "name": "grace", "tags": ["x", "y"] }));
//! ```

use serde_json::{Map, Value};

use super::Lens;
#[cfg(feature = "async")]
use super::{LensFocus, Wrapped, wrap};

static NULL: Value = Value::Null;

// =============================================================================
// Path Segments
// =============================================================================

/// One step of a [`lens_path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field name of an object.
    Key(String),
    /// A position in an array. Negative positions count from the end.
    Index(isize),
}

impl PathSegment {
    /// Returns an empty container suited to holding this segment.
    fn empty_container(&self) -> Value {
        match self {
            Self::Key(_) => Value::Object(Map::new()),
            Self::Index(_) => Value::Array(Vec::new()),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<isize> for PathSegment {
    fn from(index: isize) -> Self {
        Self::Index(index)
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Key(key) => write!(formatter, "{key}"),
            Self::Index(index) => write!(formatter, "{index}"),
        }
    }
}

/// Resolves a possibly negative position against a length.
fn resolve_index(index: isize, length: usize) -> Option<usize> {
    let position = if index < 0 {
        length.checked_sub(index.unsigned_abs())?
    } else {
        index.unsigned_abs()
    };
    (position < length).then_some(position)
}

// =============================================================================
// Updates
// =============================================================================

/// Returns `target` with field `name` set to `value`.
///
/// A target that is not an object is replaced by a single-field object.
///
/// ```
/// use flens::optics::json::assoc;
/// use serde_json::json;
///
/// assert_eq!(assoc("b", json!(2), json!({ "a": 1 })), json!({ "a": 1, "b": 2 }));
/// assert_eq!(assoc("b", json!(2), json!([1])), json!({ "b": 2 }));
/// ```
pub fn assoc(name: &str, value: Value, target: Value) -> Value {
    let mut record = match target {
        Value::Object(record) => record,
        _ => Map::new(),
    };
    record.insert(name.to_string(), value);
    Value::Object(record)
}

/// Returns `target` with the element at `index` replaced by `value`.
///
/// Out-of-range positions and non-array targets leave `target` unchanged.
pub fn update(index: isize, value: Value, target: Value) -> Value {
    match target {
        Value::Array(mut items) => {
            if let Some(position) = resolve_index(index, items.len()) {
                items[position] = value;
            }
            Value::Array(items)
        }
        other => other,
    }
}

/// Returns `target` with the location at `segments` set to `value`.
///
/// Missing or scalar intermediate levels are created: an array when the
/// following segment is an index, an object otherwise. An index past the end
/// of an array pads it with `null`.
///
/// ```
/// use flens::optics::json::{PathSegment, assoc_path};
/// use serde_json::json;
///
/// let path = [PathSegment::from("rows"), PathSegment::from(1), PathSegment::from("id")];
/// assert_eq!(
///     assoc_path(&path, json!(7), json!({})),
///     json!({ "rows": [null, { "id": 7 }] })
/// );
/// ```
pub fn assoc_path(segments: &[PathSegment], value: Value, target: Value) -> Value {
    let Some((head, rest)) = segments.split_first() else {
        return value;
    };
    let mut target = target;
    let replacement = match rest.first() {
        None => value,
        Some(next) => {
            let child = take_child(&mut target, head)
                .filter(|child| child.is_object() || child.is_array())
                .unwrap_or_else(|| next.empty_container());
            assoc_path(rest, value, child)
        }
    };
    put_child(head, replacement, target)
}

fn child<'a>(source: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (segment, source) {
        (PathSegment::Key(key), Value::Object(record)) => record.get(key),
        (PathSegment::Index(index), Value::Array(items)) => {
            resolve_index(*index, items.len()).map(|position| &items[position])
        }
        (PathSegment::Index(index), Value::Object(record)) => record.get(&index.to_string()),
        _ => None,
    }
}

fn take_child(source: &mut Value, segment: &PathSegment) -> Option<Value> {
    match (segment, source) {
        (PathSegment::Key(key), Value::Object(record)) => record.get_mut(key).map(std::mem::take),
        (PathSegment::Index(index), Value::Array(items)) => {
            let position = resolve_index(*index, items.len())?;
            Some(std::mem::take(&mut items[position]))
        }
        (PathSegment::Index(index), Value::Object(record)) => {
            record.get_mut(&index.to_string()).map(std::mem::take)
        }
        _ => None,
    }
}

fn put_child(segment: &PathSegment, value: Value, target: Value) -> Value {
    match (segment, target) {
        (PathSegment::Index(index), Value::Array(mut items)) => {
            if let Some(position) = resolve_index(*index, items.len()) {
                items[position] = value;
            } else if let Ok(position) = usize::try_from(*index) {
                items.resize(position, Value::Null);
                items.push(value);
            }
            Value::Array(items)
        }
        (PathSegment::Index(index), target) => assoc(&index.to_string(), value, target),
        (PathSegment::Key(key), target) => assoc(key, value, target),
    }
}

// =============================================================================
// Lenses
// =============================================================================

/// A lens onto a named field of an object. See [`lens_prop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropLens {
    name: String,
}

impl Lens<Value, Value> for PropLens {
    fn view<'a>(&self, source: &'a Value) -> &'a Value {
        source.get(&self.name).unwrap_or(&NULL)
    }

    fn set(&self, value: Value, source: Value) -> Value {
        assoc(&self.name, value, source)
    }
}

/// A lens onto an element of an array. See [`lens_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexLens {
    index: isize,
}

impl Lens<Value, Value> for IndexLens {
    fn view<'a>(&self, source: &'a Value) -> &'a Value {
        match source {
            Value::Array(items) => resolve_index(self.index, items.len())
                .map_or(&NULL, |position| &items[position]),
            _ => &NULL,
        }
    }

    fn set(&self, value: Value, source: Value) -> Value {
        update(self.index, value, source)
    }
}

/// A lens onto a nested location. See [`lens_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLens {
    segments: Vec<PathSegment>,
}

impl PathLens {
    /// Returns the segments of this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl Lens<Value, Value> for PathLens {
    fn view<'a>(&self, source: &'a Value) -> &'a Value {
        self.segments
            .iter()
            .try_fold(source, |current, segment| child(current, segment))
            .unwrap_or(&NULL)
    }

    fn set(&self, value: Value, source: Value) -> Value {
        assoc_path(&self.segments, value, source)
    }
}

/// Creates a lens onto field `name` of an object.
///
/// Viewing a missing field, or a non-object, yields `null`. Setting on a
/// non-object yields a single-field object.
pub fn lens_prop(name: impl Into<String>) -> PropLens {
    PropLens { name: name.into() }
}

/// Creates a lens onto the element at `index` of an array.
///
/// Negative positions count from the end. Viewing out of range yields `null`;
/// setting out of range leaves the array unchanged.
pub const fn lens_index(index: isize) -> IndexLens {
    IndexLens { index }
}

/// Creates a lens onto the location reached by following `segments`.
///
/// An empty path focuses on the whole value.
pub fn lens_path<I, P>(segments: I) -> PathLens
where
    I: IntoIterator<Item = P>,
    P: Into<PathSegment>,
{
    PathLens {
        segments: segments.into_iter().map(Into::into).collect(),
    }
}

/// Creates an async lens onto field `name` of an object.
///
/// ```
/// use flens::effect::FocusError;
/// use flens::optics::AsyncLens;
/// use flens::optics::json::flens_prop;
/// use serde_json::{Value, json};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let name = flens_prop::<FocusError<Value>>("name");
/// assert_eq!(name.view(json!({ "name": "ada" })).await, Ok(json!("ada")));
/// assert_eq!(
///     name.view(json!({})).await,
///     Err(FocusError::Absent(json!({})))
/// );
/// # });
/// ```
#[cfg(feature = "async")]
#[must_use]
pub fn flens_prop<E>(name: impl Into<String>) -> Wrapped<LensFocus<PropLens>, E> {
    wrap(lens_prop(name))
}

/// Creates an async lens onto the location reached by following `segments`.
#[cfg(feature = "async")]
#[must_use]
pub fn flens_path<E, I, P>(segments: I) -> Wrapped<LensFocus<PathLens>, E>
where
    I: IntoIterator<Item = P>,
    P: Into<PathSegment>,
{
    wrap(lens_path(segments))
}

/// Creates an async lens onto the element at `index` of an array.
#[cfg(feature = "async")]
#[must_use]
pub fn flens_index<E>(index: isize) -> Wrapped<LensFocus<IndexLens>, E> {
    wrap(lens_index(index))
}
