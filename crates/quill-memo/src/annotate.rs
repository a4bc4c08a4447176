use std::collections::BTreeMap;
use std::fmt;

use parking_lot::RwLock;

/// A stable name for a function-like value, used as its registry key.
pub trait FunctionIdentity {
    fn function_name(&self) -> &str;
}

impl<T: FunctionIdentity + ?Sized> FunctionIdentity for &T {
    fn function_name(&self) -> &str {
        (**self).function_name()
    }
}

/// Attaches values to functions by name without changing the functions.
///
/// Typical use is a process-wide `static` that tags functions with a category:
///
/// ```
/// use quill_memo::AnnotationRegistry;
///
/// static CATEGORY: AnnotationRegistry<&str> = AnnotationRegistry::new();
///
/// let double = CATEGORY.register("arith").apply_as("double", |x: i32| x * 2);
/// assert_eq!(double(4), 8);
/// assert_eq!(CATEGORY.lookup("double"), Some("arith"));
/// assert_eq!(CATEGORY.lookup("triple"), None);
/// ```
///
/// Registering a name again replaces the previous value.
pub struct AnnotationRegistry<V> {
    lookup: RwLock<BTreeMap<String, V>>,
}

impl<V> AnnotationRegistry<V> {
    pub const fn new() -> Self {
        Self {
            lookup: parking_lot::const_rwlock(BTreeMap::new()),
        }
    }

    /// Returns a decorator that records `value` for whatever function it is applied to.
    pub fn register(&self, value: V) -> Annotator<'_, V> {
        Annotator {
            registry: self,
            value,
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lookup.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lookup.read().is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.lookup.read().keys().cloned().collect()
    }

    fn insert(&self, name: String, value: V) {
        let mut lookup = self.lookup.write();
        if lookup.contains_key(&name) {
            tracing::trace!(target: "quill.memo", function = %name, "replacing annotation");
        }
        lookup.insert(name, value);
    }
}

impl<V: Clone> AnnotationRegistry<V> {
    /// Value attached to `name`, or `None` if nothing was registered under it.
    pub fn lookup(&self, name: &str) -> Option<V> {
        self.lookup.read().get(name).cloned()
    }
}

impl<V> Default for AnnotationRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for AnnotationRegistry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.lookup.read().iter()).finish()
    }
}

/// Pending registration returned by [`AnnotationRegistry::register`].
#[must_use = "an annotator records nothing until it is applied to a function"]
pub struct Annotator<'a, V> {
    registry: &'a AnnotationRegistry<V>,
    value: V,
}

impl<V> Annotator<'_, V> {
    /// Records the value under `f`'s own name and hands `f` back unchanged.
    pub fn apply<F: FunctionIdentity>(self, f: F) -> F {
        let name = f.function_name().to_owned();
        self.registry.insert(name, self.value);
        f
    }

    /// Records the value under an explicit `name`, for functions and closures
    /// that carry no name of their own.
    pub fn apply_as<F>(self, name: impl Into<String>, f: F) -> F {
        self.registry.insert(name.into(), self.value);
        f
    }
}
