use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::annotate::FunctionIdentity;

/// Memoizes a function of a statically typed argument value.
///
/// This is the typed counterpart of [`crate::KeyedMemoizer`]: there is no
/// parameter binding, the argument (usually a tuple) is passed as-is. The key is
/// either the argument itself ([`Memo::new`]) or whatever a key extractor derives
/// from it ([`Memo::keyed`]).
///
/// Like `KeyedMemoizer` the cache is unlocked, so `Memo` is `!Sync`; wrap it in
/// a lock to share it across threads.
pub struct Memo<A, K, R> {
    name: String,
    key: Box<dyn Fn(&A) -> K + Send>,
    body: Box<dyn Fn(&A) -> R + Send>,
    cache: RefCell<HashMap<K, R>>,
}

impl<A, R> Memo<A, A, R>
where
    A: Clone + 'static,
{
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&A) -> R + Send + 'static,
    {
        Self::keyed(name, A::clone, f)
    }
}

impl<A, K, R> Memo<A, K, R> {
    pub fn keyed<KF, F>(name: impl Into<String>, key: KF, f: F) -> Self
    where
        KF: Fn(&A) -> K + Send + 'static,
        F: Fn(&A) -> R + Send + 'static,
    {
        Self {
            name: name.into(),
            key: Box::new(key),
            body: Box::new(f),
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}

impl<A, K, R> Memo<A, K, R>
where
    K: Eq + Hash,
    R: Clone,
{
    pub fn call(&self, args: &A) -> R {
        let key = (self.key)(args);
        if let Some(hit) = self.cache.borrow().get(&key) {
            tracing::trace!(target: "quill.memo", function = %self.name, "memo hit");
            return hit.clone();
        }

        tracing::trace!(target: "quill.memo", function = %self.name, "memo miss");
        let result = (self.body)(args);
        self.cache
            .borrow_mut()
            .entry(key)
            .or_insert(result)
            .clone()
    }

    pub fn contains_key(&self, args: &A) -> bool {
        self.cache.borrow().contains_key(&(self.key)(args))
    }
}

impl<A, K, R> FunctionIdentity for Memo<A, K, R> {
    fn function_name(&self) -> &str {
        &self.name
    }
}

impl<A, K, R> fmt::Debug for Memo<A, K, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("name", &self.name)
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
