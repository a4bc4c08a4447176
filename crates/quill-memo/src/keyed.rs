use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::annotate::FunctionIdentity;
use crate::error::MemoError;
use crate::signature::{BoundArgs, CallArgs, Signature};

type KeyFn<V, K> = Box<dyn Fn(&BoundArgs<V>) -> Result<K, MemoError> + Send>;
type BodyFn<V, R, E> = Box<dyn Fn(&BoundArgs<V>) -> Result<R, E> + Send>;

/// Memoizes a function of named parameters by a derived key.
///
/// The key rule is fixed when the memoizer is built: either every bound argument
/// in declaration order ([`KeyedMemoizer::new`]) or a caller-supplied extractor
/// ([`KeyedMemoizer::with_key`]). Per call, arguments are bound against the
/// [`Signature`] (defaults and keywords merged), the key is derived, and the
/// wrapped function runs only if that key has never been stored.
///
/// The memoizer never checks that the wrapped function is pure. A narrow key that
/// ignores an argument the function depends on returns stale results; in
/// particular a key that omits the receiver of a method shares results across
/// all receivers.
///
/// Errors from the wrapped function propagate unchanged and are not cached.
///
/// # Single-threaded fast path
///
/// When the signature has no defaults and the call has no keywords, one scratch
/// [`BoundArgs`] allocation is reused across calls. Together with the unlocked
/// cache this makes the memoizer `!Sync`: callers that need to share one across
/// threads must wrap it in their own lock (it is `Send` whenever its argument,
/// key and result types are, so a `Mutex<KeyedMemoizer<..>>` works).
pub struct KeyedMemoizer<V, K, R, E = MemoError> {
    signature: Signature<V>,
    key: KeyFn<V, K>,
    body: BodyFn<V, R, E>,
    cache: RefCell<HashMap<K, R>>,
    scratch: Cell<Option<BoundArgs<V>>>,
}

impl<V, R, E> KeyedMemoizer<V, Vec<V>, R, E>
where
    V: Clone + Eq + Hash + 'static,
{
    /// Memoizes `f` keyed by the full, ordered tuple of its bound arguments.
    pub fn new<F>(signature: Signature<V>, f: F) -> Self
    where
        F: Fn(&BoundArgs<V>) -> Result<R, E> + Send + 'static,
    {
        Self::with_key(signature, |args| Ok(args.values().to_vec()), f)
    }
}

impl<V, K, R, E> KeyedMemoizer<V, K, R, E> {
    /// Memoizes `f` keyed by `key`, evaluated per call against the bound arguments.
    ///
    /// `key` may look at any subset of the parameters; asking for an undeclared
    /// name fails on the first call that evaluates it.
    pub fn with_key<KF, F>(signature: Signature<V>, key: KF, f: F) -> Self
    where
        KF: Fn(&BoundArgs<V>) -> Result<K, MemoError> + Send + 'static,
        F: Fn(&BoundArgs<V>) -> Result<R, E> + Send + 'static,
    {
        Self {
            signature,
            key: Box::new(key),
            body: Box::new(f),
            cache: RefCell::new(HashMap::new()),
            scratch: Cell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        self.signature.name()
    }

    pub fn signature(&self) -> &Signature<V> {
        &self.signature
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }
}

impl<V, K, R, E> KeyedMemoizer<V, K, R, E>
where
    V: Clone,
    K: Eq + Hash,
    R: Clone,
    E: From<MemoError>,
{
    pub fn call(&self, args: CallArgs<V>) -> Result<R, E> {
        if args.has_keywords() || self.signature.has_defaults() {
            let bound = self.signature.bind(args)?;
            return self.lookup_or_compute(&bound);
        }

        // Single-threaded fast path. The scratch binding is taken out for the
        // duration of the call so recursive calls allocate their own.
        let mut bound = self
            .scratch
            .take()
            .unwrap_or_else(|| self.signature.empty_binding());
        self.signature
            .bind_positional_into(&mut bound, args.into_positional())?;
        let result = self.lookup_or_compute(&bound);
        self.scratch.set(Some(bound));
        result
    }

    /// Whether a result is cached for the key `args` derive to.
    pub fn contains_key(&self, args: CallArgs<V>) -> Result<bool, MemoError> {
        let bound = self.signature.bind(args)?;
        let key = (self.key)(&bound)?;
        Ok(self.cache.borrow().contains_key(&key))
    }

    fn lookup_or_compute(&self, bound: &BoundArgs<V>) -> Result<R, E> {
        let key = (self.key)(bound)?;
        if let Some(hit) = self.cache.borrow().get(&key) {
            tracing::trace!(target: "quill.memo", function = %self.name(), "memo hit");
            return Ok(hit.clone());
        }

        tracing::trace!(target: "quill.memo", function = %self.name(), "memo miss");
        let result = (self.body)(bound)?;

        // A recursive call may have stored this key while `body` ran; the first
        // stored result wins.
        let mut cache = self.cache.borrow_mut();
        Ok(cache.entry(key).or_insert(result).clone())
    }
}

impl<V, K, R, E> FunctionIdentity for KeyedMemoizer<V, K, R, E> {
    fn function_name(&self) -> &str {
        self.name()
    }
}

impl<V, K, R, E> fmt::Debug for KeyedMemoizer<V, K, R, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedMemoizer")
            .field("name", &self.name())
            .field("params", &self.signature.params())
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
