use std::sync::Arc;

use crate::error::MemoError;

/// Declared shape of a memoized function: its name, ordered parameter names and
/// the default values of its trailing parameters.
///
/// Defaults are captured once, when the signature is built, and merged into every
/// call before the cache key is derived.
#[derive(Debug, Clone)]
pub struct Signature<V> {
    name: String,
    params: Arc<[String]>,
    defaults: Vec<V>,
}

impl<V> Signature<V> {
    pub fn new<I, S>(name: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            defaults: Vec::new(),
        }
    }

    /// Declares default values for the last `defaults.len()` parameters.
    ///
    /// # Panics
    ///
    /// Panics if more defaults are given than there are parameters.
    pub fn with_defaults(mut self, defaults: impl IntoIterator<Item = V>) -> Self {
        self.defaults = defaults.into_iter().collect();
        assert!(
            self.defaults.len() <= self.params.len(),
            "{}() declares {} defaults for {} parameters",
            self.name,
            self.defaults.len(),
            self.params.len()
        );
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn has_defaults(&self) -> bool {
        !self.defaults.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|param| param == name)
    }

    fn first_default(&self) -> usize {
        self.params.len() - self.defaults.len()
    }

    pub(crate) fn empty_binding(&self) -> BoundArgs<V> {
        BoundArgs {
            params: Arc::clone(&self.params),
            values: Vec::with_capacity(self.params.len()),
        }
    }

    fn too_many(&self, given: usize) -> MemoError {
        MemoError::TooManyArguments {
            function: self.name.clone(),
            expected: self.params.len(),
            given,
        }
    }

    fn missing(&self, index: usize) -> MemoError {
        MemoError::MissingArgument {
            function: self.name.clone(),
            name: self.params[index].clone(),
        }
    }

    /// Refills `bound` from positional arguments only, reusing its allocation.
    ///
    /// Only valid for signatures without defaults, where every parameter must be
    /// supplied positionally.
    pub(crate) fn bind_positional_into(
        &self,
        bound: &mut BoundArgs<V>,
        positional: Vec<V>,
    ) -> Result<(), MemoError> {
        debug_assert!(!self.has_defaults());
        let given = positional.len();
        if given > self.params.len() {
            return Err(self.too_many(given));
        }
        if given < self.params.len() {
            return Err(self.missing(given));
        }
        bound.values.clear();
        bound.values.extend(positional);
        Ok(())
    }
}

impl<V: Clone> Signature<V> {
    /// Binds a call to this signature: positional arguments first, then keywords,
    /// then defaults for anything left unset.
    pub fn bind(&self, args: CallArgs<V>) -> Result<BoundArgs<V>, MemoError> {
        let CallArgs {
            positional,
            keywords,
        } = args;

        let arity = self.params.len();
        if positional.len() > arity {
            return Err(self.too_many(positional.len()));
        }

        let mut slots: Vec<Option<V>> = positional.into_iter().map(Some).collect();
        slots.resize_with(arity, || None);

        for (name, value) in keywords {
            let Some(index) = self.position(&name) else {
                return Err(MemoError::UnexpectedKeyword {
                    function: self.name.clone(),
                    name,
                });
            };
            if slots[index].is_some() {
                return Err(MemoError::DuplicateArgument {
                    function: self.name.clone(),
                    name,
                });
            }
            slots[index] = Some(value);
        }

        let first_default = self.first_default();
        let values = slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| match slot {
                Some(value) => Ok(value),
                None if index >= first_default => Ok(self.defaults[index - first_default].clone()),
                None => Err(self.missing(index)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BoundArgs {
            params: Arc::clone(&self.params),
            values,
        })
    }
}

/// Arguments of a single call, as the caller wrote them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArgs<V> {
    positional: Vec<V>,
    keywords: Vec<(String, V)>,
}

impl<V> Default for CallArgs<V> {
    fn default() -> Self {
        Self {
            positional: Vec::new(),
            keywords: Vec::new(),
        }
    }
}

impl<V> CallArgs<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional(values: impl IntoIterator<Item = V>) -> Self {
        Self {
            positional: values.into_iter().collect(),
            keywords: Vec::new(),
        }
    }

    pub fn arg(mut self, value: V) -> Self {
        self.positional.push(value);
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: V) -> Self {
        self.keywords.push((name.into(), value));
        self
    }

    pub fn has_keywords(&self) -> bool {
        !self.keywords.is_empty()
    }

    pub(crate) fn into_positional(self) -> Vec<V> {
        debug_assert!(self.keywords.is_empty());
        self.positional
    }
}

impl<V> From<Vec<V>> for CallArgs<V> {
    fn from(positional: Vec<V>) -> Self {
        Self::positional(positional)
    }
}

/// Arguments of a call after defaults and keywords have been merged, in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundArgs<V> {
    params: Arc<[String]>,
    values: Vec<V>,
}

impl<V> BoundArgs<V> {
    /// Looks up the argument bound to `name`.
    pub fn get(&self, name: &str) -> Result<&V, MemoError> {
        self.params
            .iter()
            .position(|param| param == name)
            .and_then(|index| self.values.get(index))
            .ok_or_else(|| MemoError::UnknownParameter {
                name: name.to_owned(),
            })
    }

    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.params
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
