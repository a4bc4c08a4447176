use std::collections::HashMap;
use std::hash::Hash;

/// Concatenates slices into one vector, in order.
pub fn concat_slices<'a, T, I>(slices: I) -> Vec<T>
where
    T: Clone + 'a,
    I: IntoIterator<Item = &'a [T]>,
{
    slices.into_iter().flatten().cloned().collect()
}

/// Inverts a mapping of keys to value lists.
///
/// If `y` is in `map[x]`, then `x` is in `invert_map(map)[y]`. Keys appear in each
/// inverted list in the order the input yields them.
pub fn invert_map<K, V, I, L>(map: I) -> HashMap<V, Vec<K>>
where
    K: Clone,
    V: Eq + Hash,
    I: IntoIterator<Item = (K, L)>,
    L: IntoIterator<Item = V>,
{
    let mut inverted: HashMap<V, Vec<K>> = HashMap::new();
    for (key, values) in map {
        for value in values {
            inverted.entry(value).or_default().push(key.clone());
        }
    }
    inverted
}

pub fn slice_starts_with<T: PartialEq>(list: &[T], prefix: &[T]) -> bool {
    list.starts_with(prefix)
}

/// `list` without `prefix`, or `list` unchanged if it does not start with it.
pub fn strip_slice_prefix<'a, T: PartialEq>(list: &'a [T], prefix: &[T]) -> &'a [T] {
    list.strip_prefix(prefix).unwrap_or(list)
}
