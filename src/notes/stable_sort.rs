//! Index-tagged sorting.

/// Sort `items` by a derived key, keeping the original relative order of
/// items whose keys compare equal.
///
/// Each item is paired with its original position, the pairs are sorted with
/// an unstable sort on `(key, position)`, and the positions are dropped. The
/// position makes every sort key unique, so the result does not depend on the
/// stability of the underlying sort.
pub fn stable_sort_by_key<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: Ord,
    F: FnMut(&T) -> K,
{
    let mut tagged: Vec<(K, usize, T)> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| (key(&item), index, item))
        .collect();
    tagged.sort_unstable_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
    tagged.into_iter().map(|(_, _, item)| item).collect()
}
