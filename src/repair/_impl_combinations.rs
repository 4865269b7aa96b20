/// All `k`-element subsets of `items`, in lexicographic order of their indices.
///
/// Returns a single empty subset for `k == 0` and nothing when `k > items.len()`.
pub(super) fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(k);
    extend_combinations(items, k, 0, &mut current, &mut result);
    result
}

/// **(internal)** Recursively extend `current` with elements starting at index `start`.
fn extend_combinations<T: Clone>(
    items: &[T],
    k: usize,
    start: usize,
    current: &mut Vec<T>,
    result: &mut Vec<Vec<T>>,
) {
    if current.len() == k {
        result.push(current.clone());
        return;
    }
    let missing = k - current.len();
    if items.len() < start + missing {
        return;
    }
    for i in start..=(items.len() - missing) {
        current.push(items[i].clone());
        extend_combinations(items, k, i + 1, current, result);
        current.pop();
    }
}
