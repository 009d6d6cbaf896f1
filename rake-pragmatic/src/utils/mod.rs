use std::collections::HashSet;
use std::hash::Hash;

/// Combines error results into one, keeping the order of errors.
pub(crate) fn combine_error_results<T: Clone>(results: &[Result<(), T>]) -> Result<(), Vec<T>> {
    let errors = results.iter().cloned().flat_map(|result| result.err().into_iter()).collect::<Vec<T>>();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Returns duplicated values in order of their first repetition.
pub(crate) fn get_duplicates<'a, T: Eq + Hash + 'a>(items: impl Iterator<Item = &'a T>) -> Vec<&'a T> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    items.filter(|item| !seen.insert(*item) && reported.insert(*item)).collect()
}
