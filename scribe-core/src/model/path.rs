//! Index paths addressing nodes from the document root

use std::cmp::Ordering;

/// Child indices from the root to a node
pub type Path = Vec<usize>;

/// Compare two paths in document order.
///
/// An ancestor compares equal to its descendants: only the shared prefix
/// length is considered, so a container "contains" every position under it.
pub fn compare(a: &[usize], b: &[usize]) -> Ordering {
    for (x, y) in a.iter().zip(b.iter()) {
        match x.cmp(y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// `a` is a strict ancestor of `b`
pub fn is_ancestor(a: &[usize], b: &[usize]) -> bool {
    a.len() < b.len() && b.starts_with(a)
}

pub fn parent(path: &[usize]) -> &[usize] {
    match path.split_last() {
        Some((_, parent)) => parent,
        None => path,
    }
}

/// Longest shared prefix
pub fn common(a: &[usize], b: &[usize]) -> Path {
    a.iter()
        .zip(b.iter())
        .take_while(|(x, y)| x == y)
        .map(|(x, _)| *x)
        .collect()
}

pub fn child(path: &[usize], index: usize) -> Path {
    let mut out = path.to_vec();
    out.push(index);
    out
}
