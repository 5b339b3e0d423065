//! Recomputation order and circular dependency detection.
//!
//! When a cell changes, every cell that (transitively) depends on it has
//! to be re-evaluated, each one after all of its inputs. This module walks
//! the "direct dependents" relation depth-first from the changed cell and
//! emits nodes in reverse post-order, which puts the changed cell first and
//! every dependee before its dependents. Reaching the start node again
//! means the edit would create a cycle.
//!
//! The walk keeps its own stack instead of recursing, so long chains of
//! dependent cells cannot overflow the call stack.

use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use super::error::CircularDependency;

struct Frame<N> {
    node: N,
    pending: std::vec::IntoIter<N>,
}

/// Compute the order in which `start` and everything depending on it must
/// be re-evaluated.
///
/// `dependents_of` returns the direct dependents of a node; callers can
/// pass a view that differs from a stored graph to check an edit before
/// committing it.
pub fn recalc_order<N, F, I>(start: &N, mut dependents_of: F) -> Result<Vec<N>, CircularDependency<N>>
where
    N: Eq + Hash + Clone + fmt::Display + fmt::Debug,
    F: FnMut(&N) -> I,
    I: IntoIterator<Item = N>,
{
    let mut visited = HashSet::new();
    visited.insert(start.clone());

    let mut stack = vec![Frame {
        node: start.clone(),
        pending: dependents_of(start).into_iter().collect::<Vec<_>>().into_iter(),
    }];
    let mut finished = Vec::new();

    while let Some(frame) = stack.last_mut() {
        match frame.pending.next() {
            Some(next) if next == *start => {
                let mut path: Vec<N> = stack.iter().map(|f| f.node.clone()).collect();
                path.push(next);
                return Err(CircularDependency { path });
            }
            Some(next) => {
                if visited.insert(next.clone()) {
                    let pending = dependents_of(&next).into_iter().collect::<Vec<_>>().into_iter();
                    stack.push(Frame {
                        node: next,
                        pending,
                    });
                }
            }
            None => {
                if let Some(done) = stack.pop() {
                    finished.push(done.node);
                }
            }
        }
    }

    finished.reverse();
    Ok(finished)
}
