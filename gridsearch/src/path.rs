/// Walks predecessors backwards from `target` until a node without one is reached (the
/// start) and returns the nodes in start-to-target order, both included.
///
/// The predecessor relation must be acyclic, which holds for anything produced by a
/// [`ScoreLedger`](crate::ScoreLedger).
pub fn reconstruct<R: Copy>(predecessor: impl Fn(R) -> Option<R>, target: R) -> Vec<R> {
    let mut path = vec![target];
    let mut current = target;

    while let Some(from) = predecessor(current) {
        path.push(from);
        current = from;
    }

    path.reverse();
    path
}
