use std::fmt::Debug;

/// Supertrait that collects all the requirements on the NodeReference values
/// Must be copy, comparable and not references (hence 'static)
pub trait NodeReference: Copy + Eq + Debug + 'static {}

/// Anything the search driver can explore: a set of nodes connected by unit-cost steps.
///
/// The driver only ever reads from the space, it never asks it to change. Neighbors are
/// queried on demand, so implementations must not hand out cached lists that can go
/// stale when passability changes.
pub trait SearchSpace {
    /// The type that can be used to reference nodes in the space
    type Reference: NodeReference;

    /// The type that the space uses for per-node side tables
    type Storage<T: Default + Copy + 'static>: NodeStorage<T, Reference = Self::Reference>;

    /// Check if the provided node reference lies inside the space
    fn contains(&self, node: Self::Reference) -> bool;

    /// Check if the provided node can currently be entered
    fn is_passable(&self, node: Self::Reference) -> bool;

    /// Return an iterator over the passable neighbors of the provided node, always in the
    /// same order for the same node and passability
    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference>;

    /// Create a storage for values of type T, one default value per node
    fn create_storage<T: Default + Copy + 'static>(&self) -> Self::Storage<T>;
}

/// A side table holding one value per node of a [`SearchSpace`].
pub trait NodeStorage<T> {
    type Reference: NodeReference;

    fn is_valid(&self, node: Self::Reference) -> bool;
    fn get(&self, node: Self::Reference) -> T;
    fn get_mut(&mut self, node: Self::Reference) -> &mut T;
}
