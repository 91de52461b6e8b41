/// Identifier for an entity in a [`crate::store::EntityStore`].
///
/// This is an index into the store's entity vector, and is only
/// meaningful until the next insertion or removal. The
/// [`crate::partition::CategoryPartition`] is rebuilt every tick, so it
/// never holds an id across such a mutation.
pub type EntityId = usize;
