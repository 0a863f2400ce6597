//! Observer hook for mesh mutations.

use glam::Vec3;

/// Side observer notified after each mutating batch.
///
/// Implementations typically drive visual feedback (vertex coloring, debug
/// overlays); the core never depends on what they do. Within one batch every
/// [`CarveFeedback::vertex_moved`] call precedes the single
/// [`CarveFeedback::commit`].
pub trait CarveFeedback {
    /// A vertex was moved to a new world-space position.
    fn vertex_moved(&mut self, _index: usize, _world_position: Vec3) {}

    /// The batch is complete; moved vertices will not change again until
    /// the next batch.
    fn commit(&mut self) {}

    /// The mesh was restored wholesale; any cached per-vertex state is
    /// stale.
    fn reinitialize(&mut self) {}
}
