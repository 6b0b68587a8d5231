/// Reconciler behaviour knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// When true, `finish` also removes the render root's children after the
    /// last one reconciled in the pass. Off by default: the root's trailing
    /// children are left to the host, since the root scope is never closed.
    pub prune_root_on_finish: bool,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            prune_root_on_finish: false,
        }
    }
}
