//! Per-run configuration.

/// Default bound on nested composite invocations: none.
///
/// Loop/next repetition nests one level per list item, so depth grows with
/// the input. Every open frame sits on a distinct (node, offset) pair, which
/// already bounds depth by the rule count times the input length; a caller
/// that wants a tighter ceiling sets one with
/// [`RunOptions::with_max_depth`].
pub const DEFAULT_MAX_DEPTH: usize = usize::MAX;

/// Largest scratch arena a run can address. Node ids and child edges are
/// stored as `u32`, and failed attempts count toward the total.
pub const MAX_NODES: usize = u32::MAX as usize;

/// Knobs for a single grammar run.
///
/// ```
/// use jsonparse_engine::RunOptions;
///
/// let opts = RunOptions::default().with_max_depth(128).allow_trailing_input(true);
/// assert_eq!(opts.max_depth, 128);
/// assert!(opts.memoize);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Maximum number of simultaneously open Sequencer/Splitter frames.
    pub max_depth: usize,
    /// Accept a root match that ends before the input does.
    pub allow_trailing_input: bool,
    /// Cache composite outcomes per input position.
    pub memoize: bool,
    /// Maximum number of nodes allocated during the run, discarded attempts
    /// included. Never above [`MAX_NODES`].
    pub max_nodes: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing_input: false,
            memoize: true,
            max_nodes: MAX_NODES,
        }
    }
}

impl RunOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn allow_trailing_input(mut self, allow: bool) -> Self {
        self.allow_trailing_input = allow;
        self
    }

    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Cap the scratch arena; values above [`MAX_NODES`] are clamped.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes.min(MAX_NODES);
        self
    }
}
