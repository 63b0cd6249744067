//! Composable tree walkers.
//!
//! A walk is a pipeline of [`Walker`] stages. Each stage sees a stream of
//! [`PathNode`]s on the way in (`inputs`) and a stream of items on the way
//! out (`outputs`), and answers every item it passes on with a [`Command`].
//!
//! # Continuation-passing
//!
//! Stages are written in continuation-passing style. "Yielding" an item is
//! a call to the `next` continuation; the [`Command`] it returns is the
//! feedback for that item. The value a stage method returns is its final
//! result for the item it was handed, which becomes the feedback one layer
//! further out.
//!
//! ```text
//! Pipe [A, B, C]
//!
//!   inputs:   A.inputs ─▶ B.inputs ─▶ C.inputs ─▶ outputs
//!   outputs:  C.outputs ─▶ B.outputs ─▶ A.outputs ─▶ consumer
//!   feedback: returned back along the same chain
//! ```
//!
//! # Retry
//!
//! A stage that edits the tree at the slot it was handed returns
//! [`Command::Retry`] instead of calling `next`. The default walkers
//! re-derive that slot from its parent and walk it again, so every slot
//! reaches a local fixed point before the walk moves to its sibling.
//!
//! # Errors
//!
//! `Err` from any stage aborts the whole walk and is returned unchanged.

mod breadth_first;
mod depth_first;
mod pipe;

pub use breadth_first::BreadthFirst;
pub use depth_first::DepthFirst;
pub use pipe::{NodesOnly, Pipe};

use esfold_ir::{Ast, PathNode};

/// Feedback for one produced item.
#[derive(Clone, Debug, Default)]
pub enum Command {
    /// Carry on.
    #[default]
    Continue,
    /// The slot was edited; walk it again. Carries the slot's new path.
    Retry(PathNode),
    /// Do not descend into the item's children. Only breadth-first
    /// traversal honors this; depth-first has already visited them.
    Skip,
}

impl Command {
    #[inline]
    pub fn is_retry(&self) -> bool {
        matches!(self, Command::Retry(_))
    }
}

/// Mutable state threaded through a walk.
pub trait WalkContext {
    /// Fatal error that aborts a walk.
    type Error;

    fn ast(&self) -> &Ast;
}

/// Continuation a stage calls to pass an item on.
pub type Next<'n, C> =
    dyn FnMut(&mut C, PathNode) -> Result<Command, <C as WalkContext>::Error> + 'n;

/// One stage of a walk.
///
/// Both methods default to passing their item straight on, so a stage
/// overrides only the direction it cares about.
pub trait Walker<C: WalkContext> {
    /// Produce items from `path`, calling `next` once per item.
    fn inputs(
        &self,
        cx: &mut C,
        path: PathNode,
        next: &mut Next<'_, C>,
    ) -> Result<Command, C::Error> {
        next(cx, path)
    }

    /// Post-process an item flowing back out.
    fn outputs(
        &self,
        cx: &mut C,
        item: PathNode,
        next: &mut Next<'_, C>,
    ) -> Result<Command, C::Error> {
        next(cx, item)
    }

    /// Drive the walk from `root`, handing every output to `consumer`.
    /// The consumer's answer is fed back to the stage that produced it.
    fn walk_with(
        &self,
        cx: &mut C,
        root: PathNode,
        consumer: &mut Next<'_, C>,
    ) -> Result<Command, C::Error> {
        tracing::trace!(?root, "walk");
        self.inputs(cx, root, &mut |cx, item| {
            self.outputs(cx, item, &mut *consumer)
        })
    }

    /// Drive the walk to completion, discarding outputs.
    fn walk(&self, cx: &mut C, root: PathNode) -> Result<Command, C::Error> {
        self.walk_with(cx, root, &mut |_, _| Ok(Command::Continue))
    }
}
