//! Stage composition.

use esfold_ir::PathNode;

use crate::{Command, Next, WalkContext, Walker};

/// An ordered pipeline of stages, itself a [`Walker`].
///
/// `inputs` runs first stage outermost: the first stage sees the item
/// handed to the pipe and every item it produces is fed to the second
/// stage, and so on. `outputs` mirrors this: the last stage sees an item
/// first and the first stage hands it on last.
pub struct Pipe<C: WalkContext> {
    stages: Vec<Box<dyn Walker<C>>>,
}

impl<C: WalkContext> Pipe<C> {
    pub fn new() -> Self {
        Pipe { stages: Vec::new() }
    }

    /// Append a stage (innermost for `inputs`).
    #[must_use]
    pub fn then(mut self, stage: impl Walker<C> + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    fn run_inputs(
        &self,
        index: usize,
        cx: &mut C,
        path: PathNode,
        next: &mut Next<'_, C>,
    ) -> Result<Command, C::Error> {
        match self.stages.get(index) {
            Some(stage) => stage.inputs(cx, path, &mut |cx, item| {
                self.run_inputs(index + 1, cx, item, &mut *next)
            }),
            None => next(cx, path),
        }
    }

    /// `remaining` counts the stages, from the last, still to run.
    fn run_outputs(
        &self,
        remaining: usize,
        cx: &mut C,
        item: PathNode,
        next: &mut Next<'_, C>,
    ) -> Result<Command, C::Error> {
        match remaining.checked_sub(1) {
            Some(index) => self.stages[index].outputs(cx, item, &mut |cx, item| {
                self.run_outputs(index, cx, item, &mut *next)
            }),
            None => next(cx, item),
        }
    }
}

impl<C: WalkContext> Default for Pipe<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: WalkContext> Walker<C> for Pipe<C> {
    fn inputs(
        &self,
        cx: &mut C,
        path: PathNode,
        next: &mut Next<'_, C>,
    ) -> Result<Command, C::Error> {
        self.run_inputs(0, cx, path, next)
    }

    fn outputs(
        &self,
        cx: &mut C,
        item: PathNode,
        next: &mut Next<'_, C>,
    ) -> Result<Command, C::Error> {
        self.run_outputs(self.stages.len(), cx, item, next)
    }
}

/// Drops list paths and empty slots; later stages only see node paths.
///
/// A dropped path answers [`Command::Continue`], so walkers still descend
/// into list items.
#[derive(Copy, Clone, Debug, Default)]
pub struct NodesOnly;

impl<C: WalkContext> Walker<C> for NodesOnly {
    fn inputs(
        &self,
        cx: &mut C,
        path: PathNode,
        next: &mut Next<'_, C>,
    ) -> Result<Command, C::Error> {
        if path.node().is_none() {
            return Ok(Command::Continue);
        }
        next(cx, path)
    }
}
