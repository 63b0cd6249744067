//! Level-order traversal with cancellable descent.

use std::collections::VecDeque;

use esfold_ir::{Key, PathNode, Value};

use crate::{Command, Next, WalkContext, Walker};

/// Yields every path before any of its descendants, one tree level at a
/// time.
///
/// Answering an item with [`Command::Skip`] keeps its children out of the
/// queue. [`Command::Retry`] re-reads the slot and yields it again. Lists
/// are yielded like any other value and their items are queued after them.
///
/// Queued paths are snapshots: a stage that splices a list should answer
/// `Retry` for the list's owner so its children are queued afresh.
#[derive(Copy, Clone, Debug, Default)]
pub struct BreadthFirst;

impl<C: WalkContext> Walker<C> for BreadthFirst {
    fn inputs(
        &self,
        cx: &mut C,
        path: PathNode,
        next: &mut Next<'_, C>,
    ) -> Result<Command, C::Error> {
        let mut queue = VecDeque::from([path]);
        while let Some(mut current) = queue.pop_front() {
            loop {
                if current.value().is_null() {
                    break;
                }
                match next(cx, current.clone())? {
                    Command::Continue => {
                        enqueue_children(cx, &current, &mut queue);
                        break;
                    }
                    Command::Skip => {
                        tracing::trace!(path = ?current, "skipping subtree");
                        break;
                    }
                    Command::Retry(_) => current = current.refresh(cx.ast()),
                }
            }
        }
        Ok(Command::Continue)
    }
}

fn enqueue_children<C: WalkContext>(cx: &C, path: &PathNode, queue: &mut VecDeque<PathNode>) {
    let ast = cx.ast();
    match path.value() {
        Value::Null => {}
        Value::List { .. } => {
            let len = ast.list_len(path.value()).unwrap_or(0);
            queue.extend((0..len).map(|index| path.child(ast, Key::Index(index))));
        }
        Value::Node(id) => {
            queue.extend(
                ast.node(id)
                    .child_fields()
                    .iter()
                    .map(|&field| path.child(ast, Key::Field(field))),
            );
        }
    }
}
