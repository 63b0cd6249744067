//! Post-order traversal with per-slot retry.

use esfold_ir::{Key, PathNode, Value};
use esfold_stack::ensure_sufficient_stack;

use crate::{Command, Next, WalkContext, Walker};

/// Visits every list index in order and every child field in name order,
/// then yields the path itself.
///
/// A [`Command::Retry`] answer for a child re-reads that slot from the live
/// tree and walks it again until it answers anything else. List lengths are
/// re-read after each slot, so items spliced in or out by a retrying stage
/// are honored. Empty slots yield nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct DepthFirst;

impl<C: WalkContext> Walker<C> for DepthFirst {
    fn inputs(
        &self,
        cx: &mut C,
        path: PathNode,
        next: &mut Next<'_, C>,
    ) -> Result<Command, C::Error> {
        descend(cx, path, next)
    }
}

fn descend<C: WalkContext>(
    cx: &mut C,
    path: PathNode,
    next: &mut Next<'_, C>,
) -> Result<Command, C::Error> {
    ensure_sufficient_stack(|| {
        match path.value() {
            Value::Null => return Ok(Command::Continue),
            Value::List { .. } => {
                let mut index = 0;
                while index < cx.ast().list_len(path.value()).unwrap_or(0) {
                    settle(cx, &path, Key::Index(index), next)?;
                    index += 1;
                }
            }
            Value::Node(id) => {
                for &field in cx.ast().node(id).child_fields() {
                    settle(cx, &path, Key::Field(field), next)?;
                }
            }
        }
        next(cx, path)
    })
}

/// Walk `parent[key]` until it stops asking for a retry.
fn settle<C: WalkContext>(
    cx: &mut C,
    parent: &PathNode,
    key: Key,
    next: &mut Next<'_, C>,
) -> Result<(), C::Error> {
    loop {
        let child = parent.child(cx.ast(), key);
        if !descend(cx, child, next)?.is_retry() {
            return Ok(());
        }
        tracing::trace!(?parent, %key, "retrying slot");
    }
}
