//! Size-only rewrites, run after the semantic passes settle.

use esfold_ir::{NodeFlags, PathNode};

use super::FoldRule;
use crate::constants::JsValue;
use crate::{FoldCx, FoldError};

/// `true` → `!0`, `false` → `!1`.
#[derive(Copy, Clone, Debug, Default)]
pub struct BooleanLiterals;

impl FoldRule for BooleanLiterals {
    fn name(&self) -> &'static str {
        "boolean-literals"
    }

    fn fold(&self, cx: &mut FoldCx<'_>, path: &PathNode) -> Result<Option<PathNode>, FoldError> {
        let Some(id) = path.node() else {
            return Ok(None);
        };
        if cx.ast.flags(id).contains(NodeFlags::MINIFIED) {
            return Ok(None);
        }
        let Some(JsValue::Bool(value)) = cx.constant(id)? else {
            return Ok(None);
        };
        let minified = cx.pool.minified_bool(cx.ast, value);
        Ok(Some(cx.replace(path, minified)?))
    }
}
