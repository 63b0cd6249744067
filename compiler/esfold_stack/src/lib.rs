//! Stack growth for deep tree recursion.
//!
//! ESTree input from real minified bundles nests deeply: a long `a + b + c`
//! chain is a left-leaning binary tree thousands of levels tall, and every
//! walk stage adds frames per level. Recursive walkers and the ESTree JSON
//! importer wrap their recursive step in [`ensure_sufficient_stack`].
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: plain call.

/// Grow when less than this remains (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment (2MB).
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if fewer than [`RED_ZONE`] bytes remain.
///
/// ```text
/// fn walk(cx: &mut Cx, path: PathNode) -> Result<Command, Error> {
///     ensure_sufficient_stack(|| {
///         for child in children(cx, &path) {
///             walk(cx, child)?;
///         }
///         visit(cx, path)
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
