//! esfold optimizer - constant folding and dead-code elimination
//!
//! Rewrites an [`esfold_ir::Ast`] in place by running folding rules over
//! it until a fixed point:
//! - [`constants`]: JavaScript values, operators and the canonical
//!   [`ConstantPool`]
//! - [`rules`]: the individual rewrites, each a [`rules::FoldRule`]
//! - [`Optimizer`]: the round-based driver and its [`FoldOptions`]
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//!
//! let program = json!({
//!     "type": "Program",
//!     "body": [{
//!         "type": "ExpressionStatement",
//!         "expression": {
//!             "type": "BinaryExpression",
//!             "operator": "+",
//!             "left": { "type": "Literal", "value": 1 },
//!             "right": { "type": "Literal", "value": 2 },
//!         },
//!     }],
//! });
//! let mut ast = esfold_ir::estree::from_json(&program).unwrap();
//! esfold_opt::fold(&mut ast).unwrap();
//! assert_eq!(esfold_ir::source::render(&ast), "3;");
//! ```

pub mod constants;
mod context;
mod error;
mod pipeline;
pub mod rules;

pub use constants::{ConstantPool, JsValue};
pub use context::FoldCx;
pub use error::FoldError;
pub use pipeline::{
    expression_pass, fold, minify_pass, statement_pass, FoldOptions, FoldStats, Optimizer,
};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=esfold_opt=debug` to see every rule firing, or
/// `RUST_LOG=esfold_walk=trace` for the walk itself.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}
