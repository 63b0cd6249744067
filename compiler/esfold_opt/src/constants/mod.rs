//! Compile-time JavaScript values and their canonical tree forms.

mod number;
mod ops;
mod pool;
mod value;

pub use number::{number_to_string, string_to_number, to_int32, to_uint32};
pub use ops::{binary, unary};
pub use pool::ConstantPool;
pub use value::JsValue;
