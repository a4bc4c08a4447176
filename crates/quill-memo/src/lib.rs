//! Memoization and dynamic scoping primitives for Quill's analysis passes.
//!
//! - [`KeyedMemoizer`] caches a function of named parameters by a derived key
//!   (all arguments by default, or any subset chosen by a key extractor), with
//!   default values and keyword arguments merged before the key is computed.
//! - [`Memo`] does the same for functions of a statically typed argument.
//! - [`DynamicVar`] (declared with [`dynamic_var!`]) lets a call site bind an
//!   ambient per-thread value that nested code reads without it being passed.
//! - [`AnnotationRegistry`] attaches values to functions by name.
//!
//! None of these persist across process lifetimes or invalidate entries. The
//! memoizers are unlocked and `!Sync`; see [`KeyedMemoizer`] for the
//! single-threaded fast path they rely on.

mod annotate;
pub mod dynamic;
mod error;
mod keyed;
mod signature;
mod typed;

pub use annotate::{AnnotationRegistry, Annotator, FunctionIdentity};
pub use dynamic::{BindGuard, DynamicVar};
pub use error::MemoError;
pub use keyed::KeyedMemoizer;
pub use signature::{BoundArgs, CallArgs, Signature};
pub use typed::Memo;

pub type Result<T, E = MemoError> = std::result::Result<T, E>;
