//! Dynamically scoped, per-thread variables.
//!
//! A [`DynamicVar`] holds one stack of bindings per thread. [`DynamicVar::bind`]
//! pushes a value for as long as the returned [`BindGuard`] lives, and
//! [`DynamicVar::get`] reads the innermost active binding (or the sentinel value
//! the variable was declared with). Variables are declared as statics with
//! [`dynamic_var!`](crate::dynamic_var):
//!
//! ```
//! quill_memo::dynamic_var! {
//!     /// Module currently being analyzed, if any.
//!     static CURRENT_MODULE: Option<&'static str> = None;
//! }
//!
//! assert_eq!(CURRENT_MODULE.get(), None);
//! CURRENT_MODULE.scope(Some("pkg.mod"), || {
//!     assert_eq!(CURRENT_MODULE.get(), Some("pkg.mod"));
//! });
//! assert_eq!(CURRENT_MODULE.get(), None);
//! ```

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::thread::LocalKey;

/// Per-thread storage behind a [`DynamicVar`]. The sentinel is kept outside the
/// stack so it can never be popped.
#[doc(hidden)]
pub struct Bindings<T> {
    sentinel: T,
    stack: Vec<T>,
}

impl<T> Bindings<T> {
    #[doc(hidden)]
    pub fn new(sentinel: T) -> Self {
        Self {
            sentinel,
            stack: Vec::new(),
        }
    }
}

type Storage<T> = LocalKey<RefCell<Bindings<T>>>;

/// A dynamically scoped variable with an independent binding stack per thread.
pub struct DynamicVar<T: 'static> {
    bindings: &'static Storage<T>,
}

impl<T: 'static> DynamicVar<T> {
    #[doc(hidden)]
    pub const fn from_local(bindings: &'static Storage<T>) -> Self {
        Self { bindings }
    }

    /// Binds `value` on the calling thread until the returned guard is dropped.
    ///
    /// Dropping the guard restores the stack to exactly the depth it had before
    /// this call, whether the scope exits normally, through `?`, or by unwinding.
    #[must_use = "the binding is removed as soon as the guard is dropped"]
    pub fn bind(&self, value: T) -> BindGuard<T> {
        let depth = self.bindings.with(|cell| {
            let mut bindings = cell.borrow_mut();
            let depth = bindings.stack.len();
            bindings.stack.push(value);
            depth
        });
        BindGuard {
            bindings: self.bindings,
            depth,
            _not_send: PhantomData,
        }
    }

    /// Runs `body` with `value` bound and returns its result.
    pub fn scope<R>(&self, value: T, body: impl FnOnce() -> R) -> R {
        let _guard = self.bind(value);
        body()
    }

    /// Number of active bindings on the calling thread.
    pub fn depth(&self) -> usize {
        self.bindings.with(|cell| cell.borrow().stack.len())
    }

    pub fn is_bound(&self) -> bool {
        self.depth() > 0
    }
}

impl<T: Clone + 'static> DynamicVar<T> {
    /// Innermost binding on the calling thread, or the sentinel when unbound.
    pub fn get(&self) -> T {
        self.bindings.with(|cell| {
            let bindings = cell.borrow();
            bindings
                .stack
                .last()
                .unwrap_or(&bindings.sentinel)
                .clone()
        })
    }
}

impl<T: 'static> fmt::Debug for DynamicVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicVar")
            .field("depth", &self.depth())
            .finish()
    }
}

/// Scope of a [`DynamicVar::bind`] call. Must be dropped on the thread that
/// created it.
pub struct BindGuard<T: 'static> {
    bindings: &'static Storage<T>,
    depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl<T: 'static> Drop for BindGuard<T> {
    fn drop(&mut self) {
        // `try_with` so a guard dropped during thread-local teardown is a no-op.
        let _ = self.bindings.try_with(|cell| {
            cell.borrow_mut().stack.truncate(self.depth);
        });
    }
}

impl<T: 'static> fmt::Debug for BindGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindGuard")
            .field("depth", &self.depth)
            .finish()
    }
}

/// Declares one or more [`DynamicVar`] statics.
///
/// The expression after `=` is the sentinel observed by `get()` on any thread
/// with no active binding. It is evaluated lazily, once per thread.
#[macro_export]
macro_rules! dynamic_var {
    ($($(#[$attr:meta])* $vis:vis static $name:ident : $ty:ty = $sentinel:expr;)+) => {
        $(
            $(#[$attr])*
            $vis static $name: $crate::DynamicVar<$ty> = {
                ::std::thread_local! {
                    static BINDINGS: ::std::cell::RefCell<$crate::dynamic::Bindings<$ty>> =
                        ::std::cell::RefCell::new($crate::dynamic::Bindings::new($sentinel));
                }
                $crate::DynamicVar::from_local(&BINDINGS)
            };
        )+
    };
}
