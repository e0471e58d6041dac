//! Profiling scopes based on the `puffin` crate.
//!
//! With the `profiling` feature disabled the macros expand to nothing.

#[cfg(feature = "profiling")]
pub use puffin::{profile_function, profile_scope};

#[cfg(not(feature = "profiling"))]
#[macro_export]
#[doc(hidden)]
macro_rules! __profile_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "profiling"))]
pub use crate::__profile_noop as profile_function;
#[cfg(not(feature = "profiling"))]
pub use crate::__profile_noop as profile_scope;

/// Turn puffin scope collection on or off.
#[cfg(feature = "profiling")]
pub fn set_enabled(enabled: bool) {
    puffin::set_scopes_on(enabled);
}

/// Turn puffin scope collection on or off.
#[cfg(not(feature = "profiling"))]
pub fn set_enabled(_enabled: bool) {}

/// Mark the start of a new profiling frame.
///
/// Call once per rendered frame, after the frame's draw calls.
#[inline]
pub fn new_frame() {
    #[cfg(feature = "profiling")]
    puffin::GlobalProfiler::lock().new_frame();
}
