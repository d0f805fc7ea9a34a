//! Assertion macros for internal invariants of the engine.
//!
//! The level is raised under `cfg(test)` and the `debug-checks` feature so that the more
//! expensive consistency checks only run when explicitly requested.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const WSP_ASSERT_LEVEL_DEFINITION: u8 = WSP_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const WSP_ASSERT_LEVEL_DEFINITION: u8 = WSP_ASSERT_MODERATE;

pub const WSP_ASSERT_SIMPLE: u8 = 1;
pub const WSP_ASSERT_MODERATE: u8 = 2;

#[macro_export]
#[doc(hidden)]
macro_rules! wsp_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::WSP_ASSERT_LEVEL_DEFINITION >= $crate::asserts::WSP_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! wsp_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::WSP_ASSERT_LEVEL_DEFINITION >= $crate::asserts::WSP_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! wsp_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::WSP_ASSERT_LEVEL_DEFINITION >= $crate::asserts::WSP_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}
