//! Helpers for reporting broken invariants
//!
//! A broken invariant means an earlier bug already corrupted the game, so these always panic,
//! in release builds too, instead of trying to recover.

/// Assert that the given invariant holds.
///
/// Unlike [`debug_assert`], this is checked in every build.
#[macro_export]
macro_rules! invariant {
    ($cond:expr, $( $tt:tt )+ ) => {
        if !$cond {
            ::core::panic!(
                "invariant violated: {}",
                ::core::format_args!($( $tt )+)
            )
        }
    };
}

/// A type which can produce a value that an invariant guarantees exists
pub trait InvariantExpect {
    /// The type which we expect to produce
    type Target;

    /// Produce the [`Self::Target`] value, or panic reporting the broken invariant.
    fn expect_invariant(self, msg: &str) -> Self::Target;
}

impl<T> InvariantExpect for Option<T> {
    type Target = T;

    #[inline(always)]
    #[track_caller]
    fn expect_invariant(self, msg: &str) -> Self::Target {
        match self {
            Some(value) => value,
            None => panic!("invariant violated: {msg}"),
        }
    }
}

impl<T, E: core::fmt::Debug> InvariantExpect for Result<T, E> {
    type Target = T;

    #[inline(always)]
    #[track_caller]
    fn expect_invariant(self, msg: &str) -> Self::Target {
        match self {
            Ok(value) => value,
            Err(e) => panic!("invariant violated: {msg}: {e:?}"),
        }
    }
}
