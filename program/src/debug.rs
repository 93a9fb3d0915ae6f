//! Feature-gated program logging.

/// Logs through `solana_program_log` only when the `debug` feature is enabled; otherwise it
/// expands to nothing and costs no compute units.
///
/// ```ignore
/// debug!("state account initialized");
/// ```
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug")]
        solana_program_log::log!($($arg)*)
    };
}
