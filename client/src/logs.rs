//! Colored key/value logging for transaction submission and confirmation.

use colored::{
    Color,
    Colorize,
};
use solana_sdk::signature::Signature;

use crate::error::TransactionClientError;

/// Format a key/value pair with optional color overrides.
///
/// Requires the `colored::Colorize` trait to be in scope.
///
/// Examples, where `key_color` and `value_color` are `LogColor` values:
/// - fmt_kv!(key, value)
/// - fmt_kv!(key, value, key_color)
/// - fmt_kv!(key, value, key_color, value_color)
#[macro_export]
macro_rules! fmt_kv {
    ($key:expr, $value:expr $(,)?) => {
        $crate::fmt_kv!(
            $key,
            $value,
            $crate::LogColor::Highlight,
            $crate::LogColor::FadedGray
        )
    };
    ($key:expr, $value:expr, $key_color:expr $(,)?) => {
        $crate::fmt_kv!($key, $value, $key_color, $crate::LogColor::FadedGray)
    };
    ($key:expr, $value:expr, $key_color:expr, $value_color:expr $(,)?) => {{
        let __k = ::std::string::ToString::to_string(&$key);
        let __v = ::std::string::ToString::to_string(&$value);
        ::std::format!("{}: {}", __k.color($key_color), __v.color($value_color))
    }};
}

/// Prints a key/value pair with optional color overrides. See [`fmt_kv!`].
#[macro_export]
macro_rules! print_kv {
    ($key:expr, $value:expr $(,)?) => {
        ::std::println!("{}", $crate::fmt_kv!($key, $value))
    };
    ($key:expr, $value:expr, $key_color:expr $(,)?) => {
        ::std::println!("{}", $crate::fmt_kv!($key, $value, $key_color))
    };
    ($key:expr, $value:expr, $key_color:expr, $value_color:expr $(,)?) => {
        ::std::println!(
            "{}",
            $crate::fmt_kv!($key, $value, $key_color, $value_color)
        )
    };
}

#[derive(Clone, Copy, Debug)]
pub enum LogColor {
    Highlight,
    Error,
    Warning,
    Header,
    Info,
    FadedGray,
}

#[rustfmt::skip]
impl From<LogColor> for Color {
    fn from(value: LogColor) -> Color {
        match value {
            LogColor::Highlight  => Color::TrueColor { r: 255, g: 215, b: 87  },
            LogColor::Error      => Color::TrueColor { r: 255, g: 0,   b: 45  },
            LogColor::Warning    => Color::TrueColor { r: 180, g: 105, b: 0   },
            LogColor::Header     => Color::TrueColor { r: 0,   g: 255, b: 0   },
            LogColor::Info       => Color::TrueColor { r: 0,   g: 95,  b: 255 },
            LogColor::FadedGray  => Color::TrueColor { r: 95,  g: 95,  b: 95  },
        }
    }
}

pub fn log_divider() {
    println!("{}", "-".repeat(80).color(LogColor::FadedGray));
}

pub fn log_send_attempt(signature: &Signature, attempt: u32, max_attempts: u32) {
    print_kv!(
        "Sending",
        format!("{signature} (attempt {attempt}/{max_attempts})"),
        LogColor::Info
    );
}

pub fn log_retry(error: &TransactionClientError, backoff_ms: u128) {
    print_kv!(
        "Retrying",
        format!("{error}; backing off {backoff_ms}ms"),
        LogColor::Warning
    );
}

pub fn log_confirmed(signature: &Signature, polls: u32) {
    print_kv!(
        "Confirmed",
        format!("{signature} after {polls} status polls"),
        LogColor::Header
    );
}

pub fn log_failure(error: &TransactionClientError) {
    print_kv!("Failed", error, LogColor::Error, LogColor::Error);
}
