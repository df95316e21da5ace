//! Leveled logging macros.
//!
//! The `*f!` forms take a format string like [`format!`]; the `*ln!` forms
//! take any number of [`Display`](std::fmt::Display) values and join them
//! with single spaces. All of them record the call site of the expansion.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_fmt {
    ($level:expr, $($arg:tt)+) => {
        $crate::log_fmt($level, &$crate::call_site!(), ::std::format_args!($($arg)+))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __log_values {
    ($level:expr $(, $value:expr)*) => {
        $crate::log_values(
            $level,
            &$crate::call_site!(),
            &[$(&$value as &dyn ::std::fmt::Display),*],
        )
    };
}

#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => { $crate::__log_fmt!($crate::Level::Debug, $($arg)+) };
}

#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => { $crate::__log_fmt!($crate::Level::Info, $($arg)+) };
}

#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => { $crate::__log_fmt!($crate::Level::Warn, $($arg)+) };
}

#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => { $crate::__log_fmt!($crate::Level::Error, $($arg)+) };
}

/// Logs at fatal level, then exits the process with status 1.
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::fatal_fmt(&$crate::call_site!(), ::std::format_args!($($arg)+))
    };
}

#[macro_export]
macro_rules! debugln {
    ($($value:expr),* $(,)?) => { $crate::__log_values!($crate::Level::Debug $(, $value)*) };
}

#[macro_export]
macro_rules! infoln {
    ($($value:expr),* $(,)?) => { $crate::__log_values!($crate::Level::Info $(, $value)*) };
}

#[macro_export]
macro_rules! warnln {
    ($($value:expr),* $(,)?) => { $crate::__log_values!($crate::Level::Warn $(, $value)*) };
}

#[macro_export]
macro_rules! errorln {
    ($($value:expr),* $(,)?) => { $crate::__log_values!($crate::Level::Error $(, $value)*) };
}

/// Logs values at fatal level, then exits the process with status 1.
#[macro_export]
macro_rules! fatalln {
    ($($value:expr),* $(,)?) => {
        $crate::fatal_values(
            &$crate::call_site!(),
            &[$(&$value as &dyn ::std::fmt::Display),*],
        )
    };
}
