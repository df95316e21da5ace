//! Call-site capture for log lines.
//!
//! Every log macro expands [`call_site!`](crate::call_site) in the caller's
//! own body, so the recorded function, file and line always belong to the
//! application code rather than to a logging helper. Code that cannot use the
//! macros may build a [`CallSite`] by hand or fall back to
//! [`CallSite::caller`].

use std::path::Path;

const UNKNOWN: &str = "???";

/// Where a log call was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    function: &'static str,
    file: &'static str,
    line: u32,
}

impl CallSite {
    /// Build a call site from explicit components.
    pub const fn new(function: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            function,
            file,
            line,
        }
    }

    /// The placeholder used when nothing is known about the caller.
    pub const fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN, 0)
    }

    /// Resolve file and line of the caller at runtime.
    ///
    /// The enclosing function cannot be recovered this way and is reported as
    /// `???`.
    #[track_caller]
    pub fn caller() -> Self {
        let location = std::panic::Location::caller();
        Self::new(UNKNOWN, location.file(), location.line())
    }

    /// Full path of the calling function.
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// Source file as reported by the compiler.
    pub fn file(&self) -> &'static str {
        self.file
    }

    /// Source line, `0` when unknown.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Last segment of the function path, skipping closure frames.
    pub fn base_function(&self) -> &'static str {
        self.function
            .rsplit("::")
            .find(|segment| !segment.is_empty() && *segment != "{{closure}}")
            .unwrap_or(UNKNOWN)
    }

    /// File name component of the source path.
    pub fn base_file(&self) -> &'static str {
        Path::new(self.file)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN)
    }
}

impl Default for CallSite {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Expands to the path of the enclosing function, e.g. `my_app::server::accept`.
#[doc(hidden)]
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __seglog_here() {}
        fn __seglog_type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let name = __seglog_type_name_of(__seglog_here);
        name.strip_suffix("::__seglog_here").unwrap_or(name)
    }};
}

/// Captures the [`CallSite`](crate::CallSite) of the expansion point.
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::CallSite::new($crate::function_name!(), ::std::file!(), ::std::line!())
    };
}
