use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Duration, OffsetDateTime};

use crate::{Error, Result};

/// Time granularity at which a new segment file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// Never rotate.
    #[default]
    #[serde(alias = "none")]
    Never,
    /// Rotate every minute.
    #[serde(alias = "minute")]
    Minutely,
    /// Rotate every hour.
    #[serde(alias = "hour")]
    Hourly,
}

impl Rotation {
    /// Length of one rotation period, `None` when rotation is disabled.
    pub fn unit(&self) -> Option<Duration> {
        match self {
            Self::Never => None,
            Self::Minutely => Some(Duration::MINUTE),
            Self::Hourly => Some(Duration::HOUR),
        }
    }

    /// Round `at` down to the start of its period.
    ///
    /// `Never` has no periods and returns `at` unchanged.
    pub fn truncate(&self, at: OffsetDateTime) -> OffsetDateTime {
        let sub_minute =
            Duration::seconds(at.second() as i64) + Duration::nanoseconds(at.nanosecond() as i64);
        match self {
            Self::Never => at,
            Self::Minutely => at - sub_minute,
            Self::Hourly => at - sub_minute - Duration::minutes(at.minute() as i64),
        }
    }

    /// The instant at which the segment current at `at` must be replaced.
    pub fn next_deadline(&self, at: OffsetDateTime) -> Option<OffsetDateTime> {
        self.unit().map(|unit| self.truncate(at) + unit)
    }
}

impl FromStr for Rotation {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never" | "none" => Ok(Self::Never),
            "minutely" | "minute" => Ok(Self::Minutely),
            "hourly" | "hour" => Ok(Self::Hourly),
            other => Err(Error::Config(format!("unknown rotation: {}", other))),
        }
    }
}

/// `<process>.<YYYY>-<MM>-<DD>-<HH>-<mm>.<pid>.log`
pub fn segment_file_name(process: &str, at: OffsetDateTime, pid: u32) -> Result<String> {
    let stamp = at
        .format(format_description!("[year]-[month]-[day]-[hour]-[minute]"))
        .map_err(time::error::Error::from)?;
    Ok(format!("{}.{}.{}.log", process, stamp, pid))
}

/// Base name of the running executable as invoked.
pub fn process_base_name() -> String {
    let from_args = std::env::args_os().next().and_then(|arg0| {
        Path::new(&arg0)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    });
    from_args
        .or_else(|| {
            std::env::current_exe().ok().and_then(|exe| {
                exe.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "seglog".to_string())
}
