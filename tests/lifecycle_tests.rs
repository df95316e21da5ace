use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::{Arc, Barrier, Mutex, MutexGuard};
use std::thread;

use seglog::{Error, Level, LogConfig, ManualClock, Rotation};
use time::Duration;
use time::macros::datetime;

/// The logger is process-wide; tests touching it take turns.
static SERIAL: Mutex<()> = Mutex::new(());

const CHILD_ENV: &str = "SEGLOG_CHILD_DIR";

fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

fn segment_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("read dir")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "log"))
        .collect();
    files.sort();
    files
}

fn read_single_segment(dir: &Path) -> String {
    let files = segment_files(dir);
    assert_eq!(files.len(), 1, "expected one segment, got {:?}", files);
    std::fs::read_to_string(&files[0]).expect("read segment")
}

/// Re-run a single test of this binary in a child process.
fn run_child(test_name: &str, dir: &Path) -> Output {
    Command::new(std::env::current_exe().expect("test binary path"))
        .args(["--exact", test_name, "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, dir)
        .output()
        .expect("spawn child test")
}

fn child_dir() -> Option<PathBuf> {
    std::env::var_os(CHILD_ENV).map(PathBuf::from)
}

#[test]
fn infoln_writes_expected_line_to_segment() {
    let _guard = serial();
    let tmp = tempfile::tempdir().expect("tempdir");

    let logger = seglog::builder()
        .info_level()
        .with_directory(tmp.path())
        .start();
    seglog::debugln!("filtered out");
    let line = line!() + 1;
    seglog::infoln!("hello", 42);
    logger.stop();

    let content = read_single_segment(tmp.path());
    assert_eq!(
        content,
        format!(
            " INFO [infoln_writes_expected_line_to_segment] (lifecycle_tests.rs:{}) - hello 42\n",
            line
        )
    );
}

#[test]
fn every_level_respects_threshold() {
    let _guard = serial();
    let tmp = tempfile::tempdir().expect("tempdir");

    let logger = seglog::builder()
        .warn_level()
        .with_directory(tmp.path())
        .start();
    seglog::debugf!("debug {}", 1);
    seglog::infof!("info {}", 2);
    seglog::warnf!("warn {}", 3);
    seglog::errorf!("error {}", 4);
    seglog::debugln!("debug", 5);
    seglog::infoln!("info", 6);
    seglog::warnln!("warn", 7);
    seglog::errorln!("error", 8);
    logger.stop();

    let content = read_single_segment(tmp.path());
    let messages: Vec<&str> = content
        .lines()
        .map(|l| l.split(" - ").nth(1).expect("message part"))
        .collect();
    assert_eq!(messages, vec!["warn 3", "error 4", "warn 7", "error 8"]);
}

#[test]
fn try_start_twice_reports_already_started() {
    let _guard = serial();

    let logger = seglog::try_start(LogConfig::new().with_level(Level::Fatal)).expect("first start");
    assert!(matches!(
        seglog::try_start(LogConfig::new()),
        Err(Error::AlreadyStarted)
    ));
    assert!(seglog::current().is_some());

    logger.stop();
    assert!(seglog::current().is_none());

    let again = seglog::try_start(LogConfig::new().with_level(Level::Fatal))
        .expect("start after stop");
    again.stop();
}

#[test]
fn stop_twice_is_a_noop() {
    let _guard = serial();
    let tmp = tempfile::tempdir().expect("tempdir");

    let logger = seglog::builder().with_directory(tmp.path()).start();
    seglog::infoln!("before stop");
    logger.stop();
    logger.stop();
    seglog::errorln!("after stop");
    logger.log_values(Level::Error, &seglog::call_site!(), &[&"through handle"]);

    assert!(logger.is_stopped());
    let content = read_single_segment(tmp.path());
    assert!(content.contains("before stop"));
    assert!(!content.contains("after stop"));
    assert!(!content.contains("through handle"));
}

#[test]
fn logging_before_start_is_dropped() {
    let _guard = serial();
    assert!(seglog::current().is_none());
    seglog::errorf!("nobody is listening");
    seglog::infoln!("still nobody");
}

#[test]
fn print_stack_writes_backtrace_on_stop() {
    let _guard = serial();
    let tmp = tempfile::tempdir().expect("tempdir");

    let logger = seglog::builder()
        .with_directory(tmp.path())
        .print_stack()
        .start();
    seglog::infoln!("working");
    logger.stop();

    let content = read_single_segment(tmp.path());
    let stack_at = content.find("stack backtrace of thread").expect("backtrace");
    assert!(content.find("working").expect("line") < stack_at);
}

#[test]
fn rotation_through_running_logger() {
    let _guard = serial();
    let tmp = tempfile::tempdir().expect("tempdir");
    let clock = ManualClock::new(datetime!(2024-06-01 08:15:40 UTC));

    let logger = seglog::builder()
        .with_directory(tmp.path())
        .every_minute()
        .with_clock(clock.clone())
        .start();
    assert_eq!(logger.config().rotation, Rotation::Minutely);

    seglog::infoln!("segment one");
    let first = logger.segment_path().expect("first segment");
    clock.advance(Duration::seconds(25));
    seglog::infoln!("segment two");
    let second = logger.segment_path().expect("second segment");
    logger.stop();

    assert_ne!(first, second);
    assert!(first.to_string_lossy().contains("2024-06-01-08-15"));
    assert!(second.to_string_lossy().contains("2024-06-01-08-16"));
    assert_eq!(segment_files(tmp.path()), vec![first.clone(), second.clone()]);
    assert!(std::fs::read_to_string(first).unwrap().contains("segment one"));
    assert!(!std::fs::read_to_string(&second).unwrap().contains("segment one"));
    assert!(std::fs::read_to_string(second).unwrap().contains("segment two"));
}

#[test]
fn concurrent_writers_produce_whole_lines() {
    let _guard = serial();
    let tmp = tempfile::tempdir().expect("tempdir");
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .build()
        .expect("runtime");

    let logger = seglog::builder().with_directory(tmp.path()).start();

    runtime.block_on(async {
        let mut tasks = Vec::new();
        for task in 0..8 {
            tasks.push(tokio::spawn(async move {
                for i in 0..50 {
                    seglog::infof!("task {} line {}", task, i);
                }
            }));
        }
        for task in tasks {
            task.await.expect("join");
        }
    });
    logger.stop();

    let content = read_single_segment(tmp.path());
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 400);
    assert!(lines.iter().all(|l| l.starts_with(" INFO [") && l.contains(" - task ")));
}

#[cfg(feature = "tracing-bridge")]
#[test]
fn tracing_events_reach_the_segment() {
    use tracing_subscriber::layer::SubscriberExt;

    let _guard = serial();
    let tmp = tempfile::tempdir().expect("tempdir");
    let logger = seglog::builder()
        .info_level()
        .with_directory(tmp.path())
        .start();

    let subscriber = tracing_subscriber::registry().with(seglog::tracing_bridge::layer());
    tracing::subscriber::with_default(subscriber, || {
        tracing::debug!("below threshold");
        tracing::warn!(peer = "10.0.0.7", "slow client");
    });
    logger.stop();

    let content = read_single_segment(tmp.path());
    assert!(!content.contains("below threshold"));
    assert!(content.contains(" WARN [lifecycle_tests] (lifecycle_tests.rs:"));
    assert!(content.contains(" - slow client peer=10.0.0.7\n"));
}

#[cfg(feature = "tracing-bridge")]
#[test]
fn bridge_skips_the_loggers_own_events() {
    use tracing_subscriber::layer::SubscriberExt;

    let _guard = serial();
    let tmp = tempfile::tempdir().expect("tempdir");

    let subscriber = tracing_subscriber::registry().with(seglog::tracing_bridge::layer());
    tracing::subscriber::with_default(subscriber, || {
        let logger = seglog::builder().with_directory(tmp.path()).start();
        seglog::infoln!("user line");
        logger.stop();
    });

    let content = read_single_segment(tmp.path());
    assert_eq!(content.lines().count(), 1, "unexpected lines: {:?}", content);
    assert!(content.ends_with(" - user line\n"));
}

#[test]
fn concurrent_try_start_has_one_winner() {
    let _guard = serial();
    const THREADS: usize = 16;
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                seglog::try_start(LogConfig::new().with_level(Level::Fatal))
            })
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        match handle.join().expect("join") {
            Ok(logger) => winners.push(logger),
            Err(err) => assert!(matches!(err, Error::AlreadyStarted)),
        }
    }
    assert_eq!(winners.len(), 1);
    winners[0].stop();
    assert!(seglog::current().is_none());
}

#[test]
fn concurrent_stop_tears_down_once() {
    let _guard = serial();
    const THREADS: usize = 16;
    let tmp = tempfile::tempdir().expect("tempdir");
    let logger = seglog::builder()
        .with_directory(tmp.path())
        .print_stack()
        .start();
    seglog::infoln!("before stop");

    let barrier = Arc::new(Barrier::new(THREADS));
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let logger = logger.clone();
            thread::spawn(move || {
                barrier.wait();
                logger.stop();
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join");
    }

    assert!(logger.is_stopped());
    assert!(seglog::current().is_none());
    let content = read_single_segment(tmp.path());
    assert_eq!(content.matches("stack backtrace of thread").count(), 1);

    let again = seglog::try_start(LogConfig::new().with_level(Level::Fatal)).expect("restart");
    again.stop();
}

#[test]
fn double_start_aborts() {
    if child_dir().is_some() {
        let _first = seglog::start(LogConfig::new().with_level(Level::Fatal));
        let _second = seglog::start(LogConfig::new());
        unreachable!("second start must abort");
    }

    let tmp = tempfile::tempdir().expect("tempdir");
    let output = run_child("double_start_aborts", tmp.path());
    assert!(!output.status.success());
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        assert_eq!(output.status.signal(), Some(6), "expected SIGABRT");
    }
    assert!(String::from_utf8_lossy(&output.stderr).contains("logger already started"));
}

#[test]
fn fatalln_exits_after_writing_all_sinks() {
    if let Some(dir) = child_dir() {
        let _logger = seglog::builder()
            .error_level()
            .with_directory(dir)
            .also_stdout()
            .start();
        seglog::fatalln!("shutting down", 7);
    }

    let tmp = tempfile::tempdir().expect("tempdir");
    let output = run_child("fatalln_exits_after_writing_all_sinks", tmp.path());
    assert_eq!(output.status.code(), Some(1));

    let content = read_single_segment(tmp.path());
    assert!(content.starts_with(
        "FATAL [fatalln_exits_after_writing_all_sinks] (lifecycle_tests.rs:"
    ));
    assert!(content.ends_with(" - shutting down 7\n"));
    assert!(String::from_utf8_lossy(&output.stdout).contains(&content));
}

#[test]
fn fatalf_exits_even_when_not_started() {
    if child_dir().is_some() {
        seglog::fatalf!("no logger {}", "running");
    }

    let tmp = tempfile::tempdir().expect("tempdir");
    let output = run_child("fatalf_exits_even_when_not_started", tmp.path());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn unusable_directory_falls_back_without_crashing() {
    if let Some(dir) = child_dir() {
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, "plain file").expect("write blocker");
        let logger = seglog::builder().with_directory(blocker.join("logs")).start();
        assert!(logger.segment_path().is_none());
        seglog::errorln!("still alive");
        logger.stop();
        return;
    }

    let tmp = tempfile::tempdir().expect("tempdir");
    let output = run_child("unusable_directory_falls_back_without_crashing", tmp.path());
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("seglog: cannot open log directory"));
    assert!(stderr.contains("IO error:"));
    assert!(stderr.contains("ERROR [unusable_directory_falls_back_without_crashing]"));
    assert!(stderr.contains(" - still alive\n"));
}

#[test]
fn stop_stack_is_mirrored_to_stdout() {
    if let Some(dir) = child_dir() {
        let logger = seglog::builder()
            .with_directory(dir)
            .also_stdout()
            .print_stack()
            .start();
        seglog::infoln!("serving");
        logger.stop();
        return;
    }

    let tmp = tempfile::tempdir().expect("tempdir");
    let output = run_child("stop_stack_is_mirrored_to_stdout", tmp.path());
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(" - serving\n"));
    assert!(stdout.contains("stack backtrace of thread"));
    assert!(read_single_segment(tmp.path()).contains("stack backtrace of thread"));
}

#[test]
fn failed_rotation_reports_error_and_continues_on_stderr() {
    if let Some(dir) = child_dir() {
        let logs = dir.join("logs");
        let clock = ManualClock::new(datetime!(2024-06-01 08:15:40 UTC));
        let logger = seglog::builder()
            .with_directory(&logs)
            .every_minute()
            .with_clock(clock.clone())
            .start();
        seglog::infoln!("into the file");

        std::fs::remove_dir_all(&logs).expect("remove logs");
        std::fs::write(&logs, "plain file").expect("block logs");
        clock.advance(Duration::minutes(1));
        seglog::errorln!("after rotation");
        logger.stop();
        return;
    }

    let tmp = tempfile::tempdir().expect("tempdir");
    let output = run_child("failed_rotation_reports_error_and_continues_on_stderr", tmp.path());
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("seglog: cannot open next log segment in"));
    assert!(stderr.contains("IO error:"));
    assert!(stderr.contains(" - after rotation\n"));
    assert!(!stderr.contains("into the file"));
}
