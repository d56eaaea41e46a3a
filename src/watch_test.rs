// Unit tests for stderr classification and the supervision loop

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_classify_empty_stderr() {
    assert_eq!(classify_stderr(""), StderrClass::Clean);
}

#[test]
fn test_classify_navigation_timeout() {
    let stderr = "Navigation timeout of 30000 ms exceeded\n  at goto (...)";
    assert_eq!(classify_stderr(stderr), StderrClass::NavigationTimeout);

    // The prefix has to lead; a mention elsewhere is not the same signal
    let stderr = "warning: Navigation timeout of 30000 ms exceeded";
    assert!(matches!(classify_stderr(stderr), StderrClass::Other(_)));
}

#[test]
fn test_classify_truncates_other_output() {
    let noise = "x".repeat(500);
    match classify_stderr(&noise) {
        StderrClass::Other(summary) => assert_eq!(summary.len(), 200),
        other => panic!("unexpected class: {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_supervise_stops_at_cycle_limit() {
    let options = WatchOptions {
        command: "true".to_string(),
        args: vec![],
        max_cycles: Some(3),
    };
    let cycles = supervise(&options).await.unwrap();
    assert_eq!(cycles, 3);
}

#[cfg(unix)]
#[tokio::test]
async fn test_supervise_surfaces_failure() {
    let options = WatchOptions {
        command: "sh".to_string(),
        args: vec!["-c".to_string(), "echo boom >&2; exit 7".to_string()],
        max_cycles: None,
    };
    let err = supervise(&options).await.unwrap_err();
    let err: crate::errors::A11yprobeError = err.into();
    match err {
        crate::errors::A11yprobeError::WatchFailed { code, stderr } => {
            assert_eq!(code, 7);
            assert_eq!(stderr.trim(), "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_supervise_missing_command_is_an_error() {
    let options = WatchOptions {
        command: "a11yprobe-no-such-watcher".to_string(),
        args: vec![],
        max_cycles: Some(1),
    };
    assert!(supervise(&options).await.is_err());
}
