#![forbid(unsafe_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

const CRASH_FILE_NAME: &str = "last_crash.txt";

pub(crate) fn write_last_crash(storage_dir: &Path, kind: &str, detail: &str) {
    // Best-effort: never include request bodies, only where and why we died.
    let _ = std::fs::create_dir_all(storage_dir);
    let path = storage_dir.join(CRASH_FILE_NAME);

    let mut out = String::new();
    let ts_ms = super::now_ms_i64();
    let _ = writeln!(out, "ts={}", super::ts_ms_to_rfc3339(ts_ms));
    let _ = writeln!(out, "pid={}", std::process::id());
    let _ = writeln!(out, "kind={kind}");
    let _ = writeln!(out, "version={}", env!("CARGO_PKG_VERSION"));
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let _ = writeln!(out, "cwd={}", cwd.to_string_lossy());
    let _ = writeln!(out, "detail={detail}");

    let _ = std::fs::write(path, out);
}

pub(crate) fn install_crash_reporter(storage_dir: PathBuf) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let mut detail = info.to_string();
        let backtrace = std::backtrace::Backtrace::force_capture();
        let _ = write!(&mut detail, "\nbacktrace:\n{backtrace}");
        write_last_crash(&storage_dir, "panic", &detail);
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crash_file_records_kind_and_detail() {
        let dir = tempfile::tempdir().expect("temp dir");
        write_last_crash(dir.path(), "error", "store exploded");
        let text = std::fs::read_to_string(dir.path().join(CRASH_FILE_NAME)).expect("read");
        assert!(text.contains("kind=error\n"));
        assert!(text.contains("detail=store exploded"));
        assert!(text.contains(&format!("pid={}", std::process::id())));
    }
}
