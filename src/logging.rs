use std::{
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        mpsc::{self, Sender},
        OnceLock,
    },
    thread,
};

use crate::paths;

/* =========================
   GLOBAL STATE
   ========================= */

static ENABLED: AtomicBool = AtomicBool::new(false);
static THRESHOLD: AtomicU8 = AtomicU8::new(LEVEL_WARN);
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static LOG_TX: OnceLock<Sender<String>> = OnceLock::new();

const LEVEL_ERROR: u8 = 0;
const LEVEL_WARN: u8 = 1;
const LEVEL_INFO: u8 = 2;
const LEVEL_DEBUG: u8 = 3;

/* =========================
   PUBLIC API
   ========================= */

/// Starts the background writer. Only the first call takes effect.
pub fn init(debug: bool, level: &str) {
    if LOG_TX.get().is_some() {
        crate::warn!("logging::init() called more than once; keeping the first configuration");
        return;
    }

    ENABLED.store(debug, Ordering::Relaxed);
    THRESHOLD.store(level_rank(level).unwrap_or(LEVEL_WARN), Ordering::Relaxed);

    let path = log_path().clone();
    let (tx, rx) = mpsc::channel::<String>();
    if LOG_TX.set(tx).is_err() {
        return;
    }

    let spawned = thread::Builder::new()
        .name("log-writer".into())
        .spawn(move || {
            let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) else {
                return;
            };

            while let Ok(line) = rx.recv() {
                let _ = writeln!(file, "{line}");
                let _ = file.flush();
            }
        });

    if let Err(e) = spawned {
        eprintln!("failed to start log writer: {e}");
    }
}

/// Warnings and errors are always written; `log_level` only gates the
/// chattier levels.
#[inline]
pub fn should_log(level: &str) -> bool {
    if ENABLED.load(Ordering::Relaxed) {
        return true;
    }
    let rank = level_rank(level).unwrap_or(LEVEL_DEBUG);
    rank <= THRESHOLD.load(Ordering::Relaxed).max(LEVEL_WARN)
}

/* =========================
   INTERNAL
   ========================= */

#[inline]
pub fn enqueue(level: &str, msg: String) {
    if let Some(tx) = LOG_TX.get() {
        let _ = tx.send(format_line(&timestamp(), level, &msg));
    }
}

fn format_line(ts: &str, level: &str, msg: &str) -> String {
    format!("{ts} [{level}] {msg}")
}

fn level_rank(level: &str) -> Option<u8> {
    match level.trim().to_ascii_lowercase().as_str() {
        "error" => Some(LEVEL_ERROR),
        "warn" | "warning" => Some(LEVEL_WARN),
        "info" => Some(LEVEL_INFO),
        "debug" | "trace" => Some(LEVEL_DEBUG),
        _ => None,
    }
}

fn timestamp() -> String {
    let now = chrono::Local::now();
    now.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/* =========================
   MACROS
   ========================= */

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if $crate::logging::should_log("INFO") {
            $crate::logging::enqueue(
                "INFO",
                format!($($arg)*)
            );
        }
    }};
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue(
            "WARN",
            format!($($arg)*)
        );
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue(
            "ERROR",
            format!($($arg)*)
        );
    }};
}

/* =========================
   PATH
   ========================= */

fn log_path() -> &'static PathBuf {
    LOG_PATH.get_or_init(paths::log_path)
}
