//! Log capture for unit tests.
//!
//! Records are kept per thread so tests running in parallel only see their
//! own messages.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::{
    sync::{Mutex, Once},
    thread::{self, ThreadId},
};

struct CaptureLogger {
    records: Mutex<Vec<(ThreadId, Level, String)>>,
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};
static INIT: Once = Once::new();

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        records.push((
            thread::current().id(),
            record.level(),
            record.args().to_string(),
        ));
    }

    fn flush(&self) {}
}

fn take_current() -> Vec<(Level, String)> {
    let id = thread::current().id();
    let mut records = LOGGER.records.lock().unwrap_or_else(|e| e.into_inner());
    let (mine, others): (Vec<_>, Vec<_>) = records.drain(..).partition(|(t, _, _)| *t == id);
    *records = others;
    mine.into_iter().map(|(_, level, msg)| (level, msg)).collect()
}

/// Run `f` and return its result with every message it logged.
pub(crate) fn capture<T>(f: impl FnOnce() -> T) -> (T, Vec<(Level, String)>) {
    INIT.call_once(|| {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });

    take_current();
    let result = f();
    (result, take_current())
}
