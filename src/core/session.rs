//! Seam to the debug session that produces register dumps.
//!
//! The session itself (transport, process control) lives outside this crate.
//! It only has to evaluate GDB expressions and hand back their text.

use std::thread;

use log::{debug, warn};

use crate::Result;
use crate::core::parser::{RegisterSnapshot, parse_dump};

/// Expression that dumps every register.
pub const DUMP_EXPRESSION: &str = "-exec info all-registers";

/// Marker line separating the dump from individually fetched AVX registers.
pub const FORCED_YMM_MARKER: &str = "--- FORCED YMM FETCH ---";

/// Number of `ymm` registers fetched during AVX recovery.
pub const YMM_COUNT: usize = 16;

/// A debug session able to evaluate GDB expressions.
///
/// Implementations must be callable from several threads at once; AVX
/// recovery issues its reads concurrently.
pub trait DebugSession: Sync {
    /// Evaluate `expression` and return its textual result.
    fn evaluate(&self, expression: &str) -> Result<String>;
}

/// Expression reading a single `ymm` register.
pub fn ymm_expression(index: usize) -> String {
    format!("-exec p $ymm{index}")
}

/// Drop a leading `$1 = ` (or any `name = `) ahead of the value's first brace.
fn strip_assignment(value: &str) -> &str {
    let brace = value.find('{').unwrap_or(value.len());
    match value[..brace].find('=') {
        Some(eq) => value[eq + 1..].trim(),
        None => value.trim(),
    }
}

/// Read `ymm0..ymm15` concurrently, one result per index.
///
/// A failed read yields `None` for its index and does not affect the others.
pub fn fetch_ymm<S: DebugSession + ?Sized>(session: &S) -> Vec<Option<String>> {
    thread::scope(|scope| {
        let handles: Vec<_> = (0..YMM_COUNT)
            .map(|index| scope.spawn(move || session.evaluate(&ymm_expression(index))))
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| match handle.join() {
                Ok(Ok(value)) => Some(value),
                Ok(Err(err)) => {
                    warn!("failed to read ymm{index}: {err}");
                    None
                }
                Err(_) => {
                    warn!("reader for ymm{index} panicked");
                    None
                }
            })
            .collect()
    })
}

/// Append recovered `ymmN` lines to `raw`, behind [`FORCED_YMM_MARKER`].
///
/// Returns the number of lines appended. Nothing is appended if every read
/// failed.
pub fn merge_ymm(raw: &mut String, results: &[Option<String>]) -> usize {
    let mut extra = String::new();
    let mut count = 0;

    for (index, value) in results.iter().enumerate() {
        if let Some(value) = value {
            extra.push_str(&format!("\nymm{index} {}", strip_assignment(value)));
            count += 1;
        }
    }

    if count > 0 {
        raw.push('\n');
        raw.push_str(FORCED_YMM_MARKER);
        raw.push_str(&extra);
    }

    count
}

/// Fetch a full register dump, recovering AVX registers the dump omitted.
pub fn read_registers<S: DebugSession + ?Sized>(session: &S) -> Result<String> {
    let mut raw = session.evaluate(DUMP_EXPRESSION)?;

    if !raw.contains("ymm0") {
        debug!("dump has no ymm registers, fetching them individually");
        let results = fetch_ymm(session);
        let recovered = merge_ymm(&mut raw, &results);
        debug!("recovered {recovered}/{YMM_COUNT} ymm registers");
    }

    Ok(raw)
}

/// Holds the most recent dump and its snapshot across refreshes.
///
/// Each refresh replaces both wholesale; a failed refresh leaves them as they
/// were.
#[derive(Debug, Default)]
pub struct RegisterMonitor {
    raw: String,
    snapshot: Option<RegisterSnapshot>,
}

impl RegisterMonitor {
    /// Creates a new [`RegisterMonitor`] with nothing displayed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch and parse a new dump from `session`.
    pub fn refresh<S: DebugSession + ?Sized>(&mut self, session: &S) -> Result<&RegisterSnapshot> {
        match read_registers(session) {
            Ok(raw) => {
                let snapshot = parse_dump(&raw);
                self.raw = raw;
                Ok(self.snapshot.insert(snapshot))
            }
            Err(err) => {
                warn!("register refresh failed, keeping previous snapshot: {err}");
                Err(err)
            }
        }
    }

    /// Raw text of the most recent successful refresh.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Snapshot of the most recent successful refresh.
    pub fn snapshot(&self) -> Option<&RegisterSnapshot> {
        self.snapshot.as_ref()
    }
}
