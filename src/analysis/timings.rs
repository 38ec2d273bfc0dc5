//! Opt-in duration registry, enabled by setting `AST_TIMINGS`.
//!
//! Diagnostics only: nothing recorded here feeds back into analysis results.
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

static TIMINGS: Lazy<Mutex<HashMap<String, Vec<u128>>>> = Lazy::new(|| Mutex::new(HashMap::new()));

pub fn enabled() -> bool {
    std::env::var("AST_TIMINGS").map(|v| !v.is_empty()).unwrap_or(false)
}

pub fn record(label: &str, dur_ms: u128) {
    if !enabled() {
        return;
    }
    if let Ok(mut g) = TIMINGS.lock() {
        g.entry(label.to_string()).or_default().push(dur_ms);
    }
}

/// Run `f` and record its wall time under `label`.
pub fn timed<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let t0 = std::time::Instant::now();
    let out = f();
    record(label, t0.elapsed().as_millis());
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quantiles {
    pub p50: u128,
    pub p95: u128,
    pub p99: u128,
    pub avg: u128,
}

pub fn quantiles(mut v: Vec<u128>) -> Quantiles {
    if v.is_empty() {
        return Quantiles { p50: 0, p95: 0, p99: 0, avg: 0 };
    }
    v.sort_unstable();
    let len = v.len() as f64;
    let idx = |p: f64| -> usize { ((p * (len - 1.0)).round() as isize).max(0) as usize };
    let sum: u128 = v.iter().copied().sum();
    Quantiles {
        p50: v[idx(0.50)],
        p95: v[idx(0.95)],
        p99: v[idx(0.99)],
        avg: sum / (v.len() as u128),
    }
}

pub fn summary() -> String {
    if !enabled() {
        return String::new();
    }
    let Ok(g) = TIMINGS.lock() else {
        return String::new();
    };
    if g.is_empty() {
        return String::new();
    }
    let mut out = String::from("=== TIMINGS (ms) ===\n");
    let mut keys: Vec<_> = g.keys().cloned().collect();
    keys.sort();
    for k in keys {
        if let Some(v) = g.get(&k) {
            let q = quantiles(v.clone());
            out.push_str(&format!(
                "{}: count={} p50={} p95={} p99={} avg={}\n",
                k,
                v.len(),
                q.p50,
                q.p95,
                q.p99,
                q.avg
            ));
        }
    }
    out
}
