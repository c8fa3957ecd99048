//! Time budgets for detection, layout and render passes.
//!
//! Every pass runs under a [`PassTimer`]. A pass that overruns its budget
//! logs a warning with its measured time in every build; the `profiling`
//! feature additionally traces each pass, indented by nesting depth.
//!
//! ```ignore
//! fn render(&mut self) {
//!     time_pass!("display.render", INTERACTIVE_PASS_MS);
//!     // ... work ...
//! }
//! ```

use std::time::Instant;
use tracing::warn;
#[cfg(feature = "profiling")]
use tracing::trace;

/// Budget for an interactive pass (one frame at 60 FPS)
pub const INTERACTIVE_PASS_MS: f64 = 16.67;

/// Budget for reading and detecting one file
pub const DETECTION_PASS_MS: f64 = 250.0;

/// Time the rest of the enclosing scope against a budget in milliseconds.
#[macro_export]
macro_rules! time_pass {
    ($pass:expr, $budget_ms:expr) => {
        let _pass_timer = $crate::perf::PassTimer::start($pass, $budget_ms);
    };
}

pub use time_pass;

#[cfg(feature = "profiling")]
thread_local! {
    static OPEN_PASSES: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Measures one pass and reports it when dropped.
pub struct PassTimer {
    pass: &'static str,
    budget_ms: f64,
    started: Instant,
    #[cfg(feature = "profiling")]
    nesting: usize,
}

impl PassTimer {
    pub fn start(pass: &'static str, budget_ms: f64) -> Self {
        Self {
            pass,
            budget_ms,
            started: Instant::now(),
            #[cfg(feature = "profiling")]
            nesting: OPEN_PASSES.with(|open| open.replace(open.get() + 1)),
        }
    }

    pub fn pass(&self) -> &'static str {
        self.pass
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    /// Whether the pass has already run past its budget.
    pub fn over_budget(&self) -> bool {
        self.elapsed_ms() > self.budget_ms
    }
}

impl Drop for PassTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();

        #[cfg(feature = "profiling")]
        {
            OPEN_PASSES.with(|open| open.set(open.get().saturating_sub(1)));
            trace!(
                "{}{}: {:.2}ms",
                "  ".repeat(self.nesting),
                self.pass,
                elapsed_ms
            );
        }

        if elapsed_ms > self.budget_ms {
            warn!(
                pass = self.pass,
                elapsed_ms = format!("{:.2}", elapsed_ms),
                budget_ms = format!("{:.2}", self.budget_ms),
                "Pass over budget"
            );
        }
    }
}
