//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::{RunReport, ScenarioReport};
use crate::output::OutputContext;

/// Renders run reports as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render one line per scenario followed by a summary.
    ///
    /// Failures are printed even in quiet mode.
    pub fn render_report(&self, report: &RunReport) {
        if !self.ctx.quiet {
            println!();
        }
        self.ctx.header("Results:");
        for scenario in &report.scenarios {
            self.render_scenario(scenario);
        }

        let total = report.scenarios.len();
        let failed = report.failed_count();
        if failed == 0 {
            self.ctx.success(&format!("{total} of {total} scenarios passed"));
        } else {
            self.ctx
                .error(&format!("{failed} of {total} scenarios failed"));
        }
    }

    fn render_scenario(&self, s: &ScenarioReport) {
        let timing = format_duration(s.duration_ms);
        if s.passed {
            self.ctx.success(&format!(
                "{} {}",
                s.scenario,
                timing.style(self.ctx.styles.dim)
            ));
        } else {
            self.ctx.error(&format!(
                "{} {}",
                s.scenario,
                timing.style(self.ctx.styles.dim)
            ));
            if let Some(err) = &s.error {
                for line in err.lines() {
                    eprintln!("      {line}");
                }
            }
        }
    }
}

/// `(850ms)`, `(12.3s)`, `(14m 05s)`.
#[must_use]
pub fn format_duration(ms: u64) -> String {
    if ms < 1_000 {
        format!("({ms}ms)")
    } else if ms < 60_000 {
        #[allow(clippy::cast_precision_loss)]
        let secs = ms as f64 / 1_000.0;
        format!("({secs:.1}s)")
    } else {
        let secs = ms / 1_000;
        format!("({}m {:02}s)", secs / 60, secs % 60)
    }
}
