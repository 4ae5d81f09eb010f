// src/benchmark.rs
//
// The cycle loop: one fresh session per cycle, the battery, then logout.

use log::{debug, info, warn};
use std::time::{Duration, Instant};

use crate::cfg::target::Target;
use crate::client_ops::{Clock, Connected, Connector, MailSession};
use crate::error::Result;
use crate::operation::BenchPlan;
use crate::report::Reporter;
use crate::runner::run_operation;

/// Per-cycle totals.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleSummary {
    pub cycle: u32,
    pub message_count: u32,
    pub operations: usize,
    pub bytes: usize,
    /// Sum of the operations' elapsed times; excludes connect and logout.
    pub elapsed: Duration,
}

/// Drives the benchmark: one fresh session per cycle, strictly sequential.
pub struct Roadrunner<'a, C: Clock> {
    connector: &'a dyn Connector,
    target: &'a Target,
    plan: &'a BenchPlan,
    clock: C,
}

impl<'a, C: Clock> Roadrunner<'a, C> {
    pub fn new(connector: &'a dyn Connector, target: &'a Target, plan: &'a BenchPlan, clock: C) -> Self {
        debug!(
            "Initializing Roadrunner for {} ({}), {} cycles",
            target.address(),
            target.transport,
            plan.cycles
        );
        Roadrunner {
            connector,
            target,
            plan,
            clock,
        }
    }

    /// Run every cycle and return the total wall time. The first fatal error
    /// stops the run; nothing after it is attempted.
    pub fn execute(&self, reporter: &mut dyn Reporter) -> Result<Duration> {
        self.execute_since(self.clock.now(), reporter)
    }

    /// As `execute`, with the total measured from `start` (process start for
    /// the binary) rather than from the first cycle.
    pub fn execute_since(&self, start: Instant, reporter: &mut dyn Reporter) -> Result<Duration> {
        reporter.begin()?;

        for cycle in 1..=self.plan.cycles {
            reporter.cycle_started(cycle)?;
            let summary = self.run_cycle(cycle, reporter)?;
            reporter.cycle_finished(&summary)?;
        }

        let total = self.clock.now().saturating_duration_since(start);
        reporter.finish(total)?;
        info!("Benchmark completed in {:?}", total);
        Ok(total)
    }

    /// Connect, run the battery, log out. Logout happens whenever a session
    /// was established, even if the battery failed.
    pub fn run_cycle(&self, cycle: u32, reporter: &mut dyn Reporter) -> Result<CycleSummary> {
        let Connected {
            mut session,
            message_count,
        } = self.connector.connect(self.target)?;
        info!("Cycle {}: {} messages in {}", cycle, message_count, self.target.mailbox);

        let outcome = self.run_battery(session.as_mut(), cycle, message_count, reporter);

        if let Err(e) = session.logout() {
            warn!("Logout after cycle {} failed: {}", cycle, e);
        }
        outcome
    }

    fn run_battery(
        &self,
        session: &mut dyn MailSession,
        cycle: u32,
        message_count: u32,
        reporter: &mut dyn Reporter,
    ) -> Result<CycleSummary> {
        reporter.mailbox_selected(message_count, &self.target.mailbox)?;

        let mut summary = CycleSummary {
            cycle,
            message_count,
            operations: 0,
            bytes: 0,
            elapsed: Duration::ZERO,
        };

        for spec in self.plan.battery(message_count) {
            let record = run_operation(session, &spec, cycle, &self.clock)?;
            summary.operations += 1;
            summary.bytes += record.bytes;
            summary.elapsed += record.elapsed;
            if record.error.is_some() {
                debug!("Cycle {}: {} on {} recorded as empty", cycle, record.kind, record.sequence);
            }
            reporter.record(&record)?;
        }

        Ok(summary)
    }
}
