//! Application orchestration
//!
//! Wires the scheduler, result stream, metrics engine, and output sinks
//! together and owns the run lifecycle: start probing, consume results until
//! a stop condition fires (round count, duration, or Ctrl-C), then stop the
//! scheduler, drain in-flight results, and flush the sinks.

use crate::config::validation::{validate_config, ValidationLevel};
use crate::engine::MetricsEngine;
use crate::error::Result;
use crate::logging::{LoggerFactory, ProbeLogger};
use crate::models::Config;
use crate::output::{ConsoleSink, CsvSink, JsonSink, SinkSet};
use crate::probe::{ProbeRunner, SystemPingRunner, PROBE_TIMEOUT_SLACK};
use crate::scheduler::{ScheduleParams, Scheduler};
use crate::stream::{result_stream, ResultReceiver};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Final counters for a completed run
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    /// Probe rounds the scheduler dispatched
    pub rounds: u64,
    /// Metric records delivered to the sinks
    pub records: u64,
}

/// The monitoring application
pub struct App {
    config: Config,
    runner: Arc<dyn ProbeRunner>,
}

impl App {
    /// Create an application probing through the system ping command
    pub fn new(config: Config) -> Self {
        Self::with_runner(config, Arc::new(SystemPingRunner::new()))
    }

    /// Create an application over a custom probe runner
    pub fn with_runner(config: Config, runner: Arc<dyn ProbeRunner>) -> Self {
        Self { config, runner }
    }

    /// Run until a stop condition fires and return the final counters
    pub async fn run(&self) -> Result<RunSummary> {
        let warnings = validate_config(&self.config)?;
        for warning in &warnings {
            if warning.level != ValidationLevel::Info || self.config.verbose {
                eprintln!("{}", warning.format());
            }
        }

        let factory = LoggerFactory::new(self.config.clone());
        let probe_logger = factory.create_probe_logger();
        probe_logger.log_run_started(&self.config).await;

        let engine = MetricsEngine::new(
            self.config.history_capacity,
            self.config.effective_loss_window(),
        );
        let mut sinks = self.build_sinks();

        let (tx, rx) = result_stream();
        let mut scheduler = Scheduler::new(Arc::clone(&self.runner));
        let start = scheduler.start(
            ScheduleParams {
                targets: self.config.targets.clone(),
                interval: self.config.interval(),
                timeout: self.config.timeout(),
                payload_bytes: self.config.payload_bytes,
                ip_version: self.config.ip_version,
            },
            tx,
        );
        if let Err(err) = start {
            factory
                .create_logger("APP")
                .await
                .error("Failed to start the probe scheduler")
                .error_info(&err)
                .log()
                .await;
            return Err(err);
        }

        let records = self
            .consume(rx, engine, &mut sinks, &probe_logger, &mut scheduler)
            .await;

        let summary = RunSummary {
            rounds: scheduler.rounds_dispatched(),
            records,
        };
        probe_logger
            .log_run_stopped(summary.rounds, summary.records)
            .await;
        Ok(summary)
    }

    fn build_sinks(&self) -> SinkSet {
        let mut sinks = SinkSet::new();
        if self.config.json {
            sinks.push(Box::new(JsonSink::new()));
        } else {
            sinks.push(Box::new(ConsoleSink::new(
                self.config.enable_color,
                self.config.targets.len() > 1 || self.config.verbose,
            )));
        }
        if let Some(path) = &self.config.csv_path {
            sinks.push(Box::new(CsvSink::new(path)));
        }
        sinks
    }

    /// Latest instant by which a bounded run must have delivered its records.
    ///
    /// Covers the scheduled rounds plus one full probe timeout with slack, so
    /// a final timed-out probe still gets counted before the run ends.
    fn round_grace_deadline(&self, started: Instant, rounds: u64) -> Instant {
        let scheduled = self.config.interval().mul_f64(rounds.saturating_sub(1) as f64);
        started + scheduled + self.config.timeout() + PROBE_TIMEOUT_SLACK
    }

    async fn consume(
        &self,
        mut rx: ResultReceiver,
        mut engine: MetricsEngine,
        sinks: &mut SinkSet,
        probe_logger: &ProbeLogger,
        scheduler: &mut Scheduler,
    ) -> u64 {
        let started = Instant::now();
        let record_limit = self
            .config
            .round_count
            .map(|rounds| rounds * self.config.targets.len() as u64);

        let mut deadline: Option<Instant> = None;
        if let Some(rounds) = self.config.round_count {
            deadline = Some(self.round_grace_deadline(started, rounds));
        }
        if let Some(seconds) = self.config.duration_seconds {
            let until = started + Duration::from_secs_f64(seconds);
            deadline = Some(deadline.map_or(until, |d| d.min(until)));
        }
        // Unbounded runs still need a concrete sleep target for select
        let sleep_target = deadline.unwrap_or_else(|| started + Duration::from_secs(86_400 * 365));

        let mut records: u64 = 0;
        loop {
            tokio::select! {
                maybe = rx.recv() => {
                    let Some(result) = maybe else { break };
                    let record = engine.record(&result.target, result.timestamp, result.rtt_ms);
                    probe_logger.log_result(&record, &result.raw_output).await;
                    sinks.dispatch(&record).await;
                    records += 1;
                    if record_limit.is_some_and(|limit| records >= limit) {
                        break;
                    }
                }
                _ = tokio::time::sleep_until(sleep_target), if deadline.is_some() => break,
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        scheduler.stop();

        // In-flight probes that complete during shutdown still count. Wait up
        // to one full probe timeout for them; the channel closes as soon as
        // the dispatched tasks finish, which usually ends the drain early.
        let drain_deadline = Instant::now() + self.config.timeout() + PROBE_TIMEOUT_SLACK;
        loop {
            if record_limit.is_some_and(|limit| records >= limit) {
                break;
            }
            tokio::select! {
                maybe = rx.recv() => {
                    let Some(result) = maybe else { break };
                    let record = engine.record(&result.target, result.timestamp, result.rtt_ms);
                    probe_logger.log_result(&record, &result.raw_output).await;
                    sinks.dispatch(&record).await;
                    records += 1;
                }
                _ = tokio::time::sleep_until(drain_deadline) => break,
            }
        }

        sinks.flush().await;
        records
    }
}
