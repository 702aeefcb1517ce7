//! Turnaround, waiting and response figures derived from a finished run.

use std::fmt::Write;

use average::Estimate;

use super::driver::SimOutcome;
use crate::core::{ProcessId, Ticks};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessMetrics {
    pub id: ProcessId,
    pub arrival_time: Ticks,
    pub service_time: Ticks,
    pub departure_time: Ticks,
    pub turnaround: Ticks,
    pub waiting: Ticks,
    pub response: Ticks,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicySummary {
    pub policy: &'static str,
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_response: f64,
    pub max_turnaround: Ticks,
    pub makespan: Ticks,
}

/// Per-process metrics, skipping any process that never departed.
pub fn process_metrics(outcome: &SimOutcome) -> Vec<ProcessMetrics> {
    outcome
        .processes
        .iter()
        .filter_map(|p| {
            let departure_time = p.departure_time()?;
            let turnaround = departure_time - p.arrival_time;
            let first_run = outcome
                .observer
                .first_run_start(p.id)
                .unwrap_or(departure_time);
            Some(ProcessMetrics {
                id: p.id,
                arrival_time: p.arrival_time,
                service_time: p.service_time,
                departure_time,
                turnaround,
                waiting: turnaround.saturating_sub(p.service_time),
                response: first_run.saturating_sub(p.arrival_time),
            })
        })
        .collect()
}

pub fn summarize(outcome: &SimOutcome) -> PolicySummary {
    let metrics = process_metrics(outcome);

    PolicySummary {
        policy: outcome.policy,
        avg_turnaround: avg(metrics.iter().map(|m| m.turnaround as f64)),
        avg_waiting: avg(metrics.iter().map(|m| m.waiting as f64)),
        avg_response: avg(metrics.iter().map(|m| m.response as f64)),
        max_turnaround: metrics.iter().map(|m| m.turnaround).max().unwrap_or(0),
        makespan: metrics.iter().map(|m| m.departure_time).max().unwrap_or(0),
    }
}

fn avg(iter: impl Iterator<Item = f64>) -> f64 {
    iter.collect::<average::Mean>().estimate()
}

pub fn render_processes(outcome: &SimOutcome) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5} {:>8} {:>8} {:>10} {:>11} {:>8} {:>9}",
        "pid", "arrival", "service", "departure", "turnaround", "waiting", "response"
    );
    for m in process_metrics(outcome) {
        let _ = writeln!(
            out,
            "{:>5} {:>8} {:>8} {:>10} {:>11} {:>8} {:>9}",
            m.id.to_string(),
            m.arrival_time,
            m.service_time,
            m.departure_time,
            m.turnaround,
            m.waiting,
            m.response
        );
    }
    out
}

pub fn render_comparison(summaries: &[PolicySummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:>14} {:>12} {:>13} {:>15} {:>9}",
        "policy", "avg turnaround", "avg waiting", "avg response", "max turnaround", "makespan"
    );
    for s in summaries {
        let _ = writeln!(
            out,
            "{:<6} {:>14.2} {:>12.2} {:>13.2} {:>15} {:>9}",
            s.policy, s.avg_turnaround, s.avg_waiting, s.avg_response, s.max_turnaround, s.makespan
        );
    }
    out
}

pub fn render_trace(outcome: &SimOutcome) -> String {
    let mut out = String::new();
    for entry in outcome.observer.trace() {
        let _ = writeln!(
            out,
            "t={:<6} {:<8} {} (due {})",
            entry.time,
            format!("{:?}", entry.kind),
            entry.process,
            entry.due
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::SimConfig,
        scheduler::Policy,
        sim::{Job, Workload, run_policy},
    };

    fn two_jobs() -> Workload {
        Workload::new(vec![
            Job {
                id: 0,
                arrival_time: 0,
                service_time: 5,
            },
            Job {
                id: 1,
                arrival_time: 0,
                service_time: 3,
            },
        ])
        .unwrap()
    }

    #[test]
    fn sjf_metrics() {
        let outcome = run_policy(Policy::Sjf, &two_jobs(), SimConfig::default()).unwrap();
        let metrics = process_metrics(&outcome);

        assert_eq!(metrics[0].turnaround, 8);
        assert_eq!(metrics[0].waiting, 3);
        assert_eq!(metrics[0].response, 3);
        assert_eq!(metrics[1].turnaround, 3);
        assert_eq!(metrics[1].waiting, 0);

        let summary = summarize(&outcome);
        assert_eq!(summary.avg_turnaround, 5.5);
        assert_eq!(summary.avg_waiting, 1.5);
        assert_eq!(summary.max_turnaround, 8);
        assert_eq!(summary.makespan, 8);
    }

    #[test]
    fn rr_response_is_first_slice() {
        let outcome = run_policy(Policy::Rr, &two_jobs(), SimConfig::default()).unwrap();
        let metrics = process_metrics(&outcome);
        assert_eq!(metrics[0].response, 0);
        assert_eq!(metrics[1].response, 2);
    }

    #[test]
    fn comparison_table_has_a_row_per_policy() {
        let workload = two_jobs();
        let summaries: Vec<_> = Policy::ALL
            .iter()
            .map(|&p| summarize(&run_policy(p, &workload, SimConfig::default()).unwrap()))
            .collect();
        let table = render_comparison(&summaries);
        assert_eq!(table.lines().count(), 5);
        assert!(table.contains("SRTF"));
    }

    #[test]
    fn trace_lists_every_entry() {
        let outcome = run_policy(Policy::Fcfs, &two_jobs(), SimConfig::default()).unwrap();
        let trace = render_trace(&outcome);
        assert_eq!(trace.lines().count(), outcome.observer.trace().len());
        assert!(trace.contains("Dispatch"));
    }
}
