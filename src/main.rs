use std::{env, io::Write, process};

use des_sched::{
    Job, SimConfig, SimError, Workload, run_policy,
    config::{ConfigError, RunFile},
    scheduler::Policy,
    sim::{GeneratorConfig, WorkloadError, report},
};
use env_logger::Builder;
use thiserror::Error;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Workload(#[from] WorkloadError),
    #[error("simulation failed: {0}")]
    Sim(#[from] SimError),
    #[error("unknown argument {0:?}\nusage: des_sched [--trace] [RUN_FILE]")]
    Usage(String),
}

fn main() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let mut show_trace = false;
    let mut run_file = None;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--trace" => show_trace = true,
            flag if flag.starts_with('-') => return Err(AppError::Usage(flag.to_owned())),
            _ if run_file.is_none() => run_file = Some(arg),
            _ => return Err(AppError::Usage(arg)),
        }
    }

    match run_file {
        Some(path) => {
            let run = RunFile::load(path)?;
            let workload = Workload::from_source(&run.workload)?;
            compare("workload", &run.policies, &workload, run.config, show_trace)
        }
        None => demo(show_trace),
    }
}

fn demo(show_trace: bool) -> Result<(), AppError> {
    let config = SimConfig::default();

    let pair = Workload::new(vec![
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
    ])?;
    compare("two processes", &Policy::ALL, &pair, config, show_trace)?;

    let generated = Workload::generate(&GeneratorConfig {
        count: 12,
        arrival_rate: 0.5,
        service_rate: 0.2,
        seed: 42,
    })?;
    compare("generated (seed 42)", &Policy::ALL, &generated, config, show_trace)
}

fn compare(
    title: &str,
    policies: &[Policy],
    workload: &Workload,
    config: SimConfig,
    show_trace: bool,
) -> Result<(), AppError> {
    println!(
        "== {title}: {} processes, quantum {}, context switch {}",
        workload.len(),
        config.quantum,
        config.context_switch_time
    );

    let mut summaries = Vec::with_capacity(policies.len());
    for &policy in policies {
        let outcome = run_policy(policy, workload, config)?;
        let kind = if policy.is_preemptive() {
            "preemptive"
        } else {
            "non-preemptive"
        };
        println!("-- {policy} ({kind})");
        if show_trace {
            print!("{}", report::render_trace(&outcome));
        }
        print!("{}", report::render_processes(&outcome));
        summaries.push(report::summarize(&outcome));
    }

    println!();
    print!("{}", report::render_comparison(&summaries));
    println!();
    Ok(())
}
