use std::{
    env,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process,
};

use cpr_trainer::{
    metrics::{CompressionStateEngine, Phase, StatusSnapshot},
    telemetry::{write_phase_line, write_status_line},
};

#[derive(Clone, Copy)]
struct ReplaySample {
    ms: u32,
    raw: u16,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let mut trace_path: Option<PathBuf> = None;
    let mut expect_path: Option<PathBuf> = None;

    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--expect" => {
                idx += 1;
                let Some(path) = args.get(idx) else {
                    return Err("missing path after --expect".into());
                };
                expect_path = Some(PathBuf::from(path));
            }
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            value if value.starts_with('-') => {
                return Err(format!("unknown argument: {value}"));
            }
            value => {
                if trace_path.is_some() {
                    return Err("multiple trace paths provided".into());
                }
                trace_path = Some(PathBuf::from(value));
            }
        }
        idx += 1;
    }

    let trace_path = trace_path.ok_or_else(usage)?;
    let samples = parse_trace(&trace_path)?;

    let mut engine = CompressionStateEngine::default();
    let mut phases: Vec<Phase> = Vec::new();
    let mut last: Option<StatusSnapshot> = None;
    for sample in &samples {
        let before = engine.phase();
        let snapshot = engine.process_sample(sample.raw, sample.ms);
        if snapshot.phase != before {
            let mut line = String::new();
            write_phase_line(snapshot.phase, sample.ms, &mut line).map_err(|e| e.to_string())?;
            println!("{line}");
            phases.push(snapshot.phase);
        }
        last = Some(snapshot);
    }

    if let Some(snapshot) = &last {
        let mut line = String::new();
        write_status_line(snapshot, &mut line).map_err(|e| e.to_string())?;
        println!("{line}");
    }

    if let Some(expect_path) = expect_path {
        let expected = parse_expected_phases(&expect_path)?;
        let actual: Vec<&'static str> = phases.iter().map(|phase| phase.label()).collect();
        if actual != expected {
            eprintln!("expected phases: {}", expected.join(","));
            eprintln!("actual phases:   {}", actual.join(","));
            return Err("phase sequence mismatch".into());
        }
    }

    Ok(())
}

fn usage() -> String {
    "usage: sample_replay <trace.csv> [--expect expected_phases.txt]".to_string()
}

fn parse_trace(path: &Path) -> Result<Vec<ReplaySample>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out: Vec<ReplaySample> = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "ms,raw" {
            continue;
        }

        let Some((ms, raw)) = trimmed.split_once(',') else {
            return Err(format!(
                "{}:{} invalid trace line, expected ms,raw",
                path.display(),
                line_no
            ));
        };
        out.push(ReplaySample {
            ms: parse_field(ms, path, line_no, "ms")?,
            raw: parse_field(raw, path, line_no, "raw")?,
        });
    }

    Ok(out)
}

fn parse_expected_phases(path: &Path) -> Result<Vec<&'static str>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);

    let mut phases = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }

        let normalized = normalize_phase(token).ok_or_else(|| {
            format!(
                "{}:{} invalid expected phase: {}",
                path.display(),
                line_no,
                token
            )
        })?;
        phases.push(normalized);
    }

    Ok(phases)
}

fn normalize_phase(phase: &str) -> Option<&'static str> {
    match phase.trim().to_ascii_lowercase().as_str() {
        "pause" | "quiet" => Some(Phase::Quiet.label()),
        "compression" => Some(Phase::Compression.label()),
        "recoil" => Some(Phase::Recoil.label()),
        _ => None,
    }
}

fn parse_field<T>(raw: &str, path: &Path, line_no: usize, field: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| {
        format!(
            "{}:{} invalid {} '{}': {}",
            path.display(),
            line_no,
            field,
            raw.trim(),
            e
        )
    })
}
