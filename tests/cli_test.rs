use std::process::Command;

fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .env("RUST_LOG", "warn,rail_sim=info")
        .output()
        .expect("Failed to execute simulation")
}

/// Test that the simulation runs headless and reports completion
#[test]
fn test_headless_simulation_runs() {
    let output = run_cli(&["--ticks", "50"]);

    assert!(
        output.status.success(),
        "Simulation failed to run. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("SIMULATION COMPLETE"),
        "Simulation did not complete properly. stderr: {}",
        stderr
    );
    assert!(stderr.contains("scenario loaded: initial configuration"));

    let ticks_line = stderr
        .lines()
        .find(|line| line.contains("Ticks run:"))
        .expect("Could not find 'Ticks run' line");
    let parts: Vec<&str> = ticks_line.split("Ticks run:").collect();
    let ticks: u32 = parts
        .get(1)
        .and_then(|s| s.trim().parse().ok())
        .expect("Could not parse tick count");
    assert_eq!(ticks, 50);
}

/// Test that the balise scenario logs the detection
#[test]
fn test_balise_scenario_logs_detection() {
    let output = run_cli(&["--scenario", "balise", "--ticks", "40", "--map"]);

    assert!(output.status.success(), "Simulation failed to run");

    let stderr = String::from_utf8_lossy(&output.stderr);
    let detections = stderr
        .lines()
        .filter(|line| line.contains("train 1 - restriction detected: 60 km/h"))
        .count();
    assert_eq!(detections, 1, "stderr: {}", stderr);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("=== Track ==="));
    assert!(stdout.contains("=== Final State ==="));
}

/// Test that an unknown scenario is rejected by the argument parser
#[test]
fn test_unknown_scenario_rejected() {
    let output = run_cli(&["--scenario", "derailment"]);
    assert!(!output.status.success());
}
