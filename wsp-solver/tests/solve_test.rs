#![cfg(test)] // workaround for https://github.com/rust-lang/rust-clippy/issues/11024

mod helpers;

use helpers::instance_path;
use helpers::run_solver;
use helpers::scratch_path;
use regex::Regex;

#[test]
fn scenario_is_solved_in_every_mode() {
    for mode in ["cs", "pbpb", "udpb"] {
        let output = run_solver(
            &format!("scenario_1_{mode}"),
            [
                "solve".as_ref(),
                instance_path("scenario_1.wsp").as_os_str(),
                "--mode".as_ref(),
                mode.as_ref(),
            ],
        );

        assert!(output.success, "{mode}: {}", output.stderr);
        assert!(output.stdout.starts_with("sat\n"), "{mode}: {}", output.stdout);
        for line in ["Step 1 -> User 1", "Step 2 -> User 2", "Step 3 -> User 3"] {
            assert!(output.stdout.contains(line), "{mode}: {}", output.stdout);
        }
    }
}

#[test]
fn unique_solution_is_reported() {
    let output = run_solver(
        "scenario_1_unique",
        [
            "solve".as_ref(),
            instance_path("scenario_1.wsp").as_os_str(),
            "--check-uniqueness".as_ref(),
        ],
    );

    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.contains("% the solution is unique"));
}

#[test]
fn disabling_authorizations_gives_multiple_solutions() {
    let output = run_solver(
        "scenario_1_without_authorizations",
        [
            "solve".as_ref(),
            instance_path("scenario_1.wsp").as_os_str(),
            "--check-uniqueness".as_ref(),
            "--disable".as_ref(),
            "authorization".as_ref(),
        ],
    );

    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.contains("% the solution is not unique"));
}

#[test]
fn binding_the_separated_steps_is_unsatisfiable() {
    let output = run_solver(
        "scenario_2",
        ["solve".as_ref(), instance_path("scenario_2.wsp").as_os_str()],
    );

    assert!(output.success, "{}", output.stderr);
    assert!(output.stdout.starts_with("unsat\n"), "{}", output.stdout);
    assert!(!output.stdout.contains("Step"));
}

#[test]
fn written_solution_is_verified() {
    let solution_path = scratch_path("mixed.sol");
    let solved = run_solver(
        "mixed_solve",
        [
            "solve".as_ref(),
            instance_path("mixed.wsp").as_os_str(),
            "--mode".as_ref(),
            "udpb".as_ref(),
            "--solution-path".as_ref(),
            solution_path.as_os_str(),
        ],
    );
    assert!(solved.success, "{}", solved.stderr);
    assert!(solved.stdout.starts_with("sat\n"), "{}", solved.stdout);

    let verified = run_solver(
        "mixed_verify",
        [
            "verify".as_ref(),
            instance_path("mixed.wsp").as_os_str(),
            solution_path.as_os_str(),
        ],
    );

    assert!(verified.success, "{}", verified.stderr);
    let summary = Regex::new(r"all \d+ checks satisfied").expect("valid regex");
    assert!(summary.is_match(&verified.stdout), "{}", verified.stdout);

    std::fs::remove_file(solution_path).expect("Failed to remove solution file.");
}

#[test]
fn statistics_are_logged_on_request() {
    let output = run_solver(
        "scenario_1_statistics",
        [
            "solve".as_ref(),
            instance_path("scenario_1.wsp").as_os_str(),
            "--log-statistics".as_ref(),
        ],
    );

    assert!(output.success, "{}", output.stderr);
    for statistic in [
        r"%%%wsp-stat: numSteps=3",
        r"%%%wsp-stat: numVariables=\d+",
        r"%%%wsp-stat: solveTimeMs=\d+",
        r"%%%wsp-stat: verified=true",
    ] {
        let regex = Regex::new(statistic).expect("valid regex");
        assert!(regex.is_match(&output.stdout), "{statistic}: {}", output.stdout);
    }
    assert!(output.stdout.contains("%%%wsp-stat-end"));
}

#[test]
fn malformed_instance_is_rejected() {
    let output = run_solver(
        "undeclared_step",
        ["solve".as_ref(), instance_path("undeclared_step.wsp").as_os_str()],
    );

    assert!(!output.success);
    assert!(output.stderr.contains("malformed"), "{}", output.stderr);
}
