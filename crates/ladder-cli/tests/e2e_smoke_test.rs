use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use ladder_cli::{Args, Format, run};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

fn args(input: &Path, output: PathBuf, format: Format) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        format,
        config: None,
        progress: None,
        positions: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let valid_fixtures = collect_json_files(fixtures_dir());

    assert!(
        !valid_fixtures.is_empty(),
        "No valid fixtures found in tests/fixtures/"
    );

    let mut failed_fixtures = Vec::new();

    for fixture_path in &valid_fixtures {
        let stem = fixture_path.file_stem().unwrap().to_string_lossy();
        for (format, extension) in [(Format::Svg, "svg"), (Format::Json, "json")] {
            let output_path = temp_dir.path().join(format!("{stem}.{extension}"));

            if let Err(e) = run(&args(fixture_path, output_path.clone(), format)) {
                failed_fixtures.push((fixture_path.clone(), e));
                continue;
            }

            let output = fs::read_to_string(&output_path).expect("Output was not written");
            assert!(!output.is_empty(), "{} produced empty output", stem);
        }
    }

    if !failed_fixtures.is_empty() {
        eprintln!("\nValid fixtures that failed:");
        for (path, err) in &failed_fixtures {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!(
            "{} valid fixture(s) failed unexpectedly",
            failed_fixtures.len()
        );
    }

    println!("✅ All {} valid fixtures passed", valid_fixtures.len());
}

#[test]
fn e2e_smoke_test_error_fixtures() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_fixtures = collect_json_files(fixtures_dir().join("errors"));

    assert!(
        !error_fixtures.is_empty(),
        "No error fixtures found in tests/fixtures/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for fixture_path in &error_fixtures {
        let output_path = temp_dir.path().join(format!(
            "error_{}.svg",
            fixture_path.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args(fixture_path, output_path, Format::Svg)).is_ok() {
            unexpectedly_succeeded.push(fixture_path.clone());
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError fixtures that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error fixture(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_overlays_and_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let overlays = fixtures_dir().join("overlays");

    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[style]\nbackground_color = \"#fafafa\"\n\n[layout]\nstage_spacing = 80.0\n",
    )
    .expect("Failed to write config");

    let input = fixtures_dir().join("purchase_order.json");
    let output_path = temp_dir.path().join("purchase_order.json");
    let mut cli_args = args(&input, output_path.clone(), Format::Json);
    cli_args.config = Some(config_path.to_string_lossy().to_string());
    cli_args.progress = Some(
        overlays
            .join("purchase_order.progress.json")
            .to_string_lossy()
            .to_string(),
    );
    cli_args.positions = Some(
        overlays
            .join("purchase_order.positions.json")
            .to_string_lossy()
            .to_string(),
    );

    run(&cli_args).expect("Run with overlays failed");

    let output = fs::read_to_string(&output_path).expect("Output was not written");
    assert!(output.contains("\"stage_aware\""));
    assert!(output.contains("\"rejected\""));
    assert!(output.contains("120.5"));

    cli_args.format = Format::Svg;
    cli_args.output = temp_dir
        .path()
        .join("purchase_order.svg")
        .to_string_lossy()
        .to_string();
    run(&cli_args).expect("SVG run with overlays failed");
    let svg = fs::read_to_string(&cli_args.output).expect("Output was not written");
    assert!(svg.contains("height=\"100%\""));
}

#[test]
fn e2e_missing_inputs_fail() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = fixtures_dir().join("purchase_order.json");

    let mut missing_config = args(&input, temp_dir.path().join("a.svg"), Format::Svg);
    missing_config.config = Some("does/not/exist.toml".to_string());
    assert!(run(&missing_config).is_err());

    let mut missing_progress = args(&input, temp_dir.path().join("b.svg"), Format::Svg);
    missing_progress.progress = Some("does/not/exist.json".to_string());
    assert!(run(&missing_progress).is_err());

    let missing_input = args(
        &fixtures_dir().join("nope.json"),
        temp_dir.path().join("c.svg"),
        Format::Svg,
    );
    assert!(run(&missing_input).is_err());
}
