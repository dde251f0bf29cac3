use std::{fs, path::PathBuf};

use tempfile::tempdir;

use graffle_cli::{Args, CliError, run};

/// Collects all .graffle files from a directory
fn collect_graffle_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("graffle")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demos are at workspace root, relative to workspace not the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args(input: &PathBuf, output: &PathBuf, page: Option<usize>) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        page,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_graffle_files(demos_path());
    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let output_filename = format!("{}.svg", demo_path.file_stem().unwrap().to_string_lossy());
        let output_path = temp_dir.path().join(output_filename);

        if let Err(e) = run(&args(demo_path, &output_path, None)) {
            failed_demos.push((demo_path.clone(), e));
            continue;
        }

        let svg = fs::read_to_string(&output_path).expect("output written");
        assert!(
            roxmltree::Document::parse(&svg).is_ok(),
            "{} produced malformed SVG",
            demo_path.display()
        );
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo(s) failed unexpectedly", failed_demos.len());
    }

    println!("✅ All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_graffle_files(demos_path().join("errors"));
    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_filename = format!(
            "error_{}.svg",
            demo_path.file_stem().unwrap().to_string_lossy()
        );
        let output_path = temp_dir.path().join(output_filename);

        if run(&args(demo_path, &output_path, None)).is_ok() {
            unexpectedly_succeeded.push(demo_path.clone());
        }
        assert!(!output_path.exists(), "failed run must not write output");
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!("✅ All {} error demos failed as expected", error_demos.len());
}

#[test]
fn e2e_page_selection() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("multi_sheet.graffle");

    let first = temp_dir.path().join("first.svg");
    run(&args(&input, &first, None)).unwrap();
    let second = temp_dir.path().join("second.svg");
    run(&args(&input, &second, Some(1))).unwrap();

    let first = fs::read_to_string(first).unwrap();
    let second = fs::read_to_string(second).unwrap();
    assert!(!first.contains("name"));
    assert!(second.contains("name"));

    let missing = temp_dir.path().join("missing.svg");
    let err = run(&args(&input, &missing, Some(5))).unwrap_err();
    assert!(matches!(err, CliError::Graffle(graffle::GraffleError::MalformedDocument(_))));
}

#[test]
fn e2e_missing_input() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("absent.graffle");
    let output = temp_dir.path().join("out.svg");

    let err = run(&args(&input, &output, None)).unwrap_err();
    assert!(matches!(err, CliError::Graffle(graffle::GraffleError::Io(_))));
}

#[test]
fn e2e_explicit_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[style]\nfill = \"#eeeeee\"\n").unwrap();

    let input = demos_path().join("legacy_canvas.graffle");
    let output = temp_dir.path().join("legacy.svg");
    let mut args = args(&input, &output, None);
    args.config = Some(config.to_string_lossy().to_string());

    run(&args).unwrap();
    let svg = fs::read_to_string(output).unwrap();
    assert!(svg.contains("fill:#eeeeee"));
}
