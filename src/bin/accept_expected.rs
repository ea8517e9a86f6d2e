//! Binary to generate/update the .expected.* files of the golden tests
//!
//! Usage:
//!   cargo run --bin accept_expected            # Update all
//!   cargo run --bin accept_expected -- basic   # Update only cases matching "basic"

use std::fs;
use std::path::Path;
use vk_dispatch_gen::{ArtifactKind, Config, Pipeline, Tables};
use walkdir::WalkDir;

fn main() {
    let filter: Option<String> = std::env::args().nth(1);
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("expected");

    let mut updated = 0;
    let mut skipped = 0;

    for entry in WalkDir::new(&test_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() == "tables.json")
    {
        let Some(case_dir) = entry.path().parent() else {
            continue;
        };

        if let Some(ref f) = filter {
            if !case_dir.to_string_lossy().contains(f.as_str()) {
                skipped += 1;
                continue;
            }
        }

        process_case(case_dir);
        updated += 1;
    }

    println!("Updated {} cases, skipped {}", updated, skipped);
}

fn process_case(case_dir: &Path) {
    let tables = match fs::read_to_string(case_dir.join("tables.json"))
        .map_err(|e| e.to_string())
        .and_then(|text| Tables::from_json(&text).map_err(|e| e.to_string()))
    {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Failed to load tables in {:?}: {}", case_dir, e);
            return;
        }
    };

    let pipeline = match Pipeline::new(Config::default(), tables) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            eprintln!("Invalid tables in {:?}: {}", case_dir, e);
            return;
        }
    };

    for kind in ArtifactKind::ALL {
        let relative = pipeline.config().artifact_path(kind);
        let Some(file_name) = relative.file_name() else {
            continue;
        };
        let input = case_dir.join(file_name);
        let source = match fs::read_to_string(&input) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to read {:?}: {}", input, e);
                continue;
            }
        };

        let expected_ok = input.with_extension(format!("expected.{}", extension_of(&input)));
        let expected_err = input.with_extension(format!("expected.{}.err", extension_of(&input)));

        match pipeline.render(kind, &source, Path::new(file_name)) {
            Ok(output) => {
                write_expected(&expected_ok, &output);
                if expected_err.exists() {
                    let _ = fs::remove_file(&expected_err);
                }
            }
            Err(e) => {
                write_expected(&expected_err, &e.render());
                if expected_ok.exists() {
                    let _ = fs::remove_file(&expected_ok);
                }
            }
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn write_expected(path: &Path, contents: &str) {
    if let Err(e) = fs::write(path, contents) {
        eprintln!("Failed to write {:?}: {}", path, e);
    } else {
        println!("  wrote {}", path.display());
    }
}
