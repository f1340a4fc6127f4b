use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use tdil::{CompileOptions, Compiler, ScenarioRecord};

const CASE_SUFFIX: &str = ".case.toml";

/// A test case: a scenario record plus what compiling its steps must yield.
#[derive(Debug, Deserialize)]
pub struct CaseFile {
    /// Human-readable case description.
    #[serde(default)]
    pub description: Option<String>,

    #[serde(flatten)]
    pub record: ScenarioRecord,

    /// Expected directives, one per step, compared exactly.
    #[serde(default)]
    pub expect_directives: Option<Vec<String>>,

    /// Expected alias declarations in first-seen order.
    #[serde(default)]
    pub expect_aliases: Option<Vec<String>>,

    /// Expected compile error: its message must contain this substring.
    #[serde(default)]
    pub expect_error: Option<String>,
}

pub enum CaseOutcome {
    Pass,
    Fail(String),
}

pub struct CaseResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: CaseOutcome,
}

impl CaseResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_name()
                .and_then(|s| s.to_str())
                .map(|name| name.trim_end_matches(CASE_SUFFIX))
                .unwrap_or("?")
        })
    }
}

fn check_case(case: &CaseFile, compiler: &Compiler) -> Option<String> {
    let compiled = compiler.compile_steps(&case.record);

    let compiled = match (&case.expect_error, compiled) {
        (Some(expected), Err(error)) => {
            let message = error.to_string();
            return (!message.contains(expected.as_str())).then(|| {
                format!(
                    "expected error containing \"{}\", got: {}",
                    expected, message
                )
            });
        }
        (Some(expected), Ok(_)) => {
            return Some(format!(
                "expected error containing \"{}\", but compilation succeeded",
                expected
            ));
        }
        (None, Err(error)) => return Some(format!("unexpected compile error: {}", error)),
        (None, Ok(compiled)) => compiled,
    };

    if let Some(expected) = &case.expect_directives {
        if *expected != compiled.directives {
            return Some(format!(
                "directive mismatch\n  expected: {:?}\n  actual:   {:?}",
                expected, compiled.directives
            ));
        }
    }

    if let Some(expected) = &case.expect_aliases {
        if expected.as_slice() != compiled.context.aliases() {
            return Some(format!(
                "alias mismatch\n  expected: {:?}\n  actual:   {:?}",
                expected,
                compiled.context.aliases()
            ));
        }
    }

    None
}

fn run_case(path: &Path, compiler: &Compiler) -> CaseResult {
    let failed = |reason: String| CaseResult {
        path: path.to_path_buf(),
        description: None,
        outcome: CaseOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return failed(format!("cannot read file: {}", e)),
    };
    let case: CaseFile = match toml::from_str(&content) {
        Ok(case) => case,
        Err(e) => return failed(format!("TOML parse error: {}", e)),
    };

    CaseResult {
        path: path.to_path_buf(),
        description: case.description.clone(),
        outcome: match check_case(&case, compiler) {
            Some(reason) => CaseOutcome::Fail(reason),
            None => CaseOutcome::Pass,
        },
    }
}

/// Discover case files grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_cases(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_cases(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_cases(&path, root, out);
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(CASE_SUFFIX))
        {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

/// List available categories for the given case path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no {} files found in {}", CASE_SUFFIX, path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} cases)", category_label(category), files.len());
    }
}

fn paint(text: &str, code: &str, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    }
}

/// Keep the categories named in `requested`, including their subfolders.
fn select_categories<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a Vec<PathBuf>> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v)).collect();
    }

    let mut selected = BTreeMap::new();
    for request in requested {
        let request = request.trim_matches('/');
        let prefix = format!("{}/", request);
        let before = selected.len();
        for (category, files) in all {
            if category == request || category.starts_with(&prefix) {
                selected.insert(category.as_str(), files);
            }
        }
        if selected.len() == before {
            eprintln!(
                "warning: category '{}' not found (available: {})",
                request,
                all.keys()
                    .map(|k| category_label(k))
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    selected
}

/// Run all case files under `path` (or a single file).
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let compiler = match Compiler::new(CompileOptions::default()) {
        Ok(compiler) => compiler,
        Err(e) => {
            eprintln!("internal error: {}", e);
            return 2;
        }
    };

    let all = if path.is_file() {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        discover_categorized(path)
    };
    if all.is_empty() {
        eprintln!("no {} files found in {}", CASE_SUFFIX, path.display());
        return 1;
    }

    let selected = select_categories(&all, categories);
    if selected.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<CaseResult> = Vec::new();

    for (category, files) in &selected {
        if !path.is_file() {
            eprintln!();
            eprintln!("{}", paint(category_label(category), "1", no_color));
        }
        for file in *files {
            let result = run_case(file, &compiler);
            match result.outcome {
                CaseOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", paint("PASS", "32", no_color), result.label());
                }
                CaseOutcome::Fail(_) => {
                    eprintln!("  {}  {}", paint("FAIL", "31", no_color), result.label());
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            if let CaseOutcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!("test result: {}. {} passed, 0 failed", paint("ok", "32", no_color), passed);
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            paint("FAILED", "31", no_color),
            passed,
            failures.len(),
            passed + failures.len()
        );
        1
    }
}
