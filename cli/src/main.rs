mod test_runner;

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process;

use buddy::UnitName;
use clap::{Parser, Subcommand};
use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use tracing::debug;

use tdil::{CompileError, CompileOptions, Compiler, ScenarioRecord, SiblingResolver, UnitResolver};

#[derive(Parser)]
#[command(name = "buddy", version, about = "Compiler from German test steps to TDIL")]
struct Cli {
    /// Disable colored error output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a scenario record into a TDIL unit
    Compile(CompileArgs),

    /// Compile a scenario record without writing the result
    Check(CheckArgs),

    /// Run .case.toml test files
    Test(TestArgs),
}

#[derive(clap::Args)]
struct CompileArgs {
    /// Scenario record (TOML)
    file: String,

    /// Write the unit to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Compile options (TOML)
    #[arg(long)]
    config: Option<String>,

    /// Directory generated units are stored under. Defaults to the record's directory
    #[arg(long)]
    root: Option<String>,

    /// Print the files of the included units instead of the unit itself
    #[arg(long)]
    includes: bool,
}

#[derive(clap::Args)]
struct CheckArgs {
    /// Scenario record (TOML)
    file: String,

    /// Compile options (TOML)
    #[arg(long)]
    config: Option<String>,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .case.toml file or directory containing them
    path: String,

    /// Run only cases in these categories (subfolder names). Repeatable.
    #[arg(short, long)]
    category: Vec<String>,

    /// List available categories and exit
    #[arg(long)]
    list_categories: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Compile(args) => do_compile(args, cli.no_color),
        Command::Check(args) => do_check(args, cli.no_color),
        Command::Test(args) => {
            let path = Path::new(&args.path);
            if args.list_categories {
                test_runner::list_categories(path);
                return;
            }
            let exit_code = test_runner::run_tests(path, cli.no_color, &args.category);
            process::exit(exit_code);
        }
    }
}

/// Install a `tracing` subscriber filtered by `RUST_LOG`, if it is set.
fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

/// A loaded scenario record together with its source text for diagnostics.
struct Input {
    files: SimpleFiles<String, String>,
    file_id: usize,
    record: ScenarioRecord,
}

impl Input {
    fn source(&self) -> &str {
        self.files
            .get(self.file_id)
            .map(|file| file.source().as_str())
            .unwrap_or_default()
    }
}

fn color_choice(no_color: bool) -> ColorChoice {
    if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    }
}

fn emit(no_color: bool, files: &SimpleFiles<String, String>, diagnostic: &Diagnostic<usize>) {
    let writer = StandardStream::stderr(color_choice(no_color));
    let config = term::Config::default();
    let _ = term::emit_to_write_style(&mut writer.lock(), &config, files, diagnostic);
}

fn read_or_exit(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn load_input(path: &str, no_color: bool) -> Input {
    let source = read_or_exit(path);
    let mut files = SimpleFiles::new();
    let file_id = files.add(path.to_string(), source.clone());

    match toml::from_str::<ScenarioRecord>(&source) {
        Ok(record) => Input {
            files,
            file_id,
            record,
        },
        Err(e) => {
            let mut diagnostic = Diagnostic::error().with_message(format!(
                "invalid scenario record: {}",
                e.message()
            ));
            if let Some(span) = e.span() {
                diagnostic = diagnostic.with_labels(vec![Label::primary(file_id, span)]);
            }
            emit(no_color, &files, &diagnostic);
            process::exit(1);
        }
    }
}

fn load_options(path: Option<&str>) -> CompileOptions {
    let Some(path) = path else {
        return CompileOptions::default();
    };
    match toml::from_str(&read_or_exit(path)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: invalid compile options in '{}': {}", path, e);
            process::exit(1);
        }
    }
}

fn compiler_or_exit(options: CompileOptions) -> Compiler {
    match Compiler::new(options) {
        Ok(compiler) => compiler,
        Err(e) => {
            eprintln!("internal error: {}", e);
            process::exit(2);
        }
    }
}

/// Byte range of the failing step inside the record source, if the step
/// text appears there verbatim.
fn step_span(input: &Input, error: &CompileError) -> Option<Range<usize>> {
    let sentence = input.record.steps.get(error.step()?)?;
    let start = input.source().find(sentence.as_str())?;
    Some(start..start + sentence.len())
}

fn report_compile_error(input: &Input, error: &CompileError, no_color: bool) {
    let mut diagnostic = Diagnostic::error().with_message(error.to_string());
    if let Some(span) = step_span(input, error) {
        diagnostic = diagnostic.with_labels(vec![
            Label::primary(input.file_id, span).with_message("this step does not compile"),
        ]);
    }
    emit(no_color, &input.files, &diagnostic);
}

fn do_compile(args: CompileArgs, no_color: bool) {
    let input = load_input(&args.file, no_color);
    let compiler = compiler_or_exit(load_options(args.config.as_deref()));

    let root = args.root.map(PathBuf::from).unwrap_or_else(|| {
        Path::new(&args.file)
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let resolver = SiblingResolver::new(root);

    if args.includes {
        match included_units(&compiler, &input.record, &resolver) {
            Ok(units) => {
                for unit in units {
                    println!("{}", resolver.path_for(&unit).display());
                }
            }
            Err(error) => {
                report_compile_error(&input, &error, no_color);
                process::exit(1);
            }
        }
        return;
    }

    let unit = match compiler.compile(&input.record, &resolver) {
        Ok(unit) => unit,
        Err(error) => {
            report_compile_error(&input, &error, no_color);
            process::exit(1);
        }
    };

    match args.output {
        Some(output) => {
            if let Err(e) = std::fs::write(&output, unit) {
                eprintln!("error: cannot write '{}': {}", output, e);
                process::exit(1);
            }
            debug!(output, "unit written");
        }
        None => print!("{}", unit),
    }
}

fn included_units(
    compiler: &Compiler,
    record: &ScenarioRecord,
    resolver: &SiblingResolver,
) -> Result<Vec<UnitName>, CompileError> {
    let unit = tdil::unit_name(record)?;
    let compiled = compiler.compile_steps(record)?;
    Ok(tdil::resolve_includes(&unit, &compiled.context, resolver)?)
}

fn do_check(args: CheckArgs, no_color: bool) {
    let input = load_input(&args.file, no_color);
    let compiler = compiler_or_exit(load_options(args.config.as_deref()));
    let resolver = SiblingResolver::new(".");

    match compiler.compile(&input.record, &resolver) {
        Ok(_) => eprintln!(
            "ok: {} compiles ({} steps)",
            args.file,
            input.record.steps.len()
        ),
        Err(error) => {
            report_compile_error(&input, &error, no_color);
            process::exit(1);
        }
    }
}
