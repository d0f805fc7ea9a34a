mod os_signal_termination;
mod result;

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use log::debug;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use os_signal_termination::OsSignal;
use result::WspSolverError;
use result::WspSolverResult;
use wsp_solver::core::backend::BackendKind;
use wsp_solver::core::backend::BackendResult;
use wsp_solver::core::backend::ExhaustiveSearch;
use wsp_solver::core::compile_with_options;
use wsp_solver::core::constraints::ConstraintKind;
use wsp_solver::core::convert_case::Case;
use wsp_solver::core::encoding::write_opb;
use wsp_solver::core::encoding::EncodingMode;
use wsp_solver::core::encoding::EncodingModel;
use wsp_solver::core::enumset::EnumSet;
use wsp_solver::core::instance::Instance;
use wsp_solver::core::options::DepartmentPool;
use wsp_solver::core::options::SemanticOptions;
use wsp_solver::core::options::UnlistedUserPolicy;
use wsp_solver::core::statistics::configure_statistic_logging;
use wsp_solver::core::statistics::log_statistic;
use wsp_solver::core::statistics::log_statistic_postfix;
use wsp_solver::core::termination::Combinator;
use wsp_solver::core::termination::TimeBudget;
use wsp_solver::core::verify_with_options;
use wsp_solver::file_format::read_instance;
use wsp_solver::file_format::read_solution;
use wsp_solver::file_format::write_solution;
use wsp_solver::file_format::SolutionFile;
use wsp_solver::file_format::SolutionStatus;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log the progress of every phase, instead of only warnings.
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Write statistics such as the model size and timings to stdout.
    #[arg(short = 's', long = "log-statistics", global = true)]
    log_statistics: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile an instance and print or export the resulting model.
    Compile {
        #[command(flatten)]
        model: ModelArgs,

        /// The representation of the model.
        ///
        /// The OPB format is only available for the pseudo-boolean modes.
        #[arg(long, value_enum, default_value_t)]
        format: ModelFormat,

        /// Where to write the model; stdout if not given.
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Compile an instance, solve it and verify the solution found.
    Solve {
        #[command(flatten)]
        model: ModelArgs,

        #[arg(long, value_enum, default_value_t)]
        backend: BackendKind,

        /// The time limit in milliseconds.
        #[arg(short = 't', long = "time-limit")]
        time_limit: Option<u64>,

        /// After finding a solution, search for a second one and report whether the solution is
        /// unique.
        #[arg(long = "check-uniqueness")]
        check_uniqueness: bool,

        /// Also write the solution file to this path.
        #[arg(long = "solution-path")]
        solution_path: Option<PathBuf>,
    },
    /// Verify a solution file against an instance.
    ///
    /// Exits with a non-zero status if any check is violated.
    Verify {
        /// The instance file.
        instance_path: PathBuf,

        /// The solution file, as written by `solve`.
        solution_path: PathBuf,

        #[command(flatten)]
        semantics: SemanticArgs,
    },
}

#[derive(Debug, Args)]
struct ModelArgs {
    /// The instance file.
    instance_path: PathBuf,

    #[arg(short = 'm', long, value_enum, default_value_t = EncodingMode::PatternBased)]
    mode: EncodingMode,

    #[command(flatten)]
    semantics: SemanticArgs,
}

#[derive(Debug, Args)]
struct SemanticArgs {
    /// Constraint kinds to ignore; may be given multiple times.
    #[arg(long = "disable", value_enum)]
    disabled: Vec<ConstraintKind>,

    /// Which steps users without any authorization may perform.
    #[arg(long = "unlisted-users", value_enum, default_value_t)]
    unlisted_users: UnlistedUserPolicy,

    /// Which users count when deciding whether a department covers a step.
    #[arg(long = "department-pool", value_enum, default_value_t)]
    department_pool: DepartmentPool,
}

impl SemanticArgs {
    fn active(&self) -> EnumSet<ConstraintKind> {
        let disabled = self.disabled.iter().copied().collect::<EnumSet<_>>();
        ConstraintKind::all() - disabled
    }

    fn options(&self) -> SemanticOptions {
        SemanticOptions {
            unlisted_users: self.unlisted_users,
            department_pool: self.department_pool,
        }
    }
}

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModelFormat {
    #[default]
    Text,
    Opb,
}

fn configure_logging(verbose: bool, log_statistics: bool) {
    if log_statistics {
        configure_statistic_logging(
            "%%%wsp-stat:",
            Some("%%%wsp-stat-end"),
            Some(Case::Camel),
            None,
        );
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "% ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stderr)
        .init();
    info!("Logging successfully configured");
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> WspSolverResult<()> {
    let cli = Cli::parse();

    configure_logging(cli.verbose, cli.log_statistics);

    if wsp_solver::core::asserts::WSP_ASSERT_LEVEL_DEFINITION
        >= wsp_solver::core::asserts::WSP_ASSERT_MODERATE
    {
        warn!(
            "Potential performance degradation: the assert level is set to {}, meaning many debug asserts are active which may result in performance degradation.",
            wsp_solver::core::asserts::WSP_ASSERT_LEVEL_DEFINITION
        );
    }

    let result = match cli.command {
        Command::Compile {
            model,
            format,
            output,
        } => compile(&model, format, output.as_deref()),
        Command::Solve {
            model,
            backend,
            time_limit,
            check_uniqueness,
            solution_path,
        } => solve(
            &model,
            backend,
            time_limit.map(Duration::from_millis),
            check_uniqueness,
            solution_path.as_deref(),
        ),
        Command::Verify {
            instance_path,
            solution_path,
            semantics,
        } => verify(&instance_path, &solution_path, &semantics),
    };

    log_statistic_postfix();
    result
}

fn load_instance(path: &Path) -> WspSolverResult<Instance> {
    let file = File::open(path)?;
    let record =
        read_instance(file).map_err(|error| WspSolverError::invalid_file(path.display(), error))?;
    let instance = Instance::new(record)?;

    log_statistic("numSteps", instance.num_steps());
    log_statistic("numUsers", instance.num_users());
    for (kind, count) in instance.constraint_counts() {
        log_statistic(format!("num {kind} constraints"), count);
    }

    Ok(instance)
}

fn compile_model(instance: &Instance, args: &ModelArgs) -> WspSolverResult<EncodingModel> {
    let start = Instant::now();
    let model = compile_with_options(
        instance,
        args.semantics.active(),
        args.mode,
        args.semantics.options(),
    )?;

    log_statistic("compileTimeMs", start.elapsed().as_millis());
    model.statistics().log();
    Ok(model)
}

fn compile(args: &ModelArgs, format: ModelFormat, output: Option<&Path>) -> WspSolverResult<()> {
    let instance = load_instance(&args.instance_path)?;
    let model = compile_model(&instance, args)?;

    let mut writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    match format {
        ModelFormat::Text => write!(writer, "{model}")?,
        ModelFormat::Opb => write_opb(&model, &mut writer)?,
    }
    writer.flush()?;

    Ok(())
}

fn solve(
    args: &ModelArgs,
    backend_kind: BackendKind,
    time_limit: Option<Duration>,
    check_uniqueness: bool,
    solution_path: Option<&Path>,
) -> WspSolverResult<()> {
    let instance = load_instance(&args.instance_path)?;
    let model = compile_model(&instance, args)?;

    let mut backend = backend_kind.create();
    if !backend.supports(model.mode()) {
        return Err(WspSolverError::UnsupportedBackend {
            backend: backend.name(),
            mode: model.mode().to_string(),
        });
    }

    let mut termination = Combinator::new(
        OsSignal::install()?,
        time_limit.map(TimeBudget::starting_now),
    );

    let start = Instant::now();
    let result = backend.solve(&model, &mut termination);
    let elapsed = start.elapsed();
    log_statistic("solveTimeMs", elapsed.as_millis());
    debug!("{} backend finished after {elapsed:?}", backend.name());

    let solution = match result {
        BackendResult::Satisfiable(assignment) => {
            let report = verify_with_options(
                &instance,
                &assignment,
                args.semantics.active(),
                args.semantics.options(),
            );
            log_statistic("verified", report.all_satisfied());
            if !report.all_satisfied() {
                println!("{report}");
                return Err(WspSolverError::VerificationFailed {
                    violated: report.num_violated(),
                    total: report.outcomes().len(),
                });
            }

            if check_uniqueness {
                let enumeration =
                    ExhaustiveSearch::default().enumerate(&model, 2, &mut termination);
                if enumeration.solutions.len() > 1 {
                    println!("% the solution is not unique");
                } else if enumeration.is_complete {
                    println!("% the solution is unique");
                } else {
                    warn!("Uniqueness could not be decided within the limits");
                }
            }

            SolutionFile {
                status: SolutionStatus::Satisfiable,
                elapsed,
                assignment,
            }
        }
        BackendResult::Unsatisfiable { diagnostic } => {
            if let Some(diagnostic) = diagnostic {
                info!("The instance is unsatisfiable: {diagnostic}");
            }
            SolutionFile {
                status: SolutionStatus::Unsatisfiable,
                elapsed,
                assignment: Default::default(),
            }
        }
        BackendResult::Unknown => SolutionFile {
            status: SolutionStatus::Unknown,
            elapsed,
            assignment: Default::default(),
        },
    };

    write_solution(&solution, std::io::stdout().lock())?;
    if let Some(path) = solution_path {
        let mut writer = BufWriter::new(File::create(path)?);
        write_solution(&solution, &mut writer)?;
        writer.flush()?;
    }

    Ok(())
}

fn verify(
    instance_path: &Path,
    solution_path: &Path,
    semantics: &SemanticArgs,
) -> WspSolverResult<()> {
    let instance = load_instance(instance_path)?;
    let solution = read_solution(File::open(solution_path)?)
        .map_err(|error| WspSolverError::invalid_file(solution_path.display(), error))?;

    if solution.status != SolutionStatus::Satisfiable {
        println!(
            "% the solution file reports '{}', nothing to verify",
            solution.status
        );
        return Ok(());
    }

    let report = verify_with_options(
        &instance,
        &solution.assignment,
        semantics.active(),
        semantics.options(),
    );
    log_statistic("verified", report.all_satisfied());
    println!("{report}");

    if report.all_satisfied() {
        Ok(())
    } else {
        Err(WspSolverError::VerificationFailed {
            violated: report.num_violated(),
            total: report.outcomes().len(),
        })
    }
}
