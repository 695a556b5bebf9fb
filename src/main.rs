use clap::{Parser, Subcommand, ValueEnum};
use dbperf::backend::{
    MemoryBackend, MemorySearchBackend, SearchBackend, SqliteBackend, SqliteSearchBackend,
};
use dbperf::bench::{ComplexRecordGenerator, SimpleRecordGenerator, StageOrchestrator};
use dbperf::dataset::values::DEFAULT_SEED;
use dbperf::dataset::{FixtureGenerator, load_flat_fixture, load_relational_fixture};
use dbperf::error::{DbPerfError, Result};
use dbperf::logging::init_logging;
use dbperf::model::{ComplexRecord, SimpleRecord};
use dbperf::report::{HostProbe, SearchBenchmarkReport, SearchComparisonReport};
use dbperf::search::{SearchScenario, run_scenarios};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "dbperf", version, about = "Database CRUD and search benchmark harness")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a deterministic fixture file
    Generate {
        /// Fixture shape
        #[arg(value_enum)]
        kind: FixtureKind,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Number of records
        #[arg(short, long, default_value_t = 1_000_000)]
        count: usize,

        /// Generation seed
        #[arg(short, long, env = "DBPERF_SEED", default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Run the staged CRUD benchmark against one backend
    Bench {
        /// Backend under test
        #[arg(value_enum)]
        backend: BenchBackend,

        /// Record model
        #[arg(short, long, value_enum, default_value_t = Model::Simple)]
        model: Model,

        /// Comma-separated ascending stage sizes
        #[arg(long, value_delimiter = ',')]
        sizes: Option<Vec<usize>>,

        /// Database file for the sqlite backend
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Directory for the report artifact
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,
    },
    /// Run the search scenarios against a fixture
    Search {
        /// Backend under test
        #[arg(value_enum)]
        backend: SearchBackendKind,

        /// Fixture file to load
        #[arg(short, long)]
        fixture: PathBuf,

        /// Treat the fixture as relational (products + tags)
        #[arg(long)]
        relational: bool,

        /// Directory for the report artifact
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,
    },
    /// Aggregate saved search reports into a comparison
    Compare {
        /// Search report files to compare
        #[arg(required = true)]
        reports: Vec<PathBuf>,

        /// Directory for the comparison artifact
        #[arg(short, long, default_value = "reports")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FixtureKind {
    Flat,
    Relational,
}

#[derive(Clone, Copy, ValueEnum)]
enum BenchBackend {
    Memory,
    Sqlite,
    SqliteMemory,
}

#[derive(Clone, Copy, ValueEnum)]
enum Model {
    Simple,
    Complex,
}

#[derive(Clone, Copy, ValueEnum)]
enum SearchBackendKind {
    Memory,
    Sqlite,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let result = match cli.command {
        Commands::Generate {
            kind,
            output,
            count,
            seed,
        } => run_generate(kind, &output, count, seed),
        Commands::Bench {
            backend,
            model,
            sizes,
            db_path,
            output,
        } => run_bench(backend, model, sizes, db_path, &output),
        Commands::Search {
            backend,
            fixture,
            relational,
            output,
        } => run_search(backend, &fixture, relational, &output),
        Commands::Compare { reports, output } => run_compare(&reports, &output),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn run_generate(kind: FixtureKind, output: &PathBuf, count: usize, seed: u64) -> Result<()> {
    let generator = FixtureGenerator::new(seed);
    match kind {
        FixtureKind::Flat => generator.write_flat_fixture(output, count),
        FixtureKind::Relational => generator.write_relational_fixture(output, count),
    }
}

fn run_bench(
    backend: BenchBackend,
    model: Model,
    sizes: Option<Vec<usize>>,
    db_path: Option<PathBuf>,
    output: &PathBuf,
) -> Result<()> {
    let result = match (backend, model) {
        (BenchBackend::Memory, Model::Simple) => {
            let backend = MemoryBackend::new("memory", vec!["age"], |r: &SimpleRecord| {
                r.is_active && r.age > 30
            });
            orchestrate(backend, SimpleRecordGenerator, sizes)?
        }
        (BenchBackend::Memory, Model::Complex) => {
            let backend = MemoryBackend::new("memory", vec!["value"], |r: &ComplexRecord| {
                r.is_enabled && r.value > 50
            });
            orchestrate(backend, ComplexRecordGenerator, sizes)?
        }
        (BenchBackend::Sqlite, Model::Simple) => {
            let path = db_path.unwrap_or_else(|| PathBuf::from("dbperf-bench.sqlite"));
            orchestrate(SqliteBackend::open(path), SimpleRecordGenerator, sizes)?
        }
        (BenchBackend::SqliteMemory, Model::Simple) => {
            orchestrate(SqliteBackend::in_memory(), SimpleRecordGenerator, sizes)?
        }
        (BenchBackend::Sqlite | BenchBackend::SqliteMemory, Model::Complex) => {
            return Err(DbPerfError::invalid_data(
                "the complex model is only supported by the memory backend",
            ));
        }
    };

    let path = result.save(output)?;
    info!(path = %path.display(), "benchmark complete");
    Ok(())
}

fn orchestrate<B, G>(
    backend: B,
    generator: G,
    sizes: Option<Vec<usize>>,
) -> Result<dbperf::report::BenchmarkResult>
where
    B: dbperf::backend::BackendAdapter,
    G: dbperf::bench::RecordGenerator<Record = B::Record>,
{
    let orchestrator = match sizes {
        Some(sizes) => StageOrchestrator::with_sizes(backend, generator, sizes)?,
        None => StageOrchestrator::new(backend, generator),
    };
    orchestrator.run(&HostProbe)
}

fn run_search(
    backend: SearchBackendKind,
    fixture: &PathBuf,
    relational: bool,
    output: &PathBuf,
) -> Result<()> {
    let scenarios: Vec<SearchScenario> = if relational {
        SearchScenario::all().to_vec()
    } else {
        SearchScenario::flat().to_vec()
    };

    let load_start = Instant::now();
    let output_path = match (backend, relational) {
        (SearchBackendKind::Memory, false) => {
            let records = load_flat_fixture(fixture)?.records;
            let backend = MemorySearchBackend::from_flat("memory", records);
            finish_search(&backend, &scenarios, load_start, output)?
        }
        (SearchBackendKind::Memory, true) => {
            let products = load_relational_fixture(fixture)?.products;
            let backend = MemorySearchBackend::from_products("memory", products);
            finish_search(&backend, &scenarios, load_start, output)?
        }
        (SearchBackendKind::Sqlite, false) => {
            let records = load_flat_fixture(fixture)?.records;
            let mut backend = SqliteSearchBackend::in_memory()?;
            backend.load_flat(&records)?;
            finish_search(&backend, &scenarios, load_start, output)?
        }
        (SearchBackendKind::Sqlite, true) => {
            let products = load_relational_fixture(fixture)?.products;
            let mut backend = SqliteSearchBackend::in_memory()?;
            backend.load_products(&products)?;
            finish_search(&backend, &scenarios, load_start, output)?
        }
    };

    info!(path = %output_path.display(), "search benchmark complete");
    Ok(())
}

fn finish_search<S: SearchBackend>(
    backend: &S,
    scenarios: &[SearchScenario],
    load_start: Instant,
    output: &PathBuf,
) -> Result<PathBuf> {
    let fixture_load_time_ms = load_start.elapsed().as_secs_f64() * 1000.0;
    let run = run_scenarios(backend, scenarios, fixture_load_time_ms, &HostProbe)?;
    for warning in &run.warnings {
        warn!(
            scenario = %warning.scenario,
            expected = %warning.expected,
            actual = warning.actual,
            "count deviation"
        );
    }
    run.report.save(output)
}

fn run_compare(reports: &[PathBuf], output: &PathBuf) -> Result<()> {
    let mut loaded = Vec::with_capacity(reports.len());
    for path in reports {
        loaded.push(SearchBenchmarkReport::load(path)?);
    }
    let comparison = SearchComparisonReport::from_reports(&loaded);
    let path = comparison.save(output)?;
    info!(path = %path.display(), "comparison written");
    Ok(())
}
