//! `optiviz` - suggest SQL query improvements from a query and its EXPLAIN plan
//!
//! Manual mode reads EXPLAIN (FORMAT JSON) output from a file or stdin:
//!
//! ```text
//! optiviz --sql query.sql --explain plan.json --format text --print-plan
//! ```
//!
//! Connected mode runs EXPLAIN against a live PostgreSQL database:
//!
//! ```text
//! OPTIVIZ_CONN="host=localhost user=app dbname=app" optiviz --mode connected --sql -
//! ```

mod input;
mod logging;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, ValueEnum};
use optiviz_analyzer::{RuleEngine, plan_timing};
use optiviz_core::{AnalyzeMode, AnalyzeRequest, AnalyzeResponse};
use optiviz_services::{
    AnalyzerService, ExplainOptions, PostgresPlanProvider, PreparsedAst, SqlParser,
    SqlparserAstParser,
};

use crate::input::{ensure_single_stdin, read_input};
use crate::logging::LoggingConfig;
use crate::render::TextOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Pretty-printed JSON response
    Json,
    /// Numbered suggestion list with optional plan and AST trees
    Text,
    /// Suggestions as a table
    Table,
}

#[derive(Debug, Parser)]
#[command(
    name = "optiviz",
    version,
    about = "Suggest SQL query improvements from the query and its execution plan"
)]
struct Cli {
    /// Analysis mode: manual or connected
    #[arg(long, env = "OPTIVIZ_MODE", default_value = "manual")]
    mode: AnalyzeMode,

    /// Path to the SQL query file, or '-' for stdin
    #[arg(long, value_name = "PATH")]
    sql: PathBuf,

    /// Path to EXPLAIN (FORMAT JSON) output, or '-' for stdin (manual mode)
    #[arg(long, value_name = "PATH")]
    explain: Option<PathBuf>,

    /// PostgreSQL connection string (connected mode)
    #[arg(long, env = "OPTIVIZ_CONN", hide_env_values = true)]
    conn: Option<String>,

    /// Path to a pre-parsed AST in JSON, used instead of the built-in parser
    #[arg(long, value_name = "PATH")]
    ast: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Render the AST as a tree (text format)
    #[arg(long)]
    print_ast: bool,

    /// Render the execution plan as a tree (text format)
    #[arg(long)]
    print_plan: bool,

    /// Maximum depth when rendering the AST
    #[arg(long, default_value_t = 4)]
    ast_depth: usize,

    /// Run plain EXPLAIN instead of EXPLAIN ANALYZE (connected mode)
    #[arg(long)]
    no_analyze: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn text_options(&self) -> TextOptions {
        TextOptions {
            print_plan: self.print_plan,
            print_ast: self.print_ast,
            ast_depth: self.ast_depth,
        }
    }

    fn explain_options(&self) -> ExplainOptions {
        ExplainOptions::default()
            .with_analyze(!self.no_analyze)
            .with_buffers(!self.no_analyze)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logging = LoggingConfig::from_verbosity(cli.verbose).with_json(cli.log_json);
    if let Err(e) = logging::init(&logging) {
        eprintln!("failed to initialize logging: {e:#}");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let request = build_request(&cli)?;
    let service = build_service(&cli)?;

    tracing::info!(mode = %request.mode, "analyzing query");
    let response = service
        .analyze(&request)
        .await
        .context("analysis failed")?;

    if let Some(timing) = response.explain_plan.as_ref().and_then(plan_timing) {
        tracing::info!(
            planning_ms = timing.planning_time_ms,
            execution_ms = timing.execution_time_ms,
            "plan timing"
        );
    }

    println!("{}", format_response(&response, &cli)?);
    Ok(())
}

fn build_request(cli: &Cli) -> anyhow::Result<AnalyzeRequest> {
    let inputs = [Some(&cli.sql), cli.explain.as_ref(), cli.ast.as_ref()];
    ensure_single_stdin(inputs.into_iter().flatten().map(PathBuf::as_path))?;

    let query = read_input(&cli.sql).context("failed to read SQL")?;

    match cli.mode {
        AnalyzeMode::Manual => {
            let Some(explain_path) = &cli.explain else {
                bail!("manual mode requires --explain pointing to EXPLAIN JSON");
            };
            let explain =
                read_input(explain_path).context("failed to read explain JSON")?;
            Ok(AnalyzeRequest::manual(query, explain))
        }
        AnalyzeMode::Connected => {
            let conn = cli.conn.as_deref().unwrap_or_default();
            if conn.trim().is_empty() {
                bail!("connected mode requires --conn with PostgreSQL connection string");
            }
            Ok(AnalyzeRequest::connected(query, conn))
        }
    }
}

fn build_service(cli: &Cli) -> anyhow::Result<AnalyzerService> {
    let parser: Arc<dyn SqlParser> = match &cli.ast {
        Some(path) => {
            let json = read_input(path).context("failed to read AST")?;
            Arc::new(PreparsedAst::from_json(&json).context("failed to load AST")?)
        }
        None => Arc::new(SqlparserAstParser::new()),
    };

    Ok(
        AnalyzerService::new(Arc::new(RuleEngine::with_default_rules()))
            .with_parser(parser)
            .with_plan_provider(Arc::new(PostgresPlanProvider::new(cli.explain_options()))),
    )
}

fn format_response(response: &AnalyzeResponse, cli: &Cli) -> anyhow::Result<String> {
    let output = match cli.format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(response).context("failed to encode response")?
        }
        OutputFormat::Text => render::render_text(response, cli.text_options()),
        OutputFormat::Table => render::render_table(&response.suggestions),
    };
    Ok(output.trim_end().to_string())
}
