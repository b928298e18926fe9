//! Analysis orchestration
//!
//! Validates a request, obtains the AST and the execution plan, and runs the rule
//! engine over them.

use std::sync::Arc;

use optiviz_analyzer::{RuleEngine, RuleInput, decode_plan};
use optiviz_core::{AnalyzeMode, AnalyzeRequest, AnalyzeResponse, TreeValue};

use crate::ast_builder::SqlparserAstParser;
use crate::error::{ServiceError, ServiceResult};
use crate::parser::SqlParser;
use crate::plan_provider::{PlanProvider, PostgresPlanProvider};

/// Service for analyzing a query against its execution plan
///
/// All state is shared and immutable, so one service can serve concurrent
/// requests. Collaborators are optional:
/// - without a [`SqlParser`] the rules see no AST
/// - without a [`PlanProvider`] connected-mode requests are rejected
#[derive(Clone)]
pub struct AnalyzerService {
    engine: Arc<RuleEngine>,
    parser: Option<Arc<dyn SqlParser>>,
    plan_provider: Option<Arc<dyn PlanProvider>>,
}

impl AnalyzerService {
    /// Create a service with the given engine and no collaborators
    pub fn new(engine: Arc<RuleEngine>) -> Self {
        Self {
            engine,
            parser: None,
            plan_provider: None,
        }
    }

    /// Create a service with the built-in rules, the `sqlparser` parser and the
    /// PostgreSQL plan provider
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(RuleEngine::with_default_rules()))
            .with_parser(Arc::new(SqlparserAstParser::new()))
            .with_plan_provider(Arc::new(PostgresPlanProvider::default()))
    }

    pub fn with_parser(mut self, parser: Arc<dyn SqlParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn with_plan_provider(mut self, plan_provider: Arc<dyn PlanProvider>) -> Self {
        self.plan_provider = Some(plan_provider);
        self
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Analyze one request
    ///
    /// The request is validated before any parsing, EXPLAIN or rule work. On
    /// success the response carries the AST (when a parser is configured), the
    /// normalized plan and the suggestions in rule registration order.
    #[tracing::instrument(skip(self, request), fields(mode = %request.mode))]
    pub async fn analyze(&self, request: &AnalyzeRequest) -> ServiceResult<AnalyzeResponse> {
        self.validate(request)?;

        let ast = self.parse_query(&request.query)?;
        let plan = self.obtain_plan(request).await?;

        let input = RuleInput::new(request)
            .with_ast(ast.as_ref())
            .with_plan(Some(&plan));
        let suggestions = self.engine.evaluate(&input)?;

        tracing::debug!(suggestions = suggestions.len(), "analysis complete");

        Ok(AnalyzeResponse {
            ast,
            explain_plan: Some(plan),
            suggestions,
        })
    }

    fn validate(&self, request: &AnalyzeRequest) -> ServiceResult<()> {
        if request.query.trim().is_empty() {
            return Err(ServiceError::MissingQuery);
        }

        match request.mode {
            AnalyzeMode::Manual => {
                if is_blank(request.explain_json.as_deref()) {
                    return Err(ServiceError::MissingExplainJson);
                }
            }
            AnalyzeMode::Connected => {
                if is_blank(request.connection_string.as_deref()) {
                    return Err(ServiceError::MissingConnectionString);
                }
                if self.plan_provider.is_none() {
                    return Err(ServiceError::PlanProviderUnavailable);
                }
            }
        }

        Ok(())
    }

    fn parse_query(&self, query: &str) -> ServiceResult<Option<TreeValue>> {
        let Some(parser) = &self.parser else {
            tracing::debug!("no SQL parser configured, rules run without an AST");
            return Ok(None);
        };

        parser.parse(query).map(Some).map_err(|e| {
            tracing::warn!(error = %e, "failed to parse query");
            ServiceError::AstParse(e)
        })
    }

    async fn obtain_plan(&self, request: &AnalyzeRequest) -> ServiceResult<TreeValue> {
        let plan = match request.mode {
            AnalyzeMode::Manual => decode_plan(request.explain_json.as_deref().unwrap_or_default()),
            AnalyzeMode::Connected => {
                let provider = self
                    .plan_provider
                    .as_ref()
                    .ok_or(ServiceError::PlanProviderUnavailable)?;
                let connection_string = request.connection_string.as_deref().unwrap_or_default();
                provider.explain(connection_string, &request.query).await
            }
        };

        plan.map_err(|e| {
            tracing::warn!(error = %e, "failed to obtain execution plan");
            ServiceError::Plan(e)
        })
    }
}

impl std::fmt::Debug for AnalyzerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzerService")
            .field("engine", &self.engine)
            .field("parser", &self.parser.is_some())
            .field("plan_provider", &self.plan_provider.is_some())
            .finish()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
