use optiviz_analyzer::{EngineError, PlanError};
use thiserror::Error;

use crate::parser::ParseError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned by [`AnalyzerService`](crate::AnalyzerService)
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("query is required")]
    MissingQuery,

    #[error("explain_json is required for manual mode")]
    MissingExplainJson,

    #[error("connection_string is required for connected mode")]
    MissingConnectionString,

    #[error("connected mode is not available: no plan provider configured")]
    PlanProviderUnavailable,

    #[error("parse query: {0}")]
    AstParse(#[from] ParseError),

    #[error("obtain plan: {0}")]
    Plan(#[from] PlanError),

    #[error("evaluate rules: {0}")]
    Engine(#[from] EngineError),
}

impl ServiceError {
    /// True for errors caused by an incomplete request rather than a failing
    /// collaborator.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingQuery
                | Self::MissingExplainJson
                | Self::MissingConnectionString
                | Self::PlanProviderUnavailable
        )
    }
}
