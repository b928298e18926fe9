//! Common test utilities and mocks

#![allow(dead_code)]

use async_trait::async_trait;
use optiviz_analyzer::PlanError;
use optiviz_core::TreeValue;
use optiviz_services::{ParseError, SqlParser};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// `EXPLAIN (FORMAT JSON)` output for a sequential scan over `users`
pub const USERS_SEQ_SCAN_EXPLAIN: &str = r#"[
  {
    "Plan": {
      "Node Type": "Seq Scan",
      "Relation Name": "users",
      "Alias": "users",
      "Filter": "(lower((email)::text) ~~ '%foo'::text)",
      "Startup Cost": 0.0,
      "Total Cost": 25.88
    },
    "Planning Time": 0.08,
    "Execution Time": 0.02
  }
]"#;

pub const LOWER_EMAIL_LIKE_QUERY: &str = "SELECT * FROM users WHERE lower(email) LIKE '%foo'";

/// Plan provider returning a canned plan and recording every call.
pub struct MockPlanProvider {
    pub plan: Result<TreeValue, String>,
    pub calls: Arc<CallLog>,
}

impl MockPlanProvider {
    pub fn returning(plan: TreeValue) -> Self {
        Self {
            plan: Ok(plan),
            calls: Arc::default(),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            plan: Err(message.into()),
            calls: Arc::default(),
        }
    }

    pub fn index_scan() -> Self {
        Self::returning(json!({"Plan": {
            "Node Type": "Index Scan",
            "Relation Name": "users",
            "Index Name": "users_email_idx",
        }}))
    }
}

#[async_trait]
impl optiviz_services::PlanProvider for MockPlanProvider {
    async fn explain(&self, connection_string: &str, query: &str) -> Result<TreeValue, PlanError> {
        self.calls.record(connection_string, query);
        match &self.plan {
            Ok(plan) => Ok(plan.clone()),
            Err(message) => Err(PlanError::Connection(message.clone())),
        }
    }
}

/// Parser that always fails, for exercising the parse error path.
pub struct FailingParser;

impl SqlParser for FailingParser {
    fn parse(&self, _query: &str) -> Result<TreeValue, ParseError> {
        Err(ParseError::Syntax("unexpected token".to_string()))
    }
}

/// Thread-safe log of `(connection_string, query)` pairs
#[derive(Default)]
pub struct CallLog {
    entries: Mutex<Vec<(String, String)>>,
}

impl CallLog {
    pub fn record(&self, connection_string: &str, query: &str) {
        self.entries
            .lock()
            .expect("call log poisoned")
            .push((connection_string.to_string(), query.to_string()));
    }

    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries.lock().expect("call log poisoned").clone()
    }
}
