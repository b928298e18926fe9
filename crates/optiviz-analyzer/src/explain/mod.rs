//! Query EXPLAIN Module
//!
//! This module handles PostgreSQL `EXPLAIN (FORMAT JSON)` output:
//! - decoding and normalizing the raw payload
//! - unwrapping the `[{"Plan": ...}]` envelope to the root node
//! - traversing plan nodes depth-first
//!
//! # Example
//!
//! ```
//! use optiviz_analyzer::explain::{decode_plan, extract_plan_root, plan_nodes};
//!
//! let plan = decode_plan(r#"[{"Plan": {"Node Type": "Seq Scan", "Relation Name": "users"}}]"#).unwrap();
//! let root = extract_plan_root(Some(&plan)).unwrap();
//! let scans: Vec<_> = plan_nodes(root).filter(|n| n.is_seq_scan()).collect();
//! assert_eq!(scans[0].relation(), Some("users"));
//! ```

pub mod plan;
pub mod postgres;

pub use plan::{
    PlanNode, PlanNodeIter, extract_plan_root, plan_nodes, traverse_plan,
};
pub use postgres::{PlanError, PlanTiming, decode_plan, normalize_plan, plan_timing};
