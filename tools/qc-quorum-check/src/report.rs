//! Human and JSON rendering of a check result

use std::fmt::Write as _;
use std::process::ExitCode;

use qc_18_quorum_intersection::{
    CheckerStats, NodeNameResolver, PotentialSplit, QuorumIntersectionError,
};
use serde::Serialize;
use shared_types::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Holds,
    Split,
    Undetermined,
}

impl Verdict {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Verdict::Holds => ExitCode::SUCCESS,
            Verdict::Split => ExitCode::from(1),
            Verdict::Undetermined => ExitCode::from(2),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<PotentialSplit>,
    pub max_scc: Vec<NodeId>,
    pub unconfigured: Vec<NodeId>,
    pub dangling: Vec<NodeId>,
    pub stats: CheckerStats,
}

impl Report {
    pub fn new(
        result: &Result<bool, QuorumIntersectionError>,
        split: Option<PotentialSplit>,
        stats: CheckerStats,
    ) -> Self {
        let (verdict, reason) = match result {
            Ok(true) => (Verdict::Holds, None),
            Ok(false) => (Verdict::Split, None),
            Err(e) => (Verdict::Undetermined, Some(e.to_string())),
        };
        Self {
            verdict,
            reason,
            split,
            max_scc: Vec::new(),
            unconfigured: Vec::new(),
            dangling: Vec::new(),
            stats,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self, names: &dyn NodeNameResolver) -> String {
        let mut out = String::new();
        let headline = match self.verdict {
            Verdict::Holds => "Quorum intersection holds",
            Verdict::Split => "Quorum intersection FAILS",
            Verdict::Undetermined => "Quorum intersection undetermined",
        };
        let _ = writeln!(out, "{headline}");
        if let Some(reason) = &self.reason {
            let _ = writeln!(out, "  reason: {reason}");
        }
        if let Some(split) = &self.split {
            let _ = writeln!(out, "  left:  {}", names.render(&split.left));
            let _ = writeln!(out, "  right: {}", names.render(&split.right));
        }

        let s = &self.stats;
        let _ = writeln!(
            out,
            "  nodes: {}, sccs: {}, max scc: {} {}",
            s.total_nodes,
            s.scc_count,
            s.max_scc_size,
            names.render(&self.max_scc)
        );
        if !self.unconfigured.is_empty() {
            let _ = writeln!(out, "  unconfigured: {}", names.render(&self.unconfigured));
        }
        if !self.dangling.is_empty() {
            let _ = writeln!(out, "  dangling: {}", names.render(&self.dangling));
        }
        let _ = writeln!(
            out,
            "  calls: {}, max quorums: {}, min quorums: {}, elapsed: {}ms",
            s.calls_started, s.max_quorums_seen, s.min_quorums_seen, s.elapsed_ms
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qc_18_quorum_intersection::HexNameResolver;

    #[test]
    fn test_verdict_from_result() {
        let holds = Report::new(&Ok(true), None, CheckerStats::default());
        let split = Report::new(&Ok(false), None, CheckerStats::default());
        let undetermined = Report::new(
            &Err(QuorumIntersectionError::Interrupted),
            None,
            CheckerStats::default(),
        );

        assert_eq!(holds.verdict, Verdict::Holds);
        assert_eq!(split.verdict, Verdict::Split);
        assert_eq!(undetermined.verdict, Verdict::Undetermined);
        assert!(undetermined.reason.is_some());
    }

    #[test]
    fn test_text_lists_split_sides() {
        let split = PotentialSplit {
            left: vec![NodeId([1; 32])],
            right: vec![NodeId([2; 32])],
        };
        let report = Report::new(&Ok(false), Some(split), CheckerStats::default());
        let text = report.to_text(&HexNameResolver);

        assert!(text.starts_with("Quorum intersection FAILS"));
        assert!(text.contains("left:  [01010101]"));
        assert!(text.contains("right: [02020202]"));
    }

    #[test]
    fn test_json_uses_snake_case_verdict() {
        let report = Report::new(&Ok(true), None, CheckerStats::default());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"verdict\": \"holds\""));
        assert!(!json.contains("\"split\""));
    }
}
