use std::fmt::Write;

use crate::models::screening::ScreeningResult;
use crate::models::TrackerRecord;
use crate::policy::Capabilities;
use crate::tracker::{TrackerStore, TrackerView};

/// Renders the store as plain text for the console front-end.
pub fn render_tracker(store: &TrackerStore) -> String {
    let mut out = String::new();
    match store.view() {
        TrackerView::NoCandidate => out.push_str("No candidate selected.\n"),
        TrackerView::Loading { candidate_id } => {
            let _ = writeln!(out, "Loading tracker for candidate {candidate_id}...");
        }
        TrackerView::NoActiveTracking { candidate_id } => {
            let _ = writeln!(
                out,
                "No active tracking for candidate {candidate_id} (not yet screened)."
            );
        }
        TrackerView::Error {
            candidate_id,
            message,
        } => {
            let _ = writeln!(
                out,
                "Could not load tracker for candidate {candidate_id}: {message}"
            );
        }
        TrackerView::Tracking {
            candidate_id,
            records,
            loaded_at,
        } => {
            let _ = writeln!(
                out,
                "Candidate {candidate_id}: {} requirement(s) tracked (synced {})",
                records.len(),
                loaded_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            for record in records {
                render_record(&mut out, store, record);
            }
        }
    }
    out
}

fn render_record(out: &mut String, store: &TrackerStore, record: &TrackerRecord) {
    let req = &record.requirement;
    let progress = record.progress();
    let client = req.client_name.as_deref().unwrap_or("--");
    let _ = writeln!(
        out,
        "\n[{}] {} @ {}  ({}/{} rounds completed{})",
        req.id,
        if req.title.is_empty() {
            "(untitled)"
        } else {
            req.title.as_str()
        },
        client,
        progress.completed,
        progress.total,
        if progress.rejected {
            ", rejected"
        } else if progress.qualified {
            ", qualified"
        } else if progress.in_last_round {
            ", in last round"
        } else {
            ""
        }
    );
    for (i, stage) in record.stages.iter().enumerate() {
        let marker = if store.is_confirmed(&req.id, &stage.stage_id) {
            ""
        } else {
            "  (unconfirmed)"
        };
        let _ = writeln!(
            out,
            "  {}. {:<24} {:<12} {}{}",
            i + 1,
            stage.stage_name,
            stage.status.as_str(),
            stage.decision.as_deref().unwrap_or("-"),
            marker
        );
    }
}

pub fn render_screening(result: &ScreeningResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "AI score: {}/100", result.score);
    let _ = writeln!(out, "Recommendation: {:?}", result.recommend);
    if !result.rationale.is_empty() {
        out.push_str("Rationale:\n");
        for item in &result.rationale {
            let _ = writeln!(out, "  - {item}");
        }
    }
    if !result.red_flags.is_empty() {
        out.push_str("Red flags:\n");
        for item in &result.red_flags {
            let _ = writeln!(out, "  - {item}");
        }
    }
    out
}

pub fn render_capabilities(caps: &Capabilities) -> String {
    let mut out = String::from("Screens:\n");
    for screen in caps.screens {
        let _ = writeln!(out, "  - {}", screen.label());
    }
    out.push_str("Actions:\n");
    for action in caps.actions {
        let _ = writeln!(out, "  - {action}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RequirementSummary, Stage, StageStatus};

    fn loaded_store() -> TrackerStore {
        let mut store = TrackerStore::new();
        let ticket = store.begin_load(42.into());
        store
            .finish_load(
                &ticket,
                Ok(vec![TrackerRecord {
                    requirement: RequirementSummary {
                        id: 7.into(),
                        title: "Backend Engineer".to_string(),
                        client_name: Some("Acme".to_string()),
                        no_of_rounds: Some(2),
                    },
                    stages: vec![
                        Stage {
                            stage_id: 1.into(),
                            stage_name: "Technical".to_string(),
                            status: StageStatus::Pending,
                            decision: None,
                        },
                        Stage {
                            stage_id: 2.into(),
                            stage_name: "HR".to_string(),
                            status: StageStatus::Pending,
                            decision: None,
                        },
                    ],
                }]),
            )
            .unwrap();
        store
    }

    #[test]
    fn test_render_marks_unconfirmed_stage() {
        let mut store = loaded_store();
        store
            .apply_stage_update(&7.into(), &1.into(), StageStatus::Completed, Some("Passed".into()))
            .unwrap();
        let text = render_tracker(&store);
        assert!(text.contains("[7] Backend Engineer @ Acme  (1/2 rounds completed, in last round)"));
        let technical = text.lines().find(|l| l.contains("Technical")).unwrap();
        assert!(technical.contains("COMPLETED"));
        assert!(technical.contains("Passed"));
        assert!(technical.ends_with("(unconfirmed)"));
        let hr = text.lines().find(|l| l.contains("HR")).unwrap();
        assert!(!hr.contains("unconfirmed"));
    }

    #[test]
    fn test_render_no_active_tracking() {
        let mut store = TrackerStore::new();
        let ticket = store.begin_load(99.into());
        store.finish_load(&ticket, Ok(vec![])).unwrap();
        assert_eq!(
            render_tracker(&store),
            "No active tracking for candidate 99 (not yet screened).\n"
        );
    }
}
