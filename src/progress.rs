//! Per-phase progress aggregation.

use crate::models::{NodeStatus, ProgressMap, Roadmap, RoadmapPhase};
use serde::Serialize;

/// Completion summary for one phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseProgress {
    pub phase_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_range: Option<(u32, u32)>,
    pub done: usize,
    pub in_progress: usize,
    pub total: usize,
    /// Whole-number completion percentage in `0..=100`
    pub percentage: u32,
    pub total_hours: f64,
    /// Estimated hours left on nodes that are neither done nor confident
    pub remaining_hours: f64,
}

/// Completion summary for the whole roadmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    pub phases: Vec<PhaseProgress>,
    pub done: usize,
    pub total: usize,
    pub percentage: u32,
    pub total_hours: f64,
    pub remaining_hours: f64,
}

/// `round(100 * done / total)` with halves rounding up; an empty set is 0%.
pub fn percentage(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let done = done.min(total) as u64;
    let total = total as u64;
    ((200 * done + total) / (2 * total)) as u32
}

/// Summarize a single phase against the stored progress.
pub fn phase_progress(phase: &RoadmapPhase, progress: &ProgressMap) -> PhaseProgress {
    let mut done = 0;
    let mut in_progress = 0;
    let mut total_hours = 0.0;
    let mut remaining_hours = 0.0;

    for node in &phase.nodes {
        let status = node.effective_status(progress);
        let hours = node.estimated_hours.filter(|h| h.is_finite() && *h > 0.0);
        match status {
            NodeStatus::Done => done += 1,
            NodeStatus::InProgress => in_progress += 1,
            _ => {}
        }
        if let Some(hours) = hours {
            total_hours += hours;
            if !matches!(status, NodeStatus::Done | NodeStatus::Confident) {
                remaining_hours += hours;
            }
        }
    }

    let total = phase.nodes.len();
    PhaseProgress {
        phase_id: phase.id.clone(),
        title: phase.title.clone(),
        week_range: phase.week_range,
        done,
        in_progress,
        total,
        percentage: percentage(done, total),
        total_hours,
        remaining_hours,
    }
}

/// Summarize every phase, in roadmap order, plus the overall totals.
pub fn summarize(roadmap: &Roadmap, progress: &ProgressMap) -> ProgressSummary {
    let phases: Vec<PhaseProgress> = roadmap
        .phases()
        .iter()
        .map(|phase| phase_progress(phase, progress))
        .collect();

    let done = phases.iter().map(|p| p.done).sum();
    let total = phases.iter().map(|p| p.total).sum();
    ProgressSummary {
        done,
        total,
        percentage: percentage(done, total),
        total_hours: phases.iter().map(|p| p.total_hours).sum(),
        remaining_hours: phases.iter().map(|p| p.remaining_hours).sum(),
        phases,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoadmapNode;
    use crate::test_utils::{chain_roadmap, sequential_roadmap};
    use proptest::prelude::*;

    #[test]
    fn test_chain_scenario() {
        let mut progress = ProgressMap::new();
        progress.insert("A".to_string(), NodeStatus::Done);

        let summary = summarize(&chain_roadmap(), &progress);
        assert_eq!(summary.phases[0].percentage, 50);
        assert_eq!(summary.phases[1].percentage, 0);
        assert_eq!(summary.done, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.percentage, 33);
    }

    #[test]
    fn test_empty_phase_is_zero() {
        let roadmap = Roadmap::new(vec![RoadmapPhase::new("empty", "Empty")]);
        let summary = summarize(&roadmap, &ProgressMap::new());
        assert_eq!(summary.phases[0].percentage, 0);
        assert_eq!(summary.phases[0].total, 0);
        assert_eq!(summary.percentage, 0);
    }

    #[test]
    fn test_rounding_halves_up() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 200), 1);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn test_confident_is_not_done() {
        let summary = summarize(&sequential_roadmap(), &ProgressMap::new());
        assert_eq!(summary.phases[0].done, 0);
        assert_eq!(summary.phases[0].percentage, 0);
    }

    #[test]
    fn test_stored_status_overrides_authored() {
        let mut progress = ProgressMap::new();
        progress.insert("s2".to_string(), NodeStatus::Done);
        progress.insert("s3".to_string(), NodeStatus::InProgress);

        let phase = phase_progress(&sequential_roadmap().phases()[0], &progress);
        assert_eq!(phase.done, 1);
        assert_eq!(phase.in_progress, 1);
        assert_eq!(phase.percentage, 33);
    }

    #[test]
    fn test_hours() {
        let phase = RoadmapPhase::new("p", "P")
            .with_node(RoadmapNode::new("a", "A").with_hours(4.0))
            .with_node(RoadmapNode::new("b", "B").with_hours(6.0))
            .with_node(RoadmapNode::new("c", "C").with_hours(2.0).with_status(NodeStatus::Confident))
            .with_node(RoadmapNode::new("d", "D"));
        let mut progress = ProgressMap::new();
        progress.insert("a".to_string(), NodeStatus::Done);

        let summary = phase_progress(&phase, &progress);
        assert_eq!(summary.total_hours, 12.0);
        assert_eq!(summary.remaining_hours, 6.0);
    }

    #[test]
    fn test_sample_roadmap_progress() {
        let summary = summarize(&Roadmap::sample(), &ProgressMap::new());
        assert_eq!(summary.phases.len(), 3);
        assert!(summary.phases.iter().all(|p| p.percentage == 0));
        assert_eq!(summary.total_hours, 33.0);
    }

    proptest! {
        #[test]
        fn prop_percentage_bounded(done in 0usize..500, total in 0usize..500) {
            let pct = percentage(done, total);
            prop_assert!(pct <= 100);
            if total == 0 {
                prop_assert_eq!(pct, 0);
            }
        }

        #[test]
        fn prop_matches_float_rounding(total in 1usize..1000, seed in 0usize..1000) {
            let done = seed % (total + 1);
            let expected = (100.0 * done as f64 / total as f64 + 0.5).floor() as u32;
            prop_assert_eq!(percentage(done, total), expected);
        }
    }
}
