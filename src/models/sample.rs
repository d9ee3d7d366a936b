//! Built-in roadmap used when no roadmap file is configured.
//!
//! This is the generic three-week plan handed out for any role/company
//! combination that has no tailored content.

use super::{NodeStatus, Roadmap, RoadmapNode, RoadmapPhase};

impl Roadmap {
    /// The generic preparation plan: Foundations → Skill Development → Interview Prep.
    pub fn sample() -> Self {
        Roadmap::new(vec![
            RoadmapPhase::new("phase-1", "Foundations")
                .with_weeks(1, 1)
                .with_node(
                    RoadmapNode::new("core-concepts", "Core Concepts")
                        .with_tags(["Fundamentals"])
                        .with_hours(10.0)
                        .with_status(NodeStatus::NotStarted),
                ),
            RoadmapPhase::new("phase-2", "Skill Development")
                .with_weeks(2, 2)
                .with_node(
                    RoadmapNode::new("advanced-topics", "Advanced Topics")
                        .with_tags(["Advanced"])
                        .with_hours(15.0)
                        .with_dependencies(["core-concepts"]),
                ),
            RoadmapPhase::new("phase-3", "Interview Prep")
                .with_weeks(3, 3)
                .with_node(
                    RoadmapNode::new("mock-prep", "Mock Interviews")
                        .with_tags(["Practice"])
                        .with_hours(8.0)
                        .with_dependencies(["advanced-topics"]),
                ),
        ])
    }
}
