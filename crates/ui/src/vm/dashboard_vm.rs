use onboard_core::model::ProgressRecord;
use onboard_core::steps::{self, StepDescriptor, StepId};

use crate::routes::{Route, route_for_step};

#[derive(Clone, PartialEq)]
pub struct StepCardVm {
    pub id: StepId,
    pub number: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub completed: bool,
    pub route: Route,
}

impl From<&StepDescriptor> for StepCardVm {
    fn from(step: &StepDescriptor) -> Self {
        Self {
            id: step.id,
            number: step.number,
            title: step.title,
            description: step.id.description(),
            completed: step.is_completed,
            route: route_for_step(step.id),
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct DashboardVm {
    pub percent: u8,
    pub completed: usize,
    pub total: usize,
    pub steps: Vec<StepCardVm>,
    /// `None` once every step is complete.
    pub next: Option<StepCardVm>,
    pub subscriber_id: Option<String>,
    pub session_id: Option<String>,
}

impl DashboardVm {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.next.is_none()
    }
}

#[must_use]
pub fn map_dashboard(record: &ProgressRecord) -> DashboardVm {
    let derived = steps::derive_steps(record);
    DashboardVm {
        percent: steps::progress_percent(record),
        completed: steps::completed_count(record),
        total: derived.len(),
        steps: derived.iter().map(StepCardVm::from).collect(),
        next: steps::next_step(record).as_ref().map(StepCardVm::from),
        subscriber_id: record.subscriber_id().map(ToString::to_string),
        session_id: record.session_id().map(ToString::to_string),
    }
}
