mod dashboard;
mod deployment;
mod headers;
mod how_to_use;
mod keys;
mod state;
mod subscribe;
mod whitelist;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use dashboard::DashboardView;
pub use deployment::DeploymentView;
pub use headers::HeadersView;
pub use how_to_use::HowToUseView;
pub use keys::KeysView;
pub use state::{
    Notice, NoticeBanner, ProgressBump, ProgressEpoch, ViewError, ViewState,
    use_cancel_on_unmount, use_progress_bump, view_state_from_resource,
};
pub use subscribe::SubscribeView;
pub use whitelist::WhitelistView;
