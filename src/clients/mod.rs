pub mod bugzilla;
pub mod jenkins;
pub mod jira;

pub(crate) const USER_AGENT: &str = concat!("buildbrief/", env!("CARGO_PKG_VERSION"));
