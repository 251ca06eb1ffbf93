//! Build metadata stamped by `build.rs`.

use std::fmt;

/// Version and provenance of the running binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_commit: &'static str,
    pub git_tree_state: &'static str,
    pub build_date: &'static str,
    pub build_time: &'static str,
}

pub const BUILD_INFO: BuildInfo = BuildInfo {
    version: env!("LATENCY_REPORT_VERSION"),
    git_commit: env!("LATENCY_REPORT_GIT_COMMIT"),
    git_tree_state: env!("LATENCY_REPORT_GIT_TREE_STATE"),
    build_date: env!("LATENCY_REPORT_BUILD_DATE"),
    build_time: env!("LATENCY_REPORT_BUILD_TIME"),
};

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Build Version\t {}", self.version)?;
        writeln!(f, "Git Commit\t {}", self.git_commit)?;
        writeln!(f, "Git State\t {}", self.git_tree_state)?;
        writeln!(f, "Build Date\t {}", self.build_date)?;
        writeln!(f, "Build Time\t {}", self.build_time)
    }
}
