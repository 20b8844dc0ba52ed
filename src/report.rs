use std::collections::HashSet;

/// Result class of a job's last completed build.
///
/// Every classified job lands in exactly one class; result strings the
/// server is not supposed to emit (or a missing result) fold into `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Unstable,
    Failure,
    Error,
}

impl Outcome {
    /// Maps a Jenkins build result string to an outcome class.
    pub fn classify(result: Option<&str>) -> Self {
        match result {
            Some("SUCCESS") => Outcome::Success,
            Some("UNSTABLE") => Outcome::Unstable,
            Some("FAILURE") => Outcome::Failure,
            _ => Outcome::Error,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Success => "SUCCESS",
            Outcome::Unstable => "UNSTABLE",
            Outcome::Failure => "FAILURE",
            Outcome::Error => "ERROR",
        }
    }

    /// Blocker resolution only runs for jobs that are actively broken.
    /// ERROR jobs are deliberately left out; changing this would change
    /// the report's content for every consumer.
    pub fn needs_blockers(&self) -> bool {
        matches!(self, Outcome::Unstable | Outcome::Failure)
    }
}

/// One bug or ticket entry as it appears in a report row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockerRef {
    /// Tracker lookup succeeded.
    Resolved { name: String, url: String },
    /// Registry or tracker lookup failed; the name carries the failure
    /// context, and the browse URL is kept when it could be derived.
    Placeholder { name: String, url: Option<String> },
    /// Nothing to look up: "No bug on file", "No ticket on file", "N/A".
    Sentinel { name: String },
}

impl BlockerRef {
    /// Entry used for jobs whose outcome never triggers blocker resolution.
    pub fn not_applicable() -> Self {
        BlockerRef::Sentinel {
            name: "N/A".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BlockerRef::Resolved { name, .. }
            | BlockerRef::Placeholder { name, .. }
            | BlockerRef::Sentinel { name } => name,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            BlockerRef::Resolved { url, .. } => Some(url),
            BlockerRef::Placeholder { url, .. } => url.as_deref(),
            BlockerRef::Sentinel { .. } => None,
        }
    }
}

/// One row of the report, built once per successfully classified job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub version: String,
    pub name: String,
    pub url: String,
    pub build_number: u64,
    pub build_url: String,
    pub outcome: Outcome,
    pub bugs: Vec<BlockerRef>,
    pub tickets: Vec<BlockerRef>,
}

/// Percentage of `part` over `whole`, rounded to one decimal place.
///
/// Returns `None` when `whole` is zero so callers render "N/A" instead
/// of dividing by zero.
pub fn percent(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        return None;
    }
    Some((1000.0 * part as f64 / whole as f64).round() / 10.0)
}

/// Run-wide counters accumulated while jobs are classified.
///
/// Blocker ids are pushed in by the collector after each resolution, so
/// total/unique statistics cover every job processed this run.
#[derive(Debug, Default)]
pub struct Summary {
    pub num_success: usize,
    pub num_unstable: usize,
    pub num_failure: usize,
    pub num_error: usize,
    all_bugs: Vec<u64>,
    all_tickets: Vec<u64>,
}

impl Summary {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Success => self.num_success += 1,
            Outcome::Unstable => self.num_unstable += 1,
            Outcome::Failure => self.num_failure += 1,
            Outcome::Error => self.num_error += 1,
        }
    }

    pub fn record_bugs(&mut self, ids: &[u64]) {
        self.all_bugs.extend_from_slice(ids);
    }

    pub fn record_tickets(&mut self, ids: &[u64]) {
        self.all_tickets.extend_from_slice(ids);
    }

    /// Jobs counted this run. Jobs skipped over fetch errors never reach
    /// `record`, so they are excluded from every denominator.
    pub fn num_jobs(&self) -> usize {
        self.num_success + self.num_unstable + self.num_failure + self.num_error
    }

    fn ratio_line(label: &str, count: usize, total: usize) -> String {
        match percent(count, total) {
            Some(p) => format!("{label} {count}/{total} = {p:.1}%"),
            None => format!("{label} {count}/{total} = N/A"),
        }
    }

    pub fn success_line(&self) -> String {
        Self::ratio_line("Total SUCCESS: ", self.num_success, self.num_jobs())
    }

    pub fn unstable_line(&self) -> String {
        Self::ratio_line("Total UNSTABLE:", self.num_unstable, self.num_jobs())
    }

    pub fn failure_line(&self) -> String {
        Self::ratio_line("Total FAILURE: ", self.num_failure, self.num_jobs())
    }

    /// Only present when at least one job errored.
    pub fn error_line(&self) -> Option<String> {
        (self.num_error > 0)
            .then(|| Self::ratio_line("Total ERROR: ", self.num_error, self.num_jobs()))
    }

    pub fn bugs_line(&self) -> String {
        Self::tally_line("Blocker Bugs", &self.all_bugs)
    }

    pub fn tickets_line(&self) -> String {
        Self::tally_line("Blocker Tickets", &self.all_tickets)
    }

    fn tally_line(label: &str, ids: &[u64]) -> String {
        if ids.is_empty() {
            return format!("{label}: 0 total");
        }
        let unique: HashSet<&u64> = ids.iter().collect();
        format!("{label}: {} total, {} unique", ids.len(), unique.len())
    }
}
