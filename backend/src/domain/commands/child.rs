use shared::DuplicatePolicy;

/// Input for registering a child and generating its vaccine schedule.
#[derive(Debug, Clone)]
pub struct RegisterChildCommand {
    pub baby_name: Option<String>,
    /// Date of birth in YYYY-MM-DD
    pub date_of_birth: Option<String>,
    /// Defaults to `DuplicatePolicy::Append` when not given
    pub on_duplicate: Option<DuplicatePolicy>,
}

#[derive(Debug, Clone)]
pub struct RegisterChildResult {
    pub baby_name: String,
    pub vaccines_count: usize,
}
