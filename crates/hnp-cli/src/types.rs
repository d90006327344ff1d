use std::path::PathBuf;

/// Row accounting for one pipeline stage.
#[derive(Debug, Clone)]
pub struct StageSummary {
    pub stage: &'static str,
    pub input_rows: usize,
    pub output_rows: usize,
    pub dropped_rows: usize,
}

/// Result of a full tidy run.
#[derive(Debug)]
pub struct TidyResult {
    /// Where the merged table was written; `None` on a dry run.
    pub output: Option<PathBuf>,
    pub stages: Vec<StageSummary>,
    pub merged_rows: usize,
}
