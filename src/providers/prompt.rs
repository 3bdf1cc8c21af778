use crate::config::CommitFormat;

/// Instruction block prepended to the diff for each commit format.
pub fn format_instructions(format: CommitFormat) -> &'static str {
    match format {
        CommitFormat::Conventional => {
            "Generate a commit message following the Conventional Commits format.\n\
             Format: <type>(<scope>): <description>\n\
             Types: feat, fix, chore, refactor, docs, test, ci, build"
        }
        CommitFormat::Semantic => {
            "Generate a commit message following Semantic Versioning.\n\
             Format: <type>: <description>\n\
             Types: major, minor, patch"
        }
        CommitFormat::Simple => "Generate a simple commit message.\nFormat: <description>",
        CommitFormat::Angular => {
            "Generate a commit message following the Angular format.\n\
             Format: <type>(<scope>): <description>\n\
             Types: feat, fix, docs, style, refactor, perf, test, build, ci, chore, revert"
        }
    }
}

/// Assembles the full prompt sent to a backend.
pub fn build_prompt(diff: &str, format: CommitFormat) -> String {
    format!(
        "{}\n\nHere are the changes:\n{}\n\nGenerate a commit message:",
        format_instructions(format),
        diff
    )
}
