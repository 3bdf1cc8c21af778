use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Commit message styles the generator can be asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CommitFormat {
    Conventional,
    Semantic,
    Simple,
    Angular,
}

impl CommitFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommitFormat::Conventional => "conventional",
            CommitFormat::Semantic => "semantic",
            CommitFormat::Simple => "simple",
            CommitFormat::Angular => "angular",
        }
    }
}

impl fmt::Display for CommitFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
