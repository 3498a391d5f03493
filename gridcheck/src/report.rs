use std::path::{Path, PathBuf};

use colored::{ColoredString, Colorize};
use libverify::{GridFormat, PhasedVerdict, Verdict, VerdictPair};
use serde::Serialize;

use crate::cli::display_name;

/// Ordered verification results, one entry per candidate.
#[derive(Debug)]
pub enum Outcome {
    Cso(Vec<Verdict>),
    Fm(Vec<PhasedVerdict>),
}

impl Outcome {
    pub fn all_equal(&self) -> bool {
        match self {
            Outcome::Cso(verdicts) => verdicts.iter().all(Verdict::is_equal),
            Outcome::Fm(verdicts) => verdicts.iter().all(PhasedVerdict::is_equal),
        }
    }

    pub fn format(&self) -> GridFormat {
        match self {
            Outcome::Cso(_) => GridFormat::Cso,
            Outcome::Fm(_) => GridFormat::Fm,
        }
    }
}

pub fn text_report(gt: &Path, candidates: &[PathBuf], outcome: &Outcome) -> Vec<String> {
    let gt_name = display_name(gt);

    match outcome {
        Outcome::Cso(verdicts) => candidates
            .iter()
            .zip(verdicts)
            .map(|(candidate, verdict)| {
                comparison_line(&gt_name, None, &display_name(candidate), Some(verdict))
            })
            .collect(),

        Outcome::Fm(verdicts) => {
            let initial_lines = candidates.iter().zip(verdicts).map(|(candidate, verdict)| {
                comparison_line(
                    &gt_name,
                    Some("initial matrix"),
                    &display_name(candidate),
                    Some(&verdict.initial),
                )
            });

            let final_lines = candidates.iter().zip(verdicts).map(|(candidate, verdict)| {
                comparison_line(
                    &gt_name,
                    Some("final matrix"),
                    &display_name(candidate),
                    verdict.last.as_ref(),
                )
            });

            initial_lines
                .chain([String::new()])
                .chain(final_lines)
                .collect()
        }
    }
}

/// `verdict` is `None` for a comparison that was skipped.
fn comparison_line(
    gt_name: &str,
    what: Option<&str>,
    candidate_name: &str,
    verdict: Option<&Verdict>,
) -> String {
    let subject = match what {
        Some(what) => format!("{gt_name} {what}"),
        None => gt_name.to_owned(),
    };

    let detail = match verdict {
        None => Some("not compared".to_owned()),
        Some(Verdict::Equal | Verdict::ContentMismatch) => None,
        Some(verdict) => Some(verdict.to_string()),
    };

    let equal = verdict.is_some_and(Verdict::is_equal);
    let mut line = format!("{subject} {} {candidate_name}", relation_colored(equal));

    if let Some(detail) = detail {
        line.push_str(&format!(" ({})", detail.as_str().dimmed()));
    }

    line
}

fn relation_colored(equal: bool) -> ColoredString {
    if equal {
        "is equal to".bright_green()
    } else {
        "is different from".bright_red()
    }
}

#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub generated_at: String,
    pub format: GridFormat,
    pub ground_truth: String,
    pub all_equal: bool,
    pub candidates: Vec<JsonCandidate>,
}

#[derive(Debug, Serialize)]
pub struct JsonCandidate {
    pub path: String,
    pub equal: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<JsonVerdict>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<JsonVerdict>,

    #[serde(rename = "final", skip_serializing_if = "Option::is_none")]
    pub last: Option<JsonVerdict>,

    /// FM only: whether each generation matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phases: Option<VerdictPair>,
}

#[derive(Debug, Serialize)]
pub struct JsonVerdict {
    pub kind: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&Verdict> for JsonVerdict {
    fn from(verdict: &Verdict) -> Self {
        Self {
            kind: verdict.kind(),
            error: verdict.error().map(ToString::to_string),
        }
    }
}

pub fn json_report(gt: &Path, candidates: &[PathBuf], outcome: &Outcome) -> JsonReport {
    let candidate_reports = match outcome {
        Outcome::Cso(verdicts) => candidates
            .iter()
            .zip(verdicts)
            .map(|(candidate, verdict)| JsonCandidate {
                path: candidate.display().to_string(),
                equal: verdict.is_equal(),
                verdict: Some(verdict.into()),
                initial: None,
                last: None,
                phases: None,
            })
            .collect(),

        Outcome::Fm(verdicts) => candidates
            .iter()
            .zip(verdicts)
            .map(|(candidate, verdict)| JsonCandidate {
                path: candidate.display().to_string(),
                equal: verdict.is_equal(),
                verdict: None,
                initial: Some((&verdict.initial).into()),
                last: verdict.last.as_ref().map(JsonVerdict::from),
                phases: Some(verdict.into()),
            })
            .collect(),
    };

    JsonReport {
        generated_at: chrono::Local::now().to_rfc3339(),
        format: outcome.format(),
        ground_truth: gt.display().to_string(),
        all_equal: outcome.all_equal(),
        candidates: candidate_reports,
    }
}
