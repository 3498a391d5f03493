use std::io::BufRead;

use itertools::Itertools;
use libgrid::Grid;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    config::VerifyConfig,
    error::{DecodeError, VerifyError},
    format::{cso::CsoReader, fm::FmStream},
    oracle::{self, Verdict},
    scheduler::WorkerPool,
    source::GridSource,
};

/// Checks every CSO candidate against the CSO ground truth. Verdicts are in candidate order.
pub fn verify_cso<G, C>(
    ground_truth: &G,
    candidates: &[C],
    config: &VerifyConfig,
) -> Result<Vec<Verdict>, VerifyError>
where
    G: GridSource + ?Sized,
    C: GridSource,
{
    info!(ground_truth = %ground_truth.name(), "reading ground-truth grid");
    let reference = open_ground_truth(ground_truth, |reader| CsoReader::open(reader)?.into_grid())?;

    info!(candidates = candidates.len(), "comparing candidate grids");
    let pool = WorkerPool::new(config.max_workers)?;
    compare_cso_candidates(&pool, &reference, candidates)
}

/// One decode+compare task per candidate, run on `pool`.
pub fn compare_cso_candidates<C>(
    pool: &WorkerPool,
    reference: &Grid,
    candidates: &[C],
) -> Result<Vec<Verdict>, VerifyError>
where
    C: GridSource,
{
    pool.run_batch(candidates.iter().collect_vec(), |candidate| {
        let verdict = try_compare_cso(reference, candidate).unwrap_or_else(Verdict::from);
        log_verdict(&candidate.name(), "grid", &verdict);
        verdict
    })
}

fn try_compare_cso<C>(reference: &Grid, candidate: &C) -> Result<Verdict, DecodeError>
where
    C: GridSource + ?Sized,
{
    let reader = CsoReader::open(candidate.open()?)?;

    if reader.dimensions() != reference.dimensions() {
        return Ok(Verdict::DimensionMismatch);
    }

    let grid = reader.into_grid()?;
    Ok(oracle::compare(reference, &grid))
}

/// Per-generation verdicts for one FM candidate.
#[derive(Debug)]
pub struct PhasedVerdict {
    pub initial: Verdict,

    /// `None` when the initial generation already diverged and the final one was never read.
    pub last: Option<Verdict>,
}

impl PhasedVerdict {
    /// `(initial_equal, final_equal)`. The final half is never true when the initial half isn't.
    pub fn as_pair(&self) -> (bool, bool) {
        let initial_equal = self.initial.is_equal();
        let final_equal = initial_equal && self.last.as_ref().is_some_and(Verdict::is_equal);

        (initial_equal, final_equal)
    }

    pub fn is_equal(&self) -> bool {
        self.as_pair() == (true, true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerdictPair {
    pub initial_equal: bool,
    pub final_equal: bool,
}

impl From<&PhasedVerdict> for VerdictPair {
    fn from(verdict: &PhasedVerdict) -> Self {
        let (initial_equal, final_equal) = verdict.as_pair();

        Self {
            initial_equal,
            final_equal,
        }
    }
}

/// Where an FM candidate stands after the initial-generation batch. A candidate that hasn't
/// been checked yet is just its source.
pub enum CandidateState<R> {
    /// Finished early. The source has already been released.
    Diverged(Verdict),

    /// The initial generation matched. The stream sits right after the delimiter, and the
    /// buffer gets overwritten with the final generation.
    ReadyForFinal { stream: FmStream<R>, buffer: Grid },
}

impl<R> CandidateState<R>
where
    R: BufRead,
{
    pub fn is_ready_for_final(&self) -> bool {
        matches!(self, CandidateState::ReadyForFinal { .. })
    }

    /// Runs the final-generation check, or short-circuits a diverged candidate without I/O.
    pub fn finalize(self, reference_final: &Grid) -> PhasedVerdict {
        match self {
            CandidateState::Diverged(initial) => PhasedVerdict {
                initial,
                last: None,
            },
            CandidateState::ReadyForFinal {
                mut stream,
                mut buffer,
            } => {
                let last = match stream.read_final_into(&mut buffer) {
                    Ok(()) => oracle::compare(reference_final, &buffer),
                    Err(error) => Verdict::Failed(error),
                };

                PhasedVerdict {
                    initial: Verdict::Equal,
                    last: Some(last),
                }
            }
        }
    }
}

/// Checks both generations of every FM candidate against the FM ground truth.
/// Verdicts are in candidate order.
///
/// The ground truth's final generation is decoded between the two batches, after every
/// candidate's initial generation has been checked. Candidates that diverged in the first
/// batch never have their final generation read.
pub fn verify_fm<G, C>(
    ground_truth: &G,
    candidates: &[C],
    config: &VerifyConfig,
) -> Result<Vec<PhasedVerdict>, VerifyError>
where
    G: GridSource + ?Sized,
    C: GridSource,
{
    info!(ground_truth = %ground_truth.name(), "reading initial ground-truth matrix");
    let (mut reference_stream, mut reference) = open_ground_truth(ground_truth, |reader| {
        let mut stream = FmStream::open(reader)?;
        let initial = stream.read_initial()?;
        Ok((stream, initial))
    })?;

    info!(candidates = candidates.len(), "comparing initial matrices");
    let pool = WorkerPool::new(config.max_workers)?;
    let states = check_initial_generations(&pool, &reference, candidates)?;

    let ready = states.iter().filter(|state| state.is_ready_for_final()).count();
    info!(ready, "reading final ground-truth matrix");
    reference_stream
        .read_final_into(&mut reference)
        .map_err(|source| VerifyError::GroundTruth {
            name: ground_truth.name().into_owned(),
            source,
        })?;
    drop(reference_stream);

    info!(candidates = candidates.len(), "comparing final matrices");
    check_final_generations(&pool, &reference, states)
}

/// First FM batch: header and initial generation of every candidate.
pub fn check_initial_generations<C>(
    pool: &WorkerPool,
    reference_initial: &Grid,
    candidates: &[C],
) -> Result<Vec<CandidateState<C::Reader>>, VerifyError>
where
    C: GridSource,
{
    pool.run_batch(candidates.iter().collect_vec(), |candidate| {
        let state = try_check_initial(reference_initial, candidate)
            .unwrap_or_else(|error| CandidateState::Diverged(Verdict::Failed(error)));

        if let CandidateState::Diverged(verdict) = &state {
            log_verdict(&candidate.name(), "initial matrix", verdict);
        } else {
            debug!(candidate = %candidate.name(), "initial matrix is equal");
        }

        state
    })
}

/// Second FM batch. Diverged candidates complete immediately.
pub fn check_final_generations<R>(
    pool: &WorkerPool,
    reference_final: &Grid,
    states: Vec<CandidateState<R>>,
) -> Result<Vec<PhasedVerdict>, VerifyError>
where
    R: BufRead + Send,
{
    pool.run_batch(states, |state| state.finalize(reference_final))
}

fn try_check_initial<C>(
    reference_initial: &Grid,
    candidate: &C,
) -> Result<CandidateState<C::Reader>, DecodeError>
where
    C: GridSource + ?Sized,
{
    let mut stream = FmStream::open(candidate.open()?)?;

    if stream.dimensions() != reference_initial.dimensions() {
        return Ok(CandidateState::Diverged(Verdict::DimensionMismatch));
    }

    let buffer = stream.read_initial()?;

    if oracle::grids_equal(reference_initial, &buffer) {
        Ok(CandidateState::ReadyForFinal { stream, buffer })
    } else {
        Ok(CandidateState::Diverged(Verdict::ContentMismatch))
    }
}

fn open_ground_truth<G, T, F>(ground_truth: &G, decode: F) -> Result<T, VerifyError>
where
    G: GridSource + ?Sized,
    F: FnOnce(G::Reader) -> Result<T, DecodeError>,
{
    ground_truth
        .open()
        .map_err(DecodeError::from)
        .and_then(decode)
        .map_err(|source| VerifyError::GroundTruth {
            name: ground_truth.name().into_owned(),
            source,
        })
}

fn log_verdict(candidate: &str, what: &str, verdict: &Verdict) {
    match verdict {
        Verdict::Failed(error) => warn!(candidate, "couldn't check {what}: {error}"),
        _ => debug!(candidate, verdict = verdict.kind(), "checked {what}"),
    }
}
