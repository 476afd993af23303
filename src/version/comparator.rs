//! Selection of the highest version in a candidate set

use crate::version::error::ResolveError;
use crate::version::types::VersionString;

/// Returns the highest version among `candidates`.
///
/// Components are compared position by position, most significant first.
/// At each depth only candidates holding the maximum component survive;
/// candidates without a component at that depth are dropped. The loop stops
/// as soon as one candidate is left. When several survivors can no longer be
/// told apart (identical text, or none of them has a further component) the
/// first one in input order wins.
pub fn highest(candidates: &[VersionString]) -> Result<&VersionString, ResolveError> {
    let max_depth = candidates
        .iter()
        .map(VersionString::len)
        .max()
        .ok_or(ResolveError::NoCandidates)?;

    let mut remaining: Vec<&VersionString> = candidates.iter().collect();

    for depth in 0..max_depth {
        let Some(best) = remaining.iter().filter_map(|v| v.component(depth)).max() else {
            break;
        };

        let survivors: Vec<&VersionString> = remaining
            .iter()
            .copied()
            .filter(|v| v.component(depth) == Some(best))
            .collect();

        if let [only] = survivors.as_slice() {
            return Ok(*only);
        }
        remaining = survivors;
    }

    // Non-empty: depth 0 always has a maximum, and every round keeps it.
    remaining
        .first()
        .copied()
        .ok_or(ResolveError::NoCandidates)
}
