// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! Suggest the recognized key a user most likely meant.

use crate::{Error, Result};

#[cfg(test)]
#[path = "./matcher_test.rs"]
mod matcher_test;

/// Find the candidate closest to `query` by Levenshtein distance.
///
/// Ties are broken by choosing the lexicographically smallest candidate,
/// so the answer does not depend on the iteration order of `candidates`.
/// Comparison is case-sensitive and counts unicode scalar values.
///
/// Runs in `O(candidates * query * candidate)` time, which is fine for
/// the tens of option names this is used with.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if `candidates` is empty.
pub fn find_match<'a, I>(query: &str, candidates: I) -> Result<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let (distance, best) = candidates
        .into_iter()
        .map(|candidate| (strsim::levenshtein(query, candidate), candidate))
        .min()
        .ok_or_else(|| {
            Error::InvalidArgument("no candidates to match against".to_string())
        })?;

    tracing::trace!(query, best, distance, "closest recognized key");
    Ok(best)
}
