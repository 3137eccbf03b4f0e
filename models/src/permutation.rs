// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! The space of length k rankings over a candidate list : counting it, bounding it,
//! enumerating it, and drawing from it uniformly without materializing it.

use crate::validation::ModelError;
use ballots::contest::CandidateIndex;
use itertools::Itertools;
use rand::Rng;

/// The largest ranking space a model will materialize unless told otherwise.
pub const DEFAULT_MAX_PERMUTATIONS : u128 = 40_320; // 8!

/// The number of length k orderings of n candidates, saturating at u128::MAX.
pub fn permutation_count(candidates:usize,length:usize) -> u128 {
    if length>candidates { return 0; }
    let mut count : u128 = 1;
    for i in 0..length {
        count = count.saturating_mul((candidates-i) as u128);
    }
    count
}

/// Fail if materializing the length k ranking space would exceed the limit.
pub fn check_permutation_capacity(candidates:usize,length:usize,limit:u128) -> Result<(),ModelError> {
    let permutations = permutation_count(candidates,length);
    if permutations>limit {
        return Err(ModelError::PermutationSpaceTooLarge{ candidates, length, permutations, limit });
    }
    Ok(())
}

/// All length k orderings of the given candidates.
pub fn enumerate_rankings(candidates:&[CandidateIndex],length:usize) -> Vec<Vec<CandidateIndex>> {
    candidates.iter().copied().permutations(length).collect()
}

/// One uniformly random length k ordering, drawn without materializing the space.
pub fn uniform_ranking<R:Rng+?Sized>(candidates:&[CandidateIndex],length:usize,rng:&mut R) -> Vec<CandidateIndex> {
    let mut pool : Vec<CandidateIndex> = candidates.to_vec();
    // partial Fisher-Yates, only the prefix we keep needs shuffling
    for i in 0..length {
        let j = rng.random_range(i..pool.len());
        pool.swap(i,j);
    }
    pool.truncate(length);
    pool
}
