// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! The two cultures of complete indifference. Impartial Culture draws every ranking
//! uniformly and independently; Impartial Anonymous Culture first draws one random
//! skew over the whole ranking space and then draws every ballot from that skew.

use crate::generator::{fold_pool, BallotGenerator};
use crate::permutation::{check_permutation_capacity, enumerate_rankings, permutation_count, uniform_ranking, DEFAULT_MAX_PERMUTATIONS};
use crate::validation::{resolve_ballot_length, ModelError};
use ballots::contest::{CandidateIndex, ContestMetadata};
use ballots::profile::PreferenceProfile;
use log::debug;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use rand_distr::Exp1;

/// Impartial Culture : every length `ballot_length` ranking is equally likely,
/// independently for every voter.
pub struct ImpartialCulture {
    candidates : Vec<CandidateIndex>,
    num_ballots : usize,
    ballot_length : usize,
    /// the materialized ranking space, when small enough to enumerate. Above the
    /// enumeration limit each ballot is drawn directly, which is the same distribution.
    space : Option<Vec<Vec<CandidateIndex>>>,
}

impl ImpartialCulture {
    pub fn new(metadata:&ContestMetadata,num_ballots:usize,ballot_length:Option<usize>) -> Result<Self,ModelError> {
        let candidates = metadata.candidate_indices();
        let ballot_length = resolve_ballot_length(ballot_length,candidates.len())?;
        let space = if permutation_count(candidates.len(),ballot_length)<=DEFAULT_MAX_PERMUTATIONS {
            Some(enumerate_rankings(&candidates,ballot_length))
        } else {
            debug!("ranking space over {} candidates is too large to enumerate, drawing ballots directly",candidates.len());
            None
        };
        Ok(ImpartialCulture{ candidates, num_ballots, ballot_length, space })
    }
}

impl BallotGenerator for ImpartialCulture {
    fn generate_profile<R:Rng+?Sized>(&self,rng:&mut R) -> PreferenceProfile {
        let mut pool = Vec::with_capacity(self.num_ballots);
        for _ in 0..self.num_ballots {
            let ranking = match &self.space {
                Some(space) => space[rng.random_range(0..space.len())].clone(),
                None => uniform_ranking(&self.candidates,self.ballot_length,rng),
            };
            pool.push(ranking);
        }
        fold_pool(pool,&self.candidates)
    }
}

/// Impartial Anonymous Culture : one probability vector over the whole ranking space
/// is drawn uniformly from the simplex, and every ballot is then drawn from it. Unlike
/// Impartial Culture the realized skew needs the whole space in memory, so a space
/// over the limit is a construction error rather than a fallback.
pub struct ImpartialAnonymousCulture {
    candidates : Vec<CandidateIndex>,
    num_ballots : usize,
    space : Vec<Vec<CandidateIndex>>,
}

impl ImpartialAnonymousCulture {
    pub fn new(metadata:&ContestMetadata,num_ballots:usize,ballot_length:Option<usize>) -> Result<Self,ModelError> {
        Self::with_limit(metadata,num_ballots,ballot_length,DEFAULT_MAX_PERMUTATIONS)
    }

    /// Like new, but with an explicit bound on how large a ranking space may be materialized.
    pub fn with_limit(metadata:&ContestMetadata,num_ballots:usize,ballot_length:Option<usize>,limit:u128) -> Result<Self,ModelError> {
        let candidates = metadata.candidate_indices();
        let ballot_length = resolve_ballot_length(ballot_length,candidates.len())?;
        check_permutation_capacity(candidates.len(),ballot_length,limit)?;
        let space = enumerate_rankings(&candidates,ballot_length);
        Ok(ImpartialAnonymousCulture{ candidates, num_ballots, space })
    }
}

impl BallotGenerator for ImpartialAnonymousCulture {
    fn generate_profile<R:Rng+?Sized>(&self,rng:&mut R) -> PreferenceProfile {
        // normalized unit exponentials are a uniform draw from the simplex
        let weights : Vec<f64> = (0..self.space.len()).map(|_|rng.sample::<f64,_>(Exp1)).collect();
        let skew = WeightedIndex::new(&weights).unwrap();
        let mut pool = Vec::with_capacity(self.num_ballots);
        for _ in 0..self.num_ballots {
            pool.push(self.space[skew.sample(rng)].clone());
        }
        fold_pool(pool,&self.candidates)
    }
}
