// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! The Bradley-Terry model : a ranking's probability is the product, over every pair
//! it orders, of the probability that pairwise comparison comes out that way. This
//! needs the whole permutation space of the candidate list, so the model only accepts
//! small contests.

use crate::generator::{fold_pool, BallotGenerator};
use crate::interval::{validate_blocs, PreferenceInterval, VoterBloc};
use crate::permutation::{check_permutation_capacity, enumerate_rankings, DEFAULT_MAX_PERMUTATIONS};
use crate::sampling::round_share;
use crate::validation::{resolve_ballot_length, ModelError};
use ballots::contest::{CandidateIndex, ContestMetadata};
use ballots::profile::PreferenceProfile;
use log::debug;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;

/// The unnormalized probability the model assigns a ranking : the product over every
/// ordered pair (i earlier than j) of support(i)/(support(i)+support(j)).
pub fn ranking_probability(interval:&PreferenceInterval,ranking:&[CandidateIndex]) -> f64 {
    let mut p = 1.0;
    for i in 0..ranking.len() {
        for j in i+1..ranking.len() {
            let si = interval.support(ranking[i]);
            let sj = interval.support(ranking[j]);
            p *= si/(si+sj);
        }
    }
    p
}

pub struct BradleyTerry {
    candidates : Vec<CandidateIndex>,
    num_ballots : usize,
    ballot_length : usize,
    space : Vec<Vec<CandidateIndex>>,
    /// per bloc : name, electorate share, and its categorical distribution over the space.
    per_bloc : Vec<(String,f64,WeightedIndex<f64>)>,
}

impl BradleyTerry {
    pub fn new(metadata:&ContestMetadata,num_ballots:usize,ballot_length:Option<usize>,blocs:Vec<VoterBloc>) -> Result<Self,ModelError> {
        Self::with_limit(metadata,num_ballots,ballot_length,blocs,DEFAULT_MAX_PERMUTATIONS)
    }

    /// Like new, but with an explicit bound on how large a permutation space may be materialized.
    pub fn with_limit(metadata:&ContestMetadata,num_ballots:usize,ballot_length:Option<usize>,blocs:Vec<VoterBloc>,limit:u128) -> Result<Self,ModelError> {
        let candidates = metadata.candidate_indices();
        let ballot_length = resolve_ballot_length(ballot_length,candidates.len())?;
        // a zero support candidate would make some pairwise comparison 0/0
        validate_blocs(&blocs,&candidates,true)?;
        check_permutation_capacity(candidates.len(),candidates.len(),limit)?;
        let space = enumerate_rankings(&candidates,candidates.len());
        let mut per_bloc = vec![];
        for bloc in blocs {
            let weights : Vec<f64> = space.iter().map(|r|ranking_probability(&bloc.interval,r)).collect();
            let dist = WeightedIndex::new(&weights)
                .map_err(|e|ModelError::UnusableWeights{ bloc: bloc.name.clone(), reason: e.to_string() })?;
            per_bloc.push((bloc.name,bloc.proportion,dist));
        }
        Ok(BradleyTerry{ candidates, num_ballots, ballot_length, space, per_bloc })
    }
}

impl BallotGenerator for BradleyTerry {
    fn generate_profile<R:Rng+?Sized>(&self,rng:&mut R) -> PreferenceProfile {
        let mut pool = vec![];
        for (name,proportion,dist) in &self.per_bloc {
            let bloc_ballots = round_share(self.num_ballots,*proportion);
            debug!("bloc {} casting {} ballots",name,bloc_ballots);
            for _ in 0..bloc_ballots {
                let mut ranking = self.space[dist.sample(rng)].clone();
                ranking.truncate(self.ballot_length);
                pool.push(ranking);
            }
        }
        fold_pool(pool,&self.candidates)
    }
}
