// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! The Plackett-Luce model : each voter repeatedly picks their next favourite from
//! the candidates not yet ranked, with probability proportional to their bloc's
//! support for each candidate.

use crate::generator::{fold_pool, BallotGenerator};
use crate::interval::{validate_blocs, VoterBloc};
use crate::sampling::{round_share, weighted_ranking_without_replacement};
use crate::validation::{resolve_ballot_length, ModelError};
use ballots::contest::{CandidateIndex, ContestMetadata};
use ballots::profile::PreferenceProfile;
use log::debug;
use rand::Rng;

pub struct PlackettLuce {
    candidates : Vec<CandidateIndex>,
    num_ballots : usize,
    ballot_length : usize,
    blocs : Vec<VoterBloc>,
}

impl PlackettLuce {
    pub fn new(metadata:&ContestMetadata,num_ballots:usize,ballot_length:Option<usize>,blocs:Vec<VoterBloc>) -> Result<Self,ModelError> {
        let candidates = metadata.candidate_indices();
        let ballot_length = resolve_ballot_length(ballot_length,candidates.len())?;
        validate_blocs(&blocs,&candidates,false)?;
        Ok(PlackettLuce{ candidates, num_ballots, ballot_length, blocs })
    }
}

impl BallotGenerator for PlackettLuce {
    fn generate_profile<R:Rng+?Sized>(&self,rng:&mut R) -> PreferenceProfile {
        let mut pool = vec![];
        for bloc in &self.blocs {
            let bloc_ballots = round_share(self.num_ballots,bloc.proportion);
            debug!("bloc {} casting {} ballots",bloc.name,bloc_ballots);
            for _ in 0..bloc_ballots {
                pool.push(weighted_ranking_without_replacement(&self.candidates,&bloc.interval,self.ballot_length,rng));
            }
        }
        fold_pool(pool,&self.candidates)
    }
}
