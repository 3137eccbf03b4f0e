// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! The Alternating Crossover model. Each bloc is tied to a slate of candidates;
//! loyal voters rank their own slate, crossover voters alternate between an opposing
//! slate and their own, opposing candidate first.

use crate::generator::{fold_pool, BallotGenerator};
use crate::interval::{validate_blocs, PreferenceInterval, VoterBloc, PROPORTION_TOLERANCE};
use crate::sampling::{round_share, weighted_ranking_without_replacement};
use crate::validation::{resolve_ballot_length, ModelError};
use ballots::contest::{CandidateIndex, ContestMetadata};
use ballots::profile::PreferenceProfile;
use itertools::Itertools;
use log::debug;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

/// Everything one bloc needs at generation time, with ballot counts already resolved.
struct BlocPlan {
    name : String,
    interval : PreferenceInterval,
    own_slate : Vec<CandidateIndex>,
    /// ballots that stay home and rank only the bloc's own slate.
    loyal : usize,
    /// per pairing : the opposing bloc's name, its slate, and how many ballots cross to it.
    crossovers : Vec<(String,Vec<CandidateIndex>,usize)>,
}

pub struct AlternatingCrossover {
    candidates : Vec<CandidateIndex>,
    ballot_length : usize,
    plans : Vec<BlocPlan>,
}

impl AlternatingCrossover {
    /// Bloc names must each name a slate in the metadata. `crossover_rates` maps a
    /// bloc to the share of its ballots crossing to each other bloc; a bloc with no
    /// entry casts loyal ballots only.
    pub fn new(metadata:&ContestMetadata,num_ballots:usize,ballot_length:Option<usize>,
               blocs:Vec<VoterBloc>,crossover_rates:BTreeMap<String,BTreeMap<String,f64>>) -> Result<Self,ModelError> {
        let candidates = metadata.candidate_indices();
        let ballot_length = resolve_ballot_length(ballot_length,candidates.len())?;
        validate_blocs(&blocs,&candidates,false)?;
        let mut slates : HashMap<String,Vec<CandidateIndex>> = HashMap::new();
        for bloc in &blocs {
            let slate = metadata.index_of_slate(&bloc.name).ok_or_else(||ModelError::UnknownSlate(bloc.name.clone()))?;
            slates.insert(bloc.name.clone(),metadata.slate_members(slate).to_vec());
        }
        for (from,targets) in &crossover_rates {
            if !slates.contains_key(from) { return Err(ModelError::UnknownBloc(from.clone())); }
            let mut total = 0.0;
            for (to,&rate) in targets {
                if !slates.contains_key(to) { return Err(ModelError::UnknownBloc(to.clone())); }
                if to==from { return Err(ModelError::SelfCrossover(from.clone())); }
                if !(rate.is_finite() && (0.0..=1.0).contains(&rate)) {
                    return Err(ModelError::CrossoverRateOutOfRange{ bloc: from.clone(), rate });
                }
                total += rate;
            }
            if total-1.0>PROPORTION_TOLERANCE { return Err(ModelError::CrossoverRatesExceedOne{ bloc: from.clone(), total }); }
        }
        let mut plans = vec![];
        for bloc in blocs {
            let bloc_ballots = round_share(num_ballots,bloc.proportion);
            let mut remaining = bloc_ballots;
            let mut crossovers = vec![];
            if let Some(targets) = crossover_rates.get(&bloc.name) {
                for (to,&rate) in targets {
                    // rounding of several rates may overshoot the bloc's total
                    let count = round_share(bloc_ballots,rate).min(remaining);
                    remaining -= count;
                    crossovers.push((to.clone(),slates[to.as_str()].clone(),count));
                }
            }
            plans.push(BlocPlan{
                own_slate: slates[bloc.name.as_str()].clone(),
                name: bloc.name,
                interval: bloc.interval,
                loyal: remaining,
                crossovers,
            });
        }
        Ok(AlternatingCrossover{ candidates, ballot_length, plans })
    }
}

impl BallotGenerator for AlternatingCrossover {
    fn generate_profile<R:Rng+?Sized>(&self,rng:&mut R) -> PreferenceProfile {
        let mut pool = vec![];
        for plan in &self.plans {
            debug!("bloc {} casting {} loyal ballots",plan.name,plan.loyal);
            for (to,opposing,count) in &plan.crossovers {
                debug!("bloc {} crossing {} ballots to {}",plan.name,count,to);
                for _ in 0..*count {
                    let own = weighted_ranking_without_replacement(&plan.own_slate,&plan.interval,plan.own_slate.len(),rng);
                    let other = weighted_ranking_without_replacement(opposing,&plan.interval,opposing.len(),rng);
                    let mut ranking : Vec<CandidateIndex> = other.into_iter().interleave(own).collect();
                    ranking.truncate(self.ballot_length);
                    pool.push(ranking);
                }
            }
            for _ in 0..plan.loyal {
                let mut ranking = weighted_ranking_without_replacement(&plan.own_slate,&plan.interval,plan.own_slate.len(),rng);
                ranking.truncate(self.ballot_length);
                pool.push(ranking);
            }
        }
        fold_pool(pool,&self.candidates)
    }
}
