// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! The Cambridge sampler : ballots are drawn by bootstrapping a table of historically
//! observed ballot types, sequences of bloc symbols such as majority-minority-majority,
//! and instantiating each symbol with a candidate from the matching slate.

use crate::generator::{fold_pool, BallotGenerator};
use crate::interval::{validate_blocs, PreferenceInterval, VoterBloc};
use crate::sampling::{round_share, weighted_ranking_without_replacement, SampleWithReplacement};
use crate::validation::{resolve_ballot_length, ModelError};
use ballots::contest::{CandidateIndex, ContestMetadata};
use ballots::profile::PreferenceProfile;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Which of the two blocs a ballot type symbol stands for.
#[derive(Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord,Hash,Serialize,Deserialize)]
pub enum BlocLabel { Majority, Minority }

impl BlocLabel {
    pub fn opposite(self) -> BlocLabel {
        match self { BlocLabel::Majority => BlocLabel::Minority, BlocLabel::Minority => BlocLabel::Majority }
    }
}

impl Display for BlocLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self { BlocLabel::Majority => "majority", BlocLabel::Minority => "minority" })
    }
}

/// Historically observed ballot types and how often each was seen.
#[derive(Debug,Clone,Default,PartialEq,Serialize,Deserialize)]
pub struct BallotTypeTable {
    observed : Vec<(Vec<BlocLabel>,usize)>,
}

impl BallotTypeTable {
    pub fn new() -> Self { Default::default() }

    pub fn add(&mut self,ballot_type:Vec<BlocLabel>,count:usize) {
        self.observed.push((ballot_type,count));
    }

    pub fn is_empty(&self) -> bool { self.observed.is_empty() }

    fn validate(&self) -> Result<(),ModelError> {
        if self.observed.is_empty() { return Err(ModelError::EmptyTypeTable); }
        for (ballot_type,count) in &self.observed {
            if ballot_type.is_empty() { return Err(ModelError::BadTypeTable("a ballot type must hold at least one symbol".to_string())); }
            if *count==0 { return Err(ModelError::BadTypeTable("observed counts must be positive".to_string())); }
        }
        for label in [BlocLabel::Majority,BlocLabel::Minority] {
            if !self.observed.iter().any(|(t,_)|t[0]==label) { return Err(ModelError::NoTypesLedBy(label)); }
        }
        Ok(())
    }
}

/// Everything one bloc needs at generation time.
struct CambridgePlan {
    name : String,
    label : BlocLabel,
    crossover_rate : f64,
    interval : PreferenceInterval,
    ballots : usize,
}

pub struct CambridgeSampler {
    candidates : Vec<CandidateIndex>,
    ballot_length : usize,
    majority_slate : Vec<CandidateIndex>,
    minority_slate : Vec<CandidateIndex>,
    /// the observed types split by their leading symbol.
    majority_types : SampleWithReplacement<Vec<BlocLabel>>,
    minority_types : SampleWithReplacement<Vec<BlocLabel>>,
    plans : Vec<CambridgePlan>,
}

impl CambridgeSampler {
    /// Exactly two blocs, each naming a slate that together cover every candidate.
    /// `crossover_rates` maps a bloc to the chance one of its ballots follows a type
    /// led by the other bloc's symbol; a bloc with no entry never crosses over.
    pub fn new(metadata:&ContestMetadata,num_ballots:usize,ballot_length:Option<usize>,
               blocs:Vec<VoterBloc>,majority_bloc:&str,minority_bloc:&str,
               crossover_rates:BTreeMap<String,f64>,ballot_types:BallotTypeTable) -> Result<Self,ModelError> {
        let candidates = metadata.candidate_indices();
        let ballot_length = resolve_ballot_length(ballot_length,candidates.len())?;
        if blocs.len()!=2 { return Err(ModelError::NeedTwoBlocs(blocs.len())); }
        validate_blocs(&blocs,&candidates,false)?;
        if majority_bloc==minority_bloc { return Err(ModelError::BlocsNotDistinct); }
        for name in [majority_bloc,minority_bloc] {
            if !blocs.iter().any(|b|b.name==name) { return Err(ModelError::UnknownBloc(name.to_string())); }
        }
        for (name,&rate) in &crossover_rates {
            if !blocs.iter().any(|b|&b.name==name) { return Err(ModelError::UnknownBloc(name.clone())); }
            if !(rate.is_finite() && (0.0..=1.0).contains(&rate)) {
                return Err(ModelError::CrossoverRateOutOfRange{ bloc: name.clone(), rate });
            }
        }
        let slate_members = |name:&str| -> Result<Vec<CandidateIndex>,ModelError> {
            let slate = metadata.index_of_slate(name).ok_or_else(||ModelError::UnknownSlate(name.to_string()))?;
            Ok(metadata.slate_members(slate).to_vec())
        };
        let majority_slate = slate_members(majority_bloc)?;
        let minority_slate = slate_members(minority_bloc)?;
        for &candidate in &candidates {
            if !majority_slate.contains(&candidate) && !minority_slate.contains(&candidate) {
                return Err(ModelError::CandidateOutsideBlocs(candidate));
            }
        }
        ballot_types.validate()?;
        let mut majority_types = SampleWithReplacement::default();
        let mut minority_types = SampleWithReplacement::default();
        for (ballot_type,count) in &ballot_types.observed {
            match ballot_type[0] {
                BlocLabel::Majority => majority_types.add_multiple(ballot_type.clone(),*count),
                BlocLabel::Minority => minority_types.add_multiple(ballot_type.clone(),*count),
            }
        }
        let plans = blocs.into_iter().map(|bloc|CambridgePlan{
            label: if bloc.name==majority_bloc { BlocLabel::Majority } else { BlocLabel::Minority },
            crossover_rate: crossover_rates.get(&bloc.name).copied().unwrap_or(0.0),
            ballots: round_share(num_ballots,bloc.proportion),
            name: bloc.name,
            interval: bloc.interval,
        }).collect();
        Ok(CambridgeSampler{ candidates, ballot_length, majority_slate, minority_slate, majority_types, minority_types, plans })
    }

    fn types_for(&self,label:BlocLabel) -> &SampleWithReplacement<Vec<BlocLabel>> {
        match label { BlocLabel::Majority => &self.majority_types, BlocLabel::Minority => &self.minority_types }
    }

    /// Fill a symbol sequence with candidates. Each symbol takes the next entry of a
    /// fresh weighted order over its slate; a symbol whose slate is exhausted is skipped.
    fn instantiate<R:Rng+?Sized>(&self,symbols:&[BlocLabel],interval:&PreferenceInterval,rng:&mut R) -> Vec<CandidateIndex> {
        let mut majority_order = weighted_ranking_without_replacement(&self.majority_slate,interval,self.majority_slate.len(),rng).into_iter();
        let mut minority_order = weighted_ranking_without_replacement(&self.minority_slate,interval,self.minority_slate.len(),rng).into_iter();
        let mut ranking = vec![];
        for symbol in symbols {
            let next = match symbol {
                BlocLabel::Majority => majority_order.next(),
                BlocLabel::Minority => minority_order.next(),
            };
            if let Some(candidate) = next { ranking.push(candidate); }
        }
        ranking.truncate(self.ballot_length);
        ranking
    }
}

impl BallotGenerator for CambridgeSampler {
    fn generate_profile<R:Rng+?Sized>(&self,rng:&mut R) -> PreferenceProfile {
        let mut pool = vec![];
        for plan in &self.plans {
            debug!("bloc {} casting {} ballots",plan.name,plan.ballots);
            for _ in 0..plan.ballots {
                let crossed = rng.random_bool(plan.crossover_rate);
                let leading = if crossed { plan.label.opposite() } else { plan.label };
                let symbols = self.types_for(leading).get(rng);
                pool.push(self.instantiate(&symbols,&plan.interval,rng));
            }
        }
        fold_pool(pool,&self.candidates)
    }
}
