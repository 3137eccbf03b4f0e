// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! Preference intervals and voter blocs : the population level preference parameters
//! the bloc driven models are configured with.

use crate::validation::ModelError;
use ballots::contest::CandidateIndex;
use serde::{Deserialize,Serialize};
use std::collections::BTreeMap;

/// How far bloc proportions may be from summing to 1 before the configuration is rejected.
pub(crate) const PROPORTION_TOLERANCE : f64 = 1e-8;

/// Unnormalized support weights over candidates : the selection probabilities the
/// sampling models draw with.
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct PreferenceInterval {
    support : BTreeMap<CandidateIndex,f64>,
}

impl PreferenceInterval {
    pub fn new(support:BTreeMap<CandidateIndex,f64>) -> Self { PreferenceInterval{ support } }
    /// equal support for each of the given candidates.
    pub fn uniform(candidates:&[CandidateIndex]) -> Self {
        PreferenceInterval{ support: candidates.iter().map(|&c|(c,1.0)).collect() }
    }
    pub fn from_pairs(pairs:&[(CandidateIndex,f64)]) -> Self {
        PreferenceInterval{ support: pairs.iter().copied().collect() }
    }
    /// the support for a candidate, zero if the interval does not mention them.
    pub fn support(&self,candidate:CandidateIndex) -> f64 {
        self.support.get(&candidate).copied().unwrap_or(0.0)
    }
    /// Check the interval covers every listed candidate with usable weights.
    pub fn validate(&self,bloc:&str,candidates:&[CandidateIndex],require_positive:bool) -> Result<(),ModelError> {
        let mut any_positive = false;
        for &candidate in candidates {
            match self.support.get(&candidate) {
                None => { return Err(ModelError::MissingIntervalEntry{ bloc: bloc.to_string(), candidate }); }
                Some(&support) => {
                    if !(support.is_finite() && support>=0.0) {
                        return Err(ModelError::InvalidSupport{ bloc: bloc.to_string(), candidate, support });
                    }
                    if support==0.0 && require_positive {
                        return Err(ModelError::ZeroSupport{ bloc: bloc.to_string(), candidate });
                    }
                    if support>0.0 { any_positive = true; }
                }
            }
        }
        if !any_positive { return Err(ModelError::EmptyInterval(bloc.to_string())); }
        Ok(())
    }
}

/// A named sub-population of voters sharing one preference interval.
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct VoterBloc {
    pub name : String,
    /// share of the electorate, in [0,1]. All the blocs' proportions must sum to 1.
    pub proportion : f64,
    pub interval : PreferenceInterval,
}

impl VoterBloc {
    pub fn new(name:&str,proportion:f64,interval:PreferenceInterval) -> Self {
        VoterBloc{ name: name.to_string(), proportion, interval }
    }
}

/// Check bloc names are distinct, proportions sum to 1, and every bloc's interval
/// covers every candidate.
pub(crate) fn validate_blocs(blocs:&[VoterBloc],candidates:&[CandidateIndex],require_positive:bool) -> Result<(),ModelError> {
    if blocs.is_empty() { return Err(ModelError::NoBlocs); }
    let mut total = 0.0;
    for (i,bloc) in blocs.iter().enumerate() {
        if blocs[..i].iter().any(|b|b.name==bloc.name) { return Err(ModelError::DuplicateBloc(bloc.name.clone())); }
        if !(bloc.proportion.is_finite() && (0.0..=1.0).contains(&bloc.proportion)) {
            return Err(ModelError::ProportionOutOfRange{ bloc: bloc.name.clone(), proportion: bloc.proportion });
        }
        total += bloc.proportion;
        bloc.interval.validate(&bloc.name,candidates,require_positive)?;
    }
    if (total-1.0).abs()>PROPORTION_TOLERANCE { return Err(ModelError::ProportionsDoNotSumToOne(total)); }
    Ok(())
}
