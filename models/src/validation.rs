// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! Configuration checking shared by the generator models. Everything is checked when
//! a model is constructed; a constructed model cannot fail to generate.

use crate::cambridge::BlocLabel;
use crate::spatial::DistributionRole;
use ballots::contest::CandidateIndex;
use thiserror::Error;

/// A problem with a model's configuration, reported before any sampling happens.
#[derive(Error,Debug,PartialEq)]
pub enum ModelError {
    #[error("a model needs at least one voter bloc")]
    NoBlocs,
    #[error("voter bloc {0} is listed more than once")]
    DuplicateBloc(String),
    #[error("bloc {bloc} has proportion {proportion}, which is not in [0,1]")]
    ProportionOutOfRange{ bloc : String, proportion : f64 },
    #[error("bloc proportions sum to {0}, not 1")]
    ProportionsDoNotSumToOne(f64),
    #[error("bloc {bloc} has no support entry for candidate {candidate}")]
    MissingIntervalEntry{ bloc : String, candidate : CandidateIndex },
    #[error("bloc {bloc} gives candidate {candidate} support {support}, which is not a non-negative finite number")]
    InvalidSupport{ bloc : String, candidate : CandidateIndex, support : f64 },
    #[error("bloc {0} supports no candidate at all")]
    EmptyInterval(String),
    #[error("bloc {bloc} gives candidate {candidate} zero support, which this model cannot work with")]
    ZeroSupport{ bloc : String, candidate : CandidateIndex },
    #[error("bloc {0} does not name a slate of the contest")]
    UnknownSlate(String),
    #[error("bloc {0} is not one of the model's blocs")]
    UnknownBloc(String),
    #[error("bloc {0} has a crossover rate towards itself")]
    SelfCrossover(String),
    #[error("bloc {bloc} has crossover rate {rate}, which is not in [0,1]")]
    CrossoverRateOutOfRange{ bloc : String, rate : f64 },
    #[error("bloc {bloc} has crossover rates summing to {total}, more than 1")]
    CrossoverRatesExceedOne{ bloc : String, total : f64 },
    #[error("ballot length {requested} is not between 1 and the number of candidates, {candidates}")]
    BadBallotLength{ requested : usize, candidates : usize },
    #[error("{permutations} rankings of length {length} over {candidates} candidates is beyond the limit of {limit}")]
    PermutationSpaceTooLarge{ candidates : usize, length : usize, permutations : u128, limit : u128 },
    #[error("the ranking weights computed for bloc {bloc} cannot be sampled from : {reason}")]
    UnusableWeights{ bloc : String, reason : String },
    #[error("the {role} distribution is invalid : {reason}")]
    BadDistribution{ role : DistributionRole, reason : String },
    #[error("the voter distribution for a clustered model must be Normal or Gumbel")]
    UnsupportedVoterDistribution,
    #[error("voter points have dimension {voter} but candidate points have dimension {candidate}")]
    DimensionMismatch{ voter : usize, candidate : usize },
    #[error("{clusters} clusters cannot all be filled from {candidates} candidates")]
    BadClusterCount{ clusters : usize, candidates : usize },
    #[error("this model needs exactly two voter blocs, not {0}")]
    NeedTwoBlocs(usize),
    #[error("the majority and minority blocs must be distinct")]
    BlocsNotDistinct,
    #[error("candidate {0} belongs to neither bloc's slate")]
    CandidateOutsideBlocs(CandidateIndex),
    #[error("the ballot type table is empty")]
    EmptyTypeTable,
    #[error("bad ballot type table : {0}")]
    BadTypeTable(String),
    #[error("the ballot type table has no types led by the {0} bloc")]
    NoTypesLedBy(BlocLabel),
}

/// The ranking length a model should use : the request, or the full candidate count
/// if the caller left it unspecified.
pub(crate) fn resolve_ballot_length(requested:Option<usize>,num_candidates:usize) -> Result<usize,ModelError> {
    let length = requested.unwrap_or(num_candidates);
    if length==0 || length>num_candidates {
        return Err(ModelError::BadBallotLength{ requested: length, candidates: num_candidates });
    }
    Ok(length)
}
