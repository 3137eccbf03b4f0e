// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! A preference profile : the weighted collection of ballots cast in a contest,
//! or synthesized for one.

use crate::ballot::{expand_tied_ballot, strict_ranking, Ballot, SetRanking, TiedBlock};
use crate::contest::CandidateIndex;
use crate::tally::Tally;
use crate::tie_resolution::TiebreakPolicy;
use serde::{Deserialize,Serialize};
use std::collections::{BTreeMap,BTreeSet,HashMap};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// A problem with a ballot, a profile, or an operation over them.
#[derive(Error,Debug,PartialEq)]
pub enum ProfileError {
    #[error("ballot has no ranking")]
    BallotMissingRanking,
    #[error("ballot has neither scores nor a ranking")]
    BallotMissingScores,
    #[error("ranking contains an empty position")]
    EmptyRankingPosition,
    #[error("candidate {0} appears more than once in a ranking")]
    RepeatedCandidate(CandidateIndex),
    #[error("candidate {0} is not in the candidate list")]
    UnknownCandidate(CandidateIndex),
    #[error("score vector contains a negative entry")]
    NegativeScoreVector,
    #[error("score vector entries must not increase")]
    IncreasingScoreVector,
    #[error("ballot has multiple candidates tied for first place")]
    TiedFirstPlace,
    #[error("tiebreak policy {0} needs a profile to score")]
    TiebreakNeedsProfile(TiebreakPolicy),
    #[error("unknown tiebreak policy {0}")]
    UnknownTiebreakPolicy(String),
    #[error("cannot elect zero candidates")]
    ElectCountZero,
    #[error("cannot elect {wanted} candidates from a ranking holding {available}")]
    ElectCountTooLarge{ wanted : usize, available : usize },
    #[error("a tied position must be broken but no tiebreak policy was supplied")]
    UnbreakableTie,
}

/// A collection of weighted ballots over a fixed list of candidates. Ballots with
/// identical rankings and scores are folded into a single line with their weights
/// summed, and lines are kept in a canonical order, so two profiles built from the
/// same multiset of votes compare equal whatever order the votes arrived in.
#[derive(Clone,Debug,Serialize,Deserialize,PartialEq,Eq)]
pub struct PreferenceProfile {
    ballots : Vec<Ballot>,
    candidates : Vec<CandidateIndex>,
}

/// Merge ballots with identical rankings and scores, summing weights, and sort into
/// the canonical order. Voter sets union on merge; an id survives only when its line
/// was never merged with another.
fn fold(ballots:Vec<Ballot>) -> Vec<Ballot> {
    let mut merged : HashMap<(SetRanking,BTreeMap<CandidateIndex,Tally>),Ballot> = HashMap::new();
    for ballot in ballots {
        let key = (ballot.ranking.clone(),ballot.scores.clone());
        match merged.get_mut(&key) {
            None => { merged.insert(key,ballot); }
            Some(existing) => {
                existing.weight += ballot.weight;
                existing.voter_set.extend(ballot.voter_set);
                existing.id = None;
            }
        }
    }
    let mut folded : Vec<Ballot> = merged.into_values().collect();
    folded.sort();
    folded
}

impl PreferenceProfile {
    /// A profile whose candidate list is everything some ballot mentions.
    pub fn new(ballots:Vec<Ballot>) -> Result<Self,ProfileError> {
        let mut candidates : BTreeSet<CandidateIndex> = BTreeSet::new();
        for ballot in &ballots {
            candidates.extend(ballot.ranked_candidates());
            candidates.extend(ballot.scores.keys().copied());
        }
        Self::build(ballots,candidates.into_iter().collect())
    }

    /// A profile with an explicitly supplied candidate list. A ballot mentioning a
    /// candidate not on the list is an error.
    pub fn with_candidates(ballots:Vec<Ballot>,candidates:Vec<CandidateIndex>) -> Result<Self,ProfileError> {
        let mut candidates = candidates;
        candidates.sort_unstable();
        candidates.dedup();
        Self::build(ballots,candidates)
    }

    /// candidates must be sorted and deduplicated.
    fn build(ballots:Vec<Ballot>,candidates:Vec<CandidateIndex>) -> Result<Self,ProfileError> {
        for ballot in &ballots {
            let mut seen : BTreeSet<CandidateIndex> = BTreeSet::new();
            for block in &ballot.ranking {
                if block.is_empty() { return Err(ProfileError::EmptyRankingPosition); }
                for &candidate in block {
                    if !seen.insert(candidate) { return Err(ProfileError::RepeatedCandidate(candidate)); }
                    if candidates.binary_search(&candidate).is_err() { return Err(ProfileError::UnknownCandidate(candidate)); }
                }
            }
            for candidate in ballot.scores.keys() {
                if candidates.binary_search(candidate).is_err() { return Err(ProfileError::UnknownCandidate(*candidate)); }
            }
        }
        Ok(PreferenceProfile{ ballots: fold(ballots), candidates })
    }

    pub fn ballots(&self) -> &[Ballot] { &self.ballots }
    pub fn candidates(&self) -> &[CandidateIndex] { &self.candidates }
    pub fn num_candidates(&self) -> usize { self.candidates.len() }
    /// the number of distinct ballot lines, not the number of voters. See total_weight.
    pub fn num_ballots(&self) -> usize { self.ballots.len() }
    pub fn total_weight(&self) -> Tally { self.ballots.iter().map(|b|&b.weight).sum() }
    pub fn contains_candidate(&self,candidate:CandidateIndex) -> bool {
        self.candidates.binary_search(&candidate).is_ok()
    }

    /// The profile with the given candidates struck from every ballot. No ballot is
    /// dropped, even one left expressing nothing, so the total weight is unchanged.
    pub fn remove_candidates(&self,candidates:&[CandidateIndex]) -> PreferenceProfile {
        let ballots : Vec<Ballot> = self.ballots.iter().map(|b|b.remove_candidates(candidates)).collect();
        let remaining : Vec<CandidateIndex> = self.candidates.iter().filter(|c|!candidates.contains(c)).copied().collect();
        PreferenceProfile{ ballots: fold(ballots), candidates: remaining }
    }

    /// Every ballot extended with the candidates it failed to rank, appended as one
    /// final tied position. Errors on a ballot with no ranking at all.
    pub fn add_missing_cands(&self) -> Result<PreferenceProfile,ProfileError> {
        let mut ballots = vec![];
        for ballot in &self.ballots {
            if !ballot.has_ranking() { return Err(ProfileError::BallotMissingRanking); }
            let mentioned : BTreeSet<CandidateIndex> = ballot.ranked_candidates().collect();
            let missing : TiedBlock = self.candidates.iter().filter(|c|!mentioned.contains(c)).copied().collect();
            let mut extended = ballot.clone();
            if !missing.is_empty() { extended.ranking.push(missing); }
            ballots.push(extended);
        }
        Ok(PreferenceProfile{ ballots: fold(ballots), candidates: self.candidates.clone() })
    }

    /// Drop ballots expressing nothing, keeping the candidate list if asked. The one
    /// transform that discards weight.
    pub fn remove_empty_ballots(&self,keep_candidate_list:bool) -> PreferenceProfile {
        let ballots : Vec<Ballot> = self.ballots.iter().filter(|b|b.has_ranking()||b.has_scores()).cloned().collect();
        if keep_candidate_list {
            PreferenceProfile{ ballots, candidates: self.candidates.clone() }
        } else {
            let mut candidates : BTreeSet<CandidateIndex> = BTreeSet::new();
            for ballot in &ballots {
                candidates.extend(ballot.ranked_candidates());
                candidates.extend(ballot.scores.keys().copied());
            }
            PreferenceProfile{ ballots, candidates: candidates.into_iter().collect() }
        }
    }

    /// Replace every ballot holding ties by its strict expansions, each expansion
    /// getting an equal share of the ballot's weight. Total weight is conserved and
    /// the result has no tied positions.
    pub fn resolve_ties(&self) -> Result<PreferenceProfile,ProfileError> {
        let mut ballots = vec![];
        for ballot in &self.ballots {
            let expansions = expand_tied_ballot(ballot)?;
            let share = ballot.weight.share(expansions.len());
            for mut expansion in expansions {
                expansion.weight = share.clone();
                ballots.push(expansion);
            }
        }
        Ok(PreferenceProfile{ ballots: fold(ballots), candidates: self.candidates.clone() })
    }
}

impl Display for PreferenceProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f,"{} candidates, {} ballot lines, total weight {}",self.candidates.len(),self.ballots.len(),self.total_weight())?;
        let mut heaviest : Vec<&Ballot> = self.ballots.iter().collect();
        heaviest.sort_by(|a,b|b.weight.cmp(&a.weight));
        for ballot in heaviest.into_iter().take(10) {
            writeln!(f,"  {}",ballot)?;
        }
        Ok(())
    }
}

/// A utility for building up a profile from individually generated rankings,
/// folding duplicates as they arrive.
#[derive(Default)]
pub struct UniqueRankingBuilder {
    rankings : HashMap<SetRanking,usize>,
}

impl UniqueRankingBuilder {
    /// Add one voter with the given ranking.
    pub fn add(&mut self,ranking:SetRanking) {
        *self.rankings.entry(ranking).or_insert(0)+=1;
    }
    /// Add one voter ranking the given candidates strictly.
    pub fn add_strict(&mut self,candidates:&[CandidateIndex]) {
        self.add(strict_ranking(candidates));
    }
    /// Convert to a list of weighted ballots.
    pub fn to_ballots(self) -> Vec<Ballot> {
        self.rankings.into_iter().map(|(ranking,n)|Ballot::from_ranking(ranking,Tally::from(n))).collect()
    }
    pub fn into_profile(self,candidates:&[CandidateIndex]) -> Result<PreferenceProfile,ProfileError> {
        PreferenceProfile::with_candidates(self.to_ballots(),candidates.to_vec())
    }
}

/// Fold a pool of generated rankings into a profile over the given candidates.
/// The profile's total weight equals the pool size.
pub fn ballot_pool_to_profile(pool:Vec<SetRanking>,candidates:&[CandidateIndex]) -> Result<PreferenceProfile,ProfileError> {
    let mut builder = UniqueRankingBuilder::default();
    for ranking in pool { builder.add(ranking); }
    builder.into_profile(candidates)
}
