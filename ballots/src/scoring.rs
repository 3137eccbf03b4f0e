// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! Scoring a profile : first place votes, Borda, mentions, general positional
//! score vectors, and cardinal score totals.

use crate::ballot::{Ballot, SetRanking, TiedBlock};
use crate::contest::CandidateIndex;
use crate::profile::{PreferenceProfile, ProfileError};
use crate::tally::Tally;
use std::collections::{BTreeMap,BTreeSet};

/// Check a positional score vector : entries must be non-negative and non-increasing.
pub fn validate_score_vector(vector:&[Tally]) -> Result<(),ProfileError> {
    for (i,entry) in vector.iter().enumerate() {
        if entry.is_negative() { return Err(ProfileError::NegativeScoreVector); }
        if i>0 && entry>&vector[i-1] { return Err(ProfileError::IncreasingScoreVector); }
    }
    Ok(())
}

/// Give every member of a tied position the mean of the vector entries the position
/// spans, weighted by the ballot weight.
fn score_block(totals:&mut BTreeMap<CandidateIndex,Tally>,block:&TiedBlock,vector:&[Tally],start:usize,weight:&Tally) {
    let spanned : Tally = vector[start..start+block.len()].iter().sum();
    let mean = spanned.share(block.len());
    for &candidate in block {
        *totals.entry(candidate).or_insert_with(Tally::zero) += &mean * weight;
    }
}

/// Score every candidate from the rankings under a positional score vector.
/// The vector is padded with zeros out to the candidate count. Candidates a ballot
/// leaves unranked count as one tied position at the end, and a tied position
/// spanning several vector entries gives each member their arithmetic mean.
pub fn score_profile_from_rankings(profile:&PreferenceProfile,vector:&[Tally]) -> Result<BTreeMap<CandidateIndex,Tally>,ProfileError> {
    validate_score_vector(vector)?;
    let num_candidates = profile.num_candidates();
    let mut padded : Vec<Tally> = vector.iter().take(num_candidates).cloned().collect();
    padded.resize(num_candidates,Tally::zero());
    let mut totals : BTreeMap<CandidateIndex,Tally> = profile.candidates().iter().map(|&c|(c,Tally::zero())).collect();
    for ballot in profile.ballots() {
        if !ballot.has_ranking() { return Err(ProfileError::BallotMissingRanking); }
        let mut position = 0;
        for block in &ballot.ranking {
            if block.is_empty() { return Err(ProfileError::EmptyRankingPosition); }
            score_block(&mut totals,block,&padded,position,&ballot.weight);
            position += block.len();
        }
        let mentioned : BTreeSet<CandidateIndex> = ballot.ranked_candidates().collect();
        let unranked : TiedBlock = profile.candidates().iter().filter(|c|!mentioned.contains(c)).copied().collect();
        if !unranked.is_empty() {
            score_block(&mut totals,&unranked,&padded,position,&ballot.weight);
        }
    }
    Ok(totals)
}

/// Each candidate's total first place weight. A first position tied between k
/// candidates gives each of them a 1/k share.
pub fn first_place_votes(profile:&PreferenceProfile) -> Result<BTreeMap<CandidateIndex,Tally>,ProfileError> {
    score_profile_from_rankings(profile,&[Tally::one()])
}

/// Borda scores over the profile's n candidates : score vector [n, n-1, …, 1].
pub fn borda_scores(profile:&PreferenceProfile) -> Result<BTreeMap<CandidateIndex,Tally>,ProfileError> {
    let vector : Vec<Tally> = (1..=profile.num_candidates()).rev().map(Tally::from).collect();
    score_profile_from_rankings(profile,&vector)
}

/// The total weight of the ballots ranking each candidate anywhere at all.
pub fn mentions(profile:&PreferenceProfile) -> Result<BTreeMap<CandidateIndex,Tally>,ProfileError> {
    let mut totals : BTreeMap<CandidateIndex,Tally> = profile.candidates().iter().map(|&c|(c,Tally::zero())).collect();
    for ballot in profile.ballots() {
        if !ballot.has_ranking() { return Err(ProfileError::BallotMissingRanking); }
        for candidate in ballot.ranked_candidates() {
            *totals.entry(candidate).or_insert_with(Tally::zero) += &ballot.weight;
        }
    }
    Ok(totals)
}

/// Sum the cardinal scores each ballot assigns, weighted by ballot weight. Ballots
/// carrying a ranking but no scores are skipped; a ballot with neither is an error.
pub fn score_profile_from_ballot_scores(profile:&PreferenceProfile) -> Result<BTreeMap<CandidateIndex,Tally>,ProfileError> {
    let mut totals : BTreeMap<CandidateIndex,Tally> = profile.candidates().iter().map(|&c|(c,Tally::zero())).collect();
    for ballot in profile.ballots() {
        if !ballot.has_scores() {
            if ballot.has_ranking() { continue; }
            return Err(ProfileError::BallotMissingScores);
        }
        for (candidate,score) in &ballot.scores {
            *totals.entry(*candidate).or_insert_with(Tally::zero) += score * &ballot.weight;
        }
    }
    Ok(totals)
}

/// Partition the ballot lines by the single candidate each ranks first. Every profile
/// candidate gets a key, possibly holding an empty list. Errors on a ballot with no
/// ranking or with more than one candidate in first place.
pub fn ballots_by_first_cand(profile:&PreferenceProfile) -> Result<BTreeMap<CandidateIndex,Vec<Ballot>>,ProfileError> {
    let mut by_first : BTreeMap<CandidateIndex,Vec<Ballot>> = profile.candidates().iter().map(|&c|(c,vec![])).collect();
    for ballot in profile.ballots() {
        let first = ballot.ranking.first().ok_or(ProfileError::BallotMissingRanking)?;
        let mut members = first.iter();
        match (members.next(),members.next()) {
            (Some(&candidate),None) => { by_first.entry(candidate).or_default().push(ballot.clone()); }
            (Some(_),Some(_)) => { return Err(ProfileError::TiedFirstPlace); }
            (None,_) => { return Err(ProfileError::EmptyRankingPosition); }
        }
    }
    Ok(by_first)
}

/// Group candidates with equal totals into tied positions, highest total first.
pub fn score_dict_to_ranking(scores:&BTreeMap<CandidateIndex,Tally>) -> SetRanking {
    let mut by_score : BTreeMap<&Tally,TiedBlock> = BTreeMap::new();
    for (candidate,score) in scores {
        by_score.entry(score).or_default().insert(*candidate);
    }
    by_score.into_values().rev().collect()
}

/// The floating point view of a score map, adequate for display and plotting.
pub fn scores_to_f64(scores:&BTreeMap<CandidateIndex,Tally>) -> BTreeMap<CandidateIndex,f64> {
    scores.iter().map(|(c,s)|(*c,s.to_f64())).collect()
}
