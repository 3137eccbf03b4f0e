// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! Information about a single cast vote. A vote may rank candidates (ties allowed),
//! assign numeric scores to candidates, or both.

use crate::contest::CandidateIndex;
use crate::profile::ProfileError;
use crate::tally::Tally;
use itertools::Itertools;
use serde::{Deserialize,Serialize};
use std::collections::{BTreeMap,BTreeSet};
use std::fmt::{Display, Formatter};

/// The candidates occupying one position of a ranking. More than one candidate
/// in a block means the voter ranked them equally at that position.
pub type TiedBlock = BTreeSet<CandidateIndex>;

/// A ranking, most preferred position first. Each position may hold several tied candidates.
pub type SetRanking = Vec<TiedBlock>;

/// a ranking in which every position holds exactly one candidate.
pub fn strict_ranking(candidates:&[CandidateIndex]) -> SetRanking {
    candidates.iter().map(|&c|TiedBlock::from([c])).collect()
}

/// One line of a preference profile : what was expressed, and the weight it carries.
/// An empty ranking means the voter provided no ranking; an empty score map means
/// no scores. A score of zero is a real score, distinct from not being scored.
#[derive(Clone,Debug,Serialize,Deserialize,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub struct Ballot {
    /// candidates in decreasing order of preference.
    #[serde(skip_serializing_if = "Vec::is_empty",default)]
    pub ranking : SetRanking,
    /// scores assigned to individual candidates.
    #[serde(skip_serializing_if = "BTreeMap::is_empty",default)]
    pub scores : BTreeMap<CandidateIndex,Tally>,
    /// Number of people who voted in this way. May be fractional after tie splitting.
    #[serde(default = "Tally::one")]
    pub weight : Tally,
    /// identifiers of the individual voters behind this line, if tracked.
    #[serde(skip_serializing_if = "BTreeSet::is_empty",default)]
    pub voter_set : BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub id : Option<String>,
}

impl Default for Ballot {
    /// a weight 1 ballot expressing nothing.
    fn default() -> Self {
        Ballot{ ranking: vec![], scores: BTreeMap::new(), weight: Tally::one(), voter_set: BTreeSet::new(), id: None }
    }
}

impl Ballot {
    pub fn from_ranking(ranking:SetRanking,weight:Tally) -> Self {
        Ballot{ ranking, weight, ..Default::default() }
    }
    /// a weight 1 ballot ranking the given candidates strictly, first listed most preferred.
    pub fn ranked(candidates:&[CandidateIndex]) -> Self {
        Ballot::from_ranking(strict_ranking(candidates),Tally::one())
    }
    pub fn from_scores(scores:BTreeMap<CandidateIndex,Tally>,weight:Tally) -> Self {
        Ballot{ scores, weight, ..Default::default() }
    }
    pub fn has_ranking(&self) -> bool { !self.ranking.is_empty() }
    pub fn has_scores(&self) -> bool { !self.scores.is_empty() }
    /// every candidate mentioned in the ranking, in block order.
    pub fn ranked_candidates(&self) -> impl Iterator<Item=CandidateIndex> + '_ {
        self.ranking.iter().flat_map(|block|block.iter().copied())
    }
    /// This ballot with the given candidates struck out of the ranking and the scores.
    /// Positions left empty are dropped; the weight and metadata are untouched.
    pub fn remove_candidates(&self,candidates:&[CandidateIndex]) -> Ballot {
        let ranking : SetRanking = self.ranking.iter().map(|block|{
            block.iter().filter(|c|!candidates.contains(c)).copied().collect::<TiedBlock>()
        }).filter(|block:&TiedBlock|!block.is_empty()).collect();
        let scores : BTreeMap<CandidateIndex,Tally> = self.scores.iter()
            .filter(|(c,_)|!candidates.contains(c))
            .map(|(c,s)|(*c,s.clone())).collect();
        Ballot{ ranking, scores, ..self.clone() }
    }
}

impl Display for Ballot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f,"{} :",self.weight)?;
        for block in &self.ranking {
            if block.len()==1 { write!(f," {}",block.iter().join(""))?; }
            else { write!(f," {{{}}}",block.iter().join(","))?; }
        }
        if self.has_scores() {
            write!(f," [")?;
            for (i,(candidate,score)) in self.scores.iter().enumerate() {
                write!(f,"{}{}={}",if i>0 {" "} else {""},candidate,score)?;
            }
            write!(f,"]")?;
        }
        Ok(())
    }
}

/// Every way of making the ballot's ranking strict, one ballot per element of the
/// Cartesian product of the tied blocks' permutations. A ballot with blocks of
/// sizes k1,k2,… expands into k1!·k2!·… ballots, each keeping the original weight,
/// scores and metadata.
pub fn expand_tied_ballot(ballot:&Ballot) -> Result<Vec<Ballot>,ProfileError> {
    if !ballot.has_ranking() { return Err(ProfileError::BallotMissingRanking); }
    let block_orders : Vec<Vec<Vec<CandidateIndex>>> = ballot.ranking.iter()
        .map(|block|block.iter().copied().permutations(block.len()).collect())
        .collect();
    let mut expanded = vec![];
    for orders in block_orders.into_iter().multi_cartesian_product() {
        let ranking : SetRanking = orders.into_iter().flatten().map(|c|TiedBlock::from([c])).collect();
        expanded.push(Ballot{ ranking, ..ballot.clone() });
    }
    Ok(expanded)
}
