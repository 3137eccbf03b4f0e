// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! Breaking tied ranking positions into a strict order : by first place votes, by
//! Borda score, or by random draw, keeping an audit record of each decision made.

use crate::ballot::{SetRanking, TiedBlock};
use crate::contest::CandidateIndex;
use crate::profile::{PreferenceProfile, ProfileError};
use crate::scoring::{borda_scores, first_place_votes};
use crate::tally::Tally;
use itertools::Itertools;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize,Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// How a tied position should be put into a strict order.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum TiebreakPolicy {
    /// candidates with more first place weight come earlier.
    FirstPlace,
    /// candidates with a higher Borda score come earlier.
    Borda,
    /// a uniformly random strict order.
    Random,
}

impl Display for TiebreakPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TiebreakPolicy::FirstPlace => write!(f,"first_place"),
            TiebreakPolicy::Borda => write!(f,"borda"),
            TiebreakPolicy::Random => write!(f,"random"),
        }
    }
}

impl FromStr for TiebreakPolicy {
    type Err = ProfileError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_place" => Ok(TiebreakPolicy::FirstPlace),
            "borda" => Ok(TiebreakPolicy::Borda),
            "random" => Ok(TiebreakPolicy::Random),
            _ => Err(ProfileError::UnknownTiebreakPolicy(s.to_string())),
        }
    }
}

/// A record of one tie having been broken : who was tied, the strict order chosen
/// (best first), and the policy that chose it.
#[derive(Debug,Clone,PartialEq,Eq,Serialize,Deserialize)]
pub struct TiebreakDecision {
    pub tied : TiedBlock,
    pub resolved : Vec<CandidateIndex>,
    pub policy : TiebreakPolicy,
}

impl Display for TiebreakDecision {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f,"{} broke {{{}}} into {}",self.policy,self.tied.iter().join(","),self.resolved.iter().join(">"))
    }
}

/// Sort tied candidates into a strict order, best first. The scored policies order by
/// descending score; a group the scores cannot separate is resolved by a uniform draw.
fn resolve_block<R:Rng+?Sized>(tied:&TiedBlock,profile:Option<&PreferenceProfile>,policy:TiebreakPolicy,rng:&mut R) -> Result<Vec<CandidateIndex>,ProfileError> {
    let mut candidates : Vec<CandidateIndex> = tied.iter().copied().collect();
    if candidates.len()<=1 { return Ok(candidates); }
    match policy {
        TiebreakPolicy::Random => {
            candidates.shuffle(rng);
            Ok(candidates)
        }
        TiebreakPolicy::FirstPlace | TiebreakPolicy::Borda => {
            let profile = profile.ok_or(ProfileError::TiebreakNeedsProfile(policy))?;
            let scores = match policy {
                TiebreakPolicy::FirstPlace => first_place_votes(profile)?,
                _ => borda_scores(profile)?,
            };
            let mut grouped : BTreeMap<Tally,Vec<CandidateIndex>> = BTreeMap::new();
            for candidate in candidates {
                let score = scores.get(&candidate).cloned().unwrap_or_else(Tally::zero);
                grouped.entry(score).or_default().push(candidate);
            }
            let mut resolved = vec![];
            for (_,group) in grouped.into_iter().rev() {
                if group.len()>1 {
                    // still tied under the scores
                    let residual : TiedBlock = group.into_iter().collect();
                    resolved.extend(resolve_block(&residual,Some(profile),TiebreakPolicy::Random,rng)?);
                } else {
                    resolved.extend(group);
                }
            }
            Ok(resolved)
        }
    }
}

/// Resolve one tied candidate set into a strict order, best first. FirstPlace and
/// Borda need a profile to score against; Random does not. Returns the order and an
/// audit record of the decision.
pub fn tiebreak_set<R:Rng+?Sized>(tied:&TiedBlock,profile:Option<&PreferenceProfile>,policy:TiebreakPolicy,rng:&mut R)
                                  -> Result<(Vec<CandidateIndex>,TiebreakDecision),ProfileError> {
    let resolved = resolve_block(tied,profile,policy,rng)?;
    let decision = TiebreakDecision{ tied: tied.clone(), resolved: resolved.clone(), policy };
    Ok((resolved,decision))
}

/// Break every tied position of a ranking, preserving position order. Returns the
/// strict ranking and one decision per position that was actually tied.
pub fn tiebroken_ranking<R:Rng+?Sized>(ranking:&SetRanking,profile:Option<&PreferenceProfile>,policy:TiebreakPolicy,rng:&mut R)
                                       -> Result<(SetRanking,Vec<TiebreakDecision>),ProfileError> {
    let mut strict : SetRanking = vec![];
    let mut decisions = vec![];
    for block in ranking {
        if block.len()<=1 { strict.push(block.clone()); }
        else {
            let (order,record) = tiebreak_set(block,profile,policy,rng)?;
            strict.extend(order.into_iter().map(|c|TiedBlock::from([c])));
            decisions.push(record);
        }
    }
    Ok((strict,decisions))
}

/// Elect the first m candidates of a ranking, taking whole positions while they fit.
/// A position straddling the boundary must be broken by the policy (an error if none
/// was supplied); its elected members become singleton positions and the rest of it
/// leads the remaining ranking. Returns the elected ranking, the remaining ranking,
/// and the decision made for the boundary position if one had to be broken.
pub fn elect_cands_from_set_ranking<R:Rng+?Sized>(ranking:&SetRanking,m:usize,profile:Option<&PreferenceProfile>,policy:Option<TiebreakPolicy>,rng:&mut R)
                                                  -> Result<(SetRanking,SetRanking,Option<TiebreakDecision>),ProfileError> {
    let available : usize = ranking.iter().map(|block|block.len()).sum();
    if m==0 { return Err(ProfileError::ElectCountZero); }
    if m>available { return Err(ProfileError::ElectCountTooLarge{ wanted: m, available }); }
    let mut elected : SetRanking = vec![];
    let mut remaining : SetRanking = vec![];
    let mut decision : Option<TiebreakDecision> = None;
    let mut seats = 0;
    for (i,block) in ranking.iter().enumerate() {
        if seats+block.len()<=m {
            seats += block.len();
            elected.push(block.clone());
            if seats==m {
                remaining.extend(ranking[i+1..].iter().cloned());
                break;
            }
        } else {
            let policy = policy.ok_or(ProfileError::UnbreakableTie)?;
            let (order,record) = tiebreak_set(block,profile,policy,rng)?;
            let still_wanted = m-seats;
            for &candidate in &order[..still_wanted] { elected.push(TiedBlock::from([candidate])); }
            remaining.push(order[still_wanted..].iter().copied().collect());
            remaining.extend(ranking[i+1..].iter().cloned());
            decision = Some(record);
            break;
        }
    }
    Ok((elected,remaining,decision))
}
