// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! Information about the contest being simulated, such as candidates and slates.

use serde::{Serialize,Deserialize};
use std::fmt;
use thiserror::Error;

/// a candidate, referred to by position in the contest's candidate list, 0 being first
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateIndex(pub usize);
// type alias really, don't want long display
impl fmt::Display for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}


/// a slate, referred to by position in the contest's slate list, 0 being first
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlateIndex(pub usize);

// type alias really, don't want long display
impl fmt::Display for SlateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for SlateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}


/// Information about the simulated contest
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct ContestMetadata {
    pub name : String,
    pub candidates : Vec<Candidate>,
    /// voting blocs' own candidates, if the contest has bloc structure.
    #[serde(skip_serializing_if = "Vec::is_empty",default)]
    pub slates : Vec<Slate>,
}

/// information about a candidate in the contest.
#[derive(Debug,Serialize,Deserialize,Clone)]
pub struct Candidate {
    pub name : String,
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub slate : Option<SlateIndex>,
}

/// information about a slate of allied candidates (the candidates a voting bloc considers its own).
#[derive(Debug,Serialize,Deserialize,Clone)]
pub struct Slate {
    pub name : String,
    pub candidates : Vec<CandidateIndex>,
}

impl ContestMetadata {
    /// A contest with the given candidates and no slate structure.
    pub fn new(name:&str,candidate_names:&[&str]) -> Self {
        let candidates = candidate_names.iter().map(|n|Candidate{ name: n.to_string(), slate: None }).collect();
        ContestMetadata{ name: name.to_string(), candidates, slates: vec![] }
    }

    /// A contest whose candidate list is assembled from named slates, each listing
    /// its own candidates. Candidate and slate names must all be distinct.
    pub fn with_slates(name:&str,slates:&[(&str,&[&str])]) -> Result<Self,MetadataError> {
        let mut candidates : Vec<Candidate> = vec![];
        let mut slate_list : Vec<Slate> = vec![];
        for (slate_name,members) in slates {
            if slate_list.iter().any(|s|&s.name==slate_name) { return Err(MetadataError::DuplicateSlate(slate_name.to_string())); }
            let slate_index = SlateIndex(slate_list.len());
            let mut member_indices = vec![];
            for member in *members {
                if candidates.iter().any(|c|&c.name==member) { return Err(MetadataError::DuplicateCandidate(member.to_string())); }
                member_indices.push(CandidateIndex(candidates.len()));
                candidates.push(Candidate{ name: member.to_string(), slate: Some(slate_index) });
            }
            slate_list.push(Slate{ name: slate_name.to_string(), candidates: member_indices });
        }
        Ok(ContestMetadata{ name: name.to_string(), candidates, slates: slate_list })
    }

    pub fn num_candidates(&self) -> usize { self.candidates.len() }
    pub fn candidate(&self,index:CandidateIndex) -> &Candidate { &self.candidates[index.0] }
    pub fn slate(&self,index:SlateIndex) -> &Slate { &self.slates[index.0] }
    pub fn slate_members(&self,index:SlateIndex) -> &[CandidateIndex] { &self.slates[index.0].candidates }
    /// every candidate in the contest, in ballot-paper order.
    pub fn candidate_indices(&self) -> Vec<CandidateIndex> { (0..self.candidates.len()).map(CandidateIndex).collect() }
    pub fn index_of_candidate(&self,name:&str) -> Option<CandidateIndex> {
        self.candidates.iter().position(|c|c.name==name).map(CandidateIndex)
    }
    pub fn index_of_slate(&self,name:&str) -> Option<SlateIndex> {
        self.slates.iter().position(|s|s.name==name).map(SlateIndex)
    }
}

/// A problem assembling contest metadata.
#[derive(Error,Debug,PartialEq)]
pub enum MetadataError {
    #[error("candidate {0} is listed more than once")]
    DuplicateCandidate(String),
    #[error("slate {0} is listed more than once")]
    DuplicateSlate(String),
}
