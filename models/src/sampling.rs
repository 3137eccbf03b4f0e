// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! Sampling primitives shared by the bloc driven models.

use crate::interval::PreferenceInterval;
use ballots::contest::CandidateIndex;
use log::trace;
use rand::Rng;

/// Draw `length` candidates from the pool without replacement, each draw picking a
/// remaining candidate with probability proportional to its support. Zero support
/// candidates are never drawn while a positive support candidate remains; once only
/// zero support candidates are left they are drawn uniformly.
pub fn weighted_ranking_without_replacement<R:Rng+?Sized>(pool:&[CandidateIndex],interval:&PreferenceInterval,length:usize,rng:&mut R) -> Vec<CandidateIndex> {
    let mut remaining : Vec<(CandidateIndex,f64)> = pool.iter().map(|&c|(c,interval.support(c))).collect();
    let mut ranking = Vec::with_capacity(length.min(remaining.len()));
    while ranking.len()<length && !remaining.is_empty() {
        let total : f64 = remaining.iter().map(|(_,w)|*w).sum();
        let chosen = if total>0.0 {
            let mut target = rng.random_range(0.0..total);
            let mut found = None;
            for (i,(_,w)) in remaining.iter().enumerate() {
                if *w>0.0 {
                    if target<*w { found=Some(i); break; }
                    target -= *w;
                }
            }
            // float summation shortfall lands on the last positive weight
            found.or_else(||remaining.iter().rposition(|(_,w)|*w>0.0)).unwrap_or(0)
        } else {
            rng.random_range(0..remaining.len())
        };
        ranking.push(remaining[chosen].0);
        remaining.swap_remove(chosen);
    }
    trace!("drew {:?} from a pool of {}",ranking,pool.len());
    ranking
}

/// A utility to allow sampling with replacement from a multiset of elements.
#[derive(Default,Clone)]
pub struct SampleWithReplacement<E> {
    elements : Vec<E>
}

impl <E:Clone> SampleWithReplacement<E> {
    /// add an element that could be chosen.
    pub fn add(&mut self,e:E) {
        self.elements.push(e);
    }

    /// add an element with the given multiplicity.
    pub fn add_multiple(&mut self,e:E,n:usize) {
        for _ in 0..n { self.add(e.clone()); }
    }

    pub fn is_empty(&self) -> bool { self.elements.is_empty() }

    pub fn len(&self) -> usize { self.elements.len() }

    /// Get a random element. Must not be empty.
    pub fn get<R:Rng+?Sized>(&self,rng:&mut R) -> E {
        self.elements[rng.random_range(0..self.elements.len())].clone()
    }
}

/// How many of `total` ballots a bloc or pairing with the given share receives.
pub fn round_share(total:usize,share:f64) -> usize {
    (total as f64*share).round() as usize
}
