// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! Spatial models : candidates and voters are points in a metric space, and each
//! voter ranks all candidates by distance, closest first.

use crate::generator::{fold_pool, BallotGenerator};
use crate::validation::{resolve_ballot_length, ModelError};
use ballots::contest::{CandidateIndex, ContestMetadata};
use ballots::profile::PreferenceProfile;
use rand::distr::Distribution;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Gumbel, Normal};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Which of the two configured distributions a complaint is about.
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum DistributionRole { Voter, Candidate }

impl Display for DistributionRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self { DistributionRole::Voter => "voter", DistributionRole::Candidate => "candidate" })
    }
}

/// A point distribution with independent identically distributed coordinates.
#[derive(Debug,Clone,Copy,PartialEq,Serialize,Deserialize)]
pub enum PointDistribution {
    Uniform { low : f64, high : f64, dim : usize },
    Normal { location : f64, scale : f64, dim : usize },
    Gumbel { location : f64, scale : f64, dim : usize },
}

impl PointDistribution {
    pub fn dim(&self) -> usize {
        match *self {
            PointDistribution::Uniform{dim,..} => dim,
            PointDistribution::Normal{dim,..} => dim,
            PointDistribution::Gumbel{dim,..} => dim,
        }
    }

    fn validate(&self,role:DistributionRole) -> Result<(),ModelError> {
        let bad = |reason:&str| ModelError::BadDistribution{ role, reason: reason.to_string() };
        match *self {
            PointDistribution::Uniform{low,high,dim} => {
                if !(low.is_finite() && high.is_finite() && low<high) { return Err(bad("Uniform needs finite low < high")); }
                if dim==0 { return Err(bad("dimension must be at least 1")); }
            }
            PointDistribution::Normal{location,scale,dim} | PointDistribution::Gumbel{location,scale,dim} => {
                if !location.is_finite() { return Err(bad("location must be finite")); }
                if !(scale.is_finite() && scale>0.0) { return Err(bad("scale must be positive and finite")); }
                if dim==0 { return Err(bad("dimension must be at least 1")); }
            }
        }
        Ok(())
    }
}

/// A sampler built once from a validated distribution.
enum PointSampler {
    Uniform { low : f64, high : f64, dim : usize },
    Normal { dist : Normal<f64>, dim : usize },
    Gumbel { dist : Gumbel<f64>, dim : usize },
}

impl PointSampler {
    fn build(config:&PointDistribution,role:DistributionRole) -> Result<Self,ModelError> {
        config.validate(role)?;
        let bad = |e:&dyn Display| ModelError::BadDistribution{ role, reason: e.to_string() };
        Ok(match *config {
            PointDistribution::Uniform{low,high,dim} => PointSampler::Uniform{ low, high, dim },
            PointDistribution::Normal{location,scale,dim} =>
                PointSampler::Normal{ dist: Normal::new(location,scale).map_err(|e|bad(&e))?, dim },
            PointDistribution::Gumbel{location,scale,dim} =>
                PointSampler::Gumbel{ dist: Gumbel::new(location,scale).map_err(|e|bad(&e))?, dim },
        })
    }

    fn dim(&self) -> usize {
        match self {
            PointSampler::Uniform{dim,..} => *dim,
            PointSampler::Normal{dim,..} => *dim,
            PointSampler::Gumbel{dim,..} => *dim,
        }
    }

    fn sample<R:Rng+?Sized>(&self,rng:&mut R) -> Vec<f64> {
        match self {
            PointSampler::Uniform{low,high,dim} => (0..*dim).map(|_|rng.random_range(*low..*high)).collect(),
            PointSampler::Normal{dist,dim} => (0..*dim).map(|_|dist.sample(rng)).collect(),
            PointSampler::Gumbel{dist,dim} => (0..*dim).map(|_|dist.sample(rng)).collect(),
        }
    }
}

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub enum DistanceMetric { Euclidean, Manhattan }

impl DistanceMetric {
    pub fn distance(&self,a:&[f64],b:&[f64]) -> f64 {
        match self {
            DistanceMetric::Euclidean => a.iter().zip(b).map(|(x,y)|(x-y)*(x-y)).sum::<f64>().sqrt(),
            DistanceMetric::Manhattan => a.iter().zip(b).map(|(x,y)|(x-y).abs()).sum(),
        }
    }
}

/// all candidates, closest first. Exactly equal distances fall back to candidate order.
fn rank_by_distance(candidates:&[CandidateIndex],positions:&[Vec<f64>],voter:&[f64],metric:DistanceMetric) -> Vec<CandidateIndex> {
    let mut order : Vec<(f64,CandidateIndex)> = candidates.iter().enumerate()
        .map(|(i,&c)|(metric.distance(voter,&positions[i]),c)).collect();
    order.sort_by(|a,b|a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal).then(a.1.cmp(&b.1)));
    order.into_iter().map(|(_,c)|c).collect()
}

/// The plain spatial model : candidate and voter positions drawn independently from
/// their configured distributions.
pub struct Spatial {
    candidates : Vec<CandidateIndex>,
    num_ballots : usize,
    voter_sampler : PointSampler,
    candidate_sampler : PointSampler,
    metric : DistanceMetric,
}

impl Spatial {
    pub fn new(metadata:&ContestMetadata,num_ballots:usize,
               voter_distribution:PointDistribution,candidate_distribution:PointDistribution,
               metric:DistanceMetric) -> Result<Self,ModelError> {
        let candidates = metadata.candidate_indices();
        resolve_ballot_length(None,candidates.len())?;
        let voter_sampler = PointSampler::build(&voter_distribution,DistributionRole::Voter)?;
        let candidate_sampler = PointSampler::build(&candidate_distribution,DistributionRole::Candidate)?;
        if voter_sampler.dim()!=candidate_sampler.dim() {
            return Err(ModelError::DimensionMismatch{ voter: voter_sampler.dim(), candidate: candidate_sampler.dim() });
        }
        Ok(Spatial{ candidates, num_ballots, voter_sampler, candidate_sampler, metric })
    }

    /// Like generate_profile, also returning the sampled candidate positions (indexed
    /// like the candidate list) and voter positions (one per ballot cast).
    pub fn generate_profile_with_positions<R:Rng+?Sized>(&self,rng:&mut R) -> (PreferenceProfile,Vec<Vec<f64>>,Vec<Vec<f64>>) {
        let candidate_positions : Vec<Vec<f64>> = (0..self.candidates.len()).map(|_|self.candidate_sampler.sample(rng)).collect();
        let mut voter_positions = Vec::with_capacity(self.num_ballots);
        let mut pool = Vec::with_capacity(self.num_ballots);
        for _ in 0..self.num_ballots {
            let voter = self.voter_sampler.sample(rng);
            pool.push(rank_by_distance(&self.candidates,&candidate_positions,&voter,self.metric));
            voter_positions.push(voter);
        }
        (fold_pool(pool,&self.candidates),candidate_positions,voter_positions)
    }
}

impl BallotGenerator for Spatial {
    fn generate_profile<R:Rng+?Sized>(&self,rng:&mut R) -> PreferenceProfile {
        self.generate_profile_with_positions(rng).0
    }
}

/// A spatial model with a clustered electorate : candidates are dealt at random into
/// clusters, and each voter is a cluster's centroid plus noise from the voter
/// distribution. The noise must come from a location-scale family, so only Normal
/// and Gumbel voter distributions are accepted.
pub struct ClusteredSpatial {
    candidates : Vec<CandidateIndex>,
    num_ballots : usize,
    num_clusters : usize,
    voter_sampler : PointSampler,
    candidate_sampler : PointSampler,
    metric : DistanceMetric,
}

impl ClusteredSpatial {
    pub fn new(metadata:&ContestMetadata,num_ballots:usize,num_clusters:usize,
               voter_distribution:PointDistribution,candidate_distribution:PointDistribution,
               metric:DistanceMetric) -> Result<Self,ModelError> {
        let candidates = metadata.candidate_indices();
        resolve_ballot_length(None,candidates.len())?;
        match voter_distribution {
            PointDistribution::Normal{..} | PointDistribution::Gumbel{..} => {}
            _ => { return Err(ModelError::UnsupportedVoterDistribution); }
        }
        if num_clusters==0 || num_clusters>candidates.len() {
            return Err(ModelError::BadClusterCount{ clusters: num_clusters, candidates: candidates.len() });
        }
        let voter_sampler = PointSampler::build(&voter_distribution,DistributionRole::Voter)?;
        let candidate_sampler = PointSampler::build(&candidate_distribution,DistributionRole::Candidate)?;
        if voter_sampler.dim()!=candidate_sampler.dim() {
            return Err(ModelError::DimensionMismatch{ voter: voter_sampler.dim(), candidate: candidate_sampler.dim() });
        }
        Ok(ClusteredSpatial{ candidates, num_ballots, num_clusters, voter_sampler, candidate_sampler, metric })
    }
}

impl BallotGenerator for ClusteredSpatial {
    fn generate_profile<R:Rng+?Sized>(&self,rng:&mut R) -> PreferenceProfile {
        let dim = self.candidate_sampler.dim();
        let candidate_positions : Vec<Vec<f64>> = (0..self.candidates.len()).map(|_|self.candidate_sampler.sample(rng)).collect();
        // deal the candidates into clusters at random, round robin so none is empty
        let mut order : Vec<usize> = (0..self.candidates.len()).collect();
        order.shuffle(rng);
        let mut clusters : Vec<Vec<usize>> = vec![vec![];self.num_clusters];
        for (i,candidate) in order.into_iter().enumerate() {
            clusters[i%self.num_clusters].push(candidate);
        }
        let centers : Vec<Vec<f64>> = clusters.iter().map(|members|{
            let mut center = vec![0.0;dim];
            for &m in members {
                for (d,x) in candidate_positions[m].iter().enumerate() { center[d] += x; }
            }
            for x in &mut center { *x /= members.len() as f64; }
            center
        }).collect();
        let mut pool = Vec::with_capacity(self.num_ballots);
        for _ in 0..self.num_ballots {
            let center = &centers[rng.random_range(0..self.num_clusters)];
            let noise = self.voter_sampler.sample(rng);
            let voter : Vec<f64> = center.iter().zip(&noise).map(|(c,n)|c+n).collect();
            pool.push(rank_by_distance(&self.candidates,&candidate_positions,&voter,self.metric));
        }
        fold_pool(pool,&self.candidates)
    }
}
