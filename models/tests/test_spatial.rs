// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! The spatial and clustered spatial models.

use ballots::contest::ContestMetadata;
use ballots::tally::Tally;
use models::generator::BallotGenerator;
use models::spatial::{ClusteredSpatial, DistanceMetric, DistributionRole, PointDistribution, Spatial};
use models::validation::ModelError;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn contest(n:usize) -> ContestMetadata {
    let names : Vec<String> = (0..n).map(|i|format!("C{}",i)).collect();
    ContestMetadata::new("spatial",&names.iter().map(|s|s.as_str()).collect::<Vec<_>>())
}

fn unit_normal(dim:usize) -> PointDistribution {
    PointDistribution::Normal{ location: 0.0, scale: 1.0, dim }
}

#[test]
fn test_distance_metrics() {
    assert_eq!(5.0,DistanceMetric::Euclidean.distance(&[0.0,0.0],&[3.0,4.0]));
    assert_eq!(7.0,DistanceMetric::Manhattan.distance(&[0.0,0.0],&[3.0,4.0]));
    assert_eq!(2.0,DistanceMetric::Euclidean.distance(&[-1.0],&[1.0]));
    assert_eq!(0.0,DistanceMetric::Manhattan.distance(&[1.5,2.5],&[1.5,2.5]));
}

#[test]
fn test_spatial_profile_and_positions() {
    let model = Spatial::new(&contest(4),50,
                             PointDistribution::Uniform{ low: 0.0, high: 1.0, dim: 2 },
                             unit_normal(2),DistanceMetric::Euclidean).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let (profile,candidate_positions,voter_positions) = model.generate_profile_with_positions(&mut rng);
    assert_eq!(Tally::from(50usize),profile.total_weight());
    // a spatial voter always ranks the whole field, strictly
    for ballot in profile.ballots() {
        assert_eq!(4,ballot.ranking.len());
        assert!(ballot.ranking.iter().all(|block|block.len()==1));
    }
    assert_eq!(4,candidate_positions.len());
    assert!(candidate_positions.iter().all(|p|p.len()==2));
    assert_eq!(50,voter_positions.len());
    assert!(voter_positions.iter().all(|p|p.len()==2 && p.iter().all(|x|(0.0..1.0).contains(x))));
}

#[test]
fn test_spatial_is_reproducible() {
    let model = Spatial::new(&contest(5),80,unit_normal(3),unit_normal(3),DistanceMetric::Manhattan).unwrap();
    let first = model.generate_profile(&mut ChaCha20Rng::seed_from_u64(21));
    let again = model.generate_profile(&mut ChaCha20Rng::seed_from_u64(21));
    assert_eq!(first,again);
}

#[test]
fn test_spatial_validation() {
    let uniform = |low:f64,high:f64| PointDistribution::Uniform{ low, high, dim: 2 };
    let err = Spatial::new(&contest(3),10,uniform(1.0,1.0),unit_normal(2),DistanceMetric::Euclidean).err().unwrap();
    assert!(matches!(err,ModelError::BadDistribution{ role: DistributionRole::Voter, .. }),"got {:?}",err);
    let err = Spatial::new(&contest(3),10,unit_normal(2),PointDistribution::Normal{ location: 0.0, scale: 0.0, dim: 2 },DistanceMetric::Euclidean).err().unwrap();
    assert!(matches!(err,ModelError::BadDistribution{ role: DistributionRole::Candidate, .. }),"got {:?}",err);
    let err = Spatial::new(&contest(3),10,unit_normal(0),unit_normal(2),DistanceMetric::Euclidean).err().unwrap();
    assert!(matches!(err,ModelError::BadDistribution{ role: DistributionRole::Voter, .. }),"got {:?}",err);
    assert_eq!(Some(ModelError::DimensionMismatch{ voter: 2, candidate: 3 }),
               Spatial::new(&contest(3),10,unit_normal(2),unit_normal(3),DistanceMetric::Euclidean).err());
}

#[test]
fn test_clustered_spatial_profile() {
    let model = ClusteredSpatial::new(&contest(6),40,2,unit_normal(2),unit_normal(2),DistanceMetric::Manhattan).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(33);
    let profile = model.generate_profile(&mut rng);
    assert_eq!(Tally::from(40usize),profile.total_weight());
    assert!(profile.ballots().iter().all(|b|b.ranking.len()==6));
    let again = model.generate_profile(&mut ChaCha20Rng::seed_from_u64(33));
    assert_eq!(profile,again);
}

#[test]
fn test_point_distribution_serde_round_trip() -> anyhow::Result<()> {
    let config = PointDistribution::Gumbel{ location: 0.5, scale: 2.0, dim: 3 };
    let json = serde_json::to_string(&config)?;
    assert_eq!(config,serde_json::from_str::<PointDistribution>(&json)?);
    assert_eq!(DistanceMetric::Manhattan,serde_json::from_str::<DistanceMetric>("\"Manhattan\"")?);
    Ok(())
}

#[test]
fn test_clustered_spatial_validation() {
    // cluster noise needs a location-scale family
    assert_eq!(Some(ModelError::UnsupportedVoterDistribution),
               ClusteredSpatial::new(&contest(4),10,2,PointDistribution::Uniform{ low: 0.0, high: 1.0, dim: 2 },unit_normal(2),DistanceMetric::Euclidean).err());
    assert_eq!(Some(ModelError::BadClusterCount{ clusters: 0, candidates: 4 }),
               ClusteredSpatial::new(&contest(4),10,0,unit_normal(2),unit_normal(2),DistanceMetric::Euclidean).err());
    assert_eq!(Some(ModelError::BadClusterCount{ clusters: 5, candidates: 4 }),
               ClusteredSpatial::new(&contest(4),10,5,unit_normal(2),unit_normal(2),DistanceMetric::Euclidean).err());
    assert!(ClusteredSpatial::new(&contest(4),10,2,PointDistribution::Gumbel{ location: 0.0, scale: 1.0, dim: 2 },unit_normal(2),DistanceMetric::Euclidean).is_ok());
}
