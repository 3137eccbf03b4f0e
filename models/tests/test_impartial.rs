// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! The Impartial Culture and Impartial Anonymous Culture generators.

use ballots::contest::ContestMetadata;
use ballots::tally::Tally;
use models::generator::BallotGenerator;
use models::impartial::{ImpartialAnonymousCulture, ImpartialCulture};
use models::validation::ModelError;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// a contest over n candidates named C0,C1,…
fn contest(n:usize) -> ContestMetadata {
    let names : Vec<String> = (0..n).map(|i|format!("C{}",i)).collect();
    ContestMetadata::new("impartial",&names.iter().map(|s|s.as_str()).collect::<Vec<_>>())
}

#[test]
fn test_impartial_culture_is_roughly_uniform() {
    let model = ImpartialCulture::new(&contest(3),6000,None).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let profile = model.generate_profile(&mut rng);
    assert_eq!(Tally::from(6000usize),profile.total_weight());
    // all 6 rankings of 3 candidates show up, each with about 1000 of the weight
    assert_eq!(6,profile.num_ballots());
    for ballot in profile.ballots() {
        assert_eq!(3,ballot.ranking.len());
        let weight = ballot.weight.to_f64();
        assert!(weight>850.0 && weight<1150.0,"ranking {} has weight {}",ballot,weight);
    }
}

#[test]
fn test_impartial_culture_draws_directly_above_the_limit() {
    let _ = env_logger::try_init();
    // 12·11·10·9·8 = 95040 rankings is over the enumeration limit
    let model = ImpartialCulture::new(&contest(12),500,Some(5)).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let profile = model.generate_profile(&mut rng);
    assert_eq!(Tally::from(500usize),profile.total_weight());
    for ballot in profile.ballots() {
        assert_eq!(5,ballot.ranking.len());
        assert!(ballot.ranking.iter().all(|block|block.len()==1));
        assert!(ballot.ranked_candidates().all(|c|c.0<12));
    }
}

#[test]
fn test_impartial_culture_ballot_length() {
    let model = ImpartialCulture::new(&contest(4),100,Some(2)).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let profile = model.generate_profile(&mut rng);
    assert!(profile.ballots().iter().all(|b|b.ranking.len()==2));
    assert_eq!(Some(ModelError::BadBallotLength{ requested: 0, candidates: 4 }),
               ImpartialCulture::new(&contest(4),100,Some(0)).err());
    assert_eq!(Some(ModelError::BadBallotLength{ requested: 5, candidates: 4 }),
               ImpartialCulture::new(&contest(4),100,Some(5)).err());
}

#[test]
fn test_impartial_anonymous_culture_is_reproducible() {
    let model = ImpartialAnonymousCulture::new(&contest(3),600,None).unwrap();
    let first = model.generate_profile(&mut ChaCha20Rng::seed_from_u64(7));
    let again = model.generate_profile(&mut ChaCha20Rng::seed_from_u64(7));
    assert_eq!(first,again);
    assert_eq!(Tally::from(600usize),first.total_weight());
    assert!(first.ballots().iter().all(|b|b.ranking.len()==3));
}

#[test]
fn test_impartial_anonymous_culture_skews() {
    // one draw from the simplex skews the whole electorate, so the heaviest ranking
    // should be well above the uniform 100 most of the time
    let model = ImpartialAnonymousCulture::new(&contest(3),600,None).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let mut saw_skewed = false;
    for _ in 0..10 {
        let profile = model.generate_profile(&mut rng);
        let heaviest = profile.ballots().iter().map(|b|b.weight.clone()).max().unwrap();
        if heaviest>Tally::from(150usize) { saw_skewed = true; }
    }
    assert!(saw_skewed);
}

#[test]
fn test_impartial_anonymous_culture_capacity() {
    // 9! = 362880 is over the limit, and unlike Impartial Culture there is no fallback
    assert_eq!(Some(ModelError::PermutationSpaceTooLarge{ candidates: 9, length: 9, permutations: 362880, limit: 40320 }),
               ImpartialAnonymousCulture::new(&contest(9),10,None).err());
    assert_eq!(Some(ModelError::PermutationSpaceTooLarge{ candidates: 4, length: 4, permutations: 24, limit: 10 }),
               ImpartialAnonymousCulture::with_limit(&contest(4),10,None,10).err());
    assert!(ImpartialAnonymousCulture::with_limit(&contest(4),10,None,24).is_ok());
}
