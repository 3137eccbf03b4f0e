// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! Worked scoring examples with exact rational answers, checked by hand.

use ballots::ballot::{strict_ranking, Ballot, TiedBlock};
use ballots::contest::CandidateIndex;
use ballots::profile::{PreferenceProfile, ProfileError};
use ballots::scoring::{ballots_by_first_cand, borda_scores, first_place_votes, mentions, score_dict_to_ranking, score_profile_from_ballot_scores, score_profile_from_rankings, validate_score_vector};
use ballots::tally::Tally;
use std::collections::BTreeMap;

fn c(index:usize) -> CandidateIndex { CandidateIndex(index) }

/// the three ballots [A,B] weight 1, [A,B,C] weight 1/2, [C,B,A] weight 3.
fn no_ties_ballots() -> Vec<Ballot> {
    vec![
        Ballot::from_ranking(strict_ranking(&[c(0),c(1)]),Tally::one()),
        Ballot::from_ranking(strict_ranking(&[c(0),c(1),c(2)]),Tally::ratio(1,2)),
        Ballot::from_ranking(strict_ranking(&[c(2),c(1),c(0)]),Tally::ratio(3,1)),
    ]
}

fn no_ties_profile() -> PreferenceProfile {
    PreferenceProfile::new(no_ties_ballots()).unwrap()
}

#[test]
fn test_borda_example() {
    let scores = borda_scores(&no_ties_profile()).unwrap();
    assert_eq!(Tally::ratio(15,2),scores[&c(0)]);
    assert_eq!(Tally::ratio(9,1),scores[&c(1)]);
    assert_eq!(Tally::ratio(21,2),scores[&c(2)]);
}

#[test]
fn test_first_place_votes() {
    let scores = first_place_votes(&no_ties_profile()).unwrap();
    assert_eq!(Tally::ratio(3,2),scores[&c(0)]);
    assert_eq!(Tally::zero(),scores[&c(1)]);
    assert_eq!(Tally::ratio(3,1),scores[&c(2)]);
}

#[test]
fn test_mentions() {
    let scores = mentions(&no_ties_profile()).unwrap();
    assert_eq!(Tally::ratio(9,2),scores[&c(0)]);
    assert_eq!(Tally::ratio(9,2),scores[&c(1)]);
    assert_eq!(Tally::ratio(7,2),scores[&c(2)]);
}

/// The same three ballots read against a five candidate universe : every candidate a
/// ballot leaves unranked scores as one trailing tied position, so the first ballot
/// gives each of C, D, E the mean of the vector entries 3, 2 and 1.
#[test]
fn test_unranked_candidates_share_the_tail() {
    let candidates : Vec<CandidateIndex> = (0..5).map(CandidateIndex).collect();
    let profile = PreferenceProfile::with_candidates(no_ties_ballots(),candidates).unwrap();
    let vector : Vec<Tally> = [5,4,3,2,1].iter().map(|&n|Tally::ratio(n,1)).collect();
    let scores = score_profile_from_rankings(&profile,&vector).unwrap();
    assert_eq!(Tally::ratio(33,2),scores[&c(0)]);
    assert_eq!(Tally::ratio(18,1),scores[&c(1)]);
    assert_eq!(Tally::ratio(37,2),scores[&c(2)]);
    assert_eq!(Tally::ratio(29,4),scores[&c(3)]);
    assert_eq!(Tally::ratio(29,4),scores[&c(4)]);
}

#[test]
fn test_borda_with_tied_positions() {
    // [{A,B}] w1, [{A,B,C}] w1/2, [A,C,B] w3
    let ballots = vec![
        Ballot::from_ranking(vec![TiedBlock::from([c(0),c(1)])],Tally::one()),
        Ballot::from_ranking(vec![TiedBlock::from([c(0),c(1),c(2)])],Tally::ratio(1,2)),
        Ballot::from_ranking(strict_ranking(&[c(0),c(2),c(1)]),Tally::ratio(3,1)),
    ];
    let profile = PreferenceProfile::new(ballots).unwrap();
    let scores = borda_scores(&profile).unwrap();
    assert_eq!(Tally::ratio(25,2),scores[&c(0)]);
    assert_eq!(Tally::ratio(13,2),scores[&c(1)]);
    assert_eq!(Tally::ratio(8,1),scores[&c(2)]);
}

#[test]
fn test_score_vector_validation() {
    assert_eq!(Ok(()),validate_score_vector(&[Tally::ratio(3,1),Tally::ratio(2,1),Tally::ratio(2,1),Tally::zero()]));
    assert_eq!(Err(ProfileError::NegativeScoreVector),validate_score_vector(&[Tally::one(),Tally::ratio(-1,2)]));
    assert_eq!(Err(ProfileError::IncreasingScoreVector),validate_score_vector(&[Tally::one(),Tally::ratio(2,1)]));
}

#[test]
fn test_cardinal_score_totals() {
    let mut scores = BTreeMap::new();
    scores.insert(c(0),Tally::ratio(5,1));
    scores.insert(c(1),Tally::ratio(2,1));
    let ballots = vec![
        Ballot::from_scores(scores,Tally::ratio(2,1)),
        Ballot::ranked(&[c(1)]), // ranking only, skipped by the cardinal scorer
    ];
    let profile = PreferenceProfile::with_candidates(ballots,vec![c(0),c(1)]).unwrap();
    let totals = score_profile_from_ballot_scores(&profile).unwrap();
    assert_eq!(Tally::ratio(10,1),totals[&c(0)]);
    assert_eq!(Tally::ratio(4,1),totals[&c(1)]);

    let with_empty = PreferenceProfile::with_candidates(vec![Ballot::default()],vec![c(0)]).unwrap();
    assert_eq!(Err(ProfileError::BallotMissingScores),score_profile_from_ballot_scores(&with_empty));
}

#[test]
fn test_ballots_by_first_cand() {
    let by_first = ballots_by_first_cand(&no_ties_profile()).unwrap();
    assert_eq!(3,by_first.len());
    assert_eq!(2,by_first[&c(0)].len());
    assert!(by_first[&c(1)].is_empty());
    assert_eq!(1,by_first[&c(2)].len());
    assert_eq!(Tally::ratio(3,1),by_first[&c(2)][0].weight);

    let tied = PreferenceProfile::new(vec![Ballot::from_ranking(vec![TiedBlock::from([c(0),c(1)])],Tally::one())]).unwrap();
    assert_eq!(Err(ProfileError::TiedFirstPlace),ballots_by_first_cand(&tied));
}

#[test]
fn test_score_dict_to_ranking() {
    let mut scores = BTreeMap::new();
    scores.insert(c(0),Tally::ratio(2,1));
    scores.insert(c(1),Tally::one());
    scores.insert(c(2),Tally::ratio(2,1));
    let ranking = score_dict_to_ranking(&scores);
    assert_eq!(vec![TiedBlock::from([c(0),c(2)]),TiedBlock::from([c(1)])],ranking);
}
