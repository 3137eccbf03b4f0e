// Copyright 2025 the votesim developers.
// This file is part of votesim.
// votesim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// votesim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with votesim.  If not, see <https://www.gnu.org/licenses/>.


//! The interface every ballot generator implements.

use ballots::contest::CandidateIndex;
use ballots::profile::{PreferenceProfile, UniqueRankingBuilder};
use rand::Rng;

/// A synthetic ballot generator. All configuration is checked when the model is
/// constructed; generating from a constructed model cannot fail.
pub trait BallotGenerator {
    /// Generate the configured number of ballots and fold them into a profile.
    fn generate_profile<R:Rng+?Sized>(&self,rng:&mut R) -> PreferenceProfile;
}

/// Fold freshly generated strict rankings into a profile. A generated ranking is
/// always a duplicate free subset of the candidate list, so building the profile
/// cannot fail.
pub(crate) fn fold_pool(pool:Vec<Vec<CandidateIndex>>,candidates:&[CandidateIndex]) -> PreferenceProfile {
    let mut builder = UniqueRankingBuilder::default();
    for ranking in &pool { builder.add_strict(ranking); }
    builder.into_profile(candidates).unwrap()
}
