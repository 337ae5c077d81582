// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::Serialize;

use crate::collection::Collection;
use crate::db::DecisionCounts;
use crate::error::Fallible;

pub fn print_stats(directory: Option<String>) -> Fallible<()> {
    let coll = Collection::new(directory)?;
    let stats = get_stats(&coll)?;
    let stats_json = serde_json::to_string_pretty(&stats)?;
    println!("{stats_json}");
    Ok(())
}

#[derive(Serialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    photo_count: usize,
    session_count: usize,
    like_count: usize,
    super_like_count: usize,
    pass_count: usize,
}

fn get_stats(coll: &Collection) -> Fallible<Stats> {
    let db = coll.store.database();
    let DecisionCounts {
        likes,
        super_likes,
        passes,
    } = db.decision_counts()?;
    Ok(Stats {
        photo_count: coll.store.count()?,
        session_count: db.session_count()?,
        like_count: likes,
        super_like_count: super_likes,
        pass_count: passes,
    })
}
