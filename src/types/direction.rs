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

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;

use crate::error::ErrorReport;
use crate::error::fail;

/// The decision taken on a card.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    /// Swiped left.
    Pass,
    /// Swiped right.
    Like,
    /// A like with extra emphasis. Counted among the matches.
    SuperLike,
}

impl Direction {
    /// Whether this decision puts the item among the matches.
    pub fn is_match(self) -> bool {
        match self {
            Direction::Pass => false,
            Direction::Like | Direction::SuperLike => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Pass => "pass",
            Direction::Like => "like",
            Direction::SuperLike => "superlike",
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pass" => Ok(Direction::Pass),
            "like" => Ok(Direction::Like),
            "superlike" => Ok(Direction::SuperLike),
            _ => fail(format!("Invalid direction: {value}")),
        }
    }
}

impl ToSql for Direction {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Direction {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let string: String = FromSql::column_result(value)?;
        Direction::try_from(string).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
