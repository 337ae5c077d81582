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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::direction::Direction;
use crate::types::photo::PhotoRecord;
use crate::types::timestamp::Timestamp;

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

/// A decision taken during a session, as persisted.
pub struct DecisionRecord {
    pub photo_id: String,
    pub position: usize,
    pub direction: Direction,
}

/// Decision counts across every saved session.
#[derive(Default, PartialEq, Debug)]
pub struct DecisionCounts {
    pub likes: usize,
    pub super_likes: usize,
    pub passes: usize,
}

impl Database {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    /// All photos, newest first.
    pub fn photos(&self) -> Fallible<Vec<PhotoRecord>> {
        let conn = self.acquire()?;
        let sql = "select photo_id, locator, captured_at from photos order by captured_at desc, photo_id desc;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([])?;
        let mut photos = Vec::new();
        while let Some(row) = rows.next()? {
            photos.push(PhotoRecord {
                identifier: row.get(0)?,
                locator: row.get(1)?,
                captured_at: row.get(2)?,
            });
        }
        Ok(photos)
    }

    pub fn get_photo(&self, photo_id: &str) -> Fallible<Option<PhotoRecord>> {
        let conn = self.acquire()?;
        let sql = "select photo_id, locator, captured_at from photos where photo_id = ?;";
        let photo = conn
            .query_row(sql, [photo_id], |row| {
                Ok(PhotoRecord {
                    identifier: row.get(0)?,
                    locator: row.get(1)?,
                    captured_at: row.get(2)?,
                })
            })
            .optional()?;
        Ok(photo)
    }

    pub fn insert_photo(&self, photo: &PhotoRecord) -> Fallible<()> {
        log::debug!("Adding photo: {}", photo.identifier);
        let conn = self.acquire()?;
        let sql = "insert into photos (photo_id, locator, captured_at) values (?, ?, ?);";
        conn.execute(
            sql,
            (&photo.identifier, &photo.locator, photo.captured_at),
        )?;
        Ok(())
    }

    /// Delete a photo. Returns whether it existed.
    pub fn delete_photo(&self, photo_id: &str) -> Fallible<bool> {
        let conn = self.acquire()?;
        let deleted = conn.execute("delete from photos where photo_id = ?;", [photo_id])?;
        Ok(deleted > 0)
    }

    /// Delete every photo. Returns how many there were.
    pub fn clear_photos(&self) -> Fallible<usize> {
        let conn = self.acquire()?;
        let deleted = conn.execute("delete from photos;", [])?;
        Ok(deleted)
    }

    pub fn photo_count(&self) -> Fallible<usize> {
        let conn = self.acquire()?;
        let count: i64 = conn.query_row("select count(*) from photos;", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Save a swipe session and its decisions.
    pub fn save_session(
        &self,
        started_at: Timestamp,
        ended_at: Timestamp,
        decisions: &[DecisionRecord],
    ) -> Fallible<()> {
        let mut conn = self.acquire()?;
        let tx = conn.transaction()?;
        let session_id = insert_session(&tx, started_at, ended_at)?;
        for decision in decisions {
            insert_decision(&tx, session_id, decision)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn session_count(&self) -> Fallible<usize> {
        let conn = self.acquire()?;
        let count: i64 = conn.query_row("select count(*) from sessions;", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn decision_counts(&self) -> Fallible<DecisionCounts> {
        let conn = self.acquire()?;
        let mut stmt = conn.prepare("select direction, count(*) from decisions group by direction;")?;
        let mut rows = stmt.query([])?;
        let mut counts = DecisionCounts::default();
        while let Some(row) = rows.next()? {
            let direction: Direction = row.get(0)?;
            let count: i64 = row.get(1)?;
            let count = count as usize;
            match direction {
                Direction::Like => counts.likes = count,
                Direction::SuperLike => counts.super_likes = count,
                Direction::Pass => counts.passes = count,
            }
        }
        Ok(counts)
    }

    fn acquire(&self) -> Fallible<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ErrorReport::new("database connection lock poisoned"))
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["photos"], |row| row.get(0))?;
    Ok(count > 0)
}

fn insert_session(tx: &Transaction, started_at: Timestamp, ended_at: Timestamp) -> Fallible<i64> {
    let sql = "insert into sessions (started_at, ended_at) values (?, ?) returning session_id;";
    let session_id: i64 = tx.query_row(sql, (started_at, ended_at), |row| row.get(0))?;
    Ok(session_id)
}

fn insert_decision(tx: &Transaction, session_id: i64, decision: &DecisionRecord) -> Fallible<()> {
    let sql = "insert into decisions (session_id, photo_id, position, direction) values (?, ?, ?, ?);";
    tx.execute(
        sql,
        (
            session_id,
            &decision.photo_id,
            decision.position as i64,
            decision.direction,
        ),
    )?;
    Ok(())
}
