//! Catalog repository
//!
//! Plain row access for events, hypocentres and phases. Catalog mutation
//! driven by analyst commands goes through `SqliteStatementExecutor`; these
//! functions load catalog data and let tools and tests inspect the result.

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use rusqlite::{Connection, OptionalExtension, Row};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventRow {
    pub evid: i64,
    pub prime_hypid: Option<i64>,
    pub banished: bool,
    pub assessed: bool,
    pub committed: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct HypocentreRow {
    pub hypid: i64,
    pub evid: i64,
    pub agency: String,
    pub time: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub depth: Option<f64>,
    pub fix_depth: bool,
    pub nass: Option<i64>,
    pub ndef: Option<i64>,
    pub sdobs: Option<f64>,
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PhaseRow {
    pub phid: i64,
    pub evid: i64,
    pub hypid: Option<i64>,
    pub sta: String,
    pub phase: Option<String>,
    pub time: Option<String>,
    pub nondef: bool,
    pub timedef: bool,
    pub azimdef: bool,
    pub slowdef: bool,
    pub putative: bool,
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        evid: row.get(0)?,
        prime_hypid: row.get(1)?,
        banished: row.get(2)?,
        assessed: row.get(3)?,
        committed: row.get(4)?,
    })
}

fn row_to_hypocentre(row: &Row<'_>) -> rusqlite::Result<HypocentreRow> {
    Ok(HypocentreRow {
        hypid: row.get(0)?,
        evid: row.get(1)?,
        agency: row.get(2)?,
        time: row.get(3)?,
        lat: row.get(4)?,
        lon: row.get(5)?,
        depth: row.get(6)?,
        fix_depth: row.get(7)?,
        nass: row.get(8)?,
        ndef: row.get(9)?,
        sdobs: row.get(10)?,
        deprecated: row.get(11)?,
    })
}

fn row_to_phase(row: &Row<'_>) -> rusqlite::Result<PhaseRow> {
    Ok(PhaseRow {
        phid: row.get(0)?,
        evid: row.get(1)?,
        hypid: row.get(2)?,
        sta: row.get(3)?,
        phase: row.get(4)?,
        time: row.get(5)?,
        nondef: row.get(6)?,
        timedef: row.get(7)?,
        azimdef: row.get(8)?,
        slowdef: row.get(9)?,
        putative: row.get(10)?,
    })
}

const HYPOCENTRE_COLUMNS: &str = "SELECT hypid, evid, agency, time, lat, lon, depth, fix_depth,
        nass, ndef, sdobs, deprecated FROM hypocentres";

/// SQLite repository for catalog rows
pub struct CatalogRepo;

impl CatalogRepo {
    pub fn insert_event(conn: &Connection, event: &EventRow) -> Result<()> {
        conn.execute(
            "INSERT INTO events (evid, prime_hypid, banished, assessed, committed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                event.evid,
                event.prime_hypid,
                event.banished,
                event.assessed,
                event.committed
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_event(conn: &Connection, evid: i64) -> Result<Option<EventRow>> {
        conn.query_row(
            "SELECT evid, prime_hypid, banished, assessed, committed FROM events WHERE evid = ?1",
            [evid],
            row_to_event,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    pub fn insert_hypocentre(conn: &Connection, hyp: &HypocentreRow) -> Result<()> {
        conn.execute(
            "INSERT INTO hypocentres
                (hypid, evid, agency, time, lat, lon, depth, fix_depth, nass, ndef, sdobs, deprecated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            rusqlite::params![
                hyp.hypid,
                hyp.evid,
                hyp.agency,
                hyp.time,
                hyp.lat,
                hyp.lon,
                hyp.depth,
                hyp.fix_depth,
                hyp.nass,
                hyp.ndef,
                hyp.sdobs,
                hyp.deprecated,
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_hypocentre(conn: &Connection, hypid: i64) -> Result<Option<HypocentreRow>> {
        conn.query_row(
            &format!("{} WHERE hypid = ?1", HYPOCENTRE_COLUMNS),
            [hypid],
            row_to_hypocentre,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Live (non-deprecated) hypocentres of an event, ordered by hypid
    pub fn list_hypocentres(conn: &Connection, evid: i64) -> Result<Vec<HypocentreRow>> {
        let mut stmt = conn
            .prepare(&format!(
                "{} WHERE evid = ?1 AND deprecated = 0 ORDER BY hypid",
                HYPOCENTRE_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([evid], row_to_hypocentre)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        Ok(rows)
    }

    pub fn insert_phase(conn: &Connection, phase: &PhaseRow) -> Result<()> {
        conn.execute(
            "INSERT INTO phases
                (phid, evid, hypid, sta, phase, time, nondef, timedef, azimdef, slowdef, putative)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                phase.phid,
                phase.evid,
                phase.hypid,
                phase.sta,
                phase.phase,
                phase.time,
                phase.nondef,
                phase.timedef,
                phase.azimdef,
                phase.slowdef,
                phase.putative,
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    pub fn get_phase(conn: &Connection, phid: i64) -> Result<Option<PhaseRow>> {
        conn.query_row(
            "SELECT phid, evid, hypid, sta, phase, time, nondef, timedef, azimdef, slowdef, putative
             FROM phases WHERE phid = ?1",
            [phid],
            row_to_phase,
        )
        .optional()
        .map_err(from_rusqlite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations;

    #[test]
    fn test_event_and_hypocentre_round_trip() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrations::apply_migrations(&mut conn).unwrap();

        CatalogRepo::insert_event(
            &conn,
            &EventRow {
                evid: 100,
                prime_hypid: Some(2001),
                ..Default::default()
            },
        )
        .unwrap();
        CatalogRepo::insert_hypocentre(
            &conn,
            &HypocentreRow {
                hypid: 2001,
                evid: 100,
                agency: "ISC".to_string(),
                depth: Some(10.0),
                ..Default::default()
            },
        )
        .unwrap();

        let event = CatalogRepo::get_event(&conn, 100).unwrap().unwrap();
        assert_eq!(event.prime_hypid, Some(2001));
        assert!(!event.banished);

        let hyps = CatalogRepo::list_hypocentres(&conn, 100).unwrap();
        assert_eq!(hyps.len(), 1);
        assert_eq!(hyps[0].depth, Some(10.0));
        assert!(CatalogRepo::get_hypocentre(&conn, 9).unwrap().is_none());
    }
}
