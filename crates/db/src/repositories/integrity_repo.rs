//! Cross-table consistency checks.
//!
//! Each check is a query returning offending rows; grading happens in
//! `jdl_core::integrity`.

use jdl_core::entry::EntryRestriction;
use jdl_core::integrity::{
    IntegrityIssue, ISSUE_BROKEN_TEAM_REFERENCE, ISSUE_CLASS_DRIFT, ISSUE_ENTRY_TEAM_MISMATCH,
    ISSUE_TEAM_BELOW_MINIMUM,
};
use sqlx::types::Json;
use sqlx::PgPool;

pub struct IntegrityRepo;

impl IntegrityRepo {
    /// Run every check and collect the findings.
    pub async fn find_issues(pool: &PgPool) -> Result<Vec<IntegrityIssue>, sqlx::Error> {
        let mut issues = Vec::new();

        let broken: Vec<(String, String)> = sqlx::query_as(
            "SELECT p.id, p.team_id FROM players p \
             LEFT JOIN teams t ON t.id = p.team_id \
             WHERE p.team_id IS NOT NULL AND t.id IS NULL \
             ORDER BY p.id",
        )
        .fetch_all(pool)
        .await?;
        issues.extend(broken.into_iter().map(|(id, team_id)| IntegrityIssue {
            kind: ISSUE_BROKEN_TEAM_REFERENCE,
            entity: "Player",
            entity_id: id,
            detail: format!("team '{team_id}' does not exist"),
        }));

        // Latest approved change per player versus the stored class.
        let drift: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT p.id, p.current_class, h.new_class FROM players p \
             JOIN LATERAL ( \
                SELECT c.new_class FROM class_change_history c \
                WHERE c.player_id = p.id AND c.status = 'approved' \
                ORDER BY c.decided_at DESC NULLS LAST, c.changed_at DESC, c.id DESC \
                LIMIT 1 \
             ) h ON TRUE \
             WHERE h.new_class <> p.current_class \
             ORDER BY p.id",
        )
        .fetch_all(pool)
        .await?;
        issues.extend(drift.into_iter().map(|(id, current, approved)| IntegrityIssue {
            kind: ISSUE_CLASS_DRIFT,
            entity: "Player",
            entity_id: id,
            detail: format!("class is '{current}' but latest approved change is '{approved}'"),
        }));

        let mismatched: Vec<(String, String, Option<String>)> = sqlx::query_as(
            "SELECT e.id, e.team_id, p.team_id FROM tournament_entries e \
             JOIN players p ON p.id = e.player_id \
             WHERE e.status IN ('pending', 'approved') \
               AND p.team_id IS DISTINCT FROM e.team_id \
             ORDER BY e.id",
        )
        .fetch_all(pool)
        .await?;
        issues.extend(
            mismatched
                .into_iter()
                .map(|(id, entry_team, player_team)| IntegrityIssue {
                    kind: ISSUE_ENTRY_TEAM_MISMATCH,
                    entity: "TournamentEntry",
                    entity_id: id,
                    detail: format!(
                        "entered for team '{entry_team}' but player is on {}",
                        player_team.map_or_else(|| "no team".to_string(), |t| format!("team '{t}'"))
                    ),
                }),
        );

        // Once entries close, every participating team must field its minimum.
        let fielded: Vec<(String, String, i64, Json<EntryRestriction>)> = sqlx::query_as(
            "SELECT tr.id, e.team_id, COUNT(*)::BIGINT, tr.entry_restriction \
             FROM tournaments tr \
             JOIN tournament_entries e \
               ON e.tournament_id = tr.id AND e.status IN ('pending', 'approved') \
             WHERE tr.status IN ('entry_closed', 'in_progress') \
             GROUP BY tr.id, e.team_id, tr.entry_restriction \
             ORDER BY tr.id, e.team_id",
        )
        .fetch_all(pool)
        .await?;
        issues.extend(
            fielded
                .into_iter()
                .filter(|(_, _, count, Json(restriction))| !restriction.team_meets_minimum(*count))
                .map(|(tournament_id, team_id, count, Json(restriction))| IntegrityIssue {
                    kind: ISSUE_TEAM_BELOW_MINIMUM,
                    entity: "Tournament",
                    entity_id: tournament_id,
                    detail: format!(
                        "team '{team_id}' fields {count} of the required {} players",
                        restriction.min_players_per_team
                    ),
                }),
        );

        Ok(issues)
    }
}
