//! Store database schema.

use sqlx::PgPool;
use trailmark_core::error::HuntError;

/// SQL to create the games table.
pub const CREATE_GAMES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS games (
    id         UUID PRIMARY KEY,
    name       VARCHAR(255) NOT NULL,
    slug       VARCHAR(255) NOT NULL UNIQUE,
    status     VARCHAR(32) NOT NULL,
    settings   JSONB NOT NULL DEFAULT '{}',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

/// SQL to create the nodes table.
pub const CREATE_NODES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS nodes (
    id            UUID PRIMARY KEY,
    game_id       UUID NOT NULL REFERENCES games (id) ON DELETE CASCADE,
    node_key      VARCHAR(255) NOT NULL,
    title         VARCHAR(255) NOT NULL,
    content       JSONB NOT NULL,
    password_hash VARCHAR(64),
    is_start      BOOLEAN NOT NULL DEFAULT FALSE,
    is_end        BOOLEAN NOT NULL DEFAULT FALSE,
    points        INTEGER NOT NULL DEFAULT 0,
    hint          TEXT,
    admin_note    TEXT,
    metadata      JSONB NOT NULL DEFAULT 'null',
    sort_order    INTEGER NOT NULL DEFAULT 0,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (game_id, node_key)
);

CREATE INDEX IF NOT EXISTS idx_nodes_game_id ON nodes (game_id);
";

/// SQL to create the edges table.
pub const CREATE_EDGES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS edges (
    id         UUID PRIMARY KEY,
    game_id    UUID NOT NULL REFERENCES games (id) ON DELETE CASCADE,
    from_node  UUID NOT NULL REFERENCES nodes (id) ON DELETE CASCADE,
    to_node    UUID NOT NULL REFERENCES nodes (id) ON DELETE CASCADE,
    condition  JSONB NOT NULL,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_edges_game_id ON edges (game_id);
";

/// SQL to create the teams table.
pub const CREATE_TEAMS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS teams (
    id            UUID PRIMARY KEY,
    game_id       UUID NOT NULL REFERENCES games (id) ON DELETE CASCADE,
    code          VARCHAR(64) NOT NULL,
    name          VARCHAR(255) NOT NULL,
    start_node_id UUID REFERENCES nodes (id),
    logo_url      VARCHAR(512),
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (game_id, code)
);
";

/// SQL to create the scans table. `seq` is the authoritative append
/// order; timestamps may tie.
pub const CREATE_SCANS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS scans (
    seq            BIGSERIAL,
    id             UUID PRIMARY KEY,
    game_id        UUID NOT NULL REFERENCES games (id) ON DELETE CASCADE,
    team_id        UUID NOT NULL REFERENCES teams (id) ON DELETE CASCADE,
    node_id        UUID NOT NULL REFERENCES nodes (id),
    scanned_at     TIMESTAMPTZ NOT NULL,
    points_awarded INTEGER NOT NULL,
    client_ip      VARCHAR(64),
    user_agent     VARCHAR(512)
);

CREATE INDEX IF NOT EXISTS idx_scans_team_id ON scans (team_id, seq);
CREATE INDEX IF NOT EXISTS idx_scans_game_id ON scans (game_id, seq);
";

/// SQL to create the team sessions table.
pub const CREATE_TEAM_SESSIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS team_sessions (
    id         UUID PRIMARY KEY,
    team_id    UUID NOT NULL REFERENCES teams (id) ON DELETE CASCADE,
    token      VARCHAR(64) NOT NULL UNIQUE,
    expires_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_team_sessions_expires_at ON team_sessions (expires_at);
";

/// SQL to create the hint unlocks table.
pub const CREATE_HINT_UNLOCKS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS hint_unlocks (
    id         UUID PRIMARY KEY,
    game_id    UUID NOT NULL REFERENCES games (id) ON DELETE CASCADE,
    team_id    UUID NOT NULL REFERENCES teams (id) ON DELETE CASCADE,
    node_id    UUID NOT NULL REFERENCES nodes (id),
    cost       INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    UNIQUE (team_id, node_id)
);
";

/// Creates every table if it does not exist yet.
///
/// # Errors
///
/// Returns `HuntError::Infrastructure` if any statement fails.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), HuntError> {
    for ddl in [
        CREATE_GAMES_TABLE,
        CREATE_NODES_TABLE,
        CREATE_EDGES_TABLE,
        CREATE_TEAMS_TABLE,
        CREATE_SCANS_TABLE,
        CREATE_TEAM_SESSIONS_TABLE,
        CREATE_HINT_UNLOCKS_TABLE,
    ] {
        sqlx::raw_sql(ddl)
            .execute(pool)
            .await
            .map_err(|e| HuntError::infrastructure(format!("failed to apply schema: {e}")))?;
    }
    Ok(())
}
