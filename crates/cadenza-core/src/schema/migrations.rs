/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Composers own their compositions
CREATE TABLE IF NOT EXISTS composers (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_composers_name ON composers(name);

-- Compositions; enum columns hold the integer codes
CREATE TABLE IF NOT EXISTS compositions (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    key_signature INTEGER NOT NULL CHECK (key_signature BETWEEN 0 AND 28),
    number_of_movements INTEGER NOT NULL CHECK (number_of_movements >= 1),
    format INTEGER NOT NULL CHECK (format BETWEEN 1 AND 10),
    composer_id TEXT NOT NULL REFERENCES composers(id) ON DELETE CASCADE,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_compositions_composer_id ON compositions(composer_id);
"#;

// Backs the create-time duplicate check so concurrent creates cannot both
// commit the same (name, key, composer) triple.
const MIGRATION_002: &str = r#"
CREATE UNIQUE INDEX IF NOT EXISTS idx_compositions_identity
    ON compositions(name, key_signature, composer_id);
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: MIGRATION_001,
    },
    Migration {
        version: 2,
        name: "unique_composition_identity",
        sql: MIGRATION_002,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_are_increasing() {
        for pair in MIGRATIONS.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
    }
}
