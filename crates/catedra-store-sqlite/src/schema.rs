//! SQL schema for the catedra SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Table and column names keep the deployed wire contract's Spanish domain
/// names; the encode layer bridges them to the Rust types.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS materias (
    id           INTEGER PRIMARY KEY,
    nombre       TEXT NOT NULL,
    cuatrimestre INTEGER NOT NULL,    -- 1 | 2
    anio         INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS cursos (
    id         INTEGER PRIMARY KEY,
    nombre     TEXT NOT NULL,
    id_materia INTEGER REFERENCES materias(id)
);

CREATE TABLE IF NOT EXISTS tps (
    id          INTEGER PRIMARY KEY,
    nombre      TEXT NOT NULL,
    descripcion TEXT NOT NULL,        -- Markdown source
    id_curso    INTEGER REFERENCES cursos(id)
);

-- Repository ids are caller-supplied, never auto-generated; the primary key
-- is the authoritative duplicate guard.
CREATE TABLE IF NOT EXISTS repositorios (
    id             INTEGER PRIMARY KEY,
    titulo         TEXT NOT NULL,
    full_name      TEXT NOT NULL,
    descripcion    TEXT,
    calificacion   INTEGER NOT NULL DEFAULT 0,
    id_usuario     TEXT NOT NULL,
    fecha_creacion TEXT NOT NULL,     -- ISO 8601 UTC; server-assigned
    id_tp          INTEGER REFERENCES tps(id)
);

CREATE INDEX IF NOT EXISTS cursos_materia_idx  ON cursos(id_materia);
CREATE INDEX IF NOT EXISTS tps_curso_idx       ON tps(id_curso);
CREATE INDEX IF NOT EXISTS repositorios_tp_idx ON repositorios(id_tp);

PRAGMA user_version = 1;
";
