//! Test support: in-memory storage, Postgres databases and fixtures.

pub(crate) mod db;
pub(crate) mod logs;
pub(crate) mod memory;

pub(crate) use fixtures::TestContext;
