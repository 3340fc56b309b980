// src/ingest/providers/mod.rs
pub mod sinchew;
