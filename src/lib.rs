//! Crawldump - referentially consistent partial dumps for MySQL
//!
//! This crate computes a closure of rows across a relational schema:
//! starting from one table and a row filter it follows foreign keys
//! outward (the rows the seed depends on) and inward (the rows that
//! depend on the seed), and renders the result as a mysqldump shell
//! script that extracts exactly those rows without leaving dangling
//! references.

pub mod config;
pub mod crawler;
pub mod db;
pub mod dump_script;
pub mod schema_catalog;

#[cfg(test)]
pub mod testing;
