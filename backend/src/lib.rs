//! Backend for the maternal/child-health mobile app: account auth, child
//! registration, and vaccine-schedule generation over SQLite.

pub mod auth;
pub mod db;
pub mod domain;
pub mod rest;
pub mod storage;
