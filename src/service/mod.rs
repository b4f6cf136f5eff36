pub mod calculator;
pub mod ingestion;
