//! Terminal front end for the converter service

pub mod batch;
pub mod convert;
pub mod rates;
pub mod setup;
pub mod ui;
