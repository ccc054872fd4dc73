//! Integration tests

mod year_flow;
