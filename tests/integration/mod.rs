//! Integration tests for csum listing and reconciliation

mod cli_compare;
mod listing_roundtrip;
mod reconcile_partition;
mod walk_and_list;
