pub mod snapshot_presenter;
