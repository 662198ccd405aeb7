//! Flutter bridge for the trainings core.

pub mod api;
