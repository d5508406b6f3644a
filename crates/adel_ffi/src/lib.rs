//! Flutter bridge for the ADEL admin dashboard core.

pub mod api;
