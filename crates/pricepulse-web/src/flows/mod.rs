//! Data flows behind the two dynamic views. Each flow talks to the catalog
//! and the session, and returns a plain state value for the view to render.

pub mod detail;
pub mod search;
