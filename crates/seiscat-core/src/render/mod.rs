//! Rendering module
//!
//! Produces analyst-facing text for stored commands.

pub mod provenance_render;

pub use provenance_render::{
    render_provenance, render_provenance_batch, render_provenance_json, render_records,
};
