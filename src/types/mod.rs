//! Public types for the gqlpatch API.

mod document;
mod intent;
mod path;
mod recipe;

pub use document::{QueryDocument, QueryTarget, Variables};
pub use intent::Intent;
pub use path::{ArrayLocation, PathSegment, ValuePath};
pub use recipe::{ItemMapper, UpdateRecipe};
