//! Safety API library entry points.
//!
//! This crate owns the data side of the service: the emergency bell dataset,
//! the hotzone and community SQLite stores, page arithmetic and the shared
//! proximity search. HTTP consumers should only depend on the items exported
//! here instead of talking to the files directly.

#![deny(warnings)]

pub mod bells;
pub mod community;
pub mod db;
pub mod error;
pub mod hotzone;
pub mod pagination;
pub mod proximity;

pub use bells::{Bell, BellStats, BellStore};
pub use community::{CommunityStore, NewComment, NewPost, Post, PostDetail, PostPage};
pub use error::{Error, Result};
pub use hotzone::{
    Hotzone, HotzoneDetail, HotzoneStats, HotzoneStore, Incident, NewHotzone, NewIncident,
};
pub use pagination::{Page, Pagination};
pub use proximity::{within_radius, GeoPoint, Located, Nearby};
