//! Ordered Resources
//! Mission: Portfolio content (projects, qualifications) in a curated display order

pub mod collection;
pub mod normalize;
pub mod project;
pub mod qualification;

pub use collection::{Entry, OrderedCollection, OrderedResource, ReorderEntry, ResourcePayload};
pub use normalize::ListInput;
pub use project::{Project, ProjectPayload, ProjectStatus};
pub use qualification::{Qualification, QualificationKind, QualificationPayload};

pub type ProjectStore = OrderedCollection<Project>;
pub type QualificationStore = OrderedCollection<Qualification>;
