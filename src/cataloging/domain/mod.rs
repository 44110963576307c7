pub mod artifact;
pub mod collection;
pub mod document;
pub mod inventory;
pub mod location;
pub mod metadata;
pub mod package;
pub mod purl;
pub mod relationship;
pub mod release;
pub mod source;

pub use artifact::{ArtifactId, Identifiable};
pub use collection::Collection;
pub use inventory::Inventory;
pub use location::{Coordinates, Location, LocationSet};
pub use metadata::{
    ApkFileRecord, ApkMetadata, CargoLockMetadata, FileOwner, MetadataType, MixLockMetadata,
    PackageMetadata,
};
pub use package::{Language, Package, PackageBuilder, PackageType};
pub use purl::PackageUrl;
pub use relationship::{Endpoint, Relationship, RelationshipType};
pub use release::LinuxRelease;
pub use source::{Descriptor, ImageMetadata, SourceDescription, SourceScheme};
