//! Cataloging core: the package and relationship model plus the pure
//! services that operate on it. Nothing in here performs I/O.

pub mod domain;
pub mod policies;
pub mod services;
