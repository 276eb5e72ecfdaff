//! Skuld measurement-counts data layer.
//!
//! This crate provides the data structures shared by the Skuld
//! post-processing stack: bitstring outcome frequencies ([`Counts`]),
//! subsystem partitions ([`QubitDegree`], [`BitstringRange`]) with cyclic
//! wraparound slicing, counts projection, and Hamming distance. It forms
//! the foundation the entropy estimators build on.
//!
//! # Example: projecting counts onto a subsystem
//!
//! ```rust
//! use skuld_counts::{project_counts, Counts, QubitDegree, qubit_selector};
//!
//! let counts: Counts = [("01011010", 100u64), ("11011010", 28)]
//!     .into_iter()
//!     .collect();
//!
//! // Keep the four right-most bits; the two keys collide after projection.
//! let range = qubit_selector(8, Some(QubitDegree::Size(4))).unwrap();
//! let projected = project_counts(&counts, range).unwrap();
//! assert_eq!(projected.entries(), &[("1010".to_string(), 128)]);
//! ```

pub mod counts;
pub mod dummy;
pub mod error;
pub mod hamming;
pub mod partition;
pub mod project;

pub use counts::Counts;
pub use dummy::{make_bit_strings, make_dummy_counts};
pub use error::{CountsError, CountsResult};
pub use hamming::hamming_distance;
pub use partition::{
    BitstringRange, QubitDegree, cycling_slice, degree_handler, is_cycling_slice_active,
    qubit_selector,
};
pub use project::{ProjectedCounts, project_counts};
