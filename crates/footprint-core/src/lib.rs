//! # footprint-core
//!
//! Structural footprint of in-memory object graphs: how many distinct
//! objects are reachable from a root, how many references connect them, and
//! how many primitive leaves of each kind they hold.
//!
//! ## Architecture
//!
//! ```text
//!  root ──► ObjectExplorer ──► FieldEnumerator (Heap, NativeEnumerator, ...)
//!                │
//!                ▼ Chain per edge
//!           ObjectVisitor ──► Pipeline (not_shared ∧ acceptor ∧ AtMostOnce)
//!                │
//!                ▼
//!            Footprint
//! ```
//!
//! ## Constraints
//!
//! - Read-only: measuring never mutates the graph
//! - Deterministic: BTree collections only, identity-keyed cycle detection
//! - Iterative: deep graphs do not grow the call stack
//! - No async, no I/O

// =============================================================================
// MODULES
// =============================================================================

pub mod chain;
pub mod enumerator;
pub mod explorer;
pub mod footprint;
pub mod heap;
pub mod measurer;
pub mod native;
pub mod predicate;
pub mod traversal;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    ClassId, DeclaredType, FootprintError, ObjectId, PrimitiveKind, PrimitiveValue, SharedKind,
    TypeName, Value,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use chain::Chain;
pub use enumerator::{Edge, FieldEnumerator, Step};
pub use explorer::{ObjectExplorer, ObjectVisitor};
pub use footprint::Footprint;
pub use measurer::{ObjectGraphMeasurer, ObjectGraphVisitor, measure};
pub use predicate::{AtMostOnce, Pipeline, always_accept, not_shared};
pub use traversal::{Feature, Features, Traversal};

// =============================================================================
// RE-EXPORTS: Object Models
// =============================================================================

pub use heap::{Heap, Slot, TypeKind};
pub use native::{Fields, NativeEnumerator, NativeRef, Traverse, measure_native};
