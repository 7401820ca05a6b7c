//! Matching primitives
//!
//! - Renamed-namespace lookup and scan order
//! - Argument slot resolution and rewriting
//! - Value equivalence and constant folding
