// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for construction and loading.
//!
//! Only input can fail: building a pairing or searcher from bad data, or
//! loading a malformed dump. The search itself reports through status values.

use thiserror::Error;

/// Errors raised when input data cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CensusError {
    /// A face pairing needs at least one tetrahedron.
    #[error("a face pairing needs at least one tetrahedron")]
    NoTetrahedra,

    /// The destination table has the wrong number of entries.
    #[error("face pairing has {len} destinations, expected a positive multiple of 4")]
    PairingArity { len: usize },

    /// A face is sent somewhere that does not exist.
    #[error("face {face} is paired with out-of-range face {dest}")]
    PairingOutOfRange { face: String, dest: String },

    /// Face `face` goes to `dest` but `dest` does not come back.
    #[error("face {face} is paired with {dest}, which is paired with {back}")]
    PairingNotReciprocal {
        face: String,
        dest: String,
        back: String,
    },

    /// Some tetrahedra cannot be reached from tetrahedron 0.
    #[error("face pairing is disconnected: {reached} of {total} tetrahedra reachable")]
    PairingDisconnected { reached: usize, total: usize },

    /// A text representation could not be parsed.
    #[error("invalid face pairing text: {reason}")]
    InvalidTextRep { reason: String },

    /// The supplied automorphisms do not act on this pairing.
    #[error("automorphism {index} does not preserve the face pairing")]
    InvalidAutomorphism { index: usize },

    /// A serialized searcher has a bad value.
    #[error("invalid searcher data in {field}: {reason}")]
    InvalidData { field: &'static str, reason: String },

    /// A serialized searcher ended early.
    #[error("searcher data ended while reading {field}")]
    UnexpectedEnd { field: &'static str },

    /// A serialized searcher has an unknown class tag.
    #[error("unknown searcher data tag {tag:?}")]
    UnknownTag { tag: String },

    /// Census options that cannot describe any census.
    #[error("invalid census options: {reason}")]
    InvalidOptions { reason: String },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CensusError>;
