// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use thiserror::Error;

use crate::native::ParseNativeError;
use crate::warnings::CompatWarning;

/// Errors produced by the type engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The representation matches no registered logical type.
    #[error("data type '{0}' is not registered with the engine")]
    UnregisteredType(String),

    /// A string names a parameterized family without its parameters.
    #[error("'{0}' names a parameterized type family; pass the native type or a DataType instead")]
    AmbiguousType(String),

    /// A string could not be read as a native type.
    #[error("invalid native type: {0}")]
    InvalidNative(#[from] ParseNativeError),

    /// A compatibility warning escalated by the `error` warning action.
    #[error("{0}")]
    CompatibilityWarning(CompatWarning),

    /// Two registrations claimed the same lookup key.
    #[error("registration key '{0}' is already taken")]
    DuplicateRegistration(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
