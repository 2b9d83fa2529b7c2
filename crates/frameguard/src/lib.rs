// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # frameguard - dataframe type engine
//!
//! Maps the native types of a dataframe execution engine (`StringType()`,
//! `DecimalType(12,2)`, ...) to a canonical set of logical data types used
//! by validation code.
//!
//! ## Quick Start
//!
//! ```rust
//! use frameguard::{dtype, get_registered_dtypes, NativeType};
//!
//! for data_type in get_registered_dtypes() {
//!     assert_eq!(&dtype(data_type).unwrap(), data_type);
//! }
//!
//! let int64 = dtype("bigint").unwrap();
//! assert_eq!(int64, dtype(&NativeType::Long).unwrap());
//! ```
//!
//! ## Architecture
//!
//! ```text
//!   DataType | NativeType | "name"
//!                 |
//!                 v
//!        Engine::dtype()  ------>  frozen registry (built once)
//!                 |
//!                 v
//!        canonical DataType
//!
//!   DataType::from_native()  --->  CompatWarning (log / capture / error)
//! ```
//!
//! ## Modules Overview
//!
//! - [`engine`] - registry and lookup
//! - [`dtypes`] - logical data types
//! - [`native`] - native type system of the execution engine
//! - [`warnings`] - compatibility warning side channel
//! - [`config`] - engine configuration

pub mod config;
pub mod dtypes;
pub mod engine;
pub mod error;
pub mod native;
pub mod warnings;

pub use config::{AmbiguityPolicy, ConfigError, EngineConfig};
pub use dtypes::{DataType, NativeRepr};
pub use engine::{dtype, get_registered_dtypes, DtypeRepr, Engine, EngineBuilder};
pub use error::{EngineError, Result};
pub use native::{NativeType, ParseNativeError};
pub use warnings::{catch_warnings, catch_warnings_with, CompatWarning, WarningAction};
