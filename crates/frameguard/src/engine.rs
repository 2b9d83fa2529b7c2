// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type engine: the frozen registry of logical data types.
//!
//! The registry maps every accepted representation of a type (the
//! [`DataType`] itself, its [`NativeType`], its string names) to one
//! canonical [`DataType`]. It is built once and never mutated by lookups.
//!
//! ```rust
//! use frameguard::{Engine, NativeType};
//!
//! let engine = Engine::global();
//! let by_name = engine.dtype("string").unwrap();
//! let by_native = engine.dtype(&NativeType::String).unwrap();
//! assert_eq!(by_name, by_native);
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::config::{AmbiguityPolicy, EngineConfig};
use crate::dtypes::DataType;
use crate::error::{EngineError, Result};
use crate::native::{is_parameterized_family, NativeType};
use crate::warnings;

/// Anything [`Engine::dtype`] accepts.
#[derive(Debug, Clone, Copy)]
pub enum DtypeRepr<'a> {
    Logical(&'a DataType),
    Native(&'a NativeType),
    Name(&'a str),
}

impl<'a> From<&'a DataType> for DtypeRepr<'a> {
    fn from(dtype: &'a DataType) -> Self {
        DtypeRepr::Logical(dtype)
    }
}

impl<'a> From<&'a NativeType> for DtypeRepr<'a> {
    fn from(native: &'a NativeType) -> Self {
        DtypeRepr::Native(native)
    }
}

impl<'a> From<&'a str> for DtypeRepr<'a> {
    fn from(name: &'a str) -> Self {
        DtypeRepr::Name(name)
    }
}

impl<'a> From<&'a String> for DtypeRepr<'a> {
    fn from(name: &'a String) -> Self {
        DtypeRepr::Name(name.as_str())
    }
}

// ---------------------------------------------------------------------------
// Built-in registrations
// ---------------------------------------------------------------------------

/// Logical name and extra string names of a simple native type.
fn logical_names(native: &NativeType) -> Option<(&'static str, &'static [&'static str])> {
    let names: (&'static str, &'static [&'static str]) = match native {
        NativeType::Boolean => ("boolean", &["bool", "boolean"]),
        NativeType::Binary => ("binary", &["binary", "bytes"]),
        NativeType::Byte => ("int8", &["int8", "byte", "tinyint"]),
        NativeType::Short => ("int16", &["int16", "short", "smallint"]),
        NativeType::Integer => ("int32", &["int32", "int", "integer"]),
        NativeType::Long => ("int64", &["int64", "long", "bigint"]),
        NativeType::Float => ("float32", &["float32", "float"]),
        NativeType::Double => ("float64", &["float64", "double"]),
        NativeType::String => ("string", &["string", "str"]),
        NativeType::Date => ("date", &["date"]),
        NativeType::Timestamp => ("timestamp", &["timestamp", "datetime"]),
        NativeType::DayTimeInterval => ("timedelta", &["timedelta", "daytimeinterval"]),
        NativeType::Decimal { .. } | NativeType::Array { .. } | NativeType::Map { .. } => {
            return None
        }
    };
    Some(names)
}

/// Logical types registered by [`Engine::standard`], in listing order,
/// with their extra string names.
///
/// Walks [`NativeType::catalog`]: simple types become concrete logical
/// types, parameterized ones collapse into one template per family.
fn builtin_registrations() -> Vec<(DataType, &'static [&'static str])> {
    let mut registrations: Vec<(DataType, &'static [&'static str])> = Vec::new();
    for native in NativeType::catalog() {
        match logical_names(&native) {
            Some((name, equivalents)) => {
                registrations.push((DataType::new(name, native), equivalents));
            }
            None => {
                let family = native.type_name();
                let seen = registrations
                    .iter()
                    .any(|(d, _)| d.is_template() && d.name() == family);
                if !seen {
                    registrations.push((DataType::family(family), &[]));
                }
            }
        }
    }
    registrations
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Immutable registry of logical data types.
#[derive(Debug)]
pub struct Engine {
    /// Registered types in registration order.
    dtypes: Vec<DataType>,
    by_native: HashMap<NativeType, usize>,
    by_name: HashMap<String, usize>,
    /// Parameterized family templates keyed by family name.
    families: HashMap<&'static str, usize>,
    config: EngineConfig,
}

static GLOBAL: OnceLock<Engine> = OnceLock::new();

impl Engine {
    /// Start an empty registry.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Registry holding the built-in logical types.
    ///
    /// A built-in registration that collides with an earlier one is logged
    /// and skipped; use [`Engine::try_standard`] to get the error instead.
    pub fn standard(config: EngineConfig) -> Self {
        let mut builder = EngineBuilder::new().config(config);
        for (dtype, equivalents) in builtin_registrations() {
            if let Err(e) = builder.insert(dtype, equivalents) {
                log::error!("[ENGINE] skipping built-in registration: {}", e);
            }
        }
        builder.build()
    }

    /// Registry holding the built-in logical types, failing on the first
    /// colliding registration.
    pub fn try_standard(config: EngineConfig) -> Result<Self> {
        let mut builder = EngineBuilder::new().config(config);
        for (dtype, equivalents) in builtin_registrations() {
            builder.insert(dtype, equivalents)?;
        }
        Ok(builder.build())
    }

    /// Process-wide engine, built on first use from the environment.
    ///
    /// Initialization runs at most once even under concurrent first use.
    /// The configured warning action becomes the process default unless one
    /// was already set.
    pub fn global() -> &'static Engine {
        GLOBAL.get_or_init(|| {
            let config = EngineConfig::from_env().unwrap_or_else(|e| {
                log::warn!("[ENGINE] ignoring environment configuration: {}", e);
                EngineConfig::default()
            });
            if !warnings::set_default_action(config.warnings) {
                log::debug!("[ENGINE] warning action already set, keeping it");
            }
            let engine = Engine::standard(config);
            log::debug!("[ENGINE] registered {} data types", engine.len());
            engine
        })
    }

    /// Every registered logical type, in registration order.
    pub fn get_registered_dtypes(&self) -> &[DataType] {
        &self.dtypes
    }

    /// Number of registered logical types.
    pub fn len(&self) -> usize {
        self.dtypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dtypes.is_empty()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether `dtype` is registered, directly or as a member of a
    /// registered parameterized family.
    pub fn contains(&self, dtype: &DataType) -> bool {
        if self.dtypes.contains(dtype) {
            return true;
        }
        match dtype.native_type() {
            Some(native) if native.is_parameterized() => {
                self.families.contains_key(native.type_name())
            }
            _ => false,
        }
    }

    /// Resolve any accepted representation to its canonical logical type.
    pub fn dtype<'a>(&self, repr: impl Into<DtypeRepr<'a>>) -> Result<DataType> {
        match repr.into() {
            DtypeRepr::Logical(dtype) => self.resolve_logical(dtype),
            DtypeRepr::Native(native) => self.resolve_native(native),
            DtypeRepr::Name(name) => self.resolve_name(name),
        }
    }

    fn resolve_logical(&self, dtype: &DataType) -> Result<DataType> {
        if self.contains(dtype) {
            Ok(dtype.clone())
        } else {
            Err(EngineError::UnregisteredType(dtype.to_string()))
        }
    }

    fn resolve_native(&self, native: &NativeType) -> Result<DataType> {
        if let Some(&idx) = self.by_native.get(native) {
            return Ok(self.dtypes[idx].clone());
        }
        if native.is_parameterized() && self.families.contains_key(native.type_name()) {
            return Ok(DataType::parameterized(native.clone()));
        }
        Err(EngineError::UnregisteredType(native.to_string()))
    }

    fn resolve_name(&self, name: &str) -> Result<DataType> {
        let name = name.trim();
        if let Some(&idx) = self.by_name.get(name) {
            return Ok(self.dtypes[idx].clone());
        }

        if is_parameterized_family(name) {
            return self.resolve_family_name(name);
        }

        // Renderings not registered verbatim (`"StringType"`, extra spaces).
        match name.parse::<NativeType>() {
            Ok(native) if native.is_parameterized() => {
                Err(EngineError::AmbiguousType(name.to_string()))
            }
            Ok(native) => self
                .by_native
                .get(&native)
                .map(|&idx| self.dtypes[idx].clone())
                .ok_or_else(|| EngineError::UnregisteredType(name.to_string())),
            Err(_) => Err(EngineError::UnregisteredType(name.to_string())),
        }
    }

    fn resolve_family_name(&self, family: &str) -> Result<DataType> {
        if !self.families.contains_key(family) {
            return Err(EngineError::UnregisteredType(family.to_string()));
        }
        match (self.config.ambiguous_strings, family) {
            (AmbiguityPolicy::Default, "decimal") => {
                Ok(DataType::parameterized(NativeType::DEFAULT_DECIMAL))
            }
            _ => Err(EngineError::AmbiguousType(family.to_string())),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::standard(EngineConfig::default())
    }
}

/// Every type registered with the process-wide engine.
pub fn get_registered_dtypes() -> &'static [DataType] {
    Engine::global().get_registered_dtypes()
}

/// Resolve `repr` with the process-wide engine.
pub fn dtype<'a>(repr: impl Into<DtypeRepr<'a>>) -> Result<DataType> {
    Engine::global().dtype(repr)
}

// ---------------------------------------------------------------------------
// EngineBuilder
// ---------------------------------------------------------------------------

/// Registration step producing a frozen [`Engine`].
#[derive(Debug)]
pub struct EngineBuilder {
    engine: Engine,
}

impl EngineBuilder {
    fn new() -> Self {
        Self {
            engine: Engine {
                dtypes: Vec::new(),
                by_native: HashMap::new(),
                by_name: HashMap::new(),
                families: HashMap::new(),
                config: EngineConfig::default(),
            },
        }
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.engine.config = config;
        self
    }

    /// Register `dtype` under its own keys plus `equivalents`.
    ///
    /// Concrete types are keyed by native type, native rendering, logical
    /// name and every equivalent. Family templates are keyed by family name
    /// only and never by string. A parameterized member (e.g. a fixed
    /// decimal) is keyed by its native type only.
    pub fn register(mut self, dtype: DataType, equivalents: &[&str]) -> Result<Self> {
        self.insert(dtype, equivalents)?;
        Ok(self)
    }

    fn insert(&mut self, dtype: DataType, equivalents: &[&str]) -> Result<()> {
        if self.engine.dtypes.contains(&dtype) {
            return Err(EngineError::DuplicateRegistration(dtype.to_string()));
        }
        let idx = self.engine.dtypes.len();

        match dtype.native_type() {
            None => {
                if self.engine.families.contains_key(dtype.name()) {
                    return Err(EngineError::DuplicateRegistration(dtype.name().to_string()));
                }
                if !equivalents.is_empty() {
                    log::debug!(
                        "[ENGINE] string equivalents of family '{}' are not registered",
                        dtype.name()
                    );
                }
                self.engine.families.insert(dtype.name(), idx);
            }
            Some(native) if native.is_parameterized() => {
                self.engine.by_native.insert(native.clone(), idx);
            }
            Some(native) => {
                let mut keys: Vec<String> = vec![native.to_string(), dtype.name().to_string()];
                keys.extend(equivalents.iter().map(|e| e.trim().to_string()));
                keys.sort();
                keys.dedup();

                if let Some(taken) = keys.iter().find(|k| self.engine.by_name.contains_key(*k)) {
                    return Err(EngineError::DuplicateRegistration(taken.clone()));
                }
                if let Some(taken) = keys.iter().find(|k| is_parameterized_family(k)) {
                    return Err(EngineError::DuplicateRegistration(taken.clone()));
                }

                self.engine.by_native.insert(native.clone(), idx);
                for key in keys {
                    self.engine.by_name.insert(key, idx);
                }
            }
        }

        log::debug!("[ENGINE] registered {} as '{}'", dtype, dtype.name());
        self.engine.dtypes.push(dtype);
        Ok(())
    }

    /// Freeze the registry.
    pub fn build(self) -> Engine {
        self.engine
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::ParseNativeError;

    fn engine() -> Engine {
        Engine::default()
    }

    #[test]
    fn listing_is_ordered_and_restartable() {
        let engine = engine();
        let names: Vec<&str> = engine.get_registered_dtypes().iter().map(|d| d.name()).collect();
        assert_eq!(names.first(), Some(&"boolean"));
        assert_eq!(&names[names.len() - 3..], &["decimal", "array", "map"]);
        assert_eq!(engine.get_registered_dtypes(), engine.get_registered_dtypes());
        assert_eq!(engine.len(), 15);
    }

    #[test]
    fn standard_registry_follows_native_catalog() {
        let engine = Engine::try_standard(EngineConfig::default()).unwrap();
        assert_eq!(engine.get_registered_dtypes(), self::engine().get_registered_dtypes());
        for native in NativeType::catalog() {
            let resolved = engine.dtype(&native).unwrap();
            if native.is_parameterized() {
                assert!(resolved.is_parameterized());
                assert_eq!(resolved.native_type(), Some(&native));
                let family = native.type_name();
                assert!(engine
                    .get_registered_dtypes()
                    .iter()
                    .any(|d| d.is_template() && d.name() == family));
            } else {
                assert_eq!(resolved.native_type(), Some(&native));
                assert_eq!(engine.dtype(native.to_string().as_str()).unwrap(), resolved);
            }
        }
    }

    #[test]
    fn builtin_names_never_collide() {
        let mut builder = Engine::builder();
        for (dtype, equivalents) in builtin_registrations() {
            let name = dtype.to_string();
            builder = builder
                .register(dtype, equivalents)
                .unwrap_or_else(|e| panic!("registering {}: {}", name, e));
        }
        assert_eq!(builder.build().len(), 15);
    }

    #[test]
    fn resolve_by_equivalent_names() {
        let engine = engine();
        let int64 = engine.dtype(&NativeType::Long).unwrap();
        for name in ["int64", "long", "bigint", "LongType()", "LongType", " LongType( ) "] {
            assert_eq!(engine.dtype(name).unwrap(), int64, "lookup of {:?}", name);
        }
        assert_eq!(int64.name(), "int64");
    }

    #[test]
    fn parameterized_native_resolves_through_family() {
        let engine = engine();
        let native = NativeType::decimal(12, 2).unwrap();
        let resolved = engine.dtype(&native).unwrap();
        assert_eq!(resolved.native_type(), Some(&native));
        assert!(engine.contains(&resolved));
        assert_eq!(engine.dtype(&resolved).unwrap(), resolved);
        assert_eq!(engine.len(), 15, "lookups never register");
    }

    #[test]
    fn family_strings_are_rejected_by_default() {
        let engine = engine();
        for name in ["decimal", "array", "map", "DecimalType(12,2)", "ArrayType(StringType(), true)"] {
            assert!(
                matches!(engine.dtype(name), Err(EngineError::AmbiguousType(_))),
                "lookup of {:?}",
                name
            );
        }
    }

    #[test]
    fn default_policy_resolves_bare_decimal() {
        let engine = Engine::standard(EngineConfig {
            ambiguous_strings: AmbiguityPolicy::Default,
            ..EngineConfig::default()
        });
        assert_eq!(
            engine.dtype("decimal").unwrap(),
            DataType::decimal(10, 0).unwrap()
        );
        assert!(matches!(engine.dtype("array"), Err(EngineError::AmbiguousType(_))));
    }

    #[test]
    fn unregistered_representations() {
        let engine = engine();
        assert_eq!(
            engine.dtype("uuid"),
            Err(EngineError::UnregisteredType("uuid".to_string()))
        );
        let unknown = DataType::family("struct");
        assert!(matches!(engine.dtype(&unknown), Err(EngineError::UnregisteredType(_))));

        let empty = Engine::builder().build();
        assert!(empty.is_empty());
        assert!(matches!(
            empty.dtype(&NativeType::String),
            Err(EngineError::UnregisteredType(_))
        ));
        assert!(matches!(
            empty.dtype(&NativeType::DEFAULT_DECIMAL),
            Err(EngineError::UnregisteredType(_))
        ));
    }

    #[test]
    fn deeply_nested_rendering_is_unregistered() {
        let engine = engine();
        let deep = format!(
            "{}StringType(){}",
            "ArrayType(".repeat(100_000),
            ")".repeat(100_000)
        );
        assert!(matches!(
            engine.dtype(deep.as_str()),
            Err(EngineError::UnregisteredType(_))
        ));
        assert!(matches!(
            DataType::from_native(deep.as_str()),
            Err(EngineError::InvalidNative(ParseNativeError::TooDeep(_)))
        ));
    }

    #[test]
    fn family_name_without_template_is_unregistered() {
        let engine = Engine::builder()
            .register(DataType::new("string", NativeType::String), &["str"])
            .unwrap()
            .build();
        assert!(matches!(engine.dtype("decimal"), Err(EngineError::UnregisteredType(_))));
    }

    #[test]
    fn duplicate_registrations_rejected() {
        let builder = Engine::builder()
            .register(DataType::new("string", NativeType::String), &["str"])
            .unwrap();
        let err = builder
            .register(DataType::new("text", NativeType::String), &[])
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateRegistration(_)));

        let err = Engine::builder()
            .register(DataType::new("string", NativeType::String), &["text"])
            .unwrap()
            .register(DataType::new("varchar", NativeType::Binary), &["text"])
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateRegistration("text".to_string()));

        let err = Engine::builder()
            .register(DataType::new("int32", NativeType::Integer), &["decimal"])
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateRegistration("decimal".to_string()));
    }

    #[test]
    fn fixed_parameterized_member_registers_by_native_only() {
        let money = DataType::decimal(18, 4).unwrap();
        let engine = Engine::builder()
            .register(money.clone(), &["money"])
            .unwrap()
            .build();
        assert_eq!(engine.dtype(money.native_type().unwrap()).unwrap(), money);
        assert!(engine.dtype("money").is_err());
        assert!(engine.contains(&money));
        assert!(!engine.contains(&DataType::decimal(18, 2).unwrap()));
    }

    #[test]
    fn global_is_initialized_once() {
        let a = Engine::global() as *const Engine;
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| Engine::global() as *const Engine as usize))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), a as usize);
        }
    }
}
