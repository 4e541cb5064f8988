// Copyright 2025 Apache Doris Community
// Licensed under the Apache License, Version 2.0

//! Compatibility Resolver
//!
//! Selects the canonical shape expected from the engine being fronted.
//! Version-dependent behavior is expressed as a tagged [`Shape`]: the
//! primary expectation, or a named [`Fallback`] applied to it. New engine
//! quirks add a `Fallback` variant without touching the primary path.

use crate::field::Field;
use crate::result::QueryResult;
use crate::types::Type;
use proxy_common::constants::UTF8_GENERAL_CI;
use proxy_common::{Config, EngineError, EngineProfile, ProxyError, Result};
use std::fmt;

/// A documented substitution an engine applies to the primary shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Fallback {
    /// JSON columns reported as blobs in the utf8 collation (MariaDB 10.2+).
    JsonAsBlob,
}

impl Fallback {
    pub const ALL: &'static [Fallback] = &[Fallback::JsonAsBlob];

    /// Apply to one field. `None` when the fallback does not touch it.
    pub fn apply_field(&self, field: &Field) -> Option<Field> {
        match self {
            Fallback::JsonAsBlob if field.ty == Type::Json => Some(Field {
                ty: Type::Blob,
                charset: UTF8_GENERAL_CI,
                ..field.clone()
            }),
            _ => None,
        }
    }

    /// Apply to a whole result, retyping the values of every affected
    /// column. `None` when no column is affected.
    pub fn apply_result(&self, result: &QueryResult) -> Option<QueryResult> {
        let mut changed = false;
        let mut out = result.clone();
        for (i, field) in result.fields.iter().enumerate() {
            let Some(substituted) = self.apply_field(field) else {
                continue;
            };
            for row in out.rows.iter_mut() {
                if let Some(value) = row.get_mut(i) {
                    if !value.is_null() {
                        *value = value.with_type(substituted.ty);
                    }
                }
            }
            out.fields[i] = substituted;
            changed = true;
        }
        changed.then_some(out)
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::JsonAsBlob => write!(f, "json-as-blob"),
        }
    }
}

/// The expected shape of an engine response.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<T> {
    Primary(T),
    Fallback(Fallback, T),
}

impl<T> Shape<T> {
    pub fn get(&self) -> &T {
        match self {
            Shape::Primary(t) | Shape::Fallback(_, t) => t,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Shape::Primary(t) | Shape::Fallback(_, t) => t,
        }
    }

    pub fn fallback(&self) -> Option<Fallback> {
        match self {
            Shape::Primary(_) => None,
            Shape::Fallback(fb, _) => Some(*fb),
        }
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, Shape::Primary(_))
    }
}

/// Outcome of resolving a scenario against the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Expected(Shape<T>),
    /// The engine cannot express the scenario; nothing further should be
    /// asserted against it.
    Skip(String),
}

impl<T> Resolution<T> {
    pub fn is_skip(&self) -> bool {
        matches!(self, Resolution::Skip(_))
    }

    pub fn expected(self) -> Option<Shape<T>> {
        match self {
            Resolution::Expected(shape) => Some(shape),
            Resolution::Skip(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CompatibilityResolver {
    profile: EngineProfile,
}

impl CompatibilityResolver {
    pub fn new(profile: EngineProfile) -> Self {
        Self { profile }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.engine_profile()?))
    }

    pub fn profile(&self) -> &EngineProfile {
        &self.profile
    }

    /// Treat a failed DDL statement. A syntax-class error means the engine
    /// predates the feature and the scenario is skipped; anything else is a
    /// genuine failure.
    pub fn on_ddl_error<T>(&self, err: &EngineError) -> Result<Resolution<T>> {
        if err.is_syntax_error() {
            tracing::debug!(engine = %self.profile, error = %err, "DDL rejected as syntax error, skipping");
            return Ok(Resolution::Skip(format!(
                "{} rejected the declaration: {}",
                self.profile, err
            )));
        }
        Err(ProxyError::Compatibility(format!(
            "{} failed the declaration: {}",
            self.profile, err
        )))
    }

    /// Shape a JSON-bearing result is predicted to take on this engine,
    /// before anything has been observed.
    pub fn predict_json(&self, expected: QueryResult) -> Resolution<QueryResult> {
        if !self.profile.supports_json_columns() {
            return Resolution::Skip(format!("{} has no JSON column type", self.profile));
        }
        if self.profile.json_is_blob_alias() {
            if let Some(substituted) = Fallback::JsonAsBlob.apply_result(&expected) {
                return Resolution::Expected(Shape::Fallback(Fallback::JsonAsBlob, substituted));
            }
        }
        Resolution::Expected(Shape::Primary(expected))
    }

    /// Reconcile an observed field against the primary expectation,
    /// accepting any known fallback.
    pub fn reconcile_field(&self, expected: &Field, observed: &Field) -> Result<Shape<Field>> {
        if expected == observed {
            return Ok(Shape::Primary(observed.clone()));
        }
        for fallback in Fallback::ALL {
            if fallback.apply_field(expected).as_ref() == Some(observed) {
                tracing::debug!(engine = %self.profile, column = %observed.name, %fallback, "accepted fallback column shape");
                return Ok(Shape::Fallback(*fallback, observed.clone()));
            }
        }
        Err(ProxyError::Compatibility(format!(
            "column {}: expected {} (charset {}, flags {}), engine reported {} (charset {}, flags {})",
            expected.name,
            expected.ty,
            expected.charset,
            expected.flags,
            observed.ty,
            observed.charset,
            observed.flags
        )))
    }

    /// Reconcile an observed result against the primary expectation,
    /// accepting any known fallback.
    pub fn reconcile(&self, expected: &QueryResult, observed: &QueryResult) -> Result<Shape<QueryResult>> {
        if expected == observed {
            return Ok(Shape::Primary(observed.clone()));
        }
        for fallback in Fallback::ALL {
            if fallback.apply_result(expected).as_ref() == Some(observed) {
                tracing::debug!(engine = %self.profile, %fallback, "accepted fallback result shape");
                return Ok(Shape::Fallback(*fallback, observed.clone()));
            }
        }
        Err(ProxyError::Compatibility(describe_mismatch(expected, observed)))
    }
}

fn describe_mismatch(expected: &QueryResult, observed: &QueryResult) -> String {
    if expected.fields.len() != observed.fields.len() {
        return format!(
            "expected {} fields, engine reported {}",
            expected.fields.len(),
            observed.fields.len()
        );
    }
    if let Some((want, got)) = expected.fields.iter().zip(&observed.fields).find(|(a, b)| a != b) {
        return format!("field {} differs: expected {:?}, got {:?}", want.name, want, got);
    }
    if expected.rows != observed.rows {
        return format!(
            "rows differ: expected {} rows, engine returned {}",
            expected.rows.len(),
            observed.rows.len()
        );
    }
    format!(
        "status differs: expected affected={} insert_id={} flags={:#06x}, got affected={} insert_id={} flags={:#06x}",
        expected.rows_affected,
        expected.insert_id,
        expected.status_flags,
        observed.rows_affected,
        observed.insert_id,
        observed.status_flags
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn profile(version: &str) -> CompatibilityResolver {
        CompatibilityResolver::new(EngineProfile::from_server_version(version).unwrap())
    }

    fn json_field() -> Field {
        Field {
            name: "val".into(),
            ty: Type::Json,
            column_length: u32::MAX,
            charset: 63,
            flags: 144,
            ..Default::default()
        }
    }

    fn json_result() -> QueryResult {
        QueryResult::new(vec![Field::new("id", Type::Int32), json_field()]).with_rows(vec![vec![
            Value::new_trusted(Type::Int32, "1"),
            Value::new_trusted(Type::Json, "{\"foo\": \"bar\"}"),
        ]])
    }

    #[test]
    fn test_fallback_field_substitution() {
        let blob = Fallback::JsonAsBlob.apply_field(&json_field()).unwrap();
        assert_eq!(blob.ty, Type::Blob);
        assert_eq!(blob.charset, 33);
        assert_eq!(blob.flags, 144);
        assert_eq!(blob.column_length, u32::MAX);
        assert!(Fallback::JsonAsBlob.apply_field(&Field::new("id", Type::Int32)).is_none());
    }

    #[test]
    fn test_reconcile_primary() {
        let resolver = profile("5.7.31");
        let shape = resolver.reconcile(&json_result(), &json_result()).unwrap();
        assert!(shape.is_primary());
    }

    #[test]
    fn test_reconcile_blob_fallback() {
        let resolver = profile("10.3.8-MariaDB");
        let observed = Fallback::JsonAsBlob.apply_result(&json_result()).unwrap();
        assert_eq!(observed.rows[0][1].ty(), Type::Blob);
        assert_eq!(observed.rows[0][1].raw(), b"{\"foo\": \"bar\"}");

        let shape = resolver.reconcile(&json_result(), &observed).unwrap();
        assert_eq!(shape.fallback(), Some(Fallback::JsonAsBlob));
        assert_eq!(shape.into_inner(), observed);
    }

    #[test]
    fn test_reconcile_unknown_mismatch() {
        let resolver = profile("8.0.23");
        let mut observed = json_result();
        observed.fields[1].ty = Type::Text;
        let err = resolver.reconcile(&json_result(), &observed).unwrap_err();
        assert!(matches!(err, ProxyError::Compatibility(_)));

        let mut wrong_field = json_field();
        wrong_field.charset = 45;
        assert!(resolver.reconcile_field(&json_field(), &wrong_field).is_err());
    }

    #[test]
    fn test_ddl_syntax_error_skips() {
        let resolver = profile("5.6.51");
        let err = EngineError::new(1064, "42000", "You have an error in your SQL syntax; near 'json'");
        let resolution: Resolution<QueryResult> = resolver.on_ddl_error(&err).unwrap();
        assert!(resolution.is_skip());

        let other = EngineError::new(1050, "42S01", "Table 'vitess_json' already exists");
        assert!(resolver.on_ddl_error::<QueryResult>(&other).is_err());
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        assert!(!CompatibilityResolver::from_config(&config).unwrap().profile().is_mariadb());

        config.engine_version = "10.3.8-MariaDB".to_string();
        let resolver = CompatibilityResolver::from_config(&config).unwrap();
        assert!(resolver.profile().json_is_blob_alias());

        config.engine_version = "not a version".to_string();
        assert!(CompatibilityResolver::from_config(&config).is_err());
    }

    #[test]
    fn test_predict_json() {
        assert!(profile("5.6.51").predict_json(json_result()).is_skip());
        assert!(profile("5.7.31").predict_json(json_result()).expected().unwrap().is_primary());
        let maria = profile("10.3.8-MariaDB").predict_json(json_result()).expected().unwrap();
        assert_eq!(maria.fallback(), Some(Fallback::JsonAsBlob));
        assert_eq!(maria.get().fields[1].charset, 33);
    }
}
